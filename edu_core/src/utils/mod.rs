pub mod date;

pub use date::{format_date, iso_timestamp, now_iso};
