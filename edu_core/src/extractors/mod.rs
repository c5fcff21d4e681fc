pub mod json;
pub mod query;

pub use json::{EnvelopeJson, EnvelopeJsonRejection};
pub use query::{EnvelopePath, EnvelopeQuery};
