//! Shared pagination and TTL constants

use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

pub const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DB_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
pub const DB_MAX_LIFETIME: Duration = Duration::from_secs(1800);
pub const DB_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// How long browsers may cache a CORS preflight answer.
pub const CORS_MAX_AGE: Duration = Duration::from_secs(3600);
