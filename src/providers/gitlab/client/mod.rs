mod core;
mod repository;

pub use self::core::{ClientSettings, GitLabClient, DEFAULT_MAX_CONCURRENT_REQUESTS};
