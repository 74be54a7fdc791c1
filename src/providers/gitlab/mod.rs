pub mod client;
pub mod links;
mod provider;

pub use client::ClientSettings;
pub use provider::GitLabProvider;
