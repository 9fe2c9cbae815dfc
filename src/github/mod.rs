pub mod client;
pub mod context;
pub mod error;
pub mod link;
pub mod retry;
pub mod types;
pub mod walker;

pub use client::Fetcher;
pub use context::RunContext;
pub use error::FetchError;
pub use retry::RetryPolicy;
pub use walker::{Concurrency, RepoSource, WalkOptions, Walker};
