pub mod config;
pub mod credentials;
pub mod fetch;
pub mod github;
pub mod output;
pub mod plugins;
pub mod summary;
