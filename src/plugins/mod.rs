//! Pluggable pull request classifiers.
//!
//! A classifier enriches each [`PullSummary`] while the walker feeds it the
//! raw pull request and its comments, then buckets the summary into one of
//! the dashboard's three columns. Implementations are registered at compile
//! time and selected by name from the config file.

pub mod default;
pub mod jclouds;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::github::types::{Comment, PullDetail};
use crate::summary::{Column, PullSummary};

pub use default::DefaultClassifier;
pub use jclouds::JcloudsClassifier;

/// Names accepted by [`load`]
pub const AVAILABLE: &[&str] = &["default", "jclouds"];

/// Column titles shown above the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeaders {
    pub left: String,
    pub middle: String,
    pub right: String,
}

impl ColumnHeaders {
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Left => &self.left,
            Column::Middle => &self.middle,
            Column::Right => &self.right,
        }
    }
}

/// Static presentation settings of a classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    pub title: String,
    pub headers: ColumnHeaders,
    pub template: String,
    /// Repository API URLs scanned when the config names none
    pub repos: Vec<String>,
}

pub trait Classifier: Send + Sync {
    fn describe(&self) -> Descriptor;

    /// Called once per pull request before any comment is parsed.
    fn parse_pull(&self, pull: &PullDetail, data: &mut PullSummary);

    /// Called for every comment, in the order the API returned them.
    fn parse_comment(&self, comment: &Comment, data: &mut PullSummary);

    /// Called once after the last comment; picks the column.
    fn classify(&self, data: &mut PullSummary) -> Column;
}

/// Look up a classifier by its config name.
pub fn load(name: &str) -> Result<Box<dyn Classifier>> {
    match name {
        "default" => Ok(Box::new(DefaultClassifier)),
        "jclouds" => Ok(Box::new(JcloudsClassifier)),
        other => bail!(
            "Unknown plugin '{}'. Available plugins: {}",
            other,
            AVAILABLE.join(", ")
        ),
    }
}
