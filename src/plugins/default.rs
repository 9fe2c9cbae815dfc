use super::{Classifier, ColumnHeaders, Descriptor};
use crate::github::types::{Comment, PullDetail};
use crate::summary::{Column, PullSummary};

/// Classifier driven only by walker-computed signals: approvals from the
/// configured patterns and whether the user takes part in the discussion.
pub struct DefaultClassifier;

impl Classifier for DefaultClassifier {
    fn describe(&self) -> Descriptor {
        Descriptor {
            title: "Code Review Dashboard".to_string(),
            headers: ColumnHeaders {
                left: "Needs Review".to_string(),
                middle: "Following".to_string(),
                right: "Approved".to_string(),
            },
            template: "default.html".to_string(),
            repos: Vec::new(),
        }
    }

    fn parse_pull(&self, _pull: &PullDetail, _data: &mut PullSummary) {}

    fn parse_comment(&self, _comment: &Comment, _data: &mut PullSummary) {}

    fn classify(&self, data: &mut PullSummary) -> Column {
        if data.likes > 0 {
            Column::Right
        } else if data.following {
            Column::Middle
        } else {
            Column::Left
        }
    }
}
