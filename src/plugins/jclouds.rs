use super::{Classifier, ColumnHeaders, Descriptor};
use crate::github::types::{Comment, PullDetail};
use crate::summary::{BuildStatus, Column, PullSummary};

/// Pulls untouched for this many days are flagged obsolete
const OBSOLETE_AFTER_DAYS: i64 = 180;

const REPOS: &[&str] = &[
    "https://api.github.com/repos/jclouds/jclouds",
    "https://api.github.com/repos/jclouds/jclouds-chef",
    "https://api.github.com/repos/jclouds/jclouds-cli",
    "https://api.github.com/repos/jclouds/jclouds-karaf",
    "https://api.github.com/repos/jclouds/jclouds-labs",
    "https://api.github.com/repos/jclouds/jclouds-labs-google",
    "https://api.github.com/repos/jclouds/jclouds-labs-aws",
    "https://api.github.com/repos/jclouds/jclouds-labs-openstack",
    "https://api.github.com/repos/jclouds/jclouds-examples",
    "https://api.github.com/repos/jclouds/jclouds-site",
];

/// Marks that count as a like
const LIKES: &[&str] = &["+1", "lgtm"];

/// Review dashboard for the jclouds project.
///
/// Likes are `+1`/`lgtm` comments; Jenkins reports builds as comments
/// containing SUCCESS, FAILURE or UNSTABLE. All matches are case-sensitive
/// substrings.
#[derive(Debug, Default, Clone, Copy)]
pub struct JcloudsClassifier;

impl Classifier for JcloudsClassifier {
    fn describe(&self) -> Descriptor {
        Descriptor {
            title: "jclouds Code Review Dashboard".to_string(),
            headers: ColumnHeaders {
                left: "Need More Work".to_string(),
                middle: "Jenkins Happy".to_string(),
                right: "Someone Likes!".to_string(),
            },
            template: "jclouds.html".to_string(),
            repos: REPOS.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn parse_pull(&self, _pull: &PullDetail, data: &mut PullSummary) {
        data.obsolete = data.old >= OBSOLETE_AFTER_DAYS;
        data.likes = 0;
        data.markers = Default::default();
    }

    fn parse_comment(&self, comment: &Comment, data: &mut PullSummary) {
        let body = comment.body.as_str();
        if LIKES.iter().any(|like| body.contains(like)) {
            data.likes += 1;
        }
        if body.contains("SUCCESS") {
            data.markers.oks.push(comment.created_at);
        }
        if body.contains("FAILURE") {
            data.markers.fails.push(comment.created_at);
        }
        if body.contains("UNSTABLE") {
            data.markers.unstable.push(comment.created_at);
        }
    }

    fn classify(&self, data: &mut PullSummary) -> Column {
        data.markers.sort_descending();
        data.total_oks = data.markers.oks.len();
        data.total_fails = data.markers.fails.len();
        data.total_unstable = data.markers.unstable.len();

        if data.likes > 0 {
            return Column::Right;
        }
        match data.build_status {
            Some(BuildStatus::Success) => return Column::Middle,
            Some(BuildStatus::Failure) => return Column::Left,
            _ => {}
        }
        match (data.markers.oks.first(), data.markers.fails.first()) {
            (None, _) => Column::Left,
            (Some(_), None) => Column::Middle,
            (Some(last_ok), Some(last_fail)) if last_ok > last_fail => Column::Middle,
            _ => Column::Left,
        }
    }
}
