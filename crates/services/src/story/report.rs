use serde::Serialize;
use story_core::ActiveSession;
use story_core::model::{Level, ProgressRecord, ProgressSummary};

/// Progress overview for the parent of the active child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentReport {
    pub child_name: String,
    pub level: Level,
    /// Forward page turns in the current session only.
    pub pages_read: u32,
    #[serde(flatten)]
    pub summary: ProgressSummary,
}

impl ParentReport {
    pub(crate) fn new(active: &ActiveSession, records: &[ProgressRecord]) -> Self {
        Self {
            child_name: active.child_name.to_string(),
            level: active.level,
            pages_read: active.pages_read,
            summary: ProgressSummary::from_records(active.level, records, active.stories_completed),
        }
    }
}
