//! Learning progress state and the model that owns lesson-count clamping.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Key the persistence collaborator stores the serialized state under.
pub const STORAGE_KEY: &str = "rawblock-learning-progress-v2";

/// Number of guided lessons when no catalog size is configured.
pub const DEFAULT_LESSON_COUNT: usize = 8;

/// Progress through one learning path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathProgressRecord {
    pub current_step_index: usize,
    pub completed_step_indexes: BTreeSet<usize>,
    /// Insertion-ordered, deduplicated.
    pub completed_node_ids: IndexSet<String>,
}

/// One learner's progress. Created per session, changed only by
/// [`ProgressModel::reduce`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgressState {
    pub current_lesson_index: usize,
    pub completed_lessons: BTreeSet<usize>,
    pub node_completion: BTreeMap<String, bool>,
    pub path_progress: BTreeMap<String, PathProgressRecord>,
}

/// Lesson catalog size plus the operations that depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressModel {
    lesson_count: usize,
}

impl Default for ProgressModel {
    fn default() -> Self {
        ProgressModel::new(DEFAULT_LESSON_COUNT)
    }
}

impl ProgressModel {
    /// A model over `lesson_count` lessons. Zero is treated as one.
    pub fn new(lesson_count: usize) -> Self {
        ProgressModel {
            lesson_count: lesson_count.max(1),
        }
    }

    pub fn lesson_count(&self) -> usize {
        self.lesson_count
    }

    /// Clamps `index` into `[0, lesson_count - 1]`.
    pub fn clamp_lesson_index(&self, index: i64) -> usize {
        let last = self.lesson_count - 1;
        usize::try_from(index.max(0)).map_or(last, |i| i.min(last))
    }

    /// Highest lesson a learner may open, given what they have completed.
    pub fn lesson_unlock_index(&self, completed_lessons: &BTreeSet<usize>) -> usize {
        completed_lessons.len().min(self.lesson_count - 1)
    }

    /// The stored record for `path_id`, or a zero-valued one.
    pub fn path_record(&self, state: &LearningProgressState, path_id: &str) -> PathProgressRecord {
        state
            .path_progress
            .get(path_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Brings lesson indices into range for this model.
    pub(crate) fn normalize(&self, mut state: LearningProgressState) -> LearningProgressState {
        let last = self.lesson_count - 1;
        state.current_lesson_index = state.current_lesson_index.min(last);
        state.completed_lessons = state
            .completed_lessons
            .into_iter()
            .map(|i| i.min(last))
            .collect();
        state
    }
}
