//! The closed action set and the reducer.

use serde::{Deserialize, Serialize};

use crate::state::{LearningProgressState, ProgressModel};

/// A state transition requested by the UI.
///
/// Indices are signed: out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum LearningProgressAction {
    SetLessonIndex {
        index: i64,
    },
    MarkLessonComplete {
        index: i64,
    },
    /// Moves the current lesson to the one covering the node being viewed.
    SyncNodeLesson {
        index: i64,
    },
    MarkNodeComplete {
        node_id: String,
    },
    SetPathStep {
        path_id: String,
        step_index: i64,
    },
    MarkPathStepComplete {
        path_id: String,
        step_index: i64,
        node_id: String,
    },
    ReplaceState {
        state: Box<LearningProgressState>,
    },
}

fn step(index: i64) -> usize {
    usize::try_from(index.max(0)).unwrap_or(usize::MAX)
}

impl ProgressModel {
    /// Applies `action` to `state`.
    ///
    /// Total and pure. Path actions on an unknown path id start from a
    /// zero-valued record.
    pub fn reduce(
        &self,
        mut state: LearningProgressState,
        action: LearningProgressAction,
    ) -> LearningProgressState {
        match action {
            LearningProgressAction::SetLessonIndex { index }
            | LearningProgressAction::SyncNodeLesson { index } => {
                state.current_lesson_index = self.clamp_lesson_index(index);
            }
            LearningProgressAction::MarkLessonComplete { index } => {
                state
                    .completed_lessons
                    .insert(self.clamp_lesson_index(index));
            }
            LearningProgressAction::MarkNodeComplete { node_id } => {
                // Empty keys never survive a parse; keep them out of the state too.
                if !node_id.is_empty() {
                    state.node_completion.insert(node_id, true);
                }
            }
            LearningProgressAction::SetPathStep {
                path_id,
                step_index,
            } => {
                let record = state.path_progress.entry(path_id).or_default();
                record.current_step_index = step(step_index);
            }
            LearningProgressAction::MarkPathStepComplete {
                path_id,
                step_index,
                node_id,
            } => {
                let record = state.path_progress.entry(path_id).or_default();
                record.completed_step_indexes.insert(step(step_index));
                record.completed_node_ids.insert(node_id);
            }
            LearningProgressAction::ReplaceState { state: replacement } => {
                return self.normalize(*replacement);
            }
        }
        state
    }
}
