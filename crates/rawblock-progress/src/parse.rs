//! Reading and writing persisted progress blobs.
//!
//! [`ProgressModel::parse_state`] treats its input as untrusted. Anything
//! that is not a JSON object yields the default state. Inside an object each
//! field is sanitized on its own, so one bad field never discards the rest:
//!
//! - `currentLessonIndex`: integer, clamped to the lesson range; otherwise 0
//! - `completedLessons`: integers only, clamped, deduplicated and sorted
//! - `nodeCompletion`: entries with a non-empty key and a boolean value
//! - `pathProgress`: object-valued records only; step indexes must be
//!   non-negative integers, node ids must be strings

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::error::ProgressError;
use crate::state::{LearningProgressState, PathProgressRecord, ProgressModel};

/// Integral JSON numbers, including `2.0`. Out-of-range values saturate.
fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.as_u64().is_some() {
        return Some(i64::MAX);
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn array<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match object.get(key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn non_negative(value: &Value) -> Option<usize> {
    as_integer(value).and_then(|i| usize::try_from(i).ok())
}

fn sanitize_record(record: &Map<String, Value>) -> PathProgressRecord {
    let current_step_index = record
        .get("currentStepIndex")
        .and_then(as_integer)
        .map_or(0, |i| usize::try_from(i.max(0)).unwrap_or(usize::MAX));
    let completed_step_indexes: BTreeSet<usize> = array(record, "completedStepIndexes")
        .iter()
        .filter_map(non_negative)
        .collect();
    let completed_node_ids: IndexSet<String> = array(record, "completedNodeIds")
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();

    PathProgressRecord {
        current_step_index,
        completed_step_indexes,
        completed_node_ids,
    }
}

impl ProgressModel {
    /// Decodes a persisted blob. Never fails.
    pub fn parse_state(&self, raw: &str) -> LearningProgressState {
        if raw.trim().is_empty() {
            return LearningProgressState::default();
        }

        let object = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => object,
            Ok(other) => {
                tracing::warn!(
                    found = json_kind(&other),
                    "persisted progress is not an object, using defaults"
                );
                return LearningProgressState::default();
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "persisted progress is not valid JSON, using defaults"
                );
                return LearningProgressState::default();
            }
        };

        let current_lesson_index = object
            .get("currentLessonIndex")
            .and_then(as_integer)
            .map_or(0, |i| self.clamp_lesson_index(i));

        let completed_lessons: BTreeSet<usize> = array(&object, "completedLessons")
            .iter()
            .filter_map(as_integer)
            .map(|i| self.clamp_lesson_index(i))
            .collect();

        let node_completion: BTreeMap<String, bool> = match object.get("nodeCompletion") {
            Some(Value::Object(entries)) => entries
                .iter()
                .filter(|(key, _)| !key.is_empty())
                .filter_map(|(key, value)| value.as_bool().map(|done| (key.clone(), done)))
                .collect(),
            _ => BTreeMap::new(),
        };

        let path_progress: BTreeMap<String, PathProgressRecord> = match object.get("pathProgress") {
            Some(Value::Object(paths)) => paths
                .iter()
                .filter_map(|(path_id, record)| {
                    record
                        .as_object()
                        .map(|record| (path_id.clone(), sanitize_record(record)))
                })
                .collect(),
            _ => BTreeMap::new(),
        };

        LearningProgressState {
            current_lesson_index,
            completed_lessons,
            node_completion,
            path_progress,
        }
    }

    /// Encodes `state` as the JSON blob [`ProgressModel::parse_state`] reads.
    pub fn serialize_state(&self, state: &LearningProgressState) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(state)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
