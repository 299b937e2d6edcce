//! Per-session learning progress: state, reducer, and the lenient parser
//! for persisted blobs.
//!
//! The state is threaded by value. [`ProgressModel::reduce`] is a total, pure
//! transition over [`LearningProgressAction`]; [`ProgressModel::parse_state`]
//! never fails and sanitizes each field independently. Serialization is the
//! only fallible operation and reports a [`ProgressError`].

pub mod action;
pub mod error;
pub mod parse;
pub mod state;

pub use action::LearningProgressAction;
pub use error::ProgressError;
pub use state::{
    LearningProgressState, PathProgressRecord, ProgressModel, DEFAULT_LESSON_COUNT, STORAGE_KEY,
};
