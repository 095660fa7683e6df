//! Translation between engine vocabulary and the client-facing taxonomy

use bgdl_types::{EngineError, EngineErrorKind, EngineStatus, TaskState};

/// Map an engine status onto the client-facing task state.
pub fn task_state(status: EngineStatus) -> TaskState {
    match status {
        EngineStatus::Downloading | EngineStatus::Queued => TaskState::Running,
        EngineStatus::Paused => TaskState::Suspended,
        EngineStatus::Completed => TaskState::Completed,
        EngineStatus::Cancelled
        | EngineStatus::Failed
        | EngineStatus::Removed
        | EngineStatus::Deleted
        | EngineStatus::None => TaskState::Canceling,
    }
}

/// Human-readable message for a failed transfer.
///
/// An unknown error class with an underlying cause surfaces the cause
/// message; otherwise the engine's named constant is surfaced.
pub fn error_message(error: &EngineError) -> String {
    match (&error.kind, &error.cause) {
        (EngineErrorKind::Unknown, Some(cause)) => cause.clone(),
        (kind, _) => kind.to_string(),
    }
}
