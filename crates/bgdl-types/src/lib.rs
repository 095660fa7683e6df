//! Shared types for the background download bridge
//!
//! This crate contains the data structures exchanged between the bridge
//! core, the download engine seam, and the host-facing event stream.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Opaque identifier the download engine assigns to a submitted transfer.
///
/// Handles are stable for a task's lifetime inside the engine, but may
/// change across process restarts; the registry re-links them during
/// reconciliation.
pub type EngineHandle = u32;

// ============================================================================
// Task Types
// ============================================================================

/// Durable per-task record kept by the task registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Stable, caller-assigned identifier, unique across active tasks.
    pub client_id: String,
    /// Handle the engine assigned at enqueue time.
    pub engine_handle: EngineHandle,
    /// Whether the one-time begin event fired since the last (re)activation.
    pub begin_reported: bool,
}

impl TaskConfig {
    pub fn new(client_id: String, engine_handle: EngineHandle) -> Self {
        Self {
            client_id,
            engine_handle,
            begin_reported: false,
        }
    }
}

/// Client-facing task state taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Running,
    Suspended,
    Completed,
    Canceling,
}

/// Snapshot of a reconciled task, returned to the host at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub id: String,
    pub state: TaskState,
    pub bytes_written: u64,
    pub total_bytes: u64,
    pub fraction: f64,
}

/// Completed fraction of a transfer, `0.0` when the total is unknown.
pub fn fraction(bytes_written: u64, total_bytes: u64) -> f64 {
    if total_bytes > 0 {
        bytes_written as f64 / total_bytes as f64
    } else {
        0.0
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Transfer priority hint passed through to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Network condition the engine should require before transferring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkConstraint {
    #[default]
    All,
    WifiOnly,
}

/// Options accepted by the bridge's `start` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartOptions {
    pub id: String,
    pub url: String,
    pub destination: PathBuf,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub network: Option<NetworkConstraint>,
}

/// Fully-resolved request submitted to the download engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRequest {
    pub url: String,
    pub destination: PathBuf,
    pub headers: HashMap<String, String>,
    pub priority: Priority,
    pub network: NetworkConstraint,
}

// ============================================================================
// Engine Vocabulary
// ============================================================================

/// Status vocabulary reported by the download engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Downloading,
    Queued,
    Paused,
    Completed,
    Cancelled,
    Failed,
    Removed,
    Deleted,
    None,
}

/// Named error constants the engine reports on a failed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineErrorKind {
    Unknown,
    NoNetwork,
    ConnectionTimedOut,
    UnknownHost,
    HttpNotFound,
    RequestNotSuccessful,
    WriteError,
    FileNotFound,
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineErrorKind::Unknown => "UNKNOWN",
            EngineErrorKind::NoNetwork => "NO_NETWORK",
            EngineErrorKind::ConnectionTimedOut => "CONNECTION_TIMED_OUT",
            EngineErrorKind::UnknownHost => "UNKNOWN_HOST",
            EngineErrorKind::HttpNotFound => "HTTP_NOT_FOUND",
            EngineErrorKind::RequestNotSuccessful => "REQUEST_NOT_SUCCESSFUL",
            EngineErrorKind::WriteError => "WRITE_ERROR",
            EngineErrorKind::FileNotFound => "FILE_NOT_FOUND",
        };
        f.write_str(name)
    }
}

/// Engine error: a named constant plus an optional underlying cause message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub cause: Option<String>,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind) -> Self {
        Self { kind, cause: None }
    }

    pub fn with_cause(kind: EngineErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: Some(cause.into()),
        }
    }
}

/// One row of the engine's live download list (`query_all`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDownload {
    pub handle: EngineHandle,
    pub status: EngineStatus,
    pub downloaded: u64,
    pub total: u64,
}

/// Lifecycle event delivered by the download engine.
///
/// Only the variants the bridge acts on carry payload; everything else the
/// engine might report collapses into `Other` and is ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress {
        handle: EngineHandle,
        downloaded: u64,
        total: u64,
    },
    Completed {
        handle: EngineHandle,
    },
    Failed {
        handle: EngineHandle,
        error: EngineError,
    },
    Cancelled {
        handle: EngineHandle,
    },
    Other,
}

// ============================================================================
// Outbound Event Types
// ============================================================================

/// One task's latest progress snapshot inside a batched progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: String,
    pub bytes_written: u64,
    pub total_bytes: u64,
    pub fraction: f64,
}

impl ProgressEntry {
    pub fn new(id: String, bytes_written: u64, total_bytes: u64) -> Self {
        let fraction = fraction(bytes_written, total_bytes);
        Self {
            id,
            bytes_written,
            total_bytes,
            fraction,
        }
    }
}

/// Events emitted by the bridge to the host transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BridgeEvent {
    /// Fired once per task activation, before any batched progress.
    Begin { id: String, expected_bytes: u64 },
    /// Batched snapshots, at most one batch per flush interval.
    Progress { entries: Vec<ProgressEntry> },
    /// Terminal: the transfer finished and was purged from the registry.
    Completed { id: String },
    /// Terminal: the transfer failed; `error` is the translated message.
    Failed { id: String, error: String },
}
