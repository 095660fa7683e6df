//! Download engine seam
//!
//! The bridge treats the engine as a black box: it performs the actual
//! network I/O, queuing, retry, and transfer-level pause/resume. The bridge
//! only submits intents and consumes the engine's lifecycle events (fed to
//! [`DownloadBridge::handle_engine_event`](crate::DownloadBridge::handle_engine_event)
//! by whatever wires the engine up).

use crate::error::BridgeError;
use async_trait::async_trait;
use bgdl_types::{EngineDownload, EngineHandle, EngineRequest};

/// Interface the bridge consumes from the underlying download engine.
#[async_trait]
pub trait DownloadEngine: Send + Sync {
    /// Submit a transfer; returns the engine-assigned handle.
    async fn enqueue(&self, request: EngineRequest) -> Result<EngineHandle, BridgeError>;

    async fn pause(&self, handle: EngineHandle) -> Result<(), BridgeError>;

    async fn resume(&self, handle: EngineHandle) -> Result<(), BridgeError>;

    async fn cancel(&self, handle: EngineHandle) -> Result<(), BridgeError>;

    /// Drop the engine's record of a transfer, keeping the downloaded file.
    async fn remove(&self, handle: EngineHandle) -> Result<(), BridgeError>;

    /// Drop the engine's record of a transfer and discard its file.
    async fn delete(&self, handle: EngineHandle) -> Result<(), BridgeError>;

    /// All downloads the engine currently knows about.
    async fn query_all(&self) -> Result<Vec<EngineDownload>, BridgeError>;
}
