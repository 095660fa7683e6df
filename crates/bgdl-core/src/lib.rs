//! BGDL Core - Background Download Bridge
//!
//! This crate sits between a host application and a download engine. It
//! keeps a durable, crash-recoverable mapping from caller-assigned task ids
//! to engine handles, reconciles that mapping against the engine's live
//! state after a restart, and coalesces high-frequency progress callbacks
//! into rate-bounded batched events.

mod coalescer;
mod engine;
mod error;
mod registry;
mod translate;

pub use coalescer::*;
pub use engine::*;
pub use error::*;
pub use registry::*;
pub use translate::*;

use bgdl_types::{
    BridgeEvent, EngineEvent, EngineHandle, EngineRequest, ProgressEntry, StartOptions,
    TaskConfig, TaskStatus,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// The bridge façade: accepts client operations, drives the download
/// engine, and routes engine callbacks into outbound [`BridgeEvent`]s.
///
/// All registry and pending-progress state lives behind a single mutex;
/// engine calls are awaited strictly outside of it.
pub struct DownloadBridge {
    /// The underlying download engine
    engine: Arc<dyn DownloadEngine>,
    /// Registry and coalescer, under one exclusion discipline
    inner: Mutex<Inner>,
    /// Event broadcaster
    event_tx: broadcast::Sender<BridgeEvent>,
}

struct Inner {
    registry: TaskRegistry,
    coalescer: ProgressCoalescer,
}

impl DownloadBridge {
    /// Create a bridge, loading the registry from `registry_path`.
    pub fn new(engine: Arc<dyn DownloadEngine>, registry_path: PathBuf) -> Self {
        Self::with_progress_interval(engine, registry_path, PROGRESS_INTERVAL)
    }

    pub fn with_progress_interval(
        engine: Arc<dyn DownloadEngine>,
        registry_path: PathBuf,
        interval: Duration,
    ) -> Self {
        let registry = TaskRegistry::load(registry_path);
        let (event_tx, _) = broadcast::channel(1000);

        Self {
            engine,
            inner: Mutex::new(Inner {
                registry,
                coalescer: ProgressCoalescer::with_interval(interval),
            }),
            event_tx,
        }
    }

    /// Subscribe to outbound bridge events
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.event_tx.subscribe()
    }

    /// Emit an event
    fn emit(&self, event: BridgeEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Durable record for a client id, if the task is live.
    pub fn task(&self, client_id: &str) -> Option<TaskConfig> {
        self.inner.lock().registry.lookup_by_client_id(client_id).cloned()
    }

    // ========================================================================
    // Client Operations
    // ========================================================================

    /// Enqueue a new download and register it under the caller's id.
    ///
    /// Validation failures are rejected before any engine call. Enqueue is
    /// fire-and-forget; this never blocks on network activity.
    pub async fn start(&self, options: StartOptions) -> Result<(), BridgeError> {
        let StartOptions {
            id,
            url,
            destination,
            headers,
            priority,
            network,
        } = options;

        if id.is_empty() {
            return Err(BridgeError::InvalidRequest("id must be set".to_string()));
        }
        if url.is_empty() || destination.as_os_str().is_empty() {
            return Err(BridgeError::InvalidRequest(
                "url and destination must be set".to_string(),
            ));
        }
        url::Url::parse(&url)
            .map_err(|_| BridgeError::InvalidRequest(format!("invalid url: {}", url)))?;

        // Reject id collisions before touching the engine.
        if self.inner.lock().registry.lookup_by_client_id(&id).is_some() {
            return Err(BridgeError::DuplicateTask(id));
        }

        info!("Starting download {}: {}", id, url);

        let request = EngineRequest {
            url,
            destination,
            headers: headers.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            network: network.unwrap_or_default(),
        };
        let handle = self.engine.enqueue(request).await?;

        let registered = self.inner.lock().registry.register(&id, handle);
        if let Err(e) = registered {
            // Lost the race for the id; don't leave an orphaned transfer.
            if let Err(del) = self.engine.delete(handle).await {
                warn!("Failed to delete orphaned transfer {}: {}", handle, del);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Pause a task; unknown ids are a silent no-op.
    pub async fn pause(&self, client_id: &str) -> Result<(), BridgeError> {
        let handle = self.inner.lock().registry.handle_for(client_id);
        match handle {
            Some(handle) => self.engine.pause(handle).await,
            None => {
                debug!("Ignoring pause for unknown task {}", client_id);
                Ok(())
            }
        }
    }

    /// Resume a task, re-arming its begin event so the next progress report
    /// re-announces the expected size. Unknown ids are a silent no-op.
    pub async fn resume(&self, client_id: &str) -> Result<(), BridgeError> {
        let handle = {
            let mut inner = self.inner.lock();
            inner.registry.clear_begin_reported(client_id);
            inner.registry.handle_for(client_id)
        };
        match handle {
            Some(handle) => self.engine.resume(handle).await,
            None => {
                debug!("Ignoring resume for unknown task {}", client_id);
                Ok(())
            }
        }
    }

    /// Cancel a task; unknown ids are a silent no-op. Registry cleanup
    /// happens when the engine delivers its cancelled event.
    pub async fn cancel(&self, client_id: &str) -> Result<(), BridgeError> {
        let handle = self.inner.lock().registry.handle_for(client_id);
        match handle {
            Some(handle) => self.engine.cancel(handle).await,
            None => {
                debug!("Ignoring cancel for unknown task {}", client_id);
                Ok(())
            }
        }
    }

    /// Reconcile the registry against the engine's live download list.
    ///
    /// Known downloads come back as translated statuses with their ids
    /// re-linked (handles may change across restarts) and begin events
    /// re-armed; downloads the registry has no record of are orphans and
    /// get deleted from the engine. Called at host-application startup to
    /// repopulate its task list.
    pub async fn reconcile(&self) -> Result<Vec<TaskStatus>, BridgeError> {
        let downloads = self.engine.query_all().await?;

        let mut statuses = Vec::new();
        let mut orphans = Vec::new();
        {
            let mut inner = self.inner.lock();
            let known = inner.registry.all_handles();

            for download in downloads {
                if known.contains(&download.handle) {
                    let client_id = inner
                        .registry
                        .lookup_by_handle(download.handle)
                        .map(|config| config.client_id.clone())
                        .unwrap_or_default();

                    statuses.push(TaskStatus {
                        id: client_id.clone(),
                        state: task_state(download.status),
                        bytes_written: download.downloaded,
                        total_bytes: download.total,
                        fraction: bgdl_types::fraction(download.downloaded, download.total),
                    });
                    inner.registry.relink(&client_id, download.handle);
                } else {
                    orphans.push(download.handle);
                }
            }
        }

        for handle in orphans {
            info!("Deleting orphaned download {} from engine", handle);
            if let Err(e) = self.engine.delete(handle).await {
                warn!("Failed to delete orphaned download {}: {}", handle, e);
            }
        }

        Ok(statuses)
    }

    /// Flush any pending non-terminal snapshots as a final batch.
    pub fn shutdown(&self) {
        let entries = self.inner.lock().coalescer.drain();
        if !entries.is_empty() {
            self.emit(BridgeEvent::Progress { entries });
        }
    }

    // ========================================================================
    // Engine Callbacks
    // ========================================================================

    /// Entry point for the engine's lifecycle events.
    ///
    /// May be driven from a task distinct from the one issuing client
    /// commands; all shared state is serialized behind the bridge's mutex.
    pub async fn handle_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::Progress {
                handle,
                downloaded,
                total,
            } => {
                let outbound = {
                    let mut inner = self.inner.lock();
                    let Some(config) = inner.registry.lookup_by_handle(handle).cloned() else {
                        return;
                    };

                    if !config.begin_reported {
                        inner.registry.mark_begin_reported(handle);
                        Some(BridgeEvent::Begin {
                            id: config.client_id,
                            expected_bytes: total,
                        })
                    } else {
                        inner
                            .coalescer
                            .record(ProgressEntry::new(config.client_id, downloaded, total))
                            .map(|entries| BridgeEvent::Progress { entries })
                    }
                };

                if let Some(event) = outbound {
                    self.emit(event);
                }
            }

            EngineEvent::Completed { handle } => {
                if let Some(id) = self.purge(handle) {
                    self.emit(BridgeEvent::Completed { id });
                }
                if let Err(e) = self.engine.remove(handle).await {
                    warn!("Failed to remove completed download {}: {}", handle, e);
                }
            }

            EngineEvent::Failed { handle, error } => {
                if let Some(id) = self.purge(handle) {
                    let error = error_message(&error);
                    warn!("Download {} failed: {}", id, error);
                    self.emit(BridgeEvent::Failed { id, error });
                }
                if let Err(e) = self.engine.remove(handle).await {
                    warn!("Failed to remove failed download {}: {}", handle, e);
                }
            }

            EngineEvent::Cancelled { handle } => {
                self.purge(handle);
                if let Err(e) = self.engine.delete(handle).await {
                    warn!("Failed to delete cancelled download {}: {}", handle, e);
                }
            }

            EngineEvent::Other => {}
        }
    }

    /// Drop a task from the registry and the coalescer's pending map.
    fn purge(&self, handle: EngineHandle) -> Option<String> {
        let mut inner = self.inner.lock();
        let config = inner.registry.lookup_by_handle(handle).cloned()?;
        inner.registry.remove(handle);
        inner.coalescer.forget(&config.client_id);
        Some(config.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgdl_types::{
        EngineDownload, EngineError, EngineErrorKind, EngineStatus, Priority, TaskState,
    };
    use tempfile::TempDir;
    use tokio::sync::broadcast::error::TryRecvError;

    #[derive(Default)]
    struct MockState {
        next_handle: EngineHandle,
        enqueued: Vec<EngineRequest>,
        downloads: Vec<EngineDownload>,
        paused: Vec<EngineHandle>,
        resumed: Vec<EngineHandle>,
        cancelled: Vec<EngineHandle>,
        removed: Vec<EngineHandle>,
        deleted: Vec<EngineHandle>,
    }

    #[derive(Default)]
    struct MockEngine {
        state: Mutex<MockState>,
    }

    #[async_trait::async_trait]
    impl DownloadEngine for MockEngine {
        async fn enqueue(&self, request: EngineRequest) -> Result<EngineHandle, BridgeError> {
            let mut state = self.state.lock();
            state.next_handle += 1;
            state.enqueued.push(request);
            Ok(state.next_handle)
        }

        async fn pause(&self, handle: EngineHandle) -> Result<(), BridgeError> {
            self.state.lock().paused.push(handle);
            Ok(())
        }

        async fn resume(&self, handle: EngineHandle) -> Result<(), BridgeError> {
            self.state.lock().resumed.push(handle);
            Ok(())
        }

        async fn cancel(&self, handle: EngineHandle) -> Result<(), BridgeError> {
            self.state.lock().cancelled.push(handle);
            Ok(())
        }

        async fn remove(&self, handle: EngineHandle) -> Result<(), BridgeError> {
            self.state.lock().removed.push(handle);
            Ok(())
        }

        async fn delete(&self, handle: EngineHandle) -> Result<(), BridgeError> {
            self.state.lock().deleted.push(handle);
            Ok(())
        }

        async fn query_all(&self) -> Result<Vec<EngineDownload>, BridgeError> {
            Ok(self.state.lock().downloads.clone())
        }
    }

    fn bridge_in(dir: &TempDir) -> (Arc<MockEngine>, DownloadBridge) {
        let engine = Arc::new(MockEngine::default());
        let bridge = DownloadBridge::new(engine.clone(), dir.path().join("tasks.json"));
        (engine, bridge)
    }

    fn options(id: &str) -> StartOptions {
        StartOptions {
            id: id.to_string(),
            url: "http://example.com/file.bin".to_string(),
            destination: PathBuf::from("/tmp/file.bin"),
            headers: None,
            priority: None,
            network: None,
        }
    }

    #[tokio::test]
    async fn test_start_registers_task() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);

        bridge.start(options("a")).await.unwrap();

        let config = bridge.task("a").unwrap();
        assert_eq!(config.engine_handle, 1);
        assert!(!config.begin_reported);

        let state = engine.state.lock();
        assert_eq!(state.enqueued.len(), 1);
        assert_eq!(state.enqueued[0].url, "http://example.com/file.bin");
        assert_eq!(state.enqueued[0].priority, Priority::Normal);
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_request_before_engine_call() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);

        let err = bridge.start(options("")).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidRequest(_)));

        let mut bad_url = options("a");
        bad_url.url = "not a url".to_string();
        let err = bridge.start(bad_url).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidRequest(_)));

        let mut empty_destination = options("a");
        empty_destination.destination = PathBuf::new();
        let err = bridge.start(empty_destination).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidRequest(_)));

        assert!(engine.state.lock().enqueued.is_empty());
    }

    #[tokio::test]
    async fn test_start_rejects_duplicate_id() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);

        bridge.start(options("a")).await.unwrap();
        let err = bridge.start(options("a")).await.unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateTask(_)));

        assert_eq!(bridge.task("a").unwrap().engine_handle, 1);
        assert_eq!(engine.state.lock().enqueued.len(), 1);
    }

    #[tokio::test]
    async fn test_operations_on_unknown_id_are_noops() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);

        bridge.pause("ghost").await.unwrap();
        bridge.resume("ghost").await.unwrap();
        bridge.cancel("ghost").await.unwrap();

        let state = engine.state.lock();
        assert!(state.paused.is_empty());
        assert!(state.resumed.is_empty());
        assert!(state.cancelled.is_empty());
    }

    #[tokio::test]
    async fn test_pause_and_cancel_forward_to_engine() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);

        bridge.start(options("a")).await.unwrap();
        bridge.pause("a").await.unwrap();
        bridge.cancel("a").await.unwrap();

        let state = engine.state.lock();
        assert_eq!(state.paused, vec![1]);
        assert_eq!(state.cancelled, vec![1]);
    }

    #[tokio::test]
    async fn test_completed_event_emits_once_and_purges() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();
        bridge
            .handle_engine_event(EngineEvent::Completed { handle: 1 })
            .await;

        assert_eq!(
            events.try_recv().unwrap(),
            BridgeEvent::Completed { id: "a".to_string() }
        );
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
        assert!(bridge.task("a").is_none());
        assert_eq!(engine.state.lock().removed, vec![1]);

        // A second completed callback for the same handle emits nothing
        bridge
            .handle_engine_event(EngineEvent::Completed { handle: 1 })
            .await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        // Gone from durable state too
        let reloaded = TaskRegistry::load(dir.path().join("tasks.json"));
        assert!(reloaded.lookup_by_client_id("a").is_none());
    }

    #[tokio::test]
    async fn test_failed_event_carries_translated_error() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();
        bridge
            .handle_engine_event(EngineEvent::Failed {
                handle: 1,
                error: EngineError::with_cause(EngineErrorKind::Unknown, "tls handshake failed"),
            })
            .await;

        assert_eq!(
            events.try_recv().unwrap(),
            BridgeEvent::Failed {
                id: "a".to_string(),
                error: "tls handshake failed".to_string(),
            }
        );
        assert!(bridge.task("a").is_none());
        assert_eq!(engine.state.lock().removed, vec![1]);
    }

    #[tokio::test]
    async fn test_cancelled_event_purges_without_emitting() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();
        bridge
            .handle_engine_event(EngineEvent::Cancelled { handle: 1 })
            .await;

        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
        assert!(bridge.task("a").is_none());
        assert_eq!(engine.state.lock().deleted, vec![1]);
    }

    #[tokio::test]
    async fn test_first_progress_emits_begin_immediately() {
        let dir = TempDir::new().unwrap();
        let (_engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 0,
                total: 1000,
            })
            .await;

        assert_eq!(
            events.try_recv().unwrap(),
            BridgeEvent::Begin {
                id: "a".to_string(),
                expected_bytes: 1000,
            }
        );

        // Subsequent reports inside the interval are buffered, not emitted
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 100,
                total: 1000,
            })
            .await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_progress_for_unknown_handle_is_ignored() {
        let dir = TempDir::new().unwrap();
        let (_engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 99,
                downloaded: 10,
                total: 100,
            })
            .await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_resume_rearms_begin_event() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 0,
                total: 1000,
            })
            .await;
        assert!(matches!(events.try_recv(), Ok(BridgeEvent::Begin { .. })));

        bridge.pause("a").await.unwrap();
        bridge.resume("a").await.unwrap();
        assert_eq!(engine.state.lock().resumed, vec![1]);

        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 500,
                total: 2000,
            })
            .await;
        assert_eq!(
            events.try_recv().unwrap(),
            BridgeEvent::Begin {
                id: "a".to_string(),
                expected_bytes: 2000,
            }
        );
    }

    #[tokio::test]
    async fn test_progress_batches_at_bounded_rate() {
        let dir = TempDir::new().unwrap();
        let engine = Arc::new(MockEngine::default());
        let bridge = DownloadBridge::with_progress_interval(
            engine.clone(),
            dir.path().join("tasks.json"),
            Duration::from_millis(170),
        );
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();

        // First report: begin only
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 0,
                total: 100,
            })
            .await;
        assert!(matches!(events.try_recv(), Ok(BridgeEvent::Begin { .. })));

        // Two reports 10ms apart: buffered, no batch yet
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 10,
                total: 100,
            })
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 20,
                total: 100,
            })
            .await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        // Past the interval: exactly one batch with the latest snapshot
        tokio::time::sleep(Duration::from_millis(200)).await;
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 30,
                total: 100,
            })
            .await;

        match events.try_recv().unwrap() {
            BridgeEvent::Progress { entries } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].id, "a");
                assert_eq!(entries[0].bytes_written, 30);
                assert!((entries[0].fraction - 0.3).abs() < 1e-9);
            }
            other => panic!("expected progress batch, got {:?}", other),
        }
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_reconcile_translates_known_and_deletes_orphans() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);

        bridge.start(options("a")).await.unwrap();
        engine.state.lock().downloads = vec![
            EngineDownload {
                handle: 1,
                status: EngineStatus::Paused,
                downloaded: 250,
                total: 1000,
            },
            EngineDownload {
                handle: 99,
                status: EngineStatus::Downloading,
                downloaded: 5,
                total: 50,
            },
        ];

        let statuses = bridge.reconcile().await.unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].id, "a");
        assert_eq!(statuses[0].state, TaskState::Suspended);
        assert_eq!(statuses[0].bytes_written, 250);
        assert!((statuses[0].fraction - 0.25).abs() < 1e-9);

        assert_eq!(engine.state.lock().deleted, vec![99]);
    }

    #[tokio::test]
    async fn test_reconcile_rearms_begin_event() {
        let dir = TempDir::new().unwrap();
        let (engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 0,
                total: 100,
            })
            .await;
        assert!(matches!(events.try_recv(), Ok(BridgeEvent::Begin { .. })));

        engine.state.lock().downloads = vec![EngineDownload {
            handle: 1,
            status: EngineStatus::Downloading,
            downloaded: 10,
            total: 100,
        }];
        bridge.reconcile().await.unwrap();

        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 20,
                total: 100,
            })
            .await;
        assert!(matches!(events.try_recv(), Ok(BridgeEvent::Begin { .. })));
    }

    #[tokio::test]
    async fn test_registry_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        {
            let engine = Arc::new(MockEngine::default());
            let bridge = DownloadBridge::new(engine, path.clone());
            bridge.start(options("a")).await.unwrap();
        }

        let engine = Arc::new(MockEngine::default());
        let bridge = DownloadBridge::new(engine, path);
        assert_eq!(bridge.task("a").unwrap().engine_handle, 1);
    }

    #[tokio::test]
    async fn test_shutdown_flushes_pending_snapshots() {
        let dir = TempDir::new().unwrap();
        let (_engine, bridge) = bridge_in(&dir);
        let mut events = bridge.subscribe();

        bridge.start(options("a")).await.unwrap();
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 0,
                total: 100,
            })
            .await;
        bridge
            .handle_engine_event(EngineEvent::Progress {
                handle: 1,
                downloaded: 60,
                total: 100,
            })
            .await;
        assert!(matches!(events.try_recv(), Ok(BridgeEvent::Begin { .. })));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        bridge.shutdown();
        match events.try_recv().unwrap() {
            BridgeEvent::Progress { entries } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].bytes_written, 60);
            }
            other => panic!("expected progress batch, got {:?}", other),
        }
    }
}
