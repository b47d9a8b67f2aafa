use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, mpsc};

use crate::export::{
    dependencies::ExportDependencies,
    page::SharedPage,
    pipeline::{ExportRequest, perform_export},
    types::{ExportError, ExportOutcome, ExportResult, ExportSettings, ExportStatus},
};

/// Marks an export as in flight for as long as it is alive.
///
/// Dropping the guard releases the slot, so every exit path (success, error, panic
/// unwinding, or a cancelled future) re-enables exporting.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::AlreadyInProgress)?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Shared state for running exports one at a time.
///
/// At most one export runs at any moment. A second request made while one is in flight
/// fails immediately with [`ExportError::AlreadyInProgress`] instead of queueing.
#[derive(Clone)]
pub struct ExportManager {
    /// Channel for background export requests.
    request_tx: mpsc::UnboundedSender<(ExportRequest, InFlightGuard)>,
    /// Set while an export is running.
    in_flight: Arc<AtomicBool>,
    state: ExportState,
    settings: ExportSettings,
}

/// State shared between callers and the background task.
#[derive(Clone)]
struct ExportState {
    /// Shared status of the current export.
    status: Arc<Mutex<ExportStatus>>,
    /// Shared result of the last export (if any).
    last_result: Arc<Mutex<Option<ExportOutcome>>>,
    dependencies: Arc<ExportDependencies>,
}

impl ExportState {
    fn new(dependencies: ExportDependencies) -> Self {
        Self {
            status: Arc::new(Mutex::new(ExportStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
            dependencies: Arc::new(dependencies),
        }
    }

    /// Runs the pipeline, records the outcome, and notifies before releasing the guard.
    async fn run(
        &self,
        request: ExportRequest,
        guard: InFlightGuard,
    ) -> Result<ExportResult, ExportError> {
        let notify_success = request.settings.notify_success;
        let result = perform_export(
            request,
            Arc::clone(&self.dependencies),
            Arc::clone(&self.status),
        )
        .await;

        match &result {
            Ok(export) => {
                log::info!(
                    "Export successful: {} ({} pages, {} bytes)",
                    export.saved_path.display(),
                    export.page_count,
                    export.byte_size
                );
                *self.status.lock().await = ExportStatus::Success;
                *self.last_result.lock().await = Some(ExportOutcome::Success(export.clone()));
                if notify_success {
                    self.dependencies
                        .notifier
                        .notify_success(&export.saved_path, export.page_count)
                        .await;
                }
            }
            Err(e) => {
                let error_message = e.to_string();
                log::error!("Export failed: {}", error_message);
                *self.status.lock().await = ExportStatus::Failed(error_message.clone());
                *self.last_result.lock().await = Some(ExportOutcome::Failed(error_message.clone()));
                self.dependencies
                    .notifier
                    .notify_failure(&error_message)
                    .await;
            }
        }

        drop(guard);
        result
    }
}

impl ExportManager {
    /// Create a new export manager.
    ///
    /// This spawns a background task that handles requests made with [`Self::request_export`].
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    /// * `settings` - Raster, page, and delivery settings applied to every export
    pub fn new(runtime_handle: &tokio::runtime::Handle, settings: ExportSettings) -> Self {
        Self::with_dependencies(runtime_handle, settings, ExportDependencies::default())
    }

    /// Create an export manager with custom dependencies (useful for testing).
    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        settings: ExportSettings,
        dependencies: ExportDependencies,
    ) -> Self {
        let (request_tx, mut request_rx) =
            mpsc::unbounded_channel::<(ExportRequest, InFlightGuard)>();
        let state = ExportState::new(dependencies);
        let worker = state.clone();

        // Spawn background task to handle export requests
        runtime_handle.spawn(async move {
            while let Some((request, guard)) = request_rx.recv().await {
                log::debug!("Processing export request: {:?}", request);
                let _ = worker.run(request, guard).await;
            }
        });

        Self {
            request_tx,
            in_flight: Arc::new(AtomicBool::new(false)),
            state,
            settings,
        }
    }

    /// Export `pages` in order into one document named `output_name` and wait for it.
    ///
    /// Fails with [`ExportError::AlreadyInProgress`] without touching the running export if
    /// another export has not finished yet.
    pub async fn export_document(
        &self,
        pages: Vec<SharedPage>,
        output_name: &str,
    ) -> Result<ExportResult, ExportError> {
        let guard = self.acquire()?;
        self.state.run(self.request(pages, output_name), guard).await
    }

    /// Queue an export that runs on the background task.
    ///
    /// This is non-blocking; poll [`Self::get_status`] or [`Self::take_result`] for the
    /// outcome. The in-flight slot is taken immediately, so a second request is rejected
    /// until this one finishes.
    pub fn request_export(
        &self,
        pages: Vec<SharedPage>,
        output_name: &str,
    ) -> Result<(), ExportError> {
        let guard = self.acquire()?;
        self.request_tx
            .send((self.request(pages, output_name), guard))
            .map_err(|_| ExportError::ManagerUnavailable)?;
        Ok(())
    }

    /// Whether an export is currently running. Callers use this to disable their trigger.
    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Settings applied to every export.
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Get the current export status.
    pub async fn get_status(&self) -> ExportStatus {
        self.state.status.lock().await.clone()
    }

    /// Get the result of the last export and clear it.
    pub async fn take_result(&self) -> Option<ExportOutcome> {
        self.state.last_result.lock().await.take()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<ExportOutcome> {
        self.state.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Reset status to idle.
    pub async fn reset(&self) {
        *self.state.status.lock().await = ExportStatus::Idle;
    }

    fn acquire(&self) -> Result<InFlightGuard, ExportError> {
        InFlightGuard::acquire(&self.in_flight).inspect_err(|_| {
            log::warn!("Export requested while another export is in progress");
        })
    }

    fn request(&self, pages: Vec<SharedPage>, output_name: &str) -> ExportRequest {
        ExportRequest {
            pages,
            output_name: output_name.to_string(),
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
impl ExportManager {
    pub(crate) fn with_closed_channel_for_test(dependencies: ExportDependencies) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<(ExportRequest, InFlightGuard)>();
        drop(rx);
        Self {
            request_tx: tx,
            in_flight: Arc::new(AtomicBool::new(false)),
            state: ExportState::new(dependencies),
            settings: ExportSettings::default(),
        }
    }
}
