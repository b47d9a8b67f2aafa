use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use tokio::task;

use crate::export::{
    document::{DocumentBackend, PdfBackend},
    file::{self, ExportSaveConfig},
    page::SharedPage,
    raster,
    types::{ExportError, PageImage, RasterSettings},
};
use crate::notification::{Notification, Urgency};

/// Abstraction over turning one page into an encoded image.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize(
        &self,
        index: usize,
        page: SharedPage,
        settings: RasterSettings,
    ) -> Result<PageImage, ExportError>;
}

/// Abstraction over delivering a finished document.
pub trait DocumentSaver: Send + Sync {
    fn save(
        &self,
        bytes: &[u8],
        output_name: &str,
        config: &ExportSaveConfig,
    ) -> Result<PathBuf, ExportError>;
}

/// Abstraction over telling the user how an export ended.
#[async_trait]
pub trait ExportNotifier: Send + Sync {
    async fn notify_success(&self, path: &Path, page_count: usize);
    async fn notify_failure(&self, message: &str);
}

/// Bundle of dependencies used by the export pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct ExportDependencies {
    pub rasterizer: Arc<dyn PageRasterizer>,
    pub backend: Arc<dyn DocumentBackend>,
    pub saver: Arc<dyn DocumentSaver>,
    pub notifier: Arc<dyn ExportNotifier>,
}

impl Default for ExportDependencies {
    fn default() -> Self {
        Self {
            rasterizer: Arc::new(CairoRasterizer),
            backend: Arc::new(PdfBackend),
            saver: Arc::new(DefaultDocumentSaver),
            notifier: Arc::new(DesktopNotifier::default()),
        }
    }
}

impl ExportDependencies {
    /// Default pipeline that reports outcomes to the log only.
    pub fn without_notifications() -> Self {
        Self {
            notifier: Arc::new(LogNotifier),
            ..Self::default()
        }
    }
}

/// Rasterizes pages with Cairo on the blocking thread pool.
pub struct CairoRasterizer;

#[async_trait]
impl PageRasterizer for CairoRasterizer {
    async fn rasterize(
        &self,
        index: usize,
        page: SharedPage,
        settings: RasterSettings,
    ) -> Result<PageImage, ExportError> {
        let label = page.label().to_string();
        task::spawn_blocking(move || raster::rasterize_page(index, page.as_ref(), &settings))
            .await
            .map_err(|e| ExportError::Rasterization {
                index,
                label,
                reason: format!("rasterization task failed: {}", e),
            })?
    }
}

struct DefaultDocumentSaver;

impl DocumentSaver for DefaultDocumentSaver {
    fn save(
        &self,
        bytes: &[u8],
        output_name: &str,
        config: &ExportSaveConfig,
    ) -> Result<PathBuf, ExportError> {
        file::save_document(bytes, output_name, config)
    }
}

/// Desktop notifications over D-Bus.
///
/// Delivery is bounded by `timeout`; a missing or slow notification daemon is logged and
/// otherwise ignored.
pub struct DesktopNotifier {
    pub timeout: Duration,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
        }
    }
}

impl DesktopNotifier {
    async fn send(&self, notification: Notification) {
        match tokio::time::timeout(self.timeout, notification.send()).await {
            Ok(Ok(id)) => log::debug!("Notification {} delivered", id),
            Ok(Err(e)) => log::warn!("{}", e),
            Err(_) => log::warn!("Notification daemon did not answer within {:?}", self.timeout),
        }
    }
}

#[async_trait]
impl ExportNotifier for DesktopNotifier {
    async fn notify_success(&self, path: &Path, page_count: usize) {
        let body = format!("{} page(s) saved to {}", page_count, path.display());
        self.send(Notification::new("Report exported", body).icon("document-save"))
            .await;
    }

    async fn notify_failure(&self, message: &str) {
        self.send(
            Notification::new("Report export failed", message)
                .icon("dialog-error")
                .urgency(Urgency::Critical),
        )
        .await;
    }
}

/// Reports export outcomes through the log only.
pub struct LogNotifier;

#[async_trait]
impl ExportNotifier for LogNotifier {
    async fn notify_success(&self, path: &Path, page_count: usize) {
        log::info!("Exported {} page(s) to {}", page_count, path.display());
    }

    async fn notify_failure(&self, message: &str) {
        log::error!("Export failed: {}", message);
    }
}
