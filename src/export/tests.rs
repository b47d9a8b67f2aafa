use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;
use tokio::time::{Duration, sleep};

use super::{
    dependencies::{DocumentSaver, ExportDependencies, ExportNotifier, PageRasterizer},
    document::{DocumentBackend, DocumentSink, PdfBackend},
    file::ExportSaveConfig,
    manager::ExportManager,
    page::{ExportPage, SharedPage},
    pipeline::{ExportRequest, perform_export},
    types::{
        ExportError, ExportOutcome, ExportSettings, ExportStatus, PageGeometry, PageImage,
        Placement, RasterSettings,
    },
};
use crate::draw::Color;

struct LabeledPage {
    label: String,
    shade: f64,
}

impl ExportPage for LabeledPage {
    fn label(&self) -> &str {
        &self.label
    }

    fn paint(&self, ctx: &cairo::Context, width: f64, height: f64) -> Result<(), cairo::Error> {
        Color::new(self.shade, self.shade, self.shade, 1.0).apply(ctx);
        ctx.rectangle(width * 0.1, height * 0.1, width * 0.8, height * 0.8);
        ctx.fill()
    }
}

fn pages(labels: &[&str]) -> Vec<SharedPage> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            Arc::new(LabeledPage {
                label: label.to_string(),
                shade: 0.2 * i as f64,
            }) as SharedPage
        })
        .collect()
}

#[derive(Clone, Default)]
struct MockRasterizer {
    fail_at: Option<usize>,
    calls: Arc<Mutex<Vec<String>>>,
    /// When set, the first call waits here until notified.
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl PageRasterizer for MockRasterizer {
    async fn rasterize(
        &self,
        index: usize,
        page: SharedPage,
        _settings: RasterSettings,
    ) -> Result<PageImage, ExportError> {
        let first = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(page.label().to_string());
            calls.len() == 1
        };
        if first && let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_at == Some(index) {
            return Err(ExportError::Rasterization {
                index,
                label: page.label().to_string(),
                reason: "unsupported content".to_string(),
            });
        }
        Ok(PageImage {
            index,
            label: page.label().to_string(),
            width: 10,
            height: 14,
            jpeg: page.label().as_bytes().to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DocOp {
    Open(PageGeometry),
    AddPage,
    Place(String, Placement),
    Finish,
}

#[derive(Clone, Default)]
struct RecordingBackend {
    ops: Arc<Mutex<Vec<DocOp>>>,
}

struct RecordingSink {
    ops: Arc<Mutex<Vec<DocOp>>>,
    placed: Vec<u8>,
}

impl DocumentBackend for RecordingBackend {
    fn open(&self, geometry: PageGeometry) -> Result<Box<dyn DocumentSink>, ExportError> {
        self.ops.lock().unwrap().push(DocOp::Open(geometry));
        Ok(Box::new(RecordingSink {
            ops: Arc::clone(&self.ops),
            placed: Vec::new(),
        }))
    }
}

impl DocumentSink for RecordingSink {
    fn add_page(&mut self) -> Result<(), ExportError> {
        self.ops.lock().unwrap().push(DocOp::AddPage);
        Ok(())
    }

    fn place_image(&mut self, image: &PageImage, placement: Placement) -> Result<(), ExportError> {
        self.ops
            .lock()
            .unwrap()
            .push(DocOp::Place(image.label.clone(), placement));
        self.placed.extend_from_slice(&image.jpeg);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError> {
        self.ops.lock().unwrap().push(DocOp::Finish);
        Ok(self.placed)
    }
}

#[derive(Clone, Default)]
struct MockSaver {
    should_fail: bool,
    calls: Arc<Mutex<Vec<(Vec<u8>, String)>>>,
}

impl DocumentSaver for MockSaver {
    fn save(
        &self,
        bytes: &[u8],
        output_name: &str,
        config: &ExportSaveConfig,
    ) -> Result<PathBuf, ExportError> {
        self.calls
            .lock()
            .unwrap()
            .push((bytes.to_vec(), output_name.to_string()));
        if self.should_fail {
            Err(ExportError::Save(std::io::Error::other("disk full")))
        } else {
            Ok(config
                .output_directory
                .join(format!("{}.{}", output_name, config.extension)))
        }
    }
}

#[derive(Clone, Default)]
struct MockNotifier {
    successes: Arc<Mutex<Vec<(PathBuf, usize)>>>,
    failures: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ExportNotifier for MockNotifier {
    async fn notify_success(&self, path: &Path, page_count: usize) {
        self.successes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), page_count));
    }

    async fn notify_failure(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    rasterizer: MockRasterizer,
    backend: RecordingBackend,
    saver: MockSaver,
    notifier: MockNotifier,
}

impl Harness {
    fn new() -> Self {
        Self {
            rasterizer: MockRasterizer::default(),
            backend: RecordingBackend::default(),
            saver: MockSaver::default(),
            notifier: MockNotifier::default(),
        }
    }

    fn dependencies(&self) -> ExportDependencies {
        ExportDependencies {
            rasterizer: Arc::new(self.rasterizer.clone()),
            backend: Arc::new(self.backend.clone()),
            saver: Arc::new(self.saver.clone()),
            notifier: Arc::new(self.notifier.clone()),
        }
    }

    fn manager(&self) -> ExportManager {
        ExportManager::with_dependencies(
            &tokio::runtime::Handle::current(),
            test_settings(),
            self.dependencies(),
        )
    }

    fn ops(&self) -> Vec<DocOp> {
        self.backend.ops.lock().unwrap().clone()
    }
}

fn test_settings() -> ExportSettings {
    ExportSettings {
        save: ExportSaveConfig {
            output_directory: PathBuf::from("/exports"),
            ..ExportSaveConfig::default()
        },
        notify_success: true,
        ..ExportSettings::default()
    }
}

#[tokio::test]
async fn test_three_pages_assembled_in_order_with_full_page_placement() {
    let harness = Harness::new();
    let manager = harness.manager();

    let result = manager
        .export_document(pages(&["P1", "P2", "P3"]), "numerology_7_3")
        .await
        .expect("export succeeds");

    assert_eq!(result.page_count, 3);
    assert_eq!(result.saved_path, PathBuf::from("/exports/numerology_7_3.pdf"));
    assert_eq!(result.byte_size, b"P1P2P3".len());

    let a4 = Placement::full_page(&PageGeometry::A4);
    assert_eq!(
        (a4.x_mm, a4.y_mm, a4.width_mm, a4.height_mm),
        (0.0, 0.0, 210.0, 297.0)
    );
    assert_eq!(
        harness.ops(),
        vec![
            DocOp::Open(PageGeometry::A4),
            DocOp::Place("P1".into(), a4),
            DocOp::AddPage,
            DocOp::Place("P2".into(), a4),
            DocOp::AddPage,
            DocOp::Place("P3".into(), a4),
            DocOp::Finish,
        ]
    );
    assert_eq!(
        *harness.rasterizer.calls.lock().unwrap(),
        vec!["P1", "P2", "P3"]
    );

    let saves = harness.saver.calls.lock().unwrap();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].0, b"P1P2P3");
    assert_eq!(manager.get_status().await, ExportStatus::Success);
    assert_eq!(harness.notifier.successes.lock().unwrap().len(), 1);
    assert!(harness.notifier.failures.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_page_failure_delivers_nothing() {
    let mut harness = Harness::new();
    harness.rasterizer.fail_at = Some(1);
    let manager = harness.manager();

    let err = manager
        .export_document(pages(&["P1", "P2", "P3"]), "report")
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Rasterization { index: 1, .. }));
    // The third page is never attempted and nothing reaches assembly or delivery
    assert_eq!(*harness.rasterizer.calls.lock().unwrap(), vec!["P1", "P2"]);
    assert!(harness.ops().is_empty());
    assert!(harness.saver.calls.lock().unwrap().is_empty());

    let failures = harness.notifier.failures.lock().unwrap().clone();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("page 2 (P2)"));
    assert!(matches!(manager.get_status().await, ExportStatus::Failed(_)));
    assert!(!manager.is_exporting());
}

#[tokio::test]
async fn test_zero_pages_is_rejected_before_any_work() {
    let harness = Harness::new();
    let manager = harness.manager();

    let err = manager.export_document(Vec::new(), "empty").await.unwrap_err();

    assert!(matches!(err, ExportError::NoPages));
    assert!(harness.rasterizer.calls.lock().unwrap().is_empty());
    assert!(harness.ops().is_empty());
    assert!(harness.saver.calls.lock().unwrap().is_empty());
    assert_eq!(harness.notifier.failures.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_output_name_is_rejected_before_rasterizing() {
    let harness = Harness::new();
    let manager = harness.manager();

    let err = manager
        .export_document(pages(&["P1"]), "  /  ")
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::InvalidOutputName(_)));
    assert!(harness.rasterizer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_save_failure_is_reported_once() {
    let mut harness = Harness::new();
    harness.saver.should_fail = true;
    let manager = harness.manager();

    let err = manager
        .export_document(pages(&["P1", "P2"]), "report")
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Save(_)));
    assert_eq!(harness.notifier.failures.lock().unwrap().len(), 1);
    assert!(harness.notifier.successes.lock().unwrap().is_empty());
    assert!(matches!(
        manager.take_result().await,
        Some(ExportOutcome::Failed(_))
    ));
}

#[tokio::test]
async fn test_concurrent_export_is_rejected_while_in_flight() {
    let mut harness = Harness::new();
    let gate = Arc::new(Notify::new());
    harness.rasterizer.gate = Some(Arc::clone(&gate));
    let manager = harness.manager();

    let first = {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager
                .export_document(pages(&["P1", "P2"]), "first")
                .await
        })
    };

    while !manager.is_exporting() {
        tokio::task::yield_now().await;
    }

    let second = manager.export_document(pages(&["Q1"]), "second").await;
    assert!(matches!(second, Err(ExportError::AlreadyInProgress)));
    assert!(matches!(
        manager.request_export(pages(&["Q1"]), "second"),
        Err(ExportError::AlreadyInProgress)
    ));
    // The rejected calls never reach the pipeline or disturb the running export
    assert!(harness.notifier.failures.lock().unwrap().is_empty());
    assert!(manager.get_status().await.is_active());

    gate.notify_one();
    let first = first.await.unwrap().expect("first export succeeds");
    assert_eq!(first.page_count, 2);
    assert!(!manager.is_exporting());

    let third = manager.export_document(pages(&["R1"]), "third").await;
    assert!(third.is_ok());
    assert_eq!(harness.saver.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_guard_released_after_failure() {
    let mut harness = Harness::new();
    harness.rasterizer.fail_at = Some(0);
    let manager = harness.manager();

    assert!(manager.export_document(pages(&["P1"]), "a").await.is_err());
    assert!(!manager.is_exporting());

    // Same manager, retried by the user: the failure did not leave the slot taken
    let err = manager.export_document(pages(&["P1"]), "a").await.unwrap_err();
    assert!(matches!(err, ExportError::Rasterization { .. }));
    assert_eq!(harness.notifier.failures.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_request_export_runs_in_background() {
    let harness = Harness::new();
    let manager = harness.manager();

    manager
        .request_export(pages(&["P1", "P2"]), "background")
        .expect("request accepted");

    let mut outcome = None;
    for _ in 0..100 {
        if let Some(result) = manager.take_result().await {
            outcome = Some(result);
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    match outcome {
        Some(ExportOutcome::Success(result)) => {
            assert_eq!(result.page_count, 2);
            assert_eq!(result.saved_path, PathBuf::from("/exports/background.pdf"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(manager.get_status().await, ExportStatus::Success);
    assert!(!manager.is_exporting());

    manager.reset().await;
    assert_eq!(manager.get_status().await, ExportStatus::Idle);
    assert!(manager.try_take_result().is_none());
}

#[tokio::test]
async fn test_request_export_with_closed_channel() {
    let harness = Harness::new();
    let manager = ExportManager::with_closed_channel_for_test(harness.dependencies());

    let err = manager
        .request_export(pages(&["P1"]), "report")
        .unwrap_err();
    assert!(matches!(err, ExportError::ManagerUnavailable));
    assert!(!manager.is_exporting());
}

#[tokio::test]
async fn test_success_notification_can_be_disabled() {
    let harness = Harness::new();
    let mut settings = test_settings();
    settings.notify_success = false;
    let manager = ExportManager::with_dependencies(
        &tokio::runtime::Handle::current(),
        settings,
        harness.dependencies(),
    );

    manager
        .export_document(pages(&["P1"]), "quiet")
        .await
        .unwrap();
    assert!(harness.notifier.successes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_perform_export_with_cairo_and_pdf_writes_document() {
    let temp = TempDir::new().unwrap();
    let notifier = MockNotifier::default();
    let dependencies = ExportDependencies {
        notifier: Arc::new(notifier),
        ..ExportDependencies::default()
    };

    let request = ExportRequest {
        pages: pages(&["P1", "P2", "P3"]),
        output_name: "numerology_1_2".to_string(),
        settings: ExportSettings {
            raster: RasterSettings {
                page_width_px: 100,
                page_height_px: 141,
                scale: 1.0,
                ..RasterSettings::default()
            },
            save: ExportSaveConfig {
                output_directory: temp.path().to_path_buf(),
                ..ExportSaveConfig::default()
            },
            ..ExportSettings::default()
        },
    };

    let status = Arc::new(tokio::sync::Mutex::new(ExportStatus::Idle));
    let result = perform_export(request, Arc::new(dependencies), Arc::clone(&status))
        .await
        .unwrap();

    let bytes = std::fs::read(&result.saved_path).unwrap();
    assert_eq!(bytes.len(), result.byte_size);
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 3);
    assert_eq!(*status.lock().await, ExportStatus::Saving);
}

#[tokio::test]
async fn test_failed_cairo_export_leaves_directory_empty() {
    struct BrokenPage;

    impl ExportPage for BrokenPage {
        fn label(&self) -> &str {
            "broken"
        }

        fn paint(&self, _ctx: &cairo::Context, _w: f64, _h: f64) -> Result<(), cairo::Error> {
            Err(cairo::Error::InvalidStatus)
        }
    }

    let temp = TempDir::new().unwrap();
    let output_directory = temp.path().join("out");
    let mut page_list = pages(&["P1"]);
    page_list.push(Arc::new(BrokenPage));
    page_list.extend(pages(&["P3"]));

    let manager = ExportManager::with_dependencies(
        &tokio::runtime::Handle::current(),
        ExportSettings {
            raster: RasterSettings {
                page_width_px: 80,
                page_height_px: 113,
                scale: 1.0,
                ..RasterSettings::default()
            },
            save: ExportSaveConfig {
                output_directory: output_directory.clone(),
                ..ExportSaveConfig::default()
            },
            ..ExportSettings::default()
        },
        ExportDependencies {
            notifier: Arc::new(MockNotifier::default()),
            ..ExportDependencies::default()
        },
    );

    let err = manager
        .export_document(page_list, "partial")
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Rasterization { index: 1, .. }));
    assert!(!output_directory.exists());
}
