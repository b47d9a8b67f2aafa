use std::{fmt, sync::Arc};

use tokio::{sync::Mutex, task};

use crate::export::{
    dependencies::{DocumentSaver, ExportDependencies},
    document::{self, DocumentBackend},
    file::{self, ExportSaveConfig},
    page::SharedPage,
    types::{ExportError, ExportResult, ExportSettings, ExportStatus, PageGeometry, PageImage},
};

#[derive(Clone)]
pub(crate) struct ExportRequest {
    pub(crate) pages: Vec<SharedPage>,
    pub(crate) output_name: String,
    pub(crate) settings: ExportSettings,
}

impl fmt::Debug for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportRequest")
            .field(
                "pages",
                &self.pages.iter().map(|p| p.label()).collect::<Vec<_>>(),
            )
            .field("output_name", &self.output_name)
            .field("output_directory", &self.settings.save.output_directory)
            .finish()
    }
}

/// Runs one export: rasterize every page in order, assemble, then deliver.
///
/// Nothing is written unless every page rasterized and the document assembled, so a
/// failure at any step leaves no file behind.
pub(crate) async fn perform_export(
    request: ExportRequest,
    dependencies: Arc<ExportDependencies>,
    status: Arc<Mutex<ExportStatus>>,
) -> Result<ExportResult, ExportError> {
    if request.pages.is_empty() {
        return Err(ExportError::NoPages);
    }
    // Reject unusable names before doing any expensive work.
    file::sanitize_output_name(&request.output_name)?;

    let total = request.pages.len();
    log::info!("Starting export of {} page(s): {:?}", total, request);

    // Step 1: Rasterize pages strictly one at a time
    let mut images = Vec::with_capacity(total);
    for (index, page) in request.pages.iter().enumerate() {
        *status.lock().await = ExportStatus::Rasterizing {
            page: index + 1,
            total,
        };
        log::debug!("Rasterizing page {}/{} ({})", index + 1, total, page.label());

        let image = dependencies
            .rasterizer
            .rasterize(index, Arc::clone(page), request.settings.raster)
            .await?;
        images.push(image);
    }

    // Step 2: Assemble the document in memory
    *status.lock().await = ExportStatus::Assembling;
    let document = assemble(
        Arc::clone(&dependencies.backend),
        images,
        request.settings.geometry,
    )
    .await?;
    let byte_size = document.len();

    // Step 3: Deliver
    *status.lock().await = ExportStatus::Saving;
    let saved_path = save_document(
        Arc::clone(&dependencies.saver),
        document,
        request.output_name,
        request.settings.save,
    )
    .await?;

    Ok(ExportResult {
        saved_path,
        page_count: total,
        byte_size,
    })
}

async fn assemble(
    backend: Arc<dyn DocumentBackend>,
    images: Vec<PageImage>,
    geometry: PageGeometry,
) -> Result<Vec<u8>, ExportError> {
    task::spawn_blocking(move || document::assemble_document(backend.as_ref(), &images, geometry))
        .await
        .map_err(|e| ExportError::Assembly(format!("Assembly task failed: {}", e)))?
}

async fn save_document(
    saver: Arc<dyn DocumentSaver>,
    document: Vec<u8>,
    output_name: String,
    config: ExportSaveConfig,
) -> Result<std::path::PathBuf, ExportError> {
    task::spawn_blocking(move || saver.save(&document, &output_name, &config))
        .await
        .map_err(|e| ExportError::Assembly(format!("Save task failed: {}", e)))?
}
