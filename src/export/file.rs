//! File delivery for exported documents.

use super::types::ExportError;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for document delivery.
#[derive(Debug, Clone)]
pub struct ExportSaveConfig {
    /// Directory finished documents are written to.
    pub output_directory: PathBuf,
    /// File extension appended to the output name.
    pub extension: String,
}

impl Default for ExportSaveConfig {
    fn default() -> Self {
        Self {
            output_directory: dirs::document_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Numeroscribe"),
            extension: "pdf".to_string(),
        }
    }
}

/// Turns a caller-supplied output name into a safe file stem.
///
/// Path separators and control characters become `_`, surrounding whitespace and a
/// trailing `.pdf` are dropped. Names that end up empty (or are `.`/`..`) are rejected.
pub fn sanitize_output_name(name: &str) -> Result<String, ExportError> {
    let trimmed = name.trim();
    let stem = match trimmed.len().checked_sub(4) {
        Some(split)
            if trimmed.is_char_boundary(split)
                && trimmed[split..].eq_ignore_ascii_case(".pdf") =>
        {
            &trimmed[..split]
        }
        _ => trimmed,
    };

    let sanitized: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let sanitized = sanitized.trim().to_string();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return Err(ExportError::InvalidOutputName(name.to_string()));
    }
    Ok(sanitized)
}

/// Ensure the output directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Writes a finished document as `<directory>/<output name>.<extension>`.
///
/// Bytes go to a hidden `.part` file first and are renamed into place, so the final path
/// either holds the complete document or nothing. An existing file with the same name is
/// replaced.
pub fn save_document(
    bytes: &[u8],
    output_name: &str,
    config: &ExportSaveConfig,
) -> Result<PathBuf, ExportError> {
    let stem = sanitize_output_name(output_name)?;
    let directory = ensure_directory_exists(&config.output_directory)?;

    let file_name = format!("{}.{}", stem, config.extension);
    let file_path = directory.join(&file_name);
    let part_path = directory.join(format!(".{}.part", file_name));

    log::info!(
        "Saving document to: {} ({} bytes)",
        file_path.display(),
        bytes.len()
    );

    if let Err(err) = write_part_file(&part_path, bytes) {
        let _ = fs::remove_file(&part_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&part_path, &file_path) {
        let _ = fs::remove_file(&part_path);
        return Err(err.into());
    }

    log::info!("Document saved successfully: {}", file_path.display());
    Ok(file_path)
}

fn write_part_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)?;

    // Set permissions to user read/write only
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o600))?;
    }

    let written = fs::metadata(path)?.len();
    log::debug!("Part file written: {} bytes", written);
    Ok(())
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
