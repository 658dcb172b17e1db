//! Binding to the pdfium shared library.
//!
//! pdfium is loaded dynamically. Lookup order:
//!
//! 1. `PDFIUM_LIB_PATH`: either the library file itself or the directory
//!    holding it.
//! 2. The current working directory.
//! 3. The system library search path.

use crate::error::SummarizeError;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// Bind to pdfium, or explain where we looked.
pub fn bind_pdfium() -> Result<Pdfium, SummarizeError> {
    if let Ok(configured) = std::env::var("PDFIUM_LIB_PATH") {
        if !configured.trim().is_empty() {
            let path = PathBuf::from(configured.trim());
            let library = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from PDFIUM_LIB_PATH: {}", library.display());
            let bindings = Pdfium::bind_to_library(&library).map_err(|e| {
                SummarizeError::PdfiumBindingFailed(format!("{}: {:?}", library.display(), e))
            })?;
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| SummarizeError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// `true` when pdfium can be bound in this environment.
///
/// Used by tests and the CLI to decide whether PDF work is possible at all.
pub fn pdfium_available() -> bool {
    bind_pdfium().is_ok()
}
