//! IPC-2581 exporter
//!
//! Turns a [`Layout`] into a single IPC-2581 XML document. Assembly runs in
//! fixed stages (see [`builder::Stage`]); items that cannot be expressed are
//! skipped and reported as [`Diagnostic`]s instead of failing the export.

pub mod builder;
mod checksum;
pub mod diagnostics;
pub mod geometry;
pub mod intern;
pub mod layout;
pub mod options;
pub mod types;
pub mod units;
pub mod write;

pub use builder::{DocumentBuilder, Stage, assemble};
pub use checksum::{append_checksum, document_checksum};
pub use diagnostics::{Diagnostic, SkipReason};
pub use layout::Layout;
pub use options::ExportOptions;
pub use types::Ipc2581;
pub use units::Units;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid export options: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid layout: {0}")]
    Layout(#[from] serde_json::Error),

    #[error("Stage {requested} requested after stage {current}")]
    StageOrder { current: Stage, requested: Stage },

    #[error("Stage {0} has already run")]
    StageRepeated(Stage),

    #[error("Layout has no conductor layers")]
    NoConductorLayers,

    #[error("Missing {0} in generated document")]
    MissingTag(&'static str),

    #[error("Output file {0} does not exist after writing")]
    OutputMissing(PathBuf),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Outcome of an export: the XML plus everything that was skipped
#[derive(Debug)]
pub struct Export {
    pub xml: String,
    pub document: Ipc2581,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of writing an export to disk
#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExportReport {
    /// The export succeeded when the output file exists
    pub fn is_success(&self) -> bool {
        self.path.exists()
    }
}

/// Assemble `layout` and render it as XML
pub fn export_to_string(layout: &Layout, options: &ExportOptions) -> Result<Export> {
    let (document, diagnostics) = assemble(layout, options)?;
    let mut xml = write::to_xml_string(&document)?;
    if options.checksum {
        append_checksum(&mut xml)?;
    }
    debug!("Rendered {} bytes of XML", xml.len());
    Ok(Export {
        xml,
        document,
        diagnostics,
    })
}

/// Assemble `layout` and atomically write the document to `path`
///
/// A failed export never leaves a partial file behind.
pub fn export_to_file(layout: &Layout, options: &ExportOptions, path: &Path) -> Result<ExportReport> {
    let export = export_to_string(layout, options)?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(export.xml.as_bytes())?;
            f.flush()
        })
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => ExportError::Io(e),
        })?;

    let report = ExportReport {
        path: path.to_path_buf(),
        diagnostics: export.diagnostics,
    };
    if !report.is_success() {
        return Err(ExportError::OutputMissing(report.path));
    }
    info!(
        "Wrote {} ({} diagnostics)",
        path.display(),
        report.diagnostics.len()
    );
    Ok(report)
}
