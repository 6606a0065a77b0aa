//! Standalone SVG documents ready to be written to disk.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::svg::Element;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const PREAMBLE: &str = "<?xml version=\"1.0\" standalone=\"no\"?>\r\n";

/// Errors raised while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been rendered yet.
    #[error("Nothing to export: no map has been rendered yet")]
    NotRendered,

    /// The file could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named, serialized SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Artifact name without extension, e.g. `map-prof-lq2015`.
    pub name: String,
    /// Complete SVG document.
    pub svg: String,
}

impl Export {
    /// Serializes `root` as a namespace-qualified standalone document.
    #[must_use]
    pub fn new(name: impl Into<String>, root: &Element) -> Self {
        Self {
            name: name.into(),
            svg: serialize(root),
        }
    }

    /// File name on disk.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.name)
    }

    /// Writes the document into `dir`, creating it if needed, and returns
    /// the written path.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the directory or file cannot be
    /// written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.svg)?;
        log::info!("Exported {} ({} bytes)", path.display(), self.svg.len());
        Ok(path)
    }
}

/// Serializes `root` with the XML declaration and SVG namespaces.
#[must_use]
pub fn serialize(root: &Element) -> String {
    let root = root.clone().attr("xmlns", SVG_NS).attr("xmlns:xlink", XLINK_NS);
    let mut out = String::from(PREAMBLE);
    root.write_to(&mut out);
    out
}
