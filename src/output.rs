//! Output writers: render a document as KML or JSON into a temp file, then promote it.

use crate::document::Document;
use crate::kml::write_kml;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output encoding for an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Kml,
    Json,
}

impl ExportFormat {
    /// `.json` selects JSON; anything else is KML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Kml,
        }
    }
}

pub fn write_document<W: Write>(doc: &Document, format: ExportFormat, w: &mut W) -> Result<()> {
    match format {
        ExportFormat::Kml => write_kml(doc, w)?,
        ExportFormat::Json => serde_json::to_writer_pretty(&mut *w, doc)?,
    }
    Ok(())
}

/// Write `doc` to `out_path` via a sibling `.inprogress` file, so a failed write never
/// leaves a truncated export behind.
pub fn write_document_file(doc: &Document, format: ExportFormat, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut tmp_name = out_path.as_os_str().to_owned();
    tmp_name.push(".inprogress");
    let tmp = Path::new(&tmp_name);

    let f = File::create(tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = BufWriter::with_capacity(256 * 1024, f);
    write_document(doc, format, &mut w).with_context(|| format!("write {}", tmp.display()))?;
    w.flush().with_context(|| format!("flush {}", tmp.display()))?;
    drop(w);

    fs::rename(tmp, out_path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), out_path.display()))?;
    Ok(())
}
