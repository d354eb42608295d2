//! CSV export of a table's filtered and sorted rows.
//!
//! Header is the column labels; every row is rendered with [`Scalar::render`]
//! (full-precision numbers, ISO 8601 timestamps, empty string for missing).
//! Fields containing a comma, quote, or newline are quoted per RFC 4180;
//! everything else is written exactly as a plain comma join would.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schema::Record;

/// MIME type the export is labeled with.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize `records` (already filtered and sorted) with the given column order.
pub fn serialize<'a, R, I>(records: I, field_order: &[&str]) -> Result<String, ExportError>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let schema = R::schema();
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(field_order.iter().map(|k| schema.label(k)))?;
    for record in records {
        wtr.write_record(field_order.iter().map(|k| record.field(k).render()))?;
    }

    let data = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(data)?)
}

/// Save an export under `dir`, creating the directory if needed.
pub fn save(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
