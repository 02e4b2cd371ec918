//! Batch serialization into downloadable files.
//!
//! Output is built in memory; delivering it is up to the transport.

use crate::card::Batch;
use crate::error::CardGenError;
use std::fmt;
use std::str::FromStr;

/// Header line of the delimited export.
pub const DELIMITED_HEADER: [&str; 4] = ["CC Number", "Expiry Month", "Expiry Year", "CVV"];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Canonical `NUMBER|MM|YYYY|CVV` lines
    Text,
    /// Comma separated with a header row
    Delimited,
}

impl ExportFormat {
    /// Every supported format, in display order.
    pub const ALL: [Self; 2] = [Self::Text, Self::Delimited];

    /// File name used for the attachment.
    #[must_use]
    pub const fn filename(self) -> &'static str {
        match self {
            Self::Text => "cards.txt",
            Self::Delimited => "cards.csv",
        }
    }

    /// Stable token for inline button callbacks.
    #[must_use]
    pub const fn callback_data(self) -> &'static str {
        match self {
            Self::Text => "export_txt",
            Self::Delimited => "export_csv",
        }
    }

    /// Resolves a callback token produced by [`ExportFormat::callback_data`].
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::UnsupportedFormat` for unknown tokens.
    pub fn from_callback_data(data: &str) -> Result<Self, CardGenError> {
        Self::ALL
            .into_iter()
            .find(|f| f.callback_data() == data)
            .ok_or_else(|| CardGenError::UnsupportedFormat(data.to_string()))
    }

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Delimited => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Delimited => f.write_str("delimited"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CardGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "delimited" | "csv" => Ok(Self::Delimited),
            other => Err(CardGenError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Serialized batch ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Attachment file name
    pub filename: &'static str,
    /// UTF-8 file content
    pub payload: Vec<u8>,
}

/// Serializes `batch` in `format`.
///
/// # Errors
///
/// Returns `CardGenError::NoData` when the batch is absent or empty; an empty
/// file is never produced.
///
/// # Examples
///
/// ```
/// use cardgen_core::card::{Batch, CardRecord};
/// use cardgen_core::export::{export, ExportFormat};
///
/// let record = CardRecord::parse_canonical("4000000000000002|01|2026|123").unwrap();
/// let batch = Batch::new(vec![record]);
/// let file = export(Some(&batch), ExportFormat::Delimited).unwrap();
/// assert_eq!(
///     String::from_utf8(file.payload).unwrap(),
///     "CC Number,Expiry Month,Expiry Year,CVV\n4000000000000002,01,2026,123"
/// );
/// ```
pub fn export(batch: Option<&Batch>, format: ExportFormat) -> Result<ExportFile, CardGenError> {
    let batch = batch.filter(|b| !b.is_empty()).ok_or(CardGenError::NoData)?;
    let payload = match format {
        ExportFormat::Text => to_text(batch),
        ExportFormat::Delimited => to_delimited(batch)?,
    };
    Ok(ExportFile {
        filename: format.filename(),
        payload,
    })
}

fn to_text(batch: &Batch) -> Vec<u8> {
    batch.canonical_lines().collect::<Vec<_>>().join("\n").into_bytes()
}

fn to_delimited(batch: &Batch) -> Result<Vec<u8>, CardGenError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(DELIMITED_HEADER).map_err(csv_error)?;
    for line in batch.canonical_lines() {
        writer.write_record(line.split('|')).map_err(csv_error)?;
    }

    let mut payload = writer
        .into_inner()
        .map_err(|e| CardGenError::invalid(e.to_string()))?;
    // Lines are separated, not terminated
    if payload.last() == Some(&b'\n') {
        payload.pop();
    }
    Ok(payload)
}

fn csv_error(e: csv::Error) -> CardGenError {
    CardGenError::invalid(format!("delimited export failed: {e}"))
}
