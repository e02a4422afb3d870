//! Report exports for the complaint list.
//!
//! Signature strings pass through untouched: CSV and TXT leave them out and
//! the PDF only decodes them to embed the pictures.

pub mod csv;
pub mod pdf;
pub mod txt;

pub use self::csv::to_csv;
pub use self::pdf::to_pdf;
pub use self::txt::to_txt;

/// A downloadable report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Txt,
    Pdf,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "csv" => Some(ExportFormat::Csv),
            "txt" => Some(ExportFormat::Txt),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "complaints.csv",
            ExportFormat::Txt => "complaints.txt",
            ExportFormat::Pdf => "complaints-report.pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}
