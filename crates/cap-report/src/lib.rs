//! # cap-report
//!
//! Renders a city's stored inventory as a single-table A4 PDF.
//!
//! ## Modules
//!
//! - [`pdf`]: page drawing and document assembly over `lopdf`
//! - [`layout`]: the inventory report layout (title, metadata, emissions table)

pub mod layout;
pub mod pdf;

use chrono::{DateTime, Utc};

use cap_types::{CityRecord, EmissionResult, RequesterIdentity};

pub use layout::{build_report, REPORT_TITLE};

/// Error types for report rendering.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The standard PDF fonts have no glyph for `ch`.
    #[error("{field} contains '{ch}' (U+{code:04X}), which the report font cannot show", code = codepoint(.ch))]
    UnsupportedText { field: String, ch: char },

    /// Page geometry cannot hold even one table row.
    #[error("layout error: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

fn codepoint(ch: &char) -> u32 {
    u32::from(*ch)
}

/// Everything the report shows.
///
/// `generated_at` is embedded as the document creation date; freezing it
/// makes the output byte-identical across runs.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub city: &'a CityRecord,
    pub emissions: &'a EmissionResult,
    pub last_updated: DateTime<Utc>,
    pub requester: &'a RequesterIdentity,
    pub generated_at: DateTime<Utc>,
}

/// File name a report for `city_name` is delivered under.
pub fn report_filename(city_name: &str) -> String {
    let stem: String = city_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{stem}_GHG_Inventory_Report.pdf")
}

#[cfg(test)]
pub(crate) mod testutil {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object};

    fn latin1(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| char::from(b)).collect()
    }

    /// Content stream operations of every page, in page order.
    pub fn page_ops(pdf: &[u8]) -> Vec<Vec<Operation>> {
        let doc = Document::load_mem(pdf).expect("parse pdf");
        doc.get_pages()
            .values()
            .map(|&id| {
                let raw = doc.get_page_content(id).expect("page content");
                Content::decode(&raw).expect("decode content").operations
            })
            .collect()
    }

    /// Text shown by `Tj` on every page, in drawing order.
    pub fn text_runs(pdf: &[u8]) -> Vec<Vec<String>> {
        page_ops(pdf)
            .into_iter()
            .map(|ops| {
                ops.into_iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => Some(latin1(bytes)),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    /// A string entry of the Info dictionary.
    pub fn info_entry(pdf: &[u8], key: &str) -> Option<String> {
        let doc = Document::load_mem(pdf).expect("parse pdf");
        let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
        match doc.get_dictionary(info_id).ok()?.get(key.as_bytes()).ok()? {
            Object::String(bytes, _) => Some(latin1(bytes)),
            _ => None,
        }
    }

    /// Numeric operand as `f64`.
    pub fn number(obj: &Object) -> f64 {
        match obj {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => f64::from(*r),
            other => unreachable!("not a number: {other:?}"),
        }
    }
}
