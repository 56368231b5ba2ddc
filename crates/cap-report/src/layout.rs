//! Inventory report layout.
//!
//! Top to bottom on A4 portrait: title, a six-line metadata block, then a
//! two-column `Sector` / `Emissions (tCO2e)` table with one row per sector
//! and a closing `Total Emissions` row. When the table would cross the
//! bottom margin it continues on a new page under a repeated header row.

use std::ops::Range;

use cap_types::Sector;

use crate::pdf::{self, DocInfo, Font, Page, Rgb, A4_HEIGHT, A4_WIDTH, BLACK, WHITE};
use crate::{ReportError, ReportInput, Result};

pub const REPORT_TITLE: &str = "City GHG Inventory Report";
pub const TOTAL_ROW_LABEL: &str = "Total Emissions";

const PRODUCER: &str = "cap-tracker";

const MARGIN: f32 = 72.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 14.0;
const TITLE_GAP: f32 = 24.0;
const TABLE_GAP: f32 = 18.0;

const SECTOR_COL_WIDTH: f32 = 250.0;
const VALUE_COL_WIDTH: f32 = 150.0;
const ROW_HEIGHT: f32 = 18.0;
const CELL_PAD: f32 = 6.0;
const GRID_WIDTH: f32 = 0.5;

const HEADER_FILL: Rgb = Rgb(0.0, 0.39, 0.0);
const BODY_FILL: Rgb = Rgb(0.66, 0.66, 0.66);

/// Vertical extent available to table rows on one page.
#[derive(Clone, Copy, Debug)]
struct Geometry {
    /// Top edge of the table on the first page (below the metadata block).
    first_top: f32,
    /// Top edge of the table on continuation pages.
    next_top: f32,
    /// Lowest y a row may reach.
    bottom: f32,
    row_height: f32,
}

impl Geometry {
    fn a4() -> Self {
        let metadata_lines = 6.0;
        let first_top = A4_HEIGHT - MARGIN - TITLE_SIZE - TITLE_GAP - metadata_lines * LEADING - TABLE_GAP;
        Self {
            first_top,
            next_top: A4_HEIGHT - MARGIN,
            bottom: MARGIN,
            row_height: ROW_HEIGHT,
        }
    }

    /// Body rows per page after the header row, first page then the rest.
    fn capacity(&self) -> Result<(usize, usize)> {
        let rows = |top: f32| ((top - self.bottom) / self.row_height).floor() as i64 - 1;
        let (first, next) = (rows(self.first_top), rows(self.next_top));
        if next < 1 {
            return Err(ReportError::Layout(format!(
                "row height {} leaves no room for table rows",
                self.row_height
            )));
        }
        Ok((first.max(0) as usize, next as usize))
    }

    /// Split `rows` body rows into per-page ranges.
    fn paginate(&self, rows: usize) -> Result<Vec<Range<usize>>> {
        let (first, next) = self.capacity()?;
        let mut pages = vec![0..first.min(rows)];
        let mut start = pages[0].end;
        while start < rows {
            let end = (start + next).min(rows);
            pages.push(start..end);
            start = end;
        }
        Ok(pages)
    }
}

/// Render the inventory report for `input`.
///
/// Output depends only on `input`, so a frozen `generated_at` gives
/// byte-identical documents.
pub fn build_report(input: &ReportInput<'_>) -> Result<Vec<u8>> {
    build_with(input, Geometry::a4())
}

fn build_with(input: &ReportInput<'_>, geometry: Geometry) -> Result<Vec<u8>> {
    let heading = heading_lines(input);
    for (label, value) in &heading {
        pdf::encode_text(value).map_err(|ch| ReportError::UnsupportedText {
            field: (*label).to_string(),
            ch,
        })?;
    }
    let rows = table_rows(input);
    let ranges = geometry.paginate(rows.len())?;

    let mut pages = Vec::with_capacity(ranges.len());
    for (i, range) in ranges.into_iter().enumerate() {
        let mut page = Page::new();
        let top = if i == 0 {
            draw_heading(&mut page, &heading)?;
            geometry.first_top
        } else {
            geometry.next_top
        };
        draw_table(&mut page, top, geometry.row_height, &rows[range])?;
        pages.push(page);
    }

    let info = DocInfo {
        title: format!("{REPORT_TITLE} - {}", input.city.city_name),
        producer: PRODUCER.to_string(),
        creation_date: Some(input.generated_at.format("D:%Y%m%d%H%M%SZ").to_string()),
    };
    let page_count = pages.len();
    let bytes = pdf::render(pages, &info)?;
    tracing::debug!(
        city = %input.city.city_name,
        pages = page_count,
        bytes = bytes.len(),
        "report rendered"
    );
    Ok(bytes)
}

/// Body rows: each sector in fixed order, then the total.
fn table_rows(input: &ReportInput<'_>) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = Sector::ALL
        .into_iter()
        .map(|s| (s.label().to_string(), format!("{:.2}", input.emissions.get(s))))
        .collect();
    rows.push((
        TOTAL_ROW_LABEL.to_string(),
        format!("{:.2}", input.emissions.total_tco2e),
    ));
    rows
}

/// Metadata block lines, label then value.
fn heading_lines(input: &ReportInput<'_>) -> [(&'static str, String); 6] {
    [
        ("City", input.city.city_name.clone()),
        ("District", input.city.district.clone()),
        ("Generated for", input.requester.name.clone()),
        ("Email", input.requester.email.clone()),
        ("Contact", input.requester.contact.clone()),
        ("Last Updated", input.last_updated.format("%B %Y").to_string()),
    ]
}

fn draw_heading(page: &mut Page, lines: &[(&'static str, String)]) -> Result<()> {
    let mut y = A4_HEIGHT - MARGIN - TITLE_SIZE;
    page.text(MARGIN, y, Font::HelveticaBold, TITLE_SIZE, BLACK, REPORT_TITLE)?;
    y -= TITLE_GAP;

    for (label, value) in lines {
        page.text(MARGIN, y, Font::Helvetica, BODY_SIZE, BLACK, &format!("{label}: {value}"))?;
        y -= LEADING;
    }
    Ok(())
}

fn draw_table(page: &mut Page, top: f32, row_height: f32, rows: &[(String, String)]) -> Result<()> {
    let width = SECTOR_COL_WIDTH + VALUE_COL_WIDTH;
    let left = (A4_WIDTH - width) / 2.0;
    let right = left + width;
    let split = left + SECTOR_COL_WIDTH;
    let text_drop = (row_height + BODY_SIZE) / 2.0 - 2.0;

    let header = std::iter::once(("Sector", "Emissions (tCO2e)", true));
    let body = rows.iter().map(|(s, v)| (s.as_str(), v.as_str(), false));

    let mut y = top;
    for (sector, value, is_header) in header.chain(body) {
        let (fill, font, color) = if is_header {
            (HEADER_FILL, Font::HelveticaBold, WHITE)
        } else {
            (BODY_FILL, Font::Helvetica, BLACK)
        };
        page.fill_rect(left, y - row_height, width, row_height, fill);
        let baseline = y - text_drop;
        page.text(left + CELL_PAD, baseline, font, BODY_SIZE, color, sector)?;
        page.text(split + CELL_PAD, baseline, font, BODY_SIZE, color, value)?;
        y -= row_height;
    }

    let row_count = rows.len() + 1;
    for i in 0..=row_count {
        let gy = top - i as f32 * row_height;
        page.line((left, gy), (right, gy), GRID_WIDTH, BLACK);
    }
    for x in [left, split, right] {
        page.line((x, top), (x, y), GRID_WIDTH, BLACK);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{info_entry, number, page_ops, text_runs};
    use cap_types::{CityRecord, EmissionResult, RequesterIdentity, UlbCategory};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    struct Fixture {
        city: CityRecord,
        emissions: EmissionResult,
        requester: RequesterIdentity,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                city: CityRecord::new("Pune", "Pune", UlbCategory::MunicipalCorporation),
                emissions: EmissionResult::from_sectors(|s| match s {
                    Sector::Energy => 820.0,
                    Sector::Transport => 38.35,
                    Sector::Waste => 600.0,
                    _ => 0.0,
                }),
                requester: RequesterIdentity {
                    name: "A. Patil".into(),
                    email: "a.patil@example.org".into(),
                    contact: "9800000000".into(),
                },
            }
        }

        fn input(&self) -> ReportInput<'_> {
            ReportInput {
                city: &self.city,
                emissions: &self.emissions,
                last_updated: at(2024, 3, 15),
                requester: &self.requester,
                generated_at: at(2024, 4, 1),
            }
        }
    }

    fn geometry_two_pages() -> Geometry {
        Geometry {
            first_top: 100.0,
            next_top: 136.0,
            bottom: 0.0,
            row_height: 18.0,
        }
    }

    #[test]
    fn test_report_is_deterministic() {
        let f = Fixture::new();
        let a = build_report(&f.input()).expect("first");
        let b = build_report(&f.input()).expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_time_only_changes_creation_date() {
        let f = Fixture::new();
        let a = build_report(&f.input()).expect("first");
        let later = ReportInput {
            generated_at: at(2025, 1, 1),
            ..f.input()
        };
        let b = build_report(&later).expect("second");
        assert_ne!(a, b);
        assert_eq!(info_entry(&a, "CreationDate").as_deref(), Some("D:20240401100000Z"));
        assert_eq!(info_entry(&b, "CreationDate").as_deref(), Some("D:20250101100000Z"));
        assert_eq!(text_runs(&a), text_runs(&b));
        assert_eq!(
            info_entry(&a, "Title").as_deref(),
            Some("City GHG Inventory Report - Pune")
        );
    }

    #[test]
    fn test_heading_and_metadata() {
        let f = Fixture::new();
        let pdf = build_report(&f.input()).expect("build");
        let runs = text_runs(&pdf);
        assert_eq!(
            runs[0][..7],
            [
                "City GHG Inventory Report",
                "City: Pune",
                "District: Pune",
                "Generated for: A. Patil",
                "Email: a.patil@example.org",
                "Contact: 9800000000",
                "Last Updated: March 2024",
            ]
        );
    }

    #[test]
    fn test_table_rows_in_sector_order() {
        let f = Fixture::new();
        let pdf = build_report(&f.input()).expect("build");
        let runs = text_runs(&pdf);
        let table = &runs[0][7..];
        assert_eq!(table[..2], ["Sector", "Emissions (tCO2e)"]);

        let labels: Vec<&str> = table[2..].iter().step_by(2).map(String::as_str).collect();
        let expected: Vec<&str> = Sector::ALL
            .iter()
            .map(|s| s.label())
            .chain([TOTAL_ROW_LABEL])
            .collect();
        assert_eq!(labels, expected);

        let values: Vec<&str> = table[3..].iter().step_by(2).map(String::as_str).collect();
        assert_eq!(values[0], "820.00");
        assert_eq!(values[1], "38.35");
        assert_eq!(values[2], "0.00");
        assert_eq!(values.last().copied(), Some("1458.35"));
    }

    #[test]
    fn test_header_colours_and_grid() {
        let f = Fixture::new();
        let pdf = build_report(&f.input()).expect("build");
        let ops = &page_ops(&pdf)[0];

        let fills: Vec<Vec<f64>> = ops
            .iter()
            .filter(|op| op.operator == "rg")
            .map(|op| op.operands.iter().map(number).collect())
            .collect();
        let near = |a: &[f64], b: [f64; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4);
        assert!(fills.iter().any(|c| near(c, [0.0, 0.39, 0.0])));
        assert!(fills.iter().any(|c| near(c, [0.66, 0.66, 0.66])));

        assert!(ops.iter().any(|op| op.operator == "Tf"
            && matches!(op.operands.first(), Some(lopdf::Object::Name(n)) if n == b"F2")
            && number(&op.operands[1]) == 10.0));
        let widths: Vec<f64> = ops
            .iter()
            .filter(|op| op.operator == "w")
            .map(|op| number(&op.operands[0]))
            .collect();
        assert!(!widths.is_empty());
        assert!(widths.iter().all(|w| *w == 0.5));
    }

    #[test]
    fn test_a4_report_fits_one_page() {
        let f = Fixture::new();
        let pdf = build_report(&f.input()).expect("build");
        let doc = lopdf::Document::load_mem(&pdf).expect("parse");
        assert_eq!(doc.get_pages().len(), 1);

        let pages_dict = doc
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .find(|d| matches!(d.get(b"Type"), Ok(lopdf::Object::Name(n)) if n == b"Pages"))
            .expect("pages dictionary");
        let media_box: Vec<f64> = pages_dict
            .get(b"MediaBox")
            .and_then(|o| o.as_array())
            .expect("media box")
            .iter()
            .map(number)
            .collect();
        assert_eq!(media_box.len(), 4);
        assert!((media_box[2] - 595.28).abs() < 1e-3);
        assert!((media_box[3] - 841.89).abs() < 1e-3);
    }

    #[test]
    fn test_paginate_splits_rows() {
        let geometry = geometry_two_pages();
        // first page: 5 slots minus header = 4; later pages: 7 slots minus header = 6
        assert_eq!(geometry.paginate(9).expect("paginate"), vec![0..4, 4..9]);
        assert_eq!(geometry.paginate(3).expect("paginate"), vec![0..3]);
        assert_eq!(
            geometry.paginate(17).expect("paginate"),
            vec![0..4, 4..10, 10..16, 16..17]
        );
    }

    #[test]
    fn test_continuation_pages_repeat_header() {
        let f = Fixture::new();
        let pdf = build_with(&f.input(), geometry_two_pages()).expect("build");
        let runs = text_runs(&pdf);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1][..2], ["Sector", "Emissions (tCO2e)"]);

        let all: Vec<&String> = runs.iter().flatten().collect();
        let count = |text: &str| all.iter().filter(|r| r.as_str() == text).count();
        assert_eq!(count("Sector"), 2);
        assert_eq!(count(REPORT_TITLE), 1);
        assert_eq!(count(TOTAL_ROW_LABEL), 1);
        assert_eq!(runs[1].last().map(String::as_str), Some("1458.35"));
    }

    #[test]
    fn test_degenerate_geometry_is_layout_error() {
        let f = Fixture::new();
        let geometry = Geometry {
            first_top: 10.0,
            next_top: 10.0,
            bottom: 0.0,
            row_height: 18.0,
        };
        assert!(matches!(
            build_with(&f.input(), geometry),
            Err(ReportError::Layout(_))
        ));
    }

    #[test]
    fn test_latin1_requester_is_kept() {
        let mut f = Fixture::new();
        f.requester.name = "Jos\u{e9} D'Souza".into();
        let pdf = build_report(&f.input()).expect("build");
        assert!(text_runs(&pdf)[0].contains(&"Generated for: Jos\u{e9} D'Souza".to_string()));
    }

    #[test]
    fn test_requester_outside_font_is_rejected() {
        let mut f = Fixture::new();
        f.requester.name = "\u{100}nand Kulkarni".into();
        let err = build_report(&f.input()).expect_err("macron A");
        match err {
            ReportError::UnsupportedText { field, ch } => {
                assert_eq!(field, "Generated for");
                assert_eq!(ch, '\u{100}');
            }
            other => unreachable!("unexpected error {other:?}"),
        }

        f.requester.name = "A. Patil".into();
        f.requester.contact = "\u{0968}\u{0966}".into();
        let err = build_report(&f.input()).expect_err("devanagari digits");
        assert!(matches!(err, ReportError::UnsupportedText { ref field, .. } if field == "Contact"));
        assert_eq!(
            err.to_string(),
            "Contact contains '\u{0968}' (U+0968), which the report font cannot show"
        );
    }
}
