use crate::error::RenderError;
use crate::types::{ReportRow, ReportTable};
use log::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook};
use std::path::Path;

const SHEET_NAME: &str = "Video Report";
/// Table origin (B2), zero-based.
const START_ROW: u32 = 1;
const START_COL: u16 = 1;
/// Extent of the white backdrop beyond the table edges.
const BACKDROP_MARGIN: u32 = 100;
const WIDTH_PADDING: usize = 2;
const HEADER_BLUE: u32 = 0x0070C0;

/// A vertical merge over data rows `first..=last` of one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSpan {
    pub column: usize,
    pub first: usize,
    pub last: usize,
}

/// 1-based sheet row of a data row, as shown in a spreadsheet program.
fn sheet_row(data_row: usize) -> u32 {
    START_ROW + 1 + data_row as u32 + 1
}

fn verify_uniform(
    rows: &[ReportRow],
    column: usize,
    first: usize,
    last: usize,
) -> Result<(), RenderError> {
    let expected = ReportTable::cells(&rows[first])[column];
    if rows[first..=last]
        .iter()
        .all(|r| ReportTable::cells(r)[column] == expected)
    {
        Ok(())
    } else {
        Err(RenderError::NonUniform {
            column: ReportTable::COLUMNS[column],
            first_row: sheet_row(first),
            last_row: sheet_row(last),
        })
    }
}

/// Work out every merge for the table, checking that the cells folded into
/// each merge hold the same value.
pub fn plan_merges(table: &ReportTable) -> Result<Vec<MergeSpan>, RenderError> {
    let rows = &table.rows;
    let mut spans = Vec::new();

    let mut start = 0;
    while start < rows.len() {
        let mut end = start;
        while end + 1 < rows.len() && rows[end + 1].folder == rows[start].folder {
            end += 1;
        }

        if end > start {
            verify_uniform(rows, ReportTable::FOLDER_TOTAL_COL, start, end)?;
            verify_uniform(rows, ReportTable::FOLDER_MEAN_COL, start, end)?;
            for column in [
                ReportTable::FOLDER_COL,
                ReportTable::FOLDER_TOTAL_COL,
                ReportTable::FOLDER_MEAN_COL,
            ] {
                spans.push(MergeSpan {
                    column,
                    first: start,
                    last: end,
                });
            }
        }
        start = end + 1;
    }

    if rows.len() > 1 {
        let last = rows.len() - 1;
        for column in [ReportTable::GLOBAL_MEAN_COL, ReportTable::GLOBAL_TOTAL_COL] {
            verify_uniform(rows, column, 0, last)?;
            spans.push(MergeSpan {
                column,
                first: 0,
                last,
            });
        }
    }

    Ok(spans)
}

/// Longest stringified value per column, header included, plus padding.
fn column_widths(table: &ReportTable) -> [usize; 7] {
    let mut widths = ReportTable::COLUMNS.map(|h| h.chars().count());
    for row in &table.rows {
        for (i, cell) in ReportTable::cells(row).into_iter().enumerate() {
            let len = cell.map_or(0, |v| v.chars().count());
            widths[i] = widths[i].max(len);
        }
    }
    widths.map(|w| w + WIDTH_PADDING)
}

/// Width of every sheet column from `A` to the backdrop edge. Columns with
/// no content get the padding only.
fn sheet_column_widths(table: &ReportTable) -> Vec<usize> {
    let widths = column_widths(table);
    let last_col = START_COL as usize + widths.len() - 1 + BACKDROP_MARGIN as usize;
    (0..=last_col)
        .map(|col| {
            col.checked_sub(START_COL as usize)
                .and_then(|i| widths.get(i))
                .copied()
                .unwrap_or(WIDTH_PADDING)
        })
        .collect()
}

/// Write `table` as a single-sheet workbook at `output_path`.
///
/// Merges are planned and validated before anything is written, so a
/// non-uniform merge leaves no file behind.
pub fn render(table: &ReportTable, output_path: &Path) -> Result<(), RenderError> {
    let merges = plan_merges(table)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BLUE))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let body_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let backdrop_format = Format::new()
        .set_background_color(Color::White)
        .set_pattern(FormatPattern::Solid);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (i, header) in ReportTable::COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(START_ROW, START_COL + i as u16, *header, &header_format)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let sheet_r = START_ROW + 1 + r as u32;
        for (c, cell) in ReportTable::cells(row).into_iter().enumerate() {
            let sheet_c = START_COL + c as u16;
            match cell {
                Some(v) => worksheet.write_string_with_format(sheet_r, sheet_c, v, &body_format)?,
                None => worksheet.write_blank(sheet_r, sheet_c, &body_format)?,
            };
        }
    }

    for span in &merges {
        let value = ReportTable::cells(&table.rows[span.first])[span.column].unwrap_or("");
        let col = START_COL + span.column as u16;
        worksheet.merge_range(
            START_ROW + 1 + span.first as u32,
            col,
            START_ROW + 1 + span.last as u32,
            col,
            value,
            &body_format,
        )?;
    }

    let table_end_row = START_ROW + table.rows.len() as u32;
    let table_end_col = START_COL + ReportTable::COLUMNS.len() as u16 - 1;
    for row in 0..=table_end_row + BACKDROP_MARGIN {
        for col in 0..=table_end_col + BACKDROP_MARGIN as u16 {
            let inside = (START_ROW..=table_end_row).contains(&row)
                && (START_COL..=table_end_col).contains(&col);
            if !inside {
                worksheet.write_blank(row, col, &backdrop_format)?;
            }
        }
    }

    for (col, width) in sheet_column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    workbook.save(output_path)?;
    info!("Wrote spreadsheet report to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_report;
    use crate::types::VideoRecord;
    use tempfile::TempDir;

    fn sample_table() -> ReportTable {
        let rec = |folder: &str, name: &str, minutes: f64| VideoRecord {
            folder: folder.to_string(),
            file_name: name.to_string(),
            duration: Some(minutes),
        };
        build_report(vec![
            rec("A", "a1.mp4", 10.0),
            rec("A", "a2.mp4", 10.0),
            rec("B", "b1.mp4", 5.0),
        ])
    }

    #[test]
    fn test_plan_merges_groups_folders() {
        let spans = plan_merges(&sample_table()).unwrap();
        let span = |column, first, last| MergeSpan {
            column,
            first,
            last,
        };

        assert_eq!(
            spans,
            vec![
                span(ReportTable::FOLDER_COL, 0, 1),
                span(ReportTable::FOLDER_TOTAL_COL, 0, 1),
                span(ReportTable::FOLDER_MEAN_COL, 0, 1),
                span(ReportTable::GLOBAL_MEAN_COL, 0, 2),
                span(ReportTable::GLOBAL_TOTAL_COL, 0, 2),
            ]
        );
    }

    #[test]
    fn test_plan_merges_single_row() {
        let mut table = sample_table();
        table.rows.truncate(1);
        assert!(plan_merges(&table).unwrap().is_empty());
    }

    #[test]
    fn test_plan_merges_rejects_mismatched_folder_total() {
        let mut table = sample_table();
        table.rows[1].folder_total = Some("0:19:00".to_string());

        let err = plan_merges(&table).unwrap_err();
        match err {
            RenderError::NonUniform {
                column,
                first_row,
                last_row,
            } => {
                assert_eq!(column, "Total Time in Folder");
                assert_eq!(first_row, 3);
                assert_eq!(last_row, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plan_merges_rejects_mismatched_global() {
        let mut table = sample_table();
        table.rows[2].global_total = None;

        let err = plan_merges(&table).unwrap_err();
        assert!(err.to_string().contains("'Total Time'"));
        assert!(err.to_string().contains("from row 3 to 5"));
    }

    #[test]
    fn test_column_widths() {
        let widths = column_widths(&sample_table());
        // "Folder Name" header is longer than any folder value
        assert_eq!(widths[0], "Folder Name".len() + 2);
        assert_eq!(widths[2], "Video Duration".len() + 2);
    }

    #[test]
    fn test_sheet_column_widths_cover_backdrop() {
        let widths = sheet_column_widths(&sample_table());
        // Column A, seven table columns, then the backdrop
        assert_eq!(widths.len(), 1 + 7 + 100);
        assert_eq!(widths[0], 2);
        assert_eq!(widths[1], "Folder Name".len() + 2);
        assert_eq!(widths[7], "Total Time".len() + 2);
        assert_eq!(widths[8], 2);
        assert_eq!(widths[107], 2);
    }

    #[test]
    fn test_render_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("video_report.xlsx");

        render(&sample_table(), &out).unwrap();
        assert!(out.exists());
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn test_render_empty_table() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("empty.xlsx");

        render(&build_report(Vec::new()), &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_render_mismatch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("bad.xlsx");
        let mut table = sample_table();
        table.rows[0].folder_mean = None;

        assert!(render(&table, &out).is_err());
        assert!(!out.exists());
    }
}
