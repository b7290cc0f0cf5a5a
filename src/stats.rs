use crate::types::{
    FolderAggregate, GlobalAggregate, Minutes, ReportRow, ReportTable, VideoRecord,
};
use colored::Colorize;
use comfy_table::{Cell, Color, Table};
use std::collections::HashMap;

/// Placeholder printed for a missing value.
pub const NO_VALUE: &str = "-";

/// Sum of all durations; absent if any input is absent or there are none.
#[must_use]
pub fn sum_minutes(values: &[Minutes]) -> Minutes {
    if values.is_empty() {
        return None;
    }
    values.iter().try_fold(0.0, |acc, v| v.map(|m| acc + m))
}

/// Mean of all durations, with the same propagation rule as `sum_minutes`.
#[must_use]
pub fn mean_minutes(values: &[Minutes]) -> Minutes {
    sum_minutes(values).map(|total| total / values.len() as f64)
}

/// Format minutes as elapsed time (`H:MM:SS`, with a `N days, ` prefix past
/// 24 hours), truncating to whole seconds.
#[must_use]
pub fn format_elapsed(minutes: Minutes) -> Option<String> {
    let minutes = minutes?;
    let total_seconds = (minutes * 60.0).trunc() as u64;

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let mins = (total_seconds % 3_600) / 60;
    let secs = total_seconds % 60;

    let clock = format!("{hours}:{mins:02}:{secs:02}");
    Some(match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    })
}

#[must_use]
pub fn folder_aggregates(records: &[VideoRecord]) -> HashMap<String, FolderAggregate> {
    let mut groups: HashMap<String, Vec<Minutes>> = HashMap::new();
    for r in records {
        groups.entry(r.folder.clone()).or_default().push(r.duration);
    }

    groups
        .into_iter()
        .map(|(folder, durations)| {
            let agg = FolderAggregate {
                total: sum_minutes(&durations),
                mean: mean_minutes(&durations),
            };
            (folder, agg)
        })
        .collect()
}

#[must_use]
pub fn global_aggregate(records: &[VideoRecord]) -> GlobalAggregate {
    let durations: Vec<Minutes> = records.iter().map(|r| r.duration).collect();
    GlobalAggregate {
        total: sum_minutes(&durations),
        mean: mean_minutes(&durations),
    }
}

/// Join each record with its folder and global aggregates, in input order.
#[must_use]
pub fn build_report(records: Vec<VideoRecord>) -> ReportTable {
    let folders = folder_aggregates(&records);
    let global = global_aggregate(&records);
    let global_total = format_elapsed(global.total);
    let global_mean = format_elapsed(global.mean);

    let rows = records
        .into_iter()
        .map(|r| {
            let agg = folders.get(&r.folder).copied().unwrap_or_default();
            ReportRow {
                duration: format_elapsed(r.duration),
                folder_total: format_elapsed(agg.total),
                folder_mean: format_elapsed(agg.mean),
                global_mean: global_mean.clone(),
                global_total: global_total.clone(),
                folder: r.folder,
                file_name: r.file_name,
            }
        })
        .collect();

    ReportTable { rows, global }
}

pub fn print_report_table(report: &ReportTable) {
    if report.is_empty() {
        println!("No video files found.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY);
    table.set_header(ReportTable::COLUMNS.to_vec());

    for row in &report.rows {
        let t_row: Vec<Cell> = ReportTable::cells(row)
            .into_iter()
            .map(|value| match value {
                Some(v) => Cell::new(v),
                None => Cell::new(NO_VALUE).fg(Color::Red),
            })
            .collect();
        table.add_row(t_row);
    }

    println!("{table}");
}

/// The two closing summary lines.
#[must_use]
pub fn summary_lines(global: &GlobalAggregate) -> [String; 2] {
    let show = |m: Minutes| format_elapsed(m).unwrap_or_else(|| NO_VALUE.to_string());
    [
        format!("Total time for all videos: {}", show(global.total)),
        format!("Average time for all videos: {}", show(global.mean)),
    ]
}

pub fn print_summary(global: &GlobalAggregate) {
    println!();
    for line in summary_lines(global) {
        println!("{}", line.bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(folder: &str, name: &str, duration: Minutes) -> VideoRecord {
        VideoRecord {
            folder: folder.to_string(),
            file_name: name.to_string(),
            duration,
        }
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Some(90.0)).as_deref(), Some("1:30:00"));
        assert_eq!(format_elapsed(Some(0.0)).as_deref(), Some("0:00:00"));
        assert_eq!(format_elapsed(Some(25.0)).as_deref(), Some("0:25:00"));
        // 10.999 s truncates to 10 s
        assert_eq!(
            format_elapsed(Some(10.999 / 60.0)).as_deref(),
            Some("0:00:10")
        );
        assert_eq!(format_elapsed(Some(1500.0)).as_deref(), Some("1 day, 1:00:00"));
        assert_eq!(
            format_elapsed(Some(2.0 * 1440.0 + 61.5)).as_deref(),
            Some("2 days, 1:01:30")
        );
    }

    #[test]
    fn test_absent_is_not_zero() {
        assert_eq!(format_elapsed(None), None);
        assert_ne!(format_elapsed(None), format_elapsed(Some(0.0)));
    }

    #[test]
    fn test_sum_and_mean_propagate_missing() {
        assert_eq!(sum_minutes(&[Some(1.0), Some(2.0)]), Some(3.0));
        assert_eq!(mean_minutes(&[Some(1.0), Some(2.0)]), Some(1.5));
        assert_eq!(sum_minutes(&[Some(1.0), None]), None);
        assert_eq!(mean_minutes(&[None, Some(2.0)]), None);
        assert_eq!(sum_minutes(&[]), None);
        assert_eq!(mean_minutes(&[]), None);
    }

    #[test]
    fn test_end_to_end_folder_totals() {
        let records = vec![
            rec("A", "a1.mp4", Some(10.0)),
            rec("A", "a2.mp4", Some(10.0)),
            rec("B", "b1.mp4", Some(5.0)),
        ];
        let report = build_report(records);

        assert_eq!(report.global.total, Some(25.0));
        assert_eq!(report.rows.len(), 3);
        for row in &report.rows {
            assert_eq!(row.global_total.as_deref(), Some("0:25:00"));
            assert_eq!(row.global_mean.as_deref(), Some("0:08:20"));
        }
        assert_eq!(report.rows[0].folder_total.as_deref(), Some("0:20:00"));
        assert_eq!(report.rows[1].folder_total.as_deref(), Some("0:20:00"));
        assert_eq!(report.rows[1].folder_mean.as_deref(), Some("0:10:00"));
        assert_eq!(report.rows[2].folder_total.as_deref(), Some("0:05:00"));
        assert_eq!(report.rows[2].duration.as_deref(), Some("0:05:00"));
    }

    #[test]
    fn test_missing_duration_poisons_folder() {
        let records = vec![
            rec("A", "a1.mp4", Some(10.0)),
            rec("A", "broken.mp4", None),
            rec("B", "b1.mp4", Some(5.0)),
        ];
        let report = build_report(records);

        assert_eq!(report.rows[0].folder_total, None);
        assert_eq!(report.rows[0].folder_mean, None);
        assert_eq!(report.rows[1].duration, None);
        assert_eq!(report.rows[2].folder_total.as_deref(), Some("0:05:00"));
        assert_eq!(report.global.total, None);
        assert_eq!(report.rows[2].global_total, None);
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.global, GlobalAggregate::default());
        assert_eq!(report.global.total, None);
    }

    #[test]
    fn test_summary_lines_have_no_padding() {
        let lines = summary_lines(&GlobalAggregate {
            total: Some(90.0),
            mean: Some(45.0),
        });
        assert_eq!(
            lines,
            [
                "Total time for all videos: 1:30:00".to_string(),
                "Average time for all videos: 0:45:00".to_string(),
            ]
        );
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&GlobalAggregate {
            total: Some(25.0),
            mean: None,
        });
        assert_eq!(lines[0], "Total time for all videos: 0:25:00");
        assert_eq!(lines[1], "Average time for all videos: -");
    }
}
