/// Duration in minutes; `None` when the file could not be probed.
pub type Minutes = Option<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub folder: String,
    pub file_name: String,
    pub duration: Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FolderAggregate {
    pub total: Minutes,
    pub mean: Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalAggregate {
    pub total: Minutes,
    pub mean: Minutes,
}

/// One output row. Duration columns are already formatted as elapsed time;
/// `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub folder: String,
    pub file_name: String,
    pub duration: Option<String>,
    pub folder_total: Option<String>,
    pub folder_mean: Option<String>,
    pub global_mean: Option<String>,
    pub global_total: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    pub rows: Vec<ReportRow>,
    pub global: GlobalAggregate,
}

impl ReportTable {
    pub const COLUMNS: [&'static str; 7] = [
        "Folder Name",
        "File Name",
        "Video Duration",
        "Total Time in Folder",
        "Average Time in Folder",
        "Total Average Time",
        "Total Time",
    ];

    pub const FOLDER_COL: usize = 0;
    pub const FOLDER_TOTAL_COL: usize = 3;
    pub const FOLDER_MEAN_COL: usize = 4;
    pub const GLOBAL_MEAN_COL: usize = 5;
    pub const GLOBAL_TOTAL_COL: usize = 6;

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of a row in `COLUMNS` order.
    #[must_use]
    pub fn cells(row: &ReportRow) -> [Option<&str>; 7] {
        [
            Some(row.folder.as_str()),
            Some(row.file_name.as_str()),
            row.duration.as_deref(),
            row.folder_total.as_deref(),
            row.folder_mean.as_deref(),
            row.global_mean.as_deref(),
            row.global_total.as_deref(),
        ]
    }
}
