use std::path::Path;

/// Suffixes the data directory listing admits, matched case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".json", ".csv", ".xlsx", ".xls"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Detect the format from the file extension. `None` for anything unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn content_type(self, path: &Path) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Spreadsheet => {
                let is_xls = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("xls"));
                if is_xls {
                    "application/vnd.ms-excel"
                } else {
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                }
            }
        }
    }
}

pub fn is_listed_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
