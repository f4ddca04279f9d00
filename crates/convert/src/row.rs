use std::sync::Arc;

/// One input row: raw string cells addressed by column name, in header
/// order. The header list is shared across all rows of a file.
#[derive(Debug, Clone)]
pub struct RawRow {
    headers: Arc<[String]>,
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(headers: Arc<[String]>, cells: Vec<String>) -> Self {
        RawRow { headers, cells }
    }

    /// Build the shared header list for a file.
    pub fn headers(names: impl IntoIterator<Item = impl Into<String>>) -> Arc<[String]> {
        names.into_iter().map(Into::into).collect()
    }

    /// Look up a cell by column name. Returns `None` when the column does
    /// not exist or the row is short.
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.cells.get(idx).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}
