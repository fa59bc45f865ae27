#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names from the header row, de-duplicated.
    pub headers: Vec<String>,
    /// Each data row, as a Vec of Strings (one per header).
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the cells of column `idx`, in file order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |r| r[idx].as_str())
    }
}
