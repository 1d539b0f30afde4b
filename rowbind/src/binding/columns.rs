//! Column name to cell resolution.
//!
//! A [`ColumnIndex`] is built once from the header and then resolves column
//! names against any number of rows.
//!
//! Duplicate header names: the last occurrence that the row actually reaches
//! wins. With header `a,b,a` the row `1,2,3` resolves `a` to `3`, while the
//! short row `1,2` resolves `a` to `1`. Columns past the end of a row are
//! absent, never empty.

use std::collections::HashMap;

/// Positions of each column name in a header.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, Vec<usize>>,
    width: usize,
}

impl ColumnIndex {
    pub fn new<H: AsRef<str>>(header: &[H]) -> Self {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, name) in header.iter().enumerate() {
            positions.entry(name.as_ref().to_string()).or_default().push(i);
        }
        Self {
            positions,
            width: header.len(),
        }
    }

    /// Number of columns in the header.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Position used for `column` in a row of `row_len` cells.
    pub fn position(&self, column: &str, row_len: usize) -> Option<usize> {
        self.positions
            .get(column)?
            .iter()
            .rev()
            .copied()
            .find(|&i| i < row_len)
    }

    /// Cell of `row` under `column`, if the header has it and the row reaches it.
    pub fn cell<'r, S: AsRef<str>>(&self, row: &'r [S], column: &str) -> Option<&'r str> {
        let i = self.position(column, row.len())?;
        row.get(i).map(AsRef::as_ref)
    }

    /// Header names that appear more than once, sorted.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .positions
            .iter()
            .filter(|(_, positions)| positions.len() > 1)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Map each header column to its cell in `row`.
pub fn map_columns<'a, H, S>(header: &'a [H], row: &'a [S]) -> HashMap<&'a str, &'a str>
where
    H: AsRef<str>,
    S: AsRef<str>,
{
    let mut map = HashMap::new();
    for (name, cell) in header.iter().zip(row) {
        map.insert(name.as_ref(), cell.as_ref());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_columns() {
        let map = map_columns(&["id", "name"], &["1", "John Doe"]);
        assert_eq!(map["id"], "1");
        assert_eq!(map["name"], "John Doe");
    }

    #[test]
    fn test_short_row_leaves_columns_absent() {
        let header = ["id", "name", "email"];
        let row = ["1"];
        let map = map_columns(&header, &row);
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key("name"));

        let index = ColumnIndex::new(&header);
        assert_eq!(index.cell(&row, "id"), Some("1"));
        assert_eq!(index.cell(&row, "email"), None);
    }

    #[test]
    fn test_empty_cell_is_present() {
        let index = ColumnIndex::new(&["id", "name"]);
        assert_eq!(index.cell(&["1", ""], "name"), Some(""));
    }

    #[test]
    fn test_duplicate_last_reachable_wins() {
        let header = ["a", "b", "a"];
        let index = ColumnIndex::new(&header);
        assert_eq!(index.cell(&["1", "2", "3"], "a"), Some("3"));
        assert_eq!(index.cell(&["1", "2"], "a"), Some("1"));
        assert_eq!(index.duplicates(), vec!["a"]);

        let map = map_columns(&header, &["1", "2", "3"]);
        assert_eq!(map["a"], "3");
        assert_eq!(map_columns(&header, &["1", "2"])["a"], "1");
    }

    #[test]
    fn test_index_agrees_with_map_columns() {
        let header = vec!["x".to_string(), "y".to_string()];
        let row = vec!["10".to_string(), "20".to_string()];
        let index = ColumnIndex::new(&header);
        let map = map_columns(&header, &row);
        assert_eq!(index.cell(&row, "x"), map.get("x").copied());
        assert_eq!(index.cell(&row, "y"), map.get("y").copied());
        assert_eq!(index.width(), 2);
        assert!(index.contains("y"));
        assert!(!index.contains("z"));
    }

    #[test]
    fn test_unknown_column() {
        let index = ColumnIndex::new(&["id"]);
        assert_eq!(index.position("name", 5), None);
        assert!(ColumnIndex::new::<&str>(&[]).is_empty());
    }
}
