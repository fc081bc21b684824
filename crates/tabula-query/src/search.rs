//! Free-text search across every cell of a row

use tabula_core::Row;

/// Rows with at least one cell containing `query`, ignoring case
///
/// A query that is empty after trimming keeps every row. The query itself is
/// matched untrimmed.
pub fn search_rows<'a, I>(rows: I, query: &str) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let rows = rows.into_iter();
    if query.trim().is_empty() {
        return rows.collect();
    }

    let needle = query.to_lowercase();
    rows.filter(|row| row_matches(row, &needle)).collect()
}

/// Whether any stringified cell of `row` contains the lowercase `needle`
pub fn row_matches(row: &Row, needle: &str) -> bool {
    row.cells
        .values()
        .any(|cell| cell.to_string().to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabula_core::CellValue;

    fn rows() -> Vec<Row> {
        vec![
            Row::new("1").with_cell("title", "Quarterly Report"),
            Row::new("2")
                .with_cell("title", "Budget")
                .with_cell("tags", CellValue::list(["finance", "q3"])),
            Row::new("3").with_cell("amount", 1250.0),
        ]
    }

    fn search(query: &str) -> Vec<String> {
        let rows = rows();
        search_rows(&rows, query).iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_blank_query_is_identity() {
        assert_eq!(search(""), vec!["1", "2", "3"]);
        assert_eq!(search("   "), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_case_insensitive_any_cell() {
        assert_eq!(search("REPORT"), vec!["1"]);
        assert_eq!(search("Q"), vec!["1", "2"]);
        assert_eq!(search("finance"), vec!["2"]);
    }

    #[test]
    fn test_numbers_match_their_text() {
        assert_eq!(search("125"), vec!["3"]);
        assert!(search("nothing").is_empty());
    }

    #[test]
    fn test_list_cells_match_joined_text() {
        assert_eq!(search("finance, q3"), vec!["2"]);
    }
}
