//! Required-column check for the tabular sources.

use std::collections::HashSet;

use crate::error::{GraphrouteError, Result};

/// Fail with [`GraphrouteError::MissingColumns`] unless every `required`
/// column appears in `headers`. Missing names are reported sorted.
pub fn validate_columns<'a, I>(path: &str, headers: I, required: &[&str]) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: HashSet<&str> = headers.into_iter().map(str::trim).collect();
    let mut missing: Vec<String> = required
        .iter()
        .filter(|col| !present.contains(*col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(GraphrouteError::MissingColumns {
        path: path.to_string(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_columns_present() {
        let headers = ["id", "type", "name", "description"];
        assert!(validate_columns("nodes.csv", headers, &["id", "type", "name"]).is_ok());
    }

    #[test]
    fn test_reports_missing_sorted() {
        let headers = ["id", "src"];
        let err = validate_columns("edges.csv", headers, &["id", "src", "rel", "dst"]).unwrap_err();
        match err {
            GraphrouteError::MissingColumns { path, missing } => {
                assert_eq!(path, "edges.csv");
                assert_eq!(missing, vec!["dst", "rel"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_whitespace_ignored() {
        let headers = [" id", "type ", "name"];
        assert!(validate_columns("nodes.csv", headers, &["id", "type", "name"]).is_ok());
    }
}
