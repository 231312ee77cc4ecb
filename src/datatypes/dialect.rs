// src/datatypes/dialect.rs
use std::mem::take;

/// Split one dialect cell into its spellings.
///
/// `a,b` → `["a", "b"]`; `a\,b` and `"a,b"` → `["a,b"]`. Surrounding
/// whitespace is trimmed and empty spellings dropped.
pub fn split_spellings(cell: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut field = s!();
    let mut in_quotes = false;
    let mut chars = cell.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    field.push(next);
                }
            }
            '"' => {
                if in_quotes && matches!(chars.peek(), Some('"')) {
                    chars.next(); // double-quote escape
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => out.push(take(&mut field)),
            _ => field.push(ch),
        }
    }
    out.push(field);

    out.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Inverse of [`split_spellings`] for display: comma-joined, inner commas escaped.
pub fn join_spellings(spellings: &[String]) -> String {
    spellings
        .iter()
        .map(|s| s.replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(",")
}
