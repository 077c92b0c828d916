// crates/eol-history/src/csv.rs
// ============================================================================
// Module: CSV Rows
// Description: Field quoting and row parsing for the history files.
// Purpose: Keep history files readable by spreadsheet tools.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Fields containing a comma, a double quote, CR, or LF are wrapped in
//! double quotes with inner quotes doubled. [`parse_row`] reverses
//! [`format_row`] for a single line.

use std::borrow::Cow;

/// Characters that force a field to be quoted.
const SPECIAL: [char; 4] = [',', '"', '\r', '\n'];

/// Quotes a field when it contains a separator, quote, or line break.
#[must_use]
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(SPECIAL) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Formats one row, terminated by a newline.
#[must_use]
pub fn format_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut row = fields
        .iter()
        .map(|field| escape_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// Splits one formatted row back into fields.
///
/// The trailing newline, if any, is ignored. Unterminated quotes take the
/// rest of the line.
#[must_use]
pub fn parse_row(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match (quoted, ch) {
            (true, '"') if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            (true, '"') => quoted = false,
            (false, '"') if field.is_empty() => quoted = true,
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (_, other) => field.push(other),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(format_row(&["a", "b c", ""]), "a,b c,\n");
    }

    #[test]
    fn special_fields_are_quoted() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn parse_reverses_format() {
        let fields = ["x,y", "q\"q", "", "plain"];
        assert_eq!(parse_row(&format_row(&fields)), fields);
    }
}
