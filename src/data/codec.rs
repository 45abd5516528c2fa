//! Line-oriented record codec.
//!
//! A record is a fixed set of text fields joined by [`FIELD_SEPARATOR`] on a
//! single line. Fields are not escaped: a field that contains the separator
//! itself cannot be read back with the same field count.

use std::str::FromStr;

pub const FIELD_SEPARATOR: &str = "|||";

/// An entity that can be stored as one record line.
pub trait Record: Sized {
    /// Records with fewer decoded fields are skipped on load.
    const MIN_FIELDS: usize;

    fn to_fields(&self) -> Vec<String>;

    /// Build the entity from at least [`Record::MIN_FIELDS`] fields.
    fn from_fields(fields: &[&str]) -> Self;
}

/// Join fields into one newline-terminated line.
///
/// Carriage returns and line feeds inside a field become a single space each
/// so that every record stays on its own line.
pub fn encode<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|field| field.as_ref().replace(['\r', '\n'], " "))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR);
    line.push('\n');
    line
}

/// Split a line into fields. Blank lines yield `None`.
pub fn decode(line: &str) -> Option<Vec<&str>> {
    if line.trim().is_empty() {
        return None;
    }
    Some(line.split(FIELD_SEPARATOR).collect())
}

/// Parse a numeric field, falling back to `default` when it does not parse.
pub fn parse_or<T: FromStr>(field: &str, default: T) -> T {
    field.trim().parse().unwrap_or(default)
}

/// Decode a record line into an entity, skipping short or blank lines.
pub fn decode_record<T: Record>(line: &str) -> Option<T> {
    let fields = decode(line)?;
    if fields.len() < T::MIN_FIELDS {
        return None;
    }
    Some(T::from_fields(&fields))
}
