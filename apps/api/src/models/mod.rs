pub mod candidate;
pub mod job;

/// A typed row stored in one sheet of the record store.
///
/// Column order is the persisted layout: `to_row` and `from_row` must agree on
/// it, and both are positional so a renamed header never shifts a value into
/// the wrong field.
pub trait SheetRow: Sized {
    /// Header names in store column order.
    const COLUMNS: &'static [&'static str];

    fn to_row(&self) -> Vec<String>;

    /// Decodes a row positionally. Missing trailing cells become empty strings.
    fn from_row(values: &[String]) -> Self;
}

/// Cell at `index`, or an empty string when the row is shorter than the schema.
pub(crate) fn cell(values: &[String], index: usize) -> String {
    values.get(index).cloned().unwrap_or_default()
}
