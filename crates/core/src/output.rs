//! Shaping records for the user-descriptions file.

use crate::locate::ExtractedRecord;

/// Default output file name.
pub const USER_DESCRIPTIONS: &str = "user_descriptions.csv";

/// One line of the user-descriptions file, newline included.
///
/// The consumer reads URL-style escapes, so newlines become `%0A` and double
/// quotes become single quotes. Every description ends with a blank line.
pub fn csv_row(record: &ExtractedRecord) -> String {
    let escaped = record.text.replace('"', "'").replace('\n', "%0A");
    format!("\"{}\", \"{}%0A%0A\", \"\"\n", record.name, escaped)
}

/// All rows, in record order.
pub fn csv_document<'a>(records: impl IntoIterator<Item = &'a ExtractedRecord>) -> String {
    records.into_iter().map(csv_row).collect()
}
