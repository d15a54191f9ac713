//! Markup stripping for the `html_content` column.

use scraper::Html;

use crate::error::{IngestError, IngestResult};
use crate::types::{DataType, Table, Value};

/// Column name the markup pass looks for.
pub const MARKUP_COLUMN: &str = "html_content";

/// Extract the plain text of an HTML fragment.
///
/// Text nodes are concatenated in document order; entities are resolved by
/// the parser. Input without tags comes back unchanged, and malformed markup
/// is handled by the parser's error recovery rather than failing.
pub fn markup_to_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    fragment.root_element().text().collect()
}

/// Replace every cell of the `html_content` column with its extracted text.
///
/// Returns `Ok(None)` when the column is absent (table untouched), otherwise
/// the number of cells handed to the parser. Null cells become empty strings
/// without a parse. The column's type becomes [`DataType::Utf8`]; other
/// columns are never touched.
pub fn strip_markup_column(table: &mut Table) -> IngestResult<Option<usize>> {
    let Some(index) = table.schema.index_of(MARKUP_COLUMN) else {
        return Ok(None);
    };

    let mut stripped = 0usize;
    for (row_idx0, row) in table.rows.iter_mut().enumerate() {
        let replacement = match &row[index] {
            Value::Utf8(markup) => {
                stripped += 1;
                Value::Utf8(markup_to_text(markup))
            }
            Value::Null => Value::Utf8(String::new()),
            other => {
                // Report 1-based row number; +1 again because the header is row 1.
                return Err(IngestError::Markup {
                    row: row_idx0 + 2,
                    column: MARKUP_COLUMN.to_string(),
                    message: format!("expected markup text, found {}", other.type_name()),
                });
            }
        };
        row[index] = replacement;
    }

    table.schema.fields[index].data_type = DataType::Utf8;
    Ok(Some(stripped))
}
