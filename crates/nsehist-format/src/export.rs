//! Writing a table to disk.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nsehist_types::OhlcvRecord;

use crate::{FormatError, OutputFormat};

/// Writes `records` to `path` in `format`, replacing any existing file.
/// `pretty` indents JSON array output.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_file(
    path: impl AsRef<Path>,
    format: OutputFormat,
    pretty: bool,
    records: &[OhlcvRecord],
) -> Result<(), FormatError> {
    let file = File::create(path.as_ref())?;
    format.write_with(records, pretty, BufWriter::new(file))
}
