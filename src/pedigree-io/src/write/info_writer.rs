use std::{fs::OpenOptions, io::Write as _, path::Path};

use anyhow::Result;
use located_error::LocatedError;

use super::generic_writer::WriterError;

/// Append a single summary line to `pedigree.info` or `marker.info`.
///
/// Both files are append-only run summaries: each invocation of the engine appends, rather than
/// truncates, so that a history of runs against the same pedigree is preserved.
///
/// # Errors
/// Returns an error if the file cannot be opened for appending or written to.
pub fn append_summary_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(WriterError::IOError)
        .loc("While opening summary file for appending")?;
    writeln!(file, "{line}").map_err(WriterError::IOError).loc("While appending summary line")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_without_truncating() -> Result<()> {
        let tmp = tempfile::NamedTempFile::new()?;
        append_summary_line(tmp.path(), "first run")?;
        append_summary_line(tmp.path(), "second run")?;
        let contents = std::fs::read_to_string(tmp.path())?;
        assert_eq!(contents, "first run\nsecond run\n");
        Ok(())
    }
}
