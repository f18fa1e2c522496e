use std::path::Path;
use anyhow::Result;
use located_error::LocatedError;

use super::generic_writer::{GenericWriter, WriterError};

/// Flush accumulated error/warning messages to `path`, or remove `path` if `messages` is empty.
///
/// This mirrors the original tool's behaviour of unlinking `ibdprep.err`/`ibdprep.wrn` when a run
/// produced no errors or warnings, so a clean run leaves no stray log files behind.
///
/// # Errors
/// Returns an error if the file cannot be written, or if removing a stale empty-sink file fails
/// for a reason other than the file not existing.
pub fn flush_sink(path: &Path, messages: &[String]) -> Result<()> {
    if messages.is_empty() {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WriterError::IOError(e)).loc("While removing an empty log sink file"),
        }
    } else {
        let mut writer = GenericWriter::new(Some(path))?;
        writer.write_iter(messages.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_nonempty_sink() -> Result<()> {
        let tmp = tempfile::NamedTempFile::new()?;
        flush_sink(tmp.path(), &["oops".to_string()])?;
        let contents = std::fs::read_to_string(tmp.path())?;
        assert!(contents.contains("oops"));
        Ok(())
    }

    #[test]
    fn removes_empty_sink() -> Result<()> {
        let tmp = tempfile::NamedTempFile::new()?;
        let path = tmp.path().to_path_buf();
        drop(tmp);
        std::fs::write(&path, "stale")?;
        flush_sink(&path, &[])?;
        assert!(!path.exists());
        Ok(())
    }
}
