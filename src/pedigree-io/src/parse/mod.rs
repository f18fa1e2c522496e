use std::{fs, path::Path};

use located_error::LocatedError;
use anyhow::Result;

mod error;
use error::ParseError;

/// Create the parent directories of `path`, if they do not already exist.
///
/// # Errors
/// Returns an error if the directory cannot be created (e.g. permission denied).
pub fn create_parent_directory(path: &Path) -> Result<()> {
    use ParseError::CreateParentDirectory;
    let parent_dir = path.parent().unwrap_or(path);
    let loc_msg = || format!("While attempting to create output directory '{}'", path.display());
    fs::create_dir_all(parent_dir).map_err(CreateParentDirectory).with_loc(loc_msg)?;
    Ok(())
}
