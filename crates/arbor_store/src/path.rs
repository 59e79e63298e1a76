//! Splitting of `/`-delimited item paths.

use arbor_foundation::{Error, Result};

/// Separator between path segments.
pub(crate) const PATH_DELIMITER: char = '/';

/// Splits `path` into its intermediate group names and final item name.
///
/// A path without the delimiter is a single final segment. Empty segments
/// anywhere, including a trailing delimiter, are rejected.
pub(crate) fn split(path: &str) -> Result<(Vec<&str>, &str)> {
    let (dirs, last) = match path.rsplit_once(PATH_DELIMITER) {
        Some((dirs, last)) => (dirs.split(PATH_DELIMITER).collect::<Vec<_>>(), last),
        None => (Vec::new(), path),
    };
    if last.is_empty() || dirs.iter().any(|s| s.is_empty()) {
        return Err(Error::invalid_argument(format!(
            "path '{path}' has an empty segment"
        )));
    }
    Ok((dirs, last))
}

/// Checks that `name` is usable as a single item name.
pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("item name must not be empty"));
    }
    if name.contains(PATH_DELIMITER) {
        return Err(Error::invalid_argument(format!(
            "item name '{name}' contains the path delimiter"
        )));
    }
    Ok(())
}
