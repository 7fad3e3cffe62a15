//! Claim-ID input

use std::fs;
use std::path::Path;

use core_kernel::ClaimId;

use crate::error::CliError;

/// Parses claim IDs from file contents, one per line
///
/// Blank lines and lines starting with `#` are skipped. Errors carry the
/// 1-based line number.
pub fn parse_ids(path: &Path, contents: &str) -> Result<Vec<ClaimId>, CliError> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, value)| {
            value.parse::<ClaimId>().map_err(|source| CliError::InvalidClaimId {
                path: path.to_path_buf(),
                line,
                source,
            })
        })
        .collect()
}

/// Reads claim IDs from a file
pub fn read_ids_file(path: impl AsRef<Path>) -> Result<Vec<ClaimId>, CliError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ids(path, &contents)
}

/// Positional IDs followed by the IDs of the file, if any
pub fn collect_ids(positional: Vec<ClaimId>, ids_file: Option<&Path>) -> Result<Vec<ClaimId>, CliError> {
    let mut ids = positional;
    if let Some(path) = ids_file {
        ids.extend(read_ids_file(path)?);
    }
    if ids.is_empty() {
        return Err(CliError::NoClaimIds);
    }
    Ok(ids)
}
