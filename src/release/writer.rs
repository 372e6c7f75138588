//! Release document output.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::OutputError;

use super::spec::ReleaseSpec;

/// Serialize the release document to YAML.
pub fn release_yaml(spec: &ReleaseSpec) -> Result<String, OutputError> {
    serde_yaml::to_string(spec).map_err(OutputError::Serialize)
}

/// Write the release document to `path` as YAML.
///
/// The write goes through a temp file in the target directory and a rename,
/// so a failure never leaves a half-written document behind.
pub fn write_release_yaml(path: &Path, spec: &ReleaseSpec) -> Result<(), OutputError> {
    let data = release_yaml(spec)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(OutputError::Write)?;
    file.write_all(data.as_bytes()).map_err(OutputError::Write)?;
    file.persist(path).map_err(|e| OutputError::Write(e.error))?;

    Ok(())
}
