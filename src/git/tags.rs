//! Tag enumeration and release-boundary detection.

use std::collections::HashMap;

use git2::{Oid, Repository};
use semver::Version;
use tracing::{debug, warn};

use crate::error::SourceError;

/// A git tag with optional semver version.
#[derive(Debug, Clone)]
pub struct TagInfo {
    pub name: String,
    pub oid: Oid,
    pub version: Option<Version>,
}

/// Tagged commits reachable from HEAD, most recent first.
///
/// Walks history in topological+time order and returns one entry per tagged
/// commit; when several tags point at the same commit the highest semver one
/// wins. The first entry is the latest release boundary, the second the
/// previous one.
pub fn tags_in_history(repo: &Repository) -> Result<Vec<TagInfo>, SourceError> {
    let head_oid = match repo.head().ok().and_then(|head| head.target()) {
        Some(oid) => oid,
        None => return Ok(Vec::new()),
    };

    let mut tags_by_commit: HashMap<Oid, Vec<TagInfo>> = HashMap::new();
    for tag in get_all_tags(repo)? {
        tags_by_commit.entry(tag.oid).or_default().push(tag);
    }

    if tags_by_commit.is_empty() {
        debug!("No tags found in repository");
        return Ok(Vec::new());
    }

    let mut revwalk = repo.revwalk().map_err(SourceError::RevwalkError)?;
    revwalk.push(head_oid).map_err(SourceError::RevwalkError)?;
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
        .map_err(SourceError::RevwalkError)?;

    let mut found = Vec::new();
    for oid in revwalk {
        let oid = oid.map_err(SourceError::RevwalkError)?;
        if let Some(candidates) = tags_by_commit.get(&oid) {
            let best = candidates
                .iter()
                .max_by(|a, b| a.version.cmp(&b.version))
                .cloned();
            if let Some(tag) = best {
                debug!(tag = %tag.name, "Found tagged commit in history");
                found.push(tag);
            }
        }
    }

    Ok(found)
}

/// Get all tags from the repository.
pub fn get_all_tags(repo: &Repository) -> Result<Vec<TagInfo>, SourceError> {
    let mut tags = Vec::new();

    repo.tag_foreach(|oid, name_bytes| {
        if let Ok(name_str) = std::str::from_utf8(name_bytes) {
            // Remove refs/tags/ prefix
            let name = name_str
                .strip_prefix("refs/tags/")
                .unwrap_or(name_str)
                .to_string();

            let version = get_version_from_tag(&name);

            // Resolve tag to commit (handle annotated tags)
            let resolved_oid = match repo.find_tag(oid) {
                Ok(tag_obj) => tag_obj.target_id(),
                Err(e) => {
                    debug!(
                        tag = %name,
                        error = %e,
                        "Could not resolve annotated tag, using raw OID. \
                         This is normal for lightweight tags."
                    );
                    oid
                }
            };

            tags.push(TagInfo {
                name,
                oid: resolved_oid,
                version,
            });
        } else {
            warn!("Skipping tag with OID {} - name is not valid UTF-8", oid);
        }
        true // Continue iteration
    })
    .map_err(SourceError::RevwalkError)?;

    Ok(tags)
}

/// Extract semver version from a tag name.
/// Handles both "v1.2.3" and "1.2.3" formats.
pub fn get_version_from_tag(tag_name: &str) -> Option<Version> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    Version::parse(version_str).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_tag_with_v() {
        let v = get_version_from_tag("v1.2.3");
        assert_eq!(v, Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_version_from_tag_without_v() {
        let v = get_version_from_tag("1.2.3");
        assert_eq!(v, Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_version_from_tag_invalid() {
        let v = get_version_from_tag("release-candidate");
        assert_eq!(v, None);
    }
}
