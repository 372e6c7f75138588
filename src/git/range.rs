//! Revision-range resolution for one release interval.

use tracing::info;

use crate::error::SourceError;

use super::source::CommitSource;

/// Resolved revision boundaries.
///
/// `Empty` is a success sentinel, not an error: the pipeline produces an
/// empty changelog for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionRange {
    /// Commits in `(previous, current]` make up the release.
    Range { previous: String, current: String },
    /// Nothing to diff (empty repository).
    Empty,
}

/// Determine the previous-release and current-release commit boundaries.
///
/// The previous boundary is the commit pointed to by the most recent tag
/// before the current one; for a first release it falls back to the
/// repository's very first commit. With no commits at all the range is
/// [`RevisionRange::Empty`].
pub fn resolve_range(source: &dyn CommitSource) -> Result<RevisionRange, SourceError> {
    let previous = match source.previous_tag_commit()? {
        Some(rev) => rev,
        None => {
            // assume we are the first release
            match source.first_commit()? {
                Some(rev) => rev,
                None => {
                    info!("no previous commit version found so change diff unavailable");
                    return Ok(RevisionRange::Empty);
                }
            }
        }
    };

    let current = match source.latest_tag_commit()? {
        Some(rev) => rev,
        None => return Ok(RevisionRange::Empty),
    };

    Ok(RevisionRange::Range { previous, current })
}
