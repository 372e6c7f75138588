//! Release document assembly, rendering, and output.

pub mod assembler;
pub mod render;
pub mod spec;
pub mod writer;

pub use assembler::{ChangelogAssembler, PipelineState, RELEASE_COMMIT_PREFIX};
pub use render::render_markdown;
pub use spec::{CommitSummary, IssueSummary, ReleaseSpec, UserDetails};
pub use writer::{release_yaml, write_release_yaml};
