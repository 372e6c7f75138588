//! User identity resolution across git and SCM sources.

pub mod directory;
pub mod resolver;

pub use directory::{GithubUserDirectory, ScmUserDirectory, get_github_token};
pub use resolver::{UserIdentityResolver, normalize_login};
