//! Identity resolution: merging partial user records into canonical profiles.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::git::source::GitPerson;
use crate::release::spec::UserDetails;

use super::directory::ScmUserDirectory;

/// Merges partial user records (git signature, tracker profile) into one
/// canonical identity per normalized login.
///
/// The cache is scoped to one pipeline run. An entry is never replaced
/// wholesale after creation: later fragments fill empty fields, and a
/// non-empty incoming field wins over the stored one. Resolving the same
/// fragments in any order converges to the same union.
pub struct UserIdentityResolver {
    directory: Option<Arc<dyn ScmUserDirectory>>,
    cache: HashMap<String, UserDetails>,
}

impl UserIdentityResolver {
    pub fn new(directory: Option<Arc<dyn ScmUserDirectory>>) -> Self {
        Self {
            directory,
            cache: HashMap::new(),
        }
    }

    /// Merge a partial record into the canonical identity for its login.
    ///
    /// The first sight of a login also consults the SCM directory when one is
    /// configured; a directory failure is logged and the partial record
    /// stands on its own.
    pub async fn resolve(&mut self, partial: UserDetails) -> UserDetails {
        if partial.login.is_empty() {
            // no key to merge on
            return partial;
        }

        let key = normalize_login(&partial.login);
        if !self.cache.contains_key(&key) {
            if let Some(directory) = &self.directory {
                match directory.resolve_user(&partial.login).await {
                    Ok(Some(details)) => {
                        self.cache.insert(key.clone(), details);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Failed to resolve user {} in SCM directory: {}", partial.login, e);
                    }
                }
            }
        }

        let entry = self.cache.entry(key).or_default();
        merge_non_empty(entry, &partial);
        entry.clone()
    }

    /// Build an identity from a git signature. Callers skip signatures that
    /// lack a name or email.
    pub async fn git_signature_as_user(&mut self, person: &GitPerson) -> UserDetails {
        let login = person
            .email
            .split('@')
            .next()
            .unwrap_or("")
            .to_string();
        self.resolve(UserDetails {
            login,
            name: person.name.clone(),
            email: person.email.clone(),
            ..Default::default()
        })
        .await
    }

    /// Order-preserving batch form of [`UserIdentityResolver::resolve`].
    pub async fn git_user_slice_as_user_details_slice(
        &mut self,
        users: Vec<UserDetails>,
    ) -> Vec<UserDetails> {
        let mut answer = Vec::with_capacity(users.len());
        for user in users {
            answer.push(self.resolve(user).await);
        }
        answer
    }
}

/// Overwrite only the fields that are non-empty on the incoming record.
fn merge_non_empty(existing: &mut UserDetails, incoming: &UserDetails) {
    if !incoming.email.is_empty() {
        existing.email = incoming.email.clone();
    }
    if !incoming.avatar_url.is_empty() {
        existing.avatar_url = incoming.avatar_url.clone();
    }
    if !incoming.url.is_empty() {
        existing.url = incoming.url.clone();
    }
    if !incoming.name.is_empty() {
        existing.name = incoming.name.clone();
    }
    if !incoming.login.is_empty() {
        existing.login = incoming.login.clone();
    }
}

/// Normalize a login to a stable cache key: lowercase, with runs of
/// non-alphanumeric characters collapsed to `-` and trimmed from the ends.
/// Identities from different sources collapse onto one entry when their
/// logins match up to this normalization.
pub fn normalize_login(login: &str) -> String {
    let mut key = String::with_capacity(login.len());
    for c in login.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c);
        } else if !key.ends_with('-') && !key.is_empty() {
            key.push('-');
        }
    }
    key.trim_end_matches('-').to_string()
}
