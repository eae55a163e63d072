//! Who may read and who may write a snippet.
//!
//! Reads are public. Writes need an authenticated caller who owns the
//! snippet. Anonymous writers are turned away with
//! [`ApiError::NotAuthenticated`] before ownership is looked at, so "no
//! credentials" and "wrong user" stay distinguishable.

use crate::{
    error::ApiError,
    models::{Snippet, UserData},
};

/// The identity a request runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(UserData),
}

impl Caller {
    pub fn user(&self) -> Option<&UserData> {
        match self {
            Caller::Anonymous => None,
            Caller::User(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

/// Whether every snippet must have an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerMode {
    /// Only authenticated callers create snippets, and they own them.
    Required,
    /// Anonymous callers may create ownerless snippets, which anyone may edit.
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct OwnershipPolicy {
    mode: OwnerMode,
}

impl OwnershipPolicy {
    pub fn new(mode: OwnerMode) -> Self {
        Self { mode }
    }

    /// Reads are public in both owner modes.
    pub fn may_read(&self, _caller: &Caller, _snippet: &Snippet) -> bool {
        true
    }

    pub fn may_write(&self, caller: &Caller, snippet: &Snippet) -> bool {
        match (snippet.owner_id, caller.user()) {
            (None, _) => self.mode == OwnerMode::Optional,
            (Some(owner), Some(user)) => owner == user.id,
            (Some(_), None) => false,
        }
    }

    /// Gate applied to every mutating request before the target is loaded.
    pub fn check_mutation(&self, caller: &Caller) -> Result<(), ApiError> {
        match (self.mode, caller) {
            (OwnerMode::Required, Caller::Anonymous) => Err(ApiError::NotAuthenticated),
            _ => Ok(()),
        }
    }

    /// The owner a new snippet gets when `caller` creates it.
    pub fn owner_for_create<'a>(&self, caller: &'a Caller) -> Result<Option<&'a UserData>, ApiError> {
        self.check_mutation(caller)?;
        Ok(caller.user())
    }

    /// Object-level check for retrieve and highlight.
    pub fn authorize_read(&self, caller: &Caller, snippet: &Snippet) -> Result<(), ApiError> {
        if self.may_read(caller, snippet) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Object-level check for update and delete.
    pub fn authorize_write(&self, caller: &Caller, snippet: &Snippet) -> Result<(), ApiError> {
        self.check_mutation(caller)?;
        if self.may_write(caller, snippet) {
            Ok(())
        } else if caller.is_authenticated() {
            Err(ApiError::Forbidden)
        } else {
            Err(ApiError::NotAuthenticated)
        }
    }
}
