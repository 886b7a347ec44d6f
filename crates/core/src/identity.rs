// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated learner identity.
//!
//! Authentication happens elsewhere; the engine only asks whether someone
//! is signed in before accepting a mutation.

use std::sync::RwLock;

/// Source of the current learner id.
pub trait IdentityProvider: Send + Sync {
    /// Returns the signed-in learner id, or `None` when signed out.
    fn current_user(&self) -> Option<String>;
}

/// Mutable session holding the signed-in learner.
#[derive(Debug, Default)]
pub struct Session {
    user: RwLock<Option<String>>,
}

impl Session {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already signed in as `user_id`.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Session { user: RwLock::new(Some(user_id.into())) }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let mut user = self.user.write().unwrap_or_else(|e| e.into_inner());
        *user = Some(user_id.into());
    }

    pub fn sign_out(&self) {
        let mut user = self.user.write().unwrap_or_else(|e| e.into_inner());
        *user = None;
    }
}

impl IdentityProvider for Session {
    fn current_user(&self) -> Option<String> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for std::sync::Arc<T> {
    fn current_user(&self) -> Option<String> {
        (**self).current_user()
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
