//! Authenticated-user session context.
//!
//! A [`Session`] is an explicit value: hydrate it from storage once at start-up,
//! pass it to whatever needs it, and clear it on sign-out.
use serde::{Deserialize, Serialize};

use crate::KeyValueStore;
use crate::error::{GatewayError, StoreError};
use crate::gateway::SignupRequest;
use crate::store::{read_json, remove, write_json};

pub const AUTH_KEY: &str = "cinebook.auth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Persisted `{token, user}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRecord {
    pub token: String,
    pub user: User,
}

pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw sign-up form contents before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the message to show when a field is missing, the passwords
    /// differ or the password is too short.
    pub fn validate(&self) -> Result<SignupRequest, &'static str> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err("Please fill in all fields");
        }
        if self.password != self.password_confirm {
            return Err("Passwords do not match");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 8 characters long");
        }
        Ok(SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<AuthRecord>,
}

impl Session {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { auth: None }
    }

    /// Restore the session from storage. An unreadable record is removed and
    /// the session starts anonymous.
    pub fn hydrate<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match read_json::<S, AuthRecord>(store, AUTH_KEY) {
            Ok(auth) => Self { auth },
            Err(err) => {
                log::warn!("discarding stored session: {err}");
                if let Err(err) = remove(store, AUTH_KEY) {
                    log::warn!("could not clear stored session: {err}");
                }
                Self::anonymous()
            }
        }
    }

    /// Persist and adopt a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored; the session is unchanged then.
    pub fn sign_in<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        token: String,
        user: User,
    ) -> Result<(), StoreError> {
        let record = AuthRecord { token, user };
        write_json(store, AUTH_KEY, &record)?;
        self.auth = Some(record);
        Ok(())
    }

    /// Forget the user locally and in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be removed; the in-memory
    /// session is cleared regardless.
    pub fn sign_out<S: KeyValueStore + ?Sized>(&mut self, store: &S) -> Result<(), StoreError> {
        self.auth = None;
        remove(store, AUTH_KEY)
    }

    /// Drop the session when the backend rejected its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be removed.
    pub fn expire_if_unauthorized<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        err: &GatewayError,
    ) -> Result<bool, StoreError> {
        if *err != GatewayError::Unauthorized || !self.is_authenticated() {
            return Ok(false);
        }
        log::warn!("session token rejected by the backend, signing out");
        self.sign_out(store)?;
        Ok(true)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }
}
