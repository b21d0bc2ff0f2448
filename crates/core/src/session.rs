//! Immutable session state and the capability resolver.
//!
//! A [`SessionState`] is built once per authenticated request (or client
//! session) and passed down explicitly. All capability checks go through it.

use serde::Serialize;

use crate::capability::{Capability, CapabilitySet};
use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// An authenticated user together with their effective capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: DbId,
    pub display_name: String,
    pub role: String,
    capabilities: CapabilitySet,
}

impl SessionUser {
    /// Build a session user from raw capability tokens.
    ///
    /// Unknown tokens are rejected. Admins are granted the full vocabulary
    /// regardless of the tokens supplied.
    pub fn from_tokens<S: AsRef<str>>(
        user_id: DbId,
        display_name: impl Into<String>,
        role: impl Into<String>,
        tokens: &[S],
    ) -> Result<Self, CoreError> {
        let capabilities = CapabilitySet::parse(tokens)?;
        Ok(Self::new(user_id, display_name, role, capabilities))
    }

    pub fn new(
        user_id: DbId,
        display_name: impl Into<String>,
        role: impl Into<String>,
        capabilities: CapabilitySet,
    ) -> Self {
        let role = role.into();
        let capabilities = if role == ROLE_ADMIN {
            CapabilitySet::all()
        } else {
            capabilities
        };
        Self {
            user_id,
            display_name: display_name.into(),
            role,
            capabilities,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// The effective capability set (the full vocabulary for admins).
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }
}

/// Who, if anyone, is using the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(SessionUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(user) => Some(user),
        }
    }

    /// Effective capabilities; empty for anonymous sessions.
    pub fn capabilities(&self) -> CapabilitySet {
        self.user()
            .map(|u| u.capabilities().clone())
            .unwrap_or_default()
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        match self.user() {
            None => false,
            Some(user) if user.is_admin() => true,
            Some(user) => user.capabilities().contains(capability),
        }
    }

    /// Check a raw token. Admins hold every token, including ones outside the
    /// known vocabulary; for everyone else unknown tokens never match.
    pub fn has_capability_token(&self, token: &str) -> bool {
        match self.user() {
            None => false,
            Some(user) if user.is_admin() => true,
            Some(user) => token
                .parse::<Capability>()
                .is_ok_and(|cap| user.capabilities().contains(cap)),
        }
    }

    /// `true` if any of `capabilities` is held. An empty list never matches
    /// (except for admins).
    pub fn has_any_capability(&self, capabilities: &[Capability]) -> bool {
        match self.user() {
            None => false,
            Some(user) if user.is_admin() => true,
            Some(_) => capabilities.iter().any(|c| self.has_capability(*c)),
        }
    }

    /// `true` if every one of `capabilities` is held. An empty list always
    /// matches for authenticated users.
    pub fn has_all_capabilities(&self, capabilities: &[Capability]) -> bool {
        match self.user() {
            None => false,
            Some(user) if user.is_admin() => true,
            Some(_) => capabilities.iter().all(|c| self.has_capability(*c)),
        }
    }
}

impl From<SessionUser> for SessionState {
    fn from(user: SessionUser) -> Self {
        SessionState::Authenticated(user)
    }
}
