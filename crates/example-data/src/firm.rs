//! Plain data structures describing a generated demo firm.

use serde::{Deserialize, Serialize};

/// Portal role, mirrored as a plain enum to stay backend-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoRole {
    /// Firm administrator.
    Admin,
    /// Staff professional.
    Professional,
    /// Client portal user.
    Client,
}

impl DemoRole {
    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Professional => "professional",
            Self::Client => "client",
        }
    }
}

/// One generated portal user with login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoUser {
    /// Deterministic identity id (UUID string).
    pub identity_id: String,
    /// Lowercased email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role the profile carries.
    pub role: DemoRole,
    /// Demo password accepted by the dev identity provider.
    pub password: String,
}

/// One generated client account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoClientAccount {
    /// Deterministic record id (UUID string).
    pub id: String,
    /// Company name.
    pub name: String,
    /// Contact address.
    pub contact_email: String,
    /// Portal login linked to the account, when it has one.
    pub linked_user: Option<DemoUser>,
    /// Indices into [`DemoFirm::professionals`] assigned to this account.
    pub assigned_professionals: Vec<usize>,
}

/// A full generated firm: one admin, staff, and client accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoFirm {
    /// The administrator account.
    pub admin: DemoUser,
    /// Staff professionals.
    pub professionals: Vec<DemoUser>,
    /// Client accounts, some with linked portal users.
    pub clients: Vec<DemoClientAccount>,
}
