//! Authentication primitives and the navigation gate.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! The gate itself is a pure three-state decision so both the HTTP
//! middleware and tests exercise exactly the same logic.

use std::fmt;

use zeroize::Zeroizing;

use super::identity::{EmailAddress, IdentityId};
use super::profile::UserProfile;
use super::role::Role;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials passed to the identity provider.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lowercased).
/// - `password` is non-empty but otherwise kept verbatim to avoid surprising
///   credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email =
            EmailAddress::parse(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for identity lookups.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Resolved authentication state for the current navigation.
///
/// The three states mirror the portal's gate: no session, a session whose
/// identity has no profile record yet (invite not redeemed), and a session
/// with a resolved profile.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// No valid session.
    Unauthenticated,
    /// Valid session, but the identity has no profile record yet.
    NeedsSetup {
        /// Identity id from the session.
        identity: IdentityId,
        /// Email the identity authenticated with.
        email: EmailAddress,
    },
    /// Valid session with a resolved profile.
    Authorized(UserProfile),
}

/// Outcome of gating one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the navigation through.
    Allow,
    /// Redirect to the login entry point.
    ToLogin,
    /// Redirect to the profile-setup flow.
    ToSetup,
    /// Redirect to the default landing route.
    ToLanding,
}

impl GateDecision {
    /// Redirect target for this decision, if it is a redirect.
    #[must_use]
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::ToLogin => Some("/login"),
            Self::ToSetup => Some("/setup"),
            Self::ToLanding => Some("/"),
        }
    }
}

/// Gate one navigation attempt against the route's allowed roles.
///
/// Evaluated on every navigation; nothing here is cached beyond the profile
/// cache's own staleness window.
///
/// # Examples
/// ```
/// use backend::domain::{AuthState, GateDecision, Role, evaluate_gate};
///
/// let decision = evaluate_gate(&AuthState::Unauthenticated, &[Role::Admin]);
/// assert_eq!(decision, GateDecision::ToLogin);
/// ```
#[must_use]
pub fn evaluate_gate(state: &AuthState, allowed_roles: &[Role]) -> GateDecision {
    match state {
        AuthState::Unauthenticated => GateDecision::ToLogin,
        AuthState::NeedsSetup { .. } => GateDecision::ToSetup,
        AuthState::Authorized(profile) => {
            if allowed_roles.is_empty() || allowed_roles.contains(&profile.role) {
                GateDecision::Allow
            } else {
                GateDecision::ToLanding
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail)]
    #[case("not-an-address", "pw", LoginValidationError::InvalidEmail)]
    #[case("user@firm.example", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err =
            LoginCredentials::try_from_parts(email, password).expect_err("invalid inputs fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_normalise_email() {
        let creds = LoginCredentials::try_from_parts("  Ada@Firm.Example ", "secret")
            .expect("valid inputs");
        assert_eq!(creds.email().as_str(), "ada@firm.example");
        assert_eq!(creds.password(), "secret");
    }

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: IdentityId::new("uid-1").expect("valid id"),
            email: EmailAddress::parse("ada@firm.example").expect("valid address"),
            name: "Ada".into(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn gate_redirects_missing_session_to_login() {
        let decision = evaluate_gate(&AuthState::Unauthenticated, &[Role::Client]);
        assert_eq!(decision, GateDecision::ToLogin);
        assert_eq!(decision.redirect_target(), Some("/login"));
    }

    #[rstest]
    fn gate_redirects_unresolved_profile_to_setup() {
        let state = AuthState::NeedsSetup {
            identity: IdentityId::new("uid-1").expect("valid id"),
            email: EmailAddress::parse("ada@firm.example").expect("valid address"),
        };
        assert_eq!(evaluate_gate(&state, &[Role::Admin]), GateDecision::ToSetup);
    }

    #[rstest]
    fn gate_redirects_wrong_role_to_landing() {
        let state = AuthState::Authorized(profile(Role::Client));
        let decision = evaluate_gate(&state, &[Role::Admin]);
        assert_eq!(decision, GateDecision::ToLanding);
        assert_eq!(decision.redirect_target(), Some("/"));
    }

    #[rstest]
    fn gate_allows_matching_role() {
        let state = AuthState::Authorized(profile(Role::Admin));
        assert_eq!(evaluate_gate(&state, &[Role::Admin]), GateDecision::Allow);
    }

    #[rstest]
    fn empty_allow_list_admits_any_resolved_profile() {
        let state = AuthState::Authorized(profile(Role::Professional));
        assert_eq!(evaluate_gate(&state, &[]), GateDecision::Allow);
    }
}
