//! Environment-driven session configuration.
//!
//! Centralises the session toggles so they are validated consistently and
//! can be tested in isolation with a mock environment. Debug builds tolerate
//! missing values and warn; release builds require them.

use actix_web::cookie::Key;
use mockable::Env;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session settings derived from configuration toggles.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Observed value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Attempted path.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Attempted path.
        path: PathBuf,
        /// Observed length.
        length: usize,
        /// Required length.
        min_len: usize,
    },
    /// Release builds must not allow ephemeral session keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = cookie_secure_from_env(env, mode)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;
    Ok(SessionSettings { key, cookie_secure })
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => parse_bool(&value).map_or_else(
            || {
                if mode.is_debug() {
                    warn!(value = %value, "invalid SESSION_COOKIE_SECURE; defaulting to secure");
                    Ok(true)
                } else {
                    Err(SessionConfigError::InvalidEnv {
                        name: COOKIE_SECURE_ENV,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            },
            Ok,
        ),
        None => {
            if mode.is_debug() {
                warn!("SESSION_COOKIE_SECURE not set; defaulting to secure");
                Ok(true)
            } else {
                Err(SessionConfigError::MissingEnv {
                    name: COOKIE_SECURE_ENV,
                })
            }
        }
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(true) => {
                if mode.is_debug() {
                    Ok(true)
                } else {
                    Err(SessionConfigError::EphemeralNotAllowed)
                }
            }
            Some(false) => Ok(false),
            None => {
                if mode.is_debug() {
                    warn!(value = %value, "invalid SESSION_ALLOW_EPHEMERAL; defaulting to disabled");
                    Ok(false)
                } else {
                    Err(SessionConfigError::InvalidEnv {
                        name: ALLOW_EPHEMERAL_ENV,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            }
        },
        None => Ok(mode.is_debug()),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            if bytes.len() < SESSION_KEY_MIN_LEN && !mode.is_debug() {
                let length = bytes.len();
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) => {
            if allow_ephemeral {
                warn!(path = %path.display(), "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead { path, source })
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(values: Vec<(&'static str, &'static str)>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        });
        env
    }

    #[rstest]
    fn debug_mode_defaults_to_ephemeral_key() {
        let env = env_with(vec![("SESSION_KEY_FILE", "/definitely/not/here")]);
        let settings =
            session_settings_from_env(&env, BuildMode::Debug).expect("debug settings build");
        assert!(settings.cookie_secure);
    }

    #[rstest]
    fn release_mode_requires_explicit_toggles() {
        let env = env_with(vec![]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .expect_err("release requires toggles");
        assert!(matches!(err, SessionConfigError::MissingEnv { .. }));
    }

    #[rstest]
    fn release_mode_refuses_ephemeral_keys() {
        let env = env_with(vec![
            ("SESSION_COOKIE_SECURE", "1"),
            ("SESSION_ALLOW_EPHEMERAL", "1"),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .expect_err("ephemeral keys are dev-only");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_mode_rejects_short_keys() {
        let key_path = std::env::temp_dir().join("portal-session-key-short");
        std::fs::write(&key_path, vec![b'a'; 8]).expect("write key");
        let path_value: &'static str =
            Box::leak(key_path.to_string_lossy().into_owned().into_boxed_str());
        let env = env_with(vec![
            ("SESSION_COOKIE_SECURE", "1"),
            ("SESSION_ALLOW_EPHEMERAL", "0"),
            ("SESSION_KEY_FILE", path_value),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .expect_err("short key refused");
        assert!(matches!(err, SessionConfigError::KeyTooShort { .. }));
        std::fs::remove_file(&key_path).expect("remove key");
    }

    #[rstest]
    #[case("1", Some(true))]
    #[case("yes", Some(true))]
    #[case("0", Some(false))]
    #[case("no", Some(false))]
    #[case("sometimes", None)]
    fn bool_parsing(#[case] value: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(value), expected);
    }
}
