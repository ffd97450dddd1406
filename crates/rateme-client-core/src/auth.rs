use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key under which the per-tab session keeps the authenticated login.
pub const LOGIN_STORAGE_KEY: &str = "login";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("login must not be empty")]
    EmptyLogin,
    #[error("password must not be empty")]
    EmptyPassword,
}

#[derive(Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub login: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(name: &str, login: &str, password: &str) -> Result<Self, CredentialsError> {
        let name = normalize_required(name).ok_or(CredentialsError::EmptyName)?;
        let login = normalize_login(login)?;
        let password = require_password(password)?;
        Ok(Self {
            name,
            login,
            password,
        })
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(login: &str, password: &str) -> Result<Self, CredentialsError> {
        Ok(Self {
            login: normalize_login(login)?,
            password: require_password(password)?,
        })
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn normalize_login(raw: &str) -> Result<String, CredentialsError> {
    normalize_required(raw).ok_or(CredentialsError::EmptyLogin)
}

fn normalize_required(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Passwords are sent byte-for-byte; only emptiness is checked.
fn require_password(raw: &str) -> Result<String, CredentialsError> {
    if raw.is_empty() {
        return Err(CredentialsError::EmptyPassword);
    }
    Ok(raw.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated {
        login: String,
    },
}

impl SessionState {
    pub fn login(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { login } => Some(login.as_str()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Transient per-tab storage for the authenticated login.
pub trait SessionStore {
    type Error: fmt::Display;

    fn load_login(&self) -> Result<Option<String>, Self::Error>;
    fn persist_login(&self, login: &str) -> Result<(), Self::Error>;
    fn clear_login(&self) -> Result<(), Self::Error>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    login: RefCell<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_login(login: impl Into<String>) -> Self {
        Self {
            login: RefCell::new(Some(login.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    type Error = Infallible;

    fn load_login(&self) -> Result<Option<String>, Self::Error> {
        Ok(self.login.borrow().clone())
    }

    fn persist_login(&self, login: &str) -> Result<(), Self::Error> {
        *self.login.borrow_mut() = Some(login.to_string());
        Ok(())
    }

    fn clear_login(&self) -> Result<(), Self::Error> {
        *self.login.borrow_mut() = None;
        Ok(())
    }
}

/// Owns the session for the lifetime of a page: read once on `init`,
/// replaced by `establish`, wiped by `teardown`.
#[derive(Debug)]
pub struct SessionContext<S> {
    store: S,
    state: RefCell<SessionState>,
}

impl<S: SessionStore> SessionContext<S> {
    pub fn init(store: S) -> Self {
        let state = match store.load_login() {
            Ok(Some(login)) => match normalize_login(&login) {
                Ok(login) => SessionState::Authenticated { login },
                Err(_) => SessionState::Anonymous,
            },
            Ok(None) => SessionState::Anonymous,
            Err(error) => {
                tracing::warn!(%error, "failed to read stored session; starting anonymous");
                SessionState::Anonymous
            }
        };
        tracing::debug!(authenticated = state.is_authenticated(), "session initialized");
        Self {
            store,
            state: RefCell::new(state),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn login(&self) -> Option<String> {
        self.state.borrow().login().map(ToString::to_string)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The in-memory session flips even when the store write fails, so the
    /// current page stays usable; the error is returned for reporting.
    pub fn establish(&self, login: &str) -> Result<(), S::Error> {
        *self.state.borrow_mut() = SessionState::Authenticated {
            login: login.to_string(),
        };
        self.store.persist_login(login)
    }

    pub fn teardown(&self) -> Result<(), S::Error> {
        *self.state.borrow_mut() = SessionState::Anonymous;
        self.store.clear_login()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        type Error = String;

        fn load_login(&self) -> Result<Option<String>, Self::Error> {
            Err("storage disabled".to_string())
        }

        fn persist_login(&self, _login: &str) -> Result<(), Self::Error> {
            Err("storage disabled".to_string())
        }

        fn clear_login(&self) -> Result<(), Self::Error> {
            Err("storage disabled".to_string())
        }
    }

    #[test]
    fn register_request_requires_every_field() {
        assert_eq!(
            RegisterRequest::new("", "alice", "pw"),
            Err(CredentialsError::EmptyName)
        );
        assert_eq!(
            RegisterRequest::new("Alice", "  ", "pw"),
            Err(CredentialsError::EmptyLogin)
        );
        assert_eq!(
            RegisterRequest::new("Alice", "alice", ""),
            Err(CredentialsError::EmptyPassword)
        );
    }

    #[test]
    fn credentials_trim_login_but_keep_password_bytes() {
        let request = LoginRequest::new("  alice ", " secret ").expect("valid credentials");
        assert_eq!(request.login, "alice");
        assert_eq!(request.password, " secret ");
    }

    #[test]
    fn debug_output_redacts_password() {
        let request = RegisterRequest::new("Alice", "alice", "hunter2").expect("valid request");
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn init_reads_existing_login() {
        let context = SessionContext::init(MemorySessionStore::with_login("alice"));
        assert_eq!(
            context.state(),
            SessionState::Authenticated {
                login: "alice".to_string()
            }
        );
    }

    #[test]
    fn init_treats_blank_login_as_anonymous() {
        let context = SessionContext::init(MemorySessionStore::with_login("   "));
        assert_eq!(context.state(), SessionState::Anonymous);
    }

    #[test]
    fn establish_then_teardown_round_trips_store() {
        let context = SessionContext::init(MemorySessionStore::default());
        assert_eq!(context.login(), None);

        context.establish("alice").expect("memory store");
        assert_eq!(context.login().as_deref(), Some("alice"));
        assert_eq!(
            context.store().load_login().expect("memory store").as_deref(),
            Some("alice")
        );

        context.teardown().expect("memory store");
        assert_eq!(context.state(), SessionState::Anonymous);
        assert_eq!(context.store().load_login().expect("memory store"), None);
    }

    #[test]
    fn storage_failures_do_not_block_state_transitions() {
        let context = SessionContext::init(BrokenStore);
        assert_eq!(context.state(), SessionState::Anonymous);

        assert!(context.establish("alice").is_err());
        assert!(context.state().is_authenticated());

        assert!(context.teardown().is_err());
        assert_eq!(context.state(), SessionState::Anonymous);
    }
}
