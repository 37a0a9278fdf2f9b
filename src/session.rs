//! Local user store and session lifecycle.
//!
//! Registered users live in `users.json` and the current session in
//! `session.json`, both under the app config directory. Passwords are only
//! base64-obfuscated, not hashed; treat the store as a convenience, not a
//! security boundary. A session exists from login/signup until logout
//! removes it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use color_eyre::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigManager;

const USERS_FILE: &str = "users.json";
const SESSION_FILE: &str = "session.json";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Obfuscated, not hashed
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Which form field an auth error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account storage error: {0}")]
    Store(String),
}

impl AuthError {
    /// The field the error message should be attached to
    pub fn field(&self) -> AuthField {
        match self {
            Self::NameTooShort => AuthField::Name,
            Self::InvalidEmail | Self::EmailTaken => AuthField::Email,
            Self::PasswordTooShort | Self::InvalidCredentials | Self::Store(_) => {
                AuthField::Password
            }
            Self::PasswordMismatch => AuthField::Confirm,
        }
    }
}

pub fn obfuscate(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}

fn issue_token(email: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    STANDARD.encode(format!("{}:{}", email, stamp))
}

fn valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN)
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    #[default]
    Unrated,
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unrated => "Password Strength",
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }
}

/// Five-requirement strength heuristic: length, uppercase, lowercase,
/// digit, special character. Two or fewer met is weak, all five strong.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength::Unrated;
    }
    let requirements = [
        password.len() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| "!@#$%^&*".contains(c)),
    ];
    match requirements.iter().filter(|met| **met).count() {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

/// File-backed user store under the app config directory
pub struct UserStore {
    config: ConfigManager,
}

impl UserStore {
    pub fn new(config: ConfigManager) -> Self {
        Self { config }
    }

    fn users_path(&self) -> PathBuf {
        self.config.config_path(USERS_FILE)
    }

    fn session_path(&self) -> PathBuf {
        self.config.config_path(SESSION_FILE)
    }

    pub fn load_users(&self) -> Result<Vec<StoredUser>> {
        let path = self.users_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_users(&self, users: &[StoredUser]) -> Result<()> {
        self.config.ensure_config_dir()?;
        let content = serde_json::to_string_pretty(users)?;
        std::fs::write(self.users_path(), content)?;
        Ok(())
    }

    /// The saved session, if one exists and parses
    pub fn load_session(&self) -> Option<Session> {
        let content = std::fs::read_to_string(self.session_path()).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("discarding unreadable session file: {}", e);
                None
            }
        }
    }

    fn save_session(&self, session: &Session) -> Result<()> {
        self.config.ensure_config_dir()?;
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(self.session_path(), content)?;
        Ok(())
    }

    /// Remove the session record. Missing file is not an error.
    pub fn clear_session(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let users = self
            .load_users()
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let user = users
            .iter()
            .find(|u| u.email == email)
            .ok_or(AuthError::InvalidCredentials)?;
        if user.password != obfuscate(password) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            token: issue_token(&user.email),
        };
        self.save_session(&session)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(session)
    }

    /// Register a new account and log it in immediately
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Session, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.chars().count() < 2 {
            return Err(AuthError::NameTooShort);
        }
        if !valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < 6 {
            return Err(AuthError::PasswordTooShort);
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let mut users = self
            .load_users()
            .map_err(|e| AuthError::Store(e.to_string()))?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let user = StoredUser {
            id: chrono::Utc::now().timestamp_millis(),
            name: name.to_string(),
            email: email.to_string(),
            password: obfuscate(password),
        };
        users.push(user.clone());
        self.save_users(&users)
            .map_err(|e| AuthError::Store(e.to_string()))?;

        let session = Session {
            user_id: user.id,
            name: user.name,
            email: user.email,
            token: issue_token(email),
        };
        self.save_session(&session)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(session)
    }

    /// Destroy the current session
    pub fn logout(&self) -> Result<()> {
        self.clear_session()
    }
}
