//! Login/signup modal state and focus management.

use crate::session::{password_strength, AuthError, AuthField, PasswordStrength};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AuthFocus {
    Name,
    #[default]
    Email,
    Password,
    Confirm,
    Submit,
    SwitchTab,
    Cancel,
}

#[derive(Default)]
pub struct AuthModal {
    pub active: bool,
    pub tab: AuthTab,
    pub focus: AuthFocus,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub error: Option<(AuthField, String)>,
    pub strength: PasswordStrength,
}

impl AuthModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the modal. The login form always shows first.
    pub fn open(&mut self) {
        self.active = true;
        self.tab = AuthTab::Login;
        self.focus = AuthFocus::Email;
        self.error = None;
    }

    /// Close and reset all form fields
    pub fn close(&mut self) {
        self.active = false;
        self.reset_forms();
    }

    pub fn reset_forms(&mut self) {
        self.name.clear();
        self.email.clear();
        self.password.clear();
        self.confirm.clear();
        self.error = None;
        self.strength = PasswordStrength::Unrated;
        self.tab = AuthTab::Login;
        self.focus = AuthFocus::Email;
    }

    pub fn switch_tab(&mut self) {
        self.tab = match self.tab {
            AuthTab::Login => AuthTab::Signup,
            AuthTab::Signup => AuthTab::Login,
        };
        self.error = None;
        self.focus = match self.tab {
            AuthTab::Login => AuthFocus::Email,
            AuthTab::Signup => AuthFocus::Name,
        };
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.tab {
            AuthTab::Login => match self.focus {
                AuthFocus::Email => AuthFocus::Password,
                AuthFocus::Password => AuthFocus::Submit,
                AuthFocus::Submit => AuthFocus::SwitchTab,
                AuthFocus::SwitchTab => AuthFocus::Cancel,
                _ => AuthFocus::Email,
            },
            AuthTab::Signup => match self.focus {
                AuthFocus::Name => AuthFocus::Email,
                AuthFocus::Email => AuthFocus::Password,
                AuthFocus::Password => AuthFocus::Confirm,
                AuthFocus::Confirm => AuthFocus::Submit,
                AuthFocus::Submit => AuthFocus::SwitchTab,
                AuthFocus::SwitchTab => AuthFocus::Cancel,
                AuthFocus::Cancel => AuthFocus::Name,
            },
        };
    }

    pub fn prev_focus(&mut self) {
        self.focus = match self.tab {
            AuthTab::Login => match self.focus {
                AuthFocus::Email => AuthFocus::Cancel,
                AuthFocus::Password => AuthFocus::Email,
                AuthFocus::Submit => AuthFocus::Password,
                AuthFocus::SwitchTab => AuthFocus::Submit,
                _ => AuthFocus::SwitchTab,
            },
            AuthTab::Signup => match self.focus {
                AuthFocus::Name => AuthFocus::Cancel,
                AuthFocus::Email => AuthFocus::Name,
                AuthFocus::Password => AuthFocus::Email,
                AuthFocus::Confirm => AuthFocus::Password,
                AuthFocus::Submit => AuthFocus::Confirm,
                AuthFocus::SwitchTab => AuthFocus::Submit,
                AuthFocus::Cancel => AuthFocus::SwitchTab,
            },
        };
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            AuthFocus::Name => Some(&mut self.name),
            AuthFocus::Email => Some(&mut self.email),
            AuthFocus::Password => Some(&mut self.password),
            AuthFocus::Confirm => Some(&mut self.confirm),
            _ => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.field_mut() {
            field.push(c);
            self.error = None;
            self.update_strength();
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.field_mut() {
            field.pop();
            self.error = None;
            self.update_strength();
        }
    }

    fn update_strength(&mut self) {
        if self.tab == AuthTab::Signup {
            self.strength = password_strength(&self.password);
        }
    }

    pub fn set_error(&mut self, error: &AuthError) {
        self.error = Some((error.field(), error.to_string()));
    }

    /// Error message attached to the given field, if any
    pub fn field_error(&self, field: AuthField) -> Option<&str> {
        match &self.error {
            Some((f, message)) if *f == field => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_shows_login_first() {
        let mut modal = AuthModal::new();
        modal.tab = AuthTab::Signup;
        modal.open();
        assert!(modal.active);
        assert_eq!(modal.tab, AuthTab::Login);
        assert_eq!(modal.focus, AuthFocus::Email);
    }

    #[test]
    fn test_close_resets_forms() {
        let mut modal = AuthModal::new();
        modal.open();
        modal.insert_char('a');
        modal.switch_tab();
        modal.close();
        assert!(!modal.active);
        assert!(modal.email.is_empty());
        assert_eq!(modal.tab, AuthTab::Login);
        assert!(modal.error.is_none());
    }

    #[test]
    fn test_login_focus_cycle() {
        let mut modal = AuthModal::new();
        modal.open();
        let mut seen = vec![modal.focus];
        for _ in 0..5 {
            modal.next_focus();
            seen.push(modal.focus);
        }
        assert_eq!(
            seen,
            vec![
                AuthFocus::Email,
                AuthFocus::Password,
                AuthFocus::Submit,
                AuthFocus::SwitchTab,
                AuthFocus::Cancel,
                AuthFocus::Email,
            ]
        );
    }

    #[test]
    fn test_signup_strength_updates_on_password_edit() {
        let mut modal = AuthModal::new();
        modal.open();
        modal.switch_tab();
        assert_eq!(modal.tab, AuthTab::Signup);
        modal.focus = AuthFocus::Password;
        for c in "Abcdefg1!".chars() {
            modal.insert_char(c);
        }
        assert_eq!(modal.strength, PasswordStrength::Strong);
    }

    #[test]
    fn test_error_attaches_to_field() {
        let mut modal = AuthModal::new();
        modal.set_error(&AuthError::EmailTaken);
        assert_eq!(
            modal.field_error(AuthField::Email),
            Some("Email already registered")
        );
        assert!(modal.field_error(AuthField::Password).is_none());
        // Editing clears the error
        modal.focus = AuthFocus::Email;
        modal.insert_char('x');
        assert!(modal.error.is_none());
    }
}
