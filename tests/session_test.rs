use admitui::config::ConfigManager;
use admitui::session::{obfuscate, AuthError, UserStore};
use tempfile::TempDir;

fn setup_store() -> (TempDir, UserStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = UserStore::new(ConfigManager::with_dir(temp_dir.path().to_path_buf()));
    (temp_dir, store)
}

#[test]
fn test_signup_then_login_round_trip() {
    let (_temp_dir, store) = setup_store();

    let session = store
        .signup("Asha", "asha@example.com", "hunter22", "hunter22")
        .expect("signup succeeds");
    assert_eq!(session.name, "Asha");
    assert_eq!(session.email, "asha@example.com");

    // Signup logs in immediately
    let restored = store.load_session().expect("session persisted");
    assert_eq!(restored.email, "asha@example.com");

    store.logout().expect("logout succeeds");
    assert!(store.load_session().is_none());

    let session = store
        .login("asha@example.com", "hunter22")
        .expect("login succeeds");
    assert_eq!(session.name, "Asha");
    assert!(store.load_session().is_some());
}

#[test]
fn test_stored_password_is_obfuscated_not_plaintext() {
    let (_temp_dir, store) = setup_store();
    store
        .signup("Asha", "asha@example.com", "hunter22", "hunter22")
        .expect("signup succeeds");

    let users = store.load_users().expect("users load");
    assert_eq!(users.len(), 1);
    assert_ne!(users[0].password, "hunter22");
    assert_eq!(users[0].password, obfuscate("hunter22"));
}

#[test]
fn test_signup_validation_errors() {
    let (_temp_dir, store) = setup_store();

    assert!(matches!(
        store.signup("A", "a@b.co", "secret1", "secret1"),
        Err(AuthError::NameTooShort)
    ));
    assert!(matches!(
        store.signup("Asha", "not-an-email", "secret1", "secret1"),
        Err(AuthError::InvalidEmail)
    ));
    assert!(matches!(
        store.signup("Asha", "a@b.co", "short", "short"),
        Err(AuthError::PasswordTooShort)
    ));
    assert!(matches!(
        store.signup("Asha", "a@b.co", "secret1", "secret2"),
        Err(AuthError::PasswordMismatch)
    ));
    // Nothing was persisted along the way
    assert!(store.load_users().expect("users load").is_empty());
}

#[test]
fn test_duplicate_email_is_rejected() {
    let (_temp_dir, store) = setup_store();
    store
        .signup("Asha", "asha@example.com", "hunter22", "hunter22")
        .expect("first signup succeeds");
    assert!(matches!(
        store.signup("Other", "asha@example.com", "password9", "password9"),
        Err(AuthError::EmailTaken)
    ));
    assert_eq!(store.load_users().expect("users load").len(), 1);
}

#[test]
fn test_login_rejects_wrong_password_and_unknown_email() {
    let (_temp_dir, store) = setup_store();
    store
        .signup("Asha", "asha@example.com", "hunter22", "hunter22")
        .expect("signup succeeds");

    assert!(matches!(
        store.login("asha@example.com", "wrong"),
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        store.login("nobody@example.com", "hunter22"),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn test_clear_session_is_idempotent() {
    let (_temp_dir, store) = setup_store();
    store.clear_session().expect("clearing nothing is fine");
    store
        .signup("Asha", "asha@example.com", "hunter22", "hunter22")
        .expect("signup succeeds");
    store.clear_session().expect("clear succeeds");
    store.clear_session().expect("second clear succeeds");
    assert!(store.load_session().is_none());
}
