//! services/companion/src/app/session.rs
//!
//! The signed-in state. It is read from the record store once at start-up
//! (`SessionContext::init`), changed only by `sign_in` and `logout`, and
//! shared by everything that needs to know who the user is.

use std::sync::{PoisonError, RwLock};

use mindcare_core::domain::{looks_like_admin, Session};
use mindcare_core::validation::{validate_sign_in, SignInForm};
use tracing::{info, warn};

use crate::error::AppError;
use crate::store::{keys, RecordStore};

pub struct SessionContext {
    store: RecordStore,
    current: RwLock<Session>,
}

impl SessionContext {
    /// Restores the session persisted by a previous run.
    pub fn init(store: RecordStore) -> Self {
        let session = load_session(&store);
        info!(
            authenticated = session.is_authenticated,
            admin = session.is_admin,
            "Session restored"
        );
        Self {
            store,
            current: RwLock::new(session),
        }
    }

    /// A copy of the current session.
    pub fn current(&self) -> Session {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Checks the sign-in form and, if every field passes, marks the user as
    /// signed in. The password is only checked for format; no account exists
    /// to check it against.
    pub fn sign_in(&self, form: &SignInForm) -> Result<Session, AppError> {
        validate_sign_in(form)?;

        // 1. Persist before touching memory. The flag is written last and the
        //    email is put back if it fails, so a failed save changes nothing.
        let previous_email = read_text(&self.store, keys::USER_EMAIL);
        self.store.set_text(keys::USER_EMAIL, &form.email)?;
        if let Err(e) = self.store.set_text(keys::IS_AUTHENTICATED, "true") {
            let restored = match previous_email.as_deref() {
                Some(email) => self.store.set_text(keys::USER_EMAIL, email),
                None => self.store.remove(keys::USER_EMAIL),
            };
            if restored.is_err() {
                warn!("Could not restore the stored email after a failed sign-in");
            }
            return Err(e.into());
        }

        // 2. The admin flag is never written here; it keeps whatever was stored.
        let session = load_session(&self.store);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = session.clone();
        info!(email = %form.email, admin = session.is_admin, "Signed in");
        Ok(session)
    }

    /// Clears every session key and returns to the anonymous state. The
    /// in-memory session is reset even if clearing storage fails.
    pub fn logout(&self) -> Result<(), AppError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Session::anonymous();

        let mut first_error = None;
        for key in keys::SESSION {
            if let Err(e) = self.store.remove(key) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            None => {
                info!("Signed out");
                Ok(())
            }
            Some(e) => Err(e.into()),
        }
    }

    /// Re-reads the session from storage, picking up a sign-in or logout made
    /// by another window.
    pub fn refresh(&self) -> Session {
        let session = load_session(&self.store);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = session.clone();
        session
    }
}

fn load_session(store: &RecordStore) -> Session {
    let is_authenticated = read_text(store, keys::IS_AUTHENTICATED).as_deref() == Some("true");
    let user_email = read_text(store, keys::USER_EMAIL).filter(|e| !e.is_empty());
    let is_admin = read_text(store, keys::IS_ADMIN).as_deref() == Some("true")
        || looks_like_admin(user_email.as_deref());
    Session {
        is_authenticated,
        user_email,
        is_admin,
    }
}

/// Session values are stored as bare strings. A JSON-quoted string is also
/// accepted and unquoted; anything else is taken verbatim.
fn read_text(store: &RecordStore, key: &str) -> Option<String> {
    let raw = match store.snapshot(key) {
        Ok(snapshot) => snapshot.contents?,
        Err(e) => {
            warn!(key, error = %e, "Could not read session value; treating it as absent");
            return None;
        }
    };
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::String(text)) => Some(text),
        Ok(serde_json::Value::Bool(flag)) => Some(flag.to_string()),
        _ => Some(raw.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryKeyValueStore;
    use assert_matches::assert_matches;
    use mindcare_core::ports::{KeyValueStore, PortError};
    use std::sync::Arc;

    fn form(email: &str) -> SignInForm {
        SignInForm {
            email: email.to_string(),
            password: "hunter22".to_string(),
            captcha_expected: "x7Kp2q".to_string(),
            captcha_entered: "x7Kp2q".to_string(),
        }
    }

    fn context() -> (Arc<MemoryKeyValueStore>, SessionContext) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let context = SessionContext::init(RecordStore::new(backend.clone()));
        (backend, context)
    }

    #[test]
    fn starts_anonymous_on_an_empty_store() {
        let (_, context) = context();
        assert_eq!(context.current(), Session::anonymous());
    }

    #[test]
    fn sign_in_persists_the_session() {
        let (backend, context) = context();
        let session = context.sign_in(&form("sam@uni.edu")).unwrap();

        assert!(session.is_authenticated);
        assert_eq!(session.user_email.as_deref(), Some("sam@uni.edu"));
        assert!(!session.is_admin);
        assert_eq!(context.current(), session);

        let restored = SessionContext::init(RecordStore::new(backend));
        assert_eq!(restored.current(), session);
    }

    #[test]
    fn bad_form_reports_every_field_and_stays_signed_out() {
        let (backend, context) = context();
        let mut bad = form("not-an-email");
        bad.password = "123".to_string();

        let err = context.sign_in(&bad).unwrap_err();
        assert_matches!(err, AppError::Validation(ref errors) if errors.len() == 2);
        assert_eq!(backend.read(keys::IS_AUTHENTICATED).unwrap().contents, None);
        assert!(!context.current().is_authenticated);
    }

    #[test]
    fn admin_follows_the_stored_flag_or_the_email() {
        let (backend, context) = context();
        assert!(context.sign_in(&form("admin@uni.edu")).unwrap().is_admin);

        backend.write(keys::IS_ADMIN, "true").unwrap();
        assert!(context.sign_in(&form("sam@uni.edu")).unwrap().is_admin);
    }

    #[test]
    fn logout_clears_every_session_key() {
        let (backend, context) = context();
        backend.write(keys::IS_ADMIN, "\"true\"").unwrap();
        context.sign_in(&form("sam@uni.edu")).unwrap();

        context.logout().unwrap();
        assert_eq!(context.current(), Session::anonymous());
        for key in keys::SESSION {
            assert_eq!(backend.read(key).unwrap().contents, None, "{key} still set");
        }
    }

    #[test]
    fn json_quoted_values_are_read_too() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        backend.write(keys::IS_AUTHENTICATED, "\"true\"").unwrap();
        backend.write(keys::USER_EMAIL, "\"sam@uni.edu\"").unwrap();
        let context = SessionContext::init(RecordStore::new(backend));
        let session = context.current();
        assert!(session.is_authenticated);
        assert_eq!(session.user_email.as_deref(), Some("sam@uni.edu"));
    }

    #[test]
    fn session_values_are_stored_unquoted() {
        let (backend, context) = context();
        context.sign_in(&form("sam@uni.edu")).unwrap();
        assert_eq!(
            backend.read(keys::IS_AUTHENTICATED).unwrap().contents.as_deref(),
            Some("true")
        );
        assert_eq!(
            backend.read(keys::USER_EMAIL).unwrap().contents.as_deref(),
            Some("sam@uni.edu")
        );
    }

    #[test]
    fn flag_that_does_not_fit_rolls_back_the_email() {
        // Room for the email (9 + 11 bytes) but not for the flag as well (15 + 4).
        let backend = Arc::new(MemoryKeyValueStore::with_quota(30));
        let context = SessionContext::init(RecordStore::new(backend.clone()));

        assert_matches!(
            context.sign_in(&form("sam@uni.edu")),
            Err(AppError::Port(PortError::QuotaExceeded { .. }))
        );
        assert_eq!(backend.read(keys::USER_EMAIL).unwrap().contents, None);
        let restored = SessionContext::init(RecordStore::new(backend));
        assert_eq!(restored.current(), Session::anonymous());
    }

    #[test]
    fn failed_save_leaves_the_user_signed_out() {
        let backend = Arc::new(MemoryKeyValueStore::with_quota(10));
        let context = SessionContext::init(RecordStore::new(backend));
        assert_matches!(
            context.sign_in(&form("sam@uni.edu")),
            Err(AppError::Port(PortError::QuotaExceeded { .. }))
        );
        assert!(!context.current().is_authenticated);
    }

    #[test]
    fn refresh_sees_a_logout_from_another_window() {
        let (backend, context) = context();
        context.sign_in(&form("sam@uni.edu")).unwrap();
        backend.delete(keys::IS_AUTHENTICATED).unwrap();
        assert!(!context.refresh().is_authenticated);
    }
}
