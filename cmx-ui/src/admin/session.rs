//! Admin session lifecycle
//!
//! The original kept the bearer token in browser-global storage. Here the
//! token lives in one explicit session object owned by the application
//! state: set on login, cleared on logout or the first 401 from any
//! curation call.

use std::sync::RwLock;

/// Holds the curation API bearer token, if a session is open
#[derive(Debug, Default)]
pub struct AdminSession {
    token: RwLock<Option<String>>,
}

impl AdminSession {
    pub fn open(&self, token: String) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
    }

    pub fn close(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    /// Current token, or `None` when logged out
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    pub fn is_open(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_cycle() {
        let session = AdminSession::default();
        assert!(!session.is_open());

        session.open("tok".to_string());
        assert_eq!(session.token().as_deref(), Some("tok"));

        session.close();
        assert!(session.token().is_none());
    }
}
