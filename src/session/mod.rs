//! The session and authorization model.
//!
//! The application is single tenant: one session exists per process, shared
//! by every request, and survives restarts through the persisted session
//! slot (see [store]). The session holds the authenticated user and an
//! optional impersonation target. All query scoping downstream derives from
//! the *effective* user and the *effective* admin flag, never from the raw
//! authenticated user.

use std::sync::{Arc, RwLock};

use crate::user::User;

mod impersonate;
mod log_in;
mod log_out;
mod middleware;
pub(crate) mod store;

pub(crate) use impersonate::{access_as_endpoint, return_to_admin_endpoint};
pub(crate) use log_in::{get_log_in_page, post_log_in};
pub(crate) use log_out::post_log_out;
pub(crate) use middleware::session_guard;

/// The process-wide session: who is logged in and who, if anyone, an admin
/// is currently viewing the app as.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
    viewing_as: Option<User>,
}

impl Session {
    /// A session with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session with `user` logged in.
    pub fn logged_in(user: User) -> Self {
        Self {
            user: Some(user),
            viewing_as: None,
        }
    }

    /// Replace the session with a fresh one for `user`, clearing any
    /// impersonation left over from a previous log-in.
    pub fn log_in(&mut self, user: User) {
        self.user = Some(user);
        self.viewing_as = None;
    }

    /// Clear the session, including any impersonation.
    pub fn log_out(&mut self) {
        self.user = None;
        self.viewing_as = None;
    }

    /// Start viewing the app as `target`.
    ///
    /// This is a no-op unless the authenticated user is an admin. While the
    /// impersonation is active the session behaves exactly like a session
    /// for `target`: admin rights are suppressed even though the underlying
    /// authenticated user is still an admin.
    pub fn access_as(&mut self, target: User) {
        if self.user.as_ref().is_some_and(|user| user.is_admin) {
            self.viewing_as = Some(target);
        }
    }

    /// Stop impersonating and return to the authenticated user's own view.
    ///
    /// Always succeeds, even when no impersonation is active.
    pub fn return_to_admin(&mut self) {
        self.viewing_as = None;
    }

    /// The user that actually logged in, ignoring impersonation.
    pub fn authenticated_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The user whose permissions and record ownership govern all queries:
    /// the impersonation target if one is set, otherwise the authenticated
    /// user.
    pub fn effective_user(&self) -> Option<&User> {
        self.viewing_as.as_ref().or(self.user.as_ref())
    }

    /// Whether the session currently has admin rights.
    ///
    /// Impersonation suppresses admin rights, regardless of whether the
    /// impersonation target is itself an admin.
    pub fn is_admin_effective(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin) && self.viewing_as.is_none()
    }

    /// Whether an admin is currently viewing the app as another user.
    pub fn is_impersonating(&self) -> bool {
        self.viewing_as.is_some()
    }
}

/// A cloneable handle to the process-wide session.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionHandle(Arc<RwLock<Session>>);

impl SessionHandle {
    /// Wrap an initial session, typically rehydrated from the persisted
    /// session slot at startup.
    pub(crate) fn new(session: Session) -> Self {
        Self(Arc::new(RwLock::new(session)))
    }

    /// A snapshot of the current session.
    pub(crate) fn current(&self) -> Session {
        self.0.read().unwrap().clone()
    }

    /// Run `operation` against the live session.
    pub(crate) fn with_mut(&self, operation: impl FnOnce(&mut Session)) {
        operation(&mut self.0.write().unwrap());
    }
}


#[cfg(test)]
mod session_tests {
    use super::{Session, test_utils::test_user};

    #[test]
    fn anonymous_session_has_no_effective_user() {
        let session = Session::anonymous();

        assert_eq!(session.effective_user(), None);
        assert!(!session.is_admin_effective());
    }

    #[test]
    fn logged_in_user_is_effective_user() {
        let user = test_user(1, "alice", false);

        let session = Session::logged_in(user.clone());

        assert_eq!(session.effective_user(), Some(&user));
        assert!(!session.is_admin_effective());
    }

    #[test]
    fn admin_session_is_admin_effective() {
        let admin = test_user(1, "admin", true);

        let session = Session::logged_in(admin);

        assert!(session.is_admin_effective());
    }

    #[test]
    fn admin_can_access_as_other_user() {
        let admin = test_user(1, "admin", true);
        let target = test_user(2, "bob", false);

        let mut session = Session::logged_in(admin.clone());
        session.access_as(target.clone());

        assert_eq!(session.effective_user(), Some(&target));
        assert_eq!(session.authenticated_user(), Some(&admin));
        assert!(session.is_impersonating());
    }

    #[test]
    fn impersonation_suppresses_admin_rights() {
        let admin = test_user(1, "admin", true);
        // The target being an admin themselves must make no difference.
        let other_admin = test_user(2, "root", true);

        let mut session = Session::logged_in(admin);
        session.access_as(other_admin);

        assert!(!session.is_admin_effective());
    }

    #[test]
    fn non_admin_cannot_access_as_other_user() {
        let user = test_user(1, "alice", false);
        let target = test_user(2, "bob", false);

        let mut session = Session::logged_in(user.clone());
        session.access_as(target);

        assert_eq!(session.effective_user(), Some(&user));
        assert!(!session.is_impersonating());
    }

    #[test]
    fn return_to_admin_restores_original_session() {
        let admin = test_user(1, "admin", true);
        let target = test_user(2, "bob", false);

        let mut session = Session::logged_in(admin.clone());
        session.access_as(target);
        session.return_to_admin();

        assert_eq!(session.effective_user(), Some(&admin));
        assert!(session.is_admin_effective());
    }

    #[test]
    fn return_to_admin_without_impersonation_is_harmless() {
        let admin = test_user(1, "admin", true);

        let mut session = Session::logged_in(admin.clone());
        session.return_to_admin();

        assert_eq!(session.effective_user(), Some(&admin));
    }

    #[test]
    fn log_out_clears_impersonation() {
        let admin = test_user(1, "admin", true);
        let target = test_user(2, "bob", false);

        let mut session = Session::logged_in(admin);
        session.access_as(target);
        session.log_out();

        assert_eq!(session.effective_user(), None);
        assert!(!session.is_impersonating());
    }
}
