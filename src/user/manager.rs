//! The admin-only manager for the user collection.

use crate::{
    Error,
    session::Session,
    user::{NewUser, User, UserId, UserStore, UserUpdate},
};

/// Mediates access to the user collection.
///
/// Every operation requires the session to currently have admin rights: an
/// anonymous session, a non-admin session and an admin viewing the app as
/// another user are all rejected with [Error::Forbidden]. The manager takes
/// a snapshot of the session, callers build a fresh manager per request.
#[derive(Debug)]
pub struct UserManager<S> {
    store: S,
    session: Session,
}

impl<S: UserStore> UserManager<S> {
    /// Create a manager over `store` for the given session snapshot.
    pub fn new(store: S, session: Session) -> Self {
        Self { store, session }
    }

    fn authorize(&self) -> Result<&User, Error> {
        if !self.session.is_admin_effective() {
            return Err(Error::Forbidden);
        }

        self.session.authenticated_user().ok_or(Error::Forbidden)
    }

    /// Get all users, most recently created first.
    pub fn list(&self) -> Result<Vec<User>, Error> {
        self.authorize()?;

        self.store.list()
    }

    /// Get a single user by their ID.
    pub fn get(&self, id: UserId) -> Result<User, Error> {
        self.authorize()?;

        self.store.get(id)
    }

    /// Create a new user.
    ///
    /// Returns [Error::DuplicateUsername] if the username is already taken.
    pub fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        self.authorize()?;

        let user = self.store.create(new_user)?;
        tracing::info!("Created user \"{}\".", user.username);

        Ok(user)
    }

    /// Apply a partial update to the user with `id`.
    pub fn update(&mut self, id: UserId, update: UserUpdate) -> Result<(), Error> {
        self.authorize()?;

        self.store.update(id, update)
    }

    /// Delete the user with `id`.
    ///
    /// Returns [Error::SelfDeleteForbidden] when an admin tries to delete
    /// the account they are logged in with, so the application can never be
    /// left without its operating admin.
    pub fn delete(&mut self, id: UserId) -> Result<(), Error> {
        let acting_user = self.authorize()?;

        if acting_user.id == id {
            return Err(Error::SelfDeleteForbidden);
        }

        self.store.delete(id)?;
        tracing::info!("Deleted user {id}.");

        Ok(())
    }
}
