//! The session-aware manager for transactions.
//!
//! The manager is where record visibility and permissions are enforced: the
//! stores below it answer any query, the pages above it never talk to a
//! store directly.

use crate::{
    Error,
    session::Session,
    transaction::{
        Transaction, TransactionDraft, TransactionId, TransactionPatch, TransactionStore,
        TransactionWithOwner,
    },
    user::User,
};

use super::Status;

/// Aggregate figures over a set of transactions, shown as the dashboard
/// stat cards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    /// The sum of all amounts.
    pub total_amount: f64,
    /// How many transactions there are in total.
    pub total_count: usize,
    /// How many transactions are awaiting settlement.
    pub awaiting_count: usize,
    /// The sum of amounts awaiting settlement.
    pub awaiting_amount: f64,
    /// How many transactions settled.
    pub withdrawn_count: usize,
    /// The sum of settled amounts.
    pub withdrawn_amount: f64,
    /// How many transactions failed.
    pub failed_count: usize,
    /// The sum of failed amounts.
    pub failed_amount: f64,
    /// The share of settled transactions, as a percentage of the total.
    /// Zero when there are no transactions.
    pub success_rate_percent: f64,
}

/// Mediates access to the transaction collection for one session.
///
/// Visibility follows the session's effective user: an admin sees every
/// record, everyone else only their own. The manager caches the records it
/// fetched so the statistics and the table for one request come from the
/// same snapshot.
#[derive(Debug)]
pub struct TransactionManager<S> {
    store: S,
    session: Session,
    transactions: Vec<TransactionWithOwner>,
}

impl<S: TransactionStore> TransactionManager<S> {
    /// Create a manager over `store` for the given session snapshot.
    pub fn new(store: S, session: Session) -> Self {
        Self {
            store,
            session,
            transactions: Vec::new(),
        }
    }

    fn effective_user(&self) -> Result<&User, Error> {
        self.session.effective_user().ok_or(Error::Forbidden)
    }

    /// Fetch the transactions visible to this session into the cache.
    ///
    /// An anonymous session sees an empty list rather than an error, the
    /// page guard has already dealt with it.
    pub fn load(&mut self) -> Result<(), Error> {
        self.transactions = match self.session.effective_user() {
            None => Vec::new(),
            Some(_) if self.session.is_admin_effective() => self.store.list_all()?,
            Some(user) => self.store.list_by_owner(user.id)?,
        };

        Ok(())
    }

    /// The transactions fetched by the last [load](Self::load).
    pub fn transactions(&self) -> &[TransactionWithOwner] {
        &self.transactions
    }

    /// Get a single transaction, enforcing visibility.
    ///
    /// # Errors
    ///
    /// Returns [Error::Forbidden] when the record exists but belongs to
    /// another user and the session does not have admin rights.
    pub fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let effective_user = self.effective_user()?;
        let transaction = self.store.get(id)?;

        if !self.session.is_admin_effective() && transaction.owner_id != effective_user.id {
            return Err(Error::Forbidden);
        }

        Ok(transaction)
    }

    /// Create a transaction owned by the session's effective user.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateCode] when the draft carries a code another
    /// transaction already uses. The pre-check keeps the common case
    /// friendly, the UNIQUE constraint in the store closes the race.
    pub fn create(&mut self, draft: TransactionDraft) -> Result<Transaction, Error> {
        let owner_id = self.effective_user()?.id;

        if let Some(code) = &draft.code
            && self.store.find_by_code(code)?.is_some()
        {
            return Err(Error::DuplicateCode(code.clone()));
        }

        let transaction = self.store.create(owner_id, draft)?;
        tracing::info!("Created transaction {}.", transaction.id);
        self.load()?;

        Ok(transaction)
    }

    /// Apply a partial update to the transaction with `id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Forbidden] when the record belongs to another user
    /// and the session does not have admin rights, [Error::NegativeAmount]
    /// for a negative amount and [Error::DuplicateCode] when the new code is
    /// already taken by a different transaction.
    pub fn update(&mut self, id: TransactionId, patch: TransactionPatch) -> Result<(), Error> {
        // Also enforces ownership.
        self.get(id)?;

        if let Some(amount) = patch.amount
            && amount < 0.0
        {
            return Err(Error::NegativeAmount(amount));
        }

        if let Some(Some(code)) = &patch.code
            && let Some(existing) = self.store.find_by_code(code)?
            && existing.id != id
        {
            return Err(Error::DuplicateCode(code.clone()));
        }

        self.store.update(id, patch)?;
        self.load()
    }

    /// Delete the transaction with `id`. Admin only.
    pub fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        if !self.session.is_admin_effective() {
            return Err(Error::Forbidden);
        }

        self.store.delete(id)?;
        tracing::info!("Deleted transaction {id}.");
        self.load()
    }

    /// Aggregate figures over the cached transactions.
    pub fn statistics(&self) -> Statistics {
        let mut statistics = Statistics {
            total_count: self.transactions.len(),
            ..Default::default()
        };

        for entry in &self.transactions {
            statistics.total_amount += entry.transaction.amount;

            match entry.transaction.status {
                Status::Awaiting => {
                    statistics.awaiting_count += 1;
                    statistics.awaiting_amount += entry.transaction.amount;
                }
                Status::Withdrawn => {
                    statistics.withdrawn_count += 1;
                    statistics.withdrawn_amount += entry.transaction.amount;
                }
                Status::Failed => {
                    statistics.failed_count += 1;
                    statistics.failed_amount += entry.transaction.amount;
                }
            }
        }

        if statistics.total_count > 0 {
            statistics.success_rate_percent =
                statistics.withdrawn_count as f64 / statistics.total_count as f64 * 100.0;
        }

        statistics
    }
}

#[cfg(test)]
mod transaction_manager_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        session::Session,
        transaction::{
            Platform, SqliteTransactionStore, Status, TransactionDraft, TransactionId,
            TransactionPatch, TransactionStore, store::create_transaction_table,
        },
        user::{NewUser, SqliteUserStore, User, UserStore, create_user_table},
    };

    use super::TransactionManager;

    struct Fixture {
        transaction_store: SqliteTransactionStore,
        admin: User,
        alice: User,
        bob: User,
    }

    fn get_fixture() -> Fixture {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");
        create_transaction_table(&connection).expect("Could not create transaction table");

        let connection = Arc::new(Mutex::new(connection));
        let mut user_store = SqliteUserStore::new(connection.clone());

        let mut create_user = |username: &str, is_admin: bool| {
            user_store
                .create(NewUser {
                    username: username.to_owned(),
                    secret: "hunter2".to_owned(),
                    display_name: username.to_owned(),
                    is_admin,
                })
                .expect("Could not create test user")
        };

        Fixture {
            admin: create_user("admin", true),
            alice: create_user("alice", false),
            bob: create_user("bob", false),
            transaction_store: SqliteTransactionStore::new(connection),
        }
    }

    fn draft(code: &str, amount: f64, status: Status) -> TransactionDraft {
        TransactionDraft::new(
            code,
            Platform::new("96B").unwrap(),
            amount,
            date!(2024 - 01 - 15),
            status,
            "",
        )
        .unwrap()
    }

    fn manager_for(
        fixture: &Fixture,
        session: Session,
    ) -> TransactionManager<SqliteTransactionStore> {
        TransactionManager::new(fixture.transaction_store.clone(), session)
    }

    #[test]
    fn admin_sees_all_transactions() {
        let fixture = get_fixture();
        let mut store = fixture.transaction_store.clone();
        store
            .create(fixture.alice.id, draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();
        store
            .create(fixture.bob.id, draft("TRX002", 20.0, Status::Awaiting))
            .unwrap();

        let mut manager = manager_for(&fixture, Session::logged_in(fixture.admin.clone()));
        manager.load().unwrap();

        assert_eq!(manager.transactions().len(), 2);
    }

    #[test]
    fn non_admin_sees_only_their_own_transactions() {
        let fixture = get_fixture();
        let mut store = fixture.transaction_store.clone();
        store
            .create(fixture.alice.id, draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();
        store
            .create(fixture.bob.id, draft("TRX002", 20.0, Status::Awaiting))
            .unwrap();

        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        manager.load().unwrap();

        assert_eq!(manager.transactions().len(), 1);
        assert_eq!(manager.transactions()[0].owner.id, fixture.alice.id);
    }

    #[test]
    fn impersonating_admin_sees_the_target_users_transactions() {
        let fixture = get_fixture();
        let mut store = fixture.transaction_store.clone();
        store
            .create(fixture.alice.id, draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();
        store
            .create(fixture.bob.id, draft("TRX002", 20.0, Status::Awaiting))
            .unwrap();

        let mut session = Session::logged_in(fixture.admin.clone());
        session.access_as(fixture.bob.clone());
        let mut manager = manager_for(&fixture, session);
        manager.load().unwrap();

        assert_eq!(manager.transactions().len(), 1);
        assert_eq!(manager.transactions()[0].owner.id, fixture.bob.id);
    }

    #[test]
    fn anonymous_session_sees_no_transactions() {
        let fixture = get_fixture();
        let mut store = fixture.transaction_store.clone();
        store
            .create(fixture.alice.id, draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        let mut manager = manager_for(&fixture, Session::anonymous());
        manager.load().unwrap();

        assert!(manager.transactions().is_empty());
    }

    #[test]
    fn create_assigns_the_effective_user_as_owner() {
        let fixture = get_fixture();

        let mut session = Session::logged_in(fixture.admin.clone());
        session.access_as(fixture.alice.clone());
        let mut manager = manager_for(&fixture, session);

        let transaction = manager
            .create(draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        assert_eq!(transaction.owner_id, fixture.alice.id);
    }

    #[test]
    fn create_rejects_duplicate_code_without_inserting() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        manager
            .create(draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        let result = manager.create(draft("TRX001", 20.0, Status::Awaiting));

        assert_eq!(result, Err(Error::DuplicateCode("TRX001".to_owned())));
        assert_eq!(manager.transactions().len(), 1);
    }

    #[test]
    fn create_allows_reusing_an_empty_code() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));

        manager.create(draft("", 10.0, Status::Awaiting)).unwrap();
        manager.create(draft("", 20.0, Status::Awaiting)).unwrap();

        assert_eq!(manager.transactions().len(), 2);
    }

    #[test]
    fn owner_can_update_their_own_transaction() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        let transaction = manager
            .create(draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        manager
            .update(
                transaction.id,
                TransactionPatch {
                    status: Some(Status::Withdrawn),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(
            manager.get(transaction.id).unwrap().status,
            Status::Withdrawn
        );
    }

    #[test]
    fn non_owner_cannot_update_someone_elses_transaction() {
        let fixture = get_fixture();
        let mut store = fixture.transaction_store.clone();
        let transaction = store
            .create(fixture.alice.id, draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        let mut manager = manager_for(&fixture, Session::logged_in(fixture.bob.clone()));
        let result = manager.update(
            transaction.id,
            TransactionPatch {
                status: Some(Status::Failed),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::Forbidden));
    }

    #[test]
    fn admin_can_update_anyones_transaction() {
        let fixture = get_fixture();
        let mut store = fixture.transaction_store.clone();
        let transaction = store
            .create(fixture.alice.id, draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        let mut manager = manager_for(&fixture, Session::logged_in(fixture.admin.clone()));
        manager
            .update(
                transaction.id,
                TransactionPatch {
                    amount: Some(25.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(manager.get(transaction.id).unwrap().amount, 25.0);
    }

    #[test]
    fn update_rejects_negative_amount() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        let transaction = manager
            .create(draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        let result = manager.update(
            transaction.id,
            TransactionPatch {
                amount: Some(-5.0),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::NegativeAmount(-5.0)));
    }

    #[test]
    fn update_rejects_code_taken_by_another_transaction() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        manager
            .create(draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();
        let second_transaction = manager
            .create(draft("TRX002", 20.0, Status::Awaiting))
            .unwrap();

        let result = manager.update(
            second_transaction.id,
            TransactionPatch {
                code: Some(Some("TRX001".to_owned())),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::DuplicateCode("TRX001".to_owned())));
    }

    #[test]
    fn update_keeping_own_code_is_not_a_duplicate() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        let transaction = manager
            .create(draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        manager
            .update(
                transaction.id,
                TransactionPatch {
                    code: Some(Some("TRX001".to_owned())),
                    amount: Some(15.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(manager.get(transaction.id).unwrap().amount, 15.0);
    }

    #[test]
    fn only_admins_can_delete_transactions() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        let transaction = manager
            .create(draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        assert_eq!(manager.delete(transaction.id), Err(Error::Forbidden));

        let mut admin_manager = manager_for(&fixture, Session::logged_in(fixture.admin.clone()));
        admin_manager.delete(transaction.id).unwrap();

        assert_eq!(
            admin_manager.get(transaction.id),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn impersonating_admin_cannot_delete() {
        let fixture = get_fixture();
        let mut store = fixture.transaction_store.clone();
        let transaction = store
            .create(fixture.alice.id, draft("TRX001", 10.0, Status::Awaiting))
            .unwrap();

        let mut session = Session::logged_in(fixture.admin.clone());
        session.access_as(fixture.alice.clone());
        let mut manager = manager_for(&fixture, session);

        assert_eq!(manager.delete(transaction.id), Err(Error::Forbidden));
    }

    #[test]
    fn delete_fails_with_non_existent_id() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.admin.clone()));

        assert_eq!(
            manager.delete(TransactionId::new(42)),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn statistics_aggregate_the_cached_transactions() {
        let fixture = get_fixture();
        let mut manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));
        manager
            .create(draft("TRX001", 1500.0, Status::Withdrawn))
            .unwrap();
        manager
            .create(draft("TRX002", 850.75, Status::Withdrawn))
            .unwrap();
        manager
            .create(draft("TRX003", 100.0, Status::Awaiting))
            .unwrap();
        manager
            .create(draft("TRX004", 49.25, Status::Failed))
            .unwrap();

        let statistics = manager.statistics();

        assert_eq!(statistics.total_count, 4);
        assert_eq!(statistics.total_amount, 2500.0);
        assert_eq!(statistics.awaiting_count, 1);
        assert_eq!(statistics.awaiting_amount, 100.0);
        assert_eq!(statistics.withdrawn_count, 2);
        assert_eq!(statistics.withdrawn_amount, 2350.75);
        assert_eq!(statistics.failed_count, 1);
        assert_eq!(statistics.failed_amount, 49.25);
        assert_eq!(statistics.success_rate_percent, 50.0);
    }

    #[test]
    fn statistics_over_no_transactions_are_zero() {
        let fixture = get_fixture();
        let manager = manager_for(&fixture, Session::logged_in(fixture.alice.clone()));

        let statistics = manager.statistics();

        assert_eq!(statistics.total_count, 0);
        assert_eq!(statistics.success_rate_percent, 0.0);
    }
}
