//! In-memory store implementing every driven port.
//!
//! Used when no database URL is configured and by behaviour tests. All
//! writes are serialised behind one mutex; each unit of work runs against a
//! working copy of the state that replaces the committed copy only when the
//! work returns `Ok`, so a failure part way through leaves nothing behind.

mod badges;
mod habits;
mod ledger;
mod leaderboard;
mod state;
mod users;

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::ports::{
    BadgeRepositoryError, CompletionLedgerError, HabitRepositoryError,
    LeaderboardRepositoryError, UserRepositoryError,
};
use crate::domain::{BadgeId, BadgeValidationError, NewBadge};

use self::state::StoreState;

/// Step of a ledger unit of work, used to inject failures in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStep {
    /// Writing the completion row.
    InsertCompletion,
    /// Adding the earned points to the user's total.
    CreditPoints,
    /// Inserting award rows for newly earned badges.
    AwardBadges,
    /// Removing a completion row.
    DeleteCompletion,
    /// Subtracting a completion's points from the user's total.
    DebitPoints,
}

impl LedgerStep {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsertCompletion => "insert completion",
            Self::CreditPoints => "credit points",
            Self::AwardBadges => "award badges",
            Self::DeleteCompletion => "delete completion",
            Self::DebitPoints => "debit points",
        }
    }
}

impl fmt::Display for LedgerStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a previous holder of the state lock panicked.
#[derive(Debug)]
struct StoreLockPoisoned;

const POISONED: &str = "in-memory store lock poisoned";

macro_rules! poisoned_into_query_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<StoreLockPoisoned> for $error {
                fn from(_: StoreLockPoisoned) -> Self {
                    Self::query(POISONED)
                }
            }
        )*
    };
}

poisoned_into_query_error!(
    BadgeRepositoryError,
    CompletionLedgerError,
    HabitRepositoryError,
    LeaderboardRepositoryError,
    UserRepositoryError,
);

/// Mutex-guarded store shared by the in-memory adapters.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use habits_backend::outbound::memory::InMemoryStore;
/// use mockable::DefaultClock;
///
/// let store = InMemoryStore::with_default_badges(Arc::new(DefaultClock))
///     .expect("default badges are valid");
/// # let _ = store;
/// ```
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
    injected_failure: Mutex<Option<LedgerStep>>,
}

impl InMemoryStore {
    /// Empty store with no badges in the catalogue.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
            injected_failure: Mutex::new(None),
        }
    }

    /// Store seeded with the default badge catalogue.
    pub fn with_default_badges(clock: Arc<dyn Clock>) -> Result<Self, BadgeValidationError> {
        let mut state = StoreState::default();
        for badge in NewBadge::defaults()? {
            state.insert_badge(BadgeId::random(), badge);
        }
        Ok(Self {
            state: Mutex::new(state),
            clock,
            injected_failure: Mutex::new(None),
        })
    }

    /// Make the next ledger unit of work fail when it reaches `step`.
    ///
    /// The failure fires once; the work rolls back as a storage error would.
    #[cfg(any(test, feature = "test-support"))]
    pub fn fail_next_at(&self, step: LedgerStep) {
        let mut slot = self
            .injected_failure
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(step);
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    fn take_injected_failure(&self) -> Result<Option<LedgerStep>, StoreLockPoisoned> {
        self.injected_failure
            .lock()
            .map(|mut slot| slot.take())
            .map_err(|_| StoreLockPoisoned)
    }

    fn read<T, E>(&self, view: impl FnOnce(&StoreState) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreLockPoisoned>,
    {
        let state = self.state.lock().map_err(|_| StoreLockPoisoned)?;
        view(&*state)
    }

    /// Run `work` against a working copy and commit it only on success.
    fn transact<T, E>(&self, work: impl FnOnce(&mut StoreState) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreLockPoisoned>,
    {
        let mut committed = self.state.lock().map_err(|_| StoreLockPoisoned)?;
        let mut working = committed.clone();
        let outcome = work(&mut working)?;
        *committed = working;
        Ok(outcome)
    }
}

/// Fail with a query error when `step` is the injected failure point.
fn checkpoint(fail_at: Option<LedgerStep>, step: LedgerStep) -> Result<(), String> {
    if fail_at == Some(step) {
        return Err(format!("injected failure at {step}"));
    }
    Ok(())
}
