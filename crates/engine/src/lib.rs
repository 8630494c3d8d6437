//! Personal finance tracking core: per-user categories and income/expense
//! transactions over a pluggable document store, plus the derived views
//! (balance, monthly groups, category breakdown, running balance) shown by
//! the dashboard.

pub use categories::{Category, CategoryPatch, DEFAULT_CATEGORIES, DefaultCategory, NewCategory};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{EngineError, ErrorKind, STORE_FAILURE_MESSAGE};
pub use events::{ChangeAction, ChangeEvent, ChangedEntity};
pub use identity::{Identity, SessionIdentity, User};
pub use money::MoneyCents;
pub use ops::{
    BootstrapOutcome, Dashboard, DashboardOptions, Engine, EngineBuilder, RECENT_LIMIT,
    UPCOMING_DAYS,
};
pub use store::{DocumentStore, MemoryStore, SqlStore, StoreError};
pub use transactions::{
    NewTransaction, PAYMENT_METHODS, Transaction, TransactionFilter, TransactionKind,
    TransactionPatch,
};

pub mod aggregation;
mod categories;
mod clock;
pub mod documents;
mod error;
mod events;
mod identity;
mod money;
mod ops;
pub mod store;
mod transactions;
mod util;
pub mod validation;

pub type ResultEngine<T> = Result<T, EngineError>;
