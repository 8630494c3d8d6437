use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast;

use crate::{
    ChangeAction, ChangeEvent, ChangedEntity, EngineError, ResultEngine,
    clock::{Clock, SystemClock},
    store::{DocumentStore, MemoryStore},
};

mod categories;
mod dashboard;
mod transactions;

pub use categories::BootstrapOutcome;
pub use dashboard::{Dashboard, DashboardOptions, RECENT_LIMIT, UPCOMING_DAYS};

/// Buffered change events per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 64;

/// The finance tracker service: category registry, transaction ledger and
/// dashboard composer over one injected store.
///
/// Construct it once and pass it by reference; it holds no per-user state.
#[derive(Debug)]
pub struct Engine {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// "Today" according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Receives a [`ChangeEvent`] after every successful write.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    fn notify(&self, user_id: &str, entity: ChangedEntity, action: ChangeAction, id: &str) {
        // No receivers is fine.
        let _ = self.events.send(ChangeEvent {
            user_id: user_id.to_string(),
            entity,
            action,
            id: id.to_string(),
        });
    }
}

/// Every user-scoped operation starts here.
fn require_user_id(user_id: &str) -> ResultEngine<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Unauthenticated);
    }
    Ok(trimmed)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    /// Pass the persistence collaborator. Defaults to an empty [`MemoryStore`].
    pub fn store(mut self, store: impl DocumentStore + 'static) -> EngineBuilder {
        self.store = Some(Arc::new(store));
        self
    }

    /// Same as [`store`](Self::store) for a store shared with other owners.
    pub fn shared_store(mut self, store: Arc<dyn DocumentStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Pass the clock. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: impl Clock + 'static) -> EngineBuilder {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Engine {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryStore::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            events,
        }
    }
}
