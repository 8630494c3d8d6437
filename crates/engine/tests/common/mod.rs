#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use engine::{
    DocumentStore, Engine, FixedClock, MemoryStore, MoneyCents, NewCategory, NewTransaction,
    StoreError, TransactionKind,
    store::{Collection, StoreKey, StoreResult},
};

pub const USER: &str = "alice";

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn today() -> NaiveDate {
    date("2024-03-15")
}

pub fn engine() -> Engine {
    Engine::builder()
        .store(MemoryStore::new())
        .clock(FixedClock(today()))
        .build()
}

pub async fn salary_category(engine: &Engine) -> String {
    engine
        .create_category(USER, &NewCategory::new("Salário", "Monthly pay", "#4caf50"))
        .await
        .unwrap()
}

pub fn income(units: i64, day: &str, category_id: &str) -> NewTransaction {
    NewTransaction::new(
        TransactionKind::Income,
        MoneyCents::from_units(units),
        day,
        category_id,
        "Paycheck",
    )
}

pub fn expense(units: i64, day: &str, category_id: &str) -> NewTransaction {
    NewTransaction::new(
        TransactionKind::Expense,
        MoneyCents::from_units(units),
        day,
        category_id,
        "Groceries",
    )
}

/// Memory store whose reads or writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    /// When non-zero, every Nth `put` fails.
    fail_every_nth_put: AtomicUsize,
    puts: AtomicUsize,
}

impl FlakyStore {
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_every_nth_put(&self, n: usize) {
        self.fail_every_nth_put.store(n, Ordering::SeqCst);
    }

    fn check_put(&self) -> StoreResult<()> {
        let count = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        let n = self.fail_every_nth_put.load(Ordering::SeqCst);
        if n > 0 && count % n == 0 {
            return Err(StoreError::Backend("disk quota exceeded".to_string()));
        }
        Self::check(&self.fail_writes)
    }

    fn check(flag: &AtomicBool) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn put(
        &self,
        collection: Collection,
        user_id: &str,
        id: Option<&str>,
        value: Value,
    ) -> StoreResult<String> {
        self.check_put()?;
        self.inner.put(collection, user_id, id, value).await
    }

    async fn get(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> StoreResult<BTreeMap<String, Value>> {
        Self::check(&self.fail_reads)?;
        self.inner.get(collection, user_id).await
    }

    async fn patch(&self, key: &StoreKey, partial: Value) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.patch(key, partial).await
    }

    async fn delete(&self, key: &StoreKey) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.delete(key).await
    }
}

pub fn flaky_engine() -> (Engine, Arc<FlakyStore>) {
    let store = Arc::new(FlakyStore::default());
    let engine = Engine::builder()
        .shared_store(store.clone())
        .clock(FixedClock(today()))
        .build();
    (engine, store)
}
