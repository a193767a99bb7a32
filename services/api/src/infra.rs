use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use salescomp::commissions::{
    CommissionConfig, MonthRef, SaleCategory, SaleRecord, SaleStore, StoreError, Target,
    TargetStore, User, UserDirectory, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_user_id() -> UserId {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UserId(format!("user-{id:06}"))
}

#[derive(Default)]
pub(crate) struct InMemoryUserDirectory {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub(crate) fn add(&self, user: User) -> User {
        let mut guard = self.users.lock().expect("user directory mutex poisoned");
        guard.insert(user.id.clone(), user.clone());
        user
    }

    pub(crate) fn find_by_email(&self, email: &str) -> Option<User> {
        let guard = self.users.lock().expect("user directory mutex poisoned");
        guard.values().find(|user| user.email == email).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let guard = self.users.lock().expect("user directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default)]
pub(crate) struct InMemorySaleStore {
    records: Mutex<Vec<SaleRecord>>,
}

impl InMemorySaleStore {
    pub(crate) fn add(&self, record: SaleRecord) {
        let mut guard = self.records.lock().expect("sale store mutex poisoned");
        guard.push(record);
    }

    pub(crate) fn record_count(&self) -> usize {
        self.records.lock().expect("sale store mutex poisoned").len()
    }
}

#[async_trait]
impl SaleStore for InMemorySaleStore {
    async fn find_by_user_and_range(
        &self,
        user_id: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>, StoreError> {
        let guard = self.records.lock().expect("sale store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| {
                record.user_id == *user_id && record.date >= start && record.date <= end
            })
            .cloned()
            .collect())
    }

    async fn find_matching(
        &self,
        user_id: &UserId,
        amount: f64,
        date: DateTime<Utc>,
        category: SaleCategory,
    ) -> Result<Option<SaleRecord>, StoreError> {
        let guard = self.records.lock().expect("sale store mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| {
                record.user_id == *user_id
                    && record.amount == amount
                    && record.date == date
                    && record.category == category
            })
            .cloned())
    }

    async fn insert(&self, record: SaleRecord) -> Result<SaleRecord, StoreError> {
        let mut guard = self.records.lock().expect("sale store mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryTargetStore {
    records: Mutex<Vec<Target>>,
}

impl InMemoryTargetStore {
    /// At most one target exists per (user, month, year); setting again
    /// replaces the previous amount.
    pub(crate) fn set(&self, target: Target) {
        let mut guard = self.records.lock().expect("target store mutex poisoned");
        if let Some(existing) = guard.iter_mut().find(|existing| {
            existing.user_id == target.user_id
                && existing.month == target.month
                && existing.year == target.year
        }) {
            *existing = target;
        } else {
            guard.push(target);
        }
    }
}

#[async_trait]
impl TargetStore for InMemoryTargetStore {
    async fn find_one(
        &self,
        user_id: &UserId,
        month: MonthRef,
    ) -> Result<Option<Target>, StoreError> {
        let guard = self.records.lock().expect("target store mutex poisoned");
        Ok(guard
            .iter()
            .find(|target| {
                target.user_id == *user_id
                    && target.month == month.month()
                    && target.year == month.year()
            })
            .cloned())
    }
}

pub(crate) fn default_commission_config() -> CommissionConfig {
    CommissionConfig::default()
}
