use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Subscriber, SubscriberEmail};
use crate::store::{StoreError, SubscriberStore};

/// Process-local store keyed by email.
///
/// The check and the write in `insert` happen under one lock, which gives
/// the same guarantee as a unique constraint.
#[derive(Default)]
pub struct InMemorySubscriberStore {
    subscribers: Mutex<HashMap<SubscriberEmail, Subscriber>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscribers.
    ///
    /// # Panics
    /// If a previous holder of the lock panicked.
    pub fn len(&self) -> usize {
        self.subscribers
            .lock()
            .expect("The subscriber map lock is poisoned.")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    #[tracing::instrument(name = "Find subscriber in memory", skip(self))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let subscribers = self
            .subscribers
            .lock()
            .map_err(|_| anyhow!("The subscriber map lock is poisoned."))?;
        Ok(subscribers.get(email).cloned())
    }

    #[tracing::instrument(name = "Insert subscriber in memory", skip(self))]
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscriber, StoreError> {
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|_| anyhow!("The subscriber map lock is poisoned."))?;
        if subscribers.contains_key(email) {
            return Err(StoreError::Duplicate);
        }
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            email: email.clone(),
            created_at: Utc::now(),
        };
        subscribers.insert(email.clone(), subscriber.clone());
        Ok(subscriber)
    }
}
