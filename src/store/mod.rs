//! Persistence collaborator for subscribers.
//!
//! Every implementation must enforce email uniqueness itself, at write
//! time. The lookup in [`SubscriberStore::find_by_email`] is only an early
//! exit for the common case; concurrent inserts of one address are resolved
//! by the store returning [`StoreError::Duplicate`] to all but one caller.

mod in_memory;
mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Subscriber, SubscriberEmail};
use crate::errors::error_chain_fmt;

pub use in_memory::InMemorySubscriberStore;
pub use postgres::PostgresSubscriberStore;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("A subscriber with this email already exists.")]
    Duplicate,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl fmt::Debug for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Look up a subscriber by exact (normalized) email.
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError>;

    /// Persist a new subscriber with a fresh id and the current time.
    ///
    /// Fails with [`StoreError::Duplicate`] when `email` is already stored.
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscriber, StoreError>;
}
