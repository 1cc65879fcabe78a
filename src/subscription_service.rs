use std::fmt;
use std::sync::Arc;

use crate::domain::{EMAIL_FIELD, SubscribeRequest, Subscriber, SubscriberEmail};
use crate::errors::error_chain_fmt;
use crate::store::{StoreError, SubscriberStore};

// Error type for the three ways a subscription attempt can fail.
#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{message}")]
    ValidationError {
        message: String,
        field: Option<&'static str>,
    },
    #[error("Email already subscribed")]
    ConflictError,
    #[error("Failed to store the subscription.")]
    InternalError(#[source] anyhow::Error),
}

impl SubscribeError {
    /// Whether retrying the same call might succeed. Only internal failures
    /// are transient; the other two are deterministic for a given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubscribeError::InternalError(_))
    }
}

impl fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for SubscribeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => SubscribeError::ConflictError,
            StoreError::Unexpected(e) => SubscribeError::InternalError(e),
        }
    }
}

/// Subscription intake: validate, check for a duplicate, insert.
///
/// Holds only the persistence handle it was built with. Cloning is cheap
/// and every clone talks to the same store.
#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriberStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriberStore>) -> Self {
        Self { store }
    }

    /// Register `candidate.email` as a new subscriber.
    /// # Arguments
    /// * `candidate` - The request carrying the email to register.
    /// # Returns
    /// The stored subscriber, or a `SubscribeError` describing why nothing was stored.
    #[tracing::instrument(
        name = "Subscribe a new email",
        skip(self, candidate),
        fields(subscriber_email = %candidate.email)
    )]
    pub async fn subscribe(
        &self,
        candidate: SubscribeRequest,
    ) -> Result<Subscriber, SubscribeError> {
        let email = SubscriberEmail::parse(candidate.email).map_err(|message| {
            SubscribeError::ValidationError {
                message,
                field: Some(EMAIL_FIELD),
            }
        })?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(SubscribeError::ConflictError);
        }

        // A concurrent call may have inserted the same email since the
        // lookup; the store reports that as Duplicate, which maps to Conflict.
        let subscriber = self.store.insert(&email).await?;
        Ok(subscriber)
    }
}
