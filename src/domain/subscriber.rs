use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::SubscriberEmail;

/// A stored subscription. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub created_at: DateTime<Utc>,
}
