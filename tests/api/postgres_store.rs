use std::sync::Arc;

use claim::{assert_matches, assert_none, assert_ok};

use landing_backend::domain::SubscriberEmail;
use landing_backend::store::{PostgresSubscriberStore, StoreError, SubscriberStore};
use landing_backend::subscription_service::{SubscribeError, SubscriptionService};

use crate::helpers::{configure_database, test_configuration};

async fn postgres_store() -> PostgresSubscriberStore {
    let mut configuration = test_configuration();
    configure_database(&mut configuration.database).await
}

fn email(s: &str) -> SubscriberEmail {
    SubscriberEmail::parse(s.to_string()).unwrap()
}

#[actix_web::test]
#[ignore = "requires a running Postgres instance"]
async fn inserted_subscriber_is_found_by_email() {
    // Arrange
    let store = postgres_store().await;

    // Act
    let inserted = assert_ok!(store.insert(&email("a@example.com")).await);

    // Assert
    let found = store.find_by_email(&email("a@example.com")).await.unwrap();
    assert_eq!(found.map(|s| s.id), Some(inserted.id));
    assert_none!(store.find_by_email(&email("b@example.com")).await.unwrap());
}

#[actix_web::test]
#[ignore = "requires a running Postgres instance"]
async fn unique_constraint_rejects_a_second_insert() {
    // Arrange
    let store = postgres_store().await;
    store.insert(&email("a@example.com")).await.unwrap();

    // Act
    let outcome = store.insert(&email("a@example.com")).await;

    // Assert
    assert_matches!(outcome, Err(StoreError::Duplicate));
}

#[actix_web::test]
#[ignore = "requires a running Postgres instance"]
async fn concurrent_subscriptions_are_resolved_by_the_constraint() {
    // Arrange
    let service = SubscriptionService::new(Arc::new(postgres_store().await));
    let request = || landing_backend::domain::SubscribeRequest {
        email: "a@example.com".to_string(),
    };

    // Act
    let outcomes =
        futures::future::join_all((0..10).map(|_| service.subscribe(request()))).await;

    // Assert
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| matches!(o, Err(SubscribeError::ConflictError)))
            .count(),
        9
    );
}
