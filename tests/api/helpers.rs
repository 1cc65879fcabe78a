use std::sync::{Arc, LazyLock};
use std::{env, io};

use actix_web::rt;
use reqwest::{Client, Response};
use sqlx::{Connection, Executor, PgConnection};
use uuid::Uuid;

use landing_backend::configuration::{DatabaseSettings, Settings, StorageBackend, get_configuration};
use landing_backend::startup::{Application, get_connection_pool};
use landing_backend::store::{InMemorySubscriberStore, PostgresSubscriberStore, SubscriberStore};
use landing_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the tracing stack is only initialized once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, io::sink);
        init_subscriber(subscriber);
    };
});

// Structure representing the test application.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemorySubscriberStore>,
    pub api_client: Client,
}

impl TestApp {
    /// Send a JSON POST request to the subscriptions endpoint
    pub async fn post_subscriptions(&self, body: serde_json::Value) -> Response {
        self.api_client
            .post(format!("{}/subscriptions", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Send a raw POST request to the subscriptions endpoint
    pub async fn post_subscriptions_raw(&self, body: &'static str) -> Response {
        self.api_client
            .post(format!("{}/subscriptions", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Read the configuration and point it at a random OS port.
pub fn test_configuration() -> Settings {
    let mut c = get_configuration().expect("Failed to read configuration.");
    c.application.port = 0;
    c.storage.backend = StorageBackend::InMemory;
    c
}

/// Spawns the application backed by an in-memory store.
/// # Returns
/// A `TestApp` holding the application address and the store it writes to.
pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let store = Arc::new(InMemorySubscriberStore::new());
    let shared: Arc<dyn SubscriberStore> = store.clone();

    // Launch the application as a background task
    let application = Application::build_with_store(test_configuration(), shared)
        .await
        .expect("Failed to build application.");

    let application_port = application.port();
    let _ = rt::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        port: application_port,
        store,
        api_client: Client::new(),
    }
}

/// Creates a uniquely named database and runs the migrations on it.
/// # Arguments
/// * `config` - The database settings; `database_name` is replaced by a fresh one.
/// # Returns
/// A `PostgresSubscriberStore` connected to the new, migrated database.
pub async fn configure_database(config: &mut DatabaseSettings) -> PostgresSubscriberStore {
    LazyLock::force(&TRACING);
    config.database_name = Uuid::new_v4().to_string();

    // Create database
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let store = PostgresSubscriberStore::new(get_connection_pool(config));
    store.migrate().await.expect("Failed to migrate the database");
    store
}
