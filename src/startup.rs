use std::io;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;

use crate::configuration::{DatabaseSettings, Settings, StorageBackend};
use crate::routes::{health_check, json_error_handler, subscribe};
use crate::store::{InMemorySubscriberStore, PostgresSubscriberStore, SubscriberStore};
use crate::subscription_service::SubscriptionService;

// Application struct representing the running application.
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Build the application with the store selected in the configuration.
    pub async fn build(configuration: Settings) -> Result<Self, io::Error> {
        let store = get_subscriber_store(&configuration);
        Self::build_with_store(configuration, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        configuration: Settings,
        store: Arc<dyn SubscriberStore>,
    ) -> Result<Self, io::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, SubscriptionService::new(store))?;

        Ok(Self { port, server })
    }

    /// Get the port that the application is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> Result<(), io::Error> {
        self.server.await
    }
}

/// Build the process-wide persistence handle.
/// # Arguments
/// * `configuration` - The application settings.
/// # Returns
/// The store every request of this process will share.
pub fn get_subscriber_store(configuration: &Settings) -> Arc<dyn SubscriberStore> {
    match configuration.storage.backend {
        StorageBackend::Postgres => Arc::new(PostgresSubscriberStore::new(get_connection_pool(
            &configuration.database,
        ))),
        StorageBackend::InMemory => {
            tracing::warn!("Subscribers are kept in memory and will be lost on shutdown");
            Arc::new(InMemorySubscriberStore::new())
        }
    }
}

/// Run the HTTP server.
/// # Arguments
/// * `listener` - A TcpListener for incoming connections.
/// * `service` - The subscription service, shared by every worker.
/// # Returns
/// A Result containing the Server or an io::Error.
pub fn run(listener: TcpListener, service: SubscriptionService) -> Result<Server, io::Error> {
    let service = web::Data::new(service);
    let server = HttpServer::new(move || {
        App::new()
            // Middleware logger
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health_check", web::get().to(health_check))
            .route("/subscriptions", web::post().to(subscribe))
            // Get a pointer copy and attach it to the application state
            .app_data(service.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Get a lazily connecting pool to the database.
/// # Arguments
/// * `configuration` - A reference to the database settings.
/// # Returns
/// A `PgPool` instance.
pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(configuration.connect_options())
}
