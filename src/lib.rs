pub mod configuration;
pub mod domain;
pub mod errors;
pub mod routes;
pub mod startup;
pub mod store;
pub mod subscription_client;
pub mod subscription_service;
pub mod telemetry;
