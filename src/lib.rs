pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notification;
pub mod routes;
pub mod smtp_client;
pub mod startup;
pub mod store;
pub mod telemetry;
