use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::notification::NotificationDispatcher;
use crate::routes;
use crate::store::{PostgresSubmissionStore, SubmissionStore};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Validates the configuration and binds the listener. Nothing is served
    /// until `run_until_stopped` is awaited.
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let store = Arc::new(PostgresSubmissionStore::connect_lazy(
            &configuration.database,
        ));
        let dispatcher = NotificationDispatcher::from_settings(&configuration.email)?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        tracing::info!(port, "Listening for contact form submissions");
        let server = run(listener, store, dispatcher)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn SubmissionStore>,
    dispatcher: NotificationDispatcher,
) -> Result<Server, std::io::Error> {
    let store: Data<dyn SubmissionStore> = Data::from(store);
    let dispatcher = Data::new(dispatcher);
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!(error = %err, "Rejected an unparsable contact payload");
        actix_web::error::InternalError::from_response(
            err,
            routes::contact::malformed_payload_response(),
        )
        .into()
    });
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(routes::home::home))
            .route("/health", web::get().to(routes::health_check::health_check))
            .route(
                "/api/contact",
                web::post().to(routes::contact::submit_contact),
            )
            .app_data(json_config.clone())
            .app_data(store.clone())
            .app_data(dispatcher.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
