use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contact_form::configuration::{
    get_configuration, DatabaseSettings, ProviderSettings, Settings,
};
use contact_form::notification::NotificationDispatcher;
use contact_form::startup::run;
use contact_form::store::{PostgresSubmissionStore, Submission, SubmissionStore};
use contact_form::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::Secret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Stands in for the database so the request flow can be checked without one.
#[derive(Default)]
pub struct InMemoryStore {
    submissions: Mutex<Vec<Submission>>,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionStore for InMemoryStore {
    async fn insert(&self, submission: &Submission) -> Result<(), anyhow::Error> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("The store is unavailable");
        }
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        !self.failing.load(Ordering::SeqCst)
    }
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
    pub db_pool: Option<PgPool>,
}

impl TestApp {
    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw_contact(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/contact", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

fn test_configuration(email_server: &MockServer) -> Settings {
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.email.timeout_milliseconds = 500;
    configuration.email.provider = ProviderSettings::Api {
        base_url: email_server.uri(),
        api_key: Secret::new("test-api-key".to_string()),
    };
    configuration
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);
    let email_server = MockServer::start().await;
    let configuration = test_configuration(&email_server);
    let store = Arc::new(InMemoryStore::default());
    launch(configuration, email_server, store.clone(), store, None).await
}

/// Spawns the app on a freshly migrated throwaway Postgres database.
pub async fn spawn_app_with_database() -> TestApp {
    Lazy::force(&TRACING);
    let email_server = MockServer::start().await;
    let mut configuration = test_configuration(&email_server);
    configuration.database.database_name = Uuid::new_v4().to_string();
    let db_pool = configure_database(&configuration.database).await;
    let store = Arc::new(PostgresSubmissionStore::new(db_pool.clone()));
    launch(
        configuration,
        email_server,
        store,
        Arc::new(InMemoryStore::default()),
        Some(db_pool),
    )
    .await
}

/// Spawns the app with the SMTP provider pointed at a relay that refuses connections.
pub async fn spawn_app_with_smtp_relay_down() -> TestApp {
    Lazy::force(&TRACING);
    let email_server = MockServer::start().await;
    let mut configuration = test_configuration(&email_server);
    configuration.email.provider = ProviderSettings::Smtp {
        host: "127.0.0.1".to_string(),
        port: 9,
        username: "user".to_string(),
        password: Secret::new("password".to_string()),
    };
    let store = Arc::new(InMemoryStore::default());
    launch(configuration, email_server, store.clone(), store, None).await
}

/// Spawns the app on top of a Postgres store that can never be reached.
pub async fn spawn_app_without_database() -> TestApp {
    Lazy::force(&TRACING);
    let email_server = MockServer::start().await;
    let mut configuration = test_configuration(&email_server);
    // Nothing listens on the discard port.
    configuration.database.host = "127.0.0.1".to_string();
    configuration.database.port = 9;
    configuration.database.acquire_timeout_seconds = 1;
    let store = Arc::new(PostgresSubmissionStore::connect_lazy(
        &configuration.database,
    ));
    launch(
        configuration,
        email_server,
        store,
        Arc::new(InMemoryStore::default()),
        None,
    )
    .await
}

async fn launch(
    configuration: Settings,
    email_server: MockServer,
    store: Arc<dyn SubmissionStore>,
    in_memory: Arc<InMemoryStore>,
    db_pool: Option<PgPool>,
) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    // We retrieve the port assigned to us by the OS
    let port = listener.local_addr().unwrap().port();
    let dispatcher = NotificationDispatcher::from_settings(&configuration.email)
        .expect("Failed to build the notification dispatcher");

    let server = run(listener, store, dispatcher).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        store: in_memory,
        email_server,
        api_client: reqwest::Client::new(),
        db_pool,
    }
}

async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");
    connection_pool
}
