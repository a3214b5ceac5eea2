use actix_web::{web, HttpResponse};
use chrono::{SecondsFormat, Utc};

use crate::store::SubmissionStore;

#[derive(serde::Serialize)]
struct HealthReport {
    database: bool,
    time: String,
}

/// Always answers 200; the body says whether the database can be reached.
pub async fn health_check(store: web::Data<dyn SubmissionStore>) -> HttpResponse {
    let database = store.is_connected().await;
    HttpResponse::Ok().json(HealthReport {
        database,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
