use actix_web::{HttpResponse, Responder};

/// Liveness probe. Answers 200 without touching the subscriber store.
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}
