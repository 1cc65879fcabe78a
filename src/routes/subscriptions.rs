use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};

use crate::domain::SubscribeRequest;
use crate::subscription_service::{SubscribeError, SubscriptionService};

/// Body returned for every failed subscription attempt.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            SubscribeError::ConflictError => StatusCode::CONFLICT,
            SubscribeError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let field = match self {
            SubscribeError::ValidationError { field, .. } => field.map(str::to_string),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
            field,
        })
    }
}

/// Handles a new subscription request.
/// # Arguments
/// * `body` - The JSON body containing the candidate email.
/// * `service` - The subscription service shared by all workers.
/// # Returns
/// 201 with the created subscriber, or the status and body of the `SubscribeError`.
#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, service),
    fields(subscriber_email = %body.email)
)]
pub async fn subscribe(
    body: web::Json<SubscribeRequest>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscribeError> {
    let subscriber = service.subscribe(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(subscriber))
}

/// Turns a body that is not a JSON object into the same 400 shape as a
/// validation failure. The parser's message only goes to the logs.
pub fn json_error_handler(err: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error.cause_chain = ?err, "Rejected an unreadable subscription body");
    let message = match err {
        JsonPayloadError::ContentType => "The request body must be sent as application/json.",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "The request body is too large."
        }
        _ => "The request body must be a JSON object with an `email` field.",
    };
    SubscribeError::ValidationError {
        message: message.to_string(),
        field: None,
    }
    .into()
}
