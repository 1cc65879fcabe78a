use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::domain::{EMAIL_FIELD, SubscribeRequest, Subscriber, SubscriberEmail};
use crate::routes::ErrorBody;

/// Failure modes of a subscription attempt, as seen by the caller.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
    #[error("Failed to reach the subscription endpoint.")]
    Transport(#[from] reqwest::Error),
}

/// Caller side of `POST /subscriptions`.
///
/// Candidates are checked with [`SubscriberEmail::parse`] before anything
/// is sent, the same rule the handler applies.
pub struct SubscriptionClient {
    http_client: Client,
    base_url: Url,
}

impl SubscriptionClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Subscribe `email`, returning the created subscriber.
    #[tracing::instrument(name = "Send a subscription request", skip(self))]
    pub async fn subscribe(&self, email: &str) -> Result<Subscriber, ClientError> {
        let email = SubscriberEmail::parse(email.to_string()).map_err(|message| {
            ClientError::Validation {
                message,
                field: Some(EMAIL_FIELD.to_string()),
            }
        })?;
        let url = self
            .base_url
            .join("/subscriptions")
            .map_err(|e| ClientError::Internal(format!("Invalid subscription URL: {}", e)))?;
        let request_body = SubscribeRequest {
            email: email.into(),
        };

        let response = self
            .http_client
            .post(url)
            .json(&request_body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(response.json::<Subscriber>().await?),
            StatusCode::BAD_REQUEST => {
                let body = response.json::<ErrorBody>().await?;
                Err(ClientError::Validation {
                    message: body.message,
                    field: body.field,
                })
            }
            StatusCode::CONFLICT => {
                let body = response.json::<ErrorBody>().await?;
                Err(ClientError::Conflict(body.message))
            }
            status => {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .map(|body| body.message)
                    .unwrap_or_else(|_| format!("Unexpected status {}", status));
                Err(ClientError::Internal(message))
            }
        }
    }
}
