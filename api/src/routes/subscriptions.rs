use crate::domain::{StoreError, SubscriberEmail, SubscriberStore};
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0} is already subscribed")]
    DuplicateEmail(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for SubscribeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            StoreError::UnexpectedError(e) => Self::UnexpectedError(e),
        }
    }
}

impl SubscribeError {
    fn public_message(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "Please provide a valid email address",
            Self::DuplicateEmail(_) => "This email is already subscribed",
            Self::UnexpectedError(_) => "Failed to subscribe. Please try again.",
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail(_) => StatusCode::CONFLICT,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message(),
        })
    }
}

#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

impl TryFrom<SubscribeRequest> for SubscriberEmail {
    type Error = String;

    fn try_from(value: SubscribeRequest) -> Result<Self, Self::Error> {
        match value.email {
            Some(email) => SubscriberEmail::parse(email),
            None => Err("No email was provided".to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
    pub data_url: String,
}

/// Malformed or non-JSON bodies are reported the same way as a bad email.
pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    SubscribeError::ValidationError(err.to_string()).into()
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, store),
    fields(subscriber_email = ?body.email)
)]
pub async fn subscribe(
    body: web::Json<SubscribeRequest>,
    store: web::Data<dyn SubscriberStore>,
) -> Result<HttpResponse, SubscribeError> {
    let email: SubscriberEmail = body
        .into_inner()
        .try_into()
        .map_err(SubscribeError::ValidationError)?;

    let confirmation = store.subscribe(email).await?;

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        success: true,
        message: confirmation.message,
        data_url: confirmation.data_url,
    }))
}

#[tracing::instrument(name = "Fetching public export URLs", skip(store))]
pub async fn export_urls(store: web::Data<dyn SubscriberStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.public_urls())
}
