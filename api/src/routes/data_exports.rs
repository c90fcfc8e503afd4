use crate::domain::{ArtifactError, SubscriberStore};
use crate::routes::subscriptions::ErrorBody;
use actix_web::http::header::CACHE_CONTROL;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

impl ResponseError for ArtifactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ArtifactError::InvalidName(_) => StatusCode::BAD_REQUEST,
            ArtifactError::NotFound(_) => StatusCode::NOT_FOUND,
            ArtifactError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ArtifactError::InvalidName(_) => "Invalid filename",
            ArtifactError::NotFound(_) => "File not found",
            ArtifactError::UnexpectedError(_) => "Failed to read file",
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}

#[tracing::instrument(name = "Serving export file", skip(store))]
pub async fn export_file(
    filename: web::Path<String>,
    store: web::Data<dyn SubscriberStore>,
) -> Result<HttpResponse, ArtifactError> {
    let artifact = match store.read_artifact(&filename).await {
        Ok(artifact) => artifact,
        Err(ArtifactError::UnexpectedError(error)) => {
            tracing::error!(
                error.cause_chain = ?error,
                error.message = %error,
                "Failed to read export file"
            );
            return Err(ArtifactError::UnexpectedError(error));
        }
        Err(e) => return Err(e),
    };

    Ok(HttpResponse::Ok()
        .content_type(artifact.content_type)
        .insert_header((CACHE_CONTROL, artifact.cache_control()))
        .body(artifact.body))
}
