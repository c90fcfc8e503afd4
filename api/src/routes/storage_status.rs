use crate::domain::SubscriberStore;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
struct ListingError {
    error: &'static str,
    message: String,
}

/// Lists the export directory. Used to check a deployment can see its files.
#[tracing::instrument(name = "Checking export directory", skip(store))]
pub async fn storage_status(store: web::Data<dyn SubscriberStore>) -> HttpResponse {
    match store.storage_status().await {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(error) => {
            tracing::error!(
                error.cause_chain = ?error,
                error.message = %error,
                "Failed to list the export directory"
            );
            HttpResponse::InternalServerError().json(ListingError {
                error: "Cannot read directory",
                message: error.to_string(),
            })
        }
    }
}
