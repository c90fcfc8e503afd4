use crate::adapters::{ExportDirectory, FileSubscriberStore};
use crate::configuration::Settings;
use crate::domain::SubscriberStore;
use crate::routes::{export_file, export_urls, health_check, json_error_handler, storage_status, subscribe};
use actix_web::dev::{Server, Service};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::web::Data;
use actix_web::{web, App, HttpMessage, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use std::sync::Arc;
use telemetry::CustomLevelRootSpanBuilder;
use tracing_actix_web::{RequestId, TracingLogger};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Spawns the subscription writer and binds the listener. Must be called
    /// from within a tokio runtime.
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let token = configuration
            .storage
            .artifact_token()
            .map_err(anyhow::Error::msg)?;
        let base_path = configuration
            .storage
            .resolved_base_path()
            .context("Failed to resolve the export directory")?;

        tracing::info!(
            base_path = %base_path.display(),
            duplicate_match = ?configuration.storage.duplicate_match,
            "Starting subscriber store"
        );

        let store = FileSubscriberStore::spawn(
            ExportDirectory::new(base_path, token),
            configuration.storage.duplicate_match,
            configuration.storage.writer_queue_capacity,
        );

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();

        let server = run(listener, Arc::new(store))?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, store: Arc<dyn SubscriberStore>) -> Result<Server, anyhow::Error> {
    let store: Data<dyn SubscriberStore> = Data::from(store);

    let server = HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let request_id = req.extensions().get::<RequestId>().copied();
                let res = srv.call(req);
                async move {
                    let mut res = res.await?;
                    if let Some(value) =
                        request_id.and_then(|id| HeaderValue::from_str(&id.to_string()).ok())
                    {
                        res.headers_mut()
                            .insert(HeaderName::from_static("x-request-id"), value);
                    }
                    Ok(res)
                }
            })
            .wrap(TracingLogger::<CustomLevelRootSpanBuilder>::new())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(store.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/subscribe", web::post().to(subscribe))
            .route("/subscribe", web::get().to(export_urls))
            .route("/data-exports/{filename}", web::get().to(export_file))
            .service(
                web::scope("/api")
                    .route("/subscribe", web::post().to(subscribe))
                    .route("/subscribe", web::get().to(export_urls))
                    .route("/test-files", web::get().to(storage_status)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
