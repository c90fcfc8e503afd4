use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{SpanExporterBuilder, WithExportConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::subscriber::set_global_default;
use tracing::{Span, Subscriber};
use tracing_actix_web::{DefaultRootSpanBuilder, Level, RootSpanBuilder};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    pub service_name: String,
    pub log_level: String,
    /// OTLP/HTTP collector. Spans are only exported when this is set.
    pub otlp_endpoint: Option<String>,
    pub api_key: Option<Secret<String>>,
}

/// Compose multiple layers into a tracing subscriber.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
    trace_provider: &TracerProvider,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let tracer = trace_provider.tracer(name.clone());
    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) {
    let _ = LogTracer::init();
    global::set_text_map_propagator(TraceContextPropagator::new());

    let _ = set_global_default(subscriber);
}

pub fn init_tracer(trace_config: &TelemetrySettings) -> Result<TracerProvider, anyhow::Error> {
    let resource = Resource::new(vec![KeyValue::new(
        opentelemetry_semantic_conventions::resource::SERVICE_NAME,
        trace_config.service_name.clone(),
    )]);
    let builder = TracerProvider::builder().with_config(Config::default().with_resource(resource));

    let endpoint = match &trace_config.otlp_endpoint {
        Some(endpoint) => endpoint,
        None => return Ok(builder.build()),
    };

    let mut headers = HashMap::new();
    if let Some(api_key) = &trace_config.api_key {
        headers.insert("x-api-key".to_string(), api_key.expose_secret().clone());
    }

    let span_exporter = opentelemetry_otlp::new_exporter()
        .http()
        .with_endpoint(endpoint.clone())
        .with_http_client(reqwest::Client::default())
        .with_headers(headers)
        .with_timeout(std::time::Duration::from_secs(2));

    let exporter = SpanExporterBuilder::Http(span_exporter).build_span_exporter()?;

    Ok(builder.with_batch_exporter(exporter, runtime::Tokio).build())
}

pub struct CustomLevelRootSpanBuilder;

impl RootSpanBuilder for CustomLevelRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        let paths_to_skip = ["/health_check"];

        let level = if paths_to_skip.contains(&request.path()) {
            Level::TRACE
        } else {
            Level::INFO
        };
        tracing_actix_web::root_span!(level = level, request)
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, actix_web::Error>) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}
