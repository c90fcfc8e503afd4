use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::PathBuf;
use telemetry::{get_subscriber, init_subscriber, init_tracer, TelemetrySettings};
use tempfile::TempDir;
use waitlist::configuration::get_configuration;
use waitlist::domain::ArtifactToken;
use waitlist::startup::Application;

// Ensure that the `tracing` stack is only initialised once
static TRACING: Lazy<()> = Lazy::new(|| {
    let settings = TelemetrySettings {
        service_name: "test".to_string(),
        log_level: "info".to_string(),
        otlp_endpoint: None,
        api_key: None,
    };
    let trace_provider = init_tracer(&settings).expect("Failed to build the tracer provider");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            settings.service_name,
            settings.log_level,
            std::io::stdout,
            &trace_provider,
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            settings.service_name,
            settings.log_level,
            std::io::sink,
            &trace_provider,
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub token: ArtifactToken,
    pub api_client: reqwest::Client,
    // Removed when the app is dropped.
    pub export_dir: TempDir,
}

impl TestApp {
    pub async fn post_subscribe(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_subscribe_raw(&self, body: &'static str, content_type: &str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/subscribe", &self.address))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn subscribe(&self, email: &str) -> reqwest::Response {
        self.post_subscribe("/api/subscribe", &serde_json::json!({ "email": email }))
            .await
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn subscribers_file(&self) -> Option<String> {
        std::fs::read_to_string(
            self.export_dir
                .path()
                .join(self.token.subscribers_file_name()),
        )
        .ok()
    }

    pub fn stats_file(&self) -> Option<Value> {
        let json = std::fs::read_to_string(self.export_dir.path().join(self.token.stats_file_name())).ok()?;
        Some(serde_json::from_str(&json).expect("Stats file is not valid JSON"))
    }
}

pub async fn spawn_app() -> TestApp {
    let export_dir = TempDir::new().expect("Failed to create a temporary export directory");
    let base_path = export_dir.path().to_path_buf();
    launch(export_dir, base_path).await
}

/// Points storage at a regular file, so every disk access fails.
pub async fn spawn_app_with_broken_storage() -> TestApp {
    let export_dir = TempDir::new().expect("Failed to create a temporary export directory");
    let base_path = export_dir.path().join("not-a-directory");
    std::fs::write(&base_path, "in the way").expect("Failed to create the blocking file");
    launch(export_dir, base_path).await
}

async fn launch(export_dir: TempDir, base_path: PathBuf) -> TestApp {
    Lazy::force(&TRACING);

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration");
        // Use a random OS port
        c.application.port = 0;
        c.application.host = "127.0.0.1".to_string();
        c.storage.base_path = base_path;
        c
    };
    let token = configuration
        .storage
        .artifact_token()
        .expect("Failed to derive the artifact token");

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        token,
        api_client: reqwest::Client::new(),
        export_dir,
    }
}
