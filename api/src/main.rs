use telemetry::{get_subscriber, init_subscriber, init_tracer};
use waitlist::configuration::get_configuration;
use waitlist::startup::Application;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().expect("Failed to read configuration");

    let tracer = init_tracer(&configuration.telemetry)?;
    let subscriber = get_subscriber(
        configuration.telemetry.service_name.clone(),
        configuration.telemetry.log_level.clone(),
        std::io::stdout,
        &tracer,
    );
    init_subscriber(subscriber);

    let application = Application::build(configuration).await?;
    tracing::info!(port = application.port(), "Listening");

    application.run_until_stopped().await?;

    for result in tracer.force_flush() {
        if let Err(error) = result {
            eprintln!("Failed to flush spans: {}", error);
        }
    }

    Ok(())
}
