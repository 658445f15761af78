use email_capture::configuration::get_configuration;
use email_capture::startup::Application;
use email_capture::telemetry::{init_telemetry, DEFAULT_LEVEL};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("email-capture", DEFAULT_LEVEL, std::io::stdout)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

    let configuration = get_configuration()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

    let app = Application::build(configuration).await?;
    tracing::info!(port = app.port(), "Accepting email captures");
    app.run_until_stopped().await
}
