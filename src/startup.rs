use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use url::Url;

use crate::{
    configuration::{CredentialSource, Settings},
    routes::{email_capture, health_check},
    subscription_client::SubscriptionClient,
};

/// A running application
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Build an HTTP server running our app. The behavior of the app is configured
    /// through the `settings` argument.
    ///
    /// Fails if the subscription service's base URL does not parse, or if the
    /// configured address cannot be bound.
    pub async fn build(settings: Settings) -> std::io::Result<Self> {
        let service_config = settings.subscription_service;
        let base_url = Url::parse(&service_config.base_url)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
        let client = SubscriptionClient::new(base_url);
        let credentials = service_config.credential_source();

        let app_config = settings.application;
        let app_address = format!("{}:{}", &app_config.host, app_config.port);
        let listener = TcpListener::bind(app_address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, client, credentials)?;
        Ok(Self { port, server })
    }

    /// The port that the app is listening on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Listen and handle requests until we receive a stop signal
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

/// Starts a server, listening on `listener`, running in the background and returns it
fn run(
    listener: TcpListener,
    client: SubscriptionClient,
    credentials: CredentialSource,
) -> std::io::Result<Server> {
    let client = web::Data::new(client);
    let credentials = web::Data::new(credentials);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(health_check)
            .service(email_capture)
            .app_data(client.clone())
            .app_data(credentials.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
