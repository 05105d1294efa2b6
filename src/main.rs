use axum::Router;
use pptxgen::routes;
use pptxgen::state::{ServiceCollection, Settings};
use std::env;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::fmt().json().finish();
    tracing::subscriber::set_global_default(subscriber).expect("Could not init tracing.");

    let settings = Settings {
        output_dir: get_files_dir(),
        public_base_url: get_public_base_url(),
        fetch_timeout: get_fetch_timeout(),
        max_age: get_max_age(),
    };
    let services = ServiceCollection::build(settings).await.unwrap();

    let app = Router::new()
        .merge(routes::root::create_route())
        .merge(routes::pptx::create_route(services.clone()))
        .merge(routes::files::create_route(services))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0)), get_port());
    info!("listening on {}", &addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}

fn get_port() -> u16 {
    match env::var("PORT").map(|port| port.parse::<u16>()) {
        Ok(Ok(port)) => port,
        _ => 8000,
    }
}

fn get_files_dir() -> PathBuf {
    PathBuf::from(env::var("FILES_DIR").unwrap_or_else(|_| "generated".to_string()))
}

fn get_public_base_url() -> String {
    env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn get_fetch_timeout() -> Duration {
    let timeout = env::var("FETCH_TIMEOUT_SECONDS").map(|value| value.parse::<u64>());
    let timeout = match timeout {
        Ok(Ok(timeout)) => timeout,
        _ => 20,
    };
    Duration::from_secs(timeout)
}

fn get_max_age() -> Option<Duration> {
    match env::var("MAX_AGE_SECONDS").map(|value| value.parse::<u64>()) {
        Ok(Ok(seconds)) => Some(Duration::from_secs(seconds)),
        _ => None,
    }
}
