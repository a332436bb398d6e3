use crate::config::Config;
use crate::startup::AppState;
use axum::{
    Router,
    extract::Extension,
    handler::HandlerWithoutStateExt,
    http::{
        Method, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::get,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

#[macro_use]
extern crate tracing;

mod config;
mod db;
mod error;
mod sse;
mod startup;
mod tally;
mod votes;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "INFO");
        }
    }
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::from_config(&config);

    let broadcaster = sse::spawn_broadcast_loop(
        app_state.source.clone(),
        app_state.sse_tx.clone(),
        config.poll_interval,
    );
    info!("broadcasting every {:?}", config.poll_interval);

    let app = app_router(app_state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Unable to spawn tcp listener");

    // open SSE streams never finish, so exit on signal instead of draining
    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!("server error: {e}");
            }
        }
        _ = shutdown_signal() => {}
    }

    broadcaster.abort();
}

fn app_router(app_state: AppState, static_dir: &str) -> Router {
    let static_files = ServeDir::new(static_dir).not_found_service(handler_404.into_service());

    Router::new()
        .route("/events", get(sse::current_votes_sse))
        .route("/votes", get(votes::current_votes))
        .fallback_service(static_files)
        .layer(Extension(app_state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, ACCEPT]),
        )
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
