#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod cache;
mod config;
mod error;
mod fetch;
mod parse;
mod scheduler;

use std::{net::SocketAddr, sync::Arc, time::Instant};

use axum::{extract::State, http::Method, response::Json, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, cors::Any};

use crate::{
    cache::{Multithreaded, TableSnapshot},
    config::Config,
    fetch::{Endpoints, Portal},
    scheduler::Refresher,
};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn seconds(d: Option<i64>) -> String {
    d.map_or_else(|| "n/a".to_owned(), |d| d.to_string())
}

async fn info(State(refresher): State<Arc<Refresher>>) -> String {
    let c = refresher.cache().get().await;
    let until = refresher.time_until_refresh().await;
    format!(
        "{} {}\nSeconds since last refresh: {}\nSeconds until next refresh: {}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        seconds(c.time_since_refresh().map(|d| d.num_seconds())),
        seconds(until.and_then(|d| i64::try_from(d.as_secs()).ok())),
    )
}

async fn assignments(State(refresher): State<Arc<Refresher>>) -> Json<Arc<TableSnapshot>> {
    Json(refresher.cache().get().await)
}

async fn debug_check(State(refresher): State<Arc<Refresher>>) -> Json<serde_json::Value> {
    let (status, error, snapshot) = match refresher.refresh().await {
        Ok(snapshot) => ("ok", None, snapshot),
        Err(e) => ("error", Some(e.to_string()), refresher.cache().get().await),
    };
    Json(serde_json::json!({
        "status": status,
        "error": error,
        "html": snapshot.html(),
        "last_updated": snapshot.last_updated(),
    }))
}

fn app(refresher: Arc<Refresher>) -> Router {
    let comression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/", get(info))
        .route("/api/assignments", get(assignments))
        .route("/api/debug/check", get(debug_check))
        .with_state(refresher)
        .layer(cors_layer)
        .layer(comression_layer)
}

async fn listen(addr: SocketAddr) -> error::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        log::error!("failed to listen on {addr}: {e}");
        e
    })?;
    log::info!("listening on http://{addr}");
    Ok(listener)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    log::debug!("{config:?}");

    let cache = Arc::new(Multithreaded::new());
    let portal = Portal::new(config.credentials, Endpoints::default());
    let refresher = Arc::new(Refresher::new(portal, Arc::clone(&cache)));

    log::info!("Running initial refresh");
    let start = Instant::now();
    let _res = refresher.refresh().await;
    log::info!("Initial refresh done, took {:?}", start.elapsed());
    tokio::spawn(Arc::clone(&refresher).run());

    let listener = listen(config.addr).await?;
    axum::serve(listener, app(refresher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
