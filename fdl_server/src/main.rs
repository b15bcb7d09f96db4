//! This crate serves harvested festival records as JSON over HTTP.
//!
//! The path and query string are `/festivals?url=<listing_url>&year=<year>`.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use log::info;

mod route;

#[tokio::main]
async fn main() {
    env_logger::init();
    let app = Router::new().route("/festivals", get(route::festivals::handler));
    let addr = SocketAddr::from(([0, 0, 0, 0], 8008));
    info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
