//! Preview server answering every route with its JSON page data

use anyhow::Result;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::generator::PageData;
use crate::site::{Resolved, Site};

/// Build the router; the site is shared read-only between requests
pub fn router(site: Arc<Site>) -> Router {
    Router::new()
        .fallback(page_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(site)
}

/// Start the preview server
pub async fn start(site: Site, ip: &str, port: u16) -> Result<()> {
    let app = router(Arc::new(site));

    let addr = bind_addr(ip, port)?;

    println!("Server running at http://{}", addr);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse the bind address; `localhost` means IPv4 loopback, and IPv6
/// literals such as `::1` are accepted with or without brackets
fn bind_addr(ip: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = match ip {
        "localhost" => IpAddr::V4(Ipv4Addr::LOCALHOST),
        other => other
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid IP address {:?}: {}", other, e))?,
    };
    Ok(SocketAddr::new(ip, port))
}

async fn page_handler(State(site): State<Arc<Site>>, uri: Uri) -> Response {
    let path = uri.path();
    let resolved = site.resolve(path);
    let status = match resolved {
        Resolved::NotFound => {
            tracing::debug!("No page for {}", path);
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::OK,
    };

    let data = PageData::build(&site, path, &resolved);
    (status, Json(data)).into_response()
}
