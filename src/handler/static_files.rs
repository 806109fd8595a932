//! Static asset serving module
//!
//! Serves the client page and its stylesheet. Files are re-read from disk on
//! every request; an unreadable file reports 500 rather than 404 because both
//! assets are declared routes.

use crate::config::AssetsConfig;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tokio::fs;

/// GET /: the HTML client
pub async fn serve_client(assets: &AssetsConfig) -> Response<Full<Bytes>> {
    serve_asset(&assets.client_file, "text/html", "Unable to load client.html").await
}

/// GET /style.css: the client stylesheet
pub async fn serve_stylesheet(assets: &AssetsConfig) -> Response<Full<Bytes>> {
    serve_asset(&assets.stylesheet_file, "text/css", "Unable to load style.css").await
}

async fn serve_asset(
    path: &str,
    content_type: &str,
    failure_message: &str,
) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(data) => http::build_asset_response(data, content_type),
        Err(e) => {
            logger::log_error(&format!("Failed to read asset '{path}': {e}"));
            http::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                failure_message,
                http::ErrorId::InternalError,
            )
        }
    }
}
