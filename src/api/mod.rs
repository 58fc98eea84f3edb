// API module entry
// Dispatches requests: path match first, then a method-keyed branch per route

mod handlers;
mod response;
mod types;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;
use crate::routing::{match_route, ApiRoute};

const COLLECTION_ALLOW: &str = "GET, POST, OPTIONS";
const ITEM_ALLOW: &str = "GET, PUT, PATCH, DELETE, OPTIONS";
const PROBE_ALLOW: &str = "GET, OPTIONS";

/// Entry point for every request on the service.
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(finish(resp, &state));
    }

    let enable_cors = state.config.http.enable_cors;
    let resp = match match_route(&path, &state.config.health) {
        None => response::not_found(),
        Some(ApiRoute::Collection) => match method {
            Method::GET => handlers::list_puppies(state.clone()).await,
            Method::POST => match read_body(req).await {
                Ok(body) => handlers::create_puppy(state.clone(), &body).await,
                Err(resp) => resp,
            },
            Method::OPTIONS => response::options_response(COLLECTION_ALLOW, enable_cors),
            _ => response::method_not_allowed(COLLECTION_ALLOW),
        },
        Some(ApiRoute::Item(id)) => match method {
            Method::GET => handlers::get_puppy(state.clone(), id).await,
            Method::PUT => match read_body(req).await {
                Ok(body) => handlers::replace_puppy(state.clone(), id, &body).await,
                Err(resp) => resp,
            },
            Method::PATCH => match read_body(req).await {
                Ok(body) => handlers::patch_puppy(state.clone(), id, &body).await,
                Err(resp) => resp,
            },
            Method::DELETE => handlers::delete_puppy(state.clone(), id).await,
            Method::OPTIONS => response::options_response(ITEM_ALLOW, enable_cors),
            _ => response::method_not_allowed(ITEM_ALLOW),
        },
        Some(ApiRoute::Liveness) => match method {
            Method::GET => handlers::liveness(state.clone()).await,
            Method::OPTIONS => response::options_response(PROBE_ALLOW, enable_cors),
            _ => response::method_not_allowed(PROBE_ALLOW),
        },
        Some(ApiRoute::Readiness) => match method {
            Method::GET => handlers::readiness(state.clone()).await,
            Method::OPTIONS => response::options_response(PROBE_ALLOW, enable_cors),
            _ => response::method_not_allowed(PROBE_ALLOW),
        },
    };

    Ok(finish(resp, &state))
}

/// Reject requests whose declared Content-Length exceeds the limit.
fn check_body_size(req: &Request<Incoming>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(response::payload_too_large())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the request body, mapping failure to a 400.
async fn read_body(req: Request<Incoming>) -> Result<Bytes, Response<Full<Bytes>>> {
    match req.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(response::bad_request("Failed to read request body"))
        }
    }
}

/// Stamp the common response headers.
fn finish(mut response: Response<Full<Bytes>>, state: &AppState) -> Response<Full<Bytes>> {
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }
    if state.config.http.enable_cors {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    response
}
