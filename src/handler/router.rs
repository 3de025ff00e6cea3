//! Request routing dispatch module
//!
//! Every page URL has the shape `/{view|edit|save}/{title}` where the title is one or
//! more ASCII letters or digits. The path is percent-decoded before matching, so
//! `/view/%41` is page `A`. Anything else is a 404.

use crate::config::AppState;
use crate::handler::pages;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::page::Title;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// The operation named by the first path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// A path that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pub action: Action,
    pub title: Title,
}

/// Match `path` against `^/(view|edit|save)/([a-zA-Z0-9]+)$`
pub fn parse_route(path: &str) -> Option<PageRoute> {
    let (segment, raw_title) = path.strip_prefix('/')?.split_once('/')?;
    Some(PageRoute {
        action: Action::from_segment(segment)?,
        title: Title::parse(raw_title)?,
    })
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = state.access_log_enabled().then(|| {
        AccessLogEntry::start(peer_addr, req.method(), req.uri(), req.version(), req.headers())
    });

    let mut response = match read_body(req, state.config.http.max_body_size).await {
        Ok(req) => route(req, &state).await,
        Err(resp) => resp,
    };

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if let Some(entry) = entry.as_mut() {
        entry.finish(response.status().as_u16(), body_len(&response), started);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Bytes the response body will send, whether or not `Content-Length` was set
fn body_len(response: &Response<Full<Bytes>>) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

/// Buffer the request body, rejecting anything over `max_body_size`
async fn read_body(
    req: Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Result<Request<Bytes>, Response<Full<Bytes>>> {
    if let Some(size) = declared_length(&req) {
        if size > max_body_size {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return Err(http::build_413_response());
        }
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(Request::from_parts(parts, collected.to_bytes())),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response())
        }
    }
}

fn declared_length<B>(req: &Request<B>) -> Option<u64> {
    let value = req.headers().get(CONTENT_LENGTH)?;
    match value.to_str().ok().and_then(|v| v.parse::<u64>().ok()) {
        Some(size) => Some(size),
        None => {
            logger::log_warning("Invalid Content-Length value, skipping size check");
            None
        }
    }
}

/// Validate the path and dispatch to the matching page operation
pub async fn route(req: Request<Bytes>, state: &AppState) -> Response<Full<Bytes>> {
    let Ok(path) = percent_decode_str(req.uri().path()).decode_utf8() else {
        return http::build_404_response();
    };
    let Some(PageRoute { action, title }) = parse_route(&path) else {
        return http::build_404_response();
    };
    let is_head = req.method() == Method::HEAD;

    match action {
        Action::View => pages::view(state, &title, is_head).await,
        Action::Edit => pages::edit(state, &title, is_head).await,
        Action::Save => {
            let body = http::form_value(&req, "body");
            pages::save(state, &title, body).await
        }
    }
}
