//! HTTP response building module
//!
//! Builders for every status the page service answers with.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 HTML response. HEAD requests get the headers without the body.
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 302 Found redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(302)
        .header("Location", target)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(format!(
            "<a href=\"{target}\">Found</a>.\n"
        ))))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<Full<Bytes>> {
    plain_text(400, "400 Bad Request".to_string())
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    plain_text(404, "404 page not found".to_string())
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    plain_text(413, "413 Payload Too Large".to_string())
}

/// Build 500 response carrying the error text verbatim
pub fn build_500_response(message: &str) -> Response<Full<Bytes>> {
    plain_text(500, format!("{message}\n"))
}

fn plain_text(status: u16, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(body.clone())))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_location() {
        let resp = build_redirect_response("/edit/Home");
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["Location"], "/edit/Home");
    }

    #[test]
    fn test_head_html_has_length_but_no_body() {
        let resp = build_html_response("<p>hi</p>".to_string(), true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "9");
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_400_response().status(), 400);
        assert_eq!(build_404_response().status(), 404);
        assert_eq!(build_413_response().status(), 413);
        assert_eq!(build_500_response("boom").status(), 500);
    }
}
