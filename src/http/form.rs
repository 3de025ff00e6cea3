//! Form value decoding
//!
//! Field lookup order: `application/x-www-form-urlencoded` request body, then the URL
//! query string. A field that appears nowhere reads as the empty string.
//!
//! Values are decoded to raw bytes: `%FF` stays `0xFF` rather than becoming U+FFFD.

use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use percent_encoding::percent_decode;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// First value of form field `key`, or empty when absent
pub fn form_value(req: &Request<Bytes>, key: &str) -> Vec<u8> {
    let from_body = if is_form_urlencoded(req) {
        first_value(req.body(), key)
    } else {
        None
    };

    from_body
        .or_else(|| req.uri().query().and_then(|q| first_value(q.as_bytes(), key)))
        .unwrap_or_default()
}

fn is_form_urlencoded(req: &Request<Bytes>) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

fn first_value(input: &[u8], key: &str) -> Option<Vec<u8>> {
    input
        .split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (name, value) = match pair.iter().position(|&b| b == b'=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, &[][..]),
            };
            (decode_component(name) == key.as_bytes()).then(|| decode_component(value))
        })
}

/// `+` is a space, then `%XX` escapes become the raw byte
fn decode_component(input: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&spaced).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_request(uri: &str, body: &'static str) -> Request<Bytes> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    #[test]
    fn test_body_field_decoded() {
        let req = form_request("/save/Home", "body=hello+world%21&other=x");
        assert_eq!(form_value(&req, "body"), b"hello world!");
        assert_eq!(form_value(&req, "other"), b"x");
    }

    #[test]
    fn test_missing_field_is_empty() {
        let req = form_request("/save/Home", "other=x");
        assert!(form_value(&req, "body").is_empty());
    }

    #[test]
    fn test_body_takes_precedence_over_query() {
        let req = form_request("/save/Home?body=query", "body=posted");
        assert_eq!(form_value(&req, "body"), b"posted");
    }

    #[test]
    fn test_query_used_when_body_lacks_field() {
        let req = form_request("/save/Home?body=query", "");
        assert_eq!(form_value(&req, "body"), b"query");
    }

    #[test]
    fn test_non_form_body_ignored() {
        let req = Request::builder()
            .method("POST")
            .uri("/save/Home")
            .header(CONTENT_TYPE, "text/plain")
            .body(Bytes::from_static(b"body=ignored"))
            .unwrap();
        assert!(form_value(&req, "body").is_empty());
    }

    #[test]
    fn test_multiline_body() {
        let req = form_request("/save/Home", "body=line1%0D%0Aline2");
        assert_eq!(form_value(&req, "body"), b"line1\r\nline2");
    }

    #[test]
    fn test_invalid_utf8_escapes_kept_as_raw_bytes() {
        let req = form_request("/save/Bin", "body=%FF%FEok");
        assert_eq!(form_value(&req, "body"), [0xFF, 0xFE, b'o', b'k']);
    }

    #[test]
    fn test_encoded_key_and_bare_key() {
        let req = form_request("/save/Home", "flag&b%6Fdy=a%2Bb+c");
        assert_eq!(form_value(&req, "body"), b"a+b c");
        assert!(form_value(&req, "flag").is_empty());
    }
}
