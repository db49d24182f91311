//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `KloutClient` is generic over `Transport` so tests (and hosts that bring
//! their own HTTP stack) can replace the network. `UreqTransport` is the
//! blocking default. It reports 3xx/4xx/5xx responses as data, without
//! following redirects, so status mapping stays in one place.

use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};
use ureq::tls::TlsConfig;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let mut builder = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false);
        if config.accepts_invalid_certs() {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.tls_config(TlsConfig::builder().disable_verification(true).build());
        }
        Self {
            agent: builder.build().new_agent(),
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), &request.headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), &request.headers).send_empty(),
            HttpMethod::Put => with_headers(self.agent.put(url), &request.headers).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = decode_body(bytes, &headers)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

/// ureq decodes gzip itself; `deflate`, which the fixed `Accept-Encoding`
/// also advertises, is inflated here.
fn decode_body(bytes: Vec<u8>, headers: &[(String, String)]) -> Result<String, ApiError> {
    let deflated = headers.iter().any(|(k, v)| {
        k.eq_ignore_ascii_case("content-encoding") && v.trim().eq_ignore_ascii_case("deflate")
    });
    let bytes = if deflated { inflate(&bytes)? } else { bytes };
    String::from_utf8(bytes).map_err(|e| ApiError::Transport(e.to_string()))
}

/// `deflate` is zlib-wrapped per RFC 9110, but some servers send a raw stream.
fn inflate(bytes: &[u8]) -> Result<Vec<u8>, ApiError> {
    let mut out = Vec::new();
    if ZlibDecoder::new(bytes).read_to_end(&mut out).is_ok() {
        return Ok(out);
    }
    out.clear();
    DeflateDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| ApiError::Transport(format!("deflate: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use flate2::Compression;

    use super::*;

    fn deflate_headers() -> Vec<(String, String)> {
        vec![("content-encoding".to_string(), "Deflate".to_string())]
    }

    #[test]
    fn plain_body_passes_through() {
        let body = decode_body(br#"{"a":1}"#.to_vec(), &[]).unwrap();
        assert_eq!(body, r#"{"a":1}"#);
    }

    #[test]
    fn zlib_deflate_body_is_inflated() {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(br#"{"a":1}"#).unwrap();
        let body = decode_body(enc.finish().unwrap(), &deflate_headers()).unwrap();
        assert_eq!(body, r#"{"a":1}"#);
    }

    #[test]
    fn raw_deflate_body_is_inflated() {
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(br#"{"score":84.25}"#).unwrap();
        let body = decode_body(enc.finish().unwrap(), &deflate_headers()).unwrap();
        assert_eq!(body, r#"{"score":84.25}"#);
    }

    #[test]
    fn non_utf8_body_is_transport_error() {
        let err = decode_body(vec![0xff, 0xfe], &[]).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
