//! Building [`TrackingContext`] rows from request headers.
//!
//! Client addresses are never stored: only a SHA-256 is kept, enough to count
//! distinct visitors. The address is the first `X-Forwarded-For` hop, then
//! `X-Real-IP`, then the TCP peer of the connection.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use linkumkm_db::models::analytics::TrackingContext;
use sha2::{Digest, Sha256};

/// Longest header value persisted.
const MAX_HEADER_LENGTH: usize = 512;

/// Extractor for the visitor details recorded with views and clicks.
///
/// The peer address is only present when the server is started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub struct Visitor(pub TrackingContext);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(Visitor(tracking_context(&parts.headers, peer)))
    }
}

pub fn tracking_context(headers: &HeaderMap, peer: Option<IpAddr>) -> TrackingContext {
    let ip = forwarded_ip(headers).or_else(|| peer.map(|ip| ip.to_string()));
    TrackingContext {
        ip_hash: ip.map(|ip| hash_ip(&ip)),
        user_agent: header_text(headers, USER_AGENT.as_str()),
        referrer: header_text(headers, REFERER.as_str()),
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    forwarded.or_else(real_ip).map(str::to_string)
}

/// Hex SHA-256 of an address.
pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.chars().take(MAX_HEADER_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn first_forwarded_hop_is_hashed() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        let peer = Some(IpAddr::from([10, 0, 0, 9]));
        let ctx = tracking_context(&headers, peer);
        assert_eq!(ctx.ip_hash, Some(hash_ip("203.0.113.7")));
        assert_eq!(ctx.ip_hash.as_ref().map(String::len), Some(64));
        assert_eq!(ctx.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(ctx.referrer, None);
    }

    #[test]
    fn falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(
            tracking_context(&headers, None).ip_hash,
            Some(hash_ip("198.51.100.2"))
        );
    }

    #[test]
    fn direct_connection_uses_peer_address() {
        let peer = IpAddr::from([192, 0, 2, 44]);
        assert_eq!(
            tracking_context(&HeaderMap::new(), Some(peer)).ip_hash,
            Some(hash_ip("192.0.2.44"))
        );
    }

    #[tokio::test]
    async fn visitor_reads_connect_info() {
        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/api/public/linktrees/warung-sri")
            .extension(ConnectInfo(SocketAddr::from(([192, 0, 2, 44], 51234))))
            .body(())
            .unwrap()
            .into_parts();

        let Visitor(ctx) = Visitor::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.ip_hash, Some(hash_ip("192.0.2.44")));
    }

    #[test]
    fn no_address_at_all() {
        assert_eq!(tracking_context(&HeaderMap::new(), None).ip_hash, None);
    }
}
