//! Rate-limit key extraction from HTTP requests.

use axum::http::HeaderMap;
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

/// Header carrying an optional API key. Only keys listed in `API_KEYS`
/// identify the client.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Key used when neither an API key nor a peer address is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate-limit key for a request.
///
/// Precedence:
///
/// 1. `X-Api-Key` header, as `key:<value>`, when the value is in `api_keys`
/// 2. When `behind_proxy` is set: the first address in `X-Forwarded-For`,
///    then `X-Real-IP`
/// 3. The socket peer address
///
/// Forwarding headers are ignored unless `behind_proxy` is set, since any
/// client can forge them. Unlisted API keys are ignored for the same reason.
pub fn extract_client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
    api_keys: &HashSet<String>,
) -> String {
    if let Some(api_key) = header_str(headers, API_KEY_HEADER)
        && !api_key.is_empty()
        && api_keys.contains(api_key)
    {
        return format!("key:{api_key}");
    }

    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .and_then(parse_ip);
        if let Some(ip) = forwarded {
            return format!("ip:{ip}");
        }

        if let Some(ip) = header_str(headers, "x-real-ip").and_then(parse_ip) {
            return format!("ip:{ip}");
        }
    }

    match peer {
        Some(addr) => format!("ip:{}", addr.ip()),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}
