//! Validation for webhook registration input.
//!
//! Covers:
//! - Delivery URL requirements (HTTPS, SSRF protection)
//! - Event type subscriptions (known, subscribable, non-empty)
//! - Custom header names and values (signature header is reserved)

use std::collections::HashMap;
use std::net::IpAddr;

use hireflow_core::WebhookEventType;

use crate::error::WebhookError;
use crate::models::SIGNATURE_HEADER;

/// Policy controlling which delivery URLs a tenant may register.
#[derive(Debug, Clone, Copy)]
pub struct UrlPolicy {
    /// Reject plain `http://` URLs.
    pub require_https: bool,
    /// Accept loopback/private hosts (development and tests only).
    pub allow_internal_hosts: bool,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            require_https: true,
            allow_internal_hosts: false,
        }
    }
}

impl UrlPolicy {
    /// Policy accepting any http(s) URL, including internal hosts.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            require_https: false,
            allow_internal_hosts: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Delivery URL checks
// ---------------------------------------------------------------------------

/// Validate a webhook delivery URL against a policy.
///
/// The URL must parse, carry an http(s) scheme the policy permits, and
/// point at a host the policy permits.
pub fn validate_webhook_url(url: &str, policy: &UrlPolicy) -> Result<(), WebhookError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| WebhookError::InvalidUrl(format!("Unparseable URL: {e}")))?;

    match parsed.scheme() {
        "https" => {}
        "http" => {
            if policy.require_https {
                return Err(WebhookError::InvalidUrl(
                    "Only HTTPS delivery URLs are accepted".to_string(),
                ));
            }
        }
        other => {
            return Err(WebhookError::InvalidUrl(format!(
                "Scheme {other} is not deliverable"
            )));
        }
    }

    let Some(host) = parsed.host_str() else {
        return Err(WebhookError::InvalidUrl("URL has no host".to_string()));
    };

    if policy.allow_internal_hosts {
        return Ok(());
    }
    validate_host_not_internal(host)
}

// ---------------------------------------------------------------------------
// Internal destination blocking
// ---------------------------------------------------------------------------

/// Hostname suffixes that never leave the local network.
const INTERNAL_NAME_SUFFIXES: [&str; 2] = [".internal", ".local"];

/// Validate that a host is not a private or internal destination.
///
/// IP literals are rejected when they fall in loopback, RFC 1918, link-local
/// (the 169.254.0.0/16 cloud metadata range), CGNAT, broadcast, or
/// unspecified space. Names are rejected when they are `localhost`,
/// `metadata.google.internal`, or carry an internal-only suffix.
pub fn validate_host_not_internal(host: &str) -> Result<(), WebhookError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return if ip_is_internal(ip) {
            Err(WebhookError::SsrfDetected(format!(
                "Host {host} is in a blocked internal IP range"
            )))
        } else {
            Ok(())
        };
    }

    let name = host.to_ascii_lowercase();
    let blocked = name == "localhost"
        || name == "metadata.google.internal"
        || INTERNAL_NAME_SUFFIXES.iter().any(|s| name.ends_with(s));
    if blocked {
        return Err(WebhookError::SsrfDetected(format!(
            "Host {host} is a blocked internal name"
        )));
    }

    Ok(())
}

fn ip_is_internal(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            // 100.64.0.0/10, carrier-grade NAT; no std helper covers it.
            let cgnat = octets[0] == 100 && (octets[1] & 0xc0) == 0x40;
            cgnat
                || v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
        }
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    }
}

// ---------------------------------------------------------------------------
// Subscription validation
// ---------------------------------------------------------------------------

/// Validate and parse a subscription's event type list.
///
/// The list must be non-empty, every entry must be a known event type, and
/// reserved types (`test.ping`) are not subscribable.
pub fn validate_event_types(
    event_types: &[String],
) -> Result<Vec<WebhookEventType>, WebhookError> {
    if event_types.is_empty() {
        return Err(WebhookError::Validation(
            "At least one event type is required".to_string(),
        ));
    }

    let mut parsed = Vec::with_capacity(event_types.len());
    for et in event_types {
        let event_type = WebhookEventType::parse(et)
            .ok_or_else(|| WebhookError::Validation(format!("Unknown event type: {et}")))?;
        if !event_type.is_subscribable() {
            return Err(WebhookError::Validation(format!(
                "Event type {et} is reserved and cannot be subscribed to"
            )));
        }
        parsed.push(event_type);
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Custom header validation
// ---------------------------------------------------------------------------

/// Validate a config's custom delivery headers.
///
/// Names and values must be valid HTTP header tokens, and the signature
/// header may not be overridden.
pub fn validate_custom_headers(headers: &HashMap<String, String>) -> Result<(), WebhookError> {
    use reqwest::header::{HeaderName, HeaderValue};

    for (name, value) in headers {
        if name.eq_ignore_ascii_case(SIGNATURE_HEADER) {
            return Err(WebhookError::Validation(format!(
                "Header {SIGNATURE_HEADER} is reserved"
            )));
        }
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(WebhookError::Validation(format!(
                "Invalid header name: {name}"
            )));
        }
        if HeaderValue::from_str(value).is_err() {
            return Err(WebhookError::Validation(format!(
                "Invalid value for header {name}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
