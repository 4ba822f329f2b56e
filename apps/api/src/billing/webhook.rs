//! Stripe webhook verification and event parsing.
//!
//! The `Stripe-Signature` header carries `t=<unix seconds>` and one or more
//! `v1=<hex>` entries, each an HMAC-SHA256 of `"<t>.<raw body>"` keyed with the
//! endpoint secret. Any matching `v1` inside the tolerance window is accepted.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed payload, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq)]
pub enum SignatureError {
    #[error("missing timestamp")]
    MissingTimestamp,

    #[error("no v1 signature present")]
    MissingSignature,

    #[error("timestamp outside the tolerance window")]
    Expired,

    #[error("signature does not match payload")]
    Mismatch,

    #[error("invalid secret")]
    InvalidKey,
}

fn mac_for(secret: &str, timestamp: &str, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Verifies a `Stripe-Signature` header against the raw request body.
pub fn verify_signature(
    header: &str,
    payload: &[u8],
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
    let signed_at: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::MissingTimestamp)?;
    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }
    if (now - signed_at).abs() > tolerance_secs {
        return Err(SignatureError::Expired);
    }

    let mac = mac_for(secret, timestamp, payload)?;
    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: Value,
}

/// The events this service acts on; everything else is acknowledged and ignored.
#[derive(Debug, PartialEq)]
pub enum BillingEvent {
    CheckoutCompleted {
        client_reference_id: Option<String>,
        customer: Option<String>,
    },
    SubscriptionDeleted {
        customer: Option<String>,
    },
    Ignored,
}

fn string_field(object: &Value, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

impl StripeEvent {
    pub fn classify(&self) -> BillingEvent {
        let object = &self.data.object;
        match self.event_type.as_str() {
            "checkout.session.completed" => BillingEvent::CheckoutCompleted {
                client_reference_id: string_field(object, "client_reference_id"),
                customer: string_field(object, "customer"),
            },
            "customer.subscription.deleted" => BillingEvent::SubscriptionDeleted {
                customer: string_field(object, "customer"),
            },
            _ => BillingEvent::Ignored,
        }
    }
}
