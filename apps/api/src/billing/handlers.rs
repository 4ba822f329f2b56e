use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::billing::webhook::{verify_signature, BillingEvent, StripeEvent, SIGNATURE_TOLERANCE_SECS};
use crate::errors::AppError;
use crate::state::AppState;
use crate::users::store::{activate_subscription, cancel_subscription};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/v1/billing/webhook
///
/// Takes the raw body: the signature covers the exact bytes Stripe sent.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::InvalidSignature("missing Stripe-Signature header".to_string()))?;

    verify_signature(
        signature,
        &body,
        &state.config.stripe_webhook_secret,
        chrono::Utc::now().timestamp(),
        SIGNATURE_TOLERANCE_SECS,
    )
    .map_err(|e| AppError::InvalidSignature(e.to_string()))?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Malformed event payload: {e}")))?;

    match event.classify() {
        BillingEvent::CheckoutCompleted {
            client_reference_id,
            customer,
        } => {
            let user_id = client_reference_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id).ok());
            match user_id {
                Some(user_id) => {
                    let updated =
                        activate_subscription(&state.db, user_id, customer.as_deref()).await?;
                    if updated {
                        info!(event_id = %event.id, user_id = %user_id, "Subscription activated");
                    } else {
                        warn!(event_id = %event.id, user_id = %user_id, "Checkout for unknown user");
                    }
                }
                None => warn!(event_id = %event.id, "Checkout without a usable client_reference_id"),
            }
        }
        BillingEvent::SubscriptionDeleted { customer } => match customer {
            Some(customer) => {
                let downgraded = cancel_subscription(&state.db, &customer).await?;
                info!(event_id = %event.id, customer = %customer, downgraded, "Subscription cancelled");
            }
            None => warn!(event_id = %event.id, "Subscription deletion without a customer"),
        },
        BillingEvent::Ignored => {
            info!(event_id = %event.id, event_type = %event.event_type, "Ignoring webhook event");
        }
    }

    Ok(Json(json!({ "received": true })))
}
