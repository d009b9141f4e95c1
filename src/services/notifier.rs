//! Operator notification for new reservations.
//!
//! One outbound email per reservation, delivered through the Resend
//! transactional API. Best-effort by contract: the caller records the
//! failure but never rolls back the reservation, and nothing is retried.

use async_trait::async_trait;
use serde_json::json;

use crate::errors::NotificationError;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Seam for the reservation email so the store can be tested with a double.
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn reservation_created(
        &self,
        item_description: &str,
        reserved_by_name: &str,
        reserved_by_email: &str,
    ) -> Result<(), NotificationError>;
}

/// Notifier backed by the Resend HTTP API.
pub struct ResendNotifier {
    client: reqwest::Client,
    api_key: String,
    from: String,
    to: String,
}

impl ResendNotifier {
    pub fn new(api_key: String, from: String, to: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
            to,
        }
    }
}

#[async_trait]
impl ReservationNotifier for ResendNotifier {
    async fn reservation_created(
        &self,
        item_description: &str,
        reserved_by_name: &str,
        reserved_by_email: &str,
    ) -> Result<(), NotificationError> {
        let body = json!({
            "from": self.from,
            "to": [self.to],
            "subject": "New item reservation",
            "html": format!(
                "<h2>New reservation</h2>\
                 <p>The item \"{item_description}\" has been reserved.</p>\
                 <ul>\
                   <li>Name: {reserved_by_name}</li>\
                   <li>Email: {reserved_by_email}</li>\
                 </ul>"
            ),
        });

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// No-op notifier used when no API key is configured. Reservations still
/// work; the operator just gets no email.
pub struct DisabledNotifier;

#[async_trait]
impl ReservationNotifier for DisabledNotifier {
    async fn reservation_created(
        &self,
        item_description: &str,
        _reserved_by_name: &str,
        _reserved_by_email: &str,
    ) -> Result<(), NotificationError> {
        tracing::warn!(
            item = item_description,
            "reservation email skipped: no RESEND_API_KEY configured"
        );
        Ok(())
    }
}
