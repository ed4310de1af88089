//! Buyer notifications
//!
//! The lifecycle only needs a "send notification" capability; template
//! rendering and the mail transport live outside the core. The shipped
//! gateway composes the buyer-facing message and hands it to the log.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::{
    config::AppConfig,
    domain::orders::models::{Order, OrderStatus},
};

/// A notification could not be handed to its delivery channel.
///
/// Callers on the order lifecycle log this and move on; it never unwinds a
/// committed transition.
#[derive(Debug, Error)]
#[error("notification delivery failed: {reason}")]
pub struct NotificationError {
    /// Channel-specific description of the failure.
    pub reason: String,
}

#[automock]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Tells the buyer their order moved from one status to another.
    async fn notify_status_change(
        &self,
        order: &Order,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), NotificationError>;
}

/// Gateway that writes buyer notifications to the application log.
#[derive(Debug, Clone)]
pub struct LogNotificationGateway {
    store_name: String,
    contact_email: String,
    base_url: String,
}

impl LogNotificationGateway {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store_name: config.store_name.clone(),
            contact_email: config.contact_email.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn tracking_link(&self, order: &Order) -> String {
        format!("{}/store/orders/track/{}", self.base_url, order.reference)
    }

    fn subject(&self, order: &Order, to: OrderStatus) -> String {
        format!(
            "Your order with tracking code {} - {}!",
            order.reference, to
        )
    }
}

#[async_trait]
impl NotificationGateway for LogNotificationGateway {
    async fn notify_status_change(
        &self,
        order: &Order,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), NotificationError> {
        info!(
            order_uuid = %order.uuid,
            reference = %order.reference,
            from = %from,
            to = %to,
            subject = %self.subject(order, to),
            tracking_link = %self.tracking_link(order),
            store = %self.store_name,
            contact = %self.contact_email,
            "buyer notified of status change"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_link_strips_the_trailing_slash() {
        let config = AppConfig {
            store_name: "Folio Books".to_string(),
            contact_email: "hello@folio.example".to_string(),
            base_url: "https://shop.example/".to_string(),
            log_level: "info".to_string(),
        };

        let gateway = LogNotificationGateway::new(&config);

        let order = Order::create(
            crate::domain::orders::models::OrderUuid::new(),
            uuid::Uuid::now_v7(),
            "ord_abc".to_string(),
            jiff::Timestamp::UNIX_EPOCH,
        );

        assert_eq!(
            gateway.tracking_link(&order),
            "https://shop.example/store/orders/track/ord_abc"
        );
    }
}
