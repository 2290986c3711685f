//! Notification service
//!
//! Turns decided notifications into delivered messages, looking up the spot
//! price on demand for the kinds that embed it.

use crate::alerts::Notification;
use crate::notify::{MessageFormatter, Notifier};
use crate::source::MetricSource;

use chrono::NaiveDateTime;

/// Outcome of delivering one notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the transport
    Sent,
    /// Rendered but the transport failed
    Failed,
    /// Not rendered because a required input was unavailable
    Skipped,
}

/// Renders and sends notifications through a single channel
pub struct NotificationService<N> {
    notifier: N,
    formatter: MessageFormatter,
}

impl<N: Notifier> NotificationService<N> {
    pub fn new(notifier: N, formatter: MessageFormatter) -> Self {
        Self {
            notifier,
            formatter,
        }
    }

    /// Get the underlying notifier
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Render and send a notification
    pub fn deliver<S>(&self, notification: &Notification, source: &S, now: NaiveDateTime) -> Delivery
    where
        S: MetricSource + ?Sized,
    {
        let price = if notification.needs_price() {
            match source.spot_price() {
                Ok(price) => Some(price),
                Err(e) => {
                    log::warn!("Spot price unavailable for {}: {}", notification.kind(), e);
                    None
                }
            }
        } else {
            None
        };

        if notification.requires_price() && price.is_none() {
            log::warn!("Skipping {} notification without a spot price", notification.kind());
            return Delivery::Skipped;
        }

        let message = self.formatter.render(notification, price, now);
        match self.notifier.send(&message) {
            Ok(()) => {
                log::info!("Sent {} notification via {}", notification, self.notifier.name());
                Delivery::Sent
            }
            Err(e) => {
                log::error!(
                    "Failed to send {} notification via {}: {}",
                    notification,
                    self.notifier.name(),
                    e
                );
                Delivery::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertRules;
    use crate::mock::{MockNotifier, MockSource};
    use chrono::NaiveDate;

    fn service() -> NotificationService<MockNotifier> {
        NotificationService::new(
            MockNotifier::new(),
            MessageFormatter::new("ETH", "usd", "https://example.com/chart", AlertRules::default()),
        )
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_alert_fetches_price() {
        let service = service();
        let source = MockSource::new().with_price(Some(3120.55));

        let delivery = service.deliver(&Notification::HighVolatility { volatility: 85.0 }, &source, now());
        assert_eq!(delivery, Delivery::Sent);
        assert_eq!(source.price_calls(), 1);
        assert!(service.notifier().sent_text()[0].contains("$3,120.55"));
    }

    #[test]
    fn test_recovered_skips_price_lookup() {
        let service = service();
        let source = MockSource::new();

        let delivery = service.deliver(&Notification::Recovered { volatility: 60.0 }, &source, now());
        assert_eq!(delivery, Delivery::Sent);
        assert_eq!(source.price_calls(), 0);
    }

    #[test]
    fn test_alert_sent_without_price() {
        let service = service();
        let source = MockSource::new().with_price(None);

        let delivery = service.deliver(&Notification::LowVolatility { volatility: 30.0 }, &source, now());
        assert_eq!(delivery, Delivery::Sent);
        assert!(service.notifier().sent_text()[0].contains("unavailable"));
    }

    #[test]
    fn test_briefing_skipped_without_price() {
        let service = service();
        let source = MockSource::new().with_price(None);

        let delivery = service.deliver(&Notification::Briefing { volatility: 50.0 }, &source, now());
        assert_eq!(delivery, Delivery::Skipped);
        assert_eq!(service.notifier().send_calls(), 0);
    }

    #[test]
    fn test_transport_failure() {
        let service = service();
        service.notifier().fail_next_sends(1);

        let delivery = service.deliver(&Notification::ConnectionRestored, &MockSource::new(), now());
        assert_eq!(delivery, Delivery::Failed);
        assert!(service.notifier().sent().is_empty());
    }
}
