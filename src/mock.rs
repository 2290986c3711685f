//! Mock implementations for testing
//!
//! Provides a scripted metric source, a recording notifier and a manual clock
//! so the monitor can be exercised without network access or real delays.

use crate::domain::Sample;
use crate::error::{FetchError, NotifyError};
use crate::notify::{Message, Notifier};
use crate::runtime::{Clock, Sleeper};
use crate::source::MetricSource;

use chrono::NaiveDateTime;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Timestamp attached to every scripted sample
const MOCK_SAMPLE_MS: i64 = 1_700_000_000_000;

/// Metric source returning scripted results
#[derive(Debug)]
pub struct MockSource {
    volatility: Mutex<VecDeque<Result<f64, FetchError>>>,
    price: Mutex<Option<f64>>,
    volatility_calls: AtomicUsize,
    price_calls: AtomicUsize,
}

impl MockSource {
    /// Create a source with no scripted volatility and a price of 3000
    pub fn new() -> Self {
        Self {
            volatility: Mutex::new(VecDeque::new()),
            price: Mutex::new(Some(3000.0)),
            volatility_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
        }
    }

    /// Builder: script volatility results, consumed one per call
    pub fn with_volatility(self, results: Vec<Result<f64, FetchError>>) -> Self {
        *self.volatility.lock().unwrap() = results.into();
        self
    }

    /// Builder: set the spot price (`None` makes lookups fail)
    pub fn with_price(self, price: Option<f64>) -> Self {
        *self.price.lock().unwrap() = price;
        self
    }

    /// Change the spot price
    pub fn set_price(&self, price: Option<f64>) {
        *self.price.lock().unwrap() = price;
    }

    pub fn volatility_calls(&self) -> usize {
        self.volatility_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for MockSource {
    fn volatility(&self) -> Result<Sample, FetchError> {
        self.volatility_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .volatility
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted sample".to_string())));

        next.and_then(|v| {
            Sample::from_millis(v, MOCK_SAMPLE_MS).map_err(|e| FetchError::Malformed(e.to_string()))
        })
    }

    fn spot_price(&self) -> Result<f64, FetchError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.price
            .lock()
            .unwrap()
            .ok_or_else(|| FetchError::Transport("price unavailable".to_string()))
    }
}

/// Notifier recording every message it is asked to send
#[derive(Debug)]
pub struct MockNotifier {
    sent: Mutex<Vec<Message>>,
    failing_sends: AtomicUsize,
    credentials_ok: bool,
    verify_calls: AtomicUsize,
    send_calls: AtomicUsize,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_sends: AtomicUsize::new(0),
            credentials_ok: true,
            verify_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
        }
    }

    /// Builder: make `verify` fail
    pub fn rejecting_credentials(mut self) -> Self {
        self.credentials_ok = false;
        self
    }

    /// Make the next `count` sends fail
    pub fn fail_next_sends(&self, count: usize) {
        self.failing_sends.store(count, Ordering::SeqCst);
    }

    /// Messages delivered successfully, in order
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    /// Plain text of delivered messages
    pub fn sent_text(&self) -> Vec<String> {
        self.sent().iter().map(Message::plain_text).collect()
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MockNotifier {
    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_sends.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_sends.store(failing - 1, Ordering::SeqCst);
            return Err(NotifyError::Fetch(FetchError::RetriesExhausted {
                attempts: 4,
                last: Box::new(FetchError::Transport("connection reset".to_string())),
            }));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn verify(&self) -> Result<(), NotifyError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.credentials_ok {
            Ok(())
        } else {
            Err(NotifyError::Rejected("Unauthorized".to_string()))
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Sleeper that records requested delays and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Clock whose time only moves when something sleeps on it
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move the clock to an absolute time
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

impl Sleeper for ManualClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let step = chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        let mut now = self.now.lock().unwrap();
        *now += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_mock_source_script() {
        let source = MockSource::new().with_volatility(vec![Ok(50.0), Err(FetchError::Transport("x".into()))]);
        assert_eq!(source.volatility().unwrap().volatility, 50.0);
        assert!(source.volatility().is_err());
        assert!(source.volatility().is_err());
        assert_eq!(source.volatility_calls(), 3);
    }

    #[test]
    fn test_mock_notifier_failures() {
        let notifier = MockNotifier::new();
        notifier.fail_next_sends(1);
        let msg = crate::notify::MessageBuilder::new().text("hi").build();
        assert!(notifier.send(&msg).is_err());
        assert!(notifier.send(&msg).is_ok());
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(notifier.send_calls(), 2);
    }

    #[test]
    fn test_manual_clock_advances_on_sleep() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(7, 45, 0)
            .unwrap();
        let clock = ManualClock::new(start);
        clock.sleep(Duration::from_secs(1800));
        assert_eq!(clock.now(), start + chrono::Duration::minutes(30));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1800)]);
    }
}
