//! Latest-value broadcast used for push-style observation.
//!
//! Subscribers always see the most recent value; intermediate values may be
//! skipped if a subscriber falls behind.

use tokio::sync::watch;

/// A published value plus any number of subscribers.
#[derive(Debug)]
pub struct Feed<T> {
    sender: watch::Sender<T>,
}

impl<T> Feed<T> {
    /// Create a feed holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Replace the current value and wake every subscriber.
    ///
    /// Succeeds whether or not anyone is subscribed.
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Subscribe; the receiver starts at the current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Clone of the current value.
    #[must_use]
    pub fn latest(&self) -> T
    where
        T: Clone,
    {
        self.sender.borrow().clone()
    }
}

impl<T: Default> Default for Feed<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_latest_value() {
        let feed = Feed::new(0_u32);
        let mut rx = feed.subscribe();

        feed.publish(1);
        feed.publish(2);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let feed: Feed<Vec<&str>> = Feed::default();
        feed.publish(vec!["Tea"]);
        assert_eq!(feed.latest(), ["Tea"]);

        let late = feed.subscribe();
        assert_eq!(*late.borrow(), ["Tea"]);
    }
}
