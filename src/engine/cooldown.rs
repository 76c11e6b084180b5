use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

/// Per-(group, user) guess throttle. Sits in front of the engine and never
/// touches game state: a throttled guess is rejected outright.
#[derive(Debug, Clone)]
pub struct Cooldowns {
    interval: Duration,
    last: Arc<Mutex<HashMap<(String, String), Instant>>>,
}

impl Cooldowns {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Arc::default(),
        }
    }

    /// `None` when the user may guess, or the time still left on their
    /// cooldown. Read-only: a rejected guess must not restart the clock, so
    /// callers [`stamp`](Self::stamp) separately once a guess is accepted.
    pub async fn remaining(&self, group_id: &str, user_id: &str) -> Option<Duration> {
        let guard = self.last.lock().await;
        let last = guard.get(&(group_id.to_owned(), user_id.to_owned()))?;

        let elapsed = last.elapsed();
        (elapsed < self.interval).then(|| self.interval - elapsed)
    }

    /// Starts the user's cooldown now.
    pub async fn stamp(&self, group_id: &str, user_id: &str) {
        self.last
            .lock()
            .await
            .insert((group_id.to_owned(), user_id.to_owned()), Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Cooldowns;

    #[tokio::test]
    async fn throttles_per_group_and_user() {
        let cooldowns = Cooldowns::new(Duration::from_secs(60));

        assert!(cooldowns.remaining("g", "alice").await.is_none());
        cooldowns.stamp("g", "alice").await;
        assert!(cooldowns.remaining("g", "alice").await.is_some());

        // other users and other groups are unaffected
        assert!(cooldowns.remaining("g", "bob").await.is_none());
        assert!(cooldowns.remaining("h", "alice").await.is_none());
    }

    #[tokio::test]
    async fn checking_does_not_start_the_clock() {
        let cooldowns = Cooldowns::new(Duration::from_secs(60));

        // any number of reads leaves the user free to guess
        assert!(cooldowns.remaining("g", "alice").await.is_none());
        assert!(cooldowns.remaining("g", "alice").await.is_none());

        cooldowns.stamp("g", "alice").await;
        assert!(cooldowns.remaining("g", "alice").await.is_some());
    }

    #[tokio::test]
    async fn zero_interval_never_throttles() {
        let cooldowns = Cooldowns::new(Duration::ZERO);

        cooldowns.stamp("g", "alice").await;
        assert!(cooldowns.remaining("g", "alice").await.is_none());
    }
}
