//! Repeating tick source for a running session.
//!
//! The interval only exists while armed. Disarming drops it, so a paused or
//! reset session never has a timer left behind.

use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Arm when `active`, disarm otherwise. Re-arming an armed ticker keeps
    /// its schedule.
    pub fn sync(&mut self, active: bool) {
        match (active, self.interval.is_some()) {
            (true, false) => {
                let mut interval = time::interval(self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.interval = Some(interval);
                tracing::trace!(period_ms = self.period.as_millis() as u64, "ticker armed");
            }
            (false, true) => {
                self.interval = None;
                tracing::trace!("ticker disarmed");
            }
            _ => {}
        }
    }

    /// Wait for the next tick. Pending forever while disarmed, which makes it
    /// safe to use as a `tokio::select!` branch.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn armed_ticker_fires_on_period() {
        let mut ticker = Ticker::new(Duration::from_millis(50));
        ticker.sync(true);
        let start = time::Instant::now();
        for _ in 0..5 {
            ticker.tick().await;
        }
        // first tick is immediate
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_ticker_never_fires() {
        let mut ticker = Ticker::new(Duration::from_millis(50));
        ticker.sync(true);
        ticker.tick().await;
        ticker.sync(false);
        assert!(!ticker.is_armed());
        let waited = time::timeout(Duration::from_secs(5), ticker.tick()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn resync_while_armed_keeps_schedule() {
        let mut ticker = Ticker::new(Duration::from_millis(50));
        ticker.sync(true);
        ticker.tick().await;
        ticker.sync(true);
        let start = time::Instant::now();
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }
}
