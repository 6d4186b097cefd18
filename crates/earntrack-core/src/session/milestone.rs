//! Milestone celebrations.
//!
//! [`MilestoneNotifier`] decides *when* to celebrate; [`Celebrations`] performs
//! the side effect: a toast through a [`Notifier`] and a fireworks effect
//! streamed to a [`ParticleSink`] from a detached task.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::settings::Currency;

/// Earnings thresholds that trigger a celebration, ascending.
pub const MILESTONES: [u32; 17] = [
    1, 8, 18, 28, 58, 88, 100, 188, 288, 588, 888, 1000, 1888, 2888, 5888, 8888, 10000,
];

/// Tracks the last celebrated threshold of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneNotifier {
    last_celebrated: u32,
}

impl MilestoneNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_celebrated(&self) -> u32 {
        self.last_celebrated
    }

    /// The next threshold that has not been celebrated yet.
    pub fn next_threshold(&self) -> Option<u32> {
        MILESTONES.iter().copied().find(|&m| m > self.last_celebrated)
    }

    pub fn reset(&mut self) {
        self.last_celebrated = 0;
    }

    /// Observe the latest earnings. Returns the threshold to celebrate, at
    /// most one per observation.
    pub fn observe(&mut self, earnings: f64) -> Option<u32> {
        let next = self.next_threshold()?;
        if earnings >= f64::from(next) {
            self.last_celebrated = next;
            Some(next)
        } else {
            None
        }
    }
}

/// Receives the celebration toast.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Receives individual particle bursts. Origins are fractions of the
/// surface, `y` may be slightly negative (above the top edge).
pub trait ParticleSink: Send + Sync {
    fn burst(&self, origin_x: f64, origin_y: f64, particle_count: u32);
}

/// Shape of the fireworks effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fireworks {
    pub duration: Duration,
    pub burst_interval: Duration,
    pub max_particles: u32,
}

impl Default for Fireworks {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(3000),
            burst_interval: Duration::from_millis(250),
            max_particles: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub origin_x: f64,
    pub origin_y: f64,
    pub particle_count: u32,
}

impl Fireworks {
    /// Particle count for a burst fired with `time_left` of the effect to go.
    pub fn particle_count(&self, time_left: Duration) -> u32 {
        let total = self.duration.as_secs_f64();
        if total == 0.0 {
            return 0;
        }
        (f64::from(self.max_particles) * time_left.as_secs_f64() / total).round() as u32
    }

    /// One left-edge and one right-edge burst.
    pub fn bursts<R: Rng>(&self, time_left: Duration, rng: &mut R) -> [Burst; 2] {
        let particle_count = self.particle_count(time_left);
        [
            Burst {
                origin_x: rng.gen_range(0.1..0.3),
                origin_y: rng.gen::<f64>() - 0.2,
                particle_count,
            },
            Burst {
                origin_x: rng.gen_range(0.7..0.9),
                origin_y: rng.gen::<f64>() - 0.2,
                particle_count,
            },
        ]
    }

    /// Run the effect on a detached task. It runs to completion regardless of
    /// what happens to the session in the meantime.
    pub fn launch(self, sink: Arc<dyn ParticleSink>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let started = Instant::now();
            let mut interval = time::interval(self.burst_interval);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let elapsed = started.elapsed();
                if elapsed >= self.duration {
                    break;
                }
                for burst in self.bursts(self.duration - elapsed, &mut rng) {
                    sink.burst(burst.origin_x, burst.origin_y, burst.particle_count);
                }
            }
        })
    }
}

/// The celebration side channel handed to the engine.
#[derive(Clone)]
pub struct Celebrations {
    notifier: Arc<dyn Notifier>,
    particles: Arc<dyn ParticleSink>,
    fireworks: Fireworks,
}

impl Celebrations {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        particles: Arc<dyn ParticleSink>,
        fireworks: Fireworks,
    ) -> Self {
        Self {
            notifier,
            particles,
            fireworks,
        }
    }

    /// Toast the milestone and start fireworks. The effect needs a tokio
    /// runtime; without one only the toast is shown.
    pub fn celebrate(&self, threshold: u32, currency: Currency) -> Option<JoinHandle<()>> {
        let (title, message) = celebration_text(threshold, currency);
        self.notifier.notify(&title, &message);

        if tokio::runtime::Handle::try_current().is_err() {
            tracing::debug!(threshold, "no runtime, skipping fireworks");
            return None;
        }
        Some(self.fireworks.launch(self.particles.clone()))
    }
}

impl std::fmt::Debug for Celebrations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Celebrations")
            .field("fireworks", &self.fireworks)
            .finish_non_exhaustive()
    }
}

pub fn celebration_text(threshold: u32, currency: Currency) -> (String, String) {
    (
        "🎉 Congratulations!".to_string(),
        format!("Earned {}{threshold}!", currency.symbol()),
    )
}
