use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::{Error, Result};

pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(2000);

/// Pause inserted after every article fetch.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn wait(&self);
}

/// Sleeps for a duration drawn uniformly from `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            return Err(Error::Config(format!(
                "minimum delay {:?} is greater than maximum delay {:?}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }

    pub fn next_delay(&self) -> Duration {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for RandomDelay {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_DELAY,
            max: DEFAULT_MAX_DELAY,
        }
    }
}

#[async_trait]
impl Pacer for RandomDelay {
    async fn wait(&self) {
        let delay = self.next_delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "pacing before next fetch");
        tokio::time::sleep(delay).await;
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn wait(&self) {}
}
