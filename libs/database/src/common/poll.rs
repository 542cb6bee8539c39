use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// Fixed-interval polling configuration
///
/// Unlike [`RetryConfig`](super::RetryConfig), the interval does not grow:
/// polling is for waiting on a state change, not for riding out failures.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between two probes
    pub interval: Duration,

    /// Give up once this much time has passed since the first probe
    pub timeout: Duration,
}

impl PollConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            timeout: Duration::from_secs(120),
        }
    }
}

/// The polled condition did not hold before the deadline
#[derive(Debug, Clone, thiserror::Error)]
#[error("condition not met after {attempts} attempts ({elapsed:?})")]
pub struct PollTimeout {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Run `probe` until it returns `true`, sleeping `config.interval` in between.
///
/// The probe receives the 1-based attempt number. Returns the number of
/// attempts it took. The probe is always run at least once, a probe still
/// pending at the deadline is dropped, and no sleep is started that would end
/// past the deadline.
pub async fn poll_until<F, Fut>(mut probe: F, config: &PollConfig) -> Result<u32, PollTimeout>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = bool>,
{
    let started = Instant::now();
    let mut attempt = 0;

    loop {
        attempt += 1;

        let remaining = config.timeout.saturating_sub(started.elapsed());
        match tokio::time::timeout(remaining, probe(attempt)).await {
            Ok(true) => {
                debug!(attempts = attempt, elapsed = ?started.elapsed(), "Poll condition met");
                return Ok(attempt);
            }
            Ok(false) => {}
            Err(_) => {
                debug!(attempts = attempt, "Probe still pending at deadline");
                return Err(PollTimeout {
                    attempts: attempt,
                    elapsed: started.elapsed(),
                });
            }
        }

        let elapsed = started.elapsed();
        if elapsed + config.interval > config.timeout {
            return Err(PollTimeout {
                attempts: attempt,
                elapsed,
            });
        }

        tokio::time::sleep(config.interval).await;
    }
}
