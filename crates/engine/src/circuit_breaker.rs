use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// State of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation: all calls pass through.
    Closed,
    /// Breaker tripped: calls are rejected.
    Open,
    /// Cooldown elapsed: a single probe call is allowed.
    HalfOpen,
}

/// Opens after `failure_threshold` consecutive failures and closes again
/// after a successful probe once the cooldown has elapsed.
///
/// Half-open admits one probe at a time. A probe that never reports back
/// (dropped future) is given up on after another cooldown.
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    cooldown: Duration,
    /// Never held across await points.
    inner: Mutex<CircuitInner>,
}

struct CircuitInner {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
    probe_started: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new(name: &str, failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            name: name.to_string(),
            failure_threshold: failure_threshold.max(1),
            cooldown,
            inner: Mutex::new(CircuitInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_failure: None,
                probe_started: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CircuitInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check whether a call should be allowed.
    pub fn allow(&self) -> bool {
        let mut inner = self.lock();

        match inner.state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                let probe_free = inner
                    .probe_started
                    .map_or(true, |started| started.elapsed() >= self.cooldown);
                if probe_free {
                    inner.probe_started = Some(Instant::now());
                }
                probe_free
            }
            CircuitState::Open => {
                let cooled = inner
                    .last_failure
                    .map_or(true, |last| last.elapsed() >= self.cooldown);
                if cooled {
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_started = Some(Instant::now());
                    tracing::info!(
                        circuit = %self.name,
                        "Circuit breaker transitioning to half-open"
                    );
                }
                cooled
            }
        }
    }

    /// Record a successful call: reset failure count, close circuit.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = 0;
        inner.probe_started = None;

        if inner.state != CircuitState::Closed {
            tracing::info!(
                circuit = %self.name,
                previous_state = ?inner.state,
                "Circuit breaker closing after success"
            );
            inner.state = CircuitState::Closed;
            metrics::counter!("grievance.circuit_breaker.recoveries", "circuit" => self.name.clone())
                .increment(1);
        }
    }

    /// Record a failed call: a failed half-open probe reopens immediately.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        inner.last_failure = Some(Instant::now());
        inner.probe_started = None;

        let trip = inner.state == CircuitState::HalfOpen
            || (inner.state == CircuitState::Closed
                && inner.consecutive_failures >= self.failure_threshold);

        if trip {
            tracing::warn!(
                circuit = %self.name,
                failures = inner.consecutive_failures,
                threshold = self.failure_threshold,
                "Circuit breaker OPEN"
            );
            inner.state = CircuitState::Open;
            metrics::counter!("grievance.circuit_breaker.trips", "circuit" => self.name.clone())
                .increment(1);
        }
    }

    pub fn current_state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
