//! Structured observability events emitted at the gateway's extension points.
//!
//! The core never writes log lines directly at these points. It hands a
//! [`GatewayEvent`] to an [`EventSink`]; the default [`TracingSink`] turns
//! them into `tracing` events, and [`MemorySink`] keeps them for inspection.

use crate::agent::FailureCategory;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

/// Degradation level the orchestrator fell back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTier {
    /// Plain generation against the default agent or direct provider.
    DirectGeneration,
    /// Static persona-toned apology, no network call.
    Apology,
}

impl fmt::Display for FallbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackTier::DirectGeneration => write!(f, "direct_generation"),
            FallbackTier::Apology => write!(f, "apology"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// About to probe the gateway before a delegation.
    ProbeStarted { base_url: String },
    ProbeFinished {
        base_url: String,
        reachable: bool,
        latency: Duration,
    },
    /// A retryable failure occurred; `delay` will be slept before the next try.
    RetryScheduled {
        operation: String,
        category: FailureCategory,
        /// 1-based index of the attempt that just failed.
        attempt: u32,
        delay: Duration,
    },
    FallbackEngaged { tier: FallbackTier, reason: String },
}

/// Receiver of gateway events.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: &GatewayEvent);
}

/// Writes every event as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &GatewayEvent) {
        match event {
            GatewayEvent::ProbeStarted { base_url } => {
                tracing::debug!(base_url = %base_url, "Probing gateway before delegation");
            }
            GatewayEvent::ProbeFinished {
                base_url,
                reachable,
                latency,
            } => {
                tracing::debug!(
                    base_url = %base_url,
                    reachable = reachable,
                    latency_ms = latency.as_millis() as u64,
                    "Gateway probe finished"
                );
            }
            GatewayEvent::RetryScheduled {
                operation,
                category,
                attempt,
                delay,
            } => {
                tracing::warn!(
                    operation = %operation,
                    category = %category,
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Transient gateway failure, retrying"
                );
            }
            GatewayEvent::FallbackEngaged { tier, reason } => {
                tracing::warn!(tier = %tier, reason = %reason, "Falling back");
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<GatewayEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GatewayEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Backoff delays of every scheduled retry.
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                GatewayEvent::RetryScheduled { delay, .. } => Some(delay),
                _ => None,
            })
            .collect()
    }

    pub fn fallbacks(&self) -> Vec<FallbackTier> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                GatewayEvent::FallbackEngaged { tier, .. } => Some(tier),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &GatewayEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
