//! Telemetry helpers for applications embedding `chart-annotations`.
//!
//! This module keeps tracing setup explicit and opt-in.
//! Consumers can either call `init_default_tracing` or wire their own
//! `tracing` subscriber and filters.
//!
//! It also hosts the warning throttle used by the interaction engine: repeated
//! failures (for example a drag that keeps leaving the visible range) are
//! reported once per `(code, identity)` key and interval.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default minimum interval between two warnings sharing the same key.
pub const DEFAULT_WARNING_INTERVAL: Duration = Duration::from_millis(800);

const RECENT_WARNINGS_CAPACITY: usize = 64;

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Classification of observational warnings raised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningCode {
    DraftPointUnmappable,
    DragPointUnmappable,
    RenderPointUnmappable,
    UpdateTargetMissing,
}

impl WarningCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DraftPointUnmappable => "draft-point-unmappable",
            Self::DragPointUnmappable => "drag-point-unmappable",
            Self::RenderPointUnmappable => "render-point-unmappable",
            Self::UpdateTargetMissing => "update-target-missing",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One warning that passed the throttle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticWarning {
    pub code: WarningCode,
    pub identity: String,
    pub message: String,
}

/// Per-key rate limiter for warnings.
#[derive(Debug, Clone)]
pub struct WarningThrottle {
    interval: Duration,
    last_emitted: HashMap<(WarningCode, String), Instant>,
}

impl Default for WarningThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_WARNING_INTERVAL)
    }
}

impl WarningThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emitted: HashMap::new(),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns `true` when a warning for this key may be emitted at `now`,
    /// recording the emission.
    ///
    /// Keys whose interval has elapsed are forgotten on every emission, so
    /// the map only holds keys that are still being suppressed.
    pub fn permit(&mut self, code: WarningCode, identity: &str, now: Instant) -> bool {
        let key = (code, identity.to_owned());
        if let Some(last) = self.last_emitted.get(&key) {
            if now.saturating_duration_since(*last) < self.interval {
                return false;
            }
        }
        let interval = self.interval;
        self.last_emitted
            .retain(|_, last| now.saturating_duration_since(*last) < interval);
        self.last_emitted.insert(key, now);
        true
    }

    /// Number of keys currently being suppressed or awaiting expiry.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.last_emitted.len()
    }

    pub fn reset(&mut self) {
        self.last_emitted.clear();
    }
}

/// Throttled warning sink with a bounded history the host can drain.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    throttle: WarningThrottle,
    recent: VecDeque<DiagnosticWarning>,
    suppressed: usize,
}

impl Diagnostics {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            throttle: WarningThrottle::new(interval),
            recent: VecDeque::new(),
            suppressed: 0,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.throttle.set_interval(interval);
    }

    /// Emits a warning unless the same `(code, identity)` fired recently.
    ///
    /// Returns whether the warning was emitted.
    pub fn warn(&mut self, code: WarningCode, identity: &str, message: impl Into<String>) -> bool {
        self.warn_at(code, identity, message, Instant::now())
    }

    pub fn warn_at(
        &mut self,
        code: WarningCode,
        identity: &str,
        message: impl Into<String>,
        now: Instant,
    ) -> bool {
        if !self.throttle.permit(code, identity, now) {
            self.suppressed += 1;
            return false;
        }

        let message = message.into();
        warn!(code = %code, identity, "{message}");
        if self.recent.len() == RECENT_WARNINGS_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(DiagnosticWarning {
            code,
            identity: identity.to_owned(),
            message,
        });
        true
    }

    #[must_use]
    pub fn recent(&self) -> impl Iterator<Item = &DiagnosticWarning> {
        self.recent.iter()
    }

    /// Number of warnings swallowed by the throttle since creation.
    #[must_use]
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    pub fn drain(&mut self) -> Vec<DiagnosticWarning> {
        self.recent.drain(..).collect()
    }
}
