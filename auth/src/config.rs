//! Authentication configuration.
//!
//! Latencies only affect [`SimulatedAuthProvider`](crate::providers::SimulatedAuthProvider);
//! a real provider takes as long as the network does.

use crate::constants::latency;
use std::time::Duration;
use todoapp_runtime::OperationOrdering;

/// Simulated latency per provider operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthLatencies {
    /// Sign-in.
    pub sign_in: Duration,
    /// Sign-up.
    pub sign_up: Duration,
    /// Sign-out.
    pub sign_out: Duration,
    /// Password reset request.
    pub reset_password: Duration,
    /// Email confirmation.
    pub confirm_email: Duration,
    /// Verification resend.
    pub resend_verification: Duration,
}

impl AuthLatencies {
    /// The same latency for every operation.
    #[must_use]
    pub const fn uniform(latency: Duration) -> Self {
        Self {
            sign_in: latency,
            sign_up: latency,
            sign_out: latency,
            reset_password: latency,
            confirm_email: latency,
            resend_verification: latency,
        }
    }

    /// Every latency multiplied by `factor`.
    ///
    /// Negative or non-finite factors are treated as zero. Products too
    /// large for a [`Duration`] saturate at [`Duration::MAX`].
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        if !(factor.is_finite() && factor > 0.0) {
            return Self::uniform(Duration::ZERO);
        }
        self.checked_scaled(factor)
            .unwrap_or_else(|| Self::uniform(Duration::MAX))
    }

    /// Every latency multiplied by `factor`, or `None` if the factor is
    /// negative or not a number, or a product overflows a [`Duration`].
    #[must_use]
    pub fn checked_scaled(self, factor: f64) -> Option<Self> {
        let scale = |d: Duration| Duration::try_from_secs_f64(d.as_secs_f64() * factor).ok();
        Some(Self {
            sign_in: scale(self.sign_in)?,
            sign_up: scale(self.sign_up)?,
            sign_out: scale(self.sign_out)?,
            reset_password: scale(self.reset_password)?,
            confirm_email: scale(self.confirm_email)?,
            resend_verification: scale(self.resend_verification)?,
        })
    }
}

impl Default for AuthLatencies {
    fn default() -> Self {
        Self {
            sign_out: latency::SIGN_OUT,
            ..Self::uniform(latency::DEFAULT)
        }
    }
}

/// Authentication container configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Simulated provider latencies.
    ///
    /// Default: 1000 ms, except sign-out at 500 ms
    pub latencies: AuthLatencies,

    /// How overlapping operations are admitted.
    ///
    /// Default: serialized
    pub ordering: OperationOrdering,
}

impl AuthConfig {
    /// Create configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set provider latencies.
    #[must_use]
    pub const fn with_latencies(mut self, latencies: AuthLatencies) -> Self {
        self.latencies = latencies;
        self
    }

    /// Set operation ordering.
    #[must_use]
    pub const fn with_ordering(mut self, ordering: OperationOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}
