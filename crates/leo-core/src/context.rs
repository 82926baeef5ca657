//! `RunContext` replaces the source's process-wide loggers and singletons:
//! every stage receives one explicitly instead of reaching for global state.

use crate::config::RunConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A deterministic clock. Production runs use `Utc::now`; replay/testing
/// runs can pin a fixed instant so two runs with the same seed are
/// byte-identical (`spec.md` §8 invariant 6).
#[derive(Clone)]
pub enum Clock {
    Live,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Live => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Explicit context threaded through every stage call. No global mutable
/// state, no ambient loggers.
#[derive(Clone)]
pub struct RunContext {
    pub config: Arc<RunConfig>,
    pub cancel: CancellationToken,
    pub clock: Clock,
    pub rng_seed: u64,
}

impl RunContext {
    pub fn new(config: RunConfig, rng_seed: u64) -> Self {
        Self {
            config: Arc::new(config),
            cancel: CancellationToken::new(),
            clock: Clock::Live,
            rng_seed,
        }
    }

    pub fn with_fixed_clock(mut self, at: DateTime<Utc>) -> Self {
        self.clock = Clock::Fixed(at);
        self
    }

    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
