// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Observability hook for degraded (swallowed) tier failures.
//!
//! Best-effort failures (the primary tier erroring on a read or delete, or a
//! backfill write failing) never surface through return values. They are
//! reported here instead, so a degraded fast tier stays visible to operators
//! without turning a working cache into a failing one.

use crate::combine::TierRole;
use strata_tier::Error;

/// A cache operation name, as used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A value lookup.
    Get,
    /// A value write.
    Insert,
    /// A keyed delete.
    Remove,
    /// A presence check.
    Contains,
    /// A whole-tier flush.
    Clear,
    /// Resource release.
    Close,
}

impl Operation {
    /// Returns the dotted operation name used in log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "cache.get",
            Self::Insert => "cache.insert",
            Self::Remove => "cache.remove",
            Self::Contains => "cache.contains",
            Self::Clear => "cache.clear",
            Self::Close => "cache.close",
        }
    }
}

/// Observer for tier failures that the layered cache absorbs.
///
/// Inject an implementation via `LayeredCacheBuilder::observer` to route
/// degraded-tier diagnostics into your own telemetry. The default,
/// [`TracingObserver`], emits a `tracing` warning per event.
///
/// Closures with the matching signature implement this trait directly:
///
/// ```
/// use strata::{DegradeObserver, Operation, TierRole};
///
/// let observer = |tier: TierRole, operation: Operation, error: &strata::Error| {
///     eprintln!("{tier} degraded during {}: {error}", operation.as_str());
/// };
/// let _: &dyn DegradeObserver = &observer;
/// ```
pub trait DegradeObserver: Send + Sync {
    /// Called once per absorbed tier failure.
    fn degraded(&self, tier: TierRole, operation: Operation, error: &Error);
}

impl<F> DegradeObserver for F
where
    F: Fn(TierRole, Operation, &Error) + Send + Sync,
{
    fn degraded(&self, tier: TierRole, operation: Operation, error: &Error) {
        self(tier, operation, error);
    }
}

/// The default observer: logs each absorbed failure via [`tracing::warn!`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DegradeObserver for TracingObserver {
    fn degraded(&self, tier: TierRole, operation: Operation, error: &Error) {
        tracing::warn!(
            tier = tier.as_str(),
            operation = operation.as_str(),
            error = %error,
            "cache tier degraded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn operation_as_str() {
        assert_eq!(Operation::Get.as_str(), "cache.get");
        assert_eq!(Operation::Insert.as_str(), "cache.insert");
        assert_eq!(Operation::Remove.as_str(), "cache.remove");
        assert_eq!(Operation::Contains.as_str(), "cache.contains");
        assert_eq!(Operation::Clear.as_str(), "cache.clear");
        assert_eq!(Operation::Close.as_str(), "cache.close");
    }

    #[test]
    fn closures_observe_events() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let observer = move |_: TierRole, _: Operation, _: &Error| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        observer.degraded(TierRole::Primary, Operation::Get, &Error::from_message("boom"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tracing_observer_does_not_panic_without_subscriber() {
        TracingObserver.degraded(TierRole::Primary, Operation::Get, &Error::from_message("boom"));
    }
}
