// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Failure aggregation for concurrent tier fan-out.
//!
//! Dual-tier operations (`insert`, `clear`, `close`) dispatch to both tiers
//! and can therefore fail zero, one, or two times. This module merges those
//! outcomes into a single error without losing which tier(s) failed: a single
//! failure propagates enriched with its tier role, a double failure wraps a
//! [`CompositeError`] carrying both causes.

use ohno::EnrichableExt;

use strata_tier::{Error, Result};

/// The role a tier plays inside the layered cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierRole {
    /// The fast, local tier consulted first on reads. Best-effort for
    /// reads and deletes.
    Primary,
    /// The slower tier of record. Authoritative for deletes and read
    /// fall-through.
    Secondary,
}

impl TierRole {
    /// Returns the role name used in error messages and log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for TierRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error aggregating failures from both tiers of a dual-tier operation.
///
/// Neither cause is discarded: [`causes`](Self::causes) exposes both,
/// labeled with their tier role, and the `Display` output includes both
/// messages. Recover it from a propagated [`Error`] via
/// [`ohno::ErrorExt::find_source`]:
///
/// ```
/// use ohno::ErrorExt;
/// use strata::{CompositeError, Error};
///
/// fn tiers_that_failed(error: &Error) -> usize {
///     error
///         .find_source::<CompositeError>()
///         .map_or(1, |composite| composite.causes().len())
/// }
/// ```
#[derive(Debug)]
pub struct CompositeError {
    causes: Vec<(TierRole, Error)>,
}

impl CompositeError {
    fn new(primary: Error, secondary: Error) -> Self {
        Self {
            causes: vec![(TierRole::Primary, primary), (TierRole::Secondary, secondary)],
        }
    }

    /// Returns the per-tier failures, labeled with their role.
    #[must_use]
    pub fn causes(&self) -> &[(TierRole, Error)] {
        &self.causes
    }
}

impl std::fmt::Display for CompositeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} cache tiers failed", self.causes.len())?;
        for (role, error) in &self.causes {
            write!(f, "; {role}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompositeError {}

/// Merges the results of a dual-tier fan-out where both tiers are
/// authoritative.
///
/// - Both succeed: `Ok(())`.
/// - Exactly one fails: that error, enriched with its tier role.
/// - Both fail: an error wrapping a [`CompositeError`] with both causes.
pub(crate) fn combine(primary: Result<()>, secondary: Result<()>) -> Result<()> {
    match (primary, secondary) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(primary), Ok(())) => Err(primary.enrich("primary tier failed")),
        (Ok(()), Err(secondary)) => Err(secondary.enrich("secondary tier failed")),
        (Err(primary), Err(secondary)) => Err(Error::from_message(CompositeError::new(primary, secondary))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohno::ErrorExt;

    #[test]
    fn combine_both_ok_is_ok() {
        assert!(combine(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn combine_primary_failure_names_primary() {
        let result = combine(Err(Error::from_message("disk full")), Ok(()));
        let error = result.expect_err("primary failure should propagate");
        let message = format!("{error}");
        assert!(message.contains("primary tier failed"), "got: {message}");
        assert!(message.contains("disk full"), "got: {message}");
    }

    #[test]
    fn combine_secondary_failure_names_secondary() {
        let result = combine(Ok(()), Err(Error::from_message("connection refused")));
        let error = result.expect_err("secondary failure should propagate");
        let message = format!("{error}");
        assert!(message.contains("secondary tier failed"), "got: {message}");
        assert!(message.contains("connection refused"), "got: {message}");
    }

    #[test]
    fn combine_double_failure_preserves_both_causes() {
        let result = combine(
            Err(Error::from_message("disk full")),
            Err(Error::from_message("connection refused")),
        );
        let error = result.expect_err("double failure should propagate");

        let composite = error
            .find_source::<CompositeError>()
            .expect("composite cause should be recoverable");
        assert_eq!(composite.causes().len(), 2);
        assert_eq!(composite.causes()[0].0, TierRole::Primary);
        assert_eq!(composite.causes()[1].0, TierRole::Secondary);

        let message = format!("{error}");
        assert!(message.contains("disk full"), "got: {message}");
        assert!(message.contains("connection refused"), "got: {message}");
    }

    #[test]
    fn tier_role_display() {
        assert_eq!(TierRole::Primary.to_string(), "primary");
        assert_eq!(TierRole::Secondary.to_string(), "secondary");
    }
}
