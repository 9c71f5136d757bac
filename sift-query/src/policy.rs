//! Filter kinds, their invalid-input policies and composition outcomes.

use std::fmt;

/// What a filter does when its parameter is present but unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidInputPolicy {
    /// Contribute nothing and carry on.
    Degrade,
    /// Fail the composition with a parse error.
    Reject,
}

/// The independent narrowing steps of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Case-insensitive substring match on the name field.
    Keyword,
    /// Equality on a category reference id.
    Category,
    /// Membership on color names.
    Color,
    /// Membership on sizes.
    Size,
    /// Membership on numeric seam sizes.
    SeamSize,
    /// Inclusive price range.
    Price,
    /// Residual parameters as a direct field predicate.
    Generic,
    /// Result ordering.
    Sort,
}

impl FilterKind {
    /// Every kind, in canonical application order.
    pub const ALL: [FilterKind; 8] = [
        Self::Keyword,
        Self::Category,
        Self::Color,
        Self::Size,
        Self::SeamSize,
        Self::Price,
        Self::Generic,
        Self::Sort,
    ];

    /// The parameter that triggers this kind.
    ///
    /// The generic filter has no single parameter; it consumes whatever is
    /// left after the reserved keys are removed.
    pub fn param_key(&self) -> Option<&'static str> {
        match self {
            Self::Keyword => Some("keyword"),
            Self::Category => Some("category"),
            Self::Color => Some("color"),
            Self::Size => Some("size"),
            Self::SeamSize => Some("seamSize"),
            Self::Price => Some("price"),
            Self::Generic => None,
            Self::Sort => Some("sort"),
        }
    }

    /// How this kind treats unusable input.
    pub fn policy(&self) -> InvalidInputPolicy {
        match self {
            Self::Price | Self::Generic => InvalidInputPolicy::Reject,
            _ => InvalidInputPolicy::Degrade,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Category => "category",
            Self::Color => "color",
            Self::Size => "size",
            Self::SeamSize => "seam_size",
            Self::Price => "price",
            Self::Generic => "generic",
            Self::Sort => "sort",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of running one filter kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The triggering parameter was not supplied.
    Absent,
    /// A fragment (or the ordering) was applied.
    Applied,
    /// Input was present but unusable and the filter degraded.
    Skipped {
        /// Why nothing was applied.
        reason: String,
    },
}

impl FilterOutcome {
    /// Create a skipped outcome.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Check if a fragment was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Check if the filter degraded.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// The outcomes of every filter run during one composition, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    entries: Vec<(FilterKind, FilterOutcome)>,
}

impl CompositionReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome.
    pub fn record(&mut self, kind: FilterKind, outcome: FilterOutcome) {
        self.entries.push((kind, outcome));
    }

    /// The latest outcome recorded for a kind.
    pub fn outcome(&self, kind: FilterKind) -> Option<&FilterOutcome> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    /// Kinds that contributed to the query.
    pub fn applied(&self) -> impl Iterator<Item = FilterKind> + '_ {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_applied())
            .map(|(kind, _)| *kind)
    }

    /// Kinds that degraded, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (FilterKind, &str)> + '_ {
        self.entries.iter().filter_map(|(kind, outcome)| match outcome {
            FilterOutcome::Skipped { reason } => Some((*kind, reason.as_str())),
            _ => None,
        })
    }

    /// All recorded entries.
    pub fn entries(&self) -> &[(FilterKind, FilterOutcome)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        assert_eq!(FilterKind::Price.policy(), InvalidInputPolicy::Reject);
        assert_eq!(FilterKind::Generic.policy(), InvalidInputPolicy::Reject);
        for kind in [
            FilterKind::Keyword,
            FilterKind::Category,
            FilterKind::Color,
            FilterKind::Size,
            FilterKind::SeamSize,
            FilterKind::Sort,
        ] {
            assert_eq!(kind.policy(), InvalidInputPolicy::Degrade, "{kind}");
        }
    }

    #[test]
    fn test_param_keys() {
        assert_eq!(FilterKind::SeamSize.param_key(), Some("seamSize"));
        assert_eq!(FilterKind::Generic.param_key(), None);
        let keyed = FilterKind::ALL.iter().filter(|k| k.param_key().is_some()).count();
        assert_eq!(keyed, 7);
    }

    #[test]
    fn test_report_latest_outcome_wins() {
        let mut report = CompositionReport::new();
        report.record(FilterKind::Color, FilterOutcome::Absent);
        report.record(FilterKind::Category, FilterOutcome::skipped("not an object id"));
        report.record(FilterKind::Color, FilterOutcome::Applied);

        assert_eq!(report.outcome(FilterKind::Color), Some(&FilterOutcome::Applied));
        assert_eq!(report.outcome(FilterKind::Price), None);
        assert_eq!(report.applied().collect::<Vec<_>>(), vec![FilterKind::Color]);
        assert_eq!(
            report.skipped().collect::<Vec<_>>(),
            vec![(FilterKind::Category, "not an object id")]
        );
        assert_eq!(report.entries().len(), 3);
    }
}
