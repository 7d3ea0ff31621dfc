//! Report policy resolution
//!
//! A single string-valued option controls the aggregated problems report.
//! Only the two literal sentinels are recognized as overrides; everything
//! else - unset, empty, padded, or differently cased - selects the default
//! of writing the report without announcing its location.

/// Option key controlling whether and how the problems report is produced.
pub const REPORT_ENABLED_OPTION: &str = "problems.report.enabled";

/// Tri-state decision of whether/how to materialize the problems report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportPolicy {
    /// No report is produced and no report resources are touched
    Disabled,
    /// The report is written but its location is not announced
    #[default]
    EnabledSilent,
    /// The report is written and its location announced on the bus
    EnabledVerbose,
}

impl ReportPolicy {
    /// Reduce the raw option value to a policy.
    ///
    /// Exact match only: `"false"` disables the report, `"true"` enables the
    /// verbose variant. No trimming, no case folding - any other value falls
    /// through to the silent default.
    #[must_use]
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some("false") => Self::Disabled,
            Some("true") => Self::EnabledVerbose,
            _ => Self::EnabledSilent,
        }
    }

    /// Whether a report will be produced at all.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Whether the report location is announced to the user.
    #[must_use]
    pub fn is_verbose(self) -> bool {
        matches!(self, Self::EnabledVerbose)
    }
}
