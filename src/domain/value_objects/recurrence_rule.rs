use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// How a recurring task or todo repeats once it is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceRule {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown recurrence rule: {0:?}")]
pub struct UnknownRecurrenceRule(pub String);

impl RecurrenceRule {
    pub const ALL: [RecurrenceRule; 6] = [
        RecurrenceRule::Daily,
        RecurrenceRule::Weekly,
        RecurrenceRule::BiWeekly,
        RecurrenceRule::Monthly,
        RecurrenceRule::Quarterly,
        RecurrenceRule::Yearly,
    ];

    /// Storage label, also accepted by the parsers
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceRule::Daily => "daily",
            RecurrenceRule::Weekly => "weekly",
            RecurrenceRule::BiWeekly => "bi-weekly",
            RecurrenceRule::Monthly => "monthly",
            RecurrenceRule::Quarterly => "quarterly",
            RecurrenceRule::Yearly => "yearly",
        }
    }

    /// Parses a stored label, falling back to weekly for anything unrecognized.
    ///
    /// Rows written by older clients may carry free-form rule strings; those
    /// keep advancing a week at a time instead of failing the whole load.
    pub fn from_label(label: &str) -> Self {
        match label.parse() {
            Ok(rule) => rule,
            Err(UnknownRecurrenceRule(raw)) => {
                warn!("Unrecognized recurrence rule {:?}, treating it as weekly", raw);
                RecurrenceRule::Weekly
            }
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = UnknownRecurrenceRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(RecurrenceRule::Daily),
            "weekly" => Ok(RecurrenceRule::Weekly),
            "bi-weekly" | "biweekly" => Ok(RecurrenceRule::BiWeekly),
            "monthly" => Ok(RecurrenceRule::Monthly),
            "quarterly" => Ok(RecurrenceRule::Quarterly),
            "yearly" => Ok(RecurrenceRule::Yearly),
            _ => Err(UnknownRecurrenceRule(s.to_string())),
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
