use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Elastic license tiers, ordered from least to most capable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    #[display("basic")]
    Basic,
    #[display("gold")]
    Gold,
    #[display("platinum")]
    Platinum,
    #[display("enterprise")]
    Enterprise,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown license tier [{0}], expected basic, gold, platinum or enterprise")]
pub struct UnknownLicenseTier(pub String);

impl FromStr for LicenseTier {
    type Err = UnknownLicenseTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(LicenseTier::Basic),
            "gold" => Ok(LicenseTier::Gold),
            "platinum" => Ok(LicenseTier::Platinum),
            "enterprise" | "trial" => Ok(LicenseTier::Enterprise),
            _ => Err(UnknownLicenseTier(s.to_string())),
        }
    }
}

impl LicenseTier {
    /// True if a caller holding `self` may use something requiring `required`.
    pub fn allows(self, required: LicenseTier) -> bool {
        self >= required
    }
}

/// Argument context of a command, used to decide which functions fit there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum LocationTag {
    #[display("EVAL")]
    Eval,
    #[display("WHERE")]
    Where,
    #[display("ROW")]
    Row,
    #[display("SORT")]
    Sort,
    #[display("STATS")]
    Stats,
    #[display("STATS BY")]
    StatsBy,
    #[display("STATS WHERE")]
    StatsWhere,
    #[display("ENRICH")]
    Enrich,
    #[display("ENRICH WITH")]
    EnrichWith,
    #[display("RENAME")]
    Rename,
    #[display("JOIN")]
    Join,
    #[display("DISSECT")]
    Dissect,
    #[display("GROK")]
    Grok,
}

impl LocationTag {
    /// Contexts where scalar functions and operators are allowed.
    pub const EXPRESSIONS: [LocationTag; 7] = [
        LocationTag::Eval,
        LocationTag::Where,
        LocationTag::Row,
        LocationTag::Sort,
        LocationTag::Stats,
        LocationTag::StatsBy,
        LocationTag::StatsWhere,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(LicenseTier::Platinum.allows(LicenseTier::Gold));
        assert!(!LicenseTier::Basic.allows(LicenseTier::Platinum));
        assert!(LicenseTier::Enterprise > LicenseTier::Platinum);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("Platinum".parse(), Ok(LicenseTier::Platinum));
        assert_eq!("trial".parse(), Ok(LicenseTier::Enterprise));
        assert!("diamond".parse::<LicenseTier>().is_err());
        assert_eq!(LicenseTier::Gold.to_string(), "gold");
        assert_eq!(LocationTag::StatsBy.to_string(), "STATS BY");
    }
}
