use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Drug risk verdicts.
/// The derived ordering is the severity precedence used when combining genes: Toxic > Ineffective > AdjustDosage > Safe > Unknown.
#[derive(Clone, Copy, Debug, Deserialize, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Unknown,
    Safe,
    AdjustDosage,
    Ineffective,
    Toxic
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "Unknown",
            RiskLevel::Safe => "Safe",
            RiskLevel::AdjustDosage => "Adjust Dosage",
            RiskLevel::Ineffective => "Ineffective",
            RiskLevel::Toxic => "Toxic"
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RiskLevel::Unknown |
            RiskLevel::Safe => Severity::None,
            RiskLevel::AdjustDosage => Severity::Moderate,
            RiskLevel::Ineffective => Severity::High,
            RiskLevel::Toxic => Severity::Critical
        }
    }

    /// Recommendation strength reported when no guidance record exists for the drug
    pub fn fallback_strength(&self) -> &'static str {
        match self {
            RiskLevel::Toxic |
            RiskLevel::Ineffective => "Strong",
            RiskLevel::AdjustDosage => "Moderate",
            RiskLevel::Safe |
            RiskLevel::Unknown => "Weak"
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Clinical severity tier attached to a verdict
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Moderate,
    High,
    Critical
}

/// The final label for a drug, either a resolved verdict or a per-drug failure
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Resolved(RiskLevel),
    Error
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Resolved(risk_level) => risk_level.label(),
            Verdict::Error => "Error"
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Verdict::Resolved(risk_level) => risk_level.severity(),
            Verdict::Error => Severity::None
        }
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        match self {
            Verdict::Resolved(risk_level) => Some(*risk_level),
            Verdict::Error => None
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Verdict {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
