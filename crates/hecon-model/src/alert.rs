use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Coarse three-level grading used for alert impact and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl From<Severity> for Tier {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => Tier::Low,
            Severity::Medium => Tier::Medium,
            Severity::High => Tier::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Financial,
    Operational,
    Clinical,
    Predictive,
}

/// An operational alert with the number that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: AlertCategory,
    /// Count, rate or percentage that triggered the rule.
    pub evidence: f64,
    pub impact: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Tier>,
    /// Aggregate unit (service, region, ...) the alert is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}
