use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
  Alert,
  Recommendation,
}

/// Severity for alerts, priority for recommendations.
/// Declaration order is rank order: High sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
  High,
  Medium,
  Low,
  Info,
}

impl Priority {
  pub fn as_str(&self) -> &'static str {
    match self {
      Priority::High => "High",
      Priority::Medium => "Medium",
      Priority::Low => "Low",
      Priority::Info => "Info",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
  Capacity,
  Demand,
  Revenue,
  Utilization,
  Pricing,
  Programming,
  Engagement,
  Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
  pub kind: InsightKind,
  pub priority: Priority,
  pub category: InsightCategory,
  pub title: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub action: Option<String>,
  /// Facility or sport the finding is about, when it is about one
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject: Option<String>,
}

impl Insight {
  pub fn alert(
    priority: Priority,
    category: InsightCategory,
    title: &str,
    message: String,
    action: &str,
  ) -> Self {
    Self {
      kind: InsightKind::Alert,
      priority,
      category,
      title: title.to_string(),
      message,
      action: Some(action.to_string()),
      subject: None,
    }
  }

  pub fn recommendation(priority: Priority, category: InsightCategory, message: String) -> Self {
    Self {
      kind: InsightKind::Recommendation,
      priority,
      category,
      title: "Optimization Recommendation".to_string(),
      message,
      action: None,
      subject: None,
    }
  }

  pub fn about(mut self, subject: &str) -> Self {
    self.subject = Some(subject.to_string());
    self
  }

  pub fn is_alert(&self) -> bool {
    self.kind == InsightKind::Alert
  }
}
