use serde::{Deserialize, Serialize};
use std::fmt;

/// How long the current balance is expected to last.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysRemaining {
    Days(i64),
    /// No measurable consumption in the averaging window.
    Unbounded,
}

impl fmt::Display for DaysRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysRemaining::Days(days) => write!(f, "{}", days),
            DaysRemaining::Unbounded => write!(f, "∞"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub current_balance: f64,
    pub yesterday_usage: f64,
    pub average_usage: f64,
    pub estimated_days_remaining: DaysRemaining,
}

/// Severity tier of the current balance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceLevel {
    Low,
    Medium,
    #[default]
    Normal,
}

impl BalanceLevel {
    pub fn classify(balance: f64, low_threshold: f64, medium_threshold: f64) -> Self {
        if balance <= low_threshold {
            BalanceLevel::Low
        } else if balance <= medium_threshold {
            BalanceLevel::Medium
        } else {
            BalanceLevel::Normal
        }
    }
}
