// 📐 Derived Metrics - ratios and monthly cash equivalents
// Pure functions over a ProfileDataset; no error conditions

use serde::{Deserialize, Serialize};

use crate::dataset::{Era, ExpenseCategory, ProfileDataset};

// ============================================================================
// SEVERITY
// ============================================================================

/// Housing affordability strain from the house-price-to-income ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,   // ratio > 5
    Medium, // 3.5 <= ratio <= 5
    Low,    // ratio < 3.5
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Boundaries are strict: exactly 5.0 and exactly 3.5 are both Medium
pub fn severity_of(ratio: f64) -> Severity {
    if ratio > 5.0 {
        Severity::High
    } else if ratio < 3.5 {
        Severity::Low
    } else {
        Severity::Medium
    }
}

// ============================================================================
// RATIOS
// ============================================================================

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// House price divided by income, rounded to one decimal place
pub fn house_to_income_ratio(dataset: &ProfileDataset, era: Era) -> f64 {
    round_to_tenth(dataset.house_price(era) / dataset.income(era))
}

/// Years of full salary needed to buy the average house
pub fn years_of_salary_for_house(dataset: &ProfileDataset, era: Era) -> f64 {
    house_to_income_ratio(dataset, era)
}

/// Monthly cash equivalent of a percentage-of-income breakdown entry
pub fn monthly_cost(annual_income: f64, percentage: f64) -> f64 {
    annual_income * (percentage / 100.0) / 12.0
}

// ============================================================================
// ERA SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCost {
    pub category: ExpenseCategory,
    pub percentage: u32,
    pub monthly: f64,
}

/// Everything the dashboard shows about one era, computed once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraMetrics {
    pub year: u16,
    pub income: f64,
    pub house_price: f64,
    pub ratio: f64,
    pub severity: Severity,
    pub monthly_costs: Vec<MonthlyCost>,
}

impl EraMetrics {
    pub fn compute(dataset: &ProfileDataset, era: Era) -> Self {
        let income = dataset.income(era);
        let breakdown = dataset.breakdown(era);
        let ratio = house_to_income_ratio(dataset, era);

        let monthly_costs = ExpenseCategory::WALLET_ORDER
            .iter()
            .map(|&category| {
                let percentage = breakdown.get(category);
                MonthlyCost {
                    category,
                    percentage,
                    monthly: monthly_cost(income, percentage as f64),
                }
            })
            .collect();

        EraMetrics {
            year: era.year(),
            income,
            house_price: dataset.house_price(era),
            ratio,
            severity: severity_of(ratio),
            monthly_costs,
        }
    }

    /// Metrics for every era in chronological order
    pub fn all(dataset: &ProfileDataset) -> Vec<EraMetrics> {
        Era::ALL.iter().map(|&era| Self::compute(dataset, era)).collect()
    }

    pub fn monthly(&self, category: ExpenseCategory) -> f64 {
        self.monthly_costs
            .iter()
            .find(|m| m.category == category)
            .map(|m| m.monthly)
            .unwrap_or(0.0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
