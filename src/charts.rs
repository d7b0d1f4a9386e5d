// 📊 Chart Adapters - declarative chart configurations
// Each adapter is a pure function of the active ProfileDataset. The presenter
// (ratatui in the terminal, JSON for web clients) turns a ChartConfig into pixels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency;
use crate::dataset::{BigTicketItem, Era, ExpenseCategory, ProfileDataset};
use crate::metrics::{monthly_cost, years_of_salary_for_house};

// ============================================================================
// SURFACES
// ============================================================================

/// The three named drawing areas, one per adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Decoupling,
    Wallet,
    BigTicket,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Decoupling, Surface::Wallet, Surface::BigTicket];

    /// Element id of the drawing area
    pub fn id(&self) -> &'static str {
        match self {
            Surface::Decoupling => "chart-decoupling",
            Surface::Wallet => "chart-wallet",
            Surface::BigTicket => "chart-bigticket",
        }
    }

    /// Short name used in API paths
    pub fn key(&self) -> &'static str {
        match self {
            Surface::Decoupling => "decoupling",
            Surface::Wallet => "wallet",
            Surface::BigTicket => "bigticket",
        }
    }

    pub fn from_key(key: &str) -> Option<Surface> {
        Surface::ALL.into_iter().find(|s| s.key() == key || s.id() == key)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// CHART CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One plotted value plus the text shown when it is hovered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub value: f64,
    pub tooltip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub kind: SeriesKind,
    pub color: String,
    /// One point per era label
    pub points: Vec<Point>,
}

impl Series {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAxis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Pre-rendered tick labels, low to high
    pub ticks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub labels: Vec<String>,
    pub orientation: Orientation,
    pub stacked: bool,
    pub value_axis: ValueAxis,
    pub series: Vec<Series>,
}

impl ChartConfig {
    pub fn series(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }

    /// Largest plotted value (or stacked total) across all labels
    pub fn peak(&self) -> f64 {
        if self.stacked {
            (0..self.labels.len())
                .map(|i| {
                    self.series
                        .iter()
                        .filter_map(|s| s.points.get(i))
                        .map(|p| p.value)
                        .sum::<f64>()
                })
                .fold(0.0, f64::max)
        } else {
            self.series
                .iter()
                .flat_map(|s| s.points.iter().map(|p| p.value))
                .fold(0.0, f64::max)
        }
    }
}

fn era_labels() -> Vec<String> {
    Era::ALL.iter().map(|e| e.label()).collect()
}

/// Axis top (peak rounded up to four £25k-multiple steps) and its five tick labels
fn currency_ticks(peak: f64) -> (f64, Vec<String>) {
    let step = ((peak / 4.0) / 25_000.0).ceil().max(1.0) * 25_000.0;
    let ticks = (0..=4).map(|i| currency::axis_tick(step * i as f64)).collect();
    (step * 4.0, ticks)
}

// ============================================================================
// ADAPTERS
// ============================================================================

/// Income bars with the house price line overlaid on the same axis
pub fn decoupling_chart(data: &ProfileDataset) -> ChartConfig {
    let income = Series {
        label: "Avg Annual Income (£)".to_string(),
        kind: SeriesKind::Bar,
        color: "#CBD5E1".to_string(),
        points: Era::ALL
            .iter()
            .map(|&era| {
                let value = data.income(era);
                Point {
                    value,
                    tooltip: format!("Avg Annual Income (£): {}", currency::full(value)),
                    detail: None,
                }
            })
            .collect(),
    };

    let house = Series {
        label: "Avg House Price (£)".to_string(),
        kind: SeriesKind::Line,
        color: "#1E293B".to_string(),
        points: Era::ALL
            .iter()
            .map(|&era| {
                let value = data.house_price(era);
                Point {
                    value,
                    tooltip: format!("Avg House Price (£): {}", currency::full(value)),
                    detail: None,
                }
            })
            .collect(),
    };

    let mut config = ChartConfig {
        title: "Income vs House Prices".to_string(),
        labels: era_labels(),
        orientation: Orientation::Vertical,
        stacked: false,
        value_axis: ValueAxis {
            title: None,
            begin_at_zero: true,
            max: None,
            ticks: vec![],
        },
        series: vec![income, house],
    };
    let (top, ticks) = currency_ticks(config.peak());
    config.value_axis.max = Some(top);
    config.value_axis.ticks = ticks;
    config
}

/// 100%-stacked horizontal bar per era, one segment per expense category
pub fn wallet_chart(data: &ProfileDataset) -> ChartConfig {
    let series = ExpenseCategory::WALLET_ORDER
        .iter()
        .map(|&category| Series {
            label: category.label().to_string(),
            kind: SeriesKind::Bar,
            color: category.color().to_string(),
            points: Era::ALL
                .iter()
                .map(|&era| {
                    let percentage = data.breakdown(era).get(category) as f64;
                    let monthly = monthly_cost(data.income(era), percentage);
                    Point {
                        value: percentage,
                        tooltip: format!("{}: {}%", category.label(), percentage),
                        detail: Some(format!(
                            "Est. Monthly Cost: {}",
                            currency::compact(monthly)
                        )),
                    }
                })
                .collect(),
        })
        .collect();

    ChartConfig {
        title: "Where the Wallet Goes".to_string(),
        labels: era_labels(),
        orientation: Orientation::Horizontal,
        stacked: true,
        value_axis: ValueAxis {
            title: None,
            begin_at_zero: true,
            max: Some(100.0),
            ticks: (0..=4).map(|i| format!("{}%", i * 25)).collect(),
        },
        series,
    }
}

/// Years of full salary for a house next to years of salary for a degree
pub fn big_ticket_chart(data: &ProfileDataset) -> ChartConfig {
    let house = Series {
        label: "Years of Salary to Buy House".to_string(),
        kind: SeriesKind::Bar,
        color: "#4338CA".to_string(),
        points: Era::ALL
            .iter()
            .map(|&era| {
                let value = years_of_salary_for_house(data, era);
                Point {
                    value,
                    tooltip: format!("Years of Salary to Buy House: {:.1}", value),
                    detail: None,
                }
            })
            .collect(),
    };

    // Zero before 2025: no tuition fees, not missing data
    let education = data.big_ticket(BigTicketItem::Education);
    let degree = Series {
        label: "Years of Salary to Pay for Degree".to_string(),
        kind: SeriesKind::Bar,
        color: "#BE123C".to_string(),
        points: education
            .iter()
            .map(|&value| Point {
                value,
                tooltip: format!("Years of Salary to Pay for Degree: {}", value),
                detail: None,
            })
            .collect(),
    };

    let mut config = ChartConfig {
        title: "Big-Ticket Items".to_string(),
        labels: era_labels(),
        orientation: Orientation::Vertical,
        stacked: false,
        value_axis: ValueAxis {
            title: Some("Years of Full Salary".to_string()),
            begin_at_zero: true,
            max: None,
            ticks: vec![],
        },
        series: vec![house, degree],
    };
    let top = config.peak().ceil().max(1.0);
    config.value_axis.max = Some(top);
    config.value_axis.ticks = (0..=4).map(|i| format!("{:.1}", top * i as f64 / 4.0)).collect();
    config
}

/// Adapter for a surface
pub fn build(surface: Surface, data: &ProfileDataset) -> ChartConfig {
    match surface {
        Surface::Decoupling => decoupling_chart(data),
        Surface::Wallet => wallet_chart(data),
        Surface::BigTicket => big_ticket_chart(data),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{self, Profile};

    #[test]
    fn test_decoupling_series() {
        let config = decoupling_chart(dataset::get(Profile::Single));
        assert_eq!(config.labels, vec!["1965", "1995", "2025"]);

        let income = config.series("Avg Annual Income (£)").unwrap();
        assert_eq!(income.kind, SeriesKind::Bar);
        assert_eq!(income.values(), vec![1050.0, 17500.0, 35000.0]);

        let house = config.series("Avg House Price (£)").unwrap();
        assert_eq!(house.kind, SeriesKind::Line);
        assert_eq!(house.values(), vec![3600.0, 55000.0, 285000.0]);
        assert_eq!(house.points[2].tooltip, "Avg House Price (£): £285,000.00");

        assert!(config.value_axis.begin_at_zero);
        assert_eq!(config.value_axis.ticks.first().unwrap(), "£0k");
        assert_eq!(config.value_axis.ticks.last().unwrap(), "£300k");
        assert_eq!(config.value_axis.max, Some(300_000.0));
        assert!(config.peak() <= 300_000.0);
    }

    #[test]
    fn test_wallet_order_and_stacking() {
        let config = wallet_chart(dataset::get(Profile::Single));
        let labels: Vec<&str> = config.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Housing", "Tax & NI", "Food", "Transport", "Other/Save"]
        );
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert!(config.stacked);
        assert_eq!(config.value_axis.max, Some(100.0));
        assert_eq!(config.peak(), 100.0);
    }

    #[test]
    fn test_wallet_monthly_detail() {
        let config = wallet_chart(dataset::get(Profile::Single));
        let housing = config.series("Housing").unwrap();
        assert_eq!(housing.points[2].value, 42.0);
        assert_eq!(
            housing.points[2].detail.as_deref(),
            Some("Est. Monthly Cost: £1,230")
        );
    }

    #[test]
    fn test_big_ticket_series() {
        let config = big_ticket_chart(dataset::get(Profile::Couple));
        let house = config.series("Years of Salary to Buy House").unwrap();
        assert_eq!(house.values(), vec![2.0, 1.7, 4.1]);

        let degree = config.series("Years of Salary to Pay for Degree").unwrap();
        assert_eq!(degree.values(), vec![0.0, 0.0, 0.8]);
        assert_eq!(
            config.value_axis.title.as_deref(),
            Some("Years of Full Salary")
        );
    }

    #[test]
    fn test_adapters_are_pure() {
        let data = dataset::get(Profile::Couple);
        for surface in Surface::ALL {
            assert_eq!(build(surface, data), build(surface, data));
        }
    }

    #[test]
    fn test_surface_keys() {
        assert_eq!(Surface::from_key("wallet"), Some(Surface::Wallet));
        assert_eq!(Surface::from_key("chart-bigticket"), Some(Surface::BigTicket));
        assert_eq!(Surface::from_key("pie"), None);
    }
}
