// 📚 Dataset - Hand-authored cost-of-living figures
// Per-profile, per-era income, house prices, spending breakdowns and big-ticket multipliers
//
// All figures are annual GBP amounts. The tables are compiled in and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

// ============================================================================
// PROFILE
// ============================================================================

/// Household composition selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Single, // One earner
    Couple, // Two earners, combined income
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Single, Profile::Couple];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Single => "single",
            Profile::Couple => "couple",
        }
    }

    /// The other profile (used by the toggle key in the TUI)
    pub fn other(&self) -> Self {
        match self {
            Profile::Single => Profile::Couple,
            Profile::Couple => Profile::Single,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Profile::Single),
            "couple" => Ok(Profile::Couple),
            _ => Err(DashboardError::UnknownProfile(s.to_string())),
        }
    }
}

// ============================================================================
// ERA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Era {
    Y1965,
    Y1995,
    Y2025,
}

impl Era {
    /// Chronological order; also the index order of every per-era array
    pub const ALL: [Era; 3] = [Era::Y1965, Era::Y1995, Era::Y2025];

    pub fn year(&self) -> u16 {
        match self {
            Era::Y1965 => 1965,
            Era::Y1995 => 1995,
            Era::Y2025 => 2025,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Era::Y1965 => 0,
            Era::Y1995 => 1,
            Era::Y2025 => 2,
        }
    }

    pub fn label(&self) -> String {
        self.year().to_string()
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

// ============================================================================
// EXPENSE CATEGORIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Tax,
    Housing,
    Food,
    Transport,
    Other,
}

impl ExpenseCategory {
    /// Segment order of the wallet chart, largest pressure first
    pub const WALLET_ORDER: [ExpenseCategory; 5] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Tax,
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Tax => "Tax & NI",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Other => "Other/Save",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "#1E293B",
            ExpenseCategory::Tax => "#64748B",
            ExpenseCategory::Food => "#0F766E",
            ExpenseCategory::Transport => "#F59E0B",
            ExpenseCategory::Other => "#E2E8F0",
        }
    }
}

/// Percentage of gross income spent per category in one era
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub tax: u32,
    pub housing: u32,
    pub food: u32,
    pub transport: u32,
    pub other: u32,
}

impl Breakdown {
    pub fn get(&self, category: ExpenseCategory) -> u32 {
        match category {
            ExpenseCategory::Tax => self.tax,
            ExpenseCategory::Housing => self.housing,
            ExpenseCategory::Food => self.food,
            ExpenseCategory::Transport => self.transport,
            ExpenseCategory::Other => self.other,
        }
    }

    /// Always 100 for the authored tables
    pub fn total(&self) -> u32 {
        self.tax + self.housing + self.food + self.transport + self.other
    }
}

// ============================================================================
// BIG-TICKET ITEMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BigTicketItem {
    Car,
    Education,
}

/// Purchase cost as a multiple of one year's income, indexed by era
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigTicket {
    pub car: [f64; 3],
    /// Total degree cost; zero before tuition fees existed
    pub education: [f64; 3],
}

// ============================================================================
// PROFILE DATASET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDataset {
    pub profile: Profile,
    pub income: [f64; 3],
    pub house_price: [f64; 3],
    pub breakdown: [Breakdown; 3],
    pub big_ticket: BigTicket,
}

impl ProfileDataset {
    pub fn income(&self, era: Era) -> f64 {
        self.income[era.index()]
    }

    pub fn house_price(&self, era: Era) -> f64 {
        self.house_price[era.index()]
    }

    pub fn breakdown(&self, era: Era) -> &Breakdown {
        &self.breakdown[era.index()]
    }

    pub fn big_ticket(&self, item: BigTicketItem) -> [f64; 3] {
        match item {
            BigTicketItem::Car => self.big_ticket.car,
            BigTicketItem::Education => self.big_ticket.education,
        }
    }
}

static SINGLE: ProfileDataset = ProfileDataset {
    profile: Profile::Single,
    income: [1050.0, 17500.0, 35000.0],
    house_price: [3600.0, 55000.0, 285000.0],
    breakdown: [
        Breakdown { tax: 28, housing: 15, food: 25, transport: 10, other: 22 },
        Breakdown { tax: 24, housing: 22, food: 12, transport: 14, other: 28 },
        Breakdown { tax: 22, housing: 42, food: 10, transport: 12, other: 14 },
    ],
    big_ticket: BigTicket {
        car: [0.5, 0.6, 0.75],
        education: [0.0, 0.0, 1.5],
    },
};

// Combined income; house prices match the single profile
static COUPLE: ProfileDataset = ProfileDataset {
    profile: Profile::Couple,
    income: [1800.0, 32000.0, 70000.0],
    house_price: [3600.0, 55000.0, 285000.0],
    breakdown: [
        Breakdown { tax: 25, housing: 10, food: 20, transport: 12, other: 33 },
        Breakdown { tax: 22, housing: 15, food: 10, transport: 15, other: 38 },
        Breakdown { tax: 24, housing: 28, food: 8, transport: 15, other: 25 },
    ],
    big_ticket: BigTicket {
        car: [0.3, 0.35, 0.4],
        education: [0.0, 0.0, 0.8],
    },
};

/// Read-only lookup of a profile's figures
pub fn get(profile: Profile) -> &'static ProfileDataset {
    match profile {
        Profile::Single => &SINGLE,
        Profile::Couple => &COUPLE,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdowns_sum_to_100() {
        for profile in Profile::ALL {
            let data = get(profile);
            for era in Era::ALL {
                assert_eq!(
                    data.breakdown(era).total(),
                    100,
                    "{} {} breakdown",
                    profile,
                    era
                );
            }
        }
    }

    #[test]
    fn test_lookup_returns_matching_profile() {
        assert_eq!(get(Profile::Single).profile, Profile::Single);
        assert_eq!(get(Profile::Couple).profile, Profile::Couple);
        assert_eq!(get(Profile::Couple).income(Era::Y2025), 70000.0);
        assert_eq!(get(Profile::Couple).house_price(Era::Y2025), 285000.0);
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("single".parse::<Profile>().unwrap(), Profile::Single);
        assert_eq!(" Couple ".parse::<Profile>().unwrap(), Profile::Couple);
        assert!(matches!(
            "family".parse::<Profile>(),
            Err(DashboardError::UnknownProfile(_))
        ));
        assert_eq!(Profile::default(), Profile::Single);
        assert_eq!(Profile::Single.other(), Profile::Couple);
    }

    #[test]
    fn test_era_order() {
        let years: Vec<u16> = Era::ALL.iter().map(|e| e.year()).collect();
        assert_eq!(years, vec![1965, 1995, 2025]);
        for (i, era) in Era::ALL.iter().enumerate() {
            assert_eq!(era.index(), i);
        }
    }

    #[test]
    fn test_education_free_before_2025() {
        for profile in Profile::ALL {
            let edu = get(profile).big_ticket(BigTicketItem::Education);
            assert_eq!(edu[0], 0.0);
            assert_eq!(edu[1], 0.0);
            assert!(edu[2] > 0.0);
        }
    }
}
