// 🖼️ Presenter - the capability the renderer draws through
// Slot writes, control styling and chart lifecycle live behind this trait so the
// renderer runs the same against the terminal, the HTTP API and the tests.

use serde::{Deserialize, Serialize};

use crate::charts::{ChartConfig, Surface};
use crate::dataset::{Era, Profile};
use crate::error::DashboardError;
use crate::metrics::Severity;

// ============================================================================
// SLOT AND CONTROL NAMES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Income,
    HousePrice,
    Ratio,
}

impl SlotKind {
    pub const ALL: [SlotKind; 3] = [SlotKind::Income, SlotKind::HousePrice, SlotKind::Ratio];

    /// Element id, e.g. `val-inc-1965` or `ratio-2025`
    pub fn id(&self, era: Era) -> String {
        match self {
            SlotKind::Income => format!("val-inc-{}", era.year()),
            SlotKind::HousePrice => format!("val-house-{}", era.year()),
            SlotKind::Ratio => format!("ratio-{}", era.year()),
        }
    }
}

/// Every display slot id, era by era
pub fn all_slot_ids() -> Vec<String> {
    Era::ALL
        .iter()
        .flat_map(|&era| SlotKind::ALL.iter().map(move |kind| kind.id(era)))
        .collect()
}

/// Element id of a profile's selection control
pub fn control_id(profile: Profile) -> String {
    format!("btn-{}", profile)
}

/// Visual treatment of a profile control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Active,
    Neutral,
}

// ============================================================================
// CHART HANDLE
// ============================================================================

/// A live chart on one surface
///
/// Deliberately not `Clone`: the only way to get rid of a handle is to pass it
/// back to [`Presenter::destroy_chart`].
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    surface: Surface,
    id: u64,
}

impl ChartHandle {
    /// Only presenters mint handles
    pub fn new(surface: Surface, id: u64) -> Self {
        ChartHandle { surface, id }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// PRESENTER
// ============================================================================

pub trait Presenter {
    /// Replace the text of a display slot
    fn write_slot(&mut self, slot: &str, text: &str) -> Result<(), DashboardError>;

    /// Apply the severity style to a display slot
    fn style_slot(&mut self, slot: &str, severity: Severity) -> Result<(), DashboardError>;

    fn style_control(&mut self, control: &str, emphasis: Emphasis) -> Result<(), DashboardError>;

    /// Draw a new chart on a surface
    fn mount_chart(
        &mut self,
        surface: Surface,
        config: ChartConfig,
    ) -> Result<ChartHandle, DashboardError>;

    /// Tear down a chart created by `mount_chart`
    fn destroy_chart(&mut self, handle: ChartHandle);
}
