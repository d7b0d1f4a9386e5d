// 📄 Memory Page - an in-memory document of slots, controls and chart surfaces
// The terminal UI, the CLI and the API server all render into one of these.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::charts::{ChartConfig, Surface};
use crate::dataset::Profile;
use crate::error::DashboardError;
use crate::metrics::Severity;
use crate::presenter::{all_slot_ids, control_id, ChartHandle, Emphasis, Presenter};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotState {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq)]
struct LiveChart {
    id: u64,
    config: ChartConfig,
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    slots: BTreeMap<String, SlotState>,
    controls: BTreeMap<String, Emphasis>,
    surfaces: BTreeMap<Surface, Vec<LiveChart>>,
    next_chart_id: u64,
    destroyed: u64,
}

impl MemoryPage {
    /// A page with no slots, controls or surfaces
    pub fn empty() -> Self {
        Self::default()
    }

    /// The full dashboard layout
    pub fn standard() -> Self {
        let mut page = Self::empty();
        for slot in all_slot_ids() {
            page = page.with_slot(&slot);
        }
        for profile in Profile::ALL {
            page = page.with_control(&control_id(profile));
        }
        for surface in Surface::ALL {
            page = page.with_surface(surface);
        }
        page
    }

    pub fn with_slot(mut self, slot: &str) -> Self {
        self.slots.insert(slot.to_string(), SlotState::default());
        self
    }

    pub fn with_control(mut self, control: &str) -> Self {
        self.controls.insert(control.to_string(), Emphasis::Neutral);
        self
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surfaces.insert(surface, Vec::new());
        self
    }

    pub fn slot(&self, slot: &str) -> Option<&SlotState> {
        self.slots.get(slot)
    }

    pub fn text(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(|s| s.text.as_str())
    }

    pub fn control(&self, control: &str) -> Option<Emphasis> {
        self.controls.get(control).copied()
    }

    /// Config of the newest chart on a surface
    pub fn chart(&self, surface: Surface) -> Option<&ChartConfig> {
        self.surfaces
            .get(&surface)
            .and_then(|charts| charts.last())
            .map(|c| &c.config)
    }

    /// Number of charts currently alive on a surface
    pub fn live_charts(&self, surface: Surface) -> usize {
        self.surfaces.get(&surface).map(|c| c.len()).unwrap_or(0)
    }

    pub fn charts_created(&self) -> u64 {
        self.next_chart_id
    }

    pub fn charts_destroyed(&self) -> u64 {
        self.destroyed
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            slots: self.slots.clone(),
            controls: self.controls.clone(),
            charts: self
                .surfaces
                .iter()
                .filter_map(|(surface, charts)| {
                    charts
                        .last()
                        .map(|c| (surface.id().to_string(), c.config.clone()))
                })
                .collect(),
        }
    }
}

impl Presenter for MemoryPage {
    fn write_slot(&mut self, slot: &str, text: &str) -> Result<(), DashboardError> {
        let state = self
            .slots
            .get_mut(slot)
            .ok_or_else(|| DashboardError::MissingSlot(slot.to_string()))?;
        state.text = text.to_string();
        Ok(())
    }

    fn style_slot(&mut self, slot: &str, severity: Severity) -> Result<(), DashboardError> {
        let state = self
            .slots
            .get_mut(slot)
            .ok_or_else(|| DashboardError::MissingSlot(slot.to_string()))?;
        state.style = Some(severity);
        Ok(())
    }

    fn style_control(&mut self, control: &str, emphasis: Emphasis) -> Result<(), DashboardError> {
        let state = self
            .controls
            .get_mut(control)
            .ok_or_else(|| DashboardError::MissingControl(control.to_string()))?;
        *state = emphasis;
        Ok(())
    }

    fn mount_chart(
        &mut self,
        surface: Surface,
        config: ChartConfig,
    ) -> Result<ChartHandle, DashboardError> {
        let charts = self
            .surfaces
            .get_mut(&surface)
            .ok_or_else(|| DashboardError::MissingSurface(surface.id().to_string()))?;

        self.next_chart_id += 1;
        let id = self.next_chart_id;
        charts.push(LiveChart { id, config });
        Ok(ChartHandle::new(surface, id))
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        let Some(charts) = self.surfaces.get_mut(&handle.surface()) else {
            warn!(surface = %handle.surface(), "destroy on unknown surface");
            return;
        };
        let before = charts.len();
        charts.retain(|c| c.id != handle.id());
        if charts.len() < before {
            self.destroyed += 1;
        } else {
            warn!(surface = %handle.surface(), chart = handle.id(), "chart already gone");
        }
    }
}

/// Serializable view of everything currently on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub slots: BTreeMap<String, SlotState>,
    pub controls: BTreeMap<String, Emphasis>,
    /// Surface id → active chart
    pub charts: BTreeMap<String, ChartConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::wallet_chart;
    use crate::dataset::{self, Profile};

    #[test]
    fn test_standard_layout() {
        let page = MemoryPage::standard();
        assert_eq!(page.text("val-inc-1965"), Some(""));
        assert_eq!(page.text("ratio-2025"), Some(""));
        assert_eq!(page.control("btn-couple"), Some(Emphasis::Neutral));
        for surface in Surface::ALL {
            assert_eq!(page.live_charts(surface), 0);
        }
    }

    #[test]
    fn test_missing_slot_is_an_error() {
        let mut page = MemoryPage::empty();
        assert_eq!(
            page.write_slot("val-inc-1965", "£1,050"),
            Err(DashboardError::MissingSlot("val-inc-1965".to_string()))
        );
    }

    #[test]
    fn test_missing_surface_is_an_error() {
        let mut page = MemoryPage::empty();
        let config = wallet_chart(dataset::get(Profile::Single));
        assert_eq!(
            page.mount_chart(Surface::Wallet, config),
            Err(DashboardError::MissingSurface("chart-wallet".to_string()))
        );
    }

    #[test]
    fn test_mount_and_destroy() {
        let mut page = MemoryPage::standard();
        let config = wallet_chart(dataset::get(Profile::Single));

        let first = page.mount_chart(Surface::Wallet, config.clone()).unwrap();
        let second = page.mount_chart(Surface::Wallet, config).unwrap();
        assert_eq!(page.live_charts(Surface::Wallet), 2);
        assert_ne!(first.id(), second.id());

        page.destroy_chart(first);
        assert_eq!(page.live_charts(Surface::Wallet), 1);
        assert_eq!(page.charts_created(), 2);
        assert_eq!(page.charts_destroyed(), 1);
    }
}
