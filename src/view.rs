// 🎛️ View State - active profile and the live chart per surface

use tracing::debug;

use crate::charts::{ChartConfig, Surface};
use crate::dataset::Profile;
use crate::error::DashboardError;
use crate::presenter::{ChartHandle, Presenter};

// ============================================================================
// CHART SLOT
// ============================================================================

/// Owner of at most one live chart on a surface
#[derive(Debug)]
pub struct ChartSlot {
    surface: Surface,
    handle: Option<ChartHandle>,
}

impl ChartSlot {
    pub fn new(surface: Surface) -> Self {
        ChartSlot {
            surface,
            handle: None,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&ChartHandle> {
        self.handle.as_ref()
    }

    /// Destroy the current chart (if any), then mount `config` in its place
    pub fn replace<P: Presenter>(
        &mut self,
        presenter: &mut P,
        config: ChartConfig,
    ) -> Result<(), DashboardError> {
        if let Some(old) = self.handle.take() {
            debug!(surface = %self.surface, chart = old.id(), "destroying chart");
            presenter.destroy_chart(old);
        }

        let handle = presenter.mount_chart(self.surface, config)?;
        debug!(surface = %self.surface, chart = handle.id(), "mounted chart");
        self.handle = Some(handle);
        Ok(())
    }
}

/// One slot per surface, in `Surface::ALL` order
#[derive(Debug)]
pub struct ChartSlots {
    slots: Vec<ChartSlot>,
}

impl ChartSlots {
    pub fn new() -> Self {
        ChartSlots {
            slots: Surface::ALL.iter().map(|&s| ChartSlot::new(s)).collect(),
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChartSlot> {
        self.slots.iter_mut()
    }

    pub fn get(&self, surface: Surface) -> Option<&ChartSlot> {
        self.slots.iter().find(|s| s.surface == surface)
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_live()).count()
    }
}

impl Default for ChartSlots {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// VIEW STATE
// ============================================================================

/// Returned by a state change; the owner must refresh before drawing again
#[must_use = "the dashboard must be refreshed after a state change"]
#[derive(Debug, PartialEq, Eq)]
pub struct RefreshRequired;

#[derive(Debug, Default)]
pub struct ViewState {
    pub profile: Profile,
    pub charts: ChartSlots,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_profile(&mut self, profile: Profile) -> RefreshRequired {
        self.profile = profile;
        RefreshRequired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ViewState::new();
        assert_eq!(state.profile, Profile::Single);
        assert_eq!(state.charts.live_count(), 0);
        for surface in Surface::ALL {
            assert!(!state.charts.get(surface).unwrap().is_live());
        }
    }

    #[test]
    fn test_select_profile_requests_refresh() {
        let mut state = ViewState::new();
        assert_eq!(state.select_profile(Profile::Couple), RefreshRequired);
        assert_eq!(state.profile, Profile::Couple);
    }
}
