// 🔄 Dashboard Renderer - one refresh writes every slot and replaces every chart

use tracing::{debug, error, info};

use crate::charts;
use crate::currency;
use crate::dataset::{self, Era, Profile};
use crate::error::DashboardError;
use crate::metrics::{house_to_income_ratio, severity_of};
use crate::presenter::{control_id, Emphasis, Presenter, SlotKind};
use crate::view::{RefreshRequired, ViewState};

/// Owns the view state and the presenter it draws into
pub struct Dashboard<P: Presenter> {
    state: ViewState,
    presenter: P,
}

impl<P: Presenter> Dashboard<P> {
    pub fn new(presenter: P) -> Self {
        Dashboard {
            state: ViewState::new(),
            presenter,
        }
    }

    /// Initial render with the default profile
    pub fn load(presenter: P) -> Result<Self, DashboardError> {
        let mut dashboard = Self::new(presenter);
        dashboard.refresh()?;
        Ok(dashboard)
    }

    pub fn profile(&self) -> Profile {
        self.state.profile
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Switch household profile and redraw everything
    pub fn select_profile(&mut self, profile: Profile) -> Result<(), DashboardError> {
        if profile != self.state.profile {
            info!(from = %self.state.profile, to = %profile, "profile selected");
        }
        let refresh = self.state.select_profile(profile);
        self.apply(refresh)
    }

    fn apply(&mut self, _refresh: RefreshRequired) -> Result<(), DashboardError> {
        self.refresh()
    }

    /// Rewrite all display slots, replace all charts, restyle the profile controls
    ///
    /// Stops at the first missing slot, surface or control.
    pub fn refresh(&mut self) -> Result<(), DashboardError> {
        let profile = self.state.profile;
        debug!(%profile, "refreshing dashboard");

        let result = self.render(profile);
        if let Err(ref e) = result {
            error!(%profile, error = %e, "dashboard refresh failed");
        }
        result
    }

    fn render(&mut self, profile: Profile) -> Result<(), DashboardError> {
        let data = dataset::get(profile);

        // 1. Metric cards
        for era in Era::ALL {
            let ratio = house_to_income_ratio(data, era);
            let ratio_slot = SlotKind::Ratio.id(era);

            self.presenter.write_slot(
                &SlotKind::Income.id(era),
                &currency::compact(data.income(era)),
            )?;
            self.presenter.write_slot(
                &SlotKind::HousePrice.id(era),
                &currency::compact(data.house_price(era)),
            )?;
            self.presenter
                .write_slot(&ratio_slot, &format!("{:.1}x Salary", ratio))?;
            self.presenter.style_slot(&ratio_slot, severity_of(ratio))?;
        }

        // 2. Charts
        for slot in self.state.charts.iter_mut() {
            let config = charts::build(slot.surface(), data);
            slot.replace(&mut self.presenter, config)?;
        }

        // 3. Profile controls
        for candidate in Profile::ALL {
            let emphasis = if candidate == profile {
                Emphasis::Active
            } else {
                Emphasis::Neutral
            };
            self.presenter.style_control(&control_id(candidate), emphasis)?;
        }

        Ok(())
    }
}
