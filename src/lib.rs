// Cost Eras - Core Library
// Cost-of-living comparison across 1965, 1995 and 2025 for single and couple households.
// Shared by the terminal dashboard, the CLI and the API server.

pub mod dataset;
pub mod metrics;
pub mod currency;
pub mod charts;
pub mod error;
pub mod presenter;
pub mod view;
pub mod page;
pub mod render;
pub mod export;

// Re-export commonly used types
pub use dataset::{
    Profile, Era, ExpenseCategory, BigTicketItem, Breakdown, BigTicket, ProfileDataset,
};
pub use metrics::{
    Severity, EraMetrics, MonthlyCost,
    house_to_income_ratio, severity_of, monthly_cost, years_of_salary_for_house,
};
pub use charts::{
    ChartConfig, Series, SeriesKind, Point, Orientation, ValueAxis, Surface,
    decoupling_chart, wallet_chart, big_ticket_chart,
};
pub use error::DashboardError;
pub use presenter::{Presenter, ChartHandle, Emphasis, SlotKind, control_id, all_slot_ids};
pub use view::{ViewState, ChartSlot, ChartSlots, RefreshRequired};
pub use page::{MemoryPage, PageSnapshot, SlotState};
pub use render::Dashboard;
pub use export::{ExportRow, export_to_file, write_csv};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
