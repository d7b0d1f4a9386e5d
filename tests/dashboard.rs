// End-to-end dashboard behaviour against the in-memory page

use cost_eras::{
    all_slot_ids, dataset, house_to_income_ratio, monthly_cost, severity_of, Dashboard,
    DashboardError, Era, MemoryPage, Profile, Severity, Surface,
};
use std::collections::BTreeMap;

fn slot_texts(page: &MemoryPage) -> BTreeMap<String, String> {
    all_slot_ids()
        .into_iter()
        .map(|id| {
            let text = page.text(&id).unwrap_or_default().to_string();
            (id, text)
        })
        .collect()
}

#[test]
fn test_couple_2025_end_to_end() {
    let mut dashboard = Dashboard::load(MemoryPage::standard()).unwrap();
    dashboard.select_profile(Profile::Couple).unwrap();

    let data = dataset::get(Profile::Couple);
    assert_eq!(data.income(Era::Y2025), 70000.0);
    assert_eq!(data.house_price(Era::Y2025), 285000.0);

    let ratio = house_to_income_ratio(data, Era::Y2025);
    assert_eq!(ratio, 4.1);
    assert_eq!(severity_of(ratio), Severity::Medium);

    let page = dashboard.presenter();
    assert_eq!(page.text("val-inc-2025"), Some("£70,000"));
    assert_eq!(page.text("val-house-2025"), Some("£285,000"));
    assert_eq!(page.text("ratio-2025"), Some("4.1x Salary"));
    assert_eq!(page.slot("ratio-2025").unwrap().style, Some(Severity::Medium));
}

#[test]
fn test_profile_round_trip_leaves_one_chart_per_surface() {
    let mut dashboard = Dashboard::load(MemoryPage::standard()).unwrap();
    let initial = slot_texts(dashboard.presenter());

    dashboard.select_profile(Profile::Couple).unwrap();
    let couple = slot_texts(dashboard.presenter());
    assert_ne!(initial, couple);

    dashboard.select_profile(Profile::Single).unwrap();
    dashboard.select_profile(Profile::Single).unwrap();

    let page = dashboard.presenter();
    assert_eq!(slot_texts(page), initial);
    for surface in Surface::ALL {
        assert_eq!(page.live_charts(surface), 1, "{}", surface);
    }
}

#[test]
fn test_refresh_is_idempotent() {
    let mut dashboard = Dashboard::load(MemoryPage::standard()).unwrap();
    dashboard.refresh().unwrap();
    let first = serde_json::to_vec(&dashboard.presenter().snapshot()).unwrap();

    dashboard.refresh().unwrap();
    let second = serde_json::to_vec(&dashboard.presenter().snapshot()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_monthly_cost_single_2025_housing() {
    let data = dataset::get(Profile::Single);
    let housing = data.breakdown(Era::Y2025).housing as f64;
    assert!((monthly_cost(data.income(Era::Y2025), housing) - 1225.0).abs() < 0.005);
}

#[test]
fn test_missing_control_fails_loudly() {
    let mut page = MemoryPage::empty();
    for slot in all_slot_ids() {
        page = page.with_slot(&slot);
    }
    for surface in Surface::ALL {
        page = page.with_surface(surface);
    }

    let result = Dashboard::load(page);
    assert_eq!(
        result.err(),
        Some(DashboardError::MissingControl("btn-single".to_string()))
    );
}
