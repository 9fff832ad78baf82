//! Loader → cache → yearly roll-up → chart datasets → dashboard views.

use std::sync::Arc;

use chrono::NaiveDate;
use vizlink_core::{Key, Point, PointerEvent, PointerKind};
use vizlink_data::{
    national_yearly, national_yearly_dataset, state_yearly, state_yearly_dataset, DatasetCache,
    LoadError, Loader, NationalDailyRecord, StateDailyRecord, YearFilter, NATIONAL_AXIS_TITLES,
    STATE_AXIS_TITLES,
};
use vizlink_engine::{ChartView, Dashboard, View, ViewConfig};
use vizlink_scale::Palette;
use vizlink_test_utils::RecordingSink;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct StateFeed;

impl Loader for StateFeed {
    type Output = Vec<StateDailyRecord>;

    fn load(&mut self) -> Result<Self::Output, LoadError> {
        let row = |date, state: &str, fips: &str, cases| StateDailyRecord {
            date,
            state: state.into(),
            fips: fips.into(),
            cases,
            deaths: cases / 100,
        };
        Ok(vec![
            row(day(2020, 6, 1), "California", "06", 100),
            row(day(2020, 12, 31), "California", "06", 500),
            row(day(2020, 12, 31), "Texas", "48", 400),
            row(day(2021, 5, 1), "Texas", "48", 600),
            row(day(2021, 12, 31), "California", "06", 900),
            row(day(2021, 12, 31), "Texas", "48", 800),
        ])
    }
}

fn national_rows() -> Vec<NationalDailyRecord> {
    vec![
        NationalDailyRecord {
            date: day(2020, 12, 31),
            cases: 20_000,
            deaths: 350,
        },
        NationalDailyRecord {
            date: day(2021, 12, 31),
            cases: 54_000,
            deaths: 820,
        },
    ]
}

fn sorted_live_keys(sink: &RecordingSink) -> Vec<String> {
    let mut keys: Vec<String> = sink
        .live()
        .values()
        .map(|m| m.key.as_str().to_string())
        .collect();
    keys.sort();
    keys
}

#[test]
fn cache_feeds_state_chart_until_invalidated() {
    let mut cache = DatasetCache::with_loader(StateFeed);
    let daily = cache.get_or_load().unwrap();
    let again = cache.get_or_load().unwrap();
    assert!(Arc::ptr_eq(&daily, &again));
    assert_eq!(cache.loads(), 1);

    let yearly = state_yearly(&daily);
    assert_eq!(yearly.len(), 4);
    let mut dash = Dashboard::new();
    let chart = dash.add_view(
        ChartView::new(
            "states",
            ViewConfig::chart(STATE_AXIS_TITLES.0, STATE_AXIS_TITLES.1),
            Arc::new(Palette::us_states()),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    dash.resize(600.0, 400.0, 0.0);
    chart
        .borrow_mut()
        .set_data(state_yearly_dataset(&yearly).unwrap(), 0.0);
    assert_eq!(
        sorted_live_keys(chart.borrow().sink()),
        ["CA-2020", "CA-2021", "TX-2020", "TX-2021"]
    );
    let ca = chart.borrow().sink().attrs_of("CA-2021").unwrap().fill;
    assert_eq!(chart.borrow().sink().attrs_of("CA-2020").unwrap().fill, ca);

    cache.invalidate();
    let reloaded = cache.get_or_load().unwrap();
    assert!(!Arc::ptr_eq(&daily, &reloaded));
    assert_eq!(cache.loads(), 2);
}

#[test]
fn year_filter_removes_marks_after_exit() {
    let mut cache = DatasetCache::with_loader(StateFeed);
    let yearly = state_yearly(&cache.get_or_load().unwrap());
    let mut filter = YearFilter::from_records(&yearly);
    let mut dash = Dashboard::new();
    let chart = dash.add_view(
        ChartView::new(
            "states",
            ViewConfig::chart(STATE_AXIS_TITLES.0, STATE_AXIS_TITLES.1),
            Arc::new(Palette::us_states()),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    dash.resize(600.0, 400.0, 0.0);
    chart
        .borrow_mut()
        .set_data(state_yearly_dataset(filter.apply(&yearly)).unwrap(), 0.0);
    dash.advance(1_000.0);

    assert!(filter.set(2020, false));
    assert!(!filter.set(2021, false));
    chart
        .borrow_mut()
        .set_data(state_yearly_dataset(filter.apply(&yearly)).unwrap(), 1_000.0);
    dash.advance(10_000.0);

    let view = chart.borrow();
    assert_eq!(sorted_live_keys(view.sink()), ["CA-2021", "TX-2021"]);
    assert_eq!(view.sink().destroys(), 2);
    assert_eq!(view.reconciler().live_count(), 2);
}

#[test]
fn national_chart_ignores_state_hover() {
    let mut cache = DatasetCache::with_loader(StateFeed);
    let yearly = state_yearly(&cache.get_or_load().unwrap());
    let mut dash = Dashboard::new();
    let states = dash.add_view(
        ChartView::new(
            "states",
            ViewConfig::chart(STATE_AXIS_TITLES.0, STATE_AXIS_TITLES.1),
            Arc::new(Palette::us_states()),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    let national = dash.add_view(
        ChartView::new(
            "national",
            ViewConfig::chart(NATIONAL_AXIS_TITLES.0, NATIONAL_AXIS_TITLES.1).unlinked(),
            Arc::new(Palette::years(2020)),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    dash.resize(600.0, 400.0, 0.0);
    states
        .borrow_mut()
        .set_data(state_yearly_dataset(&yearly).unwrap(), 0.0);
    national.borrow_mut().set_data(
        national_yearly_dataset(&national_yearly(&national_rows())).unwrap(),
        0.0,
    );
    dash.advance(1_000.0);
    let before = national.borrow().sink().attrs_of("2021").unwrap().clone();
    let label = national
        .borrow()
        .sink()
        .live()
        .values()
        .find(|m| m.key.as_str() == "2021")
        .and_then(|m| m.label.clone());
    assert_eq!(label.as_deref(), Some("2021"));

    let mark = states.borrow().sink().mark_for("CA-2021").unwrap();
    let enter = PointerEvent::new(mark, PointerKind::Enter, Point::new(120.0, 80.0));
    assert!(dash.handle_pointer(&enter, 1_000.0));
    dash.advance(2_000.0);

    assert_eq!(dash.interaction().hovered(), Some(Key::new("CA")));
    assert_eq!(national.borrow().interaction().hovered(), None);
    assert_eq!(national.borrow().sink().attrs_of("2021").unwrap(), &before);
    let states = states.borrow();
    let ca = states.sink().attrs_of("CA-2020").unwrap().opacity;
    let tx = states.sink().attrs_of("TX-2020").unwrap().opacity;
    assert!(ca > tx);
}
