//! Topology document → global atlas → map view, end to end.

use std::sync::Arc;

use vizlink_core::{Point, PointerEvent, PointerKind, Shape};
use vizlink_engine::{preset_size, ChartView, Dashboard, MapView, ViewConfig};
use vizlink_geo::{Atlas, ProjectionKind};
use vizlink_scale::{Extent, Palette};
use vizlink_test_utils::{fixtures::TOPOLOGY, RecordingSink, SinkOp};

fn global_atlas() -> Arc<Atlas> {
    Arc::new(Atlas::load_global(TOPOLOGY, "states").unwrap().clone())
}

#[test]
fn map_follows_window_presets() {
    let mut dash = Dashboard::new();
    let map = dash.add_view(
        MapView::new(
            "map",
            ViewConfig::map(),
            Arc::new(Palette::us_states()),
            global_atlas(),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    map.borrow_mut().fit_window(800.0, 0.0);
    assert_eq!(map.borrow().size(), preset_size(800.0));
    let small: Vec<Point> = ["CA", "TX"]
        .iter()
        .map(|k| map.borrow().region(k).unwrap().centroid)
        .collect();

    map.borrow_mut().fit_window(1440.0, 50.0);
    assert_eq!(map.borrow().size(), Extent::new(900.0, 570.0));
    let view = map.borrow();
    for (key, before) in ["CA", "TX"].iter().zip(&small) {
        let after = view.region(key).unwrap().centroid;
        assert!((after.x - 1.5 * before.x).abs() < 1e-6, "{key}");
        // Marks animate to the new centroid.
        let target = view.sink().attrs_of(key).unwrap().position;
        assert_eq!(target, after);
    }
    let reshaped = view
        .sink()
        .count(|op| matches!(op, SinkOp::Reshape { shape: Shape::Path(_), .. }));
    assert_eq!(reshaped, 3);
    assert_eq!(view.metrics().total_entered, 3);
}

#[test]
fn click_selects_region_and_outlines_it() {
    let mut dash = Dashboard::new();
    let map = dash.add_view(
        MapView::new(
            "map",
            ViewConfig::map(),
            Arc::new(Palette::us_states()),
            global_atlas(),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap()
        .with_projection(ProjectionKind::Equirectangular),
    );
    dash.resize(600.0, 380.0, 0.0);
    let tx = map.borrow().sink().mark_for("TX").unwrap();
    let click = PointerEvent::new(tx, PointerKind::Click, Point::new(300.0, 200.0));
    assert!(dash.handle_pointer(&click, 0.0));

    let view = map.borrow();
    assert_eq!(view.projection().unwrap().kind(), ProjectionKind::Equirectangular);
    let attrs = view.sink().attrs_of("TX").unwrap();
    assert!(attrs.stroke.is_some());
    assert_eq!(view.sink().attrs_of("CA").unwrap().opacity, 0.2);
    assert_eq!(view.sink().attrs_of("72").unwrap().opacity, 0.2);
}

#[test]
fn regions_never_exit() {
    let mut dash = Dashboard::new();
    let map = dash.add_view(
        MapView::new(
            "map",
            ViewConfig::map(),
            Arc::new(Palette::us_states()),
            global_atlas(),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    for (i, width) in [600.0, 900.0, 300.0, 900.0].into_iter().enumerate() {
        dash.resize(width, width * 0.6, i as f64 * 100.0);
    }
    assert_eq!(dash.advance(10_000.0), 0);
    let view = map.borrow();
    assert_eq!(view.sink().live_count(), 3);
    assert_eq!(view.sink().destroys(), 0);
    assert_eq!(view.reconciler().live_count(), 3);
}

#[test]
fn window_resize_keeps_map_presets() {
    let mut dash = Dashboard::new();
    let map = dash.add_view(
        MapView::new(
            "map",
            ViewConfig::map(),
            Arc::new(Palette::us_states()),
            global_atlas(),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    let chart = dash.add_view(
        ChartView::new(
            "states",
            ViewConfig::chart("Cases", "Deaths"),
            Arc::new(Palette::us_states()),
            dash.interaction(),
            RecordingSink::new(),
        )
        .unwrap(),
    );
    for (i, (width, height)) in [(800.0, 500.0), (1280.0, 720.0)].into_iter().enumerate() {
        dash.resize(width, height, i as f64 * 100.0);
        assert_eq!(map.borrow().size(), preset_size(width));
        assert_eq!(chart.borrow().size(), Extent::new(width, height));
    }
    let projection = *map.borrow().projection().unwrap();
    let atlas = global_atlas();
    assert_eq!(
        projection,
        atlas.project_to_viewport(ProjectionKind::AlbersUsa, 900.0, 570.0)
    );
}
