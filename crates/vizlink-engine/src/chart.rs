//! Bubble chart view.
//!
//! One circle per datum, positioned by the dataset's x/y fields inside
//! the plot margins. Hovering a bubble writes its category to the
//! interaction cell and shows a tooltip; clicking toggles selection.

use std::sync::Arc;

use log::{debug, warn};
use vizlink_core::{
    Dataset, Datum, Key, MarkId, MarkSink, Point, PointerEvent, PointerHandler, Revision, Schema,
    Shape, VisualAttributes,
};
use vizlink_scale::{Extent, Palette, ScaleSet};

use crate::config::{ConfigError, ViewConfig};
use crate::encoding::{encode, pointer_feedback};
use crate::interaction::{InteractionCell, InteractionState};
use crate::metrics::ReconcileMetrics;
use crate::reconcile::{MarkEncoder, Reconciler};
use crate::tooltip::{Tooltip, TooltipContent};
use crate::view::{axis_ticks, Tick, View};

/// A bubble chart drawing into the substrate `S`.
#[derive(Debug)]
pub struct ChartView<S: MarkSink> {
    name: String,
    config: ViewConfig,
    cell: InteractionCell,
    palette: Arc<Palette>,
    sink: S,
    reconciler: Reconciler,
    dataset: Option<Dataset>,
    size: Extent,
    scales: Option<ScaleSet>,
    /// Interaction revision and pointer mark of the last encode.
    rendered: Option<(Revision, Option<Key>)>,
    /// Identity key of the mark under the pointer.
    pointer: Option<Key>,
    tooltip: Tooltip,
}

impl<S: MarkSink> ChartView<S> {
    /// Create an empty chart.
    ///
    /// Linked views share `cell`; unlinked ones get a private cell.
    /// Nothing is drawn until both a dataset and a drawable size exist.
    pub fn new(
        name: impl Into<String>,
        config: ViewConfig,
        palette: Arc<Palette>,
        cell: &InteractionCell,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let cell = if config.linked {
            cell.clone()
        } else {
            InteractionCell::new()
        };
        Ok(Self {
            name: name.into(),
            reconciler: Reconciler::new(config.transitions.clone()),
            config,
            cell,
            palette,
            sink,
            dataset: None,
            size: Extent::default(),
            scales: None,
            rendered: None,
            pointer: None,
            tooltip: Tooltip::default(),
        })
    }

    /// Replace the dataset and reconcile. Returns whether a frame was
    /// drawn (false while the view has no drawable size).
    pub fn set_data(&mut self, dataset: Dataset, now_ms: f64) -> bool {
        self.dataset = Some(dataset);
        self.render(now_ms)
    }

    /// Full pass: recompute scales and reconcile every mark.
    fn render(&mut self, now_ms: f64) -> bool {
        let Some(dataset) = &self.dataset else {
            return false;
        };
        let inner = self.config.margins.inner(self.size.width, self.size.height);
        if !inner.is_drawable() {
            warn!(
                "{}: {}x{} leaves no plot area, skipping frame",
                self.name, self.size.width, self.size.height
            );
            return false;
        }
        let scales = ScaleSet::compute(dataset, inner, Arc::clone(&self.palette));
        if let Some(key) = &self.pointer {
            if dataset.get(key.as_str()).is_none() {
                debug!("{}: mark under pointer '{key}' left the dataset", self.name);
                // Its Leave may never arrive once the mark is destroyed.
                let category = self.reconciler.get(key.as_str()).map(|m| m.datum().category());
                if category.is_some() && self.cell.hovered().as_ref() == category {
                    self.cell.set_hovered(None);
                }
                self.pointer = None;
                self.tooltip.hide();
            }
        }
        let state = self.cell.state();
        let encoder = ChartEncoder {
            schema: dataset.schema(),
            scales: &scales,
            state: &state,
            config: &self.config,
            pointer: self.pointer.as_ref(),
        };
        self.reconciler
            .reconcile(dataset, &encoder, &mut self.sink, now_ms);
        self.rendered = Some((self.cell.revision(), self.pointer.clone()));
        self.scales = Some(scales);
        true
    }

    /// X axis ticks of the current layout.
    pub fn x_ticks(&self) -> Vec<Tick> {
        self.scales
            .as_ref()
            .map(|s| axis_ticks(&s.x, self.config.tick_count))
            .unwrap_or_default()
    }

    /// Y axis ticks of the current layout.
    pub fn y_ticks(&self) -> Vec<Tick> {
        self.scales
            .as_ref()
            .map(|s| axis_ticks(&s.y, self.config.tick_count))
            .unwrap_or_default()
    }

    /// Where the plot area starts inside the view. Mark positions are
    /// relative to this point.
    pub fn plot_origin(&self) -> Point {
        Point::new(self.config.margins.left, self.config.margins.top)
    }

    /// The view configuration.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The substrate.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the substrate.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The mark set.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Counters of the latest reconciliation pass.
    pub fn metrics(&self) -> &ReconcileMetrics {
        self.reconciler.metrics()
    }

    /// The tooltip.
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Scales of the last drawn frame.
    pub fn scales(&self) -> Option<&ScaleSet> {
        self.scales.as_ref()
    }

    /// The current dataset.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Outer size of the view.
    pub fn size(&self) -> Extent {
        self.size
    }

    /// Identity key of the mark under the pointer.
    pub fn pointer(&self) -> Option<&Key> {
        self.pointer.as_ref()
    }
}

impl<S: MarkSink> View for ChartView<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn interaction(&self) -> &InteractionCell {
        &self.cell
    }

    fn owns(&self, mark: MarkId) -> bool {
        self.reconciler.owns(mark)
    }

    fn handle_pointer(&mut self, event: &PointerEvent, now_ms: f64) -> bool {
        let mut handler = ChartPointer {
            cell: &self.cell,
            schema: self.dataset.as_ref().map(|d| &**d.schema()),
            config: &self.config,
            bounds: self.size,
            pointer: &mut self.pointer,
            tooltip: &mut self.tooltip,
        };
        let delivered = self.reconciler.dispatch(event, &mut handler);
        if delivered {
            self.sync(now_ms);
        }
        delivered
    }

    fn sync(&mut self, now_ms: f64) -> usize {
        let state = self.cell.state();
        if self
            .tooltip
            .category()
            .is_some_and(|c| state.hovered.as_ref() != Some(c))
        {
            self.tooltip.hide();
        }
        let current = (self.cell.revision(), self.pointer.clone());
        if self.rendered.as_ref() == Some(&current) {
            return 0;
        }
        let (Some(dataset), Some(scales)) = (&self.dataset, &self.scales) else {
            return 0;
        };
        let encoder = ChartEncoder {
            schema: dataset.schema(),
            scales,
            state: &state,
            config: &self.config,
            pointer: self.pointer.as_ref(),
        };
        let changed = self.reconciler.retarget(
            &encoder,
            &mut self.sink,
            now_ms,
            self.config.transitions.hover_ms,
        );
        self.rendered = Some(current);
        changed
    }

    fn resize(&mut self, width: f64, height: f64, now_ms: f64) {
        self.size = Extent::new(width, height);
        self.tooltip.hide();
        self.render(now_ms);
    }

    fn advance(&mut self, now_ms: f64) -> usize {
        self.reconciler.advance(&mut self.sink, now_ms)
    }
}

struct ChartEncoder<'a> {
    schema: &'a Schema,
    scales: &'a ScaleSet,
    state: &'a InteractionState,
    config: &'a ViewConfig,
    pointer: Option<&'a Key>,
}

impl MarkEncoder for ChartEncoder<'_> {
    fn shape(&self, _datum: &Datum) -> Shape {
        Shape::Circle
    }

    fn attrs(&self, datum: &Datum) -> VisualAttributes {
        let attrs = encode(
            datum,
            self.schema,
            self.scales,
            self.state,
            &self.config.encoding,
        );
        pointer_feedback(
            attrs,
            self.pointer == Some(datum.key()),
            &self.config.encoding,
        )
    }

    fn label(&self, datum: &Datum) -> Option<String> {
        let text = datum.value(self.schema.label()?).to_string();
        (!text.is_empty()).then_some(text)
    }

    fn label_dy(&self) -> f64 {
        self.config.label_dy
    }
}

struct ChartPointer<'a> {
    cell: &'a InteractionCell,
    schema: Option<&'a Schema>,
    config: &'a ViewConfig,
    bounds: Extent,
    pointer: &'a mut Option<Key>,
    tooltip: &'a mut Tooltip,
}

impl PointerHandler for ChartPointer<'_> {
    fn on_enter(&mut self, datum: &Datum, event: &PointerEvent) {
        *self.pointer = Some(datum.key().clone());
        self.cell.set_hovered(Some(datum.category().clone()));
        if let Some(schema) = self.schema {
            let content = TooltipContent::for_datum(
                datum,
                schema,
                self.config.x_title.as_deref(),
                self.config.y_title.as_deref(),
            );
            self.tooltip.show(
                datum.key().clone(),
                datum.category().clone(),
                content,
                event.at,
                self.bounds,
                &self.config.tooltip,
            );
        }
    }

    fn on_move(&mut self, _datum: &Datum, event: &PointerEvent) {
        self.tooltip
            .follow(event.at, self.bounds, &self.config.tooltip);
    }

    fn on_leave(&mut self, _datum: &Datum, _event: &PointerEvent) {
        *self.pointer = None;
        self.cell.set_hovered(None);
        self.tooltip.hide();
    }

    fn on_click(&mut self, datum: &Datum, _event: &PointerEvent) {
        self.cell.toggle_selected(datum.category().clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizlink_core::{FieldDef, FieldRole, FieldValue, Filter, PointerKind};
    use vizlink_test_utils::{fixtures, RecordingSink};

    fn chart(cell: &InteractionCell) -> ChartView<RecordingSink> {
        ChartView::new(
            "states",
            ViewConfig::chart("Cases", "Deaths"),
            Arc::new(Palette::us_states()),
            cell,
            RecordingSink::new(),
        )
        .unwrap()
    }

    fn drawn(cell: &InteractionCell) -> ChartView<RecordingSink> {
        let mut view = chart(cell);
        view.resize(600.0, 400.0, 0.0);
        view.set_data(
            fixtures::simple(&[("CA", 100.0, 10.0), ("TX", 50.0, 5.0)]),
            0.0,
        );
        view
    }

    fn event(view: &ChartView<RecordingSink>, key: &str, kind: PointerKind) -> PointerEvent {
        let mark = view.sink().mark_for(key).unwrap();
        PointerEvent::new(mark, kind, Point::new(200.0, 200.0))
    }

    #[test]
    fn waits_for_a_drawable_size() {
        let cell = InteractionCell::new();
        let mut view = chart(&cell);
        assert!(!view.set_data(fixtures::simple(&[("CA", 1.0, 1.0)]), 0.0));
        assert_eq!(view.sink().live_count(), 0);
        view.resize(60.0, 60.0, 0.0);
        assert_eq!(view.sink().live_count(), 0);
        view.resize(600.0, 400.0, 0.0);
        assert_eq!(view.sink().live_count(), 1);
        assert_eq!(view.scales().unwrap().x.map(1.0), 520.0);
    }

    #[test]
    fn positions_are_plot_relative() {
        let cell = InteractionCell::new();
        let view = drawn(&cell);
        let ca = view.sink().attrs_of("CA").unwrap();
        assert_eq!(ca.position, Point::new(520.0, 0.0));
        assert_eq!(view.plot_origin(), Point::new(60.0, 20.0));
    }

    #[test]
    fn enter_hovers_category_and_shows_tooltip() {
        let cell = InteractionCell::new();
        let mut view = drawn(&cell);
        let e = event(&view, "CA", PointerKind::Enter);
        assert!(view.handle_pointer(&e, 10.0));

        assert_eq!(cell.hovered(), Some(Key::new("CA")));
        let ca = view.sink().attrs_of("CA").unwrap();
        assert_eq!(ca.radius, 10.0);
        assert_eq!(ca.filter, Some(Filter::Glow));
        assert_eq!(view.sink().attrs_of("TX").unwrap().opacity, 0.15);

        let content = view.tooltip().content().unwrap();
        assert_eq!(content.header()[0], "Cases: 100");
        assert_eq!(content.extra(), ["year: 2021"]);
    }

    #[test]
    fn leave_restores_idle_encoding() {
        let cell = InteractionCell::new();
        let mut view = drawn(&cell);
        view.handle_pointer(&event(&view, "CA", PointerKind::Enter), 10.0);
        view.handle_pointer(&event(&view, "CA", PointerKind::Leave), 20.0);

        assert_eq!(cell.hovered(), None);
        assert!(!view.tooltip().is_visible());
        assert_eq!(view.pointer(), None);
        let ca = view.sink().attrs_of("CA").unwrap();
        assert_eq!(ca.radius, 8.0);
        assert_eq!(ca.filter, None);
        assert_eq!(view.sink().attrs_of("TX").unwrap().opacity, 1.0);
    }

    #[test]
    fn click_toggles_selection() {
        let cell = InteractionCell::new();
        let mut view = drawn(&cell);
        view.handle_pointer(&event(&view, "TX", PointerKind::Click), 0.0);
        assert_eq!(cell.selected(), Some(Key::new("TX")));
        let tx = view.sink().attrs_of("TX").unwrap();
        assert_eq!(tx.radius, 12.0);
        assert!(tx.stroke.is_some());

        view.handle_pointer(&event(&view, "TX", PointerKind::Click), 0.0);
        assert_eq!(cell.selected(), None);
    }

    #[test]
    fn foreign_writes_apply_on_sync() {
        let cell = InteractionCell::new();
        let mut view = drawn(&cell);
        view.handle_pointer(&event(&view, "CA", PointerKind::Enter), 0.0);
        assert!(view.tooltip().is_visible());

        cell.set_hovered(Some(Key::new("TX")));
        assert_eq!(view.sync(5.0), 2);
        assert!(!view.tooltip().is_visible());
        assert_eq!(view.sink().attrs_of("CA").unwrap().opacity, 0.15);
        // Nothing changed since the last encode.
        assert_eq!(view.sync(6.0), 0);
    }

    #[test]
    fn unlinked_view_keeps_its_own_state() {
        let shared = InteractionCell::new();
        let mut view = ChartView::new(
            "national",
            ViewConfig::default().unlinked(),
            Arc::new(Palette::years(2020)),
            &shared,
            RecordingSink::new(),
        )
        .unwrap();
        assert!(!view.interaction().same_cell(&shared));
        view.resize(600.0, 400.0, 0.0);
        view.set_data(fixtures::simple(&[("2020", 1.0, 1.0)]), 0.0);
        view.handle_pointer(&event(&view, "2020", PointerKind::Enter), 0.0);
        assert_eq!(shared.hovered(), None);
        assert_eq!(view.interaction().hovered(), Some(Key::new("2020")));
    }

    #[test]
    fn label_field_becomes_bubble_label() {
        let schema = Arc::new(
            Schema::new(vec![
                FieldDef::new("year", FieldRole::Identity),
                FieldDef::new("cases", FieldRole::PositionX),
                FieldDef::new("deaths", FieldRole::PositionY),
                FieldDef::new("label", FieldRole::Label),
            ])
            .unwrap(),
        );
        let ds = Dataset::new(schema)
            .with_row([FieldValue::from(2020), 5.0.into(), 1.0.into(), "2020".into()])
            .with_row([FieldValue::from(2021), 9.0.into(), 2.0.into(), "".into()]);
        let cell = InteractionCell::new();
        let mut view = chart(&cell);
        view.resize(600.0, 400.0, 0.0);
        view.set_data(ds, 0.0);
        let labels: Vec<_> = view
            .sink()
            .live()
            .values()
            .map(|m| (m.key.as_str().to_string(), m.label.clone()))
            .collect();
        assert_eq!(
            labels,
            [
                ("2020".to_string(), Some("2020".to_string())),
                ("2021".to_string(), None)
            ]
        );
    }

    #[test]
    fn removing_the_pointer_mark_hides_tooltip() {
        let cell = InteractionCell::new();
        let mut view = drawn(&cell);
        view.handle_pointer(&event(&view, "CA", PointerKind::Enter), 0.0);
        view.set_data(fixtures::simple(&[("TX", 50.0, 5.0)]), 10.0);
        assert!(!view.tooltip().is_visible());
        assert_eq!(view.pointer(), None);
        assert_eq!(cell.hovered(), None);
        assert_eq!(view.sink().attrs_of("TX").unwrap().opacity, 1.0);
        assert_eq!(view.metrics().exited, 1);
    }

    #[test]
    fn departing_pointer_mark_keeps_foreign_hover() {
        let cell = InteractionCell::new();
        let mut view = drawn(&cell);
        view.handle_pointer(&event(&view, "CA", PointerKind::Enter), 0.0);
        cell.set_hovered(Some(Key::new("TX")));
        view.set_data(fixtures::simple(&[("TX", 50.0, 5.0)]), 10.0);
        assert_eq!(cell.hovered(), Some(Key::new("TX")));
    }

    #[test]
    fn ticks_follow_layout() {
        let cell = InteractionCell::new();
        let mut view = chart(&cell);
        assert!(view.x_ticks().is_empty());
        view.resize(600.0, 400.0, 0.0);
        view.set_data(fixtures::simple(&[("CA", 100.0, 10.0)]), 0.0);
        let ticks = view.x_ticks();
        assert_eq!(ticks.last().unwrap().value, 100.0);
        assert_eq!(ticks.last().unwrap().offset, 520.0);
        assert!(!view.y_ticks().is_empty());
    }

    #[test]
    fn advance_destroys_exited_marks() {
        let cell = InteractionCell::new();
        let mut view = drawn(&cell);
        view.set_data(fixtures::simple(&[("CA", 100.0, 10.0)]), 0.0);
        assert_eq!(view.advance(100.0), 0);
        assert_eq!(view.advance(400.0), 1);
        assert_eq!(view.sink().live_count(), 1);
    }
}
