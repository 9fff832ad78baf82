//! Choropleth map view.
//!
//! One path per atlas region, keyed by its abbreviation. The map has no
//! data of its own: its dataset is the region layout of the current
//! viewport, rebuilt on every resize.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};
use vizlink_core::{
    Dataset, Datum, FieldDef, FieldRole, FieldValue, Key, MarkId, MarkSink, Point, PointerEvent,
    PointerHandler, Revision, Schema, Shape, VisualAttributes,
};
use vizlink_geo::{Atlas, Projection, ProjectionKind, Region};
use vizlink_scale::{Extent, Palette};

use crate::config::{ConfigError, ViewConfig};
use crate::encoding::emphasis;
use crate::interaction::{InteractionCell, InteractionState};
use crate::metrics::ReconcileMetrics;
use crate::reconcile::{MarkEncoder, Reconciler};
use crate::tooltip::{Tooltip, TooltipContent};
use crate::view::View;

/// Window width from which the large preset applies.
pub const LARGE_WINDOW: f64 = 1024.0;

/// Map size for a window `window_width` pixels wide: 900x570 on large
/// windows, 600x380 otherwise.
pub fn preset_size(window_width: f64) -> Extent {
    if window_width >= LARGE_WINDOW {
        Extent::new(900.0, 570.0)
    } else {
        Extent::new(600.0, 380.0)
    }
}

/// A choropleth of an [`Atlas`] drawing into the substrate `S`.
#[derive(Debug)]
pub struct MapView<S: MarkSink> {
    name: String,
    config: ViewConfig,
    cell: InteractionCell,
    palette: Arc<Palette>,
    atlas: Arc<Atlas>,
    kind: ProjectionKind,
    schema: Arc<Schema>,
    sink: S,
    reconciler: Reconciler,
    regions: IndexMap<Key, Region>,
    size: Extent,
    projection: Option<Projection>,
    rendered: Option<Revision>,
    tooltip: Tooltip,
}

impl<S: MarkSink> MapView<S> {
    /// Create a map of `atlas` using the default projection.
    pub fn new(
        name: impl Into<String>,
        config: ViewConfig,
        palette: Arc<Palette>,
        atlas: Arc<Atlas>,
        cell: &InteractionCell,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let schema = Arc::new(Schema::new(vec![
            FieldDef::new("key", FieldRole::Identity),
            FieldDef::new("x", FieldRole::PositionX),
            FieldDef::new("y", FieldRole::PositionY),
            FieldDef::new("label", FieldRole::Label),
            FieldDef::new("name", FieldRole::Hidden),
        ])?);
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
            atlas,
            kind: ProjectionKind::default(),
            schema,
            sink,
            regions: IndexMap::new(),
            size: Extent::default(),
            projection: None,
            rendered: None,
            tooltip: Tooltip::default(),
        })
    }

    /// Builder: use projection `kind`.
    pub fn with_projection(mut self, kind: ProjectionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Resize to the preset for a window `window_width` pixels wide.
    pub fn fit_window(&mut self, window_width: f64, now_ms: f64) {
        let size = preset_size(window_width);
        self.resize(size.width, size.height, now_ms);
    }

    /// Project, lay out and reconcile every region.
    fn render(&mut self, now_ms: f64) -> bool {
        if !self.size.is_drawable() {
            warn!(
                "{}: {}x{} is not drawable, skipping frame",
                self.name, self.size.width, self.size.height
            );
            return false;
        }
        let projection = self
            .atlas
            .project_to_viewport(self.kind, self.size.width, self.size.height);
        let relayout = self.projection.is_some_and(|p| p != projection);

        let mut dataset = Dataset::new(Arc::clone(&self.schema));
        self.regions.clear();
        for region in self.atlas.regions(&projection) {
            dataset.push([
                FieldValue::from(region.key.as_str()),
                region.centroid.x.into(),
                region.centroid.y.into(),
                region.label.into(),
                region.name.as_str().into(),
            ]);
            self.regions.entry(region.key.clone()).or_insert(region);
        }

        let state = self.cell.state();
        let encoder = MapEncoder {
            schema: &self.schema,
            regions: &self.regions,
            palette: &self.palette,
            state: &state,
            config: &self.config,
        };
        self.reconciler
            .reconcile(&dataset, &encoder, &mut self.sink, now_ms);
        if relayout {
            debug!("{}: reshaping {} regions", self.name, self.regions.len());
            self.reconciler.reshape(&encoder, &mut self.sink);
        }
        self.rendered = Some(self.cell.revision());
        self.projection = Some(projection);
        true
    }

    /// The projection of the last drawn frame.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// The laid-out region for `key`.
    pub fn region(&self, key: &str) -> Option<&Region> {
        self.regions.get(key)
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

    /// Outer size of the view.
    pub fn size(&self) -> Extent {
        self.size
    }
}

impl<S: MarkSink> View for MapView<S> {
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
        let mut handler = MapPointer {
            cell: &self.cell,
            regions: &self.regions,
            config: &self.config,
            bounds: self.size,
            sink: &mut self.sink,
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
        let revision = self.cell.revision();
        if self.rendered.is_none() || self.rendered == Some(revision) {
            return 0;
        }
        let encoder = MapEncoder {
            schema: &self.schema,
            regions: &self.regions,
            palette: &self.palette,
            state: &state,
            config: &self.config,
        };
        let changed = self.reconciler.retarget(
            &encoder,
            &mut self.sink,
            now_ms,
            self.config.transitions.hover_ms,
        );
        self.rendered = Some(revision);
        changed
    }

    fn resize(&mut self, width: f64, height: f64, now_ms: f64) {
        self.size = Extent::new(width, height);
        self.tooltip.hide();
        self.render(now_ms);
    }

    fn window_resized(&mut self, width: f64, _height: f64, now_ms: f64) {
        self.fit_window(width, now_ms);
    }

    fn advance(&mut self, now_ms: f64) -> usize {
        self.reconciler.advance(&mut self.sink, now_ms)
    }
}

struct MapEncoder<'a> {
    schema: &'a Schema,
    regions: &'a IndexMap<Key, Region>,
    palette: &'a Palette,
    state: &'a InteractionState,
    config: &'a ViewConfig,
}

impl MarkEncoder for MapEncoder<'_> {
    fn shape(&self, datum: &Datum) -> Shape {
        let path = self
            .regions
            .get(datum.key())
            .map_or_else(|| Arc::from(""), |r| Arc::clone(&r.path));
        Shape::Path(path)
    }

    fn attrs(&self, datum: &Datum) -> VisualAttributes {
        let e = emphasis(datum.category(), self.state, &self.config.encoding);
        VisualAttributes {
            position: Point::new(
                datum.number(self.schema.x()),
                datum.number(self.schema.y()),
            ),
            radius: e.radius,
            fill: self.palette.color(datum.category().as_str()),
            opacity: e.opacity,
            stroke: e.stroke,
            filter: e.filter,
        }
    }

    /// Unknown regions still carry a label, an empty one.
    fn label(&self, datum: &Datum) -> Option<String> {
        let field = self.schema.label()?;
        Some(datum.value(field).to_string())
    }

    fn label_dy(&self) -> f64 {
        self.config.label_dy
    }
}

struct MapPointer<'a, S> {
    cell: &'a InteractionCell,
    regions: &'a IndexMap<Key, Region>,
    config: &'a ViewConfig,
    bounds: Extent,
    sink: &'a mut S,
    tooltip: &'a mut Tooltip,
}

impl<S: MarkSink> PointerHandler for MapPointer<'_, S> {
    fn on_enter(&mut self, datum: &Datum, event: &PointerEvent) {
        self.sink.raise(event.mark);
        self.cell.set_hovered(Some(datum.category().clone()));
        let name = self
            .regions
            .get(datum.key())
            .map(|r| r.name.clone())
            .unwrap_or_else(|| datum.key().to_string());
        self.tooltip.show(
            datum.key().clone(),
            datum.category().clone(),
            TooltipContent::text(name),
            event.at,
            self.bounds,
            &self.config.tooltip,
        );
    }

    fn on_move(&mut self, _datum: &Datum, event: &PointerEvent) {
        self.tooltip
            .follow(event.at, self.bounds, &self.config.tooltip);
    }

    fn on_leave(&mut self, _datum: &Datum, _event: &PointerEvent) {
        self.cell.set_hovered(None);
        self.tooltip.hide();
    }

    fn on_click(&mut self, datum: &Datum, _event: &PointerEvent) {
        self.cell.toggle_selected(datum.category().clone());
    }
}
