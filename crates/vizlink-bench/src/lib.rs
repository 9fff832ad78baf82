//! Benchmark workloads for the Vizlink engine.
//!
//! - [`scatter`]: seeded random dataset of `n` keyed bubbles
//! - [`churn`]: a follow-up dataset that drops, moves and adds keys
//! - [`ScatterEncoder`]: the chart encoding pipeline without a view
//! - [`NullSink`]: a substrate that only counts calls

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use vizlink_core::{
    Color, Dataset, Datum, FieldDef, FieldRole, FieldValue, MarkId, MarkSink, MarkSpec, Schema,
    Shape, VisualAttributes,
};
use vizlink_engine::{encode, EncodingConfig, InteractionState, MarkEncoder};
use vizlink_scale::palette::TABLEAU10;
use vizlink_scale::{Extent, Palette, ScaleSet};

/// `key` (identity), `group` (category), `x`, `y`.
pub fn scatter_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new(vec![
            FieldDef::new("key", FieldRole::Identity),
            FieldDef::new("group", FieldRole::Category),
            FieldDef::new("x", FieldRole::PositionX),
            FieldDef::new("y", FieldRole::PositionY),
        ])
        .unwrap(),
    )
}

/// `n` bubbles keyed `k0..k{n-1}` in 50 categories, values in `[0, 1e6)`.
pub fn scatter(n: usize, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ds = Dataset::new(scatter_schema());
    for i in 0..n {
        push_row(&mut ds, i, &mut rng);
    }
    ds
}

/// A successor of `scatter(n, _)`: each key is kept with probability
/// `keep` (and moved), and as many fresh keys as were dropped are added.
pub fn churn(n: usize, keep: f64, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ds = Dataset::new(scatter_schema());
    let mut fresh = n;
    for i in 0..n {
        if rng.gen_bool(keep) {
            push_row(&mut ds, i, &mut rng);
        } else {
            push_row(&mut ds, fresh, &mut rng);
            fresh += 1;
        }
    }
    ds
}

fn push_row(ds: &mut Dataset, i: usize, rng: &mut ChaCha8Rng) {
    ds.push([
        FieldValue::from(format!("k{i}")),
        FieldValue::from(format!("g{}", i % 50)),
        rng.gen_range(0.0f64..1e6).into(),
        rng.gen_range(0.0f64..1e6).into(),
    ]);
}

/// Tableau10 over the 50 scatter categories.
pub fn group_palette() -> Palette {
    let scheme: Vec<Color> = TABLEAU10.iter().filter_map(|h| Color::from_hex(h)).collect();
    Palette::new((0..50).map(|g| format!("g{g}")), &scheme)
}

/// Chart encoding over fixed scales and interaction state.
pub struct ScatterEncoder {
    /// Layout of the encoded dataset.
    pub schema: Arc<Schema>,
    /// Scales fitted to the dataset.
    pub scales: ScaleSet,
    /// Interaction state applied to every mark.
    pub state: InteractionState,
    /// Radii and emphasis settings.
    pub config: EncodingConfig,
}

impl ScatterEncoder {
    /// Fit scales to `dataset` in a 600x400 plot.
    pub fn fit(dataset: &Dataset, state: InteractionState) -> Self {
        Self {
            schema: Arc::clone(dataset.schema()),
            scales: ScaleSet::compute(
                dataset,
                Extent::new(600.0, 400.0),
                Arc::new(group_palette()),
            ),
            state,
            config: EncodingConfig::default(),
        }
    }
}

impl MarkEncoder for ScatterEncoder {
    fn shape(&self, _datum: &Datum) -> Shape {
        Shape::Circle
    }

    fn attrs(&self, datum: &Datum) -> VisualAttributes {
        encode(datum, &self.schema, &self.scales, &self.state, &self.config)
    }
}

/// Substrate that counts calls and draws nothing.
#[derive(Debug, Default)]
pub struct NullSink {
    /// Total calls received.
    pub calls: u64,
}

impl MarkSink for NullSink {
    fn create(&mut self, _mark: MarkId, _spec: MarkSpec<'_>) {
        self.calls += 1;
    }

    fn update_to(&mut self, _mark: MarkId, _target: &VisualAttributes, _duration_ms: f64) {
        self.calls += 1;
    }

    fn destroy(&mut self, _mark: MarkId) {
        self.calls += 1;
    }
}
