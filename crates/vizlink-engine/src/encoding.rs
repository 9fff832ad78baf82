//! The encoding policy: datum + scales + interaction state → attributes.
//!
//! Everything here is a pure function of its arguments, so views can
//! re-encode every mark on each interaction change without memo state.
//! Emphasis compares the datum's category key against the interaction
//! state, so views plotting several marks per category emphasize all of
//! them together.

use vizlink_core::{Datum, Filter, Key, Schema, Stroke, VisualAttributes};
use vizlink_scale::ScaleSet;

use crate::config::EncodingConfig;
use crate::interaction::InteractionState;

/// The interaction-dependent part of a mark's attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emphasis {
    /// `large_radius` when selected, else `base_radius`.
    pub radius: f64,
    /// 1 when idle or active, else the dimmed opacity.
    pub opacity: f64,
    /// Outline, selected mark only.
    pub stroke: Option<Stroke>,
    /// Glow, hovered mark only, and only if nothing else is selected.
    pub filter: Option<Filter>,
}

/// Emphasis of a mark of `category` under `state`.
///
/// Selection wins over hover: with both set, only the selected category
/// is at full opacity, and the hovered one gets no glow unless it is the
/// selected one.
pub fn emphasis(category: &Key, state: &InteractionState, config: &EncodingConfig) -> Emphasis {
    let selected = state.selected.as_ref() == Some(category);
    let hovered = state.hovered.as_ref() == Some(category);
    let opacity = match state.active() {
        None => 1.0,
        Some(active) if active == category => 1.0,
        Some(_) => config.dimmed_opacity,
    };
    let glow = hovered && (state.selected.is_none() || selected);
    Emphasis {
        radius: if selected {
            config.large_radius
        } else {
            config.base_radius
        },
        opacity,
        stroke: selected.then_some(config.stroke),
        filter: glow.then_some(Filter::Glow),
    }
}

/// Full attributes of a chart mark.
///
/// Position comes from the datum's x/y fields through `scales` (values
/// that are missing or not numeric count as 0), fill from the palette
/// by category.
pub fn encode(
    datum: &Datum,
    schema: &Schema,
    scales: &ScaleSet,
    state: &InteractionState,
    config: &EncodingConfig,
) -> VisualAttributes {
    let e = emphasis(datum.category(), state, config);
    VisualAttributes {
        position: scales.project(datum.number(schema.x()), datum.number(schema.y())),
        radius: e.radius,
        fill: scales.palette.color(datum.category().as_str()),
        opacity: e.opacity,
        stroke: e.stroke,
        filter: e.filter,
    }
}

/// Grow the radius of the mark under the pointer by `hover_growth`.
///
/// Applied by views on top of [`encode`]; the mark under the pointer is
/// a per-view notion, unlike the shared hovered category.
pub fn pointer_feedback(
    attrs: VisualAttributes,
    under_pointer: bool,
    config: &EncodingConfig,
) -> VisualAttributes {
    if under_pointer {
        VisualAttributes {
            radius: attrs.radius + config.hover_growth,
            ..attrs
        }
    } else {
        attrs
    }
}
