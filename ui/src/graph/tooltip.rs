//! Hover state and the floating tooltip.

use dioxus::prelude::*;

use crate::graph::layout::Marker;

/// What the pointer is doing. Two states only; re-entering another marker
/// simply overwrites the shown payload (last write wins).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Hover {
    #[default]
    None,
    Shown {
        marker: Marker,
        /// Viewport coordinates of the pointer when the marker was entered.
        x: f64,
        y: f64,
    },
}

/// Floating tooltip next to the cursor. Rendered hidden when there is no
/// hover so the opacity fade runs in both directions.
#[component]
pub fn Tooltip(hover: Hover) -> Element {
    match hover {
        Hover::None => rsx! {
            div { class: "tooltip", style: "left: 0px; top: 0px;" }
        },
        Hover::Shown { marker, x, y } => {
            // Offset mirrors the classic dashboard: right of and above the
            // pointer so the tip never sits under the finger.
            let left = x + 10.0;
            let top = y - 28.0;
            rsx! {
                div {
                    class: "tooltip tooltip--visible",
                    style: "left: {left}px; top: {top}px;",
                    div { "Device: {marker.device}" }
                    div { "Sensor: {marker.sensor}" }
                    div { "Value: {marker.value}" }
                    div { "Time: {marker.stamp}" }
                }
            }
        }
    }
}
