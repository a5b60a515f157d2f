use dioxus::prelude::*;

use crate::core::platform;
use crate::graph::GraphPanel;

#[component]
pub fn Graphs() -> Element {
    let devices = use_hook(platform::device_catalog);

    rsx! {
        section { class: "page page-graphs",
            h1 { "Sensor Graphs" }
            p {
                "Query historical measurements by date range, metric, and device, then hover the markers for exact readings."
            }

            GraphPanel { devices }
        }
    }
}
