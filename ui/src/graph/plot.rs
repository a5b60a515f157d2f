//! SVG rendering of a computed layout.

use dioxus::prelude::*;

use crate::core::series::SeriesSet;
use crate::graph::layout::{
    LegendEntry, Marker, PlotLayout, LEGEND_ROW_HEIGHT, LEGEND_SWATCH, MARGIN_BOTTOM, MARGIN_LEFT,
    MARGIN_TOP,
};
use crate::graph::tooltip::{Hover, Tooltip};

/// Width assumed until the container reports its real size on mount.
const DEFAULT_OUTER_WIDTH: f64 = 960.0;

/// The chart proper: axes, one polyline plus markers per series, legend,
/// and the hover tooltip.
///
/// Geometry is recomputed on every render from the measured container
/// width, so a window resize only has to poke the width signal.
#[component]
pub fn Plot(set: SeriesSet) -> Element {
    let mut width = use_signal(|| DEFAULT_OUTER_WIDTH);
    let hover = use_signal(Hover::default);

    let Some(layout) = PlotLayout::compute(&set, width()) else {
        return rsx! {
            div { id: "chart", class: "chart" }
        };
    };

    let y_title_x = -(layout.inner_height / 2.0);
    let y_title_y = -MARGIN_LEFT + 14.0;
    let x_title_x = layout.inner_width / 2.0;
    let x_title_y = layout.inner_height + MARGIN_BOTTOM - 10.0;

    rsx! {
        div {
            id: "chart",
            class: "chart",
            onmounted: move |evt| async move {
                if let Ok(rect) = evt.data().get_client_rect().await {
                    width.set(rect.size.width);
                }
            },
            onresize: move |evt| {
                if let Ok(size) = evt.data().get_content_box_size() {
                    width.set(size.width);
                }
            },

            svg {
                width: "{layout.outer_width()}",
                height: "{layout.outer_height()}",
                g { transform: "translate({MARGIN_LEFT},{MARGIN_TOP})",

                    g {
                        class: "axis axis--x",
                        transform: "translate(0,{layout.inner_height})",
                        line {
                            class: "axis__domain",
                            x1: "0",
                            y1: "0",
                            x2: "{layout.inner_width}",
                            y2: "0",
                        }
                        for tick in layout.x_ticks.iter() {
                            g { transform: "translate({tick.offset},0)",
                                line { class: "axis__tick", y1: "0", y2: "6" }
                                text {
                                    class: "axis__label",
                                    y: "20",
                                    text_anchor: "middle",
                                    "{tick.label}"
                                }
                            }
                        }
                    }

                    g { class: "axis axis--y",
                        line {
                            class: "axis__domain",
                            x1: "0",
                            y1: "0",
                            x2: "0",
                            y2: "{layout.inner_height}",
                        }
                        for tick in layout.y_ticks.iter() {
                            g { transform: "translate(0,{tick.offset})",
                                line { class: "axis__tick", x1: "-6", x2: "0" }
                                text {
                                    class: "axis__label",
                                    x: "-9",
                                    y: "3",
                                    text_anchor: "end",
                                    "{tick.label}"
                                }
                            }
                        }
                    }

                    text {
                        class: "axis__title",
                        transform: "rotate(-90)",
                        x: "{y_title_x}",
                        y: "{y_title_y}",
                        text_anchor: "middle",
                        "{layout.y_label}"
                    }
                    text {
                        class: "axis__title",
                        x: "{x_title_x}",
                        y: "{x_title_y}",
                        text_anchor: "middle",
                        "Time"
                    }

                    for series in layout.series.iter() {
                        path {
                            class: "line",
                            d: "{series.path}",
                            fill: "none",
                            stroke: "{series.color}",
                        }
                    }

                    for series in layout.series.iter() {
                        for marker in series.markers.iter() {
                            {marker_circle(marker.clone(), series.color, hover)}
                        }
                    }

                    g { class: "legend", transform: "translate(10,0)",
                        for (row, entry) in layout.legend.iter().enumerate() {
                            {legend_row(row, entry)}
                        }
                    }
                }
            }

            Tooltip { hover: hover() }
        }
    }
}

fn marker_circle(marker: Marker, color: &'static str, mut hover: Signal<Hover>) -> Element {
    let tip = marker.clone();
    rsx! {
        circle {
            class: "dot",
            cx: "{marker.x}",
            cy: "{marker.y}",
            r: "2",
            fill: "{color}",
            onmouseenter: move |evt: Event<MouseData>| {
                let point = evt.client_coordinates();
                hover.set(Hover::Shown {
                    marker: tip.clone(),
                    x: point.x,
                    y: point.y,
                });
            },
            onmouseleave: move |_| hover.set(Hover::None),
        }
    }
}

fn legend_row(row: usize, entry: &LegendEntry) -> Element {
    let y = row as f64 * LEGEND_ROW_HEIGHT;
    let text_y = y + LEGEND_SWATCH / 2.0 + 4.0;
    rsx! {
        rect {
            x: "0",
            y: "{y}",
            width: "{LEGEND_SWATCH}",
            height: "{LEGEND_SWATCH}",
            fill: "{entry.color}",
        }
        text { class: "legend__label", x: "16", y: "{text_y}", "{entry.label}" }
    }
}
