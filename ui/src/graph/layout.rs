//! Pure chart geometry: series set + measured width in, drawable values out.
//!
//! The layout is recomputed from scratch on every render with the measured
//! container width, so there is no module-scope layout state to fall out of
//! sync on resize.

use crate::core::format;
use crate::core::metric;
use crate::core::palette;
use crate::core::scale::{LinearScale, TimeScale};
use crate::core::series::SeriesSet;

pub const MARGIN_TOP: f64 = 20.0;
pub const MARGIN_RIGHT: f64 = 80.0;
pub const MARGIN_BOTTOM: f64 = 50.0;
pub const MARGIN_LEFT: f64 = 60.0;

/// Overall SVG height; the width follows the container.
pub const OUTER_HEIGHT: f64 = 500.0;

const MIN_INNER_WIDTH: f64 = 120.0;
const X_TICK_COUNT: usize = 6;
const Y_TICK_COUNT: usize = 10;

pub const LEGEND_ROW_HEIGHT: f64 = 20.0;
pub const LEGEND_SWATCH: f64 = 12.0;

/// One axis tick: pixel offset along its axis plus the printed label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub offset: f64,
    pub label: String,
}

/// One circle, carrying everything the tooltip wants to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub device: String,
    pub sensor: String,
    pub value: f64,
    pub stamp: String,
}

/// One drawn line plus its markers.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    pub label: String,
    pub color: &'static str,
    pub path: String,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotLayout {
    pub inner_width: f64,
    pub inner_height: f64,
    pub y_label: String,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub series: Vec<SeriesPath>,
    pub legend: Vec<LegendEntry>,
}

impl PlotLayout {
    /// Lay out a series set inside a container of `outer_width` CSS pixels.
    /// Returns None when there is nothing to draw.
    pub fn compute(set: &SeriesSet, outer_width: f64) -> Option<Self> {
        let (t0, t1) = set.time_extent()?;
        let (v0, v1) = set.value_extent()?;

        let inner_width = (outer_width - MARGIN_LEFT - MARGIN_RIGHT).max(MIN_INNER_WIDTH);
        let inner_height = OUTER_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        let x = TimeScale::new((t0, t1), (0.0, inner_width));
        let y = LinearScale::new((v0, v1), (inner_height, 0.0)).nice(Y_TICK_COUNT);

        let x_ticks = x
            .ticks(X_TICK_COUNT)
            .into_iter()
            .map(|epoch_ms| Tick {
                offset: x.scale(epoch_ms),
                label: format::tick_label(epoch_ms),
            })
            .collect();

        let y_ticks = y
            .ticks(Y_TICK_COUNT)
            .into_iter()
            .map(|value| Tick {
                offset: y.scale(value),
                label: trim_tick_number(value),
            })
            .collect();

        let series: Vec<SeriesPath> = set
            .series
            .iter()
            .map(|entry| {
                let color = palette::color_for(&entry.color_key());
                let markers: Vec<Marker> = entry
                    .points
                    .iter()
                    .map(|point| Marker {
                        x: x.scale(point.epoch_ms),
                        y: y.scale(point.value),
                        device: entry.device.clone(),
                        sensor: entry.sensor.clone(),
                        value: point.value,
                        stamp: format::tooltip_stamp(point.stamp),
                    })
                    .collect();
                SeriesPath {
                    label: entry.label(),
                    color,
                    path: path_data(&markers),
                    markers,
                }
            })
            .collect();

        let legend = series
            .iter()
            .map(|entry| LegendEntry {
                label: entry.label.clone(),
                color: entry.color,
            })
            .collect();

        Some(Self {
            inner_width,
            inner_height,
            y_label: metric::metric_label(&set.metric).to_string(),
            x_ticks,
            y_ticks,
            series,
            legend,
        })
    }

    pub fn outer_width(&self) -> f64 {
        self.inner_width + MARGIN_LEFT + MARGIN_RIGHT
    }

    pub fn outer_height(&self) -> f64 {
        OUTER_HEIGHT
    }
}

/// SVG path for a straight-segment polyline through the marker positions.
fn path_data(markers: &[Marker]) -> String {
    let mut path = String::new();
    for (index, marker) in markers.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        path.push(command);
        path.push_str(&format!("{:.2},{:.2}", marker.x, marker.y));
    }
    path
}

/// Tick labels drop trailing zeros so `21.00` prints as `21` but `21.50`
/// keeps its half as `21.5`.
fn trim_tick_number(value: f64) -> String {
    let printed = format!("{value:.2}");
    let trimmed = printed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::{GraphResponse, Reading};

    fn reading(timestamp: &str, value: f64, sensor: &str) -> Reading {
        Reading {
            timestamp: timestamp.to_string(),
            value,
            device_name: sensor.to_string(),
        }
    }

    fn set_of(data: Vec<(String, Vec<Reading>)>) -> SeriesSet {
        SeriesSet::from_response(&GraphResponse {
            success: true,
            error: None,
            metric: "temperature".to_string(),
            data,
        })
    }

    #[test]
    fn empty_set_produces_no_layout() {
        assert!(PlotLayout::compute(&set_of(Vec::new()), 900.0).is_none());
    }

    #[test]
    fn single_reading_scenario() {
        let set = set_of(vec![(
            "esp32-1".to_string(),
            vec![reading("2024-01-01T12:00:00Z", 21.5, "bme280")],
        )]);
        let layout = PlotLayout::compute(&set, 900.0).unwrap();

        assert_eq!(layout.series.len(), 1);
        assert_eq!(layout.series[0].label, "esp32-1 - bme280");
        assert_eq!(layout.series[0].markers.len(), 1);
        assert_eq!(layout.y_label, "Temperature (°C)");
        assert_eq!(layout.legend.len(), 1);

        // Degenerate one-point domains center the marker on both axes.
        let marker = &layout.series[0].markers[0];
        assert_eq!(marker.x, layout.inner_width / 2.0);
        assert_eq!(marker.y, layout.inner_height / 2.0);
        assert_eq!(marker.value, 21.5);
    }

    #[test]
    fn legend_lists_each_pair_once_in_first_seen_order() {
        let set = set_of(vec![
            (
                "esp32-1".to_string(),
                vec![
                    reading("2024-01-01T00:00:00Z", 1.0, "bme280"),
                    reading("2024-01-01T01:00:00Z", 2.0, "sht31d"),
                    reading("2024-01-01T02:00:00Z", 3.0, "bme280"),
                ],
            ),
            (
                "esp32-2".to_string(),
                vec![reading("2024-01-01T00:30:00Z", 4.0, "bme280")],
            ),
        ]);
        let layout = PlotLayout::compute(&set, 900.0).unwrap();
        let labels: Vec<&str> = layout.legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["esp32-1 - bme280", "esp32-1 - sht31d", "esp32-2 - bme280"]
        );
    }

    #[test]
    fn series_share_one_color_between_line_and_markers() {
        let set = set_of(vec![(
            "esp32-1".to_string(),
            vec![
                reading("2024-01-01T00:00:00Z", 1.0, "bme280"),
                reading("2024-01-01T01:00:00Z", 2.0, "bme280"),
            ],
        )]);
        let layout = PlotLayout::compute(&set, 900.0).unwrap();
        assert_eq!(layout.series[0].color, layout.legend[0].color);

        let again = PlotLayout::compute(&set, 640.0).unwrap();
        assert_eq!(layout.series[0].color, again.series[0].color);
    }

    #[test]
    fn path_connects_points_in_timestamp_order() {
        let set = set_of(vec![(
            "esp32-1".to_string(),
            vec![
                reading("2024-01-01T02:00:00Z", 3.0, "bme280"),
                reading("2024-01-01T00:00:00Z", 1.0, "bme280"),
            ],
        )]);
        let layout = PlotLayout::compute(&set, 900.0).unwrap();
        let path = &layout.series[0].path;
        assert!(path.starts_with('M'));
        assert_eq!(path.matches('L').count(), 1);
        let markers = &layout.series[0].markers;
        assert!(markers[0].x < markers[1].x);
        assert_eq!(markers[0].value, 1.0);
    }

    #[test]
    fn y_axis_is_inverted_and_niced() {
        let set = set_of(vec![(
            "esp32-1".to_string(),
            vec![
                reading("2024-01-01T00:00:00Z", 0.12, "bme280"),
                reading("2024-01-01T01:00:00Z", 9.88, "bme280"),
            ],
        )]);
        let layout = PlotLayout::compute(&set, 900.0).unwrap();
        let markers = &layout.series[0].markers;
        // Larger value sits higher on screen (smaller y).
        assert!(markers[1].y < markers[0].y);
        // Niced bounds 0 and 10 appear as ticks.
        let labels: Vec<&str> = layout.y_ticks.iter().map(|t| t.label.as_str()).collect();
        assert!(labels.contains(&"0"));
        assert!(labels.contains(&"10"));
    }

    #[test]
    fn x_ticks_span_the_time_extent() {
        let set = set_of(vec![(
            "esp32-1".to_string(),
            vec![
                reading("2024-01-01T00:00:00Z", 1.0, "bme280"),
                reading("2024-01-02T00:00:00Z", 2.0, "bme280"),
            ],
        )]);
        let layout = PlotLayout::compute(&set, 900.0).unwrap();
        assert_eq!(layout.x_ticks.len(), 7);
        assert_eq!(layout.x_ticks.first().unwrap().offset, 0.0);
        assert_eq!(
            layout.x_ticks.last().unwrap().offset,
            layout.inner_width
        );
    }

    #[test]
    fn narrow_containers_keep_a_usable_plot_area() {
        let set = set_of(vec![(
            "esp32-1".to_string(),
            vec![reading("2024-01-01T00:00:00Z", 1.0, "bme280")],
        )]);
        let layout = PlotLayout::compute(&set, 40.0).unwrap();
        assert!(layout.inner_width >= 120.0);
    }

    #[test]
    fn unknown_metric_labels_the_axis_verbatim() {
        let mut response = GraphResponse {
            success: true,
            error: None,
            metric: "soil_moisture".to_string(),
            data: vec![(
                "esp32-1".to_string(),
                vec![reading("2024-01-01T00:00:00Z", 1.0, "probe")],
            )],
        };
        let layout =
            PlotLayout::compute(&SeriesSet::from_response(&response), 900.0).unwrap();
        assert_eq!(layout.y_label, "soil_moisture");
        response.metric = "humidity".to_string();
        let layout =
            PlotLayout::compute(&SeriesSet::from_response(&response), 900.0).unwrap();
        assert_eq!(layout.y_label, "Humidity (%)");
    }

    #[test]
    fn tick_numbers_trim_trailing_zeros() {
        assert_eq!(trim_tick_number(21.0), "21");
        assert_eq!(trim_tick_number(21.5), "21.5");
        assert_eq!(trim_tick_number(0.0), "0");
        assert_eq!(trim_tick_number(-3.25), "-3.25");
    }
}
