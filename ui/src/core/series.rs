//! Response envelope and series preparation for plotting.

use std::cmp::Ordering;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

use crate::core::format;

/// One measurement row as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    pub timestamp: String,
    pub value: f64,
    /// Sub-sensor label; one device can report several (e.g. `bme280` and
    /// `sht31d` on the same node).
    pub device_name: String,
}

/// Top-level response wrapper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metric: String,
    /// Device id → readings. Wire order matters for legend ordering, so this
    /// is kept as a pair list instead of a map type that would re-sort keys.
    #[serde(default, deserialize_with = "ordered_device_map")]
    pub data: Vec<(String, Vec<Reading>)>,
}

fn ordered_device_map<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<Reading>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<(String, Vec<Reading>)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of device ids to reading arrays")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Vec<Reading>>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor)
}

/// A plottable point: parsed timestamp plus the raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub epoch_ms: f64,
    pub value: f64,
    pub stamp: OffsetDateTime,
}

/// One drawn line: every reading of a (device, sub-sensor) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub device: String,
    pub sensor: String,
    pub points: Vec<Point>,
}

impl Series {
    /// Legend and tooltip label, `"esp32-1 - bme280"` style.
    pub fn label(&self) -> String {
        format!("{} - {}", self.device, self.sensor)
    }

    /// Palette key. Matches the historical `deviceId-deviceName` form so
    /// colors stay stable for existing dashboards.
    pub fn color_key(&self) -> String {
        format!("{}-{}", self.device, self.sensor)
    }
}

/// All series of one response, in drawing order: devices in wire order,
/// sub-sensors in first-seen order within each device.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    pub metric: String,
    pub series: Vec<Series>,
}

impl SeriesSet {
    /// Flatten the envelope into drawable series.
    ///
    /// Readings with unparsable timestamps are dropped. Points within each
    /// series are sorted by timestamp before line construction; the feed is
    /// supposed to arrive sorted, but out-of-order rows would otherwise draw
    /// zig-zag lines.
    pub fn from_response(response: &GraphResponse) -> Self {
        let mut series: Vec<Series> = Vec::new();
        for (device, readings) in &response.data {
            for reading in readings {
                let Some(stamp) = format::parse_timestamp(&reading.timestamp) else {
                    continue;
                };
                let point = Point {
                    epoch_ms: format::epoch_ms(stamp),
                    value: reading.value,
                    stamp,
                };
                match series
                    .iter_mut()
                    .find(|s| s.device == *device && s.sensor == reading.device_name)
                {
                    Some(existing) => existing.points.push(point),
                    None => series.push(Series {
                        device: device.clone(),
                        sensor: reading.device_name.clone(),
                        points: vec![point],
                    }),
                }
            }
        }
        for entry in &mut series {
            entry
                .points
                .sort_by(|a, b| a.epoch_ms.partial_cmp(&b.epoch_ms).unwrap_or(Ordering::Equal));
        }
        Self {
            metric: response.metric.clone(),
            series,
        }
    }

    /// True when nothing is drawable (no devices, empty series, or every
    /// timestamp failed to parse).
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// `[min, max]` epoch milliseconds across all points.
    pub fn time_extent(&self) -> Option<(f64, f64)> {
        extent(self.all_points().map(|p| p.epoch_ms))
    }

    /// `[min, max]` value across all points.
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        extent(self.all_points().map(|p| p.value))
    }

    fn all_points(&self) -> impl Iterator<Item = &Point> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for value in values {
        bounds = Some(match bounds {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }
    bounds
}
