//! Metric keys and their presentation strings.

/// Metric keys offered in the selector, paired with the display name used
/// for the `<option>` label.
pub const METRIC_OPTIONS: &[(&str, &str)] = &[
    ("temperature", "Temperature"),
    ("humidity", "Humidity"),
    ("pressure", "Pressure"),
    ("battery", "Battery Voltage"),
    ("wifi_dbm", "WiFi Signal"),
    ("free_heap_bytes", "Free Heap"),
];

pub const DEFAULT_METRIC: &str = "temperature";

/// Human-readable axis label for a metric key. Unknown keys pass through
/// verbatim so the axis still names whatever the server aggregated.
pub fn metric_label(metric: &str) -> &str {
    match metric {
        "temperature" => "Temperature (°C)",
        "humidity" => "Humidity (%)",
        "pressure" => "Pressure (hPa)",
        "battery" => "Battery Voltage (V)",
        "wifi_dbm" => "WiFi Signal (dBm)",
        "free_heap_bytes" => "Free Heap (bytes)",
        other => other,
    }
}
