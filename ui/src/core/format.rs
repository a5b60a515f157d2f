//! Timestamp parsing and presentation helpers.
//!
//! The backend speaks ISO-8601 (RFC 3339 with a `Z` suffix in practice),
//! the date pickers speak the `datetime-local` minute format, and the axis
//! and tooltip want short local-time strings. Everything converting between
//! those lives here.

use once_cell::sync::Lazy;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Duration, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

// Resolved once: `current_local_offset` is fallible after threads spawn on
// some unix targets, and the offset does not change under us mid-session.
static LOCAL_OFFSET: Lazy<UtcOffset> =
    Lazy::new(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));

pub fn local_offset() -> UtcOffset {
    *LOCAL_OFFSET
}

/// Default filter window: the last 24 hours, as `datetime-local` values.
pub fn default_range() -> (String, String) {
    let now = OffsetDateTime::now_utc().to_offset(local_offset());
    let yesterday = now - Duration::hours(24);
    (format_for_input(yesterday), format_for_input(now))
}

/// Minute-precision `datetime-local` value.
pub fn format_for_input(stamp: OffsetDateTime) -> String {
    stamp
        .format(format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        .unwrap_or_else(|_| String::new())
}

/// Parse a `datetime-local` control value. The control emits minute
/// precision by default and second precision on some user agents; `time`
/// refuses to default missing seconds, so normalize first.
fn parse_input(raw: &str) -> Result<PrimitiveDateTime, String> {
    let normalized = if raw.len() == "2024-01-01T00:00".len() {
        format!("{raw}:00")
    } else {
        raw.to_string()
    };
    PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .map_err(|err| format!("invalid date {raw:?}: {err}"))
}

/// Convert a `datetime-local` value (interpreted in the viewer's timezone)
/// into the ISO-8601 UTC string the backend expects.
pub fn input_to_iso_utc(raw: &str) -> Result<String, String> {
    parse_input(raw)?
        .assume_offset(local_offset())
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|err| err.to_string())
}

/// Parse a reading timestamp; returns None on garbage so a single bad row
/// doesn't sink the whole response.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok().or_else(|| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
        .ok()
        .map(PrimitiveDateTime::assume_utc)
    })
}

/// Axis tick label (`MM/DD HH:MM`, viewer-local time).
pub fn tick_label(epoch_ms: f64) -> String {
    match from_epoch_ms(epoch_ms) {
        Some(stamp) => stamp
            .to_offset(local_offset())
            .format(format_description!("[month]/[day] [hour]:[minute]"))
            .unwrap_or_else(|_| "—".to_string()),
        None => "—".to_string(),
    }
}

/// Tooltip timestamp (viewer-local, second precision).
pub fn tooltip_stamp(stamp: OffsetDateTime) -> String {
    stamp
        .to_offset(local_offset())
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| "—".to_string())
}

pub fn epoch_ms(stamp: OffsetDateTime) -> f64 {
    (stamp.unix_timestamp_nanos() / 1_000_000) as f64
}

pub fn from_epoch_ms(ms: f64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000).ok()
}
