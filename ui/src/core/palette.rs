//! Ordinal series palette with stable key-to-color assignment.

/// The classic ten-color categorical palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Color for a series key such as `"esp32-1-bme280"`.
///
/// The same key always maps to the same palette slot, within one render and
/// across renders. Distinct keys may collide once more than ten are in play;
/// the palette simply cycles.
pub fn color_for(key: &str) -> &'static str {
    CATEGORY10[(fnv1a(key) % CATEGORY10.len() as u64) as usize]
}

// 64-bit FNV-1a. Stable across platforms, unlike the std hasher.
fn fnv1a(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in input.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_color() {
        assert_eq!(color_for("esp32-1-bme280"), color_for("esp32-1-bme280"));
    }

    #[test]
    fn colors_come_from_the_palette() {
        for key in ["a", "esp32-1-bme280", "greenhouse-sht31d", ""] {
            assert!(CATEGORY10.contains(&color_for(key)));
        }
    }

    #[test]
    fn keys_spread_over_more_than_one_slot() {
        let distinct: std::collections::HashSet<_> = (0..50)
            .map(|i| color_for(&format!("device-{i}-sensor")))
            .collect();
        assert!(distinct.len() > 1);
    }
}
