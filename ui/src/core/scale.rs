//! Continuous scales mapping data domains onto pixel ranges.

/// Linear scale in the d3 mold: `domain` in data units, `range` in pixels.
/// An inverted range (`range.0 > range.1`) flips the axis, which is how the
/// Y axis maps larger values to smaller pixel offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Expand the domain outward to multiples of the tick step so the axis
    /// starts and ends on round values.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut d0, mut d1) = self.domain;
        if !(d1 - d0).is_finite() || d0 == d1 || count == 0 {
            return self;
        }
        // A second pass settles the step once the widened domain changes it.
        for _ in 0..2 {
            let step = tick_step(d0, d1, count);
            if step <= 0.0 {
                break;
            }
            d0 = (self.domain.0 / step).floor() * step;
            d1 = (self.domain.1 / step).ceil() * step;
        }
        self.domain = (d0, d1);
        self
    }

    /// Map a domain value onto the range. A degenerate domain (single
    /// distinct value) maps everything to the range midpoint.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round tick values covering the domain, spaced on the 1/2/5 ladder.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if !(d1 - d0).is_finite() || count == 0 {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }
        let step = tick_step(d0, d1, count);
        if step <= 0.0 {
            return vec![d0];
        }
        let first = ((d0 / step) - 1e-6).ceil() as i64;
        let last = ((d1 / step) + 1e-6).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Time scale over epoch milliseconds. Ticks are evenly spaced across the
/// domain rather than snapped to calendar boundaries; labels carry the
/// rounding instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale(LinearScale);

impl TimeScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self(LinearScale::new(domain, range))
    }

    pub fn scale(&self, epoch_ms: f64) -> f64 {
        self.0.scale(epoch_ms)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.0.domain();
        if count == 0 || !(d1 - d0).is_finite() {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }
        let span = d1 - d0;
        (0..=count)
            .map(|i| d0 + span * i as f64 / count as f64)
            .collect()
    }
}

/// Step size whose multiples produce roughly `count` ticks over the span.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 || count == 0 {
        return 0.0;
    }
    let raw = span / count as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let error = raw / magnitude;
    let factor = if error >= 7.071 {
        10.0
    } else if error >= 3.162 {
        5.0
    } else if error >= 1.414 {
        2.0
    } else {
        1.0
    };
    magnitude * factor
}
