//! Band scale
//!
//! Splits a continuous range into `n` equal bands separated by padding, the
//! same arithmetic as d3's `scaleBand` with equal inner and outer padding and
//! centered alignment:
//!
//! ```text
//! step      = span / max(1, n - padding + 2 * padding)
//! start     = r0 + (span - step * (n - padding)) / 2
//! bandwidth = step * (1 - padding)
//! band(i)   = start + step * i
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandScale {
    len: usize,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Create a scale for `len` bands over `[r0, r1]`
    ///
    /// `padding` is clamped to `[0, 1]`.
    pub fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let (r0, r1) = range;
        let span = r1 - r0;
        let n = len as f64;

        let step = span / (n + padding).max(1.0);
        let start = r0 + (span - step * (n - padding)) / 2.0;

        Self {
            len,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Start coordinate of band `i`, `None` when out of the domain
    pub fn position(&self, i: usize) -> Option<f64> {
        (i < self.len).then(|| self.start + self.step * i as f64)
    }

    /// Center coordinate of band `i`
    pub fn center(&self, i: usize) -> Option<f64> {
        self.position(i).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_matches_band_arithmetic() {
        // Four bands across [150, 1140] with 0.2 padding
        let scale = BandScale::new(4, (150.0, 1140.0), 0.2);

        let step = 990.0 / 4.2;
        assert!(approx(scale.step(), step));
        assert!(approx(scale.bandwidth(), step * 0.8));
        assert!(approx(scale.position(0).unwrap(), 150.0 + step * 0.2));
        assert!(approx(scale.position(3).unwrap(), 150.0 + step * 3.2));
        assert_eq!(scale.position(4), None);
    }

    #[test]
    fn test_bands_stay_inside_range() {
        let scale = BandScale::new(6, (60.0, 820.0), 0.2);

        let first = scale.position(0).unwrap();
        let last = scale.position(5).unwrap() + scale.bandwidth();
        assert!(first > 60.0);
        assert!(last < 820.0);
        assert!(approx(first - 60.0, 820.0 - last));
    }

    #[test]
    fn test_no_padding_fills_range() {
        let scale = BandScale::new(2, (0.0, 100.0), 0.0);

        assert_eq!(scale.position(0), Some(0.0));
        assert_eq!(scale.position(1), Some(50.0));
        assert_eq!(scale.bandwidth(), 50.0);
        assert_eq!(scale.center(1), Some(75.0));
    }

    #[test]
    fn test_empty_domain() {
        let scale = BandScale::new(0, (0.0, 100.0), 0.2);

        assert!(scale.is_empty());
        assert_eq!(scale.position(0), None);
    }
}
