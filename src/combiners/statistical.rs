//! Statistical combiners: `AverageF64`

use super::CombineFn;
use crate::RFBound;

/* ===================== AverageF64 ===================== */

/// Mean of values per key as `f64`, via a `(sum, count)` accumulator.
///
/// - `create_acc(v) = (v, 1)`
/// - `merge_value((s, c), v) = (s + v, c + 1)`
/// - `merge_acc((s1, c1), (s2, c2)) = (s1 + s2, c1 + c2)`
/// - `finish((s, c)) = s / c`
///
/// A key only exists once a value produced it, so `c >= 1` at `finish`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AverageF64;

impl<V> CombineFn<V, (f64, u64), f64> for AverageF64
where
    V: RFBound + Into<f64>,
{
    fn create_acc(&self, v: V) -> (f64, u64) {
        (v.into(), 1)
    }

    fn merge_value(&self, acc: (f64, u64), v: V) -> (f64, u64) {
        (acc.0 + v.into(), acc.1 + 1)
    }

    fn merge_acc(&self, a: (f64, u64), b: (f64, u64)) -> (f64, u64) {
        (a.0 + b.0, a.1 + b.1)
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: (f64, u64)) -> f64 {
        acc.0 / acc.1 as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combiners::check_combiner_laws;

    #[test]
    fn average_obeys_laws_on_exact_values() {
        // Quarters add exactly in binary floating point.
        check_combiner_laws(&AverageF64, &[15.0f64, 3.0, 0.25, 7.5, 1.75]);
    }

    #[test]
    fn average_of_trip_totals() {
        let acc = AverageF64.merge_value(AverageF64.create_acc(15.0f64), 3.0f64);
        assert_eq!(acc, (18.0, 2));
        assert!((CombineFn::<f64, _, _>::finish(&AverageF64, acc) - 9.0).abs() < f64::EPSILON);
    }
}
