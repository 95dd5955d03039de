use rand::Rng;

use crate::models::SensorStatus;

/// Fraction of the range at each end that classifies as `warning`.
const WARNING_BAND: f64 = 0.1;

/// Probability of a spontaneous fault on a reading that is otherwise normal.
const FAULT_RATE: f64 = 0.05;

/// Draw a uniform reading in `[min, max]`, rounded to one decimal place.
/// The result is clamped back into the range in case rounding pushed it
/// past a bound that isn't itself a one-decimal value.
pub fn random_value<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let raw = rng.gen_range(min..=max);
    ((raw * 10.0).round() / 10.0).clamp(min, max)
}

/// Classify a reading. Values in the bottom or top 10% of the range are
/// `warning`; values exactly on a band boundary are normal. Normal readings
/// degrade to `error` when the independently drawn `fault_roll` (uniform in
/// `[0, 1)`) lands under the fault rate.
pub fn classify(value: f64, min: f64, max: f64, fault_roll: f64) -> SensorStatus {
    let range = max - min;
    let lower = min + range * WARNING_BAND;
    let upper = max - range * WARNING_BAND;

    if value < lower || value > upper {
        SensorStatus::Warning
    } else if fault_roll < FAULT_RATE {
        SensorStatus::Error
    } else {
        SensorStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_values_stay_in_bounds_at_one_decimal() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let value = random_value(&mut rng, 1.8, 3.2);
            assert!((1.8..=3.2).contains(&value), "out of bounds: {value}");
            let tenths = value * 10.0;
            assert!(
                (tenths - tenths.round()).abs() < 1e-9,
                "more than one decimal: {value}"
            );
        }
    }

    #[test]
    fn test_values_respect_awkward_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let value = random_value(&mut rng, 0.02, 0.06);
            assert!((0.02..=0.06).contains(&value), "out of bounds: {value}");
        }
    }

    #[test]
    fn test_band_edges_classify_as_warning() {
        // Range 0..100: bands at 10 and 90
        assert_eq!(classify(5.0, 0.0, 100.0, 1.0), SensorStatus::Warning);
        assert_eq!(classify(9.9, 0.0, 100.0, 1.0), SensorStatus::Warning);
        assert_eq!(classify(95.0, 0.0, 100.0, 1.0), SensorStatus::Warning);
        assert_eq!(classify(0.0, 0.0, 100.0, 1.0), SensorStatus::Warning);
        assert_eq!(classify(100.0, 0.0, 100.0, 1.0), SensorStatus::Warning);
    }

    #[test]
    fn test_band_boundary_counts_as_normal() {
        assert_eq!(classify(10.0, 0.0, 100.0, 1.0), SensorStatus::Success);
        assert_eq!(classify(90.0, 0.0, 100.0, 1.0), SensorStatus::Success);
    }

    #[test]
    fn test_middle_band_faults_on_low_roll_only() {
        assert_eq!(classify(50.0, 0.0, 100.0, 0.01), SensorStatus::Error);
        assert_eq!(classify(50.0, 0.0, 100.0, 0.05), SensorStatus::Success);
        assert_eq!(classify(50.0, 0.0, 100.0, 0.9), SensorStatus::Success);
        // Warning takes precedence over the fault roll
        assert_eq!(classify(5.0, 0.0, 100.0, 0.01), SensorStatus::Warning);
    }

    #[test]
    fn test_fault_rate_is_roughly_five_percent() {
        let mut rng = StdRng::seed_from_u64(1234);
        let trials = 10_000;
        let errors = (0..trials)
            .filter(|_| classify(50.0, 0.0, 100.0, rng.gen()) == SensorStatus::Error)
            .count();

        let rate = errors as f64 / trials as f64;
        assert!(
            (0.035..=0.065).contains(&rate),
            "observed fault rate {rate} outside 5% ± 1.5%"
        );
    }
}
