//! Random contiguous day-range sampling.
//!
//! Not deterministic unless the caller seeds the RNG. Kept apart from the
//! simulators, which are always deterministic.

use rand::Rng;

use crate::error::SimError;

/// Pick a random contiguous slice of at least `min_range` prices.
///
/// The start is drawn from `[0, len - 1 - min_range]` and the exclusive end
/// from `[start + min_range, len - 1]`, so the final price is never included.
/// Requires `1 <= min_range < prices.len()`.
pub fn random_day_range<'a, R: Rng + ?Sized>(
    prices: &'a [f64],
    min_range: usize,
    rng: &mut R,
) -> Result<&'a [f64], SimError> {
    if min_range == 0 {
        return Err(SimError::invalid("min_range must be >= 1"));
    }
    if min_range >= prices.len() {
        return Err(SimError::invalid(format!(
            "min_range {min_range} needs at least {} prices, got {}",
            min_range + 1,
            prices.len()
        )));
    }

    let last = prices.len() - 1;
    let start = rng.gen_range(0..=last - min_range);
    let end = rng.gen_range(start + min_range..=last);
    Ok(&prices[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn slice_respects_min_range() {
        let prices: Vec<f64> = (0..50).map(f64::from).collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let slice = random_day_range(&prices, 10, &mut rng).unwrap();
            assert!(slice.len() >= 10);
            assert!(slice.len() <= 49);
        }
    }

    #[test]
    fn tightest_range_is_fully_determined() {
        let prices = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut rng = StdRng::seed_from_u64(1);
        let slice = random_day_range(&prices, 4, &mut rng).unwrap();
        assert_eq!(slice, &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let prices: Vec<f64> = (0..100).map(f64::from).collect();
        let a = random_day_range(&prices, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = random_day_range(&prices, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_bounds() {
        let prices = [1.0, 2.0, 3.0];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_day_range(&prices, 0, &mut rng).is_err());
        assert!(random_day_range(&prices, 3, &mut rng).is_err());
        assert!(random_day_range(&[], 1, &mut rng).is_err());
    }
}
