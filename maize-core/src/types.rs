/// Rank of a phytomer, counted from the plant base (1 = lowest).
///
/// Ranks are contiguous within a plant table; `ntop` (the same position
/// counted from the top) is derived from the highest rank.
pub type Rank = u32;

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
///
/// `n == 1` yields `[start]`, `n == 0` an empty vector.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Clamps `v` into [0, 1]; NaN maps to 0.
#[inline]
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Position of `rank` counted from the top of a plant whose highest rank is `max_rank`.
#[inline]
pub fn ntop(rank: Rank, max_rank: Rank) -> Rank {
    max_rank - rank + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(2.5, 1.0, 4);
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], 2.5);
        assert_eq!(v[3], 1.0);
        assert!((v[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 1.0, 1), vec![3.0]);
    }

    #[test]
    fn clamp01_handles_nan_and_bounds() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(-2.0), 0.0);
        assert_eq!(clamp01(2.0), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
    }

    #[test]
    fn ntop_counts_from_the_top() {
        assert_eq!(ntop(16, 16), 1);
        assert_eq!(ntop(1, 16), 16);
    }
}
