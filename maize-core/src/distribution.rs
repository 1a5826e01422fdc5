//! Distribution of plant-level totals over phytomer ranks.
//!
//! - [`bell_shaped_area`] spreads the total leaf area along a skewed bell curve.
//! - [`geometric_spacing`] spreads a height along a geometric series of internodes.

use crate::error::{MaizeError, MaizeResult, require_finite, require_positive};

/// Leaf area of each rank along a skewed bell-shaped profile.
///
/// The profile peaks near relative rank `rmax`; `skew` is the relative
/// area at the extremities (smaller = narrower bell). The returned values
/// sum to `plant_area`.
///
/// ### Parameters
/// - `plant_area` - Total leaf area to distribute.
/// - `nb_phy` - Number of phytomers (must be > 0).
/// - `rmax` - Relative rank of the largest leaf (must be > 0).
/// - `skew` - Shape parameter (must be > 0).
///
/// ### Returns
/// One area per rank, bottom to top.
pub fn bell_shaped_area(
    plant_area: f64,
    nb_phy: usize,
    rmax: f64,
    skew: f64,
) -> MaizeResult<Vec<f64>> {
    require_finite("plant_area", plant_area)?;
    require_positive("rmax", rmax)?;
    require_positive("skew", skew)?;
    if nb_phy == 0 {
        return Err(MaizeError::invalid("phytomer", 0.0, "must be at least 1"));
    }

    let k = -skew.ln() * rmax;
    let n = nb_phy as f64;
    let weights: Vec<f64> = (1..=nb_phy)
        .map(|i| {
            let d = i as f64 / n - rmax;
            (-k / rmax * (2.0 * d * d + d * d * d)).exp()
        })
        .collect();

    let total: f64 = weights.iter().sum();
    Ok(weights.into_iter().map(|w| w / total * plant_area).collect())
}

/// Internode lengths following a geometric series that sums to `total_height`.
///
/// With `ratio == 1` every internode has the same length. An empty group
/// (`nb_phy == 0`) yields an empty vector.
pub fn geometric_spacing(total_height: f64, nb_phy: usize, ratio: f64) -> MaizeResult<Vec<f64>> {
    require_finite("total_height", total_height)?;
    require_positive("ratio", ratio)?;
    if nb_phy == 0 {
        return Ok(Vec::new());
    }

    let n = nb_phy as f64;
    if ratio == 1.0 {
        return Ok(vec![total_height / n; nb_phy]);
    }

    let u0 = total_height * (1.0 - ratio) / (1.0 - ratio.powi(nb_phy as i32));
    Ok((0..nb_phy).map(|i| u0 * ratio.powi(i as i32)).collect())
}
