use rand::Rng;

use crate::error::{MaizeError, MaizeResult, require_finite};

/// Wraps an angle in degrees into (-180, 180].
#[inline]
pub fn wrap_degrees(a: f64) -> f64 {
    let a = a.rem_euclid(360.0);
    if a > 180.0 { a - 360.0 } else { a }
}

/// Generates the azimuth of `count` successive leaves.
///
/// In spiral mode leaf `i` is offset by `i * phyllotactic_angle`; otherwise
/// offsets alternate between 0 and `phyllotactic_angle` (distichous maize).
/// Every offset receives one uniform jitter in
/// `[-phyllotactic_deviation, +phyllotactic_deviation]`, drawn in leaf order.
///
/// A single leaf gets `plant_orientation` as is, unwrapped and without
/// consuming randomness.
///
/// ### Parameters
/// - `count` - Number of leaves.
/// - `phyllotactic_angle` - Angle between successive (spiral) or opposite (alternating) leaves (deg).
/// - `phyllotactic_deviation` - Half-amplitude of the jitter (deg, >= 0).
/// - `plant_orientation` - Azimuth of the first leaf (deg, from X+, counter-clockwise).
/// - `spiral` - Spiral or alternating phyllotaxy.
/// - `rng` - Source of the jitter.
///
/// ### Returns
/// Azimuths in degrees, wrapped into (-180, 180] when `count > 1`.
pub fn leaf_azimuth(
    count: usize,
    phyllotactic_angle: f64,
    phyllotactic_deviation: f64,
    plant_orientation: f64,
    spiral: bool,
    rng: &mut impl Rng,
) -> MaizeResult<Vec<f64>> {
    require_finite("phyllotactic_angle", phyllotactic_angle)?;
    require_finite("plant_orientation", plant_orientation)?;
    if !(phyllotactic_deviation.is_finite() && phyllotactic_deviation >= 0.0) {
        return Err(MaizeError::invalid(
            "phyllotactic_deviation",
            phyllotactic_deviation,
            "must be finite and >= 0",
        ));
    }

    match count {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![plant_orientation]),
        _ => {}
    }

    let azimuths = (0..count)
        .map(|i| {
            let main = if spiral {
                i as f64 * phyllotactic_angle
            } else if i % 2 == 0 {
                0.0
            } else {
                phyllotactic_angle
            };
            let jitter = rng.random_range(-phyllotactic_deviation..=phyllotactic_deviation);
            wrap_degrees(plant_orientation + main + jitter)
        })
        .collect();
    Ok(azimuths)
}
