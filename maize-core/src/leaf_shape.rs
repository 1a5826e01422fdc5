//! Parametric maize leaf shapes.
//!
//! A leaf is described by two independent profiles, each made of two
//! sections joined at a transition point:
//!
//! - the midrib ([`midrib_curve`]): the blade declination grows slowly up to
//!   relative position `l`, then bends sharply towards the tip;
//! - the width ([`width_profile`]): two parabolas joined at `lm`, where the
//!   blade reaches its maximum width.
//!
//! [`generate_leaf`] combines both into a [`LeafShapeCurve`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::curve::{LeafShapeCurve, polyline_length, resample_curves};
use crate::error::{MaizeError, MaizeResult, require_finite, require_open_unit};
use crate::types::linspace;

/// Resolution cap of the curvature integration.
pub const MAX_INTEGRATION_SEGMENTS: usize = 100;

/// Share of the insertion-to-tip angle reached at the midrib transition.
const FRAC_AT_TRANSITION: f64 = 2.0 / 3.0;
/// Curvature coefficient of the basal midrib section.
const CURV_BASAL: f64 = -0.2;
/// Curvature coefficient of the distal midrib section.
const CURV_DISTAL: f64 = 5.0;
/// Asymptote of the tip angle sigmoid (degrees).
const TIP_ANGLE_MAX: f64 = 240.0;
const TIP_ANGLE_SLOPE: f64 = 0.02;

/// Inputs of [`generate_leaf`] besides the resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafShapeParams {
    /// Declination of the blade at its insertion, from the vertical (deg).
    pub insertion_angle: f64,
    /// Relative midrib position of the curvature transition.
    pub pos_l: f64,
    /// Insertion angle at which the tip angle sigmoid inflects (deg).
    pub infl: f64,
    /// Relative width at the blade base.
    pub w0: f64,
    /// Relative position of the maximum width.
    pub lm: f64,
}

impl Default for LeafShapeParams {
    fn default() -> Self {
        Self {
            insertion_angle: 50.0,
            pos_l: 0.5,
            infl: 30.0,
            w0: 0.5,
            lm: 0.5,
        }
    }
}

fn sigmoid(x: f64, max: f64, slope: f64, infl: f64) -> f64 {
    max / (1.0 + (4.0 * slope * (infl - x)).exp())
}

/// `(1 + c) s² / (1 + c s²)`: maps `s ∈ [0, 1]` onto `[0, 1]`, bending
/// early for `c < 0` and late for `c > 0`.
fn curvature(s: f64, c: f64) -> f64 {
    (1.0 + c) * s * s / (1.0 + c * s * s)
}

/// Midrib polyline of a leaf with unit length, starting at the origin.
///
/// Angles are declinations from the vertical (y axis), in degrees. The tip
/// angle follows a sigmoid of the insertion angle (never below it), and the
/// angle at `l` is two thirds of the way from insertion to tip.
///
/// ### Parameters
/// - `nb_segment` - Number of polyline segments (>= 1).
/// - `insertion_angle` - Declination at the base (deg).
/// - `l` - Relative arclength of the transition, strictly inside (0, 1).
/// - `infl` - Inflexion of the tip angle sigmoid (deg).
///
/// ### Returns
/// `nb_segment + 1` points whose polyline length is 1.
pub fn midrib_curve(
    nb_segment: usize,
    insertion_angle: f64,
    l: f64,
    infl: f64,
) -> MaizeResult<Vec<DVec2>> {
    if nb_segment == 0 {
        return Err(MaizeError::invalid("nb_segment", 0.0, "must be at least 1"));
    }
    require_open_unit("pos_l", l)?;
    require_finite("insertion_angle", insertion_angle)?;
    require_finite("infl", infl)?;

    let tip_angle = insertion_angle.max(sigmoid(insertion_angle, TIP_ANGLE_MAX, TIP_ANGLE_SLOPE, infl));
    let l_angle = insertion_angle + FRAC_AT_TRANSITION * (tip_angle - insertion_angle);

    let n = nb_segment as f64;
    let step = 1.0 / n;
    let mut points = Vec::with_capacity(nb_segment + 1);
    let mut p = DVec2::ZERO;
    points.push(p);
    for j in 0..nb_segment {
        let t = j as f64 / n;
        let angle = if t <= l {
            insertion_angle + curvature(t / l, CURV_BASAL) * (l_angle - insertion_angle)
        } else {
            l_angle + curvature((t - l) / (1.0 - l), CURV_DISTAL) * (tip_angle - l_angle)
        };
        let (sin, cos) = angle.to_radians().sin_cos();
        p += DVec2::new(sin, cos) * step;
        points.push(p);
    }

    let length = polyline_length(&points);
    Ok(points.into_iter().map(|p| p / length).collect())
}

/// Coefficients `(a, b, c)` of the basal and distal width parabolas.
fn width_coefficients(w0: f64, lm: f64) -> ([f64; 3], [f64; 3]) {
    let c0 = (w0 - 1.0) / (lm * lm);
    let b0 = -2.0 * c0 * lm;
    let c1 = -1.0 / ((1.0 - lm) * (1.0 - lm));
    let b1 = -2.0 * c1 * lm;
    let a1 = -b1 - c1;
    ([w0, b0, c0], [a1, b1, c1])
}

fn validate_width(w0: f64, lm: f64) -> MaizeResult<()> {
    require_open_unit("lm", lm)?;
    if !(0.0..=1.0).contains(&w0) {
        return Err(MaizeError::invalid("w0", w0, "must lie inside [0, 1]"));
    }
    Ok(())
}

/// Relative width profile of a blade.
///
/// Two parabolas: `w0` at the base rising to 1 at `lm` with zero slope,
/// then falling to 0 at the tip.
pub fn width_profile(nb_segment: usize, w0: f64, lm: f64) -> MaizeResult<(Vec<f64>, Vec<f64>)> {
    validate_width(w0, lm)?;
    let ([a0, b0, c0], [a1, b1, c1]) = width_coefficients(w0, lm);
    let s = linspace(0.0, 1.0, nb_segment + 1);
    let r = s
        .iter()
        .map(|&s| {
            if s <= lm {
                a0 + b0 * s + c0 * s * s
            } else {
                a1 + b1 * s + c1 * s * s
            }
        })
        .collect();
    Ok((s, r))
}

/// Closed-form integral of the width profile from 0 to `upto`.
///
/// `relative_area(w0, lm, 1.0)` is the form factor of a parametric blade.
pub fn relative_area(w0: f64, lm: f64, upto: f64) -> MaizeResult<f64> {
    validate_width(w0, lm)?;
    let ([a0, b0, c0], [a1, b1, c1]) = width_coefficients(w0, lm);
    let prim = |a: f64, b: f64, c: f64, x: f64| a * x + b / 2.0 * x * x + c / 3.0 * x * x * x;
    let upto = upto.clamp(0.0, 1.0);
    Ok(if upto <= lm {
        prim(a0, b0, c0, upto)
    } else {
        prim(a0, b0, c0, lm) + prim(a1, b1, c1, upto) - prim(a1, b1, c1, lm)
    })
}

/// Generates a leaf shape with `nb_segment` stations.
///
/// The profiles are integrated with at most [`MAX_INTEGRATION_SEGMENTS`]
/// segments, then resampled onto `nb_segment` shared stations.
pub fn generate_leaf(
    nb_segment: usize,
    insertion_angle: f64,
    pos_l: f64,
    infl: f64,
    w0: f64,
    lm: f64,
) -> MaizeResult<LeafShapeCurve> {
    let nseg = nb_segment.min(MAX_INTEGRATION_SEGMENTS);
    let midrib = midrib_curve(nseg, insertion_angle, pos_l, infl)?;
    let (s, r) = width_profile(nseg, w0, lm)?;
    let x: Vec<f64> = midrib.iter().map(|p| p.x).collect();
    let y: Vec<f64> = midrib.iter().map(|p| p.y).collect();
    resample_curves(&x, &y, &s, &r, nb_segment)
}

impl LeafShapeParams {
    /// [`generate_leaf`] with these parameters.
    pub fn generate(&self, nb_segment: usize) -> MaizeResult<LeafShapeCurve> {
        generate_leaf(nb_segment, self.insertion_angle, self.pos_l, self.infl, self.w0, self.lm)
    }
}
