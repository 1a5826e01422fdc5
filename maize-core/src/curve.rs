//! Leaf shape curves and the numerical helpers that operate on them.
//!
//! A [`LeafShapeCurve`] pairs a midrib polyline with a relative width
//! profile. Both are parameterised by the same stations: point `i` of the
//! midrib lies at relative arclength `s[i]`, where the blade is `r[i]` times
//! its maximum width wide.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{MaizeError, MaizeResult};
use crate::types::clamp01;

/// Midrib and width profile of a leaf blade, normalised to unit length and width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveColumns", into = "CurveColumns")]
pub struct LeafShapeCurve {
    midrib: Vec<DVec2>,
    s: Vec<f64>,
    r: Vec<f64>,
}

/// Column layout used by leaf-shape database files.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CurveColumns {
    x: Vec<f64>,
    y: Vec<f64>,
    s: Vec<f64>,
    r: Vec<f64>,
}

impl TryFrom<CurveColumns> for LeafShapeCurve {
    type Error = MaizeError;

    fn try_from(c: CurveColumns) -> MaizeResult<Self> {
        Self::from_columns(&c.x, &c.y, c.s, c.r)
    }
}

impl From<LeafShapeCurve> for CurveColumns {
    fn from(curve: LeafShapeCurve) -> Self {
        Self {
            x: curve.x(),
            y: curve.y(),
            s: curve.s,
            r: curve.r,
        }
    }
}

impl LeafShapeCurve {
    /// Builds a curve from parallel point and width columns.
    ///
    /// Fails with [`MaizeError::CurveLength`] when the midrib and width
    /// columns disagree in length.
    pub fn new(midrib: Vec<DVec2>, s: Vec<f64>, r: Vec<f64>) -> MaizeResult<Self> {
        if midrib.len() != s.len() {
            return Err(MaizeError::CurveLength {
                left: midrib.len(),
                right: s.len(),
            });
        }
        if s.len() != r.len() {
            return Err(MaizeError::CurveLength {
                left: s.len(),
                right: r.len(),
            });
        }
        Ok(Self { midrib, s, r })
    }

    /// Builds a curve from separate `x` and `y` coordinate columns.
    ///
    /// Used when loading database entries, so a curve needs at least two
    /// points to describe a blade.
    pub fn from_columns(x: &[f64], y: &[f64], s: Vec<f64>, r: Vec<f64>) -> MaizeResult<Self> {
        if x.len() != y.len() {
            return Err(MaizeError::CurveLength {
                left: x.len(),
                right: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(MaizeError::TooFewPoints {
                min: 2,
                actual: x.len(),
            });
        }
        let midrib = x.iter().zip(y).map(|(&x, &y)| DVec2::new(x, y)).collect();
        Self::new(midrib, s, r)
    }

    /// A curve with no points: the shape of a leaf that has not emerged.
    pub fn empty() -> Self {
        Self {
            midrib: Vec::new(),
            s: Vec::new(),
            r: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.midrib.len()
    }

    pub fn is_empty(&self) -> bool {
        self.midrib.is_empty()
    }

    pub fn midrib(&self) -> &[DVec2] {
        &self.midrib
    }

    pub fn s(&self) -> &[f64] {
        &self.s
    }

    pub fn r(&self) -> &[f64] {
        &self.r
    }

    pub fn x(&self) -> Vec<f64> {
        self.midrib.iter().map(|p| p.x).collect()
    }

    pub fn y(&self) -> Vec<f64> {
        self.midrib.iter().map(|p| p.y).collect()
    }

    /// Total length of the midrib polyline.
    pub fn midrib_length(&self) -> f64 {
        polyline_length(&self.midrib)
    }

    /// Relative width at relative arclength `at`, linearly interpolated.
    ///
    /// Returns 0 for an empty curve.
    pub fn width_at(&self, at: f64) -> f64 {
        interp(&self.s, &self.r, at).unwrap_or(0.0)
    }
}

/// Length of a polyline.
pub fn polyline_length(points: &[DVec2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Cumulative arclength at every vertex, starting at 0.
fn cumulative_lengths(points: &[DVec2]) -> Vec<f64> {
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(points.len());
    out.push(0.0);
    for w in points.windows(2) {
        acc += w[0].distance(w[1]);
        out.push(acc);
    }
    out
}

/// Index of the segment `[xs[i], xs[i+1]]` containing `at`, with the local parameter.
///
/// `xs` must be non-decreasing with at least two values; `at` is clamped to its range.
fn locate(xs: &[f64], at: f64) -> (usize, f64) {
    let last = xs.len() - 1;
    if at <= xs[0] {
        return (0, 0.0);
    }
    if at >= xs[last] {
        return (last - 1, 1.0);
    }
    // first index whose value is > at
    let hi = xs.partition_point(|&v| v <= at);
    let i = hi.saturating_sub(1).min(last - 1);
    let span = xs[i + 1] - xs[i];
    let t = if span > 1e-12 { (at - xs[i]) / span } else { 0.0 };
    (i, t)
}

/// Piecewise-linear interpolation of `(xs, ys)` at `at`, clamped to the end values.
fn interp(xs: &[f64], ys: &[f64], at: f64) -> Option<f64> {
    match xs.len() {
        0 => None,
        1 => Some(ys[0]),
        _ => {
            let (i, t) = locate(xs, at);
            Some(ys[i] + (ys[i + 1] - ys[i]) * t)
        }
    }
}

/// Point on a polyline at arclength `arc`, given its cumulative lengths.
fn point_at_arc(points: &[DVec2], cumulative: &[f64], arc: f64) -> DVec2 {
    if points.len() == 1 {
        return points[0];
    }
    let (i, t) = locate(cumulative, arc);
    points[i].lerp(points[i + 1], t)
}

/// Aligns a midrib `(x, y)` and a width profile `(s, r)` on `nb_points`
/// shared stations, evenly spaced in relative midrib arclength.
///
/// The midrib is rescaled to unit length; widths are interpolated at the
/// same relative positions.
///
/// ### Parameters
/// - `x`, `y` - Midrib coordinates (any number of points >= 2).
/// - `s`, `r` - Width profile: relative position and relative width.
/// - `nb_points` - Number of stations in the result (>= 2).
pub fn resample_curves(
    x: &[f64],
    y: &[f64],
    s: &[f64],
    r: &[f64],
    nb_points: usize,
) -> MaizeResult<LeafShapeCurve> {
    if x.len() != y.len() {
        return Err(MaizeError::CurveLength {
            left: x.len(),
            right: y.len(),
        });
    }
    if s.len() != r.len() {
        return Err(MaizeError::CurveLength {
            left: s.len(),
            right: r.len(),
        });
    }
    for actual in [x.len(), s.len(), nb_points] {
        if actual < 2 {
            return Err(MaizeError::TooFewPoints { min: 2, actual });
        }
    }

    let points: Vec<DVec2> = x.iter().zip(y).map(|(&x, &y)| DVec2::new(x, y)).collect();
    let cumulative = cumulative_lengths(&points);
    let total = cumulative[cumulative.len() - 1];
    if total <= 0.0 {
        return Err(MaizeError::DegenerateMidrib);
    }
    let origin = points[0];

    let stations: Vec<f64> = (0..nb_points)
        .map(|i| i as f64 / (nb_points - 1) as f64)
        .collect();
    let midrib = stations
        .iter()
        .map(|&u| (point_at_arc(&points, &cumulative, u * total) - origin) / total)
        .collect();
    let widths = stations
        .iter()
        .map(|&u| interp(s, r, u).unwrap_or(0.0))
        .collect();

    LeafShapeCurve::new(midrib, stations, widths)
}

/// Ratio of blade area to the area of its `length × max width` rectangle.
///
/// Trapezoidal integral of the relative width over relative arclength.
pub fn form_factor(curve: &LeafShapeCurve) -> f64 {
    curve
        .s
        .windows(2)
        .zip(curve.r.windows(2))
        .map(|(s, r)| (s[1] - s[0]) * (r[0] + r[1]) / 2.0)
        .sum()
}

/// Relative width of the blade at the base of its emerged `fraction`.
///
/// A leaf emerges tip first, so the emerged part starts at relative
/// arclength `1 - fraction`.
pub fn base_width_at(curve: &LeafShapeCurve, fraction: f64) -> f64 {
    clamp01(curve.width_at(1.0 - clamp01(fraction)))
}

/// The emerged (distal) `fraction` of a leaf as a new, normalised curve.
///
/// The kept part spans relative arclength `[1 - fraction, 1]` of the input.
/// Its midrib is moved back to the origin and rescaled to unit length and
/// its stations are remapped onto `[0, 1]`; relative widths are kept as
/// they are, so they still refer to the mature maximum width. The input
/// curve is left untouched.
pub fn truncate_leaf(curve: &LeafShapeCurve, fraction: f64) -> LeafShapeCurve {
    if fraction >= 1.0 {
        return curve.clone();
    }
    if fraction.is_nan() || fraction <= 0.0 || curve.len() < 2 {
        return LeafShapeCurve::empty();
    }

    let n = curve.len();
    let start = 1.0 - fraction;
    let cumulative = cumulative_lengths(&curve.midrib);
    let total = cumulative[n - 1];
    if total <= 0.0 {
        return LeafShapeCurve::empty();
    }

    let mut s = Vec::with_capacity(n);
    let mut r = Vec::with_capacity(n);
    let mut midrib = Vec::with_capacity(n);
    for i in 0..n {
        let u = start + fraction * i as f64 / (n - 1) as f64;
        midrib.push(point_at_arc(&curve.midrib, &cumulative, u * total));
        s.push(i as f64 / (n - 1) as f64);
        r.push(curve.width_at(u));
    }

    let origin = midrib[0];
    let length = polyline_length(&midrib);
    let scale = if length > 0.0 { 1.0 / length } else { 1.0 };
    for p in &mut midrib {
        *p = (*p - origin) * scale;
    }

    LeafShapeCurve { midrib, s, r }
}
