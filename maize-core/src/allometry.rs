//! Allometric conversion of leaf areas and internode spacings into organ
//! dimensions.
//!
//! Ranks are derived from `ntop` (position from the top), so the blade and
//! stem tables can be joined independently of the order they were built in.

use serde::Serialize;

use crate::error::{MaizeError, MaizeResult, require_positive};
use crate::leaf_shape::relative_area;
use crate::types::Rank;

/// Dimensions of one leaf blade.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BladeDimension {
    pub rank: Rank,
    pub ntop: Rank,
    /// Blade length.
    pub length: f64,
    /// Maximum blade width.
    pub width: f64,
    /// Blade area.
    pub area: f64,
    pub form_factor: f64,
}

/// Dimensions of one internode and its sheath.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StemDimension {
    pub rank: Rank,
    pub ntop: Rank,
    pub internode_length: f64,
    /// Diameter at the internode base (top diameter of the rank below).
    pub diam_base: f64,
    /// Diameter at the internode top.
    pub diam_top: f64,
    /// Sheath diameter at the top of the phytomer.
    pub w_sheath: f64,
    /// Height of the leaf insertion: cumulated internode lengths.
    pub h_ins: f64,
}

fn check_len(column: &'static str, expected: usize, actual: usize) -> MaizeResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MaizeError::ColumnLength {
            column,
            expected,
            actual,
        })
    }
}

fn ranks_from_ntop(ntop: &[Rank]) -> Vec<Rank> {
    let top = ntop.iter().copied().max().unwrap_or(0);
    ntop.iter().map(|&n| top - n + 1).collect()
}

/// Blade length of each rank from its area and position in the canopy.
///
/// The width/length ratio `wl`, the basal width `w0` and the position of
/// the maximum width `lm` vary linearly with `ntop`; the length follows
/// from `area = form_factor(w0, lm) * length * wl * length`.
#[allow(clippy::too_many_arguments)]
pub fn blade_length(
    area: &[f64],
    ntop: &[Rank],
    wl_int: f64,
    wl_slp: f64,
    w0_int: f64,
    w0_slp: f64,
    lm_int: f64,
    lm_slp: f64,
) -> MaizeResult<Vec<f64>> {
    check_len("ntop", area.len(), ntop.len())?;
    area.iter()
        .zip(ntop)
        .map(|(&a, &n)| {
            let n = f64::from(n);
            let wl = wl_int + wl_slp * n;
            require_positive("wl", wl)?;
            let ff = relative_area(w0_int + w0_slp * n, lm_int + lm_slp * n, 1.0)?;
            Ok((a / ff / wl).sqrt())
        })
        .collect()
}

/// Blade table: width follows from area, length and form factor.
pub fn blade_dimension(
    area: &[f64],
    form_factor: &[f64],
    ntop: &[Rank],
    length: &[f64],
) -> MaizeResult<Vec<BladeDimension>> {
    let n = area.len();
    check_len("form_factor", n, form_factor.len())?;
    check_len("ntop", n, ntop.len())?;
    check_len("length", n, length.len())?;

    let ranks = ranks_from_ntop(ntop);
    (0..n)
        .map(|i| {
            require_positive("form_factor", form_factor[i])?;
            require_positive("length", length[i])?;
            Ok(BladeDimension {
                rank: ranks[i],
                ntop: ntop[i],
                length: length[i],
                width: area[i] / length[i] / form_factor[i],
                area: area[i],
                form_factor: form_factor[i],
            })
        })
        .collect()
}

/// Stem table: insertion heights accumulate internode lengths from the base.
pub fn stem_dimension(
    internode: &[f64],
    diameter: &[f64],
    ntop: &[Rank],
) -> MaizeResult<Vec<StemDimension>> {
    let n = internode.len();
    check_len("diameter", n, diameter.len())?;
    check_len("ntop", n, ntop.len())?;

    let ranks = ranks_from_ntop(ntop);
    let mut h_ins = 0.0;
    let rows = (0..n)
        .map(|i| {
            h_ins += internode[i];
            StemDimension {
                rank: ranks[i],
                ntop: ntop[i],
                internode_length: internode[i],
                diam_base: if i == 0 { diameter[0] } else { diameter[i - 1] },
                diam_top: diameter[i],
                w_sheath: diameter[i],
                h_ins,
            }
        })
        .collect();
    Ok(rows)
}
