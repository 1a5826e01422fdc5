use std::sync::Arc;

use serde::Serialize;

use crate::allometry::{BladeDimension, StemDimension};
use crate::curve::LeafShapeCurve;
use crate::error::{MaizeError, MaizeResult};
use crate::types::Rank;

/// One phytomer (leaf + internode) of a plant table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhytomerRecord {
    pub leaf_rank: Rank,
    /// Position counted from the top of the plant.
    pub ntop: Rank,
    pub leaf_area: f64,
    /// Blade length (visible and unrolled in an interpolated table).
    pub leaf_length: f64,
    pub leaf_width_max: f64,
    pub form_factor: f64,
    pub leaf_shape: Arc<LeafShapeCurve>,
    pub internode_length: f64,
    pub internode_diam_base: f64,
    pub internode_diam_top: f64,
    /// Azimuth of the leaf (deg).
    pub leaf_azimuth: f64,
    /// Insertion height of the leaf.
    pub h_ins: f64,
    /// Diameter of the sheath or stem at the top of the phytomer.
    pub w_sheath: f64,
    /// Growth state, present only in tables interpolated at a stage.
    pub development: Option<Development>,
}

/// Partial growth of a phytomer at a decimal leaf stage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Development {
    /// Stage the table was interpolated at.
    pub stage: f64,
    /// Emerged blade length, rolled part included.
    pub blade_visible: f64,
    /// Part of the emerged blade still rolled in the whorl.
    pub blade_rolled: f64,
    /// Emerged internode length.
    pub internode_visible: f64,
    /// Grown length still hidden in the sheaths of older leaves. Negative
    /// while the visible blade runs ahead of the phytomer's growth.
    pub hidden_length: f64,
    /// Ligule of this leaf has appeared.
    pub collared: bool,
}

impl PhytomerRecord {
    /// Mature record from matching blade and stem rows.
    pub fn from_dimensions(
        blade: &BladeDimension,
        stem: &StemDimension,
        leaf_shape: Arc<LeafShapeCurve>,
        leaf_azimuth: f64,
    ) -> Self {
        Self {
            leaf_rank: blade.rank,
            ntop: blade.ntop,
            leaf_area: blade.area,
            leaf_length: blade.length,
            leaf_width_max: blade.width,
            form_factor: blade.form_factor,
            leaf_shape,
            internode_length: stem.internode_length,
            internode_diam_base: stem.diam_base,
            internode_diam_top: stem.diam_top,
            leaf_azimuth,
            h_ins: stem.h_ins,
            w_sheath: stem.w_sheath,
            development: None,
        }
    }
}

/// Pairs blade and stem rows by rank, in rank order.
///
/// Both tables must describe the same contiguous ranks `1..=n`; otherwise
/// the join fails with [`MaizeError::RankMismatch`].
pub fn join_by_rank<'a>(
    blades: &'a [BladeDimension],
    stems: &'a [StemDimension],
) -> MaizeResult<Vec<(&'a BladeDimension, &'a StemDimension)>> {
    let mut blades: Vec<&BladeDimension> = blades.iter().collect();
    let mut stems: Vec<&StemDimension> = stems.iter().collect();
    blades.sort_by_key(|b| b.rank);
    stems.sort_by_key(|s| s.rank);

    let blade_ranks: Vec<Rank> = blades.iter().map(|b| b.rank).collect();
    let stem_ranks: Vec<Rank> = stems.iter().map(|s| s.rank).collect();
    let contiguous = blade_ranks.iter().zip(1..).all(|(&r, expected)| r == expected);
    if blade_ranks != stem_ranks || !contiguous {
        return Err(MaizeError::RankMismatch {
            blades: blade_ranks,
            stems: stem_ranks,
        });
    }

    Ok(blades.into_iter().zip(stems).collect())
}
