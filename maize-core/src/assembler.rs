//! Assembly of a full plant table from global parameters.
//!
//! The pipeline of [`assemble`] is:
//! 1. split phytomers into a pseudostem group (young, short internodes)
//!    and a stem group;
//! 2. [`bell_shaped_area`] - leaf area per rank;
//! 3. [`geometric_spacing`] - internode lengths, per group;
//! 4. stem diameters: constant along the pseudostem, then tapering;
//! 5. leaf shapes from a [`LeafShapeDb`];
//! 6. [`blade_length`], [`blade_dimension`] and [`stem_dimension`];
//! 7. [`join_by_rank`] plus azimuths from [`leaf_azimuth`];
//! 8. [`interpolate`] when a stage is configured.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::allometry::{blade_dimension, blade_length, stem_dimension};
use crate::azimuth::leaf_azimuth;
use crate::config::PlantConfig;
use crate::curve::{LeafShapeCurve, form_factor};
use crate::distribution::{bell_shaped_area, geometric_spacing};
use crate::error::MaizeResult;
use crate::leaf_db::LeafShapeDb;
use crate::phytomer::{PhytomerRecord, join_by_rank};
use crate::stage::interpolate;
use crate::types::{Rank, linspace, ntop};

/// Number of phytomers in the pseudostem group (Lejeune & Bernier).
///
/// ### Parameters
/// - `phytomer` - Total number of phytomers.
///
/// ### Returns
/// A count in `0..=phytomer`.
pub fn young_phytomers(phytomer: Rank) -> usize {
    let n = ((f64::from(phytomer) - 1.95) / 1.84 / 1.3).round_ties_even();
    n.clamp(0.0, f64::from(phytomer)) as usize
}

/// Builds the table of a plant described by `config`.
///
/// Leaf shapes come from `leaves`; azimuth jitter is drawn from `rng`. The
/// mature table is returned unless `config.stage` is set, in which case the
/// table interpolated at that stage is returned.
///
/// ### Errors
/// - [`crate::MaizeError::InvalidParameter`] for parameters outside their domain.
/// - [`crate::MaizeError::MissingLeafShape`] when `leaves` has no shape for a rank.
pub fn assemble(
    config: &PlantConfig,
    leaves: &LeafShapeDb,
    rng: &mut impl Rng,
) -> MaizeResult<Vec<PhytomerRecord>> {
    config.validate()?;

    let phytomer = config.phytomer;
    let n = phytomer as usize;
    let ranks: Vec<Rank> = (1..=phytomer).collect();
    let ntops: Vec<Rank> = ranks.iter().map(|&r| ntop(r, phytomer)).collect();

    let nb_young = young_phytomers(phytomer);
    debug!(phytomer, nb_young, "pseudostem / stem partition");

    let leaf_area = bell_shaped_area(config.plant_area, n, config.rmax, config.skew)?;

    let (pseudostem_height, stem_height) = if nb_young == 0 {
        (0.0, config.plant_height)
    } else {
        (config.pseudostem_height, config.plant_height - config.pseudostem_height)
    };
    let mut internode = geometric_spacing(pseudostem_height, nb_young, config.pseudostem_dist)?;
    internode.extend(geometric_spacing(stem_height, n - nb_young, config.stem_dist)?);

    let mut diameter = vec![config.diam_base; nb_young];
    diameter.extend(linspace(config.diam_base, config.diam_top, n - nb_young));

    let shapes: Vec<Arc<LeafShapeCurve>> = ranks
        .iter()
        .map(|&rank| leaves.shape_for(rank))
        .collect::<MaizeResult<_>>()?;
    let ff: Vec<f64> = shapes.iter().map(|s| form_factor(s)).collect();

    let length = blade_length(
        &leaf_area,
        &ntops,
        config.wl_int,
        config.wl_slp,
        config.w0_int,
        config.w0_slp,
        config.lm_int,
        config.lm_slp,
    )?;
    let blades = blade_dimension(&leaf_area, &ff, &ntops, &length)?;
    let stems = stem_dimension(&internode, &diameter, &ntops)?;

    let azimuths = leaf_azimuth(
        n,
        config.phyllotactic_angle,
        config.phyllotactic_deviation,
        config.plant_orientation,
        config.spiral,
        rng,
    )?;

    let mature: Vec<PhytomerRecord> = join_by_rank(&blades, &stems)?
        .into_iter()
        .zip(shapes)
        .zip(azimuths)
        .map(|(((blade, stem), shape), azimuth)| {
            PhytomerRecord::from_dimensions(blade, stem, shape, azimuth)
        })
        .collect();

    info!(
        phytomer,
        seeded = config.seed.is_some(),
        stage = ?config.stage,
        "assembled plant"
    );

    Ok(match config.stage {
        Some(stage) => interpolate(&mature, Some(stage)),
        None => mature,
    })
}

/// [`assemble`] with the random source built from `config.seed`.
pub fn assemble_seeded(config: &PlantConfig, leaves: &LeafShapeDb) -> MaizeResult<Vec<PhytomerRecord>> {
    let mut rng = config.rng();
    assemble(config, leaves, &mut rng)
}
