//! Interpolation of a mature plant table at an intermediate developmental stage.
//!
//! Development is driven by a decimal leaf stage (dls) clock derived from
//! the number of ligulated leaves. Leaf emergence (phyllochron) is 1.8 times
//! faster than ligulation before floral transition, and ligulation speeds up
//! by 1/0.7 afterwards (Lejeune & Bernier). For each phytomer four dates on
//! that clock bound its growth:
//!
//! - `tip`: tip of the blade appears;
//! - `start`: the phytomer starts growing, hidden in older sheaths;
//! - `collar`: the ligule appears, the blade is fully out;
//! - `end`: the internode has finished elongating.
//!
//! Visible lengths are linear between those dates. The part of a phytomer
//! that has grown but is neither visible blade nor visible internode is
//! hidden; when the hidden length increases from one phytomer to the next,
//! the blade below is still rolled around the emerging ones.

use std::f64::consts::PI;
use std::sync::Arc;

use tracing::debug;

use crate::curve::{base_width_at, truncate_leaf};
use crate::phytomer::{Development, PhytomerRecord};
use crate::types::clamp01;

const EMERGENCE_RATE: f64 = 1.8;
const POST_TRANSITION_RATE: f64 = 0.7;
const START_FRACTION: f64 = 0.85;
const END_DELAY_VEGETATIVE: f64 = 0.2;
const END_DELAY_REPRODUCTIVE: f64 = 2.0;

/// Number of emerged leaf tips at floral transition for a plant of `max_rank` phytomers.
pub fn floral_transition(max_rank: f64) -> f64 {
    (max_rank - 1.95) / 1.84
}

/// Developmental dates of one phytomer on the dls clock.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Timeline {
    tip: f64,
    start: f64,
    collar: f64,
    end: f64,
}

impl Timeline {
    fn new(rank: f64, tt_transition: f64) -> Self {
        let collar_vegetative = EMERGENCE_RATE * rank;
        let after_transition = POST_TRANSITION_RATE * (collar_vegetative - tt_transition);
        let (collar, end) = if collar_vegetative <= tt_transition {
            (collar_vegetative, collar_vegetative + END_DELAY_VEGETATIVE)
        } else {
            (
                tt_transition + after_transition,
                tt_transition + END_DELAY_REPRODUCTIVE + after_transition,
            )
        };
        Self {
            tip: rank,
            start: START_FRACTION * rank,
            collar,
            end,
        }
    }
}

/// Converts a stage (ligulated leaves) into the dls clock.
fn decimal_leaf_stage(stage: f64, transition: f64) -> f64 {
    if stage <= transition {
        EMERGENCE_RATE * stage
    } else {
        EMERGENCE_RATE * (transition + POST_TRANSITION_RATE * (stage - transition))
    }
}

/// Fraction of the window `[start, end]` elapsed at `t`, in [0, 1].
fn progress(t: f64, start: f64, end: f64) -> f64 {
    if end > start {
        clamp01((t - start) / (end - start))
    } else if t >= end {
        1.0
    } else {
        0.0
    }
}

/// State of a plant at decimal leaf stage `stage`.
///
/// Builds a new table from `mature`, ordered by rank whatever the input
/// order, and leaves `mature` untouched. `None` returns an identical copy.
/// Stages outside `[0, max_rank]` are clamped; at `max_rank` every organ
/// has completed its growth.
///
/// In the returned table:
/// - `leaf_length` is the visible, unrolled blade and `leaf_shape` its
///   truncated curve;
/// - `internode_length` is the visible internode;
/// - `h_ins` accumulates visible internodes and rolled blades;
/// - `w_sheath` is the stem diameter for collared phytomers, otherwise the
///   diameter of the rolled blade wrapped around the stem.
pub fn interpolate(mature: &[PhytomerRecord], stage: Option<f64>) -> Vec<PhytomerRecord> {
    let Some(stage) = stage else {
        return mature.to_vec();
    };
    let Some(max_rank) = mature.iter().map(|p| p.leaf_rank).max() else {
        return Vec::new();
    };

    let mut rows: Vec<&PhytomerRecord> = mature.iter().collect();
    rows.sort_by_key(|p| p.leaf_rank);

    let max_rank = f64::from(max_rank);
    let stage = if stage.is_nan() { 0.0 } else { stage.clamp(0.0, max_rank) };
    let transition = floral_transition(max_rank);
    let tt_transition = EMERGENCE_RATE * transition;

    let timelines: Vec<Timeline> = rows
        .iter()
        .map(|p| Timeline::new(f64::from(p.leaf_rank), tt_transition))
        .collect();

    let dls = if stage >= max_rank {
        timelines.iter().map(|t| t.end).fold(f64::NEG_INFINITY, f64::max)
    } else {
        decimal_leaf_stage(stage, transition)
    };
    debug!(stage, dls, transition, "interpolating plant");

    let blade_visible: Vec<f64> = rows
        .iter()
        .zip(&timelines)
        .map(|(p, t)| p.leaf_length * progress(dls, t.tip, t.collar))
        .collect();
    let internode_visible: Vec<f64> = rows
        .iter()
        .zip(&timelines)
        .map(|(p, t)| p.internode_length * progress(dls, t.collar, t.end))
        .collect();
    let hidden: Vec<f64> = rows
        .iter()
        .zip(&timelines)
        .enumerate()
        .map(|(i, (p, t))| {
            let grown = (p.leaf_length + p.internode_length) * progress(dls, t.start, t.end);
            grown - blade_visible[i] - internode_visible[i]
        })
        .collect();

    // Collared leaves are unrolled; above them a blade stays rolled by the
    // amount the next phytomer's hidden part outgrows its own.
    let n = rows.len();
    let collars = stage.min(max_rank - 1.0).max(0.0) as usize;
    let rolled: Vec<f64> = (0..n)
        .map(|i| {
            if i < collars || i + 1 >= n {
                0.0
            } else {
                (hidden[i + 1] - hidden[i]).max(0.0).min(blade_visible[i])
            }
        })
        .collect();

    let mut h_ins = 0.0;
    rows
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let unrolled = blade_visible[i] - rolled[i];
            let fvis = if p.leaf_length > 0.0 {
                clamp01(unrolled / p.leaf_length)
            } else {
                0.0
            };
            let collared = f64::from(p.leaf_rank) <= stage;
            let w_sheath = if collared {
                p.internode_diam_top
            } else {
                base_width_at(&p.leaf_shape, fvis) * p.leaf_width_max / PI
            };
            h_ins += internode_visible[i] + rolled[i];

            let leaf_shape = if fvis >= 1.0 {
                Arc::clone(&p.leaf_shape)
            } else {
                Arc::new(truncate_leaf(&p.leaf_shape, fvis))
            };

            PhytomerRecord {
                leaf_length: unrolled.clamp(0.0, p.leaf_length),
                leaf_shape,
                internode_length: internode_visible[i],
                h_ins,
                w_sheath,
                development: Some(Development {
                    stage,
                    blade_visible: blade_visible[i],
                    blade_rolled: rolled[i],
                    internode_visible: internode_visible[i],
                    hidden_length: hidden[i],
                    collared,
                }),
                ..p.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::LeafShapeCurve;
    use approx::assert_relative_eq;
    use glam::DVec2;

    fn shape() -> Arc<LeafShapeCurve> {
        let s: Vec<f64> = (0..11).map(|i| f64::from(i) / 10.0).collect();
        let midrib = s.iter().map(|&u| DVec2::new(u, 0.0)).collect();
        let r = s.iter().map(|&u| 1.0 - u * u).collect();
        Arc::new(LeafShapeCurve::new(midrib, s, r).unwrap())
    }

    fn mature_table(n: u32) -> Vec<PhytomerRecord> {
        let shape = shape();
        let mut h = 0.0;
        (1..=n)
            .map(|rank| {
                let internode = 2.0 + f64::from(rank);
                h += internode;
                PhytomerRecord {
                    leaf_rank: rank,
                    ntop: n - rank + 1,
                    leaf_area: 100.0,
                    leaf_length: 30.0 + 4.0 * f64::from(rank),
                    leaf_width_max: 6.0,
                    form_factor: 0.7,
                    leaf_shape: Arc::clone(&shape),
                    internode_length: internode,
                    internode_diam_base: 2.0,
                    internode_diam_top: 2.0,
                    leaf_azimuth: 0.0,
                    h_ins: h,
                    w_sheath: 2.0,
                    development: None,
                }
            })
            .collect()
    }

    #[test]
    fn no_stage_is_identity() {
        let mature = mature_table(16);
        assert_eq!(interpolate(&mature, None), mature);
    }

    #[test]
    fn empty_table_stays_empty() {
        assert!(interpolate(&[], Some(3.0)).is_empty());
    }

    #[test]
    fn stage_zero_shows_nothing() {
        let young = interpolate(&mature_table(16), Some(0.0));
        for p in &young {
            assert_eq!(p.leaf_length, 0.0);
            assert_eq!(p.internode_length, 0.0);
            let dev = p.development.as_ref().unwrap();
            assert_eq!(dev.blade_visible, 0.0);
            assert_eq!(dev.internode_visible, 0.0);
            assert!(p.leaf_shape.is_empty());
        }
    }

    #[test]
    fn final_stage_restores_mature_lengths() {
        let mature = mature_table(16);
        let grown = interpolate(&mature, Some(16.0));
        for (g, m) in grown.iter().zip(&mature) {
            assert_relative_eq!(g.leaf_length, m.leaf_length, max_relative = 1e-9);
            assert_relative_eq!(g.internode_length, m.internode_length, max_relative = 1e-9);
            assert_relative_eq!(g.h_ins, m.h_ins, max_relative = 1e-9);
            assert_eq!(g.w_sheath, m.internode_diam_top);
            assert!(g.development.as_ref().unwrap().collared);
        }
    }

    #[test]
    fn out_of_range_stages_are_clamped() {
        let mature = mature_table(10);
        assert_eq!(interpolate(&mature, Some(-3.0)), interpolate(&mature, Some(0.0)));
        assert_eq!(interpolate(&mature, Some(40.0)), interpolate(&mature, Some(10.0)));
    }

    #[test]
    fn visible_lengths_grow_with_stage() {
        let mature = mature_table(16);
        let mut previous = interpolate(&mature, Some(0.0));
        for k in 1..=64 {
            let stage = f64::from(k) * 0.25;
            let current = interpolate(&mature, Some(stage));
            for (c, p) in current.iter().zip(&previous) {
                let (cd, pd) = (c.development.as_ref().unwrap(), p.development.as_ref().unwrap());
                assert!(cd.blade_visible >= pd.blade_visible, "blade shrank at stage {stage}");
                assert!(
                    cd.internode_visible >= pd.internode_visible,
                    "internode shrank at stage {stage}"
                );
            }
            previous = current;
        }
    }

    #[test]
    fn lengths_stay_within_mature_bounds() {
        let mature = mature_table(16);
        for k in 0..=32 {
            let stage = f64::from(k) * 0.5;
            for (g, m) in interpolate(&mature, Some(stage)).iter().zip(&mature) {
                assert!((0.0..=m.leaf_length).contains(&g.leaf_length));
                assert!((0.0..=m.internode_length).contains(&g.internode_length));
                let dev = g.development.as_ref().unwrap();
                assert!(dev.blade_rolled >= 0.0 && dev.blade_rolled <= dev.blade_visible);
            }
        }
    }

    #[test]
    fn mature_table_is_not_mutated() {
        let mature = mature_table(12);
        let snapshot = mature.clone();
        let _ = interpolate(&mature, Some(5.3));
        assert_eq!(mature, snapshot);
    }

    #[test]
    fn growing_leaves_are_rolled_and_wrapped() {
        let mature = mature_table(16);
        let mid = interpolate(&mature, Some(6.0));

        // collared leaves keep the stem diameter and are not rolled
        for p in mid.iter().filter(|p| p.leaf_rank <= 6) {
            let dev = p.development.as_ref().unwrap();
            assert!(dev.collared);
            assert_eq!(dev.blade_rolled, 0.0);
            assert_eq!(p.w_sheath, p.internode_diam_top);
        }
        // some emerging leaf above is partly rolled
        assert!(mid.iter().any(|p| p.development.as_ref().unwrap().blade_rolled > 0.0));
        // h_ins never decreases
        for w in mid.windows(2) {
            assert!(w[1].h_ins >= w[0].h_ins);
        }
    }

    #[test]
    fn rolled_blade_follows_signed_hidden_lengths() {
        let grown = interpolate(&mature_table(16), Some(7.75));
        // rank 8 is the first leaf without a collar; its blade is out ahead of its growth
        let dev = grown[7].development.as_ref().unwrap();
        let next = grown[8].development.as_ref().unwrap();
        assert!(!dev.collared);
        assert!(dev.hidden_length < 0.0);

        let expected = (next.hidden_length - dev.hidden_length)
            .max(0.0)
            .min(dev.blade_visible);
        assert!(expected > 0.0);
        assert_relative_eq!(dev.blade_rolled, expected, max_relative = 1e-12);
        assert_relative_eq!(
            grown[7].leaf_length,
            dev.blade_visible - expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn emerging_leaf_is_truncated_and_wraps_the_stem() {
        let mature = mature_table(16);
        let grown = interpolate(&mature, Some(6.5));
        let (g, m) = (&grown[6], &mature[6]);
        assert!(!g.development.as_ref().unwrap().collared);

        let fvis = g.leaf_length / m.leaf_length;
        assert!(fvis > 0.0 && fvis < 1.0, "visible fraction {fvis}");
        let base = base_width_at(&m.leaf_shape, fvis);
        assert_relative_eq!(g.w_sheath, base * m.leaf_width_max / PI, max_relative = 1e-12);

        assert!(!g.leaf_shape.is_empty());
        assert!(!Arc::ptr_eq(&g.leaf_shape, &m.leaf_shape));
        assert_relative_eq!(g.leaf_shape.r()[0], base, max_relative = 1e-12);
    }

    #[test]
    fn input_order_does_not_matter() {
        let mature = mature_table(10);
        let mut shuffled = mature.clone();
        shuffled.reverse();
        shuffled.swap(2, 7);
        assert_eq!(interpolate(&shuffled, Some(4.5)), interpolate(&mature, Some(4.5)));
    }

    #[test]
    fn timeline_switches_after_transition() {
        let tt = EMERGENCE_RATE * floral_transition(16.0);
        let early = Timeline::new(2.0, tt);
        assert_relative_eq!(early.collar, 3.6, max_relative = 1e-12);
        assert_relative_eq!(early.end, 3.8, max_relative = 1e-12);
        let late = Timeline::new(12.0, tt);
        assert_relative_eq!(late.collar, tt + 0.7 * (21.6 - tt), max_relative = 1e-12);
        assert_relative_eq!(late.end - late.collar, 2.0, max_relative = 1e-12);
    }

    #[test]
    fn progress_handles_degenerate_windows() {
        assert_eq!(progress(1.0, 2.0, 2.0), 0.0);
        assert_eq!(progress(2.0, 2.0, 2.0), 1.0);
        assert_eq!(progress(3.0, 2.0, 1.0), 1.0);
        assert_eq!(progress(1.5, 1.0, 2.0), 0.5);
    }
}
