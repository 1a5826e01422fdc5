//! Catalogue of leaf shapes keyed by rank.
//!
//! Database files are JSON objects mapping a textual rank to a list of
//! curves, each given as `x`, `y`, `s` and `r` columns:
//!
//! ```json
//! { "10": [ { "x": [...], "y": [...], "s": [...], "r": [...] } ] }
//! ```
//!
//! Lookup policy: the first curve listed under the rank's key is used. When
//! the rank is absent, the curve under the fallback key (by default
//! [`DEFAULT_FALLBACK_KEY`]) is used instead; when that is absent too the
//! lookup fails with [`MaizeError::MissingLeafShape`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PlantConfig;
use crate::curve::LeafShapeCurve;
use crate::error::{MaizeError, MaizeResult};
use crate::leaf_shape::LeafShapeParams;
use crate::types::{Rank, ntop};

/// Key used when a rank has no entry of its own.
pub const DEFAULT_FALLBACK_KEY: &str = "10";

/// Leaf shapes keyed by textual rank, with an optional fallback key.
#[derive(Clone, Debug, Default)]
pub struct LeafShapeDb {
    entries: BTreeMap<String, Vec<Arc<LeafShapeCurve>>>,
    fallback: Option<String>,
}

impl LeafShapeDb {
    /// Wraps raw entries, falling back on [`DEFAULT_FALLBACK_KEY`].
    pub fn new(entries: BTreeMap<String, Vec<LeafShapeCurve>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, curves)| (k, curves.into_iter().map(Arc::new).collect()))
            .collect();
        Self {
            entries,
            fallback: Some(DEFAULT_FALLBACK_KEY.to_owned()),
        }
    }

    /// One explicit shape per rank and no fallback: every rank must be listed.
    pub fn from_shapes(shapes: BTreeMap<Rank, LeafShapeCurve>) -> Self {
        let entries = shapes
            .into_iter()
            .map(|(rank, curve)| (rank.to_string(), vec![Arc::new(curve)]))
            .collect();
        Self {
            entries,
            fallback: None,
        }
    }

    /// Replaces the fallback key; `None` disables the fallback.
    pub fn with_fallback(mut self, key: Option<&str>) -> Self {
        self.fallback = key.map(str::to_owned);
        self
    }

    /// Loads a database file.
    pub fn load(path: impl AsRef<Path>) -> MaizeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let db = Self::from_json_str(&text)?;
        info!(path = %path.display(), keys = db.len(), "loaded leaf shape database");
        Ok(db)
    }

    pub fn from_json_str(text: &str) -> MaizeResult<Self> {
        let entries: BTreeMap<String, Vec<LeafShapeCurve>> = serde_json::from_str(text)?;
        Ok(Self::new(entries))
    }

    /// Generates one parametric leaf per rank of the configured plant.
    ///
    /// Basal width and position of the maximum width follow the allometric
    /// coefficients of `config` (`w0_int + w0_slp * ntop`,
    /// `lm_int + lm_slp * ntop`); the remaining shape parameters come from
    /// `params`. Falls back on [`DEFAULT_FALLBACK_KEY`] like a loaded file.
    pub fn parametric(
        config: &PlantConfig,
        params: &LeafShapeParams,
        nb_segment: usize,
    ) -> MaizeResult<Self> {
        let max_rank = config.phytomer;
        let mut entries = BTreeMap::new();
        for rank in 1..=max_rank {
            let top = ntop(rank, max_rank);
            let shape = LeafShapeParams {
                w0: config.w0_at(top),
                lm: config.lm_at(top),
                ..*params
            };
            entries.insert(rank.to_string(), vec![shape.generate(nb_segment)?]);
        }
        debug!(ranks = max_rank, nb_segment, "generated parametric leaf shapes");
        Ok(Self::new(entries))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// First curve listed under `key`.
    pub fn get(&self, key: &str) -> Option<&Arc<LeafShapeCurve>> {
        self.entries.get(key).and_then(|curves| curves.first())
    }

    /// Shape of `rank`, applying the fallback policy.
    pub fn shape_for(&self, rank: Rank) -> MaizeResult<Arc<LeafShapeCurve>> {
        if let Some(curve) = self.get(&rank.to_string()) {
            return Ok(Arc::clone(curve));
        }
        let fallback = self
            .fallback
            .as_deref()
            .and_then(|key| self.get(key).map(|curve| (key, curve)));
        match fallback {
            Some((key, curve)) => {
                debug!(rank, fallback = key, "leaf shape taken from fallback entry");
                Ok(Arc::clone(curve))
            }
            None => Err(MaizeError::MissingLeafShape { rank }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn straight(width: f64) -> LeafShapeCurve {
        LeafShapeCurve::new(
            vec![DVec2::ZERO, DVec2::new(0.0, 1.0)],
            vec![0.0, 1.0],
            vec![width, width],
        )
        .unwrap()
    }

    #[test]
    fn json_database_uses_first_curve_and_fallback() {
        let json = r#"{
            "10": [ {"x":[0,0],"y":[0,1],"s":[0,1],"r":[1,0]},
                    {"x":[0,1],"y":[0,0],"s":[0,1],"r":[0.5,0]} ],
            "3":  [ {"x":[0,0],"y":[0,1],"s":[0,1],"r":[0.2,0]} ]
        }"#;
        let db = LeafShapeDb::from_json_str(json).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.fallback(), Some("10"));

        assert_eq!(db.shape_for(3).unwrap().r()[0], 0.2);
        // rank 7 is missing: first curve of "10"
        assert_eq!(db.shape_for(7).unwrap().r()[0], 1.0);
    }

    #[test]
    fn fallback_shares_the_same_curve() {
        let mut entries = BTreeMap::new();
        entries.insert("10".to_owned(), vec![straight(0.8)]);
        let db = LeafShapeDb::new(entries);
        let a = db.shape_for(1).unwrap();
        let b = db.shape_for(2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn missing_rank_without_fallback_fails() {
        let mut shapes = BTreeMap::new();
        shapes.insert(1, straight(1.0));
        let db = LeafShapeDb::from_shapes(shapes);
        assert!(db.shape_for(1).is_ok());
        assert!(matches!(
            db.shape_for(2),
            Err(MaizeError::MissingLeafShape { rank: 2 })
        ));
    }

    #[test]
    fn fallback_key_absent_fails() {
        let mut entries = BTreeMap::new();
        entries.insert("4".to_owned(), vec![straight(1.0)]);
        let db = LeafShapeDb::new(entries).with_fallback(Some("12"));
        assert!(matches!(
            db.shape_for(5),
            Err(MaizeError::MissingLeafShape { rank: 5 })
        ));
    }

    #[test]
    fn empty_entry_counts_as_missing() {
        let mut entries = BTreeMap::new();
        entries.insert("2".to_owned(), Vec::new());
        let db = LeafShapeDb::new(entries);
        assert!(db.shape_for(2).is_err());
    }

    #[test]
    fn parametric_covers_every_rank() {
        let cfg = PlantConfig {
            phytomer: 12,
            ..PlantConfig::default()
        };
        let db = LeafShapeDb::parametric(&cfg, &LeafShapeParams::default(), 25).unwrap();
        assert_eq!(db.len(), 12);
        for rank in 1..=12 {
            assert_eq!(db.shape_for(rank).unwrap().len(), 25);
        }
        // rank 1 is the 12th from the top: w0 = 0.5 + 0.01 * 12
        assert!((db.shape_for(1).unwrap().r()[0] - 0.62).abs() < 1e-9);
    }

    #[test]
    fn malformed_database_is_an_error() {
        assert!(matches!(
            LeafShapeDb::from_json_str(r#"{"1": [{"x":[0],"y":[0,1],"s":[0],"r":[0]}]}"#),
            Err(MaizeError::Json(_))
        ));
    }

    #[test]
    fn single_point_curve_is_rejected_on_load() {
        let err = LeafShapeDb::from_json_str(r#"{"10": [{"x":[0],"y":[0],"s":[0],"r":[1]}]}"#)
            .unwrap_err();
        assert!(matches!(err, MaizeError::Json(_)));
        assert!(err.to_string().contains("at least 2 points"), "{err}");
    }
}
