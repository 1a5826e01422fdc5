use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{MaizeError, MaizeResult, require_finite, require_positive};

/// Global botanical parameters of a maize plant.
///
/// Every field has a default, so a configuration file only needs to list
/// what differs from a standard 16-phytomer plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Total leaf area of the plant.
    pub plant_area: f64,
    /// Height of the stem.
    pub plant_height: f64,
    /// Height of the highest pseudostem collar.
    pub pseudostem_height: f64,
    /// Number of phytomers.
    pub phytomer: u32,
    /// Relative rank of the largest leaf.
    pub rmax: f64,
    /// Geometric ratio between successive pseudostem internodes.
    pub pseudostem_dist: f64,
    /// Geometric ratio between successive stem internodes.
    pub stem_dist: f64,
    /// Stem diameter at the base.
    pub diam_base: f64,
    /// Stem diameter at the top.
    pub diam_top: f64,
    /// Angle between successive (spiral) or opposite (alternating) leaves (deg).
    pub phyllotactic_angle: f64,
    /// Half-amplitude of the azimuth jitter (deg).
    pub phyllotactic_deviation: f64,
    /// Azimuth of the first leaf (deg, from X+, counter-clockwise).
    pub plant_orientation: f64,
    /// Spiral rather than alternating phyllotaxy.
    pub spiral: bool,
    /// Relative area of the extreme leaves in the bell-shaped distribution.
    pub skew: f64,
    /// Width/length ratio: intercept and slope against `ntop`.
    pub wl_int: f64,
    pub wl_slp: f64,
    /// Relative basal width: intercept and slope against `ntop`.
    pub w0_int: f64,
    pub w0_slp: f64,
    /// Relative position of the maximum width: intercept and slope against `ntop`.
    pub lm_int: f64,
    pub lm_slp: f64,
    /// Seed of the azimuth jitter. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Decimal leaf stage (number of ligulated leaves) to interpolate at.
    pub stage: Option<f64>,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            plant_area: 10000.0,
            plant_height: 200.0,
            pseudostem_height: 20.0,
            phytomer: 16,
            rmax: 0.67,
            pseudostem_dist: 1.4,
            stem_dist: 1.0,
            diam_base: 2.5,
            diam_top: 1.0,
            phyllotactic_angle: 180.0,
            phyllotactic_deviation: 15.0,
            plant_orientation: 0.0,
            spiral: true,
            skew: 0.15,
            wl_int: 0.08,
            wl_slp: 0.003,
            w0_int: 0.5,
            w0_slp: 0.01,
            lm_int: 0.5,
            lm_slp: -0.02,
            seed: None,
            stage: None,
        }
    }
}

impl PlantConfig {
    /// Reads a configuration from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> MaizeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> MaizeResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Width/length ratio of the blade `ntop` positions from the top.
    pub fn wl_at(&self, ntop: u32) -> f64 {
        self.wl_int + self.wl_slp * f64::from(ntop)
    }

    /// Relative basal width of the blade `ntop` positions from the top.
    pub fn w0_at(&self, ntop: u32) -> f64 {
        self.w0_int + self.w0_slp * f64::from(ntop)
    }

    /// Relative position of the maximum width `ntop` positions from the top.
    pub fn lm_at(&self, ntop: u32) -> f64 {
        self.lm_int + self.lm_slp * f64::from(ntop)
    }

    /// Random source for the azimuth jitter: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Checks the global parameters before any model runs.
    ///
    /// Per-rank allometric values (`wl`, `w0`, `lm`) are checked where they
    /// are evaluated.
    pub fn validate(&self) -> MaizeResult<()> {
        if self.phytomer == 0 {
            return Err(MaizeError::invalid("phytomer", 0.0, "must be at least 1"));
        }
        require_positive("plant_area", self.plant_area)?;
        require_positive("plant_height", self.plant_height)?;
        if !(self.pseudostem_height >= 0.0 && self.pseudostem_height < self.plant_height) {
            return Err(MaizeError::invalid(
                "pseudostem_height",
                self.pseudostem_height,
                "must lie inside [0, plant_height)",
            ));
        }
        if !(self.rmax > 0.0 && self.rmax <= 1.0) {
            return Err(MaizeError::invalid("rmax", self.rmax, "must lie inside (0, 1]"));
        }
        require_positive("skew", self.skew)?;
        require_positive("pseudostem_dist", self.pseudostem_dist)?;
        require_positive("stem_dist", self.stem_dist)?;
        require_positive("diam_base", self.diam_base)?;
        require_positive("diam_top", self.diam_top)?;
        require_finite("phyllotactic_angle", self.phyllotactic_angle)?;
        require_finite("plant_orientation", self.plant_orientation)?;
        if !(self.phyllotactic_deviation.is_finite() && self.phyllotactic_deviation >= 0.0) {
            return Err(MaizeError::invalid(
                "phyllotactic_deviation",
                self.phyllotactic_deviation,
                "must be finite and >= 0",
            ));
        }
        Ok(())
    }
}
