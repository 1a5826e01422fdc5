//! Core maize architecture library: from a handful of global botanical
//! parameters to a fully dimensioned table of phytomers.
//!
//! Main components:
//! - [`distribution`] — leaf area and internode spacing along the ranks.
//! - [`leaf_shape`] — parametric midrib and width profiles.
//! - [`curve`] — leaf shape curves, resampling and truncation.
//! - [`leaf_db`] — leaf shape catalogue keyed by rank.
//! - [`azimuth`] — phyllotaxy.
//! - [`allometry`] — blade and stem dimensions.
//! - [`phytomer`] — per-rank records and the rank join.
//! - [`assembler`] — the full pipeline.
//! - [`stage`] — partial growth at a decimal leaf stage.
//! - [`config`] — global plant parameters.
//! - [`error`] — error and result types.
//! - [`types`] — shared aliases and helpers.

pub mod allometry;
pub mod assembler;
pub mod azimuth;
pub mod config;
pub mod curve;
pub mod distribution;
pub mod error;
pub mod leaf_db;
pub mod leaf_shape;
pub mod phytomer;
pub mod stage;
pub mod types;

pub use assembler::{assemble, assemble_seeded};
pub use config::PlantConfig;
pub use curve::LeafShapeCurve;
pub use error::{MaizeError, MaizeResult};
pub use leaf_db::LeafShapeDb;
pub use phytomer::{Development, PhytomerRecord};
pub use stage::interpolate;
