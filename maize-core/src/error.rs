//! Error types for maize architecture generation.

use thiserror::Error;

use crate::types::Rank;

/// Result type for maize architecture operations.
pub type MaizeResult<T> = Result<T, MaizeError>;

/// Errors that can occur while generating or interpolating a plant.
#[derive(Debug, Error)]
pub enum MaizeError {
    /// A parameter lies outside the interval its model is defined on.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the configuration.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Constraint that was violated.
        reason: &'static str,
    },

    /// No leaf shape is registered for a rank and no fallback entry exists.
    #[error("no leaf shape for rank {rank} and no fallback entry")]
    MissingLeafShape {
        /// Rank that was looked up.
        rank: Rank,
    },

    /// Blade and stem tables do not describe the same ranks.
    #[error("blade table ranks {blades:?} do not match stem table ranks {stems:?}")]
    RankMismatch {
        /// Ranks present in the blade table.
        blades: Vec<Rank>,
        /// Ranks present in the stem table.
        stems: Vec<Rank>,
    },

    /// Per-rank input columns have different lengths.
    #[error("column `{column}` has {actual} values, expected {expected}")]
    ColumnLength {
        /// Name of the short or long column.
        column: &'static str,
        /// Length of the reference column.
        expected: usize,
        /// Length of the offending column.
        actual: usize,
    },

    /// Parallel columns of a curve have different lengths.
    #[error("curve columns differ in length: {left} vs {right}")]
    CurveLength {
        /// Length of the first column.
        left: usize,
        /// Length of the mismatching column.
        right: usize,
    },

    /// Curve has too few points for the requested operation.
    #[error("curve needs at least {min} points, got {actual}")]
    TooFewPoints {
        /// Minimum required points.
        min: usize,
        /// Actual point count.
        actual: usize,
    },

    /// Midrib polyline has zero length.
    #[error("degenerate midrib: polyline has zero length")]
    DegenerateMidrib,

    /// Reading a database or configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A database or configuration file is not valid JSON for its schema.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MaizeError {
    /// Shorthand for [`MaizeError::InvalidParameter`].
    pub(crate) const fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Fails with [`MaizeError::InvalidParameter`] unless `value` lies strictly inside (0, 1).
pub(crate) fn require_open_unit(name: &'static str, value: f64) -> MaizeResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(MaizeError::invalid(name, value, "must lie strictly inside (0, 1)"))
    }
}

/// Fails with [`MaizeError::InvalidParameter`] unless `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> MaizeResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MaizeError::invalid(name, value, "must be finite and > 0"))
    }
}

/// Fails with [`MaizeError::InvalidParameter`] unless `value` is finite.
pub(crate) fn require_finite(name: &'static str, value: f64) -> MaizeResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MaizeError::invalid(name, value, "must be finite"))
    }
}
