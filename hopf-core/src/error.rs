/// Error taxonomy for the fiber geometry core
///
/// Every variant is a caller-contract violation. Numeric singularities of the
/// projection are not errors; see [`crate::fiber`].

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HopfError {
    #[error("division count must be at least 1, got {0}")]
    InvalidDivisions(usize),

    #[error("sweep needs at least 2 steps, got {0}")]
    InvalidSteps(usize),

    #[error("band curves differ in length: {left} vs {right}")]
    CurveLengthMismatch { left: usize, right: usize },

    #[error("band curves are empty")]
    EmptyCurve,

    #[error("closed band needs at least 3 points per curve, got {0}")]
    ClosedBandTooShort(usize),
}

pub type Result<T> = std::result::Result<T, HopfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_display() {
        let err = HopfError::CurveLengthMismatch { left: 4, right: 5 };
        assert_eq!(err.to_string(), "band curves differ in length: 4 vs 5");
    }

    #[test]
    fn divisions_display() {
        assert_eq!(
            HopfError::InvalidDivisions(0).to_string(),
            "division count must be at least 1, got 0"
        );
    }
}
