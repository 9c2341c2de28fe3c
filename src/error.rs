use thiserror::Error;

/// Every failure the modeling engine can report.
///
/// `InvalidArgument` and `ShapeMismatch` abort only the computation that
/// detected them. `Configuration` and `Communication` abort the whole
/// distributed run.
#[derive(Error, Debug)]
pub enum FdError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("communication with worker {peer} failed: {reason}")]
    Communication { peer: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("vtk error: {0}")]
    Vtk(#[from] vtkio::Error),
}

impl FdError {
    /// Fatal errors take down every worker of a run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FdError::Configuration(_) | FdError::Communication { .. }
        )
    }

    pub fn shape_mismatch(expected: &[usize], found: &[usize]) -> Self {
        FdError::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}

pub type FdResult<T> = Result<T, FdError>;

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(FdError::Configuration("x".into()).is_fatal());
        assert!(FdError::Communication {
            peer: 1,
            reason: "gone".into()
        }
        .is_fatal());
        assert!(!FdError::InvalidArgument("x".into()).is_fatal());
        assert!(!FdError::shape_mismatch(&[1, 2], &[2, 1]).is_fatal());
    }

    #[test]
    fn messages() {
        let e = FdError::shape_mismatch(&[3, 4], &[3, 5]);
        assert_eq!(
            e.to_string(),
            "shape mismatch: expected [3, 4], found [3, 5]"
        );
        let e = FdError::Communication {
            peer: 2,
            reason: "peer disconnected".into(),
        };
        assert_eq!(
            e.to_string(),
            "communication with worker 2 failed: peer disconnected"
        );
    }
}
