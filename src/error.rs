//! Error types shared by the random stream and bootstrap modules.

use std::fmt;

/// Stage of a bootstrap trial in which a caller-supplied collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialStage {
    /// Selecting the resampled items from the data container
    Resample,
    /// Running the clustering function on the resampled data
    Cluster,
    /// Computing co-assignment probabilities between label sets
    Coassign,
}

impl fmt::Display for TrialStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialStage::Resample => write!(f, "resampling"),
            TrialStage::Cluster => write!(f, "clustering"),
            TrialStage::Coassign => write!(f, "co-assignment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StabilityError {
    /// The seed could not be interpreted as a number.
    #[error("invalid seed {value:?}")]
    InvalidSeed { value: String },

    /// Two collections that should line up one-to-one have different lengths.
    #[error("number of {subject} and {dimension} should be the same")]
    DimensionMismatch { subject: String, dimension: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A clustering, co-assignment or item selection call failed. `trial` is
    /// `None` for the clustering of the original data. The whole run is aborted.
    #[error("{stage} failed {}", describe_trial(.trial))]
    CollaboratorFailure {
        trial: Option<usize>,
        stage: TrialStage,
        #[source]
        source: anyhow::Error,
    },
}

impl StabilityError {
    pub(crate) fn dimension_mismatch(subject: &str, dimension: &str) -> Self {
        StabilityError::DimensionMismatch {
            subject: subject.to_string(),
            dimension: dimension.to_string(),
        }
    }

    pub(crate) fn collaborator(
        trial: Option<usize>,
        stage: TrialStage,
        source: anyhow::Error,
    ) -> Self {
        StabilityError::CollaboratorFailure {
            trial,
            stage,
            source,
        }
    }
}

fn describe_trial(trial: &Option<usize>) -> String {
    match trial {
        Some(trial) => format!("in bootstrap trial {}", trial),
        None => "on the original data".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, StabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = StabilityError::dimension_mismatch("cells", "seeds");
        assert_eq!(err.to_string(), "number of cells and seeds should be the same");
    }

    #[test]
    fn test_collaborator_failure_keeps_source() {
        let err = StabilityError::collaborator(
            Some(3),
            TrialStage::Cluster,
            anyhow::anyhow!("kmeans diverged"),
        );
        assert_eq!(err.to_string(), "clustering failed in bootstrap trial 3");

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "kmeans diverged");
    }

    #[test]
    fn test_original_clustering_failure_message() {
        let err = StabilityError::collaborator(None, TrialStage::Cluster, anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "clustering failed on the original data");
    }
}
