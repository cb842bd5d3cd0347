use thiserror::Error;

use crate::dataset::DatasetKey;

/// Errors raised while building or mutating indicator datasets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Record was created without an entity identifier.
    #[error("record has an empty entity id")]
    EmptyEntityId,

    /// Record score is NaN or infinite.
    #[error("score {value} for entity {entity_id} is not a finite number")]
    NonFiniteScore { entity_id: String, value: f64 },

    /// A dataset already holds a record for this entity.
    #[error("duplicate entity {entity_id} in dataset {dataset}")]
    DuplicateEntity {
        entity_id: String,
        dataset: DatasetKey,
    },

    /// A dataset with the same title and period is already registered.
    #[error("dataset {0} already exists")]
    DuplicateDataset(DatasetKey),

    /// Records cannot be added once a dataset has been normalized.
    #[error("dataset {0} is already normalized")]
    DatasetNormalized(DatasetKey),

    /// No entity has coverage across every dataset.
    #[error("no entities remain after synchronization")]
    EmptyCollection,
}

pub type Result<T> = std::result::Result<T, ModelError>;
