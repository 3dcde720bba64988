use dashboard_core::{Classification, Dataset, Row};

use super::change;
use crate::connection::ConnectionProvider;
use crate::crud::Crud;
use crate::error::Result;

/// Dataset metadata operations.
pub struct DatasetService<'p> {
    crud: Crud<'p, Dataset>,
}

impl<'p> DatasetService<'p> {
    /// Service over the `datasets` table.
    pub fn new(provider: &'p ConnectionProvider) -> Self {
        Self {
            crud: Crud::new(provider),
        }
    }

    /// Registers a new dataset; the id must be unused.
    pub fn create(&self, dataset: &Dataset) -> Result<()> {
        self.crud.insert(dataset)
    }

    /// The dataset with `dataset_id`, if any.
    pub fn get(&self, dataset_id: &str) -> Result<Option<Dataset>> {
        self.crud.fetch_by_id(dataset_id)
    }

    /// All datasets, ordered by id.
    pub fn list(&self) -> Result<Vec<Dataset>> {
        self.crud.fetch_all()
    }

    /// Datasets with the given classification.
    pub fn list_by_classification(&self, classification: Classification) -> Result<Vec<Dataset>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|d| d.classification == classification)
            .collect())
    }

    /// Datasets owned by `owner` (case-insensitive).
    pub fn list_by_owner(&self, owner: &str) -> Result<Vec<Dataset>> {
        let owner = owner.trim();
        Ok(self
            .list()?
            .into_iter()
            .filter(|d| d.owner.eq_ignore_ascii_case(owner))
            .collect())
    }

    /// Hands a dataset over to a new owner.
    pub fn update_owner(&self, dataset_id: &str, owner: &str) -> Result<Dataset> {
        self.crud.update(dataset_id, change("owner", owner))
    }

    /// Applies a partial update and returns the updated row.
    pub fn update(&self, dataset_id: &str, changes: Row) -> Result<Dataset> {
        self.crud.update(dataset_id, changes)
    }

    /// Returns whether the dataset existed.
    pub fn delete(&self, dataset_id: &str) -> Result<bool> {
        self.crud.delete(dataset_id)
    }
}
