//! The car service.
//!
//! Sits between the HTTP handlers and storage. It is responsible for:
//! 1.  Routing a validated save to insert or update.
//! 2.  Deleting by id, treating a missing id as a no-op.
//! 3.  Assembling everything the index page shows: the current page of
//!     (optionally filtered) cars, pagination state, and the car being edited.

use crate::domain::{Car, CarDraft, PageRequest, PageWindow};
use crate::storage::{CarStore, StoreError, WriteOutcome};
use std::sync::Arc;

/// What a save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted { id: i32 },
    Updated { id: i32, outcome: WriteOutcome },
}

/// Inputs of the read path, already parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    pub search: String,
    pub page: PageRequest,
    pub edit: Option<i32>,
}

/// Everything the index page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub cars: Vec<Car>,
    pub editing: Option<Car>,
    pub window: PageWindow,
    pub search: String,
    /// Unfiltered row count.
    pub table_total: u64,
    pub table_name: String,
}

#[derive(Clone)]
pub struct CarService {
    store: Arc<dyn CarStore>,
    table_name: String,
}

impl CarService {
    pub fn new(store: Arc<dyn CarStore>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            table_name: table_name.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn CarStore> {
        &self.store
    }

    /// Updates `id` when given, otherwise inserts.
    pub async fn save(&self, id: Option<i32>, draft: &CarDraft) -> Result<SaveOutcome, StoreError> {
        match id {
            Some(id) => {
                let outcome = self.store.update(id, draft).await?;
                if outcome.is_noop() {
                    tracing::debug!(id, "Update matched no row");
                } else {
                    tracing::info!(id, "Car updated");
                }
                Ok(SaveOutcome::Updated { id, outcome })
            }
            None => {
                let id = self.store.insert(draft).await?;
                tracing::info!(id, brand = %draft.brand, model = %draft.model, "Car inserted");
                Ok(SaveOutcome::Inserted { id })
            }
        }
    }

    pub async fn remove(&self, id: i32) -> Result<WriteOutcome, StoreError> {
        let outcome = self.store.delete(id).await?;
        if outcome.is_noop() {
            tracing::debug!(id, "Delete matched no row");
        } else {
            tracing::info!(id, "Car deleted");
        }
        Ok(outcome)
    }

    /// Builds the index page state. Pagination counts the filtered rows.
    pub async fn browse(&self, query: BrowseQuery) -> Result<ListView, StoreError> {
        let BrowseQuery { search, page, edit } = query;

        let cars = self
            .store
            .search(&search, page.limit(), page.offset())
            .await?;
        let matching = self.store.count_matching(&search).await?;
        let table_total = if search.is_empty() {
            matching
        } else {
            self.store.count().await?
        };

        let editing = match edit {
            Some(id) => self.store.find_by_id(id).await?,
            None => None,
        };

        Ok(ListView {
            cars,
            editing,
            window: PageWindow::new(page, matching),
            search,
            table_total,
            table_name: self.table_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCarStore;
    use rust_decimal::Decimal;

    fn draft(brand: &str, model: &str) -> CarDraft {
        CarDraft {
            brand: brand.to_string(),
            model: model.to_string(),
            year: 2020,
            price: Decimal::new(1_000_000, 2),
        }
    }

    fn service() -> CarService {
        CarService::new(Arc::new(MemoryCarStore::new()), "cars")
    }

    #[tokio::test]
    async fn save_without_id_inserts() {
        let svc = service();
        let outcome = svc.save(None, &draft("Toyota", "Corolla")).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Inserted { id: 1 });
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_a_noop_update() {
        let svc = service();
        let outcome = svc.save(Some(42), &draft("Toyota", "Corolla")).await.unwrap();
        match outcome {
            SaveOutcome::Updated { id, outcome } => {
                assert_eq!(id, 42);
                assert!(outcome.is_noop());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(svc.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn browse_paginates_over_filtered_rows() {
        let svc = service();
        for i in 0..12 {
            svc.save(None, &draft("Toyota", &format!("Model {i}"))).await.unwrap();
        }
        for i in 0..3 {
            svc.save(None, &draft("Honda", &format!("Civic {i}"))).await.unwrap();
        }

        let view = svc
            .browse(BrowseQuery {
                search: "honda".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(view.cars.len(), 3);
        assert_eq!(view.window.total_rows, 3);
        assert_eq!(view.window.total_pages, 1);
        assert_eq!(view.table_total, 15);

        let view = svc
            .browse(BrowseQuery {
                page: PageRequest::new(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(view.cars.len(), 5);
        assert_eq!(view.cars[0].id, 11);
        assert_eq!(view.window.total_pages, 2);
        assert!(!view.window.has_next());
    }

    #[tokio::test]
    async fn browse_prefills_edit_target() {
        let svc = service();
        svc.save(None, &draft("Toyota", "Corolla")).await.unwrap();

        let view = svc
            .browse(BrowseQuery {
                edit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(view.editing.map(|c| c.model), Some("Corolla".to_string()));

        let view = svc
            .browse(BrowseQuery {
                edit: Some(7),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(view.editing.is_none());
    }
}
