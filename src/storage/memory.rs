//! In-process car store with the same ordering and matching rules as the
//! PostgreSQL repository. Nothing survives a restart.

use crate::domain::{Car, CarDraft};
use crate::storage::{CarStore, StoreError, WriteOutcome};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Kept sorted by id since ids only grow.
    rows: Vec<Car>,
    last_id: i32,
}

#[derive(Default)]
pub struct MemoryCarStore {
    inner: RwLock<Inner>,
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(car: &Car, needle: &str) -> bool {
    needle.is_empty()
        || car.brand.to_lowercase().contains(needle)
        || car.model.to_lowercase().contains(needle)
}

fn window(cars: impl Iterator<Item = Car>, limit: u32, offset: u64) -> Vec<Car> {
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    cars.skip(skip).take(limit as usize).collect()
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn insert(&self, draft: &CarDraft) -> Result<i32, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.push(Car {
            id,
            brand: draft.brand.clone(),
            model: draft.model.clone(),
            year: draft.year,
            price: draft.price.round_dp(2),
        });
        Ok(id)
    }

    async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Car>, StoreError> {
        let inner = self.inner.read().await;
        Ok(window(inner.rows.iter().cloned(), limit, offset))
    }

    async fn search(&self, term: &str, limit: u32, offset: u64) -> Result<Vec<Car>, StoreError> {
        let needle = term.to_lowercase();
        let inner = self.inner.read().await;
        let hits = inner.rows.iter().filter(|c| matches(c, &needle)).cloned();
        Ok(window(hits, limit, offset))
    }

    async fn update(&self, id: i32, draft: &CarDraft) -> Result<WriteOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let rows_affected = match inner.rows.iter_mut().find(|c| c.id == id) {
            Some(car) => {
                car.brand = draft.brand.clone();
                car.model = draft.model.clone();
                car.year = draft.year;
                car.price = draft.price.round_dp(2);
                1
            }
            None => 0,
        };
        Ok(WriteOutcome { rows_affected })
    }

    async fn delete(&self, id: i32) -> Result<WriteOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner.rows.retain(|c| c.id != id);
        Ok(WriteOutcome {
            rows_affected: (before - inner.rows.len()) as u64,
        })
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.rows.len() as u64)
    }

    async fn count_matching(&self, term: &str) -> Result<u64, StoreError> {
        let needle = term.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().filter(|c| matches(c, &needle)).count() as u64)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Car>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn draft(brand: &str, model: &str, year: i32, cents: i64) -> CarDraft {
        CarDraft {
            brand: brand.to_string(),
            model: model.to_string(),
            year,
            price: Decimal::new(cents, 2),
        }
    }

    async fn seeded() -> MemoryCarStore {
        let store = MemoryCarStore::new();
        store.insert(&draft("Toyota", "Corolla", 2020, 1_800_000)).await.unwrap();
        store.insert(&draft("Honda", "Civic", 2019, 1_650_000)).await.unwrap();
        store.insert(&draft("Ford", "Focus", 2018, 1_200_000)).await.unwrap();
        store.insert(&draft("toyota", "Yaris", 2021, 1_500_000)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryCarStore::new();
        let a = store.insert(&draft("A", "B", 2000, 100)).await.unwrap();
        let b = store.insert(&draft("C", "D", 2001, 100)).await.unwrap();
        assert!(b > a);
        store.delete(b).await.unwrap();
        let c = store.insert(&draft("E", "F", 2002, 100)).await.unwrap();
        assert!(c > b, "ids are never reused");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_brand_or_model() {
        let store = seeded().await;
        let hits = store.search("TOYO", 10, 0).await.unwrap();
        assert_eq!(hits.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 4]);

        let hits = store.search("civ", 10, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].brand, "Honda");

        assert_eq!(store.count_matching("o").await.unwrap(), 4);
        assert_eq!(store.count_matching("zzz").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_search_equals_list() {
        let store = seeded().await;
        let listed = store.list(2, 1).await.unwrap();
        let searched = store.search("", 2, 1).await.unwrap();
        assert_eq!(listed, searched);
        assert_eq!(store.count().await.unwrap(), store.count_matching("").await.unwrap());
    }

    #[tokio::test]
    async fn update_and_delete_report_noops() {
        let store = seeded().await;
        let outcome = store.update(99, &draft("X", "Y", 2000, 1)).await.unwrap();
        assert!(outcome.is_noop());

        let outcome = store.update(2, &draft("Honda", "Accord", 2022, 2_500_000)).await.unwrap();
        assert_eq!(outcome.rows_affected, 1);
        let car = store.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(car.model, "Accord");
        assert_eq!(store.find_by_id(1).await.unwrap().unwrap().model, "Corolla");

        assert_eq!(store.delete(3).await.unwrap().rows_affected, 1);
        assert!(store.delete(3).await.unwrap().is_noop());
        assert!(store.find_by_id(3).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 3);
    }
}
