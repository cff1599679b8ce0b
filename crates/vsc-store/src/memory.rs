use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Repository, StoreError};

/// Mutex-guarded collection for tests and ephemeral sessions.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    records: Mutex<Vec<T>>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<T>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Repository<T> for InMemoryStore<T>
where
    T: Clone + Send,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.guard().clone())
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        *self.guard() = records.to_vec();
        Ok(())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut Vec<T>) -> bool) -> Result<bool, StoreError> {
        let mut guard = self.guard();
        // `false` must leave the store untouched even if `apply` edited the copy.
        let mut working = guard.clone();
        if !apply(&mut working) {
            return Ok(false);
        }
        *guard = working;
        Ok(true)
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
