use portal_scheduler_domain::{Entity, ID};
use std::sync::{Mutex, MutexGuard};

/// Useful functions for creating inmemory repositories

pub fn lock<T>(collection: &Mutex<T>) -> MutexGuard<'_, T> {
    collection.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    lock(collection).push(val.clone());
}

/// Replaces the entity with the same id, or appends it when there is none.
/// Returns whether an existing entity was replaced.
pub fn upsert<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) -> bool {
    let mut collection = lock(collection);
    match collection.iter().position(|item| item.id() == val.id()) {
        Some(i) => {
            collection[i] = val.clone();
            true
        }
        None => {
            collection.push(val.clone());
            false
        }
    }
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    lock(collection)
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = lock(collection);
    let i = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(i))
}

pub fn replace_all<T>(vals: Vec<T>, collection: &Mutex<Vec<T>>) {
    *lock(collection) = vals;
}
