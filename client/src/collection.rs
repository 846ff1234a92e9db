// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::Entity;

/// Ordered cache of entities keyed by id.
///
/// Order is the render order of the list views. Ids stay unique: inserting
/// an entity whose id is already cached drops the old copy first.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity + Clone> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the whole collection with a fresh result set.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items.clear();
        for item in items {
            self.append(item);
        }
    }

    /// Inserts as the most recent entry.
    pub fn prepend(&mut self, item: T) {
        self.remove(item.id());
        self.items.insert(0, item);
    }

    pub fn append(&mut self, item: T) {
        self.remove(item.id());
        self.items.push(item);
    }

    /// Swaps the cached copy for `item`, keeping its position.
    /// Returns false when the id is not cached; nothing is inserted then.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|cached| cached.id() == item.id()) {
            Some(cached) => {
                *cached = item;
                true
            }
            None => false,
        }
    }

    /// Replaces in place when cached, appends otherwise.
    pub fn upsert(&mut self, item: T) {
        if !self.replace(item.clone()) {
            self.items.push(item);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}
