// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A generational arena for resident resources, indexed by key.

use std::collections::HashMap;
use strata_core::{
    asset::{Asset, AssetUUID, Handle},
    renderer::ResourceError,
};

struct Slot<A> {
    generation: u32,
    entry: Option<Entry<A>>,
}

struct Entry<A> {
    key: AssetUUID,
    identity: u32,
    value: A,
}

/// Stores resources of type `A` in slots addressed by [`Handle<A>`].
///
/// Each resident resource is registered under a unique [`AssetUUID`] key, so
/// a resource is created at most once and later requests for the same key
/// receive the existing handle. Removing a resource bumps its slot's
/// generation, which turns every outstanding handle to it stale.
pub struct ResourceStore<A: Asset> {
    slots: Vec<Slot<A>>,
    free: Vec<u32>,
    by_key: HashMap<AssetUUID, Handle<A>>,
}

impl<A: Asset> Default for ResourceStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Asset> ResourceStore<A> {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Registers `value` under `key`.
    ///
    /// Fails with [`ResourceError::DuplicateKey`] if the key is already taken.
    pub fn insert(&mut self, key: AssetUUID, value: A) -> Result<Handle<A>, ResourceError> {
        if self.by_key.contains_key(&key) {
            return Err(ResourceError::DuplicateKey(key.to_string()));
        }

        let entry = Entry {
            key,
            identity: key.identity_hash(),
            value,
        };
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                Handle::from_raw_parts(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                Handle::from_raw_parts((self.slots.len() - 1) as u32, 0)
            }
        };
        self.by_key.insert(key, handle);
        Ok(handle)
    }

    /// Returns the handle registered under `key`, creating the resource with
    /// `create` if none exists yet.
    pub fn get_or_insert_with(&mut self, key: AssetUUID, create: impl FnOnce() -> A) -> Handle<A> {
        if let Some(handle) = self.find(&key) {
            return handle;
        }
        // The key was just checked, so the insert cannot collide.
        self.insert(key, create()).unwrap_or(Handle::INVALID)
    }

    /// Finds the handle of the resource registered under `key`.
    pub fn find(&self, key: &AssetUUID) -> Option<Handle<A>> {
        self.by_key.get(key).copied()
    }

    fn entry(&self, handle: Handle<A>) -> Option<&Entry<A>> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    /// Borrows the resource behind `handle`. `None` for null or stale handles.
    pub fn get(&self, handle: Handle<A>) -> Option<&A> {
        self.entry(handle).map(|e| &e.value)
    }

    /// Mutably borrows the resource behind `handle`.
    pub fn get_mut(&mut self, handle: Handle<A>) -> Option<&mut A> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.entry.as_mut().map(|e| &mut e.value)
    }

    /// `true` if `handle` refers to a resident resource.
    pub fn is_valid(&self, handle: Handle<A>) -> bool {
        self.entry(handle).is_some()
    }

    /// The cached 32-bit identity hash of the resource's key.
    pub fn identity(&self, handle: Handle<A>) -> Option<u32> {
        self.entry(handle).map(|e| e.identity)
    }

    /// The key the resource is registered under.
    pub fn key_of(&self, handle: Handle<A>) -> Option<AssetUUID> {
        self.entry(handle).map(|e| e.key)
    }

    /// Removes the resource, invalidating every handle to it.
    pub fn remove(&mut self, handle: Handle<A>) -> Result<A, ResourceError> {
        let stale = ResourceError::StaleHandle {
            index: handle.index(),
            generation: handle.generation(),
        };
        let slot = match self.slots.get_mut(handle.index() as usize) {
            Some(slot) if slot.generation == handle.generation() => slot,
            _ => return Err(stale),
        };
        let entry = slot.entry.take().ok_or(stale)?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.by_key.remove(&entry.key);
        Ok(entry.value)
    }

    /// The number of resident resources.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// `true` if no resource is resident.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Iterates over all resident resources and their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<A>, &A)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|e| (Handle::from_raw_parts(index as u32, slot.generation), &e.value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Blob(u32);
    impl Asset for Blob {}

    #[test]
    fn test_insert_and_find() {
        let mut store = ResourceStore::new();
        let key = AssetUUID::new_v5("blob/a");
        let handle = store.insert(key, Blob(1)).unwrap();

        assert_eq!(store.find(&key), Some(handle));
        assert_eq!(store.get(handle), Some(&Blob(1)));
        assert_eq!(store.identity(handle), Some(key.identity_hash()));
        assert_eq!(store.key_of(handle), Some(key));
        assert!(matches!(
            store.insert(key, Blob(2)),
            Err(ResourceError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_removed_handles_turn_stale() {
        let mut store = ResourceStore::new();
        let first = store.insert(AssetUUID::new_v5("blob/a"), Blob(1)).unwrap();
        assert_eq!(store.remove(first), Ok(Blob(1)));
        assert!(!store.is_valid(first));
        assert!(store.find(&AssetUUID::new_v5("blob/a")).is_none());

        // The slot is reused with a new generation.
        let second = store.insert(AssetUUID::new_v5("blob/b"), Blob(2)).unwrap();
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(store.get(first).is_none());
        assert_eq!(store.get(second), Some(&Blob(2)));
        assert!(store.remove(first).is_err());
    }

    #[test]
    fn test_null_handle_never_resolves() {
        let mut store = ResourceStore::new();
        store.insert(AssetUUID::new_v5("blob/a"), Blob(1)).unwrap();
        assert!(store.get(Handle::INVALID).is_none());
    }

    #[test]
    fn test_get_or_insert_with_reuses() {
        let mut store = ResourceStore::new();
        let key = AssetUUID::new_v5("blob/shared");
        let a = store.get_or_insert_with(key, || Blob(1));
        let b = store.get_or_insert_with(key, || Blob(2));
        assert_eq!(a, b);
        assert_eq!(store.get(a), Some(&Blob(1)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().count(), 1);
    }
}
