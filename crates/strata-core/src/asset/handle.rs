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

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// A generation-checked reference to a resource stored in an arena.
///
/// The handle is a plain `(index, generation)` pair and owns nothing: copying
/// it is free, and validity is decided by the arena comparing the generation
/// of the slot with the one recorded in the handle. A handle to a slot that
/// was freed and reused therefore resolves to nothing instead of to the new
/// occupant.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// A handle that never resolves. Used for "no resource assigned".
    pub const INVALID: Self = Self {
        index: u32::MAX,
        generation: 0,
        _marker: PhantomData,
    };

    /// Creates a handle from its raw parts. Only arenas should need this.
    #[inline]
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// The slot index inside the owning arena.
    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The generation the slot had when this handle was issued.
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// `true` for [`Handle::INVALID`]. A non-null handle may still be stale.
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Handle<{}>(null)", short_type_name::<T>())
        } else {
            write!(
                f,
                "Handle<{}>({}v{})",
                short_type_name::<T>(),
                self.index,
                self.generation
            )
        }
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    #[test]
    fn test_default_is_invalid() {
        let h: Handle<Dummy> = Handle::default();
        assert!(h.is_null());
        assert_eq!(h, Handle::INVALID);
    }

    #[test]
    fn test_equality_includes_generation() {
        let a: Handle<Dummy> = Handle::from_raw_parts(3, 1);
        let b: Handle<Dummy> = Handle::from_raw_parts(3, 2);
        assert_ne!(a, b);
        assert_eq!(a, Handle::from_raw_parts(3, 1));
    }

    #[test]
    fn test_debug_format() {
        let a: Handle<Dummy> = Handle::from_raw_parts(7, 2);
        assert_eq!(format!("{a:?}"), "Handle<Dummy>(7v2)");
    }
}
