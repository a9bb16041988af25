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

//! The per-frame, per-category collection of render records.

use crate::renderer::render_data::{RenderCategory, RenderRecord};
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Collects the render records of one frame, grouped by category.
///
/// Appends only need `&self`: every built-in category owns its own mutex, so
/// workers filing into different categories never contend. Custom categories
/// share one map behind a single lock. Clearing needs `&mut self` and
/// therefore happens only between frames, when no worker holds the sink.
#[derive(Debug, Default)]
pub struct ExtractedRenderData {
    builtin: [Mutex<Vec<RenderRecord>>; 5],
    custom: Mutex<BTreeMap<u16, Vec<RenderRecord>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking producer only leaves whole records behind.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ExtractedRenderData {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` to the bucket of its category.
    pub fn add(&self, record: RenderRecord) {
        match record.category {
            RenderCategory::Custom(id) => lock(&self.custom).entry(id).or_default().push(record),
            builtin => {
                if let Some(slot) = builtin.builtin_index() {
                    lock(&self.builtin[slot]).push(record);
                }
            }
        }
    }

    /// Appends all `records` of one object. They land contiguously in their
    /// buckets when they share a category.
    pub fn add_all(&self, records: impl IntoIterator<Item = RenderRecord>) {
        for record in records {
            self.add(record);
        }
    }

    /// Drops every record. Called once per frame before extraction starts.
    pub fn reset(&mut self) {
        for bucket in &mut self.builtin {
            bucket
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
        self.custom
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// The number of records filed under `category`.
    pub fn len(&self, category: RenderCategory) -> usize {
        match category {
            RenderCategory::Custom(id) => lock(&self.custom).get(&id).map_or(0, Vec::len),
            builtin => builtin
                .builtin_index()
                .map_or(0, |slot| lock(&self.builtin[slot]).len()),
        }
    }

    /// The number of records across all categories.
    pub fn total_len(&self) -> usize {
        let builtin: usize = self.builtin.iter().map(|b| lock(b).len()).sum();
        let custom: usize = lock(&self.custom).values().map(Vec::len).sum();
        builtin + custom
    }

    /// `true` when no category holds a record.
    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// The categories that currently hold at least one record.
    pub fn categories(&self) -> Vec<RenderCategory> {
        let mut out: Vec<RenderCategory> = RenderCategory::BUILTIN
            .iter()
            .zip(&self.builtin)
            .filter(|(_, bucket)| !lock(bucket).is_empty())
            .map(|(category, _)| *category)
            .collect();
        out.extend(
            lock(&self.custom)
                .iter()
                .filter(|(_, records)| !records.is_empty())
                .map(|(id, _)| RenderCategory::Custom(*id)),
        );
        out
    }

    /// A copy of the records of `category`, in append order.
    pub fn records(&self, category: RenderCategory) -> Vec<RenderRecord> {
        match category {
            RenderCategory::Custom(id) => lock(&self.custom).get(&id).cloned().unwrap_or_default(),
            builtin => builtin
                .builtin_index()
                .map(|slot| lock(&self.builtin[slot]).clone())
                .unwrap_or_default(),
        }
    }

    /// A copy of the records of `category`, ordered for submission.
    ///
    /// Records carrying a sort key come first, by ascending key. Records
    /// without one follow. Ties are broken by batch key, then unique id, so
    /// the order does not depend on which worker appended first.
    pub fn sorted(&self, category: RenderCategory) -> Vec<RenderRecord> {
        let mut records = self.records(category);
        records.sort_by_key(|r| (r.sort_key.is_none(), r.sort_key, r.batch_key, r.unique_id));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        asset::Handle,
        math::{Aabb, AffineTransform, LinearRgba},
    };
    use std::sync::Arc;

    fn record(category: RenderCategory, unique_id: u32, sort_key: Option<u32>) -> RenderRecord {
        RenderRecord {
            transform: AffineTransform::IDENTITY,
            global_bounds: Aabb::INVALID,
            mesh: Handle::INVALID,
            material: Handle::INVALID,
            submesh_index: 0,
            batch_key: unique_id.rotate_left(7),
            color: LinearRgba::WHITE,
            unique_id,
            flip_winding: false,
            uniform_scale: true,
            category,
            sort_key,
        }
    }

    #[test]
    fn test_records_are_grouped_by_category() {
        let sink = ExtractedRenderData::new();
        sink.add(record(RenderCategory::Opaque, 1, None));
        sink.add(record(RenderCategory::Masked, 2, None));
        sink.add(record(RenderCategory::Opaque, 3, None));
        sink.add(record(RenderCategory::Custom(9), 4, None));

        assert_eq!(sink.len(RenderCategory::Opaque), 2);
        assert_eq!(sink.len(RenderCategory::Masked), 1);
        assert_eq!(sink.len(RenderCategory::Custom(9)), 1);
        assert_eq!(sink.len(RenderCategory::Custom(1)), 0);
        assert_eq!(sink.total_len(), 4);
        assert_eq!(
            sink.categories(),
            vec![
                RenderCategory::Opaque,
                RenderCategory::Masked,
                RenderCategory::Custom(9)
            ]
        );
    }

    #[test]
    fn test_reset_isolates_frames() {
        let mut sink = ExtractedRenderData::new();
        sink.add(record(RenderCategory::Opaque, 1, None));
        sink.add(record(RenderCategory::Custom(3), 2, None));
        sink.reset();
        assert!(sink.is_empty());

        sink.add(record(RenderCategory::LitOpaque, 5, None));
        assert_eq!(sink.total_len(), 1);
        assert_eq!(sink.records(RenderCategory::LitOpaque)[0].unique_id, 5);
        assert!(sink.records(RenderCategory::Opaque).is_empty());
    }

    #[test]
    fn test_sorted_orders_by_sort_key() {
        let sink = ExtractedRenderData::new();
        sink.add(record(RenderCategory::Transparent, 1, Some(30)));
        sink.add(record(RenderCategory::Transparent, 2, None));
        sink.add(record(RenderCategory::Transparent, 3, Some(10)));
        sink.add(record(RenderCategory::Transparent, 4, Some(20)));

        let ids: Vec<u32> = sink
            .sorted(RenderCategory::Transparent)
            .iter()
            .map(|r| r.unique_id)
            .collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_concurrent_appends() {
        let sink = Arc::new(ExtractedRenderData::new());
        let threads: Vec<_> = (0..8u32)
            .map(|t| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for i in 0..250u32 {
                        let category = RenderCategory::BUILTIN[(i % 5) as usize];
                        sink.add(record(category, t * 1000 + i, None));
                    }
                })
            })
            .collect();
        for handle in threads {
            handle.join().unwrap();
        }
        assert_eq!(sink.total_len(), 2000);
        assert_eq!(sink.len(RenderCategory::Selection), 400);
    }
}
