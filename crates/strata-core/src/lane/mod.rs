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

//! # Lane Abstraction
//!
//! The base trait for all lane types in Strata.
//!
//! A **Lane** is a reusable processing strategy for one hot-path task:
//! extracting render records, generating procedural meshes, loading tree
//! assets. Lanes are stateless or hold only configuration; the data they work
//! on (scene, resources, sink) is passed to their `run`-style entry points, so
//! the same lane can serve any number of scenes.
//!
//! ```rust
//! use strata_core::lane::{Lane, LaneKind};
//!
//! struct CountingLane;
//!
//! impl Lane for CountingLane {
//!     fn strategy_name(&self) -> &'static str { "Counting" }
//!     fn lane_kind(&self) -> LaneKind { LaneKind::Extract }
//! }
//!
//! assert_eq!(CountingLane.lane_kind().to_string(), "Extract");
//! ```

use std::fmt;

/// Classification of lane types, used for logging and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Render-data extraction.
    Extract,
    /// Procedural mesh generation.
    Mesh,
    /// Asset loading and resource creation.
    Asset,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Extract => write!(f, "Extract"),
            LaneKind::Mesh => write!(f, "Mesh"),
            LaneKind::Asset => write!(f, "Asset"),
        }
    }
}

/// Base trait for ALL lane types.
pub trait Lane: Send + Sync {
    /// Human-readable name identifying this lane's strategy (e.g. `"ParallelExtract"`).
    fn strategy_name(&self) -> &'static str;

    /// The kind of processing this lane performs.
    fn lane_kind(&self) -> LaneKind;

    /// Estimated cost of processing `work_items` items, in arbitrary units.
    ///
    /// The default is linear in the item count.
    fn estimate_cost(&self, work_items: usize) -> f32 {
        work_items as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Lane for Fixed {
        fn strategy_name(&self) -> &'static str {
            "Fixed"
        }
        fn lane_kind(&self) -> LaneKind {
            LaneKind::Asset
        }
    }

    #[test]
    fn test_default_cost_is_linear() {
        assert_eq!(Fixed.estimate_cost(0), 0.0);
        assert_eq!(Fixed.estimate_cost(40), 40.0);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(LaneKind::Mesh.to_string(), "Mesh");
        assert_eq!(Fixed.strategy_name(), "Fixed");
    }
}
