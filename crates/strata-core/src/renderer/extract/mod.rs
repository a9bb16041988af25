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

//! Extraction primitives: material resolution, batch keys, record building
//! and the per-frame sink.
//!
//! Extraction runs once per frame per visible object, possibly on many
//! threads at once. Everything here is either pure or, for the sink,
//! append-only behind per-category locks.

mod batch_key;
mod record_builder;
mod resolver;
mod sink;

pub use batch_key::*;
pub use record_builder::*;
pub use resolver::*;
pub use sink::*;
