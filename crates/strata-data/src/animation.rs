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

//! Skeleton data delivered to components with animation poses.

use serde::{Deserialize, Serialize};

/// The joint layout of an animated model.
///
/// A pose is a slice of object-space joint matrices indexed like
/// [`Skeleton::joint_names`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skeleton {
    /// Joint names, in pose order.
    pub joint_names: Vec<String>,
}

impl Skeleton {
    /// Creates a skeleton from its joint names.
    pub fn new<I, S>(joint_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            joint_names: joint_names.into_iter().map(Into::into).collect(),
        }
    }

    /// The index of the joint called `name`.
    pub fn find_joint(&self, name: &str) -> Option<u32> {
        self.joint_names
            .iter()
            .position(|joint| joint == name)
            .map(|index| index as u32)
    }

    /// The number of joints.
    pub fn joint_count(&self) -> usize {
        self.joint_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_joint() {
        let skeleton = Skeleton::new(["root", "spine", "hand_l"]);
        assert_eq!(skeleton.find_joint("hand_l"), Some(2));
        assert_eq!(skeleton.find_joint("hand_r"), None);
        assert_eq!(skeleton.joint_count(), 3);
    }
}
