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

//! Defines the CPU-side material resource.

use crate::{
    asset::{Asset, AssetUUID, Handle},
    math::LinearRgba,
};

/// The texture slots a material can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Albedo / diffuse texture.
    BaseTexture,
    /// Tangent-space normal map.
    NormalTexture,
}

/// A texture path bound to a [`TextureSlot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    /// The slot the texture is bound to.
    pub slot: TextureSlot,
    /// The texture's resource path.
    pub path: String,
}

/// A material as the extraction side sees it: an identity, an optional base
/// material it inherits from, and texture bindings.
///
/// Shader parameters and GPU state are owned by the renderer backend and are
/// not modelled here.
#[derive(Debug, Clone)]
pub struct MaterialResource {
    /// The stable resource key. Its identity hash feeds batch and sort keys.
    pub key: AssetUUID,
    /// The material this one derives from, if any.
    pub base: Option<Handle<MaterialResource>>,
    /// Texture bindings, at most one per slot.
    pub bindings: Vec<TextureBinding>,
    /// Constant tint.
    pub tint: LinearRgba,
}

impl Asset for MaterialResource {}

impl MaterialResource {
    /// Creates an empty material with no base and no textures.
    pub fn new(key: AssetUUID) -> Self {
        Self {
            key,
            base: None,
            bindings: Vec::new(),
            tint: LinearRgba::WHITE,
        }
    }

    /// Sets the base material.
    pub fn with_base(mut self, base: Handle<MaterialResource>) -> Self {
        self.base = Some(base);
        self
    }

    /// Binds `path` to `slot`, replacing a previous binding of that slot.
    pub fn set_texture(&mut self, slot: TextureSlot, path: impl Into<String>) {
        let path = path.into();
        match self.bindings.iter_mut().find(|b| b.slot == slot) {
            Some(binding) => binding.path = path,
            None => self.bindings.push(TextureBinding { slot, path }),
        }
    }

    /// Returns the texture path bound to `slot`.
    pub fn texture(&self, slot: TextureSlot) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.slot == slot)
            .map(|b| b.path.as_str())
    }
}
