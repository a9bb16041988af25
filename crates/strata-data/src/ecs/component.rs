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

use super::{GameObject, Message, MessageKind};
use crate::{assets::Resources, ComponentError};
use std::any::Any;
use strata_core::renderer::ExtractError;

/// Behaviour attached to a [`GameObject`].
///
/// Components are stored type-erased on their object. They react to
/// [`Message`]s and serialize themselves to bytes; resources are referenced by
/// key in the serialized form, never by handle.
pub trait Component: Any + Send + Sync {
    /// The stable type tag written next to the serialized bytes.
    fn type_tag(&self) -> &'static str;

    /// The message kinds [`Component::on_message`] reacts to.
    fn handled_messages(&self) -> &'static [MessageKind];

    /// Handles one message. Only called for kinds listed in
    /// [`Component::handled_messages`].
    fn on_message(&self, owner: &GameObject, message: &mut Message<'_>) -> Result<(), ExtractError>;

    /// Serializes the component's persistent state.
    fn serialize(&self, resources: &Resources) -> Result<Vec<u8>, ComponentError>;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A concrete component type that can be registered in a
/// [`ComponentRegistry`](super::ComponentRegistry).
pub trait ComponentType: Component + Sized {
    /// The type tag, identical to what [`Component::type_tag`] returns.
    const TYPE_TAG: &'static str;

    /// The message kinds instances handle.
    const MESSAGES: &'static [MessageKind];

    /// Rebuilds a component from bytes produced by [`Component::serialize`].
    fn deserialize(bytes: &[u8], resources: &Resources) -> Result<Self, ComponentError>;
}

/// Encodes a component state with the workspace's bincode configuration.
pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ComponentError> {
    Ok(bincode::serde::encode_to_vec(
        value,
        bincode::config::standard(),
    )?)
}

/// Decodes a component state written by [`encode`].
pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ComponentError> {
    let (value, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}
