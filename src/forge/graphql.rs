//! forge::graphql
//!
//! Pieces of the GraphQL response shape shared by the provider schemas.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::traits::ForgeError;

/// A GraphQL connection in edges/node form.
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    /// Nodes in provider order.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

/// Node list form (`nodes { ... }`), used where edges carry no cursor data.
#[derive(Debug, Deserialize)]
pub(crate) struct Nodes<T> {
    pub nodes: Vec<T>,
}

/// Deserialize a field that must be present but may be `null`.
///
/// Plain `Option` fields treat a missing key as `None`; with this helper a
/// missing key is a decoding error while an explicit `null` is `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Decode a raw response into a provider schema without consuming it.
pub(crate) fn decode<T: DeserializeOwned>(raw: &serde_json::Value) -> Result<T, ForgeError> {
    T::deserialize(raw).map_err(|e| ForgeError::MalformedResponse(e.to_string()))
}

/// Name shown for authors whose account no longer exists.
pub(crate) const GHOST_AUTHOR: &str = "ghost";
