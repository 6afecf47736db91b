mod category;
mod item;
mod trip;

pub use category::*;
pub use item::*;
pub use trip::*;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent key from an explicit `null` in update bodies.
///
/// Paired with `#[serde(default)]`, a missing key stays `None` while `null`
/// becomes `Some(None)`.
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
