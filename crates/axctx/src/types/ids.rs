/*! Branded ID types for type-safe entity references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Sequential id assigned to a node when it is emitted into the rendered
/// context. Ids are allocated lazily at emission time, never at
/// materialization time, so only nodes that actually appear in the output
/// consume ids. Monotonically increasing from a caller-supplied offset.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
  Into,
)]
pub struct NodeRef(pub u64);

impl NodeRef {
  /// The id that follows this one.
  pub const fn next(self) -> Self {
    Self(self.0 + 1)
  }
}
