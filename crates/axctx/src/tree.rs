/*!
Read-only cursor over an externally owned accessibility tree.

The tree belongs to the platform (or to a test double); the serializer only
reads it during one synchronous build pass. Core code uses this trait and
never platform types, so a test suite can substitute a synthetic in-memory
tree without platform APIs.
*/

use crate::accessibility::Role;
use crate::types::Bounds;

/// Attributes snapshot fetched from a live element.
///
/// Fetched once per materialized node; renderers work from the snapshot so
/// the live tree is not re-touched after traversal.
#[derive(Debug, Default, Clone)]
pub struct NodeAttributes {
  /// Accessible name (title/label) if the element has one.
  pub name: Option<String>,
  pub bounds: Option<Bounds>,
  /// URL for links and documents.
  pub url: Option<String>,
  pub focused: bool,
  pub selected: bool,
}

/// Handle to one element of a live accessibility tree.
///
/// Implementations are cheap to clone (reference-counted platform handles).
/// All accessors are read-only and must be safe for concurrent read
/// traversal, since independent builds may walk the same tree from different
/// threads.
pub trait UiNode: Clone {
  /// Identity stable within a session. Used for deduplication: a key seen
  /// twice during traversal is the same element reached by another path.
  fn key(&self) -> u64;

  /// Semantic role of this element.
  fn role(&self) -> Role;

  /// Fetch current attributes.
  ///
  /// `None` means the element disappeared between discovery and processing
  /// (process exited, window closed). Callers skip the element and stop
  /// expanding its branch; this is not an error.
  fn attributes(&self) -> Option<NodeAttributes>;

  /// Bounded-length text retrieval. `None` when the element carries no
  /// readable text or has disappeared.
  fn text(&self, max_chars: usize) -> Option<String>;

  fn parent(&self) -> Option<Self>;

  fn children(&self) -> Vec<Self>;

  fn prev_sibling(&self) -> Option<Self>;

  fn next_sibling(&self) -> Option<Self>;

  /// Process that owns this element.
  fn process_id(&self) -> u32;

  /// Native handle of the top-level window this element lives under.
  /// Anchors sharing a window handle are built as one group.
  fn window_handle(&self) -> u64;
}
