/*!
Serializers over the finished node arena.

Two independent depth-first visitors consume the same read-only arena: a
tagged-markup form and a heading/inline form. Both assign final sequential
ids lazily, only to nodes that are actually emitted, and both wrap fragments
whose root is not a top-level node inside the nearest live window ancestor.
*/

mod markdown;
mod tagged;

use crate::arena::NodeArena;
use crate::tree::{NodeAttributes, UiNode};
use crate::types::{DetailLevel, NodeRef, OutputFormat};
use std::collections::BTreeMap;

/// Placeholder emitted for unexplored siblings inside a synthetic wrapper.
const OMITTED: &str = "…";

/// Guard against cyclic or absurdly deep live trees during the wrapper walk.
const MAX_SYNTHETIC_CLIMB: usize = 64;

/// Allocates sequential emission ids and records the id→element map.
///
/// Ids are handed out in emission order, so ascending id order in the map is
/// emission order. Only emitted nodes appear here.
pub(crate) struct IdAllocator<T: UiNode> {
  next: NodeRef,
  map: BTreeMap<NodeRef, T>,
}

impl<T: UiNode> IdAllocator<T> {
  pub(crate) fn new(start: NodeRef) -> Self {
    Self {
      next: start,
      map: BTreeMap::new(),
    }
  }

  pub(crate) fn allocate(&mut self, element: &T) -> NodeRef {
    let id = self.next;
    self.map.insert(id, element.clone());
    self.next = id.next();
    id
  }

  pub(crate) fn into_parts(self) -> (NodeRef, BTreeMap<NodeRef, T>) {
    (self.next, self.map)
  }
}

/// Render the arena in the requested format, trimmed of trailing whitespace.
pub(crate) fn render<T: UiNode>(
  arena: &NodeArena<T>,
  format: OutputFormat,
  detail: DetailLevel,
  ids: &mut IdAllocator<T>,
) -> String {
  let wrapper = synthetic_root(arena);
  let mut out = String::new();
  match format {
    OutputFormat::Tagged => tagged::render(arena, detail, ids, wrapper, &mut out),
    OutputFormat::Markdown => markdown::render(arena, detail, ids, wrapper, &mut out),
  }
  out.trim_end().to_string()
}

/// When the discovered fragment's root is not a top-level node, walk the
/// *live* tree upward to the nearest window/screen ancestor so the output
/// keeps window identity. Returns the wrapper element and its attributes.
fn synthetic_root<T: UiNode>(arena: &NodeArena<T>) -> Option<(T, NodeAttributes)> {
  let first = *arena.roots().first()?;
  let root = arena.get(first);
  if root.role.is_top_level() {
    return None;
  }
  let mut cursor = root.element.parent();
  for _ in 0..MAX_SYNTHETIC_CLIMB {
    let el = cursor?;
    if el.role().is_top_level() {
      let attrs = el.attributes().unwrap_or_default();
      return Some((el, attrs));
    }
    cursor = el.parent();
  }
  None
}

/// Quote-escape an attribute value for the tagged form.
fn escape_attr(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', " ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::accessibility::Role;
  use crate::fake::FakeTree;

  #[test]
  fn allocator_hands_out_contiguous_ids_in_order() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let a = tree.add(root, Role::Button);
    let mut ids = IdAllocator::new(NodeRef(5));
    assert_eq!(ids.allocate(&tree.element(root)), NodeRef(5));
    assert_eq!(ids.allocate(&tree.element(a)), NodeRef(6));
    let (next, map) = ids.into_parts();
    assert_eq!(next, NodeRef(7));
    assert_eq!(map.len(), 2);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![NodeRef(5), NodeRef(6)]);
  }

  #[test]
  fn attr_escaping() {
    assert_eq!(escape_attr(r#"say "hi""#), r#"say \"hi\""#);
    assert_eq!(escape_attr("two\nlines"), "two lines");
  }
}
