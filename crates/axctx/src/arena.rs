/*!
Materialized node arena.

Single source of truth for the output tree built during one traversal. The
arena owns every node; parent/child links are indices, so the upward
informativeness walk is an iterative loop over parent indices with no shared
ownership. Children materialized before their parent wait in a pending map
and are attached when the parent appears.
*/

use crate::accessibility::Role;
use crate::budget::Budget;
use crate::tree::{NodeAttributes, UiNode};
use crate::types::DetailLevel;
use std::collections::HashMap;

pub(crate) type NodeIdx = usize;

/// One persistent node of the output tree.
///
/// `self_informative` is fixed at creation and never changes. `visible` is
/// monotonic non-decreasing within a build. Children are linked in discovery
/// order; render order is re-derived from `ordinal`, never insertion order.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CtxNode<T: UiNode> {
  pub element: T,
  pub key: u64,
  pub role: Role,
  pub attrs: NodeAttributes,
  pub parent: Option<NodeIdx>,
  pub children: Vec<NodeIdx>,
  pub ordinal: i32,
  pub description: Option<String>,
  pub content: Vec<String>,
  pub structural_cost: u32,
  pub content_cost: u32,
  pub visible: bool,
  pub self_informative: bool,
  pub is_anchor: bool,
  pub informative_descendants: u32,
  pub has_informative_descendant: bool,
  pub structural_charged: bool,
}

pub(crate) struct NodeArena<T: UiNode> {
  nodes: Vec<CtxNode<T>>,
  by_key: HashMap<u64, NodeIdx>,
  /// Orphans waiting for a parent, keyed by the parent's element key.
  pending: HashMap<u64, Vec<NodeIdx>>,
}

impl<T: UiNode> NodeArena<T> {
  pub(crate) fn new() -> Self {
    Self {
      nodes: Vec::new(),
      by_key: HashMap::new(),
      pending: HashMap::new(),
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.nodes.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub(crate) fn contains_key(&self, key: u64) -> bool {
    self.by_key.contains_key(&key)
  }

  pub(crate) fn lookup(&self, key: u64) -> Option<NodeIdx> {
    self.by_key.get(&key).copied()
  }

  pub(crate) fn get(&self, idx: NodeIdx) -> &CtxNode<T> {
    &self.nodes[idx]
  }

  /// Fragment roots (nodes without a materialized parent), in arena order.
  pub(crate) fn roots(&self) -> Vec<NodeIdx> {
    (0..self.nodes.len())
      .filter(|&idx| self.nodes[idx].parent.is_none())
      .collect()
  }

  /// Children of `idx` in render order: by sibling ordinal, arena index as
  /// the deterministic tiebreak.
  pub(crate) fn children_ordered(&self, idx: NodeIdx) -> Vec<NodeIdx> {
    let mut kids = self.nodes[idx].children.clone();
    kids.sort_by_key(|&k| (self.nodes[k].ordinal, k));
    kids
  }

  /// Insert a materialized node, linking it to its parent if present and
  /// adopting any orphans that were waiting for it. Returns the new index
  /// and the adopted child indices (the caller folds their informative
  /// counts into this node's chain).
  pub(crate) fn insert(&mut self, node: CtxNode<T>) -> (NodeIdx, Vec<NodeIdx>) {
    let idx = self.nodes.len();
    let key = node.key;
    debug_assert!(
      !self.by_key.contains_key(&key),
      "insert: key {key} already materialized"
    );
    if let Some(parent) = node.parent {
      self.nodes[parent].children.push(idx);
    }
    self.nodes.push(node);
    self.by_key.insert(key, idx);

    let adopted = self.pending.remove(&key).unwrap_or_default();
    for &child in &adopted {
      self.nodes[child].parent = Some(idx);
      self.nodes[idx].children.push(child);
    }
    (idx, adopted)
  }

  /// Record that `child` is waiting for an unmaterialized parent.
  pub(crate) fn mark_orphan(&mut self, parent_key: u64, child: NodeIdx) {
    self.pending.entry(parent_key).or_default().push(child);
  }

  /// Visibility of a node under the active detail policy, ignoring the
  /// monotonic flag. Top-level nodes are handled by the renderers, which
  /// always emit them for their window identity metadata.
  fn policy_visible(&self, idx: NodeIdx, detail: DetailLevel) -> bool {
    let node = &self.nodes[idx];
    if node.self_informative {
      return true;
    }
    match detail {
      DetailLevel::Detailed => node.has_informative_descendant,
      DetailLevel::Compact => node
        .role
        .informative_child_minimum()
        .is_some_and(|min| node.informative_descendants > min),
      DetailLevel::Minimal => node.parent.is_none() && node.informative_descendants > 0,
    }
  }

  /// Recompute visibility after an informativeness update. The first time a
  /// node flips visible, its deferred structural cost is charged.
  fn refresh_visibility(&mut self, idx: NodeIdx, detail: DetailLevel, budget: &mut Budget) {
    if self.nodes[idx].visible {
      return; // monotonic: once visible, stays visible
    }
    if self.policy_visible(idx, detail) {
      let node = &mut self.nodes[idx];
      node.visible = true;
      if !node.structural_charged {
        budget.charge(node.structural_cost);
        node.structural_charged = true;
      }
    }
  }

  /// Walk the ancestor chain from `start`, crediting `bump` newly discovered
  /// informative descendants to each ancestor and recomputing its
  /// visibility. Stops after updating the first ancestor that already knew
  /// it had an informative descendant - its own ancestors already know the
  /// branch is informative, so the walk's cost is proportional to new
  /// information, not tree depth.
  pub(crate) fn propagate_informative(
    &mut self,
    start: Option<NodeIdx>,
    bump: u32,
    detail: DetailLevel,
    budget: &mut Budget,
  ) {
    if bump == 0 {
      return;
    }
    let mut cursor = start;
    while let Some(idx) = cursor {
      let already_knew = self.nodes[idx].has_informative_descendant;
      {
        let node = &mut self.nodes[idx];
        node.informative_descendants += bump;
        node.has_informative_descendant = true;
      }
      self.refresh_visibility(idx, detail, budget);
      if already_knew {
        break;
      }
      cursor = self.nodes[idx].parent;
    }
  }

  /// Informative weight a subtree contributes when it is grafted onto a new
  /// parent: its own descendants plus the root itself when informative.
  pub(crate) fn subtree_informative_weight(&self, idx: NodeIdx) -> u32 {
    self.nodes[idx].informative_descendants + u32::from(self.nodes[idx].self_informative)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fake::{FakeElement, FakeTree};

  fn bare_node(tree: &FakeTree, idx: usize, role: Role, parent: Option<NodeIdx>) -> CtxNode<FakeElement> {
    CtxNode {
      element: tree.element(idx),
      key: idx as u64,
      role,
      attrs: NodeAttributes::default(),
      parent,
      children: Vec::new(),
      ordinal: 0,
      description: None,
      content: Vec::new(),
      structural_cost: 6,
      content_cost: 0,
      visible: false,
      self_informative: false,
      is_anchor: false,
      informative_descendants: 0,
      has_informative_descendant: false,
      structural_charged: false,
    }
  }

  fn three_level_tree() -> (FakeTree, usize, usize, usize) {
    let tree = FakeTree::new();
    let win = tree.add_root(Role::Window);
    let pane = tree.add(win, Role::Group);
    let leaf = tree.add(pane, Role::Button);
    (tree, win, pane, leaf)
  }

  #[test]
  fn insert_links_parent_and_children() {
    let (tree, win, pane, leaf) = three_level_tree();
    let mut arena: NodeArena<FakeElement> = NodeArena::new();
    let (w, _) = arena.insert(bare_node(&tree, win, Role::Window, None));
    let (p, _) = arena.insert(bare_node(&tree, pane, Role::Group, Some(w)));
    let (l, _) = arena.insert(bare_node(&tree, leaf, Role::Button, Some(p)));

    assert_eq!(arena.get(p).parent, Some(w));
    assert_eq!(arena.get(w).children, vec![p]);
    assert_eq!(arena.get(p).children, vec![l]);
    assert_eq!(arena.roots(), vec![w]);
  }

  #[test]
  fn orphans_are_adopted_when_parent_appears() {
    let (tree, _win, pane, leaf) = three_level_tree();
    let mut arena: NodeArena<FakeElement> = NodeArena::new();
    // Leaf discovered first (anchor), then its parent via the ancestor chain
    let (l, _) = arena.insert(bare_node(&tree, leaf, Role::Button, None));
    arena.mark_orphan(pane as u64, l);
    let (p, adopted) = arena.insert(bare_node(&tree, pane, Role::Group, None));

    assert_eq!(adopted, vec![l]);
    assert_eq!(arena.get(l).parent, Some(p));
    assert_eq!(arena.get(p).children, vec![l]);
    assert_eq!(arena.roots(), vec![p]);
  }

  #[test]
  fn children_ordered_by_ordinal_not_insertion() {
    let (tree, win, pane, leaf) = three_level_tree();
    let mut arena: NodeArena<FakeElement> = NodeArena::new();
    let (w, _) = arena.insert(bare_node(&tree, win, Role::Window, None));
    let mut late = bare_node(&tree, leaf, Role::Button, Some(w));
    late.ordinal = 2;
    let (l, _) = arena.insert(late);
    let mut early = bare_node(&tree, pane, Role::Group, Some(w));
    early.ordinal = -1;
    let (p, _) = arena.insert(early);

    assert_eq!(arena.get(w).children, vec![l, p]);
    assert_eq!(arena.children_ordered(w), vec![p, l]);
  }

  #[test]
  fn propagation_stops_at_first_known_informative_ancestor() {
    let (tree, win, pane, leaf) = three_level_tree();
    let mut arena: NodeArena<FakeElement> = NodeArena::new();
    let mut budget = Budget::new(1000);
    let (w, _) = arena.insert(bare_node(&tree, win, Role::Window, None));
    let (p, _) = arena.insert(bare_node(&tree, pane, Role::Group, Some(w)));
    arena.insert(bare_node(&tree, leaf, Role::Button, Some(p)));

    arena.propagate_informative(Some(p), 1, DetailLevel::Detailed, &mut budget);
    assert_eq!(arena.get(p).informative_descendants, 1);
    assert_eq!(arena.get(w).informative_descendants, 1);
    assert!(arena.get(p).has_informative_descendant);

    // Second signal from the same branch: pane already knew, walk stops there
    arena.propagate_informative(Some(p), 1, DetailLevel::Detailed, &mut budget);
    assert_eq!(arena.get(p).informative_descendants, 2);
    assert_eq!(arena.get(w).informative_descendants, 1);
  }

  #[test]
  fn visibility_is_monotonic_and_charges_once() {
    let (tree, win, pane, _leaf) = three_level_tree();
    let mut arena: NodeArena<FakeElement> = NodeArena::new();
    let mut budget = Budget::new(1000);
    let (w, _) = arena.insert(bare_node(&tree, win, Role::Window, None));
    let (p, _) = arena.insert(bare_node(&tree, pane, Role::Group, Some(w)));

    arena.propagate_informative(Some(p), 1, DetailLevel::Detailed, &mut budget);
    assert!(arena.get(p).visible);
    let charged_after_flip = budget.charged();
    assert_eq!(charged_after_flip, 6 + 6); // pane and window structural costs

    arena.propagate_informative(Some(p), 1, DetailLevel::Detailed, &mut budget);
    assert!(arena.get(p).visible);
    assert_eq!(budget.charged(), charged_after_flip); // no double charge
  }

  #[test]
  fn compact_policy_needs_enough_informative_descendants() {
    let tree = FakeTree::new();
    let win = tree.add_root(Role::Window);
    let list = tree.add(win, Role::List);
    let mut arena: NodeArena<FakeElement> = NodeArena::new();
    let mut budget = Budget::new(1000);
    let (l, _) = arena.insert(bare_node(&tree, list, Role::List, None));

    // List minimum is 1: a single informative descendant is not enough
    arena.propagate_informative(Some(l), 1, DetailLevel::Compact, &mut budget);
    assert!(!arena.get(l).visible);
    arena.propagate_informative(Some(l), 1, DetailLevel::Compact, &mut budget);
    assert!(arena.get(l).visible);
  }

  #[test]
  fn minimal_policy_only_shows_fragment_root() {
    let (tree, win, pane, _leaf) = three_level_tree();
    let mut arena: NodeArena<FakeElement> = NodeArena::new();
    let mut budget = Budget::new(1000);
    let (w, _) = arena.insert(bare_node(&tree, win, Role::Window, None));
    let (p, _) = arena.insert(bare_node(&tree, pane, Role::Group, Some(w)));

    arena.propagate_informative(Some(p), 1, DetailLevel::Minimal, &mut budget);
    assert!(!arena.get(p).visible, "non-root containers stay hidden");
    assert!(arena.get(w).visible, "the fragment root becomes visible");
  }
}
