/*!
Relevance scoring for traversal candidates.

Scores are "goodness" values built from the direction base, distance decay,
role weight, and on-screen size, then negated so the min-priority frontier
pops the best candidate first. Anchors always score `NEG_INFINITY` and are
processed unconditionally before anything else.
*/

use crate::traverse::{Candidate, Direction};
use crate::tree::UiNode;

const PARENT_BASE: f64 = 2000.0;
const SIBLING_BASE: f64 = 10000.0;
const CHILD_BASE: f64 = 1000.0;

/// Size factor is relative to a 1920x1080 screen.
const REFERENCE_SCREEN_AREA: f64 = 1920.0 * 1080.0;

/// Bounding dimensions below this many pixels mark a near-invisible control.
const SLIVER_THRESHOLD_PX: f64 = 5.0;
const SLIVER_PENALTY: f64 = 0.1;

/// Priority of a candidate; lower pops first.
pub(crate) fn candidate_priority<T: UiNode>(candidate: &Candidate<T>) -> f64 {
  let base = match candidate.direction {
    Direction::Anchor => return f64::NEG_INFINITY,
    Direction::Parent => PARENT_BASE,
    Direction::PrevSibling | Direction::NextSibling => SIBLING_BASE,
    Direction::Child => CHILD_BASE,
  };

  let mut score = base;

  // Decay as a branch gets deeper within its current direction segment.
  if candidate.distance.local > 0 {
    score /= f64::from(candidate.distance.local);
  }

  // Linear penalty for accumulated direction switches.
  score -= f64::from(candidate.distance.global - candidate.distance.local);

  // Parent candidates are weighted by themselves; child candidates by the
  // element whose children are being enumerated. Siblings carry no intrinsic
  // weight, so one small element cannot block the rest of its run.
  let weighted = match candidate.direction {
    Direction::Parent => Some(&candidate.element),
    Direction::Child => candidate.origin.as_ref(),
    Direction::PrevSibling | Direction::NextSibling | Direction::Anchor => None,
  };

  if let Some(element) = weighted {
    score *= element.role().score_weight();
    if let Some(bounds) = element.attributes().and_then(|a| a.bounds) {
      let area = bounds.area();
      if area > 0.0 {
        score *= 1.0 + area / REFERENCE_SCREEN_AREA;
      }
      if bounds.is_sliver(SLIVER_THRESHOLD_PX) {
        score *= SLIVER_PENALTY;
      }
    }
  }

  -score
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::accessibility::Role;
  use crate::fake::FakeTree;
  use crate::traverse::Distance;
  use crate::types::Bounds;

  fn candidate(
    tree: &FakeTree,
    idx: usize,
    origin: Option<usize>,
    direction: Direction,
    distance: Distance,
  ) -> Candidate<crate::fake::FakeElement> {
    Candidate {
      element: tree.element(idx),
      origin: origin.map(|o| tree.element(o)),
      direction,
      distance,
      ordinal: 0,
      walker: None,
    }
  }

  #[test]
  fn anchors_always_win() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let c = candidate(&tree, root, None, Direction::Anchor, Distance::ANCHOR);
    assert_eq!(candidate_priority(&c), f64::NEG_INFINITY);
  }

  #[test]
  fn sibling_base_outranks_parent_outranks_child() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let pane = tree.add(root, Role::Unknown);
    let a = tree.add(pane, Role::Unknown);
    let step = Distance { global: 1, local: 1 };

    let child = candidate(&tree, a, Some(pane), Direction::Child, step);
    let parent = candidate(&tree, pane, Some(a), Direction::Parent, step);
    let sibling = candidate(&tree, a, Some(a), Direction::NextSibling, step);

    // Lower priority value pops first. Unknown roles and no bounds keep the
    // direction bases undisturbed; child (via its Unknown origin) leads.
    let (pc, pp, ps) = (
      candidate_priority(&child),
      candidate_priority(&parent),
      candidate_priority(&sibling),
    );
    assert!(ps < pp, "siblings carry the largest base: {ps} vs {pp}");
    assert!(pp < pc, "parents outrank children: {pp} vs {pc}");
  }

  #[test]
  fn local_distance_decays_a_branch() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let pane = tree.add(root, Role::Unknown);
    let a = tree.add(pane, Role::Unknown);

    let near = candidate(
      &tree,
      a,
      Some(a),
      Direction::NextSibling,
      Distance { global: 1, local: 1 },
    );
    let far = candidate(
      &tree,
      a,
      Some(a),
      Direction::NextSibling,
      Distance { global: 5, local: 5 },
    );
    assert!(candidate_priority(&near) < candidate_priority(&far));
  }

  #[test]
  fn semantic_parent_outranks_decorative_parent() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let doc = tree.add(root, Role::Document);
    let img = tree.add(root, Role::Image);
    let step = Distance { global: 1, local: 1 };

    let doc_parent = candidate(&tree, doc, None, Direction::Parent, step);
    let img_parent = candidate(&tree, img, None, Direction::Parent, step);
    assert!(candidate_priority(&doc_parent) < candidate_priority(&img_parent));
  }

  #[test]
  fn larger_elements_score_better() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let big = tree.add(root, Role::Group);
    let small = tree.add(root, Role::Group);
    tree.set_bounds(big, Bounds::new(0.0, 0.0, 1920.0, 1080.0));
    tree.set_bounds(small, Bounds::new(0.0, 0.0, 100.0, 100.0));
    let step = Distance { global: 1, local: 1 };

    let big_c = candidate(&tree, big, None, Direction::Parent, step);
    let small_c = candidate(&tree, small, None, Direction::Parent, step);
    assert!(candidate_priority(&big_c) < candidate_priority(&small_c));
  }

  #[test]
  fn sliver_elements_are_penalized() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let sliver = tree.add(root, Role::Button);
    let normal = tree.add(root, Role::Button);
    tree.set_bounds(sliver, Bounds::new(0.0, 0.0, 2.0, 400.0));
    tree.set_bounds(normal, Bounds::new(0.0, 0.0, 80.0, 24.0));
    let step = Distance { global: 1, local: 1 };

    let sliver_c = candidate(&tree, sliver, None, Direction::Parent, step);
    let normal_c = candidate(&tree, normal, None, Direction::Parent, step);
    assert!(candidate_priority(&normal_c) < candidate_priority(&sliver_c));
  }

  #[test]
  fn siblings_ignore_their_own_role() {
    let tree = FakeTree::new();
    let root = tree.add_root(Role::Window);
    let img = tree.add(root, Role::Image);
    let doc = tree.add(root, Role::Document);
    let step = Distance { global: 2, local: 1 };

    let img_s = candidate(&tree, img, Some(doc), Direction::NextSibling, step);
    let doc_s = candidate(&tree, doc, Some(img), Direction::PrevSibling, step);
    assert!(candidate_priority(&img_s).total_cmp(&candidate_priority(&doc_s)).is_eq());
  }
}

#[cfg(test)]
mod proptests {
  use super::*;
  use crate::accessibility::Role;
  use crate::fake::FakeTree;
  use crate::traverse::Distance;
  use proptest::prelude::*;

  proptest! {
    /// Non-anchor scores are always finite, so heap ordering is total.
    #[test]
    fn non_anchor_scores_are_finite(global in 1u32..50, extra in 0u32..50) {
      let tree = FakeTree::new();
      let root = tree.add_root(Role::Window);
      let el = tree.add(root, Role::Button);
      let c = Candidate {
        element: tree.element(el),
        origin: Some(tree.element(root)),
        direction: Direction::Child,
        distance: Distance { global: global + extra, local: global },
        ordinal: 0,
        walker: None,
      };
      prop_assert!(candidate_priority(&c).is_finite());
    }
  }
}
