/*!
Best-first traversal over the live accessibility tree.

Anchors seed a priority queue; candidates expand outward along ancestors,
siblings, and children according to direction-specific rules until the token
budget is exhausted or the queue empties. Each branch keeps its own walker (a
lazy enumerator over one direction); re-queuing a walker yields a fresh
candidate for the next element of that branch.
*/

use crate::score;
use crate::tree::UiNode;
use std::collections::BinaryHeap;

/// How a candidate was reached from its neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
  Anchor,
  Parent,
  PrevSibling,
  NextSibling,
  Child,
}

impl Direction {
  /// Direction of the next candidate drawn from the same walker.
  ///
  /// Children after the first are siblings of the node that spawned them, so
  /// a child walker continues in the next-sibling lineage.
  pub(crate) fn continuation(self) -> Self {
    match self {
      Self::Child => Self::NextSibling,
      other => other,
    }
  }
}

/// Two-part distance from the anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Distance {
  /// Steps from any anchor.
  pub global: u32,
  /// Steps since the last direction change.
  pub local: u32,
}

impl Distance {
  pub(crate) const ANCHOR: Self = Self { global: 0, local: 0 };

  /// One more step in the current direction segment.
  pub(crate) const fn stepped(self) -> Self {
    Self {
      global: self.global + 1,
      local: self.local + 1,
    }
  }

  /// One more step overall, starting a new direction segment.
  pub(crate) const fn reset(self) -> Self {
    Self {
      global: self.global + 1,
      local: 1,
    }
  }
}

/// Lazy enumerator over one branch of the live tree.
///
/// Walkers are consumed one element per dequeue and re-queued inside the next
/// candidate. Dropping a walker releases the underlying handles, so clearing
/// the frontier releases every branch still pending at termination.
#[derive(Debug)]
pub(crate) enum Walker<T: UiNode> {
  /// Remaining anchors, processed first and unconditionally.
  Anchors(std::vec::IntoIter<T>),
  /// Ancestor chain; each step fetches `current.parent()`.
  Ancestors { current: T },
  /// Sibling chain in one direction, tracking the signed ordinal offset.
  Siblings {
    current: T,
    forward: bool,
    ordinal: i32,
  },
  /// Cached child list of one parent, in OS order.
  Children {
    parent: T,
    items: std::vec::IntoIter<T>,
    index: i32,
  },
}

/// Position of an element among its live siblings.
///
/// Anchors and parents are discovered without a sibling context, so their
/// ordinal is derived from the live tree. Keeps one ordering scheme across
/// discovery paths: every ordinal is an OS child index, whether it came from
/// a child walker, a sibling offset, or this count.
fn sibling_position<T: UiNode>(element: &T) -> i32 {
  let mut position = 0;
  let mut cursor = element.prev_sibling();
  while let Some(prev) = cursor {
    position += 1;
    cursor = prev.prev_sibling();
  }
  position
}

impl<T: UiNode> Walker<T> {
  pub(crate) fn anchors(rest: std::vec::IntoIter<T>) -> Self {
    Self::Anchors(rest)
  }

  pub(crate) fn ancestors_of(element: &T) -> Self {
    Self::Ancestors {
      current: element.clone(),
    }
  }

  pub(crate) fn siblings_of(element: &T, forward: bool, ordinal: i32) -> Self {
    Self::Siblings {
      current: element.clone(),
      forward,
      ordinal,
    }
  }

  pub(crate) fn children_of(element: &T) -> Self {
    Self::Children {
      parent: element.clone(),
      items: element.children().into_iter(),
      index: 0,
    }
  }

  /// Advance to the next element of this branch.
  ///
  /// Returns the element, the neighbor that produced it (used for scoring
  /// and parent linkage), and its sibling ordinal. `None` means the branch
  /// is exhausted and the walker can be dropped.
  pub(crate) fn advance(&mut self) -> Option<(T, Option<T>, i32)> {
    match self {
      Self::Anchors(rest) => rest.next().map(|el| {
        let position = sibling_position(&el);
        (el, None, position)
      }),
      Self::Ancestors { current } => {
        let parent = current.parent()?;
        let position = sibling_position(&parent);
        let origin = std::mem::replace(current, parent.clone());
        Some((parent, Some(origin), position))
      }
      Self::Siblings {
        current,
        forward,
        ordinal,
      } => {
        let next = if *forward {
          current.next_sibling()?
        } else {
          current.prev_sibling()?
        };
        *ordinal += if *forward { 1 } else { -1 };
        let origin = std::mem::replace(current, next.clone());
        Some((next, Some(origin), *ordinal))
      }
      Self::Children {
        parent,
        items,
        index,
      } => {
        let item = items.next()?;
        let ordinal = *index;
        *index += 1;
        Some((item, Some(parent.clone()), ordinal))
      }
    }
  }
}

/// One step of the search: an element plus everything needed to score it,
/// link it, and continue its branch. Consumed exactly once.
#[derive(Debug)]
pub(crate) struct Candidate<T: UiNode> {
  pub element: T,
  /// The already-discovered neighbor that produced this candidate.
  pub origin: Option<T>,
  pub direction: Direction,
  pub distance: Distance,
  /// Sibling ordinal used to re-derive render order.
  pub ordinal: i32,
  /// Enumerator that continues this branch, re-queued on expansion.
  pub walker: Option<Walker<T>>,
}

impl<T: UiNode> Candidate<T> {
  pub(crate) fn anchor(element: T, walker: Option<Walker<T>>) -> Self {
    let ordinal = sibling_position(&element);
    Self {
      element,
      origin: None,
      direction: Direction::Anchor,
      distance: Distance::ANCHOR,
      ordinal,
      walker,
    }
  }
}

struct Entry<T: UiNode> {
  priority: f64,
  seq: u64,
  candidate: Candidate<T>,
}

impl<T: UiNode> PartialEq for Entry<T> {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other).is_eq()
  }
}

impl<T: UiNode> Eq for Entry<T> {}

impl<T: UiNode> PartialOrd for Entry<T> {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl<T: UiNode> Ord for Entry<T> {
  // Inverted: BinaryHeap is a max-heap, we pop the lowest priority value.
  // Ties break FIFO by insertion sequence for determinism.
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    other
      .priority
      .total_cmp(&self.priority)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

/// Min-priority queue of candidates.
pub(crate) struct Frontier<T: UiNode> {
  heap: BinaryHeap<Entry<T>>,
  seq: u64,
}

impl<T: UiNode> Frontier<T> {
  pub(crate) fn new() -> Self {
    Self {
      heap: BinaryHeap::new(),
      seq: 0,
    }
  }

  pub(crate) fn push(&mut self, candidate: Candidate<T>) {
    let priority = score::candidate_priority(&candidate);
    let seq = self.seq;
    self.seq += 1;
    self.heap.push(Entry {
      priority,
      seq,
      candidate,
    });
  }

  pub(crate) fn pop(&mut self) -> Option<Candidate<T>> {
    self.heap.pop().map(|entry| entry.candidate)
  }

  /// Release every pending branch. Walkers held by un-dequeued candidates
  /// are dropped here; required before unwinding on cancel or termination.
  pub(crate) fn clear(&mut self) {
    self.heap.clear();
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.heap.is_empty()
  }
}

/// Continue a candidate's own branch without opening new directions.
///
/// Used when the dequeued element was already materialized (dedup) - the
/// duplicate is skipped but its branch keeps going past it.
pub(crate) fn continue_walker<T: UiNode>(frontier: &mut Frontier<T>, mut candidate: Candidate<T>) {
  if let Some(walker) = candidate.walker.take() {
    let direction = candidate.direction.continuation();
    let distance = match candidate.direction {
      Direction::Anchor => Distance::ANCHOR,
      _ => candidate.distance.stepped(),
    };
    push_next(frontier, walker, direction, distance);
  }
}

/// Fire the direction-specific expansion rules for a freshly materialized
/// candidate: continue its walker and open the neighboring directions.
pub(crate) fn expand<T: UiNode>(
  frontier: &mut Frontier<T>,
  mut candidate: Candidate<T>,
  top_level: bool,
) {
  // Continue this branch. Parent chains stop at top-level windows.
  if let Some(walker) = candidate.walker.take() {
    let blocked = candidate.direction == Direction::Parent && top_level;
    if !blocked {
      let direction = candidate.direction.continuation();
      let distance = match candidate.direction {
        Direction::Anchor => Distance::ANCHOR,
        _ => candidate.distance.stepped(),
      };
      push_next(frontier, walker, direction, distance);
    }
  }

  let element = &candidate.element;
  match candidate.direction {
    Direction::Anchor => {
      if !top_level {
        push_next(
          frontier,
          Walker::ancestors_of(element),
          Direction::Parent,
          Distance::ANCHOR.reset(),
        );
        push_next(
          frontier,
          Walker::siblings_of(element, false, candidate.ordinal),
          Direction::PrevSibling,
          Distance::ANCHOR.reset(),
        );
        push_next(
          frontier,
          Walker::siblings_of(element, true, candidate.ordinal),
          Direction::NextSibling,
          Distance::ANCHOR.reset(),
        );
      }
      push_next(
        frontier,
        Walker::children_of(element),
        Direction::Child,
        Distance::ANCHOR.reset(),
      );
    }
    Direction::Parent => {
      if !top_level {
        push_next(
          frontier,
          Walker::siblings_of(element, false, candidate.ordinal),
          Direction::PrevSibling,
          candidate.distance.reset(),
        );
        push_next(
          frontier,
          Walker::siblings_of(element, true, candidate.ordinal),
          Direction::NextSibling,
          candidate.distance.reset(),
        );
      }
    }
    Direction::PrevSibling | Direction::NextSibling | Direction::Child => {
      push_next(
        frontier,
        Walker::children_of(element),
        Direction::Child,
        candidate.distance.reset(),
      );
    }
  }
}

fn push_next<T: UiNode>(
  frontier: &mut Frontier<T>,
  mut walker: Walker<T>,
  direction: Direction,
  distance: Distance,
) {
  if let Some((element, origin, ordinal)) = walker.advance() {
    frontier.push(Candidate {
      element,
      origin,
      direction,
      distance,
      ordinal,
      walker: Some(walker),
    });
  }
}
