/*!
Context builds: traversal orchestration and node materialization.

A build takes anchor elements, explores the live tree best-first under an
approximate token budget, and renders the materialized tree into one of two
textual forms plus an id map for later action resolution. Each build's state
(frontier, arena, budget) is exclusively owned by the invocation; the only
shared structure is the read-only live tree.
*/

use crate::arena::{CtxNode, NodeArena};
use crate::budget::Budget;
use crate::render::{self, IdAllocator};
use crate::tokens::estimate_tokens;
use crate::traverse::{self, Candidate, Direction, Frontier, Walker};
use crate::tree::{NodeAttributes, UiNode};
use crate::types::{CancelToken, ContextError, ContextResult, DetailLevel, NodeRef, OutputFormat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Cap on bounded-length text retrieval per element.
const MAX_TEXT_CHARS: usize = 2048;

/// Marker appended when content lines are clipped to fit the budget.
const ELLIPSIS: &str = "…";

/// Structural cost in abstract token units: tag plus id attribute.
const STRUCTURAL_COST_WITH_ID: u32 = 8;
/// Structural cost when no id attribute will be rendered.
const STRUCTURAL_COST_BARE: u32 = 6;
/// Extra structural cost when position/size attributes will be rendered.
const GEOMETRY_COST: u32 = 4;
/// Overhead of the multi-line block form (three or more content lines).
const MULTILINE_OVERHEAD: u32 = 2;

/// Why a group's traversal stopped. Diagnostic only - budget exhaustion is
/// the normal stopping condition, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
  /// Every reachable candidate was processed before the budget ran out.
  QueueDrained,
  /// The running cost total reached the budget.
  BudgetExhausted,
}

/// Rendered context for one anchor.
///
/// Anchors sharing a top-level window are built as one group; only the first
/// anchor of a group carries the text, the rest carry `None` so callers know
/// the content was deduplicated rather than missing.
#[derive(Debug, Clone)]
pub struct AnchorAttachment<T: UiNode> {
  pub anchor: T,
  pub content: Option<String>,
}

/// Result of one build invocation.
#[derive(Debug, Clone)]
pub struct ContextOutput<T: UiNode> {
  /// One attachment per input anchor, in input order.
  pub attachments: Vec<AnchorAttachment<T>>,
  /// Emitted ids mapped back to live elements, in emission order. Exactly
  /// the nodes that appear in the rendered text - nothing else gets an id.
  pub id_map: BTreeMap<NodeRef, T>,
  /// First id a subsequent build should use to avoid collisions.
  pub next_id: NodeRef,
  pub stop: StopReason,
}

/// Configures and runs context builds.
///
/// ```ignore
/// let output = ContextBuilder::new(400)
///   .detail(DetailLevel::Detailed)
///   .format(OutputFormat::Tagged)
///   .build(&anchors)?;
/// ```
#[derive(Debug, Clone)]
pub struct ContextBuilder {
  budget: u32,
  detail: DetailLevel,
  format: OutputFormat,
  start_id: NodeRef,
  cancel: CancelToken,
}

impl ContextBuilder {
  /// New builder with an approximate token budget shared by all anchors.
  pub fn new(budget: u32) -> Self {
    Self {
      budget,
      detail: DetailLevel::default(),
      format: OutputFormat::default(),
      start_id: NodeRef(1),
      cancel: CancelToken::new(),
    }
  }

  #[must_use]
  pub fn detail(mut self, detail: DetailLevel) -> Self {
    self.detail = detail;
    self
  }

  #[must_use]
  pub fn format(mut self, format: OutputFormat) -> Self {
    self.format = format;
    self
  }

  /// First sequential id to allocate. Lets multiple builds in one session
  /// produce non-colliding ids.
  #[must_use]
  pub fn start_id(mut self, id: NodeRef) -> Self {
    self.start_id = id;
    self
  }

  #[must_use]
  pub fn cancel_token(mut self, token: CancelToken) -> Self {
    self.cancel = token;
    self
  }

  /// Build a context from the given anchors.
  ///
  /// Anchors are grouped by top-level window; each group gets a budget share
  /// proportional to its anchor count and is traversed with private state,
  /// so groups are independent. Groups run sequentially here to keep emitted
  /// ids contiguous; hosts wanting parallelism run independent builds.
  pub fn build<T: UiNode>(&self, anchors: &[T]) -> ContextResult<ContextOutput<T>> {
    if anchors.is_empty() {
      return Err(ContextError::NoAnchors);
    }

    // Group anchor indices by window handle, preserving first-seen order.
    let mut groups: Vec<(u64, Vec<usize>)> = Vec::new();
    for (i, anchor) in anchors.iter().enumerate() {
      let handle = anchor.window_handle();
      match groups.iter_mut().find(|(h, _)| *h == handle) {
        Some((_, members)) => members.push(i),
        None => groups.push((handle, vec![i])),
      }
    }
    log::debug!(
      "context build: {} anchors in {} window groups, budget {}",
      anchors.len(),
      groups.len(),
      self.budget
    );

    let mut contents: Vec<Option<String>> = vec![None; anchors.len()];
    let mut ids = IdAllocator::new(self.start_id);
    let mut stop = StopReason::QueueDrained;

    for (handle, members) in groups {
      if self.cancel.is_cancelled() {
        return Err(ContextError::Cancelled);
      }
      let share = u64::from(self.budget) * members.len() as u64 / anchors.len() as u64;
      let share = u32::try_from(share).unwrap_or(u32::MAX);
      log::trace!("group hwnd={handle:#x}: {} anchors, budget share {share}", members.len());

      let group_anchors: Vec<T> = members.iter().map(|&i| anchors[i].clone()).collect();
      let (arena, group_stop) = self.traverse_group(group_anchors, share)?;
      if group_stop == StopReason::BudgetExhausted {
        stop = StopReason::BudgetExhausted;
      }
      if arena.is_empty() {
        log::warn!("group hwnd={handle:#x}: every anchor disappeared before materialization");
        continue;
      }
      let text = render::render(&arena, self.format, self.detail, &mut ids);
      // First anchor of the group carries the text; the rest stay None.
      if let Some(&first) = members.first() {
        contents[first] = Some(text);
      }
    }

    let (next_id, id_map) = ids.into_parts();
    let attachments = anchors
      .iter()
      .cloned()
      .zip(contents)
      .map(|(anchor, content)| AnchorAttachment { anchor, content })
      .collect();
    Ok(ContextOutput {
      attachments,
      id_map,
      next_id,
      stop,
    })
  }

  /// Best-first traversal of one window group.
  fn traverse_group<T: UiNode>(
    &self,
    anchors: Vec<T>,
    limit: u32,
  ) -> ContextResult<(NodeArena<T>, StopReason)> {
    let anchor_keys: HashSet<u64> = anchors.iter().map(UiNode::key).collect();
    let mut arena = NodeArena::new();
    let mut budget = Budget::new(limit);
    let mut frontier = Frontier::new();

    let mut rest = anchors.into_iter();
    if let Some(first) = rest.next() {
      frontier.push(Candidate::anchor(first, Some(Walker::anchors(rest))));
    }

    let stop = loop {
      if self.cancel.is_cancelled() {
        frontier.clear();
        return Err(ContextError::Cancelled);
      }
      if budget.is_exhausted() {
        frontier.clear();
        break StopReason::BudgetExhausted;
      }
      let Some(candidate) = frontier.pop() else {
        break StopReason::QueueDrained;
      };

      let key = candidate.element.key();
      if arena.contains_key(key) {
        // Already materialized via another path: skip without re-charging,
        // but keep the branch going past the duplicate.
        traverse::continue_walker(&mut frontier, candidate);
        continue;
      }
      let Some(attrs) = candidate.element.attributes() else {
        // Element disappeared between discovery and processing. Skip it and
        // never expand its branch, but keep consuming its walker: remaining
        // anchors and siblings are still live.
        log::debug!("element key={key:#x} disappeared during traversal, skipping");
        traverse::continue_walker(&mut frontier, candidate);
        continue;
      };

      let role = candidate.element.role();
      let (node, pending_parent) =
        self.materialize(&candidate, role, attrs, &anchor_keys, &arena, &mut budget);
      let self_informative = node.self_informative;
      let (idx, adopted) = arena.insert(node);
      if let Some(parent_key) = pending_parent {
        arena.mark_orphan(parent_key, idx);
      }
      // Grafted subtrees fold their informative weight into the new parent.
      for child in adopted {
        let bump = arena.subtree_informative_weight(child);
        arena.propagate_informative(Some(idx), bump, self.detail, &mut budget);
      }
      if self_informative {
        let parent = arena.get(idx).parent;
        arena.propagate_informative(parent, 1, self.detail, &mut budget);
      }

      traverse::expand(&mut frontier, candidate, role.is_top_level());
    };

    log::debug!(
      "group traversal stopped ({stop:?}): {} nodes, {} of {} units charged",
      arena.len(),
      budget.charged(),
      limit
    );
    Ok((arena, stop))
  }

  /// Convert a dequeued, not-yet-seen candidate into a persistent node and
  /// charge its cost against the running budget.
  fn materialize<T: UiNode>(
    &self,
    candidate: &Candidate<T>,
    role: crate::accessibility::Role,
    attrs: NodeAttributes,
    anchor_keys: &HashSet<u64>,
    arena: &NodeArena<T>,
    budget: &mut Budget,
  ) -> (CtxNode<T>, Option<u64>) {
    let element = &candidate.element;
    let key = element.key();
    let is_anchor = anchor_keys.contains(&key);

    let text = element.text(MAX_TEXT_CHARS);
    let content = fit_content(text.as_deref(), budget.remaining());
    // The name becomes a description only when it adds something beyond the
    // text content itself.
    let description = attrs
      .name
      .as_ref()
      .filter(|name| !name.trim().is_empty() && Some(name.as_str()) != text.as_deref())
      .cloned();

    let self_informative = !content.is_empty()
      || description.is_some()
      || role.is_interactive()
      || attrs.focused
      || attrs.selected
      || is_anchor;

    let mut structural_cost = if self.detail.wants_id(role) {
      STRUCTURAL_COST_WITH_ID
    } else {
      STRUCTURAL_COST_BARE
    };
    if self.detail.wants_geometry(role) && attrs.bounds.is_some() {
      structural_cost += GEOMETRY_COST;
    }
    let mut content_cost: u32 = content.iter().map(|line| estimate_tokens(line)).sum();
    if let Some(desc) = &description {
      content_cost += estimate_tokens(desc);
    }
    if content.len() >= 3 {
      content_cost += MULTILINE_OVERHEAD;
    }

    // Charging policy: informative and top-level nodes pay in full now;
    // everything else pays content now and structural on first visibility.
    let top_level = role.is_top_level();
    let charged_in_full = self_informative || top_level;
    if charged_in_full {
      budget.charge(structural_cost + content_cost);
    } else {
      budget.charge(content_cost);
    }

    // Parent linkage: child candidates were discovered from their parent;
    // everything else resolves through the live tree. A parent that exists
    // but is not materialized yet leaves this node an orphan until the
    // ancestor chain reaches it.
    let parent_element = match candidate.direction {
      Direction::Child => candidate.origin.clone(),
      Direction::Anchor
      | Direction::Parent
      | Direction::PrevSibling
      | Direction::NextSibling => element.parent(),
    };
    let (parent, pending_parent) = match parent_element {
      Some(p) => {
        let parent_key = p.key();
        match arena.lookup(parent_key) {
          Some(idx) => (Some(idx), None),
          None => (None, Some(parent_key)),
        }
      }
      None => (None, None),
    };

    let node = CtxNode {
      element: element.clone(),
      key,
      role,
      attrs,
      parent,
      children: Vec::new(),
      ordinal: candidate.ordinal,
      description,
      content,
      structural_cost,
      content_cost,
      visible: self_informative || top_level,
      self_informative,
      is_anchor,
      informative_descendants: 0,
      has_informative_descendant: false,
      structural_charged: charged_in_full,
    };
    (node, pending_parent)
  }
}

/// Keep content lines while their cumulative token estimate fits the
/// remaining budget; mark clipping with an ellipsis line.
fn fit_content(text: Option<&str>, remaining: u32) -> Vec<String> {
  let Some(text) = text else {
    return Vec::new();
  };
  let mut lines = Vec::new();
  let mut used: u32 = 0;
  for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
    let cost = estimate_tokens(line);
    if used.saturating_add(cost) > remaining {
      lines.push(ELLIPSIS.to_string());
      break;
    }
    used += cost;
    lines.push(line.to_string());
  }
  lines
}
