/*! Running token-budget ledger for one build invocation. */

/// Tracks cost units charged against an approximate token budget.
///
/// Charges are never refused: the node that crosses the limit is still
/// charged in full, so a build may overshoot by at most one node's cost.
/// The exhaustion check happens between dequeues, never mid-node.
#[derive(Debug)]
pub(crate) struct Budget {
  limit: u32,
  charged: u32,
}

impl Budget {
  pub(crate) const fn new(limit: u32) -> Self {
    Self { limit, charged: 0 }
  }

  pub(crate) fn charge(&mut self, cost: u32) {
    self.charged = self.charged.saturating_add(cost);
  }

  pub(crate) const fn remaining(&self) -> u32 {
    self.limit.saturating_sub(self.charged)
  }

  pub(crate) const fn is_exhausted(&self) -> bool {
    self.charged >= self.limit
  }

  pub(crate) const fn charged(&self) -> u32 {
    self.charged
  }
}
