/*!
Synthetic in-memory accessibility tree for tests.

Implements the `UiNode` cursor over plain vectors so the whole crate can be
exercised without platform APIs. Elements can be "killed" to simulate a
process exiting between discovery and processing.
*/

use crate::accessibility::Role;
use crate::tree::{NodeAttributes, UiNode};
use crate::types::Bounds;
use std::cell::RefCell;
use std::rc::Rc;

const FAKE_PID: u32 = 100;

#[derive(Debug)]
struct FakeData {
  role: Role,
  name: Option<String>,
  text: Option<String>,
  bounds: Option<Bounds>,
  url: Option<String>,
  focused: bool,
  selected: bool,
  parent: Option<usize>,
  children: Vec<usize>,
  alive: bool,
}

/// Builder-style synthetic tree shared by its element handles.
#[derive(Debug, Clone)]
pub(crate) struct FakeTree {
  inner: Rc<RefCell<Vec<FakeData>>>,
}

impl FakeTree {
  pub(crate) fn new() -> Self {
    Self {
      inner: Rc::new(RefCell::new(Vec::new())),
    }
  }

  pub(crate) fn add_root(&self, role: Role) -> usize {
    self.push(None, role)
  }

  pub(crate) fn add(&self, parent: usize, role: Role) -> usize {
    self.push(Some(parent), role)
  }

  fn push(&self, parent: Option<usize>, role: Role) -> usize {
    let mut nodes = self.inner.borrow_mut();
    let idx = nodes.len();
    nodes.push(FakeData {
      role,
      name: None,
      text: None,
      bounds: None,
      url: None,
      focused: false,
      selected: false,
      parent,
      children: Vec::new(),
      alive: true,
    });
    if let Some(p) = parent {
      nodes[p].children.push(idx);
    }
    idx
  }

  pub(crate) fn set_name(&self, idx: usize, name: &str) {
    self.inner.borrow_mut()[idx].name = Some(name.to_string());
  }

  pub(crate) fn set_text(&self, idx: usize, text: &str) {
    self.inner.borrow_mut()[idx].text = Some(text.to_string());
  }

  pub(crate) fn set_bounds(&self, idx: usize, bounds: Bounds) {
    self.inner.borrow_mut()[idx].bounds = Some(bounds);
  }

  pub(crate) fn set_url(&self, idx: usize, url: &str) {
    self.inner.borrow_mut()[idx].url = Some(url.to_string());
  }

  #[allow(dead_code)]
  pub(crate) fn set_focused(&self, idx: usize, focused: bool) {
    self.inner.borrow_mut()[idx].focused = focused;
  }

  #[allow(dead_code)]
  pub(crate) fn set_selected(&self, idx: usize, selected: bool) {
    self.inner.borrow_mut()[idx].selected = selected;
  }

  /// Simulate the element disappearing (process exit, window close).
  pub(crate) fn kill(&self, idx: usize) {
    self.inner.borrow_mut()[idx].alive = false;
  }

  pub(crate) fn element(&self, idx: usize) -> FakeElement {
    FakeElement {
      inner: Rc::clone(&self.inner),
      idx,
    }
  }
}

/// Handle to one synthetic element.
#[derive(Debug, Clone)]
pub(crate) struct FakeElement {
  inner: Rc<RefCell<Vec<FakeData>>>,
  idx: usize,
}

impl FakeElement {
  pub(crate) fn idx(&self) -> usize {
    self.idx
  }

  fn alive(&self) -> bool {
    self.inner.borrow()[self.idx].alive
  }

  fn sibling(&self, step: isize) -> Option<FakeElement> {
    if !self.alive() {
      return None;
    }
    let nodes = self.inner.borrow();
    let parent = nodes[self.idx].parent?;
    let siblings = &nodes[parent].children;
    let pos = siblings.iter().position(|&c| c == self.idx)?;
    let target = pos.checked_add_signed(step)?;
    let idx = *siblings.get(target)?;
    Some(FakeElement {
      inner: Rc::clone(&self.inner),
      idx,
    })
  }
}

impl UiNode for FakeElement {
  fn key(&self) -> u64 {
    self.idx as u64
  }

  fn role(&self) -> Role {
    self.inner.borrow()[self.idx].role
  }

  fn attributes(&self) -> Option<NodeAttributes> {
    let nodes = self.inner.borrow();
    let data = &nodes[self.idx];
    if !data.alive {
      return None;
    }
    Some(NodeAttributes {
      name: data.name.clone(),
      bounds: data.bounds,
      url: data.url.clone(),
      focused: data.focused,
      selected: data.selected,
    })
  }

  fn text(&self, max_chars: usize) -> Option<String> {
    let nodes = self.inner.borrow();
    let data = &nodes[self.idx];
    if !data.alive {
      return None;
    }
    data.text.as_ref().map(|t| t.chars().take(max_chars).collect())
  }

  fn parent(&self) -> Option<Self> {
    if !self.alive() {
      return None;
    }
    let parent = self.inner.borrow()[self.idx].parent?;
    Some(FakeElement {
      inner: Rc::clone(&self.inner),
      idx: parent,
    })
  }

  fn children(&self) -> Vec<Self> {
    if !self.alive() {
      return Vec::new();
    }
    self.inner.borrow()[self.idx]
      .children
      .iter()
      .map(|&idx| FakeElement {
        inner: Rc::clone(&self.inner),
        idx,
      })
      .collect()
  }

  fn prev_sibling(&self) -> Option<Self> {
    self.sibling(-1)
  }

  fn next_sibling(&self) -> Option<Self> {
    self.sibling(1)
  }

  fn process_id(&self) -> u32 {
    FAKE_PID
  }

  fn window_handle(&self) -> u64 {
    let nodes = self.inner.borrow();
    let mut cursor = Some(self.idx);
    while let Some(idx) = cursor {
      if nodes[idx].role.is_top_level() {
        return idx as u64;
      }
      cursor = nodes[idx].parent;
    }
    0
  }
}
