/*!
Tagged-markup renderer.

Nested tags with attributes, two-space indentation per depth. Invisible
non-top-level nodes are skipped but their children render at the same depth
(pass-through). Nodes without children or content self-close.
*/

use super::{escape_attr, IdAllocator, OMITTED};
use crate::arena::{NodeArena, NodeIdx};
use crate::tree::{NodeAttributes, UiNode};
use crate::types::DetailLevel;

pub(super) fn render<T: UiNode>(
  arena: &NodeArena<T>,
  detail: DetailLevel,
  ids: &mut IdAllocator<T>,
  wrapper: Option<(T, NodeAttributes)>,
  out: &mut String,
) {
  let roots = arena.roots();
  match wrapper {
    Some((el, attrs)) => {
      let tag = el.role().short_tag();
      let id = ids.allocate(&el);
      out.push_str(&format!(
        "<{tag} id={id} pid={} hwnd={:#x}",
        el.process_id(),
        el.window_handle()
      ));
      if let Some(name) = attrs.name.as_deref().filter(|n| !n.trim().is_empty()) {
        out.push_str(&format!(" desc=\"{}\"", escape_attr(name)));
      }
      out.push_str(">\n");
      out.push_str(&format!("  {OMITTED}\n"));
      for root in roots {
        node(arena, root, 1, detail, ids, out);
      }
      out.push_str(&format!("</{tag}>\n"));
    }
    None => {
      for root in roots {
        node(arena, root, 0, detail, ids, out);
      }
    }
  }
}

fn node<T: UiNode>(
  arena: &NodeArena<T>,
  idx: NodeIdx,
  depth: usize,
  detail: DetailLevel,
  ids: &mut IdAllocator<T>,
  out: &mut String,
) {
  let n = arena.get(idx);
  let kids = arena.children_ordered(idx);

  // Invisible nodes pass their children through at the same depth.
  if !n.visible && !n.role.is_top_level() {
    for kid in kids {
      node(arena, kid, depth, detail, ids, out);
    }
    return;
  }

  let indent = "  ".repeat(depth);
  let tag = n.role.short_tag();
  let mut open = format!("{indent}<{tag}");
  if detail.wants_id(n.role) {
    let id = ids.allocate(&n.element);
    open.push_str(&format!(" id={id}"));
  }
  if n.is_anchor {
    open.push_str(" anchor");
  }
  if detail.wants_geometry(n.role) {
    if let Some(b) = n.attrs.bounds {
      open.push_str(&format!(
        " pos=\"{:.0},{:.0}\" size=\"{:.0}x{:.0}\"",
        b.x, b.y, b.w, b.h
      ));
    }
  }
  if n.role.is_top_level() {
    open.push_str(&format!(
      " pid={} hwnd={:#x}",
      n.element.process_id(),
      n.element.window_handle()
    ));
  }
  if let Some(desc) = &n.description {
    open.push_str(&format!(" desc=\"{}\"", escape_attr(desc)));
  }

  if kids.is_empty() && n.content.is_empty() {
    out.push_str(&format!("{open} />\n"));
    return;
  }

  // Inline form for one or two content lines, indented block for three or
  // more.
  let inline = !n.content.is_empty() && n.content.len() <= 2;
  if inline && kids.is_empty() {
    out.push_str(&format!("{open}>{}</{tag}>\n", n.content.join(" ")));
    return;
  }
  if inline {
    out.push_str(&format!("{open}>{}\n", n.content.join(" ")));
  } else {
    out.push_str(&format!("{open}>\n"));
    for line in &n.content {
      out.push_str(&format!("{indent}  {line}\n"));
    }
  }
  for kid in kids {
    node(arena, kid, depth + 1, detail, ids, out);
  }
  out.push_str(&format!("{indent}</{tag}>\n"));
}
