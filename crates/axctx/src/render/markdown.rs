/*!
Heading/inline renderer.

Containers with content become headings (capped at six levels), containers
without content are transparent pass-throughs, links render as inline link
syntax, list items as bullets with indented children, and other emitted
nodes as an inline tag marker plus text. Consecutive simple labels coalesce
into one text run. Top-level nodes keep the tagged form even here, so window
identity metadata survives the compact rendering.
*/

use super::{escape_attr, IdAllocator, OMITTED};
use crate::accessibility::Role;
use crate::arena::{CtxNode, NodeArena, NodeIdx};
use crate::tree::{NodeAttributes, UiNode};
use crate::types::DetailLevel;

const MAX_HEADING_LEVEL: usize = 6;

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
      open_top_level(&el, attrs.name.as_deref(), ids, out);
      out.push_str(&format!("{OMITTED}\n"));
      render_children(arena, &roots, 1, 0, detail, ids, out);
      out.push_str(&format!("</{}>\n", el.role().short_tag()));
    }
    None => render_children(arena, &roots, 1, 0, detail, ids, out),
  }
}

fn open_top_level<T: UiNode>(
  element: &T,
  name: Option<&str>,
  ids: &mut IdAllocator<T>,
  out: &mut String,
) {
  let tag = element.role().short_tag();
  let id = ids.allocate(element);
  out.push_str(&format!(
    "<{tag} id={id} pid={} hwnd={:#x}",
    element.process_id(),
    element.window_handle()
  ));
  if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
    out.push_str(&format!(" desc=\"{}\"", escape_attr(name)));
  }
  out.push_str(">\n");
}

/// Render a sibling run, coalescing consecutive simple labels into a single
/// concatenated text line instead of one render call each.
fn render_children<T: UiNode>(
  arena: &NodeArena<T>,
  kids: &[NodeIdx],
  level: usize,
  indent: usize,
  detail: DetailLevel,
  ids: &mut IdAllocator<T>,
  out: &mut String,
) {
  let mut run: Vec<&str> = Vec::new();
  for &kid in kids {
    let child = arena.get(kid);
    // Anchors never coalesce: they must keep their marker.
    let simple_label = child.role == Role::StaticText
      && child.children.is_empty()
      && child.visible
      && !child.content.is_empty()
      && !child.is_anchor;
    if simple_label {
      run.extend(child.content.iter().map(String::as_str));
      continue;
    }
    flush_run(&mut run, indent, out);
    node(arena, kid, level, indent, detail, ids, out);
  }
  flush_run(&mut run, indent, out);
}

fn flush_run(run: &mut Vec<&str>, indent: usize, out: &mut String) {
  if run.is_empty() {
    return;
  }
  out.push_str(&format!("{}{}\n", "  ".repeat(indent), run.join(" ")));
  run.clear();
}

fn node<T: UiNode>(
  arena: &NodeArena<T>,
  idx: NodeIdx,
  level: usize,
  indent: usize,
  detail: DetailLevel,
  ids: &mut IdAllocator<T>,
  out: &mut String,
) {
  let n = arena.get(idx);
  let kids = arena.children_ordered(idx);

  if n.role.is_top_level() {
    open_top_level(&n.element, n.attrs.name.as_deref(), ids, out);
    render_children(arena, &kids, level, indent, detail, ids, out);
    out.push_str(&format!("</{}>\n", n.role.short_tag()));
    return;
  }

  if !n.visible {
    render_children(arena, &kids, level, indent, detail, ids, out);
    return;
  }

  match n.role {
    Role::Link => {
      let url = n.attrs.url.as_deref().unwrap_or("");
      let line = format!("{} [{}]({url})", marker(n, detail, ids), node_text(n));
      out.push_str(&format!("{}{}\n", "  ".repeat(indent), line.trim()));
      render_children(arena, &kids, level, indent, detail, ids, out);
    }
    Role::ListItem => {
      let line = format!("- {} {}", marker(n, detail, ids), node_text(n));
      out.push_str(&format!("{}{}\n", "  ".repeat(indent), collapse_spaces(&line)));
      render_children(arena, &kids, level, indent + 1, detail, ids, out);
    }
    role if role.is_container() => {
      if n.content.is_empty() && n.description.is_none() {
        // Transparent pass-through: no heading, no level increase.
        render_children(arena, &kids, level, indent, detail, ids, out);
        return;
      }
      let hashes = "#".repeat(level.min(MAX_HEADING_LEVEL));
      out.push_str(&format!("{hashes} {}\n", heading_text(n)));
      for line in content_after_heading(n) {
        out.push_str(&format!("{line}\n"));
      }
      render_children(arena, &kids, level + 1, indent, detail, ids, out);
    }
    _ => {
      let line = format!("{} {}", marker(n, detail, ids), node_text(n));
      out.push_str(&format!("{}{}\n", "  ".repeat(indent), line.trim_end()));
      render_children(arena, &kids, level, indent, detail, ids, out);
    }
  }
}

/// Inline tag marker, allocating an id when the role warrants one.
fn marker<T: UiNode>(n: &CtxNode<T>, detail: DetailLevel, ids: &mut IdAllocator<T>) -> String {
  let tag = n.role.short_tag();
  let mut m = format!("<{tag}");
  if detail.wants_id(n.role) {
    let id = ids.allocate(&n.element);
    m.push_str(&format!(" id={id}"));
  }
  if n.is_anchor {
    m.push_str(" anchor");
  }
  m.push('>');
  m
}

fn node_text<T: UiNode>(n: &CtxNode<T>) -> String {
  match (&n.description, n.content.is_empty()) {
    (Some(desc), true) => desc.clone(),
    (Some(desc), false) => format!("{desc}: {}", n.content.join(" ")),
    (None, false) => n.content.join(" "),
    (None, true) => String::new(),
  }
}

fn heading_text<T: UiNode>(n: &CtxNode<T>) -> String {
  n.description
    .clone()
    .or_else(|| n.content.first().cloned())
    .unwrap_or_default()
}

/// Content lines not consumed by the heading line itself.
fn content_after_heading<T: UiNode>(n: &CtxNode<T>) -> &[String] {
  if n.description.is_some() {
    &n.content
  } else {
    n.content.get(1..).unwrap_or(&[])
  }
}

fn collapse_spaces(line: &str) -> String {
  line.split_whitespace().collect::<Vec<_>>().join(" ")
}
