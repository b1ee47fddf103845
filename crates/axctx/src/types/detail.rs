/*! Detail level and output format selectors. */

use crate::accessibility::Role;
use serde::{Deserialize, Serialize};

/// How aggressively non-informative containers are suppressed, and how many
/// attributes emitted nodes carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
  /// Only self-informative nodes (and the fragment root) are rendered.
  Minimal,
  /// Containers appear once they group enough informative content.
  #[default]
  Compact,
  /// Any container with informative descendants is rendered, with geometry.
  Detailed,
}

impl DetailLevel {
  /// Should an emitted node of this role carry a sequential id attribute?
  ///
  /// Ids exist so a later action ("click element 7") can resolve back to a
  /// live element, so interactive roles get one at every detail level.
  /// Top-level nodes get one too: callers use them to address windows.
  pub fn wants_id(self, role: Role) -> bool {
    match self {
      Self::Minimal | Self::Compact | Self::Detailed => {
        role.is_interactive() || role.is_top_level()
      }
    }
  }

  /// Should an emitted node of this role carry `pos`/`size` attributes?
  pub fn wants_geometry(self, role: Role) -> bool {
    matches!(self, Self::Detailed) && (role.is_interactive() || role.is_top_level())
  }
}

/// Which textual form a build emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// Nested tags with attributes.
  #[default]
  Tagged,
  /// Headings and inline runs.
  Markdown,
}
