//! Semantic UI roles.
//!
//! Roles describe what an element *is* in the UI hierarchy. The set is closed
//! and finite, so weighting and tag lookup are exhaustive matches rather than
//! dynamic dispatch.

use serde::{Deserialize, Serialize};

/// Semantic UI role (cross-platform).
///
/// Inspired by WAI-ARIA but simplified for context serialization. Platform
/// mappings are handled by the accessibility layer implementing `UiNode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  // === Structural / Containers ===
  Screen,
  Window,
  Application,
  Document,
  Group,
  ScrollArea,
  Toolbar,

  // === Navigation ===
  Menu,
  MenuBar,
  MenuItem,
  Tab,
  TabList,

  // === Collections ===
  List,
  ListItem,
  Table,
  Row,
  Cell,
  Tree,
  TreeItem,

  // === Interactive ===
  Button,
  Link,
  TextField,
  TextArea,
  SearchField,
  ComboBox,
  Checkbox,
  Switch,
  RadioButton,
  Slider,
  ProgressBar,

  // === Static content ===
  StaticText,
  Heading,
  Image,
  ScrollBar,
  Separator,

  // === Fallback ===
  /// Generic container - has children but no specific semantic meaning
  GenericContainer,
  /// Unknown role - platform role didn't map to anything known
  Unknown,
}

impl Role {
  /// Is this a screen or top-level window? Such nodes anchor window identity
  /// metadata and are always emitted regardless of visibility policy.
  pub fn is_top_level(&self) -> bool {
    matches!(self, Self::Screen | Self::Window | Self::Application)
  }

  /// Is this an interactive element that users can click/activate/type into?
  pub fn is_interactive(&self) -> bool {
    matches!(
      self,
      Self::Button
        | Self::Link
        | Self::MenuItem
        | Self::Tab
        | Self::TextField
        | Self::TextArea
        | Self::SearchField
        | Self::ComboBox
        | Self::Checkbox
        | Self::Switch
        | Self::RadioButton
        | Self::Slider
        | Self::ListItem
        | Self::TreeItem
        | Self::Cell
    )
  }

  /// Does this role typically contain other elements?
  pub fn is_container(&self) -> bool {
    matches!(
      self,
      Self::Screen
        | Self::Window
        | Self::Application
        | Self::Document
        | Self::Group
        | Self::ScrollArea
        | Self::Toolbar
        | Self::Menu
        | Self::MenuBar
        | Self::TabList
        | Self::List
        | Self::Table
        | Self::Tree
        | Self::Row
        | Self::GenericContainer
    )
  }

  /// Is this a text input element?
  pub fn is_text_input(&self) -> bool {
    matches!(
      self,
      Self::TextField | Self::TextArea | Self::SearchField | Self::ComboBox
    )
  }

  /// Purely visual chrome that rarely justifies context space.
  pub fn is_decorative(&self) -> bool {
    matches!(self, Self::Image | Self::ScrollBar | Self::Separator)
  }

  /// Relevance weight applied to a traversal candidate's score.
  ///
  /// Semantic text carriers outrank structural containers, which outrank
  /// plain interactive controls; decorative chrome is demoted.
  pub fn score_weight(&self) -> f64 {
    match self {
      // Semantic text and text containers
      Self::StaticText
      | Self::Heading
      | Self::Document
      | Self::TextField
      | Self::TextArea
      | Self::SearchField => 2.0,
      // Structural containers
      Self::Screen
      | Self::Window
      | Self::Application
      | Self::Group
      | Self::GenericContainer
      | Self::Toolbar
      | Self::Tab
      | Self::TabList => 1.5,
      // Decorative chrome
      Self::Image | Self::ScrollBar | Self::Separator => 0.5,
      // Plain interactive controls and everything else
      Self::Button
      | Self::Link
      | Self::MenuItem
      | Self::ComboBox
      | Self::Checkbox
      | Self::Switch
      | Self::RadioButton
      | Self::Slider
      | Self::ListItem
      | Self::TreeItem
      | Self::Cell
      | Self::Menu
      | Self::MenuBar
      | Self::List
      | Self::Table
      | Self::Row
      | Self::Tree
      | Self::ScrollArea
      | Self::ProgressBar
      | Self::Unknown => 1.0,
    }
  }

  /// Short tag name used by both renderers.
  pub fn short_tag(&self) -> &'static str {
    match self {
      Self::Screen => "screen",
      Self::Window => "win",
      Self::Application => "app",
      Self::Document => "doc",
      Self::Group | Self::GenericContainer => "pane",
      Self::ScrollArea => "scroll",
      Self::Toolbar => "toolbar",
      Self::Menu => "menu",
      Self::MenuBar => "menubar",
      Self::MenuItem => "menuitem",
      Self::Tab => "tab",
      Self::TabList => "tabs",
      Self::List => "list",
      Self::ListItem => "li",
      Self::Table => "table",
      Self::Row => "row",
      Self::Cell => "cell",
      Self::Tree => "tree",
      Self::TreeItem => "treeitem",
      Self::Button => "btn",
      Self::Link => "a",
      Self::TextField | Self::SearchField => "input",
      Self::TextArea => "textarea",
      Self::ComboBox => "combo",
      Self::Checkbox => "check",
      Self::Switch => "switch",
      Self::RadioButton => "radio",
      Self::Slider => "slider",
      Self::ProgressBar => "progress",
      Self::StaticText => "text",
      Self::Heading => "h",
      Self::Image => "img",
      Self::ScrollBar => "scrollbar",
      Self::Separator => "sep",
      Self::Unknown => "el",
    }
  }

  /// Under the Compact detail policy, how many informative descendants a
  /// container of this role must *exceed* before it is rendered. `None`
  /// means the role is never container-visible under Compact.
  pub fn informative_child_minimum(&self) -> Option<u32> {
    match self {
      Self::List
      | Self::Table
      | Self::Tree
      | Self::TabList
      | Self::Menu
      | Self::MenuBar
      | Self::Toolbar
      | Self::Document
      | Self::ScrollArea => Some(1),
      Self::Group | Self::GenericContainer | Self::Row => Some(2),
      _ => None,
    }
  }
}
