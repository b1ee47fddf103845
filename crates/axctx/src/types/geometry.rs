/*! Geometry types for screen coordinates. */

use serde::{Deserialize, Serialize};

/// Rectangle bounds in screen coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
  pub x: f64,
  pub y: f64,
  pub w: f64,
  pub h: f64,
}

impl Bounds {
  pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
    Self { x, y, w, h }
  }

  /// Area in square pixels. Zero for degenerate rectangles.
  pub fn area(&self) -> f64 {
    if self.w > 0.0 && self.h > 0.0 {
      self.w * self.h
    } else {
      0.0
    }
  }

  /// True when either dimension is positive but below `threshold` pixels.
  /// Used to filter near-invisible controls out of relevance scoring.
  pub fn is_sliver(&self, threshold: f64) -> bool {
    (self.w > 0.0 && self.w < threshold) || (self.h > 0.0 && self.h < threshold)
  }
}
