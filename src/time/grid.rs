use serde_derive::Deserialize;

use crate::time::{Signature, TicksTime, PPQ};

/// Quantization unit used while editing. Values are note fractions; the
/// whole-bar case follows the prevailing signature numerator.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
pub enum SnapGrid {
  #[serde(rename = "1/1")]
  Bar,
  #[serde(rename = "1/2")]
  Half,
  #[serde(rename = "1/4")]
  Quarter,
  #[serde(rename = "1/8")]
  Eighth,
  #[serde(rename = "1/16")]
  Sixteenth,
  #[serde(rename = "1/32")]
  ThirtySecond,
}

impl SnapGrid {
  pub fn ticks(self, signature: Signature) -> TicksTime {
    match self {
      SnapGrid::Bar => signature.ticks_per_bar(),
      SnapGrid::Half => TicksTime::new(PPQ * 2),
      SnapGrid::Quarter => TicksTime::new(PPQ),
      SnapGrid::Eighth => TicksTime::new(PPQ / 2),
      SnapGrid::Sixteenth => TicksTime::new(PPQ / 4),
      SnapGrid::ThirtySecond => TicksTime::new(PPQ / 8),
    }
  }
}

impl Default for SnapGrid {
  fn default() -> SnapGrid {
    SnapGrid::Sixteenth
  }
}
