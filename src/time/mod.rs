pub mod grid;
pub mod length;
pub mod model;
pub mod position;
pub mod signature;
pub mod tempo;
pub mod ticks;

pub use self::grid::SnapGrid;
pub use self::length::MusicalLength;
pub use self::model::TimeModel;
pub use self::position::Position;
pub use self::signature::Signature;
pub use self::tempo::Tempo;
pub use self::ticks::{TicksTime, PPQ, TICKS_PER_SIXTEENTH};

use failure::Fail;

pub type Seconds = f64;

#[derive(Debug, Fail, PartialEq)]
pub enum TimeError {
  #[fail(display = "invalid tempo: {} bpm", bpm)]
  InvalidTempo { bpm: f64 },

  #[fail(display = "invalid time signature: {}/{}", numerator, denominator)]
  InvalidSignature { numerator: u8, denominator: u8 },
}
