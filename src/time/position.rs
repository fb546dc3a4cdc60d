use std::cmp::Ordering;
use std::fmt;

use crate::time::Seconds;

/// Musical coordinate on the timeline: 1-based bar, beat and sixteenth plus
/// a 0-based tick remainder. The seconds field is a derived cache filled in
/// by the time model; it never takes part in comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Position {
  bar: u32,
  beat: u32,
  sixteenth: u32,
  tick: u32,
  time: Seconds,
}

impl Position {
  /// Builds a position with an empty seconds cache. Use
  /// `TimeModel::make_position` when the cache is needed.
  pub fn new(bar: u32, beat: u32, sixteenth: u32, tick: u32) -> Position {
    debug_assert!(bar >= 1 && beat >= 1 && sixteenth >= 1);
    Position {
      bar,
      beat,
      sixteenth,
      tick,
      time: 0.0,
    }
  }

  pub(crate) fn with_time(mut self, time: Seconds) -> Position {
    self.time = time;
    self
  }

  pub fn get_bar(&self) -> u32 {
    self.bar
  }

  pub fn get_beat(&self) -> u32 {
    self.beat
  }

  pub fn get_sixteenth(&self) -> u32 {
    self.sixteenth
  }

  pub fn get_tick(&self) -> u32 {
    self.tick
  }

  /// Cached absolute time in seconds under the tempo in effect when this
  /// position was produced or last refreshed.
  pub fn get_time(&self) -> Seconds {
    self.time
  }

  fn key(&self) -> (u32, u32, u32, u32) {
    (self.bar, self.beat, self.sixteenth, self.tick)
  }
}

impl PartialEq for Position {
  fn eq(&self, other: &Position) -> bool {
    self.key() == other.key()
  }
}

impl Eq for Position {}

impl Ord for Position {
  fn cmp(&self, other: &Position) -> Ordering {
    self.key().cmp(&other.key())
  }
}

impl PartialOrd for Position {
  fn partial_cmp(&self, other: &Position) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{}.{}.{}.{:03}",
      self.bar, self.beat, self.sixteenth, self.tick
    )
  }
}

#[cfg(test)]
mod test {

  use super::Position;

  #[test]
  pub fn new() {
    let pos = Position::new(2, 3, 1, 120);
    assert_eq!(pos.get_bar(), 2);
    assert_eq!(pos.get_beat(), 3);
    assert_eq!(pos.get_sixteenth(), 1);
    assert_eq!(pos.get_tick(), 120);
    assert_eq!(pos.get_time(), 0.0);
  }

  #[test]
  pub fn eq_ignores_time_cache() {
    let a = Position::new(1, 2, 3, 4).with_time(1.5);
    let b = Position::new(1, 2, 3, 4).with_time(7.0);
    assert_eq!(a, b);
  }

  #[test]
  pub fn lexicographic_order() {
    assert!(Position::new(1, 4, 4, 239) < Position::new(2, 1, 1, 0));
    assert!(Position::new(2, 1, 1, 0) < Position::new(2, 1, 1, 1));
    assert!(Position::new(2, 1, 2, 0) < Position::new(2, 2, 1, 0));
  }

  #[test]
  pub fn display() {
    let pos = Position::new(12, 3, 2, 7);
    assert_eq!(format!("{}", pos), "12.3.2.007");
  }
}
