use log::debug;

use crate::time::{
  Position, Seconds, Signature, SnapGrid, Tempo, TicksTime, PPQ, TICKS_PER_SIXTEENTH,
};

/// Stateless conversion engine between ticks, seconds and musical
/// positions under one tempo/signature pair. Conversions are only valid
/// against the tempo in effect at conversion time.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TimeModel {
  tempo: Tempo,
  signature: Signature,
}

impl TimeModel {
  pub fn new(tempo: Tempo, signature: Signature) -> TimeModel {
    TimeModel { tempo, signature }
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }

  pub fn seconds_per_tick(&self) -> Seconds {
    self.tempo.seconds_per_beat() / PPQ as f64
  }

  pub fn ticks_to_seconds(&self, ticks: TicksTime) -> Seconds {
    f64::from(ticks) * self.seconds_per_tick()
  }

  /// Inverse of `ticks_to_seconds`, rounded to the nearest tick. Negative
  /// input is outside the tick domain and clamps to zero.
  pub fn seconds_to_ticks(&self, seconds: Seconds) -> TicksTime {
    if seconds <= 0.0 {
      if seconds < 0.0 {
        debug!("clamping negative time {}s to tick zero", seconds);
      }
      return TicksTime::zero();
    }
    TicksTime::new((seconds / self.seconds_per_tick()).round() as u64)
  }

  /// Decomposes an absolute tick count into a 1-based bar/beat/sixteenth
  /// coordinate with a 0-based tick remainder, seconds cache included.
  pub fn ticks_to_position(&self, total_ticks: TicksTime) -> Position {
    let ticks_per_bar = u64::from(self.signature.ticks_per_bar());
    let mut remainder = u64::from(total_ticks);

    let bar = remainder / ticks_per_bar + 1;
    remainder %= ticks_per_bar;
    let beat = remainder / PPQ + 1;
    remainder %= PPQ;
    let sixteenth = remainder / TICKS_PER_SIXTEENTH + 1;
    let tick = remainder % TICKS_PER_SIXTEENTH;

    Position::new(bar as u32, beat as u32, sixteenth as u32, tick as u32)
      .with_time(self.ticks_to_seconds(total_ticks))
  }

  /// Exact inverse of `ticks_to_position`; no rounding is involved.
  pub fn position_to_ticks(&self, position: &Position) -> TicksTime {
    let ticks_per_bar = u64::from(self.signature.ticks_per_bar());
    TicksTime::new(
      u64::from(position.get_bar().saturating_sub(1)) * ticks_per_bar
        + u64::from(position.get_beat().saturating_sub(1)) * PPQ
        + u64::from(position.get_sixteenth().saturating_sub(1)) * TICKS_PER_SIXTEENTH
        + u64::from(position.get_tick()),
    )
  }

  /// Builds a position from 1-based coordinates with the seconds cache
  /// already filled in.
  pub fn make_position(&self, bar: u32, beat: u32, sixteenth: u32, tick: u32) -> Position {
    let position = Position::new(bar, beat, sixteenth, tick);
    self.ticks_to_position(self.position_to_ticks(&position))
  }

  /// Refreshes a position's seconds cache after a tempo change.
  pub(crate) fn refresh_position(&self, position: &mut Position) {
    *position = self.ticks_to_position(self.position_to_ticks(position));
  }

  pub fn position_to_seconds(&self, position: &Position) -> Seconds {
    self.ticks_to_seconds(self.position_to_ticks(position))
  }

  pub fn seconds_to_position(&self, seconds: Seconds) -> Position {
    self.ticks_to_position(self.seconds_to_ticks(seconds))
  }

  pub fn grid_ticks(&self, grid: SnapGrid) -> TicksTime {
    grid.ticks(self.signature)
  }

  /// Snaps to the nearest grid line; ties round up, away from zero.
  pub fn snap_ticks(&self, ticks: TicksTime, grid: SnapGrid) -> TicksTime {
    let grid_ticks = u64::from(self.grid_ticks(grid));
    let ticks = u64::from(ticks);
    TicksTime::new((ticks + grid_ticks / 2) / grid_ticks * grid_ticks)
  }

  pub fn snap_position(&self, position: &Position, grid: SnapGrid) -> Position {
    self.ticks_to_position(self.snap_ticks(self.position_to_ticks(position), grid))
  }
}

#[cfg(test)]
mod test {

  use super::TimeModel;
  use crate::time::{Position, Signature, SnapGrid, Tempo, TicksTime};

  fn model(bpm: f64, numerator: u8) -> TimeModel {
    TimeModel::new(
      Tempo::new(bpm).unwrap(),
      Signature::new(numerator, 4).unwrap(),
    )
  }

  #[test]
  pub fn ticks_to_seconds() {
    let m = model(120.0, 4);
    // One beat of 960 ticks at 120 bpm lasts half a second
    assert_eq!(m.ticks_to_seconds(TicksTime::new(960)), 0.5);
    assert_eq!(m.ticks_to_seconds(TicksTime::zero()), 0.0);
  }

  #[test]
  pub fn tempo_scaling() {
    let fast = model(120.0, 4);
    let slow = model(60.0, 4);
    let ticks = TicksTime::new(12345);
    assert_eq!(
      fast.ticks_to_seconds(ticks) * 2.0,
      slow.ticks_to_seconds(ticks)
    );
  }

  #[test]
  pub fn seconds_to_ticks_rounds_to_nearest() {
    let m = model(120.0, 4);
    // One tick lasts 0.5/960 seconds
    let one_tick = m.seconds_per_tick();
    assert_eq!(m.seconds_to_ticks(one_tick * 10.4), TicksTime::new(10));
    assert_eq!(m.seconds_to_ticks(one_tick * 10.6), TicksTime::new(11));
  }

  #[test]
  pub fn seconds_to_ticks_clamps_negative() {
    let m = model(120.0, 4);
    assert_eq!(m.seconds_to_ticks(-1.0), TicksTime::zero());
  }

  #[test]
  pub fn round_trip_idempotent_after_one_snap() {
    let m = model(137.0, 4);
    let snapped = m.ticks_to_seconds(m.seconds_to_ticks(0.7342));
    assert_eq!(m.ticks_to_seconds(m.seconds_to_ticks(snapped)), snapped);
  }

  #[test]
  pub fn ticks_to_position_decomposition() {
    let m = model(120.0, 4);
    let pos = m.ticks_to_position(TicksTime::new(3840));
    assert_eq!(pos, Position::new(2, 1, 1, 0));
    assert_eq!(pos.get_time(), 2.0);

    let pos = m.ticks_to_position(TicksTime::new(960 + 240 + 30));
    assert_eq!(pos, Position::new(1, 2, 2, 30));
  }

  #[test]
  pub fn position_round_trip_is_lossless() {
    let m = model(120.0, 3);
    for ticks in &[0u64, 1, 239, 240, 959, 960, 2879, 2880, 123_456_789] {
      let ticks = TicksTime::new(*ticks);
      assert_eq!(m.position_to_ticks(&m.ticks_to_position(ticks)), ticks);
    }
  }

  #[test]
  pub fn position_monotonicity() {
    let m = model(120.0, 4);
    let mut previous = m.ticks_to_position(TicksTime::zero());
    for ticks in 1..5000u64 {
      let current = m.ticks_to_position(TicksTime::new(ticks));
      assert!(previous < current, "not monotonic at tick {}", ticks);
      previous = current;
    }
  }

  #[test]
  pub fn long_project_survives_64_bits() {
    // 24 hours at 300 bpm stays well inside the u64 tick range
    let m = model(300.0, 4);
    let ticks = m.seconds_to_ticks(24.0 * 3600.0);
    assert_eq!(m.position_to_ticks(&m.ticks_to_position(ticks)), ticks);
  }

  #[test]
  pub fn snap_to_nearest() {
    let m = model(120.0, 4);
    let grid = SnapGrid::Sixteenth; // 240 ticks
    assert_eq!(m.snap_ticks(TicksTime::new(100), grid), TicksTime::new(0));
    assert_eq!(m.snap_ticks(TicksTime::new(200), grid), TicksTime::new(240));
    // Ties round up
    assert_eq!(m.snap_ticks(TicksTime::new(120), grid), TicksTime::new(240));
  }

  #[test]
  pub fn snap_idempotence() {
    let m = model(120.0, 4);
    for grid in &[
      SnapGrid::Bar,
      SnapGrid::Half,
      SnapGrid::Quarter,
      SnapGrid::Eighth,
      SnapGrid::Sixteenth,
      SnapGrid::ThirtySecond,
    ] {
      let snapped = m.snap_ticks(TicksTime::new(12_345), *grid);
      assert_eq!(m.snap_ticks(snapped, *grid), snapped);
    }
  }

  #[test]
  pub fn snap_position() {
    let m = model(120.0, 4);
    let pos = m.make_position(1, 2, 2, 100);
    let snapped = m.snap_position(&pos, SnapGrid::Quarter);
    assert_eq!(snapped, Position::new(1, 2, 1, 0));
  }

  #[test]
  pub fn make_position_fills_time_cache() {
    let m = model(120.0, 4);
    let pos = m.make_position(2, 1, 1, 0);
    assert_eq!(pos.get_time(), 2.0);
  }
}
