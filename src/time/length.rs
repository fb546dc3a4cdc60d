use crate::time::{Seconds, TicksTime, TimeModel, PPQ, TICKS_PER_SIXTEENTH};

/// Musical duration. Only the total tick count is authoritative; the
/// bar/beat/sixteenth/tick breakdown and the seconds value are presentation
/// caches, recomputed whenever the tick count or the tempo changes.
#[derive(Debug, Clone, Copy)]
pub struct MusicalLength {
  bars: u32,
  beats: u32,
  sixteenths: u32,
  ticks: u32,
  total_ticks: TicksTime,
  seconds: Seconds,
}

impl MusicalLength {
  pub fn from_ticks(total_ticks: TicksTime, model: &TimeModel) -> MusicalLength {
    let mut length = MusicalLength {
      bars: 0,
      beats: 0,
      sixteenths: 0,
      ticks: 0,
      total_ticks,
      seconds: 0.0,
    };
    length.refresh(model);
    length
  }

  pub fn get_total_ticks(&self) -> TicksTime {
    self.total_ticks
  }

  pub fn get_seconds(&self) -> Seconds {
    self.seconds
  }

  pub fn get_bars(&self) -> u32 {
    self.bars
  }

  pub fn get_beats(&self) -> u32 {
    self.beats
  }

  pub fn get_sixteenths(&self) -> u32 {
    self.sixteenths
  }

  pub fn get_ticks(&self) -> u32 {
    self.ticks
  }

  pub fn set_total_ticks(&mut self, total_ticks: TicksTime, model: &TimeModel) {
    self.total_ticks = total_ticks;
    self.refresh(model);
  }

  /// Recomputes the derived caches from the authoritative tick count.
  pub(crate) fn refresh(&mut self, model: &TimeModel) {
    let ticks_per_bar = u64::from(model.get_signature().ticks_per_bar());
    let mut remainder = u64::from(self.total_ticks);

    self.bars = (remainder / ticks_per_bar) as u32;
    remainder %= ticks_per_bar;
    self.beats = (remainder / PPQ) as u32;
    remainder %= PPQ;
    self.sixteenths = (remainder / TICKS_PER_SIXTEENTH) as u32;
    self.ticks = (remainder % TICKS_PER_SIXTEENTH) as u32;

    self.seconds = model.ticks_to_seconds(self.total_ticks);
  }
}

impl PartialEq for MusicalLength {
  fn eq(&self, other: &MusicalLength) -> bool {
    self.total_ticks == other.total_ticks
  }
}

impl Eq for MusicalLength {}
