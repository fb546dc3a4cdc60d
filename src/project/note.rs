use crate::project::NoteId;
use crate::time::{MusicalLength, Position};

pub const MIN_PITCH: u8 = 0;
pub const MAX_PITCH: u8 = 127;

/// A note inside a clip. The start position is relative to the owning
/// clip's own start.
#[derive(Debug, PartialEq, Clone)]
pub struct Note {
  pub id: NoteId,
  pub pitch: u8,
  pub start: Position,
  pub duration: MusicalLength,
  pub velocity: f64,
}

impl Note {
  pub fn new(pitch: u8, start: Position, duration: MusicalLength, velocity: f64) -> Note {
    Note {
      id: NoteId::new(),
      pitch: pitch.min(MAX_PITCH),
      start,
      duration,
      velocity: clamp_velocity(velocity),
    }
  }

  pub fn set_pitch(&mut self, pitch: u8) {
    self.pitch = pitch.min(MAX_PITCH);
  }

  pub fn set_velocity(&mut self, velocity: f64) {
    self.velocity = clamp_velocity(velocity);
  }
}

fn clamp_velocity(velocity: f64) -> f64 {
  if velocity.is_finite() {
    velocity.max(0.0).min(1.0)
  } else {
    1.0
  }
}

/// Partial note edit, merged field by field.
#[derive(Debug, Default, Clone)]
pub struct NoteUpdate {
  pub pitch: Option<u8>,
  pub start: Option<Position>,
  pub duration: Option<MusicalLength>,
  pub velocity: Option<f64>,
}

impl NoteUpdate {
  pub fn new() -> NoteUpdate {
    NoteUpdate::default()
  }

  pub fn pitch(self, pitch: u8) -> NoteUpdate {
    NoteUpdate {
      pitch: Some(pitch),
      ..self
    }
  }

  pub fn start(self, start: Position) -> NoteUpdate {
    NoteUpdate {
      start: Some(start),
      ..self
    }
  }

  pub fn duration(self, duration: MusicalLength) -> NoteUpdate {
    NoteUpdate {
      duration: Some(duration),
      ..self
    }
  }

  pub fn velocity(self, velocity: f64) -> NoteUpdate {
    NoteUpdate {
      velocity: Some(velocity),
      ..self
    }
  }

  pub fn is_empty(&self) -> bool {
    self.pitch.is_none()
      && self.start.is_none()
      && self.duration.is_none()
      && self.velocity.is_none()
  }
}

#[cfg(test)]
mod test {

  use super::{Note, NoteUpdate};
  use crate::time::{MusicalLength, Position, Signature, Tempo, TicksTime, TimeModel};

  fn model() -> TimeModel {
    TimeModel::new(Tempo::new(120.0).unwrap(), Signature::new(4, 4).unwrap())
  }

  #[test]
  pub fn new_clamps_ranges() {
    let m = model();
    let note = Note::new(
      200,
      Position::new(1, 1, 1, 0),
      MusicalLength::from_ticks(TicksTime::new(240), &m),
      1.5,
    );
    assert_eq!(note.pitch, 127);
    assert_eq!(note.velocity, 1.0);
  }

  #[test]
  pub fn update_builder() {
    let update = NoteUpdate::new().pitch(64).velocity(0.5);
    assert_eq!(update.pitch, Some(64));
    assert_eq!(update.velocity, Some(0.5));
    assert!(update.start.is_none());
    assert!(!update.is_empty());
    assert!(NoteUpdate::new().is_empty());
  }
}
