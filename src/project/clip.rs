use std::collections::{HashMap, HashSet};

use crate::color::Color;
use crate::project::{ClipId, InstrumentId, MixerTrackId, Note, NoteId, TrackId};
use crate::time::{MusicalLength, Position, TicksTime, TimeModel};

/// The unit of optimistic editing: every field is user-mutable and mirrored
/// to the engine as whole-entity or partial-field updates. Notes keep their
/// insertion order.
#[derive(Debug, PartialEq, Clone)]
pub struct Clip {
  pub id: ClipId,
  pub track_id: TrackId,
  pub name: String,
  pub color: Color,
  pub start: Position,
  pub length: MusicalLength,
  pub notes: Vec<Note>,
  pub instrument_ids: HashSet<InstrumentId>,
  pub instrument_routes: HashMap<InstrumentId, HashSet<MixerTrackId>>,
}

impl Clip {
  pub fn new<T>(
    track_id: TrackId,
    name: T,
    color: Color,
    start: Position,
    length: MusicalLength,
  ) -> Clip
  where
    T: Into<String>,
  {
    Clip {
      id: ClipId::new(),
      track_id,
      name: name.into(),
      color,
      start,
      length,
      notes: Vec::new(),
      instrument_ids: HashSet::new(),
      instrument_routes: HashMap::new(),
    }
  }

  pub fn start_ticks(&self, model: &TimeModel) -> TicksTime {
    model.position_to_ticks(&self.start)
  }

  pub fn end_ticks(&self, model: &TimeModel) -> TicksTime {
    self.start_ticks(model) + self.length.get_total_ticks()
  }

  pub fn note(&self, id: NoteId) -> Option<&Note> {
    self.notes.iter().find(|note| note.id == id)
  }

  pub fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
    self.notes.iter_mut().find(|note| note.id == id)
  }
}

/// Partial clip edit, merged field by field into the local mirror and
/// forwarded to the engine as a partial update.
#[derive(Debug, Default, Clone)]
pub struct ClipUpdate {
  pub name: Option<String>,
  pub start: Option<Position>,
  pub length: Option<MusicalLength>,
  pub notes: Option<Vec<Note>>,
  pub instrument_ids: Option<HashSet<InstrumentId>>,
  pub instrument_routes: Option<HashMap<InstrumentId, HashSet<MixerTrackId>>>,
}

impl ClipUpdate {
  pub fn new() -> ClipUpdate {
    ClipUpdate::default()
  }

  pub fn name<T>(self, name: T) -> ClipUpdate
  where
    T: Into<String>,
  {
    ClipUpdate {
      name: Some(name.into()),
      ..self
    }
  }

  pub fn start(self, start: Position) -> ClipUpdate {
    ClipUpdate {
      start: Some(start),
      ..self
    }
  }

  pub fn length(self, length: MusicalLength) -> ClipUpdate {
    ClipUpdate {
      length: Some(length),
      ..self
    }
  }

  pub fn notes(self, notes: Vec<Note>) -> ClipUpdate {
    ClipUpdate {
      notes: Some(notes),
      ..self
    }
  }

  pub fn instrument_ids(self, instrument_ids: HashSet<InstrumentId>) -> ClipUpdate {
    ClipUpdate {
      instrument_ids: Some(instrument_ids),
      ..self
    }
  }

  pub fn instrument_routes(
    self,
    instrument_routes: HashMap<InstrumentId, HashSet<MixerTrackId>>,
  ) -> ClipUpdate {
    ClipUpdate {
      instrument_routes: Some(instrument_routes),
      ..self
    }
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.start.is_none()
      && self.length.is_none()
      && self.notes.is_none()
      && self.instrument_ids.is_none()
      && self.instrument_routes.is_none()
  }
}

#[cfg(test)]
mod test {

  use super::{Clip, ClipUpdate};
  use crate::color::Color;
  use crate::time::{MusicalLength, Position, Signature, Tempo, TicksTime, TimeModel};

  fn model() -> TimeModel {
    TimeModel::new(Tempo::new(120.0).unwrap(), Signature::new(4, 4).unwrap())
  }

  #[test]
  pub fn new() {
    let m = model();
    let clip = Clip::new(
      0,
      "Lead",
      Color::new("#aec6ff"),
      m.make_position(2, 1, 1, 0),
      MusicalLength::from_ticks(TicksTime::new(3840), &m),
    );
    assert_eq!(clip.name, "Lead");
    assert_eq!(clip.start_ticks(&m), TicksTime::new(3840));
    assert_eq!(clip.end_ticks(&m), TicksTime::new(7680));
    assert!(clip.notes.is_empty());
  }

  #[test]
  pub fn update_builder() {
    let m = model();
    let update = ClipUpdate::new()
      .name("Renamed")
      .start(m.make_position(3, 1, 1, 0));
    assert_eq!(update.name.as_ref().unwrap(), "Renamed");
    assert!(update.length.is_none());
    assert!(!update.is_empty());
    assert!(ClipUpdate::new().is_empty());
  }
}
