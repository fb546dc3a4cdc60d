pub mod clip;
pub mod instrument;
pub mod mixer;
pub mod note;
pub mod track;

pub use self::clip::{Clip, ClipUpdate};
pub use self::instrument::PluginInstance;
pub use self::mixer::{MixerTrack, ParamId};
pub use self::note::{Note, NoteUpdate};
pub use self::track::Track;

use std::fmt;

use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;

pub type TrackId = u32;
pub type MixerTrackId = u32;

/// Client-generated clip identifier. The engine may replace it with its own
/// on creation; until then it addresses the optimistic local copy.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct ClipId(Uuid);

impl ClipId {
  pub fn new() -> ClipId {
    ClipId(Uuid::new_v4())
  }
}

impl fmt::Display for ClipId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
  pub fn new() -> NoteId {
    NoteId(Uuid::new_v4())
  }
}

impl fmt::Display for NoteId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct InstrumentId(Uuid);

impl InstrumentId {
  pub fn new() -> InstrumentId {
    InstrumentId(Uuid::new_v4())
  }
}

impl fmt::Display for InstrumentId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
