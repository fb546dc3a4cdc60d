use serde_derive::{Deserialize, Serialize};

use crate::project::MixerTrackId;

/// Mixer strip mirrored from the engine.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MixerTrack {
  pub id: MixerTrackId,
  pub label: String,
  pub volume: f64,
  pub pan: f64,
  pub mute: bool,
  pub solo: bool,
}

impl MixerTrack {
  pub fn new<T>(id: MixerTrackId, label: T) -> MixerTrack
  where
    T: Into<String>,
  {
    MixerTrack {
      id,
      label: label.into(),
      volume: 1.0,
      pan: 0.0,
      mute: false,
      solo: false,
    }
  }
}

/// Engine parameter address. Each mixer track owns a block of one hundred
/// parameter slots; slot 0 is the fader gain, slot 1 the pan.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct ParamId(u32);

impl ParamId {
  const PARAMS_PER_TRACK: u32 = 100;
  const FADER_GAIN: u32 = 0;
  const PAN: u32 = 1;

  pub fn fader_gain(track: MixerTrackId) -> ParamId {
    ParamId(track * Self::PARAMS_PER_TRACK + Self::FADER_GAIN)
  }

  pub fn pan(track: MixerTrackId) -> ParamId {
    ParamId(track * Self::PARAMS_PER_TRACK + Self::PAN)
  }

  pub fn raw(self) -> u32 {
    self.0
  }
}

#[cfg(test)]
mod test {

  use super::{MixerTrack, ParamId};

  #[test]
  pub fn new() {
    let track = MixerTrack::new(2, "Drums");
    assert_eq!(track.id, 2);
    assert_eq!(track.label, "Drums");
    assert_eq!(track.volume, 1.0);
    assert_eq!(track.pan, 0.0);
  }

  #[test]
  pub fn param_addressing() {
    assert_eq!(ParamId::fader_gain(0).raw(), 0);
    assert_eq!(ParamId::fader_gain(3).raw(), 300);
    assert_eq!(ParamId::pan(3).raw(), 301);
  }
}
