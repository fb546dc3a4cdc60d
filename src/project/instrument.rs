use serde_derive::{Deserialize, Serialize};

use crate::project::{InstrumentId, MixerTrackId};

/// Plugin instance hosted by the engine, mirrored read-only for display and
/// routing choices.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PluginInstance {
  pub id: InstrumentId,
  pub name: String,
  pub label: String,
  pub routing: MixerTrackId,
}

#[cfg(test)]
mod test {

  use super::PluginInstance;
  use crate::project::InstrumentId;

  #[test]
  pub fn construction() {
    let instance = PluginInstance {
      id: InstrumentId::new(),
      name: "SimpleSynth".into(),
      label: "Synth 1".into(),
      routing: 0,
    };
    assert_eq!(instance.routing, 0);
  }
}
