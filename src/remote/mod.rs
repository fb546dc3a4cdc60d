#[cfg(test)]
pub(crate) mod fake;

use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender};
use failure::Fail;
use serde_derive::{Deserialize, Serialize};

use crate::project::{ClipId, InstrumentId, MixerTrack, MixerTrackId, ParamId, PluginInstance};
use crate::time::Seconds;

pub type RequestId = u64;

/// Failure taxonomy of the engine boundary. `Unavailable` is transient;
/// `NotFound` means the edited entity no longer exists on the engine side;
/// `Rejected` means the engine refused the mutation.
#[derive(Debug, Fail, PartialEq, Clone)]
pub enum RemoteError {
  #[fail(display = "engine unavailable: {}", cause)]
  Unavailable { cause: String },

  #[fail(display = "entity not found: {}", id)]
  NotFound { id: String },

  #[fail(display = "rejected by the engine: {}", reason)]
  Rejected { reason: String },
}

/// Note payload as the engine sees it: seconds relative to the clip start.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NoteData {
  pub pitch: u8,
  pub relative_start: Seconds,
  pub duration: Seconds,
  pub velocity: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NewClip {
  pub name: String,
  pub start_time: Seconds,
  pub duration: Seconds,
  pub instrument_ids: Vec<InstrumentId>,
}

/// Partial clip update on the wire. Absent fields are left untouched by the
/// engine.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClipPatch {
  pub name: Option<String>,
  pub start_time: Option<Seconds>,
  pub duration: Option<Seconds>,
  pub notes: Option<Vec<NoteData>>,
  pub instrument_ids: Option<Vec<InstrumentId>>,
  pub instrument_routes: Option<HashMap<InstrumentId, Vec<MixerTrackId>>>,
}

/// Authoritative clip state, fetched for reconciliation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClipSnapshot {
  pub id: ClipId,
  pub name: String,
  pub start_time: Seconds,
  pub duration: Seconds,
  pub notes: Vec<NoteData>,
  pub instrument_ids: Vec<InstrumentId>,
  pub instrument_routes: HashMap<InstrumentId, Vec<MixerTrackId>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Response {
  Ack,
  ClipAdded { id: ClipId },
  Clip { snapshot: ClipSnapshot },
  MixerTracks { tracks: Vec<MixerTrack> },
  Plugins { instances: Vec<PluginInstance> },
  PlaybackState { playing: bool, position: Seconds },
}

/// Outcome of one request, delivered back onto the issuing thread.
#[derive(Debug, PartialEq, Clone)]
pub struct Completion {
  pub request: RequestId,
  pub result: Result<Response, RemoteError>,
}

pub type CompletionSender = Sender<Completion>;
pub type CompletionReceiver = Receiver<Completion>;

pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
  crossbeam_channel::unbounded::<Completion>()
}

/// The Transport/Project Service boundary. Every call is fire-and-forget:
/// implementations answer by sending a `Completion` carrying the request id
/// into the channel they were constructed with. A request, once issued,
/// cannot be cancelled; only its local effect can be reverted afterwards.
pub trait RemoteStore {
  fn add_clip(&mut self, request: RequestId, clip: NewClip);
  fn update_clip(&mut self, request: RequestId, id: ClipId, patch: ClipPatch);
  fn get_clip(&mut self, request: RequestId, id: ClipId);
  fn remove_clip(&mut self, request: RequestId, id: ClipId);

  fn play(&mut self, request: RequestId);
  fn pause(&mut self, request: RequestId);
  fn stop(&mut self, request: RequestId);
  fn seek(&mut self, request: RequestId, position: Seconds);
  fn get_playback_state(&mut self, request: RequestId);

  fn add_mixer_track(&mut self, request: RequestId);
  fn remove_mixer_track(&mut self, request: RequestId, id: MixerTrackId);
  fn get_mixer_tracks(&mut self, request: RequestId);
  fn set_parameter(&mut self, request: RequestId, param: ParamId, value: f64);

  fn get_active_plugins(&mut self, request: RequestId);
}

#[cfg(test)]
mod test {

  use super::{completion_channel, Completion, RemoteError, Response};

  #[test]
  pub fn completions_preserve_order() {
    let (tx, rx) = completion_channel();
    tx.send(Completion {
      request: 1,
      result: Ok(Response::Ack),
    })
    .unwrap();
    tx.send(Completion {
      request: 2,
      result: Err(RemoteError::Unavailable {
        cause: "down".to_string(),
      }),
    })
    .unwrap();

    assert_eq!(rx.recv().unwrap().request, 1);
    assert_eq!(rx.recv().unwrap().request, 2);
  }
}
