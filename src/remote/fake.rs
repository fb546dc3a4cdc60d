//! In-memory engine double used by the editor and gesture tests: records
//! every call and answers synchronously through the completion channel,
//! with optional scripted failures.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::project::{ClipId, MixerTrack, MixerTrackId, ParamId, PluginInstance};
use crate::remote::{
  ClipPatch, ClipSnapshot, Completion, CompletionSender, NewClip, RemoteError, RemoteStore,
  RequestId, Response,
};
use crate::time::Seconds;

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Call {
  AddClip(NewClip),
  UpdateClip(ClipId, ClipPatch),
  GetClip(ClipId),
  RemoveClip(ClipId),
  Play,
  Pause,
  Stop,
  Seek(Seconds),
  GetPlaybackState,
  AddMixerTrack,
  RemoveMixerTrack(MixerTrackId),
  GetMixerTracks,
  SetParameter(ParamId, f64),
  GetActivePlugins,
}

struct Inner {
  calls: Vec<Call>,
  scripted: VecDeque<Result<Response, RemoteError>>,
  clip_snapshot: Option<ClipSnapshot>,
  mixer_tracks: Vec<MixerTrack>,
  plugins: Vec<PluginInstance>,
  playback: (bool, Seconds),
  defer: bool,
  deferred: Vec<Completion>,
}

#[derive(Clone)]
pub(crate) struct FakeRemote {
  tx: CompletionSender,
  inner: Rc<RefCell<Inner>>,
}

impl FakeRemote {
  pub fn new(tx: CompletionSender) -> FakeRemote {
    FakeRemote {
      tx,
      inner: Rc::new(RefCell::new(Inner {
        calls: Vec::new(),
        scripted: VecDeque::new(),
        clip_snapshot: None,
        mixer_tracks: Vec::new(),
        plugins: Vec::new(),
        playback: (false, 0.0),
        defer: false,
        deferred: Vec::new(),
      })),
    }
  }

  /// While deferred, completions are held back instead of sent; `flush`
  /// and `flush_reversed` deliver them, the latter out of request order.
  pub fn defer(&self, defer: bool) {
    self.inner.borrow_mut().defer = defer;
  }

  pub fn flush(&self) {
    let deferred: Vec<Completion> = self.inner.borrow_mut().deferred.drain(..).collect();
    for completion in deferred {
      drop(self.tx.send(completion));
    }
  }

  pub fn flush_reversed(&self) {
    let deferred: Vec<Completion> = self.inner.borrow_mut().deferred.drain(..).collect();
    for completion in deferred.into_iter().rev() {
      drop(self.tx.send(completion));
    }
  }

  pub fn calls(&self) -> Vec<Call> {
    self.inner.borrow().calls.clone()
  }

  pub fn call_count(&self) -> usize {
    self.inner.borrow().calls.len()
  }

  /// Queues the result for the next call instead of the default success.
  pub fn script(&self, result: Result<Response, RemoteError>) {
    self.inner.borrow_mut().scripted.push_back(result);
  }

  pub fn fail_next(&self, error: RemoteError) {
    self.script(Err(error));
  }

  pub fn set_clip_snapshot(&self, snapshot: ClipSnapshot) {
    self.inner.borrow_mut().clip_snapshot = Some(snapshot);
  }

  pub fn set_mixer_tracks(&self, tracks: Vec<MixerTrack>) {
    self.inner.borrow_mut().mixer_tracks = tracks;
  }

  pub fn set_plugins(&self, plugins: Vec<PluginInstance>) {
    self.inner.borrow_mut().plugins = plugins;
  }

  pub fn set_playback(&self, playing: bool, position: Seconds) {
    self.inner.borrow_mut().playback = (playing, position);
  }

  fn answer(&self, request: RequestId, call: Call) {
    let mut inner = self.inner.borrow_mut();
    let result = match inner.scripted.pop_front() {
      Some(result) => result,
      None => Ok(Self::default_response(&inner, &call)),
    };
    inner.calls.push(call);
    let completion = Completion { request, result };
    if inner.defer {
      inner.deferred.push(completion);
      return;
    }
    drop(inner);
    drop(self.tx.send(completion));
  }

  fn default_response(inner: &Inner, call: &Call) -> Response {
    match call {
      Call::AddClip(_) => Response::ClipAdded { id: ClipId::new() },
      Call::GetClip(id) => match inner.clip_snapshot.clone() {
        Some(snapshot) => Response::Clip { snapshot },
        None => Response::Clip {
          snapshot: ClipSnapshot {
            id: *id,
            name: "Clip".to_string(),
            start_time: 0.0,
            duration: 0.0,
            notes: Vec::new(),
            instrument_ids: Vec::new(),
            instrument_routes: Default::default(),
          },
        },
      },
      Call::GetMixerTracks => Response::MixerTracks {
        tracks: inner.mixer_tracks.clone(),
      },
      Call::GetActivePlugins => Response::Plugins {
        instances: inner.plugins.clone(),
      },
      Call::GetPlaybackState => Response::PlaybackState {
        playing: inner.playback.0,
        position: inner.playback.1,
      },
      _ => Response::Ack,
    }
  }
}

impl RemoteStore for FakeRemote {
  fn add_clip(&mut self, request: RequestId, clip: NewClip) {
    self.answer(request, Call::AddClip(clip));
  }

  fn update_clip(&mut self, request: RequestId, id: ClipId, patch: ClipPatch) {
    self.answer(request, Call::UpdateClip(id, patch));
  }

  fn get_clip(&mut self, request: RequestId, id: ClipId) {
    self.answer(request, Call::GetClip(id));
  }

  fn remove_clip(&mut self, request: RequestId, id: ClipId) {
    self.answer(request, Call::RemoveClip(id));
  }

  fn play(&mut self, request: RequestId) {
    self.answer(request, Call::Play);
  }

  fn pause(&mut self, request: RequestId) {
    self.answer(request, Call::Pause);
  }

  fn stop(&mut self, request: RequestId) {
    self.answer(request, Call::Stop);
  }

  fn seek(&mut self, request: RequestId, position: Seconds) {
    self.answer(request, Call::Seek(position));
  }

  fn get_playback_state(&mut self, request: RequestId) {
    self.answer(request, Call::GetPlaybackState);
  }

  fn add_mixer_track(&mut self, request: RequestId) {
    self.answer(request, Call::AddMixerTrack);
  }

  fn remove_mixer_track(&mut self, request: RequestId, id: MixerTrackId) {
    self.answer(request, Call::RemoveMixerTrack(id));
  }

  fn get_mixer_tracks(&mut self, request: RequestId) {
    self.answer(request, Call::GetMixerTracks);
  }

  fn set_parameter(&mut self, request: RequestId, param: ParamId, value: f64) {
    self.answer(request, Call::SetParameter(param, value));
  }

  fn get_active_plugins(&mut self, request: RequestId) {
    self.answer(request, Call::GetActivePlugins);
  }
}
