use std::collections::{HashMap, HashSet};

use failure::Fail;
use log::{debug, warn};

use crate::color::Color;
use crate::project::{
  Clip, ClipId, ClipUpdate, InstrumentId, MixerTrack, MixerTrackId, Note, NoteId, NoteUpdate,
  ParamId, TrackId,
};
use crate::remote::{
  ClipPatch, ClipSnapshot, Completion, CompletionReceiver, NewClip, NoteData, RemoteError,
  RemoteStore, RequestId, Response,
};
use crate::store::{Listener, ProjectStore, SubscriberId};
use crate::time::{MusicalLength, Position, Signature, Tempo, TimeModel};

#[derive(Debug, Fail, PartialEq)]
pub enum EditError {
  #[fail(display = "unknown clip: {}", id)]
  UnknownClip { id: ClipId },

  #[fail(display = "unknown note {} in clip {}", note, clip)]
  UnknownNote { clip: ClipId, note: NoteId },

  #[fail(display = "unknown mixer track: {}", id)]
  UnknownMixerTrack { id: MixerTrackId },
}

/// Non-blocking, user-visible message produced by a failed reconciliation.
#[derive(Debug, PartialEq, Clone)]
pub struct Notice {
  pub message: String,
}

enum Pending {
  CreateClip {
    local_id: ClipId,
    seq: u64,
    sync_notes: bool,
  },
  UpdateClip {
    id: ClipId,
    snapshot: Box<Clip>,
    seq: u64,
  },
  RemoveClip {
    id: ClipId,
    snapshot: Box<Clip>,
  },
  RefetchClip {
    id: ClipId,
  },
  Play {
    prev_playing: bool,
  },
  Pause {
    prev_playing: bool,
  },
  Stop {
    prev_playing: bool,
    prev_position: Position,
  },
  Seek {
    prev_position: Position,
  },
  PlaybackPoll,
  SetParameter {
    id: MixerTrackId,
    snapshot: MixerTrack,
    seq: u64,
  },
  AddMixerTrack,
  RemoveMixerTrack {
    index: usize,
    snapshot: MixerTrack,
  },
  MixerList,
  Plugins,
}

/// Owns the local mirror and the engine channel. Every user-visible
/// mutation goes through here: the pre-mutation state is snapshotted, the
/// local mirror is updated synchronously for the next frame, the matching
/// engine request is issued, and `pump` reconciles completions — verifying
/// success or rolling back, never overwriting local state with server
/// state (identifier assignment on creation is the single exception).
pub struct OptimisticEditor<R: RemoteStore> {
  store: ProjectStore,
  remote: R,
  completions: CompletionReceiver,
  pending: HashMap<RequestId, Pending>,
  clip_seqs: HashMap<ClipId, u64>,
  mixer_seqs: HashMap<MixerTrackId, u64>,
  transport_inflight: u32,
  next_request: RequestId,
  notices: Vec<Notice>,
}

impl<R: RemoteStore> OptimisticEditor<R> {
  pub fn new(store: ProjectStore, remote: R, completions: CompletionReceiver) -> Self {
    OptimisticEditor {
      store,
      remote,
      completions,
      pending: HashMap::new(),
      clip_seqs: HashMap::new(),
      mixer_seqs: HashMap::new(),
      transport_inflight: 0,
      next_request: 0,
      notices: Vec::new(),
    }
  }

  pub fn store(&self) -> &ProjectStore {
    &self.store
  }

  pub fn subscribe(&mut self, listener: Listener) -> SubscriberId {
    self.store.subscribe(listener)
  }

  pub fn unsubscribe(&mut self, id: SubscriberId) {
    self.store.unsubscribe(id);
  }

  pub fn take_notices(&mut self) -> Vec<Notice> {
    std::mem::replace(&mut self.notices, Vec::new())
  }

  pub fn has_pending_requests(&self) -> bool {
    !self.pending.is_empty()
  }

  fn notice<T>(&mut self, message: T)
  where
    T: Into<String>,
  {
    self.notices.push(Notice {
      message: message.into(),
    });
  }

  fn next_request(&mut self) -> RequestId {
    self.next_request += 1;
    self.next_request
  }

  fn clip_seq(&self, id: ClipId) -> u64 {
    *self.clip_seqs.get(&id).unwrap_or(&0)
  }

  fn bump_clip_seq(&mut self, id: ClipId) -> u64 {
    let seq = self.clip_seqs.entry(id).or_insert(0);
    *seq += 1;
    *seq
  }

  fn mixer_seq(&self, id: MixerTrackId) -> u64 {
    *self.mixer_seqs.get(&id).unwrap_or(&0)
  }

  fn bump_mixer_seq(&mut self, id: MixerTrackId) -> u64 {
    let seq = self.mixer_seqs.entry(id).or_insert(0);
    *seq += 1;
    *seq
  }

  // -- project info and selection ---------------------------------------

  pub fn set_tempo(&mut self, tempo: Tempo) {
    self.store.set_tempo(tempo);
  }

  pub fn set_signature(&mut self, signature: Signature) {
    self.store.set_signature(signature);
  }

  pub fn set_project_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.store.set_project_name(name);
  }

  pub fn select_clip(&mut self, id: Option<ClipId>) {
    self.store.select_clip(id);
  }

  pub fn select_track(&mut self, id: Option<TrackId>) {
    self.store.select_track(id);
  }

  // -- clips -------------------------------------------------------------

  /// Creates a clip optimistically under a client id; the engine answer
  /// either confirms it (possibly re-keying it to the authority id) or
  /// discards the local copy.
  pub fn add_clip<T>(
    &mut self,
    track_id: TrackId,
    name: T,
    color: Color,
    start: Position,
    length: MusicalLength,
    instrument_ids: HashSet<InstrumentId>,
  ) -> ClipId
  where
    T: Into<String>,
  {
    let name = name.into();
    let model = self.store.model();
    let mut clip = Clip::new(track_id, name.clone(), color, start, length);
    model.refresh_position(&mut clip.start);
    clip.length.refresh(&model);
    clip.instrument_ids = instrument_ids.clone();

    let local_id = clip.id;
    let start_time = model.position_to_seconds(&clip.start);
    let duration = clip.length.get_seconds();
    let seq = self.bump_clip_seq(local_id);
    self.store.insert_clip(clip);

    let request = self.next_request();
    self.pending.insert(
      request,
      Pending::CreateClip {
        local_id,
        seq,
        sync_notes: false,
      },
    );
    self.remote.add_clip(
      request,
      NewClip {
        name,
        start_time,
        duration,
        instrument_ids: instrument_ids.into_iter().collect(),
      },
    );
    local_id
  }

  /// Clones an existing clip (fresh client ids, notes included) at a new
  /// start position. Notes are pushed in a follow-up update once the
  /// engine has confirmed the new clip.
  pub fn copy_clip(
    &mut self,
    source: ClipId,
    track_id: TrackId,
    start: Position,
  ) -> Result<ClipId, EditError> {
    let source_clip = self
      .store
      .clip(source)
      .cloned()
      .ok_or(EditError::UnknownClip { id: source })?;

    let model = self.store.model();
    let mut clip = source_clip;
    clip.id = ClipId::new();
    clip.track_id = track_id;
    clip.start = start;
    model.refresh_position(&mut clip.start);
    for note in clip.notes.iter_mut() {
      note.id = NoteId::new();
    }

    let local_id = clip.id;
    let sync_notes = !clip.notes.is_empty();
    let start_time = model.position_to_seconds(&clip.start);
    let duration = clip.length.get_seconds();
    let name = clip.name.clone();
    let instrument_ids: Vec<InstrumentId> = clip.instrument_ids.iter().cloned().collect();
    let seq = self.bump_clip_seq(local_id);
    self.store.insert_clip(clip);

    let request = self.next_request();
    self.pending.insert(
      request,
      Pending::CreateClip {
        local_id,
        seq,
        sync_notes,
      },
    );
    self.remote.add_clip(
      request,
      NewClip {
        name,
        start_time,
        duration,
        instrument_ids,
      },
    );
    Ok(local_id)
  }

  /// The optimistic apply contract: snapshot, merge locally, forward.
  pub fn update_clip(&mut self, id: ClipId, update: ClipUpdate) -> Result<(), EditError> {
    if update.is_empty() {
      return Ok(());
    }
    let snapshot = self
      .store
      .clip(id)
      .cloned()
      .ok_or(EditError::UnknownClip { id })?;

    let model = self.store.model();
    let patch = Self::to_patch(&model, &update);
    let seq = self.bump_clip_seq(id);
    self.store.merge_clip(id, &update);

    let request = self.next_request();
    self.pending.insert(
      request,
      Pending::UpdateClip {
        id,
        snapshot: Box::new(snapshot),
        seq,
      },
    );
    self.remote.update_clip(request, id, patch);
    Ok(())
  }

  pub fn remove_clip(&mut self, id: ClipId) -> Result<(), EditError> {
    let snapshot = self
      .store
      .remove_clip(id)
      .ok_or(EditError::UnknownClip { id })?;

    let request = self.next_request();
    self.pending.insert(
      request,
      Pending::RemoveClip {
        id,
        snapshot: Box::new(snapshot),
      },
    );
    self.remote.remove_clip(request, id);
    Ok(())
  }

  /// Replaces the local mirror entity from the authoritative snapshot.
  /// Never triggered automatically; see DESIGN.md.
  pub fn refetch_clip(&mut self, id: ClipId) -> Result<(), EditError> {
    if self.store.clip(id).is_none() {
      return Err(EditError::UnknownClip { id });
    }
    let request = self.next_request();
    self.pending.insert(request, Pending::RefetchClip { id });
    self.remote.get_clip(request, id);
    Ok(())
  }

  // -- notes -------------------------------------------------------------

  /// Note edits ship the whole note list, the engine's unit of note
  /// exchange.
  pub fn add_note(
    &mut self,
    clip_id: ClipId,
    pitch: u8,
    start: Position,
    duration: MusicalLength,
    velocity: f64,
  ) -> Result<NoteId, EditError> {
    let clip = self
      .store
      .clip(clip_id)
      .ok_or(EditError::UnknownClip { id: clip_id })?;

    let note = Note::new(pitch, start, duration, velocity);
    let note_id = note.id;
    let mut notes = clip.notes.clone();
    notes.push(note);
    self.update_clip(clip_id, ClipUpdate::new().notes(notes))?;
    Ok(note_id)
  }

  pub fn update_note(
    &mut self,
    clip_id: ClipId,
    note_id: NoteId,
    update: NoteUpdate,
  ) -> Result<(), EditError> {
    if update.is_empty() {
      return Ok(());
    }
    let clip = self
      .store
      .clip(clip_id)
      .ok_or(EditError::UnknownClip { id: clip_id })?;

    let mut notes = clip.notes.clone();
    {
      let note = notes
        .iter_mut()
        .find(|note| note.id == note_id)
        .ok_or(EditError::UnknownNote {
          clip: clip_id,
          note: note_id,
        })?;
      if let Some(pitch) = update.pitch {
        note.set_pitch(pitch);
      }
      if let Some(start) = update.start {
        note.start = start;
      }
      if let Some(duration) = update.duration {
        note.duration = duration;
      }
      if let Some(velocity) = update.velocity {
        note.set_velocity(velocity);
      }
    }
    self.update_clip(clip_id, ClipUpdate::new().notes(notes))
  }

  pub fn remove_note(&mut self, clip_id: ClipId, note_id: NoteId) -> Result<(), EditError> {
    let clip = self
      .store
      .clip(clip_id)
      .ok_or(EditError::UnknownClip { id: clip_id })?;

    if clip.note(note_id).is_none() {
      return Err(EditError::UnknownNote {
        clip: clip_id,
        note: note_id,
      });
    }
    let notes: Vec<Note> = clip
      .notes
      .iter()
      .filter(|note| note.id != note_id)
      .cloned()
      .collect();
    self.update_clip(clip_id, ClipUpdate::new().notes(notes))
  }

  // -- transport ---------------------------------------------------------

  pub fn play(&mut self) {
    let prev_playing = self.store.playback().is_playing();
    self.store.set_playing(true);
    let request = self.next_request();
    self.pending.insert(request, Pending::Play { prev_playing });
    self.transport_inflight += 1;
    self.remote.play(request);
  }

  pub fn pause(&mut self) {
    let prev_playing = self.store.playback().is_playing();
    self.store.set_playing(false);
    let request = self.next_request();
    self.pending.insert(request, Pending::Pause { prev_playing });
    self.transport_inflight += 1;
    self.remote.pause(request);
  }

  pub fn toggle_playback(&mut self) {
    if self.store.playback().is_playing() {
      self.pause();
    } else {
      self.play();
    }
  }

  pub fn stop(&mut self) {
    let playback = self.store.playback();
    let prev_playing = playback.is_playing();
    let prev_position = playback.get_position();
    let origin = self.store.model().make_position(1, 1, 1, 0);
    self.store.set_playing(false);
    self.store.set_playback_position(origin);
    let request = self.next_request();
    self.pending.insert(
      request,
      Pending::Stop {
        prev_playing,
        prev_position,
      },
    );
    self.transport_inflight += 1;
    self.remote.stop(request);
  }

  pub fn seek(&mut self, position: Position) {
    let prev_position = self.store.playback().get_position();
    let model = self.store.model();
    let position = model.ticks_to_position(model.position_to_ticks(&position));
    let seconds = position.get_time();
    self.store.set_playback_position(position);
    let request = self.next_request();
    self.pending.insert(request, Pending::Seek { prev_position });
    self.remote.seek(request, seconds);
  }

  /// Asks the engine for the playhead. While a play/pause/stop request is
  /// still in flight the polled flag does not override the optimistic one.
  pub fn poll_playback(&mut self) {
    let request = self.next_request();
    self.pending.insert(request, Pending::PlaybackPoll);
    self.remote.get_playback_state(request);
  }

  // -- mixer and plugins -------------------------------------------------

  pub fn fetch_mixer_tracks(&mut self) {
    let request = self.next_request();
    self.pending.insert(request, Pending::MixerList);
    self.remote.get_mixer_tracks(request);
  }

  pub fn add_mixer_track(&mut self) {
    let request = self.next_request();
    self.pending.insert(request, Pending::AddMixerTrack);
    self.remote.add_mixer_track(request);
  }

  pub fn remove_mixer_track(&mut self, id: MixerTrackId) -> Result<(), EditError> {
    let (index, snapshot) = self
      .store
      .remove_mixer_track(id)
      .ok_or(EditError::UnknownMixerTrack { id })?;
    let request = self.next_request();
    self.pending.insert(
      request,
      Pending::RemoveMixerTrack { index, snapshot },
    );
    self.remote.remove_mixer_track(request, id);
    Ok(())
  }

  pub fn set_mixer_volume(&mut self, id: MixerTrackId, volume: f64) -> Result<(), EditError> {
    let volume = volume.max(0.0).min(1.0);
    self.set_mixer_parameter(id, ParamId::fader_gain(id), volume, |track, value| {
      track.volume = value
    })
  }

  pub fn set_mixer_pan(&mut self, id: MixerTrackId, pan: f64) -> Result<(), EditError> {
    let pan = pan.max(-1.0).min(1.0);
    self.set_mixer_parameter(id, ParamId::pan(id), pan, |track, value| track.pan = value)
  }

  fn set_mixer_parameter<F>(
    &mut self,
    id: MixerTrackId,
    param: ParamId,
    value: f64,
    apply: F,
  ) -> Result<(), EditError>
  where
    F: FnOnce(&mut MixerTrack, f64),
  {
    let snapshot = self
      .store
      .mixer_track(id)
      .cloned()
      .ok_or(EditError::UnknownMixerTrack { id })?;

    let seq = self.bump_mixer_seq(id);
    if let Some(track) = self.store.mixer_track_mut(id) {
      apply(track, value);
    }
    self.store.notify_mixer_changed();

    let request = self.next_request();
    self.pending.insert(
      request,
      Pending::SetParameter { id, snapshot, seq },
    );
    self.remote.set_parameter(request, param, value);
    Ok(())
  }

  // TODO forward mute/solo to the engine once it exposes parameter slots
  // for them; until then they only shape local rendering.
  pub fn toggle_mixer_mute(&mut self, id: MixerTrackId) -> Result<(), EditError> {
    match self.store.mixer_track_mut(id) {
      Some(track) => {
        track.mute = !track.mute;
        self.store.notify_mixer_changed();
        Ok(())
      }
      None => Err(EditError::UnknownMixerTrack { id }),
    }
  }

  pub fn toggle_mixer_solo(&mut self, id: MixerTrackId) -> Result<(), EditError> {
    match self.store.mixer_track_mut(id) {
      Some(track) => {
        track.solo = !track.solo;
        self.store.notify_mixer_changed();
        Ok(())
      }
      None => Err(EditError::UnknownMixerTrack { id }),
    }
  }

  pub fn fetch_active_plugins(&mut self) {
    let request = self.next_request();
    self.pending.insert(request, Pending::Plugins);
    self.remote.get_active_plugins(request);
  }

  // -- reconciliation ----------------------------------------------------

  /// Drains and reconciles every completion delivered so far. Returns how
  /// many were handled.
  pub fn pump(&mut self) -> usize {
    let mut handled = 0;
    loop {
      let completion = match self.completions.try_recv() {
        Ok(completion) => completion,
        Err(_) => break,
      };
      self.reconcile(completion);
      handled += 1;
    }
    handled
  }

  fn reconcile(&mut self, completion: Completion) {
    let pending = match self.pending.remove(&completion.request) {
      Some(pending) => pending,
      None => {
        warn!("completion for unknown request {}", completion.request);
        return;
      }
    };

    match pending {
      Pending::CreateClip {
        local_id,
        seq,
        sync_notes,
      } => self.reconcile_create(local_id, seq, sync_notes, completion.result),

      Pending::UpdateClip { id, snapshot, seq } => match completion.result {
        Ok(_) => {}
        Err(RemoteError::Unavailable { cause }) => {
          warn!("engine unavailable, keeping optimistic edit of {}: {}", id, cause);
        }
        Err(RemoteError::NotFound { .. }) => {
          self.drop_stale_clip(id);
        }
        Err(RemoteError::Rejected { reason }) => {
          if self.clip_seq(id) == seq {
            let name = snapshot.name.clone();
            self.store.restore_clip(*snapshot);
            self.notice(format!("Edit of '{}' was rejected: {}", name, reason));
          } else {
            debug!("stale rejection for clip {} superseded by a newer edit", id);
          }
        }
      },

      Pending::RemoveClip { id, snapshot } => match completion.result {
        Ok(_) => {
          self.clip_seqs.remove(&id);
        }
        Err(RemoteError::NotFound { .. }) => {
          self.clip_seqs.remove(&id);
        }
        Err(RemoteError::Unavailable { cause }) => {
          warn!("engine unavailable, keeping removal of clip {}: {}", id, cause);
        }
        Err(RemoteError::Rejected { reason }) => {
          if self.store.clip(id).is_none() {
            let name = snapshot.name.clone();
            self.store.restore_clip(*snapshot);
            self.notice(format!("Could not remove '{}': {}", name, reason));
          }
        }
      },

      Pending::RefetchClip { id } => match completion.result {
        Ok(Response::Clip { snapshot }) => self.ingest_snapshot(id, snapshot),
        Ok(response) => warn!("unexpected refetch response: {:?}", response),
        Err(RemoteError::NotFound { .. }) => {
          self.drop_stale_clip(id);
        }
        Err(err) => warn!("refetch of clip {} failed: {}", id, err),
      },

      Pending::Play { prev_playing } => {
        self.transport_inflight -= 1;
        if let Err(err) = completion.result {
          self.store.set_playing(prev_playing);
          self.transport_failure("start playback", err);
        }
      }

      Pending::Pause { prev_playing } => {
        self.transport_inflight -= 1;
        if let Err(err) = completion.result {
          self.store.set_playing(prev_playing);
          self.transport_failure("pause playback", err);
        }
      }

      Pending::Stop {
        prev_playing,
        prev_position,
      } => {
        self.transport_inflight -= 1;
        if let Err(err) = completion.result {
          self.store.set_playing(prev_playing);
          self.store.set_playback_position(prev_position);
          self.transport_failure("stop playback", err);
        }
      }

      Pending::Seek { prev_position } => {
        if let Err(err) = completion.result {
          self.store.set_playback_position(prev_position);
          self.transport_failure("seek", err);
        }
      }

      Pending::PlaybackPoll => match completion.result {
        Ok(Response::PlaybackState { playing, position }) => {
          let model = self.store.model();
          self.store.set_playback_position(model.seconds_to_position(position));
          if self.transport_inflight == 0 {
            self.store.set_playing(playing);
          }
        }
        Ok(response) => warn!("unexpected playback response: {:?}", response),
        Err(err) => debug!("playback poll failed: {}", err),
      },

      Pending::SetParameter { id, snapshot, seq } => match completion.result {
        Ok(_) => {}
        Err(RemoteError::Unavailable { cause }) => {
          warn!("engine unavailable, keeping mixer edit of track {}: {}", id, cause);
        }
        Err(RemoteError::NotFound { .. }) => {
          self.notice(format!("Mixer track {} no longer exists", id));
          self.fetch_mixer_tracks();
        }
        Err(RemoteError::Rejected { reason }) => {
          if self.mixer_seq(id) == seq {
            self.store.replace_mixer_track(snapshot);
            self.notice(format!("Mixer change was rejected: {}", reason));
          }
        }
      },

      Pending::AddMixerTrack => match completion.result {
        Ok(_) => self.fetch_mixer_tracks(),
        Err(err) => {
          self.notice(format!("Could not add mixer track: {}", err));
        }
      },

      Pending::RemoveMixerTrack { index, snapshot } => match completion.result {
        Ok(_) => self.fetch_mixer_tracks(),
        Err(RemoteError::NotFound { .. }) => {}
        Err(RemoteError::Unavailable { cause }) => {
          warn!("engine unavailable, keeping mixer track removal: {}", cause);
        }
        Err(RemoteError::Rejected { reason }) => {
          self.store.insert_mixer_track_at(index, snapshot);
          self.notice(format!("Could not remove mixer track: {}", reason));
        }
      },

      Pending::MixerList => match completion.result {
        Ok(Response::MixerTracks { tracks }) => self.store.replace_mixer_tracks(tracks),
        Ok(response) => warn!("unexpected mixer response: {:?}", response),
        Err(err) => warn!("mixer track fetch failed: {}", err),
      },

      Pending::Plugins => match completion.result {
        Ok(Response::Plugins { instances }) => self.store.replace_instruments(instances),
        Ok(response) => warn!("unexpected plugin response: {:?}", response),
        Err(err) => warn!("plugin fetch failed: {}", err),
      },
    }
  }

  fn reconcile_create(
    &mut self,
    local_id: ClipId,
    seq: u64,
    sync_notes: bool,
    result: Result<Response, RemoteError>,
  ) {
    match result {
      Ok(Response::ClipAdded { id }) => {
        if id != local_id {
          self.store.rekey_clip(local_id, id);
          if let Some(seq) = self.clip_seqs.remove(&local_id) {
            self.clip_seqs.insert(id, seq);
          }
        }
        if sync_notes {
          let model = self.store.model();
          let follow_up = self.store.clip(id).and_then(|clip| {
            if clip.notes.is_empty() {
              None
            } else {
              Some((clip.clone(), Self::notes_to_wire(&model, &clip.notes)))
            }
          });
          if let Some((snapshot, notes)) = follow_up {
            let seq = self.bump_clip_seq(id);
            let request = self.next_request();
            self.pending.insert(
              request,
              Pending::UpdateClip {
                id,
                snapshot: Box::new(snapshot),
                seq,
              },
            );
            self.remote.update_clip(
              request,
              id,
              ClipPatch {
                notes: Some(notes),
                ..ClipPatch::default()
              },
            );
          }
        }
      }
      Ok(response) => warn!("unexpected creation response: {:?}", response),
      Err(err) => {
        // An unconfirmed creation cannot be kept: the engine never
        // registered the entity.
        if self.clip_seq(local_id) == seq {
          self.store.remove_clip(local_id);
          self.clip_seqs.remove(&local_id);
        }
        match err {
          RemoteError::Unavailable { cause } => {
            warn!("engine unavailable, discarding new clip {}: {}", local_id, cause);
          }
          _ => self.notice(format!("Could not add clip: {}", err)),
        }
      }
    }
  }

  fn drop_stale_clip(&mut self, id: ClipId) {
    if let Some(clip) = self.store.remove_clip(id) {
      self.notice(format!("'{}' no longer exists and was removed", clip.name));
    }
    self.clip_seqs.remove(&id);
  }

  fn transport_failure(&mut self, action: &str, err: RemoteError) {
    match err {
      RemoteError::Rejected { reason } => {
        self.notice(format!("Could not {}: {}", action, reason));
      }
      err => warn!("could not {}: {}", action, err),
    }
  }

  fn ingest_snapshot(&mut self, id: ClipId, snapshot: ClipSnapshot) {
    let model = self.store.model();
    let notes = snapshot
      .notes
      .iter()
      .map(|note| {
        Note::new(
          note.pitch,
          model.seconds_to_position(note.relative_start),
          MusicalLength::from_ticks(model.seconds_to_ticks(note.duration), &model),
          note.velocity,
        )
      })
      .collect();
    let update = ClipUpdate {
      name: Some(snapshot.name),
      start: Some(model.seconds_to_position(snapshot.start_time)),
      length: Some(MusicalLength::from_ticks(
        model.seconds_to_ticks(snapshot.duration),
        &model,
      )),
      notes: Some(notes),
      instrument_ids: Some(snapshot.instrument_ids.into_iter().collect()),
      instrument_routes: Some(
        snapshot
          .instrument_routes
          .into_iter()
          .map(|(instrument, tracks)| (instrument, tracks.into_iter().collect()))
          .collect(),
      ),
    };
    if !self.store.merge_clip(id, &update) {
      debug!("refetched clip {} vanished locally", id);
    }
  }

  fn to_patch(model: &TimeModel, update: &ClipUpdate) -> ClipPatch {
    ClipPatch {
      name: update.name.clone(),
      start_time: update
        .start
        .as_ref()
        .map(|start| model.position_to_seconds(start)),
      duration: update.length.as_ref().map(|length| length.get_seconds()),
      notes: update
        .notes
        .as_ref()
        .map(|notes| Self::notes_to_wire(model, notes)),
      instrument_ids: update
        .instrument_ids
        .as_ref()
        .map(|ids| ids.iter().cloned().collect()),
      instrument_routes: update.instrument_routes.as_ref().map(|routes| {
        routes
          .iter()
          .map(|(instrument, tracks)| (*instrument, tracks.iter().cloned().collect()))
          .collect()
      }),
    }
  }

  fn notes_to_wire(model: &TimeModel, notes: &[Note]) -> Vec<NoteData> {
    notes
      .iter()
      .map(|note| NoteData {
        pitch: note.pitch,
        relative_start: model.position_to_seconds(&note.start),
        duration: note.duration.get_seconds(),
        velocity: note.velocity,
      })
      .collect()
  }
}
