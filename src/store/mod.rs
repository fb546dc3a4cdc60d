use log::debug;

use crate::color;
use crate::config::Config;
use crate::project::{
  Clip, ClipId, ClipUpdate, MixerTrack, MixerTrackId, PluginInstance, Track, TrackId,
};
use crate::time::{Position, Signature, Tempo, TimeError, TimeModel};

pub type Version = u64;
pub type SubscriberId = u64;

pub type Listener = Box<dyn FnMut(Version, &Change)>;

/// What changed in the mirror, delivered to subscribers together with the
/// store version that the change produced.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Change {
  Project,
  ClipAdded(ClipId),
  ClipChanged(ClipId),
  ClipRemoved(ClipId),
  ClipRekeyed { old: ClipId, new: ClipId },
  Tracks,
  Mixer,
  Instruments,
  Selection,
  Playback,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ProjectInfo {
  name: String,
  artist: String,
  tempo: Tempo,
  signature: Signature,
}

impl ProjectInfo {
  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn get_artist(&self) -> &str {
    self.artist.as_str()
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PlaybackState {
  playing: bool,
  position: Position,
}

impl PlaybackState {
  pub fn is_playing(&self) -> bool {
    self.playing
  }

  pub fn get_position(&self) -> Position {
    self.position
  }
}

/// Process-scoped local mirror of the engine-owned project. Reads are free
/// for any caller; entity mutation is crate-internal so that every
/// user-visible change goes through the optimistic editor.
pub struct ProjectStore {
  info: ProjectInfo,
  playback: PlaybackState,
  tracks: Vec<Track>,
  mixer_tracks: Vec<MixerTrack>,
  instruments: Vec<PluginInstance>,
  clips: Vec<Clip>,
  selected_clip: Option<ClipId>,
  selected_track: Option<TrackId>,
  version: Version,
  next_subscriber: SubscriberId,
  subscribers: Vec<(SubscriberId, Listener)>,
}

impl ProjectStore {
  /// An empty project with the given timing context.
  pub fn new(tempo: Tempo, signature: Signature) -> ProjectStore {
    ProjectStore {
      info: ProjectInfo {
        name: "New Project".to_string(),
        artist: "User".to_string(),
        tempo,
        signature,
      },
      playback: PlaybackState {
        playing: false,
        position: TimeModel::new(tempo, signature).make_position(1, 1, 1, 0),
      },
      tracks: Vec::new(),
      mixer_tracks: Vec::new(),
      instruments: Vec::new(),
      clips: Vec::new(),
      selected_clip: None,
      selected_track: None,
      version: 0,
      next_subscriber: 0,
      subscribers: Vec::new(),
    }
  }

  /// A default project: config-provided timing plus the starter lanes.
  pub fn from_config(config: &Config) -> Result<ProjectStore, TimeError> {
    let tempo = config.project.tempo()?;
    let signature = config.project.time_signature()?;
    let mut store = ProjectStore::new(tempo, signature);
    store.info.name = config.project.name.clone();
    for (index, name) in ["Grand Piano", "Drums", "Bass"].iter().enumerate() {
      store
        .tracks
        .push(Track::new(index as TrackId, *name, color::track_color(index)));
    }
    Ok(store)
  }

  pub fn model(&self) -> TimeModel {
    TimeModel::new(self.info.tempo, self.info.signature)
  }

  pub fn info(&self) -> &ProjectInfo {
    &self.info
  }

  pub fn playback(&self) -> PlaybackState {
    self.playback
  }

  pub fn tracks(&self) -> &[Track] {
    &self.tracks
  }

  pub fn mixer_tracks(&self) -> &[MixerTrack] {
    &self.mixer_tracks
  }

  pub fn instruments(&self) -> &[PluginInstance] {
    &self.instruments
  }

  pub fn clips(&self) -> &[Clip] {
    &self.clips
  }

  pub fn clip(&self, id: ClipId) -> Option<&Clip> {
    self.clips.iter().find(|clip| clip.id == id)
  }

  pub fn mixer_track(&self, id: MixerTrackId) -> Option<&MixerTrack> {
    self.mixer_tracks.iter().find(|track| track.id == id)
  }

  pub fn selected_clip(&self) -> Option<ClipId> {
    self.selected_clip
  }

  pub fn selected_track(&self) -> Option<TrackId> {
    self.selected_track
  }

  pub fn version(&self) -> Version {
    self.version
  }

  /// Registers a change listener; the returned id unsubscribes it.
  pub fn subscribe(&mut self, listener: Listener) -> SubscriberId {
    let id = self.next_subscriber;
    self.next_subscriber += 1;
    self.subscribers.push((id, listener));
    id
  }

  pub fn unsubscribe(&mut self, id: SubscriberId) {
    self.subscribers.retain(|(subscriber, _)| *subscriber != id);
  }

  fn notify(&mut self, change: Change) {
    self.version += 1;
    let version = self.version;
    for (_, listener) in self.subscribers.iter_mut() {
      listener(version, &change);
    }
  }

  // -- project info ------------------------------------------------------

  pub(crate) fn set_project_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.info.name = name.into();
    self.notify(Change::Project);
  }

  pub(crate) fn set_tempo(&mut self, tempo: Tempo) {
    self.info.tempo = tempo;
    self.refresh_time_caches();
    self.notify(Change::Project);
  }

  pub(crate) fn set_signature(&mut self, signature: Signature) {
    self.info.signature = signature;
    self.refresh_time_caches();
    self.notify(Change::Project);
  }

  /// Every derived seconds value in the mirror is only valid under the
  /// timing context it was computed with; recompute them all.
  fn refresh_time_caches(&mut self) {
    let model = self.model();
    for clip in self.clips.iter_mut() {
      model.refresh_position(&mut clip.start);
      clip.length.refresh(&model);
      for note in clip.notes.iter_mut() {
        model.refresh_position(&mut note.start);
        note.duration.refresh(&model);
      }
    }
    model.refresh_position(&mut self.playback.position);
  }

  // -- selection ---------------------------------------------------------

  pub(crate) fn select_clip(&mut self, id: Option<ClipId>) {
    if self.selected_clip != id {
      self.selected_clip = id;
      self.notify(Change::Selection);
    }
  }

  pub(crate) fn select_track(&mut self, id: Option<TrackId>) {
    if self.selected_track != id {
      self.selected_track = id;
      self.notify(Change::Selection);
    }
  }

  // -- playback ----------------------------------------------------------

  pub(crate) fn set_playing(&mut self, playing: bool) {
    if self.playback.playing != playing {
      self.playback.playing = playing;
      self.notify(Change::Playback);
    }
  }

  pub(crate) fn set_playback_position(&mut self, position: Position) {
    self.playback.position = position;
    self.notify(Change::Playback);
  }

  // -- clips -------------------------------------------------------------

  pub(crate) fn insert_clip(&mut self, clip: Clip) {
    let id = clip.id;
    self.clips.push(clip);
    self.notify(Change::ClipAdded(id));
  }

  pub(crate) fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
    let index = self.clips.iter().position(|clip| clip.id == id)?;
    let clip = self.clips.remove(index);
    if self.selected_clip == Some(id) {
      self.selected_clip = None;
      self.notify(Change::Selection);
    }
    self.notify(Change::ClipRemoved(id));
    Some(clip)
  }

  /// Puts a rollback snapshot back in place of the current entity state,
  /// re-adding the clip if it is gone.
  pub(crate) fn restore_clip(&mut self, snapshot: Clip) {
    let id = snapshot.id;
    match self.clips.iter_mut().find(|clip| clip.id == id) {
      Some(clip) => {
        *clip = snapshot;
        self.notify(Change::ClipChanged(id));
      }
      None => {
        self.clips.push(snapshot);
        self.notify(Change::ClipAdded(id));
      }
    }
  }

  /// Swaps a client-generated id for the authority-issued one.
  pub(crate) fn rekey_clip(&mut self, old: ClipId, new: ClipId) -> bool {
    match self.clips.iter_mut().find(|clip| clip.id == old) {
      Some(clip) => {
        clip.id = new;
        if self.selected_clip == Some(old) {
          self.selected_clip = Some(new);
        }
        self.notify(Change::ClipRekeyed { old, new });
        true
      }
      None => {
        debug!("cannot rekey unknown clip {}", old);
        false
      }
    }
  }

  /// Merges a partial update into a clip, refreshing the derived time
  /// caches of every field it touches.
  pub(crate) fn merge_clip(&mut self, id: ClipId, update: &ClipUpdate) -> bool {
    let model = self.model();
    let clip = match self.clips.iter_mut().find(|clip| clip.id == id) {
      Some(clip) => clip,
      None => return false,
    };

    if let Some(ref name) = update.name {
      clip.name = name.clone();
    }
    if let Some(start) = update.start {
      clip.start = start;
      model.refresh_position(&mut clip.start);
    }
    if let Some(length) = update.length {
      clip.length = length;
      clip.length.refresh(&model);
    }
    if let Some(ref notes) = update.notes {
      clip.notes = notes.clone();
      for note in clip.notes.iter_mut() {
        model.refresh_position(&mut note.start);
        note.duration.refresh(&model);
      }
    }
    if let Some(ref instrument_ids) = update.instrument_ids {
      clip.instrument_ids = instrument_ids.clone();
    }
    if let Some(ref instrument_routes) = update.instrument_routes {
      clip.instrument_routes = instrument_routes.clone();
    }

    self.notify(Change::ClipChanged(id));
    true
  }

  // -- mixer and plugins -------------------------------------------------

  pub(crate) fn replace_mixer_tracks(&mut self, tracks: Vec<MixerTrack>) {
    self.mixer_tracks = tracks;
    self.notify(Change::Mixer);
  }

  pub(crate) fn replace_mixer_track(&mut self, track: MixerTrack) -> bool {
    match self
      .mixer_tracks
      .iter_mut()
      .find(|candidate| candidate.id == track.id)
    {
      Some(slot) => {
        *slot = track;
        self.notify(Change::Mixer);
        true
      }
      None => false,
    }
  }

  pub(crate) fn mixer_track_mut(&mut self, id: MixerTrackId) -> Option<&mut MixerTrack> {
    self.mixer_tracks.iter_mut().find(|track| track.id == id)
  }

  pub(crate) fn remove_mixer_track(&mut self, id: MixerTrackId) -> Option<(usize, MixerTrack)> {
    let index = self.mixer_tracks.iter().position(|track| track.id == id)?;
    let track = self.mixer_tracks.remove(index);
    self.notify(Change::Mixer);
    Some((index, track))
  }

  pub(crate) fn insert_mixer_track_at(&mut self, index: usize, track: MixerTrack) {
    let index = index.min(self.mixer_tracks.len());
    self.mixer_tracks.insert(index, track);
    self.notify(Change::Mixer);
  }

  pub(crate) fn notify_mixer_changed(&mut self) {
    self.notify(Change::Mixer);
  }

  pub(crate) fn replace_instruments(&mut self, instruments: Vec<PluginInstance>) {
    self.instruments = instruments;
    self.notify(Change::Instruments);
  }
}
