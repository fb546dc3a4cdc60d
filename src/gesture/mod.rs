use failure::Fail;
use log::{debug, warn};

use crate::editor::{EditError, OptimisticEditor};
use crate::project::note::MAX_PITCH;
use crate::project::{ClipId, ClipUpdate, NoteId, NoteUpdate};
use crate::remote::RemoteStore;
use crate::time::{MusicalLength, SnapGrid, TicksTime, TimeModel};
use crate::view::{PixelPoint, Zoom};

#[derive(Debug, Fail, PartialEq)]
pub enum GestureError {
  #[fail(display = "drag target not found")]
  TargetNotFound,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DragMode {
  Move,
  ResizeLeft,
  ResizeRight,
  CopyDrag,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DragTarget {
  Clip(ClipId),
  Note { clip: ClipId, note: NoteId },
}

/// Entity created by a copy-drag commit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Created {
  Clip(ClipId),
  Note(NoteId),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DragOutcome {
  Committed { created: Option<Created> },
  Cancelled,
}

/// Local-only visual state for the rendering surface while a drag is in
/// flight; the backing store stays untouched until commit.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DragPreview {
  pub target: DragTarget,
  pub mode: DragMode,
  pub start_ticks: TicksTime,
  pub length_ticks: TicksTime,
  pub pitch: Option<u8>,
  pub moved: bool,
}

struct ActiveDrag {
  target: DragTarget,
  mode: DragMode,
  origin: PixelPoint,
  start_ticks: TicksTime,
  length_ticks: TicksTime,
  pitch: Option<u8>,
  velocity: f64,
  cur_start: TicksTime,
  cur_length: TicksTime,
  cur_pitch: Option<u8>,
}

impl ActiveDrag {
  fn moved(&self) -> bool {
    self.cur_start != self.start_ticks
      || self.cur_length != self.length_ticks
      || self.cur_pitch != self.pitch
  }
}

/// State machine for one pointer interaction:
/// `Idle → Dragging(mode) → Committed | Cancelled`. Pointer capture is held
/// exactly while `active` is occupied, and every exit path — commit,
/// cancel, capture loss, a second begin — takes it down before anything
/// else can fail.
pub struct DragGesture {
  zoom: Zoom,
  snap: SnapGrid,
  min_length: TicksTime,
  row_height: f64,
  active: Option<ActiveDrag>,
}

impl DragGesture {
  pub fn new(zoom: Zoom, snap: SnapGrid, min_length: TicksTime, row_height: f64) -> DragGesture {
    DragGesture {
      zoom,
      snap,
      min_length,
      row_height,
      active: None,
    }
  }

  pub fn is_dragging(&self) -> bool {
    self.active.is_some()
  }

  pub fn set_zoom(&mut self, zoom: Zoom) {
    self.zoom = zoom;
  }

  pub fn set_snap(&mut self, snap: SnapGrid) {
    self.snap = snap;
  }

  /// Primary-button press on a draggable element: records the pre-drag
  /// geometry and captures the pointer.
  pub fn begin<R: RemoteStore>(
    &mut self,
    editor: &OptimisticEditor<R>,
    target: DragTarget,
    mode: DragMode,
    origin: PixelPoint,
  ) -> Result<(), GestureError> {
    if self.active.take().is_some() {
      warn!("drag began while another was active; cancelling the old one");
    }

    let model = editor.store().model();
    let (start_ticks, length_ticks, pitch, velocity) = match target {
      DragTarget::Clip(id) => {
        let clip = editor.store().clip(id).ok_or(GestureError::TargetNotFound)?;
        (
          clip.start_ticks(&model),
          clip.length.get_total_ticks(),
          None,
          0.0,
        )
      }
      DragTarget::Note { clip, note } => {
        let note = editor
          .store()
          .clip(clip)
          .and_then(|clip| clip.note(note))
          .ok_or(GestureError::TargetNotFound)?;
        (
          model.position_to_ticks(&note.start),
          note.duration.get_total_ticks(),
          Some(note.pitch),
          note.velocity,
        )
      }
    };

    self.active = Some(ActiveDrag {
      target,
      mode,
      origin,
      start_ticks,
      length_ticks,
      pitch,
      velocity,
      cur_start: start_ticks,
      cur_length: length_ticks,
      cur_pitch: pitch,
    });
    Ok(())
  }

  /// Pointer move: recompute the snapped candidate. Each update supersedes
  /// the last; nothing is written to the store and no remote call is made.
  pub fn update(&mut self, model: &TimeModel, pointer: PixelPoint) {
    let zoom = self.zoom;
    let snap = self.snap;
    let min_length = self.min_length;
    let row_height = self.row_height;

    let active = match self.active.as_mut() {
      Some(active) => active,
      None => {
        debug!("pointer move without an active drag");
        return;
      }
    };

    let delta_ticks = (pointer.x - active.origin.x) / zoom.pixels_per_tick();

    match active.mode {
      DragMode::Move | DragMode::CopyDrag => {
        let raw = (f64::from(active.start_ticks) + delta_ticks).max(0.0);
        active.cur_start = model.snap_ticks(TicksTime::new(raw.round() as u64), snap);

        if let Some(pitch) = active.pitch {
          let rows = ((active.origin.y - pointer.y) / row_height).round() as i32;
          let candidate = i32::from(pitch) + rows;
          active.cur_pitch = Some(candidate.max(0).min(i32::from(MAX_PITCH)) as u8);
        }
      }

      DragMode::ResizeRight => {
        let raw = (f64::from(active.length_ticks) + delta_ticks).max(0.0);
        let snapped = model.snap_ticks(TicksTime::new(raw.round() as u64), snap);
        active.cur_length = if snapped < min_length {
          min_length
        } else {
          snapped
        };
      }

      DragMode::ResizeLeft => {
        let end = active.start_ticks + active.length_ticks;
        let raw = (f64::from(active.start_ticks) + delta_ticks).max(0.0);
        let mut snapped = model.snap_ticks(TicksTime::new(raw.round() as u64), snap);
        let limit = end - min_length;
        if snapped > limit {
          snapped = limit;
        }
        active.cur_start = snapped;
        active.cur_length = end - snapped;
      }
    }
  }

  pub fn preview(&self) -> Option<DragPreview> {
    self.active.as_ref().map(|active| DragPreview {
      target: active.target,
      mode: active.mode,
      start_ticks: active.cur_start,
      length_ticks: active.cur_length,
      pitch: active.cur_pitch,
      moved: active.moved(),
    })
  }

  /// Pointer release. A drag whose snapped value equals the pre-drag value
  /// cancels without a mutation; otherwise the resolved edit goes through
  /// the optimistic editor. A held copy modifier turns a move into a clone.
  pub fn commit<R: RemoteStore>(
    &mut self,
    editor: &mut OptimisticEditor<R>,
    copy_modifier: bool,
  ) -> Result<DragOutcome, EditError> {
    let active = match self.active.take() {
      Some(active) => active,
      None => {
        debug!("commit without an active drag");
        return Ok(DragOutcome::Cancelled);
      }
    };

    if !active.moved() {
      return Ok(DragOutcome::Cancelled);
    }

    let model = editor.store().model();
    let mode = match active.mode {
      DragMode::Move if copy_modifier => DragMode::CopyDrag,
      mode => mode,
    };

    let created = match (active.target, mode) {
      (DragTarget::Clip(id), DragMode::CopyDrag) => {
        let track_id = editor
          .store()
          .clip(id)
          .map(|clip| clip.track_id)
          .ok_or(EditError::UnknownClip { id })?;
        let created =
          editor.copy_clip(id, track_id, model.ticks_to_position(active.cur_start))?;
        Some(Created::Clip(created))
      }

      (DragTarget::Clip(id), DragMode::Move) => {
        editor.update_clip(
          id,
          ClipUpdate::new().start(model.ticks_to_position(active.cur_start)),
        )?;
        None
      }

      (DragTarget::Clip(id), DragMode::ResizeRight) => {
        editor.update_clip(
          id,
          ClipUpdate::new().length(MusicalLength::from_ticks(active.cur_length, &model)),
        )?;
        None
      }

      (DragTarget::Clip(id), DragMode::ResizeLeft) => {
        editor.update_clip(
          id,
          ClipUpdate::new()
            .start(model.ticks_to_position(active.cur_start))
            .length(MusicalLength::from_ticks(active.cur_length, &model)),
        )?;
        None
      }

      (DragTarget::Note { clip, note: _ }, DragMode::CopyDrag) => {
        let created = editor.add_note(
          clip,
          active.cur_pitch.unwrap_or(MAX_PITCH),
          model.ticks_to_position(active.cur_start),
          MusicalLength::from_ticks(active.cur_length, &model),
          active.velocity,
        )?;
        Some(Created::Note(created))
      }

      (DragTarget::Note { clip, note }, DragMode::Move) => {
        let mut update = NoteUpdate::new();
        if active.cur_start != active.start_ticks {
          update = update.start(model.ticks_to_position(active.cur_start));
        }
        if active.cur_pitch != active.pitch {
          if let Some(pitch) = active.cur_pitch {
            update = update.pitch(pitch);
          }
        }
        editor.update_note(clip, note, update)?;
        None
      }

      (DragTarget::Note { clip, note }, DragMode::ResizeRight) => {
        editor.update_note(
          clip,
          note,
          NoteUpdate::new().duration(MusicalLength::from_ticks(active.cur_length, &model)),
        )?;
        None
      }

      (DragTarget::Note { clip, note }, DragMode::ResizeLeft) => {
        editor.update_note(
          clip,
          note,
          NoteUpdate::new()
            .start(model.ticks_to_position(active.cur_start))
            .duration(MusicalLength::from_ticks(active.cur_length, &model)),
        )?;
        None
      }
    };

    Ok(DragOutcome::Committed { created })
  }

  /// Abnormal termination: loss of pointer capture or an explicit escape.
  /// Discards the preview and releases the capture.
  pub fn cancel(&mut self) -> DragOutcome {
    if self.active.take().is_some() {
      debug!("drag cancelled");
    }
    DragOutcome::Cancelled
  }
}
