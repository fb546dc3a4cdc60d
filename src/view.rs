use crate::project::{Clip, Note};
use crate::time::{Position, Signature, TicksTime, TimeModel, PPQ};

pub type Pixels = f64;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PixelPoint {
  pub x: Pixels,
  pub y: Pixels,
}

impl PixelPoint {
  pub fn new(x: Pixels, y: Pixels) -> PixelPoint {
    PixelPoint { x, y }
  }
}

/// Rectangle handed to the rendering surface.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Rect {
  pub left: Pixels,
  pub top: Pixels,
  pub width: Pixels,
  pub height: Pixels,
}

/// View-scoped zoom factor: how many pixels one tick occupies.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Zoom(f64);

impl Zoom {
  pub fn new(pixels_per_tick: f64) -> Zoom {
    debug_assert!(pixels_per_tick > 0.0);
    Zoom(pixels_per_tick)
  }

  /// Arrangement zoom: a whole bar occupies this many pixels.
  pub fn from_pixels_per_bar(pixels: Pixels, signature: Signature) -> Zoom {
    Zoom::new(pixels / f64::from(signature.ticks_per_bar()))
  }

  /// Piano-roll zoom: a quarter note occupies this many pixels.
  pub fn from_pixels_per_beat(pixels: Pixels) -> Zoom {
    Zoom::new(pixels / PPQ as f64)
  }

  pub fn pixels_per_tick(&self) -> f64 {
    self.0
  }

  pub fn ticks_to_pixels(&self, ticks: TicksTime) -> Pixels {
    f64::from(ticks) * self.0
  }

  /// Nearest tick under a pixel offset; negative offsets clamp to zero.
  pub fn pixels_to_ticks(&self, pixels: Pixels) -> TicksTime {
    if pixels <= 0.0 {
      return TicksTime::zero();
    }
    TicksTime::new((pixels / self.0).round() as u64)
  }
}

pub fn clip_rect(
  clip: &Clip,
  model: &TimeModel,
  zoom: Zoom,
  lane_index: usize,
  lane_height: Pixels,
) -> Rect {
  Rect {
    left: zoom.ticks_to_pixels(clip.start_ticks(model)),
    top: lane_index as f64 * lane_height,
    width: zoom.ticks_to_pixels(clip.length.get_total_ticks()),
    height: lane_height,
  }
}

/// Piano-roll rectangle: one row per semitone, pitch 127 at the top.
pub fn note_rect(note: &Note, model: &TimeModel, zoom: Zoom, row_height: Pixels) -> Rect {
  Rect {
    left: zoom.ticks_to_pixels(model.position_to_ticks(&note.start)),
    top: f64::from(127 - note.pitch) * row_height,
    width: zoom.ticks_to_pixels(note.duration.get_total_ticks()),
    height: row_height,
  }
}

pub fn playhead_x(position: &Position, model: &TimeModel, zoom: Zoom) -> Pixels {
  zoom.ticks_to_pixels(model.position_to_ticks(position))
}

#[cfg(test)]
mod test {

  use super::{clip_rect, note_rect, playhead_x, Zoom};
  use crate::color::Color;
  use crate::project::{Clip, Note};
  use crate::time::{MusicalLength, Signature, Tempo, TicksTime, TimeModel};

  fn model() -> TimeModel {
    TimeModel::new(Tempo::new(120.0).unwrap(), Signature::new(4, 4).unwrap())
  }

  #[test]
  pub fn zoom_from_pixels_per_bar() {
    let zoom = Zoom::from_pixels_per_bar(60.0, Signature::new(4, 4).unwrap());
    assert_eq!(zoom.ticks_to_pixels(TicksTime::new(3840)), 60.0);
    assert_eq!(zoom.pixels_to_ticks(60.0), TicksTime::new(3840));
    assert_eq!(zoom.pixels_to_ticks(-5.0), TicksTime::zero());
  }

  #[test]
  pub fn zoom_from_pixels_per_beat() {
    let zoom = Zoom::from_pixels_per_beat(100.0);
    assert_eq!(zoom.ticks_to_pixels(TicksTime::new(960)), 100.0);
  }

  #[test]
  pub fn clip_rect_geometry() {
    let m = model();
    let zoom = Zoom::from_pixels_per_bar(60.0, m.get_signature());
    let clip = Clip::new(
      0,
      "Clip",
      Color::new("#aec6ff"),
      m.make_position(2, 1, 1, 0),
      MusicalLength::from_ticks(TicksTime::new(3840), &m),
    );
    let rect = clip_rect(&clip, &m, zoom, 1, 96.0);
    assert_eq!(rect.left, 60.0);
    assert_eq!(rect.width, 60.0);
    assert_eq!(rect.top, 96.0);
    assert_eq!(rect.height, 96.0);
  }

  #[test]
  pub fn note_rect_pitch_axis() {
    let m = model();
    let zoom = Zoom::from_pixels_per_beat(100.0);
    let note = Note::new(
      127,
      m.make_position(1, 1, 1, 0),
      MusicalLength::from_ticks(TicksTime::new(960), &m),
      0.8,
    );
    let rect = note_rect(&note, &m, zoom, 20.0);
    assert_eq!(rect.top, 0.0);
    assert_eq!(rect.width, 100.0);

    let note = Note::new(
      60,
      m.make_position(1, 2, 1, 0),
      MusicalLength::from_ticks(TicksTime::new(480), &m),
      0.8,
    );
    let rect = note_rect(&note, &m, zoom, 20.0);
    assert_eq!(rect.top, (127.0 - 60.0) * 20.0);
    assert_eq!(rect.left, 100.0);
  }

  #[test]
  pub fn playhead() {
    let m = model();
    let zoom = Zoom::from_pixels_per_bar(60.0, m.get_signature());
    let position = m.make_position(3, 1, 1, 0);
    assert_eq!(playhead_x(&position, &m, zoom), 120.0);
  }
}
