use crate::color::Color;
use crate::project::TrackId;

/// Arrangement lane. Not time-bearing; clips reference their lane by id.
#[derive(Debug, PartialEq, Clone)]
pub struct Track {
  pub id: TrackId,
  pub name: String,
  pub color: Color,
  pub mute: bool,
  pub solo: bool,
}

impl Track {
  pub fn new<T>(id: TrackId, name: T, color: Color) -> Track
  where
    T: Into<String>,
  {
    Track {
      id,
      name: name.into(),
      color,
      mute: false,
      solo: false,
    }
  }
}

#[cfg(test)]
mod test {

  use super::Track;
  use crate::color::Color;

  #[test]
  pub fn new() {
    let track = Track::new(3, "Bass", Color::new("#bfc6dc"));
    assert_eq!(track.id, 3);
    assert_eq!(track.name, "Bass");
    assert!(!track.mute && !track.solo);
  }
}
