/// Display color carried by tracks and clips, stored as a `#rrggbb` hex
/// string so it can round-trip to any rendering surface untouched.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Color(String);

impl Color {
  pub fn new<T>(value: T) -> Color
  where
    T: Into<String>,
  {
    Color(value.into())
  }

  pub fn from_rgb(r: u8, g: u8, b: u8) -> Color {
    Color(format!("#{:02x}{:02x}{:02x}", r, g, b))
  }

  pub fn get_value(&self) -> &str {
    self.0.as_str()
  }
}

/// Default palette cycled over new tracks.
pub fn track_color(index: usize) -> Color {
  const PALETTE: [&str; 4] = ["#aec6ff", "#ffb4ab", "#bfc6dc", "#e3e2e6"];
  Color::new(PALETTE[index % PALETTE.len()])
}

#[cfg(test)]
mod test {

  use super::{track_color, Color};

  #[test]
  pub fn new() {
    let color = Color::new("#aec6ff");
    assert_eq!(color.get_value(), "#aec6ff");
  }

  #[test]
  pub fn from_rgb() {
    let color = Color::from_rgb(0xae, 0xc6, 0xff);
    assert_eq!(color.get_value(), "#aec6ff");
  }

  #[test]
  pub fn palette_cycles() {
    assert_eq!(track_color(0), track_color(4));
    assert_ne!(track_color(0), track_color(1));
  }
}
