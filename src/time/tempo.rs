use crate::time::{Seconds, TimeError};

/// Project tempo in beats per minute. Validated at construction so that
/// conversions can never divide by zero or produce negative durations.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Tempo(f64);

impl Tempo {
  pub fn new(bpm: f64) -> Result<Tempo, TimeError> {
    if bpm.is_finite() && bpm > 0.0 {
      Ok(Tempo(bpm))
    } else {
      Err(TimeError::InvalidTempo { bpm })
    }
  }

  pub fn get_bpm(&self) -> f64 {
    self.0
  }

  pub fn seconds_per_beat(&self) -> Seconds {
    60.0 / self.0
  }
}

impl From<Tempo> for f64 {
  fn from(item: Tempo) -> Self {
    item.0
  }
}

#[cfg(test)]
mod test {

  use super::Tempo;
  use crate::time::TimeError;

  #[test]
  pub fn new() {
    let tempo = Tempo::new(120.0).unwrap();
    assert_eq!(tempo.get_bpm(), 120.0);
    assert_eq!(tempo.seconds_per_beat(), 0.5);
  }

  #[test]
  pub fn rejects_non_positive() {
    assert_eq!(Tempo::new(0.0), Err(TimeError::InvalidTempo { bpm: 0.0 }));
    assert_eq!(Tempo::new(-10.0), Err(TimeError::InvalidTempo { bpm: -10.0 }));
  }

  #[test]
  pub fn rejects_non_finite() {
    assert!(Tempo::new(std::f64::NAN).is_err());
    assert!(Tempo::new(std::f64::INFINITY).is_err());
  }
}
