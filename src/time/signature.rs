use crate::time::{TicksTime, TimeError, PPQ};

/// Time signature. Only the numerator takes part in tick arithmetic (a beat
/// is always one quarter note of PPQ ticks); the denominator is kept for
/// display and configuration round trips.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Signature {
  numerator: u8,
  denominator: u8,
}

impl Signature {
  pub fn new(numerator: u8, denominator: u8) -> Result<Signature, TimeError> {
    if numerator >= 1 && denominator.is_power_of_two() && denominator <= 32 {
      Ok(Signature {
        numerator,
        denominator,
      })
    } else {
      Err(TimeError::InvalidSignature {
        numerator,
        denominator,
      })
    }
  }

  pub fn get_numerator(&self) -> u8 {
    self.numerator
  }

  pub fn get_denominator(&self) -> u8 {
    self.denominator
  }

  pub fn ticks_per_bar(&self) -> TicksTime {
    TicksTime::new(PPQ * u64::from(self.numerator))
  }
}

#[cfg(test)]
mod test {

  use super::Signature;
  use crate::time::{TicksTime, TimeError};

  #[test]
  pub fn new() {
    let signature = Signature::new(3, 4).unwrap();
    assert_eq!(signature.get_numerator(), 3);
    assert_eq!(signature.get_denominator(), 4);
  }

  #[test]
  pub fn rejects_zero_numerator() {
    assert_eq!(
      Signature::new(0, 4),
      Err(TimeError::InvalidSignature {
        numerator: 0,
        denominator: 4
      })
    );
  }

  #[test]
  pub fn rejects_bad_denominator() {
    assert!(Signature::new(4, 0).is_err());
    assert!(Signature::new(4, 3).is_err());
    assert!(Signature::new(4, 64).is_err());
  }

  #[test]
  pub fn ticks_per_bar() {
    assert_eq!(Signature::new(4, 4).unwrap().ticks_per_bar(), TicksTime::new(3840));
    assert_eq!(Signature::new(3, 4).unwrap().ticks_per_bar(), TicksTime::new(2880));
  }
}
