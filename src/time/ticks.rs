use std::cmp::min;
use std::ops::{Add, AddAssign, Div, Mul, Rem, Sub, SubAssign};

/// Pulses per quarter note. 960 keeps a single tick under a millisecond
/// for any tempo below 300 BPM.
pub const PPQ: u64 = 960;

pub const TICKS_PER_SIXTEENTH: u64 = PPQ / 4;

/// Absolute tick count on the project timeline. Subtraction saturates at
/// zero; ticks are never negative.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct TicksTime(u64);

impl TicksTime {
  pub fn new(ticks: u64) -> TicksTime {
    TicksTime(ticks)
  }

  pub fn zero() -> TicksTime {
    TicksTime(0)
  }

  pub fn is_zero(self) -> bool {
    self.0 == 0
  }
}

impl Add for TicksTime {
  type Output = TicksTime;
  fn add(self, rhs: TicksTime) -> Self {
    TicksTime(self.0 + rhs.0)
  }
}

impl AddAssign for TicksTime {
  fn add_assign(&mut self, rhs: TicksTime) {
    *self = *self + rhs;
  }
}

impl Sub for TicksTime {
  type Output = TicksTime;
  fn sub(self, rhs: TicksTime) -> Self {
    TicksTime(self.0 - min(self.0, rhs.0))
  }
}

impl SubAssign for TicksTime {
  fn sub_assign(&mut self, rhs: TicksTime) {
    *self = *self - rhs;
  }
}

impl Mul<u64> for TicksTime {
  type Output = TicksTime;
  fn mul(self, rhs: u64) -> Self {
    TicksTime(self.0 * rhs)
  }
}

impl Div<u64> for TicksTime {
  type Output = TicksTime;
  fn div(self, rhs: u64) -> Self {
    TicksTime(self.0 / rhs)
  }
}

impl Rem<u64> for TicksTime {
  type Output = TicksTime;
  fn rem(self, rhs: u64) -> Self {
    TicksTime(self.0 % rhs)
  }
}

impl From<u64> for TicksTime {
  fn from(ticks: u64) -> Self {
    TicksTime(ticks)
  }
}

impl From<TicksTime> for u64 {
  fn from(item: TicksTime) -> Self {
    item.0
  }
}

impl From<TicksTime> for f64 {
  fn from(item: TicksTime) -> Self {
    item.0 as f64
  }
}

#[cfg(test)]
mod test {

  use super::TicksTime;

  #[test]
  pub fn new() {
    let ticks = TicksTime::new(1234);
    assert_eq!(u64::from(ticks), 1234);
  }

  #[test]
  pub fn zero() {
    assert!(TicksTime::zero().is_zero());
    assert_eq!(u64::from(TicksTime::zero()), 0);
  }

  #[test]
  pub fn add() {
    assert_eq!(TicksTime::new(100) + TicksTime::new(50), TicksTime::new(150));
  }

  #[test]
  pub fn sub_saturates_at_zero() {
    assert_eq!(TicksTime::new(100) - TicksTime::new(30), TicksTime::new(70));
    assert_eq!(TicksTime::new(30) - TicksTime::new(100), TicksTime::zero());
  }

  #[test]
  pub fn mul_div_rem() {
    assert_eq!(TicksTime::new(100) * 5, TicksTime::new(500));
    assert_eq!(TicksTime::new(100) / 5, TicksTime::new(20));
    assert_eq!(TicksTime::new(103) % 5, TicksTime::new(3));
  }

  #[test]
  pub fn ord() {
    assert!(TicksTime::new(1) < TicksTime::new(2));
    assert!(TicksTime::new(2) <= TicksTime::new(2));
  }
}
