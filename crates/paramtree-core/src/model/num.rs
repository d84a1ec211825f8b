//! Integer-valued parameters: Num and Bool

use super::ValueError;

/// Print base hint for a Num parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumBase {
    #[default]
    Dec,
    Hex,
}

/// Shared interface of every integer-valued kind (Num, Bool, Enum)
pub trait NumericParam {
    /// Current value widened to 64 bits
    fn get64(&self) -> i64;

    /// Store a 64-bit value, narrowing into the node's own domain
    fn set64(&mut self, value: i64) -> Result<(), ValueError>;
}

/// Signed/unsigned integer stored at 64-bit width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumParam {
    value: i64,
    initial: i64,
    min: i64,
    max: i64,
    base: NumBase,
    format: Option<String>,
}

impl NumParam {
    pub fn new(min: i64, max: i64, initial: i64) -> Self {
        Self {
            value: initial,
            initial,
            min,
            max,
            base: NumBase::Dec,
            format: None,
        }
    }

    /// Unsigned 32-bit range `[0, u32::MAX]`
    pub fn u32(initial: u32) -> Self {
        Self::new(0, i64::from(u32::MAX), i64::from(initial))
    }

    /// Full unsigned 64-bit range, stored as the two's-complement bit pattern
    pub fn u64(initial: u64) -> Self {
        Self::new(0, -1, initial as i64)
    }

    pub fn with_base(mut self, base: NumBase) -> Self {
        self.base = base;
        self
    }

    /// Custom printf-style format used when the base is hex
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn get(&self) -> i64 {
        self.value
    }

    /// Store the value as-is; bounds are a print-width hint, not a clamp
    pub fn set(&mut self, value: i64) {
        self.value = value;
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn base(&self) -> NumBase {
        self.base
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Whether `value` lies inside `[min, max]`, comparing as unsigned
    /// when the minimum is non-negative
    pub fn in_range(&self, value: i64) -> bool {
        if self.min >= 0 {
            let v = value as u64;
            v >= self.min as u64 && v <= self.max as u64
        } else {
            value >= self.min && value <= self.max
        }
    }

    pub(crate) fn reset(&mut self) {
        self.value = self.initial;
    }
}

impl NumericParam for NumParam {
    fn get64(&self) -> i64 {
        self.value
    }

    fn set64(&mut self, value: i64) -> Result<(), ValueError> {
        self.set(value);
        Ok(())
    }
}

/// Boolean parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolParam {
    value: bool,
    initial: bool,
}

impl BoolParam {
    pub fn new(initial: bool) -> Self {
        Self {
            value: initial,
            initial,
        }
    }

    pub fn get(&self) -> bool {
        self.value
    }

    pub fn set(&mut self, value: bool) {
        self.value = value;
    }

    pub(crate) fn reset(&mut self) {
        self.value = self.initial;
    }
}

impl NumericParam for BoolParam {
    fn get64(&self) -> i64 {
        i64::from(self.value)
    }

    fn set64(&mut self, value: i64) -> Result<(), ValueError> {
        self.value = value != 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_defaults_to_decimal() {
        let num = NumParam::new(0, 100, 7);
        assert_eq!(num.base(), NumBase::Dec);
        assert_eq!(num.get(), 7);
        assert!(num.format().is_none());
    }

    #[test]
    fn test_num_set_does_not_clamp() {
        let mut num = NumParam::new(0, 10, 0);
        num.set(42);
        assert_eq!(num.get(), 42);
        assert!(!num.in_range(42));
        num.reset();
        assert_eq!(num.get(), 0);
    }

    #[test]
    fn test_u64_range_compares_unsigned() {
        let num = NumParam::u64(0);
        assert!(num.in_range(-1));
        assert!(num.in_range(0));
    }

    #[test]
    fn test_bool_numeric_view() {
        let mut b = BoolParam::new(false);
        b.set64(5).unwrap();
        assert!(b.get());
        assert_eq!(b.get64(), 1);
        b.reset();
        assert!(!b.get());
    }
}
