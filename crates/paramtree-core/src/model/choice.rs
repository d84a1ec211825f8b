use super::{NumericParam, ValueError};

/// Integer parameter restricted to an ordered set of named choices
///
/// The first choice has value `min`, the next `min + 1`, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParam {
    value: i64,
    initial: i64,
    min: i64,
    choices: Vec<String>,
}

impl EnumParam {
    /// Build an enum whose first choice has value 0, selecting `initial`
    pub fn new<S: Into<String>>(choices: impl IntoIterator<Item = S>, initial: usize) -> Self {
        Self::with_min(choices, 0, initial as i64)
    }

    /// Build an enum whose first choice has value `min`
    pub fn with_min<S: Into<String>>(
        choices: impl IntoIterator<Item = S>,
        min: i64,
        initial: i64,
    ) -> Self {
        Self {
            value: initial,
            initial,
            min,
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self) -> i64 {
        self.value
    }

    /// Select by integer value
    pub fn set(&mut self, value: i64) -> Result<(), ValueError> {
        if value < self.min || value > self.max() {
            return Err(ValueError::OutOfRange {
                value,
                min: self.min,
                max: self.max(),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Select by position in the choice list
    pub fn set_by_index(&mut self, index: usize) -> Result<(), ValueError> {
        self.set(self.min + index as i64)
    }

    /// Select by choice name
    pub fn set_by_name(&mut self, name: &str) -> Result<(), ValueError> {
        let index = self
            .find_by_name(name)
            .ok_or_else(|| ValueError::UnknownChoice {
                name: name.to_string(),
            })?;
        self.set_by_index(index)
    }

    /// Position of `name` in the choice list
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.choices.iter().position(|c| c == name)
    }

    /// Name of the selected choice, or None if the value is out of range
    pub fn selected(&self) -> Option<&str> {
        let index = usize::try_from(self.value - self.min).ok()?;
        self.choices.get(index).map(String::as_str)
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.min + self.choices.len() as i64 - 1
    }

    pub(crate) fn reset(&mut self) {
        self.value = self.initial;
    }
}

impl NumericParam for EnumParam {
    fn get64(&self) -> i64 {
        self.value
    }

    fn set64(&mut self, value: i64) -> Result<(), ValueError> {
        self.set(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ata_type() -> EnumParam {
        EnumParam::new(["none", "disk", "cdrom"], 0)
    }

    #[test]
    fn test_set_by_name_selects_choice() {
        let mut e = ata_type();
        e.set_by_name("cdrom").unwrap();
        assert_eq!(e.get(), 2);
        assert_eq!(e.selected(), Some("cdrom"));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let mut e = ata_type();
        let err = e.set_by_name("floppy").unwrap_err();
        assert_eq!(
            err,
            ValueError::UnknownChoice {
                name: "floppy".to_string()
            }
        );
        assert_eq!(e.selected(), Some("none"));
    }

    #[test]
    fn test_min_offset() {
        let mut e = EnumParam::with_min(["low", "high"], 10, 10);
        assert_eq!(e.selected(), Some("low"));
        e.set_by_index(1).unwrap();
        assert_eq!(e.get(), 11);
        assert!(e.set(12).is_err());
        assert!(e.set(9).is_err());
    }

    #[test]
    fn test_out_of_range_initial_has_no_selection() {
        let e = EnumParam::with_min(["a"], 0, 5);
        assert_eq!(e.selected(), None);
    }
}
