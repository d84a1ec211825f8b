//! Parameter node model
//!
//! A parameter is a named node holding one of seven value kinds. Lists own
//! their children by id; every other kind is a leaf whose shape is fixed at
//! construction and whose value is mutable.

pub mod choice;
pub mod data;
pub mod list;
pub mod num;
pub mod string;

pub use choice::EnumParam;
pub use data::{DataParam, FileDataHooks, FileDataParam};
pub use list::ListParam;
pub use num::{BoolParam, NumBase, NumParam, NumericParam};
pub use string::{StringParam, StringValue};

use serde::Serialize;
use thiserror::Error;

/// Handle to a node inside a [`crate::ParamTree`] arena
///
/// A freed slot may be reused, but its generation moves on, so an id kept
/// after `remove` never reaches the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.index
    }
}

/// Kind tag reported by every parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    List,
    Num,
    Bool,
    Enum,
    String,
    Data,
    FileData,
}

impl ParamKind {
    /// Lower-case name used in log fields and error messages
    pub fn name(self) -> &'static str {
        match self {
            ParamKind::List => "list",
            ParamKind::Num => "num",
            ParamKind::Bool => "bool",
            ParamKind::Enum => "enum",
            ParamKind::String => "string",
            ParamKind::Data => "data",
            ParamKind::FileData => "filedata",
        }
    }

    /// Num, Bool and Enum all carry an integer value
    pub fn is_numeric(self) -> bool {
        matches!(self, ParamKind::Num | ParamKind::Bool | ParamKind::Enum)
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by a single node's setters
///
/// Nodes do not know their own path; the tree wraps these into
/// [`crate::errors::ParamError::InvalidValue`] with the full path attached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("no choice named {name:?}")]
    UnknownChoice { name: String },

    #[error("value {value} outside [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("backing store already exists")]
    BackingExists,
}

/// The value held by a parameter
#[derive(Debug)]
pub enum ParamValue {
    List(ListParam),
    Num(NumParam),
    Bool(BoolParam),
    Enum(EnumParam),
    String(StringParam),
    Data(DataParam),
    FileData(FileDataParam),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::List(_) => ParamKind::List,
            ParamValue::Num(_) => ParamKind::Num,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Enum(_) => ParamKind::Enum,
            ParamValue::String(_) => ParamKind::String,
            ParamValue::Data(_) => ParamKind::Data,
            ParamValue::FileData(_) => ParamKind::FileData,
        }
    }
}

impl From<ListParam> for ParamValue {
    fn from(value: ListParam) -> Self {
        ParamValue::List(value)
    }
}

impl From<NumParam> for ParamValue {
    fn from(value: NumParam) -> Self {
        ParamValue::Num(value)
    }
}

impl From<BoolParam> for ParamValue {
    fn from(value: BoolParam) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<EnumParam> for ParamValue {
    fn from(value: EnumParam) -> Self {
        ParamValue::Enum(value)
    }
}

impl From<StringParam> for ParamValue {
    fn from(value: StringParam) -> Self {
        ParamValue::String(value)
    }
}

impl From<DataParam> for ParamValue {
    fn from(value: DataParam) -> Self {
        ParamValue::Data(value)
    }
}

impl From<FileDataParam> for ParamValue {
    fn from(value: FileDataParam) -> Self {
        ParamValue::FileData(value)
    }
}

/// A named node in the parameter tree
#[derive(Debug)]
pub struct Param {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) value: ParamValue,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Owning list, if any (the root has none)
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> ParamKind {
        self.value.kind()
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ParamValue {
        &mut self.value
    }

    pub fn as_list(&self) -> Option<&ListParam> {
        match &self.value {
            ParamValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<&NumParam> {
        match &self.value {
            ParamValue::Num(num) => Some(num),
            _ => None,
        }
    }

    pub fn as_num_mut(&mut self) -> Option<&mut NumParam> {
        match &mut self.value {
            ParamValue::Num(num) => Some(num),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&BoolParam> {
        match &self.value {
            ParamValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool_mut(&mut self) -> Option<&mut BoolParam> {
        match &mut self.value {
            ParamValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumParam> {
        match &self.value {
            ParamValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut EnumParam> {
        match &mut self.value {
            ParamValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringParam> {
        match &self.value {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_string_mut(&mut self) -> Option<&mut StringParam> {
        match &mut self.value {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&DataParam> {
        match &self.value {
            ParamValue::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_data_mut(&mut self) -> Option<&mut DataParam> {
        match &mut self.value {
            ParamValue::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_file_data(&self) -> Option<&FileDataParam> {
        match &self.value {
            ParamValue::FileData(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_file_data_mut(&mut self) -> Option<&mut FileDataParam> {
        match &mut self.value {
            ParamValue::FileData(f) => Some(f),
            _ => None,
        }
    }

    /// View a Num, Bool or Enum through the shared integer interface
    pub fn as_numeric(&self) -> Option<&dyn NumericParam> {
        match &self.value {
            ParamValue::Num(n) => Some(n),
            ParamValue::Bool(b) => Some(b),
            ParamValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_numeric_mut(&mut self) -> Option<&mut dyn NumericParam> {
        match &mut self.value {
            ParamValue::Num(n) => Some(n),
            ParamValue::Bool(b) => Some(b),
            ParamValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Restore the leaf's initial value; lists and blobs are untouched
    pub(crate) fn reset(&mut self) {
        match &mut self.value {
            ParamValue::Num(n) => n.reset(),
            ParamValue::Bool(b) => b.reset(),
            ParamValue::Enum(e) => e.reset(),
            ParamValue::String(s) => s.reset(),
            ParamValue::List(_) | ParamValue::Data(_) | ParamValue::FileData(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_lowercase() {
        assert_eq!(ParamKind::FileData.name(), "filedata");
        assert_eq!(ParamKind::Num.to_string(), "num");
    }

    #[test]
    fn test_numeric_kinds() {
        assert!(ParamKind::Num.is_numeric());
        assert!(ParamKind::Bool.is_numeric());
        assert!(ParamKind::Enum.is_numeric());
        assert!(!ParamKind::String.is_numeric());
        assert!(!ParamKind::List.is_numeric());
    }

    #[test]
    fn test_value_kind_matches_variant() {
        let value: ParamValue = BoolParam::new(true).into();
        assert_eq!(value.kind(), ParamKind::Bool);
        let value: ParamValue = DataParam::new(4).into();
        assert_eq!(value.kind(), ParamKind::Data);
    }
}
