//! Dotted-path resolution over the parameter tree
//!
//! `"ata.0.master.type"` is resolved one component at a time, descending
//! only through lists. The single-character path `"."` denotes the base
//! itself. Failures are returned as `None` (or a `ParamError` from
//! [`ParamTree::resolve`]) and logged at warn; the caller decides whether a
//! missing parameter is fatal.

use crate::errors::ParamError;
use crate::model::{
    BoolParam, EnumParam, ListParam, NodeId, NumericParam, Param, ParamKind, StringParam,
};
use crate::tree::ParamTree;

impl ParamTree {
    /// Resolve `path` against `base` (the root when None)
    ///
    /// # Errors
    ///
    /// `NoRoot` without a base or root, `EmptyComponent` for paths such as
    /// `"a..b"`, `NotAList` when descending through a leaf, `NotFound` when a
    /// component is absent.
    pub fn resolve(&self, path: &str, base: Option<NodeId>) -> Result<NodeId, ParamError> {
        let base = base.or(self.root()).ok_or(ParamError::NoRoot)?;
        if path == "." {
            return Ok(base);
        }
        self.find_param(path, path, base)
    }

    fn find_param(&self, full: &str, rest: &str, base: NodeId) -> Result<NodeId, ParamError> {
        let (component, remainder) = match rest.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };
        if component.is_empty() {
            return Err(ParamError::EmptyComponent {
                path: full.to_string(),
            });
        }
        let list = self.node(base)?;
        if list.as_list().is_none() {
            return Err(ParamError::NotAList {
                path: self.path_of(base),
            });
        }
        tracing::trace!(component, list = list.name(), "searching for component");

        let child = self
            .child_by_name(base, component)
            .ok_or_else(|| ParamError::NotFound {
                path: full.to_string(),
            })?;
        match remainder {
            None => Ok(child),
            Some(tail) => self.find_param(full, tail, child),
        }
    }

    /// Resolve a path, logging and discarding the failure reason
    pub fn get_param(&self, path: &str, base: Option<NodeId>) -> Option<NodeId> {
        match self.resolve(path, base) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(param_path = path, error = %err, "get_param failed");
                None
            }
        }
    }

    fn resolve_typed(
        &self,
        op: &'static str,
        path: &str,
        base: Option<NodeId>,
        expected: &'static str,
        accept: fn(ParamKind) -> bool,
    ) -> Option<NodeId> {
        let (id, kind) = match self.resolve(path, base).and_then(|id| Ok((id, self.node(id)?))) {
            Ok((id, param)) => (id, param.kind()),
            Err(err) => {
                tracing::warn!(
                    param_path = path,
                    op,
                    error = %err,
                    "could not find a parameter"
                );
                return None;
            }
        };
        if accept(kind) {
            return Some(id);
        }
        tracing::warn!(
            param_path = path,
            op,
            expected,
            actual = kind.name(),
            "could not find a {} parameter with that name",
            expected
        );
        None
    }

    fn get_typed(
        &self,
        op: &'static str,
        path: &str,
        base: Option<NodeId>,
        expected: &'static str,
        accept: fn(ParamKind) -> bool,
    ) -> Option<&Param> {
        let id = self.resolve_typed(op, path, base, expected, accept)?;
        self.get(id)
    }

    fn get_typed_mut(
        &mut self,
        op: &'static str,
        path: &str,
        base: Option<NodeId>,
        expected: &'static str,
        accept: fn(ParamKind) -> bool,
    ) -> Option<&mut Param> {
        let id = self.resolve_typed(op, path, base, expected, accept)?;
        self.get_mut(id)
    }

    /// Integer-valued parameter: Num, Bool or Enum
    pub fn get_param_num(&self, path: &str, base: Option<NodeId>) -> Option<&dyn NumericParam> {
        self.get_typed("get_param_num", path, base, "integer", ParamKind::is_numeric)
            .and_then(Param::as_numeric)
    }

    pub fn get_param_num_mut(
        &mut self,
        path: &str,
        base: Option<NodeId>,
    ) -> Option<&mut dyn NumericParam> {
        self.get_typed_mut("get_param_num", path, base, "integer", ParamKind::is_numeric)
            .and_then(Param::as_numeric_mut)
    }

    pub fn get_param_bool(&self, path: &str, base: Option<NodeId>) -> Option<&BoolParam> {
        self.get_typed("get_param_bool", path, base, "bool", |k| k == ParamKind::Bool)
            .and_then(Param::as_bool)
    }

    pub fn get_param_bool_mut(&mut self, path: &str, base: Option<NodeId>) -> Option<&mut BoolParam> {
        self.get_typed_mut("get_param_bool", path, base, "bool", |k| k == ParamKind::Bool)
            .and_then(Param::as_bool_mut)
    }

    pub fn get_param_enum(&self, path: &str, base: Option<NodeId>) -> Option<&EnumParam> {
        self.get_typed("get_param_enum", path, base, "enum", |k| k == ParamKind::Enum)
            .and_then(Param::as_enum)
    }

    pub fn get_param_enum_mut(&mut self, path: &str, base: Option<NodeId>) -> Option<&mut EnumParam> {
        self.get_typed_mut("get_param_enum", path, base, "enum", |k| k == ParamKind::Enum)
            .and_then(Param::as_enum_mut)
    }

    pub fn get_param_string(&self, path: &str, base: Option<NodeId>) -> Option<&StringParam> {
        self.get_typed("get_param_string", path, base, "string", |k| k == ParamKind::String)
            .and_then(Param::as_string)
    }

    pub fn get_param_string_mut(
        &mut self,
        path: &str,
        base: Option<NodeId>,
    ) -> Option<&mut StringParam> {
        self.get_typed_mut("get_param_string", path, base, "string", |k| k == ParamKind::String)
            .and_then(Param::as_string_mut)
    }

    /// List parameter, returned with its id so callers can descend further
    pub fn get_param_list(&self, path: &str, base: Option<NodeId>) -> Option<(NodeId, &ListParam)> {
        let id = self.resolve_typed("get_param_list", path, base, "list", |k| k == ParamKind::List)?;
        self.get(id)?.as_list().map(|list| (id, list))
    }
}
