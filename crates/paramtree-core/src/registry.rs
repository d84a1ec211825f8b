//! Runtime configuration and user option registries
//!
//! Devices register a runtime-config handler that is called, in registration
//! order, whenever options are changed while the simulation runs. Plugins
//! register named user options that extend the configuration file grammar.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::tree::ParamTree;
use std::io::Write;

/// Handler invoked by [`RuntimeConfigRegistry::update_all`]
pub type RuntimeConfigHandler = Box<dyn FnMut(&mut ParamTree)>;

/// Ordered list of runtime configuration handlers
#[derive(Default)]
pub struct RuntimeConfigRegistry {
    handlers: Vec<(String, RuntimeConfigHandler)>,
}

impl RuntimeConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler owned by `device`
    pub fn register(&mut self, device: impl Into<String>, handler: RuntimeConfigHandler) {
        let device = device.into();
        tracing::debug!(device = %device, "registered runtime config handler");
        self.handlers.push((device, handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler in registration order
    pub fn update_all(&mut self, tree: &mut ParamTree) {
        for (device, handler) in &mut self.handlers {
            tracing::trace!(device = %device, "running runtime config handler");
            handler(tree);
        }
    }
}

impl std::fmt::Debug for RuntimeConfigRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let devices: Vec<&str> = self.handlers.iter().map(|(d, _)| d.as_str()).collect();
        f.debug_struct("RuntimeConfigRegistry")
            .field("devices", &devices)
            .finish()
    }
}

/// A plugin-provided configuration keyword
pub trait UserOption {
    /// Parse one configuration line whose first parameter is the keyword
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are malformed.
    fn parse(&mut self, tree: &mut ParamTree, context: &str, params: &[&str]) -> Result<()>;

    /// Write this option's configuration lines
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    fn save(&self, _tree: &ParamTree, _out: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }
}

/// Registry of user options, keyed by keyword
#[derive(Default)]
pub struct UserOptionRegistry {
    options: Vec<(String, Box<dyn UserOption>)>,
}

impl UserOptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a keyword; returns false if it is already registered
    pub fn register(&mut self, keyword: &str, option: Box<dyn UserOption>) -> bool {
        if self.is_registered(keyword) {
            tracing::warn!(keyword, "user option already registered");
            return false;
        }
        self.options.push((keyword.to_string(), option));
        true
    }

    /// Remove a keyword; returns false if it was not registered
    pub fn unregister(&mut self, keyword: &str) -> bool {
        match self.options.iter().position(|(k, _)| k == keyword) {
            Some(index) => {
                self.options.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, keyword: &str) -> bool {
        self.options.iter().any(|(k, _)| k == keyword)
    }

    /// Dispatch a configuration line to the option named by `params[0]`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no option matches, or the option's own error.
    pub fn parse(&mut self, tree: &mut ParamTree, context: &str, params: &[&str]) -> Result<()> {
        let keyword = params.first().copied().unwrap_or_default();
        let option = self
            .options
            .iter_mut()
            .find(|(k, _)| k == keyword)
            .map(|(_, option)| option)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::NotFound)
                    .with_op("parse_user_option")
                    .with_message(format!("unknown user option {:?}", keyword))
            })?;
        option.parse(tree, context, params)
    }

    /// Let every option write its lines, in registration order
    ///
    /// # Errors
    ///
    /// Returns `Io` on the first failed write.
    pub fn save_all(&self, tree: &ParamTree, out: &mut dyn Write) -> Result<()> {
        for (keyword, option) in &self.options {
            option.save(tree, out).map_err(|e| {
                ExError::new(ExErrorKind::Io)
                    .with_op("save_user_options")
                    .with_message(format!("{}: {}", keyword, e))
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for UserOptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keywords: Vec<&str> = self.options.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("UserOptionRegistry")
            .field("keywords", &keywords)
            .finish()
    }
}
