//! Per-module log action table
//!
//! Every emulator module registers a fixed-width prefix such as `"[ATA  ]"`
//! and keeps one [`LogAction`] per [`LogLevel`]. The checkpoint engine saves
//! and restores this table through the `logopts` file.

use serde::Serialize;

/// Severity levels, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Error,
    Panic,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Error,
        LogLevel::Panic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
            LogLevel::Panic => "PANIC",
        }
    }

    pub fn from_name(name: &str) -> Option<LogLevel> {
        Self::ALL.into_iter().find(|level| level.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// What a module does with a message of a given level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Ignore,
    Report,
    Ask,
    Fatal,
}

impl LogAction {
    pub const ALL: [LogAction; 4] = [
        LogAction::Ignore,
        LogAction::Report,
        LogAction::Ask,
        LogAction::Fatal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogAction::Ignore => "ignore",
            LogAction::Report => "report",
            LogAction::Ask => "ask",
            LogAction::Fatal => "fatal",
        }
    }

    pub fn from_name(name: &str) -> Option<LogAction> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

/// One registered module and its actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogModule {
    prefix: String,
    actions: [LogAction; 4],
}

impl LogModule {
    /// Register a module by bare name; the prefix is padded to `[%-5s]`
    ///
    /// Defaults: debug messages ignored, info and error reported, panics fatal.
    pub fn new(name: &str) -> Self {
        Self::with_prefix(padded_prefix(name))
    }

    /// Register a module with an already-formatted prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            actions: [
                LogAction::Ignore,
                LogAction::Report,
                LogAction::Report,
                LogAction::Fatal,
            ],
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix without its brackets and trailing padding; may be empty
    pub fn short_name(&self) -> &str {
        let inner = self.prefix.strip_prefix('[').unwrap_or(&self.prefix);
        let inner = inner.strip_suffix(']').unwrap_or(inner);
        inner.trim_end_matches(' ')
    }

    pub fn action(&self, level: LogLevel) -> LogAction {
        self.actions[level.index()]
    }

    pub fn set_action(&mut self, level: LogLevel, action: LogAction) {
        self.actions[level.index()] = action;
    }

    pub fn actions(&self) -> &[LogAction; 4] {
        &self.actions
    }
}

/// `"ata"` -> `"[ata  ]"`
pub fn padded_prefix(name: &str) -> String {
    format!("[{:<5}]", name)
}

/// Ordered table of log modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogModules {
    modules: Vec<LogModule>,
}

impl LogModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module and return its index
    pub fn add(&mut self, module: LogModule) -> usize {
        self.modules.push(module);
        self.modules.len() - 1
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LogModule> {
        self.modules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogModule> {
        self.modules.iter()
    }

    /// Index of the last module registered with exactly this prefix
    pub fn find_by_prefix(&self, prefix: &str) -> Option<usize> {
        self.modules.iter().rposition(|m| m.prefix == prefix)
    }

    /// Set one level's action on a single module, or on every module when
    /// `module` is None. Returns false for an unknown index.
    pub fn set_action(&mut self, module: Option<usize>, level: LogLevel, action: LogAction) -> bool {
        match module {
            Some(index) => match self.modules.get_mut(index) {
                Some(m) => {
                    m.set_action(level, action);
                    true
                }
                None => false,
            },
            None => {
                for m in &mut self.modules {
                    m.set_action(level, action);
                }
                true
            }
        }
    }
}

impl<'a> IntoIterator for &'a LogModules {
    type Item = &'a LogModule;
    type IntoIter = std::slice::Iter<'a, LogModule>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}
