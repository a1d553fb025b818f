//! Extension functions available to `call` directives.

use std::collections::HashMap;
use std::fmt;

use crate::{DataObject, ScriptError};

/// Signature of an extension function: receives the current data object and
/// the environment.
pub type ExtensionFn<Env> =
    dyn Fn(&dyn DataObject, &Env) -> Result<String, ScriptError> + Send + Sync;

/// Named free functions consulted by `call` when neither the host nor the
/// current data object defines the method.
///
/// # Example
///
/// ```
/// use ssi_engine::{ExtensionTable, DataObject};
///
/// let table: ExtensionTable<()> = ExtensionTable::new()
///     .with("Shout", |object: &dyn DataObject, _env: &()| {
///         let name = object.property("Name")?.map(|a| a.value).unwrap_or_default();
///         Ok(name.to_uppercase())
///     });
///
/// assert!(table.get("Shout").is_some());
/// assert!(table.get("shout").is_none());
/// ```
pub struct ExtensionTable<Env> {
    functions: HashMap<String, Box<ExtensionFn<Env>>>,
}

impl<Env> Default for ExtensionTable<Env> {
    fn default() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }
}

impl<Env> ExtensionTable<Env> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, builder style.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&dyn DataObject, &Env) -> Result<String, ScriptError> + Send + Sync + 'static,
    {
        self.register(name, function);
        self
    }

    /// Register a function, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&dyn DataObject, &Env) -> Result<String, ScriptError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Box::new(function));
    }

    /// Look up a function by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExtensionFn<Env>> {
        self.functions.get(name).map(Box::as_ref)
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no functions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<Env> fmt::Debug for ExtensionTable<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("ExtensionTable")
            .field("functions", &names)
            .finish()
    }
}
