//! Capabilities that templates resolve against.
//!
//! A template never inspects Rust types directly. The host application and
//! each data object expose named attributes and methods through these traits,
//! and the resolvers dispatch on names.

use std::path::PathBuf;

use crate::ScriptError;

/// A resolved attribute value.
///
/// `translate` mirrors a declarative "requires translation" marker on the
/// attribute: when set, the value is passed through
/// [`ScriptHost::translate`] before it is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Stringified attribute value.
    pub value: String,
    /// Whether the value must be translated before output.
    pub translate: bool,
}

impl Attribute {
    /// Create an attribute that is emitted verbatim.
    #[must_use]
    pub fn new(value: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            translate: false,
        }
    }

    /// Create an attribute that is translated before output.
    #[must_use]
    pub fn translated(value: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            translate: true,
        }
    }
}

/// The host application a template is rendered for.
///
/// `Env` is the per-request environment. The engine never looks inside it;
/// it is only handed back to the host and to extension functions.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use ssi_engine::{Attribute, ScriptError, ScriptHost};
///
/// struct Site;
///
/// impl ScriptHost for Site {
///     type Env = ();
///
///     fn localize_path(&self, _env: &(), path: &str) -> PathBuf {
///         PathBuf::from("templates").join(path)
///     }
///
///     fn translate(&self, _env: &(), text: &str) -> String {
///         text.to_owned()
///     }
///
///     fn property(&self, name: &str) -> Option<Attribute> {
///         (name == "Title").then(|| Attribute::new("Home"))
///     }
///
///     fn invoke(&self, name: &str, _env: &()) -> Result<Option<String>, ScriptError> {
///         Ok((name == "Greet").then(|| "hi".to_owned()))
///     }
/// }
/// ```
pub trait ScriptHost: Send + Sync {
    /// Per-request environment passed through to host methods.
    type Env;

    /// Map a raw include argument to the path of the file to read.
    fn localize_path(&self, env: &Self::Env, path: &str) -> PathBuf;

    /// Translate a value whose attribute is flagged for translation.
    fn translate(&self, env: &Self::Env, text: &str) -> String;

    /// Look up an attribute declared directly on the host.
    fn property(&self, _name: &str) -> Option<Attribute> {
        None
    }

    /// Invoke a host method with the environment as its only argument.
    ///
    /// Returns `Ok(None)` when the host has no method with this name.
    /// `Ok(None)` is also how a method reports "no value": either way the
    /// `call` falls through to the current data object and then the
    /// extension table. Return `Ok(Some(String::new()))` to end resolution
    /// with empty output.
    fn invoke(&self, _name: &str, _env: &Self::Env) -> Result<Option<String>, ScriptError> {
        Ok(None)
    }
}

/// An element of a data list.
///
/// Properties are consulted by `get var` (after the host) and by `get field`
/// (after [`field`](Self::field)). Methods are parameterless.
pub trait DataObject: Send + Sync {
    /// Look up a property.
    ///
    /// Errors are logged by the resolver and treated as "not found".
    fn property(&self, name: &str) -> Result<Option<Attribute>, ScriptError>;

    /// Look up a public field. Falls back to [`property`](Self::property)
    /// when this returns `None`.
    fn field(&self, _name: &str) -> Option<Attribute> {
        None
    }

    /// Invoke a parameterless method.
    ///
    /// Returns `Ok(None)` when the object has no method with this name. As
    /// with [`ScriptHost::invoke`], `Ok(None)` lets the extension table try
    /// the name next.
    fn invoke(&self, _name: &str) -> Result<Option<String>, ScriptError> {
        Ok(None)
    }
}
