//! Server-side-includes template engine.
//!
//! This crate renders documents containing `<!-- #directive args -->`
//! markers against a host application and an optional, possibly nested,
//! list of data objects.
//!
//! # Architecture
//!
//! - [`directive`]: marker matching, argument parsing and the [`Processor`]
//!   that walks documents with an explicit work stack
//! - [`resolve`]: the `get` attribute resolver and the `call` dispatcher
//! - [`ScriptHost`] / [`DataObject`]: the capabilities templates resolve against
//! - [`ExtensionTable`]: free functions usable as `call` targets
//!
//! Rendering never fails. Unknown names, malformed directives and unreadable
//! includes render as empty text; errors raised by hosts and data objects are
//! logged through `tracing` and treated as misses.
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use ssi_engine::{Processor, ScriptError, ScriptHost};
//!
//! struct Site;
//!
//! impl ScriptHost for Site {
//!     type Env = ();
//!     fn localize_path(&self, _: &(), path: &str) -> PathBuf { PathBuf::from(path) }
//!     fn translate(&self, _: &(), text: &str) -> String { text.to_owned() }
//!     fn invoke(&self, name: &str, _: &()) -> Result<Option<String>, ScriptError> {
//!         Ok((name == "Greet").then(|| "hi".to_owned()))
//!     }
//! }
//!
//! let output = Processor::new(&Site, &()).process("<!-- #call method=Greet -->");
//! assert_eq!(output, "hi");
//! ```

mod data;
pub mod directive;
mod error;
mod extension;
mod host;
pub mod resolve;

pub use data::{DataItem, DataList};
pub use directive::{Processor, ProcessorConfig};
pub use error::ScriptError;
pub use extension::{ExtensionFn, ExtensionTable};
pub use host::{Attribute, DataObject, ScriptHost};
