//! SSI directive syntax and processing.
//!
//! Documents embed directives as HTML comments:
//!
//! - `<!-- #include file=path -->` - inline another file
//! - `<!-- #get var=Name -->` / `<!-- #get field=Name -->` - emit an attribute
//! - `<!-- #call method=Name -->` - emit the result of a method
//!
//! # Iteration
//!
//! There is no loop directive. A file that includes itself advances the data
//! cursor by one element per inclusion and stops after the last element, so
//! the file is rendered once per element of the active data list.
//!
//! # Example
//!
//! ```
//! use std::path::{Path, PathBuf};
//! use ssi_engine::{Attribute, DataItem, DataList, DataObject, ScriptError, ScriptHost};
//! use ssi_engine::directive::{Processor, ProcessorConfig};
//!
//! struct Site;
//!
//! impl ScriptHost for Site {
//!     type Env = ();
//!     fn localize_path(&self, _: &(), path: &str) -> PathBuf { PathBuf::from(path) }
//!     fn translate(&self, _: &(), text: &str) -> String { text.to_owned() }
//! }
//!
//! struct User(&'static str);
//!
//! impl DataObject for User {
//!     fn property(&self, name: &str) -> Result<Option<Attribute>, ScriptError> {
//!         Ok((name == "Name").then(|| Attribute::new(self.0)))
//!     }
//! }
//!
//! let row = "<li><!-- #get var=Name --></li><!-- #include file=row.html -->";
//! let config = ProcessorConfig::new().with_read_file(move |path: &Path| {
//!     assert_eq!(path, Path::new("row.html"));
//!     Ok(row.to_owned())
//! });
//! let users = DataList::new(vec![DataItem::object(User("ann")), DataItem::object(User("bob"))]);
//!
//! let processor = Processor::new(&Site, &()).with_config(config).with_data(users);
//! let html = processor.process_file("row.html").unwrap();
//! assert_eq!(html, "<li>ann</li><li>bob</li>");
//! ```

mod args;
mod context;
mod parser;
mod processor;

pub use args::DirectiveArgs;
pub use context::ResolveContext;
pub use parser::{DirectiveKind, ParsedDirective, find_directives};
pub use processor::{DEFAULT_MAX_INCLUDE_DEPTH, Processor, ProcessorConfig, ReadFileFn};
