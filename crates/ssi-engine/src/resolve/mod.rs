//! Resolution of `get` and `call` directives.

mod attribute;
mod method;

pub use attribute::{AttributeKind, render_get, resolve_attribute};
pub use method::{MethodCall, dispatch, render_call};
