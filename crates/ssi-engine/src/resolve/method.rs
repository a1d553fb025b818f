//! `call` directive dispatch.
//!
//! Sources are tried in order: host, current data object, extension table.
//! An error from one source is logged and the next source is tried.

use crate::ScriptHost;
use crate::directive::{DirectiveArgs, ResolveContext};

/// A parsed `call` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall<'a> {
    /// Value of the `method` argument.
    pub method: &'a str,
    /// Values of all other arguments, in source order.
    ///
    /// Collected but not forwarded: host and extension methods only receive
    /// the environment (and the current data object).
    pub extra: Vec<&'a str>,
}

impl<'a> MethodCall<'a> {
    /// Extract the method name and extra arguments.
    ///
    /// Returns `None` when there is no `method` argument.
    #[must_use]
    pub fn from_args(args: &'a DirectiveArgs) -> Option<Self> {
        let method = args.get("method")?;
        let extra = args
            .iter()
            .filter(|(name, _)| *name != "method")
            .map(|(_, value)| value)
            .collect();
        Some(Self { method, extra })
    }
}

/// Render a `call` directive. Unresolvable calls render as an empty string.
pub fn render_call<H: ScriptHost>(args: &DirectiveArgs, ctx: &ResolveContext<'_, H>) -> String {
    let Some(call) = MethodCall::from_args(args) else {
        tracing::debug!("call directive without method argument");
        return String::new();
    };
    if !call.extra.is_empty() {
        tracing::debug!(
            method = call.method,
            count = call.extra.len(),
            "ignoring extra call arguments"
        );
    }

    dispatch(call.method, ctx).unwrap_or_default()
}

/// Invoke `method` on the first source that defines it.
pub fn dispatch<H: ScriptHost>(method: &str, ctx: &ResolveContext<'_, H>) -> Option<String> {
    match ctx.host.invoke(method, ctx.env) {
        Ok(Some(value)) => return Some(value),
        Ok(None) => {}
        Err(e) => tracing::debug!(method, error = %e, "host method failed"),
    }

    let object = ctx.current_object()?;

    match object.invoke(method) {
        Ok(Some(value)) => return Some(value),
        Ok(None) => {}
        Err(e) => tracing::debug!(method, error = %e, "data object method failed"),
    }

    let function = ctx.extensions?.get(method)?;
    match function(object, ctx.env) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(method, error = %e, "extension method failed");
            None
        }
    }
}
