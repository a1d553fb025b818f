//! `get` directive resolution.

use crate::directive::{DirectiveArgs, ResolveContext};
use crate::{Attribute, ScriptHost};

/// Where a `get` directive looks for its attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Host property first, then the current data object's property.
    Var,
    /// Current data object's field, then its property.
    Field,
}

impl AttributeKind {
    /// Map the kind written in a directive (`var` or `field`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "var" => Some(Self::Var),
            "field" => Some(Self::Field),
            _ => None,
        }
    }
}

/// Render a `get` directive.
///
/// The first argument pair carries the kind as its name and the attribute
/// name as its value: `<!-- #get var=Title -->`. Anything unresolvable
/// renders as an empty string.
pub fn render_get<H: ScriptHost>(args: &DirectiveArgs, ctx: &ResolveContext<'_, H>) -> String {
    let Some((kind, name)) = args.first() else {
        tracing::debug!("get directive without arguments");
        return String::new();
    };
    let Some(kind) = AttributeKind::from_name(kind) else {
        tracing::debug!(kind, name, "unknown get kind");
        return String::new();
    };

    match resolve_attribute(kind, name, ctx) {
        Some(Attribute {
            value,
            translate: true,
        }) => ctx.host.translate(ctx.env, &value),
        Some(attribute) => attribute.value,
        None => String::new(),
    }
}

/// Resolve an attribute without applying translation.
pub fn resolve_attribute<H: ScriptHost>(
    kind: AttributeKind,
    name: &str,
    ctx: &ResolveContext<'_, H>,
) -> Option<Attribute> {
    match kind {
        AttributeKind::Var => ctx
            .host
            .property(name)
            .or_else(|| object_property(name, ctx)),
        AttributeKind::Field => {
            let object = ctx.current_object()?;
            object.field(name).or_else(|| object_property(name, ctx))
        }
    }
}

fn object_property<H: ScriptHost>(name: &str, ctx: &ResolveContext<'_, H>) -> Option<Attribute> {
    let object = ctx.current_object()?;
    match object.property(name) {
        Ok(Some(attribute)) => Some(attribute),
        Ok(None) => {
            tracing::debug!(name, index = ctx.data_index, "attribute not found on data object");
            None
        }
        Err(e) => {
            tracing::debug!(name, error = %e, "data object property lookup failed");
            None
        }
    }
}
