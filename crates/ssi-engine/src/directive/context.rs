//! Resolution context.
//!
//! Bundles what `get` and `call` directives resolve against: the host, the
//! environment, the extension table and the processing frame's data cursor.

use crate::{DataList, DataObject, ExtensionTable, ScriptHost};

/// Context handed to the attribute resolver and the method dispatcher.
///
/// Created by the [`Processor`](super::Processor) from the frame being
/// scanned.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use ssi_engine::{Attribute, DataItem, DataList, DataObject, ScriptError, ScriptHost};
/// use ssi_engine::directive::ResolveContext;
///
/// struct Host;
/// impl ScriptHost for Host {
///     type Env = ();
///     fn localize_path(&self, _: &(), path: &str) -> PathBuf { PathBuf::from(path) }
///     fn translate(&self, _: &(), text: &str) -> String { text.to_owned() }
/// }
///
/// struct Row;
/// impl DataObject for Row {
///     fn property(&self, _: &str) -> Result<Option<Attribute>, ScriptError> { Ok(None) }
/// }
///
/// let data = DataList::new(vec![DataItem::object(Row)]);
/// let ctx = ResolveContext {
///     host: &Host,
///     env: &(),
///     extensions: None,
///     data: Some(&data),
///     data_index: 0,
/// };
/// assert!(ctx.current_object().is_some());
/// ```
pub struct ResolveContext<'a, H: ScriptHost> {
    /// Host application.
    pub host: &'a H,
    /// Per-request environment.
    pub env: &'a H::Env,
    /// Extension functions consulted last by `call`.
    pub extensions: Option<&'a ExtensionTable<H::Env>>,
    /// Active data list of the frame.
    pub data: Option<&'a DataList>,
    /// Cursor into `data`.
    pub data_index: usize,
}

impl<'a, H: ScriptHost> ResolveContext<'a, H> {
    /// The data object under the cursor.
    ///
    /// `None` when there is no data list, the cursor is out of range, or the
    /// element under the cursor is a nested list.
    #[must_use]
    pub fn current_object(&self) -> Option<&'a dyn DataObject> {
        self.data?.get(self.data_index)?.as_object()
    }
}
