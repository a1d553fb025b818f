//! Hierarchical data lists.
//!
//! A data list is an ordered sequence whose elements are either data objects
//! or nested lists. Lists are reference-counted so processing frames can share
//! them without copying.

use std::fmt;
use std::sync::Arc;

use crate::DataObject;

/// One element of a [`DataList`].
#[derive(Clone)]
pub enum DataItem {
    /// A data object that `get` and `call` directives resolve against.
    Object(Arc<dyn DataObject>),
    /// A nested list, entered when a distinct file is included at its index.
    List(DataList),
}

impl DataItem {
    /// Wrap a data object.
    #[must_use]
    pub fn object(object: impl DataObject + 'static) -> Self {
        Self::Object(Arc::new(object))
    }

    /// Return the data object, if this element is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&dyn DataObject> {
        match self {
            Self::Object(object) => Some(object.as_ref()),
            Self::List(_) => None,
        }
    }

    /// Return the nested list, if this element is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&DataList> {
        match self {
            Self::Object(_) => None,
            Self::List(list) => Some(list),
        }
    }
}

impl fmt::Debug for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(_) => f.write_str("Object(..)"),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
        }
    }
}

impl From<DataList> for DataItem {
    fn from(list: DataList) -> Self {
        Self::List(list)
    }
}

/// Ordered, cheaply clonable list of [`DataItem`]s.
#[derive(Clone, Default)]
pub struct DataList(Arc<[DataItem]>);

impl DataList {
    /// Create a list from its elements.
    #[must_use]
    pub fn new(items: Vec<DataItem>) -> Self {
        Self(Arc::from(items))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DataItem> {
        self.0.get(index)
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataItem> {
        self.0.iter()
    }
}

impl fmt::Debug for DataList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl FromIterator<DataItem> for DataList {
    fn from_iter<I: IntoIterator<Item = DataItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
