//! JSON data files as template data lists.

use serde_json::{Map, Value};
use ssi_engine::{Attribute, DataItem, DataList, DataObject, ExtensionTable, ScriptError};

use crate::error::CliError;
use crate::host::RenderEnv;

/// A JSON object exposed to templates.
///
/// Keys are visible both as properties and as fields. String values are
/// emitted verbatim, every other value as compact JSON.
#[derive(Debug)]
pub(crate) struct JsonObject(Map<String, Value>);

impl JsonObject {
    fn attribute(&self, name: &str) -> Option<Attribute> {
        self.0.get(name).map(|value| match value {
            Value::String(text) => Attribute::new(text),
            other => Attribute::new(other),
        })
    }
}

impl DataObject for JsonObject {
    fn property(&self, name: &str) -> Result<Option<Attribute>, ScriptError> {
        Ok(self.attribute(name))
    }

    fn field(&self, name: &str) -> Option<Attribute> {
        self.attribute(name)
    }

    fn invoke(&self, name: &str) -> Result<Option<String>, ScriptError> {
        Ok((name == "Keys").then(|| {
            self.0
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",")
        }))
    }
}

/// Parse a JSON document into a data list.
///
/// A top-level object becomes a one-element list.
pub(crate) fn parse_data(json: &str) -> Result<DataList, CliError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(DataList::new(vec![DataItem::object(JsonObject(map))])),
        Value::Array(items) => to_list(items),
        _ => Err(CliError::Validation(
            "Data file must contain a JSON object or array".to_owned(),
        )),
    }
}

fn to_list(items: Vec<Value>) -> Result<DataList, CliError> {
    items.into_iter().map(to_item).collect::<Result<Vec<_>, _>>().map(DataList::new)
}

fn to_item(value: Value) -> Result<DataItem, CliError> {
    match value {
        Value::Object(map) => Ok(DataItem::object(JsonObject(map))),
        Value::Array(items) => Ok(DataItem::List(to_list(items)?)),
        other => Err(CliError::Validation(format!(
            "Data list elements must be objects or arrays, found {other}"
        ))),
    }
}

/// Extension functions available to `call` for every data object.
///
/// - `Json`: the listed `Keys` and their property values as a JSON object
/// - `Length`: number of keys
pub(crate) fn extensions() -> ExtensionTable<RenderEnv> {
    ExtensionTable::new()
        .with("Json", |object: &dyn DataObject, _env: &RenderEnv| {
            let mut map = Map::new();
            for key in object_keys(object)? {
                if let Some(attribute) = object.property(&key)? {
                    map.insert(key, Value::String(attribute.value));
                }
            }
            Ok(Value::Object(map).to_string())
        })
        .with("Length", |object: &dyn DataObject, _env: &RenderEnv| {
            Ok(object_keys(object)?.len().to_string())
        })
}

fn object_keys(object: &dyn DataObject) -> Result<Vec<String>, ScriptError> {
    let keys = object
        .invoke("Keys")?
        .ok_or_else(|| ScriptError::NotFound("Keys".to_owned()))?;
    Ok(keys
        .split(',')
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
        .collect())
}
