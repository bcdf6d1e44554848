//! Rendering directives back to their raw mapping form.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::keys;
use super::parser::Method;
use super::types::{ColumnFamilySpec, ConfigScope, CoprocessorSpec, Directive};

impl Directive {
    /// Renders this directive as a single raw mapping.
    pub fn to_value(&self) -> Value {
        match self {
            Directive::AddOrModifyFamily(spec) => family_value(spec, None),
            Directive::DeleteFamily(name) => method_value(Method::Delete, [(keys::NAME, text(name))]),
            Directive::SetTableAttributes(attributes) => string_map_value(attributes),
            Directive::SetMetadata(metadata) => {
                mapping([(keys::METADATA, string_map_value(metadata))])
            }
            Directive::UnsetTableAttribute(name) => {
                method_value(Method::TableAttUnset, [(keys::NAME, text(name))])
            }
            Directive::AddCoprocessor(spec) => mapping([(keys::COPROCESSOR, coprocessor_value(spec))]),
            Directive::RemoveCoprocessorByClass(classnames) => method_value(
                Method::TableRemoveCoprocessor,
                [(keys::CLASSNAME, Value::from(classnames.clone()))],
            ),
            Directive::SetConfiguration(ConfigScope::Table, configuration) => {
                mapping([(keys::CONFIGURATION, string_map_value(configuration))])
            }
            Directive::SetConfiguration(ConfigScope::Family(name), configuration) => mapping([
                (keys::NAME, text(name)),
                (keys::CONFIGURATION, string_map_value(configuration)),
            ]),
            Directive::UnsetConfiguration(scope, key) => {
                let mut value = method_value(Method::TableConfUnset, [(keys::NAME, text(key))]);
                if let (ConfigScope::Family(family), Value::Object(map)) = (scope, &mut value) {
                    map.insert(keys::FAMILY.to_string(), text(family));
                }
                value
            }
            Directive::EnterLazyMode { scope, overrides } => {
                let mut value = method_value(
                    Method::LazyMode,
                    [(keys::CONFIGURATION, string_map_value(overrides))],
                );
                if let (ConfigScope::Family(family), Value::Object(map)) = (scope, &mut value) {
                    map.insert(keys::NAME.to_string(), text(family));
                }
                value
            }
        }
    }
}

/// Renders a directive list as raw arguments.
///
/// A family directive immediately followed by a configuration set for the
/// same family folds into one mapping, mirroring how the parser splits it.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tablealter_core::directive::{directives_to_values, parse_directives};
///
/// let raw = vec![json!({"NAME": "f1", "VERSIONS": "5", "CONFIGURATION": {"k": "v"}})];
/// let directives = parse_directives(&raw).unwrap();
/// assert_eq!(directives.len(), 2);
///
/// let rendered = directives_to_values(&directives);
/// assert_eq!(rendered, raw);
/// ```
pub fn directives_to_values(directives: &[Directive]) -> Vec<Value> {
    let mut values = Vec::with_capacity(directives.len());
    let mut iter = directives.iter().peekable();

    while let Some(directive) = iter.next() {
        let folded = match (directive, iter.peek()) {
            (
                Directive::AddOrModifyFamily(spec),
                Some(Directive::SetConfiguration(ConfigScope::Family(name), configuration)),
            ) if name == &spec.name => Some(family_value(spec, Some(configuration))),
            _ => None,
        };

        match folded {
            Some(value) => {
                iter.next();
                values.push(value);
            }
            None => values.push(directive.to_value()),
        }
    }
    values
}

fn family_value(spec: &ColumnFamilySpec, configuration: Option<&BTreeMap<String, String>>) -> Value {
    let mut map = Map::new();
    map.insert(keys::NAME.to_string(), text(&spec.name));
    for (key, value) in &spec.attributes {
        map.insert(key.clone(), text(value));
    }

    let mut merged = spec.configuration.clone();
    if let Some(configuration) = configuration {
        merged.extend(configuration.clone());
    }
    if !merged.is_empty() {
        map.insert(keys::CONFIGURATION.to_string(), string_map_value(&merged));
    }
    Value::Object(map)
}

fn coprocessor_value(spec: &CoprocessorSpec) -> Value {
    let mut map = Map::new();
    map.insert(keys::CLASSNAME.to_string(), text(&spec.classname));
    if let Some(jar_path) = &spec.jar_path {
        map.insert(keys::JAR_PATH.to_string(), text(jar_path));
    }
    map.insert(keys::PRIORITY.to_string(), Value::from(spec.priority));
    if !spec.properties.is_empty() {
        map.insert(keys::PROPERTIES.to_string(), string_map_value(&spec.properties));
    }
    Value::Object(map)
}

fn method_value<const N: usize>(method: Method, params: [(&str, Value); N]) -> Value {
    let mut map = Map::new();
    map.insert(keys::METHOD.to_string(), text(method.as_str()));
    for (key, value) in params {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

fn string_map_value(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), text(value)))
            .collect(),
    )
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}
