//! Classification of raw `alter` arguments into typed directives.
//!
//! Raw arguments are JSON values: a bare string names a column family, and a
//! mapping is classified by its keys (`METHOD`, `NAME`, legacy `delete`, or a
//! table-level mapping). All string-keyed inspection of input lives here.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::error::{DirectiveError, Result};
use super::keys;
use super::types::{ColumnFamilySpec, ConfigScope, CoprocessorSpec, Directive, TableAttributeSet};

/// Operations selectable through the `METHOD` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Delete,
    LazyMode,
    TableConfUnset,
    TableAttUnset,
    TableRemoveCoprocessor,
    /// Legacy form of a table-level mapping.
    TableAtt,
}

impl Method {
    /// Returns the name accepted under `METHOD`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "delete",
            Method::LazyMode => "lazy_mode",
            Method::TableConfUnset => "table_conf_unset",
            Method::TableAttUnset => "table_att_unset",
            Method::TableRemoveCoprocessor => "table_remove_coprocessor",
            Method::TableAtt => "table_att",
        }
    }

    /// Resolves a `METHOD` value, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "delete" => Some(Method::Delete),
            "lazy_mode" => Some(Method::LazyMode),
            "table_conf_unset" => Some(Method::TableConfUnset),
            "table_att_unset" => Some(Method::TableAttUnset),
            "table_remove_coprocessor" => Some(Method::TableRemoveCoprocessor),
            "table_att" => Some(Method::TableAtt),
            _ => None,
        }
    }
}

/// Parses an ordered sequence of raw arguments into directives.
///
/// Input order is preserved; a single argument may expand into several
/// directives (e.g. a family mapping with `CONFIGURATION`).
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tablealter_core::directive::{parse_directives, Directive};
///
/// let directives = parse_directives(&[
///     json!("f1"),
///     json!({"METHOD": "delete", "NAME": "f2"}),
/// ])
/// .unwrap();
///
/// assert_eq!(directives.len(), 2);
/// assert_eq!(directives[1], Directive::DeleteFamily("f2".to_string()));
/// ```
pub fn parse_directives(elements: &[Value]) -> Result<Vec<Directive>> {
    let mut directives = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        parse_element(index, element, &mut directives)?;
    }
    Ok(directives)
}

fn parse_element(index: usize, element: &Value, out: &mut Vec<Directive>) -> Result<()> {
    match element {
        Value::String(_) => {
            let name = single_identifier(index, keys::NAME, element)?;
            out.push(Directive::AddOrModifyFamily(ColumnFamilySpec::new(name)));
            Ok(())
        }
        Value::Object(map) => parse_mapping(index, normalize_mapping(map), out),
        other => Err(malformed(
            index,
            format!(
                "expected a family name or a mapping, got {}",
                value_kind(other)
            ),
        )),
    }
}

/// Upper-cases top-level keys. A later key overrides an earlier one that
/// normalizes to the same name.
fn normalize_mapping(map: &Map<String, Value>) -> Map<String, Value> {
    let mut normalized = Map::new();
    for (key, value) in map {
        normalized.insert(keys::normalize_key(key), value.clone());
    }
    normalized
}

fn parse_mapping(index: usize, mut map: Map<String, Value>, out: &mut Vec<Directive>) -> Result<()> {
    if map.is_empty() {
        return Err(malformed(index, "empty mapping"));
    }

    if let Some(method) = map.remove(keys::METHOD) {
        return parse_method(index, &method, map, out);
    }

    if let Some(target) = map.remove(keys::LEGACY_DELETE) {
        reject_leftovers(index, &map, "'delete'")?;
        out.extend(
            identifiers(index, "delete", &target)?
                .into_iter()
                .map(Directive::DeleteFamily),
        );
        return Ok(());
    }

    if let Some(name) = map.remove(keys::NAME) {
        return parse_family(index, &name, map, out);
    }

    parse_table_mapping(index, map, out)
}

fn parse_method(
    index: usize,
    method: &Value,
    mut params: Map<String, Value>,
    out: &mut Vec<Directive>,
) -> Result<()> {
    let Some(name) = method.as_str() else {
        return Err(malformed(
            index,
            format!("METHOD must be a string, got {}", value_kind(method)),
        ));
    };
    let method = Method::from_name(name).ok_or_else(|| DirectiveError::UnknownMethod {
        index,
        method: name.to_string(),
    })?;

    match method {
        Method::Delete => {
            let target = required(index, &mut params, keys::NAME)?;
            reject_leftovers(index, &params, method.as_str())?;
            out.extend(
                identifiers(index, keys::NAME, &target)?
                    .into_iter()
                    .map(Directive::DeleteFamily),
            );
        }
        Method::LazyMode => {
            let configuration = params
                .remove(keys::CONFIGURATION)
                .ok_or_else(|| malformed(index, "lazy_mode requires CONFIGURATION"))?;
            let scope = optional_family_scope(index, &mut params, keys::NAME)?;
            reject_leftovers(index, &params, method.as_str())?;
            let overrides = non_empty_string_map(index, keys::CONFIGURATION, &configuration)?;
            out.push(Directive::EnterLazyMode { scope, overrides });
        }
        Method::TableConfUnset => {
            let target = required(index, &mut params, keys::NAME)?;
            let scope = optional_family_scope(index, &mut params, keys::FAMILY)?;
            reject_leftovers(index, &params, method.as_str())?;
            for key in identifiers(index, keys::NAME, &target)? {
                out.push(Directive::UnsetConfiguration(scope.clone(), key));
            }
        }
        Method::TableAttUnset => {
            let target = required(index, &mut params, keys::NAME)?;
            reject_leftovers(index, &params, method.as_str())?;
            out.extend(
                identifiers(index, keys::NAME, &target)?
                    .into_iter()
                    .map(Directive::UnsetTableAttribute),
            );
        }
        Method::TableRemoveCoprocessor => {
            let target = required(index, &mut params, keys::CLASSNAME)?;
            reject_leftovers(index, &params, method.as_str())?;
            out.push(Directive::RemoveCoprocessorByClass(identifiers(
                index,
                keys::CLASSNAME,
                &target,
            )?));
        }
        Method::TableAtt => {
            if params.is_empty() {
                return Err(malformed(index, "table_att requires at least one attribute"));
            }
            parse_table_mapping(index, params, out)?;
        }
    }
    Ok(())
}

fn parse_family(
    index: usize,
    name: &Value,
    mut map: Map<String, Value>,
    out: &mut Vec<Directive>,
) -> Result<()> {
    let name = single_identifier(index, keys::NAME, name)?;
    let configuration = map
        .remove(keys::CONFIGURATION)
        .map(|value| non_empty_string_map(index, keys::CONFIGURATION, &value))
        .transpose()?;

    let mut spec = ColumnFamilySpec::new(name.clone());
    for (key, value) in &map {
        spec.attributes.insert(key.clone(), scalar(index, key, value)?);
    }
    out.push(Directive::AddOrModifyFamily(spec));

    if let Some(configuration) = configuration {
        out.push(Directive::SetConfiguration(
            ConfigScope::Family(name),
            configuration,
        ));
    }
    Ok(())
}

/// Parses a mapping without `METHOD` or `NAME`.
///
/// Emits, in order: one `SetTableAttributes` for all recognized attributes,
/// `SetMetadata`, one `AddCoprocessor` per coprocessor, `SetConfiguration`.
fn parse_table_mapping(
    index: usize,
    map: Map<String, Value>,
    out: &mut Vec<Directive>,
) -> Result<()> {
    let mut attributes = TableAttributeSet::new();
    let mut metadata = None;
    let mut coprocessors = Vec::new();
    let mut configuration = None;

    for (key, value) in &map {
        match key.as_str() {
            keys::METADATA => metadata = Some(non_empty_string_map(index, keys::METADATA, value)?),
            keys::COPROCESSOR => coprocessors.extend(coprocessor_specs(index, value)?),
            keys::CONFIGURATION => {
                configuration = Some(non_empty_string_map(index, keys::CONFIGURATION, value)?)
            }
            attribute if keys::is_table_attribute(attribute) => {
                attributes.insert(attribute.to_string(), scalar(index, attribute, value)?);
            }
            unknown => {
                return Err(malformed(
                    index,
                    format!("unrecognized table attribute '{}'", unknown),
                ))
            }
        }
    }

    if !attributes.is_empty() {
        out.push(Directive::SetTableAttributes(attributes));
    }
    if let Some(metadata) = metadata {
        out.push(Directive::SetMetadata(metadata));
    }
    out.extend(coprocessors.into_iter().map(Directive::AddCoprocessor));
    if let Some(configuration) = configuration {
        out.push(Directive::SetConfiguration(ConfigScope::Table, configuration));
    }
    Ok(())
}

fn coprocessor_specs(index: usize, value: &Value) -> Result<Vec<CoprocessorSpec>> {
    match value {
        Value::Array(items) if items.is_empty() => Err(DirectiveError::MissingIdentifier {
            index,
            key: keys::CLASSNAME,
        }),
        Value::Array(items) => items
            .iter()
            .map(|item| coprocessor_spec(index, item))
            .collect(),
        other => Ok(vec![coprocessor_spec(index, other)?]),
    }
}

fn coprocessor_spec(index: usize, value: &Value) -> Result<CoprocessorSpec> {
    match value {
        Value::Object(map) => coprocessor_from_mapping(index, normalize_mapping(map)),
        Value::String(raw) => coprocessor_from_attribute_value(index, raw),
        other => Err(malformed(
            index,
            format!(
                "COPROCESSOR must be a mapping or a string, got {}",
                value_kind(other)
            ),
        )),
    }
}

fn coprocessor_from_mapping(index: usize, mut map: Map<String, Value>) -> Result<CoprocessorSpec> {
    let classname = required(index, &mut map, keys::CLASSNAME)?;
    let mut spec = CoprocessorSpec::new(single_identifier(index, keys::CLASSNAME, &classname)?);

    if let Some(jar_path) = map.remove(keys::JAR_PATH) {
        spec.jar_path = Some(scalar(index, keys::JAR_PATH, &jar_path)?);
    }
    if let Some(priority) = map.remove(keys::PRIORITY) {
        spec.priority = priority_value(index, &priority)?;
    }
    if let Some(properties) = map.remove(keys::PROPERTIES) {
        spec.properties = string_map(index, keys::PROPERTIES, &properties)?;
    }
    reject_leftovers(index, &map, keys::COPROCESSOR)?;
    Ok(spec)
}

/// Parses the `jar|classname|priority|k1=v1,k2=v2` form. A string without
/// `|` is taken as a bare classname.
fn coprocessor_from_attribute_value(index: usize, raw: &str) -> Result<CoprocessorSpec> {
    let parts: Vec<&str> = raw.splitn(4, '|').map(str::trim).collect();
    let (jar_path, classname) = match parts.as_slice() {
        [classname] => ("", *classname),
        [jar_path, classname, ..] => (*jar_path, *classname),
        [] => ("", ""),
    };
    if classname.is_empty() {
        return Err(DirectiveError::MissingIdentifier {
            index,
            key: keys::CLASSNAME,
        });
    }

    let mut spec = CoprocessorSpec::new(classname);
    if !jar_path.is_empty() {
        spec.jar_path = Some(jar_path.to_string());
    }
    if let Some(priority) = parts.get(2).filter(|priority| !priority.is_empty()) {
        spec.priority = priority.parse().map_err(|_| {
            malformed(
                index,
                format!("coprocessor priority must be an integer, got '{}'", priority),
            )
        })?;
    }
    if let Some(properties) = parts.get(3).filter(|properties| !properties.is_empty()) {
        for pair in properties.split(',') {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                malformed(
                    index,
                    format!("coprocessor property '{}' is not key=value", pair),
                )
            })?;
            spec.properties
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(spec)
}

fn priority_value(index: usize, value: &Value) -> Result<i32> {
    let priority = match value {
        Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    };
    priority.ok_or_else(|| {
        malformed(
            index,
            format!("PRIORITY must be an integer, got {}", value),
        )
    })
}

fn optional_family_scope(
    index: usize,
    params: &mut Map<String, Value>,
    key: &'static str,
) -> Result<ConfigScope> {
    match params.remove(key) {
        Some(family) => Ok(ConfigScope::Family(single_identifier(index, key, &family)?)),
        None => Ok(ConfigScope::Table),
    }
}

fn required(index: usize, map: &mut Map<String, Value>, key: &'static str) -> Result<Value> {
    map.remove(key)
        .ok_or(DirectiveError::MissingIdentifier { index, key })
}

fn reject_leftovers(index: usize, map: &Map<String, Value>, context: &str) -> Result<()> {
    if map.is_empty() {
        return Ok(());
    }
    let unexpected: Vec<&str> = map.keys().map(String::as_str).collect();
    Err(malformed(
        index,
        format!("unexpected keys for {}: {}", context, unexpected.join(", ")),
    ))
}

fn single_identifier(index: usize, key: &'static str, value: &Value) -> Result<String> {
    match value {
        Value::String(identifier) if identifier.trim().is_empty() => {
            Err(DirectiveError::MissingIdentifier { index, key })
        }
        Value::String(identifier) => Ok(identifier.trim().to_string()),
        other => Err(malformed(
            index,
            format!("{} must be a string, got {}", key, value_kind(other)),
        )),
    }
}

/// Accepts a single identifier or a non-empty list of identifiers.
fn identifiers(index: usize, key: &'static str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) if items.is_empty() => {
            Err(DirectiveError::MissingIdentifier { index, key })
        }
        Value::Array(items) => items
            .iter()
            .map(|item| single_identifier(index, key, item))
            .collect(),
        other => Ok(vec![single_identifier(index, key, other)?]),
    }
}

fn scalar(index: usize, key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(malformed(
            index,
            format!("{} must be a scalar value, got {}", key, value_kind(other)),
        )),
    }
}

fn string_map(index: usize, key: &str, value: &Value) -> Result<BTreeMap<String, String>> {
    let Value::Object(map) = value else {
        return Err(malformed(
            index,
            format!("{} must be a mapping, got {}", key, value_kind(value)),
        ));
    };
    map.iter()
        .map(|(entry_key, entry_value)| {
            Ok((entry_key.clone(), scalar(index, entry_key, entry_value)?))
        })
        .collect()
}

fn non_empty_string_map(
    index: usize,
    key: &str,
    value: &Value,
) -> Result<BTreeMap<String, String>> {
    let map = string_map(index, key, value)?;
    if map.is_empty() {
        return Err(malformed(index, format!("{} must not be empty", key)));
    }
    Ok(map)
}

fn malformed(index: usize, reason: impl Into<String>) -> DirectiveError {
    DirectiveError::MalformedDirective {
        index,
        reason: reason.into(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
