use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::keys;

/// Attribute name to value. Keys are normalized to upper case.
pub type AttributeMap = BTreeMap<String, String>;

/// Table-scope attributes (MAX_FILESIZE, DURABILITY, REGION_REPLICATION, ...).
pub type TableAttributeSet = AttributeMap;

/// Configuration key to value. Keys are case-sensitive.
pub type ConfigurationOverrides = BTreeMap<String, String>;

/// Priority assigned to a coprocessor when none is given.
pub const DEFAULT_COPROCESSOR_PRIORITY: i32 = 1_073_741_823;

/// Schema of a single column family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamilySpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configuration: ConfigurationOverrides,
}

impl ColumnFamilySpec {
    /// Creates a family spec with default attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: AttributeMap::new(),
            configuration: ConfigurationOverrides::new(),
        }
    }

    /// Sets an attribute, normalizing its key.
    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(keys::normalize_key(key), value.into());
        self
    }

    /// Sets a configuration override for this family.
    pub fn with_configuration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.insert(key.into(), value.into());
        self
    }

    /// Looks up an attribute by (case-insensitive) key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(&keys::normalize_key(key))
            .map(String::as_str)
    }
}

/// A table coprocessor registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoprocessorSpec {
    pub classname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar_path: Option<String>,
    pub priority: i32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl CoprocessorSpec {
    /// Creates a coprocessor spec with the default priority and no jar.
    pub fn new(classname: impl Into<String>) -> Self {
        Self {
            classname: classname.into(),
            jar_path: None,
            priority: DEFAULT_COPROCESSOR_PRIORITY,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_jar_path(mut self, jar_path: impl Into<String>) -> Self {
        self.jar_path = Some(jar_path.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Renders the `coprocessor$N` attribute value: `jar|classname|priority|k1=v1,k2=v2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablealter_core::directive::CoprocessorSpec;
    ///
    /// let spec = CoprocessorSpec::new("org.example.Observer")
    ///     .with_jar_path("hdfs:///foo.jar")
    ///     .with_priority(12)
    ///     .with_property("a", "17");
    /// assert_eq!(
    ///     spec.to_attribute_value(),
    ///     "hdfs:///foo.jar|org.example.Observer|12|a=17"
    /// );
    /// ```
    pub fn to_attribute_value(&self) -> String {
        let properties = self
            .properties
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}|{}|{}|{}",
            self.jar_path.as_deref().unwrap_or_default(),
            self.classname,
            self.priority,
            properties
        )
    }
}

/// Where a configuration override applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "family", rename_all = "snake_case")]
pub enum ConfigScope {
    Table,
    Family(String),
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigScope::Table => write!(f, "table"),
            ConfigScope::Family(name) => write!(f, "family '{}'", name),
        }
    }
}

/// One normalized alteration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    AddOrModifyFamily(ColumnFamilySpec),
    DeleteFamily(String),
    SetTableAttributes(TableAttributeSet),
    /// Free-form table metadata (`METADATA => {...}`).
    SetMetadata(BTreeMap<String, String>),
    /// Removes a table attribute, a metadata key, or a `coprocessor$N` entry.
    UnsetTableAttribute(String),
    AddCoprocessor(CoprocessorSpec),
    RemoveCoprocessorByClass(Vec<String>),
    SetConfiguration(ConfigScope, ConfigurationOverrides),
    UnsetConfiguration(ConfigScope, String),
    EnterLazyMode {
        scope: ConfigScope,
        overrides: ConfigurationOverrides,
    },
}

impl Directive {
    /// Short name used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Directive::AddOrModifyFamily(_) => "add_or_modify_family",
            Directive::DeleteFamily(_) => "delete_family",
            Directive::SetTableAttributes(_) => "set_table_attributes",
            Directive::SetMetadata(_) => "set_metadata",
            Directive::UnsetTableAttribute(_) => "unset_table_attribute",
            Directive::AddCoprocessor(_) => "add_coprocessor",
            Directive::RemoveCoprocessorByClass(_) => "remove_coprocessor",
            Directive::SetConfiguration(..) => "set_configuration",
            Directive::UnsetConfiguration(..) => "unset_configuration",
            Directive::EnterLazyMode { .. } => "lazy_mode",
        }
    }

    /// Returns true if this directive requests lazy propagation.
    pub fn is_lazy(&self) -> bool {
        matches!(self, Directive::EnterLazyMode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_attribute_keys_are_normalized() {
        let spec = ColumnFamilySpec::new("f1")
            .with_attribute("versions", "3")
            .with_attribute("VERSIONS", "5");
        assert_eq!(spec.attributes.len(), 1);
        assert_eq!(spec.attribute("Versions"), Some("5"));
    }

    #[test]
    fn test_coprocessor_attribute_value_defaults() {
        let spec = CoprocessorSpec::new("a.B");
        assert_eq!(spec.to_attribute_value(), "|a.B|1073741823|");
    }

    #[test]
    fn test_coprocessor_attribute_value_sorts_properties() {
        let spec = CoprocessorSpec::new("a.B")
            .with_property("z", "1")
            .with_property("a", "2");
        assert_eq!(spec.to_attribute_value(), "|a.B|1073741823|a=2,z=1");
    }

    #[test]
    fn test_config_scope_display() {
        assert_eq!(ConfigScope::Table.to_string(), "table");
        assert_eq!(
            ConfigScope::Family("f1".to_string()).to_string(),
            "family 'f1'"
        );
    }

    #[test]
    fn test_directive_is_lazy() {
        let lazy = Directive::EnterLazyMode {
            scope: ConfigScope::Table,
            overrides: ConfigurationOverrides::new(),
        };
        assert!(lazy.is_lazy());
        assert!(!Directive::DeleteFamily("f1".to_string()).is_lazy());
        assert_eq!(lazy.kind(), "lazy_mode");
    }
}
