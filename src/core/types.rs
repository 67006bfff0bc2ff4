//! Public data model of the extraction engine.
//!
//! - `PropertyValue`: tri-state value of a key field while it is being extracted
//! - `ExtractedKey` / `Warning` / `Report`: the per-file result handed to callers
//! - `ExtractOptions`: caller-supplied namespace policy and abort flag

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================
// Property values
// ============================================================

/// Value of a single key field (`keyName`, `namespace`, `defaultValue`).
///
/// An empty static string is a real value: `ns: ''` is distinct from not
/// mentioning `ns` at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PropertyValue {
    /// Not mentioned at all.
    #[default]
    Absent,
    /// A statically resolved string.
    Static(String),
    /// Syntactically present but not statically resolvable.
    Dynamic,
}

impl PropertyValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, PropertyValue::Absent)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, PropertyValue::Dynamic)
    }

    pub fn as_static(&self) -> Option<&str> {
        match self {
            PropertyValue::Static(value) => Some(value),
            PropertyValue::Absent | PropertyValue::Dynamic => None,
        }
    }

    /// Keep `self` unless it is absent.
    pub fn or(self, other: PropertyValue) -> PropertyValue {
        if self.is_absent() { other } else { self }
    }
}

impl From<Option<String>> for PropertyValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => PropertyValue::Static(value),
            None => PropertyValue::Dynamic,
        }
    }
}

// ============================================================
// Report
// ============================================================

/// A translation key found in source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedKey {
    pub key_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Source line (1-indexed).
    pub line: usize,
}

impl ExtractedKey {
    pub fn new(key_name: impl Into<String>, line: usize) -> Self {
        Self {
            key_name: key_name.into(),
            namespace: None,
            default_value: None,
            line,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

/// Recoverable problems found while extracting a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    #[serde(rename = "W_DYNAMIC_KEY")]
    DynamicKey,
    #[serde(rename = "W_DYNAMIC_NAMESPACE")]
    DynamicNamespace,
    #[serde(rename = "W_DYNAMIC_DEFAULT_VALUE")]
    DynamicDefaultValue,
    #[serde(rename = "W_DYNAMIC_OPTIONS")]
    DynamicOptions,
    #[serde(rename = "W_UNRESOLVABLE_NAMESPACE")]
    UnresolvableNamespace,
    #[serde(rename = "W_UNUSED_IGNORE")]
    UnusedIgnore,
    #[serde(rename = "W_MALFORMED_KEY_OVERRIDE")]
    MalformedKeyOverride,
    #[serde(rename = "W_INVALID_KEY_OVERRIDE")]
    InvalidKeyOverride,
    #[serde(rename = "W_VUE_SETUP_IS_A_REFERENCE")]
    VueSetupIsAReference,
    #[serde(rename = "W_MISSING_T_SOURCE")]
    MissingTSource,
}

impl WarningKind {
    /// Stable identifier, as used in reports and CI annotations.
    pub fn code(&self) -> &'static str {
        match self {
            WarningKind::DynamicKey => "W_DYNAMIC_KEY",
            WarningKind::DynamicNamespace => "W_DYNAMIC_NAMESPACE",
            WarningKind::DynamicDefaultValue => "W_DYNAMIC_DEFAULT_VALUE",
            WarningKind::DynamicOptions => "W_DYNAMIC_OPTIONS",
            WarningKind::UnresolvableNamespace => "W_UNRESOLVABLE_NAMESPACE",
            WarningKind::UnusedIgnore => "W_UNUSED_IGNORE",
            WarningKind::MalformedKeyOverride => "W_MALFORMED_KEY_OVERRIDE",
            WarningKind::InvalidKeyOverride => "W_INVALID_KEY_OVERRIDE",
            WarningKind::VueSetupIsAReference => "W_VUE_SETUP_IS_A_REFERENCE",
            WarningKind::MissingTSource => "W_MISSING_T_SOURCE",
        }
    }

    /// Human readable explanation.
    pub fn description(&self) -> &'static str {
        match self {
            WarningKind::DynamicKey => "Key is dynamic and cannot be extracted",
            WarningKind::DynamicNamespace => "Namespace is dynamic and cannot be extracted",
            WarningKind::DynamicDefaultValue => "Default value is dynamic and was left out",
            WarningKind::DynamicOptions => "Options are dynamic and the key cannot be extracted",
            WarningKind::UnresolvableNamespace => {
                "The namespace of the enclosing translation hook is dynamic"
            }
            WarningKind::UnusedIgnore => "@tolgee-ignore does not apply to any key",
            WarningKind::MalformedKeyOverride => "@tolgee-key payload could not be parsed",
            WarningKind::InvalidKeyOverride => {
                "@tolgee-key payload needs a string `key` and string `ns`/`defaultValue`"
            }
            WarningKind::VueSetupIsAReference => {
                "`setup` refers to a function declared elsewhere and cannot be analyzed"
            }
            WarningKind::MissingTSource => "`t` is not bound to a translation hook in this scope",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "warning")]
    pub kind: WarningKind,
    pub line: usize,
}

impl Warning {
    pub fn new(kind: WarningKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// Per-file extraction result, in source encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub keys: Vec<ExtractedKey>,
    pub warnings: Vec<Warning>,
}

// ============================================================
// Options
// ============================================================

/// Shared flag a caller can raise to abort a running extraction.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Report `t()` calls that are not bound to a translation hook.
    pub strict_namespace: bool,
    /// Namespace for keys that neither name one nor inherit one.
    pub default_namespace: Option<String>,
    pub abort: Option<AbortFlag>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strict_namespace: true,
            default_namespace: None,
            abort: None,
        }
    }
}

impl ExtractOptions {
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    pub fn with_strict_namespace(mut self, strict: bool) -> Self {
        self.strict_namespace = strict;
        self
    }

    pub fn with_abort(mut self, abort: AbortFlag) -> Self {
        self.abort = Some(abort);
        self
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortFlag::is_aborted)
    }
}
