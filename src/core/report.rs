//! Report orchestrator.
//!
//! Turns the raw entries of a finished machine into the caller-facing [`Report`]:
//!
//! - namespace: explicit static `ns` > enclosing hook binding > default namespace > none,
//!   with `""` meaning "no namespace" in the output
//! - dynamic options, key or namespace drop the key with the matching warning
//! - a dynamic default value keeps the key without a default

use crate::core::comments::KeyOverride;
use crate::core::context::{Extraction, KeySource, RawEntry, RawKey};
use crate::core::types::{ExtractOptions, ExtractedKey, PropertyValue, Report, Warning, WarningKind};

pub fn build_report(extraction: Extraction, options: &ExtractOptions) -> Report {
    let mut report = Report::default();
    let setup_binding = extraction.setup_binding;

    for entry in extraction.entries {
        match entry {
            RawEntry::Key(raw) => match resolve(raw, setup_binding.as_ref(), options) {
                Resolved::Key(key, warning) => {
                    report.keys.push(key);
                    report.warnings.extend(warning);
                }
                Resolved::Dropped(Some(warning)) => report.warnings.push(warning),
                Resolved::Dropped(None) => {}
            },
            RawEntry::Override(key, line) => report.keys.push(overridden(key, line, options)),
            RawEntry::Warning(kind, line) => report.warnings.push(Warning::new(kind, line)),
        }
    }
    report
}

enum Resolved {
    /// The key, with the warning it still carries.
    Key(ExtractedKey, Option<Warning>),
    Dropped(Option<Warning>),
}

fn dropped(kind: WarningKind, line: usize) -> Resolved {
    Resolved::Dropped(Some(Warning::new(kind, line)))
}

fn resolve(raw: RawKey, setup_binding: Option<&PropertyValue>, options: &ExtractOptions) -> Resolved {
    let line = raw.line;

    if raw.dynamic_options {
        return dropped(WarningKind::DynamicOptions, line);
    }
    let key_name = match raw.key_name {
        PropertyValue::Static(key_name) => key_name,
        PropertyValue::Dynamic => return dropped(WarningKind::DynamicKey, line),
        PropertyValue::Absent => return Resolved::Dropped(None),
    };

    let source = match raw.source {
        KeySource::Setup => setup_binding
            .cloned()
            .map_or(KeySource::Unbound, KeySource::Binding),
        source => source,
    };
    let inherited = match source {
        KeySource::Binding(namespace) => namespace,
        KeySource::Global => PropertyValue::Absent,
        KeySource::Unbound if options.strict_namespace => {
            return dropped(WarningKind::MissingTSource, line);
        }
        KeySource::Unbound if options.default_namespace.is_none() => {
            return Resolved::Dropped(None);
        }
        KeySource::Unbound | KeySource::Setup => PropertyValue::Absent,
    };

    let namespace = match raw.namespace {
        PropertyValue::Static(namespace) => Some(namespace),
        PropertyValue::Dynamic => return dropped(WarningKind::DynamicNamespace, line),
        PropertyValue::Absent => match inherited {
            PropertyValue::Static(namespace) => Some(namespace),
            PropertyValue::Dynamic => return dropped(WarningKind::UnresolvableNamespace, line),
            PropertyValue::Absent => options.default_namespace.clone(),
        },
    };

    let mut key = ExtractedKey::new(key_name, line);
    key.namespace = namespace.filter(|namespace| !namespace.is_empty());

    let warning = match raw.default_value {
        PropertyValue::Static(default_value) => {
            key.default_value = Some(default_value);
            None
        }
        PropertyValue::Dynamic => Some(Warning::new(WarningKind::DynamicDefaultValue, line)),
        PropertyValue::Absent => None,
    };
    Resolved::Key(key, warning)
}

fn overridden(key: KeyOverride, line: usize, options: &ExtractOptions) -> ExtractedKey {
    ExtractedKey {
        key_name: key.key_name,
        namespace: key
            .namespace
            .or_else(|| options.default_namespace.clone())
            .filter(|namespace| !namespace.is_empty()),
        default_value: key.default_value,
        line,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::context::Extraction;
    use crate::core::report::*;

    fn static_value(value: &str) -> PropertyValue {
        PropertyValue::Static(value.to_string())
    }

    fn raw(source: KeySource) -> RawKey {
        RawKey {
            key_name: static_value("k"),
            default_value: PropertyValue::Absent,
            namespace: PropertyValue::Absent,
            dynamic_options: false,
            source,
            line: 3,
        }
    }

    fn run(entries: Vec<RawEntry>, options: &ExtractOptions) -> Report {
        build_report(
            Extraction {
                entries,
                setup_binding: None,
            },
            options,
        )
    }

    fn single(raw: RawKey, options: &ExtractOptions) -> Report {
        run(vec![RawEntry::Key(raw)], options)
    }

    // ============================================================
    // Namespace policy
    // ============================================================

    #[test]
    fn test_explicit_namespace_wins() {
        let report = single(
            RawKey {
                namespace: static_value("explicit"),
                ..raw(KeySource::Binding(static_value("bound")))
            },
            &ExtractOptions::default().with_default_namespace("default"),
        );
        assert_eq!(report.keys, vec![ExtractedKey::new("k", 3).with_namespace("explicit")]);
    }

    #[test]
    fn test_binding_then_default_namespace() {
        let options = ExtractOptions::default().with_default_namespace("default");
        let report = single(raw(KeySource::Binding(static_value("bound"))), &options);
        assert_eq!(report.keys[0].namespace.as_deref(), Some("bound"));

        let report = single(raw(KeySource::Binding(PropertyValue::Absent)), &options);
        assert_eq!(report.keys[0].namespace.as_deref(), Some("default"));

        let report = single(raw(KeySource::Global), &ExtractOptions::default());
        assert_eq!(report.keys[0].namespace, None);
    }

    #[test]
    fn test_empty_namespace_is_not_overwritten() {
        let report = single(
            RawKey {
                namespace: static_value(""),
                ..raw(KeySource::Global)
            },
            &ExtractOptions::default().with_default_namespace("default"),
        );
        assert_eq!(report.keys, vec![ExtractedKey::new("k", 3)]);
    }

    #[test]
    fn test_unbound_calls() {
        let strict = single(raw(KeySource::Unbound), &ExtractOptions::default());
        assert!(strict.keys.is_empty());
        assert_eq!(strict.warnings, vec![Warning::new(WarningKind::MissingTSource, 3)]);

        let lenient = ExtractOptions::default().with_strict_namespace(false);
        assert_eq!(single(raw(KeySource::Unbound), &lenient), Report::default());

        let report = single(raw(KeySource::Unbound), &lenient.with_default_namespace("d"));
        assert_eq!(report.keys, vec![ExtractedKey::new("k", 3).with_namespace("d")]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_setup_source_uses_script_binding() {
        let report = build_report(
            Extraction {
                entries: vec![RawEntry::Key(raw(KeySource::Setup))],
                setup_binding: Some(static_value("vue")),
            },
            &ExtractOptions::default(),
        );
        assert_eq!(report.keys[0].namespace.as_deref(), Some("vue"));

        let report = single(raw(KeySource::Setup), &ExtractOptions::default());
        assert_eq!(report.warnings, vec![Warning::new(WarningKind::MissingTSource, 3)]);
    }

    // ============================================================
    // Dynamic values
    // ============================================================

    #[test]
    fn test_dynamic_values() {
        let options = ExtractOptions::default();
        let cases = [
            (
                RawKey {
                    dynamic_options: true,
                    ..raw(KeySource::Global)
                },
                WarningKind::DynamicOptions,
            ),
            (
                RawKey {
                    key_name: PropertyValue::Dynamic,
                    ..raw(KeySource::Global)
                },
                WarningKind::DynamicKey,
            ),
            (
                RawKey {
                    namespace: PropertyValue::Dynamic,
                    ..raw(KeySource::Global)
                },
                WarningKind::DynamicNamespace,
            ),
            (
                raw(KeySource::Binding(PropertyValue::Dynamic)),
                WarningKind::UnresolvableNamespace,
            ),
        ];
        for (raw, kind) in cases {
            let report = single(raw, &options);
            assert!(report.keys.is_empty(), "{kind}");
            assert_eq!(report.warnings, vec![Warning::new(kind, 3)]);
        }
    }

    #[test]
    fn test_dynamic_default_value_keeps_key() {
        let report = single(
            RawKey {
                default_value: PropertyValue::Dynamic,
                ..raw(KeySource::Global)
            },
            &ExtractOptions::default(),
        );
        assert_eq!(report.keys, vec![ExtractedKey::new("k", 3)]);
        assert_eq!(report.warnings, vec![Warning::new(WarningKind::DynamicDefaultValue, 3)]);
    }

    #[test]
    fn test_static_override_on_dynamic_binding() {
        let report = single(
            RawKey {
                namespace: static_value("fixed"),
                default_value: static_value("Hi"),
                ..raw(KeySource::Binding(PropertyValue::Dynamic))
            },
            &ExtractOptions::default(),
        );
        assert_eq!(
            report.keys,
            vec![ExtractedKey::new("k", 3).with_namespace("fixed").with_default_value("Hi")]
        );
    }

    #[test]
    fn test_overrides_and_warnings_pass_through() {
        let report = run(
            vec![
                RawEntry::Warning(WarningKind::UnusedIgnore, 1),
                RawEntry::Override(
                    KeyOverride {
                        key_name: "forced".to_string(),
                        namespace: None,
                        default_value: Some("D".to_string()),
                    },
                    2,
                ),
            ],
            &ExtractOptions::default().with_default_namespace("ns"),
        );
        assert_eq!(
            report.keys,
            vec![ExtractedKey::new("forced", 2).with_namespace("ns").with_default_value("D")]
        );
        assert_eq!(report.warnings, vec![Warning::new(WarningKind::UnusedIgnore, 1)]);
    }
}
