use pretty_assertions::assert_eq;

use crate::core::extract::extract;
use crate::core::types::*;
use crate::error::ExtractError;

fn run(source: &str, file_name: &str) -> Report {
    extract(source, file_name, &ExtractOptions::default()).unwrap()
}

fn key(key_name: &str, line: usize) -> ExtractedKey {
    ExtractedKey::new(key_name, line)
}

fn warning(kind: WarningKind, line: usize) -> Warning {
    Warning::new(kind, line)
}

// ============================================================
// React
// ============================================================

#[test]
fn test_react_hook_and_call() {
    let source = r#"import { useTranslate } from '@tolgee/react';

function App() {
  const { t } = useTranslate('ns');
  return <div>{t('hello', 'Hello!')}</div>;
}
"#;
    let report = run(source, "App.tsx");
    assert_eq!(
        report.keys,
        vec![key("hello", 5).with_namespace("ns").with_default_value("Hello!")]
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn test_react_sibling_function_has_no_binding() {
    let source = r#"function A() {
  const { t } = useTranslate('ns');
}
function B() {
  return t('k');
}
"#;
    let report = run(source, "a.ts");
    assert!(report.keys.is_empty());
    assert_eq!(report.warnings, vec![warning(WarningKind::MissingTSource, 5)]);

    let lenient = ExtractOptions::default().with_strict_namespace(false);
    assert_eq!(extract(source, "a.ts", &lenient).unwrap(), Report::default());

    let report = extract(source, "a.ts", &lenient.with_default_namespace("common")).unwrap();
    assert_eq!(report.keys, vec![key("k", 5).with_namespace("common")]);
}

#[test]
fn test_react_nested_function_inherits_binding() {
    let source = r#"function A() {
  const { t } = useTranslate('ns');
  const inner = () => {
    return t('nested');
  };
}
"#;
    assert_eq!(run(source, "a.tsx").keys, vec![key("nested", 4).with_namespace("ns")]);
}

#[test]
fn test_react_call_shapes() {
    let source = r#"const { t } = useTranslate();
t('a', { ns: 'other', defaultValue: 'A' });
t({ key: 'b', ns: '' });
t('c', params);
t(`d-${i}`);
t('e', `Hi ${name}`);
obj.t('ignored');
function t(key) {}
"#;
    let report = run(source, "a.js");
    assert_eq!(
        report.keys,
        vec![
            key("a", 2).with_namespace("other").with_default_value("A"),
            key("b", 3),
            key("e", 6),
        ]
    );
    assert_eq!(
        report.warnings,
        vec![
            warning(WarningKind::DynamicOptions, 4),
            warning(WarningKind::DynamicKey, 5),
            warning(WarningKind::DynamicDefaultValue, 6),
        ]
    );
}

#[test]
fn test_react_dynamic_hook_namespace() {
    let source = r#"const { t } = useTranslate(namespace);
t('a');
t('b', { ns: 'fixed' });
"#;
    let report = run(source, "a.ts");
    assert_eq!(report.keys, vec![key("b", 3).with_namespace("fixed")]);
    assert_eq!(
        report.warnings,
        vec![
            warning(WarningKind::DynamicNamespace, 1),
            warning(WarningKind::UnresolvableNamespace, 2),
        ]
    );
}

#[test]
fn test_react_components() {
    let source = r#"const a = <T keyName="key1" ns="" />;
const b = <T keyName="key2" />;
const c = (
  <T keyName="key3">Default   text</T>
);
const d = <T>{'from-children'}</T>;
const e = React.createElement(T, { keyName: 'key4' }, 'Four');
const f = createElement('div', null, 'not a key');
"#;
    let options = ExtractOptions::default().with_default_namespace("main");
    let report = extract(source, "a.jsx", &options).unwrap();
    assert_eq!(
        report.keys,
        vec![
            key("key1", 1),
            key("key2", 2).with_namespace("main"),
            key("key3", 4)
                .with_namespace("main")
                .with_default_value("Default text"),
            key("from-children", 6).with_namespace("main"),
            key("key4", 7)
                .with_namespace("main")
                .with_default_value("Four"),
        ]
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn test_react_component_with_dynamic_key() {
    let report = run("const a = <T keyName={name} />;\n", "a.tsx");
    assert!(report.keys.is_empty());
    assert_eq!(report.warnings, vec![warning(WarningKind::DynamicKey, 1)]);
}

#[test]
fn test_react_options_object_behind_cast_or_parens() {
    let source = r#"const { t } = useTranslate();
t(<Opts>{ key: 'cast' });
t(({ key: 'parens' }));
t({ key: 'as', ns: 'n' } as Opts);
"#;
    let report = run(source, "a.ts");
    assert_eq!(
        report.keys,
        vec![key("cast", 2), key("parens", 3), key("as", 4).with_namespace("n")]
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn test_tsx_generics_are_not_elements() {
    let source = r#"type Identity = <K>(value: K) => K;
const id = <T,>(value: T) => value;
const { t } = useTranslate();
t('x');
"#;
    let report = run(source, "a.tsx");
    assert_eq!(report.keys, vec![key("x", 4)]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_methods_named_t_are_not_calls() {
    let source = r#"const { t } = useTranslate();
class Store {
  t(key) {
    return key;
  }
  static t(key: string): string {
    return key;
  }
}
const view = { t(key) { return key; } };
if (ready) { t('kept') }
"#;
    let report = run(source, "a.ts");
    assert_eq!(report.keys, vec![key("kept", 11)]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_call_at_end_of_input() {
    let source = "const { t } = useTranslate();\nrender();\nt('last')";
    assert_eq!(run(source, "a.ts").keys, vec![key("last", 3)]);
}

// ============================================================
// Magic comments
// ============================================================

#[test]
fn test_ignore_directives() {
    let source = r#"const { t } = useTranslate();
// @tolgee-ignore
const a = 1;
// @tolgee-ignore
t(`dynamic-${i}`);
"#;
    let report = run(source, "a.ts");
    assert!(report.keys.is_empty());
    assert_eq!(report.warnings, vec![warning(WarningKind::UnusedIgnore, 2)]);
}

#[test]
fn test_ignore_applies_to_multiline_call() {
    let source = r#"const { t } = useTranslate();
// @tolgee-ignore
t(
  'multi'
);
t('kept');
"#;
    let report = run(source, "a.ts");
    assert_eq!(report.keys, vec![key("kept", 6)]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_key_override_replaces_next_line() {
    let source = r#"const { t } = useTranslate();
// @tolgee-key forced-key
t(someVariable);
/* @tolgee-key { key: 'obj', ns: 'n', defaultValue: 'D' } */
const unrelated = 1;
// @tolgee-key { key: 'broken'
t('normal');
"#;
    let report = run(source, "a.ts");
    assert_eq!(
        report.keys,
        vec![
            key("forced-key", 3),
            key("obj", 5).with_namespace("n").with_default_value("D"),
            key("normal", 7),
        ]
    );
    assert_eq!(report.warnings, vec![warning(WarningKind::MalformedKeyOverride, 6)]);
}

#[test]
fn test_key_override_covers_every_call_on_its_line() {
    let source = r#"const { t } = useTranslate();
// @tolgee-key forced
t('a'); t('b');
t('c');
"#;
    let report = run(source, "a.ts");
    assert_eq!(report.keys, vec![key("forced", 3), key("c", 4)]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_directive_after_call_without_semicolon() {
    let source = r#"const { t } = useTranslate();
// @tolgee-ignore
t('skipped')
// @tolgee-ignore
t('also-skipped')
t('kept')
"#;
    let report = run(source, "a.ts");
    assert_eq!(report.keys, vec![key("kept", 6)]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_jsx_comment_directive() {
    let source = r#"const a = (
  <div>
    {/* @tolgee-ignore */}
    <T keyName="skipped" />
    <T keyName="kept" />
  </div>
);
"#;
    assert_eq!(run(source, "a.tsx").keys, vec![key("kept", 5)]);
}

// ============================================================
// Vue
// ============================================================

#[test]
fn test_vue_single_file_component() {
    let source = r#"<template>
  <div>{{ $t('hello') }}</div>
  <T keyName="comp" />
  <p v-t="'directive'"></p>
  <span>{{ t('setup-key') }}</span>
</template>
<script setup>
import { useTranslate } from '@tolgee/vue';
const { t } = useTranslate('vue-ns');
</script>
"#;
    let report = run(source, "App.vue");
    assert_eq!(
        report.keys,
        vec![
            key("hello", 2),
            key("comp", 3),
            key("directive", 4),
            key("setup-key", 5).with_namespace("vue-ns"),
        ]
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn test_vue_options_api_script() {
    let source = r#"<script>
export default {
  setup() {
    const { t } = useTranslate('ns');
    console.log(t.value('script-key'));
    return { t };
  },
  methods: {
    greet() {
      return this.$t('global-key');
    },
  },
};
</script>
"#;
    let report = run(source, "App.vue");
    assert_eq!(
        report.keys,
        vec![key("script-key", 5).with_namespace("ns"), key("global-key", 10)]
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn test_vue_setup_reference() {
    let source = r#"<script>
import setup from './setup';
export default {
  setup,
};
</script>
"#;
    let report = run(source, "App.vue");
    assert_eq!(report.warnings, vec![warning(WarningKind::VueSetupIsAReference, 4)]);
}

#[test]
fn test_vue_template_t_without_script_hook() {
    let source = "<template>\n  <p>{{ t('orphan') }}</p>\n</template>\n";
    let report = run(source, "App.vue");
    assert!(report.keys.is_empty());
    assert_eq!(report.warnings, vec![warning(WarningKind::MissingTSource, 2)]);
}

#[test]
fn test_vue_void_element_inside_component() {
    let source = r#"<template>
  <T key-name="a">Line<br>two</T>
  <T key-name="b" />
</template>
"#;
    let report = run(source, "App.vue");
    let keys: Vec<_> = report
        .keys
        .iter()
        .map(|key| (key.key_name.as_str(), key.line))
        .collect();
    assert_eq!(keys, vec![("a", 2), ("b", 3)]);
}

// ============================================================
// Svelte
// ============================================================

#[test]
fn test_svelte_component() {
    let source = r#"<script>
  import { getTranslate, T } from '@tolgee/svelte';
  const { t } = getTranslate('sv');
</script>

<h1>{$t('title')}</h1>
<T keyName="comp" />
"#;
    let report = run(source, "App.svelte");
    assert_eq!(
        report.keys,
        vec![key("title", 6).with_namespace("sv"), key("comp", 7)]
    );
}

#[test]
fn test_svelte_markup_before_script() {
    let source = r#"<h1>{$t('title')}</h1>

<script>
  const { t } = getTranslate('sv');
</script>
"#;
    let report = run(source, "App.svelte");
    assert_eq!(report.keys, vec![key("title", 1).with_namespace("sv")]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_svelte_void_element_inside_component() {
    let source = r#"<T keyName="a">Line<br>two</T>
<p>after</p>
"#;
    let report = run(source, "App.svelte");
    let keys: Vec<_> = report.keys.iter().map(|key| key.key_name.as_str()).collect();
    assert_eq!(keys, vec!["a"]);
}

// ============================================================
// Angular
// ============================================================

#[test]
fn test_angular_pipes_and_directive() {
    let source = r#"<h1>{{ 'title' | translate }}</h1>
<p [title]="'tooltip' | translate:'Tip'"></p>
<span t key="directive" ns="ng" default="Hello"></span>
<i>{{ name | translate }}</i>
"#;
    let report = run(source, "app.component.html");
    assert_eq!(
        report.keys,
        vec![
            key("title", 1),
            key("tooltip", 2).with_default_value("Tip"),
            key("directive", 3)
                .with_namespace("ng")
                .with_default_value("Hello"),
        ]
    );
    assert_eq!(report.warnings, vec![warning(WarningKind::DynamicKey, 4)]);
}

// ============================================================
// Failures and repeatability
// ============================================================

#[test]
fn test_unknown_grammar() {
    assert!(matches!(
        extract("", "main.py", &ExtractOptions::default()),
        Err(ExtractError::UnknownGrammar { .. })
    ));
}

#[test]
fn test_unterminated_call() {
    let source = "const { t } = useTranslate();\nt('a',\n";
    assert!(matches!(
        extract(source, "a.ts", &ExtractOptions::default()),
        Err(ExtractError::UnterminatedConstruct { line: 2 })
    ));
}

#[test]
fn test_cancelled_extraction() {
    let abort = AbortFlag::new();
    abort.abort();
    let options = ExtractOptions::default().with_abort(abort);
    assert!(matches!(
        extract("t('a');", "a.ts", &options),
        Err(ExtractError::Cancelled)
    ));
}

#[test]
fn test_extraction_is_repeatable() {
    let source = r#"const { t } = useTranslate('ns');
// @tolgee-ignore
t('a');
t('b');
t(dynamic);
"#;
    let first = run(source, "a.ts");
    assert_eq!(run(source, "a.ts"), first);
    assert_eq!(first.keys, vec![key("b", 4).with_namespace("ns")]);
    assert_eq!(first.warnings, vec![warning(WarningKind::DynamicKey, 5)]);
}
