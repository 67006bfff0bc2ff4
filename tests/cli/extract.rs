use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, Run};

const APP: &str = r#"import { useTranslate } from '@tolgee/react';

export function App() {
  const { t } = useTranslate('common');
  return <h1>{t('welcome', 'Welcome!')}</h1>;
}
"#;

fn run(command: &mut std::process::Command) -> Result<Run> {
    Ok(Run::from(command.output()?))
}

#[test]
fn test_extract_with_default_patterns() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file("other/Ignored.tsx", APP)?;

    let result = run(&mut test.extract_command())?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.contains("src/App.tsx\n"));
    assert!(result.stdout.contains("5 welcome ns: common default: \"Welcome!\""));
    assert!(!result.stdout.contains("Ignored.tsx"));
    assert!(result.stdout.contains("\u{2713} Extracted 1 key from 1 file"));
    Ok(())
}

#[test]
fn test_extract_warnings_exit_with_failure() -> Result<()> {
    let test = CliTest::with_file("src/a.ts", "const { t } = useTranslate();\nt(key);\n")?;

    let result = run(&mut test.extract_command())?;

    assert_eq!(result.code, Some(1));
    assert!(
        result
            .stdout
            .contains("warning: Key is dynamic and cannot be extracted  W_DYNAMIC_KEY")
    );
    assert!(result.stdout.contains("--> src/a.ts:2"));
    assert!(
        result
            .stdout
            .contains("Extracted 0 keys from 1 file (0 errors, 1 warning)")
    );
    Ok(())
}

#[test]
fn test_extract_module_extensions() -> Result<()> {
    let test = CliTest::with_file("src/a.mjs", "const { t } = useTranslate();\nt('from-mjs');\n")?;
    test.write_file("src/b.cts", "const { t } = useTranslate();\nt('from-cts');\n")?;

    let result = run(&mut test.extract_command())?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.contains("src/a.mjs\n"));
    assert!(result.stdout.contains("src/b.cts\n"));
    assert!(result.stdout.contains("Extracted 2 keys from 2 files"));
    Ok(())
}

#[test]
fn test_extract_json() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;

    let result = run(test.extract_command().arg("--json"))?;

    assert_eq!(result.code, Some(0));
    let document: Value = serde_json::from_str(&result.stdout)?;
    assert_eq!(document["keyCount"], 1);
    assert_eq!(document["files"][0]["path"], "src/App.tsx");
    assert_eq!(document["files"][0]["keys"][0]["keyName"], "welcome");
    assert_eq!(document["files"][0]["keys"][0]["namespace"], "common");
    assert_eq!(document["files"][0]["keys"][0]["line"], 5);
    Ok(())
}

#[test]
fn test_extract_explicit_directory_with_default_namespace() -> Result<()> {
    let test = CliTest::with_file(
        "lib/Widget.vue",
        "<template>\n  <p>{{ $t('widget.title') }}</p>\n</template>\n",
    )?;

    let result = run(test
        .extract_command()
        .args(["lib", "--default-namespace", "widgets"]))?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.contains("lib/Widget.vue\n"));
    assert!(result.stdout.contains("2 widget.title ns: widgets"));
    Ok(())
}

#[test]
fn test_extract_config_and_overrides() -> Result<()> {
    let test = CliTest::with_file("src/a.ts", "t('orphan');\n")?;
    test.write_file(
        ".tolgeerc.json",
        r#"{ "strictNamespace": false, "defaultNamespace": "fallback" }"#,
    )?;

    let result = run(&mut test.extract_command())?;
    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("1 orphan ns: fallback"));

    let result = run(test.extract_command().args(["--strict-namespace", "true"]))?;
    assert_eq!(result.code, Some(1));
    assert!(result.stdout.contains("W_MISSING_T_SOURCE"));
    assert!(result.stdout.contains("--> src/a.ts:1"));
    Ok(())
}

#[test]
fn test_extract_hard_failure() -> Result<()> {
    let test = CliTest::with_file("src/broken.ts", "const { t } = useTranslate();\nt('a',\n")?;
    test.write_file("notes.md", "# notes\n")?;

    let result = run(&mut test.extract_command())?;
    assert_eq!(result.code, Some(2));
    assert!(result.stdout.contains("error: Failed to extract"));
    assert!(result.stdout.contains("unterminated construct starting on line 2"));
    assert!(result.stdout.contains("--> src/broken.ts"));

    let result = run(test.extract_command().arg("notes.md"))?;
    assert_eq!(result.code, Some(2));
    assert!(result.stdout.contains("no grammar is declared for"));
    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".tolgeerc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let result = run(&mut test.extract_command())?;
    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Invalid glob pattern in 'ignores'"));

    let test = CliTest::with_file("src/a.ts", "")?;
    let result = run(test.extract_command().args(["--timeout-ms", "0"]))?;
    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("extractTimeoutMs"));
    Ok(())
}

#[test]
fn test_extract_without_files() -> Result<()> {
    let test = CliTest::new()?;

    let result = run(&mut test.extract_command())?;
    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "\u{2713} Extracted 0 keys from 0 files\n");
    Ok(())
}
