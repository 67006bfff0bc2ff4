use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, Run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .tolgeerc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".tolgeerc.json").exists());

    let content = test.read_file(".tolgeerc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert!(parsed["patterns"].is_array());
    assert_eq!(parsed["strictNamespace"], true);
    assert_eq!(parsed["extractTimeoutMs"], 10_000);
    assert!(content.contains("  "), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".tolgeerc.json", "{}")?;

    let output = Run::from(test.command().arg("init").output()?);
    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains(".tolgeerc.json already exists"));
    assert_eq!(test.read_file(".tolgeerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file(
        "src/App.tsx",
        "const app = <T keyName=\"hello\" />;\n",
    )?;

    let output = Run::from(test.command().arg("extract").output()?);
    assert_eq!(
        output.code,
        Some(0),
        "Extract should work with initialized config. stderr: {}",
        output.stderr
    );
    assert!(output.stdout.contains("1 hello"));

    Ok(())
}
