use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Created .cssvarrc.json"));
    let config: serde_json::Value = serde_json::from_str(&test.read_file(".cssvarrc.json")?)?;
    assert_eq!(config["prefix"], "var");
    assert_eq!(config["output"], "variables.css");
    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::with_file(".cssvarrc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let (code, _, stderr) = run(cmd)?;

    assert_eq!(code, 2);
    assert!(stderr.contains(".cssvarrc.json already exists"));
    assert_eq!(test.read_file(".cssvarrc.json")?, "{}");
    Ok(())
}
