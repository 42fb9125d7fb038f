use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_preset_uses_theme_prefix() -> Result<()> {
    let test = CliTest::with_file(
        "card.css",
        ".card { background-color: #fff; font-size: 14px; margin: 4px; }\n",
    )?;

    let (code, stdout, _) = run(test.preset_command())?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Extracted (preset) 2 values"), "{}", stdout);
    assert_eq!(
        test.read_file("card.css")?,
        ".card { background-color: var(--theme-card-fff-bg-color); font-size: var(--theme-card-14px-fs); margin: 4px; }\n"
    );
    Ok(())
}

#[test]
fn test_preset_ignores_config_properties() -> Result<()> {
    let test = CliTest::with_file("a.css", ".card { color: red; }")?;
    test.write_file(".cssvarrc.json", r#"{ "properties": ["margin"], "prefix": "x" }"#)?;

    let (code, _, _) = run(test.preset_command())?;

    assert_eq!(code, 0);
    assert_eq!(test.read_file("a.css")?, ".card { color: var(--theme-card-red-color); }");
    Ok(())
}
