use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_extract_plain_color() -> Result<()> {
    let test = CliTest::with_file("styles/main.css", ".button {\n  color: #ff0000;\n}\n")?;

    let mut cmd = test.extract_command();
    cmd.args(["styles", "--properties", "color", "--prefix", "theme"]);
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Extracted 1 value from 1 file into variables.css"), "{}", stdout);
    assert_eq!(
        test.read_file("styles/main.css")?,
        ".button {\n  color: var(--theme-button-ff0000-color);\n}\n"
    );
    assert_eq!(
        test.read_file("styles/variables.css")?,
        ":root {\n  --theme-button-ff0000-color: #ff0000;\n}\n"
    );
    Ok(())
}

#[test]
fn test_extract_gradient() -> Result<()> {
    let test = CliTest::with_file(
        "hero.css",
        ".hero { background: linear-gradient(to right, #ff0000, rgba(0,255,0,0.5)); }\n",
    )?;

    let mut cmd = test.extract_command();
    cmd.args(["-p", "background", "--prefix", "theme"]);
    let (code, _, _) = run(cmd)?;

    assert_eq!(code, 0);
    let source = test.read_file("hero.css")?;
    assert_eq!(
        source,
        ".hero { background: var(--theme-hero-linearff0000rgba0255005-bg); }\n"
    );
    assert!(
        test.read_file("variables.css")?.contains(
            "--theme-hero-linearff0000rgba0255005-bg: linear-gradient(to right, #ff0000, rgba(0,255,0,0.5));"
        )
    );
    Ok(())
}

#[test]
fn test_extract_existing_output_is_kept() -> Result<()> {
    let test = CliTest::with_file("a.css", "a { color: red; }")?;
    test.write_file("variables.css", ":root { --keep: 1; }")?;

    let mut cmd = test.extract_command();
    cmd.args(["-p", "color"]);
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert!(stdout.contains("into variables-1.css"), "{}", stdout);
    assert!(stdout.contains("variables.css already exists, wrote variables-1.css instead"));
    assert_eq!(test.read_file("variables.css")?, ":root { --keep: 1; }");
    assert!(test.read_file("variables-1.css")?.contains("--var-red-color: red;"));
    Ok(())
}

#[test]
fn test_extract_transparent_untouched() -> Result<()> {
    let test = CliTest::with_file("a.css", "a { color: transparent; }")?;

    let mut cmd = test.extract_command();
    cmd.args(["-p", "color"]);
    let (code, stdout, stderr) = run(cmd)?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Scanned 1 file - nothing to extract"));
    assert!(stderr.contains("warning: no variables were extracted"));
    assert_eq!(test.read_file("a.css")?, "a { color: transparent; }");
    assert!(!test.exists("variables.css"));
    Ok(())
}

#[test]
fn test_extract_strict_fails_on_warnings() -> Result<()> {
    let test = CliTest::with_file("a.css", "a { color: transparent; }")?;

    let mut cmd = test.extract_command();
    cmd.args(["-p", "color", "--strict"]);
    let (code, _, _) = run(cmd)?;

    assert_eq!(code, 1);
    Ok(())
}

#[test]
fn test_extract_missing_directory() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.extract_command();
    cmd.args(["nope", "-p", "color"]);
    let (code, _, stderr) = run(cmd)?;

    assert_eq!(code, 2);
    assert!(stderr.contains("Error: Target directory does not exist: nope"), "{}", stderr);
    Ok(())
}

#[test]
fn test_extract_parse_error_aborts() -> Result<()> {
    let test = CliTest::with_file("a.css", "a { color: red; }")?;
    test.write_file("b.css", "b { color: blue;")?;

    let mut cmd = test.extract_command();
    cmd.args(["-p", "color"]);
    let (code, _, stderr) = run(cmd)?;

    assert_eq!(code, 2);
    assert!(stderr.contains("Failed to parse file"), "{}", stderr);
    assert!(stderr.contains("b.css"));
    assert!(!test.exists("variables.css"));
    Ok(())
}

#[test]
fn test_extract_assets_and_map() -> Result<()> {
    let test = CliTest::with_file(
        "components/button.css",
        ".btn {\n  color: #333;\n  background-image: url(./icon.png);\n}\n",
    )?;
    test.write_file("components/icon.png", "PNG")?;

    let mut cmd = test.extract_command();
    cmd.args([
        "-p",
        "color,background-image",
        "--prefix",
        "ui",
        "--assets",
        "--map",
    ]);
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0, "{}", stdout);
    assert_eq!(
        test.read_file("components/button.css")?,
        ".btn {\n  color: var(--ui-components-btn-333-color);\n  background-image: var(--ui-components-btn-icon-bg-image);\n}\n"
    );
    assert_eq!(
        test.read_file("assets.css")?,
        ":root {\n  /* 资源变量 */\n  --ui-components-btn-icon-bg-image: url(data:image/png;base64,UE5H);\n}\n"
    );
    assert!(!test.read_file("variables.css")?.contains("base64"));

    let map: serde_json::Value = serde_json::from_str(&test.read_file("variables.map.json")?)?;
    assert_eq!(map["color:#333"]["usageCount"], 1);
    assert_eq!(
        map["color:#333"]["usages"][0]["sourcePath"],
        "components/button.css"
    );
    assert_eq!(map["color:#333"]["usages"][0]["sourceLine"], 2);
    assert!(map.get("background-image:url(./icon.png)").is_some());
    Ok(())
}

#[test]
fn test_extract_missing_asset_warns() -> Result<()> {
    let test = CliTest::with_file("a.css", ".a { background-image: url(gone.png); color: red; }")?;

    let mut cmd = test.extract_command();
    cmd.args(["-p", "color,background-image", "--assets"]);
    let (code, _, stderr) = run(cmd)?;

    assert_eq!(code, 0);
    assert!(stderr.contains("image not found"), "{}", stderr);
    assert_eq!(
        test.read_file("a.css")?,
        ".a { background-image: url(gone.png); color: var(--var-a-red-color); }"
    );
    assert!(!test.exists("assets.css"));
    Ok(())
}

#[test]
fn test_extract_group_by_folder() -> Result<()> {
    let test = CliTest::with_file("base.css", "body { color: #111; }")?;
    test.write_file("layout/header.css", ".header { color: #222; }")?;

    let mut cmd = test.extract_command();
    cmd.args(["-p", "color", "--group-by-folder"]);
    let (code, _, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert_eq!(
        test.read_file("variables.css")?,
        ":root {\n  /* root */\n  --var-111-color: #111;\n\n  /* layout */\n  --var-layout-header-222-color: #222;\n}\n"
    );
    Ok(())
}

#[test]
fn test_extract_uses_config_file() -> Result<()> {
    let test = CliTest::with_file("a.scss", "$brand: #0af;\n.a { border-color: #ccc; color: $brand; }\n")?;
    test.write_file(
        ".cssvarrc.json",
        r#"{ "properties": ["border-color", "color"], "prefix": "ds", "output": "tokens.css" }"#,
    )?;

    let (code, stdout, _) = run(test.extract_command())?;

    assert_eq!(code, 0, "{}", stdout);
    assert_eq!(
        test.read_file("a.scss")?,
        "$brand: #0af;\n.a { border-color: var(--ds-a-ccc-border-color); color: $brand; }\n"
    );
    assert_eq!(
        test.read_file("tokens.css")?,
        ":root {\n  --ds-a-ccc-border-color: #ccc;\n}\n"
    );
    Ok(())
}

#[test]
fn test_extract_is_stable_across_runs() -> Result<()> {
    let content = ".a { color: red; }\n.b { color: red; }\n";
    let first = CliTest::with_file("x/a.css", content)?;
    let second = CliTest::with_file("x/a.css", content)?;

    for test in [&first, &second] {
        let mut cmd = test.extract_command();
        cmd.args(["-p", "color"]);
        run(cmd)?;
    }

    assert_eq!(first.read_file("x/a.css")?, second.read_file("x/a.css")?);
    assert_eq!(
        first.read_file("variables.css")?,
        second.read_file("variables.css")?
    );
    Ok(())
}
