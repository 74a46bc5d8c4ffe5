use std::path::Path;
use std::process::{Command, Output};

use neutron_test_support::ProjectFixture;
use serde_json::json;

fn swagger_merger(fixture: &ProjectFixture, args: &[&str]) -> anyhow::Result<Output> {
    swagger_merger_in(fixture.root(), args)
}

fn swagger_merger_in(cwd: &Path, args: &[&str]) -> anyhow::Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_swagger-merger"))
        .current_dir(cwd)
        .env_remove("NEUTRON_PROJECT_ROOT")
        .env_remove("NEUTRON_SWAGGER_MANIFEST")
        .env_remove("NEUTRON_SWAGGER_INPUT")
        .env_remove("NEUTRON_SWAGGER_OUTPUT")
        .env("RUST_LOG", "warn")
        .args(args)
        .output()?)
}

#[test]
fn runs_without_arguments_from_project_root() -> anyhow::Result<()> {
    let fixture = ProjectFixture::with_module("github.com/neutron-org/neutron/v9")?;
    fixture.write_fragment(
        "neutron.cron.json",
        &json!({"paths": {"/neutron/cron/params": {"get": {}}}}),
    )?;

    let output = swagger_merger(&fixture, &[])?;
    assert_eq!(output.status.code(), Some(0));

    let merged = fixture.read_output()?;
    assert_eq!(merged["info"]["version"], json!("v9"));
    assert_eq!(
        merged["paths"]["/neutron/cron/params"],
        json!({"get": {}})
    );
    Ok(())
}

#[test]
fn missing_version_exits_with_code_one() -> anyhow::Result<()> {
    let fixture = ProjectFixture::new()?;
    fixture.write_manifest("go 1.22\n")?;

    let output = swagger_merger(&fixture, &[])?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not find version"), "stderr: {stderr}");
    assert!(!fixture.output_path().exists());
    Ok(())
}

#[test]
fn malformed_fragment_exits_non_zero_without_output() -> anyhow::Result<()> {
    let fixture = ProjectFixture::with_module("github.com/neutron-org/neutron")?;
    fixture.write_raw_fragment("broken.json", "{")?;

    let output = swagger_merger(&fixture, &[])?;
    assert_eq!(output.status.code(), Some(3));
    assert!(!fixture.output_path().exists());
    Ok(())
}

#[test]
fn project_root_flag_overrides_working_directory() -> anyhow::Result<()> {
    let fixture = ProjectFixture::with_module("github.com/neutron-org/neutron")?;
    let elsewhere = tempfile::tempdir()?;
    let root = fixture.root().to_string_lossy().into_owned();

    let output = swagger_merger_in(
        elsewhere.path(),
        &["--project-root", root.as_str(), "--log-format", "json"],
    )?;
    assert_eq!(output.status.code(), Some(0));
    assert!(fixture.output_path().exists());
    Ok(())
}
