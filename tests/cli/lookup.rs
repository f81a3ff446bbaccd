use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, SERVICE_PACKAGE_SOURCE, VPC_SOURCE, WIDGET_SOURCE, stderr};

fn indexed_provider() -> Result<CliTest> {
    let test = CliTest::with_file("internal/service/ec2/vpc.go", VPC_SOURCE)?;
    test.write_file(
        "internal/service/ec2/service_package_gen.go",
        SERVICE_PACKAGE_SOURCE,
    )?;
    let output = test.scan_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    Ok(test)
}

#[test]
fn test_lookup_found() -> Result<()> {
    let test = indexed_provider()?;

    assert_cmd_snapshot!(test.lookup_command("aws_vpc"));

    Ok(())
}

#[test]
fn test_lookup_not_found() -> Result<()> {
    let test = indexed_provider()?;

    assert_cmd_snapshot!(test.lookup_command("aws_nothing"));

    Ok(())
}

#[test]
fn test_lookup_json() -> Result<()> {
    let test = indexed_provider()?;

    let output = test.lookup_command("aws_vpc").arg("--json").output()?;
    assert!(output.status.success());

    let parsed: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed[0]["identifier"], "aws_vpc");
    assert_eq!(parsed[0]["category"], "sdk-resource");
    assert_eq!(parsed[0]["callback_methods"]["delete"], "resourceVPCDelete");

    Ok(())
}

#[test]
fn test_lookup_struct_survives_registration_list() -> Result<()> {
    // The annotated file sorts before the generated list, whose entry wins.
    let test = CliTest::with_file(
        "internal/service/ec2/instance_widget.go",
        WIDGET_SOURCE,
    )?;
    test.write_file(
        "internal/service/ec2/service_package_gen.go",
        r#"package ec2

func (p *servicePackage) FrameworkResources(ctx context.Context) []*inttypes.ServicePackageFrameworkResource {
	return []*inttypes.ServicePackageFrameworkResource{
		{Factory: newWidgetResource, TypeName: "aws_ec2_widget", Name: "Widget"},
	}
}
"#,
    )?;
    assert!(test.scan_command().output()?.status.success());

    let output = test
        .lookup_command("aws_ec2_widget")
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let parsed: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        parsed[0]["file_path"],
        "internal/service/ec2/service_package_gen.go"
    );
    assert_eq!(parsed[0]["struct_type"], "widgetResource");
    assert_eq!(parsed[0]["callback_methods"]["create"], "Create");

    Ok(())
}

#[test]
fn test_lookup_without_index_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.lookup_command("aws_vpc").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read index"));

    Ok(())
}
