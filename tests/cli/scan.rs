use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, SERVICE_PACKAGE_SOURCE, VPC_SOURCE, WIDGET_SOURCE, stderr, stdout};

fn ec2_provider() -> Result<CliTest> {
    let test = CliTest::with_file("internal/service/ec2/vpc.go", VPC_SOURCE)?;
    test.write_file("internal/service/ec2/widget.go", WIDGET_SOURCE)?;
    test.write_file(
        "internal/service/ec2/service_package_gen.go",
        SERVICE_PACKAGE_SOURCE,
    )?;
    Ok(test)
}

const BUCKET_SOURCE: &str = r#"package s3

// @SDKResource("aws_s3_bucket", name="Bucket")
func resourceBucket() *schema.Resource {
	return &schema.Resource{}
}
"#;

#[test]
fn test_scan_writes_index() -> Result<()> {
    let test = ec2_provider()?;

    assert_cmd_snapshot!(test.scan_command());

    let index = test.read_json(".provscan/index.json")?;
    assert_eq!(index["generator"], "provscan");
    assert_eq!(index["packages"]["ec2"]["sdk_resources"], 1);
    assert_eq!(index["packages"]["ec2"]["framework_resources"], 1);
    assert_eq!(index["totals"]["sdk_data_sources"], 0);

    let sdk = test.read_json(".provscan/packages/ec2/sdk_resources.json")?;
    assert_eq!(sdk["aws_vpc"]["factory_function"], "resourceVPC");
    assert_eq!(sdk["aws_vpc"]["display_name"], "VPC");

    let framework = test.read_json(".provscan/packages/ec2/framework_resources.json")?;
    assert_eq!(framework["aws_ec2_widget"]["struct_type"], "widgetResource");

    let lookup = test.read_json(".provscan/packages/ec2/lookup.json")?;
    assert_eq!(
        lookup["crud_methods"]["aws_vpc"]["create"],
        "resourceVPCCreate"
    );
    assert_eq!(
        lookup["struct_identifiers"]["widgetResource"],
        "aws_ec2_widget"
    );

    Ok(())
}

#[test]
fn test_scan_is_deterministic() -> Result<()> {
    let test = ec2_provider()?;

    test.scan_command().output()?;
    let first = test.read_file(".provscan/packages/ec2/sdk_resources.json")?;
    test.scan_command().output()?;
    let second = test.read_file(".provscan/packages/ec2/sdk_resources.json")?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_scan_dry_run() -> Result<()> {
    let test = ec2_provider()?;

    assert_cmd_snapshot!(test.scan_command().arg("--dry-run"));
    assert!(!test.root().join(".provscan").exists());

    Ok(())
}

#[test]
fn test_scan_package_filter_keeps_other_packages() -> Result<()> {
    let test = ec2_provider()?;
    test.write_file("internal/service/s3/bucket.go", BUCKET_SOURCE)?;

    assert!(test.scan_command().output()?.status.success());
    assert!(
        test.scan_command()
            .args(["--package", "s3"])
            .output()?
            .status
            .success()
    );

    let index = test.read_json(".provscan/index.json")?;
    assert_eq!(index["packages"]["s3"]["sdk_resources"], 1);
    assert_eq!(index["packages"]["ec2"]["sdk_resources"], 1);
    assert_eq!(index["totals"]["sdk_resources"], 2);

    let output = test.lookup_command("aws_vpc").output()?;
    assert!(output.status.success(), "stdout: {}", stdout(&output));

    Ok(())
}

#[test]
fn test_scan_package_filter_on_fresh_checkout() -> Result<()> {
    let test = ec2_provider()?;
    test.write_file("internal/service/s3/bucket.go", BUCKET_SOURCE)?;

    let output = test.scan_command().args(["--package", "s3"]).output()?;
    assert!(output.status.success());

    let index = test.read_json(".provscan/index.json")?;
    let packages = index["packages"].as_object().map(|p| p.len());
    assert_eq!(packages, Some(1));
    assert_eq!(index["packages"]["s3"]["sdk_resources"], 1);

    Ok(())
}

#[test]
fn test_scan_parse_error_exits_with_failure() -> Result<()> {
    let test = ec2_provider()?;
    test.write_file("internal/service/ec2/broken.go", "package ec2\n\nfunc {\n")?;

    let output = test.scan_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("Syntax error"));
    assert!(out.contains("--> internal/service/ec2/broken.go"));
    assert!(stderr(&output).contains("1 file(s) could not be parsed"));

    // The rest of the package is still indexed.
    let index = test.read_json(".provscan/index.json")?;
    assert_eq!(index["packages"]["ec2"]["sdk_resources"], 1);

    Ok(())
}

#[test]
fn test_scan_skips_test_files() -> Result<()> {
    let test = CliTest::with_file("internal/service/ec2/vpc_test.go", VPC_SOURCE)?;
    test.write_file("internal/service/ec2/doc.go", "package ec2\n")?;

    let output = test.scan_command().output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Scanned 1 file in 1 package - 0 registrations found"));

    Ok(())
}

#[test]
fn test_scan_missing_service_root() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.scan_command());

    Ok(())
}

#[test]
fn test_scan_service_root_override() -> Result<()> {
    let test = CliTest::with_file("provider/services/ec2/vpc.go", VPC_SOURCE)?;

    let output = test
        .scan_command()
        .args(["--service-root", "provider/services", "--output-dir", "out"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let sdk = test.read_json("out/packages/ec2/sdk_resources.json")?;
    assert_eq!(
        sdk["aws_vpc"]["file_path"],
        "provider/services/ec2/vpc.go"
    );

    Ok(())
}
