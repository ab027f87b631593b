#![allow(deprecated)] // TODO: move to cargo_bin_cmd! once assert_cmd drops cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DYNAMODB_MANIFEST: &str = r#"apiVersion: aws.project-planton.org/v1
kind: AwsDynamodb
metadata:
  name: orders
  id: ddb-orders
  org: acme
  env: prod
spec:
  tableName: orders
  billingMode: PROVISIONED
  provisionedThroughput:
    readCapacityUnits: 10
    writeCapacityUnits: 5
  attributeDefinitions:
    - attributeName: pk
      attributeType: STRING
    - attributeName: sk
      attributeType: STRING
  keySchema:
    - attributeName: pk
      keyType: HASH
    - attributeName: sk
      keyType: RANGE
  streamSpecification:
    streamEnabled: true
    streamViewType: NEW_AND_OLD_IMAGES
  autoScale:
    isEnabled: true
"#;

const AWS_PROVIDER_CONFIG: &str = r#"accountId: "123456789012"
accessKeyId: AKIAEXAMPLE
secretAccessKey: secret
region: eu-west-1
"#;

fn planton(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("planton").unwrap();
    cmd.env("PLANTON_CONFIG_DIR", config_dir)
        .env_remove("PLANTON_MANIFEST")
        .env_remove("PLANTON_STACK")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("stack-input"))
        .stdout(predicate::str::contains("destroy"));
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("planton "));
}

#[test]
fn test_invalid_command() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path()).arg("invalid-command").assert().failure();
}

#[test]
fn test_kind_get_accepts_loose_spelling() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .args(["kind", "get", "aws-dynamodb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AwsDynamodb"))
        .stdout(predicate::str::contains("ddb"))
        .stdout(predicate::str::contains("aws.project-planton.org/v1"));
}

#[test]
fn test_kind_get_unknown_suggests() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .args(["kind", "get", "AwsDynamodbb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did you mean"))
        .stderr(predicate::str::contains("AwsDynamodb"));
}

#[test]
fn test_kind_prefix_and_list() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .args(["kind", "prefix", "gdz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GcpDnsZone"));

    planton(tmp.path())
        .args(["kind", "list", "--provider", "gcp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GcpGkeCluster"))
        .stdout(predicate::str::contains("AwsDynamodb").not());
}

#[test]
fn test_init_prints_template() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .args(["init", "AwsSecurityGroup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: AwsSecurityGroup"))
        .stdout(predicate::str::contains("aws.project-planton.org/v1"));
}

#[test]
fn test_validate_valid_manifest() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);
    planton(tmp.path())
        .arg("validate")
        .arg("-f")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓"))
        .stdout(predicate::str::contains("1 manifests valid"));
}

#[test]
fn test_validate_reports_module_errors() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(
        tmp.path(),
        "ddb.yaml",
        &DYNAMODB_MANIFEST.replace("keyType: RANGE", "keyType: HASH"),
    );
    planton(tmp.path())
        .arg("validate")
        .arg("-f")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most one HASH key"));
}

#[test]
fn test_validate_set_override_reaches_spec() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);
    planton(tmp.path())
        .arg("validate")
        .arg("-f")
        .arg(&manifest)
        .args(["--set", "spec.keySchema.1.keyType=HASH"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most one HASH key"));
}

#[test]
fn test_validate_directory() {
    let tmp = TempDir::new().unwrap();
    let manifests = tmp.path().join("manifests");
    std::fs::create_dir(&manifests).unwrap();
    write(&manifests, "ddb.yaml", DYNAMODB_MANIFEST);
    write(
        &manifests,
        "typo.yml",
        "apiVersion: aws.project-planton.org/v1\nkind: AwsDynamoDbTable\nmetadata:\n  name: x\n",
    );

    planton(tmp.path())
        .arg("validate")
        .arg("-f")
        .arg(&manifests)
        .assert()
        .failure()
        .stdout(predicate::str::contains("ddb.yaml"))
        .stderr(predicate::str::contains("unsupported cloud resource kind"))
        .stderr(predicate::str::contains("1 of 2 manifests failed validation"));
}

#[test]
fn test_validate_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest file not found"));
}

#[test]
fn test_stack_input_merges_provider_config() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);
    let aws = write(tmp.path(), "aws.yaml", AWS_PROVIDER_CONFIG);

    planton(tmp.path())
        .arg("stack-input")
        .arg("-f")
        .arg(&manifest)
        .arg("--aws-provider-config")
        .arg(&aws)
        .assert()
        .success()
        .stdout(predicate::str::contains("target:"))
        .stdout(predicate::str::contains("awsProviderConfig:"))
        .stdout(predicate::str::contains("AKIAEXAMPLE"));
}

#[test]
fn test_stack_input_reads_input_dir() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);
    write(tmp.path(), "aws-provider-config.yaml", AWS_PROVIDER_CONFIG);

    planton(tmp.path())
        .arg("stack-input")
        .arg("-f")
        .arg(&manifest)
        .arg("--input-dir")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("awsProviderConfig:"));
}

#[test]
fn test_render_prints_program() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);

    planton(tmp.path())
        .arg("render")
        .arg("-f")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("runtime: yaml"))
        .stdout(predicate::str::contains("aws:dynamodb:Table"))
        .stdout(predicate::str::contains("aws-provider").not());
}

#[test]
fn test_render_uses_default_manifest() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "manifest.yaml", DYNAMODB_MANIFEST);

    planton(tmp.path())
        .current_dir(tmp.path())
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("aws:dynamodb:Table"));
}

#[test]
fn test_render_reads_manifest_from_env() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);

    planton(tmp.path())
        .current_dir(tmp.path())
        .env("PLANTON_MANIFEST", &manifest)
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("aws:dynamodb:Table"));
}

#[test]
fn test_validate_reads_manifest_from_env() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(
        tmp.path(),
        "ddb.yaml",
        &DYNAMODB_MANIFEST.replace("keyType: RANGE", "keyType: HASH"),
    );

    planton(tmp.path())
        .current_dir(tmp.path())
        .env("PLANTON_MANIFEST", &manifest)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most one HASH key"));
}

#[test]
fn test_plan_summary() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);

    planton(tmp.path())
        .arg("plan")
        .arg("-f")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("table"))
        .stdout(predicate::str::contains(
            "5 to create, 0 to update, 0 to delete, 0 unchanged",
        ));
}

#[test]
fn test_apply_requires_backend() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);

    planton(tmp.path())
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --stack"));
}

#[test]
fn test_apply_without_pulumi_on_path() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);

    planton(tmp.path())
        .env("PATH", "")
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .args(["--stack", "acme/orders/prod", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pulumi CLI not found"));
}

#[test]
fn test_apply_reads_stack_from_env() {
    let tmp = TempDir::new().unwrap();
    let manifest = write(tmp.path(), "ddb.yaml", DYNAMODB_MANIFEST);

    // With the stack from PLANTON_STACK the backend resolves and the run
    // gets as far as looking up the pulumi binary.
    planton(tmp.path())
        .env("PATH", "")
        .env("PLANTON_STACK", "acme/orders/prod")
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pulumi CLI not found"))
        .stderr(predicate::str::contains("pass --stack").not());
}

#[test]
fn test_config_set_get_list() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .args(["config", "set", "pulumi-backend-url", "file:///tmp/state"])
        .assert()
        .success();

    planton(tmp.path())
        .args(["config", "get", "pulumi-backend-url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file:///tmp/state"));

    planton(tmp.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pulumi-backend-url"));

    assert!(tmp.path().join("config.yaml").exists());
}

#[test]
fn test_config_unknown_key() {
    let tmp = TempDir::new().unwrap();
    planton(tmp.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key 'colour'"));
}
