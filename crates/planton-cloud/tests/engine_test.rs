#![cfg(unix)]

use planton_cloud::{CloudError, IacEngine, Operation, Program, PulumiEngine, Resource, StackRun};
use planton_core::PulumiBackendConfig;
use serial_test::serial;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable stand-in for the pulumi CLI
fn fake_pulumi(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("pulumi");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

const RECORDING: &str = r#"
if [ "$1" = "stack" ] && [ "$2" = "select" ]; then exit 0; fi
if [ "$1" = "stack" ] && [ "$2" = "output" ]; then
  echo '{"TableArn":"arn:aws:dynamodb:us-east-1:1:table/orders","TableName":"orders"}'
  exit 0
fi
echo "args: $*"
echo "input: $STACK_INPUT_YAML"
grep '^name:' Pulumi.yaml
"#;

fn program() -> Program {
    let mut program = Program::new("orders");
    program
        .register("table", Resource::new("aws:dynamodb:Table").property("name", "orders"))
        .unwrap();
    program
}

#[tokio::test]
#[serial]
async fn test_run_passes_stack_input_and_project() {
    let dir = tempfile::tempdir().unwrap();
    let engine = PulumiEngine::new().with_binary(fake_pulumi(dir.path(), RECORDING));
    let backend = PulumiBackendConfig::new("acme", "tables", "dev");
    let program = program();

    let output = engine
        .run(
            Operation::Up,
            StackRun {
                program: &program,
                stack_input_yaml: "target: {}",
                backend: &backend,
            },
            true,
        )
        .await
        .unwrap();

    assert_eq!(output.stack, "acme/tables/dev");
    assert!(output.stdout.contains(
        "args: up --stack acme/tables/dev --non-interactive --yes --skip-preview"
    ));
    assert!(output.stdout.contains("input: target: {}"));
    assert!(output.stdout.contains("name: tables"));
}

#[tokio::test]
#[serial]
async fn test_non_zero_exit_without_error_is_success() {
    let dir = tempfile::tempdir().unwrap();
    let engine = PulumiEngine::new().with_binary(fake_pulumi(
        dir.path(),
        "if [ \"$1\" = \"stack\" ]; then exit 0; fi\necho 'Resources: 1 unchanged'\nexit 255",
    ));
    let backend = PulumiBackendConfig::new("acme", "tables", "dev");
    let program = program();
    let run = StackRun {
        program: &program,
        stack_input_yaml: "",
        backend: &backend,
    };

    let output = engine.run(Operation::Refresh, run, true).await.unwrap();
    assert_eq!(output.exit_code, Some(255));
}

#[tokio::test]
#[serial]
async fn test_error_diagnostics_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let engine = PulumiEngine::new().with_binary(fake_pulumi(
        dir.path(),
        "if [ \"$1\" = \"stack\" ]; then exit 0; fi\necho 'error: access denied' >&2\nexit 1",
    ));
    let backend = PulumiBackendConfig::new("acme", "tables", "dev");
    let program = program();
    let run = StackRun {
        program: &program,
        stack_input_yaml: "",
        backend: &backend,
    };

    let err = engine.run(Operation::Destroy, run, true).await.unwrap_err();
    match err {
        CloudError::Engine { operation, message } => {
            assert_eq!(operation, "destroy");
            assert_eq!(message, "error: access denied");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
#[serial]
async fn test_stack_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let engine = PulumiEngine::new().with_binary(fake_pulumi(dir.path(), RECORDING));
    let backend = PulumiBackendConfig::new("acme", "tables", "dev");
    let program = program();
    let run = StackRun {
        program: &program,
        stack_input_yaml: "",
        backend: &backend,
    };

    let outputs = engine.stack_outputs(run).await.unwrap();
    assert_eq!(outputs["TableName"], "orders");
    assert_eq!(outputs.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_missing_binary() {
    let engine = PulumiEngine::new().with_binary("/nonexistent/pulumi");
    assert!(matches!(
        engine.version().await,
        Err(CloudError::PulumiNotFound)
    ));
}
