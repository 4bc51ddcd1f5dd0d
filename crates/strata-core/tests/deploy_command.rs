mod support;

use std::sync::Arc;

use strata_core::StrataError;
use strata_core::commands::{DeployCommand, DeployOptions};
use strata_core::config::LocalRcStore;
use strata_core::context::AppContext;
use strata_core::deploy::DeployOutcome;
use strata_core::project_file;
use strata_core::remote::MigrationResult;
use strata_core::types::Target;
use tempfile::TempDir;

use support::{MockRemote, RecordingReporter};

fn context(temp: &TempDir) -> AppContext {
    AppContext::new(temp.path().to_path_buf(), temp.path().join("config.json"))
        .with_token("test-token")
}

fn command(ctx: AppContext, remote: &Arc<MockRemote>) -> DeployCommand {
    DeployCommand::new(ctx, Arc::new(RecordingReporter::new())).with_remote(remote.clone())
}

#[tokio::test]
async fn fresh_service_is_created_and_deployed() {
    let temp = TempDir::new().unwrap();
    support::write_service(temp.path(), None);
    let remote = Arc::new(
        MockRemote::new()
            .with_project_id("cjfresh")
            .then_push(MigrationResult {
                migration_messages: vec![support::message("A new type `User` is created.")],
                errors: Vec::new(),
                project_definition: Some(support::confirmed_definition("type User")),
            }),
    );

    let report = command(context(&temp), &remote)
        .execute(&DeployOptions::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, DeployOutcome::Created);
    assert_eq!(report.target_name, "dev");
    assert_eq!(report.project_id, "cjfresh");
    assert_eq!(report.endpoint, "https://api.strata.cloud/simple/v1/cjfresh");
    assert_eq!(remote.create_count(), 1);

    let rc = LocalRcStore::for_service_dir(temp.path()).load().unwrap();
    assert_eq!(rc.default.as_deref(), Some("dev"));

    let project_file = temp.path().join("project.strata");
    assert_eq!(
        project_file::read_project_id_from_file(&project_file).unwrap(),
        Some("cjfresh".to_string())
    );
    // The pushed definition already carries the new id.
    assert!(
        remote.pushed()[0]
            .root()
            .unwrap()
            .content
            .contains("# project: cjfresh")
    );
}

#[tokio::test]
async fn existing_target_is_not_recreated() {
    let temp = TempDir::new().unwrap();
    support::write_service(temp.path(), Some("cjprod"));
    std::fs::write(
        temp.path().join(".stratarc"),
        "default = \"prod\"\n\n[targets]\nprod = \"shared-us-west-2/cjprod\"\n",
    )
    .unwrap();
    let remote = Arc::new(MockRemote::new());

    let report = command(context(&temp), &remote)
        .execute(&DeployOptions::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, DeployOutcome::UpToDate);
    assert_eq!(report.target_name, "prod");
    assert_eq!(report.cluster, "shared-us-west-2");
    assert_eq!(remote.create_count(), 0);
    assert_eq!(remote.push_count(), 1);
}

#[tokio::test]
async fn new_service_in_local_cluster() {
    let temp = TempDir::new().unwrap();
    support::write_service(temp.path(), None);
    let remote = Arc::new(MockRemote::new().with_project_id("cjlocal"));

    let options = DeployOptions::new()
        .with_new_service("blog")
        .with_new_service_cluster("local");
    let report = command(context(&temp), &remote)
        .execute(&options)
        .await
        .unwrap();

    assert_eq!(report.target_name, "local");
    assert_eq!(report.endpoint, "http://localhost:60000/simple/v1/cjlocal");

    let rc = LocalRcStore::for_service_dir(temp.path()).load().unwrap();
    assert_eq!(rc.targets.get("local"), Some(&Target::new("local", "cjlocal")));
}

#[tokio::test]
async fn missing_token_fails_before_any_remote_call() {
    let temp = TempDir::new().unwrap();
    support::write_service(temp.path(), None);
    let remote = Arc::new(MockRemote::new());
    let ctx = AppContext::new(temp.path().to_path_buf(), temp.path().join("config.json"));

    let err = command(ctx, &remote)
        .execute(&DeployOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StrataError>(),
        Some(StrataError::Auth(_))
    ));
    assert_eq!(remote.create_count(), 0);
    assert_eq!(remote.push_count(), 0);
}

#[tokio::test]
async fn push_failure_propagates() {
    let temp = TempDir::new().unwrap();
    support::write_service(temp.path(), Some("cjprod"));
    std::fs::write(
        temp.path().join(".stratarc"),
        "default = \"prod\"\n\n[targets]\nprod = \"shared-us-west-2/cjprod\"\n",
    )
    .unwrap();
    let remote = Arc::new(MockRemote::new().then_push_failure());

    let err = command(context(&temp), &remote)
        .execute(&DeployOptions::new())
        .await
        .unwrap_err();

    assert!(
        err.downcast_ref::<StrataError>()
            .is_some_and(StrataError::is_remote)
    );
}
