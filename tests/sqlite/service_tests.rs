//! Task service behaviour over a real `SQLite` store.

use super::helpers::{TempStore, TestRepository, store};
use crate::test_helpers::ctx;
use diesel::connection::SimpleConnection;
use rstest::rstest;
use std::sync::Arc;
use taskforge::task::domain::{TaskDomainError, TaskId};
use taskforge::task::services::{TaskErrorKind, TaskService, TaskServiceError};

fn service(store: &TempStore) -> TaskService<TestRepository> {
    TaskService::new(Arc::new(store.repository()))
}

#[rstest]
#[tokio::test]
async fn created_task_reads_back_identically(store: TempStore) {
    let service = service(&store);

    let created = service
        .create_task(&ctx(), "Buy milk", Some("2%".to_owned()))
        .await
        .expect("create");
    let fetched = service.get_task(&ctx(), created.id()).await.expect("get");

    assert_eq!(fetched, created);
}

#[rstest]
#[tokio::test]
async fn empty_title_leaves_store_untouched(store: TempStore) {
    let service = service(&store);

    let result = service.create_task(&ctx(), "", None).await;
    let tasks = service.list_tasks(&ctx(), "").await.expect("list");

    assert!(matches!(
        result,
        Err(TaskServiceError::InvalidData(TaskDomainError::EmptyTitle))
    ));
    assert!(tasks.is_empty());
}

#[rstest]
#[tokio::test]
async fn deleted_task_is_gone_for_every_operation(store: TempStore) {
    let service = service(&store);
    let task = service
        .create_task(&ctx(), "Temporary", None)
        .await
        .expect("create");

    service.delete_task(&ctx(), task.id()).await.expect("delete");

    let get = service.get_task(&ctx(), task.id()).await;
    let update = service.update_task(&ctx(), &task).await;
    let delete = service.delete_task(&ctx(), task.id()).await;
    for result in [get.map(|_| ()), update.map(|_| ()), delete] {
        let err = result.expect_err("operation on deleted task should fail");
        assert_eq!(err.kind(), TaskErrorKind::NotFound);
    }
}

#[rstest]
#[tokio::test]
async fn get_unknown_task_is_not_found(store: TempStore) {
    let result = service(&store).get_task(&ctx(), TaskId::new(123)).await;

    assert!(matches!(result, Err(TaskServiceError::NotFound(id)) if id == TaskId::new(123)));
}

#[rstest]
#[tokio::test]
async fn broken_store_is_reported_opaquely(store: TempStore) {
    let service = service(&store);
    {
        let mut connection = store.pool.get().expect("checkout");
        connection
            .batch_execute("DROP TABLE task")
            .expect("drop table");
    }

    let err = service
        .create_task(&ctx(), "Buy milk", None)
        .await
        .expect_err("create against missing table should fail");

    assert_eq!(err.kind(), TaskErrorKind::Persistence);
    assert_eq!(err.to_string(), "internal persistence failure");
    assert!(std::error::Error::source(&err).is_some());
}
