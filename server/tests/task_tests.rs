mod common;

use serde_json::json;

use taskboard::coordinator::Rejection;
use taskboard::database::{Store, StoreError};

use common::*;

fn update_body(title: &str) -> Vec<u8> {
    body(&json!({ "title": title, "description": "", "subtasks": [] }))
}

// ── Create ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_task_appends_and_reissues() {
    let coord = coordinator().await;
    let (creds, board) = admin_with_board(&coord, "alice").await;
    let todo = board.columns[0].id.clone();

    let (creds, first) = create_task(&coord, &creds, &todo, "First", &[]).await;
    let (creds, second) = create_task(&coord, &creds, &todo, "Second", &["x", "y"]).await;

    let tasks = coord.store().retrieve_tasks_by_column(&todo).await.unwrap();
    let placed: Vec<(&str, i64)> = tasks.iter().map(|t| (t.id.as_str(), t.position)).collect();
    assert_eq!(placed, vec![(first.as_str(), 0), (second.as_str(), 1)]);

    let subtasks = coord.store().retrieve_subtasks_by_task(&second).await.unwrap();
    let titles: Vec<(&str, i64, bool)> = subtasks
        .iter()
        .map(|s| (s.title.as_str(), s.position, s.done))
        .collect();
    assert_eq!(titles, vec![("x", 0, false), ("y", 1, false)]);

    let state = decode_state(&coord, &creds);
    assert_eq!(state.task_count(), 2);
    let todo_view = &state.boards[0].columns[0];
    assert_eq!(todo_view.id, todo);
    let ids: Vec<&str> = todo_view.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[tokio::test]
async fn create_task_in_column_outside_snapshot() {
    let coord = coordinator().await;
    let (creds, _) = admin_with_board(&coord, "alice").await;
    let (_, other) = admin_with_board(&coord, "brenda").await;

    let err = coord
        .create_task(
            &creds,
            &body(&json!({
                "columnID": other.columns[0].id,
                "title": "Sneaky",
                "description": "",
                "subtasks": [],
            })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid column ID.");
}

#[tokio::test]
async fn create_task_requires_column_and_title() {
    let coord = coordinator().await;
    let (creds, board) = admin_with_board(&coord, "alice").await;

    let err = coord
        .create_task(&creds, &body(&json!({ "title": "No column" })))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Column ID cannot be empty.");

    let err = coord
        .create_task(
            &creds,
            &body(&json!({ "columnID": board.columns[0].id, "title": "" })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Rejection::BadRequest(_)));
}

// ── Update ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn member_cannot_edit_tasks() {
    let coord = coordinator().await;
    let (admin, board) = admin_with_board(&coord, "alice").await;
    let (_, task) = create_task(&coord, &admin, &board.columns[0].id, "Guarded", &[]).await;
    let member = invited_member(&coord, &admin, "bobby").await;

    let err = coord
        .update_task(&member, Some(task.as_str()), &update_body("Hijacked"))
        .await
        .unwrap_err();
    assert!(matches!(err, Rejection::Forbidden(_)));
    assert_eq!(err.to_string(), "Only team admins can edit tasks.");
    assert_eq!(coord.store().select_task(&task).await.unwrap().title, "Guarded");
}

#[tokio::test]
async fn update_of_task_missing_from_snapshot() {
    let coord = coordinator().await;
    let (creds, _) = admin_with_board(&coord, "alice").await;

    let err = coord
        .update_task(&creds, Some("not-in-state"), &update_body("Anything"))
        .await
        .unwrap_err();
    assert!(matches!(err, Rejection::BadRequest(_)));
    assert_eq!(err.to_string(), "Invalid task ID.");
}

#[tokio::test]
async fn update_task_replaces_subtasks_in_order() {
    let coord = coordinator().await;
    let (creds, board) = admin_with_board(&coord, "alice").await;
    let (creds, task) = create_task(&coord, &creds, &board.columns[0].id, "Draft", &["old"]).await;

    let outcome = coord
        .update_task(
            &creds,
            Some(task.as_str()),
            &body(&json!({
                "title": "Final",
                "description": "Ready to go",
                "subtasks": [
                    { "title": "second", "order": 5, "done": true },
                    { "title": "first", "order": 1, "done": false },
                ],
            })),
        )
        .await
        .unwrap();
    assert!(outcome.cookies.is_empty());

    let stored = coord.store().select_task(&task).await.unwrap();
    assert_eq!(stored.title, "Final");
    assert_eq!(stored.description, "Ready to go");
    assert_eq!(stored.position, 0);

    let subtasks = coord.store().retrieve_subtasks_by_task(&task).await.unwrap();
    let rows: Vec<(&str, i64, bool)> = subtasks
        .iter()
        .map(|s| (s.title.as_str(), s.position, s.done))
        .collect();
    assert_eq!(rows, vec![("first", 0, false), ("second", 1, true)]);
}

#[tokio::test]
async fn missing_parent_column_is_a_fault() {
    let coord = coordinator().await;
    let (creds, board) = admin_with_board(&coord, "alice").await;
    let column = board.columns[0].id.clone();
    let (creds, task) = create_task(&coord, &creds, &column, "Orphan", &[]).await;

    let pool = coord.store().pool();
    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM board_column WHERE id = ?")
        .bind(column.as_str())
        .execute(pool)
        .await
        .unwrap();

    let err = coord
        .update_task(&creds, Some(task.as_str()), &update_body("Still here?"))
        .await
        .unwrap_err();
    assert!(matches!(err, Rejection::StoreFault(StoreError::NotFound)));
    assert!(err.is_fault());
    assert_eq!(coord.store().select_task(&task).await.unwrap().title, "Orphan");
}

#[tokio::test]
async fn task_deleted_behind_a_stale_snapshot() {
    let coord = coordinator().await;
    let (creds, board) = admin_with_board(&coord, "alice").await;
    let (stale, task) = create_task(&coord, &creds, &board.columns[0].id, "Ephemeral", &[]).await;

    coord.delete_task(&stale, Some(task.as_str())).await.unwrap();

    // The old State still lists the task; the store no longer has it.
    let err = coord
        .update_task(&stale, Some(task.as_str()), &update_body("Too late"))
        .await
        .unwrap_err();
    assert!(matches!(err, Rejection::NotFound(_)));
    assert_eq!(err.to_string(), "Task not found.");
}

// ── Delete ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_task_closes_the_gap() {
    let coord = coordinator().await;
    let (creds, board) = admin_with_board(&coord, "alice").await;
    let todo = board.columns[0].id.clone();
    let (creds, t1) = create_task(&coord, &creds, &todo, "One", &["sub"]).await;
    let (creds, t2) = create_task(&coord, &creds, &todo, "Two", &[]).await;
    let (creds, t3) = create_task(&coord, &creds, &todo, "Three", &[]).await;

    let outcome = coord.delete_task(&creds, Some(t1.as_str())).await.unwrap();
    let creds = apply_cookies(&creds, &outcome);

    let remaining: Vec<(String, i64)> = coord
        .store()
        .retrieve_tasks_by_column(&todo)
        .await
        .unwrap()
        .into_iter()
        .map(|t| (t.id, t.position))
        .collect();
    assert_eq!(remaining, vec![(t2.clone(), 0), (t3.clone(), 1)]);
    assert!(coord.store().retrieve_subtasks_by_task(&t1).await.unwrap().is_empty());

    let state = decode_state(&coord, &creds);
    let ids: Vec<&str> = state.boards[0].columns[0]
        .tasks
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec![t2.as_str(), t3.as_str()]);
}

#[tokio::test]
async fn delete_task_without_id() {
    let coord = coordinator().await;
    let (creds, _) = admin_with_board(&coord, "alice").await;
    let err = coord.delete_task(&creds, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Task ID cannot be empty.");
}

// ── Subtasks ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_subtask_done() {
    let coord = coordinator().await;
    let (creds, board) = admin_with_board(&coord, "alice").await;
    let (creds, task) = create_task(&coord, &creds, &board.columns[0].id, "Checklist", &["a"]).await;
    let subtask = coord.store().retrieve_subtasks_by_task(&task).await.unwrap()[0]
        .id
        .clone();

    coord
        .update_subtask(&creds, Some(subtask.as_str()), &body(&json!({ "done": true })))
        .await
        .unwrap();
    assert!(coord.store().select_subtask(&subtask).await.unwrap().done);

    coord
        .update_subtask(&creds, Some(subtask.as_str()), &body(&json!({ "done": false })))
        .await
        .unwrap();
    assert!(!coord.store().select_subtask(&subtask).await.unwrap().done);
}

#[tokio::test]
async fn unknown_subtask() {
    let coord = coordinator().await;
    let (creds, _) = admin_with_board(&coord, "alice").await;
    let err = coord
        .update_subtask(&creds, Some("missing"), &body(&json!({ "done": true })))
        .await
        .unwrap_err();
    assert!(matches!(err, Rejection::NotFound(_)));
    assert_eq!(err.to_string(), "Subtask not found.");
}

#[tokio::test]
async fn subtask_of_task_outside_snapshot() {
    let coord = coordinator().await;
    let (before, board) = admin_with_board(&coord, "alice").await;
    let (_, task) = create_task(&coord, &before, &board.columns[0].id, "Later", &["a"]).await;
    let subtask = coord.store().retrieve_subtasks_by_task(&task).await.unwrap()[0]
        .id
        .clone();

    // `before` carries the State from before the task existed.
    let err = coord
        .update_subtask(&before, Some(subtask.as_str()), &body(&json!({ "done": true })))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid subtask ID.");
    assert!(!coord.store().select_subtask(&subtask).await.unwrap().done);
}
