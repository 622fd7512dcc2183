mod common;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::StatusCode, rt, test, web, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::json;
use tasktrack::auth::AUTH_HEADER;
use tasktrack::models::Task;
use tasktrack::routes::{self, health};
use uuid::Uuid;

use common::{auth_header, init_app, register_and_login_user};

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let store = common::memory_store();
    let tokens = common::token_service();
    let hasher = common::password_hasher();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(tokens.clone())
            .app_data(hasher.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind random port");
    let port = server.addrs()[0].port();
    let server = server.run();
    let server_handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let request_url = format!("http://127.0.0.1:{}/api/tasks", port);
    let task_payload = json!({ "title": "Unauthorized Task" });

    let resp = client
        .post(&request_url)
        .json(&task_payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.expect("error body is JSON");
    assert!(body["error"].is_string());

    let resp = client
        .post(&request_url)
        .header(AUTH_HEADER, "eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl")
        .json(&task_payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    server_handle.stop(true).await;
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let app = init_app().await;
    let user = register_and_login_user(&app, "crud_user", "crud_user@example.com", "PasswordCrud123!").await;

    // 1. Create
    let req_create = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(auth_header(&user.token))
        .set_json(json!({
            "title": "CRUD Task 1 Original",
            "description": "Initial description"
        }))
        .to_request();
    let resp_create = test::call_service(&app, req_create).await;
    assert_eq!(resp_create.status(), StatusCode::OK);
    let created_task: Task = test::read_body_json(resp_create).await;
    assert_eq!(created_task.title, "CRUD Task 1 Original");
    assert_eq!(created_task.description.as_deref(), Some("Initial description"));
    assert!(!created_task.completed);
    assert_eq!(created_task.user_id, user.id);
    let task_id_1 = created_task.id;

    // 2. Partial update: only the title changes
    let req_update = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task_id_1))
        .insert_header(auth_header(&user.token))
        .set_json(json!({ "title": "CRUD Task 1 Updated" }))
        .to_request();
    let resp_update = test::call_service(&app, req_update).await;
    assert_eq!(resp_update.status(), StatusCode::OK);
    let updated_task: Task = test::read_body_json(resp_update).await;
    assert_eq!(updated_task.id, task_id_1);
    assert_eq!(updated_task.title, "CRUD Task 1 Updated");
    assert_eq!(updated_task.description.as_deref(), Some("Initial description"));
    assert!(!updated_task.completed);
    assert!(updated_task.updated_at >= created_task.updated_at);

    // 3. Second task
    let req_create2 = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(auth_header(&user.token))
        .set_json(json!({ "title": "CRUD Task 2" }))
        .to_request();
    let resp_create2 = test::call_service(&app, req_create2).await;
    assert_eq!(resp_create2.status(), StatusCode::OK);
    let created_task2: Task = test::read_body_json(resp_create2).await;
    let task_id_2 = created_task2.id;

    // 4. List
    let req_get_all = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(auth_header(&user.token))
        .to_request();
    let resp_get_all = test::call_service(&app, req_get_all).await;
    assert_eq!(resp_get_all.status(), StatusCode::OK);
    let tasks: Vec<Task> = test::read_body_json(resp_get_all).await;
    assert_eq!(tasks.len(), 2);
    assert!(tasks
        .iter()
        .any(|t| t.id == task_id_1 && t.title == "CRUD Task 1 Updated"));
    assert!(tasks.iter().any(|t| t.id == task_id_2 && t.title == "CRUD Task 2"));

    // 5. Delete task 1
    let req_delete1 = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task_id_1))
        .insert_header(auth_header(&user.token))
        .to_request();
    let resp_delete1 = test::call_service(&app, req_delete1).await;
    assert_eq!(resp_delete1.status(), StatusCode::OK);
    let confirmation: serde_json::Value = test::read_body_json(resp_delete1).await;
    assert_eq!(confirmation["message"], "Task removed");

    // Deleting again is a 404
    let req_delete1_again = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task_id_1))
        .insert_header(auth_header(&user.token))
        .to_request();
    let resp_delete1_again = test::call_service(&app, req_delete1_again).await;
    assert_eq!(resp_delete1_again.status(), StatusCode::NOT_FOUND);

    let req_get_all = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(auth_header(&user.token))
        .to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req_get_all).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id_2);
}

#[actix_rt::test]
async fn test_owner_scenario_buy_milk() {
    let app = init_app().await;
    let alice = register_and_login_user(&app, "alice", "a@x.com", "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(auth_header(&alice.token))
        .set_json(json!({ "title": "buy milk" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let task: Task = test::read_body_json(resp).await;
    assert_eq!(task.user_id, alice.id);
    assert!(!task.completed);

    let bob = register_and_login_user(&app, "bob", "b@x.com", "secret2").await;

    // Bob cannot complete Alice's task
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(auth_header(&bob.token))
        .set_json(json!({ "completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Bob does not see it and it is unchanged for Alice
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(auth_header(&bob.token))
        .to_request();
    let bobs_tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(bobs_tasks.is_empty());

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(auth_header(&alice.token))
        .to_request();
    let alices_tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(alices_tasks, vec![task.clone()]);

    // Alice can
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(auth_header(&alice.token))
        .set_json(json!({ "completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Task = test::read_body_json(resp).await;
    assert!(completed.completed);
    assert_eq!(completed.title, "buy milk");
}

#[actix_rt::test]
async fn test_non_owner_delete_leaves_task() {
    let app = init_app().await;
    let owner = register_and_login_user(&app, "owner_a", "owner_a@example.com", "secretA1").await;
    let other = register_and_login_user(&app, "other_b", "other_b@example.com", "secretB1").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(auth_header(&owner.token))
        .set_json(json!({ "title": "User A's Task", "description": "keep me" }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(auth_header(&other.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User not authorized");

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(auth_header(&owner.token))
        .to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks, vec![task]);
}

#[actix_rt::test]
async fn test_missing_task_is_not_found_for_everyone() {
    let app = init_app().await;
    let owner = register_and_login_user(&app, "owner_nf", "owner_nf@example.com", "secret1").await;
    let other = register_and_login_user(&app, "other_nf", "other_nf@example.com", "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(auth_header(&owner.token))
        .set_json(json!({ "title": "short lived" }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(auth_header(&owner.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let ids = [task.id.to_string(), Uuid::new_v4().to_string()];
    for user in [&owner, &other] {
        for id in &ids {
            let req = test::TestRequest::delete()
                .uri(&format!("/api/tasks/{}", id))
                .insert_header(auth_header(&user.token))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "delete {}", id);

            let req = test::TestRequest::put()
                .uri(&format!("/api/tasks/{}", id))
                .insert_header(auth_header(&user.token))
                .set_json(json!({ "completed": true }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "update {}", id);
        }
    }

    // Not a UUID at all: same status and JSON shape as an unknown id
    for req in [
        test::TestRequest::delete()
            .uri("/api/tasks/not-a-uuid")
            .insert_header(auth_header(&owner.token))
            .to_request(),
        test::TestRequest::put()
            .uri("/api/tasks/not-a-uuid")
            .insert_header(auth_header(&owner.token))
            .set_json(json!({ "completed": true }))
            .to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Task not found");
    }
}

#[actix_rt::test]
async fn test_task_input_validation() {
    let app = init_app().await;
    let user = register_and_login_user(&app, "validator", "validator@example.com", "secret1").await;

    let test_cases = vec![
        (json!({}), StatusCode::BAD_REQUEST, "missing title"),
        (
            json!({ "title": "ok", "owner": Uuid::new_v4() }),
            StatusCode::BAD_REQUEST,
            "unknown field",
        ),
        (json!({ "title": "" }), StatusCode::UNPROCESSABLE_ENTITY, "empty title"),
        (
            json!({ "title": "a".repeat(201) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "title too long",
        ),
        (
            json!({ "title": "ok", "description": "b".repeat(1001) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "description too long",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(auth_header(&user.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected_status, "Test case failed: {}", description);
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(auth_header(&user.token))
        .to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(tasks.is_empty(), "rejected input must not create tasks");
}

#[actix_rt::test]
async fn test_token_in_wrong_header_is_rejected() {
    let app = init_app().await;
    let user = register_and_login_user(&app, "bearer_user", "bearer@example.com", "secret1").await;

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
