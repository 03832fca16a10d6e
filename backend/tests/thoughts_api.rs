//! End-to-end HTTP tests for the thoughts API against an isolated SQLite
//! database per test.

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use thought_backend::Trace;
use thought_backend::inbound::http::HttpState;
use thought_backend::inbound::http::health::HealthState;
use thought_backend::server::configure;

mod support;

const OWNER_TOKEN: &str = "tttttttt12";

async fn init_app(
    state: HttpState,
    dev_maintenance: bool,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    test::init_service(
        App::new()
            .wrap(Trace)
            .configure(|cfg| configure(cfg, &state, &health_state, dev_maintenance)),
    )
    .await
}

fn create_body(username: &str, text: &str, owner_token: &str) -> Value {
    json!({ "username": username, "text": text, "ownerToken": owner_token })
}

async fn post_thought<S, B>(app: &S, body: &Value) -> ServiceResponse<B>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri("/thoughts")
            .set_json(body)
            .to_request(),
    )
    .await
}

#[actix_web::test]
async fn root_reports_healthy() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "message": "Healthy" }));
}

#[actix_web::test]
async fn create_then_list_round_trips_without_tokens() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("alice", "hello world", OWNER_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["username"], json!("alice"));
    assert_eq!(created["text"], json!("hello world"));
    assert!(created["id"].as_i64().expect("id is an integer") >= 1);
    assert!(created["updatedAt"].is_null());
    let edit_token = created["editToken"].as_str().expect("edit token present");
    assert!(edit_token.len() >= 32);

    let res = test::call_service(&app, test::TestRequest::get().uri("/thoughts").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Value = test::read_body_json(res).await;
    let items = listed.as_array().expect("array body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], json!("hello world"));
    // Credentials never appear in listings.
    assert!(items[0].get("editToken").is_none());
    assert!(items[0].get("ownerToken").is_none());
}

#[actix_web::test]
async fn inputs_are_trimmed_before_storage() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("  alice  ", "  hi  ", OWNER_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["username"], json!("alice"));
    assert_eq!(created["text"], json!("hi"));
}

#[actix_web::test]
async fn second_submission_same_day_conflicts() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("alice", "first", OWNER_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = post_thought(&app, &create_body("alice", "again", OWNER_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], json!("duplicate_submission"));

    // A different token still gets its slot.
    let res = post_thought(&app, &create_body("bob", "mine", "another-token-42")).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn validation_failures_name_the_field() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let cases = [
        (create_body("", "hi", OWNER_TOKEN), "username"),
        (create_body("alice", "   ", OWNER_TOKEN), "text"),
        (create_body("alice", "hi", "short"), "ownerToken"),
        (
            create_body("alice", "x".repeat(501).as_str(), OWNER_TOKEN),
            "text",
        ),
    ];

    for (body, field) in cases {
        let res = post_thought(&app, &body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "field: {field}");
        let error: Value = test::read_body_json(res).await;
        assert_eq!(error["code"], json!("invalid_request"));
        assert_eq!(error["details"]["field"], json!(field));
    }
}

#[actix_web::test]
async fn missing_fields_are_rejected_with_the_field_name() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &json!({ "username": "alice", "text": "hi" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["details"]["field"], json!("ownerToken"));
}

#[actix_web::test]
async fn malformed_json_gets_the_standard_envelope() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/thoughts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], json!("invalid_request"));
}

#[actix_web::test]
async fn update_round_trip_with_header_credential() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("alice", "hi", OWNER_TOKEN)).await;
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("id");
    let edit_token = created["editToken"].as_str().expect("edit token").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/thoughts/{id}"))
            .insert_header(("X-Edit-Token", edit_token.as_str()))
            .set_json(json!({ "text": "hi there" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["text"], json!("hi there"));
    assert!(updated["updatedAt"].is_string());

    let res = test::call_service(&app, test::TestRequest::get().uri("/thoughts").to_request()).await;
    let listed: Value = test::read_body_json(res).await;
    assert_eq!(listed[0]["text"], json!("hi there"));
}

#[actix_web::test]
async fn update_with_wrong_token_leaves_text_unchanged() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("alice", "original", OWNER_TOKEN)).await;
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("id");

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/thoughts/{id}"))
            .insert_header(("X-Edit-Token", "wrong-token"))
            .set_json(json!({ "text": "hijacked" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], json!("forbidden"));

    let res = test::call_service(&app, test::TestRequest::get().uri("/thoughts").to_request()).await;
    let listed: Value = test::read_body_json(res).await;
    assert_eq!(listed[0]["text"], json!("original"));
}

#[actix_web::test]
async fn missing_credential_is_forbidden_and_unknown_id_is_not_found() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("alice", "hi", OWNER_TOKEN)).await;
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("id");
    let edit_token = created["editToken"].as_str().expect("edit token").to_owned();

    // No credential at all.
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/thoughts/{id}"))
            .set_json(json!({ "text": "new" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Valid credential, absent id.
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/thoughts/999999")
            .insert_header(("X-Edit-Token", edit_token.as_str()))
            .set_json(json!({ "text": "new" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], json!("not_found"));
}

#[actix_web::test]
async fn query_parameter_credential_works_and_header_wins() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("alice", "hi", OWNER_TOKEN)).await;
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("id");
    let edit_token = created["editToken"].as_str().expect("edit token").to_owned();

    // Credential via query parameter alone.
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/thoughts/{id}?token={edit_token}"))
            .set_json(json!({ "text": "via query" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // A bad header outranks a good query parameter.
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/thoughts/{id}?token={edit_token}"))
            .insert_header(("X-Edit-Token", "wrong"))
            .set_json(json!({ "text": "should fail" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn delete_frees_the_daily_slot_for_the_same_token() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = post_thought(&app, &create_body("alice", "hi", OWNER_TOKEN)).await;
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("id");
    let edit_token = created["editToken"].as_str().expect("edit token").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/thoughts/{id}"))
            .insert_header(("X-Edit-Token", edit_token.as_str()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(&app, test::TestRequest::get().uri("/thoughts").to_request()).await;
    let listed: Value = test::read_body_json(res).await;
    assert_eq!(listed.as_array().expect("array").len(), 0);

    // Same token, same day: the slot re-opened with the claim removal.
    let res = post_thought(&app, &create_body("alice", "second chance", OWNER_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn listing_preserves_insertion_order_and_ids_increase() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let body = create_body(
            &format!("user-{i}"),
            &format!("thought {i}"),
            &format!("owner-token-{i:04}"),
        );
        let res = post_thought(&app, &body).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;
        ids.push(created["id"].as_i64().expect("id"));
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

    let res = test::call_service(&app, test::TestRequest::get().uri("/thoughts").to_request()).await;
    let listed: Value = test::read_body_json(res).await;
    let listed_ids: Vec<i64> = listed
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(listed_ids, ids);

    let listed_created: Vec<String> = listed
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["createdAt"].as_str().expect("createdAt").to_owned())
        .collect();
    let mut sorted = listed_created.clone();
    sorted.sort();
    assert_eq!(listed_created, sorted);
}

#[actix_web::test]
async fn admin_clear_is_absent_unless_enabled() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), false).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/admin/dev/clear-thoughts")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_clear_removes_everything_when_enabled() {
    let db = support::test_db().await;
    let app = init_app(support::http_state(&db.pool), true).await;

    for i in 0..2 {
        let res = post_thought(
            &app,
            &create_body("user", "text", &format!("owner-token-{i:04}")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/admin/dev/clear-thoughts")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared: Value = test::read_body_json(res).await;
    assert_eq!(cleared["removed"], json!(2));

    let res = test::call_service(&app, test::TestRequest::get().uri("/thoughts").to_request()).await;
    let listed: Value = test::read_body_json(res).await;
    assert_eq!(listed.as_array().expect("array").len(), 0);

    // Slots freed: the same tokens may submit again today.
    let res = post_thought(&app, &create_body("user", "text", "owner-token-0000")).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}
