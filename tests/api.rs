use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use packlist::api::create_router;
use packlist::db::Database;

fn server() -> TestServer {
    let db = Database::open_memory().expect("Failed to create test database");
    db.migrate().expect("Failed to migrate test database");
    TestServer::new(create_router(db)).expect("Failed to start test server")
}

fn allow_origin(response: &TestResponse) -> Option<&str> {
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
}

async fn create(server: &TestServer, path: &str, body: Value) -> Value {
    let response = server.post(path).json(&body).await;
    response.assert_status_ok();
    let envelope: Value = response.json();
    assert_eq!(envelope["error"], Value::Null);
    envelope["data"][0].clone()
}

#[tokio::test]
async fn created_trip_is_listed_with_generated_id() {
    let server = server();

    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    assert!(trip["id"].as_str().is_some());

    let trips: Value = server.get("/trips").await.json();
    let listed = trips["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], trip["id"]);
    assert_eq!(listed[0]["name"], "Ski Trip");
    assert_eq!(listed[0]["categories"], json!([]));
}

#[tokio::test]
async fn ski_trip_scenario_nests_three_levels() {
    let server = server();

    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let gear = create(
        &server,
        "/categories",
        json!({ "trip_id": trip["id"], "name": "Gear" }),
    )
    .await;
    create(
        &server,
        "/items",
        json!({ "category_id": gear["id"], "name": "Goggles", "assigned_to": "You" }),
    )
    .await;

    let body: Value = server.get("/trips").await.json();
    let trips = body["data"].as_array().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["name"], "Ski Trip");

    let categories = trips[0]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Gear");
    assert_eq!(categories[0]["collapsed"], false);

    let items = categories[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Goggles");
    assert_eq!(items[0]["packed"], false);
    assert_eq!(items[0]["assigned_to"], "You");
}

#[tokio::test]
async fn categories_are_filtered_by_trip() {
    let server = server();
    let ski = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let beach = create(&server, "/trips", json!({ "name": "Beach" })).await;
    create(&server, "/categories", json!({ "trip_id": ski["id"], "name": "Gear" })).await;
    create(&server, "/categories", json!({ "trip_id": beach["id"], "name": "Towels" })).await;

    let body: Value = server
        .get("/categories")
        .add_query_param("trip_id", ski["id"].as_str().unwrap())
        .await
        .json();

    let categories = body["data"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Gear");
    assert_eq!(categories[0]["items"], json!([]));
}

#[tokio::test]
async fn packing_an_item_is_visible_in_its_category() {
    let server = server();
    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let gear = create(&server, "/categories", json!({ "trip_id": trip["id"], "name": "Gear" })).await;
    let goggles = create(
        &server,
        "/items",
        json!({ "category_id": gear["id"], "name": "Goggles", "assigned_to": "You" }),
    )
    .await;

    let updated: Value = server
        .put("/items")
        .json(&json!({ "id": goggles["id"], "packed": true }))
        .await
        .json();
    assert_eq!(updated["data"][0]["packed"], true);
    assert_eq!(updated["data"][0]["assigned_to"], "You");

    let body: Value = server
        .get("/items")
        .add_query_param("category_id", gear["id"].as_str().unwrap())
        .await
        .json();
    assert_eq!(body["data"][0]["packed"], true);
}

#[tokio::test]
async fn renaming_and_collapsing_a_category() {
    let server = server();
    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let gear = create(&server, "/categories", json!({ "trip_id": trip["id"], "name": "Gear" })).await;

    let body: Value = server
        .put("/categories")
        .json(&json!({ "id": gear["id"], "name": "Ski Gear", "collapsed": true }))
        .await
        .json();

    assert_eq!(body["data"][0]["name"], "Ski Gear");
    assert_eq!(body["data"][0]["collapsed"], true);
}

#[tokio::test]
async fn put_moves_rows_between_parents() {
    let server = server();
    let ski = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let beach = create(&server, "/trips", json!({ "name": "Beach" })).await;
    let gear = create(&server, "/categories", json!({ "trip_id": ski["id"], "name": "Gear" })).await;
    let towels = create(&server, "/categories", json!({ "trip_id": beach["id"], "name": "Towels" })).await;
    let goggles = create(&server, "/items", json!({ "category_id": gear["id"], "name": "Goggles" })).await;

    let moved: Value = server
        .put("/items")
        .json(&json!({ "id": goggles["id"], "category_id": towels["id"] }))
        .await
        .json();
    assert_eq!(moved["data"][0]["category_id"], towels["id"]);

    let body: Value = server
        .get("/items")
        .add_query_param("category_id", towels["id"].as_str().unwrap())
        .await
        .json();
    assert_eq!(body["data"][0]["name"], "Goggles");

    let moved: Value = server
        .put("/categories")
        .json(&json!({ "id": gear["id"], "trip_id": beach["id"] }))
        .await
        .json();
    assert_eq!(moved["data"][0]["trip_id"], beach["id"]);

    let body: Value = server
        .get("/categories")
        .add_query_param("trip_id", ski["id"].as_str().unwrap())
        .await
        .json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn moving_to_an_unknown_parent_is_500() {
    let server = server();
    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let gear = create(&server, "/categories", json!({ "trip_id": trip["id"], "name": "Gear" })).await;
    let goggles = create(&server, "/items", json!({ "category_id": gear["id"], "name": "Goggles" })).await;

    let response = server
        .put("/items")
        .json(&json!({
            "id": goggles["id"],
            "category_id": "00000000-0000-4000-8000-000000000000",
        }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("FOREIGN KEY constraint failed"));
}

#[tokio::test]
async fn updating_a_missing_row_returns_no_rows() {
    let server = server();

    let body: Value = server
        .put("/items")
        .json(&json!({ "id": "00000000-0000-4000-8000-000000000000", "packed": true }))
        .await
        .json();

    assert_eq!(body, json!({ "data": [], "error": null }));
}

#[tokio::test]
async fn deleted_item_disappears_from_listing() {
    let server = server();
    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let gear = create(&server, "/categories", json!({ "trip_id": trip["id"], "name": "Gear" })).await;
    let goggles = create(&server, "/items", json!({ "category_id": gear["id"], "name": "Goggles" })).await;
    create(&server, "/items", json!({ "category_id": gear["id"], "name": "Gloves" })).await;

    let deleted: Value = server
        .delete("/items")
        .add_query_param("itemId", goggles["id"].as_str().unwrap())
        .await
        .json();
    assert_eq!(deleted, json!({ "data": null, "error": null }));

    let body: Value = server
        .get("/items")
        .add_query_param("category_id", gear["id"].as_str().unwrap())
        .await
        .json();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Gloves");
}

#[tokio::test]
async fn deleting_a_trip_cascades() {
    let server = server();
    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let gear = create(&server, "/categories", json!({ "trip_id": trip["id"], "name": "Gear" })).await;
    create(&server, "/items", json!({ "category_id": gear["id"], "name": "Goggles" })).await;

    server
        .delete("/trips")
        .add_query_param("tripId", trip["id"].as_str().unwrap())
        .await
        .assert_status_ok();

    let trips: Value = server.get("/trips").await.json();
    assert_eq!(trips["data"], json!([]));

    let items: Value = server
        .get("/items")
        .add_query_param("category_id", gear["id"].as_str().unwrap())
        .await
        .json();
    assert_eq!(items["data"], json!([]));
}

#[tokio::test]
async fn deleting_a_category_by_query_parameter() {
    let server = server();
    let trip = create(&server, "/trips", json!({ "name": "Ski Trip" })).await;
    let gear = create(&server, "/categories", json!({ "trip_id": trip["id"], "name": "Gear" })).await;

    server
        .delete("/categories")
        .add_query_param("categoryId", gear["id"].as_str().unwrap())
        .await
        .assert_status_ok();

    let body: Value = server
        .get("/categories")
        .add_query_param("trip_id", trip["id"].as_str().unwrap())
        .await
        .json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn options_is_an_empty_cors_preflight() {
    let server = server();

    for path in ["/trips", "/categories", "/items"] {
        let response = server
            .method(Method::OPTIONS, path)
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:8080"))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK, "{path}");
        assert_eq!(response.text(), "", "{path}");
        assert_eq!(allow_origin(&response), Some("*"), "{path}");
    }
}

#[tokio::test]
async fn responses_carry_open_cors_header() {
    let server = server();

    let response = server
        .get("/trips")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:8080"))
        .await;

    assert_eq!(allow_origin(&response), Some("*"));
}

#[tokio::test]
async fn unsupported_verbs_are_405() {
    let server = server();

    for (method, path) in [
        (Method::PATCH, "/trips"),
        (Method::PUT, "/trips"),
        (Method::PATCH, "/categories"),
        (Method::PATCH, "/items"),
    ] {
        let response = server.method(method.clone(), path).expect_failure().await;

        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
        let body: Value = response.json();
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn store_failures_are_500_with_message() {
    let server = server();

    let response = server
        .post("/categories")
        .json(&json!({ "trip_id": "00000000-0000-4000-8000-000000000000", "name": "Orphan" }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("FOREIGN KEY constraint failed"));
}

#[tokio::test]
async fn bad_input_is_400_with_error_envelope() {
    let server = server();

    let missing = server.get("/items").expect_failure().await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.json::<Value>()["error"],
        "missing query parameter: category_id"
    );

    let malformed = server
        .delete("/trips")
        .add_query_param("tripId", "not-a-uuid")
        .expect_failure()
        .await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

    let no_name = server
        .post("/trips")
        .json(&json!({}))
        .expect_failure()
        .await;
    assert!(no_name.status_code().is_client_error());
    assert!(no_name.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server();
    let body: Value = server.get("/health").await.json();
    assert_eq!(body, json!({ "status": "ok" }));
}
