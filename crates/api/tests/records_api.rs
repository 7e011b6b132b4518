//! HTTP-level integration tests for the resource CRUD endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener, over the in-memory store.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete, get, post_json, put_json, send_form, send_json};
use serde_json::json;

fn pikachu() -> serde_json::Value {
    json!({ "name": "Pikachu", "height": "0.4", "weight": "6", "avatar": "url" })
}

fn jacket() -> serde_json::Value {
    json!({
        "name": "Jacket",
        "height": 70,
        "weight": 1.2,
        "avatar": "https://img.example/jacket.png",
        "color": "navy"
    })
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_pokemon_returns_201_with_generated_id() {
    let (app, _) = common::build_test_app();
    let response = post_json(app, "/pokemon/", pikachu()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({ "id": 1, "name": "Pikachu", "height": 0.4, "weight": 6.0, "avatar": "url" })
    );
    assert_eq!(json["message"], "Pokemon Pikachu successfully added.");
}

#[tokio::test]
async fn create_then_get_returns_the_same_record() {
    let (app, _) = common::build_test_app();
    let created = body_json(post_json(app.clone(), "/fashion", jacket()).await).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = get(app, &format!("/fashion/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], created["data"]);
    assert_eq!(json["data"]["color"], "navy");
    assert_eq!(json["message"], "Fashion Jacket successfully retrieved.");
}

#[tokio::test]
async fn fashion_without_color_stores_null() {
    let (app, _) = common::build_test_app();
    let mut payload = jacket();
    payload.as_object_mut().unwrap().remove("color");

    let response = post_json(app, "/fashion/", payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["color"].is_null());
    assert!(json["data"].as_object().unwrap().contains_key("color"));
}

#[tokio::test]
async fn list_returns_records_in_id_order() {
    let (app, _) = common::build_test_app();
    for name in ["Bulbasaur", "Charmander", "Squirtle"] {
        let mut payload = pikachu();
        payload["name"] = json!(name);
        post_json(app.clone(), "/pokemon", payload).await;
    }

    for uri in ["/pokemon", "/pokemon/"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let names: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Bulbasaur", "Charmander", "Squirtle"]);
        assert_eq!(json["message"], "All pokemons successfully retrieved.");
    }
}

#[tokio::test]
async fn empty_list_is_an_empty_array() {
    let (app, _) = common::build_test_app();
    let json = body_json(get(app, "/fashion/").await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn resources_are_stored_separately() {
    let (app, _) = common::build_test_app();
    post_json(app.clone(), "/pokemon/", pikachu()).await;
    let fashion = body_json(post_json(app.clone(), "/fashion/", jacket()).await).await;
    assert_eq!(fashion["data"]["id"], 1);

    let json = body_json(get(app, "/fashion/").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn get_nonexistent_returns_404_envelope() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/pokemon/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["data"].is_null());
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Pokemon with id 999 not found");
}

#[tokio::test]
async fn non_numeric_id_returns_400() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/pokemon/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["data"].is_null());
}

// ---------------------------------------------------------------------------
// Create validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_with_missing_field_returns_400_and_stores_nothing() {
    let (app, _) = common::build_test_app();
    let response = post_json(
        app.clone(),
        "/pokemon/",
        json!({ "name": "Ditto", "height": 0.3 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let json = body_json(get(app, "/pokemon/").await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn create_with_negative_measure_returns_400() {
    let (app, _) = common::build_test_app();
    let mut payload = pikachu();
    payload["weight"] = json!(-6);

    let response = post_json(app, "/pokemon/", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_with_non_numeric_measure_returns_400() {
    let (app, _) = common::build_test_app();
    let mut payload = pikachu();
    payload["height"] = json!("tall");

    let response = post_json(app, "/pokemon/", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_pokemon_with_color_returns_400() {
    let (app, _) = common::build_test_app();
    let mut payload = pikachu();
    payload["color"] = json!("yellow");

    let response = post_json(app, "/pokemon/", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("color"));
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let (app, _) = common::build_test_app();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/pokemon/")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .unwrap();

    let response = common::send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn injection_text_is_stored_verbatim() {
    let (app, _) = common::build_test_app();
    let mut payload = pikachu();
    payload["name"] = json!("x'); DROP TABLE pokemon_tb; --");

    let created = body_json(post_json(app.clone(), "/pokemon/", payload).await).await;
    let json = body_json(get(app, "/pokemon/1").await).await;
    assert_eq!(json["data"]["name"], created["data"]["name"]);
}

// ---------------------------------------------------------------------------
// Form-encoded bodies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn form_encoded_create_is_accepted() {
    let (app, _) = common::build_test_app();
    let response = send_form(
        app.clone(),
        Method::POST,
        "/fashion/",
        "name=Scarf&height=1&weight=2&avatar=url&color=red",
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({
            "id": 1,
            "name": "Scarf",
            "height": 1.0,
            "weight": 2.0,
            "avatar": "url",
            "color": "red"
        })
    );

    let stored = body_json(get(app, "/fashion/1").await).await;
    assert_eq!(stored["data"], json["data"]);
}

#[tokio::test]
async fn form_encoded_update_merges_like_json() {
    let (app, _) = common::build_test_app();
    post_json(app.clone(), "/pokemon/", pikachu()).await;

    let response = send_form(
        app.clone(),
        Method::PUT,
        "/pokemon/1",
        "name=Raichu&weight=30",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app, "/pokemon/1").await).await;
    assert_eq!(json["data"]["name"], "Raichu");
    assert_eq!(json["data"]["weight"], 30.0);
    assert_eq!(json["data"]["height"], 0.4);
    assert_eq!(json["data"]["avatar"], "url");
}

#[tokio::test]
async fn form_with_missing_field_returns_validation_error() {
    let (app, _) = common::build_test_app();
    let response =
        send_form(app.clone(), Method::POST, "/pokemon/", "name=Mew&height=0.4").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert_eq!(body_json(get(app, "/pokemon/").await).await["data"], json!([]));
}

#[tokio::test]
async fn form_with_non_numeric_measure_returns_400() {
    let (app, _) = common::build_test_app();
    let response = send_form(
        app,
        Method::POST,
        "/pokemon/",
        "name=Mew&height=tall&weight=4&avatar=url",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn partial_update_preserves_absent_fields() {
    let (app, _) = common::build_test_app();
    post_json(app.clone(), "/fashion/", jacket()).await;

    let response = put_json(app.clone(), "/fashion/1", json!({ "weight": "1.5" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({
            "id": 1,
            "name": "Jacket",
            "height": 70.0,
            "weight": 1.5,
            "avatar": "https://img.example/jacket.png",
            "color": "navy"
        })
    );
    assert_eq!(json["message"], "Fashion Jacket has been successfully updated.");

    let stored = body_json(get(app, "/fashion/1").await).await;
    assert_eq!(stored["data"], json["data"]);
}

#[tokio::test]
async fn update_ignores_id_in_body() {
    let (app, _) = common::build_test_app();
    post_json(app.clone(), "/pokemon/", pikachu()).await;

    let json = body_json(
        put_json(app.clone(), "/pokemon/1", json!({ "id": 42, "name": "Raichu" })).await,
    )
    .await;
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["name"], "Raichu");

    let response = get(app, "/pokemon/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_null_color_clears_it() {
    let (app, _) = common::build_test_app();
    post_json(app.clone(), "/fashion/", jacket()).await;

    let json = body_json(put_json(app, "/fashion/1", json!({ "color": null })).await).await;
    assert!(json["data"]["color"].is_null());
    assert_eq!(json["data"]["name"], "Jacket");
}

#[tokio::test]
async fn invalid_update_returns_400_and_leaves_record_unchanged() {
    let (app, _) = common::build_test_app();
    let created = body_json(post_json(app.clone(), "/pokemon/", pikachu()).await).await;

    let response = put_json(app.clone(), "/pokemon/1", json!({ "name": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stored = body_json(get(app, "/pokemon/1").await).await;
    assert_eq!(stored["data"], created["data"]);
}

#[tokio::test]
async fn update_nonexistent_returns_404() {
    let (app, _) = common::build_test_app();
    let response = put_json(app, "/pokemon/7", json!({ "name": "Ghost" })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_updates_apply_one_payload_fully() {
    let (app, _) = common::build_test_app();
    post_json(app.clone(), "/fashion/", jacket()).await;

    let first = json!({
        "name": "Coat", "height": 90, "weight": 2.0, "avatar": "coat.png", "color": "black"
    });
    let second = json!({
        "name": "Vest", "height": 50, "weight": 0.5, "avatar": "vest.png", "color": "white"
    });

    let a = tokio::spawn(put_json(app.clone(), "/fashion/1", first.clone()));
    let b = tokio::spawn(put_json(app.clone(), "/fashion/1", second.clone()));
    assert_eq!(a.await.unwrap().status(), StatusCode::OK);
    assert_eq!(b.await.unwrap().status(), StatusCode::OK);

    let stored = body_json(get(app, "/fashion/1").await).await["data"].clone();
    let expected = |payload: &serde_json::Value| {
        json!({
            "id": 1,
            "name": payload["name"],
            "height": payload["height"].as_f64().unwrap(),
            "weight": payload["weight"].as_f64().unwrap(),
            "avatar": payload["avatar"],
            "color": payload["color"],
        })
    };
    assert!(
        stored == expected(&first) || stored == expected(&second),
        "stored record mixes fields from both payloads: {stored}"
    );
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_then_get_returns_404() {
    let (app, _) = common::build_test_app();
    post_json(app.clone(), "/pokemon/", pikachu()).await;

    let response = delete(app.clone(), "/pokemon/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].is_null());
    assert_eq!(json["message"], "Pokemon with id: 1 successfully deleted.");

    let response = get(app, "/pokemon/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_nonexistent_still_confirms() {
    let (app, _) = common::build_test_app();
    let response = delete(app, "/fashion/5").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].is_null());
    assert_eq!(json["message"], "Fashion with id: 5 successfully deleted.");
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_400_envelope() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/digimon/1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "data": null, "message": "Route not found" }));
}

#[tokio::test]
async fn unsupported_method_returns_400_envelope() {
    let (app, _) = common::build_test_app();

    let response = send_json(app.clone(), Method::PATCH, "/pokemon/1", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Route not found");

    let response = send_json(app, Method::POST, "/pokemon/1", pikachu()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Route not found");
}
