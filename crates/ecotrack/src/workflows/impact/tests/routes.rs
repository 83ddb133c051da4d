use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::impact::router::impact_router;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn bottles_route_returns_updated_record() {
    let (users, service) = fixture();
    let user = register(&users, "greta");
    let router = impact_router(service);

    let payload = json!({
        "user_id": user.id,
        "bottle_type": "refillable",
        "count": 10,
        "scope": { "personal": 1 },
    });
    let response = router
        .oneshot(
            Request::post("/api/v1/impact/bottles")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["refillable_bottles"], 10);
    let water = body["water_saved"].as_f64().expect("water");
    assert!((water - 8.3).abs() < 1e-9);
}

#[tokio::test]
async fn omitted_scope_lands_on_the_user_row() {
    let (users, service) = fixture();
    let user = register(&users, "greta");
    let router = impact_router(service);

    let payload = json!({
        "user_id": user.id,
        "bottle_type": "refillable",
        "count": 10,
    });
    let response = router
        .oneshot(
            Request::post("/api/v1/impact/bottles")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["refillable_bottles"], 10);
    assert_eq!(body["scope"], Value::Null);
}

#[tokio::test]
async fn count_defaults_to_one() {
    let (users, service) = fixture();
    let user = register(&users, "greta");
    let router = impact_router(service);

    let payload = json!({
        "user_id": user.id,
        "bottle_type": "recycled",
        "scope": { "personal": 1 },
    });
    let response = router
        .oneshot(
            Request::post("/api/v1/impact/bottles")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["recycled_bottles"], 1);
}

#[tokio::test]
async fn ledger_route_lists_rows() {
    let (users, service) = fixture();
    let user = register(&users, "greta");
    service
        .record_bottle_usage(crate::workflows::impact::domain::BottleUsage {
            user_id: user.id,
            bottle_type: crate::workflows::impact::domain::BottleType::Recycled,
            count: 3,
            scope: personal_scope(),
        })
        .expect("record");
    let router = impact_router(service);

    let uri = format!("/api/v1/impact/{}", user.id.0);
    let response = router
        .oneshot(Request::get(&uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["impact"].as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (_, service) = fixture();
    let router = impact_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/impact/99")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
