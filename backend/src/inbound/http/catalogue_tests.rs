//! Handler tests for the catalogue CRUD routes over the in-memory store.

use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use rstest::rstest;
use serde_json::{Value, json};

use super::configure;
use crate::inbound::http::test_utils::{api_app, in_memory_state, unused_import};
use crate::test_support::InMemoryCatalogue;

macro_rules! send {
    ($app:expr, $req:expr) => {
        actix_test::call_service(&$app, $req.to_request()).await
    };
}

macro_rules! created_id {
    ($app:expr, $uri:expr, $body:expr) => {{
        let res = send!($app, TestRequest::post().uri($uri).set_json($body));
        assert_eq!(res.status(), StatusCode::CREATED, "creating via {}", $uri);
        let body: Value = actix_test::read_body_json(res).await;
        body["id"].as_i64().expect("numeric id")
    }};
}

#[rstest]
#[case("/api/v1/companies")]
#[case("/api/v1/fuel-types")]
#[actix_web::test]
async fn reference_create_then_duplicate_conflicts(#[case] uri: &str) {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;

    let first = send!(app, TestRequest::post().uri(uri).set_json(json!({ "name": " Tesla " })));
    assert_eq!(first.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(first).await;
    assert_eq!(body["name"], json!("Tesla"));

    let second = send!(app, TestRequest::post().uri(uri).set_json(json!({ "name": "Tesla" })));
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error: Value = actix_test::read_body_json(second).await;
    assert_eq!(error["code"], json!("conflict"));
}

#[actix_web::test]
async fn blank_reference_name_is_rejected() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;

    let res = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/companies")
            .set_json(json!({ "name": "   " }))
    );

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(store.companies().is_empty());
}

#[actix_web::test]
async fn search_route_is_not_parsed_as_an_id() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    for name in ["Toyota", "Tesla", "BMW"] {
        created_id!(app, "/api/v1/companies", json!({ "name": name }));
    }

    let res = send!(app, TestRequest::get().uri("/api/v1/companies/search?q=t"));

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["name"].as_str())
        .collect();
    assert_eq!(names, ["Toyota", "Tesla"]);
}

#[actix_web::test]
async fn search_without_query_returns_everything() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    created_id!(app, "/api/v1/engines", json!({ "type": "V8" }));
    created_id!(app, "/api/v1/engines", json!({ "type": "Electric" }));

    let res = send!(app, TestRequest::get().uri("/api/v1/engines/search"));

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[case("/api/v1/companies/999")]
#[case("/api/v1/fuel-types/999")]
#[case("/api/v1/engines/999")]
#[case("/api/v1/cars/999")]
#[case("/api/v1/performance/999")]
#[actix_web::test]
async fn unknown_ids_are_not_found(#[case] uri: &str) {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;

    let get = send!(app, TestRequest::get().uri(uri));
    assert_eq!(get.status(), StatusCode::NOT_FOUND);
    let delete = send!(app, TestRequest::delete().uri(uri));
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_numeric_id_is_a_bad_request() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;

    let res = send!(app, TestRequest::get().uri("/api/v1/cars/abc"));

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("invalid_request"));
}

#[actix_web::test]
async fn car_lifecycle_resolves_names_and_cascades_performance() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    let company = created_id!(app, "/api/v1/companies", json!({ "name": "Tesla" }));
    let fuel = created_id!(app, "/api/v1/fuel-types", json!({ "name": "Electric" }));
    let engine = created_id!(app, "/api/v1/engines", json!({ "type": "Dual Motor", "horsepower": 670 }));

    let car = created_id!(
        app,
        "/api/v1/cars",
        json!({
            "name": "Model S",
            "companyId": company,
            "engineId": engine,
            "fuelTypeId": fuel,
            "price": 89990,
            "seats": 5
        })
    );
    created_id!(
        app,
        "/api/v1/performance",
        json!({ "carId": car, "topSpeed": 322, "acceleration0100": 2.1 })
    );

    let fetched = send!(app, TestRequest::get().uri(&format!("/api/v1/cars/{car}")));
    let body: Value = actix_test::read_body_json(fetched).await;
    assert_eq!(body["company"], json!("Tesla"));
    assert_eq!(body["fuelType"], json!("Electric"));
    assert_eq!(body["seats"], json!(5));

    let deleted = send!(app, TestRequest::delete().uri(&format!("/api/v1/cars/{car}")));
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert!(store.performances().is_empty());
    assert_eq!(store.companies().len(), 1);
    assert_eq!(store.engines().len(), 1);
}

#[actix_web::test]
async fn car_with_missing_company_is_rejected() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;

    let res = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/cars")
            .set_json(json!({ "name": "Ghost", "companyId": 41 }))
    );

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(store.cars().is_empty());
}

#[actix_web::test]
async fn car_without_company_id_reports_the_missing_field() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;

    let res = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/cars")
            .set_json(json!({ "name": "Ghost" }))
    );

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], json!("companyId"));
    assert_eq!(body["details"]["code"], json!("missing_field"));
}

#[actix_web::test]
async fn deleting_a_referenced_company_conflicts() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    let company = created_id!(app, "/api/v1/companies", json!({ "name": "Toyota" }));
    created_id!(
        app,
        "/api/v1/cars",
        json!({ "name": "Corolla", "companyId": company })
    );

    let res = send!(
        app,
        TestRequest::delete().uri(&format!("/api/v1/companies/{company}"))
    );

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(store.companies().len(), 1);
}

#[actix_web::test]
async fn deleting_a_fuel_type_clears_it_on_cars() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    let company = created_id!(app, "/api/v1/companies", json!({ "name": "Toyota" }));
    let fuel = created_id!(app, "/api/v1/fuel-types", json!({ "name": "Hybrid" }));
    let car = created_id!(
        app,
        "/api/v1/cars",
        json!({ "name": "Prius", "companyId": company, "fuelTypeId": fuel })
    );

    let res = send!(
        app,
        TestRequest::delete().uri(&format!("/api/v1/fuel-types/{fuel}"))
    );
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let fetched = send!(app, TestRequest::get().uri(&format!("/api/v1/cars/{car}")));
    let body: Value = actix_test::read_body_json(fetched).await;
    assert_eq!(body["fuelTypeId"], Value::Null);
    assert_eq!(body["fuelType"], Value::Null);
}

#[actix_web::test]
async fn engine_update_distinguishes_absent_from_null() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    let engine = created_id!(
        app,
        "/api/v1/engines",
        json!({ "type": "V8", "cc": 3996, "horsepower": 630, "torque": 800 })
    );

    let res = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/engines/{engine}"))
            .set_json(json!({ "type": "  ", "cc": null, "torque": 850 }))
    );

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["type"], json!("V8"));
    assert_eq!(body["cc"], Value::Null);
    assert_eq!(body["horsepower"], json!(630));
    assert_eq!(body["torque"], json!(850));
}

#[actix_web::test]
async fn negative_quantities_are_rejected() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;

    let res = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/engines")
            .set_json(json!({ "type": "V6", "horsepower": -1 }))
    );

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(store.engines().is_empty());
}

#[actix_web::test]
async fn performance_search_filters_by_minimum_top_speed() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    let company = created_id!(app, "/api/v1/companies", json!({ "name": "Porsche" }));
    for (name, speed) in [("911", 293), ("Taycan", 260), ("Macan", 232)] {
        let car = created_id!(
            app,
            "/api/v1/cars",
            json!({ "name": name, "companyId": company })
        );
        created_id!(
            app,
            "/api/v1/performance",
            json!({ "carId": car, "topSpeed": speed })
        );
    }

    let fast = send!(app, TestRequest::get().uri("/api/v1/performance/search?q=250"));
    let fast: Value = actix_test::read_body_json(fast).await;
    assert_eq!(fast.as_array().map(Vec::len), Some(2));

    let all = send!(app, TestRequest::get().uri("/api/v1/performance/search?q=fast"));
    let all: Value = actix_test::read_body_json(all).await;
    assert_eq!(all.as_array().map(Vec::len), Some(3));
}

#[actix_web::test]
async fn second_performance_for_a_car_conflicts() {
    let store = InMemoryCatalogue::new();
    let app =
        actix_test::init_service(api_app(in_memory_state(&store, unused_import()), configure))
            .await;
    let company = created_id!(app, "/api/v1/companies", json!({ "name": "Mazda" }));
    let car = created_id!(
        app,
        "/api/v1/cars",
        json!({ "name": "MX-5", "companyId": company })
    );
    created_id!(app, "/api/v1/performance", json!({ "carId": car }));

    let res = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/performance")
            .set_json(json!({ "carId": car, "topSpeed": 219 }))
    );

    assert_eq!(res.status(), StatusCode::CONFLICT);
}
