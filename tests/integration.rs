//! Integration tests for the grade engine HTTP API.
//!
//! This test suite covers:
//! - Classification across every service group
//! - The "no step" outcome and the lenient doctorate policy
//! - Formula listing in both dialects
//! - Workbook rendering from CSV rosters
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use grade_engine::api::{AppState, SKIPPED_ROWS_HEADER, create_router};
use grade_engine::classification::DoctoratePolicy;
use grade_engine::config::{ConfigLoader, EngineConfig};
use grade_engine::service::ReportService;
use grade_engine::workbook::SheetLayout;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    create_router(AppState::new(ReportService::new(config).unwrap()))
}

fn create_router_with_policy(policy: DoctoratePolicy) -> Router {
    let engine = EngineConfig {
        doctorate_policy: policy,
        ..EngineConfig::default()
    };
    let config = ConfigLoader::from_parts(engine, SheetLayout::default()).unwrap();
    create_router(AppState::new(ReportService::new(config).unwrap()))
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn classify(router: Router, prim_days: Value, education: &str) -> (StatusCode, Value) {
    post_json(
        router,
        "/classify",
        json!({ "in_field_prim_days": prim_days, "education": education }),
    )
    .await
}

async fn post_csv(router: Router, csv: &str) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/workbook")
                .header("Content-Type", "text/csv")
                .body(Body::from(csv.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

// =============================================================================
// Classification
// =============================================================================

#[tokio::test]
async fn test_classify_lowest_group_bachelor() {
    let (status, body) = classify(create_router_for_test(), json!(180), "Lisans").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A/AG-6/5-6");
    assert_eq!(body["result"]["service_group"], "A/AG-6");
    assert_eq!(body["result"]["title"], "Uzman Yardımcısı");
    assert_eq!(body["result"]["step"], "5-6");
}

#[tokio::test]
async fn test_classify_mid_group_thesis_master() {
    let (status, body) =
        classify(create_router_for_test(), json!(1440), "Tezli Yüksek Lisans").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A/AG-5/4");
}

#[tokio::test]
async fn test_classify_accepts_snake_case_education() {
    let (status, body) = classify(create_router_for_test(), json!(3240), "doctorate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A/AG-4/3");
}

#[tokio::test]
async fn test_classify_upper_groups() {
    let (_, body) = classify(create_router_for_test(), json!(4680), "Lisans").await;
    assert_eq!(body["grade"], "A/AG-3/5");

    let (_, body) = classify(create_router_for_test(), json!(6120), "Doktora").await;
    assert_eq!(body["grade"], "A/AG-2/3");
}

#[tokio::test]
async fn test_classify_decimal_string_input() {
    let (status, body) = classify(create_router_for_test(), json!("1079.99"), "Lisans").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A/AG-6/3-4");
}

#[tokio::test]
async fn test_classify_response_has_audit_trace() {
    let (_, body) = classify(create_router_for_test(), json!(1440), "Lisans").await;
    let steps = body["result"]["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps
        .iter()
        .map(|s| s["rule_id"].as_str().unwrap())
        .collect();
    assert_eq!(rule_ids, vec!["tenure_years", "service_group", "title", "step"]);
    assert!(body["request_id"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_classify_doctorate_in_lowest_group_is_unprocessable() {
    let (status, body) = classify(create_router_for_test(), json!(180), "Doktora").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "STEP_UNAVAILABLE");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("A/AG-6"));
    assert!(message.contains("Doktora"));
}

#[tokio::test]
async fn test_classify_doctorate_with_lenient_policy() {
    let router = create_router_with_policy(DoctoratePolicy::SameAsThesisMaster);
    let (status, body) = classify(router, json!(180), "Doktora").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A/AG-6/3");
}

// =============================================================================
// Formulas
// =============================================================================

#[tokio::test]
async fn test_formulas_default_dialect() {
    let (status, body) = post_json(create_router_for_test(), "/formulas", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dialect"], "ooxml");

    let cells = body["cells"].as_array().unwrap();
    let formula = |cell: &str| {
        cells
            .iter()
            .find(|c| c["cell"] == cell)
            .map(|c| c["formula"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(formula("K11"), "=IF(AND(E11<>\"\",F11<>\"\"),F11-E11,\"\")");
    assert_eq!(formula("L19"), "=SUM(L11:L18)");
    assert_eq!(formula("Z1"), "=L19/360");
    assert_eq!(formula("F3"), "=IF(Z3=\"\",Z2,Z2 & \"/\" & Z3)");
}

#[tokio::test]
async fn test_formulas_turkish_dialect_keeps_literals() {
    let (_, ooxml) = post_json(create_router_for_test(), "/formulas", json!({})).await;
    let (_, turkish) = post_json(
        create_router_for_test(),
        "/formulas",
        json!({ "dialect": "turkish" }),
    )
    .await;
    assert_eq!(turkish["dialect"], "turkish");

    let ooxml_cells = ooxml["cells"].as_array().unwrap();
    let turkish_cells = turkish["cells"].as_array().unwrap();
    assert_eq!(ooxml_cells.len(), turkish_cells.len());

    let step = turkish_cells.iter().find(|c| c["cell"] == "Z3").unwrap();
    let text = step["formula"].as_str().unwrap();
    assert!(text.starts_with("=EĞER(Z1>=16;"));
    assert!(text.contains("\"Tezsiz Yüksek Lisans\""));
    assert!(!text.contains("IF("));
}

#[tokio::test]
async fn test_formulas_unknown_dialect_is_rejected() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/formulas",
        json!({ "dialect": "klingon" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}

// =============================================================================
// Workbook
// =============================================================================

#[tokio::test]
async fn test_workbook_from_csv_roster() {
    let csv = "TCKN,AD SOYAD,BİRİMİ\n\
               10000000146,Fatma KARACA,Marmara Enstitüsü\n\
               10000000078,Ali YILMAZ,Merkez\n\
               12345678901,Bad Checksum,Merkez\n";
    let response = post_csv(create_router_for_test(), csv).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(response.headers()[SKIPPED_ROWS_HEADER], "1");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_workbook_from_empty_roster_is_still_a_workbook() {
    let response = post_csv(create_router_for_test(), "TCKN,AD SOYAD,BİRİMİ\n").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[SKIPPED_ROWS_HEADER], "0");
}

#[tokio::test]
async fn test_workbook_missing_column_is_bad_request() {
    let response = post_csv(create_router_for_test(), "TCKN,AD SOYAD\n10000000146,Fatma\n").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "MISSING_COLUMNS");
    assert!(body["message"].as_str().unwrap().contains("BİRİMİ"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/classify")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/classify",
        json!({ "in_field_prim_days": 100 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_education_label() {
    let (status, body) = classify(create_router_for_test(), json!(100), "Lise").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}
