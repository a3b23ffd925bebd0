use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use crm_dashboard::domain::catalog::{Owner, Stage};
use crm_dashboard::domain::contact::Contact;
use crm_dashboard::domain::deal::Deal;
use crm_dashboard::routes::configure_api;

mod common;

use common::{ScriptedCrm, client_data};

async fn get_json(crm: Arc<ScriptedCrm>, uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(client_data(crm))
            .service(web::scope("/api").configure(configure_api)),
    )
    .await;

    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn health_reports_ok() {
    let (status, body) = get_json(Arc::new(ScriptedCrm::default()), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[actix_web::test]
async fn summary_filters_by_pipeline() {
    let crm = Arc::new(ScriptedCrm::with_deals(vec![
        Deal::new("A", "100").in_pipeline(1),
        Deal::new("B", "50").in_pipeline(2),
    ]));

    let (status, body) = get_json(crm, "/api/summary?pipeline_id=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["total_opportunities"], json!(1));
    assert_eq!(body["data"]["total_opportunity_value"], json!(100.0));
}

#[actix_web::test]
async fn upstream_failure_yields_error_envelope() {
    let (status, body) = get_json(Arc::new(ScriptedCrm::failing()), "/api/summary").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|error| error.contains("Invalid token"))
    );
}

#[actix_web::test]
async fn contacts_listing_relays_meta() {
    let crm = Arc::new(ScriptedCrm {
        contact_pages: vec![
            vec![Contact::new("Jane", "Doe")],
            vec![Contact::new("John", "Roe")],
        ],
        ..ScriptedCrm::default()
    });

    let (status, body) = get_json(crm.clone(), "/api/contacts?page=2&per_page=500").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["first_name"], json!("John"));
    assert_eq!(body["meta"], json!({"total_pages": 2, "current_page": 2}));
    assert_eq!(crm.calls(), vec!["contacts:2:100".to_string()]);
}

#[actix_web::test]
async fn by_stage_ranks_stages() {
    let won = Stage::new(2, "Won");
    let new = Stage::new(1, "New");
    let crm = Arc::new(ScriptedCrm {
        deal_pages: vec![vec![
            Deal::new("A", "10").at_stage(new.clone()),
            Deal::new("B", "20").at_stage(won.clone()),
            Deal::new("C", "30").at_stage(won.clone()),
        ]],
        stages: vec![new, won],
        ..ScriptedCrm::default()
    });

    let (status, body) = get_json(crm, "/api/opportunities/by-stage").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Won"]["count"], json!(2));
    assert_eq!(body["data"]["Won"]["total_value"], json!(50.0));
    assert_eq!(
        body["top_stages"],
        json!([
            {"stage": "Won", "count": 2, "total_value": 50.0},
            {"stage": "New", "count": 1, "total_value": 10.0},
        ])
    );
}

#[actix_web::test]
async fn leads_by_owner_fall_back_to_email_and_unassigned() {
    let owner = Owner::new(5, "", "x@y.com");
    let crm = Arc::new(ScriptedCrm {
        deal_pages: vec![vec![
            Deal::new("A", "10").owned_by(owner.clone()),
            Deal::new("B", "20"),
        ]],
        owners: vec![owner],
        ..ScriptedCrm::default()
    });

    let (status, body) = get_json(crm, "/api/opportunities/leads-by-sales-owner").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["x@y.com"]["count"], json!(1));
    assert_eq!(body["data"]["Unassigned"]["count"], json!(1));
    assert_eq!(body["top_owners"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn opportunities_listing_adds_flat_labels() {
    let crm = Arc::new(ScriptedCrm {
        deal_pages: vec![vec![Deal {
            owner_id: Some(7.into()),
            deal_stage_id: Some(3.into()),
            ..Deal::new("A", "10")
        }]],
        users: vec![Owner::new(7, "Ann", "ann@example.com")],
        stages: vec![Stage::new(3, "Demo")],
        ..ScriptedCrm::default()
    });

    let (status, body) = get_json(crm, "/api/opportunities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["owner_name"], json!("Ann"));
    assert_eq!(body["data"][0]["stage_name"], json!("Demo"));
    assert_eq!(body["meta"]["total_pages"], json!(1));
}

#[actix_web::test]
async fn contacts_are_grouped_by_tag_and_deal_source() {
    let crm = Arc::new(ScriptedCrm {
        contact_pages: vec![vec![
            Contact::new("Jane", "Doe").with_tags(["web", "fair"]),
            Contact::new("John", "Roe"),
            Contact::new("Nobody", "Known"),
        ]],
        deal_pages: vec![vec![Deal {
            sales_account_id: Some("Referral desk".into()),
            ..Deal::new("john roe", "0")
        }]],
        ..ScriptedCrm::default()
    });

    let (status, body) = get_json(crm, "/api/contacts/by-source").await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["web"][0]["first_name"], json!("Jane"));
    assert_eq!(data["fair"][0]["first_name"], json!("Jane"));
    assert_eq!(data["Referral desk"][0]["first_name"], json!("John"));
    assert_eq!(data["No Source"][0]["first_name"], json!("Nobody"));
}

#[actix_web::test]
async fn repeated_query_keys_keep_first_value() {
    let crm = Arc::new(ScriptedCrm {
        contact_pages: vec![vec![Contact::new("Jane", "Doe")]],
        ..ScriptedCrm::default()
    });

    let (status, body) = get_json(crm.clone(), "/api/contacts?page=1&page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(crm.calls(), vec!["contacts:1:25"]);
}

#[actix_web::test]
async fn repeated_pipeline_filter_uses_first_value() {
    let crm = Arc::new(ScriptedCrm::with_deals(vec![
        Deal::new("A", "100").in_pipeline(1),
        Deal::new("B", "50").in_pipeline(2),
    ]));

    let (status, body) = get_json(crm, "/api/summary?pipeline_id=1&pipeline_id=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_opportunities"], json!(1));
}

#[actix_web::test]
async fn undecodable_query_falls_back_to_defaults() {
    let crm = Arc::new(ScriptedCrm::default());

    let (status, body) = get_json(crm.clone(), "/api/contacts?page=%FF%FE&per_page").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(crm.calls(), vec!["contacts:1:25"]);
}

#[actix_web::test]
async fn by_stage_narrows_to_requested_stage() {
    let crm = Arc::new(ScriptedCrm::with_deals(vec![
        Deal::new("A", "10").at_stage(Stage::new(1, "New")),
        Deal::new("B", "20").at_stage(Stage::new(2, "Won")),
    ]));

    let (status, body) = get_json(crm, "/api/opportunities/by-stage?stage=Won").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_object().map(|data| data.len()), Some(1));
    assert_eq!(body["data"]["Won"]["leads"][0]["name"], json!("B"));
    assert_eq!(
        body["top_stages"],
        json!([{"stage": "Won", "count": 1, "total_value": 20.0}])
    );
}

#[actix_web::test]
async fn by_stage_with_unknown_stage_is_empty_group() {
    let crm = Arc::new(ScriptedCrm::with_deals(vec![
        Deal::new("A", "10").at_stage(Stage::new(1, "New")),
    ]));

    let (status, body) = get_json(crm, "/api/opportunities/by-stage?stage=Lost").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"Lost": {"count": 0, "total_value": 0.0, "leads": []}})
    );
    assert_eq!(body["top_stages"], json!([]));
}

#[actix_web::test]
async fn leads_by_owner_narrows_to_requested_owner() {
    let asha = Owner::new(7, "Asha", "asha@example.com");
    let ravi = Owner::new(8, "Ravi", "ravi@example.com");
    let crm = Arc::new(ScriptedCrm {
        deal_pages: vec![vec![
            Deal::new("A", "10").owned_by(asha.clone()),
            Deal::new("B", "20").owned_by(ravi.clone()),
            Deal::new("C", "5"),
        ]],
        owners: vec![asha, ravi],
        ..ScriptedCrm::default()
    });

    let (status, body) =
        get_json(crm, "/api/opportunities/leads-by-sales-owner?owner_id=8").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_object().map(|data| data.len()), Some(1));
    assert_eq!(body["data"]["Ravi"]["total_value"], json!(20.0));
    assert_eq!(body["top_owners"][0]["owner"], json!("Ravi"));
}
