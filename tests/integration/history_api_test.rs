//! Integration tests for the fiscal history HTTP API
//!
//! Each test wires the controller against a fresh in-memory store and
//! drives it in-process, checking the Portuguese wire shapes the React
//! frontend consumes.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::{test, web, App};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use tributo::core::clock::{SystemClock, UuidGenerator};
use tributo::modules::historico::controllers::history_controller;
use tributo::modules::historico::repositories::InMemoryHistoryRepository;
use tributo::modules::historico::services::HistoryService;

fn history_service() -> web::Data<HistoryService> {
    web::Data::new(HistoryService::new(
        Arc::new(InMemoryHistoryRepository::new()),
        Arc::new(SystemClock),
        Arc::new(UuidGenerator),
    ))
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data($service.clone())
                .configure(history_controller::configure),
        )
        .await
    };
}

/// Decimals travel as JSON strings; compare them numerically
fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("expected a decimal string")).unwrap()
}

fn save_body(month: u32, year: i32, revenue: i64, taxes: i64) -> Value {
    json!({
        "empresaId": "empresa-1",
        "mes": month,
        "ano": year,
        "faturamento": revenue,
        "regime": "simples",
        "impostos": taxes,
    })
}

#[actix_web::test]
async fn test_save_month_returns_created_record() {
    let service = history_service();
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/historico")
        .set_json(save_body(1, 2024, 100_000, 8_000))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].is_string());
    assert_eq!(body["empresaId"], "empresa-1");
    assert_eq!(body["mes"], 1);
    assert_eq!(body["ano"], 2024);
    assert_eq!(body["regime"], "simples");
    assert_eq!(decimal(&body["aliquotaEfetiva"]), dec!(8));
    assert!(body["criadoEm"].is_string());
}

#[actix_web::test]
async fn test_invalid_month_is_a_field_specific_400() {
    let service = history_service();
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/historico")
        .set_json(save_body(13, 2024, 100_000, 8_000))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_MONTH");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("13"));
}

#[actix_web::test]
async fn test_invalid_regime_is_rejected_at_the_boundary() {
    let service = history_service();
    let app = app!(service);

    let mut body = save_body(1, 2024, 100_000, 8_000);
    body["regime"] = json!("invalido");

    let req = test::TestRequest::post()
        .uri("/historico")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_REGIME");
}

#[actix_web::test]
async fn test_history_lists_records_with_variation_and_statistics() {
    let service = history_service();
    let app = app!(service);

    for (month, revenue, taxes) in [(1, 100_000, 8_000), (2, 120_000, 10_000)] {
        let req = test::TestRequest::post()
            .uri("/historico")
            .set_json(save_body(month, 2024, revenue, taxes))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/historico/empresa-1")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(body["totalRegistros"], 2);
    let registros = body["registros"].as_array().unwrap();
    assert!(registros[0]["variacao"].is_null());
    assert_eq!(
        decimal(&registros[1]["variacao"]["faturamento"]),
        dec!(20)
    );

    let estatisticas = &body["estatisticas"];
    assert_eq!(estatisticas["totalRegistros"], 2);
    assert_eq!(decimal(&estatisticas["faturamentoTotal"]), dec!(220_000));
    assert_eq!(decimal(&estatisticas["tributosTotal"]), dec!(18_000));
    assert!(estatisticas["aliquotaMediaEfetiva"].is_string());
}

#[actix_web::test]
async fn test_history_for_unknown_company_is_an_empty_view() {
    let service = history_service();
    let app = app!(service);

    let req = test::TestRequest::get()
        .uri("/historico/desconhecida")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(body["totalRegistros"], 0);
    assert!(body["registros"].as_array().unwrap().is_empty());
    assert_eq!(body["estatisticas"]["totalRegistros"], 0);
    assert_eq!(decimal(&body["estatisticas"]["faturamentoTotal"]), dec!(0));
    assert_eq!(decimal(&body["estatisticas"]["tributosTotal"]), dec!(0));
    assert!(body["estatisticas"].get("aliquotaMediaEfetiva").is_none());
}

#[actix_web::test]
async fn test_history_filters_by_year_and_regime_query() {
    let service = history_service();
    let app = app!(service);

    for (month, year) in [(12, 2023), (1, 2024)] {
        let req = test::TestRequest::post()
            .uri("/historico")
            .set_json(save_body(month, year, 100_000, 8_000))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/historico/empresa-1?anoInicio=2024&anoFim=2024&regime=simples")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(body["totalRegistros"], 1);
    assert_eq!(body["registros"][0]["ano"], 2024);
}

#[actix_web::test]
async fn test_bad_regime_filter_is_rejected() {
    let service = history_service();
    let app = app!(service);

    let req = test::TestRequest::get()
        .uri("/historico/empresa-1?regime=invalido")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_REGIME");
}

#[actix_web::test]
async fn test_chart_series_is_labelled_chronologically() {
    let service = history_service();
    let app = app!(service);

    for (month, year) in [(2, 2024), (12, 2023)] {
        let req = test::TestRequest::post()
            .uri("/historico")
            .set_json(save_body(month, year, 100_000, 8_000))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/historico/empresa-1/grafico")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let pontos = body["pontos"].as_array().unwrap();
    assert_eq!(pontos.len(), 2);
    assert_eq!(pontos[0]["label"], "12/2023");
    assert_eq!(pontos[1]["label"], "02/2024");
}

#[actix_web::test]
async fn test_period_comparison_reports_fifty_percent_growth() {
    let service = history_service();
    let app = app!(service);

    for (year, revenue, taxes) in [(2023, 100_000, 8_000), (2024, 150_000, 12_000)] {
        let req = test::TestRequest::post()
            .uri("/historico")
            .set_json(save_body(6, year, revenue, taxes))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/historico/empresa-1/comparacao?p1AnoInicio=2023&p1AnoFim=2023&p2AnoInicio=2024&p2AnoFim=2024")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(decimal(&body["periodo1"]["faturamentoTotal"]), dec!(100_000));
    assert_eq!(decimal(&body["periodo2"]["faturamentoTotal"]), dec!(150_000));
    assert_eq!(decimal(&body["variacao"]["faturamento"]), dec!(50));
    assert_eq!(decimal(&body["variacao"]["impostos"]), dec!(50));
}

#[actix_web::test]
async fn test_comparison_with_empty_baseline_is_unprocessable() {
    let service = history_service();
    let app = app!(service);

    let req = test::TestRequest::get()
        .uri("/historico/empresa-1/comparacao?p1AnoInicio=2020&p1AnoFim=2020&p2AnoInicio=2024&p2AnoFim=2024")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 422);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INSUFFICIENT_DATA");
}

#[actix_web::test]
async fn test_delete_reports_hit_then_miss() {
    let service = history_service();
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/historico")
        .set_json(save_body(1, 2024, 100_000, 8_000))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/historico/empresa-1/2024/1")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["removido"], true);

    let req = test::TestRequest::delete()
        .uri("/historico/empresa-1/2024/1")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["removido"], false);
}
