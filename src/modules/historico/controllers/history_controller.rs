use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::Regime;
use crate::modules::historico::models::{HistoryFilter, PeriodRange, SaveMonthRequest};
use crate::modules::historico::services::HistoryService;

/// Query parameters accepted by the history listing endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// First year of the inclusive range filter
    #[serde(rename = "anoInicio")]
    pub ano_inicio: Option<i32>,
    /// Last year of the inclusive range filter
    #[serde(rename = "anoFim")]
    pub ano_fim: Option<i32>,
    /// Exact regime filter (simples, presumido, real, mei)
    pub regime: Option<String>,
}

/// Query parameters for the two-period comparison endpoint
#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    #[serde(rename = "p1AnoInicio")]
    pub p1_ano_inicio: i32,
    #[serde(rename = "p1AnoFim")]
    pub p1_ano_fim: i32,
    #[serde(rename = "p2AnoInicio")]
    pub p2_ano_inicio: i32,
    #[serde(rename = "p2AnoFim")]
    pub p2_ano_fim: i32,
}

/// Save one month of fiscal data
/// POST /historico
pub async fn save_month(
    service: web::Data<HistoryService>,
    request: web::Json<SaveMonthRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service.save_month(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(record))
}

/// One company's history with variation annotations and statistics
/// GET /historico/{empresaId}
pub async fn get_history(
    service: web::Data<HistoryService>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    let query = query.into_inner();

    let regime = query
        .regime
        .map(|raw| {
            raw.parse::<Regime>().map_err(|_| {
                AppError::InvalidRegime(format!(
                    "expected one of simples, presumido, real, mei; got '{}'",
                    raw
                ))
            })
        })
        .transpose()?;

    let filter = HistoryFilter {
        year_from: query.ano_inicio,
        year_to: query.ano_fim,
        regime,
    };

    let view = service.get_history(&company_id, &filter).await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Chronological chart series for one company
/// GET /historico/{empresaId}/grafico
pub async fn chart_series(
    service: web::Data<HistoryService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    let points = service.chart_series(&company_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "pontos": points,
    })))
}

/// Compare two inclusive year ranges of the same company
/// GET /historico/{empresaId}/comparacao
pub async fn compare_periods(
    service: web::Data<HistoryService>,
    path: web::Path<String>,
    query: web::Query<ComparisonQuery>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    let query = query.into_inner();

    let comparison = service
        .compare_periods(
            &company_id,
            PeriodRange {
                year_from: query.p1_ano_inicio,
                year_to: query.p1_ano_fim,
            },
            PeriodRange {
                year_from: query.p2_ano_inicio,
                year_to: query.p2_ano_fim,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(comparison))
}

/// Remove the record for one period; a miss is not an error
/// DELETE /historico/{empresaId}/{ano}/{mes}
pub async fn remove_month(
    service: web::Data<HistoryService>,
    path: web::Path<(String, i32, u32)>,
) -> Result<HttpResponse, AppError> {
    let (company_id, year, month) = path.into_inner();
    let removed = service.remove_month(&company_id, month, year).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "removido": removed,
    })))
}

/// Configure history routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/historico")
            .route("", web::post().to(save_month))
            .route("/{empresa_id}", web::get().to(get_history))
            .route("/{empresa_id}/grafico", web::get().to(chart_series))
            .route("/{empresa_id}/comparacao", web::get().to(compare_periods))
            .route("/{empresa_id}/{ano}/{mes}", web::delete().to(remove_month)),
    );
}
