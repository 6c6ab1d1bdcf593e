use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::modules::simples::models::Anexo;
use crate::modules::simples::services::{BracketCalculator, BracketMatch};

/// Request body for a Simples Nacional simulation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplesSimulationRequest {
    /// Trailing-12-month gross revenue (RBT12)
    pub rbt12: Decimal,
    /// Annex to simulate under ("I".."V")
    pub anexo: String,
    /// Current-month revenue; when present the response carries the DAS
    /// amount
    #[serde(default)]
    pub faturamento_mensal: Option<Decimal>,
    /// Trailing-12-month payroll; when present the response carries the
    /// Fator R and service annexes are re-selected by it
    #[serde(default)]
    pub folha12m: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplesSimulationResponse {
    pub anexo: String,
    pub aliquota_nominal: Decimal,
    pub parcela_deduzir: Decimal,
    pub aliquota_efetiva: Decimal,
    pub faixa: BracketMatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub das: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fator_r: Option<Decimal>,
}

/// Simulate the effective Simples Nacional rate for an RBT12
/// POST /simulacoes/simples
pub async fn simulate_simples(
    request: web::Json<SimplesSimulationRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let calculator = BracketCalculator::new();

    let mut anexo: Anexo = request.anexo.parse().map_err(AppError::Validation)?;

    let fator_r = match request.folha12m {
        Some(folha) => {
            let ratio = calculator.fator_r(folha, request.rbt12)?;
            // Re-selection by payroll ratio only applies to the service
            // annexes; I, II and IV are fixed by activity type.
            if matches!(anexo, Anexo::III | Anexo::V) {
                anexo = calculator.anexo_for_services(ratio);
            }
            Some(ratio)
        }
        None => None,
    };

    let table = anexo.table();
    let matched = calculator.locate_bracket(request.rbt12, table)?;
    let effective = calculator.effective_rate(request.rbt12, table)?;
    let das = request
        .faturamento_mensal
        .map(|monthly| calculator.das_amount(monthly, effective));

    Ok(HttpResponse::Ok().json(SimplesSimulationResponse {
        anexo: anexo.to_string(),
        aliquota_nominal: matched.nominal_rate,
        parcela_deduzir: matched.deduction,
        aliquota_efetiva: effective,
        faixa: matched,
        das,
        fator_r,
    }))
}

/// List the statutory bracket tables so the frontend can render them
/// GET /simulacoes/anexos
pub async fn list_anexos() -> HttpResponse {
    let tables: Vec<_> = Anexo::all().iter().map(|anexo| anexo.table()).collect();

    HttpResponse::Ok().json(serde_json::json!({
        "anexos": tables,
    }))
}

/// Configure simulation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/simulacoes")
            .route("/simples", web::post().to(simulate_simples))
            .route("/anexos", web::get().to(list_anexos)),
    );
}
