//! Financial calculator routes.
//!
//! Each route deserializes the calculator's input record, runs the pure
//! calculation, and returns its output record.

use axum::{Json, Router, routing::MethodRouter, routing::post};
use serde::{Serialize, de::DeserializeOwned};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use regdesk_core::calculators::{
    CalculatorError, emi, gratuity, gst, hra, income_tax, nps, ppf, salary, sip, tds,
};

/// Creates calculator routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculators/emi", calculator(emi::calculate))
        .route("/calculators/sip", calculator(sip::calculate))
        .route("/calculators/nps", calculator(nps::calculate))
        .route("/calculators/ppf", calculator(ppf::calculate))
        .route("/calculators/gratuity", calculator(gratuity::calculate))
        .route("/calculators/tds", calculator(tds::calculate))
        .route("/calculators/hra", calculator(hra::calculate))
        .route("/calculators/salary", calculator(salary::calculate))
        .route("/calculators/gst", calculator(gst::calculate))
        .route("/calculators/income-tax", calculator(income_tax::calculate))
}

fn calculator<I, O>(calculate: fn(&I) -> Result<O, CalculatorError>) -> MethodRouter<AppState>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
{
    post(move |ApiJson(input): ApiJson<I>| async move {
        calculate(&input).map(Json).map_err(ApiError::from)
    })
}
