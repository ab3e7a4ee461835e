use crate::{error::AppError, AppState};
use analyzer::{parse_direction, PeriodAnalysis, ProfitPotentialReport};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate};
use core_types::{normalize_ticker, StockListing};
use database::{NewStock, StockUpdate};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AnalyzePath {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct AdjacentPath {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub direction: String,
}

/// A validated analysis request: normalized ticker and an ordered date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisRequest {
    pub fn parse(ticker: &str, start_date: &str, end_date: &str) -> Result<Self, AppError> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(AppError::BadRequest("ticker is required".to_string()));
        }
        let start = parse_date("startDate", start_date)?;
        let end = parse_date("endDate", end_date)?;
        if end < start {
            return Err(AppError::BadRequest(
                "endDate must not be before startDate".to_string(),
            ));
        }
        Ok(Self { ticker, start, end })
    }
}

/// Accepts a plain ISO date or an RFC 3339 timestamp, keeping only its date.
fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| {
            AppError::BadRequest(format!("{} must be an ISO date, got '{}'", field, value))
        })
}

/// # GET /api/ohlcv/:ticker/:start_date/:end_date
/// Profit potential of a ticker over the window, its neighbours, and better peers.
pub async fn analyze_profit_potential(
    Path(path): Path<AnalyzePath>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProfitPotentialReport>, AppError> {
    let request = AnalysisRequest::parse(&path.ticker, &path.start_date, &path.end_date)?;
    let report = state
        .orchestrator
        .analyze_profit_potential(&request.ticker, request.start, request.end)
        .await?;
    Ok(Json(report))
}

/// # GET /api/ohlcv/:ticker/:start_date/:end_date/:direction
/// The analysis of the equally long period right before or after the window.
pub async fn analyze_adjacent_period(
    Path(path): Path<AdjacentPath>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PeriodAnalysis>, AppError> {
    let request = AnalysisRequest::parse(&path.ticker, &path.start_date, &path.end_date)?;
    let direction = parse_direction(&path.direction)?;
    let analysis = state
        .orchestrator
        .analyze_adjacent_period(&request.ticker, request.start, request.end, direction)
        .await?;
    Ok(Json(analysis))
}

/// # GET /api/stocks
pub async fn list_stocks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StockListing>>, AppError> {
    let stocks = state.db_repo.list_stocks().await?;
    Ok(Json(stocks))
}

/// # POST /api/stocks
pub async fn create_stock(
    State(state): State<Arc<AppState>>,
    Json(new_stock): Json<NewStock>,
) -> Result<(StatusCode, Json<StockListing>), AppError> {
    validate_new_stock(&new_stock)?;
    let stock = state.db_repo.create_stock(&new_stock).await?;
    tracing::info!(ticker = %stock.ticker, "Stock added to catalog.");
    Ok((StatusCode::CREATED, Json(stock)))
}

/// # GET /api/stocks/:ticker
pub async fn get_stock(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StockListing>, AppError> {
    let stock = state.db_repo.get_stock(&ticker).await?;
    Ok(Json(stock))
}

/// # PUT /api/stocks/:ticker
pub async fn update_stock(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<StockUpdate>,
) -> Result<Json<StockListing>, AppError> {
    if update.company_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("companyName must not be empty".to_string()));
    }
    let stock = state.db_repo.update_stock(&ticker, &update).await?;
    Ok(Json(stock))
}

/// # DELETE /api/stocks/:ticker
/// Removes the catalog entry only; price history stays available for analysis.
pub async fn delete_stock(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StockListing>, AppError> {
    let stock = state.db_repo.delete_stock(&ticker).await?;
    tracing::info!(ticker = %stock.ticker, "Stock removed from catalog.");
    Ok(Json(stock))
}

fn validate_new_stock(stock: &NewStock) -> Result<(), AppError> {
    if normalize_ticker(&stock.ticker).is_empty() {
        return Err(AppError::BadRequest("ticker is required".to_string()));
    }
    if stock.company_name.trim().is_empty() {
        return Err(AppError::BadRequest("companyName is required".to_string()));
    }
    Ok(())
}
