//! Route handlers.
//!
//! Every handler makes sure the series cache is populated before reading it.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use orbit_core::{Error, Result, StateVector};
use orbit_query::{instantaneous_speed, nearest_to_now, range_slice};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ApiError, state::AppState};

/// Query parameters for `/epochs`.
#[derive(Debug, Default, Deserialize)]
pub struct EpochsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Body of `/epochs/{epoch}/location`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub lat: f64,
    pub lon: f64,
    pub height: f64,
    pub location: String,
}

/// Body of `/now`.
#[derive(Debug, Serialize, Deserialize)]
pub struct NowResponse {
    pub state_vector: StateVector,
    pub speed: f64,
}

fn parse_int(name: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("{name} must be an integer, got '{raw}'")))
}

async fn lookup(state: &AppState, epoch: &str) -> Result<StateVector> {
    state.store.ensure_loaded().await?;
    state.store.get_by_epoch(epoch)
}

/// `GET /epochs`: the whole series, or a window when both `limit` and `offset` are given.
pub async fn list_epochs(
    State(state): State<AppState>,
    Query(query): Query<EpochsQuery>,
) -> std::result::Result<Json<Vec<StateVector>>, ApiError> {
    let limit = query.limit.as_deref().map(|l| parse_int("limit", l)).transpose()?;
    let offset = query.offset.as_deref().map(|o| parse_int("offset", o)).transpose()?;

    state.store.ensure_loaded().await?;
    let series = state.store.get_all()?;

    match (limit, offset) {
        (Some(limit), Some(offset)) => {
            let window = range_slice(&series, limit, offset)?;
            info!(limit, offset, returned = window.len(), "served epoch window");
            Ok(Json(window))
        }
        _ => Ok(Json(series)),
    }
}

/// `GET /epochs/{epoch}`.
pub async fn get_epoch(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> std::result::Result<Json<StateVector>, ApiError> {
    Ok(Json(lookup(&state, &epoch).await?))
}

/// `GET /epochs/{epoch}/speed`: single-element array.
pub async fn get_epoch_speed(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> std::result::Result<Json<Vec<f64>>, ApiError> {
    let record = lookup(&state, &epoch).await?;
    Ok(Json(vec![instantaneous_speed(&record)?]))
}

/// `GET /epochs/{epoch}/location`.
pub async fn get_epoch_location(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> std::result::Result<Json<LocationResponse>, ApiError> {
    let record = lookup(&state, &epoch).await?;
    let location = state.locator.locate(&record).await?;
    Ok(Json(LocationResponse {
        lat: location.lat,
        lon: location.lon,
        height: location.height,
        location: location.place,
    }))
}

/// `GET /now`: the sample closest to the current time and its speed.
pub async fn get_now(
    State(state): State<AppState>,
) -> std::result::Result<Json<NowResponse>, ApiError> {
    state.store.ensure_loaded().await?;
    let series = state.store.get_all()?;
    let nearest = nearest_to_now(&series)?;
    let speed = instantaneous_speed(nearest)?;
    Ok(Json(NowResponse {
        state_vector: nearest.clone(),
        speed,
    }))
}
