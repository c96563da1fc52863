//! Public site details for the landing page

use axum::{Json, Router, extract::State, routing::get};
use chrono::NaiveDate;
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/site", get(site_info))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub partner_one: String,
    pub partner_two: String,
    pub couple_names: String,
    pub wedding_date: Option<NaiveDate>,
    pub days_until_wedding: Option<i64>,
    pub app_url: String,
}

/// GET /api/site - Couple, date and countdown
async fn site_info(State(state): State<AppState>) -> Json<SiteInfo> {
    let config = &state.config;
    Json(SiteInfo {
        partner_one: config.partner_one.clone(),
        partner_two: config.partner_two.clone(),
        couple_names: config.couple_names(),
        wedding_date: config.wedding_date,
        days_until_wedding: config.days_until_wedding(),
        app_url: config.app_url.clone(),
    })
}
