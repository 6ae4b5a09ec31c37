//! Location Search Handler
//!
//! 按坐标半径检索民宿。坐标存在民宿的 location 字段里，距离用
//! haversine 公式在应用侧计算。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::serde_helpers;
use crate::db::repository::HomestayRepository;
use crate::utils::{AppError, AppResult};

/// 默认检索半径 (米)
const DEFAULT_RADIUS_METERS: f64 = 10_000.0;

/// 地球平均半径 (米)
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub lat: Option<String>,
    pub long: Option<String>,
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyHomestay {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub lat: f64,
    pub long: f64,
    pub dist_meters: f64,
}

/// Haversine distance between two coordinates, in meters
fn haversine_meters(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_long = (long2 - long1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_long / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

/// GET /api/location?lat=&long=&radius= - 附近民宿检索
pub async fn nearby(
    State(state): State<ServerState>,
    Query(params): Query<LocationParams>,
) -> AppResult<Json<Vec<NearbyHomestay>>> {
    let (lat, long) = match (&params.lat, &params.long) {
        (Some(lat), Some(long)) if !lat.is_empty() && !long.is_empty() => (lat, long),
        _ => {
            return Err(AppError::validation("Latitude and Longitude are required"));
        }
    };

    let lat: f64 = lat
        .parse()
        .map_err(|_| AppError::validation("Invalid latitude or longitude"))?;
    let long: f64 = long
        .parse()
        .map_err(|_| AppError::validation("Invalid latitude or longitude"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&long) {
        return Err(AppError::validation("Invalid latitude or longitude"));
    }

    let radius = params.radius.unwrap_or(DEFAULT_RADIUS_METERS);

    let repo = HomestayRepository::new(state.db.clone());
    let homestays = repo
        .find_with_coordinates()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let mut nearby: Vec<NearbyHomestay> = homestays
        .into_iter()
        .filter_map(|h| {
            let id = h.id.clone()?;
            let (h_lat, h_long) = (h.location.lat?, h.location.long?);
            let dist = haversine_meters(lat, long, h_lat, h_long);
            (dist <= radius).then(|| NearbyHomestay {
                id,
                name: h.name,
                lat: h_lat,
                long: h_long,
                dist_meters: dist,
            })
        })
        .collect();

    if nearby.is_empty() {
        return Err(AppError::not_found(
            "No homestays found within the specified radius",
        ));
    }

    nearby.sort_by(|a, b| a.dist_meters.total_cmp(&b.dist_meters));
    Ok(Json(nearby))
}

#[cfg(test)]
mod tests {
    use super::haversine_meters;

    #[test]
    fn zero_distance_for_same_point() {
        assert!(haversine_meters(59.33, 18.06, 59.33, 18.06) < 1e-6);
    }

    #[test]
    fn known_distance_is_roughly_right() {
        // Stockholm -> Uppsala, ~63km
        let d = haversine_meters(59.3293, 18.0686, 59.8586, 17.6389);
        assert!((60_000.0..70_000.0).contains(&d), "got {d}");
    }
}
