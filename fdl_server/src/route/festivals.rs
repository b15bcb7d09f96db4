use axum::{extract::Query, http::StatusCode, Json};
use fdl_core::festival_client::{self, FestivalRecord, DEFAULT_YEAR};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    url: String,
    #[serde(default = "default_year")]
    year: i32,
}

fn default_year() -> i32 {
    DEFAULT_YEAR
}

/// Handle festival listing requests.
///
/// The listing `url` must be given in the query string; `year` defaults to
/// the reference year.
pub async fn handler(
    Query(query_params): Query<QueryParams>,
) -> Result<Json<Vec<FestivalRecord>>, (StatusCode, String)> {
    let harvest = festival_client::get(&query_params.url, query_params.year)
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(harvest.festivals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_defaults_to_reference_year() {
        let params: QueryParams =
            serde_json::from_str(r#"{ "url": "https://festivalkalender.example/2026" }"#).unwrap();
        assert_eq!(params.year, DEFAULT_YEAR);
        assert_eq!(params.url, "https://festivalkalender.example/2026");
    }
}
