use crate::{LOCATION_PREFIX, error::Error, map, show_map_url, state::AppState};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
    routing::get,
};
use axum_extra::extract::Host;
use libloc::{Location, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(&format!("{LOCATION_PREFIX}/get-map/"), get(generate_map))
        .route(&format!("{LOCATION_PREFIX}/show-map/"), get(show_map))
}

#[derive(Debug, Deserialize)]
struct MapParams {
    between: Option<String>,
}

#[derive(Debug, Serialize)]
struct MapLink {
    url: String,
}

/// Splits a `HH:MM:SS-HH:MM:SS` query value into its beginning and ending
/// times. Anything that deviates from that exact shape is rejected.
fn parse_time_range(value: &str) -> Result<(TimeOfDay, TimeOfDay), Error> {
    fn format_error() -> Error {
        Error::BadQuery("query parameter should be in this format: '00:00:00-00:00:00'.".into())
    }

    let Some((begin, end)) = value.split_once('-') else {
        return Err(format_error());
    };
    let begin = begin.parse().map_err(|_| format_error())?;
    let end = end.parse().map_err(|_| format_error())?;
    Ok((begin, end))
}

async fn generate_map(
    Host(host): Host,
    headers: HeaderMap,
    State(state): State<AppState>,
    Query(params): Query<MapParams>,
) -> Result<Json<MapLink>, Error> {
    let between = params
        .between
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::BadQuery("You should set a query set".into()))?;

    let (begin, end) = parse_time_range(&between)?;
    if begin >= end {
        return Err(Error::BadQuery(
            "First time_set, should be set earlier than second time_set.".into(),
        ));
    }

    let locations = Location::load_between(begin, end, &state.db).await?;
    if locations.is_empty() {
        return Err(Error::NotFound(
            "No location has been set between this time.".into(),
        ));
    }

    map::render_to_file(&state, &locations).await?;

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    Ok(Json(MapLink {
        url: show_map_url(scheme, &host),
    }))
}

async fn show_map(State(state): State<AppState>) -> Result<Html<String>, Error> {
    match tokio::fs::read_to_string(state.map_path()).await {
        Ok(page) => Ok(Html(page)),
        // no map has been generated yet, show the placeholder page
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let page = state
                .tmpl
                .get_template("map_placeholder.html")?
                .render(minijinja::context! {})?;
            Ok(Html(page))
        }
        Err(e) => Err(anyhow::Error::new(e)
            .context("Failed to read the map artifact")
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_range() {
        let (begin, end) = parse_time_range("07:00:00-13:30:00").expect("failed to parse");
        assert_eq!(begin.to_string(), "07:00:00");
        assert_eq!(end.to_string(), "13:30:00");
    }

    #[test]
    fn parse_rejects_malformed_ranges() {
        for bad in [
            "07:00:00",
            "7:00:00-13:00:00",
            "07:00-13:00",
            "07:00:00-13:00:00-18:00:00",
            "07:00:00_13:00:00",
            "07:00:00-13:00:00 ",
            "between 7 and 1",
        ] {
            assert!(
                parse_time_range(bad).is_err(),
                "expected '{bad}' to be rejected"
            );
        }
    }
}
