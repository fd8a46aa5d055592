//! The bridge between location records and the rendered map page

use crate::{error::Error, state::SharedState};
use libloc::Location;
use minijinja::context;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Marker<'a> {
    lat: f64,
    long: f64,
    label: &'a str,
}

/// Renders the map page with one marker per location
fn render(
    tmpl: &minijinja::Environment<'_>,
    locations: &[Location],
) -> Result<String, minijinja::Error> {
    let markers: Vec<Marker> = locations
        .iter()
        .map(|loc| Marker {
            lat: loc.latitude,
            long: loc.longitude,
            label: &loc.name,
        })
        .collect();
    tmpl.get_template("map.html")?.render(context! { markers })
}

/// Renders the map page and persists it to the single artifact slot,
/// overwriting whatever was there before. Concurrent calls race on the same
/// path; the last write wins.
pub(crate) async fn render_to_file(
    state: &SharedState,
    locations: &[Location],
) -> Result<(), Error> {
    let page = render(&state.tmpl, locations)?;
    tokio::fs::write(state.map_path(), page)
        .await
        .map_err(|e| anyhow::Error::new(e).context("Failed to write the map artifact"))?;
    Ok(())
}
