use crate::{
    LOCATION_PREFIX,
    error::{Detail, Error, ValidationErrors},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use libloc::{Location, TimeOfDay, loadable::Loadable};
use serde_json::Value;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{LOCATION_PREFIX}/"),
            get(list_locations).post(add_location),
        )
        .route(
            &format!("{LOCATION_PREFIX}/{{id}}/"),
            get(show_location)
                .put(modify_location)
                .delete(delete_location),
        )
}

/// The payload accepted by both create and update. Every field is optional so
/// that update can merge only the fields that were supplied; create checks
/// the required ones itself and reports them all at once.
#[derive(Debug, Default)]
struct LocationParams {
    name: Option<String>,
    lat: Option<f64>,
    long: Option<f64>,
    time: Option<String>,
}

impl LocationParams {
    /// Pulls the known fields out of the decoded payload. A wrong-typed field
    /// lands in `errors` under its own name so the client sees it alongside
    /// any other field failures; `null` counts as absent.
    fn from_value(value: Value, errors: &mut ValidationErrors) -> Self {
        let mut params = Self::default();
        let Value::Object(mut fields) = value else {
            errors.add("non_field_errors", "Invalid data. Expected a dictionary.");
            return params;
        };
        match fields.remove("name") {
            Some(Value::String(name)) => params.name = Some(name),
            Some(Value::Null) | None => (),
            Some(_) => errors.add("name", "Not a valid string."),
        }
        match fields.remove("lat") {
            Some(Value::Null) | None => (),
            Some(value) => match value.as_f64() {
                Some(lat) => params.lat = Some(lat),
                None => errors.add("lat", "A valid number is required."),
            },
        }
        match fields.remove("long") {
            Some(Value::Null) | None => (),
            Some(value) => match value.as_f64() {
                Some(long) => params.long = Some(long),
                None => errors.add("long", "A valid number is required."),
            },
        }
        match fields.remove("time") {
            Some(Value::String(time)) => params.time = Some(time),
            Some(Value::Null) | None => (),
            Some(_) => errors.add("time", "Time has wrong format. Use HH:MM:SS instead."),
        }
        params
    }
}

const NAME_MAX_LENGTH: usize = 50;

async fn validate_name(
    name: &str,
    exclude: Option<i64>,
    state: &AppState,
    errors: &mut ValidationErrors,
) -> Result<(), Error> {
    if name.is_empty() {
        errors.add("name", "This field may not be blank.");
    } else if name.chars().count() > NAME_MAX_LENGTH {
        errors.add(
            "name",
            format!("Ensure this field has no more than {NAME_MAX_LENGTH} characters."),
        );
    } else if Location::name_in_use(name, exclude, &state.db).await? {
        errors.add("name", "location with this name already exists.");
    }
    Ok(())
}

fn validate_time(value: &str, errors: &mut ValidationErrors) -> Option<TimeOfDay> {
    match value.parse::<TimeOfDay>() {
        Ok(time) => Some(time),
        Err(_) => {
            errors.add("time", "Time has wrong format. Use HH:MM:SS instead.");
            None
        }
    }
}

fn validate_coordinates(
    lat: Option<f64>,
    long: Option<f64>,
    state: &AppState,
    errors: &mut ValidationErrors,
) {
    if !state.config.coordinate_limits {
        return;
    }
    if let Some(lat) = lat {
        if !(-90.0..=90.0).contains(&lat) {
            errors.add("lat", "Ensure this value is between -90 and 90.");
        }
    }
    if let Some(long) = long {
        if !(-180.0..=180.0).contains(&long) {
            errors.add("long", "Ensure this value is between -180 and 180.");
        }
    }
}

async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>, Error> {
    let locations = Location::load_all(None, &state.db).await?;
    Ok(Json(locations))
}

async fn add_location(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Location>, Error> {
    let Json(value) = body?;
    let mut errors = ValidationErrors::default();
    let params = LocationParams::from_value(value, &mut errors);

    if let Some(ref name) = params.name {
        validate_name(name, None, &state, &mut errors).await?;
    } else if !errors.contains("name") {
        errors.add("name", "This field is required.");
    }
    if params.lat.is_none() && !errors.contains("lat") {
        errors.add("lat", "This field is required.");
    }
    if params.long.is_none() && !errors.contains("long") {
        errors.add("long", "This field is required.");
    }
    let time = match params.time {
        Some(ref value) => validate_time(value, &mut errors),
        None => {
            if !errors.contains("time") {
                errors.add("time", "This field is required.");
            }
            None
        }
    };
    validate_coordinates(params.lat, params.long, &state, &mut errors);
    errors.into_result()?;

    let (Some(name), Some(lat), Some(long), Some(time)) =
        (params.name, params.lat, params.long, time)
    else {
        // presence was validated above
        return Err(anyhow::anyhow!("missing required fields after validation").into());
    };
    let mut location = Location::new(name, lat, long, time);
    location.insert(&state.db).await?;
    Ok(Json(location))
}

async fn show_location(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Location>, Error> {
    let location = Location::load(id, &state.db).await?;
    Ok(Json(location))
}

async fn modify_location(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Location>, Error> {
    let Json(value) = body?;
    let mut location = Location::load(id, &state.db).await?;

    let mut errors = ValidationErrors::default();
    let params = LocationParams::from_value(value, &mut errors);
    if let Some(ref name) = params.name {
        validate_name(name, Some(id), &state, &mut errors).await?;
    }
    let time = match params.time {
        Some(ref value) => validate_time(value, &mut errors),
        None => None,
    };
    validate_coordinates(params.lat, params.long, &state, &mut errors);
    errors.into_result()?;

    // merge only the supplied fields; everything else keeps its prior value
    if let Some(name) = params.name {
        location.name = name;
    }
    if let Some(lat) = params.lat {
        location.latitude = lat;
    }
    if let Some(long) = params.long {
        location.longitude = long;
    }
    if let Some(time) = time {
        location.time = time;
    }
    location.update(&state.db).await?;
    Ok(Json(location))
}

async fn delete_location(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let mut location = Location::load(id, &state.db).await?;
    let name = location.name.clone();
    location.delete(&state.db).await?;
    Ok((
        StatusCode::NO_CONTENT,
        Json(Detail {
            detail: format!("location '{name}' got deleted successfully."),
        }),
    ))
}
