use crate::state::AppState;
use axum::Router;

mod location;
mod map;

#[cfg(test)]
mod tests;

pub fn router() -> Router<AppState> {
    Router::new().merge(location::router()).merge(map::router())
}
