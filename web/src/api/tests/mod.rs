use axum::{
    body::Body,
    http::{Request, header::CONTENT_TYPE},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::Value;

mod map;

/// Host header used by every test request; the map link handler echoes it
/// back in the generated URL
const HOST: &str = "example.com";

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .header("Host", HOST)
        .body(Body::empty())
        .expect("Failed to build request")
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("Host", HOST)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body was not valid json")
}

async fn body_string(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body was not valid utf-8")
}
