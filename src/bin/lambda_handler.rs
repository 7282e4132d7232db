//! AWS Lambda handler for the calculator API
//!
//! Serves the same routes as `tvm_server` through a Lambda Function URL.
//! Allowed browser origins come from TVM_ALLOWED_ORIGINS.

use std::collections::HashMap;
use std::sync::Arc;

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use log::{debug, info};
use serde::Serialize;
use serde_json::{json, Value};

use tvm_calculator::api::{self, ApiError};
use tvm_calculator::server::ServerConfig;

fn from_result<T: Serialize>(route: &str, result: Result<T, ApiError>) -> (u16, Value) {
    match result {
        Ok(body) => match serde_json::to_value(body) {
            Ok(value) => (200, value),
            Err(e) => (500, json!({ "error": e.to_string() })),
        },
        Err(e) => {
            e.log(route);
            (e.status_code(), e.body())
        }
    }
}

/// Request body as text; binary bodies are accepted when they are UTF-8
fn body_text(event: &Request) -> &str {
    match event.body() {
        Body::Text(s) => s.as_str(),
        Body::Binary(b) => std::str::from_utf8(b).unwrap_or(""),
        Body::Empty => "",
    }
}

fn query_params(event: &Request) -> HashMap<String, String> {
    event
        .query_string_parameters()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Route a request to the API boundary
fn route(event: &Request) -> (u16, Value) {
    let method = event.method().as_str();
    let path = event.uri().path();
    debug!("{} {}", method, path);

    match (method, path) {
        ("GET", "/calculateEAR") => from_result(path, api::ear_lookup(&query_params(event))),
        ("GET", "/calculateAPR") => from_result(path, api::apr_lookup(&query_params(event))),
        ("POST", "/calculateTimeValue") => {
            let result = api::parse_time_value_request(body_text(event))
                .and_then(|req| api::evaluate(&req));
            from_result(path, result)
        }
        ("POST", "/table") => from_result(path, api::receive_table(body_text(event))),
        ("GET", "/health") => (
            200,
            json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") }),
        ),
        _ => (404, json!({ "error": format!("Not found: {} {}", method, path) })),
    }
}

/// Origin echoed back when the caller is on the allow list
fn allowed_origin<'a>(event: &'a Request, allowed_origins: &[String]) -> Option<&'a str> {
    let origin = event.headers().get("origin")?.to_str().ok()?;
    allowed_origins
        .iter()
        .any(|allowed| allowed == origin)
        .then_some(origin)
}

fn respond(event: &Request, allowed_origins: &[String]) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder();
    if let Some(origin) = allowed_origin(event, allowed_origins) {
        builder = builder
            .header("Access-Control-Allow-Origin", origin)
            .header("Access-Control-Allow-Credentials", "true")
            .header("Access-Control-Expose-Headers", "Content-Length")
            .header("Vary", "Origin");
    }

    // CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(builder
            .status(200)
            .header("Access-Control-Allow-Methods", "GET, POST, PUT, PATCH, DELETE, OPTIONS")
            .header("Access-Control-Allow-Headers", "Origin, Content-Type, Accept")
            .header("Access-Control-Max-Age", "43200")
            .body(Body::Empty)?);
    }

    let (status, body) = route(event);
    Ok(builder
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body.to_string()))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = ServerConfig::from_env()?;
    info!("allowed origins: {}", config.allowed_origins.join(", "));

    let allowed_origins = Arc::new(config.allowed_origins);
    run(service_fn(move |event: Request| {
        let allowed_origins = Arc::clone(&allowed_origins);
        async move { respond(&event, &allowed_origins) }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::Method;

    fn event(method: Method, path: &str, body: Body) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(path)
            .body(body)
            .unwrap()
    }

    fn with_origin(mut request: Request, origin: &str) -> Request {
        request
            .headers_mut()
            .insert("origin", origin.parse().unwrap());
        request
    }

    fn origins() -> Vec<String> {
        vec!["http://localhost:3000".to_string()]
    }

    fn body_json(response: &Response<Body>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_ear_route_with_cors() {
        let params: HashMap<String, String> = [("apr", "12"), ("n", "12")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let request = with_origin(
            event(Method::GET, "/calculateEAR", Body::Empty).with_query_string_parameters(params),
            "http://localhost:3000",
        );

        let response = respond(&request, &origins()).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), json!({ "EAR": 12.6825 }));
        assert_eq!(
            response.headers()["Access-Control-Allow-Origin"],
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_time_value_route() {
        let body = r#"{"rate":0,"nper":4,"pmt":-25,"pv":0,"fv":0,"type":1,"calcType":"FV"}"#;
        let (status, value) = route(&event(Method::POST, "/calculateTimeValue", Body::from(body)));
        assert_eq!(status, 200);
        assert_eq!(value["result"], json!(100.0));
        assert_eq!(value["type"], json!(1));

        // Function URLs hand over base64 bodies already decoded as binary
        let binary = Body::Binary(body.as_bytes().to_vec());
        let (status, value) = route(&event(Method::POST, "/calculateTimeValue", binary));
        assert_eq!(status, 200);
        assert_eq!(value["result"], json!(100.0));
    }

    #[test]
    fn test_errors_and_unknown_routes() {
        let (status, body) = route(&event(Method::POST, "/calculateTimeValue", Body::Empty));
        assert_eq!(status, 400);
        assert_eq!(body, json!({ "error": "Invalid request" }));

        let (status, body) = route(&event(Method::GET, "/calculateAPR", Body::Empty));
        assert_eq!(status, 400);
        assert_eq!(body, json!({ "error": "Invalid EAR format" }));

        let (status, _) = route(&event(Method::GET, "/calculateTimeValue", Body::Empty));
        assert_eq!(status, 404);
    }

    #[test]
    fn test_preflight_and_foreign_origin() {
        let request = with_origin(
            event(Method::OPTIONS, "/calculateTimeValue", Body::Empty),
            "http://localhost:3000",
        );
        let response = respond(&request, &origins()).unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.body().is_empty());
        assert!(response.headers().contains_key("Access-Control-Allow-Methods"));
        assert_eq!(response.headers()["Access-Control-Max-Age"], "43200");

        let request = with_origin(
            event(Method::GET, "/health", Body::Empty),
            "https://elsewhere.example",
        );
        let response = respond(&request, &origins()).unwrap();
        assert_eq!(response.status(), 200);
        assert!(!response.headers().contains_key("Access-Control-Allow-Origin"));
    }
}
