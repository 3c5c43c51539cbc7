//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

use datacollector::config::{ProvisioningConfig, ServerConfig};
use datacollector::lwm2m::ServerClient;
use datacollector::resilience::RetryPolicy;
use datacollector::RegistrationHandler;

/// A request seen by the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

type Responder = dyn Fn(&RecordedRequest, usize) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    respond: Arc<Responder>,
}

/// Handle to a running mock device-management server.
pub struct MockServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
            api_path: "/api/clients/".to_string(),
        }
    }

    /// Handler with the default sequence and a 1ms backoff step.
    pub fn handler(&self) -> RegistrationHandler {
        self.handler_with(ProvisioningConfig::default())
    }

    pub fn handler_with(&self, plan: ProvisioningConfig) -> RegistrationHandler {
        let client = ServerClient::new(&self.server_config()).unwrap();
        RegistrationHandler::new(client, fast_policy(), plan)
    }
}

/// Five attempts with a tiny step so tests stay fast.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(5, Duration::from_millis(1))
}

/// Start a programmable mock server.
///
/// `respond` receives the request and how many earlier requests hit the
/// same path, and returns `(status, body)`.
pub async fn start_mock_server<F>(respond: F) -> MockServer
where
    F: Fn(&RecordedRequest, usize) -> (u16, String) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: requests.clone(),
        respond: Arc::new(respond),
    };

    let app = Router::new().fallback(record_and_respond).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer { addr, requests }
}

/// A server that accepts every call like a healthy client would.
pub async fn start_healthy_server() -> MockServer {
    start_mock_server(|request, _| (200, healthy_body(&request.method))).await
}

/// The body a healthy client produces for `method`.
pub fn healthy_body(method: &Method) -> String {
    if *method == Method::PUT {
        r#"{"status":"CHANGED","valid":true,"success":true}"#.to_string()
    } else {
        r#"{"status":"CONTENT","valid":true,"success":true,"content":{"id":0}}"#.to_string()
    }
}

async fn record_and_respond(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
    };

    let previous = {
        let mut requests = state.requests.lock().unwrap();
        let previous = requests.iter().filter(|r| r.path == request.path).count();
        requests.push(request.clone());
        previous
    };

    let (status, body) = (state.respond)(&request, previous);
    (StatusCode::from_u16(status).unwrap(), body)
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
