// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test doubles: a mock Kubernetes API and a scripted accessor.

use crate::accessor::{ControlPlaneAccessor, Lookup, ResolvedFields, TargetRef};
use crate::error::LookupError;
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::core::ErrorResponse;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tower::Service;

/// A request received by [`MockService`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Bytes,
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Each (method, path) has a queue of responses; the last one is repeated once
/// the queue is drained.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for requests with this method and path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Build a kube Client from this mock service. The service stays usable for
    /// inspecting requests afterwards.
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received for this method and path
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn next_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.next_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = match req.into_body().collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(_) => Bytes::new(),
            };
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path: path.clone(),
                body,
            });

            let (status, body) = response.unwrap_or_else(|| (404, not_found_json("object", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a mock secret JSON response; values are base64 encoded by k8s-openapi
pub fn secret_json(name: &str, namespace: &str, data: &[(&str, &str)]) -> String {
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(
            data.iter()
                .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
                .collect(),
        ),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    };
    serde_json::to_string(&secret).unwrap()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 403 forbidden response
pub fn forbidden_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" is forbidden", resource, name),
        "reason": "Forbidden",
        "code": 403
    })
    .to_string()
}

pub fn fields(entries: &[(&str, &str)]) -> ResolvedFields {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Bytes::from(v.to_string())))
        .collect()
}

pub fn forbidden_error() -> LookupError {
    LookupError::Kube(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: "secrets is forbidden".to_string(),
        reason: "Forbidden".to_string(),
        code: 403,
    }))
}

/// One scripted lookup outcome
#[derive(Debug, Clone)]
pub enum Step {
    Found(ResolvedFields),
    NotFound,
    Forbidden,
}

/// In-memory accessor replaying a script per target and recording every lookup.
///
/// The last step of a script repeats forever; unscripted targets are never found.
#[derive(Default)]
pub struct ScriptedAccessor {
    scripts: Mutex<HashMap<TargetRef, VecDeque<Step>>>,
    calls: Mutex<Vec<(TargetRef, Instant)>>,
    in_flight: Mutex<HashMap<TargetRef, usize>>,
    max_in_flight: Mutex<usize>,
}

impl ScriptedAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, name: &str, namespace: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(TargetRef::new(name, namespace), steps.into());
        self
    }

    /// Target is absent for `attempt - 1` lookups and present from then on
    pub fn appears_on(self, name: &str, namespace: &str, attempt: u32, found: ResolvedFields) -> Self {
        let mut steps = vec![Step::NotFound; attempt.saturating_sub(1) as usize];
        steps.push(Step::Found(found));
        self.script(name, namespace, steps)
    }

    pub fn lookups(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn lookups_for(&self, name: &str, namespace: &str) -> usize {
        let target = TargetRef::new(name, namespace);
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == target)
            .count()
    }

    /// Time between consecutive lookups of one target
    pub fn gaps_for(&self, name: &str, namespace: &str) -> Vec<Duration> {
        let target = TargetRef::new(name, namespace);
        let times: Vec<Instant> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, at)| *at)
            .collect();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Highest number of overlapping lookups seen for any single target
    pub fn max_in_flight(&self) -> usize {
        *self.max_in_flight.lock().unwrap()
    }

    fn next_step(&self, target: &TargetRef) -> Step {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(target) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Step::NotFound),
            None => Step::NotFound,
        }
    }
}

#[async_trait]
impl ControlPlaneAccessor for ScriptedAccessor {
    async fn lookup(&self, target: &TargetRef) -> Result<Lookup, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.clone(), Instant::now()));
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            let count = in_flight.entry(target.clone()).or_default();
            *count += 1;
            let mut max = self.max_in_flight.lock().unwrap();
            *max = (*max).max(*count);
        }

        // Yield so overlapping lookups for one target would be observable
        tokio::task::yield_now().await;

        *self
            .in_flight
            .lock()
            .unwrap()
            .get_mut(target)
            .unwrap() -= 1;

        match self.next_step(target) {
            Step::Found(fields) => Ok(Lookup::Found(fields)),
            Step::NotFound => Ok(Lookup::NotFound),
            Step::Forbidden => Err(forbidden_error()),
        }
    }
}
