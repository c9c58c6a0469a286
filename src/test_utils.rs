// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the Kubernetes API server.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// Address handed out to Services that do not request one
pub const ALLOCATED_CLUSTER_IP: &str = "10.96.0.42";

/// A request seen by the mock API server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    objects: BTreeMap<String, Value>,
    canned: HashMap<(String, String), (u16, String)>,
    watch_responses: VecDeque<Vec<Value>>,
    requests: Vec<RecordedRequest>,
    last_version: u64,
}

impl MockState {
    fn next_version(&mut self) -> String {
        self.last_version += 1;
        self.last_version.to_string()
    }
}

/// An in-memory Kubernetes API server.
///
/// Objects are stored by URL path. GET/POST/PUT follow the API server rules the
/// operator relies on: 404 for missing objects, 409 on resourceVersion mismatch,
/// resourceVersion only bumped when an update changes something, and clusterIP
/// allocation for Services.
#[derive(Clone, Default)]
pub struct MockService {
    state: Arc<Mutex<MockState>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an object
    pub fn with_object<K>(self, object: &K) -> Self
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        self.put_object(object);
        self
    }

    /// Always answer GET requests for `path` with the given response
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.canned("GET", path, status, body)
    }

    /// Always answer POST requests for `path` with the given response
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.canned("POST", path, status, body)
    }

    /// Always answer PUT requests for `path` with the given response
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.canned("PUT", path, status, body)
    }

    /// Queue the events streamed back by the next watch request
    pub fn with_watch_events(self, events: Vec<Value>) -> Self {
        self.state.lock().unwrap().watch_responses.push_back(events);
        self
    }

    fn canned(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().canned.insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Build a kube Client backed by this mock; the mock stays inspectable.
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    /// Store (or overwrite) an object, assigning a resourceVersion if it has none
    pub fn put_object<K>(&self, object: &K)
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let path = object_path::<K>(object.namespace().as_deref(), &object.name_any());
        let mut value = serde_json::to_value(object).unwrap();
        let mut state = self.state.lock().unwrap();
        if value["metadata"]["resourceVersion"].is_null() {
            value["metadata"]["resourceVersion"] = json!(state.next_version());
        }
        state.objects.insert(path, value);
    }

    /// Fetch a stored object
    pub fn object<K>(&self, namespace: &str, name: &str) -> Option<K>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned,
    {
        let path = object_path::<K>(Some(namespace), name);
        let state = self.state.lock().unwrap();
        state
            .objects
            .get(&path)
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests that create or replace objects
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST" || r.method == "PUT")
            .collect()
    }

    fn handle(&self, method: &str, path: &str, query: &str, body: Option<Value>) -> (u16, String) {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            body: body.clone(),
        });

        if let Some(resp) = state.canned.get(&(method.to_string(), path.to_string())) {
            return resp.clone();
        }

        match method {
            "GET" if query.contains("watch=true") => {
                let events = state.watch_responses.pop_front().unwrap_or_default();
                let lines: Vec<String> = events.iter().map(Value::to_string).collect();
                (200, lines.join("\n"))
            }
            "GET" => match state.objects.get(path) {
                Some(obj) => (200, obj.to_string()),
                None if is_collection(path) => {
                    let prefix = format!("{}/", path);
                    let items: Vec<Value> = state
                        .objects
                        .iter()
                        .filter(|(p, _)| p.starts_with(&prefix) && !p[prefix.len()..].contains('/'))
                        .map(|(_, v)| v.clone())
                        .collect();
                    let list = json!({
                        "apiVersion": "v1",
                        "kind": "List",
                        "metadata": { "resourceVersion": state.last_version.to_string() },
                        "items": items,
                    });
                    (200, list.to_string())
                }
                None => (404, not_found_json("object", path)),
            },
            "POST" => create(&mut state, path, body.unwrap_or_default()),
            "PUT" => replace(&mut state, path, body.unwrap_or_default()),
            _ => (405, status_json(405, "MethodNotAllowed", "method not allowed")),
        }
    }
}

fn create(state: &mut MockState, collection: &str, mut obj: Value) -> (u16, String) {
    let Some(name) = obj["metadata"]["name"].as_str().map(str::to_string) else {
        return (422, status_json(422, "Invalid", "metadata.name: Required value"));
    };
    let path = format!("{}/{}", collection, name);

    if state.objects.contains_key(&path) {
        return (409, status_json(409, "AlreadyExists", &format!("{} already exists", name)));
    }
    if !obj["metadata"]["resourceVersion"].is_null() {
        return (
            400,
            status_json(400, "BadRequest", "resourceVersion should not be set on objects to be created"),
        );
    }

    obj["metadata"]["resourceVersion"] = json!(state.next_version());
    obj["metadata"]["uid"] = json!(format!("uid-{}", name));
    if obj["kind"] == "Service" && obj["spec"]["clusterIP"].is_null() {
        obj["spec"]["clusterIP"] = json!(ALLOCATED_CLUSTER_IP);
        obj["spec"]["clusterIPs"] = json!([ALLOCATED_CLUSTER_IP]);
        obj["spec"]["ipFamilies"] = json!(["IPv4"]);
        obj["spec"]["ipFamilyPolicy"] = json!("SingleStack");
    }

    state.objects.insert(path, obj.clone());
    (201, obj.to_string())
}

fn replace(state: &mut MockState, path: &str, mut obj: Value) -> (u16, String) {
    let Some(stored) = state.objects.get(path).cloned() else {
        return (404, not_found_json("object", path));
    };

    if obj["metadata"]["resourceVersion"] != stored["metadata"]["resourceVersion"] {
        return (
            409,
            status_json(409, "Conflict", "the object has been modified; please apply your changes to the latest version"),
        );
    }
    if obj["kind"] == "Service"
        && !stored["spec"]["clusterIP"].is_null()
        && obj["spec"]["clusterIP"] != stored["spec"]["clusterIP"]
    {
        return (
            422,
            status_json(422, "Invalid", "spec.clusterIPs[0]: Invalid value: primary clusterIP can not be unset"),
        );
    }

    if let Some(uid) = stored["metadata"].get("uid") {
        obj["metadata"]["uid"] = uid.clone();
    }
    if obj != stored {
        obj["metadata"]["resourceVersion"] = json!(state.next_version());
    }

    state.objects.insert(path.to_string(), obj.clone());
    (200, obj.to_string())
}

/// URL path of a namespaced object
pub fn object_path<K: Resource<DynamicType = ()>>(namespace: Option<&str>, name: &str) -> String {
    format!("{}/{}", K::url_path(&(), namespace), name)
}

fn is_collection(path: &str) -> bool {
    let segments = path.split('/').filter(|s| !s.is_empty()).count();
    (path.starts_with("/api/") && segments == 5) || (path.starts_with("/apis/") && segments == 6)
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
        let this = self.clone();

        Box::pin(async move {
            let method = req.method().to_string();
            let path = req.uri().path().to_string();
            let query = req.uri().query().unwrap_or_default().to_string();

            let bytes = req.into_body().collect().await?.to_bytes();
            let body = if bytes.is_empty() {
                None
            } else {
                Some(serde_json::from_slice(&bytes)?)
            };

            let (status, body) = this.handle(&method, &path, &query, body);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))?)
        })
    }
}

fn status_json(code: u16, reason: &str, message: &str) -> String {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a 409 conflict response
pub fn conflict_json(message: &str) -> String {
    status_json(409, "Conflict", message)
}

/// Create a 500 internal error response
pub fn internal_error_json(message: &str) -> String {
    status_json(500, "InternalError", message)
}
