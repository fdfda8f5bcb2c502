#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Mutex;
use visitmap::{FetchError, Transport};

/// One recorded GET.
#[derive(Clone, Debug)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl Request {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn offset(&self) -> Option<usize> {
        self.param("offset").map(|s| s.parse().unwrap())
    }
}

/// What a scripted route answers with.
pub enum Reply {
    Json(Value),
    Status(u16, String),
    Raw(&'static str),
}

type Handler = Box<dyn Fn(&Request) -> Reply + Send + Sync>;

/// In-memory `Transport`: routes on URL suffix, records every request.
/// Unrouted URLs answer 404.
pub struct MockTransport {
    routes: Vec<(String, Handler)>,
    log: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self { routes: Vec::new(), log: Mutex::new(Vec::new()) }
    }

    pub fn route(mut self, suffix: &str, f: impl Fn(&Request) -> Reply + Send + Sync + 'static) -> Self {
        self.routes.push((suffix.to_string(), Box::new(f)));
        self
    }

    pub fn json(self, suffix: &str, body: Value) -> Self {
        self.route(suffix, move |_| Reply::Json(body.clone()))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, suffix: &str) -> Vec<Request> {
        self.requests().into_iter().filter(|r| r.url.ends_with(suffix)).collect()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, FetchError> {
        let req = Request {
            url: url.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        };
        self.log.lock().unwrap().push(req.clone());

        let reply = match self.routes.iter().find(|(suffix, _)| url.ends_with(suffix.as_str())) {
            Some((_, handler)) => handler(&req),
            None => Reply::Status(404, "404 page not found".to_string()),
        };
        match reply {
            Reply::Json(v) => Ok(serde_json::to_vec(&v).unwrap()),
            Reply::Raw(s) => Ok(s.as_bytes().to_vec()),
            Reply::Status(code, body) => Err(FetchError::Transport {
                url: url.to_string(),
                status: Some(code),
                message: format!("status {code}: {body}"),
            }),
        }
    }
}

// -------- fixtures --------

/// Food > Coffee Shop, the two-level forest used across tests.
pub fn food_forest() -> Value {
    json!({
        "response": {
            "categories": [
                {
                    "id": "top-food",
                    "name": "Food",
                    "categories": [
                        { "id": "child-coffee", "name": "Coffee Shop", "categories": [] }
                    ]
                }
            ]
        }
    })
}

pub fn venue_json(id: &str, name: &str, lat: f64, lng: f64, categories: &[(&str, &str)]) -> Value {
    let cats: Vec<Value> = categories.iter().map(|(id, name)| json!({ "id": id, "name": name })).collect();
    json!({ "id": id, "name": name, "location": { "lat": lat, "lng": lng }, "categories": cats })
}

/// Venue-history envelope with the given declared count and venues.
pub fn venue_history(count: usize, venues: Vec<Value>) -> Value {
    let items: Vec<Value> = venues.into_iter().map(|v| json!({ "venue": v })).collect();
    json!({ "response": { "venues": { "count": count, "items": items } } })
}

/// Plain venues `v{start}..v{end}` without categories.
pub fn venue_range(start: usize, end: usize) -> Vec<Value> {
    (start..end).map(|i| venue_json(&format!("v{i}"), &format!("Venue {i}"), 1.0, 2.0, &[])).collect()
}

/// Check-ins envelope; each item is `(created_at, venue_id)`.
pub fn checkin_page(count: usize, items: &[(i64, &str)]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|(ts, vid)| json!({ "createdAt": ts, "venue": { "id": vid } }))
        .collect();
    json!({ "response": { "checkins": { "count": count, "items": items } } })
}

pub fn empty_checkins(count: usize) -> Value {
    checkin_page(count, &[])
}
