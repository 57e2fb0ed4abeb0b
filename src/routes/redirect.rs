use crate::body::{self, Text};
use crate::mapping::ServiceMap;
use hyper::header::{HeaderValue, LOCATION};
use hyper::{Response, StatusCode};

/// Look `key` up in the table and redirect if it names an active mapping.
/// Misses are soft: a plain 200 with an informational body, never an HTTP
/// error.
pub fn get(map: &ServiceMap, key: &str, path: &str, client: &str, now: i64) -> Response<Text> {
    let mapping = match map.get(key).filter(|m| m.allowed(now)) {
        Some(m) => m,
        None => {
            log::info!("{} {} -> ???", client, path);
            return Response::new(body::text("unknown service\n"));
        }
    };

    let location = match HeaderValue::from_str(&mapping.target) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} {} -> [invalid target] {}", client, path, e);
            return Response::new(body::text("unknown service\n"));
        }
    };

    let status = mapping
        .http_code
        .filter(|&code| code > 0)
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::SEE_OTHER);

    log::info!("{} {} -> {}", client, path, mapping.target);
    let mut resp = Response::new(body::empty());
    *resp.status_mut() = status;
    resp.headers_mut().insert(LOCATION, location);
    resp
}
