use crate::body::{self, Text};
use crate::mapping::ServiceMap;
use hyper::Response;
use std::fmt::Write;

/// List every mapping that is currently active, one row per name. The map's
/// key order gives the lexicographic sort.
pub fn get(map: &ServiceMap, now: i64) -> Response<Text> {
    let mut out = String::from("All mappings:\n");
    for (name, mapping) in map {
        if !mapping.allowed(now) {
            continue;
        }
        let _ = writeln!(out, "{:<20} {}", name, mapping.target);
    }
    Response::new(body::text(out))
}
