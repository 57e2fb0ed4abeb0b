use crate::body::{self, Text};
use crate::mapping;
use crate::routes::State;
use hyper::Response;

/// Reload the mapping file, gated by the configured shared secret. A failed
/// reload keeps the previous table so the service never ends up empty.
pub async fn get(state: &State, query: Option<&str>, client: &str) -> Response<Text> {
    let configured = state.config.rehash_key.as_deref().unwrap_or("");
    if configured.is_empty() {
        return Response::new(body::text("auth key not set\n"));
    }

    log::info!("{} rehash requested", client);
    if query_param(query, "key") != Some(configured) {
        return Response::new(body::text("invalid auth key\n"));
    }

    // Rebuild off to the side; only a complete table is ever published.
    match mapping::load(&state.config.map_file) {
        Ok(new_map) => {
            let count = new_map.len();
            *state.map.write().await = new_map;
            Response::new(body::text(format!("Rehash: OK\nLoaded {} services", count)))
        }
        Err(e) => {
            log::error!("rehash error: {}", e);
            Response::new(body::text("error reloading service map\n"))
        }
    }
}

/// First value for `name` in a raw query string. Values are compared
/// verbatim; no percent-decoding.
fn query_param<'q>(query: Option<&'q str>, name: &str) -> Option<&'q str> {
    query?.split('&').find_map(|pair| match pair.split_once('=') {
        Some((k, v)) if k == name => Some(v),
        _ => None,
    })
}
