use crate::body::{self, Text};
use crate::config::Config;
use crate::mapping::ServiceMap;
use crate::server::PeerAddr;
use hyper::{Request, Response};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

mod list;
mod redirect;
mod rehash;

pub struct State {
    pub config: Config,
    /// The live lookup table. Replaced wholesale by `/rehash`; the write
    /// guard is held only for the swap, never during the rebuild.
    pub map: RwLock<ServiceMap>,
}

const INDEX_BODY: &str =
    "This is a simple URL shortener. To propose a new redirect, ask the operator.\n";
const ROBOTS_BODY: &str = "User-agent: *\nDisallow: /\n";

pub async fn respond_to_request<B>(req: Request<B>, state: &State) -> Response<Text> {
    let client = client_addr(&req);
    let path = req.uri().path();

    match path {
        "/favicon.ico" => Response::new(body::empty()),
        "/" => Response::new(body::text(INDEX_BODY)),
        "/robots.txt" => Response::new(body::text(ROBOTS_BODY)),
        "/list" | "/index" => {
            log::info!("{} {}", client, path);
            list::get(&*state.map.read().await, unix_now())
        }
        "/rehash" => rehash::get(state, req.uri().query(), &client).await,
        _ => {
            let key = path.strip_prefix('/').unwrap_or(path);
            redirect::get(&*state.map.read().await, key, path, &client, unix_now())
        }
    }
}

/// Trust X-Real-IP from the fronting proxy; fall back to the raw peer.
fn client_addr<B>(req: &Request<B>) -> String {
    req.headers()
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            req.extensions()
                .get::<PeerAddr>()
                .map(|peer| peer.0.to_string())
                .unwrap_or_default()
        })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;
    use http_body_util::BodyExt;
    use hyper::header::LOCATION;
    use hyper::StatusCode;
    use std::path::PathBuf;

    fn state_with(entries: &[(&str, &str)]) -> State {
        let map = entries
            .iter()
            .map(|&(name, target)| {
                (
                    name.to_string(),
                    Mapping {
                        name: vec![name.to_string()],
                        target: target.to_string(),
                        http_code: None,
                        premier_time: None,
                        expire_time: None,
                    },
                )
            })
            .collect();
        State {
            config: Config {
                address: "127.0.0.1".to_string(),
                port: 8087,
                map_file: PathBuf::from("unused.map"),
                rehash_key: None,
            },
            map: RwLock::new(map),
        }
    }

    fn request(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    async fn body_text(resp: Response<Text>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn favicon_is_an_empty_success() {
        let state = state_with(&[]);

        let resp = respond_to_request(request("/favicon.ico"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "");
    }

    #[tokio::test]
    async fn root_serves_the_index_text() {
        let state = state_with(&[]);

        let resp = respond_to_request(request("/"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, INDEX_BODY);
    }

    #[tokio::test]
    async fn robots_disallows_everything() {
        let state = state_with(&[]);

        let resp = respond_to_request(request("/robots.txt"), &state).await;
        assert_eq!(body_text(resp).await, "User-agent: *\nDisallow: /\n");
    }

    #[tokio::test]
    async fn list_and_index_serve_the_listing() {
        let state = state_with(&[("pak0", "http://files.example.com/pak0.pak")]);

        for uri in ["/list", "/index"] {
            let resp = respond_to_request(request(uri), &state).await;
            assert_eq!(
                body_text(resp).await,
                "All mappings:\npak0                 http://files.example.com/pak0.pak\n"
            );
        }
    }

    #[tokio::test]
    async fn only_exact_special_paths_are_special() {
        // "listx" is an ordinary lookup key, not the listing page
        let state = state_with(&[("listx", "http://example.com/")]);

        let resp = respond_to_request(request("/listx"), &state).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "http://example.com/");

        let resp = respond_to_request(request("/list"), &state).await;
        assert!(body_text(resp).await.starts_with("All mappings:"));
    }

    #[tokio::test]
    async fn special_names_in_the_map_stay_shadowed() {
        let state = state_with(&[("robots.txt", "http://example.com/")]);

        let resp = respond_to_request(request("/robots.txt"), &state).await;
        assert_eq!(body_text(resp).await, ROBOTS_BODY);
    }

    #[tokio::test]
    async fn other_paths_go_to_redirect_lookup() {
        let state = state_with(&[]);

        let resp = respond_to_request(request("/nope"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "unknown service\n");
    }

    #[tokio::test]
    async fn rehash_without_configured_key_is_refused() {
        let state = state_with(&[]);

        let resp = respond_to_request(request("/rehash?key=x"), &state).await;
        assert_eq!(body_text(resp).await, "auth key not set\n");
    }

    #[test]
    fn client_addr_prefers_x_real_ip() {
        let mut req = request("/x");
        req.headers_mut()
            .insert("x-real-ip", "203.0.113.9".parse().unwrap());
        req.extensions_mut()
            .insert(PeerAddr("10.0.0.1:9999".parse().unwrap()));

        assert_eq!(client_addr(&req), "203.0.113.9");
    }

    #[test]
    fn client_addr_falls_back_to_the_peer() {
        let mut req = request("/x");
        req.extensions_mut()
            .insert(PeerAddr("10.0.0.1:9999".parse().unwrap()));

        assert_eq!(client_addr(&req), "10.0.0.1:9999");
    }

    #[test]
    fn client_addr_ignores_an_empty_header() {
        let mut req = request("/x");
        req.headers_mut().insert("x-real-ip", "".parse().unwrap());
        req.extensions_mut()
            .insert(PeerAddr("10.0.0.1:9999".parse().unwrap()));

        assert_eq!(client_addr(&req), "10.0.0.1:9999");
    }
}
