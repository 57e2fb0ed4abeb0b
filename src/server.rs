use crate::routes::{respond_to_request, State};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Peer address of the connection a request arrived on, recorded at accept
/// time so handlers can fall back to it when no proxy header is present.
#[derive(Clone, Copy, Debug)]
pub struct PeerAddr(pub SocketAddr);

pub async fn run(addr: &str, state: State) -> Result<(), io::Error> {
    let state = Arc::new(state);
    let listener = TcpListener::bind(addr).await?;

    loop {
        let (tcp, peer) = listener.accept().await?;
        let io = TokioIo::new(tcp);

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let serve = service_fn(move |mut req: Request<Incoming>| {
                let state = Arc::clone(&state);
                req.extensions_mut().insert(PeerAddr(peer));
                async move { Ok::<_, Infallible>(respond_to_request(req, &state).await) }
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(io, serve)
                .await
            {
                log::error!("Error serving connection: {}", e);
            }
        });
    }
}
