use crate::config::ServerConfig;
use crate::http::{collect_body, HttpResponse, Request};
use crate::routing::Router;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

pub struct Server<S> {
    router: Arc<Router<S>>,
    config: ServerConfig,
}

impl<S> Server<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn from_config(router: Router<S>, config: &ServerConfig) -> Self {
        Self {
            router: Arc::new(router),
            config: config.clone(),
        }
    }

    /// Accept connections until Ctrl-C
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(self.config.bind_target()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(addr = %listener.local_addr()?, "server listening");

        let router = self.router;
        let max_body_size = self.config.max_body_size;
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
            };
            let io = TokioIo::new(stream);
            let router = router.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let router = router.clone();
                    async move {
                        Ok::<_, Infallible>(handle_request(router, max_body_size, req).await)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::warn!(%peer, error = ?err, "error serving connection");
                }
            });
        }
    }
}

async fn handle_request<S>(
    router: Arc<Router<S>>,
    max_body_size: usize,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>>
where
    S: Clone + Send + Sync + 'static,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();

    let response = match collect_body(body, max_body_size).await {
        Ok(bytes) => router.dispatch(Request::new(parts, bytes)).await,
        Err(e) => HttpResponse::from(e),
    };

    tracing::info!(
        %method,
        %path,
        status = response.status_code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );

    response.into_hyper()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn spawn(max_body_size: usize) -> SocketAddr {
        let router = Router::new(()).post("/echo", |_, req: Request| async move {
            Ok(HttpResponse::json(serde_json::json!({ "len": req.body().len() })))
        });
        let config = ServerConfig::builder().max_body_size(max_body_size).build();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(Server::from_config(router, &config).serve(listener));
        addr
    }

    async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_collected_body() {
        let addr = spawn(64).await;
        let response = roundtrip(
            addr,
            "POST /echo HTTP/1.1\r\nHost: test\r\nConnection: close\r\nContent-Length: 5\r\n\r\nhello",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
        assert!(response.ends_with(r#"{"len":5}"#), "{}", response);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let addr = spawn(4).await;
        let response = roundtrip(
            addr,
            "POST /echo HTTP/1.1\r\nHost: test\r\nConnection: close\r\nContent-Length: 5\r\n\r\nhello",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 413"), "{}", response);
        assert!(response.contains("PayloadTooLargeError"), "{}", response);
    }
}
