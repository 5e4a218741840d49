//! Integration tests for certificate validation in the host list client
//!
//! A one-shot HTTPS responder presents a freshly generated self-signed
//! certificate. The download must fail unless `insecure` is set.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rustls::crypto::ring;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::ServerConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

use gethosts::{FetchConfig, FetchError, HostSource, HostsClient};

const PAYLOAD: &str = r#"{"Results":[{"Name":"web01"}]}"#;

fn self_signed_acceptor() -> TlsAcceptor {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["127.0.0.1".to_string(), "localhost".to_string()])
            .expect("Failed to generate certificate");
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .expect("Failed to configure TLS protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![cert.der().clone()], key)
        .expect("Failed to load certificate");

    TlsAcceptor::from(Arc::new(config))
}

/// Accepts one connection; returns whether the TLS handshake succeeded
async fn serve_tls_once() -> (String, JoinHandle<bool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let acceptor = self_signed_acceptor();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut stream = match acceptor.accept(socket).await {
            Ok(stream) => stream,
            Err(_) => return false,
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = match stream.read(&mut buf).await {
                Ok(n) => n,
                Err(_) => return true,
            };
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            PAYLOAD.len(),
            PAYLOAD
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        true
    });

    (format!("https://127.0.0.1:{}/hosts", addr.port()), handle)
}

fn config_for(url: &str, insecure: bool) -> FetchConfig {
    FetchConfig {
        url: url.to_string(),
        user: "admin".to_string(),
        password: "secret".to_string(),
        cache_dir: PathBuf::from("/unused"),
        cache_file: "hostslist.txt".to_string(),
        cache_duration: Duration::from_secs(3600),
        insecure,
        timeout: Some(Duration::from_secs(10)),
        strict_status: false,
    }
}

#[tokio::test]
async fn test_self_signed_certificate_is_rejected_by_default() {
    let (url, server) = serve_tls_once().await;
    let client = HostsClient::new(&config_for(&url, false));

    let result = client.fetch().await;
    let handshake_ok = server.await.unwrap();

    assert!(
        matches!(result, Err(FetchError::Transport { .. })),
        "Expected transport error, got {:?}",
        result
    );
    assert!(!handshake_ok, "Handshake must not complete");
}

#[tokio::test]
async fn test_self_signed_certificate_is_accepted_when_insecure() {
    let (url, server) = serve_tls_once().await;
    let client = HostsClient::new(&config_for(&url, true));

    let body = client.fetch().await.unwrap();
    let handshake_ok = server.await.unwrap();

    assert_eq!(body, PAYLOAD.as_bytes());
    assert!(handshake_ok);
}
