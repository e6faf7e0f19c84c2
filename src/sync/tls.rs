//! Mutual TLS
//!
//! Builds the rustls server configuration from PEM files. Clients must
//! present a certificate issued by the configured CA.

use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::RootCertStore;
use std::sync::Arc;

use super::error::{SyncError, SyncResult};
use crate::config::TlsFiles;

/// Read the certificate files and build the acceptor configuration
pub async fn load(files: &TlsFiles) -> SyncResult<RustlsConfig> {
    let cert = tokio::fs::read(&files.server_cert).await?;
    let key = tokio::fs::read(&files.server_key).await?;
    let ca = tokio::fs::read(&files.client_ca).await?;

    let config = server_config(&cert, &key, &ca)?;
    tracing::info!(
        server_cert = ?files.server_cert,
        client_ca = ?files.client_ca,
        "Loaded TLS certificates"
    );
    Ok(RustlsConfig::from_config(Arc::new(config)))
}

/// Server configuration requiring client certificates signed by `ca`
pub fn server_config(cert: &[u8], key: &[u8], ca: &[u8]) -> SyncResult<rustls::ServerConfig> {
    let chain = certificates(cert, "server certificate")?;
    let key = PrivateKeyDer::from_pem_slice(key).map_err(|e| tls_error("server key", e))?;

    let mut roots = RootCertStore::empty();
    for cert in certificates(ca, "client CA")? {
        roots.add(cert).map_err(|e| tls_error("client CA", e))?;
    }
    let verifier = WebPkiClientVerifier::builder(Arc::new(roots))
        .build()
        .map_err(|e| tls_error("client CA", e))?;

    let mut config = rustls::ServerConfig::builder()
        .with_client_cert_verifier(verifier)
        .with_single_cert(chain, key)
        .map_err(|e| tls_error("server certificate", e))?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    Ok(config)
}

/// All certificates of a PEM file, at least one
fn certificates(pem: &[u8], what: &str) -> SyncResult<Vec<CertificateDer<'static>>> {
    let certs = CertificateDer::pem_slice_iter(pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| tls_error(what, e))?;
    if certs.is_empty() {
        return Err(SyncError::Tls(format!("{}: no certificate found", what)));
    }
    Ok(certs)
}

fn tls_error(what: &str, error: impl std::fmt::Debug) -> SyncError {
    SyncError::Tls(format!("{}: {:?}", what, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_PEM: &[u8] = b"just some text\n";

    fn message(err: SyncError) -> String {
        match err {
            SyncError::Tls(message) => message,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_certificates_requires_one() {
        let err = certificates(NOT_PEM, "client CA").unwrap_err();
        assert_eq!(message(err), "client CA: no certificate found");

        assert!(certificates(b"", "server certificate").is_err());
    }

    #[test]
    fn test_server_config_rejects_missing_certificate() {
        let err = server_config(NOT_PEM, NOT_PEM, NOT_PEM).unwrap_err();
        assert!(message(err).starts_with("server certificate"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = TlsFiles {
            server_cert: dir.path().join("server.cer"),
            server_key: dir.path().join("server.key"),
            client_ca: dir.path().join("ca.cer"),
        };
        assert!(matches!(load(&files).await, Err(SyncError::Io(_))));
    }
}
