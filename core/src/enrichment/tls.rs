//! TLS certificate introspection. `reqwest` doesn't expose the peer
//! certificate, so the HTTP handler performs its own handshake here with
//! `native-tls` and hands the DER bytes to `x509-parser`.

use common::TlsCertificateView;
use x509_parser::extensions::ParsedExtension;
use x509_parser::prelude::*;

/// Performs a TLS handshake against `host:port`, validating first and
/// falling back to an insecure handshake (so the certificate fields are
/// still populated) if validation fails. `authorized` and
/// `authorization_error` reflect the *first* attempt's outcome.
pub async fn probe(host: &str, port: u16) -> Option<TlsCertificateView> {
    let addr = format!("{host}:{port}");
    let stream = tokio::net::TcpStream::connect(&addr).await.ok()?;

    let (authorized, validation_error) = match try_handshake(host, stream, false).await {
        Ok(cert) => return Some(summarize(&cert, true, None)),
        Err(e) => (false, e),
    };

    let stream = tokio::net::TcpStream::connect(&addr).await.ok()?;
    let cert = try_handshake(host, stream, true).await.ok()?;
    Some(summarize(&cert, authorized, Some(validation_error)))
}

async fn try_handshake(
    host: &str,
    stream: tokio::net::TcpStream,
    insecure: bool,
) -> Result<Vec<u8>, String> {
    let mut builder = native_tls::TlsConnector::builder();
    if insecure {
        builder.danger_accept_invalid_certs(true);
    }
    let connector = builder.build().map_err(|e| e.to_string())?;
    let connector = tokio_native_tls::TlsConnector::from(connector);

    let tls_stream = connector
        .connect(host, stream)
        .await
        .map_err(|e| e.to_string())?;

    tls_stream
        .get_ref()
        .peer_certificate()
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "no peer certificate presented".to_string())?
        .to_der()
        .map_err(|e| e.to_string())
}

fn summarize(der: &[u8], authorized: bool, authorization_error: Option<String>) -> TlsCertificateView {
    let (subject, issuer, not_before, not_after, sans) = match X509Certificate::from_der(der) {
        Ok((_, cert)) => (
            cert.subject().to_string(),
            cert.issuer().to_string(),
            cert.validity().not_before.to_string(),
            cert.validity().not_after.to_string(),
            cert.extensions()
                .iter()
                .find_map(|ext| match ext.parsed_extension() {
                    ParsedExtension::SubjectAlternativeName(san) => Some(
                        san.general_names.iter().map(|n| n.to_string()).collect(),
                    ),
                    _ => None,
                })
                .unwrap_or_default(),
        ),
        Err(_) => (String::new(), String::new(), String::new(), String::new(), Vec::new()),
    };

    TlsCertificateView {
        authorized,
        authorization_error,
        subject,
        issuer,
        created_at: not_before,
        expires_at: not_after,
        subject_alt_name: sans,
    }
}
