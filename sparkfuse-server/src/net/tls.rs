use crate::config::TlsConfig;
use crate::error::InfraError;
use rustls_pemfile::{certs, pkcs8_private_keys};
use std::io::{BufReader, Cursor};
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};

/// Load the certificate chain and PKCS#8 key named in the config and build an acceptor.
pub fn load_tls(config: &TlsConfig) -> Result<TlsAcceptor, InfraError> {
    let cert_file = std::fs::read(&config.cert_path)?;
    let cert_reader = &mut BufReader::new(Cursor::new(cert_file));
    let certs: Vec<CertificateDer> = certs(cert_reader).collect::<Result<Vec<_>, _>>()?;

    if certs.is_empty() {
        return Err(InfraError::Tls(format!("no certificates found in {}", config.cert_path.display())));
    }

    let key_file = std::fs::read(&config.key_path)?;
    let key_reader = &mut BufReader::new(Cursor::new(key_file));
    let mut keys: Vec<PrivateKeyDer> = pkcs8_private_keys(key_reader)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(PrivateKeyDer::from)
        .collect();

    if keys.is_empty() {
        return Err(InfraError::Tls(format!("no private keys found in {}", config.key_path.display())));
    }

    let key = keys.remove(0);

    let tls_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| InfraError::Tls(e.to_string()))?;

    Ok(TlsAcceptor::from(Arc::new(tls_config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_files_are_an_error() {
        let cfg = TlsConfig {
            cert_path: PathBuf::from("/nonexistent/sparkfuse.crt"),
            key_path: PathBuf::from("/nonexistent/sparkfuse.key"),
        };
        assert!(matches!(load_tls(&cfg), Err(InfraError::Io(_))));
    }

    #[test]
    fn file_without_pem_blocks_is_an_error() {
        let path = std::env::temp_dir().join(format!("sparkfuse-empty-{}.pem", std::process::id()));
        std::fs::write(&path, "not a certificate\n").unwrap();

        let cfg = TlsConfig { cert_path: path.clone(), key_path: path.clone() };
        assert!(matches!(load_tls(&cfg), Err(InfraError::Tls(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
