//! # Credential Issuance
//!
//! The reconciler needs a certificate and private key for the client
//! certificate Secret. Generating and signing that material is not the
//! controller's job: it calls a [`CredentialIssuer`] and stores whatever comes
//! back.
//!
//! [`PlaceholderIssuer`] is the default. It returns fixed stand-in values so
//! the rest of the pipeline (Secret creation, mounting, ownership) works end to
//! end before a real issuer is plugged in.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

/// Certificate and private key returned by an issuer, both PEM encoded
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    pub certificate_pem: String,
    /// Wiped from memory when dropped
    pub private_key_pem: Zeroizing<String>,
}

impl IssuedCredential {
    pub fn new(certificate_pem: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        Self {
            certificate_pem: certificate_pem.into(),
            private_key_pem: Zeroizing::new(private_key_pem.into()),
        }
    }
}

impl fmt::Debug for IssuedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCredential")
            .field("certificate_pem", &self.certificate_pem)
            .field("private_key_pem", &"***")
            .finish()
    }
}

/// Issues client certificates for proxies
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Issue a certificate for `subject`, valid for `validity`
    async fn issue(&self, subject: &str, validity: Duration) -> Result<IssuedCredential>;
}

/// Stand-in issuer returning fixed values.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderIssuer;

/// Certificate written by [`PlaceholderIssuer`]
pub const PLACEHOLDER_CERTIFICATE: &str = "placeholder-certificate";

/// Private key written by [`PlaceholderIssuer`]
pub const PLACEHOLDER_PRIVATE_KEY: &str = "placeholder-private-key";

#[async_trait]
impl CredentialIssuer for PlaceholderIssuer {
    async fn issue(&self, subject: &str, validity: Duration) -> Result<IssuedCredential> {
        tracing::warn!(
            subject = subject,
            validity_secs = validity.as_secs(),
            "Issuing placeholder client credential, no real certificate is generated"
        );
        Ok(IssuedCredential::new(
            PLACEHOLDER_CERTIFICATE,
            PLACEHOLDER_PRIVATE_KEY,
        ))
    }
}
