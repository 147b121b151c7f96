use super::dependent_metadata;
use crate::constants::{TLS_CERT_KEY, TLS_PRIVATE_KEY_KEY, TLS_SECRET_TYPE};
use crate::controller::credentials::IssuedCredential;
use crate::crd::EtcdProxy;
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;

/// Build the client certificate Secret at `spec.clientCertSecret`.
pub fn build_client_secret(proxy: &EtcdProxy, credential: &IssuedCredential) -> Secret {
    let key = proxy.client_secret_key();
    Secret {
        metadata: dependent_metadata(proxy, &key),
        type_: Some(TLS_SECRET_TYPE.to_string()),
        string_data: Some(BTreeMap::from([
            (
                TLS_CERT_KEY.to_string(),
                credential.certificate_pem.clone(),
            ),
            (
                TLS_PRIVATE_KEY_KEY.to_string(),
                credential.private_key_pem.as_str().to_owned(),
            ),
        ])),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::team_a;
    use super::*;

    fn credential() -> IssuedCredential {
        IssuedCredential::new("CERT", "KEY")
    }

    #[test]
    fn test_secret_identity_type_and_payload() {
        let secret = build_client_secret(&team_a(), &credential());
        assert_eq!(secret.metadata.name.as_deref(), Some("team-a-client"));
        assert_eq!(secret.metadata.namespace.as_deref(), Some("ns1"));
        assert_eq!(secret.type_.as_deref(), Some("kubernetes.io/tls"));

        let data = secret.string_data.expect("string data set");
        assert_eq!(data.get("tls.crt").map(String::as_str), Some("CERT"));
        assert_eq!(data.get("tls.key").map(String::as_str), Some("KEY"));
    }

    #[test]
    fn test_secret_is_owned_and_labeled() {
        let secret = build_client_secret(&team_a(), &credential());
        let owners = secret.metadata.owner_references.expect("owner set");
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].name, "team-a");
        assert_eq!(
            secret
                .metadata
                .labels
                .expect("labels set")
                .get("app.kubernetes.io/managed-by")
                .map(String::as_str),
            Some("etcdproxy-controller")
        );
    }

    #[test]
    fn test_secret_is_deterministic() {
        let proxy = team_a();
        assert_eq!(
            build_client_secret(&proxy, &credential()),
            build_client_secret(&proxy, &credential())
        );
    }
}
