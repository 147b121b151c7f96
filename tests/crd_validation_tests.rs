//! # CRD Validation Tests
//!
//! Checks the generated CustomResourceDefinition: scope, names, required
//! fields and defaults enforced by the API server.

use etcdproxy_controller::constants::CERT_DURATION_PATTERN;
use etcdproxy_controller::crd::EtcdProxy;
use kube::core::CustomResourceExt;
use serde_json::Value;

fn spec_schema() -> Value {
    let crd = serde_json::to_value(EtcdProxy::crd()).expect("CRD serializes");
    crd["spec"]["versions"][0]["schema"]["openAPIV3Schema"]["properties"]["spec"].clone()
}

#[test]
fn test_crd_names_and_scope() {
    let crd = EtcdProxy::crd();
    assert_eq!(crd.spec.scope, "Cluster");
    assert_eq!(crd.spec.group, "etcd.camelcasenotation.io");
    assert_eq!(crd.spec.names.kind, "EtcdProxy");
    assert_eq!(crd.spec.names.plural, "etcdproxies");
    assert_eq!(
        crd.spec.names.short_names.as_deref(),
        Some(&["ep".to_string()][..])
    );
    assert_eq!(crd.spec.versions.len(), 1);
    assert_eq!(crd.spec.versions[0].name, "v1alpha1");
    assert!(crd.spec.versions[0]
        .subresources
        .as_ref()
        .and_then(|s| s.status.as_ref())
        .is_some());
}

#[test]
fn test_references_and_servers_are_required() {
    let schema = spec_schema();
    let required: Vec<&str> = schema["required"]
        .as_array()
        .expect("required list")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    for field in ["etcdServers", "etcdCertSecretRef", "clientCertSecret"] {
        assert!(required.contains(&field), "{field} must be required");
    }
    assert!(!required.contains(&"replicas"));
    assert!(!required.contains(&"clientCertDuration"));
}

#[test]
fn test_durations_default_to_one_year() {
    let schema = spec_schema();
    for field in [
        "signingCertDuration",
        "servingCertDuration",
        "clientCertDuration",
    ] {
        assert_eq!(
            schema["properties"][field]["default"],
            Value::from("8760h"),
            "{field} default"
        );
    }
}

#[test]
fn test_secret_references_need_namespace_and_name() {
    let schema = spec_schema();
    for field in ["etcdCertSecretRef", "clientCertSecret"] {
        let reference = &schema["properties"][field];
        let required: Vec<&str> = reference["required"]
            .as_array()
            .expect("required list")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"namespace"), "{field}.namespace");
        assert!(required.contains(&"name"), "{field}.name");
    }
}

#[test]
fn test_durations_are_pattern_checked_at_admission() {
    let schema = spec_schema();
    let pattern = regex::Regex::new(CERT_DURATION_PATTERN).expect("pattern compiles");
    for field in [
        "signingCertDuration",
        "servingCertDuration",
        "clientCertDuration",
    ] {
        assert_eq!(
            schema["properties"][field]["pattern"],
            Value::from(CERT_DURATION_PATTERN),
            "{field} pattern"
        );
    }
    for accepted in ["8760h", "1.5h", "500us", "0s", "0", "8760h0m0.5s"] {
        assert!(pattern.is_match(accepted), "{accepted} should be admitted");
    }
    for rejected in ["one year", "-1h", "1w", "", "1h 30m"] {
        assert!(!pattern.is_match(rejected), "{rejected} should be refused");
    }
}
