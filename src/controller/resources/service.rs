use super::dependent_metadata;
use crate::config::ProxyTemplate;
use crate::constants::PROXY_PORT_NAME;
use crate::crd::EtcdProxy;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Build the Service `etcd-<name>` selecting the proxy pods.
pub fn build_service(proxy: &EtcdProxy, template: &ProxyTemplate) -> Service {
    let key = proxy.service_key();
    Service {
        metadata: dependent_metadata(proxy, &key),
        spec: Some(ServiceSpec {
            selector: Some(proxy.selector_labels()),
            ports: Some(vec![ServicePort {
                name: Some(PROXY_PORT_NAME.to_string()),
                protocol: Some("TCP".to_string()),
                port: template.port,
                target_port: Some(IntOrString::Int(template.port)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::team_a;
    use super::*;

    #[test]
    fn test_service_name_namespace_and_port() {
        let service = build_service(&team_a(), &ProxyTemplate::default());
        assert_eq!(service.metadata.name.as_deref(), Some("etcd-team-a"));
        assert_eq!(service.metadata.namespace.as_deref(), Some("ns1"));

        let spec = service.spec.expect("spec set");
        let ports = spec.ports.expect("ports set");
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, 2379);
        assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
        assert_eq!(ports[0].target_port, Some(IntOrString::Int(2379)));
    }

    #[test]
    fn test_service_selects_proxy_pods() {
        let proxy = team_a();
        let service = build_service(&proxy, &ProxyTemplate::default());
        let selector = service.spec.and_then(|s| s.selector).expect("selector set");
        assert_eq!(selector, proxy.selector_labels());
    }
}
