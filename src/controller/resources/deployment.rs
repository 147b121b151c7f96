use super::{dependent_metadata, flag};
use crate::config::ProxyTemplate;
use crate::constants::{PROXY_CONTAINER_NAME, PROXY_PORT_NAME};
use crate::crd::EtcdProxy;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, SecretVolumeSource, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

/// Build the Deployment `etcd-<name>` running the gRPC proxy.
///
/// The backend certificate Secret is mounted read-only and its `ca.crt`,
/// `tls.crt` and `tls.key` are handed to the proxy.
pub fn build_deployment(proxy: &EtcdProxy, template: &ProxyTemplate) -> Deployment {
    let key = proxy.deployment_key();
    let labels = proxy.selector_labels();
    let cert_secret = &proxy.spec.etcd_cert_secret_ref.name;

    let container = Container {
        name: PROXY_CONTAINER_NAME.to_string(),
        image: Some(template.image.clone()),
        command: Some(template.command()),
        args: Some(proxy_args(proxy, template)),
        ports: Some(vec![ContainerPort {
            name: Some(PROXY_PORT_NAME.to_string()),
            protocol: Some("TCP".to_string()),
            container_port: template.port,
            ..Default::default()
        }]),
        volume_mounts: Some(vec![VolumeMount {
            name: cert_secret.clone(),
            mount_path: template.cert_mount_path.clone(),
            read_only: Some(true),
            ..Default::default()
        }]),
        ..Default::default()
    };

    Deployment {
        metadata: dependent_metadata(proxy, &key),
        spec: Some(DeploymentSpec {
            replicas: proxy.spec.replicas,
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: Some(vec![Volume {
                        name: cert_secret.clone(),
                        secret: Some(SecretVolumeSource {
                            secret_name: Some(cert_secret.clone()),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Arguments following `grpc-proxy start`
fn proxy_args(proxy: &EtcdProxy, template: &ProxyTemplate) -> Vec<String> {
    vec![
        flag("endpoints", &proxy.spec.etcd_servers.join(",")),
        flag("namespace", &proxy.key_namespace()),
        flag("listen-addr", &template.listen_addr),
        flag("cacert", &template.cert_file("ca.crt")),
        flag("cert", &template.cert_file("tls.crt")),
        flag("key", &template.cert_file("tls.key")),
    ]
}
