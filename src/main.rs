//! confgen's main entry point.
//! Generates the Prometheus remote-read benchmark deployment: Kubernetes
//! manifests, the Prometheus configuration and the namespace definition.

use std::collections::BTreeMap;

use confgen::{
    cli::{get_args, Args},
    encoding::{CommentStyle, Template, Yaml},
    error::{default_error_handler, Error, Result},
    generator::Generator,
    logger::init_logger,
    resources::{kubernetes as k8s, prometheus},
};
use log::debug;

const SELECTOR_NAME: &str = "app";
const NAMESPACE: &str = "monitoring";

const NAMESPACE_TEMPLATE: &str = r#"resource "kubernetes_namespace" "{{ namespace }}" {
  metadata {
    name = "{{ namespace }}"
  }
}
"#;

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads configuration and applies command-line overrides
/// 2. Stages every generated file in the generator's pool
/// 3. Writes the pool to the output directory
fn run(args: Args) -> Result<()> {
    let mut generator = Generator::from_args(&args)?;

    gen_namespace(&mut generator)?;
    gen_rr_test_prometheus(&mut generator, "prom-rr-test")?;

    let output_dir = generator.output_dir().to_path_buf();
    let report = generator.generate()?;
    for path in &report.removed {
        println!("Removed stale file: '{}'", path.display());
    }
    println!(
        "Generation completed successfully: {} files in {}.",
        report.written.len(),
        output_dir.display()
    );
    Ok(())
}

fn gen_namespace(generator: &mut Generator) -> Result<()> {
    let mut terraform = generator.with(&["terraform"])?;
    terraform.add(
        "namespace.tf",
        Template::new(
            NAMESPACE_TEMPLATE,
            serde_json::json!({ "namespace": NAMESPACE }),
            CommentStyle::DoubleSlash,
        ),
    )?;
    Ok(())
}

fn gen_rr_test_prometheus(generator: &mut Generator, name: &str) -> Result<()> {
    const REPLICAS: i32 = 1;
    const CONFIG_VOLUME_NAME: &str = "prometheus-config";
    const CONFIG_VOLUME_MOUNT: &str = "/etc/prometheus";
    const SHARED_DATA_PATH: &str = "/data-shared";
    const CONTAINER_HTTP_PORT: i32 = 9090;
    const GRPC_SIDECAR_PORT: i32 = 19090;
    const HTTP_SIDECAR_PORT: i32 = 19190;
    const PROM_VERSION: &str = "v2.10.0";
    const THANOS_VERSION: &str = "v0.5.0-rc.0";

    let prom_data_path = format!("{}/prometheus", SHARED_DATA_PATH);
    let meta = k8s::ObjectMeta::new(name, NAMESPACE).label(SELECTOR_NAME, name);

    // Empty configuration, nothing is scraped.
    let prom_config = prometheus::Config {
        global: prometheus::GlobalConfig {
            external_labels: BTreeMap::from([("replica".to_string(), "0".to_string())]),
            ..Default::default()
        },
        ..Default::default()
    };
    let prom_config_yaml =
        std::io::read_to_string(Yaml::new(&prom_config)).map_err(|source| {
            Error::EncodingFailure {
                name: "prometheus.yaml".to_string(),
                source,
            }
        })?;
    debug!("Rendered Prometheus config for {}", name);

    let config_map = k8s::ConfigMap::new(
        k8s::ObjectMeta::new(CONFIG_VOLUME_NAME, NAMESPACE).label(SELECTOR_NAME, name),
        BTreeMap::from([("prometheus.yaml".to_string(), prom_config_yaml)]),
    );

    let port = |name: &str, port: i32| k8s::ServicePort {
        name: name.to_string(),
        port,
        target_port: port,
    };
    let service = k8s::Service::new(
        meta.clone(),
        k8s::ServiceSpec {
            type_: "ClusterIP".to_string(),
            cluster_ip: Some("None".to_string()),
            selector: meta.labels.clone(),
            ports: vec![
                port("http", CONTAINER_HTTP_PORT),
                port("grpc-sidecar", GRPC_SIDECAR_PORT),
                port("http-sidecar", HTTP_SIDECAR_PORT),
            ],
        },
    );

    let shared_mount = k8s::VolumeMount {
        name: name.to_string(),
        mount_path: SHARED_DATA_PATH.to_string(),
    };
    let prometheus_container = k8s::Container {
        name: "prometheus".to_string(),
        image: format!("quay.io/prometheus/prometheus:{}", PROM_VERSION),
        args: vec![
            format!("--config.file={}/prometheus.yaml", CONFIG_VOLUME_MOUNT),
            "--log.level=info".to_string(),
            // Unlimited remote read.
            "--storage.remote.read-concurrent-limit=0".to_string(),
            "--storage.remote.read-sample-limit=0".to_string(),
            format!("--storage.tsdb.path={}", prom_data_path),
            "--storage.tsdb.min-block-duration=2h".to_string(),
            "--storage.tsdb.max-block-duration=2h".to_string(),
            "--storage.tsdb.retention=2d".to_string(),
        ],
        ports: vec![k8s::ContainerPort {
            name: "http".to_string(),
            container_port: CONTAINER_HTTP_PORT,
        }],
        volume_mounts: vec![
            k8s::VolumeMount {
                name: CONFIG_VOLUME_NAME.to_string(),
                mount_path: CONFIG_VOLUME_MOUNT.to_string(),
            },
            shared_mount.clone(),
        ],
    };
    let sidecar_container = k8s::Container {
        name: "thanos-sidecar".to_string(),
        image: format!("improbable/thanos:{}", THANOS_VERSION),
        args: vec![
            "sidecar".to_string(),
            format!("--prometheus.url=http://localhost:{}", CONTAINER_HTTP_PORT),
            format!("--tsdb.path={}", prom_data_path),
            format!("--grpc-address=0.0.0.0:{}", GRPC_SIDECAR_PORT),
            format!("--http-address=0.0.0.0:{}", HTTP_SIDECAR_PORT),
        ],
        ports: vec![
            k8s::ContainerPort {
                name: "grpc-sidecar".to_string(),
                container_port: GRPC_SIDECAR_PORT,
            },
            k8s::ContainerPort {
                name: "http-sidecar".to_string(),
                container_port: HTTP_SIDECAR_PORT,
            },
        ],
        volume_mounts: vec![shared_mount],
    };

    let stateful_set = k8s::StatefulSet::new(
        meta.clone(),
        k8s::StatefulSetSpec {
            replicas: REPLICAS,
            service_name: name.to_string(),
            selector: k8s::LabelSelector {
                match_labels: meta.labels.clone(),
            },
            template: k8s::PodTemplate {
                metadata: meta.clone(),
                spec: k8s::PodSpec {
                    init_containers: Vec::new(),
                    containers: vec![prometheus_container, sidecar_container],
                    volumes: vec![
                        k8s::NamedVolume {
                            name: CONFIG_VOLUME_NAME.to_string(),
                            source: k8s::Volume::ConfigMap {
                                name: CONFIG_VOLUME_NAME.to_string(),
                            },
                        },
                        k8s::NamedVolume {
                            name: name.to_string(),
                            source: k8s::Volume::EmptyDir {},
                        },
                    ],
                },
            },
        },
    );

    {
        let mut manifests = generator.with(&["kubernetes", NAMESPACE])?;
        manifests.add(&format!("{}-service.yaml", name), Yaml::new(&service))?;
        manifests.add(
            &format!("{}.yaml", name),
            Yaml::new(&config_map).and(&stateful_set),
        )?;
    }

    let mut providers = generator.with(&["providers", "prometheus"])?;
    providers.add(&format!("{}.yaml", name), Yaml::new(&prom_config))?;
    Ok(())
}
