//! Kind resolution against a discovered catalog

mod common;

use common::{FakeDiscovery, cluster_groups};
use kubetree::discovery::MatchKind;
use kubetree::{CatalogError, ResourceCatalog};

async fn catalog() -> ResourceCatalog {
    ResourceCatalog::discover(&FakeDiscovery::new(cluster_groups()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_only_list_capable_resources_are_kept() {
    let catalog = catalog().await;
    let names: Vec<String> = catalog.resources().iter().map(|r| r.full_name()).collect();
    assert_eq!(
        names,
        vec![
            "pods.v1.",
            "services.v1.",
            "configmaps.v1.",
            "namespaces.v1.",
            "deployments.v1.apps",
            "replicasets.v1.apps",
            "services.v1.serving.knative.dev",
            "widgets.v1.a.example.io",
            "widgets.v1alpha1.b.example.io",
        ]
    );
}

#[tokio::test]
async fn test_unique_match_by_any_name_variant() {
    let catalog = catalog().await;
    for token in ["rs", "ReplicaSet", "replicasets", "rs.apps", "replicaset.v1.apps", "RS.V1.APPS"] {
        let resolved = catalog.resolve(token).unwrap();
        assert_eq!(resolved.matched, MatchKind::Unique, "token {}", token);
        assert_eq!(resolved.descriptor.full_name(), "replicasets.v1.apps");
    }
}

#[tokio::test]
async fn test_override_beats_generic_ambiguity() {
    let catalog = catalog().await;
    // both the core and the knative group register "service"
    assert_eq!(catalog.lookup("service").len(), 2);

    let resolved = catalog.resolve("Service").unwrap();
    assert_eq!(resolved.matched, MatchKind::Override);
    assert_eq!(resolved.descriptor.full_name(), "services.v1.");

    let resolved = catalog.resolve("ksvc").unwrap();
    assert_eq!(resolved.matched, MatchKind::Unique);
    assert_eq!(resolved.descriptor.group, "serving.knative.dev");
}

#[tokio::test]
async fn test_ambiguous_kind_names_every_candidate() {
    let catalog = catalog().await;
    let err = catalog.resolve("widgets").unwrap_err();
    match &err {
        CatalogError::AmbiguousKind { kind, candidates } => {
            assert_eq!(kind, "widgets");
            assert_eq!(candidates.len(), 2);
            assert!(candidates.contains(&"widgets.v1.a.example.io".to_string()));
            assert!(candidates.contains(&"widgets.v1alpha1.b.example.io".to_string()));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("use one of these as the KIND to disambiguate"));

    // a qualified name picks one of them
    let resolved = catalog.resolve("widget.b.example.io").unwrap();
    assert_eq!(resolved.descriptor.version, "v1alpha1");
}

#[tokio::test]
async fn test_unknown_kinds() {
    let catalog = catalog().await;
    for token in ["gizmo", "binding", "scale", "deployments/scale"] {
        assert!(
            matches!(catalog.resolve(token), Err(CatalogError::UnknownKind(_))),
            "token {}",
            token
        );
    }
}

#[tokio::test]
async fn test_discovery_failure() {
    let err = ResourceCatalog::discover(&FakeDiscovery::failing())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Discovery(_)));
}

#[tokio::test]
async fn test_unavailable_group_is_recorded() {
    let discovery =
        FakeDiscovery::new(cluster_groups()).with_unavailable_group("metrics.k8s.io/v1beta1");
    let catalog = ResourceCatalog::discover(&discovery).await.unwrap();

    let failed = catalog.failed_groups();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].group_version, "metrics.k8s.io/v1beta1");
    assert_eq!(catalog.resources().len(), 9);
    assert!(matches!(
        catalog.resolve("podmetrics"),
        Err(CatalogError::UnknownKind(_))
    ));
}
