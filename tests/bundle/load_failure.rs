//! Partial and total load failures.

use std::time::Duration;

use mxrus::{Error, ExtractError, LoaderState, PackageRole};

use crate::fixture::{
    config_in, loader_with, scene_package, write_bundle, StubLoader, CORRUPT, HANG,
};

#[tokio::test]
async fn test_corrupt_scene_rolls_back() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_bundle(
        tmp.path(),
        "broken.mxrus",
        &[("assets", b"a"), ("scene", CORRUPT), ("b.unitygenerated", b"g")],
    );
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let loaded = loader.load(&source, None).await.unwrap();

    assert!(!loaded);
    assert_eq!(loader.state(), LoaderState::Error);
    assert!(loader.packages().is_empty());
    // Assets and auxiliary were still attempted, then rolled back
    assert_eq!(stub.called_names(), vec!["assets", "b.unitygenerated", "scene"]);
    assert_eq!(stub.released(), 2);
    assert_eq!(stub.live(), 0);
    assert!(!tmp.path().join("extracts").join("broken-extract").exists());
    assert!(loader.scene_name().is_none());
    assert!(loader.assets().is_none());
}

#[tokio::test]
async fn test_outcome_reports_failed_roles() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_bundle(
        tmp.path(),
        "broken.mxrus",
        &[("assets", CORRUPT), ("scene", CORRUPT), ("b.unitygenerated", b"g")],
    );
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let outcome = loader.load_with_outcome(&source, None).await.unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.failed_roles(), vec![PackageRole::Assets, PackageRole::Scene]);
    match &outcome.failures[0].1 {
        Error::PackageLoad { role, reason } => {
            assert_eq!(*role, PackageRole::Assets);
            assert!(reason.contains("not a valid package"));
        }
        other => panic!("expected package load error, got {:?}", other),
    }
    assert_eq!(stub.call_count(), 3);
}

#[tokio::test]
async fn test_missing_package_file() {
    let tmp = tempfile::tempdir().unwrap();
    let scene = scene_package(&["Assets/Forest.unity"]);
    let source = write_bundle(
        tmp.path(),
        "noassets.mxrus",
        &[("scene", &scene), ("b.unitygenerated", b"g")],
    );
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let outcome = loader.load_with_outcome(&source, None).await.unwrap();

    assert_eq!(outcome.failed_roles(), vec![PackageRole::Assets]);
    assert_eq!(loader.state(), LoaderState::Error);
    assert_eq!(stub.live(), 0);
}

#[tokio::test]
async fn test_missing_source_propagates_extract_error() {
    let tmp = tempfile::tempdir().unwrap();
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let result = loader.load(&tmp.path().join("ghost.mxrus"), None).await;

    assert!(matches!(
        result,
        Err(Error::Extract(ExtractError::SourceNotFound(_)))
    ));
    assert_eq!(stub.call_count(), 0);
    assert!(!tmp.path().join("extracts").join("ghost-extract").exists());
    assert_eq!(loader.state(), LoaderState::Error);
    assert!(loader.packages().is_empty());
}

#[tokio::test]
async fn test_corrupt_archive_propagates_extract_error() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("garbage.mxrus");
    std::fs::write(&source, b"this is not an archive").unwrap();
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let result = loader.load(&source, None).await;

    assert!(matches!(result, Err(Error::Extract(_))));
    assert_eq!(stub.call_count(), 0);
    assert!(!tmp.path().join("extracts").join("garbage-extract").exists());
}

#[tokio::test]
async fn test_multiple_auxiliary_packages_fail_discovery() {
    let tmp = tempfile::tempdir().unwrap();
    let scene = scene_package(&["Assets/Forest.unity"]);
    let source = write_bundle(
        tmp.path(),
        "twins.mxrus",
        &[
            ("assets", b"a"),
            ("scene", &scene),
            ("one.unitygenerated", b"g"),
            ("two.unitygenerated", b"g"),
        ],
    );
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let outcome = loader.load_with_outcome(&source, None).await.unwrap();

    assert_eq!(outcome.failed_roles(), vec![PackageRole::Auxiliary]);
    match &outcome.failures[0].1 {
        Error::Discovery(msg) => assert!(msg.contains("multiple")),
        other => panic!("expected discovery error, got {:?}", other),
    }
    assert_eq!(stub.called_names(), vec!["assets", "scene"]);
    assert_eq!(stub.released(), 2);
    assert_eq!(loader.state(), LoaderState::Error);
    assert!(!tmp.path().join("extracts").join("twins-extract").exists());
}

#[tokio::test]
async fn test_missing_auxiliary_package_fails_discovery() {
    let tmp = tempfile::tempdir().unwrap();
    let scene = scene_package(&["Assets/Forest.unity"]);
    let source = write_bundle(
        tmp.path(),
        "single.mxrus",
        &[("assets", b"a"), ("scene", &scene)],
    );
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let outcome = loader.load_with_outcome(&source, None).await.unwrap();

    assert_eq!(outcome.failed_roles(), vec![PackageRole::Auxiliary]);
    assert_eq!(stub.call_count(), 2);
    assert_eq!(stub.live(), 0);
}

#[tokio::test]
async fn test_package_timeout_counts_as_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let scene = scene_package(&["Assets/Forest.unity"]);
    let source = write_bundle(
        tmp.path(),
        "slow.mxrus",
        &[("assets", b"a"), ("scene", &scene), ("s.unitygenerated", HANG)],
    );
    let stub = StubLoader::new();
    let config = config_in(tmp.path()).with_package_timeout(Duration::from_millis(100));
    let mut loader = loader_with(config, &stub);

    let outcome = loader.load_with_outcome(&source, None).await.unwrap();

    assert_eq!(outcome.failed_roles(), vec![PackageRole::Auxiliary]);
    assert!(matches!(
        outcome.failures[0].1,
        Error::Timeout(PackageRole::Auxiliary)
    ));
    assert_eq!(loader.state(), LoaderState::Error);
    assert_eq!(stub.live(), 0);
    assert!(!tmp.path().join("extracts").join("slow-extract").exists());
}

#[tokio::test]
async fn test_stale_scratch_dir_cleared_before_extraction() {
    let tmp = tempfile::tempdir().unwrap();
    let stale = tmp.path().join("extracts").join("forest-extract");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("old.unitygenerated"), b"g").unwrap();
    std::fs::write(stale.join("assets"), b"old assets").unwrap();

    // New bundle lacks an assets package; the leftover one must not be used
    let scene = scene_package(&["Assets/Forest.unity"]);
    let source = write_bundle(
        tmp.path(),
        "forest.mxrus",
        &[("scene", &scene), ("4f2a9c.unitygenerated", b"g")],
    );
    let stub = StubLoader::new();
    let mut loader = loader_with(config_in(tmp.path()), &stub);

    let outcome = loader.load_with_outcome(&source, None).await.unwrap();

    assert_eq!(outcome.failed_roles(), vec![PackageRole::Assets]);
    assert_eq!(stub.called_names(), vec!["4f2a9c.unitygenerated", "assets", "scene"]);
    assert_eq!(loader.state(), LoaderState::Error);
    assert!(!stale.exists());
}
