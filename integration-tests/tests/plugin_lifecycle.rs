//! Loader lifecycle scenarios across the plugin boundary.

use std::path::PathBuf;

use quiver_core::Vector;
use quiver_plugin::{CapabilityKind, CapabilityRef, Extension, host, host::HostError};
use quiver_problems::extension_factory;

#[test]
fn in_process_load_query_release_round_trip() {
    let mut handle = host::load_in_process(extension_factory).expect("factory should succeed");

    assert!(handle.supports(CapabilityKind::Problem));

    {
        let CapabilityRef::Problem(problem) = handle
            .query(CapabilityKind::Problem)
            .expect("problem capability should be available");
        problem
            .set_params(&Vector::new([1.0, 0.0, 0.0]).unwrap())
            .unwrap();
    }

    // Queries are repeatable while the handle lives; state set through an
    // earlier view persists.
    let CapabilityRef::Problem(problem) = handle.query(CapabilityKind::Problem).unwrap();
    let value = problem
        .goal_by_args(&Vector::new([2.0, 0.0]).unwrap())
        .unwrap();
    assert_eq!(value, 4.0);

    // Consuming release: the handle cannot be used or released again.
    handle.release();
}

#[test]
fn failed_factory_produces_no_handle() {
    fn refusing_factory() -> Option<Box<dyn Extension>> {
        None
    }

    assert!(matches!(
        host::load_in_process(refusing_factory),
        Err(HostError::InProcessFactoryFailed)
    ));
}

#[test]
fn capability_support_is_queried_not_assumed() {
    struct NoCapabilities;

    impl Extension for NoCapabilities {
        fn supports(&self, _kind: CapabilityKind) -> bool {
            false
        }

        fn query(&mut self, _kind: CapabilityKind) -> Option<CapabilityRef<'_>> {
            None
        }
    }

    fn factory() -> Option<Box<dyn Extension>> {
        Some(Box::new(NoCapabilities))
    }

    let mut handle = host::load_in_process(factory).unwrap();

    assert!(!handle.supports(CapabilityKind::Problem));
    assert!(matches!(
        handle.query(CapabilityKind::Problem),
        Err(HostError::UnsupportedCapability(CapabilityKind::Problem))
    ));
}

#[test]
fn loading_a_missing_module_fails_cleanly() {
    let result = host::load("/nonexistent/libquiver_missing_plugin.so");
    assert!(matches!(result, Err(HostError::ModuleNotLoadable { .. })));
}

/// Full dynamic round trip against the `cdylib` artifact of
/// `quiver-problems`.
///
/// Requires the plugin to be built first (`cargo build -p
/// quiver-problems`), so it is ignored by default.
#[test]
#[ignore = "requires the quiver-problems cdylib artifact"]
fn dylib_load_query_release_round_trip() {
    let mut handle = host::load(plugin_artifact_path()).expect("plugin artifact should load");

    let CapabilityRef::Problem(problem) = handle
        .query(CapabilityKind::Problem)
        .expect("problem capability should be available");

    let args = Vector::new([2.0, 3.0]).unwrap();
    let params = Vector::new([1.0, 2.0, -1.0]).unwrap();
    assert_eq!(problem.goal(&args, &params).unwrap(), 19.0);

    handle.release();
}

fn plugin_artifact_path() -> PathBuf {
    let (prefix, suffix) = if cfg!(target_os = "windows") {
        ("", ".dll")
    } else if cfg!(target_os = "macos") {
        ("lib", ".dylib")
    } else {
        ("lib", ".so")
    };

    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../target/debug")
        .join(format!("{prefix}quiver_problems{suffix}"))
}
