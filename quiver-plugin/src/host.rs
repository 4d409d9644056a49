//! The host side of the plugin boundary.
//!
//! A module moves through three states: unloaded, loaded, released.
//! [`load`] performs the first transition and either returns a fully
//! constructed [`LoadedExtension`] or nothing at all — a failed load never
//! leaks a half-initialized handle. [`LoadedExtension::release`] performs
//! the second and consumes the handle, so double release and
//! use-after-release are rejected at compile time rather than detected at
//! run time.

use std::path::{Path, PathBuf};

use libloading::Library;
use thiserror::Error;

use crate::capability::{CapabilityKind, CapabilityRef, Extension};
use crate::entry::{ENTRY_SYMBOL, RawEntry};

/// A loaded plugin module holding its single extension object.
///
/// The handle owns both the extension and (for dynamically loaded
/// modules) the library it came from. Field order carries the teardown
/// order: the extension is dropped first, while the code its vtable
/// points into is still mapped.
pub struct LoadedExtension {
    extension: Box<dyn Extension>,
    _module: Option<Library>,
}

impl LoadedExtension {
    /// Returns whether the extension can act as `kind`.
    #[must_use]
    pub fn supports(&self, kind: CapabilityKind) -> bool {
        self.extension.supports(kind)
    }

    /// Returns a typed view of the extension as `kind`.
    ///
    /// The view borrows from this handle, so it cannot outlive a
    /// [`release`](Self::release).
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnsupportedCapability`] if the extension does
    /// not declare support for `kind`.
    pub fn query(&mut self, kind: CapabilityKind) -> Result<CapabilityRef<'_>, HostError> {
        match self.extension.query(kind) {
            Some(view) => Ok(view),
            None => {
                log::warn!("extension does not support capability {kind:?}");
                Err(HostError::UnsupportedCapability(kind))
            }
        }
    }

    /// Destroys the extension object, then unloads its module.
    ///
    /// Consuming `self` makes this callable exactly once; dropping the
    /// handle has the same effect.
    pub fn release(self) {
        log::debug!("releasing extension");
        drop(self);
    }
}

/// Loads the plugin binary at `path` and constructs its extension.
///
/// Resolves the factory exported under [`ENTRY_SYMBOL`] and invokes it
/// exactly once.
///
/// # Errors
///
/// Returns [`HostError::ModuleNotLoadable`] if the binary cannot be
/// opened, [`HostError::EntrySymbolMissing`] if it does not export the
/// factory, and [`HostError::FactoryFailed`] if the factory returns null.
pub fn load(path: impl AsRef<Path>) -> Result<LoadedExtension, HostError> {
    let path = path.as_ref();

    // SAFETY: opening a module runs its initializers. The path comes from
    // the host operator; trusting it is the plugin model's premise.
    let module = unsafe { Library::new(path) }.map_err(|source| HostError::ModuleNotLoadable {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = {
        // SAFETY: the plugin contract fixes the symbol's signature to
        // `RawEntry`; a module exporting it with any other signature is
        // outside the contract.
        let entry = unsafe { module.get::<RawEntry>(ENTRY_SYMBOL.as_bytes()) }.map_err(
            |source| HostError::EntrySymbolMissing {
                path: path.to_path_buf(),
                source,
            },
        )?;
        // SAFETY: invoked exactly once per loaded module.
        unsafe { entry() }
    };

    if raw.is_null() {
        log::warn!(
            "extension factory in {} returned null",
            path.display()
        );
        return Err(HostError::FactoryFailed {
            path: path.to_path_buf(),
        });
    }

    // SAFETY: a non-null result is the factory's `Box::into_raw` output;
    // reconstituting the box takes ownership exactly once.
    let extension = unsafe { Box::from_raw(raw) }.into_inner();

    log::info!("loaded extension module {}", path.display());

    Ok(LoadedExtension {
        extension,
        _module: Some(module),
    })
}

/// Wraps an in-process extension factory in the same handle type [`load`]
/// produces.
///
/// Useful for statically linked extensions and for exercising host logic
/// in tests without a shared-library artifact.
///
/// # Errors
///
/// Returns [`HostError::InProcessFactoryFailed`] if the factory declines
/// to construct an extension.
pub fn load_in_process(
    factory: fn() -> Option<Box<dyn Extension>>,
) -> Result<LoadedExtension, HostError> {
    match factory() {
        Some(extension) => Ok(LoadedExtension {
            extension,
            _module: None,
        }),
        None => Err(HostError::InProcessFactoryFailed),
    }
}

/// Errors the host side of the plugin boundary can report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
    /// The binary could not be opened as a module.
    #[error("failed to load plugin module {}", path.display())]
    ModuleNotLoadable {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// The module does not export the factory symbol.
    #[error("module {} does not export `{ENTRY_SYMBOL}`", path.display())]
    EntrySymbolMissing {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// The module's factory returned null.
    #[error("extension factory in {} returned null", path.display())]
    FactoryFailed { path: PathBuf },

    /// An in-process factory declined to construct an extension.
    #[error("in-process extension factory returned nothing")]
    InProcessFactoryFailed,

    /// The extension does not support the queried capability.
    #[error("extension does not support capability {0:?}")]
    UnsupportedCapability(CapabilityKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An extension that declares no capabilities at all.
    struct InertExtension;

    impl Extension for InertExtension {
        fn supports(&self, _kind: CapabilityKind) -> bool {
            false
        }

        fn query(&mut self, _kind: CapabilityKind) -> Option<CapabilityRef<'_>> {
            None
        }
    }

    fn inert_factory() -> Option<Box<dyn Extension>> {
        Some(Box::new(InertExtension))
    }

    fn failing_factory() -> Option<Box<dyn Extension>> {
        None
    }

    #[test]
    fn load_rejects_missing_module() {
        let result = load("/nonexistent/quiver-test-plugin.so");
        assert!(matches!(result, Err(HostError::ModuleNotLoadable { .. })));
    }

    #[test]
    fn in_process_factory_failure_yields_no_handle() {
        assert!(matches!(
            load_in_process(failing_factory),
            Err(HostError::InProcessFactoryFailed)
        ));
    }

    #[test]
    fn unsupported_capability_is_an_error() {
        let mut handle = load_in_process(inert_factory).unwrap();

        assert!(!handle.supports(CapabilityKind::Problem));
        assert!(matches!(
            handle.query(CapabilityKind::Problem),
            Err(HostError::UnsupportedCapability(CapabilityKind::Problem))
        ));

        // Release is consuming; a second call would not compile.
        handle.release();
    }
}
