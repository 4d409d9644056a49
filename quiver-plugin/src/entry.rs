use crate::capability::Extension;

/// The name of the factory symbol every Quiver plugin exports.
///
/// The host resolves exactly this symbol and calls it at most once per
/// loaded module.
pub const ENTRY_SYMBOL: &str = "quiver_extension_entry";

/// The signature of the exported factory.
///
/// Returns a pointer owned by the caller, or null if the extension could
/// not be constructed.
pub type RawEntry = unsafe extern "C" fn() -> *mut ExtensionBox;

/// A thin-pointer wrapper carrying a `Box<dyn Extension>` across the
/// C-linkage factory.
///
/// Trait-object pointers are fat and therefore not C-representable, so
/// the factory moves one behind a second, thin allocation. The wrapper is
/// opaque to plugins and hosts alike; only [`declare_extension!`] creates
/// one and only the loader unwraps one.
///
/// The payload is a Rust trait object, so host and plugin must be built
/// with the same toolchain. That constraint comes with the design and is
/// part of the plugin contract.
pub struct ExtensionBox(Box<dyn Extension>);

impl ExtensionBox {
    /// Wraps an extension for transport through the factory.
    #[must_use]
    pub fn new(extension: Box<dyn Extension>) -> Self {
        Self(extension)
    }

    pub(crate) fn into_inner(self) -> Box<dyn Extension> {
        self.0
    }
}

/// Emits the C-linkage factory a plugin binary must export.
///
/// The argument is a `fn() -> Option<Box<dyn Extension>>` constructor;
/// `None` becomes the null pointer the host treats as a failed factory.
///
/// # Examples
/// ```ignore
/// quiver_plugin::declare_extension!(|| {
///     Some(Box::new(MyExtension::new()) as Box<dyn quiver_plugin::Extension>)
/// });
/// ```
#[macro_export]
macro_rules! declare_extension {
    ($ctor:expr) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn quiver_extension_entry() -> *mut $crate::ExtensionBox {
            let ctor: fn() -> Option<Box<dyn $crate::Extension>> = $ctor;
            match ctor() {
                Some(extension) => Box::into_raw(Box::new($crate::ExtensionBox::new(extension))),
                None => std::ptr::null_mut(),
            }
        }
    };
}
