//! Capability model, plugin ABI, and host-side loader for the Quiver
//! framework.
//!
//! A plugin is a shared library exporting one zero-argument C-linkage
//! factory (emitted with [`declare_extension!`]) that constructs an
//! [`Extension`]: an opaque object the host interrogates for the
//! capabilities it supports. The host side lives in [`host`]: it loads the
//! binary, invokes the factory exactly once, and hands back a
//! [`host::LoadedExtension`] whose lifetime bounds every capability view
//! obtained from it.
//!
//! All `unsafe` in this crate sits in the two places the boundary is
//! genuinely foreign — symbol resolution and reconstituting the factory's
//! raw pointer — and is documented there. Everything above operates on
//! safe, owned values.

mod capability;
mod entry;

pub mod host;

pub use capability::{CapabilityKind, CapabilityRef, Extension};
pub use entry::{ENTRY_SYMBOL, ExtensionBox, RawEntry};
