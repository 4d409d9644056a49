//! Sample optimization problems for the Quiver framework.
//!
//! The crate builds both as an ordinary library and as a `cdylib`, so the
//! same problem serves statically linked hosts, in-process tests, and the
//! dynamic plugin path.

mod quadratic;

pub use quadratic::{QuadraticExtension, QuadraticProblem, extension_factory};

quiver_plugin::declare_extension!(crate::extension_factory);
