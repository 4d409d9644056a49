//! Vector-space primitives and the optimization problem contract for the
//! Quiver framework.

mod point_set;
mod problem;
mod region;
mod vector;

pub use point_set::{Cursor, Handle, PointSet, SetError};
pub use problem::{Problem, ProblemError, Variable};
pub use region::{GridIter, Region, RegionError};
pub use vector::{Norm, Vector, VectorError};
