mod grid;

pub use grid::GridIter;

use thiserror::Error;

use crate::vector::{Vector, VectorError};

/// Number of steps the default traversal step divides each extent into.
const DEFAULT_STEPS: f64 = 1000.0;

/// An axis-aligned compact region: the half-open box `[begin, end)` with a
/// traversal step.
///
/// All three vectors share one dimension. `begin` is strictly below `end`
/// in every coordinate, and the step is strictly positive and strictly
/// smaller than the extent `end - begin` in every coordinate. A region owns
/// clones of the vectors it was built from.
///
/// Set-algebra operations mutate the region atomically: either all three
/// vectors are replaced, or the region is left untouched.
///
/// # Examples
/// ```
/// use quiver_core::{Region, Vector};
///
/// let begin = Vector::new([0.0, 0.0])?;
/// let end = Vector::new([10.0, 10.0])?;
/// let mut region = Region::new(&begin, &end, None)?;
///
/// let other = Region::new(&Vector::new([5.0, 5.0])?, &Vector::new([15.0, 15.0])?, None)?;
/// region.intersection(&other)?;
///
/// assert_eq!(region.begin().as_slice(), &[5.0, 5.0]);
/// assert_eq!(region.end().as_slice(), &[10.0, 10.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    begin: Vector,
    end: Vector,
    step: Vector,
}

impl Region {
    /// Creates a region from its corners and an optional traversal step.
    ///
    /// When `step` is omitted, a default of `(end - begin) / 1000` per
    /// coordinate is synthesized.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if the vectors disagree
    /// on dimension, [`RegionError::BeginNotBelowEnd`] unless `begin` is
    /// strictly below `end` in every coordinate, and
    /// [`RegionError::NonPositiveStep`] or
    /// [`RegionError::StepExceedsExtent`] for a malformed custom step.
    pub fn new(begin: &Vector, end: &Vector, step: Option<&Vector>) -> Result<Self, RegionError> {
        check_dims(begin, end)?;
        if let Some(step) = step {
            check_dims(begin, step)?;
        }

        if !begin.strictly_less(end)? {
            return Err(RegionError::BeginNotBelowEnd);
        }

        let extent = Vector::difference(end, begin)?;
        let step = match step {
            Some(step) => {
                validate_step(step, &extent)?;
                step.clone()
            }
            None => default_step(&extent),
        };

        Ok(Self {
            begin: begin.clone(),
            end: end.clone(),
            step,
        })
    }

    /// Returns the inclusive lower corner.
    #[must_use]
    pub fn begin(&self) -> &Vector {
        &self.begin
    }

    /// Returns the exclusive upper corner.
    #[must_use]
    pub fn end(&self) -> &Vector {
        &self.end
    }

    /// Returns the region's traversal step.
    #[must_use]
    pub fn step(&self) -> &Vector {
        &self.step
    }

    /// Returns the dimension of the region.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.begin.dim()
    }

    /// Shrinks this region to its intersection with `other`.
    ///
    /// The new corners are the coordinate-wise max of the begins and min of
    /// the ends; the new step is the coordinate-wise min of the two steps,
    /// except that a fresh default step is synthesized when that min does
    /// not fit strictly inside the reduced extent. On error the region is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if dimensions differ and
    /// [`RegionError::NoOverlap`] if the regions do not intersect.
    pub fn intersection(&mut self, other: &Region) -> Result<(), RegionError> {
        check_dims(&self.begin, &other.begin)?;

        let dim = self.dim();
        let mut begin = Vec::with_capacity(dim);
        let mut end = Vec::with_capacity(dim);
        let mut step = Vec::with_capacity(dim);
        let mut regenerate_step = false;

        for i in 0..dim {
            let lo = self.begin.as_slice()[i].max(other.begin.as_slice()[i]);
            let hi = self.end.as_slice()[i].min(other.end.as_slice()[i]);
            if lo >= hi {
                return Err(RegionError::NoOverlap);
            }

            let s = self.step.as_slice()[i].min(other.step.as_slice()[i]);
            if s >= hi - lo {
                regenerate_step = true;
            }

            begin.push(lo);
            end.push(hi);
            step.push(s);
        }

        let begin = Vector::new(begin)?;
        let end = Vector::new(end)?;
        let step = if regenerate_step {
            default_step(&Vector::difference(&end, &begin)?)
        } else {
            Vector::new(step)?
        };

        self.begin = begin;
        self.end = end;
        self.step = step;
        Ok(())
    }

    /// Grows this region to the bounding box of itself and `other`.
    ///
    /// The new corners are the coordinate-wise min of the begins and max of
    /// the ends; the new step is the coordinate-wise min of the two steps.
    /// Unlike [`Region::intersection`], the step is not re-validated
    /// against the new extent: the union box is never smaller than either
    /// operand, so a step that fit before still fits.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if dimensions differ.
    pub fn union(&mut self, other: &Region) -> Result<(), RegionError> {
        check_dims(&self.begin, &other.begin)?;

        let dim = self.dim();
        let mut begin = Vec::with_capacity(dim);
        let mut end = Vec::with_capacity(dim);
        let mut step = Vec::with_capacity(dim);

        for i in 0..dim {
            begin.push(self.begin.as_slice()[i].min(other.begin.as_slice()[i]));
            end.push(self.end.as_slice()[i].max(other.end.as_slice()[i]));
            step.push(self.step.as_slice()[i].min(other.step.as_slice()[i]));
        }

        let begin = Vector::new(begin)?;
        let end = Vector::new(end)?;
        let step = Vector::new(step)?;

        self.begin = begin;
        self.end = end;
        self.step = step;
        Ok(())
    }

    /// Replaces this region with its symmetric difference with `other`.
    ///
    /// Axis-aligned boxes are closed under neither difference nor symmetric
    /// difference, so this degenerates to [`Region::union`] — the smallest
    /// region covering both operands. A known limitation, not a richer
    /// set-difference.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if dimensions differ.
    pub fn symmetric_difference(&mut self, other: &Region) -> Result<(), RegionError> {
        self.union(other)
    }

    /// Replaces this region with its convex hull.
    ///
    /// An axis-aligned box is already convex, so this is a no-op.
    pub fn make_convex(&mut self) {}

    /// Returns whether `point` lies inside the half-open box.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if `point` has a
    /// different dimension.
    pub fn contains(&self, point: &Vector) -> Result<bool, RegionError> {
        check_dims(&self.begin, point)?;

        Ok(point
            .as_slice()
            .iter()
            .zip(self.begin.as_slice())
            .zip(self.end.as_slice())
            .all(|((&x, &lo), &hi)| lo <= x && x < hi))
    }

    /// Returns whether this region lies entirely inside `other`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if dimensions differ.
    pub fn is_subset_of(&self, other: &Region) -> Result<bool, RegionError> {
        check_dims(&self.begin, &other.begin)?;

        Ok((0..self.dim()).all(|i| {
            other.begin.as_slice()[i] <= self.begin.as_slice()[i]
                && self.end.as_slice()[i] <= other.end.as_slice()[i]
        }))
    }

    /// Returns whether this region and `other` overlap.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if dimensions differ.
    pub fn intersects(&self, other: &Region) -> Result<bool, RegionError> {
        check_dims(&self.begin, &other.begin)?;

        Ok((0..self.dim()).all(|i| {
            let lo = self.begin.as_slice()[i].max(other.begin.as_slice()[i]);
            let hi = self.end.as_slice()[i].min(other.end.as_slice()[i]);
            lo < hi
        }))
    }

    /// Returns whether the region is simply connected.
    ///
    /// Always true: an axis-aligned box has no holes.
    #[must_use]
    pub fn is_simply_connected(&self) -> bool {
        true
    }

    /// Returns the grid node `begin + k∘step` nearest to `point`, clamping
    /// the point into the box first.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`] if `point` has a
    /// different dimension.
    pub fn nearest_grid_point(&self, point: &Vector) -> Result<Vector, RegionError> {
        check_dims(&self.begin, point)?;

        let mut nearest = Vec::with_capacity(self.dim());
        for i in 0..self.dim() {
            let lo = self.begin.as_slice()[i];
            let hi = self.end.as_slice()[i];
            let step = self.step.as_slice()[i];

            // Largest k with lo + k*step < hi.
            let last = ((hi - lo) / step).ceil() - 1.0;
            let k = ((point.as_slice()[i] - lo) / step).round().clamp(0.0, last);
            nearest.push(lo + k * step);
        }

        Ok(Vector::new(nearest)?)
    }

    /// Returns an iterator over the grid `begin + k∘step` using the
    /// region's own step.
    #[must_use]
    pub fn grid(&self) -> GridIter {
        GridIter::new(self, self.step.clone())
    }

    /// Returns a grid iterator with a custom traversal step, leaving the
    /// region's own step untouched.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Region::new`] for a malformed step.
    pub fn grid_with_step(&self, step: &Vector) -> Result<GridIter, RegionError> {
        check_dims(&self.begin, step)?;
        let extent = Vector::difference(&self.end, &self.begin)?;
        validate_step(step, &extent)?;
        Ok(GridIter::new(self, step.clone()))
    }
}

fn check_dims(left: &Vector, right: &Vector) -> Result<(), RegionError> {
    if left.dim() == right.dim() {
        Ok(())
    } else {
        Err(RegionError::DimensionMismatch {
            left: left.dim(),
            right: right.dim(),
        })
    }
}

fn validate_step(step: &Vector, extent: &Vector) -> Result<(), RegionError> {
    if !step.as_slice().iter().all(|&s| s > 0.0) {
        return Err(RegionError::NonPositiveStep);
    }
    if !step.strictly_less(extent)? {
        return Err(RegionError::StepExceedsExtent);
    }
    Ok(())
}

fn default_step(extent: &Vector) -> Vector {
    let mut step = extent.clone();
    step.scale(1.0 / DEFAULT_STEPS);
    step
}

/// Errors that can occur when constructing or operating on a [`Region`].
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RegionError {
    /// The operand vectors or regions disagree on dimension.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// `begin` must be strictly below `end` in every coordinate.
    #[error("begin must be strictly below end in every coordinate")]
    BeginNotBelowEnd,

    /// The traversal step must be strictly positive in every coordinate.
    #[error("step must be strictly positive in every coordinate")]
    NonPositiveStep,

    /// The traversal step must fit strictly inside the extent.
    #[error("step must be strictly smaller than the region extent in every coordinate")]
    StepExceedsExtent,

    /// The regions share no interior points.
    #[error("regions do not overlap")]
    NoOverlap,

    /// A vector operation failed.
    #[error("vector operation failed")]
    Vector(#[from] VectorError),
}
