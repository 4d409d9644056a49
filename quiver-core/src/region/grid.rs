use crate::vector::Vector;

use super::{Region, RegionError, validate_step};

/// An iterator over the grid `begin + k∘step` of a [`Region`].
///
/// Traversal is odometer order: the lowest coordinate advances first and
/// carries into higher coordinates when it would reach the exclusive upper
/// corner. The iterator holds clones of the region's corners and step, so
/// later mutation of the region does not affect a traversal in progress.
///
/// # Examples
/// ```
/// use quiver_core::{Region, Vector};
///
/// let region = Region::new(
///     &Vector::new([0.0, 0.0])?,
///     &Vector::new([1.0, 1.0])?,
///     Some(&Vector::new([0.5, 0.5])?),
/// )?;
///
/// let points: Vec<_> = region.grid().map(|p| p.as_slice().to_vec()).collect();
/// assert_eq!(
///     points,
///     [[0.0, 0.0], [0.5, 0.0], [0.0, 0.5], [0.5, 0.5]],
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct GridIter {
    begin: Vector,
    end: Vector,
    step: Vector,
    current: Vector,
    exhausted: bool,
}

impl GridIter {
    pub(super) fn new(region: &Region, step: Vector) -> Self {
        Self {
            begin: region.begin.clone(),
            end: region.end.clone(),
            step,
            current: region.begin.clone(),
            exhausted: false,
        }
    }

    /// Changes the traversal step from the current position onward.
    ///
    /// The owning region's step is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::DimensionMismatch`],
    /// [`RegionError::NonPositiveStep`], or
    /// [`RegionError::StepExceedsExtent`] for a step that is malformed for
    /// this iterator's region.
    pub fn set_step(&mut self, step: &Vector) -> Result<(), RegionError> {
        if step.dim() != self.begin.dim() {
            return Err(RegionError::DimensionMismatch {
                left: self.begin.dim(),
                right: step.dim(),
            });
        }
        let extent = Vector::difference(&self.end, &self.begin)?;
        validate_step(step, &extent)?;
        self.step = step.clone();
        Ok(())
    }

    /// Returns whether the traversal has walked past the last grid node.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn step_forward(&mut self) {
        for i in 0..self.current.dim() {
            let next = self.current.as_slice()[i] + self.step.as_slice()[i];
            if next < self.end.as_slice()[i] {
                // set_coord cannot fail: i < dim by construction.
                let _ = self.current.set_coord(i, next);
                return;
            }
            // Carry: reset this coordinate and advance the next one.
            let _ = self.current.set_coord(i, self.begin.as_slice()[i]);
        }
        self.exhausted = true;
    }
}

impl Iterator for GridIter {
    type Item = Vector;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let point = self.current.clone();
        self.step_forward();
        Some(point)
    }
}
