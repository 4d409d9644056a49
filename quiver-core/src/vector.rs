use thiserror::Error;

/// Norms supported by [`Vector::norm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum Norm {
    /// Sum of absolute coordinate values.
    L1,
    /// Euclidean norm.
    L2,
    /// Maximum absolute coordinate value.
    Inf,
}

/// A fixed-dimension real vector.
///
/// The dimension is set at construction and is always positive. A `Vector`
/// exclusively owns its coordinate buffer; [`Clone`] produces a fully
/// independent copy.
///
/// Operations that combine two vectors require equal dimensions and fail
/// with [`VectorError::DimensionMismatch`] otherwise.
///
/// # Examples
/// ```
/// use quiver_core::{Norm, Vector};
///
/// let mut a = Vector::new([3.0, 4.0])?;
/// let b = Vector::new([1.0, 1.0])?;
///
/// assert_eq!(a.norm(Norm::L2), 5.0);
/// a.add(&b)?;
/// assert_eq!(a.as_slice(), &[4.0, 5.0]);
/// # Ok::<(), quiver_core::VectorError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    coords: Vec<f64>,
}

impl Vector {
    /// Creates a vector from the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ZeroDimension`] if `coords` is empty.
    pub fn new(coords: impl Into<Vec<f64>>) -> Result<Self, VectorError> {
        let coords = coords.into();
        if coords.is_empty() {
            return Err(VectorError::ZeroDimension);
        }
        Ok(Self { coords })
    }

    /// Creates an all-zero vector of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ZeroDimension`] if `dim` is zero.
    pub fn zeros(dim: usize) -> Result<Self, VectorError> {
        Self::new(vec![0.0; dim])
    }

    /// Returns the dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Returns the coordinate buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// Returns the coordinate at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] if `index >= dim`.
    pub fn coord(&self, index: usize) -> Result<f64, VectorError> {
        self.coords
            .get(index)
            .copied()
            .ok_or(VectorError::IndexOutOfRange {
                index,
                dim: self.dim(),
            })
    }

    /// Sets the coordinate at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] if `index >= dim`.
    pub fn set_coord(&mut self, index: usize, value: f64) -> Result<(), VectorError> {
        let dim = self.dim();
        match self.coords.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(VectorError::IndexOutOfRange { index, dim }),
        }
    }

    /// Replaces the entire coordinate buffer, changing the dimension if the
    /// new one differs.
    ///
    /// The replacement is all-or-nothing: on error the vector is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ZeroDimension`] if `coords` is empty.
    pub fn set_coords(&mut self, coords: &[f64]) -> Result<(), VectorError> {
        if coords.is_empty() {
            return Err(VectorError::ZeroDimension);
        }
        self.coords = coords.to_vec();
        Ok(())
    }

    /// Adds `rhs` to this vector in place.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn add(&mut self, rhs: &Vector) -> Result<(), VectorError> {
        self.check_dim(rhs)?;
        for (lhs, rhs) in self.coords.iter_mut().zip(&rhs.coords) {
            *lhs += rhs;
        }
        Ok(())
    }

    /// Subtracts `rhs` from this vector in place.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn sub(&mut self, rhs: &Vector) -> Result<(), VectorError> {
        self.check_dim(rhs)?;
        for (lhs, rhs) in self.coords.iter_mut().zip(&rhs.coords) {
            *lhs -= rhs;
        }
        Ok(())
    }

    /// Multiplies every coordinate by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for coord in &mut self.coords {
            *coord *= factor;
        }
    }

    /// Returns the dot product of this vector and `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn dot(&self, rhs: &Vector) -> Result<f64, VectorError> {
        self.check_dim(rhs)?;
        Ok(self
            .coords
            .iter()
            .zip(&rhs.coords)
            .map(|(lhs, rhs)| lhs * rhs)
            .sum())
    }

    /// Returns `left + right` as a new vector.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn sum(left: &Vector, right: &Vector) -> Result<Vector, VectorError> {
        let mut result = left.clone();
        result.add(right)?;
        Ok(result)
    }

    /// Returns `left - right` as a new vector.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn difference(left: &Vector, right: &Vector) -> Result<Vector, VectorError> {
        let mut result = left.clone();
        result.sub(right)?;
        Ok(result)
    }

    /// Returns the norm of this vector.
    #[must_use]
    pub fn norm(&self, norm: Norm) -> f64 {
        match norm {
            Norm::L1 => self.coords.iter().map(|c| c.abs()).sum(),
            Norm::L2 => self.coords.iter().map(|c| c * c).sum::<f64>().sqrt(),
            Norm::Inf => self.coords.iter().fold(0.0, |max, c| c.abs().max(max)),
        }
    }

    /// Returns whether every coordinate of this vector is strictly less
    /// than the corresponding coordinate of `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn strictly_less(&self, rhs: &Vector) -> Result<bool, VectorError> {
        self.check_dim(rhs)?;
        Ok(self
            .coords
            .iter()
            .zip(&rhs.coords)
            .all(|(lhs, rhs)| lhs < rhs))
    }

    /// Returns whether every coordinate of this vector is strictly greater
    /// than the corresponding coordinate of `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn strictly_greater(&self, rhs: &Vector) -> Result<bool, VectorError> {
        self.check_dim(rhs)?;
        Ok(self
            .coords
            .iter()
            .zip(&rhs.coords)
            .all(|(lhs, rhs)| lhs > rhs))
    }

    /// Returns whether `norm(self - rhs) <= precision`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if dimensions differ.
    pub fn approx_eq(&self, rhs: &Vector, norm: Norm, precision: f64) -> Result<bool, VectorError> {
        let difference = Vector::difference(self, rhs)?;
        Ok(difference.norm(norm) <= precision)
    }

    fn check_dim(&self, rhs: &Vector) -> Result<(), VectorError> {
        if self.dim() == rhs.dim() {
            Ok(())
        } else {
            Err(VectorError::DimensionMismatch {
                left: self.dim(),
                right: rhs.dim(),
            })
        }
    }
}

/// Errors that can occur when constructing or operating on a [`Vector`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VectorError {
    /// A vector must have at least one coordinate.
    #[error("vector dimension cannot be zero")]
    ZeroDimension,

    /// The two operands have different dimensions.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A coordinate index is beyond the vector's dimension.
    #[error("coordinate index {index} is out of range for dimension {dim}")]
    IndexOutOfRange { index: usize, dim: usize },
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn zeros_is_all_zero() {
        for dim in 1..=8 {
            let v = Vector::zeros(dim).unwrap();
            assert_eq!(v.dim(), dim);
            assert!(v.as_slice().iter().all(|&c| c == 0.0));
        }
    }

    #[test]
    fn rejects_zero_dimension() {
        assert!(matches!(Vector::zeros(0), Err(VectorError::ZeroDimension)));
        assert!(matches!(
            Vector::new(Vec::new()),
            Err(VectorError::ZeroDimension)
        ));
    }

    #[test]
    fn add_then_subtract_restores_original() {
        let a = Vector::new([1.5, -2.25, 0.75]).unwrap();
        let b = Vector::new([0.5, 4.0, -1.25]).unwrap();

        let mut roundtrip = Vector::sum(&a, &b).unwrap();
        roundtrip.sub(&b).unwrap();

        assert!(roundtrip.approx_eq(&a, Norm::L2, 0.0).unwrap());
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let mut a = Vector::zeros(2).unwrap();
        let b = Vector::zeros(3).unwrap();

        assert!(matches!(
            a.add(&b),
            Err(VectorError::DimensionMismatch { left: 2, right: 3 })
        ));
        assert!(matches!(
            a.sub(&b),
            Err(VectorError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            a.dot(&b),
            Err(VectorError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            a.strictly_less(&b),
            Err(VectorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn scale_and_dot() {
        let mut a = Vector::new([1.0, 2.0, 3.0]).unwrap();
        a.scale(2.0);
        assert_eq!(a.as_slice(), &[2.0, 4.0, 6.0]);

        let b = Vector::new([1.0, 1.0, 1.0]).unwrap();
        assert_relative_eq!(a.dot(&b).unwrap(), 12.0);
    }

    #[test]
    fn norms() {
        let v = Vector::new([3.0, -4.0]).unwrap();
        assert_relative_eq!(v.norm(Norm::L1), 7.0);
        assert_relative_eq!(v.norm(Norm::L2), 5.0);
        assert_relative_eq!(v.norm(Norm::Inf), 4.0);
    }

    #[test]
    fn strict_comparisons_are_coordinate_wise() {
        let low = Vector::new([0.0, 0.0]).unwrap();
        let high = Vector::new([1.0, 1.0]).unwrap();
        let mixed = Vector::new([2.0, -1.0]).unwrap();

        assert!(low.strictly_less(&high).unwrap());
        assert!(high.strictly_greater(&low).unwrap());

        // One coordinate above, one below: neither less nor greater.
        assert!(!mixed.strictly_less(&high).unwrap());
        assert!(!mixed.strictly_greater(&high).unwrap());

        // Strict: equality in any coordinate disqualifies.
        assert!(!low.strictly_less(&low).unwrap());
    }

    #[test]
    fn coordinate_access_bounds() {
        let mut v = Vector::new([1.0, 2.0]).unwrap();

        assert_eq!(v.coord(1).unwrap(), 2.0);
        v.set_coord(0, 5.0).unwrap();
        assert_eq!(v.coord(0).unwrap(), 5.0);

        assert!(matches!(
            v.coord(2),
            Err(VectorError::IndexOutOfRange { index: 2, dim: 2 })
        ));
        assert!(matches!(
            v.set_coord(7, 0.0),
            Err(VectorError::IndexOutOfRange { index: 7, dim: 2 })
        ));
    }

    #[test]
    fn set_coords_replaces_buffer_and_dimension() {
        let mut v = Vector::new([1.0, 2.0]).unwrap();

        v.set_coords(&[9.0, 8.0, 7.0]).unwrap();
        assert_eq!(v.dim(), 3);
        assert_eq!(v.as_slice(), &[9.0, 8.0, 7.0]);

        assert!(matches!(v.set_coords(&[]), Err(VectorError::ZeroDimension)));
        // Failed replacement leaves the vector untouched.
        assert_eq!(v.as_slice(), &[9.0, 8.0, 7.0]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = Vector::new([1.0, 2.0]).unwrap();
        let copy = original.clone();

        original.set_coord(0, 100.0).unwrap();

        assert_eq!(copy.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn approx_eq_uses_norm_of_difference() {
        let a = Vector::new([1.0, 1.0]).unwrap();
        let b = Vector::new([1.05, 0.95]).unwrap();

        assert!(a.approx_eq(&b, Norm::Inf, 0.05).unwrap());
        assert!(!a.approx_eq(&b, Norm::L1, 0.05).unwrap());
        assert!(a.approx_eq(&a, Norm::L2, 0.0).unwrap());
    }
}
