use thiserror::Error;

use crate::vector::{Norm, Vector, VectorError};

/// A stable identifier for an entry in a [`PointSet`].
///
/// Handles are assigned monotonically and are never reused, even after the
/// entry they name is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl Handle {
    /// Returns the raw index behind this handle.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An identifier for a cursor issued by [`PointSet::begin_cursor`] or
/// [`PointSet::end_cursor`].
///
/// Cursors are owned and tracked by the set that issued them so that
/// [`PointSet::remove`] and [`PointSet::clear`] can reposition any cursor
/// standing on a removed entry. A cursor stays valid until it is passed to
/// [`PointSet::release_cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(usize);

/// Where a cursor stands: on a live entry, or past the last one.
///
/// Retreating from the first live entry saturates there, and advancing from
/// `AfterLast` stays at `AfterLast`, so no before-first state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    At(usize),
    AfterLast,
}

/// An unordered collection of unique vectors of one fixed dimension.
///
/// Uniqueness is by exact equality under the L∞ norm: [`PointSet::put`]
/// returns the existing handle instead of inserting a duplicate. Removal
/// leaves a tombstone behind so that every other handle stays valid, and
/// atomically advances any cursor standing on the removed entry to the next
/// live one.
///
/// # Examples
/// ```
/// use quiver_core::{PointSet, Vector};
///
/// let mut set = PointSet::new(2)?;
/// let a = set.put(&Vector::new([1.0, 2.0])?)?;
/// let b = set.put(&Vector::new([1.0, 2.0])?)?;
///
/// assert_eq!(a, b);
/// assert_eq!(set.len(), 1);
/// # Ok::<(), quiver_core::SetError>(())
/// ```
#[derive(Debug)]
pub struct PointSet {
    dim: usize,
    entries: Vec<Option<Vector>>,
    cursors: Vec<Option<Position>>,
}

impl PointSet {
    /// Creates an empty set holding vectors of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::ZeroDimension`] if `dim` is zero.
    pub fn new(dim: usize) -> Result<Self, SetError> {
        if dim == 0 {
            return Err(SetError::ZeroDimension);
        }
        Ok(Self {
            dim,
            entries: Vec::new(),
            cursors: Vec::new(),
        })
    }

    /// Returns the dimension of the vectors this set holds.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Returns whether the set has no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a clone of `item`, or returns the handle of an entry already
    /// equal to it.
    ///
    /// Equality is exact: L∞ distance of zero.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::DimensionMismatch`] if `item` does not match the
    /// set's dimension.
    pub fn put(&mut self, item: &Vector) -> Result<Handle, SetError> {
        self.check_dim(item)?;

        for (index, entry) in self.entries.iter().enumerate() {
            let Some(existing) = entry else { continue };
            if existing.approx_eq(item, Norm::Inf, 0.0)? {
                return Ok(Handle(index));
            }
        }

        self.entries.push(Some(item.clone()));
        Ok(Handle(self.entries.len() - 1))
    }

    /// Returns a clone of the entry at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownHandle`] if the handle was never assigned
    /// and [`SetError::Removed`] if its entry has been removed.
    pub fn get(&self, handle: Handle) -> Result<Vector, SetError> {
        match self.entries.get(handle.0) {
            None => Err(SetError::UnknownHandle(handle.0)),
            Some(None) => Err(SetError::Removed(handle.0)),
            Some(Some(entry)) => Ok(entry.clone()),
        }
    }

    /// Removes the entry at `handle`, leaving a tombstone.
    ///
    /// Every cursor standing on the removed entry is advanced to the next
    /// live entry, or to the after-last position if none remains, before
    /// this call returns.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownHandle`] if the handle was never assigned
    /// and [`SetError::Removed`] if its entry was already removed.
    pub fn remove(&mut self, handle: Handle) -> Result<(), SetError> {
        match self.entries.get_mut(handle.0) {
            None => return Err(SetError::UnknownHandle(handle.0)),
            Some(None) => return Err(SetError::Removed(handle.0)),
            Some(entry) => *entry = None,
        }

        let next = self.next_live(handle.0);
        for cursor in self.cursors.iter_mut().flatten() {
            if *cursor == Position::At(handle.0) {
                *cursor = next;
            }
        }

        Ok(())
    }

    /// Returns whether the set holds an entry exactly equal to `item`
    /// under the L∞ norm.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::DimensionMismatch`] if `item` does not match the
    /// set's dimension.
    pub fn contains(&self, item: &Vector) -> Result<bool, SetError> {
        self.check_dim(item)?;

        for entry in self.entries.iter().flatten() {
            if entry.approx_eq(item, Norm::Inf, 0.0)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Removes every entry and moves every live cursor to the after-last
    /// position.
    ///
    /// Tombstoned slots are retained: handles stay monotonic and are not
    /// reused by later insertions.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
        for cursor in self.cursors.iter_mut().flatten() {
            *cursor = Position::AfterLast;
        }
    }

    /// Issues a cursor standing on the first live entry, or at the
    /// after-last position if the set is empty.
    pub fn begin_cursor(&mut self) -> Cursor {
        let position = self.first_live();
        self.issue(position)
    }

    /// Issues a cursor standing at the after-last position.
    pub fn end_cursor(&mut self) -> Cursor {
        self.issue(Position::AfterLast)
    }

    /// Moves the cursor to the next live entry, saturating at the
    /// after-last position.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownCursor`] if the cursor was released or
    /// never issued by this set.
    pub fn advance(&mut self, cursor: Cursor) -> Result<(), SetError> {
        let position = match self.position(cursor)? {
            Position::At(index) => self.next_live(index),
            Position::AfterLast => Position::AfterLast,
        };
        self.cursors[cursor.0] = Some(position);
        Ok(())
    }

    /// Moves the cursor to the previous live entry.
    ///
    /// Retreating from the first live entry stays on it; retreating from
    /// the after-last position lands on the last live entry.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownCursor`] if the cursor was released or
    /// never issued by this set.
    pub fn retreat(&mut self, cursor: Cursor) -> Result<(), SetError> {
        let position = match self.position(cursor)? {
            Position::At(index) => match self.prev_live(index) {
                Position::AfterLast => self.first_live(),
                live => live,
            },
            Position::AfterLast => self.last_live(),
        };
        self.cursors[cursor.0] = Some(position);
        Ok(())
    }

    /// Returns whether the cursor stands on the first live entry.
    ///
    /// An empty set has no first entry, so a cursor at the after-last
    /// position reports both at-begin and at-end.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownCursor`] if the cursor was released or
    /// never issued by this set.
    pub fn is_at_begin(&self, cursor: Cursor) -> Result<bool, SetError> {
        Ok(self.position(cursor)? == self.first_live())
    }

    /// Returns whether the cursor stands at the after-last position.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownCursor`] if the cursor was released or
    /// never issued by this set.
    pub fn is_at_end(&self, cursor: Cursor) -> Result<bool, SetError> {
        Ok(self.position(cursor)? == Position::AfterLast)
    }

    /// Returns the handle of the entry the cursor stands on.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownCursor`] if the cursor was released or
    /// never issued by this set, and [`SetError::CursorExhausted`] if it
    /// stands at the after-last position.
    pub fn handle_at(&self, cursor: Cursor) -> Result<Handle, SetError> {
        match self.position(cursor)? {
            Position::At(index) => Ok(Handle(index)),
            Position::AfterLast => Err(SetError::CursorExhausted),
        }
    }

    /// Returns a clone of the entry the cursor stands on.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownCursor`] if the cursor was released or
    /// never issued by this set, and [`SetError::CursorExhausted`] if it
    /// stands at the after-last position.
    pub fn item(&self, cursor: Cursor) -> Result<Vector, SetError> {
        self.get(self.handle_at(cursor)?)
    }

    /// Releases a cursor, detaching it from the set's tracking.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::UnknownCursor`] if the cursor was already
    /// released or never issued by this set.
    pub fn release_cursor(&mut self, cursor: Cursor) -> Result<(), SetError> {
        self.position(cursor)?;
        self.cursors[cursor.0] = None;
        Ok(())
    }

    fn issue(&mut self, position: Position) -> Cursor {
        self.cursors.push(Some(position));
        Cursor(self.cursors.len() - 1)
    }

    fn position(&self, cursor: Cursor) -> Result<Position, SetError> {
        self.cursors
            .get(cursor.0)
            .copied()
            .flatten()
            .ok_or(SetError::UnknownCursor(cursor.0))
    }

    fn first_live(&self) -> Position {
        self.live_at_or_after(0)
    }

    fn next_live(&self, index: usize) -> Position {
        self.live_at_or_after(index + 1)
    }

    fn live_at_or_after(&self, from: usize) -> Position {
        self.entries
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, entry)| entry.is_some())
            .map_or(Position::AfterLast, |(index, _)| Position::At(index))
    }

    fn prev_live(&self, index: usize) -> Position {
        self.entries[..index]
            .iter()
            .rposition(|entry| entry.is_some())
            .map_or(Position::AfterLast, Position::At)
    }

    fn last_live(&self) -> Position {
        self.prev_live(self.entries.len())
    }

    fn check_dim(&self, item: &Vector) -> Result<(), SetError> {
        if item.dim() == self.dim {
            Ok(())
        } else {
            Err(SetError::DimensionMismatch {
                expected: self.dim,
                actual: item.dim(),
            })
        }
    }
}

/// Errors that can occur when operating on a [`PointSet`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetError {
    /// A set must hold vectors of at least one coordinate.
    #[error("point set dimension cannot be zero")]
    ZeroDimension,

    /// The item's dimension does not match the set's.
    #[error("dimension mismatch: set holds {expected}-dimensional points, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The handle was never assigned by this set.
    #[error("handle {0} was never assigned")]
    UnknownHandle(usize),

    /// The entry behind the handle has been removed.
    #[error("entry at handle {0} has been removed")]
    Removed(usize),

    /// The cursor was released or never issued by this set.
    #[error("cursor {0} was released or never issued")]
    UnknownCursor(usize),

    /// The cursor stands at the after-last position.
    #[error("cursor is at the after-last position")]
    CursorExhausted,

    /// A vector operation failed.
    #[error("vector operation failed")]
    Vector(#[from] VectorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f64, y: f64) -> Vector {
        Vector::new([x, y]).unwrap()
    }

    #[test]
    fn put_deduplicates_exact_matches() {
        let mut set = PointSet::new(2).unwrap();

        let first = set.put(&vec2(1.0, 2.0)).unwrap();
        let second = set.put(&vec2(1.0, 2.0)).unwrap();

        assert_eq!(first, second);
        assert_eq!(set.len(), 1);

        // A nearby but distinct point is a new entry.
        let third = set.put(&vec2(1.0, 2.0 + 1e-9)).unwrap();
        assert_ne!(first, third);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn put_rejects_wrong_dimension() {
        let mut set = PointSet::new(2).unwrap();
        let v3 = Vector::zeros(3).unwrap();

        assert!(matches!(
            set.put(&v3),
            Err(SetError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn get_distinguishes_unknown_from_removed() {
        let mut set = PointSet::new(2).unwrap();
        let handle = set.put(&vec2(1.0, 1.0)).unwrap();

        assert_eq!(set.get(handle).unwrap().as_slice(), &[1.0, 1.0]);
        assert!(matches!(
            set.get(Handle(42)),
            Err(SetError::UnknownHandle(42))
        ));

        set.remove(handle).unwrap();
        assert!(matches!(set.get(handle), Err(SetError::Removed(_))));
        assert!(matches!(set.remove(handle), Err(SetError::Removed(_))));
    }

    #[test]
    fn handles_survive_removal_of_other_entries() {
        let mut set = PointSet::new(2).unwrap();
        let a = set.put(&vec2(0.0, 0.0)).unwrap();
        let b = set.put(&vec2(1.0, 1.0)).unwrap();
        let c = set.put(&vec2(2.0, 2.0)).unwrap();

        set.remove(b).unwrap();

        assert_eq!(set.get(a).unwrap().as_slice(), &[0.0, 0.0]);
        assert_eq!(set.get(c).unwrap().as_slice(), &[2.0, 2.0]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn contains_uses_exact_equality() {
        let mut set = PointSet::new(2).unwrap();
        set.put(&vec2(1.0, 2.0)).unwrap();

        assert!(set.contains(&vec2(1.0, 2.0)).unwrap());
        assert!(!set.contains(&vec2(1.0, 2.0 + 1e-12)).unwrap());

        let v3 = Vector::zeros(3).unwrap();
        assert!(matches!(
            set.contains(&v3),
            Err(SetError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn cursor_walks_live_entries_in_both_directions() {
        let mut set = PointSet::new(2).unwrap();
        let a = set.put(&vec2(0.0, 0.0)).unwrap();
        let b = set.put(&vec2(1.0, 1.0)).unwrap();
        let c = set.put(&vec2(2.0, 2.0)).unwrap();
        set.remove(b).unwrap();

        let cursor = set.begin_cursor();
        assert!(set.is_at_begin(cursor).unwrap());
        assert_eq!(set.handle_at(cursor).unwrap(), a);

        // Advancing skips the tombstone at b.
        set.advance(cursor).unwrap();
        assert_eq!(set.handle_at(cursor).unwrap(), c);

        set.advance(cursor).unwrap();
        assert!(set.is_at_end(cursor).unwrap());
        assert!(matches!(set.item(cursor), Err(SetError::CursorExhausted)));

        // Advancing past after-last saturates.
        set.advance(cursor).unwrap();
        assert!(set.is_at_end(cursor).unwrap());

        // Retreating from after-last lands on the last live entry.
        set.retreat(cursor).unwrap();
        assert_eq!(set.handle_at(cursor).unwrap(), c);

        set.retreat(cursor).unwrap();
        assert_eq!(set.handle_at(cursor).unwrap(), a);

        // Retreating past the first live entry stays there.
        set.retreat(cursor).unwrap();
        assert_eq!(set.handle_at(cursor).unwrap(), a);
        assert!(set.is_at_begin(cursor).unwrap());
    }

    #[test]
    fn removing_pointed_to_entry_advances_cursor() {
        let mut set = PointSet::new(2).unwrap();
        let a = set.put(&vec2(0.0, 0.0)).unwrap();
        let b = set.put(&vec2(1.0, 1.0)).unwrap();

        let cursor = set.begin_cursor();
        assert_eq!(set.handle_at(cursor).unwrap(), a);

        set.remove(a).unwrap();
        assert_eq!(set.handle_at(cursor).unwrap(), b);

        // Removing the last live entry sends the cursor to after-last.
        set.remove(b).unwrap();
        assert!(set.is_at_end(cursor).unwrap());
    }

    #[test]
    fn removal_fixes_up_every_affected_cursor() {
        let mut set = PointSet::new(2).unwrap();
        let a = set.put(&vec2(0.0, 0.0)).unwrap();
        let b = set.put(&vec2(1.0, 1.0)).unwrap();

        let first = set.begin_cursor();
        let second = set.begin_cursor();
        let parked = set.end_cursor();

        set.remove(a).unwrap();

        assert_eq!(set.handle_at(first).unwrap(), b);
        assert_eq!(set.handle_at(second).unwrap(), b);
        assert!(set.is_at_end(parked).unwrap());
    }

    #[test]
    fn clear_sends_all_cursors_to_after_last() {
        let mut set = PointSet::new(2).unwrap();
        set.put(&vec2(0.0, 0.0)).unwrap();
        let last = set.put(&vec2(1.0, 1.0)).unwrap();

        let cursor = set.begin_cursor();
        set.clear();

        assert!(set.is_at_end(cursor).unwrap());
        assert_eq!(set.len(), 0);

        // Handles are not reused after clear.
        let fresh = set.put(&vec2(0.0, 0.0)).unwrap();
        assert!(fresh.index() > last.index());
    }

    #[test]
    fn released_cursors_are_rejected() {
        let mut set = PointSet::new(2).unwrap();
        set.put(&vec2(0.0, 0.0)).unwrap();

        let cursor = set.begin_cursor();
        set.release_cursor(cursor).unwrap();

        assert!(matches!(
            set.advance(cursor),
            Err(SetError::UnknownCursor(_))
        ));
        assert!(matches!(
            set.release_cursor(cursor),
            Err(SetError::UnknownCursor(_))
        ));

        // Other cursors are unaffected by a release.
        let survivor = set.begin_cursor();
        assert!(set.is_at_begin(survivor).unwrap());
    }

    #[test]
    fn begin_cursor_on_empty_set_is_at_end() {
        let mut set = PointSet::new(2).unwrap();
        let cursor = set.begin_cursor();

        assert!(set.is_at_end(cursor).unwrap());
        assert!(set.is_at_begin(cursor).unwrap());
    }
}
