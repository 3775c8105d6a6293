//! Shape and stride arithmetic.
//!
//! Pure functions mapping a shape and a (full or partial) multi-index to an offset into a
//! row-major buffer, plus the compatibility checks the tensor operations rely on. Nothing in
//! this module owns data.

use std::ops::Range;

use crate::error::TensorError;

/// Returns the number of elements of a tensor with the given shape.
///
/// The empty shape describes a scalar and holds exactly one element.
#[inline]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// Strides define how many elements to skip in memory to move along each dimension.
/// For row-major layout, the rightmost dimension has stride 1, and each dimension's
/// stride is the product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use ndtensor::shape::strides_from_shape;
///
/// // For a 2x3 matrix: [[a, b, c], [d, e, f]]
/// assert_eq!(strides_from_shape(&[2, 3]), vec![3, 1]);
///
/// // For a 2x3x4 tensor
/// assert_eq!(strides_from_shape(&[2, 3, 4]), vec![12, 4, 1]);
/// ```
pub fn strides_from_shape(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// The region of a row-major buffer selected by a full or partial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// Offset of the first selected element.
    pub offset: usize,
    /// Extents of the axes left free by the index.
    ///
    /// Empty when the index was a full index.
    pub residual: &'a [usize],
}

impl Location<'_> {
    /// Number of elements in the selected region.
    #[inline]
    pub fn numel(&self) -> usize {
        numel(self.residual)
    }

    /// The buffer range covered by the selected region.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.numel()
    }

    /// Returns true if the index selected exactly one element through a full index.
    #[inline]
    pub fn is_element(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Resolves a full or partial index against a shape.
///
/// Fixing the leading `index.len()` axes of a row-major tensor selects a contiguous block of
/// memory, so the result is an offset plus the shape of the trailing axes.
///
/// # Errors
///
/// - [`TensorError::ShapeMismatch`] if the index has more components than the shape has
///   axes. This is checked first and wins over any out-of-range component.
/// - [`TensorError::IndexOutOfRange`] if any component is not below the extent of its axis.
///
/// # Example
///
/// ```rust
/// use ndtensor::shape::locate;
///
/// let loc = locate(&[2, 3, 4], &[1, 2]).unwrap();
/// assert_eq!(loc.offset, 20);
/// assert_eq!(loc.residual, &[4]);
/// ```
pub fn locate<'a>(shape: &'a [usize], index: &[usize]) -> Result<Location<'a>, TensorError> {
    if index.len() > shape.len() {
        return Err(TensorError::too_many_indices(index.len(), shape.len()));
    }

    let mut offset = 0;
    for (axis, (&idx, &size)) in index.iter().zip(shape).enumerate() {
        if idx >= size {
            return Err(TensorError::index_out_of_range(axis, idx, size));
        }
        offset = offset * size + idx;
    }

    let residual = &shape[index.len()..];
    Ok(Location {
        offset: offset * numel(residual),
        residual,
    })
}

/// Resolves a full index to the offset of a single element.
///
/// # Errors
///
/// Same as [`locate`], plus [`TensorError::ShapeMismatch`] if the index is partial.
pub fn offset_of(shape: &[usize], index: &[usize]) -> Result<usize, TensorError> {
    let loc = locate(shape, index)?;
    if !loc.is_element() {
        return Err(TensorError::shape_mismatch(format!(
            "expected a full index of {} components, got {}",
            shape.len(),
            index.len()
        )));
    }
    Ok(loc.offset)
}

/// Resolves the single-axis slice `[i]` of a tensor.
///
/// # Errors
///
/// A rank-0 tensor has no axis to slice and always fails with
/// [`TensorError::ShapeMismatch`]; otherwise same as [`locate`].
pub fn locate_slice(shape: &[usize], i: usize) -> Result<Location<'_>, TensorError> {
    if shape.is_empty() {
        return Err(TensorError::shape_mismatch("cannot slice a rank-0 tensor"));
    }
    locate(shape, &[i])
}

/// Converts a row-major offset back into a full multi-index.
///
/// The reverse of [`locate`] for full indices. The offset is not checked against the shape.
pub fn unravel(offset: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    let mut rem = offset;
    for (i, &size) in shape.iter().enumerate().rev() {
        if size == 0 {
            continue;
        }
        index[i] = rem % size;
        rem /= size;
    }
    index
}

/// Advances a multi-index to its row-major successor.
///
/// Returns `false` once the index wraps around past the last element (it is then reset to all
/// zeros).
#[inline]
pub fn increment_index(index: &mut [usize], shape: &[usize]) -> bool {
    for dim in (0..index.len()).rev() {
        index[dim] += 1;
        if index[dim] < shape[dim] {
            return true;
        }
        index[dim] = 0;
    }
    false
}

/// Iterator over all multi-indices of a shape in row-major order.
///
/// A scalar shape yields the empty index exactly once; a shape with a zero extent yields
/// nothing.
#[derive(Debug, Clone)]
pub struct MultiIndexIter {
    shape: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl MultiIndexIter {
    /// Creates an iterator over the indices of `shape`.
    pub fn new(shape: &[usize]) -> Self {
        let next = (numel(shape) > 0).then(|| vec![0; shape.len()]);
        Self {
            shape: shape.to_vec(),
            next,
        }
    }
}

impl Iterator for MultiIndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        if increment_index(&mut successor, &self.shape) {
            self.next = Some(successor);
        }
        Some(current)
    }
}

/// Checks that two shapes hold the same number of elements.
///
/// The shapes themselves may differ; this is the compatibility rule of element-wise
/// arithmetic and sub-tensor assignment.
pub fn check_same_numel(expected: &[usize], actual: &[usize]) -> Result<(), TensorError> {
    let (n_expected, n_actual) = (numel(expected), numel(actual));
    if n_expected != n_actual {
        return Err(TensorError::shape_mismatch(format!(
            "expected {n_expected} elements {expected:?}, but got {n_actual} elements {actual:?}"
        )));
    }
    Ok(())
}

/// Checks that two shapes are identical axis by axis.
pub fn check_same_shape(expected: &[usize], actual: &[usize]) -> Result<(), TensorError> {
    if expected != actual {
        return Err(TensorError::shape_mismatch(format!(
            "expected shape {expected:?}, but got {actual:?}"
        )));
    }
    Ok(())
}

/// Checks that `perm` is a permutation of `0..rank`.
pub fn check_permutation(perm: &[usize], rank: usize) -> Result<(), TensorError> {
    let invalid = || {
        TensorError::shape_mismatch(format!(
            "axis order {perm:?} must be a permutation of (0, 1, ..., {})",
            rank as isize - 1
        ))
    };

    if perm.len() != rank {
        return Err(invalid());
    }
    let mut seen = vec![false; rank];
    for &axis in perm {
        if axis >= rank || seen[axis] {
            return Err(invalid());
        }
        seen[axis] = true;
    }
    Ok(())
}

/// Checks that `axis` names an axis of a tensor with the given rank.
#[inline]
pub fn check_axis(axis: usize, rank: usize) -> Result<(), TensorError> {
    if axis >= rank {
        return Err(TensorError::AxisOutOfRange { axis, rank });
    }
    Ok(())
}

/// Returns the inverse of a permutation, so that `inverse[perm[i]] == i`.
///
/// # Errors
///
/// Returns [`TensorError::ShapeMismatch`] if `perm` is not a permutation of `0..perm.len()`.
pub fn inverse_permutation(perm: &[usize]) -> Result<Vec<usize>, TensorError> {
    check_permutation(perm, perm.len())?;
    let mut inverse = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inverse[p] = i;
    }
    Ok(inverse)
}
