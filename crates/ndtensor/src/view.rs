use num_traits::AsPrimitive;

use crate::{error::TensorError, shape, Tensor};

/// A non-owning view into a sub-tensor.
///
/// `TensorView` is what a partial index hands out: a borrowed, contiguous slice of the parent
/// buffer plus the shape of the trailing axes that were left free. No data is copied.
///
/// # Lifetime
///
/// The view borrows the parent tensor for its lifetime `'a`, so it can never outlive the
/// buffer it points into.
///
/// # Examples
///
/// ```rust
/// use ndtensor::Tensor;
///
/// let t = Tensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
///
/// // Fix the first axis: a view over the second row
/// let row = t.slice(&[1]).unwrap();
/// assert_eq!(row.shape(), &[3]);
/// assert_eq!(row.as_slice(), &[4, 5, 6]);
/// assert_eq!(*row.get(&[2]).unwrap(), 6);
/// ```
#[derive(Debug, PartialEq)]
pub struct TensorView<'a, T> {
    data: &'a [T],
    shape: &'a [usize],
}

// NOTE: manual impls so that views are copyable for any `T`.
impl<T> Clone for TensorView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TensorView<'_, T> {}

impl<'a, T> TensorView<'a, T> {
    pub(crate) fn new(data: &'a [T], shape: &'a [usize]) -> Self {
        debug_assert_eq!(data.len(), shape::numel(shape));
        Self { data, shape }
    }

    /// The shape of the viewed sub-tensor.
    #[inline]
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// The number of axes of the view.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// The number of elements in the view.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// The viewed elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns an iterator over the viewed elements in row-major order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.data.iter()
    }

    /// Gets the element at the given full index.
    ///
    /// # Errors
    ///
    /// See [`shape::offset_of`].
    pub fn get(&self, index: &[usize]) -> Result<&'a T, TensorError> {
        let offset = shape::offset_of(self.shape, index)?;
        Ok(&self.data[offset])
    }

    /// Narrows the view with a further full or partial index.
    ///
    /// # Errors
    ///
    /// See [`shape::locate`].
    pub fn slice(&self, index: &[usize]) -> Result<TensorView<'a, T>, TensorError> {
        let loc = shape::locate(self.shape, index)?;
        Ok(TensorView::new(&self.data[loc.range()], loc.residual))
    }

    /// Narrows the view along its first axis.
    ///
    /// # Errors
    ///
    /// See [`shape::locate_slice`].
    pub fn at(&self, i: usize) -> Result<TensorView<'a, T>, TensorError> {
        let loc = shape::locate_slice(self.shape, i)?;
        Ok(TensorView::new(&self.data[loc.range()], loc.residual))
    }

    /// Copies the viewed elements into a new owned tensor.
    pub fn to_tensor(&self) -> Tensor<T>
    where
        T: Clone,
    {
        Tensor::from_parts(self.shape.to_vec(), self.data.to_vec())
    }
}

/// A mutable, non-owning view into a sub-tensor.
///
/// Writing through the view writes into the parent tensor in place.
///
/// # Examples
///
/// ```rust
/// use ndtensor::Tensor;
///
/// let mut t = Tensor::<i32>::zeros(&[2, 3]);
/// t.slice_mut(&[0]).unwrap().fill(7);
/// *t.slice_mut(&[1]).unwrap().get_mut(&[2]).unwrap() = 1;
/// assert_eq!(t.as_slice(), &[7, 7, 7, 0, 0, 1]);
/// ```
#[derive(Debug)]
pub struct TensorViewMut<'a, T> {
    data: &'a mut [T],
    shape: &'a [usize],
}

impl<'a, T> TensorViewMut<'a, T> {
    pub(crate) fn new(data: &'a mut [T], shape: &'a [usize]) -> Self {
        debug_assert_eq!(data.len(), shape::numel(shape));
        Self { data, shape }
    }

    /// The shape of the viewed sub-tensor.
    #[inline]
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// The number of axes of the view.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// The number of elements in the view.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// The viewed elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// The viewed elements in row-major order, mutably.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Returns an iterator over the viewed elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns a mutable iterator over the viewed elements.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Reborrows as an immutable view.
    #[inline]
    pub fn as_view(&self) -> TensorView<'_, T> {
        TensorView::new(&*self.data, self.shape)
    }

    /// Gets the element at the given full index.
    ///
    /// # Errors
    ///
    /// See [`shape::offset_of`].
    pub fn get(&self, index: &[usize]) -> Result<&T, TensorError> {
        let offset = shape::offset_of(self.shape, index)?;
        Ok(&self.data[offset])
    }

    /// Gets a mutable reference to the element at the given full index.
    ///
    /// # Errors
    ///
    /// See [`shape::offset_of`].
    pub fn get_mut(&mut self, index: &[usize]) -> Result<&mut T, TensorError> {
        let offset = shape::offset_of(self.shape, index)?;
        Ok(&mut self.data[offset])
    }

    /// Narrows the view with a further full or partial index.
    pub fn slice(&self, index: &[usize]) -> Result<TensorView<'_, T>, TensorError> {
        self.as_view().slice(index)
    }

    /// Narrows the view mutably with a further full or partial index.
    pub fn slice_mut(&mut self, index: &[usize]) -> Result<TensorViewMut<'_, T>, TensorError> {
        let loc = shape::locate(self.shape, index)?;
        Ok(TensorViewMut::new(&mut self.data[loc.range()], loc.residual))
    }

    /// Narrows the view mutably along its first axis.
    pub fn at_mut(&mut self, i: usize) -> Result<TensorViewMut<'_, T>, TensorError> {
        let loc = shape::locate_slice(self.shape, i)?;
        Ok(TensorViewMut::new(&mut self.data[loc.range()], loc.residual))
    }

    /// Sets every viewed element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }

    /// Copies `source` into the view, converting each element.
    ///
    /// The two sides only need the same number of elements; elements are matched
    /// positionally in row-major order, not axis by axis.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element counts differ. Nothing is written
    /// in that case.
    pub fn assign_from<U>(&mut self, source: &TensorView<'_, U>) -> Result<(), TensorError>
    where
        U: AsPrimitive<T>,
        T: Copy + 'static,
    {
        shape::check_same_numel(self.shape, source.shape())?;
        self.data
            .iter_mut()
            .zip(source.iter())
            .for_each(|(dst, &src)| *dst = src.as_());
        Ok(())
    }

    /// Copies the viewed elements into a new owned tensor.
    pub fn to_tensor(&self) -> Tensor<T>
    where
        T: Clone,
    {
        self.as_view().to_tensor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_tensor_view_from_slice() -> Result<(), TensorError> {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let view = TensorView::new(&data, &[2, 4]);

        assert_eq!(view.numel(), 8);
        assert_eq!(view.rank(), 2);
        assert_eq!(*view.get(&[0, 0])?, 1);
        assert_eq!(*view.get(&[1, 3])?, 8);
        assert_eq!(view.at(1)?.as_slice(), &[5, 6, 7, 8]);
        assert_eq!(view.slice(&[])?.as_slice(), &data);
        Ok(())
    }

    #[test]
    fn test_view_errors() {
        let data = [0.0f32; 6];
        let view = TensorView::new(&data, &[2, 3]);

        let err = view.get(&[0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        let err = view.slice(&[0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        let err = view.slice(&[0, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let scalar = TensorView::new(&data[..1], &[]);
        let err = scalar.at(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_view_mut_writes_through() -> Result<(), TensorError> {
        let mut data = [0i32; 6];
        {
            let mut view = TensorViewMut::new(&mut data, &[2, 3]);
            *view.get_mut(&[1, 1])? = 5;
            view.at_mut(0)?.fill(1);
            view.slice_mut(&[1, 2])?.fill(9);
        }
        assert_eq!(data, [1, 1, 1, 0, 5, 9]);
        Ok(())
    }

    #[test]
    fn test_view_assign_from_converts() -> Result<(), TensorError> {
        let src = [1.7f64, -2.2, 3.9];
        let mut dst = [0i32; 3];
        TensorViewMut::new(&mut dst, &[3]).assign_from(&TensorView::new(&src, &[1, 3]))?;
        assert_eq!(dst, [1, -2, 3]);

        let err = TensorViewMut::new(&mut dst, &[3])
            .assign_from(&TensorView::new(&src[..2], &[2]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(dst, [1, -2, 3]);
        Ok(())
    }

    #[test]
    fn test_view_to_tensor() -> Result<(), TensorError> {
        let data = [1u16, 2, 3, 4];
        let t = TensorView::new(&data, &[2, 2]).at(1)?.to_tensor();
        assert_eq!(t.shape(), &[2]);
        assert_eq!(t.as_slice(), &[3, 4]);
        Ok(())
    }
}
