use std::fmt;

use num_traits::{AsPrimitive, Zero};

use crate::{
    error::TensorError,
    shape,
    storage::TensorStorage,
    view::{TensorView, TensorViewMut},
};

/// A dense multi-dimensional array of arbitrary rank with owned data.
///
/// `Tensor` owns one contiguous row-major buffer of `numel(shape)` elements together with its
/// shape. The two are always updated together: every operation that changes the shape
/// replaces the buffer in the same step, and every failing operation leaves both untouched.
///
/// # Indexing
///
/// - A *full* index (one component per axis) selects a single element: [`Tensor::get`],
///   [`Tensor::get_mut`].
/// - A *partial* index (fewer components than the rank) selects the sub-tensor spanned by the
///   trailing axes: [`Tensor::slice`], [`Tensor::slice_mut`], [`Tensor::at`].
/// - An index with more components than the rank is always a
///   [`TensorError::ShapeMismatch`], and any component beyond its axis is a
///   [`TensorError::IndexOutOfRange`].
///
/// # Rank
///
/// The rank of a `Tensor` can change freely (see [`Tensor::alloc`],
/// [`Tensor::assign_from`], [`Tensor::reshape`]). Use
/// [`FixedTensor`](crate::FixedTensor) when the rank must stay constant.
///
/// # Examples
///
/// ```rust
/// use ndtensor::Tensor;
///
/// let mut t = Tensor::from_shape_val(&[2, 3, 5, 7], 1.0f64);
/// assert_eq!(t.rank(), 4);
/// assert_eq!(t.numel(), 210);
///
/// *t.get_mut(&[1, 2, 4, 6]).unwrap() = 3.0;
/// assert_eq!(*t.get(&[1, 2, 4, 6]).unwrap(), 3.0);
///
/// // A(1, 2) is the 5x7 block with the two leading axes fixed
/// let block = t.slice(&[1, 2]).unwrap();
/// assert_eq!(block.shape(), &[5, 7]);
///
/// // too many indices
/// assert!(t.slice(&[0, 0, 0, 0, 0]).is_err());
/// ```
#[derive(Clone, PartialEq)]
pub struct Tensor<T> {
    storage: TensorStorage<T>,
    shape: Vec<usize>,
}

impl<T> Tensor<T> {
    pub(crate) fn from_parts(shape: Vec<usize>, data: Vec<T>) -> Self {
        debug_assert_eq!(shape::numel(&shape), data.len());
        Self {
            storage: TensorStorage::from_vec(data),
            shape,
        }
    }

    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, a
    /// [`TensorError::ShapeMismatch`] is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let data: Vec<u8> = vec![1, 2, 3, 4];
    /// let t = Tensor::from_shape_vec(&[2, 2], data).unwrap();
    /// assert_eq!(t.shape(), &[2, 2]);
    /// ```
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape::numel(shape);
        if numel != data.len() {
            return Err(TensorError::numel_mismatch(numel, data.len()));
        }
        Ok(Self::from_parts(shape.to_vec(), data))
    }

    /// Creates a new `Tensor` with the given shape and slice of data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, a
    /// [`TensorError::ShapeMismatch`] is returned.
    pub fn from_shape_slice(shape: &[usize], data: &[T]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        Self::from_shape_vec(shape, data.to_vec())
    }

    /// Creates a new `Tensor` with the given shape, filled with `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::from_shape_val(&[4], 0u8);
    /// assert_eq!(t.as_slice(), &[0, 0, 0, 0]);
    ///
    /// let t = Tensor::from_shape_val(&[2, 1, 3], 2u8);
    /// assert_eq!(t.as_slice(), &[2, 2, 2, 2, 2, 2]);
    ///
    /// // the empty shape is a scalar
    /// let t = Tensor::from_shape_val(&[], 1.0f32);
    /// assert_eq!(t.numel(), 1);
    /// ```
    pub fn from_shape_val(shape: &[usize], value: T) -> Self
    where
        T: Clone,
    {
        Self {
            storage: TensorStorage::from_elem(shape::numel(shape), value),
            shape: shape.to_vec(),
        }
    }

    /// Creates a new `Tensor` with the given shape and a function to generate the data.
    ///
    /// The function `f` is called with the full index of each element, in row-major order.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::from_shape_fn(&[2, 2], |idx| (idx[0] * 2 + idx[1]) as u8);
    /// assert_eq!(t.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let data = shape::MultiIndexIter::new(shape)
            .map(|index| f(&index))
            .collect();
        Self::from_parts(shape.to_vec(), data)
    }

    /// Create a new tensor with all elements set to zero.
    pub fn zeros(shape: &[usize]) -> Self
    where
        T: Clone + Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Creates a rank-0 tensor holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(Vec::new(), vec![value])
    }

    /// Replaces the buffer and shape with a new allocation filled with `value`.
    ///
    /// Always succeeds on a `Tensor`; the previous contents are dropped.
    pub fn alloc(&mut self, shape: &[usize], value: T)
    where
        T: Clone,
    {
        *self = Self::from_shape_val(shape, value);
    }

    /// The shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The number of axes of the tensor; 0 for a scalar.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns the row-major strides of the tensor, derived from its shape.
    pub fn strides(&self) -> Vec<usize> {
        shape::strides_from_shape(&self.shape)
    }

    /// Returns the tensor data as a slice, in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Returns the tensor data as a mutable slice, in row-major order.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Get the data of the tensor as a pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Consumes the tensor and returns the underlying vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }

    /// Returns an iterator over the elements of the tensor in row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let tensor = Tensor::from_shape_vec(&[5], vec![1, 2, 3, 4, 5]).unwrap();
    /// let sum: i32 = tensor.iter().sum();
    /// assert_eq!(sum, 15);
    /// ```
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns a mutable iterator over the elements of the tensor in row-major order.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_slice_mut().iter_mut()
    }

    /// Return a view of the whole tensor.
    #[inline]
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView::new(self.storage.as_slice(), &self.shape)
    }

    /// Return a mutable view of the whole tensor.
    #[inline]
    pub fn view_mut(&mut self) -> TensorViewMut<'_, T> {
        TensorViewMut::new(self.storage.as_mut_slice(), &self.shape)
    }

    /// Get the element at the given full index.
    ///
    /// # Errors
    ///
    /// - [`TensorError::ShapeMismatch`] if the index is not a full index.
    /// - [`TensorError::IndexOutOfRange`] if a component is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::from_shape_vec(&[2, 2], vec![1u8, 2, 3, 4]).unwrap();
    /// assert_eq!(*t.get(&[1, 0]).unwrap(), 3);
    /// assert!(t.get(&[2, 0]).is_err());
    /// ```
    pub fn get(&self, index: &[usize]) -> Result<&T, TensorError> {
        let offset = shape::offset_of(&self.shape, index)?;
        Ok(&self.storage.as_slice()[offset])
    }

    /// Get a mutable reference to the element at the given full index.
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::get`].
    pub fn get_mut(&mut self, index: &[usize]) -> Result<&mut T, TensorError> {
        let offset = shape::offset_of(&self.shape, index)?;
        Ok(&mut self.storage.as_mut_slice()[offset])
    }

    /// Returns a view of the sub-tensor selected by a full or partial index.
    ///
    /// The leading `index.len()` axes are fixed; the view spans the remaining axes. A full
    /// index yields a rank-0 view of one element.
    ///
    /// # Errors
    ///
    /// - [`TensorError::ShapeMismatch`] if the index has more components than the rank.
    /// - [`TensorError::IndexOutOfRange`] if a component is out of bounds.
    pub fn slice(&self, index: &[usize]) -> Result<TensorView<'_, T>, TensorError> {
        let loc = shape::locate(&self.shape, index)?;
        let data = self.storage.view(loc.offset, loc.numel())?;
        Ok(TensorView::new(data, loc.residual))
    }

    /// Returns a mutable view of the sub-tensor selected by a full or partial index.
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::slice`].
    pub fn slice_mut(&mut self, index: &[usize]) -> Result<TensorViewMut<'_, T>, TensorError> {
        let loc = shape::locate(&self.shape, index)?;
        let data = self.storage.view_mut(loc.offset, loc.numel())?;
        Ok(TensorViewMut::new(data, loc.residual))
    }

    /// Returns the sub-tensor at position `i` of the first axis.
    ///
    /// # Errors
    ///
    /// A scalar has no axis to slice: on a rank-0 tensor this always returns
    /// [`TensorError::ShapeMismatch`]. Otherwise [`TensorError::IndexOutOfRange`] if `i` is
    /// out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::from_shape_vec(&[3, 2], vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(t.at(2).unwrap().as_slice(), &[5, 6]);
    ///
    /// let s = Tensor::scalar(1.0f32);
    /// assert!(s.at(0).is_err());
    /// ```
    pub fn at(&self, i: usize) -> Result<TensorView<'_, T>, TensorError> {
        let loc = shape::locate_slice(&self.shape, i)?;
        let data = self.storage.view(loc.offset, loc.numel())?;
        Ok(TensorView::new(data, loc.residual))
    }

    /// Mutable counterpart of [`Tensor::at`].
    pub fn at_mut(&mut self, i: usize) -> Result<TensorViewMut<'_, T>, TensorError> {
        let loc = shape::locate_slice(&self.shape, i)?;
        let data = self.storage.view_mut(loc.offset, loc.numel())?;
        Ok(TensorViewMut::new(data, loc.residual))
    }

    /// Replaces this tensor with a converted copy of `source`.
    ///
    /// The shape (and therefore the rank) of `source` is adopted. Each element is converted
    /// with `as` semantics, so assigning a float tensor into an integer tensor truncates
    /// toward zero.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let src = Tensor::from_shape_vec(&[3], vec![1.9f64, -0.5, 2.0]).unwrap();
    /// let mut dst = Tensor::<i32>::zeros(&[2, 2]);
    /// dst.assign_from(&src);
    /// assert_eq!(dst.shape(), &[3]);
    /// assert_eq!(dst.as_slice(), &[1, 0, 2]);
    /// ```
    pub fn assign_from<U>(&mut self, source: &Tensor<U>)
    where
        U: AsPrimitive<T>,
        T: Copy + 'static,
    {
        *self = source.cast();
    }

    /// Cast the tensor to a new element type.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::from_shape_vec(&[4], vec![1u8, 2, 3, 4]).unwrap();
    /// let t2 = t.cast::<f32>();
    /// assert_eq!(t2.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn cast<U>(&self) -> Tensor<U>
    where
        T: AsPrimitive<U>,
        U: Copy + 'static,
    {
        let data = self.iter().map(|&x| x.as_()).collect();
        Tensor::from_parts(self.shape.clone(), data)
    }

    /// Writes a sub-tensor of `source` into a sub-tensor of `self`.
    ///
    /// `dest_index` and `src_index` are independent partial indices into `self` and
    /// `source`. The two selected sub-tensors need the same number of elements, not the same
    /// shape: elements are copied positionally in row-major order, with type conversion.
    ///
    /// # Errors
    ///
    /// - [`TensorError::ShapeMismatch`] if either index is longer than its tensor's rank or
    ///   the selected element counts differ.
    /// - [`TensorError::IndexOutOfRange`] if either index has an out-of-bounds component.
    ///
    /// All checks run before any element is written.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let mut a = Tensor::from_shape_val(&[2, 3, 5, 7], 0.0f64);
    /// let c = Tensor::from_shape_val(&[6, 35], 1.0f32);
    ///
    /// // a(1, 2) has 35 elements, and so does c(0)
    /// a.assign(&c, &[1, 2], &[0]).unwrap();
    /// assert!(a.slice(&[1, 2]).unwrap().iter().all(|&x| x == 1.0));
    ///
    /// // b(1, 2) has 40 elements
    /// let b = Tensor::from_shape_val(&[2, 3, 5, 8], 1.0f64);
    /// assert!(a.assign(&b, &[1, 2], &[1, 2]).is_err());
    /// ```
    pub fn assign<U>(
        &mut self,
        source: &Tensor<U>,
        dest_index: &[usize],
        src_index: &[usize],
    ) -> Result<(), TensorError>
    where
        U: AsPrimitive<T>,
        T: Copy + 'static,
    {
        let mut dst = self.slice_mut(dest_index)?;
        let src = source.slice(src_index)?;
        dst.assign_from(&src)
    }

    /// Reinterprets the tensor with a new shape holding the same number of elements.
    ///
    /// The data is not moved.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element counts differ.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let mut t = Tensor::from_shape_vec(&[4], vec![1u8, 2, 3, 4]).unwrap();
    /// t.reshape(&[2, 2]).unwrap();
    /// assert_eq!(t.shape(), &[2, 2]);
    /// assert_eq!(t.strides(), vec![2, 1]);
    /// assert!(t.reshape(&[3]).is_err());
    /// ```
    pub fn reshape(&mut self, shape: &[usize]) -> Result<(), TensorError> {
        shape::check_same_numel(shape, &self.shape)?;
        self.shape = shape.to_vec();
        Ok(())
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.storage.as_mut_slice().fill(value);
    }

    /// Apply a function to each element of the tensor.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::from_shape_vec(&[4], vec![1u8, 2, 3, 4]).unwrap();
    /// let t2 = t.map(|x| *x as u16 + 1);
    /// assert_eq!(t2.as_slice(), &[2, 3, 4, 5]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Tensor<U>
    where
        F: Fn(&T) -> U,
    {
        let data = self.iter().map(f).collect();
        Tensor::from_parts(self.shape.clone(), data)
    }

    /// Perform an in-place element-wise operation with another tensor.
    ///
    /// Both tensors are walked as flat row-major sequences, so only their element counts
    /// have to agree. Elements of `other` are converted to `T` before `op` is applied; `self`
    /// keeps its shape.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element counts differ.
    pub fn element_wise_op_inplace<U, F>(
        &mut self,
        other: &Tensor<U>,
        op: F,
    ) -> Result<(), TensorError>
    where
        U: AsPrimitive<T>,
        T: Copy + 'static,
        F: Fn(&mut T, T),
    {
        shape::check_same_numel(&self.shape, other.shape())?;
        self.iter_mut()
            .zip(other.iter())
            .for_each(|(a, &b)| op(a, b.as_()));
        Ok(())
    }

    /// Adds `other` to `self` element by element.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element counts differ.
    ///
    /// # Panics
    ///
    /// Integer overflow panics in debug builds, as with the `+` operator.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let mut a = Tensor::from_shape_val(&[6], 1.0f64);
    /// let c = Tensor::from_shape_val(&[2, 3], 2.0f32);
    /// a.add_inplace(&c).unwrap().mul_inplace(&c).unwrap();
    /// assert_eq!(a.shape(), &[6]);
    /// assert!(a.iter().all(|&x| x == 6.0));
    /// ```
    pub fn add_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::AddAssign + Copy + 'static,
    {
        self.element_wise_op_inplace(other, |a, b| *a += b)?;
        Ok(self)
    }

    /// Subtracts `other` from `self` element by element.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element counts differ.
    ///
    /// # Panics
    ///
    /// Integer overflow panics in debug builds, as with the `-` operator.
    pub fn sub_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::SubAssign + Copy + 'static,
    {
        self.element_wise_op_inplace(other, |a, b| *a -= b)?;
        Ok(self)
    }

    /// Multiplies `self` by `other` element by element.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element counts differ.
    ///
    /// # Panics
    ///
    /// Integer overflow panics in debug builds, as with the `*` operator.
    pub fn mul_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::MulAssign + Copy + 'static,
    {
        self.element_wise_op_inplace(other, |a, b| *a *= b)?;
        Ok(self)
    }

    /// Divides `self` by `other` element by element.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element counts differ.
    ///
    /// # Panics
    ///
    /// Integer division by zero panics, as with the `/` operator.
    pub fn div_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::DivAssign + Copy + 'static,
    {
        self.element_wise_op_inplace(other, |a, b| *a /= b)?;
        Ok(self)
    }

    /// Adds `value` to every element.
    ///
    /// # Panics
    ///
    /// Integer overflow panics in debug builds, as with the `+` operator.
    pub fn add_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::AddAssign + Copy,
    {
        self.iter_mut().for_each(|a| *a += value);
        self
    }

    /// Subtracts `value` from every element.
    ///
    /// # Panics
    ///
    /// Integer overflow panics in debug builds, as with the `-` operator.
    pub fn sub_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::SubAssign + Copy,
    {
        self.iter_mut().for_each(|a| *a -= value);
        self
    }

    /// Multiplies every element by `value`.
    ///
    /// # Panics
    ///
    /// Integer overflow panics in debug builds, as with the `*` operator.
    pub fn mul_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::MulAssign + Copy,
    {
        self.iter_mut().for_each(|a| *a *= value);
        self
    }

    /// Divides every element by `value`.
    ///
    /// # Panics
    ///
    /// Integer division by zero panics, as with the `/` operator.
    pub fn div_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::DivAssign + Copy,
    {
        self.iter_mut().for_each(|a| *a /= value);
        self
    }

    /// Permutes (reorders) the axes of the tensor into a new tensor.
    ///
    /// `perm[i]` names the source axis that becomes axis `i` of the result, so the result has
    /// shape `[shape[perm[0]], shape[perm[1]], ...]` and its element at index `j` is the
    /// source element at index `i` with `i[perm[k]] == j[k]`. The identity permutation
    /// returns a copy.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if `perm` is not a permutation of
    /// `(0, 1, ..., rank - 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let tt = t.transpose(&[1, 0]).unwrap();
    /// assert_eq!(tt.shape(), &[3, 2]);
    /// assert_eq!(tt.as_slice(), &[1, 4, 2, 5, 3, 6]);
    ///
    /// assert!(t.transpose(&[1, 2]).is_err());
    /// ```
    pub fn transpose(&self, perm: &[usize]) -> Result<Tensor<T>, TensorError>
    where
        T: Clone,
    {
        shape::check_permutation(perm, self.rank())?;

        let strides = self.strides();
        let new_shape: Vec<usize> = perm.iter().map(|&axis| self.shape[axis]).collect();
        let new_strides: Vec<usize> = perm.iter().map(|&axis| strides[axis]).collect();

        // walk the output in row-major order, reading through the permuted strides
        let slice = self.as_slice();
        let total_elems = slice.len();
        let mut data = Vec::with_capacity(total_elems);
        let mut idx = vec![0; new_shape.len()];
        for _ in 0..total_elems {
            let offset = idx
                .iter()
                .zip(new_strides.iter())
                .map(|(&i, &s)| i * s)
                .sum::<usize>();
            data.push(slice[offset].clone());
            shape::increment_index(&mut idx, &new_shape);
        }

        Ok(Tensor::from_parts(new_shape, data))
    }
}

impl<T> Default for Tensor<T> {
    /// An empty rank-1 tensor of shape `[0]`.
    fn default() -> Self {
        Self::from_parts(vec![0], Vec::new())
    }
}

impl<T: fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("data", &self.as_slice())
            .finish()
    }
}

// extents above this are abbreviated when printing
const MAX_PRINTED_EXTENT: usize = 8;

fn fmt_axes<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    data: &[T],
    shape: &[usize],
    depth: usize,
    width: usize,
) -> fmt::Result {
    let Some((&size, rest)) = shape.split_first() else {
        return write!(f, "{:>width$}", data[0]);
    };

    let chunk = shape::numel(rest);
    let separator = if rest.is_empty() {
        ", ".to_string()
    } else {
        format!(",{}{}", "\n".repeat(rest.len()), " ".repeat(depth + 1))
    };

    let masked = size > MAX_PRINTED_EXTENT;
    write!(f, "[")?;
    for i in 0..size {
        if masked && i > 3 && i < size - 1 {
            continue;
        }
        if i > 0 {
            write!(f, "{separator}")?;
        }
        if masked && i == 3 {
            write!(f, "...")?;
            continue;
        }
        fmt_axes(f, &data[i * chunk..(i + 1) * chunk], rest, depth + 1, width)?;
    }
    write!(f, "]")
}

impl<T: fmt::Display> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(0);
        fmt_axes(f, self.as_slice(), &self.shape, 0, width)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ErrorKind, TensorError};
    use crate::Tensor;

    #[test]
    fn constructor_1d() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(&[1], vec![1u8])?;
        assert_eq!(t.shape(), &[1]);
        assert_eq!(t.as_slice(), &[1]);
        assert_eq!(t.strides(), vec![1]);
        assert_eq!(t.numel(), 1);
        Ok(())
    }

    #[test]
    fn constructor_2d() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(&[1, 2], vec![1u8, 2])?;
        assert_eq!(t.shape(), &[1, 2]);
        assert_eq!(t.as_slice(), &[1, 2]);
        assert_eq!(t.strides(), vec![2, 1]);
        assert_eq!(t.numel(), 2);
        Ok(())
    }

    #[test]
    fn constructor_wrong_len() {
        let err = Tensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn scalar() -> Result<(), TensorError> {
        let t = Tensor::scalar(4.5f64);
        assert_eq!(t.rank(), 0);
        assert_eq!(t.numel(), 1);
        assert_eq!(*t.get(&[])?, 4.5);
        Ok(())
    }

    #[test]
    fn get_3d() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(&[2, 1, 3], vec![1u8, 2, 3, 4, 5, 6])?;
        assert_eq!(*t.get(&[0, 0, 0])?, 1);
        assert_eq!(*t.get(&[0, 0, 2])?, 3);
        assert_eq!(*t.get(&[1, 0, 0])?, 4);
        assert_eq!(*t.get(&[1, 0, 2])?, 6);
        assert_eq!(t.get(&[2, 0, 0]).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(t.get(&[0, 1, 0]).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(t.get(&[0, 0, 3]).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(t.get(&[0, 0]).unwrap_err().kind(), ErrorKind::ShapeMismatch);
        Ok(())
    }

    #[test]
    fn write_then_read_every_index() -> Result<(), TensorError> {
        let shape = [2, 3, 4];
        let mut t = Tensor::<i64>::zeros(&shape);
        for (n, index) in crate::shape::MultiIndexIter::new(&shape).enumerate() {
            *t.get_mut(&index)? = n as i64 * 10;
        }
        for (n, index) in crate::shape::MultiIndexIter::new(&shape).enumerate() {
            assert_eq!(*t.get(&index)?, n as i64 * 10);
        }
        Ok(())
    }

    #[test]
    fn index_length_before_bounds() {
        let a = Tensor::from_shape_val(&[2, 3, 5, 7], 1.0f64);

        // A(1, 2) is fine and is the block starting at A(1, 2, 0, 0)
        assert!(a.slice(&[1, 2]).is_ok());

        // A(0, 0, 0, 0, 0): too many indices
        let err = a.slice(&[0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

        // too many indices wins even when components are out of range
        let err = a.slice(&[0, 0, 0, 9, 9]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

        // A(1, 2, 4, 7): right length, last component out of range
        let err = a.slice(&[1, 2, 4, 7]).unwrap_err();
        assert!(matches!(
            err,
            TensorError::IndexOutOfRange {
                axis: 3,
                index: 7,
                size: 7
            }
        ));
    }

    #[test]
    fn slice_aliases_parent() -> Result<(), TensorError> {
        let mut t = Tensor::from_shape_fn(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as i32);
        {
            let row = t.slice(&[1])?;
            assert_eq!(row.as_slice(), &[3, 4, 5]);
            assert_eq!(row.as_slice().as_ptr(), t.as_slice()[3..].as_ptr());
        }
        t.at_mut(0)?.fill(-1);
        assert_eq!(t.as_slice(), &[-1, -1, -1, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn slicing_a_scalar_fails() {
        let d = Tensor::scalar(1.0f64);
        assert_eq!(d.at(0).unwrap_err().kind(), ErrorKind::ShapeMismatch);

        let mut d = d;
        assert_eq!(d.at_mut(0).unwrap_err().kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn alloc_changes_rank() {
        let mut t = Tensor::from_shape_val(&[3], 0u8);
        t.alloc(&[2, 3, 5, 7], 1);
        assert_eq!(t.shape(), &[2, 3, 5, 7]);
        assert_eq!(t.numel(), 210);
        assert!(t.iter().all(|&x| x == 1));
    }

    #[test]
    fn reshape() -> Result<(), TensorError> {
        let mut t = Tensor::from_shape_vec(&[2, 2], vec![1u8, 2, 3, 4])?;
        t.reshape(&[4])?;
        assert_eq!(t.shape(), &[4]);
        assert_eq!(t.as_slice(), &[1, 2, 3, 4]);

        let err = t.reshape(&[5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(t.shape(), &[4]);
        Ok(())
    }

    #[test]
    fn assign_from_other_type() {
        let f = Tensor::from_shape_vec(&[2, 2], vec![1.5f32, -2.7, 3.99, 1e10]).unwrap();
        let mut i = Tensor::<i32>::zeros(&[5]);
        i.assign_from(&f);
        assert_eq!(i.shape(), &[2, 2]);
        assert_eq!(i.as_slice(), &[1, -2, 3, i32::MAX]);
    }

    #[test]
    fn cast_2d() {
        let t = Tensor::from_shape_vec(&[2, 2], vec![1u8, 2, 3, 4]).unwrap();
        let t2 = t.cast::<u16>();
        assert_eq!(t2.shape(), &[2, 2]);
        assert_eq!(t2.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn map_2d() {
        let t = Tensor::from_shape_vec(&[2, 2], vec![1u8, 2, 3, 4]).unwrap();
        let t2 = t.map(|x| *x as f32 * 0.5);
        assert_eq!(t2.as_slice(), &[0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn assign_sub_tensors() -> Result<(), TensorError> {
        let mut a = Tensor::from_shape_val(&[2, 3, 5, 7], 0.0f64);
        let b = Tensor::from_shape_val(&[2, 3, 5, 8], 1.0f64);
        let c = Tensor::from_shape_fn(&[6, 35], |idx| (idx[0] * 35 + idx[1]) as f32);

        // 35 vs 40 elements
        let err = a.assign(&b, &[1, 2], &[1, 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert!(a.iter().all(|&x| x == 0.0));

        // same number of elements, different shapes
        a.assign(&c, &[1, 2], &[0])?;
        let block = a.slice(&[1, 2])?;
        for (n, &x) in block.iter().enumerate() {
            assert_eq!(x, n as f64);
        }

        // axis 1 has extent 3
        let err = a.assign(&c, &[1, 3], &[0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        // source index too long
        let err = a.assign(&c, &[0], &[0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        Ok(())
    }

    #[test]
    fn add_inplace_counts_only() -> Result<(), TensorError> {
        let mut a = Tensor::from_shape_val(&[6], 1i32);
        let c = Tensor::from_shape_fn(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as i32);
        a.add_inplace(&c)?;
        assert_eq!(a.shape(), &[6]);
        assert_eq!(a.as_slice(), &[1, 2, 3, 4, 5, 6]);

        let mut a = Tensor::from_shape_val(&[2, 3, 5, 7], 1.0f64);
        let b = Tensor::from_shape_val(&[2, 3, 5, 8], 1.0f64);
        let err = a.add_inplace(&b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert!(a.iter().all(|&x| x == 1.0));
        Ok(())
    }

    #[test]
    fn compound_ops_mixed_types() -> Result<(), TensorError> {
        let mut a = Tensor::from_shape_vec(&[4], vec![10.0f64, 20.0, 30.0, 40.0])?;
        let b = Tensor::from_shape_vec(&[2, 2], vec![1u8, 2, 3, 4])?;
        a.sub_inplace(&b)?;
        assert_eq!(a.as_slice(), &[9.0, 18.0, 27.0, 36.0]);
        a.div_inplace(&b)?;
        assert_eq!(a.as_slice(), &[9.0, 9.0, 9.0, 9.0]);
        a.mul_inplace(&b)?;
        assert_eq!(a.as_slice(), &[9.0, 18.0, 27.0, 36.0]);
        Ok(())
    }

    #[test]
    fn scalar_ops() {
        let mut t = Tensor::from_shape_val(&[3], 4i16);
        t.add_scalar(2).mul_scalar(3).sub_scalar(6).div_scalar(4);
        assert_eq!(t.as_slice(), &[3, 3, 3]);
    }

    #[test]
    fn compound_ops_chain() -> Result<(), TensorError> {
        let mut a = Tensor::from_shape_val(&[2, 2], 1i32);
        let b = Tensor::from_shape_vec(&[4], vec![1u8, 2, 3, 4])?;
        a.add_inplace(&b)?.mul_inplace(&b)?.sub_scalar(1);
        assert_eq!(a.as_slice(), &[1, 5, 11, 19]);

        let err = a.add_inplace(&b)?.div_inplace(&Tensor::<u8>::zeros(&[3])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(a.as_slice(), &[2, 7, 14, 23]);
        Ok(())
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn integer_overflow_panics() {
        let mut a = Tensor::from_shape_val(&[2], 200u8);
        let b = Tensor::from_shape_val(&[2], 100u8);
        let _ = a.add_inplace(&b);
    }

    #[test]
    fn transpose_2d() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6])?;
        let tt = t.transpose(&[1, 0])?;
        assert_eq!(tt.shape(), &[3, 2]);
        assert_eq!(tt.as_slice(), &[1, 4, 2, 5, 3, 6]);
        Ok(())
    }

    #[test]
    fn transpose_maps_indices() -> Result<(), TensorError> {
        let shape = [2, 3, 4];
        let t = Tensor::from_shape_fn(&shape, |idx| idx[0] * 100 + idx[1] * 10 + idx[2]);
        let perm = [2, 0, 1];
        let tt = t.transpose(&perm)?;
        assert_eq!(tt.shape(), &[4, 2, 3]);
        for j in crate::shape::MultiIndexIter::new(tt.shape()) {
            let mut i = [0; 3];
            for k in 0..3 {
                i[perm[k]] = j[k];
            }
            assert_eq!(tt.get(&j)?, t.get(&i)?);
        }
        Ok(())
    }

    #[test]
    fn transpose_is_invertible() -> Result<(), TensorError> {
        let t = Tensor::from_shape_fn(&[3, 5, 7], |idx| (idx[0] * 35 + idx[1] * 7 + idx[2]) as u64);
        for perm in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let inverse = crate::shape::inverse_permutation(&perm)?;
            let back = t.transpose(&perm)?.transpose(&inverse)?;
            assert_eq!(back, t);
        }
        Ok(())
    }

    #[test]
    fn transpose_invalid_permutation() {
        let f = Tensor::from_shape_val(&[3, 5, 7], 1u64);
        assert!(f.transpose(&[0, 2, 1]).is_ok());
        for perm in [&[1, 3, 2][..], &[0, 0, 1], &[0, 1], &[0, 1, 2, 3]] {
            let err = f.transpose(perm).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        }
    }

    #[test]
    fn transpose_scalar_and_identity() -> Result<(), TensorError> {
        let s = Tensor::scalar(3u8);
        assert_eq!(s.transpose(&[])?, s);

        let t = Tensor::from_shape_vec(&[2, 2], vec![1, 2, 3, 4])?;
        assert_eq!(t.transpose(&[0, 1])?, t);
        Ok(())
    }

    #[test]
    fn default_is_empty() {
        let t = Tensor::<f32>::default();
        assert_eq!(t.shape(), &[0]);
        assert_eq!(t.numel(), 0);
    }

    #[test]
    fn display_2d() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 60])?;
        assert_eq!(t.to_string(), "[[ 1,  2,  3],\n [ 4,  5, 60]]");
        Ok(())
    }

    #[test]
    fn display_3d() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(&[2, 1, 2], vec![1, 2, 3, 4])?;
        assert_eq!(t.to_string(), "[[[1, 2]],\n\n [[3, 4]]]");
        Ok(())
    }

    #[test]
    fn display_scalar_and_long_axis() -> Result<(), TensorError> {
        assert_eq!(Tensor::scalar(7u8).to_string(), "7");

        let t = Tensor::from_shape_fn(&[10], |idx| idx[0]);
        assert_eq!(t.to_string(), "[0, 1, 2, ..., 9]");
        Ok(())
    }
}
