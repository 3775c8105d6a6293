use std::{fmt, ops::Deref, path::Path};

use num_traits::{AsPrimitive, Zero};

use crate::{
    element::{FileElement, TensorElement},
    error::TensorError,
    view::TensorViewMut,
    Tensor,
};

/// A tensor whose rank is always exactly `N`.
///
/// `FixedTensor` wraps a [`Tensor`] and rejects every operation that would change its rank
/// with [`TensorError::RankMismatch`], leaving the tensor untouched. All read-only
/// operations are available through [`Deref`]; mutating operations that cannot change the
/// rank are forwarded explicitly.
///
/// The element type is not part of the constraint: a `FixedTensor<f32, 3>` can be assigned
/// from any rank-3 tensor of a convertible element type.
///
/// # Examples
///
/// ```rust
/// use ndtensor::{ErrorKind, Tensor, Tensor3};
///
/// let mut e = Tensor3::<f32>::zeros([3, 5, 7]);
///
/// // same rank, different element type
/// let f = Tensor::from_shape_val(&[3, 5, 7], 1.0f64);
/// e.assign_from(&f).unwrap();
///
/// // rank 4 cannot be stored in a rank-3 tensor
/// let a = Tensor::from_shape_val(&[2, 3, 5, 7], 1.0f64);
/// let err = e.assign_from(&a).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::RankMismatch);
/// assert_eq!(e.shape(), &[3, 5, 7]);
/// ```
#[derive(Clone, PartialEq)]
pub struct FixedTensor<T, const N: usize> {
    inner: Tensor<T>,
}

/// A rank-0 (scalar) tensor.
pub type Tensor0<T> = FixedTensor<T, 0>;

/// A rank-1 tensor.
pub type Tensor1<T> = FixedTensor<T, 1>;

/// A rank-2 tensor.
pub type Tensor2<T> = FixedTensor<T, 2>;

/// A rank-3 tensor.
pub type Tensor3<T> = FixedTensor<T, 3>;

/// A rank-4 tensor.
pub type Tensor4<T> = FixedTensor<T, 4>;

fn check_rank(expected: usize, actual: usize) -> Result<(), TensorError> {
    if expected != actual {
        return Err(TensorError::RankMismatch { expected, actual });
    }
    Ok(())
}

impl<T, const N: usize> FixedTensor<T, N> {
    /// Creates a new tensor with the given shape and data.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the number of elements does not match the
    /// shape.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        Ok(Self {
            inner: Tensor::from_shape_vec(&shape, data)?,
        })
    }

    /// Creates a new tensor with the given shape, filled with `value`.
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        Self {
            inner: Tensor::from_shape_val(&shape, value),
        }
    }

    /// Creates a new tensor by calling `f` with the full index of each element.
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        Self {
            inner: Tensor::from_shape_fn(&shape, f),
        }
    }

    /// Creates a new tensor with all elements set to zero.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Clone + Zero,
    {
        Self {
            inner: Tensor::zeros(&shape),
        }
    }

    /// Returns the shape as an array.
    pub fn shape_array(&self) -> [usize; N] {
        let mut shape = [0; N];
        shape.copy_from_slice(self.inner.shape());
        shape
    }

    /// Returns the wrapped tensor.
    #[inline]
    pub fn as_tensor(&self) -> &Tensor<T> {
        &self.inner
    }

    /// Consumes the fixed-rank wrapper and returns the underlying tensor.
    #[inline]
    pub fn into_inner(self) -> Tensor<T> {
        self.inner
    }

    /// Reallocates the tensor with a new shape of rank `N`, filled with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::RankMismatch`] if `shape.len() != N`.
    pub fn alloc(&mut self, shape: &[usize], value: T) -> Result<(), TensorError>
    where
        T: Clone,
    {
        check_rank(N, shape.len())?;
        self.inner.alloc(shape, value);
        Ok(())
    }

    /// Replaces the contents with a converted copy of `source`, adopting its shape.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::RankMismatch`] if `source` is not of rank `N`.
    pub fn assign_from<U>(&mut self, source: &Tensor<U>) -> Result<(), TensorError>
    where
        U: AsPrimitive<T>,
        T: Copy + 'static,
    {
        check_rank(N, source.rank())?;
        self.inner.assign_from(source);
        Ok(())
    }

    /// Reinterprets the tensor with a new shape of rank `N` and the same number of elements.
    ///
    /// # Errors
    ///
    /// - [`TensorError::RankMismatch`] if `shape.len() != N`.
    /// - [`TensorError::ShapeMismatch`] if the element counts differ.
    pub fn reshape(&mut self, shape: &[usize]) -> Result<(), TensorError> {
        check_rank(N, shape.len())?;
        self.inner.reshape(shape)
    }

    /// Permutes the axes, keeping the rank.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if `perm` is not a permutation of `0..N`.
    pub fn transpose(&self, perm: [usize; N]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        Ok(Self {
            inner: self.inner.transpose(&perm)?,
        })
    }

    /// See [`Tensor::get_mut`].
    #[inline]
    pub fn get_mut(&mut self, index: &[usize]) -> Result<&mut T, TensorError> {
        self.inner.get_mut(index)
    }

    /// See [`Tensor::slice_mut`].
    #[inline]
    pub fn slice_mut(&mut self, index: &[usize]) -> Result<TensorViewMut<'_, T>, TensorError> {
        self.inner.slice_mut(index)
    }

    /// See [`Tensor::at_mut`].
    #[inline]
    pub fn at_mut(&mut self, i: usize) -> Result<TensorViewMut<'_, T>, TensorError> {
        self.inner.at_mut(i)
    }

    /// See [`Tensor::as_slice_mut`].
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.inner.as_slice_mut()
    }

    /// See [`Tensor::iter_mut`].
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.inner.iter_mut()
    }

    /// See [`Tensor::view_mut`].
    #[inline]
    pub fn view_mut(&mut self) -> TensorViewMut<'_, T> {
        self.inner.view_mut()
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.inner.fill(value);
    }

    /// See [`Tensor::assign`].
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
        self.inner.assign(source, dest_index, src_index)
    }

    /// See [`Tensor::add_inplace`].
    pub fn add_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::AddAssign + Copy + 'static,
    {
        self.inner.add_inplace(other)?;
        Ok(self)
    }

    /// See [`Tensor::sub_inplace`].
    pub fn sub_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::SubAssign + Copy + 'static,
    {
        self.inner.sub_inplace(other)?;
        Ok(self)
    }

    /// See [`Tensor::mul_inplace`].
    pub fn mul_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::MulAssign + Copy + 'static,
    {
        self.inner.mul_inplace(other)?;
        Ok(self)
    }

    /// See [`Tensor::div_inplace`].
    pub fn div_inplace<U>(&mut self, other: &Tensor<U>) -> Result<&mut Self, TensorError>
    where
        U: AsPrimitive<T>,
        T: std::ops::DivAssign + Copy + 'static,
    {
        self.inner.div_inplace(other)?;
        Ok(self)
    }

    /// See [`Tensor::add_scalar`].
    pub fn add_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::AddAssign + Copy,
    {
        self.inner.add_scalar(value);
        self
    }

    /// See [`Tensor::sub_scalar`].
    pub fn sub_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::SubAssign + Copy,
    {
        self.inner.sub_scalar(value);
        self
    }

    /// See [`Tensor::mul_scalar`].
    pub fn mul_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::MulAssign + Copy,
    {
        self.inner.mul_scalar(value);
        self
    }

    /// See [`Tensor::div_scalar`].
    pub fn div_scalar(&mut self, value: T) -> &mut Self
    where
        T: std::ops::DivAssign + Copy,
    {
        self.inner.div_scalar(value);
        self
    }
}

impl<T: FileElement, const N: usize> FixedTensor<T, N> {
    /// Reads a tensor of rank `N` from a file.
    ///
    /// # Errors
    ///
    /// Everything [`Tensor::read`] reports, plus [`TensorError::RankMismatch`] if the file
    /// holds a tensor of another rank.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TensorError> {
        Self::try_from(Tensor::read(path)?)
    }

    /// Replaces the contents with a tensor read from a file.
    ///
    /// The tensor is left untouched if reading fails.
    pub fn read_from(&mut self, path: impl AsRef<Path>) -> Result<(), TensorError> {
        *self = Self::read(path)?;
        Ok(())
    }
}

impl<T, const N: usize> TryFrom<Tensor<T>> for FixedTensor<T, N> {
    type Error = TensorError;

    fn try_from(tensor: Tensor<T>) -> Result<Self, Self::Error> {
        check_rank(N, tensor.rank())?;
        Ok(Self { inner: tensor })
    }
}

impl<T, const N: usize> From<FixedTensor<T, N>> for Tensor<T> {
    fn from(tensor: FixedTensor<T, N>) -> Self {
        tensor.inner
    }
}

impl<T, const N: usize> Deref for FixedTensor<T, N> {
    type Target = Tensor<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: TensorElement, const N: usize> Default for FixedTensor<T, N> {
    /// A tensor of shape `[0; N]`; for `N == 0` a scalar holding `T::default()`.
    fn default() -> Self {
        Self::from_shape_val([0; N], T::default())
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedTensor<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedTensor")
            .field("rank", &N)
            .field("shape", &self.inner.shape())
            .field("data", &self.inner.as_slice())
            .finish()
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for FixedTensor<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
