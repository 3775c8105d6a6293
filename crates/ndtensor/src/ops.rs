//! Element-wise arithmetic between tensors.
//!
//! Operands only need the same number of elements: both are walked as flat row-major
//! sequences, the right-hand side is converted to the element type of the left-hand side, and
//! the result keeps the shape of the left-hand side.

use num_traits::AsPrimitive;

use crate::{error::TensorError, Tensor};

/// Add two tensors.
///
/// # Arguments
///
/// * `lhs` - Left-hand side tensor.
/// * `rhs` - Right-hand side tensor, of any convertible element type.
///
/// # Returns
///
/// A new `Tensor` with the shape of `lhs` holding the element-wise sum, or a
/// [`TensorError::ShapeMismatch`] if the element counts differ.
pub fn add<T, U>(lhs: &Tensor<T>, rhs: &Tensor<U>) -> Result<Tensor<T>, TensorError>
where
    T: std::ops::AddAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    let mut out = lhs.clone();
    out.add_inplace(rhs)?;
    Ok(out)
}

/// Subtract two tensors.
///
/// # Arguments
///
/// * `lhs` - Left-hand side tensor.
/// * `rhs` - Right-hand side tensor, of any convertible element type.
///
/// # Returns
///
/// A new `Tensor` with the shape of `lhs` holding the element-wise difference, or a
/// [`TensorError::ShapeMismatch`] if the element counts differ.
pub fn sub<T, U>(lhs: &Tensor<T>, rhs: &Tensor<U>) -> Result<Tensor<T>, TensorError>
where
    T: std::ops::SubAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    let mut out = lhs.clone();
    out.sub_inplace(rhs)?;
    Ok(out)
}

/// Multiply two tensors element-wise.
///
/// # Arguments
///
/// * `lhs` - Left-hand side tensor.
/// * `rhs` - Right-hand side tensor, of any convertible element type.
///
/// # Returns
///
/// A new `Tensor` with the shape of `lhs` holding the element-wise product, or a
/// [`TensorError::ShapeMismatch`] if the element counts differ.
pub fn mul<T, U>(lhs: &Tensor<T>, rhs: &Tensor<U>) -> Result<Tensor<T>, TensorError>
where
    T: std::ops::MulAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    let mut out = lhs.clone();
    out.mul_inplace(rhs)?;
    Ok(out)
}

/// Divide two tensors element-wise.
///
/// # Arguments
///
/// * `lhs` - Left-hand side tensor.
/// * `rhs` - Right-hand side tensor, of any convertible element type.
///
/// # Returns
///
/// A new `Tensor` with the shape of `lhs` holding the element-wise quotient, or a
/// [`TensorError::ShapeMismatch`] if the element counts differ.
pub fn div<T, U>(lhs: &Tensor<T>, rhs: &Tensor<U>) -> Result<Tensor<T>, TensorError>
where
    T: std::ops::DivAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    let mut out = lhs.clone();
    out.div_inplace(rhs)?;
    Ok(out)
}

/// Add a tensor to another tensor in-place.
///
/// Returns a [`TensorError::ShapeMismatch`] if the element counts differ, leaving `lhs`
/// untouched.
pub fn add_inplace<T, U>(lhs: &mut Tensor<T>, rhs: &Tensor<U>) -> Result<(), TensorError>
where
    T: std::ops::AddAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    lhs.add_inplace(rhs)?;
    Ok(())
}

/// Subtract a tensor from another tensor in-place.
///
/// Returns a [`TensorError::ShapeMismatch`] if the element counts differ, leaving `lhs`
/// untouched.
pub fn sub_inplace<T, U>(lhs: &mut Tensor<T>, rhs: &Tensor<U>) -> Result<(), TensorError>
where
    T: std::ops::SubAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    lhs.sub_inplace(rhs)?;
    Ok(())
}

/// Multiply a tensor by another tensor in-place.
///
/// Returns a [`TensorError::ShapeMismatch`] if the element counts differ, leaving `lhs`
/// untouched.
pub fn mul_inplace<T, U>(lhs: &mut Tensor<T>, rhs: &Tensor<U>) -> Result<(), TensorError>
where
    T: std::ops::MulAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    lhs.mul_inplace(rhs)?;
    Ok(())
}

/// Divide a tensor by another tensor in-place.
///
/// Returns a [`TensorError::ShapeMismatch`] if the element counts differ, leaving `lhs`
/// untouched.
pub fn div_inplace<T, U>(lhs: &mut Tensor<T>, rhs: &Tensor<U>) -> Result<(), TensorError>
where
    T: std::ops::DivAssign + Copy + 'static,
    U: AsPrimitive<T>,
{
    lhs.div_inplace(rhs)?;
    Ok(())
}
