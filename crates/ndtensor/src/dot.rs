use std::ops::{Add, Mul};

use num_traits::Zero;

use crate::{error::TensorError, shape, Tensor};

// A validated contraction: which axes stay free and which extents are summed over.
struct Contraction {
    free_a: Vec<usize>,
    free_b: Vec<usize>,
    extents: Vec<usize>,
}

fn check_unique(axes: &[usize], rank: usize) -> Result<(), TensorError> {
    let mut seen = vec![false; rank];
    for &axis in axes {
        if seen[axis] {
            return Err(TensorError::shape_mismatch(format!(
                "axis {axis} is contracted more than once in {axes:?}"
            )));
        }
        seen[axis] = true;
    }
    Ok(())
}

fn plan(
    shape_a: &[usize],
    shape_b: &[usize],
    axes_a: &[usize],
    axes_b: &[usize],
) -> Result<Contraction, TensorError> {
    if axes_a.len() != axes_b.len() {
        return Err(TensorError::shape_mismatch(format!(
            "axes must have the same size: {} vs {}",
            axes_a.len(),
            axes_b.len()
        )));
    }

    for &axis in axes_a {
        shape::check_axis(axis, shape_a.len())?;
    }
    for &axis in axes_b {
        shape::check_axis(axis, shape_b.len())?;
    }
    check_unique(axes_a, shape_a.len())?;
    check_unique(axes_b, shape_b.len())?;

    let mut extents = Vec::with_capacity(axes_a.len());
    for (&axis_a, &axis_b) in axes_a.iter().zip(axes_b) {
        if shape_a[axis_a] != shape_b[axis_b] {
            return Err(TensorError::shape_mismatch(format!(
                "contracted axes {axis_a} and {axis_b} have extents {} and {}",
                shape_a[axis_a], shape_b[axis_b]
            )));
        }
        extents.push(shape_a[axis_a]);
    }

    let free_a = (0..shape_a.len()).filter(|m| !axes_a.contains(m)).collect();
    let free_b = (0..shape_b.len()).filter(|m| !axes_b.contains(m)).collect();

    Ok(Contraction {
        free_a,
        free_b,
        extents,
    })
}

fn contract<T>(
    a: &Tensor<T>,
    b: &Tensor<T>,
    axes_a: &[usize],
    axes_b: &[usize],
    offsets: &[usize],
    contraction: &Contraction,
) -> Tensor<T>
where
    T: Copy + Zero + Mul<Output = T> + Add<Output = T>,
{
    let strides_a = a.strides();
    let strides_b = b.strides();

    // the summed sub-region starts at `offsets[k]` along pair k
    let summed: Vec<usize> = contraction
        .extents
        .iter()
        .zip(offsets)
        .map(|(&extent, &offset)| extent - offset)
        .collect();

    // buffer offsets of every summed position, relative to the free-axis base
    let pairs: Vec<(usize, usize)> = shape::MultiIndexIter::new(&summed)
        .map(|c| {
            c.iter().zip(offsets).enumerate().fold(
                (0, 0),
                |(off_a, off_b), (k, (&ck, &offset))| {
                    let i = ck + offset;
                    (
                        off_a + i * strides_a[axes_a[k]],
                        off_b + i * strides_b[axes_b[k]],
                    )
                },
            )
        })
        .collect();

    let out_shape: Vec<usize> = contraction
        .free_a
        .iter()
        .map(|&m| a.shape()[m])
        .chain(contraction.free_b.iter().map(|&m| b.shape()[m]))
        .collect();
    let n_free_a = contraction.free_a.len();

    log::trace!(
        "dot: {:?} x {:?} over {:?}/{:?} -> {:?} ({} terms per element)",
        a.shape(),
        b.shape(),
        axes_a,
        axes_b,
        out_shape,
        pairs.len()
    );

    let (data_a, data_b) = (a.as_slice(), b.as_slice());
    let data = shape::MultiIndexIter::new(&out_shape)
        .map(|j| {
            let base_a: usize = contraction
                .free_a
                .iter()
                .zip(&j[..n_free_a])
                .map(|(&m, &i)| i * strides_a[m])
                .sum();
            let base_b: usize = contraction
                .free_b
                .iter()
                .zip(&j[n_free_a..])
                .map(|(&m, &i)| i * strides_b[m])
                .sum();
            pairs.iter().fold(T::zero(), |acc, &(off_a, off_b)| {
                acc + data_a[base_a + off_a] * data_b[base_b + off_b]
            })
        })
        .collect();

    Tensor::from_parts(out_shape, data)
}

impl<T> Tensor<T>
where
    T: Copy + Zero + Mul<Output = T> + Add<Output = T>,
{
    /// Contracts `self` with `other` over pairs of axes.
    ///
    /// Axis `axes_self[k]` of `self` is summed against axis `axes_other[k]` of `other`. The
    /// result has the free axes of `self` in order followed by the free axes of `other` in
    /// order; it is a rank-0 tensor when every axis is contracted.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// 1. [`TensorError::ShapeMismatch`] if the two axis lists differ in length.
    /// 2. [`TensorError::AxisOutOfRange`] if an axis is not below its tensor's rank.
    /// 3. [`TensorError::ShapeMismatch`] if an axis is repeated within one list.
    /// 4. [`TensorError::ShapeMismatch`] if paired axes have different extents.
    ///
    /// # Panics
    ///
    /// Integer overflow in the products or the sums panics in debug builds, as with the `*`
    /// and `+` operators.
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// // matrix product
    /// let a = Tensor::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let b = Tensor::from_shape_vec(&[3, 2], vec![1, 0, 0, 1, 1, 1]).unwrap();
    /// let c = a.dot(&b, &[1], &[0]).unwrap();
    /// assert_eq!(c.shape(), &[2, 2]);
    /// assert_eq!(c.as_slice(), &[4, 5, 10, 11]);
    ///
    /// // mismatched axis lists
    /// assert!(a.dot(&a, &[0, 1], &[0]).is_err());
    /// ```
    pub fn dot(
        &self,
        other: &Tensor<T>,
        axes_self: &[usize],
        axes_other: &[usize],
    ) -> Result<Tensor<T>, TensorError> {
        let contraction = plan(self.shape(), other.shape(), axes_self, axes_other)?;
        let offsets = vec![0; axes_self.len()];
        Ok(contract(
            self,
            other,
            axes_self,
            axes_other,
            &offsets,
            &contraction,
        ))
    }

    /// Contracts `self` with `other` over a trailing sub-region of each contracted pair.
    ///
    /// Same as [`Tensor::dot`], except that pair `k` only sums over the positions
    /// `offsets[k]..extent_k`.
    ///
    /// # Errors
    ///
    /// Everything [`Tensor::dot`] checks, then:
    ///
    /// - [`TensorError::ShapeMismatch`] if there is not exactly one offset per pair.
    /// - [`TensorError::IndexOutOfRange`] if `offsets[k]` is not below the extent of pair `k`.
    ///
    /// # Panics
    ///
    /// Same as [`Tensor::dot`].
    ///
    /// # Example
    ///
    /// ```
    /// use ndtensor::Tensor;
    ///
    /// let a = Tensor::from_shape_vec(&[4], vec![1, 2, 3, 4]).unwrap();
    /// let s = a.dot_with_offsets(&a, &[0], &[0], &[2]).unwrap();
    /// assert_eq!(s.rank(), 0);
    /// assert_eq!(s.as_slice(), &[3 * 3 + 4 * 4]);
    /// ```
    pub fn dot_with_offsets(
        &self,
        other: &Tensor<T>,
        axes_self: &[usize],
        axes_other: &[usize],
        offsets: &[usize],
    ) -> Result<Tensor<T>, TensorError> {
        let contraction = plan(self.shape(), other.shape(), axes_self, axes_other)?;

        if offsets.len() != contraction.extents.len() {
            return Err(TensorError::shape_mismatch(format!(
                "expected {} offsets, one per contracted pair, but got {}",
                contraction.extents.len(),
                offsets.len()
            )));
        }
        for (k, (&offset, &extent)) in offsets.iter().zip(&contraction.extents).enumerate() {
            if offset >= extent {
                return Err(TensorError::index_out_of_range(axes_self[k], offset, extent));
            }
        }

        Ok(contract(
            self,
            other,
            axes_self,
            axes_other,
            offsets,
            &contraction,
        ))
    }
}
