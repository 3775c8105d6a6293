#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `ndtensor` provides a dense, owned, row-major N-dimensional array whose every index, shape
//! and rank check is reported as a [`TensorError`] instead of silently reading the wrong
//! memory. Tensors can be created with any rank, sliced with partial indices, assigned across
//! element types, permuted, contracted over arbitrary axis pairs and persisted to text or
//! binary files.
//!
//! # Architecture
//!
//! - **Tensor**: the owning container, holding one contiguous buffer and its shape
//! - **FixedTensor**: a wrapper that keeps the rank constant at compile time
//! - **TensorView**: borrowed sub-tensors handed out by partial indices
//! - **shape**: the index arithmetic every other component goes through
//!
//! # Quick Start
//!
//! ```rust
//! use ndtensor::{ErrorKind, Tensor};
//!
//! let mut a = Tensor::from_shape_val(&[2, 3, 5, 7], 0.0f64);
//!
//! // a partial index selects the block spanned by the trailing axes
//! a.slice_mut(&[1, 2]).unwrap().fill(1.0);
//! assert_eq!(a.iter().sum::<f64>(), 35.0);
//!
//! // element-wise arithmetic only needs equal element counts
//! let c = Tensor::from_shape_val(&[6, 35], 2.0f32);
//! a.add_inplace(&c).unwrap();
//!
//! // contract the two trailing axes of `a` with themselves
//! let g = a.dot(&a, &[2, 3], &[2, 3]).unwrap();
//! assert_eq!(g.shape(), &[2, 3, 2, 3]);
//!
//! // too many indices
//! let err = a.slice(&[0, 0, 0, 0, 0]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
//! ```
//!
//! # Type Aliases
//!
//! - [`Tensor0`]: scalar
//! - [`Tensor1`]: vector
//! - [`Tensor2`]: matrix
//! - [`Tensor3`]: three-dimensional tensor
//! - [`Tensor4`]: four-dimensional tensor

/// Tensor contraction over pairs of axes.
pub mod dot;

/// Supported element types and their file extensions.
pub mod element;

/// Error types for the tensor module.
pub mod error;

/// Tensors whose rank is fixed at compile time.
pub mod fixed;

/// Text and binary persistence.
pub mod io;

/// Free functions for element-wise arithmetic.
pub mod ops;

/// Serde module for JSON/other format serialization and deserialization.
///
/// This module provides serialization support for tensors when the `serde` feature is
/// enabled.
#[cfg(feature = "serde")]
pub mod serde;

/// Shape, stride and index arithmetic.
pub mod shape;

/// Storage module containing the owned element buffer.
pub mod storage;

/// Tensor module containing the main tensor implementation.
pub mod tensor;

/// View module containing non-owning tensor view implementations.
pub mod view;

pub use crate::element::{FileElement, TensorElement};
pub use crate::error::{ErrorKind, TensorError};
pub use crate::fixed::{FixedTensor, Tensor0, Tensor1, Tensor2, Tensor3, Tensor4};
pub use crate::storage::TensorStorage;
pub use crate::tensor::Tensor;
pub use crate::view::{TensorView, TensorViewMut};
