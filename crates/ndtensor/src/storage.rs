use crate::error::TensorError;

/// Dense, exclusively owned buffer of tensor elements.
///
/// Each tensor owns exactly one storage and never shares it with another tensor; cloning a
/// storage copies the elements. Sub-tensor access goes through borrowed slices handed out by
/// [`TensorStorage::view`] and [`TensorStorage::view_mut`].
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct TensorStorage<T> {
    data: Vec<T>,
}

impl<T> TensorStorage<T> {
    /// Creates a new storage from a vector.
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Creates a new storage of `len` copies of `value`.
    pub fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![value; len],
        }
    }

    /// Returns the storage data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the storage data as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns the pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Returns the number of elements in the storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the storage holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the storage and returns the data as a vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrows `len` elements starting at `offset` without copying.
    ///
    /// # Errors
    ///
    /// Returns an error if the range exceeds the storage bounds.
    pub fn view(&self, offset: usize, len: usize) -> Result<&[T], TensorError> {
        let end = self.checked_end(offset, len)?;
        Ok(&self.data[offset..end])
    }

    /// Mutably borrows `len` elements starting at `offset` without copying.
    ///
    /// # Errors
    ///
    /// Returns an error if the range exceeds the storage bounds.
    pub fn view_mut(&mut self, offset: usize, len: usize) -> Result<&mut [T], TensorError> {
        let end = self.checked_end(offset, len)?;
        Ok(&mut self.data[offset..end])
    }

    fn checked_end(&self, offset: usize, len: usize) -> Result<usize, TensorError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(TensorError::index_out_of_range(
                0,
                offset.saturating_add(len),
                self.data.len(),
            )),
        }
    }
}

impl<T> std::fmt::Debug for TensorStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorStorage")
            .field("ptr", &self.data.as_ptr())
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_buffer_from_vec() {
        let buffer = TensorStorage::<i32>::from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(buffer.len(), 5);
        assert!(!buffer.is_empty());
        assert!(!buffer.as_ptr().is_null());
    }

    #[test]
    fn test_tensor_buffer_into_vec() {
        let buffer = TensorStorage::<i32>::from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(buffer.into_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_tensor_mutability() {
        let mut buffer = TensorStorage::<i32>::from_elem(4, 0);
        buffer.as_mut_slice()[0] = 10;
        assert_eq!(buffer.as_slice(), &[10, 0, 0, 0]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = TensorStorage::<u8>::from_vec(vec![1, 2, 3]);
        let b = a.clone();
        a.as_mut_slice()[0] = 9;
        assert_eq!(b.as_slice(), &[1, 2, 3]);
        assert_ne!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn test_storage_view() -> Result<(), TensorError> {
        let mut storage = TensorStorage::<i32>::from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(storage.view(1, 3)?, &[2, 3, 4]);

        storage.view_mut(3, 2)?.fill(0);
        assert_eq!(storage.as_slice(), &[1, 2, 3, 0, 0]);

        assert!(storage.view(4, 2).is_err());
        assert!(storage.view(usize::MAX, 2).is_err());
        Ok(())
    }
}
