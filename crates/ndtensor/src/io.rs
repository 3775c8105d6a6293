//! Reading and writing tensors to files.
//!
//! The format is chosen by the file extension:
//!
//! - `.txt` selects a whitespace separated text format and works for every element type. The
//!   first line holds the rank followed by the extents; each following line holds one row of
//!   the last axis.
//! - A type extension such as `.f64` or `.int` (see [`FileElement`]) selects a binary format:
//!   the rank and each extent as little-endian `u64`, then the elements in row-major order at
//!   the fixed width of their type. The extension must name the element type being read or
//!   written.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use bincode::error::DecodeError;

use crate::{element::FileElement, error::TensorError, Tensor};

// Guards against corrupt headers before anything is allocated.
const MAX_RANK: usize = 32;
const MAX_PREALLOC: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Text,
    Binary,
}

impl FileFormat {
    fn from_path<T: FileElement>(path: &Path) -> Result<Self, TensorError> {
        let invalid = || TensorError::InvalidFileExtension(path.to_path_buf());
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(invalid)?;

        if ext.eq_ignore_ascii_case("txt") {
            Ok(Self::Text)
        } else if T::accepts_extension(ext) {
            Ok(Self::Binary)
        } else {
            Err(invalid())
        }
    }
}

fn checked_numel(shape: &[usize]) -> Result<usize, TensorError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| {
            TensorError::shape_mismatch(format!("shape {shape:?} holds too many elements"))
        })
}

fn check_rank_header(rank: usize) -> Result<(), TensorError> {
    if rank > MAX_RANK {
        return Err(TensorError::shape_mismatch(format!(
            "declared rank {rank} exceeds the supported maximum of {MAX_RANK}"
        )));
    }
    Ok(())
}

// Running out of data means the file is malformed; any other read failure is an I/O error.
fn decode_error(path: &Path, e: DecodeError, context: impl FnOnce() -> String) -> TensorError {
    match e {
        DecodeError::Io { inner, .. } if inner.kind() != io::ErrorKind::UnexpectedEof => {
            TensorError::unable_to_open(path, inner)
        }
        e => TensorError::shape_mismatch(format!("{}: {e}", context())),
    }
}

fn read_binary<T: FileElement>(path: &Path) -> Result<Tensor<T>, TensorError> {
    let file = File::open(path).map_err(|e| TensorError::unable_to_open(path, e))?;
    let mut reader = BufReader::new(file);
    let config = bincode::config::standard().with_fixed_int_encoding();

    let decode_err = |e| decode_error(path, e, || "malformed tensor data".to_string());

    let rank: u64 = bincode::decode_from_std_read(&mut reader, config).map_err(decode_err)?;
    let rank = usize::try_from(rank).unwrap_or(usize::MAX);
    check_rank_header(rank)?;

    let mut tensor_shape = Vec::with_capacity(rank);
    for _ in 0..rank {
        let extent: u64 = bincode::decode_from_std_read(&mut reader, config).map_err(decode_err)?;
        let extent = usize::try_from(extent).map_err(|_| {
            TensorError::shape_mismatch(format!("extent {extent} does not fit in memory"))
        })?;
        tensor_shape.push(extent);
    }
    let numel = checked_numel(&tensor_shape)?;

    let mut data: Vec<T> = Vec::with_capacity(numel.min(MAX_PREALLOC));
    for i in 0..numel {
        let value: T = bincode::decode_from_std_read(&mut reader, config).map_err(|e| {
            decode_error(path, e, || {
                format!("expected {numel} elements, but the data ended after {i}")
            })
        })?;
        data.push(value);
    }

    let mut probe = [0u8; 1];
    let trailing = reader
        .read(&mut probe)
        .map_err(|e| TensorError::unable_to_open(path, e))?;
    if trailing != 0 {
        return Err(TensorError::shape_mismatch(format!(
            "trailing data after {numel} elements"
        )));
    }

    Tensor::from_shape_vec(&tensor_shape, data)
}

fn write_binary<T: FileElement>(tensor: &Tensor<T>, path: &Path) -> Result<(), TensorError> {
    let file = File::create(path).map_err(|e| TensorError::unable_to_open(path, e))?;
    let mut writer = BufWriter::new(file);
    let config = bincode::config::standard().with_fixed_int_encoding();

    let encode_err = |e: bincode::error::EncodeError| {
        TensorError::unable_to_open(path, std::io::Error::other(e.to_string()))
    };

    bincode::encode_into_std_write(tensor.rank() as u64, &mut writer, config)
        .map_err(encode_err)?;
    for &extent in tensor.shape() {
        bincode::encode_into_std_write(extent as u64, &mut writer, config).map_err(encode_err)?;
    }
    for &value in tensor.iter() {
        bincode::encode_into_std_write(value, &mut writer, config).map_err(encode_err)?;
    }

    writer
        .flush()
        .map_err(|e| TensorError::unable_to_open(path, e))
}

fn parse_token<V: std::str::FromStr>(token: Option<&str>, what: &str) -> Result<V, TensorError> {
    let token =
        token.ok_or_else(|| TensorError::shape_mismatch(format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| TensorError::shape_mismatch(format!("could not parse {what} from `{token}`")))
}

fn read_text<T: FileElement>(path: &Path) -> Result<Tensor<T>, TensorError> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|e| TensorError::unable_to_open(path, e))?;
    let contents = String::from_utf8(bytes)
        .map_err(|e| TensorError::shape_mismatch(format!("tensor text is not UTF-8: {e}")))?;

    let mut tokens = contents.split_whitespace();

    let rank: usize = parse_token(tokens.next(), "rank")?;
    check_rank_header(rank)?;

    let tensor_shape = (0..rank)
        .map(|axis| parse_token(tokens.next(), &format!("extent of axis {axis}")))
        .collect::<Result<Vec<usize>, _>>()?;
    let numel = checked_numel(&tensor_shape)?;

    let mut data: Vec<T> = Vec::with_capacity(numel.min(MAX_PREALLOC));
    for i in 0..numel {
        let token = tokens.next().ok_or_else(|| {
            TensorError::shape_mismatch(format!(
                "expected {numel} elements, but the data ended after {i}"
            ))
        })?;
        data.push(parse_token(Some(token), &format!("element {i}"))?);
    }

    if tokens.next().is_some() {
        return Err(TensorError::shape_mismatch(format!(
            "trailing data after {numel} elements"
        )));
    }

    Tensor::from_shape_vec(&tensor_shape, data)
}

fn write_text<T: FileElement>(tensor: &Tensor<T>, path: &Path) -> Result<(), TensorError> {
    let file = File::create(path).map_err(|e| TensorError::unable_to_open(path, e))?;
    let mut writer = BufWriter::new(file);

    let mut contents = tensor.rank().to_string();
    for extent in tensor.shape() {
        contents.push_str(&format!(" {extent}"));
    }
    contents.push('\n');

    let row_len = tensor.shape().last().copied().unwrap_or(1);
    if row_len > 0 {
        for row in tensor.as_slice().chunks(row_len) {
            let line = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            contents.push_str(&line);
            contents.push('\n');
        }
    }

    writer
        .write_all(contents.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| TensorError::unable_to_open(path, e))
}

impl<T: FileElement> Tensor<T> {
    /// Reads a tensor from a file.
    ///
    /// See the [module documentation](crate::io) for the formats.
    ///
    /// # Errors
    ///
    /// - [`TensorError::InvalidFileExtension`] if the extension is neither `.txt` nor one of
    ///   the extensions of `T`.
    /// - [`TensorError::UnableToOpenFile`] if the file cannot be opened or read.
    /// - [`TensorError::ShapeMismatch`] if the header is malformed, a text file is not valid
    ///   UTF-8, or the number of elements in the file does not match the declared shape.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ndtensor::Tensor;
    ///
    /// let t = Tensor::<f64>::read("my_tensor.txt").unwrap();
    /// println!("{:?}", t.shape());
    /// ```
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TensorError> {
        let path = path.as_ref();
        let format = FileFormat::from_path::<T>(path)?;

        let tensor = match format {
            FileFormat::Text => read_text(path)?,
            FileFormat::Binary => read_binary(path)?,
        };

        log::debug!(
            "read {:?} tensor of shape {:?} from {}",
            format,
            tensor.shape(),
            path.display()
        );

        Ok(tensor)
    }

    /// Replaces this tensor with one read from a file, adopting its shape.
    ///
    /// The tensor is left untouched if reading fails.
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::read`].
    pub fn read_from(&mut self, path: impl AsRef<Path>) -> Result<(), TensorError> {
        *self = Self::read(path)?;
        Ok(())
    }

    /// Writes the tensor to a file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// - [`TensorError::InvalidFileExtension`] if the extension is neither `.txt` nor one of
    ///   the extensions of `T`.
    /// - [`TensorError::UnableToOpenFile`] if the file cannot be created or written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), TensorError> {
        let path = path.as_ref();
        let format = FileFormat::from_path::<T>(path)?;

        log::debug!(
            "writing {:?} tensor of shape {:?} to {}",
            format,
            self.shape(),
            path.display()
        );

        match format {
            FileFormat::Text => write_text(self, path),
            FileFormat::Binary => write_binary(self, path),
        }
    }
}
