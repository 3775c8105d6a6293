use std::{fmt, str::FromStr};

/// A numeric type that can be stored in a tensor.
///
/// Conversions between element types go through [`num_traits::AsPrimitive`], which follows
/// the semantics of the `as` operator: floats are truncated toward zero and saturated when
/// converted to integers, and integers wrap when narrowed.
pub trait TensorElement:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + FromStr
    + Send
    + Sync
    + 'static
{
}

/// An element type with a dedicated binary file extension.
///
/// The extension of a file both selects the binary codec and validates that the file holds
/// elements of the requested type.
///
/// | type | extensions |
/// |------|------------|
/// | `f32` | `.f32` |
/// | `f64` | `.f64`, `.f80` |
/// | `u8` | `.uc` |
/// | `i8` | `.sc` |
/// | `u16` | `.us` |
/// | `u32` | `.u` |
/// | `u64` | `.ul`, `.ull` |
/// | `i16` | `.s` |
/// | `i32` | `.int` |
/// | `i64` | `.l`, `.ll` |
///
/// Rust has no extended-precision float, so `.f80` files hold 64-bit floats.
pub trait FileElement: TensorElement + bincode::Encode + bincode::Decode<()> {
    /// The file extensions, without the leading dot, naming this type.
    const EXTENSIONS: &'static [&'static str];

    /// Returns true if `ext` names this element type.
    fn accepts_extension(ext: &str) -> bool {
        Self::EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }
}

macro_rules! impl_tensor_element {
    ($($t:ty),* $(,)?) => {
        $(impl TensorElement for $t {})*
    };
}

macro_rules! impl_file_element {
    ($($t:ty => [$($ext:literal),+]),* $(,)?) => {
        $(
            impl FileElement for $t {
                const EXTENSIONS: &'static [&'static str] = &[$($ext),+];
            }
        )*
    };
}

impl_tensor_element!(f32, f64, u8, i8, u16, i16, u32, i32, u64, i64, usize, isize);

impl_file_element!(
    f32 => ["f32"],
    f64 => ["f64", "f80"],
    u8 => ["uc"],
    i8 => ["sc"],
    u16 => ["us"],
    u32 => ["u"],
    u64 => ["ul", "ull"],
    i16 => ["s"],
    i32 => ["int"],
    i64 => ["l", "ll"],
);
