//! Low-level byte order and safe reading utilities for class file parsing.
//!
//! The JVM class file format stores every multi-byte quantity in big-endian order. This
//! module provides the [`crate::file::io::ClassIO`] trait, which abstracts over the primitive
//! types that appear in class files, and bounds-checked helpers that read them from a byte
//! buffer.
//!
//! # Key Components
//!
//! - [`crate::file::io::ClassIO`] - Trait for primitive types readable from big-endian bytes
//! - [`crate::file::io::read_be`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_be_at`] - Read a value at an offset and advance the offset
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use classscope::file::io::read_be_at;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34];
//! let mut offset = 0;
//!
//! let magic: u32 = read_be_at(&data, &mut offset)?;
//! let major: u16 = read_be_at(&data, &mut offset)?;
//!
//! assert_eq!(magic, 0xCAFE_BABE);
//! assert_eq!(major, 0x34);
//! assert_eq!(offset, 6);
//! # Ok::<(), classscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All reading functions return [`crate::Result<T>`] and fail with
//! [`crate::Error::OutOfBounds`] if there are insufficient bytes in the buffer.
//!
//! # Thread Safety
//!
//! All functions in this module are pure and can be called concurrently.

use crate::Result;

/// Primitive types that can be decoded from a fixed number of big-endian bytes.
pub trait ClassIO: Sized {
    /// Byte array type holding the encoded representation
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode `Self` from big-endian bytes
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_class_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl ClassIO for $ty {
                type Bytes = [u8; $len];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }
            }
        )*
    };
}

impl_class_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
}

/// Read a big-endian value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_be<T: ClassIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Read a big-endian value at `offset`, advancing `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_be_at<T: ClassIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_be_u8() {
        let result = read_be::<u8>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x01);
    }

    #[test]
    fn read_be_u16() {
        let result = read_be::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102);
    }

    #[test]
    fn read_be_u32() {
        let result = read_be::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102_0304);
    }

    #[test]
    fn read_be_i64() {
        let result = read_be::<i64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102_0304_0506_0708);
    }

    #[test]
    fn read_be_f32() {
        let data = 1.5_f32.to_be_bytes();
        assert_eq!(read_be::<f32>(&data).unwrap(), 1.5);
    }

    #[test]
    fn read_be_at_advances() {
        let mut offset = 2;
        let value = read_be_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(value, 0x0304);
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_be_at_out_of_bounds() {
        let mut offset = 6;
        assert!(matches!(
            read_be_at::<u32>(&TEST_BUFFER, &mut offset),
            Err(crate::Error::OutOfBounds { .. })
        ));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_be_at::<u8>(&TEST_BUFFER, &mut offset).is_err());
    }
}
