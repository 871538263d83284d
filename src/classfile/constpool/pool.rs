use std::sync::Arc;

use crate::{
    classfile::constpool::{intern::StringInterner, tag::ConstantTag},
    file::io::read_be,
    Parser, Result,
};

/// Reusable backing storage for [`ConstantPool`].
///
/// A decoder keeps one of these per worker and hands it to every pool it builds, so a
/// sequence of units does not reallocate the index arrays each time.
#[derive(Debug, Default)]
pub struct PoolBuffers {
    tags: Vec<u8>,
    offsets: Vec<u32>,
    indirect: Vec<u32>,
}

impl PoolBuffers {
    /// Create empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, count: usize) {
        self.tags.clear();
        self.offsets.clear();
        self.indirect.clear();
        self.tags.resize(count, 0);
        self.offsets.resize(count, 0);
        self.indirect.resize(count, 0);
    }
}

/// Index over the constant pool of one class file.
///
/// The pool is decoded in a single forward pass into three parallel arrays: the tag byte of
/// every slot, the offset of its payload within the class file, and for indirecting entries
/// the index (or two packed 16-bit indices) it points to. Strings are not materialized until
/// requested.
///
/// # Examples
///
/// ```rust
/// use classscope::{classfile::constpool::ConstantPool, Parser};
///
/// // count = 3: #1 Utf8 "Foo", #2 Class -> #1
/// let data = [0x00, 0x03, 0x01, 0x00, 0x03, b'F', b'o', b'o', 0x07, 0x00, 0x01];
/// let mut parser = Parser::new(&data);
/// let pool = ConstantPool::parse(&mut parser)?;
///
/// assert_eq!(pool.resolve(2, 0)?, b"Foo");
/// assert!(pool.resolve(0, 0).is_err());
/// assert!(pool.resolve(3, 0).is_err());
/// # Ok::<(), classscope::Error>(())
/// ```
pub struct ConstantPool<'a> {
    data: &'a [u8],
    tags: Vec<u8>,
    offsets: Vec<u32>,
    indirect: Vec<u32>,
}

impl<'a> ConstantPool<'a> {
    /// Read the `constant_pool_count` and every entry from `parser`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag or a double-width entry in the
    /// last slot, and [`crate::Error::OutOfBounds`] if the pool is truncated.
    pub fn parse(parser: &mut Parser<'a>) -> Result<Self> {
        Self::parse_with(parser, PoolBuffers::new())
    }

    /// Same as [`ConstantPool::parse`], reusing previously allocated buffers.
    ///
    /// # Errors
    /// See [`ConstantPool::parse`].
    pub fn parse_with(parser: &mut Parser<'a>, mut buffers: PoolBuffers) -> Result<Self> {
        let count = usize::from(parser.read_be::<u16>()?);
        buffers.reset(count);

        let mut index = 1;
        while index < count {
            let tag_byte = parser.read_be::<u8>()?;
            let Some(tag) = ConstantTag::from_byte(tag_byte) else {
                return Err(malformed_error!(
                    "Unknown constant pool tag {} at index {}",
                    tag_byte,
                    index
                ));
            };

            let offset = u32::try_from(parser.pos())
                .map_err(|_| malformed_error!("Constant pool offset exceeds 32 bits"))?;
            buffers.tags[index] = tag as u8;
            buffers.offsets[index] = offset;

            match tag {
                ConstantTag::Utf8 => {
                    let len = parser.read_be::<u16>()?;
                    parser.advance_by(usize::from(len))?;
                }
                ConstantTag::Class
                | ConstantTag::String
                | ConstantTag::MethodType
                | ConstantTag::Module
                | ConstantTag::Package => {
                    buffers.indirect[index] = u32::from(parser.read_be::<u16>()?);
                }
                ConstantTag::Fieldref
                | ConstantTag::Methodref
                | ConstantTag::InterfaceMethodref
                | ConstantTag::NameAndType
                | ConstantTag::Dynamic
                | ConstantTag::InvokeDynamic => {
                    let first = u32::from(parser.read_be::<u16>()?);
                    let second = u32::from(parser.read_be::<u16>()?);
                    buffers.indirect[index] = (first << 16) | second;
                }
                ConstantTag::MethodHandle => {
                    let _kind = parser.read_be::<u8>()?;
                    buffers.indirect[index] = u32::from(parser.read_be::<u16>()?);
                }
                ConstantTag::Integer | ConstantTag::Float => parser.advance_by(4)?,
                ConstantTag::Long | ConstantTag::Double => parser.advance_by(8)?,
                ConstantTag::Unusable => {
                    return Err(malformed_error!("Tag 0 at constant pool index {}", index))
                }
            }

            if tag.is_double_width() {
                if index + 1 >= count {
                    return Err(malformed_error!(
                        "Double-width constant at last pool index {}",
                        index
                    ));
                }
                // Second slot stays tagged Unusable
                index += 2;
            } else {
                index += 1;
            }
        }

        Ok(ConstantPool {
            data: parser.data(),
            tags: buffers.tags,
            offsets: buffers.offsets,
            indirect: buffers.indirect,
        })
    }

    /// Release the index arrays for reuse by the next pool.
    #[must_use]
    pub fn into_buffers(self) -> PoolBuffers {
        PoolBuffers {
            tags: self.tags,
            offsets: self.offsets,
            indirect: self.indirect,
        }
    }

    /// The declared `constant_pool_count`. Valid indices are `1..count`.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tags.len()
    }

    /// Tag of the entry at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for index 0, an index `>= count`, or the unusable
    /// slot following a long/double entry.
    pub fn tag(&self, index: usize) -> Result<ConstantTag> {
        if index == 0 || index >= self.tags.len() {
            return Err(malformed_error!(
                "Constant pool index {} out of range 1..{}",
                index,
                self.tags.len()
            ));
        }

        match ConstantTag::from_byte(self.tags[index]) {
            Some(tag) => Ok(tag),
            None => Err(malformed_error!(
                "Constant pool index {} is an unusable slot",
                index
            )),
        }
    }

    fn expect_tag(&self, index: usize, expected: ConstantTag) -> Result<()> {
        let tag = self.tag(index)?;
        if tag != expected {
            return Err(malformed_error!(
                "Constant pool index {} is {:?}, expected {:?}",
                index,
                tag,
                expected
            ));
        }
        Ok(())
    }

    fn payload(&self, index: usize) -> usize {
        self.offsets[index] as usize
    }

    fn first(&self, index: usize) -> usize {
        (self.indirect[index] >> 16) as usize
    }

    fn second(&self, index: usize) -> usize {
        (self.indirect[index] & 0xFFFF) as usize
    }

    fn utf8_at(&self, index: usize) -> Result<&'a [u8]> {
        self.expect_tag(index, ConstantTag::Utf8)?;

        let mut offset = self.payload(index);
        let len = usize::from(crate::file::io::read_be_at::<u16>(self.data, &mut offset)?);
        self.data
            .get(offset..offset + len)
            .ok_or_else(|| out_of_bounds_error!())
    }

    fn class_utf8(&self, index: usize) -> Result<&'a [u8]> {
        self.expect_tag(index, ConstantTag::Class)?;
        self.utf8_at(self.indirect[index] as usize)
    }

    fn name_and_type_utf8(&self, index: usize, subfield: usize) -> Result<&'a [u8]> {
        self.expect_tag(index, ConstantTag::NameAndType)?;
        match subfield {
            0 => self.utf8_at(self.first(index)),
            1 => self.utf8_at(self.second(index)),
            _ => Err(malformed_error!(
                "Subfield {} is invalid for NameAndType at index {}",
                subfield,
                index
            )),
        }
    }

    /// Resolve the UTF8 byte span an entry refers to.
    ///
    /// | Tag | Subfield 0 | Subfield 1 | Subfield 2 |
    /// |-----|-----------|------------|------------|
    /// | Utf8, Class, String, MethodType, Module, Package | the string | - | - |
    /// | NameAndType | name | descriptor | - |
    /// | Fieldref, Methodref, InterfaceMethodref | owner class name | member name | member descriptor |
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for an out-of-range index, an unusable slot, a
    /// subfield not valid for the entry's tag, or an indirection to an entry of the wrong tag.
    pub fn resolve(&self, index: usize, subfield: usize) -> Result<&'a [u8]> {
        let tag = self.tag(index)?;

        match (tag, subfield) {
            (ConstantTag::Utf8, 0) => self.utf8_at(index),
            (
                ConstantTag::Class
                | ConstantTag::String
                | ConstantTag::MethodType
                | ConstantTag::Module
                | ConstantTag::Package,
                0,
            ) => self.utf8_at(self.indirect[index] as usize),
            (ConstantTag::NameAndType, 0 | 1) => self.name_and_type_utf8(index, subfield),
            (
                ConstantTag::Fieldref | ConstantTag::Methodref | ConstantTag::InterfaceMethodref,
                0,
            ) => self.class_utf8(self.first(index)),
            (
                ConstantTag::Fieldref | ConstantTag::Methodref | ConstantTag::InterfaceMethodref,
                1 | 2,
            ) => self.name_and_type_utf8(self.second(index), subfield - 1),
            _ => Err(malformed_error!(
                "Subfield {} is invalid for {:?} at index {}",
                subfield,
                tag,
                index
            )),
        }
    }

    /// Resolve and intern the string an entry refers to.
    ///
    /// # Errors
    /// See [`ConstantPool::resolve`]; additionally fails on invalid modified UTF-8.
    pub fn string(
        &self,
        index: usize,
        subfield: usize,
        interner: &StringInterner,
    ) -> Result<Arc<str>> {
        interner.intern_utf8(self.resolve(index, subfield)?)
    }

    /// Resolve a `Class` entry to its dotted class name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is not a `Class` entry.
    pub fn class_name(&self, index: usize, interner: &StringInterner) -> Result<Arc<str>> {
        interner.intern_class_name(self.class_utf8(index)?)
    }

    /// Like [`ConstantPool::class_name`], but index 0 yields `None`.
    ///
    /// Used for `super_class` of `java.lang.Object` and module-info, and for the optional
    /// outer class and inner name of `InnerClasses` entries.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a non-zero index is not a `Class` entry.
    pub fn optional_class_name(
        &self,
        index: usize,
        interner: &StringInterner,
    ) -> Result<Option<Arc<str>>> {
        if index == 0 {
            return Ok(None);
        }
        self.class_name(index, interner).map(Some)
    }

    /// Resolve a `Module` or `Package` entry to its dotted name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is neither.
    pub fn qualified_name(&self, index: usize, interner: &StringInterner) -> Result<Arc<str>> {
        match self.tag(index)? {
            ConstantTag::Module | ConstantTag::Package => {
                interner.intern_class_name(self.resolve(index, 0)?)
            }
            other => Err(malformed_error!(
                "Constant pool index {} is {:?}, expected Module or Package",
                index,
                other
            )),
        }
    }

    fn literal(&self, index: usize, expected: ConstantTag, len: usize) -> Result<&'a [u8]> {
        self.expect_tag(index, expected)?;
        let offset = self.payload(index);
        self.data
            .get(offset..offset + len)
            .ok_or_else(|| out_of_bounds_error!())
    }

    /// Read an `Integer` literal.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on tag mismatch.
    pub fn integer(&self, index: usize) -> Result<i32> {
        read_be::<i32>(self.literal(index, ConstantTag::Integer, 4)?)
    }

    /// Read a `Long` literal.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on tag mismatch.
    pub fn long(&self, index: usize) -> Result<i64> {
        read_be::<i64>(self.literal(index, ConstantTag::Long, 8)?)
    }

    /// Read a `Float` literal.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on tag mismatch.
    pub fn float(&self, index: usize) -> Result<f32> {
        read_be::<f32>(self.literal(index, ConstantTag::Float, 4)?)
    }

    /// Read a `Double` literal.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on tag mismatch.
    pub fn double(&self, index: usize) -> Result<f64> {
        read_be::<f64>(self.literal(index, ConstantTag::Double, 8)?)
    }
}
