use strum::{EnumCount, EnumIter};

/// Tag byte of a constant pool entry.
///
/// The discriminant equals the tag byte in the class file. [`ConstantTag::Unusable`] is not
/// a real tag; it marks the second slot occupied by a `Long` or `Double` entry and index 0.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
#[repr(u8)]
pub enum ConstantTag {
    /// Index 0 and the slot following a long/double entry
    Unusable = 0,
    /// Modified UTF-8 string data
    Utf8 = 1,
    /// 32-bit signed integer literal
    Integer = 3,
    /// 32-bit IEEE 754 float literal
    Float = 4,
    /// 64-bit signed integer literal (double width)
    Long = 5,
    /// 64-bit IEEE 754 double literal (double width)
    Double = 6,
    /// Class or interface reference, points to a Utf8 internal name
    Class = 7,
    /// String literal, points to a Utf8 entry
    String = 8,
    /// Field reference, points to a Class and a NameAndType
    Fieldref = 9,
    /// Method reference, points to a Class and a NameAndType
    Methodref = 10,
    /// Interface method reference, points to a Class and a NameAndType
    InterfaceMethodref = 11,
    /// Name and descriptor pair, points to two Utf8 entries
    NameAndType = 12,
    /// Method handle, reference kind plus member reference
    MethodHandle = 15,
    /// Method type, points to a Utf8 descriptor
    MethodType = 16,
    /// Dynamically computed constant
    Dynamic = 17,
    /// Dynamically computed call site
    InvokeDynamic = 18,
    /// Module reference, points to a Utf8 module name
    Module = 19,
    /// Package reference, points to a Utf8 internal package name
    Package = 20,
}

impl ConstantTag {
    /// Decode a tag byte.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<ConstantTag> {
        Some(match byte {
            1 => ConstantTag::Utf8,
            3 => ConstantTag::Integer,
            4 => ConstantTag::Float,
            5 => ConstantTag::Long,
            6 => ConstantTag::Double,
            7 => ConstantTag::Class,
            8 => ConstantTag::String,
            9 => ConstantTag::Fieldref,
            10 => ConstantTag::Methodref,
            11 => ConstantTag::InterfaceMethodref,
            12 => ConstantTag::NameAndType,
            15 => ConstantTag::MethodHandle,
            16 => ConstantTag::MethodType,
            17 => ConstantTag::Dynamic,
            18 => ConstantTag::InvokeDynamic,
            19 => ConstantTag::Module,
            20 => ConstantTag::Package,
            _ => return None,
        })
    }

    /// Long and double entries occupy two pool slots.
    #[must_use]
    pub fn is_double_width(self) -> bool {
        matches!(self, ConstantTag::Long | ConstantTag::Double)
    }
}
