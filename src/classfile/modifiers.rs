//! Access and property flags of classes, fields, methods and method parameters.
//!
//! The JVM reuses bit positions with different meanings per member kind (`0x0020` is
//! `ACC_SUPER` on a class but `ACC_SYNCHRONIZED` on a method), so each kind gets its own
//! flag type.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Class and interface access flags, also used for `InnerClasses` entries
    pub struct ClassModifiers: u16 {
        /// Declared `public`
        const PUBLIC = 0x0001;
        /// Declared `private` (inner classes only)
        const PRIVATE = 0x0002;
        /// Declared `protected` (inner classes only)
        const PROTECTED = 0x0004;
        /// Declared `static` (inner classes only)
        const STATIC = 0x0008;
        /// Declared `final`
        const FINAL = 0x0010;
        /// Treat superclass methods specially on `invokespecial`
        const SUPER = 0x0020;
        /// Is an interface
        const INTERFACE = 0x0200;
        /// Declared `abstract`
        const ABSTRACT = 0x0400;
        /// Not present in source
        const SYNTHETIC = 0x1000;
        /// Is an annotation interface
        const ANNOTATION = 0x2000;
        /// Is an enum class
        const ENUM = 0x4000;
        /// Is a module descriptor
        const MODULE = 0x8000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Field access flags
    pub struct FieldModifiers: u16 {
        /// Declared `public`
        const PUBLIC = 0x0001;
        /// Declared `private`
        const PRIVATE = 0x0002;
        /// Declared `protected`
        const PROTECTED = 0x0004;
        /// Declared `static`
        const STATIC = 0x0008;
        /// Declared `final`
        const FINAL = 0x0010;
        /// Declared `volatile`
        const VOLATILE = 0x0040;
        /// Declared `transient`
        const TRANSIENT = 0x0080;
        /// Not present in source
        const SYNTHETIC = 0x1000;
        /// Element of an enum class
        const ENUM = 0x4000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method access flags
    pub struct MethodModifiers: u16 {
        /// Declared `public`
        const PUBLIC = 0x0001;
        /// Declared `private`
        const PRIVATE = 0x0002;
        /// Declared `protected`
        const PROTECTED = 0x0004;
        /// Declared `static`
        const STATIC = 0x0008;
        /// Declared `final`
        const FINAL = 0x0010;
        /// Declared `synchronized`
        const SYNCHRONIZED = 0x0020;
        /// Compiler-generated bridge method
        const BRIDGE = 0x0040;
        /// Declared with variable arity
        const VARARGS = 0x0080;
        /// Declared `native`
        const NATIVE = 0x0100;
        /// Declared `abstract`
        const ABSTRACT = 0x0400;
        /// Declared `strictfp`
        const STRICT = 0x0800;
        /// Not present in source
        const SYNTHETIC = 0x1000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method parameter flags from `MethodParameters`
    pub struct ParameterModifiers: u16 {
        /// Declared `final`
        const FINAL = 0x0010;
        /// Not present in source
        const SYNTHETIC = 0x1000;
        /// Implicitly declared, e.g. the outer instance of an inner class constructor
        const MANDATED = 0x8000;
    }
}

impl ClassModifiers {
    /// Java source keywords for these flags, e.g. `public abstract`.
    #[must_use]
    pub fn keywords(self) -> String {
        let mut words = Vec::new();
        if self.contains(Self::PUBLIC) {
            words.push("public");
        }
        if self.contains(Self::PRIVATE) {
            words.push("private");
        }
        if self.contains(Self::PROTECTED) {
            words.push("protected");
        }
        if self.contains(Self::ABSTRACT) && !self.contains(Self::INTERFACE) {
            words.push("abstract");
        }
        if self.contains(Self::STATIC) {
            words.push("static");
        }
        if self.contains(Self::FINAL) {
            words.push("final");
        }
        words.join(" ")
    }
}
