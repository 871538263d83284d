//! In-memory class file builders.

#![allow(dead_code)]

mod classfile;
mod element;
mod pool;

pub use classfile::{AnnotationSpec, ClassFileBuilder, FieldSpec, MethodSpec};
pub use element::ElementValue;
pub use pool::PoolBuilder;
