use super::pool::PoolBuilder;

/// Binary `element_value` with its pool indices already allocated
#[derive(Debug, Clone)]
pub enum ElementValue {
    /// Primitive or string tag with the index of its literal
    Const(u8, u16),
    /// `e`: type descriptor index, constant name index
    Enum(u16, u16),
    /// `c`: return descriptor index
    Class(u16),
    /// `@`: type descriptor index and named elements
    Annotation(u16, Vec<(u16, ElementValue)>),
    /// `[`
    Array(Vec<ElementValue>),
}

impl ElementValue {
    pub fn string(pool: &mut PoolBuilder, text: &str) -> Self {
        ElementValue::Const(b's', pool.utf8(text))
    }

    pub fn int(pool: &mut PoolBuilder, value: i32) -> Self {
        ElementValue::Const(b'I', pool.integer(value))
    }

    pub fn enum_constant(pool: &mut PoolBuilder, descriptor: &str, name: &str) -> Self {
        ElementValue::Enum(pool.utf8(descriptor), pool.utf8(name))
    }

    pub fn class(pool: &mut PoolBuilder, descriptor: &str) -> Self {
        ElementValue::Class(pool.utf8(descriptor))
    }

    pub fn annotation(
        pool: &mut PoolBuilder,
        descriptor: &str,
        elements: Vec<(&str, ElementValue)>,
    ) -> Self {
        let type_index = pool.utf8(descriptor);
        let elements = elements
            .into_iter()
            .map(|(name, value)| (pool.utf8(name), value))
            .collect();
        ElementValue::Annotation(type_index, elements)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            ElementValue::Const(tag, index) => {
                out.push(*tag);
                out.extend_from_slice(&index.to_be_bytes());
            }
            ElementValue::Enum(type_index, name_index) => {
                out.push(b'e');
                out.extend_from_slice(&type_index.to_be_bytes());
                out.extend_from_slice(&name_index.to_be_bytes());
            }
            ElementValue::Class(index) => {
                out.push(b'c');
                out.extend_from_slice(&index.to_be_bytes());
            }
            ElementValue::Annotation(type_index, elements) => {
                out.push(b'@');
                encode_annotation(*type_index, elements, out);
            }
            ElementValue::Array(values) => {
                out.push(b'[');
                out.extend_from_slice(&(values.len() as u16).to_be_bytes());
                for value in values {
                    value.encode_into(out);
                }
            }
        }
    }
}

/// `annotation` structure: type index, element count, `(name index, element_value)` pairs.
pub fn encode_annotation(type_index: u16, elements: &[(u16, ElementValue)], out: &mut Vec<u8>) {
    out.extend_from_slice(&type_index.to_be_bytes());
    out.extend_from_slice(&(elements.len() as u16).to_be_bytes());
    for (name, value) in elements {
        out.extend_from_slice(&name.to_be_bytes());
        value.encode_into(out);
    }
}
