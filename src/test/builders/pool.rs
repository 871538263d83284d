use std::collections::HashMap;

/// Builder for a serialized constant pool
///
/// Every method appends one entry and returns its index. UTF8 and class entries are
/// deduplicated, so asking twice for the same name yields the same index.
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    entries: Vec<u8>,
    next: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolBuilder {
    pub fn new() -> Self {
        PoolBuilder {
            entries: Vec::new(),
            next: 1,
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    /// Declared `constant_pool_count` of the pool built so far.
    pub fn count(&self) -> u16 {
        self.next
    }

    fn push(&mut self, tag: u8, payload: &[u8], width: u16) -> u16 {
        let index = self.next;
        self.entries.push(tag);
        self.entries.extend_from_slice(payload);
        self.next += width;
        index
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        if let Some(index) = self.utf8.get(text) {
            return *index;
        }
        let index = self.utf8_bytes(&encode_modified_utf8(text));
        self.utf8.insert(text.to_string(), index);
        index
    }

    /// UTF8 entry with arbitrary (possibly invalid) content, never deduplicated.
    pub fn utf8_bytes(&mut self, bytes: &[u8]) -> u16 {
        let mut payload = Vec::with_capacity(bytes.len() + 2);
        payload.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        payload.extend_from_slice(bytes);
        self.push(1, &payload, 1)
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        self.push(3, &value.to_be_bytes(), 1)
    }

    pub fn float(&mut self, value: f32) -> u16 {
        self.push(4, &value.to_be_bytes(), 1)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        self.push(5, &value.to_be_bytes(), 2)
    }

    pub fn double(&mut self, value: f64) -> u16 {
        self.push(6, &value.to_be_bytes(), 2)
    }

    /// `Class` entry for an internal name such as `java/lang/String`.
    pub fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(index) = self.classes.get(internal_name) {
            return *index;
        }
        let name = self.utf8(internal_name);
        let index = self.class_by_index(name);
        self.classes.insert(internal_name.to_string(), index);
        index
    }

    pub fn class_by_index(&mut self, name: u16) -> u16 {
        self.push(7, &name.to_be_bytes(), 1)
    }

    pub fn string(&mut self, text: &str) -> u16 {
        let utf8 = self.utf8(text);
        self.push(8, &utf8.to_be_bytes(), 1)
    }

    pub fn fieldref_by_index(&mut self, class: u16, name_and_type: u16) -> u16 {
        let mut payload = class.to_be_bytes().to_vec();
        payload.extend_from_slice(&name_and_type.to_be_bytes());
        self.push(9, &payload, 1)
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.name_and_type_by_index(name, descriptor)
    }

    pub fn name_and_type_by_index(&mut self, name: u16, descriptor: u16) -> u16 {
        let mut payload = name.to_be_bytes().to_vec();
        payload.extend_from_slice(&descriptor.to_be_bytes());
        self.push(12, &payload, 1)
    }

    pub fn module(&mut self, name: &str) -> u16 {
        let utf8 = self.utf8(name);
        self.push(19, &utf8.to_be_bytes(), 1)
    }

    pub fn package(&mut self, internal_name: &str) -> u16 {
        let utf8 = self.utf8(internal_name);
        self.push(20, &utf8.to_be_bytes(), 1)
    }

    /// `u2 constant_pool_count` followed by all entries.
    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.entries.len() + 2);
        data.extend_from_slice(&self.next.to_be_bytes());
        data.extend_from_slice(&self.entries);
        data
    }
}

/// JVM modified UTF-8: NUL as `C0 80`, supplementary characters as surrogate pairs.
pub fn encode_modified_utf8(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}
