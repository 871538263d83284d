//! Session-wide string interning and modified UTF-8 decoding.
//!
//! Large scans see the same names over and over: `java.lang.String`, `value`, `()V`. Every
//! string materialized from a constant pool goes through a [`StringInterner`] owned by the
//! scan session, so each distinct string is stored once no matter how many units mention it.

use std::sync::Arc;

use dashmap::DashSet;

use crate::Result;

/// Concurrent insert-if-absent table of shared strings.
#[derive(Debug, Default)]
pub struct StringInterner {
    table: DashSet<Arc<str>>,
}

impl StringInterner {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        StringInterner {
            table: DashSet::new(),
        }
    }

    /// Return the shared copy of `value`, inserting it if absent.
    pub fn intern(&self, value: &str) -> Arc<str> {
        if let Some(existing) = self.table.get(value) {
            return Arc::clone(&existing);
        }

        let candidate: Arc<str> = Arc::from(value);
        if self.table.insert(Arc::clone(&candidate)) {
            return candidate;
        }

        // Lost the race against another thread inserting the same string
        match self.table.get(value) {
            Some(existing) => Arc::clone(&existing),
            None => candidate,
        }
    }

    /// Decode modified UTF-8 `bytes` and intern the result.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bytes are not valid modified UTF-8.
    pub fn intern_utf8(&self, bytes: &[u8]) -> Result<Arc<str>> {
        match std::str::from_utf8(bytes) {
            Ok(text) if !bytes.contains(&0) => Ok(self.intern(text)),
            _ => Ok(self.intern(&decode_modified_utf8(bytes)?)),
        }
    }

    /// Decode an internal class or package name (`java/lang/String`), convert it to dotted
    /// form (`java.lang.String`) and intern it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bytes are not valid modified UTF-8.
    pub fn intern_class_name(&self, bytes: &[u8]) -> Result<Arc<str>> {
        if !bytes.contains(&b'/') {
            return self.intern_utf8(bytes);
        }

        let text = match std::str::from_utf8(bytes) {
            Ok(text) if !bytes.contains(&0) => text.replace('/', "."),
            _ => decode_modified_utf8(bytes)?.replace('/', "."),
        };
        Ok(self.intern(&text))
    }

    /// Number of distinct strings held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if nothing was interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Decode the JVM's modified UTF-8 encoding.
///
/// Differences to standard UTF-8: NUL is encoded as `C0 80`, and supplementary characters
/// are encoded as two separately encoded surrogates of three bytes each. Unpaired
/// surrogates are legal in the JVM but not in Rust strings and become U+FFFD.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] on a raw NUL byte, a truncated sequence, an invalid
/// continuation byte, or a four-byte standard UTF-8 lead byte.
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    let continuation = |at: usize| -> Result<u16> {
        match bytes.get(at) {
            Some(b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
            Some(b) => Err(malformed_error!(
                "Invalid modified UTF-8 continuation byte 0x{:02x} at {}",
                b,
                at
            )),
            None => Err(malformed_error!("Truncated modified UTF-8 sequence at {}", at)),
        }
    };

    while i < bytes.len() {
        let lead = bytes[i];
        if lead & 0x80 == 0 {
            if lead == 0 {
                return Err(malformed_error!("Raw NUL byte in modified UTF-8 at {}", i));
            }
            units.push(u16::from(lead));
            i += 1;
        } else if lead & 0xE0 == 0xC0 {
            let c1 = continuation(i + 1)?;
            units.push((u16::from(lead & 0x1F) << 6) | c1);
            i += 2;
        } else if lead & 0xF0 == 0xE0 {
            let c1 = continuation(i + 1)?;
            let c2 = continuation(i + 2)?;
            units.push((u16::from(lead & 0x0F) << 12) | (c1 << 6) | c2);
            i += 3;
        } else {
            return Err(malformed_error!(
                "Invalid modified UTF-8 lead byte 0x{:02x} at {}",
                lead,
                i
            ));
        }
    }

    Ok(String::from_utf16_lossy(&units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn interning_shares_storage() {
        let interner = StringInterner::new();
        let a = interner.intern("java.lang.String");
        let b = interner.intern("java.lang.String");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn class_names_are_dotted() {
        let interner = StringInterner::new();
        let name = interner.intern_class_name(b"java/util/Map$Entry").unwrap();
        assert_eq!(&*name, "java.util.Map$Entry");
        let plain = interner.intern_class_name(b"Foo").unwrap();
        assert_eq!(&*plain, "Foo");
    }

    #[test]
    fn modified_utf8_nul_and_surrogates() {
        // "a\0b"
        assert_eq!(decode_modified_utf8(&[0x61, 0xC0, 0x80, 0x62]).unwrap(), "a\0b");

        // U+1F600 as surrogate pair D83D DE00, each encoded in three bytes
        let smiley = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
        assert_eq!(decode_modified_utf8(&smiley).unwrap(), "\u{1F600}");

        let interner = StringInterner::new();
        assert_eq!(&*interner.intern_utf8(&smiley).unwrap(), "\u{1F600}");
    }

    #[test]
    fn modified_utf8_errors() {
        assert!(decode_modified_utf8(&[0x00]).is_err());
        assert!(decode_modified_utf8(&[0xC3]).is_err());
        assert!(decode_modified_utf8(&[0xE2, 0x82]).is_err());
        assert!(decode_modified_utf8(&[0xC3, 0x41]).is_err());
        assert!(decode_modified_utf8(&[0xF0, 0x9F, 0x98, 0x80]).is_err());
    }

    #[test]
    fn concurrent_interning() {
        let interner = Arc::new(StringInterner::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interner = Arc::clone(&interner);
                thread::spawn(move || interner.intern("shared"))
            })
            .collect();

        let values: Vec<Arc<str>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(interner.len(), 1);
        assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
    }
}
