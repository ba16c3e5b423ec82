//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

/// Smallest PNG header the header decoder accepts.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0]);
    data
}

/// JPEG with a single SOF0 segment.
pub fn jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// Values of `attr` on every `name` element, in document order.
///
/// Panics if the document is not well-formed.
pub fn attribute_values(xml: &str, name: &str, attr: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut values = Vec::new();
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == name.as_bytes() => {
                let value = e
                    .try_get_attribute(attr)
                    .expect("valid attribute")
                    .map(|a| String::from_utf8(a.value.into_owned()).expect("UTF-8 attribute"))
                    .unwrap_or_default();
                values.push(value);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    values
}

/// An EPUB read back from bytes.
pub struct Archive {
    zip: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl Archive {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            zip: zip::ZipArchive::new(Cursor::new(bytes)).expect("valid ZIP"),
        }
    }

    /// Entry names in archive order.
    pub fn names(&mut self) -> Vec<String> {
        (0..self.zip.len())
            .map(|i| self.zip.by_index(i).expect("entry").name().to_string())
            .collect()
    }

    pub fn compression(&mut self, name: &str) -> zip::CompressionMethod {
        self.zip.by_name(name).expect("entry").compression()
    }

    pub fn bytes(&mut self, name: &str) -> Vec<u8> {
        let mut data = Vec::new();
        self.zip
            .by_name(name)
            .expect("entry")
            .read_to_end(&mut data)
            .expect("readable entry");
        data
    }

    pub fn text(&mut self, name: &str) -> String {
        String::from_utf8(self.bytes(name)).expect("UTF-8 entry")
    }
}
