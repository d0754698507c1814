//! XMP metadata well-formedness.
//!
//! The metadata stream must parse as XML. The first pass decodes the bytes
//! as UTF-8 (or as indicated by a byte-order mark). If that pass finds an
//! encoding declaration that disagrees with the bytes, the packet is decoded
//! once more with the declared encoding; a second failure is final.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Character encodings an XMP packet may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    /// UTF-8 (also covers US-ASCII)
    Utf8,
    /// UTF-16, little endian
    Utf16Le,
    /// UTF-16, big endian
    Utf16Be,
    /// ISO-8859-1
    Latin1,
}

impl XmlEncoding {
    /// Map an XML encoding label to a supported encoding.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "us-ascii" | "ascii" => Some(XmlEncoding::Utf8),
            "utf-16le" => Some(XmlEncoding::Utf16Le),
            "utf-16" | "utf-16be" => Some(XmlEncoding::Utf16Be),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" => Some(XmlEncoding::Latin1),
            _ => None,
        }
    }

    fn compatible_with(self, declared: XmlEncoding) -> bool {
        match (self, declared) {
            // A BOM decides endianness; "UTF-16" alone only names the family.
            (XmlEncoding::Utf16Le, XmlEncoding::Utf16Be)
            | (XmlEncoding::Utf16Be, XmlEncoding::Utf16Le) => true,
            (a, b) => a == b,
        }
    }
}

#[derive(Debug)]
enum PassFailure {
    EncodingMismatch(XmlEncoding),
    Malformed(String),
}

/// Check that an XMP packet is well-formed XML.
pub fn check_well_formed(bytes: &[u8]) -> Result<()> {
    let first = detect_bom(bytes).unwrap_or(XmlEncoding::Utf8);
    match parse_pass(bytes, first) {
        Ok(()) => Ok(()),
        Err(PassFailure::Malformed(msg)) => Err(Error::Xml(msg)),
        Err(PassFailure::EncodingMismatch(declared)) => {
            log::debug!(
                "XMP packet declares {:?} but was read as {:?}, retrying",
                declared,
                first
            );
            match parse_pass(bytes, declared) {
                Ok(()) => Ok(()),
                Err(PassFailure::Malformed(msg)) => Err(Error::Xml(msg)),
                Err(PassFailure::EncodingMismatch(again)) => Err(Error::Xml(format!(
                    "encoding declaration {:?} does not match content",
                    again
                ))),
            }
        },
    }
}

fn detect_bom(bytes: &[u8]) -> Option<XmlEncoding> {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => Some(XmlEncoding::Utf8),
        [0xFF, 0xFE, ..] => Some(XmlEncoding::Utf16Le),
        [0xFE, 0xFF, ..] => Some(XmlEncoding::Utf16Be),
        _ => None,
    }
}

fn decode(bytes: &[u8], encoding: XmlEncoding) -> Option<String> {
    match encoding {
        XmlEncoding::Utf8 => {
            let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
            std::str::from_utf8(body).ok().map(str::to_string)
        },
        XmlEncoding::Utf16Le | XmlEncoding::Utf16Be => {
            let body = bytes
                .strip_prefix(&[0xFF, 0xFE])
                .or_else(|| bytes.strip_prefix(&[0xFE, 0xFF]))
                .unwrap_or(bytes);
            if body.len() % 2 != 0 {
                return None;
            }
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| match encoding {
                    XmlEncoding::Utf16Le => u16::from_le_bytes([pair[0], pair[1]]),
                    _ => u16::from_be_bytes([pair[0], pair[1]]),
                })
                .collect();
            String::from_utf16(&units).ok()
        },
        XmlEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Find the encoding label of an XML declaration, if any.
fn declared_label(text: &str) -> Option<String> {
    let start = text.find("<?xml ")?;
    let decl = &text[start..];
    let decl = &decl[..decl.find("?>")?];
    let after = &decl[decl.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after[1..];
    Some(value[..value.find(quote)?].to_string())
}

fn parse_pass(bytes: &[u8], encoding: XmlEncoding) -> std::result::Result<(), PassFailure> {
    let text = match decode(bytes, encoding) {
        Some(text) => text,
        None => {
            // The declaration is ASCII in every supported encoding but UTF-16.
            let raw = decode(bytes, XmlEncoding::Latin1).unwrap_or_default();
            return match declared_label(&raw).and_then(|l| XmlEncoding::from_label(&l)) {
                Some(declared) if declared != encoding => Err(PassFailure::EncodingMismatch(declared)),
                _ => Err(PassFailure::Malformed(format!(
                    "content is not valid {:?}",
                    encoding
                ))),
            };
        },
    };

    if let Some(label) = declared_label(&text) {
        match XmlEncoding::from_label(&label) {
            Some(declared) if !encoding.compatible_with(declared) => {
                return Err(PassFailure::EncodingMismatch(declared));
            },
            Some(_) => {},
            None => {
                return Err(PassFailure::Malformed(format!(
                    "unsupported encoding '{}'",
                    label
                )))
            },
        }
    }

    check_events(&text).map_err(PassFailure::Malformed)
}

fn check_events(text: &str) -> std::result::Result<(), String> {
    let mut reader = Reader::from_str(text);
    let mut depth: i64 = 0;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                if depth == 0 && saw_root {
                    return Err("more than one root element".to_string());
                }
                depth += 1;
                saw_root = true;
            },
            Ok(Event::Empty(_)) => {
                if depth == 0 && saw_root {
                    return Err("more than one root element".to_string());
                }
                saw_root = true;
            },
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth < 0 {
                    return Err("unexpected closing tag".to_string());
                }
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => {
                return Err(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            },
        }
    }

    if depth != 0 {
        return Err("unclosed element at end of packet".to_string());
    }
    if !saw_root {
        return Err("no root element".to_string());
    }
    Ok(())
}
