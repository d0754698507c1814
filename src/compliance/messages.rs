//! Message catalog for compliance reasons.
//!
//! Rule code only ever records a [`ReasonCode`]; turning it into text
//! happens here, at the reporting boundary. Untranslated keys render as
//! the key itself.

use super::types::{ComplianceReason, ReasonCode};
use crate::error::Result;
use phf::phf_map;
use std::collections::HashMap;

static ENGLISH: phf::Map<&'static str, &'static str> = phf_map! {
    "GEN-001" => "Internal error while inspecting the document",
    "TRAILER-001" => "Document has no trailer",
    "TRAILER-002" => "Document is encrypted",
    "TRAILER-003" => "Trailer has no ID entry",
    "CATALOG-001" => "Document has no catalog",
    "CATALOG-002" => "Catalog contains an additional-actions (AA) entry",
    "CATALOG-003" => "Catalog contains optional content (OCProperties)",
    "CATALOG-004" => "Document contains embedded files",
    "XMP-001" => "Catalog has no XMP metadata stream",
    "XMP-002" => "Metadata entry is not a stream",
    "XMP-003" => "Metadata stream is filtered",
    "XMP-004" => "Metadata stream is not well-formed XML",
    "FORM-001" => "AcroForm NeedAppearances is true",
    "FORM-002" => "Form field contains an action (A or AA)",
    "FORM-003" => "Form field has no default resources (DR)",
    "COLOR-001" => "Document uses both DeviceRGB and DeviceCMYK",
    "COLOR-002" => "Uncalibrated color space used without a PDF/A-1 output intent",
    "COLOR-003" => "Output intents declare different destination output profiles",
    "GSTATE-001" => "ExtGState contains a transfer function (TR)",
    "GSTATE-002" => "ExtGState TR2 is not Default",
    "GSTATE-003" => "ExtGState rendering intent is not permitted",
    "GSTATE-004" => "ExtGState soft mask is not None",
    "GSTATE-005" => "ExtGState blend mode is not Normal or Compatible",
    "GSTATE-006" => "ExtGState constant alpha is not 1.0",
    "XOBJ-001" => "PostScript XObject is not permitted",
    "XOBJ-002" => "Image XObject contains OPI or Alternates",
    "XOBJ-003" => "Image XObject has Interpolate set to true",
    "XOBJ-004" => "Image XObject rendering intent is not permitted",
    "XOBJ-005" => "Form XObject contains OPI, PS or Ref",
    "XOBJ-006" => "Form XObject has Subtype2 PS",
    "PAGE-001" => "Page contains an additional-actions (AA) entry",
    "ANNOT-001" => "Annotation type is not permitted",
    "ANNOT-002" => "Movie, Sound and FileAttachment annotations are not permitted",
    "ANNOT-003" => "Widget annotation contains an additional-actions (AA) entry",
    "ANNOT-004" => "Annotation constant alpha is not 1.0",
    "ANNOT-005" => "Annotation flags must set Print and clear Hidden, Invisible and NoView",
    "ANNOT-006" => "Annotation has no Contents entry",
    "ANNOT-007" => "Appearance dictionary must contain only a normal appearance stream",
    "STREAM-001" => "Stream refers to external content",
    "STREAM-002" => "Stream uses a forbidden filter",
    "FONT-001" => "CMap CIDSystemInfo differs from other fonts in the document",
    "FONT-002" => "Descendant font is not CIDFontType0 or CIDFontType2",
    "FONT-003" => "CIDFontType2 font has no Identity or stream CIDToGIDMap",
    "FONT-004" => "Type 0 font encoding is neither a name nor a CMap",
    "FONT-005" => "Font characters cannot be mapped to Unicode",
    "ACTION-001" => "Action type is not permitted",
    "ACTION-002" => "Named action is not permitted",
    "STRUCT-001" => "Document is not marked as Tagged PDF",
    "STRUCT-002" => "Document has no structure tree",
};

/// Locale-specific messages keyed by reason code.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locale: String,
    messages: HashMap<String, String>,
    builtin: bool,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl MessageCatalog {
    /// The built-in English catalog.
    pub fn english() -> Self {
        Self {
            locale: "en".to_string(),
            messages: HashMap::new(),
            builtin: true,
        }
    }

    /// An empty catalog for a locale; every key renders as itself until translated.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            messages: HashMap::new(),
            builtin: false,
        }
    }

    /// Load translations from a JSON object of `"KEY": "message"` pairs.
    pub fn from_json(locale: impl Into<String>, json: &str) -> Result<Self> {
        let messages: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self {
            locale: locale.into(),
            messages,
            builtin: false,
        })
    }

    /// Add or replace one message.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// The catalog's locale tag.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Look up a key, falling back to the key itself.
    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(message) = self.messages.get(key) {
            return message;
        }
        if self.builtin {
            if let Some(message) = ENGLISH.get(key) {
                return message;
            }
        }
        key
    }

    /// The message for a reason code.
    pub fn message(&self, code: ReasonCode) -> &str {
        self.lookup(code.key())
    }

    /// Render a reason as a single line of text.
    pub fn render(&self, reason: &ComplianceReason) -> String {
        match reason.detail {
            Some(ref detail) => format!("{}: {}", self.message(reason.code), detail),
            None => self.message(reason.code).to_string(),
        }
    }
}
