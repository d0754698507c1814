//! Composite font rules (ISO 19005-1, 6.3.3).

use super::LevelBRun;
use crate::compliance::profile::{get_array, get_dict, get_text};
use crate::compliance::types::ReasonCode;
use crate::document::FontEntry;
use crate::error::Result;
use crate::object::Object;

impl LevelBRun<'_> {
    pub(super) fn check_fonts(&mut self) -> Result<()> {
        let scan = self.doc.font_map()?;
        for failure in &scan.errors {
            self.sink.record_error(&failure.scope, &failure.error);
        }
        let Some(type0) = scan.fonts.get("Type0") else {
            return Ok(());
        };
        for font in type0 {
            let result = self.check_type0(font);
            self.absorb("Type0 font", result);
        }
        Ok(())
    }

    fn check_type0(&mut self, font: &FontEntry) -> Result<()> {
        let at = font.obj_ref.map(Object::Reference).unwrap_or(Object::Null);

        match font.dict.get("Encoding").map(|e| self.doc.resolve(e)).transpose()? {
            Some(Object::Name(_)) => {},
            Some(Object::Stream { dict: cmap, .. }) | Some(Object::Dictionary(cmap)) => {
                if let Some(info) = get_dict(self.doc, &cmap, "CIDSystemInfo")? {
                    let registry = get_text(self.doc, &info, "Registry")?.unwrap_or_default();
                    let ordering = get_text(self.doc, &info, "Ordering")?.unwrap_or_default();
                    match self.cid_baseline.clone() {
                        None => self.cid_baseline = Some((registry, ordering)),
                        Some((base_registry, base_ordering)) => {
                            if base_registry != registry || base_ordering != ordering {
                                let detail = format!(
                                    "{}: {}-{} (expected {}-{})",
                                    font.display_name(),
                                    registry,
                                    ordering,
                                    base_registry,
                                    base_ordering
                                );
                                self.report_detail(ReasonCode::CidSystemInfoMismatch, detail, &at);
                            }
                        },
                    }
                }
            },
            _ => self.report_detail(ReasonCode::Type0Encoding, font.display_name(), &at),
        }

        for descendant in get_array(self.doc, &font.dict, "DescendantFonts")?.unwrap_or_default() {
            let cid_font = self.resolve_dict(&descendant)?;
            match cid_font.get("Subtype").and_then(|s| s.as_name()) {
                Some("CIDFontType0") => {},
                Some("CIDFontType2") => {
                    let map = cid_font
                        .get("CIDToGIDMap")
                        .map(|m| self.doc.resolve(m))
                        .transpose()?;
                    let ok = match map {
                        Some(Object::Name(ref n)) => n == "Identity",
                        Some(Object::Stream { .. }) => true,
                        _ => false,
                    };
                    if !ok {
                        self.report_detail(ReasonCode::CidToGidMap, font.display_name(), &descendant);
                    }
                },
                other => {
                    let detail = format!("{}: {}", font.display_name(), other.unwrap_or("(none)"));
                    self.report_detail(ReasonCode::CidFontSubtype, detail, &descendant);
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compliance::pdf_a1b::PdfA1bProfile;
    use crate::compliance::profile::{Profile, ValidationContext};
    use crate::compliance::types::ReasonCode;
    use crate::document::MemoryDocument;
    use crate::object::{dict, Dictionary, Object};

    const XMP: &[u8] = b"<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>";

    fn cmap(registry: &str, ordering: &str) -> Object {
        Object::Stream {
            dict: dict([
                ("Type", Object::name("CMap")),
                (
                    "CIDSystemInfo",
                    Object::from(dict([
                        ("Registry", Object::text(registry)),
                        ("Ordering", Object::text(ordering)),
                        ("Supplement", Object::Integer(0)),
                    ])),
                ),
            ]),
            data: bytes::Bytes::new(),
        }
    }

    fn descendant(subtype: &str, cid_to_gid: Option<Object>) -> Object {
        let mut d = dict([("Type", Object::name("Font")), ("Subtype", Object::name(subtype))]);
        if let Some(map) = cid_to_gid {
            d.insert("CIDToGIDMap".to_string(), map);
        }
        Object::from(d)
    }

    fn type0(encoding: Object, descendant: Object) -> Dictionary {
        dict([
            ("Type", Object::name("Font")),
            ("Subtype", Object::name("Type0")),
            ("BaseFont", Object::name("Test")),
            ("Encoding", encoding),
            ("DescendantFonts", Object::Array(vec![descendant])),
        ])
    }

    /// Fonts given as references are used as is; anything else is added
    /// to the document first.
    fn codes_for(fonts: Vec<impl Into<Object>>) -> Vec<ReasonCode> {
        let mut doc = MemoryDocument::new();
        let md = doc.add(Object::Stream {
            dict: Dictionary::new(),
            data: bytes::Bytes::from_static(XMP),
        });
        let font_dict: Dictionary = fonts
            .into_iter()
            .enumerate()
            .map(|(i, f)| {
                let entry = match f.into() {
                    reference @ Object::Reference(_) => reference,
                    other => Object::Reference(doc.add(other)),
                };
                (format!("F{}", i), entry)
            })
            .collect();
        let page = doc.add(Object::from(dict([
            ("Type", Object::name("Page")),
            ("Resources", Object::from(dict([("Font", Object::from(font_dict))]))),
        ])));
        let pages = doc.add(Object::from(dict([
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(vec![Object::Reference(page)])),
        ])));
        let catalog = doc.add(Object::from(dict([
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Reference(pages)),
            ("Metadata", Object::Reference(md)),
        ])));
        doc.set_trailer(dict([
            ("Root", Object::Reference(catalog)),
            ("ID", Object::Array(vec![Object::text("x"), Object::text("x")])),
        ]));
        let mut profile = PdfA1bProfile::new();
        profile.satisfies_profile(&doc, &ValidationContext::default());
        profile.reasons_for_non_compliance().iter().map(|r| r.code).collect()
    }

    #[test]
    fn test_named_encoding_passes() {
        let font = type0(Object::name("Identity-H"), descendant("CIDFontType0", None));
        assert!(codes_for(vec![font]).is_empty());
    }

    #[test]
    fn test_encoding_must_be_name_or_cmap() {
        let font = type0(Object::Integer(3), descendant("CIDFontType0", None));
        assert_eq!(codes_for(vec![font]), vec![ReasonCode::Type0Encoding]);
    }

    #[test]
    fn test_cid_system_info_baseline() {
        let first = type0(cmap("Adobe", "Japan1"), descendant("CIDFontType0", None));
        let same = type0(cmap("Adobe", "Japan1"), descendant("CIDFontType0", None));
        let other = type0(cmap("Adobe", "Korea1"), descendant("CIDFontType0", None));
        assert_eq!(
            codes_for(vec![first, same, other]),
            vec![ReasonCode::CidSystemInfoMismatch]
        );
    }

    #[test]
    fn test_descendant_rules() {
        let type2_identity = type0(
            Object::name("Identity-H"),
            descendant("CIDFontType2", Some(Object::name("Identity"))),
        );
        let type2_missing = type0(Object::name("Identity-H"), descendant("CIDFontType2", None));
        let type1_descendant = type0(Object::name("Identity-H"), descendant("Type1", None));
        assert_eq!(
            codes_for(vec![type2_identity, type2_missing, type1_descendant]),
            vec![ReasonCode::CidToGidMap, ReasonCode::CidFontSubtype]
        );
    }

    #[test]
    fn test_cid_to_gid_map_stream_passes() {
        let map = Object::Stream {
            dict: Dictionary::new(),
            data: bytes::Bytes::from_static(&[0, 1, 0, 2]),
        };
        let font = type0(Object::name("Identity-H"), descendant("CIDFontType2", Some(map)));
        assert!(codes_for(vec![font]).is_empty());
    }

    #[test]
    fn test_unreadable_font_does_not_hide_others() {
        let broken = Object::reference(4242, 0);
        let bad_encoding = Object::from(type0(Object::Integer(3), descendant("CIDFontType0", None)));
        assert_eq!(
            codes_for(vec![broken, bad_encoding]),
            vec![ReasonCode::InternalError, ReasonCode::Type0Encoding]
        );
    }
}
