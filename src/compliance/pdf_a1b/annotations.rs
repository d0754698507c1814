//! Annotation rules (ISO 19005-1, 6.5).

use super::LevelBRun;
use crate::compliance::profile::{get_dict, is_opaque, resolve};
use crate::compliance::types::ReasonCode;
use crate::error::Result;
use crate::object::Object;
use bitflags::bitflags;
use phf::phf_set;

static PERMITTED_SUBTYPES: phf::Set<&'static str> = phf_set! {
    "Text",
    "Link",
    "FreeText",
    "Line",
    "Square",
    "Circle",
    "Highlight",
    "Underline",
    "Squiggly",
    "StrikeOut",
    "Stamp",
    "Ink",
    "Popup",
    "Widget",
    "PrinterMark",
    "TrapNet",
};

static MULTIMEDIA_SUBTYPES: phf::Set<&'static str> = phf_set! {
    "Movie",
    "Sound",
    "FileAttachment",
};

bitflags! {
    /// Annotation flags (ISO 32000-1, Table 165).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct AnnotationFlags: u32 {
        /// Bit 1: hide unknown annotation types
        const INVISIBLE = 1 << 0;
        /// Bit 2: never display or print
        const HIDDEN = 1 << 1;
        /// Bit 3: print with the page
        const PRINT = 1 << 2;
        /// Bit 4: do not scale with page magnification
        const NO_ZOOM = 1 << 3;
        /// Bit 5: do not rotate with the page
        const NO_ROTATE = 1 << 4;
        /// Bit 6: do not display on screen
        const NO_VIEW = 1 << 5;
    }
}

/// Whether an annotation's flags force it to print and stay visible.
fn flags_permitted(subtype: &str, f: AnnotationFlags) -> bool {
    let required = if subtype == "Text" {
        AnnotationFlags::PRINT | AnnotationFlags::NO_ZOOM | AnnotationFlags::NO_ROTATE
    } else {
        AnnotationFlags::PRINT
    };
    let forbidden = AnnotationFlags::INVISIBLE | AnnotationFlags::HIDDEN | AnnotationFlags::NO_VIEW;
    f.contains(required) && !f.intersects(forbidden)
}

impl LevelBRun<'_> {
    pub(super) fn check_annotation(&mut self, raw: &Object) -> Result<()> {
        let annot = self.resolve_dict(raw)?;
        let subtype = annot
            .get("Subtype")
            .and_then(|s| s.as_name())
            .unwrap_or_default()
            .to_string();

        if MULTIMEDIA_SUBTYPES.contains(subtype.as_str()) {
            self.report_detail(ReasonCode::AnnotationMultimedia, subtype.as_str(), raw);
        } else if !PERMITTED_SUBTYPES.contains(subtype.as_str()) {
            self.report_detail(ReasonCode::AnnotationTypeNotPermitted, subtype.as_str(), raw);
        }

        if subtype == "Widget" && annot.contains_key("AA") {
            self.report(ReasonCode::WidgetAdditionalActions, raw);
        }

        if let Some(ca) = resolve(self.doc, annot.get("CA"))? {
            if !is_opaque(&ca) {
                self.report(ReasonCode::AnnotationAlpha, raw);
            }
        }

        let f = resolve(self.doc, annot.get("F"))?
            .and_then(|f| f.as_integer())
            .unwrap_or(0);
        // F is a 32-bit field; anything wider cannot carry the required bits.
        let permitted = u32::try_from(f).is_ok_and(|bits| {
            flags_permitted(&subtype, AnnotationFlags::from_bits_retain(bits))
        });
        if !permitted {
            self.report_detail(ReasonCode::AnnotationFlags, format!("F={}", f), raw);
        }

        if subtype != "Text" && !annot.contains_key("Contents") {
            self.report_detail(ReasonCode::AnnotationNoContents, subtype.as_str(), raw);
        }

        if let Some(ap) = get_dict(self.doc, &annot, "AP")? {
            let normal_is_stream = match ap.get("N") {
                Some(n) => self.doc.resolve(n)?.is_stream(),
                None => false,
            };
            if !normal_is_stream || ap.len() != 1 {
                self.report(ReasonCode::AnnotationAppearance, raw);
            }
        }

        if self.actions_exist {
            if let Some(action) = annot.get("A") {
                self.check_action(action, 0)?;
            }
        }
        Ok(())
    }
}
