//! PDF/A-1 Level A profile.
//!
//! Level A is Level B plus logical structure plus text that can be mapped
//! to Unicode. The Level B and Tagged results are handed in at construction
//! as plain outcomes; this profile never re-runs them. When either one
//! failed, Level A fails with their reasons and does not run its own font
//! rule.
//!
//! PDF/A-1 Spec: ISO 19005-1:2005, Section 6.3.8 - Unicode character maps

use super::profile::{get_array, get_dict, get_text, Profile, ProfileBase, ReasonSink, ValidationContext};
use super::types::{ComplianceReason, ProfileOutcome, ReasonCode};
use crate::config::FailurePolicy;
use crate::document::{DocumentModel, FontEntry};
use crate::error::Result;
use crate::object::{Dictionary, Object};
use phf::phf_set;

/// Character collections whose CIDs map to Unicode through published tables.
static CJK_ORDERINGS: phf::Set<&'static str> = phf_set! {
    "Adobe-GB1",
    "Adobe-CNS1",
    "Adobe-Japan1",
    "Adobe-Korea1",
};

static STANDARD_ENCODINGS: phf::Set<&'static str> = phf_set! {
    "WinAnsiEncoding",
    "MacRomanEncoding",
    "MacExpertEncoding",
};

/// The ISO PDF/A-1 Level A profile.
#[derive(Debug, Clone)]
pub struct PdfA1aProfile {
    base: ProfileBase,
    level_b: ProfileOutcome,
    tagged: ProfileOutcome,
}

impl PdfA1aProfile {
    /// Profile name.
    pub const NAME: &'static str = "ISO PDF/A-1, Level A";

    /// Create a Level A profile from completed Level B and Tagged runs.
    pub fn new(level_b: ProfileOutcome, tagged: ProfileOutcome) -> Self {
        Self {
            base: ProfileBase::new(Self::NAME, "ISO PDF/A-1, Level A"),
            level_b,
            tagged,
        }
    }

    /// The injected Level B outcome.
    pub fn level_b(&self) -> &ProfileOutcome {
        &self.level_b
    }

    /// The injected Tagged outcome.
    pub fn tagged(&self) -> &ProfileOutcome {
        &self.tagged
    }

    fn check_fonts(&self, doc: &dyn DocumentModel, policy: FailurePolicy, sink: &mut ReasonSink) {
        let scan = match doc.font_map() {
            Ok(scan) => scan,
            Err(e) => {
                sink.record_error("fonts", &e);
                return;
            },
        };
        for failure in &scan.errors {
            sink.record_error(&failure.scope, &failure.error);
            if policy == FailurePolicy::Abort {
                return;
            }
        }

        for (subtype, entries) in &scan.fonts {
            for font in entries {
                match is_unicode_mappable(doc, subtype, &font.dict) {
                    Ok(true) => {},
                    Ok(false) => sink.push(unmappable(doc, font)),
                    Err(e) => sink.record_error(&format!("font {}", font.display_name()), &e),
                }
                if policy == FailurePolicy::Abort && !sink.is_empty() {
                    log::debug!("Stopping font check at {}", font.display_name());
                    return;
                }
            }
        }
    }
}

impl Profile for PdfA1aProfile {
    fn base(&self) -> &ProfileBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ProfileBase {
        &mut self.base
    }

    fn check(&self, doc: &dyn DocumentModel, ctx: &ValidationContext, sink: &mut ReasonSink) -> bool {
        if !self.level_b.passed || !self.tagged.passed {
            log::info!(
                "{} not satisfied: {} passed={}, {} passed={}",
                Self::NAME,
                self.level_b.name,
                self.level_b.passed,
                self.tagged.name,
                self.tagged.passed
            );
            sink.extend(self.level_b.reasons.iter().cloned());
            sink.extend(self.tagged.reasons.iter().cloned());
            return false;
        }

        self.check_fonts(doc, ctx.config.font_failure_policy, sink);
        true
    }
}

fn unmappable(doc: &dyn DocumentModel, font: &FontEntry) -> ComplianceReason {
    ComplianceReason::new(ReasonCode::FontNotUnicodeMappable)
        .with_detail(font.display_name())
        .with_offset(font.obj_ref.and_then(|r| doc.offset_of(r)))
}

/// Whether the text shown with a font can be mapped to Unicode.
fn is_unicode_mappable(doc: &dyn DocumentModel, subtype: &str, font: &Dictionary) -> Result<bool> {
    match subtype {
        "Type1" | "MMType1" => Ok(true),
        "Type0" => {
            if descendants_use_cjk_collection(doc, font)? {
                return Ok(true);
            }
            Ok(has_standard_encoding(doc, font)? || has_to_unicode(doc, font)?)
        },
        "TrueType" | "Type3" => Ok(has_standard_encoding(doc, font)? || has_to_unicode(doc, font)?),
        other => {
            log::debug!("No Unicode rule for font subtype {}", other);
            Ok(true)
        },
    }
}

/// True when there is at least one descendant and every descendant's
/// character collection is a CJK collection.
fn descendants_use_cjk_collection(doc: &dyn DocumentModel, font: &Dictionary) -> Result<bool> {
    let descendants = get_array(doc, font, "DescendantFonts")?.unwrap_or_default();
    if descendants.is_empty() {
        return Ok(false);
    }
    for descendant in &descendants {
        let cid_font = doc.resolve(descendant)?;
        let cid_font = cid_font.expect_dict()?;
        let Some(info) = get_dict(doc, cid_font, "CIDSystemInfo")? else {
            return Ok(false);
        };
        let registry = get_text(doc, &info, "Registry")?.unwrap_or_default();
        let ordering = get_text(doc, &info, "Ordering")?.unwrap_or_default();
        let collection = format!("{}-{}", registry, ordering);
        if !CJK_ORDERINGS.contains(ordering.as_str()) && !CJK_ORDERINGS.contains(collection.as_str()) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn has_standard_encoding(doc: &dyn DocumentModel, font: &Dictionary) -> Result<bool> {
    let Some(encoding) = font.get("Encoding") else {
        return Ok(false);
    };
    Ok(match doc.resolve(encoding)? {
        Object::Name(name) => STANDARD_ENCODINGS.contains(name.as_str()),
        Object::Dictionary(diff) => diff
            .get("BaseEncoding")
            .and_then(|b| b.as_name())
            .is_some_and(|b| STANDARD_ENCODINGS.contains(b)),
        _ => false,
    })
}

fn has_to_unicode(doc: &dyn DocumentModel, font: &Dictionary) -> Result<bool> {
    match font.get("ToUnicode") {
        None => Ok(false),
        Some(cmap) => Ok(doc.resolve(cmap)?.is_stream()),
    }
}
