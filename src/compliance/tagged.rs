//! Tagged PDF profile.
//!
//! A document is tagged when its catalog declares `MarkInfo << /Marked true >>`
//! and carries a structure tree root. Level A depends on this result.
//!
//! PDF Spec: ISO 32000-1:2008, Section 14.8 - Tagged PDF

use super::profile::{get_dict, resolve, Profile, ProfileBase, ReasonSink, ValidationContext};
use super::types::ReasonCode;
use crate::document::DocumentModel;
use crate::error::Result;
use crate::object::Dictionary;

/// The Tagged PDF profile.
#[derive(Debug, Clone)]
pub struct TaggedProfile {
    base: ProfileBase,
}

impl TaggedProfile {
    /// Profile name.
    pub const NAME: &'static str = "Tagged PDF";

    /// Create an unvalidated profile.
    pub fn new() -> Self {
        Self {
            base: ProfileBase::new(Self::NAME, "Tagged PDF (marked content with a structure tree)"),
        }
    }

    fn check_catalog(doc: &dyn DocumentModel, catalog: &Dictionary, sink: &mut ReasonSink) -> Result<()> {
        let marked = get_dict(doc, catalog, "MarkInfo")?
            .map(|info| resolve(doc, info.get("Marked")))
            .transpose()?
            .flatten()
            .and_then(|m| m.as_bool())
            .unwrap_or(false);
        if !marked {
            sink.push_code(ReasonCode::NotMarked);
        }
        if resolve(doc, catalog.get("StructTreeRoot"))?.is_none() {
            sink.push_code(ReasonCode::NoStructureTree);
        }
        Ok(())
    }
}

impl Default for TaggedProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile for TaggedProfile {
    fn base(&self) -> &ProfileBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ProfileBase {
        &mut self.base
    }

    fn check(&self, doc: &dyn DocumentModel, _ctx: &ValidationContext, sink: &mut ReasonSink) -> bool {
        let catalog = match doc.catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Tagged evaluation aborted: {}", e);
                sink.push_code(if doc.trailer().is_none() {
                    ReasonCode::MissingTrailer
                } else {
                    ReasonCode::MissingCatalog
                });
                return false;
            },
        };
        if let Err(e) = Self::check_catalog(doc, &catalog, sink) {
            sink.record_error("structure", &e);
        }
        true
    }
}
