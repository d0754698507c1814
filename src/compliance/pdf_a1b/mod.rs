//! PDF/A-1 Level B profile.
//!
//! Level B covers the structural and content rules that keep a document's
//! visual appearance reproducible: trailer and catalog restrictions,
//! metadata, color spaces, graphics state, XObjects, annotations, fonts
//! and actions.
//!
//! Every check runs independently. A check that trips over an unexpected
//! object shape records a `GEN-001` reason for its own scope and the run
//! continues with the next one. A missing trailer or catalog makes the rest
//! of the document unreachable and ends the run.
//!
//! PDF/A-1 Spec: ISO 19005-1:2005, Section 6

mod actions;
mod annotations;
mod catalog;
mod fonts;
mod pages;
mod resources;
mod trailer;

use super::profile::{offset_of, Profile, ProfileBase, ReasonSink, ValidationContext};
use super::types::{ComplianceReason, ReasonCode};
use crate::config::{FailurePolicy, ProfileConfig};
use crate::document::DocumentModel;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashSet;

/// The ISO PDF/A-1 Level B profile.
#[derive(Debug, Clone)]
pub struct PdfA1bProfile {
    base: ProfileBase,
}

impl PdfA1bProfile {
    /// Profile name.
    pub const NAME: &'static str = "ISO PDF/A-1, Level B";

    /// Create an unvalidated profile.
    pub fn new() -> Self {
        Self {
            base: ProfileBase::new(Self::NAME, "ISO PDF/A-1, Level B"),
        }
    }
}

impl Default for PdfA1bProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile for PdfA1bProfile {
    fn base(&self) -> &ProfileBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ProfileBase {
        &mut self.base
    }

    fn check(&self, doc: &dyn DocumentModel, ctx: &ValidationContext, sink: &mut ReasonSink) -> bool {
        if doc.trailer().is_none() {
            sink.push_code(ReasonCode::MissingTrailer);
            return false;
        }

        let mut run = LevelBRun::new(doc, &ctx.config, sink);

        // Trailer rules do not need the catalog.
        let result = run.check_trailer();
        run.absorb("trailer", result);

        match doc.catalog() {
            Ok(catalog) => {
                if run.should_stop() {
                    return false;
                }
                run.run_all(catalog)
            },
            Err(e) => {
                log::warn!("Level B evaluation aborted: {}", e);
                run.sink.push_code(ReasonCode::MissingCatalog);
                false
            },
        }
    }
}

/// Document-wide color facts, set on first use and never cleared during a run.
#[derive(Debug, Default)]
struct ColorState {
    rgb_seen: bool,
    cmyk_seen: bool,
    conflict_reported: bool,
    output_intent_checked: bool,
}

/// State of one Level B evaluation.
struct LevelBRun<'a> {
    doc: &'a dyn DocumentModel,
    config: &'a ProfileConfig,
    sink: &'a mut ReasonSink,
    catalog: Dictionary,
    actions_exist: bool,
    color: ColorState,
    /// Registry and Ordering of the first CMap seen.
    cid_baseline: Option<(String, String)>,
    visited_forms: HashSet<ObjectRef>,
    visited_actions: HashSet<ObjectRef>,
    visited_fields: HashSet<ObjectRef>,
    /// Outline items across every sibling chain and nesting level.
    visited_outlines: HashSet<ObjectRef>,
}

impl<'a> LevelBRun<'a> {
    fn new(doc: &'a dyn DocumentModel, config: &'a ProfileConfig, sink: &'a mut ReasonSink) -> Self {
        Self {
            doc,
            config,
            sink,
            catalog: Dictionary::new(),
            actions_exist: false,
            color: ColorState::default(),
            cid_baseline: None,
            visited_forms: HashSet::new(),
            visited_actions: HashSet::new(),
            visited_fields: HashSet::new(),
            visited_outlines: HashSet::new(),
        }
    }

    fn run_all(&mut self, catalog: Dictionary) -> bool {
        self.catalog = catalog;
        self.actions_exist = self.doc.actions_exist();

        macro_rules! run_check {
            ($scope:literal, $check:ident) => {
                let result = self.$check();
                self.absorb($scope, result);
                if self.should_stop() {
                    log::debug!("Stopping Level B evaluation after {}", $scope);
                    return false;
                }
            };
        }

        run_check!("catalog", check_catalog);
        run_check!("page tree", check_page_tree);
        run_check!("fonts", check_fonts);
        run_check!("outlines", check_outlines);
        true
    }

    /// Turn a check's structural error into a reason for that scope.
    fn absorb(&mut self, scope: &str, result: Result<()>) {
        if let Err(e) = result {
            self.sink.record_error(scope, &e);
        }
    }

    fn should_stop(&self) -> bool {
        self.config.failure_policy == FailurePolicy::Abort && !self.sink.is_empty()
    }

    /// Record a reason about `at`, attaching its offset when known.
    fn report(&mut self, code: ReasonCode, at: &Object) {
        let offset = offset_of(self.doc, at);
        self.sink.push(ComplianceReason::new(code).with_offset(offset));
    }

    /// Record a reason with detail about `at`.
    fn report_detail(&mut self, code: ReasonCode, detail: impl Into<String>, at: &Object) {
        let offset = offset_of(self.doc, at);
        self.sink
            .push(ComplianceReason::new(code).with_detail(detail).with_offset(offset));
    }

    /// Resolve `obj` and require a dictionary (streams yield their dictionary).
    fn resolve_dict(&self, obj: &Object) -> Result<Dictionary> {
        match self.doc.resolve(obj)? {
            Object::Dictionary(d) => Ok(d),
            Object::Stream { dict, .. } => Ok(dict),
            other => Err(Error::wrong_type("Dictionary", other.type_name())),
        }
    }

    fn check_depth(&self, depth: u32) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::RecursionLimitExceeded(self.config.max_depth));
        }
        Ok(())
    }
}
