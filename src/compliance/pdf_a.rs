//! PDF/A-1 validator.
//!
//! This module provides the orchestrator that evaluates Level B, then the
//! Tagged profile, then Level A with the first two results injected.

use super::messages::MessageCatalog;
use super::pdf_a1a::PdfA1aProfile;
use super::pdf_a1b::PdfA1bProfile;
use super::profile::{Profile, ValidationContext};
use super::tagged::TaggedProfile;
use super::types::{PdfALevel, ProfileOutcome};
use crate::config::ProfileConfig;
use crate::document::DocumentModel;
use crate::error::Result;
use serde::Serialize;
use serde_json::json;

/// PDF/A-1 compliance validator.
///
/// # Example
///
/// ```
/// use pdfa_profiles::compliance::{PdfA1Validator, PdfALevel};
/// use pdfa_profiles::document::MemoryDocument;
///
/// let doc = MemoryDocument::new();
/// let report = PdfA1Validator::new().validate(&doc);
///
/// assert!(!report.is_compliant(PdfALevel::A1b));
/// for reason in &report.level_b.reasons {
///     println!("Violation: {}", reason);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfA1Validator {
    context: ValidationContext,
}

impl PdfA1Validator {
    /// Create a validator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with the given configuration.
    pub fn with_config(config: ProfileConfig) -> Self {
        Self {
            context: ValidationContext::new(config),
        }
    }

    /// The evaluation context passed to every profile.
    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Evaluate all PDF/A-1 profiles against a document.
    pub fn validate(&self, doc: &dyn DocumentModel) -> PdfA1Report {
        let level_b = run_profile(&mut PdfA1bProfile::new(), doc, &self.context);
        let tagged = run_profile(&mut TaggedProfile::new(), doc, &self.context);
        let level_a = run_profile(
            &mut PdfA1aProfile::new(level_b.clone(), tagged.clone()),
            doc,
            &self.context,
        );
        PdfA1Report {
            level_b,
            tagged,
            level_a,
        }
    }

    /// Evaluate only Level B.
    pub fn check_level_b(&self, doc: &dyn DocumentModel) -> ProfileOutcome {
        run_profile(&mut PdfA1bProfile::new(), doc, &self.context)
    }
}

fn run_profile(profile: &mut dyn Profile, doc: &dyn DocumentModel, ctx: &ValidationContext) -> ProfileOutcome {
    let passed = profile.satisfies_profile(doc, ctx);
    profile.outcome().unwrap_or_else(|| ProfileOutcome {
        name: profile.name().to_string(),
        passed,
        reasons: Vec::new(),
    })
}

/// Outcomes of a full PDF/A-1 evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfA1Report {
    /// Level B outcome.
    pub level_b: ProfileOutcome,
    /// Tagged PDF outcome.
    pub tagged: ProfileOutcome,
    /// Level A outcome.
    pub level_a: ProfileOutcome,
}

impl PdfA1Report {
    /// Whether the document conforms to the given level.
    pub fn is_compliant(&self, level: PdfALevel) -> bool {
        match level {
            PdfALevel::A1b => self.level_b.passed,
            PdfALevel::A1a => self.level_a.passed,
        }
    }

    /// The highest level the document conforms to, if any.
    pub fn conformance(&self) -> Option<PdfALevel> {
        [PdfALevel::A1a, PdfALevel::A1b]
            .into_iter()
            .find(|level| self.is_compliant(*level))
    }

    /// Render the report as JSON, resolving messages through `catalog`.
    pub fn to_json(&self, catalog: &MessageCatalog) -> Result<String> {
        let render = |outcome: &ProfileOutcome| {
            let reasons: Vec<_> = outcome
                .reasons
                .iter()
                .map(|r| {
                    json!({
                        "code": r.code,
                        "message": catalog.render(r),
                        "offset": r.offset,
                    })
                })
                .collect();
            json!({
                "name": outcome.name,
                "passed": outcome.passed,
                "reasons": reasons,
            })
        };

        let value = json!({
            "locale": catalog.locale(),
            "conformance": self.conformance().map(|l| l.to_string()),
            "profiles": [render(&self.level_b), render(&self.tagged), render(&self.level_a)],
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Quick validation function for common use cases.
pub fn validate_pdf_a1(doc: &dyn DocumentModel) -> PdfA1Report {
    PdfA1Validator::new().validate(doc)
}
