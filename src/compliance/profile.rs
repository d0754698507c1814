//! Profile lifecycle and the helpers shared by every profile.
//!
//! A profile is evaluated through [`Profile::satisfies_profile`], which
//! resets the instance, runs the profile's checks against a fresh
//! [`ReasonSink`] and stores the outcome as a single [`ProfileState`]
//! value. Checks never return errors to the caller: structural problems
//! are recorded as `GEN-001` reasons carrying the original error text.

use super::types::{ComplianceReason, ProfileOutcome, ProfileState, ReasonCode};
use crate::config::ProfileConfig;
use crate::document::DocumentModel;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};

/// Everything a profile run may consult besides the document.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    /// Evaluation settings.
    pub config: ProfileConfig,
}

impl ValidationContext {
    /// Create a context from a configuration.
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }
}

/// Ordered collector of reasons for one profile run.
#[derive(Debug, Default)]
pub struct ReasonSink {
    reasons: Vec<ComplianceReason>,
}

impl ReasonSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reason.
    pub fn push(&mut self, reason: ComplianceReason) {
        log::debug!("Non-compliance: {}", reason);
        self.reasons.push(reason);
    }

    /// Record a bare reason code.
    pub fn push_code(&mut self, code: ReasonCode) {
        self.push(ComplianceReason::new(code));
    }

    /// Record a reason code with detail text.
    pub fn push_detail(&mut self, code: ReasonCode, detail: impl Into<String>) {
        self.push(ComplianceReason::new(code).with_detail(detail));
    }

    /// Convert a structural error into an internal-error reason.
    pub fn record_error(&mut self, scope: &str, err: &Error) {
        log::warn!("Error while checking {}: {}", scope, err);
        self.push_detail(ReasonCode::InternalError, format!("{}: {}", scope, err));
    }

    /// Append reasons produced elsewhere, preserving their order.
    pub fn extend<I: IntoIterator<Item = ComplianceReason>>(&mut self, reasons: I) {
        self.reasons.extend(reasons);
    }

    /// Whether no reason has been recorded.
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Number of recorded reasons.
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// Whether any reason with this code has been recorded.
    pub fn contains(&self, code: ReasonCode) -> bool {
        self.reasons.iter().any(|r| r.code == code)
    }

    /// Consume the sink, returning the reasons.
    pub fn into_reasons(self) -> Vec<ComplianceReason> {
        self.reasons
    }
}

/// Identity and run state shared by every profile.
#[derive(Debug, Clone)]
pub struct ProfileBase {
    name: String,
    text: String,
    state: ProfileState,
}

impl ProfileBase {
    /// Create an unvalidated base.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            state: ProfileState::Unvalidated,
        }
    }
}

/// A named set of conformance rules.
pub trait Profile {
    /// Shared identity and state.
    fn base(&self) -> &ProfileBase;

    /// Mutable access to the shared identity and state.
    fn base_mut(&mut self) -> &mut ProfileBase;

    /// Run the profile's checks, recording reasons into `sink`.
    ///
    /// Returns `false` when the profile fails for a reason the sink does
    /// not hold on its own (a failed dependency, an aborted evaluation).
    fn check(&self, doc: &dyn DocumentModel, ctx: &ValidationContext, sink: &mut ReasonSink)
        -> bool;

    /// Evaluate the profile against a document.
    ///
    /// The instance is reset first; after return it holds the new outcome.
    fn satisfies_profile(&mut self, doc: &dyn DocumentModel, ctx: &ValidationContext) -> bool {
        self.base_mut().state = ProfileState::Unvalidated;
        log::info!("Checking profile {}", self.name());

        let mut sink = ReasonSink::new();
        let verdict = self.check(doc, ctx, &mut sink);
        let passed = verdict && sink.is_empty();

        log::info!(
            "Profile {}: {} ({} reasons)",
            self.name(),
            if passed { "satisfied" } else { "not satisfied" },
            sink.len()
        );
        self.base_mut().state = ProfileState::Validated {
            passed,
            reasons: sink.into_reasons(),
        };
        passed
    }

    /// Profile name, e.g. `ISO PDF/A-1, Level B`.
    fn name(&self) -> &str {
        &self.base().name
    }

    /// Human-readable description of the profile.
    fn text(&self) -> &str {
        &self.base().text
    }

    /// True only after a run that satisfied the profile.
    fn already_ok(&self) -> bool {
        self.base().state.passed()
    }

    /// Reasons from the last run, in discovery order.
    fn reasons_for_non_compliance(&self) -> &[ComplianceReason] {
        self.base().state.reasons()
    }

    /// The current lifecycle state.
    fn state(&self) -> &ProfileState {
        &self.base().state
    }

    /// The last run as a plain value, or `None` before any run.
    fn outcome(&self) -> Option<ProfileOutcome> {
        match &self.base().state {
            ProfileState::Unvalidated => None,
            ProfileState::Validated { passed, reasons } => Some(ProfileOutcome {
                name: self.name().to_string(),
                passed: *passed,
                reasons: reasons.clone(),
            }),
        }
    }
}

/// Resolve an optional dictionary value.
///
/// An absent entry and an explicit `null` both yield `Ok(None)`; a value
/// that cannot be resolved is an error.
pub fn resolve(doc: &dyn DocumentModel, field: Option<&Object>) -> Result<Option<Object>> {
    match field {
        None => Ok(None),
        Some(obj) => match doc.resolve(obj)? {
            Object::Null => Ok(None),
            resolved => Ok(Some(resolved)),
        },
    }
}

/// Resolve `dict[key]` and require a dictionary (or stream dictionary).
pub fn get_dict(doc: &dyn DocumentModel, dict: &Dictionary, key: &str) -> Result<Option<Dictionary>> {
    match resolve(doc, dict.get(key))? {
        None => Ok(None),
        Some(Object::Dictionary(d)) => Ok(Some(d)),
        Some(Object::Stream { dict, .. }) => Ok(Some(dict)),
        Some(other) => Err(Error::wrong_type("Dictionary", other.type_name())),
    }
}

/// Resolve `dict[key]` and require an array.
pub fn get_array(doc: &dyn DocumentModel, dict: &Dictionary, key: &str) -> Result<Option<Vec<Object>>> {
    match resolve(doc, dict.get(key))? {
        None => Ok(None),
        Some(Object::Array(a)) => Ok(Some(a)),
        Some(other) => Err(Error::wrong_type("Array", other.type_name())),
    }
}

/// Resolve `dict[key]` and require a name.
pub fn get_name(doc: &dyn DocumentModel, dict: &Dictionary, key: &str) -> Result<Option<String>> {
    match resolve(doc, dict.get(key))? {
        None => Ok(None),
        Some(Object::Name(n)) => Ok(Some(n)),
        Some(other) => Err(Error::wrong_type("Name", other.type_name())),
    }
}

/// Resolve `dict[key]` and require a string or name, returned as text.
pub fn get_text(doc: &dyn DocumentModel, dict: &Dictionary, key: &str) -> Result<Option<String>> {
    match resolve(doc, dict.get(key))? {
        None => Ok(None),
        Some(obj) => obj
            .as_text()
            .map(Some)
            .ok_or_else(|| Error::wrong_type("String", obj.type_name())),
    }
}

/// Whether a Filter entry names any filter on the denylist.
///
/// The entry may be a single name or an array of names; an absent entry
/// matches nothing.
pub fn has_filter(filter_field: Option<&Object>, denylist: &[String]) -> bool {
    let Some(filter) = filter_field else {
        return false;
    };
    crate::object::extract_filter_names(filter)
        .iter()
        .any(|name| denylist.iter().any(|denied| denied == name))
}

/// Whether a number equals 1.0 (used for constant-alpha checks).
pub fn is_opaque(value: &Object) -> bool {
    value.as_number().is_some_and(|n| (n - 1.0).abs() < f64::EPSILON)
}

/// Byte offset of an object if it is an indirect reference the document can place.
pub fn offset_of(doc: &dyn DocumentModel, obj: &Object) -> Option<u64> {
    obj.as_reference().and_then(|r| doc.offset_of(r))
}
