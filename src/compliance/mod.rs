//! PDF/A-1 conformance profiles.
//!
//! A profile is a named set of rules evaluated against a [`DocumentModel`].
//! Three profiles are provided:
//!
//! - **ISO PDF/A-1, Level B**: structural and content rules for visual
//!   preservation ([`PdfA1bProfile`])
//! - **Tagged PDF**: marked content with a structure tree ([`TaggedProfile`])
//! - **ISO PDF/A-1, Level A**: Level B plus Tagged plus Unicode-mappable
//!   fonts ([`PdfA1aProfile`])
//!
//! Level A takes the other two outcomes at construction, so the usual order
//! is B, Tagged, A. [`PdfA1Validator`] does exactly that.
//!
//! Rule code records stable [`ReasonCode`]s; a [`MessageCatalog`] turns them
//! into text when the results are reported.
//!
//! ## Example
//!
//! ```
//! use pdfa_profiles::compliance::{PdfA1bProfile, Profile, ValidationContext};
//! use pdfa_profiles::document::MemoryDocument;
//!
//! let doc = MemoryDocument::new();
//! let mut level_b = PdfA1bProfile::new();
//! assert!(!level_b.satisfies_profile(&doc, &ValidationContext::default()));
//! assert!(!level_b.already_ok());
//! assert_eq!(level_b.reasons_for_non_compliance()[0].code.key(), "TRAILER-001");
//! ```
//!
//! ## Standards Reference
//!
//! - ISO 19005-1:2005 (PDF/A-1)
//! - ISO 32000-1:2008, Section 14.8 (Tagged PDF)
//!
//! [`DocumentModel`]: crate::document::DocumentModel

mod messages;
mod pdf_a;
mod pdf_a1a;
mod pdf_a1b;
mod profile;
mod tagged;
mod types;
pub mod xmp;

pub use messages::MessageCatalog;
pub use pdf_a::{validate_pdf_a1, PdfA1Report, PdfA1Validator};
pub use pdf_a1a::PdfA1aProfile;
pub use pdf_a1b::PdfA1bProfile;
pub use profile::{
    get_array, get_dict, get_name, get_text, has_filter, is_opaque, resolve, Profile, ProfileBase,
    ReasonSink, ValidationContext,
};
pub use tagged::TaggedProfile;
pub use types::{ComplianceReason, PdfALevel, ProfileOutcome, ProfileState, ReasonCode};
