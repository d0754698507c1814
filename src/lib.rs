// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::enum_variant_names)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![warn(missing_docs)]

//! # PDF/A Profiles
//!
//! PDF/A-1 conformance profiles evaluated over a read-only PDF object graph.
//!
//! ## Core Features
//!
//! - **Level B**: trailer, catalog, metadata, color space, graphics state,
//!   XObject, annotation, font and action rules (ISO 19005-1, Section 6)
//! - **Tagged PDF**: marked content and structure tree presence
//! - **Level A**: Level B plus Tagged plus Unicode-mappable fonts
//! - **Stable reason codes** resolved to text through a locale message catalog
//!
//! ## Architecture
//!
//! - [`document::DocumentModel`] is the seam to a PDF parser: trailer access
//!   and indirect object loading. Catalog lookup, reference resolution, the
//!   page-tree walk, the font map and action detection are built on top.
//! - [`compliance::Profile`] implementations record [`compliance::ReasonCode`]s
//!   into a sink; structural errors become `GEN-001` reasons instead of
//!   aborting unrelated checks.
//! - Level A receives Level B and Tagged outcomes as plain values.
//!
//! ## Quick Start
//!
//! ```
//! use pdfa_profiles::compliance::{MessageCatalog, PdfA1Validator, PdfALevel};
//! use pdfa_profiles::document::MemoryDocument;
//! use pdfa_profiles::object::{dict, Object};
//!
//! let mut doc = MemoryDocument::new();
//! let pages = doc.add(Object::from(dict([
//!     ("Type", Object::name("Pages")),
//!     ("Kids", Object::Array(vec![])),
//! ])));
//! let catalog = doc.add(Object::from(dict([
//!     ("Type", Object::name("Catalog")),
//!     ("Pages", Object::Reference(pages)),
//! ])));
//! doc.set_trailer(dict([("Root", Object::Reference(catalog))]));
//!
//! let report = PdfA1Validator::new().validate(&doc);
//! assert!(!report.is_compliant(PdfALevel::A1b));
//!
//! let catalog = MessageCatalog::english();
//! for reason in &report.level_b.reasons {
//!     println!("{}", catalog.render(reason));
//! }
//! ```

pub mod compliance;
pub mod config;
pub mod document;
pub mod error;
pub mod object;

pub use config::{FailurePolicy, ProfileConfig};
pub use error::{Error, Result};
