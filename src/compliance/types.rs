//! PDF/A-1 compliance types and data structures.

use serde::{Serialize, Serializer};
use std::fmt;

/// PDF/A-1 conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PdfALevel {
    /// PDF/A-1a: Full conformance with logical structure
    A1a,
    /// PDF/A-1b: Basic conformance (visual preservation)
    A1b,
}

impl PdfALevel {
    /// Get the conformance level letter.
    pub fn conformance(&self) -> char {
        match self {
            PdfALevel::A1a => 'A',
            PdfALevel::A1b => 'B',
        }
    }

    /// Check if this level requires logical structure (Tagged PDF).
    pub fn requires_structure(&self) -> bool {
        matches!(self, PdfALevel::A1a)
    }
}

impl fmt::Display for PdfALevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PdfALevel::A1a => "PDF/A-1a",
            PdfALevel::A1b => "PDF/A-1b",
        };
        write!(f, "{}", name)
    }
}

macro_rules! reason_codes {
    ($($(#[$doc:meta])* $variant:ident => $key:literal,)*) => {
        /// Stable identifiers for every reason a profile can report.
        ///
        /// The key of a code never changes; messages are looked up by key
        /// in a [`MessageCatalog`](super::messages::MessageCatalog).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ReasonCode {
            $($(#[$doc])* $variant,)*
        }

        impl ReasonCode {
            /// Every reason code, in declaration order.
            pub const ALL: &'static [ReasonCode] = &[$(ReasonCode::$variant,)*];

            /// The stable key of this code.
            pub fn key(&self) -> &'static str {
                match self {
                    $(ReasonCode::$variant => $key,)*
                }
            }

            /// Look a code up by its stable key.
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(ReasonCode::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

reason_codes! {
    /// Unexpected object shape or unresolvable reference
    InternalError => "GEN-001",

    /// No trailer dictionary
    MissingTrailer => "TRAILER-001",
    /// Trailer references an Encrypt dictionary
    TrailerEncrypted => "TRAILER-002",
    /// Trailer has no ID entry
    TrailerNoId => "TRAILER-003",

    /// No catalog dictionary
    MissingCatalog => "CATALOG-001",
    /// Catalog has an AA entry
    CatalogAdditionalActions => "CATALOG-002",
    /// Catalog has an OCProperties entry
    CatalogOptionalContent => "CATALOG-003",
    /// Names dictionary has an EmbeddedFiles entry
    EmbeddedFiles => "CATALOG-004",

    /// Catalog has no Metadata entry
    MissingMetadata => "XMP-001",
    /// Metadata is not a stream
    MetadataNotStream => "XMP-002",
    /// Metadata stream has a Filter
    MetadataFiltered => "XMP-003",
    /// Metadata stream is not well-formed XML
    MetadataMalformed => "XMP-004",

    /// AcroForm NeedAppearances is true
    NeedAppearances => "FORM-001",
    /// Form field has an A or AA entry
    FormFieldAction => "FORM-002",
    /// Form field has no default resources
    FormFieldNoDefaultResources => "FORM-003",

    /// Both DeviceRGB and DeviceCMYK are used
    RgbCmykConflict => "COLOR-001",
    /// Uncalibrated color without a conforming PDF/A output intent
    MissingOutputIntent => "COLOR-002",
    /// Output intents declare different destination profiles
    OutputProfilesDiffer => "COLOR-003",

    /// ExtGState has a TR entry
    ExtGStateTransfer => "GSTATE-001",
    /// ExtGState TR2 is not Default
    ExtGStateTransfer2 => "GSTATE-002",
    /// ExtGState RI is not a standard rendering intent
    ExtGStateRenderingIntent => "GSTATE-003",
    /// ExtGState SMask is not None
    ExtGStateSoftMask => "GSTATE-004",
    /// ExtGState BM is not Normal or Compatible
    ExtGStateBlendMode => "GSTATE-005",
    /// ExtGState CA or ca is not 1.0
    ExtGStateAlpha => "GSTATE-006",

    /// PostScript XObject
    PostScriptXObject => "XOBJ-001",
    /// Image XObject has OPI or Alternates
    ImageForbiddenKey => "XOBJ-002",
    /// Image XObject Interpolate is true
    ImageInterpolate => "XOBJ-003",
    /// Image XObject Intent is not a standard rendering intent
    ImageRenderingIntent => "XOBJ-004",
    /// Form XObject has OPI, PS or Ref
    FormXObjectForbiddenKey => "XOBJ-005",
    /// Form XObject Subtype2 is PS
    FormXObjectPostScript => "XOBJ-006",

    /// Page dictionary has an AA entry
    PageAdditionalActions => "PAGE-001",

    /// Annotation subtype not permitted
    AnnotationTypeNotPermitted => "ANNOT-001",
    /// Movie, Sound or FileAttachment annotation
    AnnotationMultimedia => "ANNOT-002",
    /// Widget annotation has an AA entry
    WidgetAdditionalActions => "ANNOT-003",
    /// Annotation CA is not 1.0
    AnnotationAlpha => "ANNOT-004",
    /// Annotation flags do not force printing and visibility
    AnnotationFlags => "ANNOT-005",
    /// Annotation has no Contents
    AnnotationNoContents => "ANNOT-006",
    /// Appearance dictionary is not a lone normal-appearance stream
    AnnotationAppearance => "ANNOT-007",

    /// Stream refers to external content (F, FFilter, FDecodeParms)
    ExternalStreamContent => "STREAM-001",
    /// Stream uses a forbidden filter
    ForbiddenFilter => "STREAM-002",

    /// CMap CIDSystemInfo differs from the first one seen
    CidSystemInfoMismatch => "FONT-001",
    /// Descendant font is not CIDFontType0 or CIDFontType2
    CidFontSubtype => "FONT-002",
    /// CIDFontType2 has no Identity or stream CIDToGIDMap
    CidToGidMap => "FONT-003",
    /// Type 0 font Encoding is neither a name nor a CMap
    Type0Encoding => "FONT-004",
    /// Font cannot be mapped to Unicode
    FontNotUnicodeMappable => "FONT-005",

    /// Action type not permitted
    ForbiddenAction => "ACTION-001",
    /// Named action other than NextPage, PrevPage, FirstPage, LastPage
    NamedActionNotPermitted => "ACTION-002",

    /// MarkInfo Marked is not true
    NotMarked => "STRUCT-001",
    /// Catalog has no StructTreeRoot
    NoStructureTree => "STRUCT-002",
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Serialize for ReasonCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// One reason a document does not satisfy a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReason {
    /// Stable reason code.
    pub code: ReasonCode,
    /// Extra context (offending value, font name, original error text).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Byte offset of the offending object, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl ComplianceReason {
    /// Create a new reason without detail.
    pub fn new(code: ReasonCode) -> Self {
        Self {
            code,
            detail: None,
            offset: None,
        }
    }

    /// Set the detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the offset.
    pub fn with_offset(mut self, offset: Option<u64>) -> Self {
        self.offset = offset;
        self
    }
}

impl fmt::Display for ComplianceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code)?;
        if let Some(ref detail) = self.detail {
            write!(f, " {}", detail)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " (at offset {})", offset)?;
        }
        Ok(())
    }
}

/// The result of one completed profile run, as a plain value.
///
/// Dependent profiles receive outcomes rather than the profiles themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileOutcome {
    /// Profile name.
    pub name: String,
    /// Whether the document satisfied the profile.
    pub passed: bool,
    /// Reasons for non-compliance, in the order they were found.
    pub reasons: Vec<ComplianceReason>,
}

/// Lifecycle of a profile instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProfileState {
    /// No run has completed since the last reset.
    #[default]
    Unvalidated,
    /// A run has completed.
    Validated {
        /// Whether the document satisfied the profile.
        passed: bool,
        /// Reasons for non-compliance.
        reasons: Vec<ComplianceReason>,
    },
}

impl ProfileState {
    /// True only for a completed, passing run.
    pub fn passed(&self) -> bool {
        matches!(self, ProfileState::Validated { passed: true, .. })
    }

    /// Reasons of the last completed run (empty when unvalidated).
    pub fn reasons(&self) -> &[ComplianceReason] {
        match self {
            ProfileState::Unvalidated => &[],
            ProfileState::Validated { reasons, .. } => reasons,
        }
    }
}
