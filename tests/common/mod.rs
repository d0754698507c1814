//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use pdfa_profiles::compliance::{ComplianceReason, ReasonCode};
use pdfa_profiles::document::MemoryDocument;
use pdfa_profiles::object::{dict, Dictionary, Object, ObjectRef};

pub const XMP_PACKET: &[u8] = br#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="" xmlns:pdfaid="http://www.aiim.org/pdfa/ns/id/">
      <pdfaid:part>1</pdfaid:part>
      <pdfaid:conformance>B</pdfaid:conformance>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn codes(reasons: &[ComplianceReason]) -> Vec<ReasonCode> {
    reasons.iter().map(|r| r.code).collect()
}

/// A document that satisfies Level B: one page, an ID, unfiltered XMP
/// metadata and nothing else.
pub struct Fixture {
    pub doc: MemoryDocument,
    pub catalog: ObjectRef,
    pub pages: ObjectRef,
    pub first_page: ObjectRef,
}

impl Fixture {
    pub fn conforming() -> Self {
        let mut doc = MemoryDocument::new();
        let metadata = doc.add(Object::Stream {
            dict: dict([
                ("Type", Object::name("Metadata")),
                ("Subtype", Object::name("XML")),
            ]),
            data: bytes::Bytes::from_static(XMP_PACKET),
        });
        let contents = doc.add(Object::Stream {
            dict: dict([("Filter", Object::name("FlateDecode"))]),
            data: bytes::Bytes::from_static(b"x\x9c"),
        });
        let pages = ObjectRef::new(1000, 0);
        let page = doc.add(Object::from(dict([
            ("Type", Object::name("Page")),
            ("Parent", Object::Reference(pages)),
            ("Resources", Object::from(Dictionary::new())),
            ("Contents", Object::Reference(contents)),
        ])));
        doc.insert(
            pages,
            Object::from(dict([
                ("Type", Object::name("Pages")),
                ("Kids", Object::Array(vec![Object::Reference(page)])),
                ("Count", Object::Integer(1)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
            ])),
        );
        let catalog = doc.add(Object::from(dict([
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Reference(pages)),
            ("Metadata", Object::Reference(metadata)),
        ])));
        doc.set_trailer(dict([
            ("Root", Object::Reference(catalog)),
            ("Size", Object::Integer(1001)),
            (
                "ID",
                Object::Array(vec![Object::text("0123456789abcdef"), Object::text("0123456789abcdef")]),
            ),
        ]));
        Self {
            doc,
            catalog,
            pages,
            first_page: page,
        }
    }

    pub fn catalog_mut(&mut self) -> &mut Dictionary {
        self.doc.dict_mut(self.catalog).expect("catalog")
    }

    pub fn trailer_mut(&mut self) -> &mut Dictionary {
        self.doc.trailer_mut().expect("trailer")
    }

    /// Resources of the first page (a direct dictionary).
    pub fn page_resources_mut(&mut self) -> &mut Dictionary {
        let page = self.doc.dict_mut(self.first_page).expect("page");
        match page.get_mut("Resources") {
            Some(Object::Dictionary(d)) => d,
            _ => panic!("page resources are not a direct dictionary"),
        }
    }

    /// Append a page with its own resources.
    pub fn add_page(&mut self, resources: Dictionary) -> ObjectRef {
        let page = self.doc.add(Object::from(dict([
            ("Type", Object::name("Page")),
            ("Parent", Object::Reference(self.pages)),
            ("Resources", Object::from(resources)),
        ])));
        let pages = self.doc.dict_mut(self.pages).expect("pages");
        if let Some(Object::Array(kids)) = pages.get_mut("Kids") {
            kids.push(Object::Reference(page));
        }
        page
    }

    pub fn add_color_space(&mut self, name: &str, space: Object) {
        let resources = self.page_resources_mut();
        let spaces = resources
            .entry("ColorSpace".to_string())
            .or_insert_with(|| Object::from(Dictionary::new()));
        if let Object::Dictionary(spaces) = spaces {
            spaces.insert(name.to_string(), space);
        }
    }

    pub fn add_font(&mut self, name: &str, font: Dictionary) -> ObjectRef {
        let font_ref = self.doc.add(Object::from(font));
        let resources = self.page_resources_mut();
        let fonts = resources
            .entry("Font".to_string())
            .or_insert_with(|| Object::from(Dictionary::new()));
        if let Object::Dictionary(fonts) = fonts {
            fonts.insert(name.to_string(), Object::Reference(font_ref));
        }
        font_ref
    }

    /// Add a conforming GTS_PDFA1 output intent with an ICC profile stream.
    pub fn add_output_intent(&mut self) {
        let profile = self.doc.add(Object::Stream {
            dict: dict([("N", Object::Integer(3))]),
            data: bytes::Bytes::from_static(b"ICC profile"),
        });
        let intent = dict([
            ("Type", Object::name("OutputIntent")),
            ("S", Object::name("GTS_PDFA1")),
            ("OutputCondition", Object::text("sRGB IEC61966-2.1")),
            ("OutputConditionIdentifier", Object::text("Custom")),
            ("DestOutputProfile", Object::Reference(profile)),
        ]);
        self.catalog_mut().insert(
            "OutputIntents".to_string(),
            Object::Array(vec![Object::from(intent)]),
        );
    }

    /// Mark the document as Tagged PDF.
    pub fn mark_tagged(&mut self) {
        let tree = self
            .doc
            .add(Object::from(dict([("Type", Object::name("StructTreeRoot"))])));
        let catalog = self.catalog_mut();
        catalog.insert(
            "MarkInfo".to_string(),
            Object::from(dict([("Marked", Object::Boolean(true))])),
        );
        catalog.insert("StructTreeRoot".to_string(), Object::Reference(tree));
    }
}

pub fn type0_font(ordering: &str, encoding: &str) -> Dictionary {
    dict([
        ("Type", Object::name("Font")),
        ("Subtype", Object::name("Type0")),
        ("BaseFont", Object::name("KozMinPro-Regular")),
        ("Encoding", Object::name(encoding)),
        (
            "DescendantFonts",
            Object::Array(vec![Object::from(dict([
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("CIDFontType0")),
                ("BaseFont", Object::name("KozMinPro-Regular")),
                (
                    "CIDSystemInfo",
                    Object::from(dict([
                        ("Registry", Object::text("Adobe")),
                        ("Ordering", Object::text(ordering)),
                        ("Supplement", Object::Integer(4)),
                    ])),
                ),
            ]))]),
        ),
    ])
}
