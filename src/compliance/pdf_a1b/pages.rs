//! Page tree walk: node resources, page dictionaries and content streams.

use super::LevelBRun;
use crate::compliance::profile::has_filter;
use crate::compliance::types::ReasonCode;
use crate::document::{PageTreeNode, PageTreeWalker};
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};

/// Stream keys that point at content outside the file.
const EXTERNAL_STREAM_KEYS: [&str; 3] = ["F", "FFilter", "FDecodeParms"];

impl LevelBRun<'_> {
    pub(super) fn check_page_tree(&mut self) -> Result<()> {
        let mut walker = PageTreeWalker::start_walk(self.doc)?;
        while let Some(node) = walker.next_node() {
            match node {
                Ok(node) => self.check_node(&node),
                Err(e) => self.sink.record_error("page tree", &e),
            }
            if self.should_stop() {
                break;
            }
        }
        Ok(())
    }

    fn check_node(&mut self, node: &PageTreeNode) {
        // Inherited resources were already checked at the ancestor that owns them.
        let result = node
            .own_resources(self.doc)
            .and_then(|res| match res {
                Some(resources) => self.check_resources(&resources, 0),
                None => Ok(()),
            });
        self.absorb("resources", result);

        if !node.is_page() {
            return;
        }
        let at = node.obj_ref().map(Object::Reference).unwrap_or(Object::Null);

        if node.dict().contains_key("AA") {
            self.report(ReasonCode::PageAdditionalActions, &at);
        }

        match node.annotations(self.doc) {
            Ok(annots) => {
                for annot in annots {
                    let result = self.check_annotation(&annot);
                    self.absorb("annotation", result);
                }
            },
            Err(e) => self.sink.record_error("annotations", &e),
        }

        match node.content_streams(self.doc) {
            Ok(streams) => {
                for stream in streams {
                    let result = self.check_content_stream(&stream);
                    self.absorb("content stream", result);
                }
            },
            Err(e) => self.sink.record_error("content streams", &e),
        }
    }

    fn check_content_stream(&mut self, raw: &Object) -> Result<()> {
        let dict = match self.doc.resolve(raw)? {
            Object::Stream { dict, .. } => dict,
            other => return Err(Error::wrong_type("Stream", other.type_name())),
        };
        self.check_stream_dict(&dict, raw)?;
        if let Some(resources) = dict.get("Resources") {
            let resources = self.resolve_dict(resources)?;
            self.check_resources(&resources, 1)?;
        }
        Ok(())
    }

    /// Rules shared by every stream: no external content, no denied filters.
    ///
    /// PDF/A-1 Spec: ISO 19005-1:2005, Section 6.1.7 - Stream objects
    pub(super) fn check_stream_dict(&mut self, dict: &Dictionary, at: &Object) -> Result<()> {
        for key in EXTERNAL_STREAM_KEYS {
            if dict.contains_key(key) {
                self.report_detail(ReasonCode::ExternalStreamContent, key, at);
            }
        }

        if let Some(filter) = dict.get("Filter") {
            let filter = self.doc.resolve(filter)?;
            if has_filter(Some(&filter), &self.config.filter_denylist) {
                let names = crate::object::extract_filter_names(&filter).join(" ");
                self.report_detail(ReasonCode::ForbiddenFilter, names, at);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compliance::pdf_a1b::PdfA1bProfile;
    use crate::compliance::profile::{Profile, ValidationContext};
    use crate::compliance::types::ReasonCode;
    use crate::config::ProfileConfig;
    use crate::document::MemoryDocument;
    use crate::object::{dict, Dictionary, Object};

    const XMP: &[u8] = b"<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>";

    fn doc_with_page(page: Dictionary) -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        let md = doc.add(Object::Stream {
            dict: Dictionary::new(),
            data: bytes::Bytes::from_static(XMP),
        });
        let page = doc.add(Object::from(page));
        let pages = doc.add(Object::from(dict([
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(vec![Object::Reference(page)])),
        ])));
        let catalog = doc.add(Object::from(dict([
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Reference(pages)),
            ("Metadata", Object::Reference(md)),
        ])));
        doc.set_trailer(dict([
            ("Root", Object::Reference(catalog)),
            ("ID", Object::Array(vec![Object::text("x"), Object::text("x")])),
        ]));
        doc
    }

    fn content(filter: Object, extra: Vec<(&str, Object)>) -> Object {
        let mut d = dict([("Filter", filter)]);
        for (k, v) in extra {
            d.insert(k.to_string(), v);
        }
        Object::Stream {
            dict: d,
            data: bytes::Bytes::new(),
        }
    }

    fn codes(doc: &MemoryDocument, ctx: &ValidationContext) -> Vec<ReasonCode> {
        let mut profile = PdfA1bProfile::new();
        profile.satisfies_profile(doc, ctx);
        profile.reasons_for_non_compliance().iter().map(|r| r.code).collect()
    }

    #[test]
    fn test_page_additional_actions() {
        let doc = doc_with_page(dict([
            ("Type", Object::name("Page")),
            ("AA", Object::from(Dictionary::new())),
        ]));
        assert_eq!(
            codes(&doc, &ValidationContext::default()),
            vec![ReasonCode::PageAdditionalActions]
        );
    }

    #[test]
    fn test_lzw_content_stream() {
        let doc = doc_with_page(dict([
            ("Type", Object::name("Page")),
            (
                "Contents",
                content(
                    Object::Array(vec![Object::name("ASCII85Decode"), Object::name("LZWDecode")]),
                    vec![],
                ),
            ),
        ]));
        assert_eq!(
            codes(&doc, &ValidationContext::default()),
            vec![ReasonCode::ForbiddenFilter]
        );
    }

    #[test]
    fn test_denylist_is_configurable() {
        let doc = doc_with_page(dict([
            ("Type", Object::name("Page")),
            ("Contents", content(Object::name("LZWDecode"), vec![])),
        ]));
        let ctx = ValidationContext::new(
            ProfileConfig::new().with_filter_denylist(Vec::<String>::new()),
        );
        assert!(codes(&doc, &ctx).is_empty());
    }

    #[test]
    fn test_external_stream_content() {
        let doc = doc_with_page(dict([
            ("Type", Object::name("Page")),
            (
                "Contents",
                Object::Array(vec![content(
                    Object::name("FlateDecode"),
                    vec![("F", Object::text("external.dat")), ("FFilter", Object::name("LZWDecode"))],
                )]),
            ),
        ]));
        assert_eq!(
            codes(&doc, &ValidationContext::default()),
            vec![ReasonCode::ExternalStreamContent, ReasonCode::ExternalStreamContent]
        );
    }

    #[test]
    fn test_contents_wrong_type_is_internal_error() {
        let doc = doc_with_page(dict([
            ("Type", Object::name("Page")),
            ("Contents", Object::Integer(5)),
        ]));
        assert_eq!(
            codes(&doc, &ValidationContext::default()),
            vec![ReasonCode::InternalError]
        );
    }
}
