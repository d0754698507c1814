//! Read-only access to a PDF object graph.
//!
//! Parsing is somebody else's job: anything that can hand out the trailer
//! and load indirect objects by reference implements [`DocumentModel`] and
//! gets the catalog accessor, reference resolution, the font map and the
//! actions-exist flag for free. [`MemoryDocument`] is the in-memory
//! implementation used by tests and by callers that build graphs themselves.
//! The page-tree walk lives in [`page_tree`].

mod memory;
pub mod page_tree;

pub use memory::MemoryDocument;
pub use page_tree::{PageTreeNode, PageTreeWalker};

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::{BTreeMap, HashSet};

/// Maximum length of a reference chain (`1 0 R` pointing at `2 0 R` ...).
const MAX_REFERENCE_HOPS: usize = 32;

/// Maximum nesting followed when collecting fonts or looking for actions.
const MAX_GRAPH_DEPTH: u32 = 64;

/// A font dictionary found in the document's resources.
#[derive(Debug, Clone, PartialEq)]
pub struct FontEntry {
    /// Indirect reference of the font, if it was referenced indirectly.
    pub obj_ref: Option<ObjectRef>,
    /// Resource name the font was first found under (e.g. `F1`).
    pub resource_name: String,
    /// The resolved font dictionary.
    pub dict: Dictionary,
}

impl FontEntry {
    /// The font's BaseFont, or its resource name when BaseFont is missing.
    pub fn display_name(&self) -> String {
        self.dict
            .get("BaseFont")
            .and_then(|o| o.as_text())
            .unwrap_or_else(|| self.resource_name.clone())
    }
}

/// Fonts grouped by their `Subtype` (Type0, Type1, TrueType, ...).
///
/// Groups are ordered by subtype name; fonts within a group keep discovery order.
pub type FontMap = BTreeMap<String, Vec<FontEntry>>;

/// A resource entry that could not be read while collecting fonts.
#[derive(Debug)]
pub struct FontScanError {
    /// What was being read, e.g. `font F0` or `XObject Fm1`.
    pub scope: String,
    pub error: Error,
}

/// Result of a font collection pass.
///
/// A broken entry does not hide its healthy neighbours: it lands in
/// `errors` and collection moves on to the next one.
#[derive(Debug, Default)]
pub struct FontScan {
    pub fonts: FontMap,
    pub errors: Vec<FontScanError>,
}

/// Read-only view of a PDF document's object graph.
pub trait DocumentModel {
    /// The trailer dictionary, if the document has one.
    fn trailer(&self) -> Option<&Dictionary>;

    /// Load an indirect object.
    ///
    /// Returns `Error::ObjectNotFound` when the reference cannot be satisfied.
    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object>;

    /// Byte offset of an indirect object in the file, when known.
    fn offset_of(&self, _obj_ref: ObjectRef) -> Option<u64> {
        None
    }

    /// Follow a reference chain until a direct object is reached.
    fn resolve(&self, obj: &Object) -> Result<Object> {
        let mut current = obj.clone();
        let mut seen = HashSet::new();
        for _ in 0..MAX_REFERENCE_HOPS {
            match current {
                Object::Reference(obj_ref) => {
                    if !seen.insert(obj_ref) {
                        return Err(Error::CircularReference(obj_ref));
                    }
                    current = self.load_object(obj_ref)?;
                },
                other => return Ok(other),
            }
        }
        Err(Error::RecursionLimitExceeded(MAX_REFERENCE_HOPS as u32))
    }

    /// The document catalog, reached through the trailer's `Root` entry.
    fn catalog(&self) -> Result<Dictionary> {
        let trailer = self.trailer().ok_or(Error::MissingTrailer)?;
        let root = trailer.get("Root").ok_or(Error::MissingCatalog)?;
        match self.resolve(root) {
            Ok(Object::Dictionary(d)) => Ok(d),
            Ok(other) => {
                log::warn!("Catalog is a {}, not a dictionary", other.type_name());
                Err(Error::MissingCatalog)
            },
            Err(e) => {
                log::warn!("Failed to load catalog: {}", e);
                Err(Error::MissingCatalog)
            },
        }
    }

    /// All fonts used by pages, content streams, form XObjects and tiling
    /// patterns, grouped by subtype.
    ///
    /// Fails only when the page tree cannot be entered at all.
    fn font_map(&self) -> Result<FontScan> {
        collect_fonts(self)
    }

    /// Whether the document contains any actions at all.
    ///
    /// A document whose graph cannot be inspected is assumed to contain
    /// actions so that action checks still run.
    fn actions_exist(&self) -> bool {
        detect_actions(self).unwrap_or_else(|e| {
            log::warn!("Could not determine whether actions exist: {}", e);
            true
        })
    }
}

/// Collect the fonts of every page-tree node, of the page content streams
/// and of nested form XObjects and tiling patterns.
pub fn collect_fonts<D: DocumentModel + ?Sized>(doc: &D) -> Result<FontScan> {
    let mut collector = FontCollector {
        doc,
        scan: FontScan::default(),
        seen_fonts: HashSet::new(),
        seen_containers: HashSet::new(),
    };
    let mut walker = PageTreeWalker::start_walk(doc)?;
    while let Some(node) = walker.next_node() {
        match node {
            Ok(node) => collector.collect_node(&node),
            Err(e) => collector.absorb("page tree", Err(e)),
        }
    }
    Ok(collector.scan)
}

struct FontCollector<'a, D: ?Sized> {
    doc: &'a D,
    scan: FontScan,
    seen_fonts: HashSet<ObjectRef>,
    /// Form XObjects and patterns already descended into.
    seen_containers: HashSet<ObjectRef>,
}

impl<D: DocumentModel + ?Sized> FontCollector<'_, D> {
    fn absorb(&mut self, scope: impl Into<String>, result: Result<()>) {
        if let Err(error) = result {
            let scope = scope.into();
            log::debug!("Skipping {} while collecting fonts: {}", scope, error);
            self.scan.errors.push(FontScanError { scope, error });
        }
    }

    fn collect_node(&mut self, node: &PageTreeNode) {
        match node.own_resources(self.doc) {
            Ok(Some(resources)) => self.collect_resources(&resources, 0),
            Ok(None) => {},
            Err(e) => self.absorb("resources", Err(e)),
        }
        match node.content_streams(self.doc) {
            Ok(streams) => {
                for stream in streams {
                    let result = self.collect_content_stream(&stream);
                    self.absorb("content stream", result);
                }
            },
            Err(e) => self.absorb("content streams", Err(e)),
        }
    }

    fn collect_content_stream(&mut self, raw: &Object) -> Result<()> {
        let stream = self.doc.resolve(raw)?;
        if let Some(resources) = stream.as_dict().and_then(|d| d.get("Resources")) {
            let resources = self.doc.resolve(resources)?;
            self.collect_resources(resources.expect_dict()?, 1);
        }
        Ok(())
    }

    fn collect_resources(&mut self, resources: &Dictionary, depth: u32) {
        if depth > MAX_GRAPH_DEPTH {
            self.absorb("resources", Err(Error::RecursionLimitExceeded(MAX_GRAPH_DEPTH)));
            return;
        }
        let result = self.collect_font_resources(resources);
        self.absorb("Font resources", result);
        for category in ["XObject", "Pattern"] {
            let result = self.collect_containers(resources, category, depth);
            self.absorb(format!("{} resources", category), result);
        }
    }

    fn collect_font_resources(&mut self, resources: &Dictionary) -> Result<()> {
        let Some(fonts) = resources.get("Font") else {
            return Ok(());
        };
        let fonts = self.doc.resolve(fonts)?;
        for (name, font) in fonts.expect_dict()? {
            let result = self.collect_font(name, font);
            self.absorb(format!("font {}", name), result);
        }
        Ok(())
    }

    fn collect_font(&mut self, name: &str, font: &Object) -> Result<()> {
        let obj_ref = font.as_reference();
        if let Some(r) = obj_ref {
            if !self.seen_fonts.insert(r) {
                return Ok(());
            }
        }
        let font_dict = self.doc.resolve(font)?.expect_dict()?.clone();
        let subtype = font_dict
            .get("Subtype")
            .and_then(|o| o.as_name())
            .unwrap_or("Unknown")
            .to_string();
        self.scan.fonts.entry(subtype).or_default().push(FontEntry {
            obj_ref,
            resource_name: name.to_string(),
            dict: font_dict,
        });
        Ok(())
    }

    /// Descend into form XObjects (`XObject`) or tiling patterns (`Pattern`).
    fn collect_containers(
        &mut self,
        resources: &Dictionary,
        category: &str,
        depth: u32,
    ) -> Result<()> {
        let Some(entries) = resources.get(category) else {
            return Ok(());
        };
        let entries = self.doc.resolve(entries)?;
        for (name, entry) in entries.expect_dict()? {
            let result = self.collect_container(entry, category, depth);
            self.absorb(format!("{} {}", category, name), result);
        }
        Ok(())
    }

    fn collect_container(&mut self, entry: &Object, category: &str, depth: u32) -> Result<()> {
        if let Some(r) = entry.as_reference() {
            if !self.seen_containers.insert(r) {
                return Ok(());
            }
        }
        let resolved = self.doc.resolve(entry)?;
        let Some(dict) = resolved.as_dict() else {
            return Ok(());
        };
        if category == "XObject" && dict.get("Subtype").and_then(|o| o.as_name()) != Some("Form") {
            return Ok(());
        }
        if let Some(nested) = dict.get("Resources") {
            let nested = self.doc.resolve(nested)?;
            self.collect_resources(nested.expect_dict()?, depth + 1);
        }
        Ok(())
    }
}

/// Look for an open action, an outline item action or an annotation action.
pub fn detect_actions<D: DocumentModel + ?Sized>(doc: &D) -> Result<bool> {
    let catalog = doc.catalog()?;
    if catalog.contains_key("OpenAction") {
        return Ok(true);
    }

    if let Some(outlines) = catalog.get("Outlines") {
        let outlines = doc.resolve(outlines)?;
        if let Some(first) = outlines
            .as_dict()
            .and_then(|d| d.get("First"))
            .filter(|f| !f.is_null())
        {
            let mut visited = HashSet::new();
            if outline_has_action(doc, first, &mut visited, 0)? {
                return Ok(true);
            }
        }
    }

    let mut walker = PageTreeWalker::start_walk(doc)?;
    while let Some(node) = walker.next_node() {
        for annot in node?.annotations(doc)? {
            let annot = doc.resolve(&annot)?;
            if annot.as_dict().is_some_and(|d| d.contains_key("A")) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn outline_has_action<D: DocumentModel + ?Sized>(
    doc: &D,
    item: &Object,
    visited: &mut HashSet<ObjectRef>,
    depth: u32,
) -> Result<bool> {
    if depth > MAX_GRAPH_DEPTH {
        return Err(Error::RecursionLimitExceeded(MAX_GRAPH_DEPTH));
    }
    let mut current = Some(item.clone());
    while let Some(item) = current.take() {
        if let Some(r) = item.as_reference() {
            if !visited.insert(r) {
                break;
            }
        }
        let resolved = doc.resolve(&item)?;
        let dict = resolved.expect_dict()?;
        if dict.contains_key("A") {
            return Ok(true);
        }
        if let Some(first) = dict.get("First") {
            if outline_has_action(doc, first, visited, depth + 1)? {
                return Ok(true);
            }
        }
        current = dict.get("Next").cloned();
    }
    Ok(false)
}
