//! Depth-first page tree traversal.
//!
//! The walk visits every `Pages` and `Page` node in pre-order, starting at
//! the catalog's `/Pages` entry. Order follows the `/Kids` arrays, which is
//! not necessarily logical page order. Inheritable page attributes are
//! carried down the walk so that a page can answer for values it inherits.

use super::DocumentModel;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashSet;

/// Page attributes a page inherits from its ancestors when unset.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.7.3.4 - Inheritance of Page Attributes
const INHERITABLE_ATTRIBUTES: [&str; 4] = ["Resources", "MediaBox", "CropBox", "Rotate"];

/// Maximum page tree depth followed before giving up on a branch.
const MAX_PAGE_TREE_DEPTH: u32 = 256;

/// One node of the page tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    /// Indirect reference of the node, if it was referenced indirectly.
    pub obj_ref: Option<ObjectRef>,
    /// The node dictionary itself.
    pub dict: Dictionary,
    /// Inheritable attributes set on ancestors, nearest ancestor winning.
    pub inherited: Dictionary,
}

/// A node produced by the page tree walk.
#[derive(Debug, Clone, PartialEq)]
pub enum PageTreeNode {
    /// A leaf page.
    Page(PageNode),
    /// An intermediate `Pages` node.
    PageTree(PageNode),
}

impl PageTreeNode {
    fn node(&self) -> &PageNode {
        match self {
            PageTreeNode::Page(n) | PageTreeNode::PageTree(n) => n,
        }
    }

    /// The node dictionary.
    pub fn dict(&self) -> &Dictionary {
        &self.node().dict
    }

    /// Indirect reference of the node, if any.
    pub fn obj_ref(&self) -> Option<ObjectRef> {
        self.node().obj_ref
    }

    /// Whether this is a leaf page.
    pub fn is_page(&self) -> bool {
        matches!(self, PageTreeNode::Page(_))
    }

    /// Look up an attribute, falling back to inherited values for pages.
    pub fn attribute(&self, key: &str) -> Option<&Object> {
        let node = self.node();
        match node.dict.get(key) {
            Some(v) => Some(v),
            None if self.is_page() => node.inherited.get(key),
            None => None,
        }
    }

    /// The node's own Resources dictionary, ignoring inheritance.
    pub fn own_resources<D: DocumentModel + ?Sized>(&self, doc: &D) -> Result<Option<Dictionary>> {
        resolve_resources(doc, self.dict().get("Resources"))
    }

    /// The Resources in effect for this node.
    ///
    /// For pages this includes Resources inherited from an ancestor.
    pub fn resources<D: DocumentModel + ?Sized>(&self, doc: &D) -> Result<Option<Dictionary>> {
        resolve_resources(doc, self.attribute("Resources"))
    }

    /// The page's annotations, as they appear in `/Annots` (possibly references).
    ///
    /// Intermediate nodes have no annotations.
    pub fn annotations<D: DocumentModel + ?Sized>(&self, doc: &D) -> Result<Vec<Object>> {
        if !self.is_page() {
            return Ok(Vec::new());
        }
        match self.dict().get("Annots") {
            None => Ok(Vec::new()),
            Some(annots) => match doc.resolve(annots)? {
                Object::Null => Ok(Vec::new()),
                Object::Array(items) => Ok(items),
                other => Err(Error::wrong_type("Array", other.type_name())),
            },
        }
    }

    /// The page's content streams, as they appear in `/Contents` (possibly references).
    pub fn content_streams<D: DocumentModel + ?Sized>(&self, doc: &D) -> Result<Vec<Object>> {
        if !self.is_page() {
            return Ok(Vec::new());
        }
        let Some(contents) = self.dict().get("Contents") else {
            return Ok(Vec::new());
        };
        match doc.resolve(contents)? {
            Object::Array(items) => Ok(items),
            Object::Stream { .. } => Ok(vec![contents.clone()]),
            Object::Null => Ok(Vec::new()),
            other => Err(Error::wrong_type("Stream", other.type_name())),
        }
    }
}

fn resolve_resources<D: DocumentModel + ?Sized>(
    doc: &D,
    resources: Option<&Object>,
) -> Result<Option<Dictionary>> {
    match resources {
        None => Ok(None),
        Some(obj) => match doc.resolve(obj)? {
            Object::Null => Ok(None),
            Object::Dictionary(d) => Ok(Some(d)),
            other => Err(Error::wrong_type("Dictionary", other.type_name())),
        },
    }
}

struct PendingNode {
    obj: Object,
    inherited: Dictionary,
    depth: u32,
}

/// Pre-order walker over the page tree.
///
/// Errors for a single branch are yielded in place of that branch; the walk
/// continues with the remaining nodes.
pub struct PageTreeWalker<'a, D: DocumentModel + ?Sized> {
    doc: &'a D,
    stack: Vec<PendingNode>,
    visited: HashSet<ObjectRef>,
    deferred_error: Option<Error>,
}

impl<'a, D: DocumentModel + ?Sized> PageTreeWalker<'a, D> {
    /// Start a walk at the catalog's page tree root.
    pub fn start_walk(doc: &'a D) -> Result<Self> {
        let catalog = doc.catalog()?;
        let root = catalog
            .get("Pages")
            .ok_or_else(|| Error::InvalidPdf("Catalog has no /Pages entry".to_string()))?;
        Ok(Self {
            doc,
            stack: vec![PendingNode {
                obj: root.clone(),
                inherited: Dictionary::new(),
                depth: 0,
            }],
            visited: HashSet::new(),
            deferred_error: None,
        })
    }

    /// Produce the next node, or `None` once the tree is exhausted.
    pub fn next_node(&mut self) -> Option<Result<PageTreeNode>> {
        if let Some(err) = self.deferred_error.take() {
            return Some(Err(err));
        }
        let pending = self.stack.pop()?;
        Some(self.visit(pending))
    }

    fn visit(&mut self, pending: PendingNode) -> Result<PageTreeNode> {
        if pending.depth > MAX_PAGE_TREE_DEPTH {
            return Err(Error::RecursionLimitExceeded(MAX_PAGE_TREE_DEPTH));
        }

        let obj_ref = pending.obj.as_reference();
        if let Some(r) = obj_ref {
            if !self.visited.insert(r) {
                log::warn!("Circular reference in page tree at object {}, skipping", r);
                return Err(Error::CircularReference(r));
            }
        }

        let dict = match self.doc.resolve(&pending.obj)? {
            Object::Dictionary(d) => d,
            other => return Err(Error::wrong_type("Dictionary", other.type_name())),
        };

        let is_tree = match dict.get("Type").and_then(|o| o.as_name()) {
            Some("Pages") => true,
            Some("Page") => false,
            _ => dict.contains_key("Kids"),
        };

        let node = PageNode {
            obj_ref,
            dict,
            inherited: pending.inherited,
        };

        if !is_tree {
            return Ok(PageTreeNode::Page(node));
        }

        let mut inherited = node.inherited.clone();
        for key in INHERITABLE_ATTRIBUTES {
            if let Some(value) = node.dict.get(key) {
                inherited.insert(key.to_string(), value.clone());
            }
        }

        match node.dict.get("Kids").map(|kids| self.doc.resolve(kids)) {
            Some(Ok(Object::Array(kids))) => {
                for kid in kids.into_iter().rev() {
                    self.stack.push(PendingNode {
                        obj: kid,
                        inherited: inherited.clone(),
                        depth: pending.depth + 1,
                    });
                }
            },
            Some(Ok(other)) => {
                self.deferred_error = Some(Error::wrong_type("Array", other.type_name()));
            },
            Some(Err(e)) => self.deferred_error = Some(e),
            None => log::warn!("Pages node {:?} has no /Kids array", obj_ref),
        }

        Ok(PageTreeNode::PageTree(node))
    }
}

impl<D: DocumentModel + ?Sized> Iterator for PageTreeWalker<'_, D> {
    type Item = Result<PageTreeNode>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node()
    }
}
