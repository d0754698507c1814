//! In-memory document model.

use super::DocumentModel;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashMap;

/// A document held entirely in memory as a table of indirect objects.
///
/// # Example
///
/// ```
/// use pdfa_profiles::document::{DocumentModel, MemoryDocument};
/// use pdfa_profiles::object::{dict, Object};
///
/// let mut doc = MemoryDocument::new();
/// let pages = doc.add(Object::from(dict([
///     ("Type", Object::name("Pages")),
///     ("Kids", Object::Array(vec![])),
/// ])));
/// let catalog = doc.add(Object::from(dict([
///     ("Type", Object::name("Catalog")),
///     ("Pages", Object::Reference(pages)),
/// ])));
/// doc.set_trailer(dict([("Root", Object::Reference(catalog))]));
///
/// assert!(doc.catalog().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    objects: HashMap<ObjectRef, Object>,
    offsets: HashMap<ObjectRef, u64>,
    trailer: Option<Dictionary>,
    actions_exist: Option<bool>,
    next_id: u32,
}

impl MemoryDocument {
    /// Create an empty document with no trailer.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Store an object under an explicit reference, replacing any previous one.
    pub fn insert(&mut self, obj_ref: ObjectRef, obj: Object) {
        self.next_id = self.next_id.max(obj_ref.id.saturating_add(1));
        self.objects.insert(obj_ref, obj);
    }

    /// Store an object under the next free object number.
    pub fn add(&mut self, obj: Object) -> ObjectRef {
        let obj_ref = ObjectRef::new(self.next_id.max(1), 0);
        self.insert(obj_ref, obj);
        obj_ref
    }

    /// Set the trailer dictionary.
    pub fn set_trailer(&mut self, trailer: Dictionary) {
        self.trailer = Some(trailer);
    }

    /// Mutable access to the trailer, if one is set.
    pub fn trailer_mut(&mut self) -> Option<&mut Dictionary> {
        self.trailer.as_mut()
    }

    /// Mutable access to a stored dictionary (or stream dictionary).
    pub fn dict_mut(&mut self, obj_ref: ObjectRef) -> Option<&mut Dictionary> {
        match self.objects.get_mut(&obj_ref)? {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Record the byte offset of an object.
    pub fn set_offset(&mut self, obj_ref: ObjectRef, offset: u64) {
        self.offsets.insert(obj_ref, offset);
    }

    /// Override the derived actions-exist flag, as a parser that
    /// precomputes it would.
    pub fn set_actions_exist(&mut self, exist: bool) {
        self.actions_exist = Some(exist);
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl DocumentModel for MemoryDocument {
    fn trailer(&self) -> Option<&Dictionary> {
        self.trailer.as_ref()
    }

    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object> {
        self.objects
            .get(&obj_ref)
            .cloned()
            .ok_or(Error::ObjectNotFound(obj_ref.id, obj_ref.gen))
    }

    fn offset_of(&self, obj_ref: ObjectRef) -> Option<u64> {
        self.offsets.get(&obj_ref).copied()
    }

    fn actions_exist(&self) -> bool {
        match self.actions_exist {
            Some(flag) => flag,
            None => super::detect_actions(self).unwrap_or_else(|e| {
                log::warn!("Could not determine whether actions exist: {}", e);
                true
            }),
        }
    }
}
