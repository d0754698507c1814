//! Catalog rules: metadata, forbidden catalog entries, embedded files and
//! interactive forms.

use super::LevelBRun;
use crate::compliance::profile::{get_array, get_dict, resolve};
use crate::compliance::types::ReasonCode;
use crate::compliance::xmp;
use crate::error::Result;
use crate::object::Object;

impl LevelBRun<'_> {
    pub(super) fn check_catalog(&mut self) -> Result<()> {
        let result = self.check_metadata();
        self.absorb("metadata", result);

        let root = self.catalog_ref();
        if self.catalog.contains_key("AA") {
            self.report(ReasonCode::CatalogAdditionalActions, &root);
        }
        if self.catalog.contains_key("OCProperties") {
            self.report(ReasonCode::CatalogOptionalContent, &root);
        }

        let result = self.check_names();
        self.absorb("names", result);

        let result = self.check_acroform();
        self.absorb("AcroForm", result);
        Ok(())
    }

    /// The trailer's Root entry, for offsets.
    fn catalog_ref(&self) -> Object {
        self.doc
            .trailer()
            .and_then(|t| t.get("Root"))
            .cloned()
            .unwrap_or(Object::Null)
    }

    /// PDF/A-1 Spec: ISO 19005-1:2005, Section 6.7.2 - Metadata streams
    fn check_metadata(&mut self) -> Result<()> {
        let Some(raw) = self.catalog.get("Metadata").cloned() else {
            self.sink.push_code(ReasonCode::MissingMetadata);
            return Ok(());
        };
        match self.doc.resolve(&raw)? {
            Object::Stream { dict, data } => {
                if dict.get("Filter").is_some_and(|f| !f.is_null()) {
                    self.report(ReasonCode::MetadataFiltered, &raw);
                } else if let Err(e) = xmp::check_well_formed(&data) {
                    self.report_detail(ReasonCode::MetadataMalformed, e.to_string(), &raw);
                }
            },
            Object::Null => self.sink.push_code(ReasonCode::MissingMetadata),
            _ => self.report(ReasonCode::MetadataNotStream, &raw),
        }
        Ok(())
    }

    fn check_names(&mut self) -> Result<()> {
        if let Some(names) = get_dict(self.doc, &self.catalog, "Names")? {
            if names.contains_key("EmbeddedFiles") {
                let at = self.catalog.get("Names").cloned().unwrap_or(Object::Null);
                self.report(ReasonCode::EmbeddedFiles, &at);
            }
        }
        Ok(())
    }

    /// PDF/A-1 Spec: ISO 19005-1:2005, Section 6.9 - Interactive forms
    fn check_acroform(&mut self) -> Result<()> {
        let Some(form) = get_dict(self.doc, &self.catalog, "AcroForm")? else {
            return Ok(());
        };

        let need_appearances = resolve(self.doc, form.get("NeedAppearances"))?
            .and_then(|o| o.as_bool())
            .unwrap_or(false);
        if need_appearances {
            self.sink.push_code(ReasonCode::NeedAppearances);
        }

        let form_has_dr = resolve(self.doc, form.get("DR"))?.is_some();
        for field in get_array(self.doc, &form, "Fields")?.unwrap_or_default() {
            let result = self.check_field(&field, form_has_dr, 0);
            self.absorb("form field", result);
        }
        Ok(())
    }

    /// Check a field and, through its Kids, every descendant field.
    ///
    /// A kid is a field only if it points back at its parent; kids without
    /// Parent are widget annotations and are left to the annotation rules.
    fn check_field(&mut self, raw: &Object, form_has_dr: bool, depth: u32) -> Result<()> {
        self.check_depth(depth)?;
        if let Some(r) = raw.as_reference() {
            if !self.visited_fields.insert(r) {
                log::debug!("Form field {} already checked", r);
                return Ok(());
            }
        }

        let field = self.resolve_dict(raw)?;
        if field.contains_key("A") || field.contains_key("AA") {
            self.report(ReasonCode::FormFieldAction, raw);
        }
        if !form_has_dr && resolve(self.doc, field.get("DR"))?.is_none() {
            let name = field
                .get("T")
                .and_then(|t| t.as_text())
                .unwrap_or_else(|| "(unnamed)".to_string());
            self.report_detail(ReasonCode::FormFieldNoDefaultResources, name, raw);
        }

        for kid in get_array(self.doc, &field, "Kids")?.unwrap_or_default() {
            let kid_dict = self.resolve_dict(&kid)?;
            if kid_dict.contains_key("Parent") {
                self.check_field(&kid, form_has_dr, depth + 1)?;
            }
        }
        Ok(())
    }
}
