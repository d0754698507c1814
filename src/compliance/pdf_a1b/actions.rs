//! Outline and action rules (ISO 19005-1, 6.6).

use super::LevelBRun;
use crate::compliance::profile::get_dict;
use crate::compliance::types::ReasonCode;
use crate::error::Result;
use crate::object::Object;
use phf::phf_set;

static FORBIDDEN_ACTIONS: phf::Set<&'static str> = phf_set! {
    "Launch",
    "Sound",
    "Movie",
    "ResetForm",
    "ImportData",
    "JavaScript",
    "SetState",
    "NOP",
};

static PERMITTED_NAMED_ACTIONS: phf::Set<&'static str> = phf_set! {
    "NextPage",
    "PrevPage",
    "FirstPage",
    "LastPage",
};

impl LevelBRun<'_> {
    /// Check the open action and every outline item's action.
    ///
    /// Skipped entirely when the document has no actions.
    pub(super) fn check_outlines(&mut self) -> Result<()> {
        if !self.actions_exist {
            log::debug!("Document has no actions, skipping outline checks");
            return Ok(());
        }

        // A destination array is not an action.
        if let Some(open) = self.catalog.get("OpenAction").cloned() {
            if self.doc.resolve(&open)?.as_dict().is_some() {
                let result = self.check_action(&open, 0);
                self.absorb("OpenAction", result);
            }
        }

        let Some(outlines) = get_dict(self.doc, &self.catalog, "Outlines")? else {
            return Ok(());
        };
        if let Some(first) = outlines.get("First").filter(|f| !f.is_null()) {
            self.check_outline_items(first, 0)?;
        }
        Ok(())
    }

    /// Walk a sibling chain of outline items, descending into children.
    fn check_outline_items(&mut self, first: &Object, depth: u32) -> Result<()> {
        self.check_depth(depth)?;
        let mut current = Some(first.clone());
        while let Some(raw) = current.take() {
            if let Some(r) = raw.as_reference() {
                if !self.visited_outlines.insert(r) {
                    log::warn!("Circular outline chain at object {}", r);
                    break;
                }
            }
            let item = self.resolve_dict(&raw)?;
            if let Some(action) = item.get("A") {
                let result = self.check_action(action, 0);
                self.absorb("outline action", result);
            }
            if let Some(child) = item.get("First") {
                let result = self.check_outline_items(child, depth + 1);
                self.absorb("outline", result);
            }
            current = item.get("Next").filter(|n| !n.is_null()).cloned();
        }
        Ok(())
    }

    /// Check one action and the chain of actions following it through Next.
    pub(super) fn check_action(&mut self, raw: &Object, depth: u32) -> Result<()> {
        self.check_depth(depth)?;
        if let Some(r) = raw.as_reference() {
            if !self.visited_actions.insert(r) {
                return Ok(());
            }
        }

        let action = self.resolve_dict(raw)?;
        let kind = action.get("S").and_then(|s| s.as_name()).unwrap_or_default();
        if FORBIDDEN_ACTIONS.contains(kind) {
            self.report_detail(ReasonCode::ForbiddenAction, kind, raw);
        } else if kind == "Named" {
            let name = action.get("N").and_then(|n| n.as_name()).unwrap_or_default();
            if !PERMITTED_NAMED_ACTIONS.contains(name) {
                self.report_detail(ReasonCode::NamedActionNotPermitted, name, raw);
            }
        }

        if let Some(next) = action.get("Next") {
            match self.doc.resolve(next)? {
                Object::Array(chain) => {
                    for item in &chain {
                        self.check_action(item, depth + 1)?;
                    }
                },
                Object::Null => {},
                _ => self.check_action(next, depth + 1)?,
            }
        }
        Ok(())
    }
}
