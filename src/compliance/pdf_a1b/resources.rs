//! Resource dictionary rules: color spaces, output intents, graphics state
//! and XObjects.

use super::LevelBRun;
use crate::compliance::profile::{get_array, get_dict, is_opaque, resolve};
use crate::compliance::types::ReasonCode;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use phf::phf_set;

/// Rendering intents permitted in ExtGState RI and image Intent.
pub(super) static RENDERING_INTENTS: phf::Set<&'static str> = phf_set! {
    "RelativeColorimetric",
    "AbsoluteColorimetric",
    "Perceptual",
    "Saturation",
};

static BLEND_MODES: phf::Set<&'static str> = phf_set! {
    "Normal",
    "Compatible",
};

/// Output intent subtype required by PDF/A-1.
const GTS_PDFA1: &str = "GTS_PDFA1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceSpace {
    Rgb,
    Cmyk,
    Gray,
}

impl DeviceSpace {
    /// Device color space names, including the inline-image abbreviations.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "DeviceRGB" | "RGB" => Some(DeviceSpace::Rgb),
            "DeviceCMYK" | "CMYK" => Some(DeviceSpace::Cmyk),
            "DeviceGray" | "G" => Some(DeviceSpace::Gray),
            _ => None,
        }
    }
}

impl LevelBRun<'_> {
    /// Check every resource category of one resource dictionary.
    ///
    /// `depth` counts form XObject and pattern nesting.
    pub(super) fn check_resources(&mut self, resources: &Dictionary, depth: u32) -> Result<()> {
        self.check_depth(depth)?;

        let result = self.check_color_space_resources(resources);
        self.absorb("ColorSpace resources", result);

        let result = self.check_shading_resources(resources);
        self.absorb("Shading resources", result);

        let result = self.check_pattern_resources(resources, depth);
        self.absorb("Pattern resources", result);

        let result = self.check_ext_gstate_resources(resources);
        self.absorb("ExtGState resources", result);

        let result = self.check_xobject_resources(resources, depth);
        self.absorb("XObject resources", result);
        Ok(())
    }

    fn check_color_space_resources(&mut self, resources: &Dictionary) -> Result<()> {
        let Some(spaces) = get_dict(self.doc, resources, "ColorSpace")? else {
            return Ok(());
        };
        for space in spaces.values() {
            self.check_color_space(space, 0)?;
        }
        Ok(())
    }

    /// Inspect a color space, descending into the base of Indexed, Separation,
    /// DeviceN and Pattern spaces.
    ///
    /// PDF/A-1 Spec: ISO 19005-1:2005, Section 6.2.3 - Color spaces
    fn check_color_space(&mut self, space: &Object, depth: u32) -> Result<()> {
        self.check_depth(depth)?;
        match self.doc.resolve(space)? {
            Object::Name(name) => {
                if let Some(device) = DeviceSpace::from_name(&name) {
                    self.note_device_space(device);
                }
            },
            Object::Array(items) => {
                let family = items
                    .first()
                    .map(|f| self.doc.resolve(f))
                    .transpose()?
                    .and_then(|f| f.as_name().map(str::to_string))
                    .ok_or_else(|| Error::InvalidPdf("color space array has no family name".into()))?;
                let base = match family.as_str() {
                    "Indexed" | "I" | "Pattern" => items.get(1),
                    "Separation" | "DeviceN" => items.get(2),
                    other => {
                        if let Some(device) = DeviceSpace::from_name(other) {
                            self.note_device_space(device);
                        }
                        None
                    },
                };
                if let Some(base) = base {
                    self.check_color_space(base, depth + 1)?;
                }
            },
            Object::Null => {},
            other => return Err(Error::wrong_type("ColorSpace", other.type_name())),
        }
        Ok(())
    }

    /// Record a device color space use.
    ///
    /// The RGB/CMYK conflict is reported once per run and the output intent
    /// is examined only on the first uncalibrated space.
    fn note_device_space(&mut self, device: DeviceSpace) {
        match device {
            DeviceSpace::Rgb => self.color.rgb_seen = true,
            DeviceSpace::Cmyk => self.color.cmyk_seen = true,
            DeviceSpace::Gray => {},
        }

        if self.color.rgb_seen && self.color.cmyk_seen && !self.color.conflict_reported {
            self.color.conflict_reported = true;
            self.sink.push_code(ReasonCode::RgbCmykConflict);
        }

        if !self.color.output_intent_checked {
            self.color.output_intent_checked = true;
            let result = self.check_output_intents();
            self.absorb("OutputIntents", result);
        }
    }

    /// PDF/A-1 Spec: ISO 19005-1:2005, Section 6.2.2 - Output intent
    fn check_output_intents(&mut self) -> Result<()> {
        let intents = get_array(self.doc, &self.catalog, "OutputIntents")?.unwrap_or_default();

        let mut conforming = false;
        let mut profiles: Vec<Object> = Vec::new();
        for intent in &intents {
            let intent = self.resolve_dict(intent)?;
            let Some(profile) = intent.get("DestOutputProfile").filter(|p| !p.is_null()) else {
                continue;
            };
            profiles.push(profile.clone());

            let is_pdfa = intent.get("S").and_then(|s| s.as_name()) == Some(GTS_PDFA1);
            let has_condition = resolve(self.doc, intent.get("OutputCondition"))?.is_some()
                || resolve(self.doc, intent.get("OutputConditionIdentifier"))?.is_some();
            let profile_is_stream = self.doc.resolve(profile)?.is_stream();
            if is_pdfa && has_condition && profile_is_stream {
                conforming = true;
            }
        }

        if !conforming {
            self.sink.push_code(ReasonCode::MissingOutputIntent);
        }
        if profiles.windows(2).any(|pair| pair[0] != pair[1]) {
            self.sink.push_code(ReasonCode::OutputProfilesDiffer);
        }
        Ok(())
    }

    fn check_shading_resources(&mut self, resources: &Dictionary) -> Result<()> {
        let Some(shadings) = get_dict(self.doc, resources, "Shading")? else {
            return Ok(());
        };
        for shading in shadings.values() {
            self.check_shading(shading)?;
        }
        Ok(())
    }

    fn check_shading(&mut self, shading: &Object) -> Result<()> {
        let shading = self.resolve_dict(shading)?;
        if let Some(space) = shading.get("ColorSpace") {
            self.check_color_space(space, 0)?;
        }
        Ok(())
    }

    /// Shading patterns contribute a color space; tiling patterns carry
    /// their own resources.
    fn check_pattern_resources(&mut self, resources: &Dictionary, depth: u32) -> Result<()> {
        let Some(patterns) = get_dict(self.doc, resources, "Pattern")? else {
            return Ok(());
        };
        for raw in patterns.values() {
            if let Some(r) = raw.as_reference() {
                if !self.visited_forms.insert(r) {
                    continue;
                }
            }
            let pattern = self.resolve_dict(raw)?;
            if let Some(shading) = pattern.get("Shading") {
                self.check_shading(shading)?;
            }
            if let Some(pattern_resources) = pattern.get("Resources") {
                let pattern_resources = self.resolve_dict(pattern_resources)?;
                self.check_resources(&pattern_resources, depth + 1)?;
            }
        }
        Ok(())
    }

    /// PDF/A-1 Spec: ISO 19005-1:2005, Section 6.4 - Transparency
    fn check_ext_gstate_resources(&mut self, resources: &Dictionary) -> Result<()> {
        let Some(states) = get_dict(self.doc, resources, "ExtGState")? else {
            return Ok(());
        };
        for raw in states.values() {
            let gs = self.resolve_dict(raw)?;
            self.check_ext_gstate(&gs, raw)?;
        }
        Ok(())
    }

    fn check_ext_gstate(&mut self, gs: &Dictionary, at: &Object) -> Result<()> {
        if gs.contains_key("TR") {
            self.report(ReasonCode::ExtGStateTransfer, at);
        }
        if let Some(tr2) = resolve(self.doc, gs.get("TR2"))? {
            if tr2.as_name() != Some("Default") {
                self.report(ReasonCode::ExtGStateTransfer2, at);
            }
        }
        if let Some(ri) = resolve(self.doc, gs.get("RI"))? {
            if !ri.as_name().is_some_and(|n| RENDERING_INTENTS.contains(n)) {
                self.report_detail(ReasonCode::ExtGStateRenderingIntent, describe(&ri), at);
            }
        }
        if let Some(smask) = resolve(self.doc, gs.get("SMask"))? {
            if smask.as_name() != Some("None") {
                self.report(ReasonCode::ExtGStateSoftMask, at);
            }
        }
        if let Some(bm) = resolve(self.doc, gs.get("BM"))? {
            let allowed = match &bm {
                Object::Name(n) => BLEND_MODES.contains(n.as_str()),
                Object::Array(modes) => modes
                    .iter()
                    .all(|m| m.as_name().is_some_and(|n| BLEND_MODES.contains(n))),
                _ => false,
            };
            if !allowed {
                self.report_detail(ReasonCode::ExtGStateBlendMode, describe(&bm), at);
            }
        }
        for key in ["CA", "ca"] {
            if let Some(alpha) = resolve(self.doc, gs.get(key))? {
                if !is_opaque(&alpha) {
                    self.report_detail(ReasonCode::ExtGStateAlpha, key, at);
                }
            }
        }
        Ok(())
    }

    fn check_xobject_resources(&mut self, resources: &Dictionary, depth: u32) -> Result<()> {
        let Some(xobjects) = get_dict(self.doc, resources, "XObject")? else {
            return Ok(());
        };
        for raw in xobjects.values() {
            let result = self.check_xobject(raw, depth);
            self.absorb("XObject", result);
        }
        Ok(())
    }

    /// PDF/A-1 Spec: ISO 19005-1:2005, Section 6.2.4 - 6.2.7 - XObjects
    fn check_xobject(&mut self, raw: &Object, depth: u32) -> Result<()> {
        if let Some(r) = raw.as_reference() {
            if !self.visited_forms.insert(r) {
                log::debug!("XObject {} already checked", r);
                return Ok(());
            }
        }
        let xobject = self.resolve_dict(raw)?;
        self.check_stream_dict(&xobject, raw)?;

        match xobject.get("Subtype").and_then(|s| s.as_name()) {
            Some("PS") => self.report(ReasonCode::PostScriptXObject, raw),
            Some("Image") => self.check_image(&xobject, raw)?,
            Some("Form") => self.check_form(&xobject, raw, depth)?,
            _ => {},
        }
        Ok(())
    }

    fn check_image(&mut self, image: &Dictionary, at: &Object) -> Result<()> {
        if image.contains_key("OPI") || image.contains_key("Alternates") {
            self.report(ReasonCode::ImageForbiddenKey, at);
        }
        if let Some(interpolate) = resolve(self.doc, image.get("Interpolate"))? {
            if interpolate.as_bool() != Some(false) {
                self.report(ReasonCode::ImageInterpolate, at);
            }
        }
        if let Some(intent) = resolve(self.doc, image.get("Intent"))? {
            if !intent.as_name().is_some_and(|n| RENDERING_INTENTS.contains(n)) {
                self.report_detail(ReasonCode::ImageRenderingIntent, describe(&intent), at);
            }
        }
        if let Some(space) = image.get("ColorSpace") {
            self.check_color_space(space, 0)?;
        }
        Ok(())
    }

    fn check_form(&mut self, form: &Dictionary, at: &Object, depth: u32) -> Result<()> {
        if ["OPI", "PS", "Ref"].iter().any(|k| form.contains_key(*k)) {
            self.report(ReasonCode::FormXObjectForbiddenKey, at);
        }
        if form.get("Subtype2").and_then(|s| s.as_name()) == Some("PS") {
            self.report(ReasonCode::FormXObjectPostScript, at);
        }
        if let Some(group) = get_dict(self.doc, form, "Group")? {
            if let Some(space) = group.get("CS") {
                self.check_color_space(space, 0)?;
            }
        }
        if let Some(resources) = form.get("Resources") {
            let resources = self.resolve_dict(resources)?;
            self.check_resources(&resources, depth + 1)?;
        }
        Ok(())
    }
}

/// Short rendering of an offending value for reason details.
fn describe(obj: &Object) -> String {
    match obj {
        Object::Name(n) => n.clone(),
        Object::Array(items) => items
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join(" "),
        other => obj
            .as_text()
            .unwrap_or_else(|| other.type_name().to_string()),
    }
}
