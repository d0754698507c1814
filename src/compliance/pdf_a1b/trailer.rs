//! Trailer rules (ISO 19005-1, 6.1.3 and 6.1.12).

use super::LevelBRun;
use crate::compliance::types::ReasonCode;
use crate::error::{Error, Result};

impl LevelBRun<'_> {
    pub(super) fn check_trailer(&mut self) -> Result<()> {
        let trailer = self.doc.trailer().ok_or(Error::MissingTrailer)?;
        let encrypted = trailer.get("Encrypt").is_some_and(|o| !o.is_null());
        let has_id = trailer.get("ID").is_some_and(|o| !o.is_null());

        if encrypted {
            self.sink.push_code(ReasonCode::TrailerEncrypted);
        }
        if !has_id {
            self.sink.push_code(ReasonCode::TrailerNoId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compliance::pdf_a1b::PdfA1bProfile;
    use crate::compliance::profile::{Profile, ValidationContext};
    use crate::compliance::types::ReasonCode;
    use crate::document::MemoryDocument;
    use crate::object::{dict, Object};

    fn run(trailer_extra: Vec<(&str, Object)>) -> Vec<ReasonCode> {
        let mut doc = MemoryDocument::new();
        let mut trailer = dict([("Root", Object::reference(50, 0))]);
        for (k, v) in trailer_extra {
            trailer.insert(k.to_string(), v);
        }
        doc.set_trailer(trailer);
        let mut profile = PdfA1bProfile::new();
        profile.satisfies_profile(&doc, &ValidationContext::default());
        profile.reasons_for_non_compliance().iter().map(|r| r.code).collect()
    }

    #[test]
    fn test_no_id() {
        assert!(run(vec![]).contains(&ReasonCode::TrailerNoId));
    }

    #[test]
    fn test_encrypted() {
        let reasons = run(vec![
            ("Encrypt", Object::reference(7, 0)),
            ("ID", Object::Array(vec![])),
        ]);
        assert_eq!(reasons[0], ReasonCode::TrailerEncrypted);
        assert!(!reasons.contains(&ReasonCode::TrailerNoId));
    }
}
