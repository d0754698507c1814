//! Integration tests for the PDF/A-1 Level B profile.

mod common;

use common::{codes, init_logging, Fixture};
use pdfa_profiles::compliance::{
    PdfA1bProfile, Profile, ProfileState, ReasonCode, ValidationContext,
};
use pdfa_profiles::object::{dict, Dictionary, Object};
use proptest::prelude::*;

fn evaluate(fx: &Fixture) -> (bool, Vec<ReasonCode>) {
    let mut profile = PdfA1bProfile::new();
    let ok = profile.satisfies_profile(&fx.doc, &ValidationContext::default());
    (ok, codes(profile.reasons_for_non_compliance()))
}

#[test]
fn test_conforming_document_passes() {
    init_logging();
    let fx = Fixture::conforming();
    let mut profile = PdfA1bProfile::new();
    assert!(profile.satisfies_profile(&fx.doc, &ValidationContext::default()));
    assert!(profile.already_ok());
    assert!(profile.reasons_for_non_compliance().is_empty());
    assert_eq!(profile.text(), "ISO PDF/A-1, Level B");
}

#[test]
fn test_missing_id_fails() {
    init_logging();
    let mut fx = Fixture::conforming();
    fx.trailer_mut().shift_remove("ID");
    assert_eq!(evaluate(&fx), (false, vec![ReasonCode::TrailerNoId]));
}

#[test]
fn test_output_intent_flips_result() {
    init_logging();
    let mut fx = Fixture::conforming();
    fx.add_color_space("CS0", Object::name("DeviceRGB"));
    assert_eq!(evaluate(&fx), (false, vec![ReasonCode::MissingOutputIntent]));

    fx.add_output_intent();
    assert_eq!(evaluate(&fx), (true, vec![]));
}

#[test]
fn test_output_intent_checked_once() {
    init_logging();
    let mut fx = Fixture::conforming();
    fx.add_color_space("CS0", Object::name("DeviceGray"));
    fx.add_page(dict([(
        "ColorSpace",
        Object::from(dict([("CS0", Object::name("DeviceGray"))])),
    )]));
    assert_eq!(evaluate(&fx), (false, vec![ReasonCode::MissingOutputIntent]));
}

#[test]
fn test_already_ok_tracks_last_run() {
    init_logging();
    let mut fx = Fixture::conforming();
    let ctx = ValidationContext::default();
    let mut profile = PdfA1bProfile::new();
    assert_eq!(profile.state(), &ProfileState::Unvalidated);

    assert!(profile.satisfies_profile(&fx.doc, &ctx));
    assert!(profile.already_ok());

    fx.catalog_mut()
        .insert("OCProperties".to_string(), Object::from(Dictionary::new()));
    assert!(!profile.satisfies_profile(&fx.doc, &ctx));
    assert!(!profile.already_ok());
    assert_eq!(
        codes(profile.reasons_for_non_compliance()),
        vec![ReasonCode::CatalogOptionalContent]
    );
}

#[test]
fn test_reason_offsets() {
    init_logging();
    let mut fx = Fixture::conforming();
    let annot = fx.doc.add(Object::from(dict([
        ("Subtype", Object::name("Sound")),
        ("F", Object::Integer(4)),
        ("Contents", Object::text("beep")),
    ])));
    fx.doc.set_offset(annot, 4711);
    fx.doc
        .dict_mut(fx.first_page)
        .unwrap()
        .insert("Annots".to_string(), Object::Array(vec![Object::Reference(annot)]));

    let mut profile = PdfA1bProfile::new();
    profile.satisfies_profile(&fx.doc, &ValidationContext::default());
    let reasons = profile.reasons_for_non_compliance();
    assert_eq!(reasons.len(), 1);
    assert_eq!(reasons[0].code, ReasonCode::AnnotationMultimedia);
    assert_eq!(reasons[0].offset, Some(4711));
    assert_eq!(reasons[0].detail.as_deref(), Some("Sound"));
}

#[test]
fn test_unresolvable_reference_does_not_stop_other_checks() {
    init_logging();
    let mut fx = Fixture::conforming();
    fx.page_resources_mut()
        .insert("ExtGState".to_string(), Object::reference(9999, 0));
    fx.catalog_mut()
        .insert("AA".to_string(), Object::from(Dictionary::new()));
    let (ok, found) = evaluate(&fx);
    assert!(!ok);
    assert_eq!(
        found,
        vec![ReasonCode::CatalogAdditionalActions, ReasonCode::InternalError]
    );
}

#[test]
fn test_many_defects_in_stable_order() {
    init_logging();
    let mut fx = Fixture::conforming();
    fx.trailer_mut()
        .insert("Encrypt".to_string(), Object::reference(8888, 0));
    fx.add_color_space("CS0", Object::name("DeviceCMYK"));
    fx.add_color_space("CS1", Object::name("DeviceRGB"));
    fx.page_resources_mut().insert(
        "ExtGState".to_string(),
        Object::from(dict([(
            "GS0",
            Object::from(dict([("BM", Object::name("Screen"))])),
        )])),
    );
    let expected = vec![
        ReasonCode::TrailerEncrypted,
        ReasonCode::MissingOutputIntent,
        ReasonCode::RgbCmykConflict,
        ReasonCode::ExtGStateBlendMode,
    ];
    assert_eq!(evaluate(&fx), (false, expected.clone()));
    assert_eq!(evaluate(&fx), (false, expected));
}

#[derive(Debug, Clone, Copy)]
enum Defect {
    Encrypted,
    DeviceRgb,
    CatalogActions,
    LzwContent,
    InterpolatedImage,
}

fn apply(fx: &mut Fixture, defect: Defect) {
    match defect {
        Defect::Encrypted => {
            fx.trailer_mut()
                .insert("Encrypt".to_string(), Object::from(Dictionary::new()));
        },
        Defect::DeviceRgb => fx.add_color_space("RGB", Object::name("DeviceRGB")),
        Defect::CatalogActions => {
            fx.catalog_mut()
                .insert("AA".to_string(), Object::from(Dictionary::new()));
        },
        Defect::LzwContent => {
            let stream = fx.doc.add(Object::Stream {
                dict: dict([("Filter", Object::name("LZWDecode"))]),
                data: bytes::Bytes::new(),
            });
            fx.doc
                .dict_mut(fx.first_page)
                .unwrap()
                .insert("Contents".to_string(), Object::Reference(stream));
        },
        Defect::InterpolatedImage => {
            let image = fx.doc.add(Object::Stream {
                dict: dict([
                    ("Subtype", Object::name("Image")),
                    ("Interpolate", Object::Boolean(true)),
                ]),
                data: bytes::Bytes::new(),
            });
            fx.page_resources_mut().insert(
                "XObject".to_string(),
                Object::from(dict([("Im0", Object::Reference(image))])),
            );
        },
    }
}

fn defect() -> impl Strategy<Value = Defect> {
    prop_oneof![
        Just(Defect::Encrypted),
        Just(Defect::DeviceRgb),
        Just(Defect::CatalogActions),
        Just(Defect::LzwContent),
        Just(Defect::InterpolatedImage),
    ]
}

proptest! {
    #[test]
    fn prop_missing_id_always_reported(defects in prop::collection::vec(defect(), 0..5)) {
        let mut fx = Fixture::conforming();
        for d in defects {
            apply(&mut fx, d);
        }
        fx.trailer_mut().shift_remove("ID");
        let (ok, found) = evaluate(&fx);
        prop_assert!(!ok);
        prop_assert!(found.contains(&ReasonCode::TrailerNoId));
    }

    #[test]
    fn prop_rgb_cmyk_conflict_reported_once(extra_pages in 0usize..6, forms in 0usize..4) {
        let mut fx = Fixture::conforming();
        fx.add_output_intent();
        fx.add_color_space("A", Object::name("DeviceRGB"));
        fx.add_color_space("B", Object::name("DeviceCMYK"));
        for i in 0..extra_pages {
            let mut xobjects = Dictionary::new();
            for j in 0..forms {
                xobjects.insert(
                    format!("Fm{}", j),
                    Object::Stream {
                        dict: dict([
                            ("Subtype", Object::name("Form")),
                            (
                                "Resources",
                                Object::from(dict([(
                                    "ColorSpace",
                                    Object::from(dict([
                                        ("R", Object::name("DeviceRGB")),
                                        ("C", Object::name("DeviceCMYK")),
                                    ])),
                                )])),
                            ),
                        ]),
                        data: bytes::Bytes::new(),
                    },
                );
            }
            let space = if i % 2 == 0 { "DeviceRGB" } else { "DeviceCMYK" };
            fx.add_page(dict([
                ("ColorSpace", Object::from(dict([("X", Object::name(space))]))),
                ("XObject", Object::from(xobjects)),
            ]));
        }
        let (ok, found) = evaluate(&fx);
        prop_assert!(!ok);
        let conflicts = found.iter().filter(|c| **c == ReasonCode::RgbCmykConflict).count();
        prop_assert_eq!(conflicts, 1);
        prop_assert_eq!(found.len(), 1);
    }

    #[test]
    fn prop_repeated_runs_are_identical(defects in prop::collection::vec(defect(), 0..5)) {
        let mut fx = Fixture::conforming();
        for d in defects {
            apply(&mut fx, d);
        }
        let mut profile = PdfA1bProfile::new();
        let ctx = ValidationContext::default();
        let first = profile.satisfies_profile(&fx.doc, &ctx);
        let first_reasons = profile.reasons_for_non_compliance().to_vec();
        let second = profile.satisfies_profile(&fx.doc, &ctx);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first_reasons, profile.reasons_for_non_compliance().to_vec());
        prop_assert_eq!(profile.already_ok(), second);
    }
}
