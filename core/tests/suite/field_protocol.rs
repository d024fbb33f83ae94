use martin_core::EngagementTier;
use martin_core::ValidationError;
use martin_core::fields;
use martin_core::translate::translate;
use pretty_assertions::assert_eq;
use serde_json::json;

fn record() -> martin_core::ContactRecord {
    let person = serde_json::from_value(json!({
        "resourceName": "people/c1",
        "etag": "e",
        "names": [{ "displayName": "Kay" }],
        "urls": [{ "value": "https://example.com/kay", "type": "LinkedIn" }],
        "userDefined": [{ "key": "Tier", "value": "1" }]
    }))
    .unwrap();
    translate(person).unwrap().record
}

#[test]
fn every_column_header_names_a_rule() {
    for field in martin_core::Field::ALL {
        assert_eq!(fields::lookup(field.header()).unwrap().field, field);
    }
}

#[test]
fn rejected_values_stage_nothing() {
    let mut rec = record();
    for (name, raw) in [
        ("Tier", "x"),
        ("Tier", "4"),
        ("Birthday", "1990-07-03"),
        ("Last Contact Date", "07/03/1990"),
        ("Nickname", "K"),
    ] {
        assert!(fields::update(&mut rec, name, raw).is_err(), "{name}={raw}");
    }
    assert_eq!(rec.tier(), EngagementTier::Yearly);
    assert!(!rec.has_pending_changes());
}

#[test]
fn unknown_field_is_reported_by_name() {
    let mut rec = record();
    assert_eq!(
        fields::update(&mut rec, "Email", "k@example.com"),
        Err(ValidationError::UnknownField("Email".to_string()))
    );
}

#[test]
fn clearing_the_url_sends_an_empty_group() {
    let mut rec = record();
    fields::update(&mut rec, "LinkedIn URL", "").unwrap();
    assert_eq!(rec.profile_url(), "");

    let body = serde_json::to_value(rec.pending_patch().body(Some("e"))).unwrap();
    assert_eq!(body, json!({ "etag": "e", "urls": [] }));
    assert_eq!(rec.pending_patch().update_mask(), "urls");
}
