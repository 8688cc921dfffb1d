mod common;

use common::{copc_form, ticket_with_form};
use formhub_display::display::classify::{
    classify_custom_form, FormArchetype, StructureVersion, ARCHETYPE_MATCHERS,
};
use formhub_display::{DisplayEngine, FormSubmission};
use serde_json::json;

#[test]
fn copc_payload_is_recognised_with_metadata() {
    let ticket = ticket_with_form(copc_form());
    let structure = classify_custom_form(ticket.custom_form_data.as_ref());

    assert_eq!(structure.form_type, FormArchetype::Copc);
    assert_eq!(structure.array_fields, vec!["transactions"]);
    let metadata = structure.metadata.expect("metadata");
    assert_eq!(metadata.total_fields, 5);
    assert_eq!(metadata.form_id, Some(4));
    assert_eq!(metadata.reference_id.as_deref(), Some("REF-100"));
}

#[test]
fn every_archetype_fires_on_its_minimum_signature() {
    let engine = DisplayEngine::default();
    for matcher in ARCHETYPE_MATCHERS {
        assert!(matcher.signature_keys.len() >= matcher.min_matches);
        let mut payload = serde_json::Map::new();
        for key in matcher.signature_keys.iter().take(matcher.min_matches) {
            payload.insert(key.to_string(), json!("present"));
        }
        let form = FormSubmission::from_json(&payload.into()).expect("object");
        assert_eq!(engine.classify(&form).form_type, matcher.archetype);
    }
}

#[test]
fn leave_request_uses_camel_case_timestamps() {
    let form = FormSubmission::from_json(&json!({
        "leaveType": "Sick",
        "endDate": "2024-11-03",
        "createdAt": "2024-11-01T08:00:00Z"
    }))
    .expect("object");
    let structure = DisplayEngine::default().classify(&form);
    assert_eq!(structure.form_type, FormArchetype::LeaveRequest);
    assert_eq!(structure.structure_version, StructureVersion::V3);
    assert!(!structure.has_array_data);
}

#[test]
fn ticket_without_payload_is_unknown() {
    let structure = classify_custom_form(None);
    assert_eq!(structure.form_type, FormArchetype::Unknown);
    assert!(structure.array_fields.is_empty());
    assert!(structure.metadata.is_none());
}
