use serde::Serialize;

use crate::form::{FormSubmission, FormValue};
use crate::ticket::CustomFormData;

/// Known form shapes. Only [`FormArchetype::Copc`] has a bespoke layout; the
/// others are recognised for summaries and fall back to the generic layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormArchetype {
    /// Cash-on-petty-cash liquidation.
    Copc,
    PurchaseRequest,
    LeaveRequest,
    ExpenseReport,
    Generic,
    /// No form payload at all.
    Unknown,
}

impl FormArchetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormArchetype::Copc => "copc",
            FormArchetype::PurchaseRequest => "purchase_request",
            FormArchetype::LeaveRequest => "leave_request",
            FormArchetype::ExpenseReport => "expense_report",
            FormArchetype::Generic => "generic",
            FormArchetype::Unknown => "unknown",
        }
    }
}

/// Key-naming convention of the submission's timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureVersion {
    V1,
    /// `created_at` / `updated_at`.
    V2,
    /// `createdAt` / `updatedAt`.
    V3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureMetadata {
    pub total_fields: usize,
    pub form_id: Option<u64>,
    pub workflow_stage: Option<String>,
    pub reference_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormStructure {
    pub form_type: FormArchetype,
    pub array_fields: Vec<String>,
    pub has_array_data: bool,
    pub structure_version: StructureVersion,
    pub metadata: Option<StructureMetadata>,
}

impl FormStructure {
    fn unknown() -> Self {
        Self {
            form_type: FormArchetype::Unknown,
            array_fields: Vec::new(),
            has_array_data: false,
            structure_version: StructureVersion::V1,
            metadata: None,
        }
    }
}

/// A shape signature: the archetype is recognised when at least
/// `min_matches` of `signature_keys` are present with non-empty values.
/// Purchase requests need two, since a lone `items` key is common.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeMatcher {
    pub archetype: FormArchetype,
    pub signature_keys: &'static [&'static str],
    pub min_matches: usize,
}

impl ArchetypeMatcher {
    pub fn matches(&self, form: &FormSubmission) -> bool {
        let present = self
            .signature_keys
            .iter()
            .filter(|key| form.has_truthy(key))
            .count();
        present >= self.min_matches
    }
}

/// Checked in order; the first matcher that fires wins. Overlapping
/// signatures are not scored against each other.
pub const ARCHETYPE_MATCHERS: &[ArchetypeMatcher] = &[
    ArchetypeMatcher {
        archetype: FormArchetype::Copc,
        signature_keys: &["transactions", "pettyCashHolder", "totalPettyCash"],
        min_matches: 1,
    },
    ArchetypeMatcher {
        archetype: FormArchetype::PurchaseRequest,
        signature_keys: &["items", "requestType", "vendor"],
        min_matches: 2,
    },
    ArchetypeMatcher {
        archetype: FormArchetype::LeaveRequest,
        signature_keys: &["leaveType", "startDate", "endDate"],
        min_matches: 1,
    },
    ArchetypeMatcher {
        archetype: FormArchetype::ExpenseReport,
        signature_keys: &["expenses", "receipts", "reimbursement"],
        min_matches: 1,
    },
];

/// Classifies a submission's archetype, table candidates and timestamp style.
pub fn classify(form: &FormSubmission) -> FormStructure {
    let array_fields: Vec<String> = form
        .iter()
        .filter(|(_, value)| matches!(value, FormValue::Rows(rows) if !rows.is_empty()))
        .map(|(key, _)| key.to_string())
        .collect();

    let form_type = ARCHETYPE_MATCHERS
        .iter()
        .find(|matcher| matcher.matches(form))
        .map(|matcher| matcher.archetype)
        .unwrap_or(FormArchetype::Generic);

    let structure_version = if form.contains_key("created_at") || form.contains_key("updated_at")
    {
        StructureVersion::V2
    } else if form.contains_key("createdAt") || form.contains_key("updatedAt") {
        StructureVersion::V3
    } else {
        StructureVersion::V1
    };

    tracing::debug!(
        form_type = form_type.as_str(),
        arrays = array_fields.len(),
        "classified form submission"
    );

    FormStructure {
        form_type,
        has_array_data: !array_fields.is_empty(),
        array_fields,
        structure_version,
        metadata: None,
    }
}

/// Classifies a ticket's custom form payload, attaching task metadata.
pub fn classify_custom_form(data: Option<&CustomFormData>) -> FormStructure {
    let Some(data) = data else {
        return FormStructure::unknown();
    };
    let Some(raw) = data.form_data.as_ref() else {
        return FormStructure::unknown();
    };
    let Some(form) = FormSubmission::from_json(raw) else {
        tracing::warn!("form payload is not a JSON object; treating as absent");
        return FormStructure::unknown();
    };

    let mut structure = classify(&form);
    structure.metadata = Some(StructureMetadata {
        total_fields: form.len(),
        form_id: data.form_id,
        workflow_stage: data
            .workflow_stage
            .as_ref()
            .map(|stage| stage.name.clone()),
        reference_id: data.reference_id.clone(),
    });
    structure
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(value: serde_json::Value) -> FormSubmission {
        FormSubmission::from_json(&value).expect("object payload")
    }

    #[test]
    fn petty_cash_shape_is_copc() {
        let structure = classify(&form(json!({
            "transactions": [{"date": "2024-11-01", "amount": 500}],
            "totalPettyCash": "1000",
            "pettyCashHolder": "Jane Doe"
        })));
        assert_eq!(structure.form_type, FormArchetype::Copc);
        assert_eq!(structure.array_fields, vec!["transactions"]);
        assert!(structure.has_array_data);
    }

    #[test]
    fn lone_signature_key_stays_generic() {
        let structure = classify(&form(json!({
            "department": "Finance",
            "cost": 450,
            "items": [{"sku": "A1", "qty": 2}]
        })));
        assert_eq!(structure.form_type, FormArchetype::Generic);
        assert_eq!(structure.array_fields, vec!["items"]);
    }

    #[test]
    fn first_matching_archetype_wins() {
        let structure = classify(&form(json!({
            "items": [{"sku": "A1"}],
            "vendor": "ACME",
            "leaveType": "sick",
            "startDate": "2024-11-01"
        })));
        assert_eq!(structure.form_type, FormArchetype::PurchaseRequest);
    }

    #[test]
    fn falsy_values_do_not_count_as_present() {
        let structure = classify(&form(json!({
            "leaveType": "",
            "startDate": null,
            "reimbursement": 0
        })));
        assert_eq!(structure.form_type, FormArchetype::Generic);
    }

    #[test]
    fn single_signature_key_is_enough_outside_purchase_requests() {
        let copc = classify(&form(json!({
            "date": "2024-11-01",
            "transactions": [{"amount": 500}]
        })));
        assert_eq!(copc.form_type, FormArchetype::Copc);

        let leave = classify(&form(json!({"endDate": "2024-11-03"})));
        assert_eq!(leave.form_type, FormArchetype::LeaveRequest);

        let expense = classify(&form(json!({"reimbursement": "bank"})));
        assert_eq!(expense.form_type, FormArchetype::ExpenseReport);

        let vendor_only = classify(&form(json!({"vendor": "ACME"})));
        assert_eq!(vendor_only.form_type, FormArchetype::Generic);
    }

    #[test]
    fn empty_sequences_are_not_array_fields() {
        let structure = classify(&form(json!({"expenses": [], "receipts": [{"no": 1}]})));
        assert_eq!(structure.array_fields, vec!["receipts"]);
        assert_eq!(structure.form_type, FormArchetype::ExpenseReport);
    }

    #[test]
    fn structure_version_follows_timestamp_style() {
        assert_eq!(
            classify(&form(json!({"created_at": "x"}))).structure_version,
            StructureVersion::V2
        );
        assert_eq!(
            classify(&form(json!({"updatedAt": "x"}))).structure_version,
            StructureVersion::V3
        );
        assert_eq!(
            classify(&form(json!({"a": 1}))).structure_version,
            StructureVersion::V1
        );
    }

    #[test]
    fn missing_payload_is_unknown() {
        assert_eq!(classify_custom_form(None).form_type, FormArchetype::Unknown);
        let data = CustomFormData {
            form_data: Some(json!([1, 2])),
            ..CustomFormData::default()
        };
        assert_eq!(
            classify_custom_form(Some(&data)).form_type,
            FormArchetype::Unknown
        );
    }

    #[test]
    fn custom_form_metadata_is_attached() {
        let data = CustomFormData {
            form_data: Some(json!({"a": 1, "b": 2})),
            form_id: Some(12),
            reference_id: Some("REF-1".into()),
            ..CustomFormData::default()
        };
        let metadata = classify_custom_form(Some(&data)).metadata.expect("metadata");
        assert_eq!(metadata.total_fields, 2);
        assert_eq!(metadata.form_id, Some(12));
        assert_eq!(metadata.reference_id.as_deref(), Some("REF-1"));
    }
}
