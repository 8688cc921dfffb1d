mod common;

use common::{copc_ticket, empty_ticket, generic_ticket, ticket_with_form};
use formhub_display::display::model::{Align, DisplayType, FieldType, SummaryKind};
use formhub_display::DisplayEngine;
use serde_json::json;

#[test]
fn copc_submission_gets_petty_cash_layout() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&copc_ticket());

    assert!(model.header.is_none());
    let labels: Vec<&str> = model.fields.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["Date", "Petty Cash Holder", "Department"]);
    assert_eq!(model.fields[0].display_type, DisplayType::Date);

    assert_eq!(model.tables.len(), 1);
    let table = &model.tables[0];
    assert_eq!(table.title, "Petty Cash Breakdown");
    assert_eq!(table.rows.len(), 2);
    let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["date", "invoiceNumber", "copcNumber", "description", "amount"]
    );
    let amount = table.column("amount").expect("amount column");
    assert_eq!(amount.field_type, FieldType::Currency);
    assert_eq!(amount.align, Align::Right);

    let summary = model.summary_item("Total Amount").expect("total amount");
    assert_eq!(summary.value, "800.00");
    assert_eq!(summary.kind, SummaryKind::Subtotal);
    assert_eq!(
        model.summary_item("Total Petty Cash").map(|s| s.value.as_str()),
        Some("1000.00")
    );
    let balance = model.summary_item("Remaining Balance").expect("balance");
    assert_eq!(balance.value, "200.00");
    assert_eq!(balance.kind, SummaryKind::Balance);
    assert_eq!(model.actions, vec!["approve", "reject"]);
}

#[test]
fn copc_without_petty_cash_goes_negative() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&ticket_with_form(json!({
        "pettyCashHolder": "Jane Doe",
        "transactions": [{ "amount": "₱1,250.50" }]
    })));

    assert!(model.summary_item("Total Petty Cash").is_none());
    assert_eq!(model.summary[0].value, "1250.50");
    assert_eq!(
        model.summary_item("Remaining Balance").map(|s| s.value.as_str()),
        Some("-1250.50")
    );
}

#[test]
fn transactions_alone_select_the_petty_cash_layout() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&ticket_with_form(json!({
        "date": "2024-11-01",
        "department": "Finance",
        "transactions": [{ "amount": 500 }, { "amount": 300 }]
    })));

    assert!(model.header.is_none());
    assert_eq!(model.tables[0].title, "Petty Cash Breakdown");
    assert!(model.summary_item("Total Petty Cash").is_none());
    assert_eq!(
        model.summary_item("Total Amount").map(|s| s.value.as_str()),
        Some("800.00")
    );
    assert_eq!(
        model.summary_item("Remaining Balance").map(|s| s.value.as_str()),
        Some("-800.00")
    );
}

#[test]
fn totals_ignore_minus_signs_in_amounts() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&ticket_with_form(json!({
        "totalPettyCash": "1000",
        "transactions": [{ "amount": "-100" }, { "amount": "50" }]
    })));

    assert_eq!(
        model.summary_item("Total Amount").map(|s| s.value.as_str()),
        Some("150.00")
    );
    assert_eq!(
        model.summary_item("Remaining Balance").map(|s| s.value.as_str()),
        Some("850.00")
    );

    let generic = engine.build_display(&ticket_with_form(json!({ "refundAmount": "-75" })));
    assert_eq!(generic.summary[0].value, "75.00");
}

#[test]
fn generic_submission_uses_inferred_layout() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&generic_ticket());

    let header = model.header.as_ref().expect("header");
    assert_eq!(header.title, "Form ticket");
    assert_eq!(header.status, "pending");

    let labels: Vec<&str> = model.fields.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["Department", "Cost"]);
    assert_eq!(model.field("Cost").map(|f| f.value.as_str()), Some("450"));

    assert_eq!(model.tables.len(), 1);
    let items = &model.tables[0];
    assert_eq!(items.title, "Items");
    let keys: Vec<&str> = items.columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["sku", "qty"]);
    assert_eq!(items.columns[1].field_type, FieldType::Number);
    assert_eq!(items.columns[1].align, Align::Right);

    assert_eq!(model.summary.len(), 1);
    assert_eq!(model.summary[0].label, "Cost");
    assert_eq!(model.summary[0].value, "450.00");
    assert_eq!(model.summary[0].kind, SummaryKind::Subtotal);
}

#[test]
fn ticket_without_form_gets_default_layout() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&empty_ticket());

    let header = model.header.expect("header");
    assert_eq!(header.title, "Printer jam");
    assert_eq!(header.status, "open");
    assert_eq!(model.fields.len(), 1);
    assert_eq!(model.fields[0].label, "Description");
    assert_eq!(model.fields[0].value, "Paper stuck");
    assert!(model.tables.is_empty());
    assert!(model.summary.is_empty());
}

#[test]
fn default_layout_has_only_the_description_even_with_a_creation_date() {
    let engine = DisplayEngine::default();
    let mut ticket = empty_ticket();
    ticket.created_at = "2024-11-01T08:00:00Z".parse().ok();

    let model = engine.build_display(&ticket);
    assert_eq!(model.fields.len(), 1);
    assert_eq!(model.fields[0].label, "Description");
    assert!(model.field("Created").is_none());
}

#[test]
fn non_object_payload_falls_back_to_default_layout() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&ticket_with_form(json!("not a form")));
    assert_eq!(model.fields.len(), 1);
    assert_eq!(model.fields[0].label, "Description");
}

#[test]
fn generic_title_prefers_form_title_and_skips_metadata() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&ticket_with_form(json!({
        "id": 5,
        "formTitle": "Travel Request",
        "createdAt": "2024-11-01",
        "requestStatus": "approved",
        "dueDate": "2024-11-20",
        "unitPrice": "1,500.00",
        "notes": ["a", "b"]
    })));

    assert_eq!(model.header.as_ref().map(|h| h.title.as_str()), Some("Travel Request"));
    let labels: Vec<&str> = model.fields.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["Request Status", "Due Date", "Unit Price"]);
    assert_eq!(model.fields[0].display_type, DisplayType::Badge);
    assert_eq!(model.fields[1].display_type, DisplayType::Date);
    assert_eq!(model.fields[2].display_type, DisplayType::Currency);
    assert!(model.tables.is_empty());
}

#[test]
fn summary_kinds_follow_key_names() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&ticket_with_form(json!({
        "grandTotal": "2,000.00",
        "balanceAmount": 150,
        "shippingCost": "n/a",
        "discountAmount": null
    })));

    assert_eq!(model.summary.len(), 2);
    assert_eq!(model.summary[0].label, "Grand Total");
    assert_eq!(model.summary[0].value, "2000.00");
    assert_eq!(model.summary[0].kind, SummaryKind::Total);
    assert_eq!(model.summary[1].kind, SummaryKind::Balance);
    assert_eq!(model.summary[1].value, "150.00");
}

#[test]
fn currency_columns_are_summed_when_no_totals_given() {
    let engine = DisplayEngine::default();
    let model = engine.build_display(&ticket_with_form(json!({
        "department": "IT",
        "lines": [
            { "refCode": "A", "lineAmount": "1,000.00", "qty": 1 },
            { "refCode": "B", "lineAmount": "250.50", "qty": 3 }
        ]
    })));

    assert_eq!(model.summary.len(), 1);
    assert_eq!(model.summary[0].label, "Total Line Amount");
    assert_eq!(model.summary[0].value, "1250.50");
    assert_eq!(model.summary[0].kind, SummaryKind::Total);
}

#[test]
fn form_data_arrays_lists_every_row_sequence() {
    let engine = DisplayEngine::default();
    let ticket = ticket_with_form(json!({
        "items": [{ "sku": "A1" }],
        "empty": [],
        "tags": ["x"],
        "approvers": [{ "name": "Lee", "approvedAt": "2024-11-03" }]
    }));

    let tables = engine.form_data_arrays(&ticket);
    let titles: Vec<&str> = tables.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Items", "Approvers"]);
    assert_eq!(tables[1].columns[1].field_type, FieldType::Date);
    assert!(engine.form_data_arrays(&empty_ticket()).is_empty());
}

#[test]
fn adaptive_summary_is_specialised_per_archetype() {
    let engine = DisplayEngine::default();
    assert_eq!(
        engine.adaptive_summary(&copc_ticket()),
        "Petty Cash: 1000 - Holder: Jane Doe"
    );
    assert_eq!(
        engine.adaptive_summary(&ticket_with_form(json!({
            "leaveType": "Vacation",
            "startDate": "2024-12-01",
            "days": 3
        }))),
        "Vacation: 3 days"
    );
    assert_eq!(
        engine.adaptive_summary(&ticket_with_form(json!({
            "leaveType": "Sick",
            "days": 1
        }))),
        "Sick: 1 days"
    );
    assert_eq!(
        engine.adaptive_summary(&ticket_with_form(json!({
            "items": [{ "sku": "A1" }],
            "requestType": "Supplies",
            "totalAmount": "900"
        }))),
        "Supplies: 900"
    );
    assert_eq!(
        engine.adaptive_summary(&generic_ticket()),
        "Department: Finance, Cost: 450"
    );
    assert_eq!(
        engine.adaptive_summary(&ticket_with_form(json!({ "items": [{ "a": 1 }, { "a": 2 }] }))),
        "Items: 2 items"
    );
    assert_eq!(engine.adaptive_summary(&empty_ticket()), "Paper stuck");
}
