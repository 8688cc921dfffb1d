#![allow(dead_code)]

use formhub_display::{parse_ticket, Ticket};
use serde_json::{json, Value};

/// Ticket whose custom form carries `form_data`.
pub fn ticket_with_form(form_data: Value) -> Ticket {
    let value = json!({
        "id": "T-100",
        "title": "Form ticket",
        "description": "Submitted through the portal",
        "status": "pending",
        "customFormData": { "formData": form_data, "referenceId": "REF-100", "formId": 4 }
    });
    serde_json::from_value(value).expect("ticket fixture")
}

pub fn copc_form() -> Value {
    json!({
        "date": "2024-11-01",
        "pettyCashHolder": "Jane Doe",
        "department": "Finance",
        "totalPettyCash": "1000",
        "transactions": [
            { "date": "2024-11-01", "invoiceNumber": "INV-1", "copcNumber": "C-1", "description": "Supplies", "amount": 500 },
            { "date": "2024-11-02", "invoiceNumber": "INV-2", "copcNumber": "C-2", "description": "Fuel", "amount": "300" }
        ]
    })
}

pub fn copc_ticket() -> Ticket {
    ticket_with_form(copc_form())
}

pub fn generic_ticket() -> Ticket {
    ticket_with_form(json!({
        "department": "Finance",
        "cost": 450,
        "items": [ { "sku": "A1", "qty": 2 } ]
    }))
}

pub fn empty_ticket() -> Ticket {
    parse_ticket(r#"{"id": "T-1", "title": "Printer jam", "description": "Paper stuck"}"#)
        .expect("empty ticket fixture")
}
