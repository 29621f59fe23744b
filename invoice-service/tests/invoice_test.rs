mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn create_computes_totals_server_side() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;

    let invoice = app
        .create_invoice(
            &customer_id,
            json!([
                { "description": "A", "quantity": 2, "unit_price": 10.00 },
                { "description": "B", "quantity": 1, "unit_price": 5.50 }
            ]),
        )
        .await;

    // Default tax rate is the profile's 10 percent.
    assert_eq!(invoice["subtotal"], "25.50");
    assert_eq!(invoice["tax_rate"], "0.1");
    assert_eq!(invoice["tax"], "2.55");
    assert_eq!(invoice["total"], "28.05");
    assert_eq!(invoice["status"], "pending");
    assert_eq!(invoice["items"][0]["total"], "20.00");
    assert_eq!(invoice["items"][1]["total"], "5.50");
}

#[tokio::test]
async fn numbers_are_sequential_within_a_year() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;

    for expected in ["INV-2025-001", "INV-2025-002", "INV-2025-003"] {
        let response = app
            .post("/api/invoices")
            .json(&json!({
                "customer_id": customer_id,
                "date": "2025-06-01",
                "items": [{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["invoice_number"], expected);
    }
}

#[tokio::test]
async fn backdated_invoices_join_their_years_sequence() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;

    let mut numbers = Vec::new();
    for date in ["2025-06-01", "2024-12-31", "2025-07-01"] {
        let body: Value = app
            .post("/api/invoices")
            .json(&json!({
                "customer_id": customer_id,
                "date": date,
                "items": [{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]
            }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse JSON");
        numbers.push(body["invoice_number"].as_str().unwrap().to_string());
    }
    assert_eq!(numbers, ["INV-2025-001", "INV-2024-001", "INV-2025-002"]);
}

#[tokio::test]
async fn snapshots_are_filled_from_customer_and_profile() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;

    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
        )
        .await;

    assert_eq!(invoice["customer_name"], "Acme Corp");
    assert_eq!(invoice["bill_to_name"], "Acme Corp");
    assert_eq!(invoice["bill_to_address"], "1 Main St, Springfield, IL 62704");
    assert_eq!(invoice["bill_to_email"], "billing@acme.test");
    // Sender falls back to the lazily created default profile.
    assert_eq!(invoice["sender_name"], "Your Business Name");
}

#[tokio::test]
async fn snapshots_survive_later_customer_edits() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    app.put(&format!("/api/customers/{}", customer_id))
        .json(&json!({ "name": "Renamed LLC" }))
        .send()
        .await
        .expect("Failed to execute request");

    let fetched: Value = app
        .get(&format!("/api/invoices/{}", invoice_id))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(fetched["bill_to_name"], "Acme Corp");
    assert_eq!(fetched["customer_name"], "Acme Corp");
}

#[tokio::test]
async fn create_requires_an_existing_customer() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/invoices")
        .json(&json!({
            "customer_id": "no-such-customer",
            "items": [{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn create_requires_at_least_one_item() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;

    let response = app
        .post("/api/invoices")
        .json(&json!({ "customer_id": customer_id, "items": [] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn zero_quantity_items_are_rejected() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;

    let response = app
        .post("/api/invoices")
        .json(&json!({
            "customer_id": customer_id,
            "items": [{ "description": "Consulting", "quantity": 0, "unit_price": 100 }]
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn updating_items_recomputes_totals() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let updated: Value = app
        .put(&format!("/api/invoices/{}", invoice_id))
        .json(&json!({
            "items": [{ "description": "Consulting", "quantity": 3, "unit_price": 50 }]
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(updated["subtotal"], "150.00");
    assert_eq!(updated["tax"], "15.00");
    assert_eq!(updated["total"], "165.00");
}

#[tokio::test]
async fn status_only_update_leaves_totals_untouched() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let updated: Value = app
        .put(&format!("/api/invoices/{}", invoice_id))
        .json(&json!({ "status": "paid" }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(updated["status"], "paid");
    assert_eq!(updated["subtotal"], invoice["subtotal"]);
    assert_eq!(updated["tax"], invoice["tax"]);
    assert_eq!(updated["total"], invoice["total"]);
    assert_eq!(updated["invoice_number"], invoice["invoice_number"]);
}

#[tokio::test]
async fn tax_rate_update_recomputes_tax_but_not_subtotal() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let updated: Value = app
        .put(&format!("/api/invoices/{}", invoice_id))
        .json(&json!({ "tax_rate": 0.2 }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(updated["subtotal"], "100.00");
    assert_eq!(updated["tax"], "20.00");
    assert_eq!(updated["total"], "120.00");
}

#[tokio::test]
async fn invoices_can_be_listed_by_customer() {
    let app = TestApp::spawn().await;
    let first = app.create_customer("Acme Corp").await;
    let second = app.create_customer("Globex").await;

    app.create_invoice(
        &first,
        json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
    )
    .await;
    app.create_invoice(
        &second,
        json!([{ "description": "Hosting", "quantity": 1, "unit_price": 25 }]),
    )
    .await;

    let listed: Value = app
        .get(&format!("/api/invoices/customer/{}", first))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["customer_id"], first.as_str());
}

#[tokio::test]
async fn delete_removes_invoice() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let response = app
        .delete(&format!("/api/invoices/{}", invoice_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 204);

    let response = app
        .get(&format!("/api/invoices/{}", invoice_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
}
