mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn pdf_download_returns_document_with_attachment_headers() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([
                { "description": "Design work", "quantity": 10, "unit_price": 100.00 },
                { "description": "Hosting", "quantity": 12, "unit_price": 25.00 }
            ]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();
    let invoice_number = invoice["invoice_number"].as_str().unwrap();

    let response = app
        .get(&format!("/api/invoices/{}/pdf", invoice_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    assert_eq!(
        response
            .headers()
            .get("content-type")
            .expect("Missing content-type")
            .to_str()
            .unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response
            .headers()
            .get("content-disposition")
            .expect("Missing content-disposition")
            .to_str()
            .unwrap(),
        format!("attachment; filename=\"invoice-{}.pdf\"", invoice_number)
    );

    let bytes = response.bytes().await.expect("Failed to read body");
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 1000);
}

#[tokio::test]
async fn pdf_renders_without_profile_customer_edits_or_logo() {
    let app = TestApp::spawn().await;
    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 25.50 }]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    // Deleting the customer afterwards must not break rendering; the
    // invoice carries its own snapshots.
    app.delete(&format!("/api/customers/{}", customer_id))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .get(&format!("/api/invoices/{}/pdf", invoice_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let bytes = response.bytes().await.expect("Failed to read body");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn pdf_respects_branding_updates() {
    let app = TestApp::spawn().await;

    let response = app
        .put("/api/business-profile/branding")
        .json(&json!({
            "primary_color": "#3366FF",
            "font_family": "Times New Roman"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let customer_id = app.create_customer("Acme Corp").await;
    let invoice = app
        .create_invoice(
            &customer_id,
            json!([{ "description": "Consulting", "quantity": 1, "unit_price": 100 }]),
        )
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let response = app
        .get(&format!("/api/invoices/{}/pdf", invoice_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());
    let bytes = response.bytes().await.expect("Failed to read body");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn pdf_for_unknown_invoice_is_404() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/invoices/no-such-id/pdf")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
}
