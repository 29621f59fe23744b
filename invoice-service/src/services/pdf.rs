//! Fixed-layout A4 invoice renderer.
//!
//! Bands top to bottom: logo (top right, placeholder circle when no logo
//! is stored), issuer block, bill-to plus invoice metadata, itemized
//! table, summary with total band, payment terms and footer. Every input
//! besides the invoice itself is optional; missing data falls back to
//! neutral placeholder text instead of failing the render.

use crate::models::{BusinessProfile, Customer, FontFamily, Invoice};
use crate::services::billing::round_money;
use printpdf::image_crate::{self, GenericImageView};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::utils::calculate_points_for_circle;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Pt, Rgb,
};
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::io::BufWriter;

const PAGE_WIDTH_PT: f32 = 595.28;
const PAGE_HEIGHT_PT: f32 = 841.89;
const MARGIN_PT: f32 = 50.0;
const PAGE_BOTTOM_PT: f32 = PAGE_HEIGHT_PT - MARGIN_PT;

// Table geometry: item, quantity, price per unit, amount.
const TABLE_TOP_PT: f32 = 260.0;
const COL_X: [f32; 5] = [40.0, 250.0, 350.0, 450.0, 540.0];
const HEADER_ROW_H: f32 = 28.0;
const ROW_H: f32 = 24.0;

const DEFAULT_PRIMARY: (u8, u8, u8) = (0xF9, 0x73, 0x16);

struct Theme {
    primary: Color,
    text: Color,
    text_light: Color,
    border: Color,
    white: Color,
    stripe: Color,
    body: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render one invoice to PDF bytes. `customer` and `profile` enrich the
/// output when present; `logo_bytes` is a previously uploaded image that
/// replaces the placeholder circle.
pub fn render_invoice(
    invoice: &Invoice,
    customer: Option<&Customer>,
    profile: Option<&BusinessProfile>,
    logo_bytes: Option<&[u8]>,
) -> Result<Vec<u8>, AppError> {
    let title = if invoice.invoice_number.is_empty() {
        "Invoice".to_string()
    } else {
        format!("Invoice {}", invoice.invoice_number)
    };
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
    let mut layer = doc.get_page(page1).get_layer(layer1);

    let theme = build_theme(&doc, profile)?;

    draw_logo_band(&layer, &theme, logo_bytes);
    draw_business_band(&layer, &theme, invoice, profile);
    draw_parties_band(&layer, &theme, invoice, customer);
    let mut y = draw_items_table(&doc, &mut layer, &theme, invoice);

    // Keep the summary and terms together instead of splitting them
    // across a page boundary.
    if y + 280.0 > PAGE_BOTTOM_PT {
        layer = break_page(&doc);
        y = MARGIN_PT;
    }
    y = draw_summary(&layer, &theme, invoice, y + 30.0);
    draw_terms(&doc, &mut layer, &theme, invoice, y + 20.0);

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| AppError::RenderFailed(anyhow::anyhow!(e)))?;
    writer
        .into_inner()
        .map_err(|e| AppError::RenderFailed(anyhow::anyhow!("BufWriter into_inner: {}", e)))
}

fn build_theme(
    doc: &PdfDocumentReference,
    profile: Option<&BusinessProfile>,
) -> Result<Theme, AppError> {
    let primary = profile
        .and_then(|p| parse_hex_color(&p.branding.primary_color))
        .unwrap_or(DEFAULT_PRIMARY);

    // Bold runs are always Helvetica Bold; branding only swaps the body
    // face between the two built-in families.
    let body_face = match profile.map(|p| p.branding.font_family) {
        Some(FontFamily::TimesNewRoman) | Some(FontFamily::Georgia) => BuiltinFont::TimesRoman,
        _ => BuiltinFont::Helvetica,
    };
    let body = doc
        .add_builtin_font(body_face)
        .map_err(|e| AppError::RenderFailed(anyhow::anyhow!(e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::RenderFailed(anyhow::anyhow!(e)))?;

    Ok(Theme {
        primary: rgb(primary.0, primary.1, primary.2),
        text: rgb(0x1e, 0x29, 0x3b),
        text_light: rgb(0x64, 0x74, 0x8b),
        border: rgb(0xe5, 0xe7, 0xeb),
        white: rgb(0xff, 0xff, 0xff),
        stripe: rgb(0xf8, 0xfa, 0xfc),
        body,
        bold,
    })
}

fn draw_logo_band(layer: &PdfLayerReference, theme: &Theme, logo_bytes: Option<&[u8]>) {
    let decoded = logo_bytes.and_then(|bytes| match image_crate::load_from_memory(bytes) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!("Failed to decode logo image, using placeholder: {}", err);
            None
        }
    });

    match decoded {
        Some(image) => {
            let (width_px, height_px) = image.dimensions();
            let aspect = width_px as f32 / height_px as f32;
            // Fit into a 120x80pt box, width first.
            let mut logo_w = 120.0;
            let mut logo_h = 120.0 / aspect;
            if logo_h > 80.0 {
                logo_h = 80.0;
                logo_w = 80.0 * aspect;
            }
            let pdf_image = Image::from_dynamic_image(&image);
            // At 72 dpi one pixel is one point, so the scale factors are
            // target size over pixel size.
            pdf_image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(xm(450.0)),
                    translate_y: Some(y_from_top(30.0 + logo_h)),
                    scale_x: Some(logo_w / width_px as f32),
                    scale_y: Some(logo_h / height_px as f32),
                    dpi: Some(72.0),
                    ..Default::default()
                },
            );
        }
        None => {
            layer.set_fill_color(theme.primary.clone());
            layer.add_polygon(Polygon {
                rings: vec![calculate_points_for_circle(
                    Pt(30.0),
                    Pt(530.0),
                    Pt(PAGE_HEIGHT_PT - 50.0),
                )],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
            text_centered(layer, "Your logo", 12.0, 530.0, 43.0, &theme.bold, &theme.white);
        }
    }
}

fn draw_business_band(
    layer: &PdfLayerReference,
    theme: &Theme,
    invoice: &Invoice,
    profile: Option<&BusinessProfile>,
) {
    let name = profile
        .map(|p| p.business_name.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.sender_name.clone())
        .unwrap_or_else(|| "Your Business Name".to_string());
    let address = profile
        .map(|p| p.full_business_address())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.sender_address.clone())
        .unwrap_or_else(|| "Your Business Address".to_string());
    let phone = profile
        .and_then(|p| p.business_phone.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.sender_phone.clone())
        .unwrap_or_else(|| "Your Phone Number".to_string());
    let email = profile
        .and_then(|p| p.business_email.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.sender_email.clone())
        .unwrap_or_else(|| "your@email.com".to_string());

    text_at(layer, "INVOICE", 24.0, 40.0, 40.0, &theme.bold, &theme.text);
    text_at(layer, name, 12.0, 40.0, 75.0, &theme.bold, &theme.primary);
    text_at(layer, address, 10.0, 40.0, 95.0, &theme.body, &theme.text);
    text_at(layer, phone, 10.0, 40.0, 110.0, &theme.body, &theme.text);
    text_at(layer, email, 10.0, 40.0, 125.0, &theme.body, &theme.text);
}

fn draw_parties_band(
    layer: &PdfLayerReference,
    theme: &Theme,
    invoice: &Invoice,
    customer: Option<&Customer>,
) {
    let name = customer
        .map(|c| c.name.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.bill_to_name.clone())
        .unwrap_or_else(|| "Customer Name".to_string());
    let address = customer
        .map(|c| c.full_address())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.bill_to_address.clone())
        .unwrap_or_else(|| "Customer Address".to_string());
    let phone = customer
        .and_then(|c| c.phone.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.bill_to_phone.clone())
        .unwrap_or_else(|| "Customer Phone".to_string());
    let email = customer
        .map(|c| c.email.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| invoice.bill_to_email.clone())
        .unwrap_or_else(|| "customer@email.com".to_string());

    text_at(layer, "Bill to:", 10.0, 40.0, 160.0, &theme.bold, &theme.text);
    text_at(layer, name, 10.0, 40.0, 175.0, &theme.body, &theme.text);
    text_at(layer, address, 10.0, 40.0, 190.0, &theme.body, &theme.text);
    text_at(layer, phone, 10.0, 40.0, 205.0, &theme.body, &theme.text);
    text_at(layer, email, 10.0, 40.0, 220.0, &theme.body, &theme.text);

    let number = if invoice.invoice_number.is_empty() {
        "##########".to_string()
    } else {
        invoice.invoice_number.clone()
    };
    let rows = [
        ("Invoice number:", number),
        ("Invoice date:", format_date(invoice.date)),
        ("Payment due:", format_date(invoice.due_date)),
        ("Status:", invoice.status.as_str().to_string()),
    ];
    let mut y = 160.0;
    for (label, value) in rows {
        text_at(layer, label, 10.0, 320.0, y, &theme.bold, &theme.text);
        text_at(layer, value, 10.0, 420.0, y, &theme.body, &theme.text);
        y += 15.0;
    }
}

fn draw_table_header(layer: &PdfLayerReference, theme: &Theme, top: f32) {
    fill_rect(layer, COL_X[0], top, COL_X[4] - COL_X[0], HEADER_ROW_H, &theme.primary);
    let y = top + 8.0;
    text_at(layer, "Item", 11.0, COL_X[0] + 8.0, y, &theme.bold, &theme.white);
    text_at(layer, "Quantity", 11.0, COL_X[1], y, &theme.bold, &theme.white);
    text_at(layer, "Price per unit", 11.0, COL_X[2], y, &theme.bold, &theme.white);
    text_at(layer, "Amount", 11.0, COL_X[3], y, &theme.bold, &theme.white);
}

/// Returns the y position just below the table border.
fn draw_items_table(
    doc: &PdfDocumentReference,
    layer: &mut PdfLayerReference,
    theme: &Theme,
    invoice: &Invoice,
) -> f32 {
    draw_table_header(layer, theme, TABLE_TOP_PT);
    let mut y = TABLE_TOP_PT + HEADER_ROW_H;

    for (index, item) in invoice.items.iter().enumerate() {
        if y + ROW_H > PAGE_BOTTOM_PT {
            stroke_line(layer, COL_X[0], y, COL_X[4], y, &theme.border, 1.0);
            *layer = break_page(doc);
            draw_table_header(layer, theme, MARGIN_PT);
            y = MARGIN_PT + HEADER_ROW_H;
        }

        if index % 2 == 1 {
            fill_rect(layer, COL_X[0], y, COL_X[4] - COL_X[0], ROW_H, &theme.stripe);
        }

        let description = if item.description.is_empty() {
            format!("Item {}", index + 1)
        } else {
            truncate_to_width(&item.description, 10.0, COL_X[1] - COL_X[0] - 16.0)
        };
        let text_y = y + 8.0;
        text_at(layer, description, 10.0, COL_X[0] + 8.0, text_y, &theme.body, &theme.text);
        text_centered(
            layer,
            &item.quantity.normalize().to_string(),
            10.0,
            (COL_X[1] + COL_X[2]) / 2.0,
            text_y,
            &theme.body,
            &theme.text,
        );
        text_right(layer, &format_money(item.unit_price), 10.0, COL_X[3], text_y, theme);
        text_right(layer, &format_money(item.total), 10.0, COL_X[4], text_y, theme);
        y += ROW_H;
    }

    stroke_line(layer, COL_X[0], y, COL_X[4], y, &theme.border, 1.0);
    y + 10.0
}

/// Returns the y position just below the total band.
fn draw_summary(layer: &PdfLayerReference, theme: &Theme, invoice: &Invoice, start: f32) -> f32 {
    let x = 320.0;
    let mut y = start;

    text_at(layer, "Subtotal", 11.0, x, y, &theme.body, &theme.text);
    text_right(layer, &format_money(invoice.subtotal), 11.0, COL_X[4], y, theme);
    y += 18.0;

    let tax_percent = invoice.tax_rate * Decimal::ONE_HUNDRED;
    text_at(
        layer,
        format!("Tax ({:.1}%)", tax_percent),
        11.0,
        x,
        y,
        &theme.body,
        &theme.text,
    );
    text_right(layer, &format_money(invoice.tax), 11.0, COL_X[4], y, theme);
    y += 18.0;

    if let Some(discount) = invoice.discount {
        if discount > Decimal::ZERO {
            text_at(layer, "Discount", 11.0, x, y, &theme.body, &theme.text);
            text_right(layer, &format!("-{}", format_money(discount)), 11.0, COL_X[4], y, theme);
            y += 18.0;
        }
    }

    y += 5.0;
    fill_rect(layer, x, y, 180.0, 32.0, &theme.primary);
    let band_text_y = y + 8.0;
    text_at(layer, "TOTAL", 14.0, x + 8.0, band_text_y, &theme.bold, &theme.white);
    let total = format_money(invoice.total);
    let total_x = x + 172.0 - text_width_pt(&total, 14.0);
    text_at(layer, total, 14.0, total_x, band_text_y, &theme.bold, &theme.white);
    y + 45.0
}

fn draw_terms(
    doc: &PdfDocumentReference,
    layer: &mut PdfLayerReference,
    theme: &Theme,
    invoice: &Invoice,
    start: f32,
) {
    let mut y = start;
    text_at(layer, "Payment Terms", 11.0, 40.0, y, &theme.bold, &theme.text);
    let boilerplate =
        "Payment is due within 30 days of invoice date. Please include invoice number with payment.";
    let mut line_y = y + 16.0;
    for line in wrap_to_width(boilerplate, 10.0, 300.0) {
        text_at(layer, line, 10.0, 40.0, line_y, &theme.body, &theme.text_light);
        line_y += 12.0;
    }

    let mut footer_y = y + 60.0;
    if let Some(notes) = invoice.notes.as_deref().filter(|s| !s.is_empty()) {
        y += 50.0;
        text_at(layer, "Notes", 11.0, 40.0, y, &theme.bold, &theme.text);
        let mut note_y = y + 16.0;
        for line in wrap_to_width(notes, 10.0, 300.0) {
            if note_y + 12.0 > PAGE_BOTTOM_PT {
                *layer = break_page(doc);
                note_y = MARGIN_PT;
            }
            text_at(layer, line, 10.0, 40.0, note_y, &theme.body, &theme.text_light);
            note_y += 12.0;
        }
        footer_y = footer_y.max(y + 60.0).max(note_y + 12.0);
    }

    if footer_y + 12.0 > PAGE_BOTTOM_PT {
        *layer = break_page(doc);
        footer_y = MARGIN_PT;
    }
    text_centered(
        layer,
        "Thank you for your business!",
        9.0,
        190.0,
        footer_y,
        &theme.body,
        &theme.text_light,
    );
}

fn break_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
    doc.get_page(page).get_layer(layer)
}

// Coordinates below are in points from the top-left corner, matching the
// layout grid; printpdf wants millimetres from the bottom-left.

fn xm(x_pt: f32) -> Mm {
    Pt(x_pt).into()
}

fn y_from_top(y_pt: f32) -> Mm {
    Pt(PAGE_HEIGHT_PT - y_pt).into()
}

/// Baseline for text whose bounding box starts at `y_top_pt`. Builtin
/// faces sit on an ascent of roughly 0.72em.
fn baseline(y_top_pt: f32, font_size: f32) -> Mm {
    Pt(PAGE_HEIGHT_PT - y_top_pt - 0.72 * font_size).into()
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn text_at(
    layer: &PdfLayerReference,
    text: impl Into<String>,
    size: f32,
    x_pt: f32,
    y_top_pt: f32,
    font: &IndirectFontRef,
    color: &Color,
) {
    layer.set_fill_color(color.clone());
    layer.use_text(text, size, xm(x_pt), baseline(y_top_pt, size), font);
}

fn text_right(
    layer: &PdfLayerReference,
    text: &str,
    size: f32,
    right_pt: f32,
    y_top_pt: f32,
    theme: &Theme,
) {
    let x = right_pt - text_width_pt(text, size);
    text_at(layer, text, size, x, y_top_pt, &theme.body, &theme.text);
}

#[allow(clippy::too_many_arguments)]
fn text_centered(
    layer: &PdfLayerReference,
    text: &str,
    size: f32,
    center_pt: f32,
    y_top_pt: f32,
    font: &IndirectFontRef,
    color: &Color,
) {
    let x = center_pt - text_width_pt(text, size) / 2.0;
    text_at(layer, text, size, x, y_top_pt, font, color);
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y_top: f32, w: f32, h: f32, color: &Color) {
    layer.set_fill_color(color.clone());
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(xm(x), y_from_top(y_top)), false),
            (Point::new(xm(x + w), y_from_top(y_top)), false),
            (Point::new(xm(x + w), y_from_top(y_top + h)), false),
            (Point::new(xm(x), y_from_top(y_top + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn stroke_line(
    layer: &PdfLayerReference,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    color: &Color,
    thickness: f32,
) {
    layer.set_outline_color(color.clone());
    layer.set_outline_thickness(thickness);
    layer.add_line(Line {
        points: vec![
            (Point::new(xm(x1), y_from_top(y1)), false),
            (Point::new(xm(x2), y_from_top(y2)), false),
        ],
        is_closed: false,
    });
}

/// Helvetica advance widths in thousandths of an em. The serif body
/// variants run slightly narrower, which is close enough for column
/// alignment.
fn char_width_units(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' => 222.0,
        'f' | 't' | 'I' => 278.0,
        'r' => 333.0,
        'm' => 833.0,
        'w' => 722.0,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        'a'..='z' => 556.0,
        'M' => 833.0,
        'W' => 944.0,
        'C' | 'D' | 'G' | 'H' | 'N' | 'O' | 'Q' | 'R' | 'U' => 722.0,
        'A'..='Z' => 667.0,
        '0'..='9' | '$' | '#' => 556.0,
        ' ' | '.' | ',' | ':' | ';' | '/' | '!' => 278.0,
        '-' | '(' | ')' => 333.0,
        '%' => 889.0,
        '@' => 1015.0,
        _ => 556.0,
    }
}

fn text_width_pt(text: &str, size: f32) -> f32 {
    text.chars().map(char_width_units).sum::<f32>() * size / 1000.0
}

fn truncate_to_width(text: &str, size: f32, max_width_pt: f32) -> String {
    if text_width_pt(text, size) <= max_width_pt {
        return text.to_string();
    }
    let ellipsis = "...";
    let budget = max_width_pt - text_width_pt(ellipsis, size);
    let mut out = String::new();
    let mut width = 0.0;
    for c in text.chars() {
        let w = char_width_units(c) * size / 1000.0;
        if width + w > budget {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str(ellipsis);
    out
}

fn wrap_to_width(text: &str, size: f32, max_width_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width_pt(&candidate, size) <= max_width_pt || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn format_money(value: Decimal) -> String {
    format!("${:.2}", round_money(value))
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceStatus, LineItem};
    use chrono::{NaiveDate, Utc};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn invoice_with_items(items: Vec<LineItem>) -> Invoice {
        let subtotal: Decimal = items.iter().map(|i| i.total).sum();
        let tax = round_money(subtotal * dec("0.1"));
        Invoice {
            id: "inv-1".to_string(),
            tenant_id: "tenant-a".to_string(),
            invoice_number: "INV-2026-001".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Acme Corp".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 4, 13).unwrap(),
            status: InvoiceStatus::Pending,
            items,
            subtotal,
            tax_rate: dec("0.1"),
            tax,
            total: subtotal + tax,
            discount: None,
            notes: None,
            sender_name: None,
            sender_address: None,
            sender_phone: None,
            sender_email: None,
            bill_to_name: None,
            bill_to_address: None,
            bill_to_phone: None,
            bill_to_email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line_item(description: &str, quantity: &str, unit_price: &str) -> LineItem {
        let quantity = dec(quantity);
        let unit_price = dec(unit_price);
        LineItem {
            description: description.to_string(),
            quantity,
            unit_price,
            total: round_money(quantity * unit_price),
        }
    }

    #[test]
    fn renders_with_no_optional_data() {
        let invoice = invoice_with_items(vec![line_item("Consulting", "1", "25.50")]);
        let bytes = render_invoice(&invoice, None, None, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn renders_empty_item_list() {
        let invoice = invoice_with_items(Vec::new());
        let bytes = render_invoice(&invoice, None, None, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_with_profile_discount_and_notes() {
        let mut invoice = invoice_with_items(vec![
            line_item("Design work", "10", "100.00"),
            line_item("Hosting", "12", "25.00"),
        ]);
        invoice.discount = Some(dec("50.00"));
        invoice.notes = Some("Thanks for the quick turnaround on this project.".to_string());
        let profile = BusinessProfile::default_for_tenant("tenant-a");
        let bytes = render_invoice(&invoice, None, Some(&profile), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_item_lists_paginate() {
        let items = (0..60)
            .map(|i| line_item(&format!("Line item number {}", i), "1", "10.00"))
            .collect();
        let invoice = invoice_with_items(items);
        let bytes = render_invoice(&invoice, None, None, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn garbage_logo_bytes_fall_back_to_placeholder() {
        let invoice = invoice_with_items(vec![line_item("Consulting", "1", "25.50")]);
        let bytes = render_invoice(&invoice, None, None, Some(b"not an image")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn money_is_formatted_with_two_decimals() {
        assert_eq!(format_money(dec("25.5")), "$25.50");
        assert_eq!(format_money(dec("28")), "$28.00");
        assert_eq!(format_money(dec("0")), "$0.00");
    }

    #[test]
    fn dates_use_month_day_year() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date), "03/07/2026");
    }

    #[test]
    fn hex_colors_parse_or_reject() {
        assert_eq!(parse_hex_color("#F97316"), Some((0xF9, 0x73, 0x16)));
        assert_eq!(parse_hex_color("#ffffff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("F97316"), None);
        assert_eq!(parse_hex_color("#F973"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate_to_width("short", 10.0, 200.0), "short");
        let long = "An extremely long line item description that cannot fit";
        let truncated = truncate_to_width(long, 10.0, 100.0);
        assert!(truncated.ends_with("..."));
        assert!(text_width_pt(&truncated, 10.0) <= 100.0);
    }

    #[test]
    fn wrapping_respects_width() {
        let text = "Payment is due within 30 days of invoice date. Please include invoice number with payment.";
        let lines = wrap_to_width(text, 10.0, 300.0);
        assert!(lines.len() >= 2);
        for line in &lines {
            assert!(text_width_pt(line, 10.0) <= 300.0);
        }
    }
}
