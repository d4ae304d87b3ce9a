//! Validation of receipt extraction replies.
//!
//! The vision service is asked for bare JSON but routinely wraps it in
//! Markdown fences, prefixes a byte-order mark, or returns numbers where
//! strings were requested. [`parse_extracted_orders`] normalises those quirks
//! and rejects anything that does not carry an `orders` array of objects.

use serde_json::{Map, Value, json};

use super::error::{Error, truncate_excerpt};
use super::route::Order;

/// Prompt sent with every receipt when the caller supplies none.
pub const DEFAULT_EXTRACTION_PROMPT: &str = r#"You are a delivery route planning assistant for a Taiwanese home-appliance retailer. Analyse this receipt or handwritten delivery slip.

Read the document in the following visual blocks, in order.

Block 1, header:
- "訂貨編號" / "Order No." / "Booking No." -> orderNumber
- "發票號碼" / "Invoice No." -> invoiceNumber

Block 2, customer:
- "顧客姓名" / "Customer Name" -> customer
- "電話號碼" / "Telephone" -> phone
- "送貨地址" / "Delivery Address" -> address, without the postal code, keeping the full Chinese address

Block 3, items:
- Take every product name ("商品名稱" / "Item Name") with its quantity ("訂貨數" / "Qty").
- Join them into one string formatted as "Product A x2, Product B x1" -> items
- A store note ("店備註") or other remark -> note

Block 4, logistics estimates derived from the items and address:
A. install_time_estimate (minutes, number): start at 30 and add
   - front-loading washer or washer-dryer: +20
   - air conditioner or split unit: +150
   - old appliance recycling: +15
   - address on 3F or higher without an elevator: +20
B. high_value_item (boolean): true when any item is OLED, QLED, 75 inch or larger, flagship, a side-by-side fridge, or priced above 20,000; otherwise false.
C. tags (array): 'tv_fragile' for TVs or monitors, 'fridge_upright' for fridges, 'washer_install' for washers, 'ac_heavy' for air conditioners, 'recycle_required' for fridges, air conditioners, washers or recycling services.
D. Estimate the one-way driving time from No. 291 Linsen Road, Fengshan District, Kaohsiung. If it exceeds 25 minutes add 'remote_area' to tags.

Ignore the legal notes, signature area, recycling terms and company footer below the item list. Stop reading once the items and notes are extracted.

Reply with plain JSON only, no Markdown, shaped as:
{ "orders": [ { "customer": "...", "phone": "...", "address": "...", "delivery_time": "...", "items": "...", "orderNumber": "...", "invoiceNumber": "...", "note": "...", "tags": ["tv_fragile"], "install_time_estimate": 50, "high_value_item": false } ] }"#;

const STRING_FIELDS: [&str; 7] = [
    "customer",
    "phone",
    "address",
    "items",
    "orderNumber",
    "invoiceNumber",
    "note",
];

/// Orders recovered from one receipt, already schema-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedOrders {
    pub orders: Vec<Order>,
}

/// Remove Markdown code fences and a leading byte-order mark.
///
/// # Examples
/// ```
/// use routeslip::domain::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"orders\":[]}\n```"), "{\"orders\":[]}");
/// assert_eq!(strip_code_fences("\u{feff}{}"), "{}");
/// ```
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('\u{feff}').trim();
    trimmed
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

/// Parse and validate a raw extraction reply.
///
/// Fails with [`ErrorCode::UpstreamFormat`](super::ErrorCode::UpstreamFormat)
/// carrying a truncated excerpt of `raw` when the reply is not JSON, lacks an
/// `orders` array, or holds an order whose named fields are not strings.
pub fn parse_extracted_orders(raw: &str) -> Result<ExtractedOrders, Error> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned).map_err(|err| {
        upstream_error(raw, "extraction reply is not valid JSON", Some(err.to_string()))
    })?;

    let Some(items) = value.get("orders").and_then(Value::as_array) else {
        return Err(upstream_error(
            raw,
            "extraction reply has no orders array",
            None,
        ));
    };

    let orders = items
        .iter()
        .enumerate()
        .map(|(position, item)| normalise_order(item, position).map_err(|reason| {
            upstream_error(raw, "extraction reply has a malformed order", Some(reason))
        }))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExtractedOrders { orders })
}

fn normalise_order(item: &Value, position: usize) -> Result<Order, String> {
    let Some(fields) = item.as_object() else {
        return Err(format!("orders[{position}] is not an object"));
    };

    let mut normalised: Map<String, Value> = fields.clone();
    for field in STRING_FIELDS {
        let text = match fields.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(_) => return Err(format!("orders[{position}].{field} must be a string")),
        };
        normalised.insert(field.to_owned(), Value::String(text));
    }
    // Server-owned fields are reset regardless of what the reply claims.
    normalised.remove("imageKey");
    normalised.remove("deliveryPhotoCount");
    normalised.remove("status");

    serde_json::from_value(Value::Object(normalised))
        .map_err(|err| format!("orders[{position}] could not be decoded: {err}"))
}

fn upstream_error(raw: &str, message: &str, reason: Option<String>) -> Error {
    let mut details = json!({ "excerpt": truncate_excerpt(raw) });
    if let Some(reason) = reason {
        details["reason"] = Value::String(reason);
    }
    Error::upstream_format(message).with_details(details)
}
