use crate::core::budget::BudgetInput;
use crate::models::{Listing, PropertyRequest};

/// Free-text fields are cut to this many characters to keep alerts short
pub const MAX_FIELD_CHARS: usize = 30;

/// Alert sent to a listing owner when a new request matches their listing
pub fn request_alert_for_owner(request: &PropertyRequest) -> String {
    let mut parts = vec![format!(
        "New {} request near your listing!",
        request.property_type.as_deref().unwrap_or("property")
    )];

    if let Some(location) = request.location.as_deref() {
        parts.push(format!("Location: {}", truncate(location, MAX_FIELD_CHARS)));
    }

    match &request.budget {
        BudgetInput::Amount(amount) => parts.push(format!("Budget: {}", format_amount(*amount))),
        BudgetInput::Text(text) => match text.trim().parse::<f64>() {
            Ok(amount) => parts.push(format!("Budget: {}", format_amount(amount))),
            Err(_) => parts.push(format!("Budget range: {}", text.trim())),
        },
        BudgetInput::Missing => {}
    }

    if let Some(phone) = request.phone.as_deref() {
        parts.push(format!("Contact: {}", phone));
    }

    parts.join(" ")
}

/// Alert sent to a requester when a new listing matches their request
pub fn listing_alert_for_requester(listing: &Listing) -> String {
    let mut parts = vec![format!(
        "New {} listed that matches your request!",
        listing.property_type.as_deref().unwrap_or("property")
    )];

    if let Some(title) = listing.title.as_deref() {
        parts.push(format!("{}.", truncate(title, MAX_FIELD_CHARS)));
    }

    if let Some(address) = listing.address.as_deref() {
        parts.push(format!("Address: {}", truncate(address, MAX_FIELD_CHARS)));
    }

    if let Some(price) = listing.price {
        parts.push(format!("Price: {}", format_amount(price)));
    } else if let Some(range) = listing.price_range.as_deref() {
        parts.push(format!("Price range: {}", range));
    }

    parts.push("Open the app for details.".to_string());

    parts.join(" ")
}

/// Cut `text` to `max` characters, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// `Rs. 12000000` for whole amounts, two decimals otherwise
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("Rs. {:.0}", amount)
    } else {
        format!("Rs. {:.2}", amount)
    }
}
