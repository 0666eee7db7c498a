// Redirect - booking page URL for a classified request

use super::types::CategoryId;

const BOOKING_PATH: &str = "/booking/services";

/// Booking page URL, e.g. `/booking/services?service=Plumber&subcategory=Leak%20Fixing`
pub fn booking_url(category: CategoryId, subcategory: Option<&str>) -> String {
    let mut url = format!("{}?service={}", BOOKING_PATH, urlencoding::encode(category.name()));
    if let Some(subcategory) = subcategory {
        url.push_str("&subcategory=");
        url.push_str(&urlencoding::encode(subcategory));
    }
    url
}
