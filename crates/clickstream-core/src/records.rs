//! Records emitted by the generator.
//!
//! Every record is immutable once emitted. Each one flattens into a [`Row`]
//! whose column order matches its table in [`crate::schema`].

use crate::values::{Row, ToRow, Value};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Enumerations
// ============================================================================

/// Device a visit is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
        }
    }
}

/// Browser a visit is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    Chrome,
    Safari,
    Firefox,
    Edge,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Safari => "Safari",
            Browser::Firefox => "Firefox",
            Browser::Edge => "Edge",
        }
    }
}

/// Product taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Electronics,
    Clothing,
    Home,
    Beauty,
    Sports,
    Toys,
    Books,
    Food,
}

impl Category {
    /// All categories, in catalog order.
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Clothing,
        Category::Home,
        Category::Beauty,
        Category::Sports,
        Category::Toys,
        Category::Books,
        Category::Food,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Home => "home",
            Category::Beauty => "beauty",
            Category::Sports => "sports",
            Category::Toys => "toys",
            Category::Books => "books",
            Category::Food => "food",
        }
    }

    /// Look up a category by its stored name.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// Kind of page a page view lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    Homepage,
    ProductListing,
    ProductDetail,
    Cart,
    Checkout,
    SearchResults,
    Confirmation,
    Account,
    Help,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Homepage => "homepage",
            PageType::ProductListing => "product_listing",
            PageType::ProductDetail => "product_detail",
            PageType::Cart => "cart",
            PageType::Checkout => "checkout",
            PageType::SearchResults => "search_results",
            PageType::Confirmation => "confirmation",
            PageType::Account => "account",
            PageType::Help => "help",
        }
    }
}

/// UI element a click lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Button,
    Link,
    Image,
    Menu,
    Form,
    ProductCard,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Button => "button",
            ElementType::Link => "link",
            ElementType::Image => "image",
            ElementType::Menu => "menu",
            ElementType::Form => "form",
            ElementType::ProductCard => "product_card",
        }
    }
}

/// Outcome decided for a session when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionStatus {
    Completed,
    Abandoned,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStatus::Completed => "completed",
            ConversionStatus::Abandoned => "abandoned",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ConversionStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartEventType {
    AddToCart,
    RemoveFromCart,
}

impl CartEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartEventType::AddToCart => "add_to_cart",
            CartEventType::RemoveFromCart => "remove_from_cart",
        }
    }
}

/// Checkout steps in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
    CheckoutStart,
    ShippingInfo,
    PaymentInfo,
    ReviewOrder,
    SubmitOrder,
}

impl CheckoutStep {
    /// All steps, in the order a shopper walks them.
    pub const ALL: [CheckoutStep; 5] = [
        CheckoutStep::CheckoutStart,
        CheckoutStep::ShippingInfo,
        CheckoutStep::PaymentInfo,
        CheckoutStep::ReviewOrder,
        CheckoutStep::SubmitOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::CheckoutStart => "checkout_start",
            CheckoutStep::ShippingInfo => "shipping_info",
            CheckoutStep::PaymentInfo => "payment_info",
            CheckoutStep::ReviewOrder => "review_order",
            CheckoutStep::SubmitOrder => "submit_order",
        }
    }

    /// Zero-based position in [`CheckoutStep::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The step after this one, or `None` for `SubmitOrder`.
    pub fn next(&self) -> Option<CheckoutStep> {
        CheckoutStep::ALL.get(self.index() + 1).copied()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStatus {
    Completed,
    Abandoned,
}

impl CheckoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::Completed => "completed",
            CheckoutStatus::Abandoned => "abandoned",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    DeviceType,
    Browser,
    Category,
    PageType,
    ElementType,
    ConversionStatus,
    CartEventType,
    CheckoutStep,
    CheckoutStatus,
);

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub first_visit_date: NaiveDateTime,
    pub device_type: DeviceType,
    pub browser: Browser,
    pub country: String,
    pub referrer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub category: Category,
    /// Price in the store currency, rounded to cents.
    pub price: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub device_type: DeviceType,
    pub browser: Browser,
    pub conversion_status: ConversionStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub view_id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub page_type: PageType,
    pub page_url: String,
    pub time_spent_seconds: u32,
    pub exit_page: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub click_id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub page_url: String,
    pub element_type: ElementType,
    pub element_id: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub view_id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub time_spent_seconds: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartEvent {
    pub event_id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub event_type: CartEventType,
    pub quantity: u32,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchEvent {
    pub search_id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    pub results_count: u32,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutEvent {
    pub checkout_id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub step: CheckoutStep,
    pub status: CheckoutStatus,
    pub timestamp: NaiveDateTime,
}

// ============================================================================
// Row conversions
// ============================================================================

impl ToRow for User {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.user_id.into(),
            self.first_visit_date.into(),
            self.device_type.as_str().into(),
            self.browser.as_str().into(),
            self.country.as_str().into(),
            self.referrer.as_str().into(),
        ])
    }
}

impl ToRow for Product {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.product_id.into(),
            self.name.as_str().into(),
            self.category.as_str().into(),
            self.price.into(),
            self.description.as_str().into(),
        ])
    }
}

impl ToRow for Session {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.session_id.into(),
            self.user_id.into(),
            self.start_time.into(),
            self.end_time.into(),
            self.device_type.as_str().into(),
            self.browser.as_str().into(),
            self.conversion_status.as_str().into(),
        ])
    }
}

impl ToRow for PageView {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.view_id.into(),
            self.session_id.into(),
            self.user_id.into(),
            self.timestamp.into(),
            self.page_type.as_str().into(),
            self.page_url.as_str().into(),
            self.time_spent_seconds.into(),
            Value::Int(i64::from(self.exit_page)),
        ])
    }
}

impl ToRow for Click {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.click_id.into(),
            self.session_id.into(),
            self.user_id.into(),
            self.page_url.as_str().into(),
            self.element_type.as_str().into(),
            self.element_id.as_str().into(),
            self.timestamp.into(),
        ])
    }
}

impl ToRow for ProductView {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.view_id.into(),
            self.session_id.into(),
            self.user_id.into(),
            self.product_id.into(),
            self.timestamp.into(),
            self.time_spent_seconds.into(),
        ])
    }
}

impl ToRow for CartEvent {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.event_id.into(),
            self.session_id.into(),
            self.user_id.into(),
            self.product_id.into(),
            self.event_type.as_str().into(),
            self.quantity.into(),
            self.timestamp.into(),
        ])
    }
}

impl ToRow for SearchEvent {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.search_id.into(),
            self.session_id.into(),
            self.user_id.into(),
            self.query.as_str().into(),
            self.results_count.into(),
            self.timestamp.into(),
        ])
    }
}

impl ToRow for CheckoutEvent {
    fn to_row(&self) -> Row {
        Row::new(vec![
            self.checkout_id.into(),
            self.session_id.into(),
            self.user_id.into(),
            self.step.as_str().into(),
            self.status.as_str().into(),
            self.timestamp.into(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_checkout_step_order() {
        assert_eq!(
            CheckoutStep::CheckoutStart.next(),
            Some(CheckoutStep::ShippingInfo)
        );
        assert_eq!(CheckoutStep::ReviewOrder.next(), Some(CheckoutStep::SubmitOrder));
        assert_eq!(CheckoutStep::SubmitOrder.next(), None);
        assert!(CheckoutStep::SubmitOrder.is_last());
        assert!(!CheckoutStep::CheckoutStart.is_last());

        for (i, step) in CheckoutStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn test_category_lookup() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_name("garden"), None);
    }

    #[test]
    fn test_display_uses_stored_names() {
        assert_eq!(PageType::SearchResults.to_string(), "search_results");
        assert_eq!(CartEventType::RemoveFromCart.to_string(), "remove_from_cart");
        assert_eq!(ConversionStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_page_view_row_matches_table() {
        let view = PageView {
            view_id: Uuid::nil(),
            session_id: Uuid::nil(),
            user_id: Uuid::nil(),
            timestamp: ts(),
            page_type: PageType::Homepage,
            page_url: "/index.html".to_string(),
            time_spent_seconds: 42,
            exit_page: true,
        };
        let row = view.to_row();
        assert_eq!(row.len(), Table::PageViews.definition().columns.len());
        assert_eq!(row.values[4], Value::from("homepage"));
        assert_eq!(row.values[7], Value::Int(1));
    }

    #[test]
    fn test_product_row_keeps_price() {
        let product = Product {
            product_id: Uuid::nil(),
            name: "Premium Laptop".to_string(),
            category: Category::Electronics,
            price: Decimal::new(129999, 2),
            description: "Innovative features".to_string(),
        };
        let row = product.to_row();
        assert_eq!(row.len(), Table::Products.definition().columns.len());
        assert_eq!(row.values[3], Value::Decimal(Decimal::new(129999, 2)));
    }
}
