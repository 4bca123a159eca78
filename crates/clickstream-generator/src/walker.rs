//! Journey walker.
//!
//! Walks one planned session through the shopper state machine and emits
//! its events into a [`Dataset`]:
//!
//! ```text
//! Entry ─► Discovery ─► InspectProduct{n} ─┬─► CartReview ─┬─► Checkout(step) ─► Confirmation
//!          (search |     (n = 1..=5)         │               │        │
//!           browse)                          └─► Done        └─► Done └─► Done
//! ```
//!
//! Each state's outgoing edge is decided by one of the pure transition
//! functions below ([`discovery_path`], [`after_inspection`],
//! [`should_checkout`], [`after_checkout_step`]); the walker only draws the
//! dice and emits the events attached to each state.

use crate::catalog::EntityPools;
use crate::dataset::Dataset;
use crate::ids::new_id;
use crate::simulator::SessionPlan;
use crate::timing::SessionClock;
use clickstream_core::{
    CartEvent, CartEventType, CheckoutEvent, CheckoutStatus, CheckoutStep, Click,
    ConversionStatus, ElementType, PageType, PageView, Product, ProductView, SearchEvent,
    SessionBoundary,
};
use rand::Rng;
use uuid::Uuid;

pub const SEARCH_PROBABILITY: f64 = 0.6;
pub const ADD_TO_CART_PROBABILITY: f64 = 0.3;
pub const REMOVE_FROM_CART_PROBABILITY: f64 = 0.2;
pub const CHECKOUT_PROBABILITY_COMPLETED: f64 = 0.6;
pub const CHECKOUT_PROBABILITY_ABANDONED: f64 = 0.3;
/// Per-step chance that an unsuccessful session leaves checkout.
pub const CHECKOUT_ABANDON_PROBABILITY: f64 = 0.3;
pub const EXIT_PAGE_PROBABILITY: f64 = 0.2;
pub const MAX_PRODUCTS_PER_SESSION: u32 = 5;
pub const MAX_SEARCH_RESULTS: u32 = 50;

/// Position of a session in its journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyState {
    /// Landing on the homepage
    Entry,
    /// Searching or browsing a category listing
    Discovery,
    /// Visiting product pages, `remaining` visits left (at least one)
    InspectProduct { remaining: u32 },
    /// Reviewing the cart, then deciding whether to check out
    CartReview,
    /// On a checkout step
    Checkout(CheckoutStep),
    /// Order confirmation page
    Confirmation,
    Done,
}

/// How a session discovers products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPath {
    Search,
    Browse,
}

/// Pick the discovery path from a uniform roll in `[0, 1)`.
pub fn discovery_path(roll: f64) -> DiscoveryPath {
    if roll < SEARCH_PROBABILITY {
        DiscoveryPath::Search
    } else {
        DiscoveryPath::Browse
    }
}

/// State after a product visit. The cart is only reviewed when something
/// was added to it during this session.
pub fn after_inspection(remaining: u32, has_cart: bool) -> JourneyState {
    if remaining > 0 {
        JourneyState::InspectProduct { remaining }
    } else if has_cart {
        JourneyState::CartReview
    } else {
        JourneyState::Done
    }
}

pub fn checkout_probability(status: ConversionStatus) -> f64 {
    match status {
        ConversionStatus::Completed => CHECKOUT_PROBABILITY_COMPLETED,
        ConversionStatus::Abandoned => CHECKOUT_PROBABILITY_ABANDONED,
    }
}

/// Whether a session proceeds from the cart to checkout, given a uniform
/// roll in `[0, 1)`.
pub fn should_checkout(status: ConversionStatus, roll: f64) -> bool {
    roll < checkout_probability(status)
}

/// Status recorded on a checkout step.
///
/// Every step is `completed` except the final step of an unsuccessful
/// session. Intermediate steps of a session that later leaves checkout are
/// still recorded as `completed`.
pub fn checkout_step_status(step: CheckoutStep, successful: bool) -> CheckoutStatus {
    if successful || !step.is_last() {
        CheckoutStatus::Completed
    } else {
        CheckoutStatus::Abandoned
    }
}

/// State after a checkout step's event has been emitted.
///
/// `abandons` is only meaningful for unsuccessful sessions.
pub fn after_checkout_step(step: CheckoutStep, successful: bool, abandons: bool) -> JourneyState {
    if step.is_last() && successful {
        return JourneyState::Confirmation;
    }
    if !successful && abandons {
        return JourneyState::Done;
    }
    match step.next() {
        Some(next) => JourneyState::Checkout(next),
        None => JourneyState::Done,
    }
}

/// Walks sessions against a fixed product catalog.
pub struct JourneyWalker<'a> {
    pools: &'a EntityPools,
    products: &'a [Product],
    boundary: SessionBoundary,
}

impl<'a> JourneyWalker<'a> {
    /// `products` must be non-empty.
    pub fn new(
        pools: &'a EntityPools,
        products: &'a [Product],
        boundary: SessionBoundary,
    ) -> Self {
        Self {
            pools,
            products,
            boundary,
        }
    }

    /// Walk a planned session, appending the session and all of its events
    /// to `out`.
    pub fn walk<R: Rng + ?Sized>(&self, rng: &mut R, plan: SessionPlan, out: &mut Dataset) {
        let mut session = plan.session;
        let mut journey = Journey {
            session_id: session.session_id,
            user_id: session.user_id,
            status: session.conversion_status,
            clock: SessionClock::new(session.start_time, session.end_time),
            added: Vec::new(),
            out,
        };

        let mut state = JourneyState::Entry;
        while state != JourneyState::Done {
            state = self.transition(rng, &mut journey, state);
        }

        if self.boundary == SessionBoundary::Stretch {
            if let Some(last) = journey.clock.last_stamp() {
                session.end_time = session.end_time.max(last);
            }
        }
        journey.out.sessions.push(session);
    }

    /// Emit the events of `state` and return the next state.
    fn transition<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        journey: &mut Journey<'_>,
        state: JourneyState,
    ) -> JourneyState {
        match state {
            JourneyState::Entry => {
                journey.page_view(rng, PageType::Homepage, "/index.html".to_string());
                journey.clock.advance(rng, 5..=30);
                JourneyState::Discovery
            }
            JourneyState::Discovery => {
                match discovery_path(rng.gen()) {
                    DiscoveryPath::Search => self.search(rng, journey),
                    DiscoveryPath::Browse => self.browse(rng, journey),
                }
                let visits = rng.gen_range(1..=MAX_PRODUCTS_PER_SESSION);
                if self.halted(journey) {
                    after_inspection(0, journey.has_cart())
                } else {
                    JourneyState::InspectProduct { remaining: visits }
                }
            }
            JourneyState::InspectProduct { remaining } => {
                self.visit_product(rng, journey);
                let remaining = remaining.saturating_sub(1);
                if self.halted(journey) {
                    after_inspection(0, journey.has_cart())
                } else {
                    after_inspection(remaining, journey.has_cart())
                }
            }
            JourneyState::CartReview => {
                journey.page_view(rng, PageType::Cart, "/cart".to_string());
                journey.clock.advance(rng, 10..=60);

                if rng.gen::<f64>() < REMOVE_FROM_CART_PROBABILITY {
                    let product_id = journey.added[rng.gen_range(0..journey.added.len())];
                    journey.cart_event(rng, product_id, CartEventType::RemoveFromCart, 1);
                    journey.clock.advance(rng, 1..=5);
                }

                if !should_checkout(journey.status, rng.gen()) {
                    return JourneyState::Done;
                }
                journey.click(rng, "/cart".to_string(), ElementType::Button, "checkout_btn");
                journey.clock.advance(rng, 1..=3);

                if self.halted(journey) {
                    JourneyState::Done
                } else {
                    JourneyState::Checkout(CheckoutStep::CheckoutStart)
                }
            }
            JourneyState::Checkout(step) => {
                let successful = journey.status.is_completed();
                journey.page_view(rng, PageType::Checkout, format!("/checkout/{step}"));
                journey.clock.advance(rng, 30..=120);
                journey.checkout_event(rng, step, checkout_step_status(step, successful));

                let abandons = !successful && rng.gen::<f64>() < CHECKOUT_ABANDON_PROBABILITY;
                let next = after_checkout_step(step, successful, abandons);
                if let JourneyState::Checkout(_) = next {
                    journey.clock.advance(rng, 5..=15);
                    if self.halted(journey) {
                        return JourneyState::Done;
                    }
                }
                next
            }
            JourneyState::Confirmation => {
                journey.clock.advance(rng, 1..=3);
                journey.page_view(
                    rng,
                    PageType::Confirmation,
                    "/checkout/confirmation".to_string(),
                );
                JourneyState::Done
            }
            JourneyState::Done => JourneyState::Done,
        }
    }

    fn search<R: Rng + ?Sized>(&self, rng: &mut R, journey: &mut Journey<'_>) {
        let query = *self.pools.search_queries.draw(rng);
        let results_count = rng.gen_range(0..=MAX_SEARCH_RESULTS);
        journey.search_event(rng, query, results_count);
        journey.clock.advance(rng, 2..=10);

        let url = format!("/search?q={query}");
        journey.page_view(rng, PageType::SearchResults, url.clone());
        journey.clock.advance(rng, 5..=30);

        journey.click(rng, url, ElementType::ProductCard, "search_result_item");
        journey.clock.advance(rng, 1..=3);
    }

    fn browse<R: Rng + ?Sized>(&self, rng: &mut R, journey: &mut Journey<'_>) {
        let category = *self.pools.categories.draw(rng);
        let url = format!("/categories/{category}");
        journey.page_view(rng, PageType::ProductListing, url.clone());
        journey.clock.advance(rng, 10..=60);

        journey.click(rng, url, ElementType::ProductCard, "product_item");
        journey.clock.advance(rng, 1..=3);
    }

    fn visit_product<R: Rng + ?Sized>(&self, rng: &mut R, journey: &mut Journey<'_>) {
        let product_id = self.products[rng.gen_range(0..self.products.len())].product_id;
        let url = format!("/products/{product_id}");

        journey.page_view(rng, PageType::ProductDetail, url.clone());
        journey.clock.advance(rng, 10..=120);
        let dwell = rng.gen_range(10..=120);
        journey.product_view(rng, product_id, dwell);

        if rng.gen::<f64>() < ADD_TO_CART_PROBABILITY {
            journey.click(rng, url, ElementType::Button, "add_to_cart_btn");
            journey.clock.advance(rng, 1..=3);

            let quantity = rng.gen_range(1..=3);
            journey.cart_event(rng, product_id, CartEventType::AddToCart, quantity);
            journey.added.push(product_id);
            journey.clock.advance(rng, 1..=5);
        }
    }

    /// Under `truncate`, no new product visit or checkout step starts once
    /// the clock has reached the session's end.
    fn halted(&self, journey: &Journey<'_>) -> bool {
        self.boundary == SessionBoundary::Truncate && journey.clock.past_end()
    }
}

/// Per-session emission context.
struct Journey<'d> {
    session_id: Uuid,
    user_id: Uuid,
    status: ConversionStatus,
    clock: SessionClock,
    /// Product ids of this session's add-to-cart events, with repeats
    added: Vec<Uuid>,
    out: &'d mut Dataset,
}

impl Journey<'_> {
    fn has_cart(&self) -> bool {
        !self.added.is_empty()
    }

    fn page_view<R: Rng + ?Sized>(&mut self, rng: &mut R, page_type: PageType, page_url: String) {
        let view_id = new_id(rng);
        let time_spent_seconds = rng.gen_range(5..=300);
        let exit_page = rng.gen::<f64>() < EXIT_PAGE_PROBABILITY;
        self.out.page_views.push(PageView {
            view_id,
            session_id: self.session_id,
            user_id: self.user_id,
            timestamp: self.clock.stamp(),
            page_type,
            page_url,
            time_spent_seconds,
            exit_page,
        });
    }

    fn click<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        page_url: String,
        element_type: ElementType,
        element_id: &str,
    ) {
        self.out.clicks.push(Click {
            click_id: new_id(rng),
            session_id: self.session_id,
            user_id: self.user_id,
            page_url,
            element_type,
            element_id: element_id.to_string(),
            timestamp: self.clock.stamp(),
        });
    }

    fn product_view<R: Rng + ?Sized>(&mut self, rng: &mut R, product_id: Uuid, dwell: u32) {
        self.out.product_views.push(ProductView {
            view_id: new_id(rng),
            session_id: self.session_id,
            user_id: self.user_id,
            product_id,
            timestamp: self.clock.stamp(),
            time_spent_seconds: dwell,
        });
    }

    fn cart_event<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        product_id: Uuid,
        event_type: CartEventType,
        quantity: u32,
    ) {
        self.out.cart_events.push(CartEvent {
            event_id: new_id(rng),
            session_id: self.session_id,
            user_id: self.user_id,
            product_id,
            event_type,
            quantity,
            timestamp: self.clock.stamp(),
        });
    }

    fn search_event<R: Rng + ?Sized>(&mut self, rng: &mut R, query: &str, results_count: u32) {
        self.out.search_events.push(SearchEvent {
            search_id: new_id(rng),
            session_id: self.session_id,
            user_id: self.user_id,
            query: query.to_string(),
            results_count,
            timestamp: self.clock.stamp(),
        });
    }

    fn checkout_event<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        step: CheckoutStep,
        status: CheckoutStatus,
    ) {
        self.out.checkout_events.push(CheckoutEvent {
            checkout_id: new_id(rng),
            session_id: self.session_id,
            user_id: self.user_id,
            step,
            status,
            timestamp: self.clock.stamp(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::generate_products;
    use chrono::{NaiveDate, NaiveDateTime};
    use clickstream_core::{Browser, DeviceType, Session};
    use rand::rngs::StdRng;
    use std::collections::HashMap;
    use rand::SeedableRng;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn plan(status: ConversionStatus, minutes: i64) -> SessionPlan {
        SessionPlan {
            session: Session {
                session_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                start_time: start(),
                end_time: start() + chrono::Duration::minutes(minutes),
                device_type: DeviceType::Desktop,
                browser: Browser::Chrome,
                conversion_status: status,
            },
        }
    }

    /// Walk `count` sessions with the given outcome and return the dataset.
    fn walk_many(status: ConversionStatus, boundary: SessionBoundary, count: usize) -> Dataset {
        let pools = EntityPools::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let products = generate_products(&mut rng, &pools, 20);
        let walker = JourneyWalker::new(&pools, &products, boundary);

        let mut out = Dataset::new();
        out.products = products.clone();
        for _ in 0..count {
            walker.walk(&mut rng, plan(status, 60), &mut out);
        }
        out
    }

    #[test]
    fn test_discovery_path() {
        assert_eq!(discovery_path(0.0), DiscoveryPath::Search);
        assert_eq!(discovery_path(0.59), DiscoveryPath::Search);
        assert_eq!(discovery_path(0.6), DiscoveryPath::Browse);
        assert_eq!(discovery_path(0.99), DiscoveryPath::Browse);
    }

    #[test]
    fn test_after_inspection() {
        assert_eq!(
            after_inspection(2, false),
            JourneyState::InspectProduct { remaining: 2 }
        );
        assert_eq!(after_inspection(0, true), JourneyState::CartReview);
        assert_eq!(after_inspection(0, false), JourneyState::Done);
    }

    #[test]
    fn test_should_checkout() {
        assert!(should_checkout(ConversionStatus::Completed, 0.5));
        assert!(!should_checkout(ConversionStatus::Completed, 0.6));
        assert!(should_checkout(ConversionStatus::Abandoned, 0.29));
        assert!(!should_checkout(ConversionStatus::Abandoned, 0.5));
    }

    #[test]
    fn test_checkout_step_status() {
        for step in CheckoutStep::ALL {
            assert_eq!(checkout_step_status(step, true), CheckoutStatus::Completed);
        }
        assert_eq!(
            checkout_step_status(CheckoutStep::PaymentInfo, false),
            CheckoutStatus::Completed
        );
        assert_eq!(
            checkout_step_status(CheckoutStep::SubmitOrder, false),
            CheckoutStatus::Abandoned
        );
    }

    #[test]
    fn test_after_checkout_step() {
        use CheckoutStep::*;

        assert_eq!(
            after_checkout_step(SubmitOrder, true, false),
            JourneyState::Confirmation
        );
        assert_eq!(
            after_checkout_step(ShippingInfo, true, true),
            JourneyState::Checkout(PaymentInfo)
        );
        assert_eq!(after_checkout_step(ShippingInfo, false, true), JourneyState::Done);
        assert_eq!(
            after_checkout_step(ReviewOrder, false, false),
            JourneyState::Checkout(SubmitOrder)
        );
        assert_eq!(after_checkout_step(SubmitOrder, false, false), JourneyState::Done);
    }

    #[test]
    fn test_every_journey_starts_on_the_homepage() {
        let out = walk_many(ConversionStatus::Abandoned, SessionBoundary::Overrun, 200);
        assert_eq!(out.sessions.len(), 200);

        for session in &out.sessions {
            let views: Vec<_> = out
                .page_views
                .iter()
                .filter(|v| v.session_id == session.session_id)
                .collect();
            assert_eq!(views[0].page_type, PageType::Homepage);
            assert_eq!(views[0].timestamp, session.start_time);
            assert!(views.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
            assert!(views.iter().all(|v| v.user_id == session.user_id));
        }
    }

    #[test]
    fn test_checkout_steps_are_an_ordered_prefix() {
        for status in [ConversionStatus::Completed, ConversionStatus::Abandoned] {
            let out = walk_many(status, SessionBoundary::Overrun, 300);
            assert!(!out.checkout_events.is_empty());

            for session in &out.sessions {
                let steps: Vec<_> = out
                    .checkout_events
                    .iter()
                    .filter(|e| e.session_id == session.session_id)
                    .map(|e| e.step)
                    .collect();
                assert_eq!(steps, CheckoutStep::ALL[..steps.len()].to_vec());
            }
        }
    }

    #[test]
    fn test_successful_sessions_confirm() {
        let out = walk_many(ConversionStatus::Completed, SessionBoundary::Overrun, 300);

        for event in &out.checkout_events {
            assert_eq!(event.status, CheckoutStatus::Completed);
        }
        let submitted = out
            .checkout_events
            .iter()
            .filter(|e| e.step == CheckoutStep::SubmitOrder)
            .count();
        let confirmations = out
            .page_views
            .iter()
            .filter(|v| v.page_type == PageType::Confirmation)
            .count();
        assert!(submitted > 0);
        assert_eq!(submitted, confirmations);
    }

    #[test]
    fn test_abandoned_sessions_never_confirm() {
        let out = walk_many(ConversionStatus::Abandoned, SessionBoundary::Overrun, 500);

        assert!(out
            .page_views
            .iter()
            .all(|v| v.page_type != PageType::Confirmation));
        for event in &out.checkout_events {
            if event.step == CheckoutStep::SubmitOrder {
                assert_eq!(event.status, CheckoutStatus::Abandoned);
            } else {
                assert_eq!(event.status, CheckoutStatus::Completed);
            }
        }
    }

    #[test]
    fn test_cart_events_reference_catalog() {
        let out = walk_many(ConversionStatus::Completed, SessionBoundary::Overrun, 200);
        assert!(!out.cart_events.is_empty());

        for event in &out.cart_events {
            assert!(out.products.iter().any(|p| p.product_id == event.product_id));
            match event.event_type {
                CartEventType::AddToCart => assert!((1..=3).contains(&event.quantity)),
                CartEventType::RemoveFromCart => assert_eq!(event.quantity, 1),
            }
        }
    }

    #[test]
    fn test_removal_targets_an_added_product() {
        let out = walk_many(ConversionStatus::Abandoned, SessionBoundary::Overrun, 500);

        for removal in out
            .cart_events
            .iter()
            .filter(|e| e.event_type == CartEventType::RemoveFromCart)
        {
            assert!(out.cart_events.iter().any(|e| {
                e.session_id == removal.session_id
                    && e.product_id == removal.product_id
                    && e.event_type == CartEventType::AddToCart
                    && e.timestamp < removal.timestamp
            }));
        }
    }

    #[test]
    fn test_truncate_stops_at_session_end() {
        let pools = EntityPools::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let products = generate_products(&mut rng, &pools, 5);
        let walker = JourneyWalker::new(&pools, &products, SessionBoundary::Truncate);

        let mut out = Dataset::new();
        for _ in 0..50 {
            walker.walk(&mut rng, plan(ConversionStatus::Completed, 0), &mut out);
        }

        assert!(out.product_views.is_empty());
        assert!(out.cart_events.is_empty());
        assert!(out.checkout_events.is_empty());
        // Homepage plus one search-results or listing page per session
        assert_eq!(out.page_views.len(), 100);
    }

    #[test]
    fn test_truncate_starts_no_visit_or_checkout_step_after_end() {
        let pools = EntityPools::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let products = generate_products(&mut rng, &pools, 20);
        let walker = JourneyWalker::new(&pools, &products, SessionBoundary::Truncate);

        let mut out = Dataset::new();
        for i in 0..4800 {
            let status = if i % 2 == 0 {
                ConversionStatus::Completed
            } else {
                ConversionStatus::Abandoned
            };
            let minutes = rng.gen_range(1..=120);
            walker.walk(&mut rng, plan(status, minutes), &mut out);
        }

        let sessions: HashMap<Uuid, &Session> =
            out.sessions.iter().map(|s| (s.session_id, s)).collect();
        let late = out
            .page_views
            .iter()
            .filter(|v| matches!(v.page_type, PageType::ProductDetail | PageType::Checkout))
            .filter(|v| v.timestamp >= sessions[&v.session_id].end_time)
            .count();
        assert_eq!(late, 0);

        // Successful sessions never abandon, so a short step list in one
        // means the clock ran out mid-checkout.
        let mut steps: HashMap<Uuid, usize> = HashMap::new();
        for event in &out.checkout_events {
            *steps.entry(event.session_id).or_default() += 1;
        }
        let cut_short = steps
            .iter()
            .filter(|(id, _)| sessions[*id].conversion_status.is_completed())
            .filter(|(_, count)| **count < CheckoutStep::ALL.len())
            .count();
        let finished = steps
            .values()
            .filter(|count| **count == CheckoutStep::ALL.len())
            .count();
        assert!(cut_short > 0);
        assert!(finished > 0);
    }

    #[test]
    fn test_stretch_covers_every_event() {
        let out = walk_many(ConversionStatus::Completed, SessionBoundary::Stretch, 300);

        for session in &out.sessions {
            assert!(session.end_time >= session.start_time);
            let latest = out
                .page_views
                .iter()
                .filter(|v| v.session_id == session.session_id)
                .map(|v| v.timestamp)
                .chain(
                    out.checkout_events
                        .iter()
                        .filter(|e| e.session_id == session.session_id)
                        .map(|e| e.timestamp),
                )
                .max()
                .unwrap();
            assert!(latest <= session.end_time);
        }
    }

    #[test]
    fn test_page_view_attributes() {
        let out = walk_many(ConversionStatus::Abandoned, SessionBoundary::Overrun, 100);
        for view in &out.page_views {
            assert!((5..=300).contains(&view.time_spent_seconds));
        }
        for view in &out.product_views {
            assert!((10..=120).contains(&view.time_spent_seconds));
        }
        for search in &out.search_events {
            assert!(search.results_count <= MAX_SEARCH_RESULTS);
        }
        assert!(out.page_views.iter().any(|v| v.exit_page));
    }
}
