//! In-memory dataset verification.
//!
//! Checks a generated [`Dataset`] for the referential and temporal
//! invariants downstream consumers rely on, before anything is persisted.

use crate::catalog::price_range;
use crate::dataset::Dataset;
use chrono::NaiveDateTime;
use clickstream_core::{
    CartEventType, CheckoutStatus, CheckoutStep, ConversionStatus, PageType, Session,
    SessionBoundary, Table,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// A single failed check.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Table holding the offending record
    pub table: Table,
    /// Primary key of the offending record
    pub record_id: Uuid,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.table.name(), self.record_id, self.message)
    }
}

/// Result of verifying a dataset.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    /// Number of records inspected across all tables.
    pub checked: usize,
    /// Every failed check, in table order.
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    /// Check if verification passed.
    pub fn is_success(&self) -> bool {
        self.violations.is_empty()
    }

    fn fail(&mut self, table: Table, record_id: Uuid, message: impl Into<String>) {
        self.violations.push(Violation {
            table,
            record_id,
            message: message.into(),
        });
    }
}

/// Verify a dataset generated under the given session boundary policy.
pub fn verify_dataset(dataset: &Dataset, boundary: SessionBoundary) -> VerificationReport {
    let mut report = VerificationReport {
        checked: dataset.total_records(),
        ..Default::default()
    };

    check_unique_ids(dataset, &mut report);

    let users: HashSet<Uuid> = dataset.users.iter().map(|u| u.user_id).collect();
    let products: HashSet<Uuid> = dataset.products.iter().map(|p| p.product_id).collect();
    let sessions: HashMap<Uuid, &Session> = dataset
        .sessions
        .iter()
        .map(|s| (s.session_id, s))
        .collect();

    for product in &dataset.products {
        if product.price <= Decimal::ZERO {
            report.fail(Table::Products, product.product_id, "price is not positive");
        }
        if product.price.scale() > 2 {
            report.fail(
                Table::Products,
                product.product_id,
                format!("price {} has more than 2 decimals", product.price),
            );
        }
        if !price_range(product.category).contains(product.price) {
            report.fail(
                Table::Products,
                product.product_id,
                format!("price {} outside the {} range", product.price, product.category),
            );
        }
    }

    for session in &dataset.sessions {
        if session.end_time < session.start_time {
            report.fail(Table::Sessions, session.session_id, "end_time before start_time");
        }
        if !users.contains(&session.user_id) {
            report.fail(
                Table::Sessions,
                session.session_id,
                format!("unknown user {}", session.user_id),
            );
        }
    }

    // Every event must sit in a known session, share its owner and not
    // precede its start.
    for (table, id, session_id, user_id, at) in event_refs(dataset) {
        let Some(session) = sessions.get(&session_id) else {
            report.fail(table, id, format!("unknown session {session_id}"));
            continue;
        };
        if session.user_id != user_id {
            report.fail(
                table,
                id,
                format!("user {user_id} does not own session {session_id}"),
            );
        }
        if at < session.start_time {
            report.fail(table, id, "timestamp before session start");
        }
        if boundary == SessionBoundary::Stretch && at > session.end_time {
            report.fail(table, id, "timestamp after session end");
        }
    }

    for view in &dataset.product_views {
        if !products.contains(&view.product_id) {
            report.fail(
                Table::ProductViews,
                view.view_id,
                format!("unknown product {}", view.product_id),
            );
        }
    }

    for cart in &dataset.cart_events {
        if !products.contains(&cart.product_id) {
            report.fail(
                Table::CartEvents,
                cart.event_id,
                format!("unknown product {}", cart.product_id),
            );
        }
        if cart.event_type == CartEventType::AddToCart && !(1..=3).contains(&cart.quantity) {
            report.fail(
                Table::CartEvents,
                cart.event_id,
                format!("add_to_cart quantity {} outside 1..=3", cart.quantity),
            );
        }
    }

    // Under truncate, no product visit or checkout step begins once the
    // session has ended.
    if boundary == SessionBoundary::Truncate {
        for view in &dataset.page_views {
            let starts_step =
                matches!(view.page_type, PageType::ProductDetail | PageType::Checkout);
            let late = sessions
                .get(&view.session_id)
                .is_some_and(|s| view.timestamp >= s.end_time);
            if starts_step && late {
                report.fail(
                    Table::PageViews,
                    view.view_id,
                    format!("{} page starts at or after session end", view.page_type),
                );
            }
        }
    }

    check_journeys(dataset, &sessions, &mut report);
    report
}

/// `(table, id, session_id, user_id, timestamp)` for every event record.
fn event_refs(dataset: &Dataset) -> Vec<(Table, Uuid, Uuid, Uuid, NaiveDateTime)> {
    let mut refs = Vec::new();
    refs.extend(
        dataset
            .page_views
            .iter()
            .map(|v| (Table::PageViews, v.view_id, v.session_id, v.user_id, v.timestamp)),
    );
    refs.extend(
        dataset
            .clicks
            .iter()
            .map(|c| (Table::Clicks, c.click_id, c.session_id, c.user_id, c.timestamp)),
    );
    refs.extend(
        dataset
            .product_views
            .iter()
            .map(|v| (Table::ProductViews, v.view_id, v.session_id, v.user_id, v.timestamp)),
    );
    refs.extend(
        dataset
            .cart_events
            .iter()
            .map(|e| (Table::CartEvents, e.event_id, e.session_id, e.user_id, e.timestamp)),
    );
    refs.extend(
        dataset
            .search_events
            .iter()
            .map(|s| (Table::SearchEvents, s.search_id, s.session_id, s.user_id, s.timestamp)),
    );
    refs.extend(dataset.checkout_events.iter().map(|e| {
        (Table::CheckoutEvents, e.checkout_id, e.session_id, e.user_id, e.timestamp)
    }));
    refs
}

fn check_unique_ids(dataset: &Dataset, report: &mut VerificationReport) {
    for table in Table::ALL {
        let mut seen = HashSet::new();
        for row in dataset.rows(table) {
            let Some(id) = row.primary_key().and_then(|v| v.as_uuid()).copied() else {
                continue;
            };
            if !seen.insert(id) {
                report.fail(table, id, "duplicate primary key");
            }
        }
    }
}

/// Per-session ordering checks: homepage first, checkout steps in order,
/// and conversion outcome consistent with checkout and confirmation.
fn check_journeys(
    dataset: &Dataset,
    sessions: &HashMap<Uuid, &Session>,
    report: &mut VerificationReport,
) {
    let mut first_views: HashMap<Uuid, (NaiveDateTime, PageType)> = HashMap::new();
    for view in &dataset.page_views {
        first_views
            .entry(view.session_id)
            .and_modify(|first| {
                if view.timestamp < first.0 {
                    *first = (view.timestamp, view.page_type);
                }
            })
            .or_insert((view.timestamp, view.page_type));

        if view.page_type == PageType::Confirmation {
            if let Some(session) = sessions.get(&view.session_id) {
                if session.conversion_status == ConversionStatus::Abandoned {
                    report.fail(
                        Table::PageViews,
                        view.view_id,
                        "confirmation page in an abandoned session",
                    );
                }
            }
        }
    }

    for session in &dataset.sessions {
        match first_views.get(&session.session_id) {
            Some((_, PageType::Homepage)) => {}
            Some((_, other)) => report.fail(
                Table::Sessions,
                session.session_id,
                format!("journey starts on {other}, not homepage"),
            ),
            None => report.fail(Table::Sessions, session.session_id, "no page views"),
        }
    }

    let mut last_step: HashMap<Uuid, CheckoutStep> = HashMap::new();
    for event in &dataset.checkout_events {
        let expected = match last_step.get(&event.session_id) {
            None => Some(CheckoutStep::CheckoutStart),
            Some(previous) => previous.next(),
        };
        if expected != Some(event.step) {
            report.fail(
                Table::CheckoutEvents,
                event.checkout_id,
                format!("step {} out of order", event.step),
            );
        }
        last_step.insert(event.session_id, event.step);

        let completed = sessions
            .get(&event.session_id)
            .is_some_and(|s| s.conversion_status.is_completed());
        if completed && event.step.is_last() && event.status != CheckoutStatus::Completed {
            report.fail(
                Table::CheckoutEvents,
                event.checkout_id,
                "completed session has an abandoned submit_order",
            );
        }
    }
}
