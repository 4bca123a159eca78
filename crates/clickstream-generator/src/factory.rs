//! User and product factory.

use crate::catalog::{category_nouns, price_range, EntityPools, DESCRIPTION_PHRASES};
use crate::ids::new_id;
use crate::timing::random_datetime;
use clickstream_core::{Category, GenerationWindow, Product, User};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Generate `count` users with independently drawn attributes.
pub fn generate_users<R: Rng + ?Sized>(
    rng: &mut R,
    pools: &EntityPools,
    window: &GenerationWindow,
    count: usize,
) -> Vec<User> {
    (0..count)
        .map(|_| User {
            user_id: new_id(rng),
            first_visit_date: random_datetime(rng, window),
            device_type: *pools.device_types.draw(rng),
            browser: *pools.browsers.draw(rng),
            country: pools.countries.draw(rng).to_string(),
            referrer: pools.referrers.draw(rng).to_string(),
        })
        .collect()
}

/// Generate `count` products.
///
/// Names are "{adjective} {noun}" with a noun from the product's category,
/// prices are drawn in whole cents from the category's range.
pub fn generate_products<R: Rng + ?Sized>(
    rng: &mut R,
    pools: &EntityPools,
    count: usize,
) -> Vec<Product> {
    (0..count)
        .map(|_| {
            let product_id = new_id(rng);
            let category = *pools.categories.draw(rng);
            let adjective = *pools.adjectives.draw(rng);
            let nouns = category_nouns(category);
            let noun = nouns[rng.gen_range(0..nouns.len())];

            Product {
                product_id,
                name: format!("{adjective} {noun}"),
                category,
                price: draw_price(rng, category),
                description: describe(rng, category),
            }
        })
        .collect()
}

fn draw_price<R: Rng + ?Sized>(rng: &mut R, category: Category) -> Decimal {
    let range = price_range(category);
    Decimal::new(rng.gen_range(range.min_cents..=range.max_cents), 2)
}

/// 1 to 3 distinct phrases from the phrase bank, joined with spaces.
fn describe<R: Rng + ?Sized>(rng: &mut R, category: Category) -> String {
    let length = rng.gen_range(1..=3);
    DESCRIPTION_PHRASES
        .choose_multiple(rng, length)
        .map(|phrase| phrase.replace("{category}", category.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}
