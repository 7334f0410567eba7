//! # Sales Summary
//!
//! Pure aggregation over recorded sales for the staff dashboards. The engine
//! fetches the rows; this module only counts. Chart rendering is frontend
//! territory - what leaves here is the data series.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::query::QueryScope;
use crate::types::{Book, Sale};

/// How many sales the "recent activity" panel shows.
pub const RECENT_SALES_LIMIT: usize = 10;

// =============================================================================
// Sales Summary
// =============================================================================

/// Aggregated sales numbers for one seller or the whole store.
///
/// Maps are BTreeMaps so the serialized output has a stable order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    /// Total units sold.
    pub total_units: i64,

    /// Total revenue in centavos.
    pub total_revenue_cents: i64,

    /// Units sold per category.
    pub units_by_category: BTreeMap<String, i64>,

    /// Units sold per staff member.
    pub units_by_user: BTreeMap<String, i64>,

    /// The most recent sales, newest first, at most [`RECENT_SALES_LIMIT`].
    pub recent_sales: Vec<Sale>,
}

impl SalesSummary {
    /// Computes the summary for the given scope.
    ///
    /// ## Scope
    /// - [`QueryScope::All`]: every sale (admin dashboard)
    /// - [`QueryScope::Own`]: strictly that seller's sales. Unlike the
    ///   reservation list there is no shared-queue carve-out here;
    ///   a recorded sale always belongs to exactly one seller.
    ///
    /// Sales whose book has left the catalog still count towards the
    /// totals; they just carry no category.
    pub fn compute(sales: &[Sale], books: &[Book], scope: &QueryScope) -> Self {
        let category_of: HashMap<&str, &str> = books
            .iter()
            .map(|b| (b.id.as_str(), b.category.as_str()))
            .collect();

        let mut total_units = 0i64;
        let mut total_revenue_cents = 0i64;
        let mut units_by_category: BTreeMap<String, i64> = BTreeMap::new();
        let mut units_by_user: BTreeMap<String, i64> = BTreeMap::new();
        let mut recent_sales: Vec<Sale> = Vec::new();

        for sale in sales {
            let in_scope = match scope {
                QueryScope::All => true,
                QueryScope::Own { user_id } => sale.user_id == *user_id,
            };
            if !in_scope {
                continue;
            }

            total_units += sale.quantity;
            total_revenue_cents += sale.total_price_cents;

            if let Some(category) = category_of.get(sale.book_id.as_str()) {
                *units_by_category.entry((*category).to_string()).or_insert(0) +=
                    sale.quantity;
            }

            *units_by_user.entry(sale.user_id.clone()).or_insert(0) += sale.quantity;

            recent_sales.push(sale.clone());
        }

        recent_sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_sales.truncate(RECENT_SALES_LIMIT);

        SalesSummary {
            total_units,
            total_revenue_cents,
            units_by_category,
            units_by_user,
            recent_sales,
        }
    }

    /// Returns the revenue as Money.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
