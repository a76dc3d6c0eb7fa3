//! Order book projection
//!
//! The filtered, sorted view of the store that the viewer sees:
//! - keeps only offers on the opposite side of the viewer's direction
//! - sorts by price, ascending when the viewer buys and descending when
//!   the viewer sells, so the best counter-offer is first
//! - breaks price ties by offer id
//!
//! The filter's amount and price do not narrow the projection.

use std::cmp::Ordering;
use std::sync::Arc;
use tradebook_core::{Direction, Offer, OfferId, OrderBookFilter, OrderBookListItem};

use crate::store::OfferStore;

/// Project `offers` through `filter`
pub fn project<'a>(
    offers: impl IntoIterator<Item = &'a Arc<Offer>>,
    filter: &OrderBookFilter,
) -> Vec<OrderBookListItem> {
    let wanted = filter.offer_direction();
    let mut items: Vec<OrderBookListItem> = offers
        .into_iter()
        .filter(|offer| offer.direction() == wanted)
        .map(|offer| OrderBookListItem::new(offer.clone()))
        .collect();
    items.sort_by(|a, b| compare(filter.direction(), a, b));
    items
}

fn compare(viewer: Direction, a: &OrderBookListItem, b: &OrderBookListItem) -> Ordering {
    let by_price = match viewer {
        Direction::Buy => a.price().cmp(&b.price()),
        Direction::Sell => b.price().cmp(&a.price()),
    };
    by_price.then_with(|| a.id().cmp(b.id()))
}

/// Current projection of the offer store
#[derive(Debug, Clone, Default)]
pub struct OrderBookProjection {
    items: Vec<OrderBookListItem>,
    direction: Option<Direction>,
    snapshot_version: u64,
}

impl OrderBookProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the store's current snapshot
    ///
    /// Synchronous; the result is in place when this returns.
    pub fn recompute(&mut self, store: &OfferStore, filter: &OrderBookFilter) {
        self.items = project(store.offers(), filter);
        self.direction = Some(filter.direction());
        self.snapshot_version = store.version();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.direction = None;
    }

    pub fn items(&self) -> &[OrderBookListItem] {
        &self.items
    }

    pub fn get(&self, offer_id: &OfferId) -> Option<&OrderBookListItem> {
        self.items.iter().find(|item| item.id() == offer_id)
    }

    /// Best counter-offer
    pub fn first(&self) -> Option<&OrderBookListItem> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Viewer direction of the last recompute
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Store version the projection was computed from
    pub fn snapshot_version(&self) -> u64 {
        self.snapshot_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::offer;
    use rust_decimal_macros::dec;

    fn book() -> Vec<Arc<Offer>> {
        vec![
            Arc::new(offer("s3", Direction::Sell, dec!(102), "peer")),
            Arc::new(offer("s1", Direction::Sell, dec!(100), "peer")),
            Arc::new(offer("s2", Direction::Sell, dec!(101), "peer")),
            Arc::new(offer("b1", Direction::Buy, dec!(99), "peer")),
            Arc::new(offer("b2", Direction::Buy, dec!(98), "peer")),
        ]
    }

    fn ids(items: &[OrderBookListItem]) -> Vec<&str> {
        items.iter().map(|item| item.id().as_str()).collect()
    }

    #[test]
    fn test_buyer_sees_sells_cheapest_first() {
        let offers = book();
        let items = project(&offers, &OrderBookFilter::new(Direction::Buy));
        assert_eq!(ids(&items), vec!["s1", "s2", "s3"]);
        assert!(items.iter().all(|item| item.offer().direction() == Direction::Sell));
    }

    #[test]
    fn test_seller_sees_buys_highest_first() {
        let offers = book();
        let items = project(&offers, &OrderBookFilter::new(Direction::Sell));
        assert_eq!(ids(&items), vec!["b1", "b2"]);
        assert!(items.windows(2).all(|w| w[0].price() >= w[1].price()));
    }

    #[test]
    fn test_ties_broken_by_id_regardless_of_arrival() {
        let forward = vec![
            Arc::new(offer("z", Direction::Sell, dec!(100), "peer")),
            Arc::new(offer("a", Direction::Sell, dec!(100), "peer")),
            Arc::new(offer("m", Direction::Sell, dec!(100), "peer")),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let filter = OrderBookFilter::new(Direction::Buy);
        assert_eq!(ids(&project(&forward, &filter)), vec!["a", "m", "z"]);
        assert_eq!(ids(&project(&reversed, &filter)), vec!["a", "m", "z"]);

        let filter = OrderBookFilter::new(Direction::Sell);
        let buys: Vec<_> = forward
            .iter()
            .map(|o| Arc::new(offer(o.id().as_str(), Direction::Buy, dec!(100), "peer")))
            .collect();
        assert_eq!(ids(&project(&buys, &filter)), vec!["a", "m", "z"]);
    }

    #[test]
    fn test_amount_and_price_do_not_filter() {
        let offers = book();
        let mut filter = OrderBookFilter::new(Direction::Buy);
        filter.set_amount(Some(dec!(1000)));
        filter.set_price(Some(dec!(1)));
        assert_eq!(project(&offers, &filter).len(), 3);
    }

    #[test]
    fn test_empty_book() {
        let offers: Vec<Arc<Offer>> = Vec::new();
        assert!(project(&offers, &OrderBookFilter::new(Direction::Buy)).is_empty());
    }
}
