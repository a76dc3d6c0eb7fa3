use serde::{Deserialize, Serialize};

use super::Direction;
use crate::values::{Amount, Price};

/// Viewer-side filter for one trading screen
///
/// `direction` is the side the viewer wants to trade; the projection keeps
/// offers of the opposite direction. `amount` and `price` only feed the
/// volume display and the requested take amount. They are not inclusion
/// predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookFilter {
    direction: Direction,
    amount: Option<Amount>,
    price: Option<Price>,
}

impl OrderBookFilter {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            amount: None,
            price: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction of the offers this filter keeps
    pub fn offer_direction(&self) -> Direction {
        self.direction.opposite()
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn price(&self) -> Option<Price> {
        self.price
    }

    /// Set the direction; returns true when it actually changed
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let changed = self.direction != direction;
        self.direction = direction;
        changed
    }

    pub fn set_amount(&mut self, amount: Option<Amount>) {
        self.amount = amount;
    }

    pub fn set_price(&mut self, price: Option<Price>) {
        self.price = price;
    }
}
