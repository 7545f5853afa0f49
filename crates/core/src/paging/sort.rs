use core::cmp::Ordering;

use super::pageable::{Direction, Order};
use crate::error::{DomainError, DomainResult};

/// Something a listing can be ordered by named properties.
pub trait Sortable {
    /// Property names accepted in [`Order::property`].
    const SORTABLE_PROPERTIES: &'static [&'static str];

    /// Compares `self` with `other` on a single property, ascending.
    ///
    /// Only called with names from [`Sortable::SORTABLE_PROPERTIES`].
    fn compare_by(&self, other: &Self, property: &str) -> Ordering;
}

/// Sorts `items` by `orders`, primary key first, ties broken by the next
/// listed key. Equal-key items keep their input order.
///
/// Empty `orders` leaves `items` untouched.
pub fn sort_stable<T: Sortable>(items: &mut [T], orders: &[Order]) -> DomainResult<()> {
    if orders.is_empty() {
        return Ok(());
    }

    let unknown = orders
        .iter()
        .find(|o| !T::SORTABLE_PROPERTIES.contains(&o.property.as_str()));
    if let Some(order) = unknown {
        return Err(DomainError::validation(format!(
            "cannot sort by '{}', sortable properties are {:?}",
            order.property,
            T::SORTABLE_PROPERTIES
        )));
    }

    // `sort_by` is a stable merge sort.
    items.sort_by(|a, b| {
        for order in orders {
            let ordering = match order.direction {
                Direction::Asc => a.compare_by(b, &order.property),
                Direction::Desc => b.compare_by(a, &order.property),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    Ok(())
}
