use std::fmt;
use std::hash::Hash;

/// Identity type usable as a width-table key and across task boundaries.
pub trait ItemKey: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> ItemKey for T where T: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

/// A value the ticker can display.
///
/// The identity must be stable across renders. Equality of whole items decides
/// whether a new collection counts as a change (and therefore a reset).
pub trait TickerItem: PartialEq + Clone + Send + Sync + 'static {
    type Id: ItemKey;

    fn id(&self) -> Self::Id;
}
