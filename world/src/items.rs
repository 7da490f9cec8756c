//! Ordered, weighted item storage backing the wheel sectors.

use lucky_wheel_core::{ItemError, ItemId, ItemSnapshot, Sector};

/// Single entry on the wheel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    weight: u32,
}

impl Item {
    /// Identifier allocated to the item.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Display name of the item.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative weight of the item, never below one.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Captures an owned snapshot of the item for views.
    #[must_use]
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id,
            name: self.name.clone(),
            weight: self.weight,
        }
    }
}

/// Result of a successful weight adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightAdjustment {
    /// The item kept its position with the new weight.
    Updated {
        /// Weight after the adjustment.
        weight: u32,
    },
    /// The weight fell below one, so the item was removed.
    Removed,
}

/// Ordered collection of weighted items.
///
/// Order is insertion order and decides sector placement. The total weight is
/// recomputed on every call rather than cached.
#[derive(Clone, Debug, Default)]
pub struct WeightedItemSet {
    items: Vec<Item>,
    next_id: u32,
}

impl WeightedItemSet {
    /// Creates an empty item set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new item and returns its freshly allocated identifier.
    pub fn add(&mut self, name: &str, weight: u32) -> Result<ItemId, ItemError> {
        let name = name.trim();
        if name.is_empty() || weight < 1 {
            return Err(ItemError::InvalidItem);
        }

        let id = ItemId::new(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(ItemError::InvalidItem)?;
        self.items.push(Item {
            id,
            name: name.to_owned(),
            weight,
        });
        Ok(id)
    }

    /// Changes an item's weight by `delta`, removing it when the result drops
    /// below one.
    pub fn adjust_weight(&mut self, id: ItemId, delta: i64) -> Result<WeightAdjustment, ItemError> {
        let index = self.position(id).ok_or(ItemError::NotFound)?;
        let adjusted = i64::from(self.items[index].weight).saturating_add(delta);
        if adjusted < 1 {
            let _ = self.items.remove(index);
            return Ok(WeightAdjustment::Removed);
        }

        let weight = u32::try_from(adjusted).map_err(|_| ItemError::InvalidItem)?;
        self.items[index].weight = weight;
        Ok(WeightAdjustment::Updated { weight })
    }

    /// Increments an item's weight by one.
    pub fn increase_weight(&mut self, id: ItemId) -> Result<WeightAdjustment, ItemError> {
        self.adjust_weight(id, 1)
    }

    /// Decrements an item's weight by one, removing it at zero.
    pub fn decrease_weight(&mut self, id: ItemId) -> Result<WeightAdjustment, ItemError> {
        self.adjust_weight(id, -1)
    }

    /// Deletes an item while the others keep their relative order.
    pub fn remove(&mut self, id: ItemId) -> Result<Item, ItemError> {
        let index = self.position(id).ok_or(ItemError::NotFound)?;
        Ok(self.items.remove(index))
    }

    /// Sum of all weights; zero for an empty set.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.weight)).sum()
    }

    /// Probability that the item wins a uniformly random spin.
    pub fn probability(&self, id: ItemId) -> Result<f64, ItemError> {
        if self.items.is_empty() {
            return Err(ItemError::DivisionUndefined);
        }
        let item = self.get(id).ok_or(ItemError::NotFound)?;
        Ok(f64::from(item.weight) / self.total_weight() as f64)
    }

    /// Returns the item whose sector contains `fraction` of a full turn.
    ///
    /// Each item owns `[before, before + weight) / total`, so a fraction that
    /// lands exactly on a boundary belongs to the later item. Fractions outside
    /// `[0, 1)` are wrapped first.
    pub fn resolve(&self, fraction: f64) -> Result<&Item, ItemError> {
        let last = self.items.last().ok_or(ItemError::EmptySet)?;
        let fraction = fraction.rem_euclid(1.0);
        let target = fraction * self.total_weight() as f64;

        let mut cumulative = 0_u64;
        for item in &self.items {
            cumulative += u64::from(item.weight);
            if cumulative as f64 > target {
                return Ok(item);
            }
        }

        // Only reachable through floating-point overshoot at the top end.
        Ok(last)
    }

    /// Sector layout in wheel order.
    #[must_use]
    pub fn sectors(&self) -> Vec<Sector> {
        let total = self.total_weight();
        if total == 0 {
            return Vec::new();
        }

        let total = total as f64;
        let mut before = 0_u64;
        self.items
            .iter()
            .map(|item| {
                let sector = Sector {
                    item: item.id,
                    start_fraction: before as f64 / total,
                    sweep_fraction: f64::from(item.weight) / total,
                };
                before += u64::from(item.weight);
                sector
            })
            .collect()
    }

    /// Items in wheel order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Looks up an item by identifier.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Zero-based position of the item in wheel order.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Number of items on the wheel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether the wheel has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_item_set() -> (WeightedItemSet, ItemId, ItemId) {
        let mut set = WeightedItemSet::new();
        let a = set.add("A", 1).expect("valid item");
        let b = set.add("B", 3).expect("valid item");
        (set, a, b)
    }

    #[test]
    fn add_rejects_blank_names_and_zero_weight() {
        let mut set = WeightedItemSet::new();

        assert_eq!(set.add("", 1), Err(ItemError::InvalidItem));
        assert_eq!(set.add("   ", 1), Err(ItemError::InvalidItem));
        assert_eq!(set.add("Ramen", 0), Err(ItemError::InvalidItem));
        assert!(set.is_empty());
    }

    #[test]
    fn add_trims_names_and_allocates_unique_ids() {
        let mut set = WeightedItemSet::new();
        let first = set.add("  Curry ", 2).expect("valid item");
        let second = set.add("Curry", 2).expect("duplicate names are allowed");

        assert_ne!(first, second);
        assert_eq!(set.get(first).map(Item::name), Some("Curry"));
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut set = WeightedItemSet::new();
        let first = set.add("A", 1).expect("valid item");
        let _ = set.remove(first).expect("item exists");
        let second = set.add("B", 1).expect("valid item");

        assert_ne!(first, second);
    }

    #[test]
    fn probabilities_match_weights() {
        let (set, a, b) = two_item_set();

        assert_eq!(set.total_weight(), 4);
        assert!((set.probability(a).expect("present") - 0.25).abs() < 1e-12);
        assert!((set.probability(b).expect("present") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let mut set = WeightedItemSet::new();
        let ids: Vec<_> = [3, 7, 1, 12, 5]
            .iter()
            .enumerate()
            .map(|(index, weight)| set.add(&format!("item {index}"), *weight).expect("valid"))
            .collect();

        let sum: f64 = ids
            .iter()
            .map(|id| set.probability(*id).expect("present"))
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn probability_reports_missing_and_empty_sets() {
        let (mut set, a, b) = two_item_set();

        assert_eq!(set.probability(ItemId::new(99)), Err(ItemError::NotFound));
        let _ = set.remove(a).expect("present");
        let _ = set.remove(b).expect("present");
        assert_eq!(set.probability(a), Err(ItemError::DivisionUndefined));
        assert_eq!(set.total_weight(), 0);
    }

    #[test]
    fn resolve_picks_items_by_cumulative_range() {
        let (set, a, b) = two_item_set();

        assert_eq!(set.resolve(0.1).map(Item::id), Ok(a));
        assert_eq!(set.resolve(0.5).map(Item::id), Ok(b));
        assert_eq!(set.resolve(0.0).map(Item::id), Ok(a));
        assert_eq!(set.resolve(0.999_999).map(Item::id), Ok(b));
    }

    #[test]
    fn resolve_boundary_belongs_to_the_later_item() {
        let (set, a, b) = two_item_set();

        assert_eq!(set.resolve(0.25).map(Item::id), Ok(b));
        assert_eq!(set.resolve(0.25 - 1e-12).map(Item::id), Ok(a));
    }

    #[test]
    fn resolve_fails_on_empty_set() {
        let set = WeightedItemSet::new();
        assert_eq!(set.resolve(0.3), Err(ItemError::EmptySet));
    }

    #[test]
    fn resolve_wraps_fractions_outside_a_turn() {
        let (set, a, b) = two_item_set();

        assert_eq!(set.resolve(1.1).map(Item::id), Ok(a));
        assert_eq!(set.resolve(-0.5).map(Item::id), Ok(b));
    }

    #[test]
    fn resolve_agrees_with_sector_layout() {
        let mut set = WeightedItemSet::new();
        for (name, weight) in [("A", 2), ("B", 5), ("C", 1), ("D", 4)] {
            let _ = set.add(name, weight).expect("valid item");
        }

        let sectors = set.sectors();
        for sector in &sectors {
            let midpoint = sector.start_fraction + sector.sweep_fraction / 2.0;
            assert_eq!(set.resolve(midpoint).map(Item::id), Ok(sector.item));
        }
        for pair in sectors.windows(2) {
            assert!((pair[0].end_fraction() - pair[1].start_fraction).abs() < 1e-12);
        }
        let last = sectors.last().expect("four sectors");
        assert!((last.end_fraction() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn decreasing_weight_one_removes_the_item() {
        let (mut set, a, b) = two_item_set();

        assert_eq!(set.decrease_weight(a), Ok(WeightAdjustment::Removed));
        assert!(set.get(a).is_none());
        assert_eq!(set.items().len(), 1);
        assert_eq!(set.items()[0].id(), b);
    }

    #[test]
    fn adjusting_weight_keeps_position() {
        let (mut set, a, b) = two_item_set();

        assert_eq!(
            set.increase_weight(a),
            Ok(WeightAdjustment::Updated { weight: 2 })
        );
        assert_eq!(
            set.adjust_weight(b, -2),
            Ok(WeightAdjustment::Updated { weight: 1 })
        );
        assert_eq!(set.position(a), Some(0));
        assert_eq!(set.position(b), Some(1));
        assert_eq!(set.adjust_weight(b, -5), Ok(WeightAdjustment::Removed));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let (mut set, _, _) = two_item_set();
        let missing = ItemId::new(42);

        assert_eq!(set.adjust_weight(missing, 1), Err(ItemError::NotFound));
        assert_eq!(set.remove(missing).map(|item| item.id()), Err(ItemError::NotFound));
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut set = WeightedItemSet::new();
        let ids: Vec<_> = ["A", "B", "C", "D"]
            .iter()
            .map(|name| set.add(name, 1).expect("valid item"))
            .collect();

        let _ = set.remove(ids[1]).expect("present");
        let remaining: Vec<_> = set.items().iter().map(Item::id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    }
}
