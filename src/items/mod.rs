//! # Items Module
//!
//! Item definitions, stacking rules, and the inventory service.
//!
//! Items are semi-core: consumption effects touch player vitals directly and
//! charge items drive combat actions. Removal of a charge use is a single
//! synchronous transaction (main inventory preferred, then the radial
//! stash); persistence is a caller concern triggered afterwards, never
//! interleaved with the mutation.

use crate::config::{INVENTORY_SLOTS, RADIAL_SLOTS};
use crate::game::{EventQueue, Grid, MessageImportance, PlayerState, Position, Tile};
use serde::{Deserialize, Serialize};

/// Varieties of food; stacks merge only within one variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    Apple,
    Bread,
    Meat,
}

impl FoodKind {
    /// Hunger restored when eaten.
    pub fn nutrition(self) -> i32 {
        match self {
            FoodKind::Apple => 20,
            FoodKind::Bread => 30,
            FoodKind::Meat => 45,
        }
    }
}

/// Every kind of item the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Food(FoodKind),
    Water,
    Bomb,
    Heart,
    Note,
    BishopSpear,
    HorseIcon,
    Bow,
    BookOfTimeTravel,
    Shovel,
}

impl ItemKind {
    /// Stackable kinds merge by quantity; the rest track per-item uses.
    pub fn is_stackable(self) -> bool {
        matches!(
            self,
            ItemKind::Food(_) | ItemKind::Water | ItemKind::Bomb | ItemKind::Heart | ItemKind::Note
        )
    }

    /// Whether this kind is a charge item (targeted, consumes `uses`).
    pub fn is_charge_based(self) -> bool {
        !self.is_stackable()
    }

    /// Default number of uses for a freshly found charge item.
    pub fn default_uses(self) -> u32 {
        match self {
            ItemKind::BishopSpear => 3,
            ItemKind::HorseIcon => 3,
            ItemKind::Bow => 5,
            ItemKind::BookOfTimeTravel => 1,
            ItemKind::Shovel => 4,
            _ => 0,
        }
    }
}

/// One inventory entry. Stackable kinds use `quantity`; charge kinds use
/// `uses` and may be individually disabled to prevent accidental triggering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub quantity: u32,
    pub uses: u32,
    pub disabled: bool,
}

impl Item {
    /// Creates a stackable item with a quantity.
    pub fn stack(kind: ItemKind, quantity: u32) -> Self {
        debug_assert!(kind.is_stackable());
        Self {
            kind,
            quantity,
            uses: 0,
            disabled: false,
        }
    }

    /// Creates a charge item with its default uses.
    pub fn charge(kind: ItemKind) -> Self {
        debug_assert!(kind.is_charge_based());
        Self {
            kind,
            quantity: 1,
            uses: kind.default_uses(),
            disabled: false,
        }
    }

    /// Whether this charge item can currently be triggered.
    pub fn is_usable_charge(&self) -> bool {
        self.kind.is_charge_based() && self.uses > 0 && !self.disabled
    }
}

/// Where an added item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Merged into an existing stack or placed in a main slot.
    Main,
    /// Main inventory was full; placed in the radial stash.
    Radial,
    /// Both inventories full; dropped onto the grid.
    Dropped(Position),
}

/// Adds an item to the player's inventories, dropping to the grid near
/// `origin` when everything is full.
pub fn add_item(
    player: &mut PlayerState,
    grid: &mut Grid,
    origin: Position,
    item: Item,
) -> AddOutcome {
    if item.kind.is_stackable() {
        if let Some(existing) = player.inventory.iter_mut().find(|i| i.kind == item.kind) {
            existing.quantity += item.quantity;
            return AddOutcome::Main;
        }
    }
    if player.inventory.len() < INVENTORY_SLOTS {
        player.inventory.push(item);
        return AddOutcome::Main;
    }
    if item.kind.is_stackable() {
        if let Some(existing) = player
            .radial_inventory
            .iter_mut()
            .find(|i| i.kind == item.kind)
        {
            existing.quantity += item.quantity;
            return AddOutcome::Radial;
        }
    }
    if player.radial_inventory.len() < RADIAL_SLOTS {
        player.radial_inventory.push(item);
        return AddOutcome::Radial;
    }
    let drop_pos = drop_position(grid, origin);
    grid.set(drop_pos, Tile::Item(item));
    AddOutcome::Dropped(drop_pos)
}

/// Finds a free floor tile at or adjacent to `origin` for a dropped item.
fn drop_position(grid: &Grid, origin: Position) -> Position {
    if matches!(grid.get(origin), Some(Tile::Floor)) {
        return origin;
    }
    origin
        .adjacent_positions()
        .into_iter()
        .find(|&p| matches!(grid.get(p), Some(Tile::Floor)))
        .unwrap_or(origin)
}

/// Consumes one unit of a stackable kind from the main inventory, removing
/// the entry when exhausted. Returns false when none was held.
pub fn consume_stackable(player: &mut PlayerState, kind: ItemKind) -> bool {
    let Some(idx) = player.inventory.iter().position(|i| i.kind == kind) else {
        return false;
    };
    let item = &mut player.inventory[idx];
    if item.quantity == 0 {
        return false;
    }
    item.quantity -= 1;
    if item.quantity == 0 {
        player.inventory.remove(idx);
    }
    true
}

/// Spends one use of a charge item: main inventory is searched first, then
/// the radial stash; an exhausted item is removed in the same transaction.
/// Returns false when no usable charge of that kind is held.
pub fn spend_charge_use(player: &mut PlayerState, kind: ItemKind) -> bool {
    for list in [&mut player.inventory, &mut player.radial_inventory] {
        if let Some(idx) = list
            .iter()
            .position(|i| i.kind == kind && i.is_usable_charge())
        {
            list[idx].uses -= 1;
            if list[idx].uses == 0 {
                list.remove(idx);
            }
            return true;
        }
    }
    false
}

/// Finds a usable charge item of the given kind, main inventory first.
pub fn find_usable_charge(player: &PlayerState, kind: ItemKind) -> Option<&Item> {
    player
        .inventory
        .iter()
        .chain(player.radial_inventory.iter())
        .find(|i| i.kind == kind && i.is_usable_charge())
}

/// Applies a consumable's effect and removes one unit. Returns true when the
/// item existed and was consumed (an action); unknown or unheld items are
/// invalid-state no-ops.
pub fn use_consumable(player: &mut PlayerState, kind: ItemKind, events: &mut EventQueue) -> bool {
    if !kind.is_stackable() {
        return false;
    }
    if !consume_stackable(player, kind) {
        return false;
    }
    match kind {
        ItemKind::Food(food) => {
            player.eat(food.nutrition());
            events.play_sound("munch");
        }
        ItemKind::Water => {
            player.drink(30);
            events.play_sound("gulp");
        }
        ItemKind::Heart => {
            player.heal(2);
            events.play_sound("point");
        }
        ItemKind::Note => {
            events.message(
                "The note reads: \"the walls below remember\"",
                MessageImportance::Info,
            );
        }
        // Bombs are consumed through placement, not here.
        ItemKind::Bomb => return false,
        _ => unreachable!(),
    }
    events.emit(crate::game::GameEvent::StatsChanged);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ZoneCoord;

    fn player() -> PlayerState {
        PlayerState::new(Position::new(4, 4), ZoneCoord::surface(0, 0))
    }

    #[test]
    fn test_stackable_merge() {
        let mut p = player();
        let mut grid = Grid::filled(Tile::Floor);
        let origin = p.position();
        add_item(&mut p, &mut grid, origin, Item::stack(ItemKind::Bomb, 2));
        add_item(&mut p, &mut grid, origin, Item::stack(ItemKind::Bomb, 3));
        assert_eq!(p.inventory.len(), 1);
        assert_eq!(p.inventory[0].quantity, 5);
    }

    #[test]
    fn test_food_kinds_do_not_merge() {
        let mut p = player();
        let mut grid = Grid::filled(Tile::Floor);
        let origin = p.position();
        add_item(
            &mut p,
            &mut grid,
            origin,
            Item::stack(ItemKind::Food(FoodKind::Apple), 1),
        );
        add_item(
            &mut p,
            &mut grid,
            origin,
            Item::stack(ItemKind::Food(FoodKind::Bread), 1),
        );
        assert_eq!(p.inventory.len(), 2);
    }

    #[test]
    fn test_overflow_to_radial_then_grid() {
        let mut p = player();
        let mut grid = Grid::filled(Tile::Floor);
        let origin = p.position();
        // Fill all main slots with distinct charge items (no stacking).
        for _ in 0..INVENTORY_SLOTS {
            assert_eq!(
                add_item(&mut p, &mut grid, origin, Item::charge(ItemKind::Bow)),
                AddOutcome::Main
            );
        }
        for _ in 0..RADIAL_SLOTS {
            assert_eq!(
                add_item(&mut p, &mut grid, origin, Item::charge(ItemKind::Bow)),
                AddOutcome::Radial
            );
        }
        let outcome = add_item(&mut p, &mut grid, origin, Item::charge(ItemKind::Bow));
        match outcome {
            AddOutcome::Dropped(pos) => {
                assert!(matches!(grid.get(pos), Some(Tile::Item(_))));
            }
            _ => unreachable!("expected drop to grid"),
        }
    }

    #[test]
    fn test_spend_charge_prefers_main() {
        let mut p = player();
        let mut main_spear = Item::charge(ItemKind::BishopSpear);
        main_spear.uses = 2;
        p.inventory.push(main_spear);
        let mut radial_spear = Item::charge(ItemKind::BishopSpear);
        radial_spear.uses = 2;
        p.radial_inventory.push(radial_spear);

        assert!(spend_charge_use(&mut p, ItemKind::BishopSpear));
        assert_eq!(p.inventory[0].uses, 1);
        assert_eq!(p.radial_inventory[0].uses, 2);
    }

    #[test]
    fn test_exhausted_charge_removed_in_same_transaction() {
        let mut p = player();
        let mut spear = Item::charge(ItemKind::BishopSpear);
        spear.uses = 1;
        p.inventory.push(spear);
        assert!(spend_charge_use(&mut p, ItemKind::BishopSpear));
        assert!(p.inventory.is_empty());
        assert!(!spend_charge_use(&mut p, ItemKind::BishopSpear));
    }

    #[test]
    fn test_disabled_charge_not_usable() {
        let mut p = player();
        let mut bow = Item::charge(ItemKind::Bow);
        bow.disabled = true;
        p.inventory.push(bow);
        assert!(find_usable_charge(&p, ItemKind::Bow).is_none());
        assert!(!spend_charge_use(&mut p, ItemKind::Bow));
    }

    #[test]
    fn test_consumable_effects() {
        let mut p = player();
        let mut events = EventQueue::new();
        p.hunger = 40;
        p.inventory.push(Item::stack(ItemKind::Food(FoodKind::Bread), 1));
        assert!(use_consumable(&mut p, ItemKind::Food(FoodKind::Bread), &mut events));
        assert_eq!(p.hunger, 70);
        assert!(p.inventory.is_empty());
        // Consuming again with nothing held is a no-op.
        assert!(!use_consumable(&mut p, ItemKind::Food(FoodKind::Bread), &mut events));
    }

    #[test]
    fn test_heart_heals() {
        let mut p = player();
        let mut events = EventQueue::new();
        p.take_damage(5);
        p.inventory.push(Item::stack(ItemKind::Heart, 1));
        assert!(use_consumable(&mut p, ItemKind::Heart, &mut events));
        assert_eq!(p.health, p.max_health - 3);
    }
}
