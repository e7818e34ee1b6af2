use std::collections::HashMap;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// ---------------------------------------------------------------------------
// Abilities
// ---------------------------------------------------------------------------

/// Built-in abilities granted by equipment. Each has a level, 0 meaning
/// the ability is missing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Ability {
    Sword,
    Shield,
    Lift,
    Swim,
    Run,
    Tunic,
}

/// Damage multiplier per sword level.
const SWORD_FACTORS: [i32; 5] = [0, 1, 2, 4, 8];

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Starts running while its command is held.
    RunningBoots,
    /// Used for a fixed duration (bow, hookshot, ...).
    Tool { use_ms: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

/// What the hero owns: abilities, life, items and item slots.
#[derive(Debug, Clone)]
pub struct Equipment {
    abilities: HashMap<Ability, u8>,
    life: i32,
    max_life: i32,
    items: HashMap<String, Item>,
    slots: [Option<String>; 2],
    treasures: HashMap<String, u32>,
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new(12)
    }
}

impl Equipment {
    pub fn new(max_life: i32) -> Self {
        let mut abilities = HashMap::new();
        abilities.insert(Ability::Tunic, 1);
        Self {
            abilities,
            life: max_life,
            max_life,
            items: HashMap::new(),
            slots: [None, None],
            treasures: HashMap::new(),
        }
    }

    pub fn ability(&self, ability: Ability) -> u8 {
        self.abilities.get(&ability).copied().unwrap_or(0)
    }

    pub fn has_ability(&self, ability: Ability) -> bool {
        self.ability(ability) > 0
    }

    pub fn set_ability(&mut self, ability: Ability, level: u8) {
        self.abilities.insert(ability, level);
    }

    pub fn with_ability(mut self, ability: Ability, level: u8) -> Self {
        self.set_ability(ability, level);
        self
    }

    pub fn sword_damage_factor(&self) -> i32 {
        let level = usize::from(self.ability(Ability::Sword)).min(SWORD_FACTORS.len() - 1);
        SWORD_FACTORS[level]
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn max_life(&self) -> i32 {
        self.max_life
    }

    pub fn remove_life(&mut self, amount: i32) {
        self.life = (self.life - amount).max(0);
    }

    pub fn add_life(&mut self, amount: i32) {
        self.life = (self.life + amount).min(self.max_life);
    }

    pub fn restore_all_life(&mut self) {
        self.life = self.max_life;
    }

    /// Damage actually taken once the tunic absorbed its share.
    pub fn absorbed_damage(&self, damage: i32) -> i32 {
        let tunic = i32::from(self.ability(Ability::Tunic).max(1));
        (damage / tunic).max(1)
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.insert(item.name.clone(), item);
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Put an owned item in slot 1 or 2.
    pub fn assign_item(&mut self, slot: u8, name: &str) {
        let index = usize::from(slot.clamp(1, 2) - 1);
        self.slots[index] = Some(name.to_owned());
    }

    pub fn item_assigned(&self, slot: u8) -> Option<&Item> {
        let index = usize::from(slot.checked_sub(1)?);
        let name = self.slots.get(index)?.as_ref()?;
        self.items.get(name)
    }

    /// Record a picked treasure. Hearts heal instead of being stored.
    pub fn obtain_treasure(&mut self, name: &str, amount: u32) {
        if name == "heart" {
            self.add_life(4 * amount as i32);
            return;
        }
        *self.treasures.entry(name.to_owned()).or_default() += amount;
    }

    pub fn treasure_count(&self, name: &str) -> u32 {
        self.treasures.get(name).copied().unwrap_or(0)
    }
}
