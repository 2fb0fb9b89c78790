//! Workstation modules and their recipes.
//!
//! A module has a fixed number of slots and one recipe. Activation checks
//! the recipe against the slots without touching them; only a successful
//! check clears the slots and fills the output.

use crate::error::{KitchenError, KitchenResult};
use crate::kitchen::FoodItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Slicer,
    Grinder,
    SoupMaker,
    Fryer,
    BarbecueSaucer,
    Griddle,
    BurgerBuilder,
    /// An empty bay.
    None,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 8] = [
        ModuleKind::Slicer,
        ModuleKind::Grinder,
        ModuleKind::SoupMaker,
        ModuleKind::Fryer,
        ModuleKind::BarbecueSaucer,
        ModuleKind::Griddle,
        ModuleKind::BurgerBuilder,
        ModuleKind::None,
    ];

    pub fn slot_count(self) -> usize {
        match self {
            ModuleKind::Slicer | ModuleKind::Grinder => 1,
            ModuleKind::SoupMaker | ModuleKind::Fryer | ModuleKind::Griddle => 2,
            ModuleKind::BarbecueSaucer => 3,
            ModuleKind::BurgerBuilder => 4,
            ModuleKind::None => 0,
        }
    }

    /// The name used for this kind in puzzle files.
    pub fn signature(self) -> &'static str {
        match self {
            ModuleKind::Slicer => "Slicer",
            ModuleKind::Grinder => "Grinder",
            ModuleKind::SoupMaker => "SoupMaker",
            ModuleKind::Fryer => "Fryer",
            ModuleKind::BarbecueSaucer => "BarbecueSaucer",
            ModuleKind::Griddle => "Griddle",
            ModuleKind::BurgerBuilder => "BurgerBuilder",
            ModuleKind::None => "None",
        }
    }
}

impl FromStr for ModuleKind {
    type Err = KitchenError;

    fn from_str(s: &str) -> KitchenResult<Self> {
        ModuleKind::ALL
            .into_iter()
            .find(|k| k.signature() == s)
            .ok_or_else(|| KitchenError::UnknownModuleKind(s.to_string()))
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature())
    }
}

/// One module bay of a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    kind: ModuleKind,
    name: String,
    locked: bool,
    slots: Vec<Option<FoodItem>>,
    output: Option<FoodItem>,
}

impl Module {
    pub fn new(kind: ModuleKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            locked: false,
            slots: vec![None; kind.slot_count()],
            output: None,
        }
    }

    /// Mark the module as fixed by the puzzle (the player may not swap it).
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn slots(&self) -> &[Option<FoodItem>] {
        &self.slots
    }

    pub fn output(&self) -> Option<&FoodItem> {
        self.output.as_ref()
    }

    /// Put `item` into `slot`, replacing whatever was there.
    pub fn place(&mut self, item: FoodItem, slot: i64) -> KitchenResult<()> {
        if self.kind == ModuleKind::None {
            return Err(KitchenError::EmptyBay(self.name.clone()));
        }
        let index = usize::try_from(slot)
            .ok()
            .filter(|&i| i < self.slots.len())
            .ok_or_else(|| KitchenError::SlotOutOfRange {
                module: self.name.clone(),
                slot,
                size: self.slots.len(),
            })?;
        self.slots[index] = Some(item);
        Ok(())
    }

    /// Run the recipe. On success the slots are emptied and the product
    /// becomes the output; on failure nothing changes.
    pub fn activate(&mut self) -> KitchenResult<FoodItem> {
        let product = self.recipe()?;
        self.slots.iter_mut().for_each(|s| *s = None);
        self.output = Some(product.clone());
        Ok(product)
    }

    /// Remove and return the output of the last activation.
    pub fn take(&mut self) -> Option<FoodItem> {
        self.output.take()
    }

    fn recipe(&self) -> KitchenResult<FoodItem> {
        match self.kind {
            ModuleKind::Slicer => {
                let food = self.lacks(0, "Sliced")?;
                self.contains(0, "Loaf of")?;
                Ok(FoodItem::new(food.name().replace("Loaf of ", "Sliced ")))
            }
            ModuleKind::Grinder => {
                let food = self.lacks(0, "Ground")?;
                self.contains(0, "Raw")?;
                Ok(FoodItem::new(food.name().replace("Raw ", "Ground ")))
            }
            ModuleKind::SoupMaker => {
                self.exact(0, "Broth")?;
                let food = self.lacks(1, "Soup")?;
                Ok(FoodItem::new(format!("{} Soup", food.name())))
            }
            ModuleKind::Fryer => {
                self.exact(0, "Ground Chicken")?;
                self.exact(1, "Sliced Bread")?;
                Ok(FoodItem::new("Chicken Tenders"))
            }
            ModuleKind::BarbecueSaucer => {
                self.exact(0, "Tomato")?;
                self.exact(1, "Sugar")?;
                self.exact(2, "Vinegar")?;
                Ok(FoodItem::new("Barbecue Sauce"))
            }
            ModuleKind::Griddle => {
                self.exact(0, "Egg")?;
                self.exact(1, "Pepper")?;
                Ok(FoodItem::new("Fried Egg"))
            }
            ModuleKind::BurgerBuilder => {
                self.exact(0, "Sliced Bread")?;
                let filling = self.filled(1)?;
                self.exact(2, "Ground Beef")?;
                self.exact(3, "Sliced Bread")?;
                Ok(FoodItem::new(format!("{} Burger", filling.name())))
            }
            ModuleKind::None => Err(KitchenError::EmptyBay(self.name.clone())),
        }
    }

    // ── Slot checks ──

    fn filled(&self, slot: usize) -> KitchenResult<&FoodItem> {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .ok_or_else(|| KitchenError::SlotEmpty {
                module: self.name.clone(),
                slot,
            })
    }

    fn exact(&self, slot: usize, expected: &str) -> KitchenResult<&FoodItem> {
        let food = self.filled(slot)?;
        if food.name() != expected {
            return Err(KitchenError::WrongItem {
                module: self.name.clone(),
                slot,
                expected: expected.to_string(),
            });
        }
        Ok(food)
    }

    fn contains(&self, slot: usize, wanted: &str) -> KitchenResult<&FoodItem> {
        let food = self.filled(slot)?;
        if !food.name().contains(wanted) {
            return Err(KitchenError::Missing {
                module: self.name.clone(),
                slot,
                wanted: wanted.to_string(),
            });
        }
        Ok(food)
    }

    fn lacks(&self, slot: usize, unwanted: &str) -> KitchenResult<&FoodItem> {
        let food = self.filled(slot)?;
        if food.name().contains(unwanted) {
            return Err(KitchenError::AlreadyDone {
                module: self.name.clone(),
                slot,
                unwanted: unwanted.to_string(),
            });
        }
        Ok(food)
    }
}
