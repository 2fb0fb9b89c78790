//! The simulated kitchen: chef, pantry, stations and orders.

use crate::error::{KitchenError, KitchenResult};
use crate::module::{Module, ModuleKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Number of module bays on every station.
pub const BAYS_PER_STATION: usize = 3;

const BAY_LETTERS: [&str; BAYS_PER_STATION] = ["A", "B", "C"];

// ─────────────────────────────────────────────────────────────────────
// Food and places
// ─────────────────────────────────────────────────────────────────────

/// A named food item. "Nothing" is spelled `Option<FoodItem>::None`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodItem(String);

impl FoodItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoodItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the chef can stand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "kebab-case")]
pub enum Location {
    Pantry,
    Window,
    Station(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Pantry => f.write_str("Pantry"),
            Location::Window => f.write_str("Window"),
            Location::Station(name) => f.write_str(name),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Pantry
// ─────────────────────────────────────────────────────────────────────

/// Pantry stock as a multiset of items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pantry {
    stock: BTreeMap<FoodItem, u32>,
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: FoodItem) {
        *self.stock.entry(item).or_insert(0) += 1;
    }

    pub fn count(&self, name: &str) -> u32 {
        self.stock
            .get(&FoodItem::new(name))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    /// Remove one unit of `name`.
    pub fn take(&mut self, name: &str) -> KitchenResult<FoodItem> {
        let item = FoodItem::new(name);
        match self.stock.get_mut(&item) {
            Some(n) if *n > 1 => *n -= 1,
            Some(_) => {
                self.stock.remove(&item);
            }
            None => return Err(KitchenError::OutOfStock(name.to_string())),
        }
        Ok(item)
    }

    /// Iterate `(item, count)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&FoodItem, u32)> {
        self.stock.iter().map(|(item, n)| (item, *n))
    }
}

impl<S: Into<String>> FromIterator<S> for Pantry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut pantry = Pantry::new();
        for name in iter {
            pantry.add(FoodItem::new(name));
        }
        pantry
    }
}

// ─────────────────────────────────────────────────────────────────────
// Stations
// ─────────────────────────────────────────────────────────────────────

/// A named workstation with exactly three module bays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    name: String,
    modules: Vec<Module>,
}

impl Station {
    /// Build a station, padding with empty bays named `"<station> A"`,
    /// `"<station> B"`, `"<station> C"` by position.
    pub fn new(name: impl Into<String>, mut modules: Vec<Module>) -> KitchenResult<Self> {
        let name = name.into();
        if modules.len() > BAYS_PER_STATION {
            return Err(KitchenError::TooManyModules {
                station: name,
                count: modules.len(),
            });
        }
        while modules.len() < BAYS_PER_STATION {
            let bay = bay_name(&name, modules.len());
            modules.push(Module::new(ModuleKind::None, bay));
        }
        Ok(Self { name, modules })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Modules other than empty bays.
    pub fn real_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| m.kind() != ModuleKind::None)
    }

    /// `(kind, name)` for every bay, suitable for writing the layout back out.
    pub fn signature(&self) -> Vec<(ModuleKind, String)> {
        self.modules
            .iter()
            .map(|m| (m.kind(), m.name().to_string()))
            .collect()
    }
}

/// Name given to the empty bay at `index` of `station`.
pub fn bay_name(station: &str, index: usize) -> String {
    match BAY_LETTERS.get(index) {
        Some(letter) => format!("{station} {letter}"),
        None => format!("{station} {}", index + 1),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Kitchen
// ─────────────────────────────────────────────────────────────────────

/// Everything one run of a program can touch.
#[derive(Debug, Clone)]
pub struct Kitchen {
    location: Location,
    hands: Option<FoodItem>,
    pantry: Pantry,
    stations: Vec<Station>,
    required: Vec<FoodItem>,
    delivered: Vec<FoodItem>,
}

impl Kitchen {
    /// Validate the layout and place the chef at the pantry, empty-handed.
    pub fn new(
        stations: Vec<Station>,
        pantry: Pantry,
        orders: Vec<FoodItem>,
    ) -> KitchenResult<Self> {
        let mut station_names = BTreeSet::new();
        let mut module_names = BTreeSet::new();
        for station in &stations {
            if matches!(station.name(), "Pantry" | "Window") {
                return Err(KitchenError::ReservedStationName(station.name().to_string()));
            }
            if !station_names.insert(station.name()) {
                return Err(KitchenError::DuplicateStation(station.name().to_string()));
            }
            for module in station.modules() {
                if !module_names.insert(module.name()) {
                    return Err(KitchenError::DuplicateModule(module.name().to_string()));
                }
            }
        }
        Ok(Self {
            location: Location::Pantry,
            hands: None,
            pantry,
            stations,
            required: orders,
            delivered: Vec::new(),
        })
    }

    // ── Inspection ──

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn hands(&self) -> Option<&FoodItem> {
        self.hands.as_ref()
    }

    pub fn pantry(&self) -> &Pantry {
        &self.pantry
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn required(&self) -> &[FoodItem] {
        &self.required
    }

    pub fn delivered(&self) -> &[FoodItem] {
        &self.delivered
    }

    pub fn module(&self, name: &str) -> KitchenResult<&Module> {
        self.stations
            .iter()
            .flat_map(|s| s.modules.iter())
            .find(|m| m.name() == name)
            .ok_or_else(|| KitchenError::UnknownModule(name.to_string()))
    }

    fn module_mut(&mut self, name: &str) -> KitchenResult<&mut Module> {
        self.stations
            .iter_mut()
            .flat_map(|s| s.modules.iter_mut())
            .find(|m| m.name() == name)
            .ok_or_else(|| KitchenError::UnknownModule(name.to_string()))
    }

    /// Delivered orders equal the required ones, in the same order.
    pub fn orders_met(&self) -> bool {
        self.delivered == self.required
    }

    // ── Chef actions ──

    /// Walk to the pantry, the window, or a station by name.
    pub fn goto(&mut self, name: &str) -> KitchenResult<&Location> {
        let target = match name {
            "Pantry" => Location::Pantry,
            "Window" => Location::Window,
            _ if self.stations.iter().any(|s| s.name() == name) => {
                Location::Station(name.to_string())
            }
            _ => return Err(KitchenError::UnknownLocation(name.to_string())),
        };
        self.location = target;
        Ok(&self.location)
    }

    /// Take one `name` from the pantry into the chef's hands, replacing
    /// anything already held.
    pub fn get(&mut self, name: &str) -> KitchenResult<&FoodItem> {
        self.require_location("GET", Location::Pantry)?;
        let item = self.pantry.take(name)?;
        Ok(self.hands.insert(item))
    }

    /// Hand the held item over at the window.
    pub fn deliver(&mut self) -> KitchenResult<FoodItem> {
        self.require_location("DELIVER", Location::Window)?;
        let item = self.hands.take().ok_or(KitchenError::EmptyHands)?;
        self.delivered.push(item.clone());
        Ok(item)
    }

    /// Move the held item into a module slot. The chef must be holding an
    /// item called `item`.
    pub fn place(&mut self, module: &str, item: &str, slot: i64) -> KitchenResult<()> {
        self.module(module)?;
        let held = match &self.hands {
            Some(held) if held.name() == item => held.clone(),
            Some(held) => {
                return Err(KitchenError::NotHolding {
                    item: item.to_string(),
                    held: held.name().to_string(),
                })
            }
            None => return Err(KitchenError::EmptyHands),
        };
        self.module_mut(module)?.place(held, slot)?;
        self.hands = None;
        Ok(())
    }

    pub fn activate(&mut self, module: &str) -> KitchenResult<FoodItem> {
        self.module_mut(module)?.activate()
    }

    /// Pick up a module's output. An empty output leaves the chef
    /// empty-handed and yields `None`.
    pub fn take(&mut self, module: &str) -> KitchenResult<Option<FoodItem>> {
        let output = self.module_mut(module)?.take();
        self.hands = output.clone();
        Ok(output)
    }

    fn require_location(&self, action: &str, required: Location) -> KitchenResult<()> {
        if self.location == required {
            Ok(())
        } else {
            Err(KitchenError::WrongLocation {
                action: action.to_string(),
                required: required.to_string(),
                actual: self.location.to_string(),
            })
        }
    }
}
