//! Property key registry.
//!
//! Every physical attribute a `Properties` container can hold is identified by
//! a `PropertyKey`. The set of keys is fixed at load time: the constants below
//! are the only keys that exist, and the name/id lookup tables are built once
//! on first use and never modified afterwards.

use std::collections::HashMap;
use std::fmt;

use crate::error::{PropertiesError, PropertiesResult};

/// Identifier of a named physical attribute.
///
/// Keys compare and hash by their numeric id. Two keys with different ids
/// never refer to the same attribute.
#[derive(Debug, Clone, Copy)]
pub struct PropertyKey {
    id: u32,
    name: &'static str,
}

impl PropertyKey {
    const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Numeric id, stable across runs. Used as the key handle over FFI.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Upper-case attribute name, e.g. `"YOUNG_MODULUS"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a registered key by name.
    pub fn from_name(name: &str) -> PropertiesResult<Self> {
        KEYS_BY_NAME
            .get(name)
            .copied()
            .ok_or_else(|| PropertiesError::unknown_key(name))
    }

    /// Look up a registered key by numeric id.
    pub fn from_id(id: u32) -> PropertiesResult<Self> {
        KEYS_BY_ID
            .get(&id)
            .copied()
            .ok_or_else(|| PropertiesError::unknown_key(format!("#{}", id)))
    }

    /// All registered keys, ordered by id.
    pub fn all() -> &'static [PropertyKey] {
        ALL_KEYS
    }
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PropertyKey {}

impl std::hash::Hash for PropertyKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for PropertyKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropertyKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Registered Keys
// ============================================================================

pub const YOUNG_MODULUS: PropertyKey = PropertyKey::new(1, "YOUNG_MODULUS");
pub const POISSON_RATIO: PropertyKey = PropertyKey::new(2, "POISSON_RATIO");
pub const DENSITY: PropertyKey = PropertyKey::new(3, "DENSITY");
pub const TEMPERATURE: PropertyKey = PropertyKey::new(4, "TEMPERATURE");
pub const PRESSURE: PropertyKey = PropertyKey::new(5, "PRESSURE");
pub const THICKNESS: PropertyKey = PropertyKey::new(6, "THICKNESS");
pub const YIELD_STRESS: PropertyKey = PropertyKey::new(7, "YIELD_STRESS");
pub const THERMAL_EXPANSION_COEFFICIENT: PropertyKey =
    PropertyKey::new(8, "THERMAL_EXPANSION_COEFFICIENT");
pub const CONDUCTIVITY: PropertyKey = PropertyKey::new(9, "CONDUCTIVITY");
pub const SPECIFIC_HEAT: PropertyKey = PropertyKey::new(10, "SPECIFIC_HEAT");
pub const VISCOSITY: PropertyKey = PropertyKey::new(11, "VISCOSITY");

static ALL_KEYS: &[PropertyKey] = &[
    YOUNG_MODULUS,
    POISSON_RATIO,
    DENSITY,
    TEMPERATURE,
    PRESSURE,
    THICKNESS,
    YIELD_STRESS,
    THERMAL_EXPANSION_COEFFICIENT,
    CONDUCTIVITY,
    SPECIFIC_HEAT,
    VISCOSITY,
];

lazy_static::lazy_static! {
    static ref KEYS_BY_NAME: HashMap<&'static str, PropertyKey> =
        ALL_KEYS.iter().map(|k| (k.name, *k)).collect();
    static ref KEYS_BY_ID: HashMap<u32, PropertyKey> =
        ALL_KEYS.iter().map(|k| (k.id, *k)).collect();
}
