//! Material property container.
//!
//! `Properties` holds the scalar material values of a simulation entity keyed
//! by `PropertyKey`, plus lookup tables keyed by an ordered
//! `(input, output)` key pair. Cloning produces a fully independent copy:
//! values, tables and sub-properties are owned by value, so no mutation of a
//! clone is ever visible through the original.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use crate::error::{PropertiesError, PropertiesResult};
use crate::keys::PropertyKey;
use crate::table::PiecewiseLinearTable;
use crate::types::LookupConfig;
use crate::{log_debug, log_trace};

/// Composite key of a table association. Order matters: `(TEMPERATURE,
/// YOUNG_MODULUS)` and `(YOUNG_MODULUS, TEMPERATURE)` are different tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableKey {
    pub input: PropertyKey,
    pub output: PropertyKey,
}

impl TableKey {
    pub fn new(input: PropertyKey, output: PropertyKey) -> Self {
        Self { input, output }
    }
}

/// Identified container of scalar material values and lookup tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
    id: u32,
    values: BTreeMap<PropertyKey, f64>,
    tables: BTreeMap<TableKey, PiecewiseLinearTable>,
    sub_properties: BTreeMap<u32, Properties>,
    config: LookupConfig,
}

impl Properties {
    /// Create an empty container with the given id.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Create an empty container with an explicit lookup configuration.
    pub fn with_config(id: u32, config: LookupConfig) -> Self {
        Self {
            id,
            config,
            ..Self::default()
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn config(&self) -> LookupConfig {
        self.config
    }

    pub fn set_config(&mut self, config: LookupConfig) {
        self.config = config;
    }

    // ------------------------------------------------------------------------
    // Scalar values
    // ------------------------------------------------------------------------

    /// Insert or overwrite the value stored for `key`.
    pub fn set_value(&mut self, key: PropertyKey, value: f64) {
        log_trace!("Properties {}: set {} = {}", self.id, key, value);
        self.values.insert(key, value);
    }

    /// Value stored for `key`.
    ///
    /// # Errors
    /// `KeyNotFound` if no value was set for `key`.
    pub fn get_value(&self, key: PropertyKey) -> PropertiesResult<f64> {
        self.values
            .get(&key)
            .copied()
            .ok_or_else(|| PropertiesError::key_not_found(key.name()))
    }

    /// Mutable slot of a value that was already set.
    ///
    /// Writes through subscripts are not offered: a slot for an absent key
    /// would have to be invented before the caller could assign it.
    ///
    /// # Errors
    /// `KeyNotFound` if no value was set for `key`.
    pub fn value_mut(&mut self, key: PropertyKey) -> PropertiesResult<&mut f64> {
        self.values
            .get_mut(&key)
            .ok_or_else(|| PropertiesError::key_not_found(key.name()))
    }

    /// Value stored for `key`, or `default` when absent.
    pub fn get_value_or(&self, key: PropertyKey, default: f64) -> f64 {
        self.values.get(&key).copied().unwrap_or(default)
    }

    pub fn has(&self, key: PropertyKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Remove the value stored for `key`. Absent keys are ignored.
    pub fn erase(&mut self, key: PropertyKey) {
        self.values.remove(&key);
    }

    /// Keys with a stored value, ordered by key id.
    pub fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.values.keys().copied()
    }

    /// Stored `(key, value)` pairs, ordered by key id.
    pub fn values(&self) -> impl Iterator<Item = (PropertyKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn number_of_values(&self) -> usize {
        self.values.len()
    }

    pub fn has_variables(&self) -> bool {
        !self.values.is_empty()
    }

    // ------------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------------

    /// Associate `table` with the ordered pair `(input, output)`, replacing
    /// any table already registered for exactly that pair.
    pub fn set_table(&mut self, input: PropertyKey, output: PropertyKey, table: PiecewiseLinearTable) {
        let replaced = self.tables.insert(TableKey::new(input, output), table);
        if replaced.is_some() {
            log_debug!(
                "Properties {}: replaced table {} -> {}",
                self.id,
                input,
                output
            );
        }
    }

    pub fn has_table(&self, input: PropertyKey, output: PropertyKey) -> bool {
        self.tables.contains_key(&TableKey::new(input, output))
    }

    /// Table registered for `(input, output)`.
    ///
    /// # Errors
    /// `TableNotFound` if no table exists for that exact pair.
    pub fn get_table(&self, input: PropertyKey, output: PropertyKey) -> PropertiesResult<&PiecewiseLinearTable> {
        self.tables
            .get(&TableKey::new(input, output))
            .ok_or_else(|| PropertiesError::table_not_found(input.name(), output.name()))
    }

    pub fn get_table_mut(
        &mut self,
        input: PropertyKey,
        output: PropertyKey,
    ) -> PropertiesResult<&mut PiecewiseLinearTable> {
        self.tables
            .get_mut(&TableKey::new(input, output))
            .ok_or_else(|| PropertiesError::table_not_found(input.name(), output.name()))
    }

    /// Remove the table for `(input, output)`. Absent pairs are ignored.
    pub fn erase_table(&mut self, input: PropertyKey, output: PropertyKey) {
        self.tables.remove(&TableKey::new(input, output));
    }

    /// Evaluate the `(input, output)` table at `x` using this container's
    /// boundary policy.
    pub fn get_value_from_table(
        &self,
        input: PropertyKey,
        output: PropertyKey,
        x: f64,
    ) -> PropertiesResult<f64> {
        self.get_table(input, output)?
            .get_value_with(x, self.config.policy())
    }

    /// Registered tables, ordered by `(input, output)`.
    pub fn tables(&self) -> impl Iterator<Item = (TableKey, &PiecewiseLinearTable)> + '_ {
        self.tables.iter().map(|(k, t)| (*k, t))
    }

    pub fn number_of_tables(&self) -> usize {
        self.tables.len()
    }

    pub fn has_tables(&self) -> bool {
        !self.tables.is_empty()
    }

    // ------------------------------------------------------------------------
    // Sub-properties
    // ------------------------------------------------------------------------

    /// Attach a child container, replacing any child with the same id.
    pub fn add_sub_properties(&mut self, sub: Properties) {
        log_debug!("Properties {}: add sub-properties {}", self.id, sub.id);
        self.sub_properties.insert(sub.id, sub);
    }

    pub fn has_sub_properties(&self, id: u32) -> bool {
        self.sub_properties.contains_key(&id)
    }

    pub fn get_sub_properties(&self, id: u32) -> PropertiesResult<&Properties> {
        self.sub_properties
            .get(&id)
            .ok_or(PropertiesError::sub_properties_not_found(id))
    }

    pub fn get_sub_properties_mut(&mut self, id: u32) -> PropertiesResult<&mut Properties> {
        self.sub_properties
            .get_mut(&id)
            .ok_or(PropertiesError::sub_properties_not_found(id))
    }

    pub fn sub_properties(&self) -> impl Iterator<Item = &Properties> + '_ {
        self.sub_properties.values()
    }

    pub fn number_of_sub_properties(&self) -> usize {
        self.sub_properties.len()
    }

    // ------------------------------------------------------------------------
    // Whole-container operations
    // ------------------------------------------------------------------------

    /// No values, no tables and no sub-properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.tables.is_empty() && self.sub_properties.is_empty()
    }

    /// Drop all values, tables and sub-properties. Id and config are kept.
    pub fn clear(&mut self) {
        self.values.clear();
        self.tables.clear();
        self.sub_properties.clear();
    }

    pub(crate) fn values_mut(&mut self) -> &mut BTreeMap<PropertyKey, f64> {
        &mut self.values
    }
}

impl From<&Properties> for Properties {
    fn from(other: &Properties) -> Self {
        other.clone()
    }
}

impl Index<PropertyKey> for Properties {
    type Output = f64;

    /// # Panics
    /// Panics if no value is stored for `key`; use `get_value` to handle absence.
    fn index(&self, key: PropertyKey) -> &f64 {
        match self.values.get(&key) {
            Some(value) => value,
            None => panic!("Key not found: {}", key),
        }
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Properties")?;
        writeln!(f, "Id : {}", self.id)?;
        writeln!(f, "This properties contains {} tables", self.tables.len())?;
        for (key, table) in &self.tables {
            writeln!(f, "Table for input {} and output {}", key.input, key.output)?;
            write!(f, "{}", table)?;
        }
        for (key, value) in &self.values {
            writeln!(f, "{} : {}", key, value)?;
        }
        if !self.sub_properties.is_empty() {
            writeln!(
                f,
                "This properties has {} subproperties",
                self.sub_properties.len()
            )?;
            for sub in self.sub_properties.values() {
                write!(f, "{}", sub)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{DENSITY, PRESSURE, TEMPERATURE, YOUNG_MODULUS};
    use crate::types::BoundaryPolicy;

    fn two_point_table() -> PiecewiseLinearTable {
        let mut table = PiecewiseLinearTable::new();
        table.add_row(9.0, 1.0);
        table.add_row(10.0, 1.0);
        table
    }

    #[test]
    fn test_set_get_has() {
        let mut props = Properties::new(1);
        assert!(!props.has(YOUNG_MODULUS));
        props.set_value(YOUNG_MODULUS, 1.0);
        assert!(props.has(YOUNG_MODULUS));
        assert_eq!(props.get_value(YOUNG_MODULUS).unwrap(), 1.0);
        assert_eq!(props.keys().collect::<Vec<_>>(), vec![YOUNG_MODULUS]);
        assert_eq!(props.number_of_values(), 1);
    }

    #[test]
    fn test_get_missing_key() {
        let props = Properties::new(1);
        assert_eq!(
            props.get_value(DENSITY),
            Err(PropertiesError::key_not_found("DENSITY"))
        );
        assert_eq!(props.get_value_or(DENSITY, 7.5), 7.5);
    }

    #[test]
    fn test_zero_is_not_absence() {
        let mut props = Properties::new(1);
        props.set_value(PRESSURE, 0.0);
        assert!(props.has(PRESSURE));
        props.erase(PRESSURE);
        assert!(!props.has(PRESSURE));
    }

    #[test]
    fn test_erase_absent_is_noop() {
        let mut props = Properties::new(1);
        props.erase(TEMPERATURE);
        assert!(props.is_empty());
    }

    #[test]
    fn test_index_sugar() {
        let mut props = Properties::new(2);
        props.set_value(TEMPERATURE, 15.0);
        props.set_value(PRESSURE, 25.0);
        assert_eq!(props[TEMPERATURE], 15.0);
        assert_eq!(props[PRESSURE], props.get_value(PRESSURE).unwrap());
    }

    #[test]
    fn test_value_mut_existing_key() {
        let mut props = Properties::new(1);
        props.set_value(DENSITY, 3.0);
        *props.value_mut(DENSITY).unwrap() *= 2.0;
        assert_eq!(props.get_value(DENSITY).unwrap(), 6.0);
    }

    #[test]
    fn test_value_mut_missing_key_does_not_create_it() {
        let mut props = Properties::new(1);
        match props.value_mut(DENSITY) {
            Ok(slot) => *slot *= 2.0,
            Err(err) => assert_eq!(err, PropertiesError::key_not_found("DENSITY")),
        }
        assert!(!props.has(DENSITY));
        assert!(props.get_value(DENSITY).is_err());
        assert!(props.is_empty());
    }

    #[test]
    #[should_panic(expected = "Key not found: DENSITY")]
    fn test_index_missing_panics() {
        let props = Properties::new(1);
        let _value: f64 = props[DENSITY];
    }

    #[test]
    fn test_clone_is_independent() {
        let mut props = Properties::new(1);
        props.set_value(YOUNG_MODULUS, 1.0);
        props.set_table(TEMPERATURE, YOUNG_MODULUS, two_point_table());

        let mut cloned = Properties::from(&props);
        assert_eq!(cloned.id(), 1);
        cloned.set_value(YOUNG_MODULUS, 10.0);
        cloned.get_table_mut(TEMPERATURE, YOUNG_MODULUS).unwrap().add_row(11.0, 2.0);

        assert_eq!(props.get_value(YOUNG_MODULUS).unwrap(), 1.0);
        assert_eq!(cloned.get_value(YOUNG_MODULUS).unwrap(), 10.0);
        assert_eq!(props.get_table(TEMPERATURE, YOUNG_MODULUS).unwrap().len(), 2);
        assert_eq!(cloned.get_table(TEMPERATURE, YOUNG_MODULUS).unwrap().len(), 3);
    }

    #[test]
    fn test_table_pair_is_exact() {
        let mut props = Properties::new(1);
        props.set_table(TEMPERATURE, YOUNG_MODULUS, two_point_table());
        assert!(props.has_table(TEMPERATURE, YOUNG_MODULUS));
        assert!(!props.has_table(TEMPERATURE, PRESSURE));
        assert!(!props.has_table(YOUNG_MODULUS, TEMPERATURE));
        assert!(props.get_table(TEMPERATURE, PRESSURE).is_err());
    }

    #[test]
    fn test_set_table_overwrites_pair() {
        let mut props = Properties::new(1);
        props.set_table(TEMPERATURE, YOUNG_MODULUS, two_point_table());
        props.set_table(TEMPERATURE, YOUNG_MODULUS, PiecewiseLinearTable::new());
        assert_eq!(props.number_of_tables(), 1);
        assert!(props.get_table(TEMPERATURE, YOUNG_MODULUS).unwrap().is_empty());
        props.erase_table(TEMPERATURE, YOUNG_MODULUS);
        assert!(!props.has_tables());
    }

    #[test]
    fn test_value_from_table_uses_config() {
        let mut table = PiecewiseLinearTable::new();
        table.add_row(0.0, 0.0);
        table.add_row(1.0, 2.0);

        let mut props = Properties::new(1);
        props.set_table(TEMPERATURE, YOUNG_MODULUS, table.clone());
        assert_eq!(props.get_value_from_table(TEMPERATURE, YOUNG_MODULUS, 2.0).unwrap(), 2.0);

        let mut extrapolating =
            Properties::with_config(2, LookupConfig::with_policy(BoundaryPolicy::Extrapolate));
        extrapolating.set_table(TEMPERATURE, YOUNG_MODULUS, table);
        assert_eq!(
            extrapolating.get_value_from_table(TEMPERATURE, YOUNG_MODULUS, 2.0).unwrap(),
            4.0
        );

        extrapolating.set_config(LookupConfig::default());
        assert_eq!(
            extrapolating.get_value_from_table(TEMPERATURE, YOUNG_MODULUS, 2.0).unwrap(),
            2.0
        );
    }

    #[test]
    fn test_sub_properties() {
        let mut parent = Properties::new(1);
        let mut child = Properties::new(10);
        child.set_value(DENSITY, 7850.0);
        parent.add_sub_properties(child);

        assert!(parent.has_sub_properties(10));
        assert!(!parent.has_sub_properties(11));
        assert_eq!(parent.number_of_sub_properties(), 1);
        assert_eq!(parent.sub_properties().map(|p| p.id()).collect::<Vec<_>>(), vec![10]);
        assert_eq!(
            parent.get_sub_properties(10).unwrap().get_value(DENSITY).unwrap(),
            7850.0
        );
        assert_eq!(
            parent.get_sub_properties(11).unwrap_err(),
            PropertiesError::sub_properties_not_found(11)
        );

        let mut cloned = parent.clone();
        cloned.get_sub_properties_mut(10).unwrap().set_value(DENSITY, 1.0);
        assert_eq!(
            parent.get_sub_properties(10).unwrap().get_value(DENSITY).unwrap(),
            7850.0
        );
    }

    #[test]
    fn test_clear_keeps_id() {
        let mut props = Properties::new(4);
        props.set_value(DENSITY, 1.0);
        props.set_table(TEMPERATURE, DENSITY, two_point_table());
        props.clear();
        assert!(props.is_empty());
        assert!(!props.has_variables());
        assert_eq!(props.id(), 4);

        props.set_id(5);
        assert_eq!(props.id(), 5);
    }

    #[test]
    fn test_display() {
        let mut props = Properties::new(1);
        props.set_table(TEMPERATURE, YOUNG_MODULUS, two_point_table());
        props.set_value(DENSITY, 12.0);
        let output = props.to_string();

        assert!(output.contains("Properties"));
        assert!(output.contains("Id : 1"));
        assert!(output.contains("This properties contains 1 tables"));
        assert!(output.contains("\t9\t\t1"));
        assert!(output.contains("\t10\t\t1"));
        assert!(output.contains("DENSITY : 12"));
        assert!(!output.contains("subproperties"));
    }
}
