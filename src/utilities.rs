//! Helpers that move data between `Properties` containers.

use crate::log_debug;
use crate::properties::Properties;

/// Namespace for container-to-container copy operations.
pub struct PropertiesUtilities;

impl PropertiesUtilities {
    /// Copy every scalar value of `source` into `destination`.
    ///
    /// Existing destination values for the same keys are overwritten; keys
    /// only present in `destination` are left as they are. Tables and
    /// sub-properties are not touched. Values are copied, so later changes to
    /// `source` are not seen by `destination`.
    pub fn copy_properties_values(source: &Properties, destination: &mut Properties) {
        log_debug!(
            "Copying {} values from properties {} to {}",
            source.number_of_values(),
            source.id(),
            destination.id()
        );
        for (key, value) in source.values() {
            destination.set_value(key, value);
        }
    }

    /// Make the scalar values of `destination` exactly those of `source`.
    ///
    /// Unlike `copy_properties_values`, destination-only keys are removed.
    /// Tables and sub-properties are not touched.
    pub fn replace_properties_values(source: &Properties, destination: &mut Properties) {
        log_debug!(
            "Replacing values of properties {} with those of {}",
            destination.id(),
            source.id()
        );
        let values = destination.values_mut();
        values.clear();
        values.extend(source.values());
    }

    /// Copy every table association of `source` into `destination`,
    /// overwriting tables registered for the same `(input, output)` pair.
    pub fn copy_properties_tables(source: &Properties, destination: &mut Properties) {
        for (key, table) in source.tables() {
            destination.set_table(key.input, key.output, table.clone());
        }
    }
}
