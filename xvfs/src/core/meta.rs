// SPDX-License-Identifier: MIT

/// Trait implemented by each FS-specific Meta structure.
/// Provides access to the static layout needed while checking.
pub trait FsMeta<Unit: Ord + Copy> {
    /// Size of one allocation unit in bytes.
    fn unit_size(&self) -> usize;

    /// Offset (in bytes) on disk of a given allocation unit.
    fn unit_offset(&self, unit: Unit) -> u64;

    /// First unit of the data region.
    fn first_data_unit(&self) -> Unit;

    /// One past the last unit of the data region.
    fn end_data_unit(&self) -> Unit;

    /// Check if a given unit lies in the data region.
    fn is_valid_unit(&self, unit: Unit) -> bool {
        unit >= self.first_data_unit() && unit < self.end_data_unit()
    }
}
