//! Process-wide options, as an explicit value rather than a global
//! singleton.

use serde::{Deserialize, Serialize};

/// Which core-loss model the wire/coil advisors should evaluate candidates
/// against.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CoreLossesModel {
    /// Improved generalised Steinmetz equation.
    Igse,
    /// A manufacturer-proprietary model.
    Proprietary,
    /// The loss-factor (tan δ) model.
    LossFactor,
    /// The classical Steinmetz equation.
    Steinmetz,
    /// The Roshen model.
    Roshen,
}

/// Domain-default constants that are not meant to be tuned per run; exposed
/// as associated constants rather than [`Settings`] fields because no
/// caller ever overrides them.
pub mod defaults {
    /// Fraction of a turn's radius treated as "surrounding" when searching
    /// for adjacent turns in the stray-capacitance engine.
    pub const OVERLAPPING_FACTOR_SURROUNDING_TURNS: f64 = 0.7;
    /// Relative tolerance within which a candidate's magnetising inductance
    /// is considered to satisfy the requirement.
    pub const MAGNETIZING_INDUCTANCE_THRESHOLD_VALIDITY: f64 = 0.25;
    /// The largest winding-group pattern length the coil advisor will
    /// enumerate permutations of.
    pub const MAXIMUM_COIL_PATTERN: usize = 6;
    /// Maximum allowed RMS current density, in amperes per square metre.
    pub const MAXIMUM_EFFECTIVE_CURRENT_DENSITY: f64 = 12e6;
    /// The largest number of parallel wire strands the wire advisor will
    /// consider for a single winding.
    pub const MAXIMUM_NUMBER_PARALLELS: u32 = 5;
}

/// Which wire kinds the wire advisor is allowed to propose.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireKindInclusion {
    pub round: bool,
    pub litz: bool,
    pub rectangular: bool,
    pub foil: bool,
    pub planar: bool,
}

impl Default for WireKindInclusion {
    fn default() -> Self {
        Self { round: true, litz: true, rectangular: true, foil: true, planar: true }
    }
}

/// Process-wide tunable options, constructed once via [`SettingsBuilder`]
/// and then passed by reference into advisor constructors. Mutation after
/// construction is intentionally not supported: build a new [`Settings`]
/// instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub use_toroidal_cores: bool,
    pub use_concentric_cores: bool,
    pub use_only_cores_in_stock: bool,
    pub coil_allow_margin_tape: bool,
    pub coil_allow_insulated_wire: bool,
    pub coil_adviser_maximum_number_wires: usize,
    pub wire_adviser_include: WireKindInclusion,
    pub core_losses_model_names: Vec<CoreLossesModel>,
    pub harmonic_amplitude_threshold: f64,
    pub magnetic_field_mirroring_dimension: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_toroidal_cores: true,
            use_concentric_cores: true,
            use_only_cores_in_stock: true,
            coil_allow_margin_tape: true,
            coil_allow_insulated_wire: true,
            coil_adviser_maximum_number_wires: 100,
            wire_adviser_include: WireKindInclusion::default(),
            core_losses_model_names: vec![
                CoreLossesModel::Igse,
                CoreLossesModel::Proprietary,
                CoreLossesModel::LossFactor,
                CoreLossesModel::Steinmetz,
                CoreLossesModel::Roshen,
            ],
            harmonic_amplitude_threshold: 0.05,
            magnetic_field_mirroring_dimension: 1,
        }
    }
}

/// Builds a [`Settings`] value, defaulting every option to its documented
/// default and overriding only what the caller sets explicitly.
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Starts from [`Settings::default`].
    pub fn new() -> Self {
        Self { settings: Settings::default() }
    }

    pub fn use_toroidal_cores(mut self, value: bool) -> Self {
        self.settings.use_toroidal_cores = value;
        self
    }

    pub fn use_concentric_cores(mut self, value: bool) -> Self {
        self.settings.use_concentric_cores = value;
        self
    }

    pub fn use_only_cores_in_stock(mut self, value: bool) -> Self {
        self.settings.use_only_cores_in_stock = value;
        self
    }

    pub fn coil_allow_margin_tape(mut self, value: bool) -> Self {
        self.settings.coil_allow_margin_tape = value;
        self
    }

    pub fn coil_allow_insulated_wire(mut self, value: bool) -> Self {
        self.settings.coil_allow_insulated_wire = value;
        self
    }

    pub fn coil_adviser_maximum_number_wires(mut self, value: usize) -> Self {
        self.settings.coil_adviser_maximum_number_wires = value;
        self
    }

    pub fn wire_adviser_include(mut self, value: WireKindInclusion) -> Self {
        self.settings.wire_adviser_include = value;
        self
    }

    pub fn core_losses_model_names(mut self, value: Vec<CoreLossesModel>) -> Self {
        self.settings.core_losses_model_names = value;
        self
    }

    pub fn harmonic_amplitude_threshold(mut self, value: f64) -> Self {
        self.settings.harmonic_amplitude_threshold = value;
        self
    }

    pub fn magnetic_field_mirroring_dimension(mut self, value: u8) -> Self {
        self.settings.magnetic_field_mirroring_dimension = value;
        self
    }

    /// Consumes the builder, producing the finished [`Settings`].
    pub fn build(self) -> Settings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_documented_defaults() {
        let settings = Settings::default();
        assert!(settings.use_toroidal_cores);
        assert_eq!(settings.coil_adviser_maximum_number_wires, 100);
        assert_eq!(settings.harmonic_amplitude_threshold, 0.05);
        assert_eq!(settings.core_losses_model_names.len(), 5);
    }

    #[test]
    fn builder_overrides_only_requested_fields() {
        let settings = SettingsBuilder::new().use_toroidal_cores(false).build();
        assert!(!settings.use_toroidal_cores);
        assert!(settings.use_concentric_cores);
    }
}
