//! Three-band equalizer presets.

use serde::{Deserialize, Serialize};

/// Gains in dB for the low shelf, mid peak and high shelf filters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EqValues {
    #[serde(default)]
    pub low: f32,
    #[serde(default)]
    pub mid: f32,
    #[serde(default)]
    pub high: f32,
}

impl EqValues {
    pub const fn new(low: f32, mid: f32, high: f32) -> Self {
        Self { low, mid, high }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqPreset {
    Flat,
    BassBoost,
    VocalBoost,
    TrebleBoost,
    Custom,
}

impl EqPreset {
    pub const ALL: [EqPreset; 5] = [
        EqPreset::Flat,
        EqPreset::BassBoost,
        EqPreset::VocalBoost,
        EqPreset::TrebleBoost,
        EqPreset::Custom,
    ];

    /// Key stored in the `activeEqPreset` setting.
    pub fn key(self) -> &'static str {
        match self {
            EqPreset::Flat => "flat",
            EqPreset::BassBoost => "bassBoost",
            EqPreset::VocalBoost => "vocalBoost",
            EqPreset::TrebleBoost => "trebleBoost",
            EqPreset::Custom => "custom",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            EqPreset::Flat => "Flat",
            EqPreset::BassBoost => "Bass Boost",
            EqPreset::VocalBoost => "Vocal Boost",
            EqPreset::TrebleBoost => "Treble Boost",
            EqPreset::Custom => "Custom",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            EqPreset::Flat => "fa-minus",
            EqPreset::BassBoost => "fa-drum",
            EqPreset::VocalBoost => "fa-microphone-lines",
            EqPreset::TrebleBoost => "fa-guitar",
            EqPreset::Custom => "fa-sliders",
        }
    }

    /// Fixed gains for the preset. `Custom` has none of its own.
    pub fn values(self) -> Option<EqValues> {
        match self {
            EqPreset::Flat => Some(EqValues::new(0.0, 0.0, 0.0)),
            EqPreset::BassBoost => Some(EqValues::new(6.0, -2.0, -2.0)),
            EqPreset::VocalBoost => Some(EqValues::new(-2.0, 5.0, 0.0)),
            EqPreset::TrebleBoost => Some(EqValues::new(-2.0, -2.0, 6.0)),
            EqPreset::Custom => None,
        }
    }

    /// Gains to apply: the preset's own, or `custom` for [`EqPreset::Custom`].
    pub fn resolve(self, custom: EqValues) -> EqValues {
        self.values().unwrap_or(custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_keys_round_trip() {
        for preset in EqPreset::ALL {
            assert_eq!(EqPreset::from_key(preset.key()), Some(preset));
        }
        assert_eq!(EqPreset::from_key("loudness"), None);
    }

    #[test]
    fn test_custom_resolves_to_user_values() {
        let custom = EqValues::new(3.0, 1.5, -4.0);
        assert_eq!(EqPreset::Custom.resolve(custom), custom);
        assert_eq!(
            EqPreset::BassBoost.resolve(custom),
            EqValues::new(6.0, -2.0, -2.0)
        );
    }
}
