//! User settings — a key/value mapping with a known default key set.
//!
//! Settings are stored as a JSON object so that keys written by newer (or
//! older) versions survive a load/save cycle untouched. Typed accessors fall
//! back to the default whenever the stored value has the wrong shape.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::eq::{EqPreset, EqValues};

pub type SettingsMap = Map<String, Value>;

/// Every setting the current schema knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    TitleGlow,
    DynamicIsland,
    ShowMessages,
    VisualEffects,
    MusicVisualizer,
    AiDjEnabled,
    AiFeaturesEnabled,
    ActiveTheme,
    ActiveEqPreset,
    CustomEqValues,
    PlayerSkin,
    ControlStyle,
    FontStyle,
    CustomPrimaryColor,
    CustomSecondaryColor,
    UseCustomTheme,
    AnimationSpeed,
    ColorIntensity,
    CustomBackground,
    BackgroundBlur,
}

impl SettingKey {
    pub const ALL: [SettingKey; 20] = [
        SettingKey::TitleGlow,
        SettingKey::DynamicIsland,
        SettingKey::ShowMessages,
        SettingKey::VisualEffects,
        SettingKey::MusicVisualizer,
        SettingKey::AiDjEnabled,
        SettingKey::AiFeaturesEnabled,
        SettingKey::ActiveTheme,
        SettingKey::ActiveEqPreset,
        SettingKey::CustomEqValues,
        SettingKey::PlayerSkin,
        SettingKey::ControlStyle,
        SettingKey::FontStyle,
        SettingKey::CustomPrimaryColor,
        SettingKey::CustomSecondaryColor,
        SettingKey::UseCustomTheme,
        SettingKey::AnimationSpeed,
        SettingKey::ColorIntensity,
        SettingKey::CustomBackground,
        SettingKey::BackgroundBlur,
    ];

    /// Keys added after the first release; a falsy stored value is reset to
    /// the default on load.
    const BACKFILLED: [SettingKey; 3] = [
        SettingKey::PlayerSkin,
        SettingKey::ControlStyle,
        SettingKey::FontStyle,
    ];

    /// Name used in the persisted JSON record.
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::TitleGlow => "titleGlow",
            SettingKey::DynamicIsland => "dynamicIsland",
            SettingKey::ShowMessages => "showMessages",
            SettingKey::VisualEffects => "visualEffects",
            SettingKey::MusicVisualizer => "musicVisualizer",
            SettingKey::AiDjEnabled => "aiDjEnabled",
            SettingKey::AiFeaturesEnabled => "aiFeaturesEnabled",
            SettingKey::ActiveTheme => "activeTheme",
            SettingKey::ActiveEqPreset => "activeEqPreset",
            SettingKey::CustomEqValues => "customEqValues",
            SettingKey::PlayerSkin => "playerSkin",
            SettingKey::ControlStyle => "controlStyle",
            SettingKey::FontStyle => "fontStyle",
            SettingKey::CustomPrimaryColor => "customPrimaryColor",
            SettingKey::CustomSecondaryColor => "customSecondaryColor",
            SettingKey::UseCustomTheme => "useCustomTheme",
            SettingKey::AnimationSpeed => "animationSpeed",
            SettingKey::ColorIntensity => "colorIntensity",
            SettingKey::CustomBackground => "customBackground",
            SettingKey::BackgroundBlur => "backgroundBlur",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn default_value(self) -> Value {
        match self {
            SettingKey::TitleGlow
            | SettingKey::DynamicIsland
            | SettingKey::ShowMessages
            | SettingKey::VisualEffects
            | SettingKey::MusicVisualizer
            | SettingKey::AiFeaturesEnabled => Value::Bool(true),
            SettingKey::AiDjEnabled | SettingKey::UseCustomTheme => Value::Bool(false),
            SettingKey::ActiveTheme => json!("aura-default"),
            SettingKey::ActiveEqPreset => json!(EqPreset::Flat.key()),
            SettingKey::CustomEqValues => json!({ "low": 0, "mid": 0, "high": 0 }),
            SettingKey::PlayerSkin => json!("skin-default"),
            SettingKey::ControlStyle => json!("standard"),
            SettingKey::FontStyle => json!("font-inter"),
            SettingKey::CustomPrimaryColor => json!("#00c6ff"),
            SettingKey::CustomSecondaryColor => json!("#0072ff"),
            SettingKey::AnimationSpeed => json!(1),
            SettingKey::ColorIntensity => json!(100),
            SettingKey::CustomBackground => json!(""),
            SettingKey::BackgroundBlur => json!(5),
        }
    }
}

/// How the player view draws playback progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlStyle {
    #[default]
    Standard,
    Dial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(SettingsMap);

impl Default for Settings {
    fn default() -> Self {
        let map = SettingKey::ALL
            .into_iter()
            .map(|k| (k.name().to_string(), k.default_value()))
            .collect();
        Self(map)
    }
}

impl Settings {
    /// Lay `persisted` over the defaults key by key.
    ///
    /// Persisted values win, keys missing from `persisted` keep their
    /// default, and keys the current schema does not know are kept as-is.
    pub fn merged(persisted: SettingsMap) -> Self {
        let mut settings = Self::default();
        settings.0.extend(persisted);
        for key in SettingKey::BACKFILLED {
            if settings.get(key).map_or(true, is_falsy) {
                settings.0.insert(key.name().to_string(), key.default_value());
            }
        }
        settings
    }

    pub fn as_map(&self) -> &SettingsMap {
        &self.0
    }

    pub fn into_map(self) -> SettingsMap {
        self.0
    }

    pub fn get(&self, key: SettingKey) -> Option<&Value> {
        self.0.get(key.name())
    }

    pub fn set(&mut self, key: SettingKey, value: impl Into<Value>) {
        self.0.insert(key.name().to_string(), value.into());
    }

    /// True when every key of the current schema is present.
    pub fn has_all_known_keys(&self) -> bool {
        SettingKey::ALL
            .into_iter()
            .all(|k| self.0.contains_key(k.name()))
    }

    /// Stored keys that the current schema does not define.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|name| SettingKey::from_name(name).is_none())
            .collect()
    }

    pub fn flag(&self, key: SettingKey) -> bool {
        self.get(key)
            .and_then(Value::as_bool)
            .or_else(|| key.default_value().as_bool())
            .unwrap_or(false)
    }

    pub fn text(&self, key: SettingKey) -> String {
        match self.get(key).and_then(Value::as_str) {
            Some(s) => s.to_string(),
            None => key.default_value().as_str().unwrap_or_default().to_string(),
        }
    }

    pub fn number(&self, key: SettingKey) -> f64 {
        self.get(key)
            .and_then(Value::as_f64)
            .or_else(|| key.default_value().as_f64())
            .unwrap_or(0.0)
    }

    pub fn music_visualizer(&self) -> bool {
        self.flag(SettingKey::MusicVisualizer)
    }

    pub fn ai_features_enabled(&self) -> bool {
        self.flag(SettingKey::AiFeaturesEnabled)
    }

    pub fn control_style(&self) -> ControlStyle {
        match self.text(SettingKey::ControlStyle).as_str() {
            "dial" => ControlStyle::Dial,
            _ => ControlStyle::Standard,
        }
    }

    /// Unknown preset names fall back to flat.
    pub fn eq_preset(&self) -> EqPreset {
        EqPreset::from_key(&self.text(SettingKey::ActiveEqPreset)).unwrap_or(EqPreset::Flat)
    }

    pub fn custom_eq_values(&self) -> EqValues {
        self.get(SettingKey::CustomEqValues)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Gains the equalizer should currently apply.
    pub fn effective_eq(&self) -> EqValues {
        self.eq_preset().resolve(self.custom_eq_values())
    }

    /// Colours for the theme: the custom pair when enabled, otherwise `None`
    /// and the renderer uses `activeTheme`.
    pub fn custom_colors(&self) -> Option<(String, String)> {
        if !self.flag(SettingKey::UseCustomTheme) {
            return None;
        }
        Some((
            self.text(SettingKey::CustomPrimaryColor),
            self.text(SettingKey::CustomSecondaryColor),
        ))
    }
}

/// JavaScript-style falsiness, which is what older records relied on.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0 || f.is_nan()),
        Value::Array(_) | Value::Object(_) => false,
    }
}
