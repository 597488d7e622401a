// Provider-specific image generation parameters
//
// Each provider family accepts its own small set of fields. They are
// modelled as a tagged union so a DALL-E request can never carry Imagen
// fields, and the free-form `CustomFields` map is checked against the
// family's allow-list before anything is forwarded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{DialError, Result};

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = DialError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(DialError::Validation(format!(
                        "invalid {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Size of a DALL-E image
    ImageSize {
        Square => "1024x1024",
        HeightRectangle => "1024x1792",
        WidthRectangle => "1792x1024",
    }
}

wire_enum! {
    /// `hd` creates images with finer details and greater consistency
    ImageQuality {
        Standard => "standard",
        Hd => "hd",
    }
}

wire_enum! {
    /// `vivid` leans towards hyper-real, dramatic images; `natural` does not
    ImageStyle {
        Natural => "natural",
        Vivid => "vivid",
    }
}

wire_enum! {
    AspectRatio {
        Square => "1:1",
        Portrait => "9:16",
        Landscape => "16:9",
        Portrait34 => "3:4",
        Landscape43 => "4:3",
    }
}

pub const MAX_SAMPLE_COUNT: u8 = 4;

// ============================================================================
// CUSTOM FIELDS MAP
// ============================================================================

/// Primitive value allowed in a custom field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Typed key-value map forwarded to the gateway as generation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFields(BTreeMap<String, FieldValue>);

impl CustomFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject any key the provider family does not accept
    pub fn validate(&self, family: ProviderFamily) -> Result<()> {
        let allowed = family.allowed_fields();
        match self.0.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(DialError::Validation(format!(
                "field '{}' is not supported by {} deployments (allowed: {})",
                key,
                family,
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }

    fn string_field<T: FromStr<Err = DialError>>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .ok_or_else(|| DialError::Validation(format!("field '{key}' must be a string")))?
                .parse()
                .map(Some),
        }
    }
}

// ============================================================================
// PROVIDER FAMILIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    /// DALL-E deployments
    OpenAi,
    /// Imagen deployments
    Google,
}

const OPENAI_FIELDS: &[&str] = &["size", "quality", "style"];
const GOOGLE_FIELDS: &[&str] = &["aspectRatio", "sampleCount", "negativePrompt"];

impl ProviderFamily {
    /// Recognize the image-generation family from a deployment name
    pub fn from_deployment(deployment_name: &str) -> Option<Self> {
        let name = deployment_name.to_ascii_lowercase();
        if name.starts_with("dall-e") {
            Some(Self::OpenAi)
        } else if name.starts_with("imagegeneration") || name.starts_with("imagen") {
            Some(Self::Google)
        } else {
            None
        }
    }

    pub fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => OPENAI_FIELDS,
            Self::Google => GOOGLE_FIELDS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PARAMETER SETS
// ============================================================================

/// DALL-E parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DalleParams {
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub style: ImageStyle,
}

impl Default for DalleParams {
    fn default() -> Self {
        Self {
            size: ImageSize::Square,
            quality: ImageQuality::Standard,
            style: ImageStyle::Vivid,
        }
    }
}

impl DalleParams {
    pub fn new(size: ImageSize, quality: ImageQuality, style: ImageStyle) -> Self {
        Self {
            size,
            quality,
            style,
        }
    }
}

/// Imagen parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagenParams {
    pub aspect_ratio: AspectRatio,
    pub sample_count: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

impl Default for ImagenParams {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Square,
            sample_count: 1,
            negative_prompt: None,
        }
    }
}

impl ImagenParams {
    pub fn new(aspect_ratio: AspectRatio, sample_count: u8) -> Self {
        Self {
            aspect_ratio,
            sample_count,
            negative_prompt: None,
        }
    }

    pub fn with_negative_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(prompt.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum GenerationParams {
    #[serde(rename = "openai")]
    OpenAi(DalleParams),
    Google(ImagenParams),
}

impl From<DalleParams> for GenerationParams {
    fn from(params: DalleParams) -> Self {
        Self::OpenAi(params)
    }
}

impl From<ImagenParams> for GenerationParams {
    fn from(params: ImagenParams) -> Self {
        Self::Google(params)
    }
}

impl GenerationParams {
    pub fn family(&self) -> ProviderFamily {
        match self {
            Self::OpenAi(_) => ProviderFamily::OpenAi,
            Self::Google(_) => ProviderFamily::Google,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Self::Google(params) = self {
            if params.sample_count == 0 || params.sample_count > MAX_SAMPLE_COUNT {
                return Err(DialError::Validation(format!(
                    "sampleCount must be between 1 and {}, got {}",
                    MAX_SAMPLE_COUNT, params.sample_count
                )));
            }
        }
        Ok(())
    }

    /// Flatten into the wire map, using each provider's field names
    pub fn to_fields(&self) -> CustomFields {
        match self {
            Self::OpenAi(p) => CustomFields::new()
                .with("size", p.size.as_str())
                .with("quality", p.quality.as_str())
                .with("style", p.style.as_str()),
            Self::Google(p) => {
                let mut fields = CustomFields::new()
                    .with("aspectRatio", p.aspect_ratio.as_str())
                    .with("sampleCount", i64::from(p.sample_count));
                if let Some(prompt) = &p.negative_prompt {
                    fields.insert("negativePrompt", prompt.as_str());
                }
                fields
            }
        }
    }

    /// Parse a free-form map for a provider family
    ///
    /// Unknown keys and invalid values are rejected; missing keys take the
    /// family's defaults.
    pub fn from_fields(family: ProviderFamily, fields: &CustomFields) -> Result<Self> {
        fields.validate(family)?;

        let params = match family {
            ProviderFamily::OpenAi => {
                let defaults = DalleParams::default();
                Self::OpenAi(DalleParams {
                    size: fields.string_field("size")?.unwrap_or(defaults.size),
                    quality: fields.string_field("quality")?.unwrap_or(defaults.quality),
                    style: fields.string_field("style")?.unwrap_or(defaults.style),
                })
            }
            ProviderFamily::Google => {
                let defaults = ImagenParams::default();
                let sample_count = match fields.get("sampleCount") {
                    None => defaults.sample_count,
                    Some(value) => value
                        .as_i64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| {
                            DialError::Validation(
                                "field 'sampleCount' must be a small positive integer".to_string(),
                            )
                        })?,
                };
                let negative_prompt = match fields.get("negativePrompt") {
                    None => None,
                    Some(value) => Some(
                        value
                            .as_str()
                            .ok_or_else(|| {
                                DialError::Validation(
                                    "field 'negativePrompt' must be a string".to_string(),
                                )
                            })?
                            .to_string(),
                    ),
                };
                Self::Google(ImagenParams {
                    aspect_ratio: fields
                        .string_field("aspectRatio")?
                        .unwrap_or(defaults.aspect_ratio),
                    sample_count,
                    negative_prompt,
                })
            }
        };

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dalle_fields_wire_names() {
        let params = GenerationParams::from(DalleParams::new(
            ImageSize::Square,
            ImageQuality::Hd,
            ImageStyle::Vivid,
        ));
        let json = serde_json::to_value(params.to_fields()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"size": "1024x1024", "quality": "hd", "style": "vivid"})
        );
    }

    #[test]
    fn test_imagen_fields_wire_names() {
        let params = GenerationParams::from(ImagenParams::new(AspectRatio::Landscape, 2));
        let json = serde_json::to_value(params.to_fields()).unwrap();
        assert_eq!(json, serde_json::json!({"aspectRatio": "16:9", "sampleCount": 2}));
    }

    #[test]
    fn test_validate_rejects_foreign_field() {
        let fields = CustomFields::new().with("size", "1024x1024").with("aspectRatio", "1:1");
        let err = fields.validate(ProviderFamily::OpenAi).unwrap_err();
        assert!(matches!(err, DialError::Validation(_)));
        assert!(err.to_string().contains("aspectRatio"));
    }

    #[test]
    fn test_from_fields_parses_dalle() {
        let fields = CustomFields::new()
            .with("size", "1792x1024")
            .with("quality", "hd");
        let params = GenerationParams::from_fields(ProviderFamily::OpenAi, &fields).unwrap();
        assert_eq!(
            params,
            GenerationParams::OpenAi(DalleParams {
                size: ImageSize::WidthRectangle,
                quality: ImageQuality::Hd,
                style: ImageStyle::Vivid,
            })
        );
    }

    #[test]
    fn test_from_fields_rejects_bad_value() {
        let fields = CustomFields::new().with("style", "baroque");
        assert!(GenerationParams::from_fields(ProviderFamily::OpenAi, &fields).is_err());
    }

    #[test]
    fn test_sample_count_range() {
        let fields = CustomFields::new().with("sampleCount", 9_i64);
        assert!(GenerationParams::from_fields(ProviderFamily::Google, &fields).is_err());

        let params = GenerationParams::Google(ImagenParams::new(AspectRatio::Square, 0));
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_family_from_deployment() {
        assert_eq!(ProviderFamily::from_deployment("dall-e-3"), Some(ProviderFamily::OpenAi));
        assert_eq!(
            ProviderFamily::from_deployment("imagegeneration@005"),
            Some(ProviderFamily::Google)
        );
        assert_eq!(ProviderFamily::from_deployment("gpt-4o"), None);
    }

    #[test]
    fn test_enum_parse_roundtrip() {
        for size in ImageSize::ALL {
            assert_eq!(size.as_str().parse::<ImageSize>().unwrap(), *size);
        }
        assert!("2048x2048".parse::<ImageSize>().is_err());
    }
}
