//! Key elements: geometry and physical binding.

use serde::{Deserialize, Deserializer, Serialize};

/// Axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyRect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl KeyRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns true if the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// A physical key a visual element reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Key name as reported by the input layer (`"a"`, `"left shift"`)
    pub name: String,
    /// Physical key code
    pub scan_code: u16,
}

impl KeyBinding {
    /// Creates a binding.
    pub fn new(name: impl Into<String>, scan_code: u16) -> Self {
        Self {
            name: name.into(),
            scan_code,
        }
    }
}

/// One visual key element of a layout.
///
/// Serialized flat so files stay compatible with the plain
/// `{"label","key_bind","scan_code","x","y","width","height"}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    /// Stable identifier, generated when the file has none
    #[serde(default = "new_key_id")]
    pub id: String,
    /// Display text
    #[serde(default)]
    pub label: String,
    /// Name of the bound key
    #[serde(default)]
    pub key_bind: String,
    /// Physical key code of the bound key
    #[serde(
        default,
        deserialize_with = "deserialize_scan_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub scan_code: Option<u16>,
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

/// Generates a fresh key id.
pub fn new_key_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accepts `12`, `12.0`, `"12"`, `null` or a missing field.
fn deserialize_scan_code<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Float(f64),
        Text(String),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(Raw::Number(n)) => u16::try_from(n)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("scan code out of range: {n}"))),
        Some(Raw::Float(f)) if f.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&f) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let code = f as u16;
            Ok(Some(code))
        }
        Some(Raw::Float(f)) => Err(serde::de::Error::custom(format!(
            "scan code out of range: {f}"
        ))),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<u16>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid scan code: {text:?}")))
        }
    }
}

impl KeyDefinition {
    /// Creates an unbound key.
    pub fn new(label: impl Into<String>, rect: KeyRect) -> Self {
        Self {
            id: new_key_id(),
            label: label.into(),
            key_bind: String::new(),
            scan_code: None,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }

    /// Creates a key bound to `binding`, labelled with the key name.
    pub fn bound(binding: &KeyBinding, rect: KeyRect) -> Self {
        let mut key = Self::new(binding.name.clone(), rect);
        key.bind(binding);
        key
    }

    /// Key geometry.
    #[must_use]
    pub const fn rect(&self) -> KeyRect {
        KeyRect::new(self.x, self.y, self.width, self.height)
    }

    /// Replaces the key geometry.
    pub fn set_rect(&mut self, rect: KeyRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Points the key at a new physical key.
    pub fn bind(&mut self, binding: &KeyBinding) {
        self.key_bind.clone_from(&binding.name);
        self.scan_code = Some(binding.scan_code);
    }

    /// Text to draw on the key; the binding name when the label is blank.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.key_bind
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = KeyRect::new(10, 20, 40, 30);
        assert!(rect.contains(10, 20));
        assert!(rect.contains(49, 49));
        assert!(!rect.contains(50, 20));
        assert!(!rect.contains(10, 50));
        assert!(!rect.contains(9, 25));
    }

    #[test]
    fn test_plain_key_record_deserializes() {
        let json = r#"{"label":"A","key_bind":"a","scan_code":30,"x":0,"y":0,"width":40,"height":40}"#;
        let key: KeyDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(key.scan_code, Some(30));
        assert!(!key.id.is_empty());
        assert_eq!(key.rect(), KeyRect::new(0, 0, 40, 40));
    }

    #[test]
    fn test_scan_code_accepts_string_and_null() {
        let key: KeyDefinition = serde_json::from_str(
            r#"{"key_bind":"b","scan_code":"48","x":1,"y":2,"width":40,"height":40}"#,
        )
        .unwrap();
        assert_eq!(key.scan_code, Some(48));

        let key: KeyDefinition =
            serde_json::from_str(r#"{"scan_code":null,"x":1,"y":2,"width":40,"height":40}"#)
                .unwrap();
        assert_eq!(key.scan_code, None);

        let bad = serde_json::from_str::<KeyDefinition>(
            r#"{"scan_code":"abc","x":1,"y":2,"width":40,"height":40}"#,
        );
        assert!(bad.is_err());

        let negative = serde_json::from_str::<KeyDefinition>(
            r#"{"scan_code":-4,"x":1,"y":2,"width":40,"height":40}"#,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn test_generated_ids_differ() {
        let a = KeyDefinition::new("a", KeyRect::new(0, 0, 40, 40));
        let b = KeyDefinition::new("a", KeyRect::new(0, 0, 40, 40));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_display_label_falls_back_to_binding() {
        let mut key = KeyDefinition::bound(&KeyBinding::new("space", 57), KeyRect::default());
        assert_eq!(key.display_label(), "space");
        key.label = "Space Bar".to_string();
        assert_eq!(key.display_label(), "Space Bar");
        key.label = "  ".to_string();
        assert_eq!(key.display_label(), "space");
    }
}
