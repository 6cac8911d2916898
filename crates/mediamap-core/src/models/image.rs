use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted representation of a stored image, including its named
/// conversions. Shares the flat `File` wire shape plus `width`, `height` and
/// a recursive `conversions` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub name: String,
    pub filename: String,
    pub path: String,
    pub base_path: String,
    pub size: u64,
    pub extension: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub conversions: BTreeMap<String, Image>,
}

impl Image {
    /// Attach a stored conversion under `name`, replacing any prior entry.
    pub fn add_conversion(&mut self, name: impl Into<String>, image: Image) -> &mut Self {
        self.conversions.insert(name.into(), image);
        self
    }

    pub fn has_conversions(&self) -> bool {
        !self.conversions.is_empty()
    }

    pub fn has_conversion(&self, name: &str) -> bool {
        self.conversions.contains_key(name)
    }

    pub fn conversion(&self, name: &str) -> Option<&Image> {
        self.conversions.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_image(name: &str, width: u32, height: u32, conversion: bool) -> Image {
        let base = if conversion {
            "product/9f8e7d6c/conversions"
        } else {
            "product/9f8e7d6c"
        };
        Image {
            name: name.to_string(),
            filename: format!("{name}_{width}x{height}.jpg"),
            path: format!("{base}/{name}_{width}x{height}.jpg"),
            base_path: base.to_string(),
            size: 51200,
            extension: "jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            width,
            height,
            conversions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_image_round_trip_with_nested_conversions() {
        let mut image = stored_image("photo", 800, 600, false);
        image.add_conversion("thumb", stored_image("photo", 100, 75, true));
        image.add_conversion("medium", stored_image("photo", 400, 300, true));

        let json = serde_json::to_string(&image).unwrap();
        let restored: Image = serde_json::from_str(&json).unwrap();

        assert_eq!(image, restored);
        assert!(restored.has_conversion("thumb"));
        assert_eq!(restored.conversion("medium").unwrap().width, 400);
    }

    #[test]
    fn test_image_deserializes_without_conversions_key() {
        let json = r#"{
            "name": "photo",
            "filename": "photo_800x600.jpg",
            "path": "product/9f8e7d6c/photo_800x600.jpg",
            "basePath": "product/9f8e7d6c",
            "size": 51200,
            "extension": "jpg",
            "mimeType": "image/jpeg",
            "width": 800,
            "height": 600
        }"#;
        let image: Image = serde_json::from_str(json).unwrap();
        assert!(!image.has_conversions());
        assert_eq!((image.width, image.height), (800, 600));
    }

    #[test]
    fn test_image_wire_keys_are_camel_case() {
        let value = serde_json::to_value(stored_image("photo", 800, 600, false)).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("basePath"));
        assert!(object.contains_key("mimeType"));
        assert!(object.contains_key("conversions"));
    }
}
