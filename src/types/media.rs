//! Media attachments
//!
//! Every file-backed type carries `file_id` (for downloads and re-sending)
//! and `file_unique_id` (stable across bots, not usable for downloads).

use serde::Serialize;
use serde_json::Value;

use crate::decode::{Decode, DecodeError, Object};

/// One size of a photo or thumbnail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl PhotoSize {
    /// Pixel count, used to pick the largest size
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Decode for PhotoSize {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("PhotoSize", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            width: obj.required("width")?,
            height: obj.required("height")?,
            file_size: obj.optional("file_size"),
        })
    }
}

/// Audio file treated as music
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Audio {
    pub file_id: String,
    pub file_unique_id: String,
    /// Seconds
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<PhotoSize>,
}

impl Decode for Audio {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Audio", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            duration: obj.required("duration")?,
            performer: obj.optional("performer"),
            title: obj.optional("title"),
            file_name: obj.optional("file_name"),
            mime_type: obj.optional("mime_type"),
            file_size: obj.optional("file_size"),
            thumb: obj.nested("thumb"),
        })
    }
}

/// General file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<PhotoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Decode for Document {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Document", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            thumb: obj.nested("thumb"),
            file_name: obj.optional("file_name"),
            mime_type: obj.optional("mime_type"),
            file_size: obj.optional("file_size"),
        })
    }
}

/// Video file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<PhotoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Decode for Video {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Video", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            width: obj.required("width")?,
            height: obj.required("height")?,
            duration: obj.required("duration")?,
            thumb: obj.nested("thumb"),
            file_name: obj.optional("file_name"),
            mime_type: obj.optional("mime_type"),
            file_size: obj.optional("file_size"),
        })
    }
}

/// GIF or H.264/MPEG-4 AVC video without sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Animation {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<PhotoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Decode for Animation {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Animation", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            width: obj.required("width")?,
            height: obj.required("height")?,
            duration: obj.required("duration")?,
            thumb: obj.nested("thumb"),
            file_name: obj.optional("file_name"),
            mime_type: obj.optional("mime_type"),
            file_size: obj.optional("file_size"),
        })
    }
}

/// Voice note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    pub file_id: String,
    pub file_unique_id: String,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Decode for Voice {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Voice", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            duration: obj.required("duration")?,
            mime_type: obj.optional("mime_type"),
            file_size: obj.optional("file_size"),
        })
    }
}

/// Round video message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoNote {
    pub file_id: String,
    pub file_unique_id: String,
    /// Width and height (diameter) of the video
    pub length: u32,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<PhotoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Decode for VideoNote {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("VideoNote", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            length: obj.required("length")?,
            duration: obj.required("duration")?,
            thumb: obj.nested("thumb"),
            file_size: obj.optional("file_size"),
        })
    }
}

/// Sticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sticker {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub is_animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<PhotoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_position: Option<MaskPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Decode for Sticker {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Sticker", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            width: obj.required("width")?,
            height: obj.required("height")?,
            is_animated: obj.required("is_animated")?,
            thumb: obj.nested("thumb"),
            emoji: obj.optional("emoji"),
            set_name: obj.optional("set_name"),
            mask_position: obj.nested("mask_position"),
            file_size: obj.optional("file_size"),
        })
    }
}

/// Where a mask sticker is placed on a face
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskPosition {
    /// "forehead", "eyes", "mouth" or "chin"
    pub point: String,
    pub x_shift: f64,
    pub y_shift: f64,
    pub scale: f64,
}

impl Decode for MaskPosition {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("MaskPosition", value)?;
        Ok(Self {
            point: obj.required("point")?,
            x_shift: obj.required("x_shift")?,
            y_shift: obj.required("y_shift")?,
            scale: obj.required("scale")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn malformed_thumb_is_dropped() {
        let audio = Audio::decode(&json!({
            "file_id": "a1",
            "file_unique_id": "u1",
            "duration": 180,
            "title": "Song",
            "thumb": {"file_id": "t1", "width": 90}
        }))
        .unwrap();

        assert_eq!(audio.title.as_deref(), Some("Song"));
        assert!(audio.thumb.is_none());
    }

    #[test]
    fn file_ids_are_mandatory() {
        let err = Document::decode(&json!({"file_id": "d1"})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("file_unique_id"));
    }

    #[test]
    fn sticker_with_mask() {
        let sticker = Sticker::decode(&json!({
            "file_id": "s1",
            "file_unique_id": "su1",
            "width": 512,
            "height": 512,
            "is_animated": false,
            "emoji": "🙂",
            "mask_position": {"point": "eyes", "x_shift": 0.1, "y_shift": -0.2, "scale": 1}
        }))
        .unwrap();

        let mask = sticker.mask_position.unwrap();
        assert_eq!(mask.point, "eyes");
        assert!((mask.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_dimension_is_rejected() {
        let err = PhotoSize::decode(&json!({
            "file_id": "p", "file_unique_id": "u", "width": -1, "height": 10
        }))
        .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "width", .. }));
    }
}
