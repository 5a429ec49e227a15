//! Downloadable file handles

use serde::Serialize;
use serde_json::Value;

use super::PhotoSize;
use crate::decode::{Decode, DecodeError, Object};

/// File ready to be downloaded from `<base>/file/bot<token>/<file_path>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Valid for at least one hour after `getFile`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl Decode for File {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("File", value)?;
        Ok(Self {
            file_id: obj.required("file_id")?,
            file_unique_id: obj.required("file_unique_id")?,
            file_size: obj.optional("file_size"),
            file_path: obj.optional("file_path"),
        })
    }
}

/// A user's profile pictures, each in several sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfilePhotos {
    pub total_count: u32,
    pub photos: Vec<Vec<PhotoSize>>,
}

impl Decode for UserProfilePhotos {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("UserProfilePhotos", value)?;
        Ok(Self {
            total_count: obj.required("total_count")?,
            photos: obj.required_grid("photos")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn file_path_is_optional() {
        let file = File::decode(&json!({"file_id": "f", "file_unique_id": "u"})).unwrap();
        assert_eq!(file.file_path, None);
    }

    #[test]
    fn profile_photo_grid() {
        let photos = UserProfilePhotos::decode(&json!({
            "total_count": 1,
            "photos": [[
                {"file_id": "s", "file_unique_id": "us", "width": 160, "height": 160},
                {"file_id": "b", "file_unique_id": "ub", "width": 640, "height": 640}
            ]]
        }))
        .unwrap();
        assert_eq!(photos.photos.len(), 1);
        assert_eq!(photos.photos[0][1].file_id, "b");
    }
}
