use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

mod gallery_format;

pub use gallery_format::{
    decode_gallery_index, encode_gallery_index, GalleryIndexData, GalleryIndexDecodeError,
    GALLERY_FILE_MAGIC, GALLERY_FILE_VERSION,
};

/// Body of `POST /paintify`: the canvas encoded as a PNG data URL.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaintifyRequest {
    pub data: String,
}

/// Body of `POST /remove` and `POST /musify`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EntryRequest {
    pub id: String,
}

/// Success payload for `/paintify` and `/musify`. `id` is the generated
/// track identifier, not the gallery entry id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SongResponse {
    pub id: String,
    pub description: String,
}

/// Error payload carried with every non-2xx API status.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Encode, Decode)]
pub struct GalleryEntry {
    pub id: String,
    pub track_id: String,
    pub description: String,
    pub created_at_ms: u64,
}

/// Payload of `GET /history`, newest entry first.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct HistoryResponse {
    pub entries: Vec<GalleryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_response_keeps_wire_field_names() {
        let response = SongResponse {
            id: "7GhIk".to_string(),
            description: "a calm tune".to_string(),
        };
        let json = serde_json::to_string(&response).expect("serialize");
        assert!(json.contains("\"id\":\"7GhIk\""));
        assert!(json.contains("\"description\":\"a calm tune\""));
    }

    #[test]
    fn paintify_request_parses_data_field() {
        let request: PaintifyRequest =
            serde_json::from_str("{\"data\":\"data:image/png;base64,AA==\"}").expect("parse");
        assert_eq!(request.data, "data:image/png;base64,AA==");
    }

    #[test]
    fn error_response_round_trips() {
        let text = "{\"description\":\"could not hear the drawing\"}";
        let error: ErrorResponse = serde_json::from_str(text).expect("parse");
        assert_eq!(error.description, "could not hear the drawing");
    }
}
