use bincode::{Decode, Encode};

use crate::GalleryEntry;

pub const GALLERY_FILE_MAGIC: [u8; 4] = *b"SSGX";
pub const GALLERY_FILE_VERSION: u32 = 1;
const GALLERY_HEADER_LEN: usize = GALLERY_FILE_MAGIC.len() + std::mem::size_of::<u32>();

#[derive(Clone, Debug, Default, Encode, Decode, serde::Serialize, serde::Deserialize)]
pub struct GalleryIndexData {
    pub entries: Vec<GalleryEntry>,
}

#[derive(Debug)]
pub enum GalleryIndexDecodeError {
    UnsupportedVersion(u32),
    InvalidData,
}

pub fn encode_gallery_index(data: &GalleryIndexData) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&GALLERY_FILE_MAGIC);
    payload.extend_from_slice(&GALLERY_FILE_VERSION.to_le_bytes());
    let body = bincode::encode_to_vec(data, bincode::config::standard()).unwrap_or_default();
    payload.extend_from_slice(&body);
    payload
}

pub fn decode_gallery_index(payload: &[u8]) -> Result<GalleryIndexData, GalleryIndexDecodeError> {
    if !(payload.len() >= GALLERY_HEADER_LEN && payload.starts_with(&GALLERY_FILE_MAGIC)) {
        return Err(GalleryIndexDecodeError::InvalidData);
    }
    let version = u32::from_le_bytes(
        payload[GALLERY_FILE_MAGIC.len()..GALLERY_HEADER_LEN]
            .try_into()
            .map_err(|_| GalleryIndexDecodeError::InvalidData)?,
    );
    let body = &payload[GALLERY_HEADER_LEN..];
    match version {
        1 => bincode::decode_from_slice(body, bincode::config::standard())
            .map(|(data, _)| data)
            .map_err(|_| GalleryIndexDecodeError::InvalidData),
        _ => Err(GalleryIndexDecodeError::UnsupportedVersion(version)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> GalleryIndexData {
        GalleryIndexData {
            entries: vec![GalleryEntry {
                id: "0192f0aa".to_string(),
                track_id: "3AhXZa8sUQht0UEdBJgpGc".to_string(),
                description: "a bright, busy sketch".to_string(),
                created_at_ms: 1_754_000_000_000,
            }],
        }
    }

    #[test]
    fn index_round_trips_through_file_encoding() {
        let data = sample_index();
        let payload = encode_gallery_index(&data);
        let decoded = decode_gallery_index(&payload).expect("decode");
        assert_eq!(decoded.entries, data.entries);
    }

    #[test]
    fn encoded_index_starts_with_magic_and_version() {
        let payload = encode_gallery_index(&sample_index());
        assert_eq!(&payload[..4], b"SSGX");
        assert_eq!(
            u32::from_le_bytes(payload[4..8].try_into().unwrap()),
            GALLERY_FILE_VERSION
        );
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut payload = encode_gallery_index(&sample_index());
        payload[0] = b'x';
        assert!(matches!(
            decode_gallery_index(&payload),
            Err(GalleryIndexDecodeError::InvalidData)
        ));
    }

    #[test]
    fn future_version_is_rejected_without_parsing() {
        let mut payload = encode_gallery_index(&sample_index());
        payload[4..8].copy_from_slice(&99u32.to_le_bytes());
        assert!(matches!(
            decode_gallery_index(&payload),
            Err(GalleryIndexDecodeError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn truncated_payload_is_invalid() {
        let payload = encode_gallery_index(&sample_index());
        assert!(matches!(
            decode_gallery_index(&payload[..6]),
            Err(GalleryIndexDecodeError::InvalidData)
        ));
    }
}
