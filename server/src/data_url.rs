use base64::{engine::general_purpose, Engine as _};

/// Decode a `data:<mime>;base64,<payload>` URL into raw bytes. The canvas
/// always submits base64 PNG data URLs; anything else is rejected with a
/// user-facing description.
pub fn decode_data_url(text: &str) -> Result<Vec<u8>, String> {
    let trimmed = text.trim();
    let rest = trimmed
        .strip_prefix("data:")
        .ok_or_else(|| "The drawing payload is not a data URL".to_string())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "The drawing payload is malformed".to_string())?;
    if !header.ends_with(";base64") {
        return Err("Only base64 data URLs are supported".to_string());
    }
    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|error| format!("The drawing payload is not valid base64: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_png_data_url() {
        // "PNG" in base64.
        let bytes = decode_data_url("data:image/png;base64,UE5H").expect("decode");
        assert_eq!(bytes, b"PNG");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let bytes = decode_data_url("  data:image/png;base64,UE5H  ").expect("decode");
        assert_eq!(bytes, b"PNG");
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("").is_err());
    }

    #[test]
    fn rejects_urls_without_a_payload_separator() {
        assert!(decode_data_url("data:image/png;base64").is_err());
    }

    #[test]
    fn rejects_unencoded_data_urls() {
        assert!(decode_data_url("data:text/plain,hello").is_err());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }
}
