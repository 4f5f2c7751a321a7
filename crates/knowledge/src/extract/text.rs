//! Plain text files.

/// Decode UTF-8; undecodable content yields an empty string.
pub fn decode_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!("Text file is not valid UTF-8, ignoring its content: {}", e);
            String::new()
        }
    }
}
