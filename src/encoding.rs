//! URL-safe base64 decoding for attachment bodies.
//!
//! The API returns attachment content in the URL-safe alphabet (`-` and `_`
//! instead of `+` and `/`), sometimes with embedded whitespace and with or
//! without padding.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::Result;

/// Standard alphabet, padding accepted but not required.
const STANDARD_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a URL-safe base64 string to raw bytes.
///
/// Whitespace is stripped, then `-`/`_` are mapped back to the standard
/// alphabet before decoding. Equivalent to standard base64 decoding after
/// the substitution.
pub fn decode_urlsafe_base64(input: &str) -> Result<Vec<u8>> {
    let translated: String = input
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    Ok(STANDARD_INDIFFERENT.decode(translated.as_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

    #[test]
    fn test_roundtrip_arbitrary_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let encoded = URL_SAFE_NO_PAD.encode(&bytes);
        assert_eq!(decode_urlsafe_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_roundtrip_padded() {
        let bytes = b"binary\x00\xff\xfepayload".to_vec();
        let encoded = URL_SAFE.encode(&bytes);
        assert_eq!(decode_urlsafe_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode_urlsafe_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let bytes = b"hello attachment world".to_vec();
        let mut encoded = URL_SAFE_NO_PAD.encode(&bytes);
        encoded.insert(4, '\n');
        encoded.insert(9, ' ');
        encoded.push('\r');
        assert_eq!(decode_urlsafe_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_urlsafe_chars_map_to_standard() {
        // 0xfb 0xff encodes to "-_8" in the URL-safe alphabet ("+/8" standard)
        assert_eq!(decode_urlsafe_base64("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_invalid_input_errors() {
        assert!(decode_urlsafe_base64("not*base64!").is_err());
    }
}
