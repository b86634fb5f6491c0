use crate::error::ParseError;

/// Decode a `0x`-prefixed hex string into UTF-8 text.
pub fn hex_to_str(value: &str) -> Result<String, ParseError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(digits).map_err(|e| ParseError::MalformedHex(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ParseError::MalformedHex(e.to_string()))
}

/// Encode text as a `0x`-prefixed lowercase hex string.
pub fn str_to_hex(value: &str) -> String {
    format!("0x{}", hex::encode(value.as_bytes()))
}

/// Accept a move payload either hex encoded (`0x...`) or as plain text.
pub fn decode_payload(payload: &str) -> Result<String, ParseError> {
    if payload.starts_with("0x") {
        hex_to_str(payload)
    } else {
        Ok(payload.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_text() {
        assert_eq!(str_to_hex("o x"), "0x6f2078");
        assert_eq!(hex_to_str("0x6f2078").unwrap(), "o x");
        assert_eq!(hex_to_str("0x").unwrap(), "");
    }

    #[test]
    fn test_decode_payload() {
        assert_eq!(decode_payload("action 3").unwrap(), "action 3");
        assert_eq!(decode_payload(&str_to_hex("action 3")).unwrap(), "action 3");
        assert!(matches!(
            decode_payload("0xzz"),
            Err(ParseError::MalformedHex(_))
        ));
        assert!(matches!(
            decode_payload("0xff"),
            Err(ParseError::MalformedHex(_))
        ));
    }
}
