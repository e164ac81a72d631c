// Base58Check encoding (payload + 4 byte hash256 checksum)

use crate::core::checksum;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 string: {0}")]
    InvalidEncoding(String),
    #[error("base58check data too short: {0} bytes")]
    TooShort(usize),
    #[error("base58check checksum mismatch")]
    BadChecksum,
}

/// Encode payload with a trailing checksum
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    bs58::encode(data).into_string()
}

/// Decode and verify, returning the payload without checksum
pub fn decode_check(s: &str) -> Result<Vec<u8>, Base58Error> {
    let mut data = bs58::decode(s)
        .into_vec()
        .map_err(|e| Base58Error::InvalidEncoding(e.to_string()))?;

    if data.len() < 4 {
        return Err(Base58Error::TooShort(data.len()));
    }

    let split = data.len() - 4;
    if checksum(&data[..split]) != data[split..] {
        return Err(Base58Error::BadChecksum);
    }

    data.truncate(split);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_check_address() {
        // P2PKH payload of BIP32 vector 1 master key
        let mut payload = vec![0x00];
        payload.extend(hex::decode("3442193e1bb70916e914552172cd4e2dbc9df811").unwrap());
        assert_eq!(encode_check(&payload), "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma");
    }

    #[test]
    fn test_decode_check() {
        let payload = decode_check("15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma").unwrap();
        assert_eq!(payload.len(), 21);
        assert_eq!(payload[0], 0x00);
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let payload = [0u8, 0, 0, 1, 2, 3];
        let encoded = encode_check(&payload);
        assert!(encoded.starts_with("111"));
        assert_eq!(decode_check(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_bad_checksum() {
        // last character altered
        let err = decode_check("15mKKb2eos1hWa6tisdPwwDC1a5J1y9nmb").unwrap_err();
        assert_eq!(err, Base58Error::BadChecksum);
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(
            decode_check("0OIl"),
            Err(Base58Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(decode_check("11"), Err(Base58Error::TooShort(2)));
    }
}
