//! Envelope text codec.
//!
//! ```text
//! master_salt . salt1 . nonce1 . tag1 . salt2 . nonce2 . tag2 . salt3 . nonce3 . tag3 . ciphertext
//! ```
//!
//! Every segment is standard base64 with padding. Parsing validates the
//! segment count and every decoded length before any key is derived.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::cascade::{LayerParams, LAYER_COUNT};
use tricrypt_common::DecryptError;
use tricrypt_crypto::{
    keys::{LAYER_SALT_LENGTH, MASTER_SALT_LENGTH},
    LayerSalt, MasterSalt, NONCE_SIZE, TAG_SIZE,
};

/// Number of '.'-separated segments in an envelope.
pub const SEGMENT_COUNT: usize = 2 + 3 * LAYER_COUNT;

/// Segment separator.
pub const SEPARATOR: char = '.';

/// A parsed envelope: every public value needed to decrypt one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Salt for master key derivation.
    pub master_salt: MasterSalt,
    /// Layer values in application order.
    pub layers: [LayerParams; LAYER_COUNT],
    /// Ciphertext of the last layer.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize to the dot-separated text form.
    pub fn encode(&self) -> String {
        let mut segments = Vec::with_capacity(SEGMENT_COUNT);
        segments.push(STANDARD.encode(self.master_salt.as_bytes()));
        for layer in &self.layers {
            segments.push(STANDARD.encode(layer.salt.as_bytes()));
            segments.push(STANDARD.encode(layer.nonce));
            segments.push(STANDARD.encode(layer.tag));
        }
        segments.push(STANDARD.encode(&self.ciphertext));
        segments.join(".")
    }

    /// Parse and validate the text form.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// - [`DecryptError::Format`] for a wrong segment count, invalid base64,
    ///   or a segment of the wrong decoded length. The message names the
    ///   offending segment.
    pub fn parse(text: &str) -> Result<Self, DecryptError> {
        let segments: Vec<&str> = text.trim().split(SEPARATOR).collect();
        if segments.len() != SEGMENT_COUNT {
            return Err(DecryptError::Format(format!(
                "expected {} segments, found {}",
                SEGMENT_COUNT,
                segments.len()
            )));
        }

        let master_salt = MasterSalt::from_bytes(decode_fixed::<MASTER_SALT_LENGTH>(&segments, 0)?);

        let mut layers = Vec::with_capacity(LAYER_COUNT);
        for layer in 0..LAYER_COUNT {
            let base = 1 + 3 * layer;
            layers.push(LayerParams {
                salt: LayerSalt::from_bytes(decode_fixed::<LAYER_SALT_LENGTH>(&segments, base)?),
                nonce: decode_fixed::<NONCE_SIZE>(&segments, base + 1)?,
                tag: decode_fixed::<TAG_SIZE>(&segments, base + 2)?,
            });
        }

        let last = SEGMENT_COUNT - 1;
        let ciphertext = decode_segment(&segments, last)?;
        if ciphertext.is_empty() {
            return Err(DecryptError::Format(format!(
                "{} segment is empty",
                segment_name(last)
            )));
        }

        Ok(Self {
            master_salt,
            layers: [layers[0], layers[1], layers[2]],
            ciphertext,
        })
    }

    /// Length of the final ciphertext in bytes.
    pub fn ciphertext_len(&self) -> usize {
        self.ciphertext.len()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Envelope {
    type Err = DecryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Human-readable name of segment `index`.
pub fn segment_name(index: usize) -> String {
    match index {
        0 => "master salt".to_string(),
        i if i == SEGMENT_COUNT - 1 => "ciphertext".to_string(),
        i => {
            let layer = (i - 1) / 3 + 1;
            let part = match (i - 1) % 3 {
                0 => "salt",
                1 => "nonce",
                _ => "tag",
            };
            format!("layer {} {}", layer, part)
        }
    }
}

fn decode_segment(segments: &[&str], index: usize) -> Result<Vec<u8>, DecryptError> {
    STANDARD.decode(segments[index]).map_err(|_| {
        DecryptError::Format(format!("{} segment is not valid base64", segment_name(index)))
    })
}

fn decode_fixed<const N: usize>(segments: &[&str], index: usize) -> Result<[u8; N], DecryptError> {
    let bytes = decode_segment(segments, index)?;
    bytes.as_slice().try_into().map_err(|_| {
        DecryptError::Format(format!(
            "{} segment must be {} bytes, found {}",
            segment_name(index),
            N,
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        let layer = |n: u8| LayerParams {
            salt: LayerSalt::from_bytes([n; 16]),
            nonce: [n + 10; 16],
            tag: [n + 20; 16],
        };
        Envelope {
            master_salt: MasterSalt::from_bytes([7u8; 32]),
            layers: [layer(1), layer(2), layer(3)],
            ciphertext: vec![0xAB; 150],
        }
    }

    #[test]
    fn test_encode_shape() {
        let text = sample().encode();
        let segments: Vec<&str> = text.split('.').collect();
        assert_eq!(segments.len(), SEGMENT_COUNT);

        let lengths: Vec<usize> = segments
            .iter()
            .map(|s| STANDARD.decode(s).unwrap().len())
            .collect();
        assert_eq!(lengths, vec![32, 16, 16, 16, 16, 16, 16, 16, 16, 16, 150]);
    }

    #[test]
    fn test_segment_order() {
        let text = sample().encode();
        let segments: Vec<&str> = text.split('.').collect();

        assert_eq!(STANDARD.decode(segments[1]).unwrap(), vec![1u8; 16]); // layer 1 salt
        assert_eq!(STANDARD.decode(segments[2]).unwrap(), vec![11u8; 16]); // layer 1 nonce
        assert_eq!(STANDARD.decode(segments[3]).unwrap(), vec![21u8; 16]); // layer 1 tag
        assert_eq!(STANDARD.decode(segments[9]).unwrap(), vec![23u8; 16]); // layer 3 tag
    }

    #[test]
    fn test_parse_roundtrip() {
        let envelope = sample();
        let parsed: Envelope = envelope.to_string().parse().unwrap();
        assert_eq!(parsed, envelope);
        assert_eq!(parsed.ciphertext_len(), 150);
    }

    #[test]
    fn test_parse_ignores_surrounding_whitespace() {
        let text = format!("  {}\n", sample().encode());
        assert_eq!(Envelope::parse(&text).unwrap(), sample());
    }

    #[test]
    fn test_wrong_segment_count() {
        let text = sample().encode();

        let short = text.rsplitn(2, '.').nth(1).unwrap();
        assert!(matches!(Envelope::parse(short), Err(DecryptError::Format(_))));

        let long = format!("{}.AAAA", text);
        assert!(matches!(Envelope::parse(&long), Err(DecryptError::Format(_))));
    }

    #[test]
    fn test_wrong_length_names_segment() {
        let mut segments: Vec<String> = sample().encode().split('.').map(String::from).collect();
        segments[5] = STANDARD.encode([0u8; 12]);

        let err = Envelope::parse(&segments.join(".")).unwrap_err();
        assert_eq!(
            err,
            DecryptError::Format("layer 2 nonce segment must be 16 bytes, found 12".to_string())
        );
    }

    #[test]
    fn test_invalid_base64_names_segment() {
        let mut segments: Vec<String> = sample().encode().split('.').map(String::from).collect();
        segments[0] = "!!not base64!!".to_string();

        let err = Envelope::parse(&segments.join(".")).unwrap_err();
        assert!(err.to_string().contains("master salt"));
    }

    #[test]
    fn test_empty_ciphertext_rejected() {
        let mut envelope = sample();
        envelope.ciphertext.clear();

        let err = Envelope::parse(&envelope.encode()).unwrap_err();
        assert_eq!(err, DecryptError::Format("ciphertext segment is empty".to_string()));
    }

    #[test]
    fn test_segment_names() {
        assert_eq!(segment_name(0), "master salt");
        assert_eq!(segment_name(1), "layer 1 salt");
        assert_eq!(segment_name(6), "layer 2 tag");
        assert_eq!(segment_name(8), "layer 3 nonce");
        assert_eq!(segment_name(10), "ciphertext");
    }
}
