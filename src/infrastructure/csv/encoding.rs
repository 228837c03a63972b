// ============================================================
// ENCODING DETECTION
// ============================================================
// Best-effort decode of raw bytes: utf-8-sig, utf-8, latin-1

/// Decoded text plus the label of the encoding that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: String,
}

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Decode raw bytes under an ordered preference list.
///
/// UTF-8 with BOM wins first (BOM stripped), then strict UTF-8, then
/// Latin-1. Latin-1 decodes any byte sequence, so detection never fails;
/// messy files degrade instead of erroring.
pub fn detect_and_decode(bytes: &[u8]) -> DecodedText {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        if let Some(text) = decode_utf8(rest) {
            return DecodedText {
                text,
                encoding: "utf-8-sig".to_string(),
            };
        }
    }
    if let Some(text) = decode_utf8(bytes) {
        return DecodedText {
            text,
            encoding: "utf-8".to_string(),
        };
    }
    DecodedText {
        text: decode_latin1(bytes),
        encoding: "latin-1".to_string(),
    }
}

/// Encode text back to bytes under a detected encoding label, so a saved
/// file keeps its source encoding (unknown labels fall back to UTF-8).
pub fn encode(text: &str, encoding: &str) -> Vec<u8> {
    match encoding {
        "utf-8-sig" => {
            let mut bytes = UTF8_BOM.to_vec();
            bytes.extend_from_slice(text.as_bytes());
            bytes
        }
        "latin-1" => encode_latin1(text),
        _ => text.as_bytes().to_vec(),
    }
}

fn decode_utf8(bytes: &[u8]) -> Option<String> {
    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|cow| cow.into_owned())
}

/// True ISO-8859-1: each byte maps to the code point of the same value.
/// encoding_rs resolves the "latin1" label to windows-1252, which remaps
/// the 0x80-0x9F range, so the mapping is done directly here.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Inverse mapping; characters above U+00FF become '?'.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}
