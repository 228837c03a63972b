// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Encoding detection, delimiter detection, parsing, serialization

pub mod delimiter;
pub mod encoding;
pub mod parser;
pub mod writer;

pub use delimiter::detect_delimiter;
pub use encoding::{detect_and_decode, DecodedText};
pub use parser::parse_rows;
