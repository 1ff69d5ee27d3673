//! Charset and collation registry.
//!
//! The registry is an immutable lookup table built once through
//! [`CharsetRegistryBuilder`]. Custom charsets and collations are registered
//! on the builder before the registry is shared, so readers never observe a
//! table that is being modified.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};

/// The binary pseudo charset.
pub const CHARSET_BIN: &str = "binary";
/// The 3-byte UTF-8 charset.
pub const CHARSET_UTF8: &str = "utf8";
/// Alias of [`CHARSET_UTF8`].
pub const CHARSET_UTF8MB3: &str = "utf8mb3";
/// The 4-byte UTF-8 charset.
pub const CHARSET_UTF8MB4: &str = "utf8mb4";
/// US ASCII.
pub const CHARSET_ASCII: &str = "ascii";
/// Latin-1.
pub const CHARSET_LATIN1: &str = "latin1";
/// GBK.
pub const CHARSET_GBK: &str = "gbk";
/// GB18030.
pub const CHARSET_GB18030: &str = "gb18030";

/// The collation of the binary charset.
pub const COLLATION_BIN: &str = "binary";
/// Default collation of `utf8`.
pub const COLLATION_UTF8: &str = "utf8_bin";
/// Default collation of `utf8mb4`.
pub const COLLATION_UTF8MB4: &str = "utf8mb4_bin";

/// A character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    /// Charset name.
    pub name: String,
    /// Name of the default collation.
    pub default_collation: String,
    /// Human-readable description.
    pub desc: String,
    /// Maximum bytes per character.
    pub maxlen: usize,
}

impl Charset {
    /// Creates a charset.
    pub fn new(
        name: impl Into<String>,
        default_collation: impl Into<String>,
        desc: impl Into<String>,
        maxlen: usize,
    ) -> Self {
        Self {
            name: name.into(),
            default_collation: default_collation.into(),
            desc: desc.into(),
            maxlen,
        }
    }
}

/// A collation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collation {
    /// Collation id as used on the wire.
    pub id: u16,
    /// Charset this collation belongs to.
    pub charset_name: String,
    /// Collation name.
    pub name: String,
    /// Whether this is the default collation of its charset.
    pub is_default: bool,
}

impl Collation {
    /// Creates a collation.
    pub fn new(
        id: u16,
        charset_name: impl Into<String>,
        name: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            id,
            charset_name: charset_name.into(),
            name: name.into(),
            is_default,
        }
    }
}

fn utf8_alias(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        CHARSET_UTF8MB3 => CHARSET_UTF8.to_string(),
        "utf8mb3_bin" => "utf8_bin".to_string(),
        "utf8mb3_unicode_ci" => "utf8_unicode_ci".to_string(),
        "utf8mb3_general_ci" => "utf8_general_ci".to_string(),
        _ => lower,
    }
}

/// Immutable charset and collation lookup table.
#[derive(Debug, Clone, Default)]
pub struct CharsetRegistry {
    charsets: HashMap<String, Charset>,
    collations: HashMap<String, Collation>,
    collation_ids: HashMap<u16, String>,
}

impl CharsetRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> CharsetRegistryBuilder {
        CharsetRegistryBuilder::default()
    }

    /// Returns the process-wide registry with the default charsets.
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<CharsetRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| Self::builder().with_defaults().build())
    }

    /// Looks up a charset by name.
    pub fn charset(&self, name: &str) -> Result<&Charset> {
        self.charsets
            .get(&utf8_alias(name))
            .ok_or_else(|| Error::UnknownCharset(name.to_string()))
    }

    /// Looks up a collation by name.
    pub fn collation_by_name(&self, name: &str) -> Result<&Collation> {
        self.collations
            .get(&utf8_alias(name))
            .ok_or_else(|| Error::UnknownCollation(name.to_string()))
    }

    /// Looks up a collation by id.
    pub fn collation_by_id(&self, id: u16) -> Result<&Collation> {
        self.collation_ids
            .get(&id)
            .and_then(|name| self.collations.get(name))
            .ok_or_else(|| Error::UnknownCollation(id.to_string()))
    }

    /// Returns the default collation name of a charset.
    pub fn default_collation(&self, charset: &str) -> Result<&str> {
        self.charset(charset).map(|cs| cs.default_collation.as_str())
    }

    /// Returns true when `collation` belongs to `charset`. An empty charset
    /// means `utf8`; an empty collation is always accepted.
    #[must_use]
    pub fn valid_charset_and_collation(&self, charset: &str, collation: &str) -> bool {
        let charset = if charset.is_empty() {
            CHARSET_UTF8
        } else {
            charset
        };
        let Ok(cs) = self.charset(charset) else {
            return false;
        };
        if collation.is_empty() {
            return true;
        }
        self.collation_by_name(collation)
            .is_ok_and(|co| co.charset_name == cs.name)
    }

    /// All registered charsets, sorted by name.
    #[must_use]
    pub fn charsets(&self) -> Vec<&Charset> {
        let mut all: Vec<&Charset> = self.charsets.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// All collations of a charset, sorted by id.
    #[must_use]
    pub fn collations_of(&self, charset: &str) -> Vec<&Collation> {
        let name = utf8_alias(charset);
        let mut all: Vec<&Collation> = self
            .collations
            .values()
            .filter(|c| c.charset_name == name)
            .collect();
        all.sort_by_key(|c| c.id);
        all
    }
}

/// Builder for [`CharsetRegistry`].
#[derive(Debug, Default)]
pub struct CharsetRegistryBuilder {
    registry: CharsetRegistry,
}

impl CharsetRegistryBuilder {
    /// Registers the charsets and collations MySQL clients expect.
    #[must_use]
    pub fn with_defaults(self) -> Self {
        let charsets = [
            Charset::new(CHARSET_UTF8, COLLATION_UTF8, "UTF-8 Unicode", 3),
            Charset::new(CHARSET_UTF8MB4, COLLATION_UTF8MB4, "UTF-8 Unicode", 4),
            Charset::new(CHARSET_ASCII, "ascii_bin", "US ASCII", 1),
            Charset::new(CHARSET_LATIN1, "latin1_bin", "Latin1", 1),
            Charset::new(CHARSET_BIN, COLLATION_BIN, "binary", 1),
            Charset::new(CHARSET_GBK, "gbk_bin", "Chinese Internal Code Specification", 2),
            Charset::new(CHARSET_GB18030, "gb18030_bin", "China National Standard GB18030", 4),
        ];
        let collations = [
            Collation::new(8, CHARSET_LATIN1, "latin1_swedish_ci", false),
            Collation::new(11, CHARSET_ASCII, "ascii_general_ci", false),
            Collation::new(28, CHARSET_GBK, "gbk_chinese_ci", false),
            Collation::new(33, CHARSET_UTF8, "utf8_general_ci", false),
            Collation::new(45, CHARSET_UTF8MB4, "utf8mb4_general_ci", false),
            Collation::new(46, CHARSET_UTF8MB4, COLLATION_UTF8MB4, true),
            Collation::new(47, CHARSET_LATIN1, "latin1_bin", true),
            Collation::new(63, CHARSET_BIN, COLLATION_BIN, true),
            Collation::new(65, CHARSET_ASCII, "ascii_bin", true),
            Collation::new(83, CHARSET_UTF8, COLLATION_UTF8, true),
            Collation::new(87, CHARSET_GBK, "gbk_bin", true),
            Collation::new(192, CHARSET_UTF8, "utf8_unicode_ci", false),
            Collation::new(224, CHARSET_UTF8MB4, "utf8mb4_unicode_ci", false),
            Collation::new(248, CHARSET_GB18030, "gb18030_chinese_ci", false),
            Collation::new(249, CHARSET_GB18030, "gb18030_bin", true),
            Collation::new(255, CHARSET_UTF8MB4, "utf8mb4_0900_ai_ci", false),
            Collation::new(309, CHARSET_UTF8MB4, "utf8mb4_0900_bin", false),
        ];
        let mut builder = self;
        for cs in charsets {
            builder = builder.register_charset(cs);
        }
        for co in collations {
            builder = builder.register_collation(co);
        }
        builder
    }

    /// Adds or replaces a charset.
    #[must_use]
    pub fn register_charset(mut self, charset: Charset) -> Self {
        self.registry
            .charsets
            .insert(charset.name.to_ascii_lowercase(), charset);
        self
    }

    /// Adds or replaces a collation.
    #[must_use]
    pub fn register_collation(mut self, collation: Collation) -> Self {
        let name = collation.name.to_ascii_lowercase();
        self.registry.collation_ids.insert(collation.id, name.clone());
        self.registry.collations.insert(name, collation);
        self
    }

    /// Removes a charset and its collations.
    #[must_use]
    pub fn remove_charset(mut self, name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        self.registry.charsets.remove(&name);
        self.registry.collations.retain(|_, c| c.charset_name != name);
        let collations = &self.registry.collations;
        self.registry
            .collation_ids
            .retain(|_, co| collations.contains_key(co));
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> CharsetRegistry {
        self.registry
    }
}

/// The family an [`Encoding`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingTp {
    /// UTF-8 compatible.
    Utf8,
    /// Single-byte or ASCII compatible.
    Ascii,
}

/// Decodes raw source bytes of a charset into UTF-8.
pub trait Encoding: Send + Sync + std::fmt::Debug {
    /// Charset name.
    fn name(&self) -> &str;

    /// Decodes `src` to UTF-8, replacing undecodable bytes.
    fn decode<'a>(&self, src: &'a [u8]) -> Cow<'a, str>;

    /// Encoding family.
    fn tp(&self) -> EncodingTp;

    /// Returns true when `src` is valid in this charset.
    fn is_valid(&self, src: &[u8]) -> bool;
}

#[derive(Debug)]
struct Utf8Encoding {
    name: &'static str,
}

impl Encoding for Utf8Encoding {
    fn name(&self) -> &str {
        self.name
    }

    fn decode<'a>(&self, src: &'a [u8]) -> Cow<'a, str> {
        String::from_utf8_lossy(src)
    }

    fn tp(&self) -> EncodingTp {
        EncodingTp::Utf8
    }

    fn is_valid(&self, src: &[u8]) -> bool {
        match std::str::from_utf8(src) {
            Ok(s) => self.name != CHARSET_UTF8 || s.chars().all(|c| c.len_utf8() <= 3),
            Err(_) => false,
        }
    }
}

#[derive(Debug)]
struct AsciiEncoding;

impl Encoding for AsciiEncoding {
    fn name(&self) -> &str {
        CHARSET_ASCII
    }

    fn decode<'a>(&self, src: &'a [u8]) -> Cow<'a, str> {
        if src.is_ascii() {
            return String::from_utf8_lossy(src);
        }
        Cow::Owned(
            src.iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
                .collect(),
        )
    }

    fn tp(&self) -> EncodingTp {
        EncodingTp::Ascii
    }

    fn is_valid(&self, src: &[u8]) -> bool {
        src.is_ascii()
    }
}

#[derive(Debug)]
struct Latin1Encoding;

impl Encoding for Latin1Encoding {
    fn name(&self) -> &str {
        CHARSET_LATIN1
    }

    fn decode<'a>(&self, src: &'a [u8]) -> Cow<'a, str> {
        if src.is_ascii() {
            return String::from_utf8_lossy(src);
        }
        Cow::Owned(src.iter().map(|&b| char::from(b)).collect())
    }

    fn tp(&self) -> EncodingTp {
        EncodingTp::Ascii
    }

    fn is_valid(&self, _src: &[u8]) -> bool {
        true
    }
}

#[derive(Debug)]
struct BinaryEncoding;

impl Encoding for BinaryEncoding {
    fn name(&self) -> &str {
        CHARSET_BIN
    }

    fn decode<'a>(&self, src: &'a [u8]) -> Cow<'a, str> {
        String::from_utf8_lossy(src)
    }

    fn tp(&self) -> EncodingTp {
        EncodingTp::Ascii
    }

    fn is_valid(&self, _src: &[u8]) -> bool {
        true
    }
}

/// Returns the decoder for a charset, or `None` when the charset is unknown
/// to the decoder set.
#[must_use]
pub fn find_encoding(charset: &str) -> Option<Arc<dyn Encoding>> {
    let enc: Arc<dyn Encoding> = match utf8_alias(charset).as_str() {
        CHARSET_UTF8 => Arc::new(Utf8Encoding { name: CHARSET_UTF8 }),
        CHARSET_UTF8MB4 => Arc::new(Utf8Encoding {
            name: CHARSET_UTF8MB4,
        }),
        CHARSET_ASCII => Arc::new(AsciiEncoding),
        CHARSET_LATIN1 => Arc::new(Latin1Encoding),
        CHARSET_BIN => Arc::new(BinaryEncoding),
        _ => return None,
    };
    Some(enc)
}

/// Compares strings under a collation.
pub trait Collator: Send + Sync {
    /// Compares two strings.
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Returns a sort key; equal keys compare equal.
    fn key(&self, s: &str) -> Vec<u8>;
}

/// Byte-wise comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinCollator;

impl Collator for BinCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.as_bytes().cmp(b.as_bytes())
    }

    fn key(&self, s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }
}

/// Case-insensitive comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveCollator;

impl Collator for CaseInsensitiveCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.to_lowercase().cmp(&b.to_lowercase())
    }

    fn key(&self, s: &str) -> Vec<u8> {
        s.to_lowercase().into_bytes()
    }
}

/// Returns true for case-insensitive collations. The empty collation is
/// treated as case-insensitive.
#[must_use]
pub fn is_ci_collation(collation: &str) -> bool {
    collation.is_empty() || collation.contains("_ci")
}

/// Returns true for `*_bin` collations.
#[must_use]
pub fn is_bin_collation(collation: &str) -> bool {
    collation.contains("_bin")
}

/// Returns the collator for a collation name.
#[must_use]
pub fn collator_for(collation: &str) -> &'static dyn Collator {
    static BIN: BinCollator = BinCollator;
    static CI: CaseInsensitiveCollator = CaseInsensitiveCollator;
    if is_ci_collation(collation) {
        &CI
    } else {
        &BIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_charset() {
        let reg = CharsetRegistry::global();
        assert_eq!(reg.charset("UTF8MB4").unwrap().maxlen, 4);
        assert_eq!(reg.charset("utf8mb3").unwrap().name, "utf8");
        assert_eq!(reg.default_collation("latin1").unwrap(), "latin1_bin");
        assert!(matches!(
            reg.charset("klingon"),
            Err(Error::UnknownCharset(_))
        ));
    }

    #[test]
    fn test_lookup_collation() {
        let reg = CharsetRegistry::global();
        assert_eq!(reg.collation_by_name("utf8mb3_bin").unwrap().id, 83);
        assert_eq!(reg.collation_by_id(255).unwrap().name, "utf8mb4_0900_ai_ci");
        assert!(reg.collation_by_id(9999).is_err());
        assert_eq!(reg.collations_of("gbk").len(), 2);
    }

    #[test]
    fn test_valid_charset_and_collation() {
        let reg = CharsetRegistry::global();
        assert!(reg.valid_charset_and_collation("utf8mb4", "utf8mb4_general_ci"));
        assert!(reg.valid_charset_and_collation("", "utf8_bin"));
        assert!(reg.valid_charset_and_collation("ascii", ""));
        assert!(!reg.valid_charset_and_collation("ascii", "utf8_bin"));
        assert!(!reg.valid_charset_and_collation("nope", ""));
    }

    #[test]
    fn test_builder_custom() {
        let reg = CharsetRegistry::builder()
            .with_defaults()
            .register_charset(Charset::new("koi8r", "koi8r_general_ci", "KOI8-R", 1))
            .register_collation(Collation::new(7, "koi8r", "koi8r_general_ci", true))
            .remove_charset("gbk")
            .build();
        assert_eq!(reg.collation_by_id(7).unwrap().charset_name, "koi8r");
        assert!(reg.charset("gbk").is_err());
        assert!(reg.collation_by_id(87).is_err());
        assert!(CharsetRegistry::global().charset("koi8r").is_err());
    }

    #[test]
    fn test_encodings() {
        let latin1 = find_encoding("latin1").unwrap();
        assert_eq!(latin1.decode(&[0x63, 0x61, 0x66, 0xe9]), "café");
        let ascii = find_encoding("ascii").unwrap();
        assert!(!ascii.is_valid("é".as_bytes()));
        let utf8 = find_encoding("utf8").unwrap();
        assert!(!utf8.is_valid("😀".as_bytes()));
        assert!(find_encoding("utf8mb4").unwrap().is_valid("😀".as_bytes()));
        assert_eq!(utf8.tp(), EncodingTp::Utf8);
        assert!(find_encoding("gbk").is_none());
    }

    #[test]
    fn test_collators() {
        assert_eq!(collator_for("utf8mb4_general_ci").compare("ABC", "abc"), Ordering::Equal);
        assert_eq!(collator_for("utf8mb4_bin").compare("ABC", "abc"), Ordering::Less);
        assert_eq!(collator_for("").key("AbC"), b"abc".to_vec());
        assert!(is_bin_collation("utf8_bin"));
        assert!(!is_ci_collation("binary"));
    }
}
