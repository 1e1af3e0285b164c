use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::PdfError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// Font resource entry of a page.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Resource key as used by `Tf` (e.g. `b"F1"`).
    pub name: Vec<u8>,
    /// `/Encoding` name, e.g. `Identity-H` or `WinAnsiEncoding`.
    pub encoding: Option<String>,
}

impl BackendFontInfo {
    /// Identity-H/V fonts usually carry 2-byte codes that are Unicode.
    pub fn is_identity(&self) -> bool {
        self.encoding
            .as_deref()
            .is_some_and(|enc| enc.starts_with("Identity"))
    }
}

/// A lopdf-independent PDF value, so the extraction state machine can be
/// driven by plain data in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

/// One content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Read a numeric operand, accepting both `Integer` and `Real`.
pub fn number(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(f) => Some(*f),
        _ => None,
    }
}

/// Convert a `lopdf::Object` into a [`PdfValue`]. Stream payloads are
/// dropped; only their dictionaries survive.
pub fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => PdfValue::Dict(convert_dict(dict)),
        lopdf::Object::Stream(stream) => PdfValue::Dict(convert_dict(&stream.dict)),
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

fn convert_dict(dict: &lopdf::Dictionary) -> Vec<(Vec<u8>, PdfValue)> {
    dict.iter()
        .map(|(k, v)| (k.clone(), convert_object(v)))
        .collect()
}

/// Best-effort decoding of PDF string bytes: UTF-16BE with BOM, then
/// UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE_u8, 0xFF][..]) {
        return decode_utf16be(payload);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Decode big-endian UTF-16 code units; a trailing odd byte is ignored.
fn decode_utf16be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Abstraction over the PDF parsing backend.
///
/// Text extraction only talks to this trait, which lets its tests feed
/// hand-written content streams instead of real documents.
pub trait PdfBackend {
    /// 1-based page number to [`PageId`], in document order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError>;

    /// Raw (decompressed) content stream bytes of a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError>;

    /// Decode the bytes of a text-showing operand using whatever encoding
    /// hints the current font offers. `font` is `None` when the `Tf` key is
    /// missing from the page resources.
    fn decode_text(&self, font: Option<&BackendFontInfo>, bytes: &[u8]) -> String;
}

/// [`PdfBackend`] backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Parse a PDF from memory. Encrypted documents are refused.
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Wrap an already parsed document. Encrypted documents are refused.
    pub fn from_document(doc: lopdf::Document) -> Result<Self, PdfError> {
        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        log::debug!("loaded PDF with {} pages", doc.get_pages().len());
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// `Title`, `Author` and `Creator` from the trailer's Info dictionary.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut meta = BTreeMap::new();

        let info_dict = match self.doc.trailer.get(b"Info") {
            Ok(lopdf::Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(lopdf::Object::Dictionary(d)) => d,
                _ => return meta,
            },
            Ok(lopdf::Object::Dictionary(d)) => d,
            _ => return meta,
        };

        let keys: [&[u8]; 3] = [b"Title", b"Author", b"Creator"];
        for key in keys {
            let value = match info_dict.get(key) {
                Ok(lopdf::Object::String(bytes, _)) => decode_text_simple(bytes),
                Ok(lopdf::Object::Name(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
                _ => continue,
            };
            meta.insert(String::from_utf8_lossy(key).into_owned(), value);
        }

        meta
    }
}

fn name_entry(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| BackendFontInfo {
                name: name.clone(),
                encoding: name_entry(dict, b"Encoding"),
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
        let content = Content::decode(data)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, font: Option<&BackendFontInfo>, bytes: &[u8]) -> String {
        let identity = font.is_some_and(BackendFontInfo::is_identity);

        if identity && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let decoded = decode_utf16be(bytes);
            if !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }

        decode_text_simple(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_utf8() {
        assert_eq!(decode_text_simple("Exclusions apply".as_bytes()), "Exclusions apply");
    }

    #[test]
    fn decode_latin1_fallback() {
        // 0xE9 alone is not valid UTF-8.
        assert_eq!(decode_text_simple(&[0x63, 0x61, 0x66, 0xE9]), "caf\u{00E9}");
    }

    #[test]
    fn decode_utf16_with_bom() {
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]), "AB");
    }

    #[test]
    fn decode_utf16_ignores_odd_trailing_byte() {
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41, 0x00]), "A");
    }

    #[test]
    fn decode_empty() {
        assert_eq!(decode_text_simple(&[]), "");
    }

    #[test]
    fn number_accepts_integer_and_real() {
        assert_eq!(number(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(number(&PdfValue::Real(1.5)), Some(1.5));
        assert_eq!(number(&PdfValue::Name(b"F1".to_vec())), None);
    }

    #[test]
    fn convert_nested_dictionary() {
        let mut dict = lopdf::Dictionary::new();
        dict.set(
            "Box",
            lopdf::Object::Array(vec![lopdf::Object::Integer(0), lopdf::Object::Real(612.0)]),
        );

        match convert_object(&lopdf::Object::Dictionary(dict)) {
            PdfValue::Dict(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].0, b"Box");
                assert_eq!(
                    entries[0].1,
                    PdfValue::Array(vec![PdfValue::Integer(0), PdfValue::Real(612.0)])
                );
            }
            other => panic!("expected Dict, got {:?}", other),
        }
    }

    #[test]
    fn convert_stream_keeps_only_dictionary() {
        let mut dict = lopdf::Dictionary::new();
        dict.set("Length", lopdf::Object::Integer(0));
        let obj = lopdf::Object::Stream(lopdf::Stream::new(dict, vec![]));

        assert_eq!(
            convert_object(&obj),
            PdfValue::Dict(vec![(b"Length".to_vec(), PdfValue::Integer(0))])
        );
    }

    fn font(encoding: Option<&str>) -> BackendFontInfo {
        BackendFontInfo {
            name: b"F1".to_vec(),
            encoding: encoding.map(str::to_string),
        }
    }

    fn empty_backend() -> LopdfBackend {
        LopdfBackend::from_document(lopdf::Document::with_version("1.5")).unwrap()
    }

    #[test]
    fn encrypted_document_is_refused() {
        let mut doc = lopdf::Document::with_version("1.5");
        let encrypt_id =
            doc.add_object(lopdf::dictionary! { "Filter" => "Standard", "V" => 1, "R" => 2 });
        doc.trailer.set("Encrypt", encrypt_id);

        assert!(matches!(
            LopdfBackend::from_document(doc),
            Err(PdfError::Encrypted)
        ));
    }

    #[test]
    fn identity_font_decodes_utf16be_first() {
        let backend = empty_backend();
        let bytes = [0x00, 0x48, 0x00, 0x69, 0x20, 0xB9];

        assert_eq!(
            backend.decode_text(Some(&font(Some("Identity-H"))), &bytes),
            "Hi\u{20B9}"
        );
        assert_eq!(backend.decode_text(Some(&font(Some("Identity-V"))), &bytes[..4]), "Hi");
    }

    #[test]
    fn non_identity_font_uses_simple_decoding() {
        let backend = empty_backend();
        let bytes = [0x00, 0x48, 0x00, 0x69];

        assert_eq!(
            backend.decode_text(Some(&font(Some("WinAnsiEncoding"))), &bytes),
            "\0H\0i"
        );
        assert_eq!(backend.decode_text(None, b"Claims"), "Claims");
    }

    #[test]
    fn identity_font_with_odd_length_falls_back() {
        let backend = empty_backend();
        assert_eq!(backend.decode_text(Some(&font(Some("Identity-H"))), b"abc"), "abc");
    }

    #[test]
    fn load_rejects_garbage() {
        assert!(matches!(
            LopdfBackend::load_bytes(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }
}
