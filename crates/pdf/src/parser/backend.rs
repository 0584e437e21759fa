use std::collections::BTreeMap;

use lopdf::{content::Content, Document};

use crate::PdfError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// A font resource of a page.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Resource key as used by `Tf` (e.g. `b"F1"`).
    pub name: Vec<u8>,
    /// `BaseFont` entry, e.g. `ABCDEF+AvenirLTStd-Heavy`.
    pub base_font: Option<String>,
}

/// Operand values of content-stream operators, detached from `lopdf`.
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

/// One content-stream operation.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(f) => Some(*f),
        _ => None,
    }
}

/// Convert a `lopdf::Object`; stream payloads are dropped, only their
/// dictionaries are kept.
pub fn convert_object(obj: &lopdf::Object) -> PdfValue {
    let dict_entries = |dict: &lopdf::Dictionary| -> Vec<(Vec<u8>, PdfValue)> {
        dict.iter()
            .map(|(k, v)| (k.clone(), convert_object(v)))
            .collect()
    };
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => PdfValue::Dict(dict_entries(dict)),
        lopdf::Object::Stream(stream) => PdfValue::Dict(dict_entries(&stream.dict)),
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

/// Decode string bytes without font information: UTF-16BE with BOM, then
/// UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, payload @ ..] = bytes {
        let code_units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// The parts of a PDF backend the run extractor needs.
///
/// Tests drive the extractor with a mock that returns canned operations.
pub trait PdfBackend {
    /// 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError>;

    /// Raw (possibly compressed) content stream bytes.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError>;

    /// Decode the bytes of a text-showing operator set in the font with
    /// resource key `font_name`.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// [`PdfBackend`] over a [`lopdf::Document`].
pub struct LopdfBackend {
    doc: Document,
}

impl LopdfBackend {
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Decode with the font's own encoding (ToUnicode map or named
    /// encoding), when lopdf can resolve it.
    fn decode_with_font(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font_dict = fonts.get(font_name)?;
        let encoding = font_dict.get_font_encoding(&self.doc).ok()?;
        Document::decode_text(&encoding, bytes).ok()
    }

    fn font_encoding_name(&self, page: PageId, font_name: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font_dict = fonts.get(font_name)?;
        match font_dict.get(b"Encoding").ok()? {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
        let fonts_map = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        Ok(fonts_map
            .iter()
            .map(|(name, dict)| BackendFontInfo {
                name: name.clone(),
                base_font: dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).into_owned()),
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

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Some(text) = self.decode_with_font(page, font_name, bytes) {
            if !text.is_empty() {
                return text;
            }
        }

        // Identity-H fonts without a usable ToUnicode map: try 2-byte codes.
        let identity = self
            .font_encoding_name(page, font_name)
            .is_some_and(|enc| enc.contains("Identity"));
        if identity && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let code_units: Vec<u16> = bytes
                .chunks(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&code_units);
            if !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }

        log::trace!("falling back to plain decoding for font {:?}", String::from_utf8_lossy(font_name));
        decode_text_simple(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_text_simple_utf8() {
        assert_eq!(decode_text_simple("Shūji".as_bytes()), "Shūji");
    }

    #[test]
    fn decode_text_simple_latin1() {
        // 0xE9 is U+00E9 in Latin-1 but not valid standalone UTF-8.
        let input: &[u8] = &[0x63, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text_simple(input), "caf\u{00E9}");
    }

    #[test]
    fn decode_text_simple_utf16be_private_use() {
        // Icon glyphs live in the private use area.
        let input: &[u8] = &[0xFE, 0xFF, 0xF3, 0xB0, 0x00, 0x20];
        assert_eq!(decode_text_simple(input), "\u{f3b0} ");
    }

    #[test]
    fn decode_text_simple_utf16be_odd_trailing_byte() {
        let input: &[u8] = &[0xFE, 0xFF, 0x00, 0x41, 0x00];
        assert_eq!(decode_text_simple(input), "A");
    }

    #[test]
    fn decode_text_simple_empty() {
        assert_eq!(decode_text_simple(&[]), "");
    }

    #[test]
    fn get_number_accepts_integers_and_reals() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(-10)), Some(-10.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(2.5)), Some(2.5));
        assert_eq!(get_number_from_value(&PdfValue::Name(b"F1".to_vec())), None);
    }

    #[test]
    fn convert_tj_array() {
        let arr = lopdf::Object::Array(vec![
            lopdf::Object::String(b"Ring".to_vec(), lopdf::StringFormat::Literal),
            lopdf::Object::Integer(-250),
        ]);
        assert_eq!(
            convert_object(&arr),
            PdfValue::Array(vec![PdfValue::Str(b"Ring".to_vec()), PdfValue::Integer(-250)]),
        );
    }

    #[test]
    fn convert_stream_uses_dict() {
        let mut dict = lopdf::Dictionary::new();
        dict.set("Length", lopdf::Object::Integer(0));
        let obj = lopdf::Object::Stream(lopdf::Stream::new(dict, vec![]));

        match convert_object(&obj) {
            PdfValue::Dict(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].0, b"Length");
            }
            other => panic!("expected Dict for stream, got {:?}", other),
        }
    }

    #[test]
    fn load_rejects_garbage() {
        assert!(matches!(
            LopdfBackend::load_bytes(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }
}
