use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub type IntTable = BTreeMap<i32, String>;
pub type StringTable = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    rgba: Rc<[u8]>,
}

impl Texture {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba: rgba.into(),
        }
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut rgba = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            rgba.extend_from_slice(&color);
        }
        Self::new(width, height, rgba)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = self.rgba.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn shares_pixels_with(&self, other: &Texture) -> bool {
        Rc::ptr_eq(&self.rgba, &other.rgba)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFont {
    pub line_spacing: i32,
    pub spacing: f32,
    pub default_character: Option<char>,
    pub glyphs: BTreeMap<char, Glyph>,
}

impl SpriteFont {
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.default_character.and_then(|fallback| self.glyphs.get(&fallback)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Font,
    IntTable,
    StringTable,
}

impl AssetKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Texture => "texture",
            Self::Font => "sprite font",
            Self::IntTable => "int-keyed data table",
            Self::StringTable => "string-keyed data table",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Texture => "png",
            Self::Font => "xml",
            Self::IntTable | Self::StringTable => "json",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetValue {
    Texture(Texture),
    Font(SpriteFont),
    IntTable(IntTable),
    StringTable(StringTable),
}

impl AssetValue {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Texture(_) => AssetKind::Texture,
            Self::Font(_) => AssetKind::Font,
            Self::IntTable(_) => AssetKind::IntTable,
            Self::StringTable(_) => AssetKind::StringTable,
        }
    }
}

impl From<Texture> for AssetValue {
    fn from(value: Texture) -> Self {
        Self::Texture(value)
    }
}

impl From<SpriteFont> for AssetValue {
    fn from(value: SpriteFont) -> Self {
        Self::Font(value)
    }
}

impl From<IntTable> for AssetValue {
    fn from(value: IntTable) -> Self {
        Self::IntTable(value)
    }
}

impl From<StringTable> for AssetValue {
    fn from(value: StringTable) -> Self {
        Self::StringTable(value)
    }
}

pub trait ContentAsset: Clone + 'static {
    const KIND: AssetKind;

    fn from_value(value: AssetValue) -> Option<Self>;
}

impl ContentAsset for Texture {
    const KIND: AssetKind = AssetKind::Texture;

    fn from_value(value: AssetValue) -> Option<Self> {
        match value {
            AssetValue::Texture(texture) => Some(texture),
            _ => None,
        }
    }
}

impl ContentAsset for SpriteFont {
    const KIND: AssetKind = AssetKind::Font;

    fn from_value(value: AssetValue) -> Option<Self> {
        match value {
            AssetValue::Font(font) => Some(font),
            _ => None,
        }
    }
}

impl ContentAsset for IntTable {
    const KIND: AssetKind = AssetKind::IntTable;

    fn from_value(value: AssetValue) -> Option<Self> {
        match value {
            AssetValue::IntTable(table) => Some(table),
            _ => None,
        }
    }
}

impl ContentAsset for StringTable {
    const KIND: AssetKind = AssetKind::StringTable;

    fn from_value(value: AssetValue) -> Option<Self> {
        match value {
            AssetValue::StringTable(table) => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_texture_reports_pixels() {
        let texture = Texture::solid(2, 3, [1, 2, 3, 4]);
        assert_eq!(texture.rgba().len(), 24);
        assert_eq!(texture.pixel(1, 2), Some([1, 2, 3, 4]));
        assert_eq!(texture.pixel(2, 0), None);
    }

    #[test]
    fn clones_share_pixel_buffer() {
        let texture = Texture::solid(1, 1, [0, 0, 0, 255]);
        let copy = texture.clone();
        assert!(copy.shares_pixels_with(&texture));
        assert!(!Texture::solid(1, 1, [0, 0, 0, 255]).shares_pixels_with(&texture));
    }

    #[test]
    fn font_falls_back_to_default_character() {
        let mut glyphs = BTreeMap::new();
        let star = Glyph {
            x: 0,
            y: 0,
            width: 6,
            height: 8,
        };
        glyphs.insert('*', star);
        let font = SpriteFont {
            line_spacing: 12,
            spacing: 0.0,
            default_character: Some('*'),
            glyphs,
        };
        assert_eq!(font.glyph('Q'), Some(&star));
    }

    #[test]
    fn typed_extraction_rejects_other_kinds() {
        let value = AssetValue::from(IntTable::new());
        assert_eq!(value.kind(), AssetKind::IntTable);
        assert!(Texture::from_value(value.clone()).is_none());
        assert!(IntTable::from_value(value).is_some());
    }
}
