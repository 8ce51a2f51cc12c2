use std::collections::BTreeMap;

use roxmltree::{Document, Node};
use serde::de::DeserializeOwned;

use crate::asset_key::CanonicalKey;

use super::asset::{AssetKind, AssetValue, Glyph, IntTable, SpriteFont, StringTable, Texture};
use super::loader::LoadError;

pub(crate) fn decode_asset(
    key: &CanonicalKey,
    kind: AssetKind,
    bytes: &[u8],
) -> Result<AssetValue, LoadError> {
    match kind {
        AssetKind::Texture => decode_texture(key, bytes).map(AssetValue::Texture),
        AssetKind::Font => decode_sprite_font(key, bytes).map(AssetValue::Font),
        AssetKind::IntTable => decode_table::<IntTable>(key, bytes).map(AssetValue::IntTable),
        AssetKind::StringTable => {
            decode_table::<StringTable>(key, bytes).map(AssetValue::StringTable)
        }
    }
}

pub(crate) fn decode_texture(key: &CanonicalKey, bytes: &[u8]) -> Result<Texture, LoadError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|error| decode_error(key, format!("invalid PNG: {error}")))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Texture::new(width, height, rgba.into_raw()))
}

pub(crate) fn decode_table<T: DeserializeOwned>(
    key: &CanonicalKey,
    bytes: &[u8],
) -> Result<T, LoadError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        decode_error(
            key,
            format!("invalid data table at '{path}': {}", error.into_inner()),
        )
    })
}

pub(crate) fn decode_sprite_font(
    key: &CanonicalKey,
    bytes: &[u8],
) -> Result<SpriteFont, LoadError> {
    let raw = std::str::from_utf8(bytes)
        .map_err(|error| decode_error(key, format!("sprite font is not UTF-8: {error}")))?;
    let doc = Document::parse(raw)
        .map_err(|error| decode_error(key, format!("malformed XML: {error}")))?;

    let root = doc.root_element();
    if root.tag_name().name() != "SpriteFont" {
        return Err(node_error(
            key,
            &doc,
            root,
            "root element must be <SpriteFont>".to_string(),
        ));
    }

    let line_spacing = parse_attr::<i32>(key, &doc, root, "lineSpacing")?;
    let spacing = match root.attribute("spacing") {
        Some(_) => parse_attr::<f32>(key, &doc, root, "spacing")?,
        None => 0.0,
    };
    let default_character = match root.attribute("defaultCharacter") {
        Some(value) => Some(single_char(key, &doc, root, "defaultCharacter", value)?),
        None => None,
    };

    let mut glyphs = BTreeMap::new();
    for node in root.children().filter(|node| node.is_element()) {
        if node.tag_name().name() != "Glyph" {
            return Err(node_error(
                key,
                &doc,
                node,
                format!("unsupported element <{}>", node.tag_name().name()),
            ));
        }
        let value = node
            .attribute("char")
            .ok_or_else(|| node_error(key, &doc, node, "missing attribute 'char'".to_string()))?;
        let ch = single_char(key, &doc, node, "char", value)?;
        let glyph = Glyph {
            x: parse_attr(key, &doc, node, "x")?,
            y: parse_attr(key, &doc, node, "y")?,
            width: parse_attr(key, &doc, node, "width")?,
            height: parse_attr(key, &doc, node, "height")?,
        };
        if glyphs.insert(ch, glyph).is_some() {
            return Err(node_error(
                key,
                &doc,
                node,
                format!("duplicate glyph for '{ch}'"),
            ));
        }
    }

    Ok(SpriteFont {
        line_spacing,
        spacing,
        default_character,
        glyphs,
    })
}

fn parse_attr<T: std::str::FromStr>(
    key: &CanonicalKey,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    name: &str,
) -> Result<T, LoadError> {
    let value = node
        .attribute(name)
        .ok_or_else(|| node_error(key, doc, node, format!("missing attribute '{name}'")))?;
    value.trim().parse::<T>().map_err(|_| {
        node_error(
            key,
            doc,
            node,
            format!("attribute '{name}' has invalid value '{value}'"),
        )
    })
}

fn single_char(
    key: &CanonicalKey,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    name: &str,
    value: &str,
) -> Result<char, LoadError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(node_error(
            key,
            doc,
            node,
            format!("attribute '{name}' must be a single character"),
        )),
    }
}

fn node_error(
    key: &CanonicalKey,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    message: String,
) -> LoadError {
    let pos = doc.text_pos_at(node.range().start);
    decode_error(
        key,
        format!("{message} (line {}, column {})", pos.row, pos.col),
    )
}

fn decode_error(key: &CanonicalKey, message: String) -> LoadError {
    LoadError::Decode {
        key: key.clone(),
        message,
    }
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
