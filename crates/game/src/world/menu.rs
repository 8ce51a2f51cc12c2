use std::any::Any;

use hotswap_engine::{reflect_fields, AssetSlot, HostVersion, Reflect, Texture};

pub(crate) trait Menu {
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn as_title(&self) -> Option<&TitleMenu> {
        None
    }
}

#[derive(Debug)]
pub(crate) struct TemporaryAnimatedSprite {
    layout: HostVersion,
    texture: AssetSlot<Texture>,
}

impl TemporaryAnimatedSprite {
    pub(crate) fn new(layout: HostVersion) -> Self {
        Self {
            layout,
            texture: AssetSlot::Empty,
        }
    }

    pub(crate) fn texture(&self) -> &AssetSlot<Texture> {
        &self.texture
    }

    fn texture_field_name(&self) -> &'static str {
        match self.layout {
            HostVersion::Legacy => "Texture",
            HostVersion::Modern => "texture",
        }
    }
}

impl Reflect for TemporaryAnimatedSprite {
    fn type_name(&self) -> &'static str {
        "TemporaryAnimatedSprite"
    }

    fn field_any(&self, name: &str) -> Option<&dyn Any> {
        (name == self.texture_field_name()).then_some(&self.texture as &dyn Any)
    }

    fn field_any_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        if name == self.texture_field_name() {
            Some(&mut self.texture)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub(crate) struct TitleMenu {
    clouds_texture: AssetSlot<Texture>,
    title_buttons_texture: AssetSlot<Texture>,
    birds: Vec<TemporaryAnimatedSprite>,
}

reflect_fields!(TitleMenu as "TitleMenu" {
    "cloudsTexture" => clouds_texture,
    "titleButtonsTexture" => title_buttons_texture,
    "birds" => birds,
});

impl TitleMenu {
    pub(crate) fn new(layout: HostVersion, bird_count: usize) -> Self {
        Self {
            clouds_texture: AssetSlot::Empty,
            title_buttons_texture: AssetSlot::Empty,
            birds: (0..bird_count)
                .map(|_| TemporaryAnimatedSprite::new(layout))
                .collect(),
        }
    }

    pub(crate) fn clouds_texture(&self) -> &AssetSlot<Texture> {
        &self.clouds_texture
    }

    pub(crate) fn title_buttons_texture(&self) -> &AssetSlot<Texture> {
        &self.title_buttons_texture
    }

    pub(crate) fn birds(&self) -> &[TemporaryAnimatedSprite] {
        &self.birds
    }
}

impl Menu for TitleMenu {
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        self
    }

    fn as_title(&self) -> Option<&TitleMenu> {
        Some(self)
    }
}
