use hotswap_engine::{AssetSlot, Texture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gender {
    Male,
    Female,
}

#[derive(Debug)]
pub(crate) struct FarmerRenderer {
    base_texture: AssetSlot<Texture>,
    recolored: bool,
}

impl FarmerRenderer {
    pub(crate) fn new(base_texture: AssetSlot<Texture>) -> Self {
        Self {
            base_texture,
            recolored: false,
        }
    }

    pub(crate) fn base_texture(&self) -> &AssetSlot<Texture> {
        &self.base_texture
    }

    pub(crate) fn is_recolored(&self) -> bool {
        self.recolored
    }

    pub(crate) fn mark_recolored(&mut self) {
        self.recolored = true;
    }
}

#[derive(Debug)]
pub(crate) struct Farmer {
    pub(crate) name: String,
    pub(crate) gender: Gender,
    pub(crate) renderer: FarmerRenderer,
}

impl Farmer {
    pub(crate) fn new(name: &str, gender: Gender) -> Self {
        Self {
            name: name.to_string(),
            gender,
            renderer: FarmerRenderer::new(AssetSlot::Empty),
        }
    }
}
