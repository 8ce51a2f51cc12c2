use hotswap_engine::{AssetSlot, Texture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocationKind {
    Farm,
    Buildable,
    Interior,
}

impl LocationKind {
    pub(crate) fn accepts_buildings(self) -> bool {
        matches!(self, Self::Farm | Self::Buildable)
    }
}

#[derive(Debug)]
pub(crate) struct Building {
    // Upgrades rename the type in place (`Barn` becomes `Big Barn`).
    pub(crate) building_type: Option<String>,
    pub(crate) texture: AssetSlot<Texture>,
}

impl Building {
    pub(crate) fn new(building_type: &str) -> Self {
        Self {
            building_type: Some(building_type.to_string()),
            texture: AssetSlot::Empty,
        }
    }
}

#[derive(Debug)]
pub(crate) struct GameLocation {
    pub(crate) name: String,
    pub(crate) kind: LocationKind,
    pub(crate) buildings: Vec<Building>,
    pub(crate) house_textures: AssetSlot<Texture>,
}

impl GameLocation {
    pub(crate) fn new(name: &str, kind: LocationKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            buildings: Vec::new(),
            house_textures: AssetSlot::Empty,
        }
    }

    pub(crate) fn with_building(mut self, building_type: &str) -> Self {
        self.buildings.push(Building::new(building_type));
        self
    }
}
