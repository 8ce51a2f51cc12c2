mod frame;
mod location;
mod menu;
mod player;
mod statics;

use hotswap_engine::{HostVersion, Reflect};

pub(crate) use frame::draw_frame;
pub(crate) use location::{Building, GameLocation, LocationKind};
pub(crate) use menu::{Menu, TemporaryAnimatedSprite, TitleMenu};
pub(crate) use player::{Farmer, FarmerRenderer, Gender};
pub(crate) use statics::{
    BushStatics, FarmStatics, FarmerRendererStatics, Globals, ItemStatics, RecipeStatics,
    SpriteTextStatics, TerrainStatics,
};

#[derive(Default)]
pub(crate) struct GameWorld {
    pub(crate) globals: Globals,
    pub(crate) farmer_renderer: FarmerRendererStatics,
    pub(crate) recipes: RecipeStatics,
    pub(crate) sprite_text: SpriteTextStatics,
    pub(crate) terrain: TerrainStatics,
    pub(crate) items: ItemStatics,
    bushes: BushStatics,
    farm: FarmStatics,
    pub(crate) player: Option<Farmer>,
    pub(crate) active_menu: Option<Box<dyn Menu>>,
    pub(crate) locations: Vec<GameLocation>,
}

impl GameWorld {
    pub(crate) fn sample(layout: HostVersion) -> Self {
        Self {
            player: Some(Farmer::new("Farmer", Gender::Male)),
            active_menu: Some(Box::new(TitleMenu::new(layout, 3))),
            locations: vec![
                GameLocation::new("Farm", LocationKind::Farm)
                    .with_building("Barn")
                    .with_building("Coop")
                    .with_building("Silo"),
                GameLocation::new("FarmHouse", LocationKind::Interior),
                GameLocation::new("Forest", LocationKind::Buildable).with_building("Mill"),
            ],
            ..Self::default()
        }
    }

    pub(crate) fn bushes(&self) -> &BushStatics {
        &self.bushes
    }

    pub(crate) fn bushes_reflect(&mut self) -> &mut dyn Reflect {
        &mut self.bushes
    }

    pub(crate) fn farm_statics(&self) -> &FarmStatics {
        &self.farm
    }

    pub(crate) fn farm_statics_reflect(&mut self) -> &mut dyn Reflect {
        &mut self.farm
    }

    pub(crate) fn farm_mut(&mut self) -> Option<&mut GameLocation> {
        self.locations
            .iter_mut()
            .find(|location| location.kind == LocationKind::Farm)
    }

    pub(crate) fn title_menu_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.active_menu
            .as_deref_mut()
            .filter(|menu| menu.as_title().is_some())
            .map(|menu| menu.as_reflect_mut())
    }

    pub(crate) fn live_buildings(&mut self) -> Vec<&mut Building> {
        self.locations
            .iter_mut()
            .filter(|location| location.kind.accepts_buildings())
            .flat_map(|location| location.buildings.iter_mut())
            .collect()
    }

    pub(crate) fn location_names(&self) -> Vec<&str> {
        self.locations
            .iter()
            .map(|location| location.name.as_str())
            .collect()
    }

    pub(crate) fn building_count(&self) -> usize {
        self.locations
            .iter()
            .filter(|location| location.kind.accepts_buildings())
            .map(|location| location.buildings.len())
            .sum()
    }
}
