use hotswap_engine::{reflect_fields, AssetSlot, IntTable, SpriteFont, StringTable, Texture};

#[derive(Debug, Default)]
pub(crate) struct Globals {
    pub(crate) achievements: AssetSlot<IntTable>,
    pub(crate) big_craftables_information: AssetSlot<IntTable>,
    pub(crate) npc_gift_tastes: AssetSlot<StringTable>,
    pub(crate) object_information: AssetSlot<IntTable>,

    pub(crate) dialogue_font: AssetSlot<SpriteFont>,
    pub(crate) small_font: AssetSlot<SpriteFont>,
    pub(crate) tiny_font: AssetSlot<SpriteFont>,
    pub(crate) tiny_font_border: AssetSlot<SpriteFont>,

    pub(crate) cauldron_light: AssetSlot<Texture>,
    pub(crate) indoor_window_light: AssetSlot<Texture>,
    pub(crate) lantern: AssetSlot<Texture>,
    pub(crate) sconce_light: AssetSlot<Texture>,
    pub(crate) window_light: AssetSlot<Texture>,

    pub(crate) controller_maps: AssetSlot<Texture>,
    pub(crate) mouse_cursors: AssetSlot<Texture>,
    pub(crate) day_bg: AssetSlot<Texture>,
    pub(crate) night_bg: AssetSlot<Texture>,
    pub(crate) shadow_texture: AssetSlot<Texture>,

    pub(crate) crop_sprite_sheet: AssetSlot<Texture>,
    pub(crate) debris_sprite_sheet: AssetSlot<Texture>,
    pub(crate) emote_sprite_sheet: AssetSlot<Texture>,
    pub(crate) rain_texture: AssetSlot<Texture>,
    pub(crate) tool_sprite_sheet: AssetSlot<Texture>,
    pub(crate) animations: AssetSlot<Texture>,
    pub(crate) buffs_icons: AssetSlot<Texture>,
    pub(crate) big_craftable_sprite_sheet: AssetSlot<Texture>,

    pub(crate) menu_texture: AssetSlot<Texture>,
    pub(crate) object_sprite_sheet: AssetSlot<Texture>,
}

#[derive(Debug, Default)]
pub(crate) struct FarmerRendererStatics {
    pub(crate) accessories: AssetSlot<Texture>,
    pub(crate) hair_styles: AssetSlot<Texture>,
    pub(crate) hats: AssetSlot<Texture>,
    pub(crate) shirts: AssetSlot<Texture>,
}

#[derive(Debug, Default)]
pub(crate) struct RecipeStatics {
    pub(crate) cooking_recipes: AssetSlot<StringTable>,
    pub(crate) crafting_recipes: AssetSlot<StringTable>,
}

#[derive(Debug, Default)]
pub(crate) struct SpriteTextStatics {
    pub(crate) sprite_texture: AssetSlot<Texture>,
    pub(crate) colored_texture: AssetSlot<Texture>,
}

#[derive(Debug, Default)]
pub(crate) struct TerrainStatics {
    pub(crate) floors: AssetSlot<Texture>,
    pub(crate) hoe_dirt_light: AssetSlot<Texture>,
    pub(crate) hoe_dirt_dark: AssetSlot<Texture>,
    pub(crate) hoe_dirt_snow: AssetSlot<Texture>,
    pub(crate) fruit_trees: AssetSlot<Texture>,
}

#[derive(Debug, Default)]
pub(crate) struct ItemStatics {
    pub(crate) critters: AssetSlot<Texture>,
    pub(crate) furniture: AssetSlot<Texture>,
    pub(crate) projectiles: AssetSlot<Texture>,
    pub(crate) weapons: AssetSlot<Texture>,
    pub(crate) wallpaper: AssetSlot<Texture>,
}

#[derive(Debug, Default)]
pub(crate) struct BushStatics {
    texture: AssetSlot<Texture>,
}

reflect_fields!(BushStatics as "Bush" { "texture" => texture });

impl BushStatics {
    pub(crate) fn texture_slot(&self) -> &AssetSlot<Texture> {
        &self.texture
    }
}

#[derive(Debug, Default)]
pub(crate) struct FarmStatics {
    house_textures: AssetSlot<Texture>,
}

reflect_fields!(FarmStatics as "Farm" { "houseTextures" => house_textures });

impl FarmStatics {
    pub(crate) fn house_textures(&self) -> &AssetSlot<Texture> {
        &self.house_textures
    }
}
