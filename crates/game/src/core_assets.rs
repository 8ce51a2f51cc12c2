use hotswap_engine::propagation::{bind_slot, load_asset};
use hotswap_engine::{
    check_field, field_mut, field_ref, AssetPropagator, AssetSlot, Binding, CategoryScan,
    EagerBind, FnHandler, HandlerContext, HostVersion, PropagationError, PropagationResult,
    ReflectedBind, TableError, Texture,
};

use crate::world::{Building, FarmerRenderer, GameWorld, Gender, TemporaryAnimatedSprite};

const BUILDINGS_NAMESPACE: &str = "Buildings/";
const TITLE_BUTTONS_FIELD: &str = "titleButtonsTexture";
const TITLE_BIRDS_FIELD: &str = "birds";

type Outcome = Result<PropagationResult, PropagationError>;

pub(crate) fn core_asset_table(
    version: HostVersion,
) -> Result<AssetPropagator<GameWorld>, TableError> {
    AssetPropagator::builder(version)
        // buildings
        .versioned(
            "Buildings/houses",
            EagerBind::new(|world: &mut GameWorld| {
                world.farm_mut().map(|farm| &mut farm.house_textures)
            }),
            ReflectedBind::<GameWorld, Texture>::new(
                |world: &mut GameWorld| Some(world.farm_statics_reflect()),
                "houseTextures",
                Binding::Eager,
            ),
        )
        // characters/farmer
        .eager("Characters/Farmer/accessories", |world: &mut GameWorld| {
            Some(&mut world.farmer_renderer.accessories)
        })
        .versioned(
            "Characters/Farmer/farmer_base",
            FnHandler::new("farmer_renderer_eager", male_renderer_eager),
            FnHandler::new("farmer_renderer_lazy", male_renderer_lazy),
        )
        .versioned(
            "Characters/Farmer/farmer_girl_base",
            FnHandler::new("farmer_renderer_eager", female_renderer_eager),
            FnHandler::new("farmer_renderer_lazy", female_renderer_lazy),
        )
        .eager("Characters/Farmer/hairstyles", |world: &mut GameWorld| {
            Some(&mut world.farmer_renderer.hair_styles)
        })
        .eager("Characters/Farmer/hats", |world: &mut GameWorld| {
            Some(&mut world.farmer_renderer.hats)
        })
        .eager("Characters/Farmer/shirts", |world: &mut GameWorld| {
            Some(&mut world.farmer_renderer.shirts)
        })
        // data
        .eager("Data/Achievements", |world: &mut GameWorld| {
            Some(&mut world.globals.achievements)
        })
        .eager("Data/BigCraftablesInformation", |world: &mut GameWorld| {
            Some(&mut world.globals.big_craftables_information)
        })
        .eager("Data/CookingRecipes", |world: &mut GameWorld| {
            Some(&mut world.recipes.cooking_recipes)
        })
        .eager("Data/CraftingRecipes", |world: &mut GameWorld| {
            Some(&mut world.recipes.crafting_recipes)
        })
        .eager("Data/NPCGiftTastes", |world: &mut GameWorld| {
            Some(&mut world.globals.npc_gift_tastes)
        })
        .eager("Data/ObjectInformation", |world: &mut GameWorld| {
            Some(&mut world.globals.object_information)
        })
        // fonts
        .eager("Fonts/SpriteFont1", |world: &mut GameWorld| {
            Some(&mut world.globals.dialogue_font)
        })
        .eager("Fonts/SmallFont", |world: &mut GameWorld| {
            Some(&mut world.globals.small_font)
        })
        .eager("Fonts/tinyFont", |world: &mut GameWorld| {
            Some(&mut world.globals.tiny_font)
        })
        .eager("Fonts/tinyFontBorder", |world: &mut GameWorld| {
            Some(&mut world.globals.tiny_font_border)
        })
        // lighting
        .eager("LooseSprites/Lighting/greenLight", |world: &mut GameWorld| {
            Some(&mut world.globals.cauldron_light)
        })
        .eager("LooseSprites/Lighting/indoorWindowLight", |world: &mut GameWorld| {
            Some(&mut world.globals.indoor_window_light)
        })
        .eager("LooseSprites/Lighting/lantern", |world: &mut GameWorld| {
            Some(&mut world.globals.lantern)
        })
        .eager("LooseSprites/Lighting/sconceLight", |world: &mut GameWorld| {
            Some(&mut world.globals.sconce_light)
        })
        .eager("LooseSprites/Lighting/windowLight", |world: &mut GameWorld| {
            Some(&mut world.globals.window_light)
        })
        // loose sprites
        .eager("LooseSprites/ControllerMaps", |world: &mut GameWorld| {
            Some(&mut world.globals.controller_maps)
        })
        .eager("LooseSprites/Cursors", |world: &mut GameWorld| {
            Some(&mut world.globals.mouse_cursors)
        })
        .eager("LooseSprites/Daybg", |world: &mut GameWorld| {
            Some(&mut world.globals.day_bg)
        })
        .eager("LooseSprites/font_bold", |world: &mut GameWorld| {
            Some(&mut world.sprite_text.sprite_texture)
        })
        .eager("LooseSprites/font_colored", |world: &mut GameWorld| {
            Some(&mut world.sprite_text.colored_texture)
        })
        .eager("LooseSprites/nightbg", |world: &mut GameWorld| {
            Some(&mut world.globals.night_bg)
        })
        .eager("LooseSprites/shadow", |world: &mut GameWorld| {
            Some(&mut world.globals.shadow_texture)
        })
        // tile sheets
        .eager("TileSheets/critters", |world: &mut GameWorld| {
            Some(&mut world.items.critters)
        })
        .eager("TileSheets/crops", |world: &mut GameWorld| {
            Some(&mut world.globals.crop_sprite_sheet)
        })
        .eager("TileSheets/debris", |world: &mut GameWorld| {
            Some(&mut world.globals.debris_sprite_sheet)
        })
        .eager("TileSheets/emotes", |world: &mut GameWorld| {
            Some(&mut world.globals.emote_sprite_sheet)
        })
        .eager("TileSheets/furniture", |world: &mut GameWorld| {
            Some(&mut world.items.furniture)
        })
        .eager("TileSheets/Projectiles", |world: &mut GameWorld| {
            Some(&mut world.items.projectiles)
        })
        .eager("TileSheets/rain", |world: &mut GameWorld| {
            Some(&mut world.globals.rain_texture)
        })
        // The host drops its tool sheet and rebuilds it on the next draw.
        .lazy("TileSheets/tools", |world: &mut GameWorld| {
            Some(&mut world.globals.tool_sprite_sheet)
        })
        .eager("TileSheets/weapons", |world: &mut GameWorld| {
            Some(&mut world.items.weapons)
        })
        .eager("TileSheets/animations", |world: &mut GameWorld| {
            Some(&mut world.globals.animations)
        })
        .eager("TileSheets/BuffsIcons", |world: &mut GameWorld| {
            Some(&mut world.globals.buffs_icons)
        })
        .versioned(
            "TileSheets/bushes",
            ReflectedBind::<GameWorld, Texture>::new(
                |world: &mut GameWorld| Some(world.bushes_reflect()),
                "texture",
                Binding::Eager,
            ),
            ReflectedBind::<GameWorld, Texture>::new(
                |world: &mut GameWorld| Some(world.bushes_reflect()),
                "texture",
                Binding::Lazy,
            ),
        )
        .eager("TileSheets/Craftables", |world: &mut GameWorld| {
            Some(&mut world.globals.big_craftable_sprite_sheet)
        })
        .eager("TileSheets/fruitTrees", |world: &mut GameWorld| {
            Some(&mut world.terrain.fruit_trees)
        })
        // maps
        .eager("Maps/MenuTiles", |world: &mut GameWorld| {
            Some(&mut world.globals.menu_texture)
        })
        .eager("Maps/springobjects", |world: &mut GameWorld| {
            Some(&mut world.globals.object_sprite_sheet)
        })
        .eager("Maps/walls_and_floors", |world: &mut GameWorld| {
            Some(&mut world.items.wallpaper)
        })
        // minigames
        .reflected::<Texture>(
            "Minigames/Clouds",
            GameWorld::title_menu_mut,
            "cloudsTexture",
            Binding::Eager,
        )
        .versioned(
            "Minigames/TitleButtons",
            FnHandler::new("title_buttons", title_buttons_legacy),
            FnHandler::new("title_buttons", title_buttons_modern),
        )
        // terrain features
        .eager("TerrainFeatures/Flooring", |world: &mut GameWorld| {
            Some(&mut world.terrain.floors)
        })
        .eager("TerrainFeatures/hoeDirt", |world: &mut GameWorld| {
            Some(&mut world.terrain.hoe_dirt_light)
        })
        .eager("TerrainFeatures/hoeDirtDark", |world: &mut GameWorld| {
            Some(&mut world.terrain.hoe_dirt_dark)
        })
        .eager("TerrainFeatures/hoeDirtSnow", |world: &mut GameWorld| {
            Some(&mut world.terrain.hoe_dirt_snow)
        })
        // constructed buildings, keyed by their current type
        .scan(CategoryScan::new(
            BUILDINGS_NAMESPACE,
            GameWorld::live_buildings,
            building_type,
            building_texture,
            version.select(Binding::Eager, Binding::Lazy),
        ))
        .build()
}

fn building_type(building: &Building) -> Option<&str> {
    building.building_type.as_deref()
}

fn building_texture(building: &mut Building) -> &mut AssetSlot<Texture> {
    &mut building.texture
}

fn male_renderer_eager(cx: HandlerContext<'_, GameWorld>) -> Outcome {
    rebuild_farmer_renderer(cx, Gender::Male, Binding::Eager)
}

fn male_renderer_lazy(cx: HandlerContext<'_, GameWorld>) -> Outcome {
    rebuild_farmer_renderer(cx, Gender::Male, Binding::Lazy)
}

fn female_renderer_eager(cx: HandlerContext<'_, GameWorld>) -> Outcome {
    rebuild_farmer_renderer(cx, Gender::Female, Binding::Eager)
}

fn female_renderer_lazy(cx: HandlerContext<'_, GameWorld>) -> Outcome {
    rebuild_farmer_renderer(cx, Gender::Female, Binding::Lazy)
}

fn rebuild_farmer_renderer(
    cx: HandlerContext<'_, GameWorld>,
    gender: Gender,
    binding: Binding,
) -> Outcome {
    let HandlerContext {
        key,
        content,
        world,
    } = cx;
    let Some(player) = world
        .player
        .as_mut()
        .filter(|player| player.gender == gender)
    else {
        return Ok(PropagationResult::NotApplicable);
    };
    let base = bind_slot::<Texture>(binding, content, key)?;
    player.renderer = FarmerRenderer::new(base);
    Ok(PropagationResult::Applied)
}

fn title_buttons_legacy(cx: HandlerContext<'_, GameWorld>) -> Outcome {
    reload_title_buttons(cx, "Texture")
}

fn title_buttons_modern(cx: HandlerContext<'_, GameWorld>) -> Outcome {
    reload_title_buttons(cx, "texture")
}

// Every field shape is checked before anything is loaded or written.
fn reload_title_buttons(cx: HandlerContext<'_, GameWorld>, bird_field: &'static str) -> Outcome {
    let HandlerContext {
        key,
        content,
        world,
    } = cx;
    let Some(menu) = world.title_menu_mut() else {
        return Ok(PropagationResult::NotApplicable);
    };
    let shape = |source| PropagationError::shape(key, source);

    check_field::<AssetSlot<Texture>>(menu, TITLE_BUTTONS_FIELD).map_err(shape)?;
    let birds = field_ref::<Vec<TemporaryAnimatedSprite>>(menu, TITLE_BIRDS_FIELD).map_err(shape)?;
    for bird in birds {
        check_field::<AssetSlot<Texture>>(bird, bird_field).map_err(shape)?;
    }

    let sheet = AssetSlot::Ready(load_asset::<Texture>(content, key)?);
    field_mut::<AssetSlot<Texture>>(menu, TITLE_BUTTONS_FIELD)
        .map_err(shape)?
        .set(sheet.clone());
    let birds = field_mut::<Vec<TemporaryAnimatedSprite>>(menu, TITLE_BIRDS_FIELD)
        .map_err(shape)?
        .into_mut();
    for bird in birds.iter_mut() {
        field_mut::<AssetSlot<Texture>>(bird, bird_field)
            .map_err(shape)?
            .set(sheet.clone());
    }
    Ok(PropagationResult::Applied)
}
