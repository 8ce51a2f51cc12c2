use hotswap_engine::{AssetSlot, LoadError, Texture};

use super::GameWorld;

#[derive(Debug, Default)]
pub(crate) struct FrameReport {
    pub(crate) drawn: usize,
    pub(crate) unloaded: usize,
    pub(crate) failures: Vec<LoadError>,
}

impl FrameReport {
    fn visit(&mut self, slot: &AssetSlot<Texture>) {
        match slot.get() {
            Ok(Some(_)) => self.drawn += 1,
            Ok(None) => self.unloaded += 1,
            Err(error) => self.failures.push(error),
        }
    }
}

pub(crate) fn draw_frame(world: &mut GameWorld) -> FrameReport {
    let mut report = FrameReport::default();
    let globals = &world.globals;
    for slot in [
        &globals.mouse_cursors,
        &globals.shadow_texture,
        &globals.day_bg,
        &globals.night_bg,
        &globals.crop_sprite_sheet,
        &globals.debris_sprite_sheet,
        &globals.emote_sprite_sheet,
        &globals.rain_texture,
        &globals.tool_sprite_sheet,
        &globals.animations,
        &globals.buffs_icons,
        &globals.big_craftable_sprite_sheet,
        &globals.menu_texture,
        &globals.object_sprite_sheet,
        &world.terrain.floors,
        &world.terrain.hoe_dirt_light,
        &world.terrain.fruit_trees,
        &world.items.furniture,
        &world.items.wallpaper,
        world.bushes().texture_slot(),
        world.farm_statics().house_textures(),
    ] {
        report.visit(slot);
    }

    if let Some(player) = world.player.as_mut() {
        let drawn_before = report.drawn;
        report.visit(player.renderer.base_texture());
        if report.drawn > drawn_before && !player.renderer.is_recolored() {
            player.renderer.mark_recolored();
        }
    }
    if let Some(title) = world.active_menu.as_deref().and_then(|menu| menu.as_title()) {
        report.visit(title.clouds_texture());
        report.visit(title.title_buttons_texture());
        for bird in title.birds() {
            report.visit(bird.texture());
        }
    }
    for location in &world.locations {
        if location.kind.accepts_buildings() {
            for building in &location.buildings {
                report.visit(&building.texture);
            }
        }
    }
    report
}
