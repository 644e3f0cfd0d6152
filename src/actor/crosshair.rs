//! Crosshair Overlay
//!
//! Inert HUD sprite. Registers its draw metadata and then does nothing;
//! it exists so the renderer has a stable overlay entry.

use crate::actor::{Behavior, Context};
use crate::sim::entity::{ActorState, Entity, EntityKind};
use crate::sim::events::{DrawInfo, RegisterData};

pub struct Crosshair {
    texture: String,
    sprite_index: u32,
}

impl Crosshair {
    pub fn new(texture: impl Into<String>, sprite_index: u32) -> Self {
        Self {
            texture: texture.into(),
            sprite_index,
        }
    }
}

impl Behavior for Crosshair {
    fn register_data(&self) -> RegisterData {
        let mut entity = Entity::new(EntityKind::Crosshair, "crosshair");
        entity.scale = 2.0;
        RegisterData {
            entity,
            draw: DrawInfo {
                texture: Some(self.texture.clone()),
                sprite_index: Some(self.sprite_index),
                hud: true,
                ..DrawInfo::default()
            },
            harm: 0,
        }
    }

    fn on_tick(
        &mut self,
        _ctx: &mut Context,
        _entity: &Entity,
        _state: &ActorState,
        _player: Option<&Entity>,
    ) {
    }
}
