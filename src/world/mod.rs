//! World domain — loaded locations and moving the player between them.

use bevy::prelude::*;

use crate::shared::*;

/// Where the player wakes up each morning.
pub const BED_TILE: TileCoord = TileCoord { x: 9, y: 9 };

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Locations>()
            .init_resource::<PlayerState>()
            .add_event::<MapTransitionEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_systems(
                Update,
                (wake_up_after_save, apply_map_transition)
                    .chain()
                    .in_set(DayCycleSet::Wake)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Once the night's save is written the player wakes up in bed, which is a
/// warp into the farmhouse like any other.
fn wake_up_after_save(
    mut save_events: EventReader<SaveCompleteEvent>,
    mut transitions: EventWriter<MapTransitionEvent>,
) {
    for ev in save_events.read() {
        if !ev.success {
            warn!(
                "[World] Waking up after failed save to slot {}: {}",
                ev.slot,
                ev.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        transitions.send(MapTransitionEvent {
            to_map: MapId::FarmHouse,
            to_x: BED_TILE.x,
            to_y: BED_TILE.y,
        });
    }
}

fn apply_map_transition(
    mut events: EventReader<MapTransitionEvent>,
    locations: Res<Locations>,
    mut player_state: ResMut<PlayerState>,
) {
    for ev in events.read() {
        if locations.get(ev.to_map).is_none() {
            warn!("[World] Ignoring warp to unloaded map {:?}", ev.to_map);
            continue;
        }
        player_state.current_map = ev.to_map;
        player_state.tile = TileCoord::new(ev.to_x, ev.to_y);
        info!("[World] Player warped to {:?} ({}, {})", ev.to_map, ev.to_x, ev.to_y);
    }
}
