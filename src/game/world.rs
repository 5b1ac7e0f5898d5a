use std::collections::HashMap;
use std::sync::Arc;

use super::map::GameMap;
use crate::config::MapConfig;

/// Every zone of the world, loaded once at boot. Read-only afterwards.
pub struct World {
    maps: HashMap<i32, Arc<GameMap>>,
}

impl World {
    pub fn from_config(configs: &[MapConfig]) -> Self {
        let mut maps = HashMap::new();
        for cfg in configs {
            tracing::info!(
                "[world] [load] map {} '{}' ({}x{})",
                cfg.id,
                cfg.name,
                cfg.size_x,
                cfg.size_y
            );
            maps.insert(
                cfg.id,
                Arc::new(GameMap::new(cfg.id, cfg.name.clone(), cfg.size_x, cfg.size_y)),
            );
        }
        Self { maps }
    }

    /// Starts every map's background tick. Requires a running runtime, so
    /// it is separate from construction.
    pub fn start_ticks(&self) {
        for map in self.maps.values() {
            map.spawn_tick();
        }
    }

    pub fn get_map(&self, id: i32) -> Option<Arc<GameMap>> {
        self.maps.get(&id).cloned()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs() -> Vec<MapConfig> {
        vec![
            MapConfig { id: 1, name: "Harbor".into(), size_x: 100, size_y: 100 },
            MapConfig { id: 5, name: "Meadow".into(), size_x: 50, size_y: 50 },
        ]
    }

    #[test]
    fn test_from_config_registers_all_maps() {
        let world = World::from_config(&configs());
        assert_eq!(world.map_count(), 2);
        assert_eq!(world.get_map(5).unwrap().size_x, 50);
        assert!(world.get_map(9).is_none());
    }
}
