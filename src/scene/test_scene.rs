use std::path::Path;

use crate::error::Result;

use super::Scenario;

/// Built-in scenario used when no file is given: the hero lifts a pot,
/// throws it at an enemy, swings the sword and runs into a wall.
pub const TEST_SCENARIO: &str = include_str!("../../assets/test_scenario.ron");

pub fn test_scenario() -> Result<Scenario> {
    Scenario::from_ron(TEST_SCENARIO, Path::new("<builtin>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Ground;
    use crate::config::HeroConfig;
    use crate::hero::HeroEvent;
    use crate::scene::Session;

    #[test]
    fn builtin_scenario_parses() {
        let scenario = test_scenario().unwrap();
        assert_eq!(scenario.starting_map().unwrap().id, "meadow");
        assert_eq!(scenario.maps[0].entities.len(), 6);
        assert_eq!(scenario.command_script().unwrap().len(), 12);
    }

    #[test]
    fn builtin_map_is_walled_in() {
        let scenario = test_scenario().unwrap();
        let map = scenario.starting_map().unwrap().build().unwrap();

        assert_eq!((map.grounds.width(), map.grounds.height()), (20, 12));
        for x in 0..20 {
            assert_eq!(map.grounds.tile(x, 0), Ground::Wall);
            assert_eq!(map.grounds.tile(x, 11), Ground::Wall);
        }
        assert_eq!(map.grounds.tile(1, 1), Ground::Traversable);
        assert_eq!(map.grounds.tile(15, 8), Ground::Hole);
    }

    #[test]
    fn builtin_scenario_lifts_the_pot() {
        let scenario = test_scenario().unwrap();
        let mut session = Session::new(&scenario, HeroConfig::default()).unwrap();

        session.run(1000, 10);

        assert!(session
            .events()
            .iter()
            .any(|event| matches!(event, HeroEvent::ObjectLifted(_))));
        assert_eq!(session.hero.state_name(), "carrying");
    }
}
