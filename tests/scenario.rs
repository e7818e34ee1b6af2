use std::path::Path;

use quest_hero::config::HeroConfig;
use quest_hero::error::Error;
use quest_hero::hero::HeroEvent;
use quest_hero::scene::{test_scene, Scenario, Session};

#[test]
fn builtin_scenario_runs_to_the_end() {
    let scenario = test_scene::test_scenario().unwrap();
    let mut session = Session::new(&scenario, HeroConfig::default()).unwrap();

    session.run(5000, 10);

    assert_eq!(session.now(), 5000);
    let events = session.events();
    assert!(events
        .iter()
        .any(|event| matches!(event, HeroEvent::ObjectThrown(_))));
    assert!(events
        .iter()
        .any(|event| matches!(event, HeroEvent::StateChanged { to: "using_item", .. })));
    assert_eq!(session.camera.tracked_entity(), Some(session.hero.entity()));
}

#[test]
fn config_overrides_reach_the_hero() {
    let scenario = test_scene::test_scenario().unwrap();
    let config = HeroConfig::from_ron("(walking_speed: 40.0)", Path::new("slow.ron")).unwrap();
    let session = Session::new(&scenario, config).unwrap();

    assert_eq!(session.hero.body.config.walking_speed, 40.0);
    assert_eq!(session.hero.body.config.run_wind_up_ms, 500);
}

#[test]
fn missing_scenario_file_is_an_io_error() {
    let err = Scenario::load_from_file(Path::new("does/not/exist.ron")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn scenario_without_maps_cannot_start() {
    let scenario = Scenario::from_ron("(maps: [])", Path::new("empty.ron")).unwrap();
    assert!(matches!(
        Session::new(&scenario, HeroConfig::default()),
        Err(Error::NoMaps)
    ));
}
