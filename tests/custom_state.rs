mod common;

use glam::Vec2;
use quest_hero::components::{Ability, Equipment, Ground, MovementKind};
use quest_hero::engine::Command;
use quest_hero::error::Error;
use quest_hero::hero::Hero;
use quest_hero::map::Map;
use quest_hero::state::{
    CapabilityTable, CustomState, CustomStateHooks, FreeState, State, StateContext,
};

use common::{new_log, spawn_hero, walled_map, Log};

struct Script {
    log: Log,
}

impl CustomStateHooks for Script {
    fn on_started(
        &mut self,
        _table: &mut CapabilityTable,
        _ctx: &mut StateContext<'_>,
        previous: Option<&str>,
    ) {
        self.log
            .borrow_mut()
            .push(format!("started after {}", previous.unwrap_or("nothing")));
    }

    fn on_command_pressed(
        &mut self,
        table: &mut CapabilityTable,
        ctx: &mut StateContext<'_>,
        command: Command,
    ) -> bool {
        match command {
            Command::Action => {
                ctx.set_state(FreeState::new());
                true
            }
            Command::Item1 => {
                // Scripts may change capabilities on the fly.
                table.set_property("can_use_sword", false).is_ok()
            }
            _ => false,
        }
    }

    fn on_finished(&mut self, _table: &mut CapabilityTable, _ctx: &mut StateContext<'_>, next: &str) {
        self.log.borrow_mut().push(format!("finished before {next}"));
    }
}

fn setup() -> (Map, Hero) {
    let mut map = walled_map(10, 10);
    let equipment = Equipment::default().with_ability(Ability::Sword, 1);
    let hero = spawn_hero(&mut map, Vec2::new(32.0, 32.0), equipment);
    (map, hero)
}

#[test]
fn hooks_receive_lifecycle_and_commands() {
    let (mut map, mut hero) = setup();
    let log = new_log();

    hero.start_custom(
        &mut map,
        CustomState::new("scripted").with_hooks(Script { log: log.clone() }),
    );
    assert_eq!(hero.state_name(), "custom");
    assert_eq!(
        hero.state().as_custom().map(|custom| custom.description()),
        Some("scripted")
    );

    hero.commands_mut().press(Command::Action);
    hero.update(&mut map, 10);

    assert_eq!(hero.state_name(), "free");
    assert_eq!(
        *log.borrow(),
        vec!["started after free", "finished before free"]
    );
}

#[test]
fn sword_follows_the_capability_table() {
    let (mut map, mut hero) = setup();
    let log = new_log();
    hero.start_custom(
        &mut map,
        CustomState::new("scripted").with_hooks(Script { log }),
    );

    // The hook turns the sword off.
    hero.commands_mut().press(Command::Item1);
    hero.update(&mut map, 10);
    hero.commands_mut().press(Command::Attack);
    hero.update(&mut map, 20);
    assert_eq!(hero.state_name(), "custom");
    assert!(!hero
        .state()
        .as_custom()
        .unwrap()
        .table()
        .get(quest_hero::state::Capability::CanUseSword));

    hero.commands_mut().release(Command::Attack);
    hero.update(&mut map, 30);
    let mut armed = CustomState::new("armed");
    armed.set_property("can_use_sword", true).unwrap();
    hero.start_custom(&mut map, armed);
    hero.commands_mut().press(Command::Attack);
    hero.update(&mut map, 40);
    assert_eq!(hero.state_name(), "sword_swinging");
}

#[test]
fn empty_table_behaves_like_a_walking_state() {
    let custom = CustomState::new("plain");

    assert!(custom.is_visible());
    assert!(custom.get_can_control_movement());
    assert!(custom.is_touching_ground());
    assert!(custom.is_wall_obstacle());
    assert!(!custom.is_hole_obstacle());
    assert!(!custom.can_avoid_hole());
    assert!(custom.is_affected_by_grass());
    assert!(!custom.is_enemy_obstacle(&quest_hero::components::Enemy::new(1, 1)));
}

#[test]
fn unknown_names_are_soft_errors() {
    let mut custom = CustomState::new("plain");

    assert!(matches!(
        custom.set_property("can_fly", true),
        Err(Error::UnknownCapability(name)) if name == "can_fly"
    ));
    assert!(matches!(
        custom.table_mut().set_carried_object_action_by_name("juggle"),
        Err(Error::UnknownCarriedObjectAction(_))
    ));
    assert!(custom
        .table_mut()
        .set_carried_object_action_by_name("keep")
        .is_ok());
}

#[test]
fn ground_effects_follow_the_table() {
    let mut map = walled_map(10, 10);
    map.grounds.set_tile(4, 4, Ground::Hole);
    let mut hero = spawn_hero(&mut map, Vec2::new(32.0, 32.0), Equipment::default());

    let mut floating = CustomState::new("floating");
    floating
        .table_mut()
        .set_affected_by_ground(Ground::Hole, false);
    hero.start_custom(&mut map, floating);
    // Center on the hole tile (64..80).
    hero.body.position = Vec2::new(64.0, 64.0);
    hero.update(&mut map, 10);
    assert_eq!(hero.state_name(), "custom");
    assert_eq!(hero.body.ground_below, Ground::Hole);

    hero.start_custom(&mut map, CustomState::new("grounded"));
    hero.update(&mut map, 20);
    assert_eq!(hero.state_name(), "falling");
}

/// Item 1 takes movement control away, item 2 gives it back.
struct Steering;

impl CustomStateHooks for Steering {
    fn on_command_pressed(
        &mut self,
        table: &mut CapabilityTable,
        _ctx: &mut StateContext<'_>,
        command: Command,
    ) -> bool {
        match command {
            Command::Item1 => table.set_property("can_control_movement", false).is_ok(),
            Command::Item2 => table.set_property("can_control_movement", true).is_ok(),
            _ => false,
        }
    }
}

#[test]
fn movement_control_follows_the_table_while_running() {
    let (mut map, mut hero) = setup();
    hero.start_custom(&mut map, CustomState::new("steering").with_hooks(Steering));

    hero.commands_mut().press(Command::Right);
    common::run_until(&mut hero, &mut map, 200);
    assert!(hero.body.position.x > 40.0);

    hero.commands_mut().press(Command::Item1);
    hero.update(&mut map, 210);
    assert!(!hero.state().get_can_control_movement());
    assert!(hero.body.movement.is_none());
    let stopped_at = hero.body.position.x;
    common::run_until(&mut hero, &mut map, 400);
    assert_eq!(hero.body.position.x, stopped_at);

    // Right is still held.
    hero.commands_mut().press(Command::Item2);
    hero.update(&mut map, 410);
    assert!(hero.state().get_can_control_movement());
    assert!(hero
        .body
        .movement
        .as_ref()
        .is_some_and(|movement| movement.kind() == MovementKind::Player));
    common::run_until(&mut hero, &mut map, 600);
    assert!(hero.body.position.x > stopped_at + 10.0);
    assert_eq!(hero.state_name(), "custom");
}
