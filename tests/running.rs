mod common;

use glam::Vec2;
use quest_hero::components::{Ability, Equipment, Ground, MovementKind};
use quest_hero::engine::Command;
use quest_hero::hero::{Hero, HeroEvent};
use quest_hero::map::Map;

use common::{has_event, run_until, run_until_with, spawn_hero, walled_map};

/// Corridor whose right wall starts at x = 192.
fn corridor() -> Map {
    let mut map = walled_map(20, 8);
    for y in 0..8 {
        map.grounds.set_tile(12, y, Ground::Wall);
    }
    map
}

fn runner(map: &mut Map) -> Hero {
    let equipment = Equipment::default().with_ability(Ability::Run, 1);
    let mut hero = spawn_hero(map, Vec2::new(32.0, 64.0), equipment);
    hero.body.direction4 = 0;
    hero
}

fn press(hero: &mut Hero, map: &mut Map, command: Command, now: u32) {
    hero.commands_mut().press(command);
    hero.update(map, now);
}

#[test]
fn wind_up_then_run_then_bounce_then_free() {
    let mut map = corridor();
    let mut hero = runner(&mut map);

    press(&mut hero, &mut map, Command::Action, 10);
    assert_eq!(hero.state_name(), "running");
    assert!(hero.body.movement.is_none());

    // Wind-up lasts 500 ms from the press.
    run_until(&mut hero, &mut map, 500);
    assert!(hero.body.movement.is_none());
    assert_eq!(hero.body.position.x, 32.0);

    run_until(&mut hero, &mut map, 510);
    let movement = hero.body.movement.as_ref().unwrap();
    assert_eq!(movement.kind(), MovementKind::Straight);

    let bounced_at = run_until_with(&mut hero, &mut map, 2000, |hero| {
        !hero.state().is_touching_ground()
    })
    .unwrap();
    // 144 px at 300 px/s.
    assert!((980..=1020).contains(&bounced_at), "bounced at {bounced_at}");
    assert!(hero.body.position.x <= 176.0);
    assert_eq!(
        hero.body.movement.as_ref().unwrap().kind(),
        MovementKind::Jump
    );
    assert!(!hero.state().get_can_be_hurt(quest_hero::state::Attacker::Script));
    assert!(hero.state().can_avoid_hole());

    let free_at = run_until_with(&mut hero, &mut map, 2000, |hero| hero.is_free()).unwrap();
    assert!(free_at <= bounced_at + 250);
    assert!(hero.body.position.x < 176.0);
    assert!(has_event(&hero.drain_events(), |event| *event == HeroEvent::RunBounce));
}

#[test]
fn releasing_during_wind_up_cancels() {
    let mut map = corridor();
    let mut hero = runner(&mut map);

    press(&mut hero, &mut map, Command::Action, 10);
    run_until(&mut hero, &mut map, 200);
    hero.commands_mut().release(Command::Action);
    hero.update(&mut map, 210);

    assert_eq!(hero.state_name(), "free");
    assert!(hero
        .body
        .movement
        .as_ref()
        .is_some_and(|movement| movement.kind() == MovementKind::Player));
}

#[test]
fn another_direction_during_wind_up_cancels() {
    let mut map = corridor();
    let mut hero = runner(&mut map);

    press(&mut hero, &mut map, Command::Action, 10);
    press(&mut hero, &mut map, Command::Up, 20);

    assert_eq!(hero.state_name(), "free");
}

#[test]
fn suspension_shifts_the_wind_up_deadline() {
    let mut map = corridor();
    let mut hero = runner(&mut map);

    press(&mut hero, &mut map, Command::Action, 10);
    run_until(&mut hero, &mut map, 100);
    hero.set_suspended(&mut map, true, 100);
    // Suspending twice changes nothing.
    hero.set_suspended(&mut map, true, 250);
    run_until(&mut hero, &mut map, 400);
    hero.set_suspended(&mut map, false, 400);

    // 510 + 300 ms suspended.
    run_until(&mut hero, &mut map, 800);
    assert!(hero.body.movement.is_none());
    run_until(&mut hero, &mut map, 810);
    assert!(hero.body.movement.is_some());
    assert_eq!(hero.state_name(), "running");
}

#[test]
fn commands_are_dropped_while_suspended() {
    let mut map = corridor();
    let mut hero = runner(&mut map);

    hero.set_suspended(&mut map, true, 0);
    press(&mut hero, &mut map, Command::Action, 10);
    assert_eq!(hero.state_name(), "free");
    assert!(hero.is_suspended());
}
