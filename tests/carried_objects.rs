mod common;

use glam::Vec2;
use hecs::Entity;
use quest_hero::components::{Ability, Destructible, Equipment, EntityKind};
use quest_hero::engine::Command;
use quest_hero::hero::{ActionEffect, Hero, HeroEvent};
use quest_hero::map::Map;
use quest_hero::state::{CarriedObjectBehavior, CustomState, FreeState, State, SwimmingState};

use common::{run_until, spawn_hero, walled_map};

/// Hero facing right with a pot right in front of it, lifting started.
fn lifting_setup() -> (Map, Hero, Entity) {
    let mut map = walled_map(16, 10);
    let pot = map.spawn(EntityKind::Destructible, Vec2::new(48.0, 32.0), Vec2::splat(16.0));
    map.world
        .insert_one(
            pot,
            Destructible {
                weight: 1,
                damage_on_enemies: 1,
            },
        )
        .unwrap();
    let equipment = Equipment::default().with_ability(Ability::Lift, 1);
    let mut hero = spawn_hero(&mut map, Vec2::new(32.0, 32.0), equipment);
    hero.body.direction4 = 0;

    hero.commands_mut().press(Command::Action);
    hero.update(&mut map, 10);
    hero.commands_mut().release(Command::Action);
    assert_eq!(hero.state_name(), "lifting");
    assert_eq!(hero.get_carried_object(), Some(pot));
    (map, hero, pot)
}

#[test]
fn lifting_completes_into_carrying() {
    let (mut map, mut hero, pot) = lifting_setup();
    assert_eq!(hero.body.action_effect, ActionEffect::Throw);
    assert_eq!(map.kind_of(pot), Some(EntityKind::CarriedObject));

    run_until(&mut hero, &mut map, 320);

    assert_eq!(hero.state_name(), "carrying");
    assert_eq!(hero.get_carried_object(), Some(pot));
}

#[test]
fn interrupting_with_a_throwing_state_throws_the_object() {
    let (mut map, mut hero, pot) = lifting_setup();
    assert_eq!(
        FreeState::new().get_previous_carried_object_behavior(),
        CarriedObjectBehavior::Throw
    );

    hero.start_free(&mut map);

    assert!(map.is_thrown(pot));
    assert_eq!(hero.get_carried_object(), None);
    assert!(hero.drain_events().contains(&HeroEvent::ObjectThrown(pot)));
}

#[test]
fn interrupting_with_a_removing_state_destroys_the_object() {
    let (mut map, mut hero, pot) = lifting_setup();

    hero.set_state(&mut map, SwimmingState::new());

    assert!(!map.contains(pot));
    assert!(hero.drain_events().contains(&HeroEvent::ObjectRemoved(pot)));
}

#[test]
fn interrupting_with_a_keeping_state_hands_the_object_over() {
    let (mut map, mut hero, pot) = lifting_setup();
    let mut custom = CustomState::new("holding");
    custom
        .table_mut()
        .set_carried_object_action(CarriedObjectBehavior::Keep);

    hero.start_custom(&mut map, custom);

    assert!(map.contains(pot));
    assert!(!map.is_thrown(pot));
    assert_eq!(hero.get_carried_object(), Some(pot));

    // Leaving the custom state applies the next state's policy again.
    hero.start_free(&mut map);
    assert!(map.is_thrown(pot));
}

#[test]
fn being_hurt_while_lifting_throws_the_object() {
    let (mut map, mut hero, pot) = lifting_setup();

    assert!(hero.hurt(&mut map, Vec2::new(40.0, 64.0), 1));

    assert_eq!(hero.state_name(), "hurt");
    assert!(map.is_thrown(pot));
}

#[test]
fn carrying_then_throwing_flies_and_breaks() {
    let (mut map, mut hero, pot) = lifting_setup();
    run_until(&mut hero, &mut map, 320);
    assert_eq!(hero.state_name(), "carrying");

    hero.commands_mut().press(Command::Action);
    hero.update(&mut map, 330);
    hero.commands_mut().release(Command::Action);
    assert_eq!(hero.state_name(), "free");
    assert!(map.is_thrown(pot));

    // 64 px at 200 px/s.
    run_until(&mut hero, &mut map, 700);
    assert!(!map.contains(pot));
}

#[test]
fn too_heavy_objects_are_not_lifted() {
    let mut map = walled_map(16, 10);
    let stone = map.spawn(EntityKind::Destructible, Vec2::new(48.0, 32.0), Vec2::splat(16.0));
    map.world
        .insert_one(
            stone,
            Destructible {
                weight: 2,
                damage_on_enemies: 4,
            },
        )
        .unwrap();
    let equipment = Equipment::default().with_ability(Ability::Lift, 1);
    let mut hero = spawn_hero(&mut map, Vec2::new(32.0, 32.0), equipment);
    hero.body.direction4 = 0;

    hero.commands_mut().press(Command::Action);
    hero.update(&mut map, 10);

    assert_eq!(hero.state_name(), "free");
    assert_eq!(map.kind_of(stone), Some(EntityKind::Destructible));
}
