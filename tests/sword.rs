mod common;

use glam::Vec2;
use quest_hero::components::{Ability, Enemy, Equipment, EntityKind, MovementKind};
use quest_hero::config::HeroConfig;
use quest_hero::engine::Command;
use quest_hero::hero::{Hero, HeroEvent};
use quest_hero::map::Map;

use common::{has_event, run_until, run_until_with, spawn_hero, walled_map};

fn swordsman(map: &mut Map) -> Hero {
    let equipment = Equipment::default().with_ability(Ability::Sword, 1);
    // Facing down.
    spawn_hero(map, Vec2::new(64.0, 64.0), equipment)
}

#[test]
fn swing_ends_in_free_when_attack_is_released() {
    let mut map = walled_map(12, 12);
    let mut hero = swordsman(&mut map);

    hero.commands_mut().press(Command::Attack);
    hero.update(&mut map, 10);
    assert_eq!(hero.state_name(), "sword_swinging");
    hero.commands_mut().release(Command::Attack);

    run_until(&mut hero, &mut map, 300);
    assert_eq!(hero.state_name(), "sword_swinging");
    run_until(&mut hero, &mut map, 310);
    assert_eq!(hero.state_name(), "free");
}

#[test]
fn holding_attack_loads_then_spins() {
    let mut map = walled_map(12, 12);
    let mut hero = swordsman(&mut map);

    hero.commands_mut().press(Command::Attack);
    run_until(&mut hero, &mut map, 310);
    assert_eq!(hero.state_name(), "sword_loading");

    // Loaded one second after loading started.
    run_until(&mut hero, &mut map, 1300);
    assert!(!has_event(&hero.drain_events(), |event| *event == HeroEvent::SwordLoaded));
    run_until(&mut hero, &mut map, 1320);
    assert!(has_event(&hero.drain_events(), |event| *event == HeroEvent::SwordLoaded));

    hero.commands_mut().release(Command::Attack);
    hero.update(&mut map, 1330);
    assert_eq!(hero.state_name(), "spin_attack");

    run_until(&mut hero, &mut map, 2000);
    assert_eq!(hero.state_name(), "free");
}

#[test]
fn releasing_before_loaded_goes_back_to_free() {
    let mut map = walled_map(12, 12);
    let mut hero = swordsman(&mut map);

    hero.commands_mut().press(Command::Attack);
    run_until(&mut hero, &mut map, 500);
    assert_eq!(hero.state_name(), "sword_loading");
    hero.commands_mut().release(Command::Attack);
    hero.update(&mut map, 510);

    assert_eq!(hero.state_name(), "free");
}

#[test]
fn no_sword_no_swing() {
    let mut map = walled_map(12, 12);
    let mut hero = spawn_hero(&mut map, Vec2::new(64.0, 64.0), Equipment::default());

    hero.commands_mut().press(Command::Attack);
    hero.update(&mut map, 10);

    assert_eq!(hero.state_name(), "free");
}

#[test]
fn pushing_enemy_knocks_the_hero_back_and_prevents_loading() {
    let mut map = walled_map(12, 12);
    let mut hero = swordsman(&mut map);
    let enemy = map.spawn(EntityKind::Enemy, Vec2::new(64.0, 84.0), Vec2::splat(16.0));
    let mut component = Enemy::new(4, 1);
    component.push_hero_on_sword = true;
    map.world.insert_one(enemy, component).unwrap();

    // Attack stays held for the whole swing.
    hero.commands_mut().press(Command::Attack);
    hero.update(&mut map, 10);

    let events = hero.drain_events();
    assert!(events.contains(&HeroEvent::EnemyHit {
        enemy,
        damage: 1,
        killed: false,
    }));
    assert_eq!(map.world.get::<&Enemy>(enemy).unwrap().life, 3);
    assert!(hero.body.movement.is_some());

    // The knockback (24 px at 120 px/s) ends before the animation.
    run_until(&mut hero, &mut map, 250);
    assert!(hero.body.movement.is_none());
    assert!(hero.body.position.y < 64.0);
    assert_eq!(hero.state_name(), "sword_swinging");

    run_until(&mut hero, &mut map, 310);
    assert_eq!(hero.state_name(), "free");
}

#[test]
fn killing_blow_removes_the_enemy() {
    let mut map = walled_map(12, 12);
    let equipment = Equipment::default().with_ability(Ability::Sword, 2);
    let mut hero = spawn_hero(&mut map, Vec2::new(64.0, 64.0), equipment);
    let enemy = map.spawn(EntityKind::Enemy, Vec2::new(64.0, 84.0), Vec2::splat(16.0));
    map.world.insert_one(enemy, Enemy::new(2, 1)).unwrap();

    hero.commands_mut().press(Command::Attack);
    hero.update(&mut map, 10);

    assert!(!map.contains(enemy));
    assert!(hero.drain_events().contains(&HeroEvent::EnemyHit {
        enemy,
        damage: 2,
        killed: true,
    }));
}

#[test]
fn long_knockback_outlasts_the_swing() {
    let mut map = walled_map(12, 16);
    let config = HeroConfig {
        sword_push_distance: 60.0,
        sword_push_speed: 60.0,
        ..HeroConfig::default()
    };
    let equipment = Equipment::default().with_ability(Ability::Sword, 1);
    let mut hero = Hero::new(&mut map, Vec2::new(64.0, 160.0), equipment, config);
    hero.body.direction4 = 1;
    let enemy = map.spawn(EntityKind::Enemy, Vec2::new(64.0, 140.0), Vec2::splat(16.0));
    let mut component = Enemy::new(4, 1);
    component.push_hero_on_sword = true;
    map.world.insert_one(enemy, component).unwrap();

    hero.commands_mut().press(Command::Attack);
    hero.update(&mut map, 10);
    assert!(hero.body.movement.is_some());

    // The swing is over at 310 but the hero is still being pushed.
    run_until(&mut hero, &mut map, 500);
    assert_eq!(hero.state_name(), "sword_swinging");
    assert!(hero.body.movement.is_some());

    let free_at = run_until_with(&mut hero, &mut map, 2000, |hero| hero.is_free()).unwrap();
    assert!(free_at >= 1000, "free at {free_at}");
    assert!(hero
        .body
        .movement
        .as_ref()
        .is_some_and(|movement| movement.kind() == MovementKind::Player));
    assert!(hero.body.position.y > 200.0);
}
