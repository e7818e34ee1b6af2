#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use quest_hero::components::{Equipment, Ground, GroundMap};
use quest_hero::config::HeroConfig;
use quest_hero::hero::{Hero, HeroEvent};
use quest_hero::map::Map;

pub const TILE: f32 = 16.0;

/// Open field of `width` x `height` tiles surrounded by walls.
pub fn walled_map(width: usize, height: usize) -> Map {
    let mut grounds = GroundMap::new(width, height, TILE);
    for x in 0..width {
        grounds.set_tile(x, 0, Ground::Wall);
        grounds.set_tile(x, height - 1, Ground::Wall);
    }
    for y in 0..height {
        grounds.set_tile(0, y, Ground::Wall);
        grounds.set_tile(width - 1, y, Ground::Wall);
    }
    Map::new("test", grounds)
}

pub fn spawn_hero(map: &mut Map, position: Vec2, equipment: Equipment) -> Hero {
    Hero::new(map, position, equipment, HeroConfig::default())
}

/// Update every 10 ms from the hero's current date up to `until`.
pub fn run_until(hero: &mut Hero, map: &mut Map, until: u32) {
    let mut now = hero.now();
    while now < until {
        now = (now + 10).min(until);
        hero.update(map, now);
    }
}

/// Update until `condition` holds, returning the date it first did.
pub fn run_until_with(
    hero: &mut Hero,
    map: &mut Map,
    limit: u32,
    mut condition: impl FnMut(&Hero) -> bool,
) -> Option<u32> {
    let mut now = hero.now();
    while now < limit {
        now += 10;
        hero.update(map, now);
        if condition(hero) {
            return Some(now);
        }
    }
    None
}

pub fn has_event(events: &[HeroEvent], wanted: impl Fn(&HeroEvent) -> bool) -> bool {
    events.iter().any(wanted)
}

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}
