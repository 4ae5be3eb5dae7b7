//! Demo level: a hero, a button wired to a door, and a short-lived saucer.

use tracing::info;
use zkit_event::{Binding, Entity, Event, EventGroup, Listener, Value};

/// Published once per frame by the loop, after all input.
pub const TICK: &str = "TICK";
pub const KEYDOWN: &str = "KEYDOWN";
pub const QUIT: &str = "QUIT";
const PRESS: &str = "press";
const SWITCH: &str = "switch";
const DOOR_OPENED: &str = "door_opened";

/// Tile coordinates.
pub type Tile = (i64, i64);

#[derive(Debug)]
pub struct Director {
    pub running: bool,
    pub doors_opened: u32,
}

#[derive(Debug)]
pub struct Hero {
    pub tile: Tile,
}

#[derive(Debug)]
pub struct Button {
    pub target: String,
    pub tile: Tile,
}

#[derive(Debug)]
pub struct Door {
    pub name: String,
    pub open: bool,
}

#[derive(Debug)]
pub struct Saucer {
    pub remaining_ms: f64,
}

/// Everything that lives in the level.
#[derive(Debug)]
pub enum Actor {
    Director(Director),
    Hero(Hero),
    Button(Button),
    Door(Door),
    Saucer(Saucer),
}

impl Listener for Actor {
    fn bindings(&self) -> Vec<Binding<Self>> {
        match self {
            Self::Director(_) => director_bindings(),
            Self::Hero(_) => hero_bindings(),
            Self::Button(button) => button_bindings(button),
            Self::Door(door) => door_bindings(door),
            Self::Saucer(_) => saucer_bindings(),
        }
    }

    fn is_alive(&self) -> bool {
        match self {
            Self::Saucer(saucer) => saucer.remaining_ms > 0.0,
            _ => true,
        }
    }
}

fn director_bindings() -> Vec<Binding<Actor>> {
    vec![
        Binding::new("on_quit", QUIT, |actor: &mut Actor, _, _, _| {
            if let Actor::Director(director) = actor {
                info!("quit requested");
                director.running = false;
            }
            Ok(())
        }),
        Binding::new("on_door_opened", DOOR_OPENED, |actor: &mut Actor, event, _, _| {
            if let Actor::Director(director) = actor {
                director.doors_opened += 1;
                let door = event.attr("name").and_then(Value::as_str);
                info!(door = ?door, "door opened");
            }
            Ok(())
        }),
    ]
}

fn hero_bindings() -> Vec<Binding<Actor>> {
    let moves = [
        ("on_k_left_down", "K_LEFT", -1, 0),
        ("on_k_right_down", "K_RIGHT", 1, 0),
        ("on_k_up_down", "K_UP", 0, -1),
        ("on_k_down_down", "K_DOWN", 0, 1),
    ];

    let mut bindings: Vec<_> = moves
        .into_iter()
        .map(|(id, key, dx, dy)| {
            Binding::new(id, KEYDOWN, move |actor: &mut Actor, _, _, _| {
                if let Actor::Hero(hero) = actor {
                    hero.tile = (hero.tile.0 + dx, hero.tile.1 + dy);
                }
                Ok(())
            })
            .with_filter("key", key)
        })
        .collect();

    bindings.push(
        Binding::new("on_k_space_down", KEYDOWN, |actor: &mut Actor, _, _, ctx| {
            if let Actor::Hero(hero) = actor {
                let (x, y) = hero.tile;
                ctx.publish(
                    Event::new(PRESS)
                        .with_priority(0)
                        .with_attr("x", x)
                        .with_attr("y", y),
                );
            }
            Ok(())
        })
        .with_filter("key", "K_SPACE"),
    );
    bindings.push(
        Binding::new("on_k_escape_down", KEYDOWN, |_: &mut Actor, _, _, ctx| {
            ctx.publish(Event::new(QUIT).with_priority(0));
            Ok(())
        })
        .with_filter("key", "K_ESCAPE"),
    );
    bindings
}

fn button_bindings(button: &Button) -> Vec<Binding<Actor>> {
    let (x, y) = button.tile;
    vec![
        Binding::new("on_press", PRESS, |actor: &mut Actor, _, _, ctx| {
            if let Actor::Button(button) = actor {
                ctx.publish(
                    Event::new(SWITCH)
                        .with_priority(1)
                        .with_attr("name", button.target.clone()),
                );
            }
            Ok(())
        })
        .with_filter("x", x)
        .with_filter("y", y),
    ]
}

fn door_bindings(door: &Door) -> Vec<Binding<Actor>> {
    vec![
        Binding::new("on_switch", SWITCH, |actor: &mut Actor, _, _, ctx| {
            if let Actor::Door(door) = actor {
                if !door.open {
                    door.open = true;
                    ctx.publish(Event::new(DOOR_OPENED).with_attr("name", door.name.clone()));
                }
            }
            Ok(())
        })
        .with_filter("name", door.name.clone()),
    ]
}

fn saucer_bindings() -> Vec<Binding<Actor>> {
    vec![Binding::new("on_tick", TICK, |actor: &mut Actor, _, dt, _| {
        if let Actor::Saucer(saucer) = actor {
            saucer.remaining_ms -= dt;
        }
        Ok(())
    })]
}

/// Handles to the actors the loop inspects.
#[derive(Clone, Copy, Debug)]
pub struct Level {
    pub director: Entity,
    pub hero: Entity,
    pub door: Entity,
    pub saucer: Entity,
}

/// Populate `group` with the demo level.
pub fn setup(group: &mut EventGroup<Actor>) -> Level {
    let director = group.add(Actor::Director(Director {
        running: true,
        doors_opened: 0,
    }));
    let hero = group.add(Actor::Hero(Hero { tile: (1, 1) }));
    let saucer = group.add(Actor::Saucer(Saucer {
        remaining_ms: 100.0,
    }));
    group.add(Actor::Button(Button {
        target: String::from("testDoor"),
        tile: (2, 4),
    }));
    let door = group.add(Actor::Door(Door {
        name: String::from("testDoor"),
        open: false,
    }));

    Level {
        director,
        hero,
        door,
        saucer,
    }
}

impl Level {
    #[must_use]
    pub fn running(&self, group: &EventGroup<Actor>) -> bool {
        matches!(
            group.get(self.director),
            Some(Actor::Director(Director { running: true, .. }))
        )
    }
}
