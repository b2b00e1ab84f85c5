use std::collections::HashMap;

use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Surface tag carried by every collider. Has no friction/restitution of its own;
/// those come from a registered [`ContactPairing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Default,
    Ball,
    Table,
    Wall,
    Floor,
}

impl Material {
    pub fn name(self) -> &'static str {
        match self {
            Material::Default => "default",
            Material::Ball => "ball",
            Material::Table => "table",
            Material::Wall => "wall",
            Material::Floor => "floor",
        }
    }

    /// Encoding stored in a collider's `user_data`.
    pub(crate) fn to_user_data(self) -> u128 {
        self as u128
    }

    pub(crate) fn from_user_data(data: u128) -> Material {
        match data {
            1 => Material::Ball,
            2 => Material::Table,
            3 => Material::Wall,
            4 => Material::Floor,
            _ => Material::Default,
        }
    }
}

/// Friction/restitution rule applied when two specific materials touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPairing {
    pub a: Material,
    pub b: Material,
    pub friction: f32,
    pub restitution: f32,
}

impl ContactPairing {
    pub fn new(a: Material, b: Material, friction: f32, restitution: f32) -> Self {
        Self {
            a,
            b,
            friction,
            restitution,
        }
    }
}

/// Coefficients a collider carries when no pairing covers the contact.
/// Rapier combines these per pair with its default (average) rule.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

fn pair_key(a: Material, b: Material) -> (Material, Material) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Symmetric table of registered pairings.
///
/// Installed as the Rapier physics hook: every solver contact between two
/// colliders whose materials are registered gets the pairing's coefficients.
#[derive(Debug, Default, Clone)]
pub struct ContactPairings {
    pairs: HashMap<(Material, Material), ContactPairing>,
}

impl ContactPairings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a pairing. Order of `a`/`b` does not matter.
    pub fn register(&mut self, pairing: ContactPairing) {
        log::debug!(
            "contact pairing {}/{}: friction={} restitution={}",
            pairing.a.name(),
            pairing.b.name(),
            pairing.friction,
            pairing.restitution
        );
        self.pairs.insert(pair_key(pairing.a, pairing.b), pairing);
    }

    pub fn lookup(&self, a: Material, b: Material) -> Option<&ContactPairing> {
        self.pairs.get(&pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl PhysicsHooks for ContactPairings {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let (Some(c1), Some(c2)) = (
            context.colliders.get(context.collider1),
            context.colliders.get(context.collider2),
        ) else {
            return;
        };

        let a = Material::from_user_data(c1.user_data);
        let b = Material::from_user_data(c2.user_data);
        if let Some(pairing) = self.lookup(a, b) {
            for contact in context.solver_contacts.iter_mut() {
                contact.friction = pairing.friction;
                contact.restitution = pairing.restitution;
            }
        }
    }
}
