use std::collections::HashMap;

use crate::api::types::BallId;
use crate::error::ConfigError;
use crate::objects::ball::Ball;

/// Ball storage using a flat Vec, with id and name indices.
/// Sized for a table's worth of balls, not thousands.
pub struct BallSet {
    balls: Vec<Ball>,
    by_id: HashMap<BallId, usize>,
    by_name: HashMap<String, BallId>,
    next_id: u32,
}

impl BallSet {
    pub fn new() -> Self {
        Self {
            balls: Vec::with_capacity(16),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique ball ID.
    pub fn next_id(&mut self) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Reject a name already in use, before any body is created for it.
    pub fn check_name(&self, name: &str) -> Result<(), ConfigError> {
        if self.by_name.contains_key(name) {
            return Err(ConfigError::DuplicateBallName(name.to_string()));
        }
        Ok(())
    }

    /// Add a ball. Names must be unique across the set.
    pub fn insert(&mut self, ball: Ball) -> Result<BallId, ConfigError> {
        self.check_name(ball.name())?;
        let id = ball.id();
        self.by_id.insert(id, self.balls.len());
        self.by_name.insert(ball.name().to_string(), id);
        self.balls.push(ball);
        Ok(id)
    }

    /// Remove a ball by ID. Returns the removed ball if found.
    pub fn remove(&mut self, id: BallId) -> Option<Ball> {
        let idx = self.by_id.remove(&id)?;
        let ball = self.balls.swap_remove(idx);
        self.by_name.remove(ball.name());
        if let Some(moved) = self.balls.get(idx) {
            self.by_id.insert(moved.id(), idx);
        }
        Some(ball)
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.by_id.get(&id).map(|&i| &self.balls[i])
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.by_id.get(&id).map(|&i| &mut self.balls[i])
    }

    /// Resolve a display name to its ID.
    pub fn find_by_name(&self, name: &str) -> Option<BallId> {
        self.by_name.get(name).copied()
    }

    /// Iterate over all balls in insertion order (until a removal reorders them).
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.balls.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Drop every ball. Bodies stay in the physics world; remove them there first.
    pub fn clear(&mut self) {
        self.balls.clear();
        self.by_id.clear();
        self.by_name.clear();
    }
}

impl Default for BallSet {
    fn default() -> Self {
        Self::new()
    }
}
