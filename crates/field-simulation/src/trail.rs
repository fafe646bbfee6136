//! Bounded position history per body, for drawing orbit/motion trails

use field_physics::BodyId;
use glam::DVec2;
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct Trails {
    capacity: usize,
    paths: BTreeMap<BodyId, VecDeque<DVec2>>,
}

impl Trails {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            paths: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Shrinking drops the oldest points; zero disables and forgets all trails
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if capacity == 0 {
            self.paths.clear();
            return;
        }
        for path in self.paths.values_mut() {
            while path.len() > capacity {
                path.pop_front();
            }
        }
    }

    pub fn record(&mut self, id: BodyId, position: DVec2) {
        if self.capacity == 0 {
            return;
        }
        let path = self.paths.entry(id).or_default();
        path.push_back(position);
        if path.len() > self.capacity {
            path.pop_front();
        }
    }

    pub fn remove(&mut self, id: BodyId) {
        self.paths.remove(&id);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Oldest point first
    pub fn get(&self, id: BodyId) -> Option<&VecDeque<DVec2>> {
        self.paths.get(&id)
    }
}
