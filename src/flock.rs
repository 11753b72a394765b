//! Sheep and the flocks that own them.

use crate::graph::{CountyGraph, GlenId};
use crate::strategy::Strategy;

/// An individual grazer. Prosperity is an unbounded signal and may go
/// negative; hunger counts ticks since the sheep last ate.
#[derive(Debug, Clone)]
pub struct Sheep {
    prosperity: i64,
    hunger: u32,
    endurance: u32,
    greed: i64,
}

impl Sheep {
    pub fn new(endurance: u32, greed: i64) -> Self {
        Self {
            prosperity: 0,
            hunger: 0,
            endurance: endurance.max(1),
            greed: greed.max(1),
        }
    }

    pub fn prosperity(&self) -> i64 {
        self.prosperity
    }

    pub fn hunger(&self) -> u32 {
        self.hunger
    }

    pub fn endurance(&self) -> u32 {
        self.endurance
    }

    pub fn greed(&self) -> i64 {
        self.greed
    }

    /// Feed the sheep, by its own greed when no amount is given.
    /// Being fed exactly zero units does not count as having eaten, so
    /// hunger is left untouched in that case.
    pub fn prosper(&mut self, grass: Option<i64>) -> i64 {
        let served = grass.unwrap_or(self.greed);
        self.prosperity += served;
        if served != 0 {
            self.hunger = 0;
        }
        self.prosperity
    }

    /// Record unfed turns. Crossing the endurance threshold costs one
    /// point of prosperity, flat, regardless of how far past it the
    /// sheep is.
    pub fn hungrier(&mut self, famine: u32) -> u32 {
        self.hunger += famine;
        if self.hunger >= self.endurance {
            self.prosperity -= 1;
        }
        self.hunger
    }
}

impl Default for Sheep {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A named group of sheep occupying exactly one glen, bound to a
/// movement strategy. The flock owns its members; the glen is only
/// referenced by handle.
pub struct Flock {
    name: String,
    current_glen: GlenId,
    members: Vec<Sheep>,
    strategy: Box<dyn Strategy>,
    laziness: u32,
}

impl Flock {
    pub fn new(name: impl Into<String>, starting_glen: GlenId, strategy: Box<dyn Strategy>) -> Self {
        Self {
            name: name.into(),
            current_glen: starting_glen,
            members: Vec::new(),
            strategy,
            laziness: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_glen(&self) -> GlenId {
        self.current_glen
    }

    pub fn members(&self) -> &[Sheep] {
        &self.members
    }

    /// Ticks spent in the current glen. Tracked for strategies that
    /// may care; the built-in ones currently do not.
    pub fn laziness(&self) -> u32 {
        self.laziness
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// Append `number` freshly constructed default sheep.
    pub fn procreate(&mut self, number: usize) {
        for _ in 0..number {
            self.members.push(Sheep::default());
        }
    }

    /// Take in a single lamb built elsewhere.
    pub fn adopt(&mut self, lamb: Sheep) {
        self.members.push(lamb);
    }

    /// Settle on `to`. Staying put accrues laziness; moving resets it.
    pub fn relocate(&mut self, to: GlenId) {
        if to == self.current_glen {
            self.laziness += 1;
        } else {
            self.current_glen = to;
            self.laziness = 0;
        }
    }

    /// Feed every member, strictly in sequence order, from the current
    /// glen. Early members eat their full greed while grass lasts;
    /// later members take whatever remains. First-come-first-served
    /// depletion is a contract of the simulation, not an accident of
    /// iteration.
    pub fn graze(&mut self, graph: &mut CountyGraph) {
        for member in &mut self.members {
            let Some(glen) = graph.glen_mut(self.current_glen) else {
                return;
            };
            let served = member.greed().min(glen.abundance());
            if served > 0 {
                glen.increase(Some(-served));
                member.prosper(Some(served));
            } else {
                member.prosper(Some(0));
                member.hungrier(1);
            }
        }
    }
}

impl std::fmt::Debug for Flock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flock")
            .field("name", &self.name)
            .field("current_glen", &self.current_glen)
            .field("members", &self.members.len())
            .field("strategy", &self.strategy.name())
            .field("laziness", &self.laziness)
            .finish()
    }
}
