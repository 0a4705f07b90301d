use std::fmt;

use crate::engine::ClearEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    name: String,
    max_health: u32,
    health: u32,
}

impl Monster {
    pub fn new(name: impl Into<String>, max_health: u32) -> Self {
        Self {
            name: name.into(),
            max_health,
            health: max_health,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Returns the damage actually taken, which is capped by the remaining health.
    fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.health);
        self.health -= taken;
        taken
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.name, self.health, self.max_health)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    /// Index of the monster that was hit.
    pub monster: usize,
    pub amount: u32,
    pub defeated: bool,
}

/// Turns cleared pieces into damage against a line of monsters.
///
/// Only listens to clear events; the board is never touched from here.
#[derive(Debug, Clone, Default)]
pub struct Battle {
    monsters: Vec<Monster>,
    target: Option<usize>,
}

impl Battle {
    pub fn new(monsters: Vec<Monster>) -> Self {
        Self {
            monsters,
            target: None,
        }
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// The monster the player picked, if any.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Touching a monster targets it, touching the target again releases it.
    pub fn touch_monster(&mut self, index: usize) {
        if index >= self.monsters.len() {
            log::trace!("Ignoring touch on missing monster {index}");
            return;
        }

        self.target = match self.target {
            Some(target) if target == index => None,
            _ => Some(index),
        };
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Where the next hit lands: the player's target while it stands, else the first monster
    /// still standing.
    pub fn current_target(&self) -> Option<usize> {
        self.target
            .filter(|&index| !self.monsters[index].is_defeated())
            .or_else(|| self.monsters.iter().position(|monster| !monster.is_defeated()))
    }

    pub fn is_over(&self) -> bool {
        self.monsters.iter().all(Monster::is_defeated)
    }

    /// Deals the total value of the cleared pieces to the current target. Returns `None` once
    /// every monster is defeated.
    pub fn apply_clear(&mut self, clear: &ClearEvent) -> Option<Damage> {
        let index = self.current_target()?;
        let monster = &mut self.monsters[index];

        let amount = monster.take_damage(clear.total_value());
        let defeated = monster.is_defeated();

        log::debug!("Chain {} hit {monster} for {amount}", clear.chain);
        if defeated {
            log::info!("{} defeated", monster.name());
            if self.target == Some(index) {
                self.target = None;
            }
        }

        Some(Damage {
            monster: index,
            amount,
            defeated,
        })
    }
}
