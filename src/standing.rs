use std::cmp::Ordering;

use crate::evaluator::Score;
use crate::simulation::Tally;

/// Where our hand stands against one opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Standing {
    Ahead = 0,
    Tied = 1,
    Behind = 2,
}

impl Standing {
    pub const ALL: [Standing; 3] = [Standing::Ahead, Standing::Tied, Standing::Behind];

    /// classify our score against theirs
    pub fn compare(ours: Score, theirs: Score) -> Standing {
        Standing::from(ours.cmp(&theirs))
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl From<Ordering> for Standing {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Standing::Ahead,
            Ordering::Equal => Standing::Tied,
            Ordering::Less => Standing::Behind,
        }
    }
}

impl From<Standing> for Ordering {
    fn from(standing: Standing) -> Self {
        match standing {
            Standing::Ahead => Ordering::Greater,
            Standing::Tied => Ordering::Equal,
            Standing::Behind => Ordering::Less,
        }
    }
}

/// Weighted ahead/tied/behind counts
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StandingTally {
    pub ahead: f64,
    pub tied: f64,
    pub behind: f64,
}

impl StandingTally {
    pub fn add(&mut self, standing: Standing, weight: f64) {
        match standing {
            Standing::Ahead => self.ahead += weight,
            Standing::Tied => self.tied += weight,
            Standing::Behind => self.behind += weight,
        }
    }

    pub fn total(&self) -> f64 {
        self.ahead + self.tied + self.behind
    }

    /// (ahead + tied / 2) / total, None when nothing was counted
    pub fn strength(&self) -> Option<f64> {
        let total = self.total();
        if total > 0.0 {
            Some((self.ahead + self.tied / 2.0) / total)
        } else {
            None
        }
    }
}

impl Tally for StandingTally {
    fn merge(&mut self, other: Self) {
        self.ahead += other.ahead;
        self.tied += other.tied;
        self.behind += other.behind;
    }
}
