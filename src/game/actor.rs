//! The hero roster.

/// Number of heroes competing for power-ups in every round.
pub const ACTOR_COUNT: usize = 3;

/// Power-ups handed to each hero, index-aligned with [`ACTORS`].
pub type Allocations = [u32; ACTOR_COUNT];

/// A hero that needs power-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Display name.
    pub name: &'static str,
    /// What the allocated power-ups charge.
    pub weapon: &'static str,
}

/// The fixed, ordered squad.
pub const ACTORS: [Actor; ACTOR_COUNT] = [
    Actor {
        name: "Batman",
        weapon: "Power Gun",
    },
    Actor {
        name: "Wonder Woman",
        weapon: "Power Gun",
    },
    Actor {
        name: "Superman",
        weapon: "Power Gun",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order() {
        let names: Vec<_> = ACTORS.iter().map(|a| a.name).collect();
        assert_eq!(names, ["Batman", "Wonder Woman", "Superman"]);
    }
}
