use glam::IVec3;
use serde::{Deserialize, Serialize};

/// One of the six axis-aligned unit headings.
///
/// Used as object facing metadata and as the viewer's movement directions.
/// Screen Y grows downward, so `Down` is what the "up" arrow moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// +Z, into the screen.
    North,
    /// -Z
    South,
    /// +X
    East,
    /// -X
    West,
    /// +Y
    Up,
    /// -Y
    Down,
}

impl Heading {
    /// All six headings, in the order objects pick their facing from.
    pub const ALL: [Heading; 6] = [
        Heading::North,
        Heading::South,
        Heading::East,
        Heading::West,
        Heading::Up,
        Heading::Down,
    ];

    /// Unit vector for this heading.
    pub fn unit(self) -> IVec3 {
        match self {
            Heading::North => IVec3::Z,
            Heading::South => IVec3::NEG_Z,
            Heading::East => IVec3::X,
            Heading::West => IVec3::NEG_X,
            Heading::Up => IVec3::Y,
            Heading::Down => IVec3::NEG_Y,
        }
    }

    pub fn opposite(self) -> Heading {
        match self {
            Heading::North => Heading::South,
            Heading::South => Heading::North,
            Heading::East => Heading::West,
            Heading::West => Heading::East,
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.unit();
        write!(f, "({}, {}, {})", v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_axis_aligned() {
        for h in Heading::ALL {
            let v = h.unit();
            assert_eq!(v.x.abs() + v.y.abs() + v.z.abs(), 1);
        }
    }

    #[test]
    fn opposite_negates_unit() {
        for h in Heading::ALL {
            assert_eq!(h.opposite().unit(), -h.unit());
            assert_eq!(h.opposite().opposite(), h);
        }
    }

    #[test]
    fn all_headings_distinct() {
        let set: std::collections::HashSet<_> = Heading::ALL.iter().map(|h| h.unit()).collect();
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn north_is_forward() {
        assert_eq!(Heading::North.unit(), IVec3::new(0, 0, 1));
        assert_eq!(format!("{}", Heading::North), "(0, 0, 1)");
    }
}
