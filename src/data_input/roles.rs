// src/data_input/roles.rs

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Anatomical role assigned to an identified marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ra")]
    RightAnkle,
    #[serde(rename = "rk")]
    RightKnee,
    #[serde(rename = "rh")]
    RightHip,
    #[serde(rename = "rs")]
    RightShoulder,
    #[serde(rename = "la")]
    LeftAnkle,
    #[serde(rename = "lk")]
    LeftKnee,
    #[serde(rename = "lh")]
    LeftHip,
    #[serde(rename = "ls")]
    LeftShoulder,
    #[serde(rename = "spine")]
    Spine,
    #[serde(rename = "mass")]
    CenterOfMass,
}

impl Role {
    pub const ALL: [Role; 10] = [
        Role::RightAnkle,
        Role::RightKnee,
        Role::RightHip,
        Role::RightShoulder,
        Role::LeftAnkle,
        Role::LeftKnee,
        Role::LeftHip,
        Role::LeftShoulder,
        Role::Spine,
        Role::CenterOfMass,
    ];

    /// Short tag used in marker labels and exports.
    pub fn tag(self) -> &'static str {
        match self {
            Role::RightAnkle => "ra",
            Role::RightKnee => "rk",
            Role::RightHip => "rh",
            Role::RightShoulder => "rs",
            Role::LeftAnkle => "la",
            Role::LeftKnee => "lk",
            Role::LeftHip => "lh",
            Role::LeftShoulder => "ls",
            Role::Spine => "spine",
            Role::CenterOfMass => "mass",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.tag() == s)
            .ok_or_else(|| format!("unknown role tag '{s}'"))
    }
}

/// Body side of a joint-angle chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Right, Side::Left];

    /// Ankle, knee, hip and shoulder roles for this side, in that order.
    pub fn required_roles(self) -> [Role; 4] {
        match self {
            Side::Right => [
                Role::RightAnkle,
                Role::RightKnee,
                Role::RightHip,
                Role::RightShoulder,
            ],
            Side::Left => [
                Role::LeftAnkle,
                Role::LeftKnee,
                Role::LeftHip,
                Role::LeftShoulder,
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Right => "Right",
            Side::Left => "Left",
        }
    }
}

/// Role -> marker index lookup for one identified capture, together with
/// the display name of every retained marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleMapping {
    indices: HashMap<Role, usize>,
    simple_names: Vec<String>,
}

impl RoleMapping {
    /// Builds the mapping from display names: names that are role tags claim
    /// that role (last occurrence wins), any other name is kept for display.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut indices = HashMap::new();
        for (index, name) in names.iter().enumerate() {
            if let Ok(role) = name.as_ref().parse::<Role>() {
                indices.insert(role, index);
            }
        }
        Self {
            indices,
            simple_names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }

    pub fn index_of(&self, role: Role) -> Option<usize> {
        self.indices.get(&role).copied()
    }

    /// Ankle, knee, hip, shoulder indices when the whole chain is present.
    pub fn side_indices(&self, side: Side) -> Option<[usize; 4]> {
        let [a, k, h, s] = side.required_roles();
        Some([
            self.index_of(a)?,
            self.index_of(k)?,
            self.index_of(h)?,
            self.index_of(s)?,
        ])
    }

    pub fn has_role_set(&self, side: Side) -> bool {
        self.side_indices(side).is_some()
    }

    pub fn missing_roles(&self, side: Side) -> Vec<Role> {
        side.required_roles()
            .into_iter()
            .filter(|role| !self.indices.contains_key(role))
            .collect()
    }

    /// Role tag or residual numeric label per retained marker.
    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    pub fn len(&self) -> usize {
        self.simple_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simple_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tags_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.tag().parse::<Role>().unwrap(), role);
        }
        assert!("r1".parse::<Role>().is_err());
    }

    #[test]
    fn test_repeated_tag_takes_last_index() {
        let mapping = RoleMapping::from_names(&["ra", "rk", "rh", "rs", "ra"]);
        assert_eq!(mapping.index_of(Role::RightAnkle), Some(4));
        assert_eq!(mapping.side_indices(Side::Right), Some([4, 1, 2, 3]));
        assert_eq!(mapping.len(), 5);
    }

    #[test]
    fn test_has_role_set() {
        let mapping = RoleMapping::from_names(&["ra", "rk", "rh", "rs", "la", "11"]);
        assert!(mapping.has_role_set(Side::Right));
        assert!(!mapping.has_role_set(Side::Left));
        assert_eq!(
            mapping.missing_roles(Side::Left),
            vec![Role::LeftKnee, Role::LeftHip, Role::LeftShoulder]
        );
        assert_eq!(mapping.side_indices(Side::Right), Some([0, 1, 2, 3]));
        assert_eq!(mapping.simple_names()[5], "11");
    }
}
