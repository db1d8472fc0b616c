//! # Core Type Definitions
//!
//! Fundamental types shared by every crate in the Winger workspace: identifiers
//! for actors, players and projectiles, the [`Vec3`] math type used for positions
//! and rotations, and the [`Role`] an execution context plays for an actor.
//!
//! ## Design Principles
//!
//! - **Type Safety**: Wrapper types prevent ID confusion (ActorId vs PlayerId)
//! - **Precision**: Double-precision floats for positions and distances
//! - **Serialization**: All types support JSON serialization for replication

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random identifier using UUID v4.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parses an identifier from its string representation.
            pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a networked actor (the boss, or any other replicated entity).
    ///
    /// The same `ActorId` names the actor on the authority and on every observer,
    /// which is how directives and field updates find their local copy.
    ActorId
);

uuid_id!(
    /// Unique identifier for a player in the arena.
    PlayerId
);

uuid_id!(
    /// Unique identifier for a projectile handed out by a projectile source.
    ProjectileId
);

/// The part an execution context plays for a given actor.
///
/// Exactly one context is the [`Role::Authority`]: it makes decisions and
/// broadcasts them. Every other context is an [`Role::Observer`] that only
/// applies what the authority sends and derives presentation state locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The single context allowed to decide and broadcast (the "server")
    Authority,
    /// A context that mirrors the authority's state (a "client")
    Observer,
}

impl Role {
    /// Returns `true` for the authority role.
    pub fn is_authority(self) -> bool {
        matches!(self, Role::Authority)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Authority => write!(f, "authority"),
            Role::Observer => write!(f, "observer"),
        }
    }
}

/// A 3D vector with double-precision components.
///
/// Used for world positions, velocities and Euler rotations (degrees).
///
/// # Examples
///
/// ```rust
/// use winger_event_system::Vec3;
///
/// let start = Vec3::new(0.0, 2.0, 0.0);
/// let target = Vec3::new(3.0, 6.0, 0.0);
/// assert_eq!(start.distance(target), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X coordinate (lateral axis)
    pub x: f64,
    /// Y coordinate (vertical axis on the arena plane)
    pub y: f64,
    /// Z coordinate (depth axis)
    pub z: f64,
}

impl Vec3 {
    /// Creates a new Vec3 with the specified coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a zero vector (0, 0, 0).
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean distance to another vector.
    pub fn distance(&self, other: Vec3) -> f64 {
        (*self - other).length()
    }

    /// Euclidean norm.
    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Dot product.
    pub fn dot(&self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns `true` when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns this vector scaled down so its length does not exceed `max_length`.
    pub fn clamp_length(self, max_length: f64) -> Vec3 {
        let length = self.length();
        if length > max_length && length > 0.0 {
            self * (max_length / length)
        } else {
            self
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Local transform of an actor on one role: where it is and how it is oriented.
///
/// Every role owns its own transform; the authority's copy is the source of
/// truth and observers converge on it through replayed directives.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// Euler rotation in degrees
    #[serde(default)]
    pub rotation: Vec3,
}

impl Transform {
    /// Creates a transform at `position` with no rotation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_distance_is_euclidean() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 6.0, 3.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_vec3_clamp_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let clamped = v.clamp_length(2.5);
        assert!((clamped.length() - 2.5).abs() < 1e-12);
        assert_eq!(v.clamp_length(10.0), v);
        assert_eq!(Vec3::zero().clamp_length(0.0), Vec3::zero());
    }

    #[test]
    fn test_ids_roundtrip_through_strings() {
        let id = ActorId::new();
        let parsed: ActorId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!(PlayerId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Authority.is_authority());
        assert!(!Role::Observer.is_authority());
        assert_eq!(Role::Observer.to_string(), "observer");
    }
}
