//! Structured variable keys
//!
//! A variable's identity is its role plus indices, never an interpolated
//! string. The string form exists only for solver interchange and logs, and it
//! parses back to the same key:
//!
//! | Key | Serialized |
//! |---|---|
//! | `Select { candidate: 2, replica: 0 }` | `x-i2-r0` |
//! | `Route { template: 1, replica: 3 }` | `t-q1-r3` |
//! | `Slack { space: Objective, bit: 4 }` | `z-4` |
//! | `Slack { space: ReplicaCost { replica: 1 }, bit: 0 }` | `s-r1-0` |
//! | `Slack { space: StorageBudget { replica: 1 }, bit: 2 }` | `s-wmax-r1-2` |
//! | `Product(a, b)` | `(a*b)` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ModelError;

/// Namespace of a binary-encoded integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlackSpace {
    /// Shared objective encoding (bound on the worst replica cost)
    Objective,
    /// Per-replica slack of the cost residual
    ReplicaCost { replica: usize },
    /// Per-replica slack of the storage budget inequality
    StorageBudget { replica: usize },
}

impl fmt::Display for SlackSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlackSpace::Objective => write!(f, "z"),
            SlackSpace::ReplicaCost { replica } => write!(f, "s-r{}", replica),
            SlackSpace::StorageBudget { replica } => write!(f, "s-wmax-r{}", replica),
        }
    }
}

/// Identity of one binary decision variable
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum VarKey {
    /// Candidate index `candidate` is built on `replica`
    Select { candidate: usize, replica: usize },
    /// Query template `template` is routed to `replica`
    Route { template: usize, replica: usize },
    /// Bit `bit` (weight 2^bit) of a binary-encoded integer
    Slack { space: SlackSpace, bit: u32 },
    /// Auxiliary variable standing for the product of two variables
    Product(Box<VarKey>, Box<VarKey>),
}

impl VarKey {
    pub fn select(candidate: usize, replica: usize) -> Self {
        VarKey::Select { candidate, replica }
    }

    pub fn route(template: usize, replica: usize) -> Self {
        VarKey::Route { template, replica }
    }

    pub fn slack(space: SlackSpace, bit: u32) -> Self {
        VarKey::Slack { space, bit }
    }

    /// Auxiliary product key; operands are ordered so `product(a, b) == product(b, a)`
    pub fn product(a: VarKey, b: VarKey) -> Self {
        if a <= b {
            VarKey::Product(Box::new(a), Box::new(b))
        } else {
            VarKey::Product(Box::new(b), Box::new(a))
        }
    }

    /// True for variables introduced by quadratization
    pub fn is_auxiliary(&self) -> bool {
        matches!(self, VarKey::Product(..))
    }

    /// Replica this variable belongs to, if any
    pub fn replica(&self) -> Option<usize> {
        match self {
            VarKey::Select { replica, .. } | VarKey::Route { replica, .. } => Some(*replica),
            VarKey::Slack { space, .. } => match space {
                SlackSpace::Objective => None,
                SlackSpace::ReplicaCost { replica } | SlackSpace::StorageBudget { replica } => {
                    Some(*replica)
                }
            },
            VarKey::Product(..) => None,
        }
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKey::Select { candidate, replica } => write!(f, "x-i{}-r{}", candidate, replica),
            VarKey::Route { template, replica } => write!(f, "t-q{}-r{}", template, replica),
            VarKey::Slack { space, bit } => write!(f, "{}-{}", space, bit),
            VarKey::Product(a, b) => write!(f, "({}*{})", a, b),
        }
    }
}

impl From<VarKey> for String {
    fn from(key: VarKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for VarKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for VarKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s).ok_or_else(|| ModelError::InvalidVariableName(s.to_string()))
    }
}

fn parse_key(s: &str) -> Option<VarKey> {
    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        let split = top_level_star(inner)?;
        let left = parse_key(&inner[..split])?;
        let right = parse_key(&inner[split + 1..])?;
        return Some(VarKey::product(left, right));
    }

    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        ["x", i, r] => Some(VarKey::select(indexed(i, 'i')?, indexed(r, 'r')?)),
        ["t", q, r] => Some(VarKey::route(indexed(q, 'q')?, indexed(r, 'r')?)),
        ["z", bit] => Some(VarKey::slack(SlackSpace::Objective, bit.parse().ok()?)),
        ["s", r, bit] => Some(VarKey::slack(
            SlackSpace::ReplicaCost {
                replica: indexed(r, 'r')?,
            },
            bit.parse().ok()?,
        )),
        ["s", "wmax", r, bit] => Some(VarKey::slack(
            SlackSpace::StorageBudget {
                replica: indexed(r, 'r')?,
            },
            bit.parse().ok()?,
        )),
        _ => None,
    }
}

/// Position of the `*` separating the two operands of a product body
fn top_level_star(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (pos, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            '*' if depth == 0 => return Some(pos),
            _ => {}
        }
    }
    None
}

fn indexed(part: &str, prefix: char) -> Option<usize> {
    part.strip_prefix(prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names() {
        assert_eq!(VarKey::select(2, 0).to_string(), "x-i2-r0");
        assert_eq!(VarKey::route(1, 3).to_string(), "t-q1-r3");
        assert_eq!(VarKey::slack(SlackSpace::Objective, 4).to_string(), "z-4");
        assert_eq!(
            VarKey::slack(SlackSpace::StorageBudget { replica: 1 }, 2).to_string(),
            "s-wmax-r1-2"
        );
    }

    #[test]
    fn test_nested_product_parses_back() {
        let inner = VarKey::product(VarKey::select(0, 1), VarKey::route(3, 1));
        let outer = VarKey::product(inner, VarKey::slack(SlackSpace::ReplicaCost { replica: 1 }, 2));
        let text = outer.to_string();
        let parsed: VarKey = text.parse().unwrap();
        assert_eq!(parsed, outer);
    }

    #[test]
    fn test_product_is_symmetric() {
        let a = VarKey::select(0, 0);
        let b = VarKey::route(0, 0);
        assert_eq!(VarKey::product(a.clone(), b.clone()), VarKey::product(b, a));
    }

    #[test]
    fn test_slack_spaces_never_collide() {
        let objective = VarKey::slack(SlackSpace::Objective, 0).to_string();
        let cost = VarKey::slack(SlackSpace::ReplicaCost { replica: 0 }, 0).to_string();
        let storage = VarKey::slack(SlackSpace::StorageBudget { replica: 0 }, 0).to_string();
        assert_ne!(objective, cost);
        assert_ne!(cost, storage);
        assert_ne!(objective, storage);
    }

    #[test]
    fn test_rejects_unknown_names() {
        assert!("y-i0-r0".parse::<VarKey>().is_err());
        assert!("x-0-0".parse::<VarKey>().is_err());
        assert!("(x-i0-r0)".parse::<VarKey>().is_err());
        assert!("".parse::<VarKey>().is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&VarKey::route(0, 2)).unwrap();
        assert_eq!(json, "\"t-q0-r2\"");
        let back: VarKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VarKey::route(0, 2));
    }

    #[test]
    fn test_replica_lookup() {
        assert_eq!(VarKey::select(4, 2).replica(), Some(2));
        assert_eq!(VarKey::slack(SlackSpace::Objective, 0).replica(), None);
    }
}
