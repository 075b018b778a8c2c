//! Route naming normalization
//!
//! Turns camelCase controller names into hyphenated mount paths and reduces
//! a list of names to unique singular route segments.

use std::collections::HashMap;

use crate::generation::inflection::singularize;

/// Trailing segment removed from mount paths
pub const CONTROLLER_SUFFIX: &str = "-controller";
/// Leading segment removed from mount paths
pub const GET_PREFIX: &str = "get-";

/// Converts a camelCase identifier into a lower-case, hyphen-separated path.
///
/// A hyphen is inserted before every upper-case letter, everything is
/// lower-cased and leading hyphens are stripped. Already converted input is
/// returned unchanged.
///
/// # Examples
/// ```
/// use routesmith::generation::naming::to_mount_path;
///
/// assert_eq!(to_mount_path("getUserOrders"), "get-user-orders");
/// assert_eq!(to_mount_path("HealthCheck"), "health-check");
/// assert_eq!(to_mount_path("get-user-orders"), "get-user-orders");
/// ```
pub fn to_mount_path(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_uppercase() {
            result.push('-');
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result.trim_start_matches('-').to_string()
}

/// Removes the `-controller` suffix and the `get-` prefix from a mount path
pub fn strip_route_affixes(path: &str) -> &str {
    let path = path.strip_suffix(CONTROLLER_SUFFIX).unwrap_or(path);
    path.strip_prefix(GET_PREFIX).unwrap_or(path)
}

/// Singularizes the last hyphen-separated word of a segment, keeping the
/// segment unchanged when no singular form exists.
pub fn singularize_segment(segment: &str) -> String {
    let (head, last) = match segment.rfind('-') {
        Some(idx) => segment.split_at(idx + 1),
        None => ("", segment),
    };
    match singularize(last) {
        Some(singular) => format!("{head}{singular}"),
        None => segment.to_string(),
    }
}

/// Mount segment computed for one controller name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountSegment {
    /// First name to claim this segment
    Unique(String),
    /// Collides with the name at index `first`, which keeps the segment
    Coalesced { segment: String, first: usize },
}

impl MountSegment {
    pub fn segment(&self) -> &str {
        match self {
            MountSegment::Unique(segment) => segment,
            MountSegment::Coalesced { segment, .. } => segment,
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, MountSegment::Unique(_))
    }
}

/// Computes one singular mount segment per name, in input order.
///
/// Collisions are coalesced: the earliest name keeps the segment and every
/// later name computing the same segment is reported as
/// [`MountSegment::Coalesced`], so callers can drop it consistently from
/// both the import and mount lists.
///
/// # Examples
/// ```
/// use routesmith::generation::naming::{unique_singular_segments, MountSegment};
///
/// let segments = unique_singular_segments(&["getUserOrdersController", "getUserOrderController"]);
/// assert_eq!(segments[0], MountSegment::Unique("user-order".to_string()));
/// assert_eq!(
///     segments[1],
///     MountSegment::Coalesced { segment: "user-order".to_string(), first: 0 }
/// );
/// ```
pub fn unique_singular_segments<S: AsRef<str>>(names: &[S]) -> Vec<MountSegment> {
    let mut claimed: HashMap<String, usize> = HashMap::new();

    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let path = to_mount_path(name.as_ref());
            let segment = singularize_segment(strip_route_affixes(&path));
            match claimed.get(&segment) {
                Some(&first) => MountSegment::Coalesced { segment, first },
                None => {
                    claimed.insert(segment.clone(), index);
                    MountSegment::Unique(segment)
                }
            }
        })
        .collect()
}
