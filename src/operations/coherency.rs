use crate::config::Rules;
use crate::geometry::{Pose, Shape};

use super::collision::within_range;

/// One model as seen by the coherency check.
#[derive(Debug, Clone, Copy)]
pub struct CoherencyMember<Id> {
    pub id: Id,
    pub shape: Shape,
    /// `None` while the model is not yet placed.
    pub pose: Option<Pose>,
}

/// Result of a coherency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoherencyReport<Id> {
    pub is_coherent: bool,
    /// Models with too few neighbors in range, in member order.
    pub violating: Vec<Id>,
}

impl<Id> CoherencyReport<Id> {
    fn coherent() -> Self {
        Self {
            is_coherent: true,
            violating: Vec::new(),
        }
    }
}

/// Checks that every member has enough unit-mates within coherency range.
///
/// Each model needs [`Rules::required_neighbors`] other members within
/// [`Rules::coherency_range`], measured edge to edge. A unit that is not yet
/// fully placed is reported coherent: coherency is only enforced once every
/// model has a pose. Empty and single-model units are always coherent.
#[must_use]
pub fn check_coherency<Id: Copy>(
    members: &[CoherencyMember<Id>],
    rules: &Rules,
) -> CoherencyReport<Id> {
    if members.len() <= 1 || members.iter().any(|m| m.pose.is_none()) {
        return CoherencyReport::coherent();
    }

    let required = rules.required_neighbors(members.len());
    let range = rules.coherency_range();
    let mut violating = Vec::new();

    for (i, member) in members.iter().enumerate() {
        let Some(pose) = member.pose.as_ref() else {
            continue;
        };
        let mut neighbors = 0;
        for (j, other) in members.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(other_pose) = other.pose.as_ref() else {
                continue;
            };
            if within_range(&member.shape, pose, &other.shape, other_pose, range) {
                neighbors += 1;
                if neighbors >= required {
                    break;
                }
            }
        }
        if neighbors < required {
            violating.push(member.id);
        }
    }

    CoherencyReport {
        is_coherent: violating.is_empty(),
        violating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_32MM_IN: f64 = 32.0 / 25.4;

    fn inch_rules() -> Rules {
        Rules {
            units_per_inch: 1.0,
            ..Rules::default()
        }
    }

    fn members_at(xs: &[(f64, f64)]) -> Vec<CoherencyMember<usize>> {
        xs.iter()
            .enumerate()
            .map(|(i, &(x, y))| CoherencyMember {
                id: i,
                shape: Shape::circle(BASE_32MM_IN / 2.0),
                pose: Some(Pose::at(x, y)),
            })
            .collect()
    }

    #[test]
    fn empty_and_single_are_coherent() {
        let rules = inch_rules();
        assert!(check_coherency::<usize>(&[], &rules).is_coherent);
        assert!(check_coherency(&members_at(&[(0.0, 0.0)]), &rules).is_coherent);
    }

    #[test]
    fn incomplete_unit_is_coherent_by_default() {
        let mut members = members_at(&[(0.0, 0.0), (50.0, 0.0)]);
        members[1].pose = None;
        let report = check_coherency(&members, &inch_rules());
        assert!(report.is_coherent);
        assert!(report.violating.is_empty());
    }

    #[test]
    fn six_models_need_one_neighbor() {
        // Three far-apart pairs: every model has exactly one neighbor.
        let members = members_at(&[
            (0.0, 0.0),
            (1.5, 0.0),
            (10.0, 0.0),
            (11.5, 0.0),
            (20.0, 0.0),
            (21.5, 0.0),
        ]);
        let report = check_coherency(&members, &inch_rules());
        assert!(report.is_coherent, "{:?}", report.violating);
    }

    #[test]
    fn seven_models_need_two_neighbors() {
        // A line at 1.5" pitch gives each model two neighbors within 2";
        // the seventh hangs off the end next to only one of them.
        let members = members_at(&[
            (0.0, 0.0),
            (1.5, 0.0),
            (3.0, 0.0),
            (4.5, 0.0),
            (6.0, 0.0),
            (7.5, 0.0),
            (10.5, 0.0),
        ]);
        let report = check_coherency(&members, &inch_rules());
        assert!(!report.is_coherent);
        assert_eq!(report.violating, vec![6]);
    }

    #[test]
    fn straggler_is_flagged_alone() {
        let members = members_at(&[(0.0, 0.0), (1.5, 0.0), (3.0, 0.0), (15.0, 0.0)]);
        let report = check_coherency(&members, &inch_rules());
        assert_eq!(report.violating, vec![3]);
    }

    #[test]
    fn distance_is_edge_to_edge() {
        // Centers 3.2" apart: too far center to center, 1.94" edge to edge.
        let members = members_at(&[(0.0, 0.0), (3.2, 0.0)]);
        assert!(check_coherency(&members, &inch_rules()).is_coherent);
    }

    #[test]
    fn mixed_base_shapes() {
        let rules = inch_rules();
        let members = vec![
            CoherencyMember {
                id: 'a',
                shape: Shape::oval(4.0, 2.0),
                pose: Some(Pose::at(0.0, 0.0)),
            },
            CoherencyMember {
                id: 'b',
                shape: Shape::rectangle(2.0, 2.0),
                pose: Some(Pose::at(4.9, 0.0)),
            },
        ];
        // Gap = 4.9 - 2 - 1 = 1.9".
        assert!(check_coherency(&members, &rules).is_coherent);
        let mut apart = members.clone();
        apart[1].pose = Some(Pose::at(5.2, 0.0));
        let report = check_coherency(&apart, &rules);
        assert_eq!(report.violating, vec!['a', 'b']);
    }
}
