//! Constructive solid geometry: binary Union/Intersection/Subtraction over
//! two shapes' entry/exit interval pairs (spec §4.4).

use super::{Hit, Shape};
use crate::math::{Line, EPSILON};
use crate::scene::Scene;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Intersection,
    Subtraction,
}

pub struct CsgNode {
    pub op: CsgOp,
    pub left: Box<dyn Shape>,
    pub right: Box<dyn Shape>,
}

impl CsgNode {
    pub fn new(op: CsgOp, left: Box<dyn Shape>, right: Box<dyn Shape>) -> Self {
        Self { op, left, right }
    }
}

impl Shape for CsgNode {
    fn intersect(&self, ray: &Line, scene: &Scene, info: bool) -> Option<Hit> {
        let a = self.left.intersect(ray, scene, true);
        let b = self.right.intersect(ray, scene, true);

        let combined = match self.op {
            CsgOp::Union => union(a, b),
            CsgOp::Intersection => intersection(a, b),
            CsgOp::Subtraction => subtraction(a, b),
        }?;

        if info {
            Some(combined)
        } else {
            Some(Hit::cheap(combined.t_min, combined.t_max, combined.inside_min, combined.inside_max))
        }
    }
}

fn union(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
    match (a, b) {
        (None, None) => None,
        (Some(h), None) | (None, Some(h)) => Some(h),
        (Some(a), Some(b)) => {
            if a.t_max < b.t_min - EPSILON || b.t_max < a.t_min - EPSILON {
                // Disjoint: report whichever segment is nearer along the
                // ray's positive half (spec §4.4 union note).
                let a_forward = super::nearest_forward_t(&a);
                let b_forward = super::nearest_forward_t(&b);
                return match (a_forward, b_forward) {
                    (Some(ta), Some(tb)) => Some(if ta <= tb { a } else { b }),
                    (Some(_), None) => Some(a),
                    (None, Some(_)) => Some(b),
                    (None, None) => Some(if a.t_max >= b.t_max { a } else { b }),
                };
            }

            let (entry, entry_normal, entry_color, entry_material, entry_inside) = if a.t_min <= b.t_min {
                (a.t_min, a.normal_min, a.color_min, a.material_min, a.inside_min)
            } else {
                (b.t_min, b.normal_min, b.color_min, b.material_min, b.inside_min)
            };
            let (exit, exit_normal, exit_color, exit_material, exit_inside) = if a.t_max >= b.t_max {
                (a.t_max, a.normal_max, a.color_max, a.material_max, a.inside_max)
            } else {
                (b.t_max, b.normal_max, b.color_max, b.material_max, b.inside_max)
            };

            Some(Hit {
                t_min: entry,
                t_max: exit,
                normal_min: entry_normal,
                normal_max: exit_normal,
                inside_min: entry_inside,
                inside_max: exit_inside,
                color_min: entry_color,
                color_max: exit_color,
                material_min: entry_material,
                material_max: exit_material,
            })
        }
    }
}

fn intersection(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
    let (a, b) = (a?, b?);

    let (entry, entry_normal, entry_color, entry_material, entry_inside) = if a.t_min >= b.t_min {
        (a.t_min, a.normal_min, a.color_min, a.material_min, a.inside_min)
    } else {
        (b.t_min, b.normal_min, b.color_min, b.material_min, b.inside_min)
    };
    let (exit, exit_normal, exit_color, exit_material, exit_inside) = if a.t_max <= b.t_max {
        (a.t_max, a.normal_max, a.color_max, a.material_max, a.inside_max)
    } else {
        (b.t_max, b.normal_max, b.color_max, b.material_max, b.inside_max)
    };

    if entry > exit {
        return None;
    }

    Some(Hit {
        t_min: entry,
        t_max: exit,
        normal_min: entry_normal,
        normal_max: exit_normal,
        inside_min: entry_inside,
        inside_max: exit_inside,
        color_min: entry_color,
        color_max: exit_color,
        material_min: entry_material,
        material_max: exit_material,
    })
}

/// `A - B`: the portion of A not covered by B. If B doesn't overlap A,
/// returns A unchanged. Otherwise splits A by B's interval and returns the
/// first forward-going sub-interval, inverting the normal taken from B's
/// boundary (spec §4.4).
fn subtraction(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
    let a = a?;
    let b = match b {
        Some(b) => b,
        None => return Some(a),
    };

    if b.t_max < a.t_min || b.t_min > a.t_max {
        return Some(a);
    }

    // Segment before B enters A's interval.
    if b.t_min > a.t_min {
        return Some(Hit {
            t_min: a.t_min,
            t_max: b.t_min,
            normal_min: a.normal_min,
            normal_max: -b.normal_min,
            inside_min: a.inside_min,
            inside_max: !b.inside_min,
            color_min: a.color_min,
            color_max: b.color_min,
            material_min: a.material_min,
            material_max: b.material_min,
        });
    }

    // B fully covers A's entry; the remaining piece is after B exits, if any.
    if b.t_max < a.t_max {
        return Some(Hit {
            t_min: b.t_max,
            t_max: a.t_max,
            normal_min: -b.normal_max,
            normal_max: a.normal_max,
            inside_min: !b.inside_max,
            inside_max: a.inside_max,
            color_min: b.color_max,
            color_max: a.color_max,
            material_min: b.material_max,
            material_max: a.material_max,
        });
    }

    // B fully covers A.
    None
}
