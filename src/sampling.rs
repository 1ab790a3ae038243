//! Sub-pixel, area-light, and cone-reflection/transmission deviation sets
//! (spec §4.1). No corpus file implements Bridson-style Poisson-disk
//! sampling directly; authored fresh but in the teacher's small pure
//! free-function + `#[cfg(test)]` epsilon-assert style (`math/utils.rs`).
//! Every function here is pure: identical inputs always produce identical
//! output, and any randomness is seed-driven (spec §4.1 "the harness is
//! pure").

/// Sub-pixel anti-aliasing mode selecting how `pixel_deviations` builds its
/// `(dx, dy)` set.
#[derive(Clone, Copy, Debug)]
pub enum AaMode {
    Center,
    Grid(u32),
    Poisson { min_distance: f64, seed: u32 },
}

/// Produces the `(dx, dy) in [0,1)^2` offsets used to jitter the primary ray
/// within a pixel (spec §4.1).
pub fn pixel_deviations(mode: AaMode) -> Vec<(f64, f64)> {
    match mode {
        AaMode::Center => vec![(0.5, 0.5)],
        AaMode::Grid(n) => grid_deviations(n.max(1)),
        AaMode::Poisson { min_distance, seed } => poisson_disk(min_distance, seed),
    }
}

fn grid_deviations(n: u32) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity((n * n) as usize);
    for j in 0..n {
        for i in 0..n {
            let dx = (i as f64 + 0.5) / n as f64;
            let dy = (j as f64 + 0.5) / n as f64;
            out.push((dx, dy));
        }
    }
    out
}

/// `(0,0)` plus an `n x n` tangent-plane grid centered on zero with spacing
/// `s/n`, used as area-light sample offsets (spec §4.1: "(0,0) plus an n×n
/// uniform grid" — the center sample is always present, even when `n` is
/// even and the grid itself has no zero-offset cell).
pub fn light_deviations(n: u32, area_side: f64) -> Vec<(f64, f64)> {
    if n == 0 || area_side <= 0.0 {
        return vec![(0.0, 0.0)];
    }
    let spacing = area_side / n as f64;
    let half = (n as f64 - 1.0) / 2.0;
    let mut out = Vec::with_capacity((n * n) as usize + 1);
    let mut has_center = false;
    for j in 0..n {
        for i in 0..n {
            let dx = (i as f64 - half) * spacing;
            let dy = (j as f64 - half) * spacing;
            if dx == 0.0 && dy == 0.0 {
                has_center = true;
            }
            out.push((dx, dy));
        }
    }
    if !has_center {
        out.push((0.0, 0.0));
    }
    out
}

/// `(offset, weight)` pairs for cone-sampled reflection/transmission (spec
/// §4.1): an `n x n` grid on side 1.0, weight `sqrt(2) - ||offset||`, always
/// including the zero-offset center with weight `sqrt(2)`.
pub fn cone_deviations(n: u32) -> Vec<((f64, f64), f64)> {
    const CENTER_WEIGHT: f64 = std::f64::consts::SQRT_2;
    if n == 0 {
        return vec![((0.0, 0.0), CENTER_WEIGHT)];
    }

    let half = (n as f64 - 1.0) / 2.0;
    let mut out = Vec::with_capacity((n * n) as usize + 1);
    let mut has_center = false;
    for j in 0..n {
        for i in 0..n {
            let ox = (i as f64 - half) / n as f64;
            let oy = (j as f64 - half) / n as f64;
            let dist = (ox * ox + oy * oy).sqrt();
            let weight = if ox == 0.0 && oy == 0.0 {
                has_center = true;
                CENTER_WEIGHT
            } else {
                (CENTER_WEIGHT - dist).max(0.0)
            };
            out.push(((ox, oy), weight));
        }
    }
    if !has_center {
        out.push(((0.0, 0.0), CENTER_WEIGHT));
    }
    out
}

/// Bridson-style Poisson-disk sampling over the unit square with a
/// deterministic xorshift PRNG seeded by `seed`, so identical `(min_distance,
/// seed)` always yields identical point sets.
fn poisson_disk(min_distance: f64, seed: u32) -> Vec<(f64, f64)> {
    let min_distance = min_distance.max(1e-6);
    let cell_size = min_distance / std::f64::consts::SQRT_2;
    let grid_w = (1.0 / cell_size).ceil() as i64 + 1;
    let grid_h = grid_w;
    let mut grid: Vec<Option<(f64, f64)>> = vec![None; (grid_w * grid_h) as usize];

    let mut state = if seed == 0 { 0x9E3779B9 } else { seed };
    let mut rand_f64 = move || -> f64 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as f64) / (u32::MAX as f64)
    };

    let to_cell = |p: (f64, f64)| -> (i64, i64) {
        ((p.0 / cell_size) as i64, (p.1 / cell_size) as i64)
    };

    let mut points: Vec<(f64, f64)> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let first = (rand_f64(), rand_f64());
    points.push(first);
    active.push(0);
    let (cx, cy) = to_cell(first);
    grid[(cy * grid_w + cx) as usize] = Some(first);

    const K: u32 = 30;

    while !active.is_empty() {
        let idx = (rand_f64() * active.len() as f64) as usize % active.len();
        let origin = points[active[idx]];
        let mut found = false;

        for _ in 0..K {
            let angle = rand_f64() * std::f64::consts::TAU;
            let radius = min_distance * (1.0 + rand_f64());
            let candidate = (origin.0 + radius * angle.cos(), origin.1 + radius * angle.sin());

            if candidate.0 < 0.0 || candidate.0 >= 1.0 || candidate.1 < 0.0 || candidate.1 >= 1.0 {
                continue;
            }

            let (ccx, ccy) = to_cell(candidate);
            let mut ok = true;
            for gy in (ccy - 2).max(0)..=(ccy + 2).min(grid_h - 1) {
                for gx in (ccx - 2).max(0)..=(ccx + 2).min(grid_w - 1) {
                    if let Some(existing) = grid[(gy * grid_w + gx) as usize] {
                        let dx = existing.0 - candidate.0;
                        let dy = existing.1 - candidate.1;
                        if (dx * dx + dy * dy).sqrt() < min_distance {
                            ok = false;
                        }
                    }
                }
            }

            if ok {
                let new_index = points.len();
                points.push(candidate);
                active.push(new_index);
                grid[(ccy * grid_w + ccx) as usize] = Some(candidate);
                found = true;
                break;
            }
        }

        if !found {
            active.remove(idx);
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_mode_is_single_point() {
        let d = pixel_deviations(AaMode::Center);
        assert_eq!(d, vec![(0.5, 0.5)]);
    }

    #[test]
    fn grid_mode_count_is_n_squared() {
        let d = pixel_deviations(AaMode::Grid(3));
        assert_eq!(d.len(), 9);
        for (x, y) in d {
            assert!(x >= 0.0 && x < 1.0);
            assert!(y >= 0.0 && y < 1.0);
        }
    }

    #[test]
    fn grid_super_sample_one_equals_center_like_baseline() {
        // spec §8 invariant 6: super-sample=1 at center deviation equals the
        // center-sample baseline.
        let grid1 = pixel_deviations(AaMode::Grid(1));
        assert_eq!(grid1, vec![(0.5, 0.5)]);
    }

    #[test]
    fn light_deviations_include_zero_offset_variants() {
        // n=2 is even, so the n*n grid itself has no zero-offset cell; the
        // guaranteed (0,0) center sample must be appended on top of it.
        let d = light_deviations(2, 1.0);
        assert_eq!(d.len(), 5);
        assert!(d.contains(&(0.0, 0.0)));
    }

    #[test]
    fn light_deviations_odd_n_does_not_duplicate_center() {
        // n=3 is odd, so the grid's own middle cell already lands on (0,0);
        // the center must not be appended a second time.
        let d = light_deviations(3, 1.0);
        assert_eq!(d.len(), 9);
        assert_eq!(d.iter().filter(|&&p| p == (0.0, 0.0)).count(), 1);
    }

    #[test]
    fn cone_deviations_center_has_max_weight() {
        let d = cone_deviations(3);
        let center = d.iter().find(|(o, _)| *o == (0.0, 0.0));
        assert!(center.is_some());
        let (_, w) = center.unwrap();
        assert!((*w - std::f64::consts::SQRT_2).abs() < 1e-9);
        for (_, weight) in &d {
            assert!(*weight <= std::f64::consts::SQRT_2 + 1e-9);
            assert!(*weight >= 0.0);
        }
    }

    #[test]
    fn poisson_disk_points_respect_min_distance() {
        let points = poisson_disk(0.1, 7);
        assert!(!points.is_empty());
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let dist = (dx * dx + dy * dy).sqrt();
                assert!(dist >= 0.1 - 1e-9);
            }
        }
    }

    #[test]
    fn poisson_disk_is_deterministic() {
        let a = poisson_disk(0.15, 42);
        let b = poisson_disk(0.15, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn poisson_disk_stays_in_unit_square() {
        for p in poisson_disk(0.2, 99) {
            assert!(p.0 >= 0.0 && p.0 < 1.0);
            assert!(p.1 >= 0.0 && p.1 < 1.0);
        }
    }
}
