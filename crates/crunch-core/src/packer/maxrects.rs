//! MaxRects bin packing with the Best Short Side Fit heuristic.
//!
//! Keeps a list of maximal free rectangles. Each insertion picks the free
//! rectangle that leaves the smallest leftover on the rectangle's short side
//! (ties broken by the long side), places the new rectangle in its corner,
//! splits every free rectangle the placement overlaps into up to four
//! maximal remainders (each spanning the *original* free rectangle's full
//! width or height, not just the overlap), and prunes any free rectangle that
//! ended up fully contained in another.

use crate::rect::Rect;

pub struct MaxRectsPacker {
    free: Vec<Rect>,
}

impl MaxRectsPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            free: vec![Rect::new(0, 0, width, height)],
        }
    }

    /// Attempts to place a `width x height` rectangle, trying a 90-degree
    /// rotation as well when `allow_rotate` is set. Returns the placed rect
    /// (in its final, possibly-swapped-dimensions orientation) and whether it
    /// was rotated.
    pub fn insert(&mut self, width: u32, height: u32, allow_rotate: bool) -> Option<(Rect, bool)> {
        let (placement, rotated) = self.find_position(width, height, allow_rotate)?;
        self.place_rect(&placement);
        Some((placement, rotated))
    }

    fn find_position(&self, w: u32, h: u32, allow_rotate: bool) -> Option<(Rect, bool)> {
        let mut best: Option<((i64, i64), Rect, bool)> = None;

        for fr in &self.free {
            if fr.w >= w && fr.h >= h {
                let score = short_side_score(fr.w, fr.h, w, h);
                let better = match &best {
                    Some((b, _, _)) => score < *b,
                    None => true,
                };
                if better {
                    best = Some((score, Rect::new(fr.x, fr.y, w, h), false));
                }
            }
            if allow_rotate && fr.w >= h && fr.h >= w {
                let score = short_side_score(fr.w, fr.h, h, w);
                let better = match &best {
                    Some((b, _, _)) => score < *b,
                    None => true,
                };
                if better {
                    best = Some((score, Rect::new(fr.x, fr.y, h, w), true));
                }
            }
        }

        best.map(|(_, rect, rotated)| (rect, rotated))
    }

    fn place_rect(&mut self, node: &Rect) {
        let mut new_free: Vec<Rect> = Vec::new();
        for fr in self.free.iter() {
            if !fr.intersects(node) {
                new_free.push(*fr);
                continue;
            }

            let fr_x2 = fr.right();
            let fr_y2 = fr.bottom();
            let n_x2 = node.right();
            let n_y2 = node.bottom();

            let ix1 = fr.x.max(node.x);
            let iy1 = fr.y.max(node.y);
            let ix2 = fr_x2.min(n_x2);
            let iy2 = fr_y2.min(n_y2);

            if iy1 > fr.y {
                new_free.push(Rect::new(fr.x, fr.y, fr.w, iy1 - fr.y));
            }
            if iy2 < fr_y2 {
                new_free.push(Rect::new(fr.x, iy2, fr.w, fr_y2 - iy2));
            }
            if ix1 > fr.x {
                new_free.push(Rect::new(fr.x, fr.y, ix1 - fr.x, fr.h));
            }
            if ix2 < fr_x2 {
                new_free.push(Rect::new(ix2, fr.y, fr_x2 - ix2, fr.h));
            }
        }

        self.free = new_free;
        self.prune_free_list();
    }

    /// Drops every free rectangle that is fully contained in another, since a
    /// contained rectangle can never host a placement its container can't.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut j = i + 1;
            let mut remove_i = false;
            while j < self.free.len() {
                let a = self.free[i];
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// `(short-side leftover, long-side leftover)`, lower is better.
fn short_side_score(free_w: u32, free_h: u32, w: u32, h: u32) -> (i64, i64) {
    let leftover_w = free_w as i64 - w as i64;
    let leftover_h = free_h as i64 - h as i64;
    (leftover_w.min(leftover_h), leftover_w.max(leftover_h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_into_empty_bin_at_origin() {
        let mut p = MaxRectsPacker::new(64, 64);
        let (r, rotated) = p.insert(10, 20, false).unwrap();
        assert_eq!(r, Rect::new(0, 0, 10, 20));
        assert!(!rotated);
    }

    #[test]
    fn refuses_rectangle_larger_than_bin() {
        let mut p = MaxRectsPacker::new(16, 16);
        assert!(p.insert(17, 1, false).is_none());
        assert!(p.insert(17, 1, true).is_none());
    }

    #[test]
    fn rotates_when_only_the_rotated_orientation_fits() {
        let mut p = MaxRectsPacker::new(10, 20);
        let (r, rotated) = p.insert(20, 10, true).unwrap();
        assert!(rotated);
        assert_eq!((r.w, r.h), (10, 20));
    }

    #[test]
    fn without_rotation_a_sideways_fit_is_rejected() {
        let mut p = MaxRectsPacker::new(10, 20);
        assert!(p.insert(20, 10, false).is_none());
    }

    #[test]
    fn successive_placements_never_overlap() {
        let mut p = MaxRectsPacker::new(32, 32);
        let mut placed = Vec::new();
        for _ in 0..6 {
            let (r, _) = p.insert(8, 8, false).unwrap();
            for other in &placed {
                assert!(!r.intersects(other), "{:?} overlaps {:?}", r, other);
            }
            placed.push(r);
        }
    }

    #[test]
    fn exact_fit_consumes_the_whole_bin() {
        let mut p = MaxRectsPacker::new(16, 16);
        let (r, _) = p.insert(16, 16, false).unwrap();
        assert_eq!(r, Rect::new(0, 0, 16, 16));
        assert!(p.insert(1, 1, false).is_none());
    }

    #[test]
    fn free_list_never_retains_a_fully_contained_rect() {
        let mut p = MaxRectsPacker::new(32, 32);
        p.insert(10, 10, false);
        p.insert(10, 10, false);
        for a in &p.free {
            for b in &p.free {
                if std::ptr::eq(a, b) {
                    continue;
                }
                assert!(!b.contains(a));
            }
        }
    }

    #[test]
    fn split_keeps_the_full_height_of_the_untouched_side() {
        // placing a 12x12 rect at the origin of a 32x32 bin must leave a
        // right-hand free rectangle spanning the bin's full height (12,0,20,32),
        // not just the placement's own height (12,0,20,12) — otherwise a tall
        // sprite that only fits in that column is rejected even though it fits.
        let mut p = MaxRectsPacker::new(32, 32);
        p.insert(12, 12, false).unwrap();
        let (r, rotated) = p.insert(20, 32, false).unwrap();
        assert_eq!(r, Rect::new(12, 0, 20, 32));
        assert!(!rotated);
    }
}
