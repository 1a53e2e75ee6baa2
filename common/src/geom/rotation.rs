use super::vec2::Vec2;

/// Orientation of a component in 90-degree steps, clockwise with y pointing
/// down. Expressed as a transform table rather than per-call arithmetic so
/// extents and pin offsets go through the same mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rotation(u8);

// (x, y) multipliers per step: p' = (a*x + b*y, c*x + d*y)
const TABLE: [[i32; 4]; 4] = [
    [1, 0, 0, 1],
    [0, -1, 1, 0],
    [-1, 0, 0, -1],
    [0, 1, -1, 0],
];

impl Rotation {
    pub fn new(steps: u8) -> Self {
        Self(steps % 4)
    }

    pub fn steps(self) -> u8 {
        self.0
    }

    pub fn turned(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    /// Odd rotations exchange a component's along/across half-extents.
    pub fn swaps_axes(self) -> bool {
        self.0 % 2 == 1
    }

    pub fn apply(self, p: Vec2) -> Vec2 {
        let [a, b, c, d] = TABLE[self.0 as usize];
        Vec2::new(a * p.x + b * p.y, c * p.x + d * p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_steps_are_identity() {
        let p = Vec2::new(3, -7);
        let mut q = p;
        let mut rot = Rotation::default();
        for _ in 0..4 {
            q = Rotation::new(1).apply(q);
            rot = rot.turned();
        }
        assert_eq!(q, p);
        assert_eq!(rot, Rotation::default());
    }

    #[test]
    fn single_step_maps_x_axis_onto_y_axis() {
        let r = Rotation::new(1);
        assert_eq!(r.apply(Vec2::new(1, 0)), Vec2::new(0, 1));
        assert_eq!(r.apply(Vec2::new(0, 1)), Vec2::new(-1, 0));
    }

    #[test]
    fn composing_steps_matches_table() {
        let p = Vec2::new(5, 2);
        let twice = Rotation::new(1).apply(Rotation::new(1).apply(p));
        assert_eq!(Rotation::new(2).apply(p), twice);
    }

    #[test]
    fn axis_swap_parity() {
        assert!(!Rotation::new(0).swaps_axes());
        assert!(Rotation::new(1).swaps_axes());
        assert!(!Rotation::new(2).swaps_axes());
        assert!(Rotation::new(3).swaps_axes());
    }
}
