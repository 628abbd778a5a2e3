use crate::math::Vec2;

const MIN_CELL_SIZE: f64 = 1.0e-6;
const MAX_CELLS_PER_AXIS: usize = 1024;
const INVALID_INDEX: usize = usize::MAX;

/// Uniform bucket grid over the bounding box of the indexed points.
///
/// Queries return a superset of the points within the radius; callers apply
/// their own exact distance filter.
pub struct NeighborGrid {
    cell_size: f64,
    base_cell_size: f64,
    origin: Vec2,
    cols: usize,
    rows: usize,
    head: Vec<usize>,
    next: Vec<usize>,
    cached: Vec<Vec2>,
}

impl NeighborGrid {
    pub fn new(cell_size: f64) -> Self {
        let cell_size = sanitize_cell_size(cell_size);
        Self {
            cell_size,
            base_cell_size: cell_size,
            origin: Vec2::ZERO,
            cols: 1,
            rows: 1,
            head: vec![INVALID_INDEX],
            next: Vec::new(),
            cached: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cached.is_empty()
    }

    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        self.cached.clear();
        self.cached.extend(positions);
        let count = self.cached.len();

        let (min, max) = bounding_box(&self.cached);
        self.ensure_layout(min, max);
        self.head.fill(INVALID_INDEX);
        self.next.clear();
        self.next.resize(count, INVALID_INDEX);

        for i in 0..count {
            let cell = self.cell_index_for_position(self.cached[i]);
            self.next[i] = self.head[cell];
            self.head[cell] = i;
        }
    }

    /// Calls `callback` with the index of every indexed point within `radius`
    /// of `center`.
    pub fn for_each_within<F>(&self, center: Vec2, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        if self.cached.is_empty() {
            return;
        }

        let radius = radius.max(0.0);
        let radius_sq = radius * radius;
        let cell_radius = (radius / self.cell_size).ceil() as isize;

        let base_cell_x = self.cell_x(center.x);
        let base_cell_y = self.cell_y(center.y);
        let min_x = (base_cell_x - cell_radius).max(0);
        let max_x = (base_cell_x + cell_radius).min(self.cols as isize - 1);
        let min_y = (base_cell_y - cell_radius).max(0);
        let max_y = (base_cell_y + cell_radius).min(self.rows as isize - 1);

        for cell_y in min_y..=max_y {
            for cell_x in min_x..=max_x {
                let mut candidate = self.head[cell_y as usize * self.cols + cell_x as usize];
                while candidate != INVALID_INDEX {
                    if (self.cached[candidate] - center).length_sq() <= radius_sq {
                        callback(candidate);
                    }
                    candidate = self.next[candidate];
                }
            }
        }
    }

    fn ensure_layout(&mut self, min: Vec2, max: Vec2) {
        self.origin = min;
        let width = (max.x - min.x).max(0.0);
        let height = (max.y - min.y).max(0.0);

        // Stragglers far outside the arena would otherwise blow up the cell
        // count, so coarsen the grid instead.
        let extent = width.max(height);
        self.cell_size = self
            .base_cell_size
            .max(extent / (MAX_CELLS_PER_AXIS - 1) as f64);

        let cols = ((width / self.cell_size).floor() as usize + 1).min(MAX_CELLS_PER_AXIS);
        let rows = ((height / self.cell_size).floor() as usize + 1).min(MAX_CELLS_PER_AXIS);

        self.cols = cols;
        self.rows = rows;
        self.head.resize(cols * rows, INVALID_INDEX);
    }

    fn cell_index_for_position(&self, position: Vec2) -> usize {
        self.cell_y(position.y) as usize * self.cols + self.cell_x(position.x) as usize
    }

    fn cell_x(&self, x: f64) -> isize {
        (((x - self.origin.x) / self.cell_size).floor() as isize).clamp(0, self.cols as isize - 1)
    }

    fn cell_y(&self, y: f64) -> isize {
        (((y - self.origin.y) / self.cell_size).floor() as isize).clamp(0, self.rows as isize - 1)
    }
}

fn sanitize_cell_size(cell_size: f64) -> f64 {
    if !cell_size.is_finite() {
        return MIN_CELL_SIZE;
    }
    cell_size.max(MIN_CELL_SIZE)
}

fn bounding_box(points: &[Vec2]) -> (Vec2, Vec2) {
    let mut iter = points.iter().filter(|p| p.is_finite());
    let Some(first) = iter.next() else {
        return (Vec2::ZERO, Vec2::ZERO);
    };

    iter.fold((*first, *first), |(min, max), p| {
        (
            Vec2::new(min.x.min(p.x), min.y.min(p.y)),
            Vec2::new(max.x.max(p.x), max.y.max(p.y)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::NeighborGrid;
    use crate::math::Vec2;

    fn sorted_neighbors(grid: &NeighborGrid, center: Vec2, radius: f64) -> Vec<usize> {
        let mut neighbors = Vec::new();
        grid.for_each_within(center, radius, |j| neighbors.push(j));
        neighbors.sort_unstable();
        neighbors
    }

    #[test]
    fn finds_neighbors_in_known_layout() {
        let positions = vec![
            Vec2::new(1.0, 1.0),
            Vec2::new(1.5, 1.2),
            Vec2::new(8.0, 8.0),
            Vec2::new(2.7, 1.1),
        ];

        let mut grid = NeighborGrid::new(2.0);
        grid.rebuild(positions.iter().copied());

        assert_eq!(sorted_neighbors(&grid, positions[0], 2.0), vec![0, 1, 3]);
        assert_eq!(sorted_neighbors(&grid, positions[2], 2.0), vec![2]);
    }

    #[test]
    fn checks_across_cell_boundaries() {
        let positions = vec![
            Vec2::new(1.9, 1.0),
            Vec2::new(2.1, 1.0),
            Vec2::new(5.0, 5.0),
        ];

        let mut grid = NeighborGrid::new(2.0);
        grid.rebuild(positions.iter().copied());

        assert_eq!(sorted_neighbors(&grid, positions[0], 0.25), vec![0, 1]);
        assert_eq!(sorted_neighbors(&grid, positions[1], 0.25), vec![0, 1]);
    }

    #[test]
    fn handles_negative_coordinates_and_outside_queries() {
        let positions = vec![
            Vec2::new(-150.0, -150.0),
            Vec2::new(-145.0, -150.0),
            Vec2::new(150.0, 150.0),
        ];

        let mut grid = NeighborGrid::new(8.4);
        grid.rebuild(positions.iter().copied());

        assert_eq!(sorted_neighbors(&grid, Vec2::new(-147.0, -150.0), 8.4), vec![0, 1]);
        // Query point outside the indexed bounding box still sees edge cells.
        assert_eq!(sorted_neighbors(&grid, Vec2::new(155.0, 155.0), 8.4), vec![2]);
    }

    #[test]
    fn far_stragglers_keep_grid_bounded() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0e7, -1.0e7),
        ];

        let mut grid = NeighborGrid::new(1.0);
        grid.rebuild(positions.iter().copied());

        assert_eq!(grid.len(), 3);
        assert_eq!(sorted_neighbors(&grid, Vec2::ZERO, 1.5), vec![0, 1]);
    }

    #[test]
    fn empty_grid_yields_nothing() {
        let mut grid = NeighborGrid::new(3.0);
        grid.rebuild(std::iter::empty());
        assert!(grid.is_empty());
        assert!(sorted_neighbors(&grid, Vec2::ZERO, 10.0).is_empty());
    }
}
