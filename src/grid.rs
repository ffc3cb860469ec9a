pub const GRID_W: usize = 15;
pub const GRID_H: usize = 15;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Open,
    Wall,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// Rectangular occupancy grid, row-major, indexed `[y][x]`.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Grid {
            cells: vec![vec![cell; width]; height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[pos.y][pos.x]
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        self.cells[pos.y][pos.x] = cell;
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.get(pos) == Cell::Open
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x == self.width - 1 || pos.y == self.height - 1
    }

    /// Neighbor in `dir`, or `None` when it would leave the grid.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if !self.in_bounds(nx, ny) {
            return None;
        }
        Some(Pos::new(nx as usize, ny as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stops_at_edges() {
        let grid = Grid::filled(3, 3, Cell::Open);
        assert_eq!(grid.step(Pos::new(0, 0), Dir::Up), None);
        assert_eq!(grid.step(Pos::new(0, 0), Dir::Left), None);
        assert_eq!(grid.step(Pos::new(2, 2), Dir::Down), None);
        assert_eq!(
            grid.step(Pos::new(1, 1), Dir::Right),
            Some(Pos::new(2, 1))
        );
    }

    #[test]
    fn border_detection() {
        let grid = Grid::filled(5, 4, Cell::Wall);
        assert!(grid.is_border(Pos::new(0, 2)));
        assert!(grid.is_border(Pos::new(4, 1)));
        assert!(grid.is_border(Pos::new(3, 3)));
        assert!(!grid.is_border(Pos::new(2, 2)));
    }
}
