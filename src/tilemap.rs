use crate::error::{Result, WorldError};
use crate::point::IntPoint;

/// A dense row-major 2D grid addressed by (row, col). Edges do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Tilemap<T> {
    /// Build a map from a generator called for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(IntPoint) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(IntPoint::new(row as i32, col as i32)));
            }
        }
        Self { width, height, data }
    }

    /// Extent as a (rows, cols) point.
    pub fn extent(&self) -> IntPoint {
        IntPoint::new(self.height as i32, self.width as i32)
    }

    fn index(&self, point: IntPoint) -> Option<usize> {
        if self.in_bounds(point) {
            Some(point.row as usize * self.width + point.col as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: IntPoint) -> bool {
        point.row >= 0
            && point.col >= 0
            && (point.row as usize) < self.height
            && (point.col as usize) < self.width
    }

    pub fn get(&self, point: IntPoint) -> Option<&T> {
        self.index(point).map(|idx| &self.data[idx])
    }

    pub fn get_mut(&mut self, point: IntPoint) -> Option<&mut T> {
        self.index(point).map(move |idx| &mut self.data[idx])
    }

    /// Like [`Tilemap::get`] but reports the miss as [`WorldError::OutOfBounds`].
    pub fn try_get(&self, point: IntPoint) -> Result<&T> {
        let (width, height) = (self.width, self.height);
        self.get(point)
            .ok_or_else(|| WorldError::out_of_bounds(point, width, height))
    }

    pub fn try_get_mut(&mut self, point: IntPoint) -> Result<&mut T> {
        let (width, height) = (self.width, self.height);
        self.get_mut(point)
            .ok_or_else(|| WorldError::out_of_bounds(point, width, height))
    }

    pub fn set(&mut self, point: IntPoint, value: T) -> Result<()> {
        *self.try_get_mut(point)? = value;
        Ok(())
    }

    /// The in-bounds members of the 8-neighbourhood of `point`.
    pub fn neighbors_8(&self, point: IntPoint) -> Vec<IntPoint> {
        let mut result = Vec::with_capacity(8);
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let n = IntPoint::new(point.row + dr, point.col + dc);
                if self.in_bounds(n) {
                    result.push(n);
                }
            }
        }
        result
    }

    /// Number of in-bounds 8-neighbours whose value satisfies `pred`.
    pub fn count_neighbors(&self, point: IntPoint, pred: impl Fn(&T) -> bool) -> usize {
        self.neighbors_8(point)
            .into_iter()
            .filter_map(|n| self.get(n))
            .filter(|v| pred(v))
            .count()
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (IntPoint, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            (IntPoint::new((idx / width) as i32, (idx % width) as i32), val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (IntPoint, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            (IntPoint::new((idx / width) as i32, (idx % width) as i32), val)
        })
    }

    /// Row-major view of the backing storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_in_bounds() {
        let mut map: Tilemap<u8> = Tilemap::new(4, 3);
        map.set(IntPoint::new(2, 3), 7).unwrap();
        assert_eq!(map.get(IntPoint::new(2, 3)), Some(&7));
        assert_eq!(map.as_slice()[2 * 4 + 3], 7);
    }

    #[test]
    fn test_out_of_bounds_does_not_wrap() {
        let mut map: Tilemap<u8> = Tilemap::new(4, 3);
        assert!(map.get(IntPoint::new(0, 4)).is_none());
        assert!(map.get(IntPoint::new(-1, 0)).is_none());
        assert!(matches!(
            map.set(IntPoint::new(3, 0), 1),
            Err(WorldError::OutOfBounds { row: 3, col: 0, width: 4, height: 3 })
        ));
    }

    #[test]
    fn test_neighbors_skip_edges() {
        let map: Tilemap<u8> = Tilemap::new(5, 5);
        assert_eq!(map.neighbors_8(IntPoint::new(0, 0)).len(), 3);
        assert_eq!(map.neighbors_8(IntPoint::new(0, 2)).len(), 5);
        assert_eq!(map.neighbors_8(IntPoint::new(2, 2)).len(), 8);
    }

    #[test]
    fn test_count_neighbors() {
        let mut map: Tilemap<bool> = Tilemap::new(3, 3);
        map.set(IntPoint::new(0, 0), true).unwrap();
        map.set(IntPoint::new(2, 2), true).unwrap();
        map.set(IntPoint::new(1, 1), true).unwrap();
        assert_eq!(map.count_neighbors(IntPoint::new(1, 1), |v| *v), 2);
    }

    #[test]
    fn test_from_fn_row_major() {
        let map = Tilemap::from_fn(3, 2, |p| p.row * 10 + p.col);
        let cells: Vec<i32> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(cells, vec![0, 1, 2, 10, 11, 12]);
    }
}
