use crate::math::Point2i;
use std::ops::{Index, IndexMut};

/// Плотная двумерная сетка фиксированного размера
///
/// Хранение построчное (row-major): индекс ячейки `(x, y)` равен
/// `y * width + x`. Все алгоритмы генерации работают поверх этой структуры.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    pub width: i32,
    pub height: i32,
    pub data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Создаёт сетку, заполненную значением по умолчанию
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid size must be positive");
        Self {
            width,
            height,
            data: vec![T::default(); (width * height) as usize],
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    /// Проверяет, лежит ли точка внутри сетки
    ///
    /// Любая итерация с переменным шагом (сканы краёв, заливка) обязана
    /// вызывать эту проверку перед индексированием.
    #[must_use]
    pub fn contains(&self, p: Point2i) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[must_use]
    pub fn at(&self, p: Point2i) -> &T {
        &self.data[self.index_of(p)]
    }

    pub fn at_mut(&mut self, p: Point2i) -> &mut T {
        let idx = self.index_of(p);
        &mut self.data[idx]
    }

    /// Обходит все ячейки в построчном порядке (y внешний, x внутренний)
    ///
    /// Порядок обхода фиксирован: от него зависит воспроизводимость
    /// генерации и раскладка тайлов у потребителей.
    pub fn for_each<F: FnMut(Point2i, &T)>(&self, mut f: F) {
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Point2i::new(x, y);
                f(p, self.at(p));
            }
        }
    }

    #[must_use]
    pub fn index_of(&self, p: Point2i) -> usize {
        debug_assert!(self.contains(p), "point {p:?} out of grid bounds");
        (p.y * self.width + p.x) as usize
    }

    #[must_use]
    pub fn point_of(&self, index: usize) -> Point2i {
        Point2i::new(index as i32 % self.width, index as i32 / self.width)
    }
}

impl<T> Index<Point2i> for Grid<T> {
    type Output = T;

    fn index(&self, p: Point2i) -> &T {
        self.at(p)
    }
}

impl<T> IndexMut<Point2i> for Grid<T> {
    fn index_mut(&mut self, p: Point2i) -> &mut T {
        self.at_mut(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_default_filled() {
        let g: Grid<f32> = Grid::new(4, 3);
        assert_eq!(g.data.len(), 12);
        assert!(g.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn contains_checks_all_bounds() {
        let g: Grid<i32> = Grid::new(5, 4);
        assert!(g.contains(Point2i::new(0, 0)));
        assert!(g.contains(Point2i::new(4, 3)));
        assert!(!g.contains(Point2i::new(5, 0)));
        assert!(!g.contains(Point2i::new(0, 4)));
        assert!(!g.contains(Point2i::new(-1, 0)));
        assert!(!g.contains(Point2i::new(0, -1)));
    }

    #[test]
    fn index_round_trip() {
        let mut g: Grid<i32> = Grid::new(3, 3);
        let p = Point2i::new(2, 1);
        g[p] = 42;
        assert_eq!(g[p], 42);
        assert_eq!(g.point_of(g.index_of(p)), p);
    }

    #[test]
    fn for_each_visits_row_major() {
        let g: Grid<i32> = Grid::new(2, 2);
        let mut visited = Vec::new();
        g.for_each(|p, _| visited.push(p));
        assert_eq!(
            visited,
            vec![
                Point2i::new(0, 0),
                Point2i::new(1, 0),
                Point2i::new(0, 1),
                Point2i::new(1, 1),
            ]
        );
    }

    #[test]
    fn fill_overwrites_every_cell() {
        let mut g: Grid<f32> = Grid::new(3, 2);
        g.fill(0.5);
        assert!(g.data.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }
}
