use crate::grid::Grid;
use crate::math::Point2i;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Восемь соседей с длиной шага: 1 по сторонам, √2 по диагоналям
///
/// Порядок перечисления фиксирован — от него зависит выбор маршрута при
/// равной стоимости, а значит и воспроизводимость генерации.
const NEIGHBORS: [(i32, i32, f32); 8] = [
    (-1, -1, std::f32::consts::SQRT_2),
    (0, -1, 1.0),
    (1, -1, std::f32::consts::SQRT_2),
    (-1, 0, 1.0),
    (1, 0, 1.0),
    (-1, 1, std::f32::consts::SQRT_2),
    (0, 1, 1.0),
    (1, 1, std::f32::consts::SQRT_2),
];

/// Нет предшественника (стартовая или непосещённая ячейка)
const NO_PREV: usize = usize::MAX;

/// Элемент фронтира; упорядочен по убыванию стоимости, чтобы `BinaryHeap`
/// работал как min-куча
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrontierEntry {
    cost: f32,
    index: usize,
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Поиск наименьшей стоимости по сетке высот (алгоритм Дейкстры, 8 соседей)
///
/// Стоимость шага из A в B: `длина_шага * (1 + step_cost_factor * max(0, h(B) - h(A)))` —
/// подъём дорожает пропорционально перепаду, спуск и ровный ход не штрафуются.
/// Ячейки выше `block_value` непроходимы и никогда не попадают во фронтир.
///
/// Поиск идёт до исчерпания фронтира (без целевой точки): роутеру реки нужно
/// проверять достижимость многих кандидатов по одному вызову [`calculate`].
///
/// [`calculate`]: CostSearch::calculate
pub struct CostSearch<'a> {
    ground: &'a Grid<f32>,
    step_cost_factor: f32,
    block_value: f32,
    cost: Vec<f32>,
    settled: Vec<bool>,
    prev: Vec<usize>,
    start: Option<Point2i>,
}

impl<'a> CostSearch<'a> {
    #[must_use]
    pub fn new(ground: &'a Grid<f32>) -> Self {
        let cells = ground.data.len();
        Self {
            ground,
            step_cost_factor: 0.0,
            block_value: f32::INFINITY,
            cost: vec![f32::INFINITY; cells],
            settled: vec![false; cells],
            prev: vec![NO_PREV; cells],
            start: None,
        }
    }

    /// Штраф за единицу подъёма; задаётся до `calculate`
    pub fn set_step_cost_factor(&mut self, factor: f32) -> &mut Self {
        self.step_cost_factor = factor;
        self
    }

    /// Высота, выше которой ячейки непроходимы; задаётся до `calculate`
    pub fn set_block_value(&mut self, value: f32) -> &mut Self {
        self.block_value = value;
        self
    }

    /// Просчитывает стоимость достижения каждой ячейки из `start`
    ///
    /// Рабочее состояние (стоимости, флаги, предшественники) полностью
    /// перестраивается на каждом вызове и не протекает между стартами.
    pub fn calculate(&mut self, start: Point2i) {
        assert!(self.ground.contains(start), "start point out of grid");

        self.cost.fill(f32::INFINITY);
        self.settled.fill(false);
        self.prev.fill(NO_PREV);
        self.start = Some(start);

        // Заблокированный старт не порождает фронтира
        if self.ground[start] > self.block_value {
            return;
        }

        let start_index = self.ground.index_of(start);
        self.cost[start_index] = 0.0;

        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry {
            cost: 0.0,
            index: start_index,
        });

        while let Some(entry) = frontier.pop() {
            if self.settled[entry.index] {
                continue;
            }
            self.settled[entry.index] = true;

            let p = self.ground.point_of(entry.index);
            let here = self.ground.data[entry.index];

            for &(dx, dy, step) in &NEIGHBORS {
                let n = p + Point2i::new(dx, dy);
                if !self.ground.contains(n) {
                    continue;
                }
                let n_index = self.ground.index_of(n);
                if self.settled[n_index] {
                    continue;
                }
                let there = self.ground.data[n_index];
                if there > self.block_value {
                    continue;
                }

                let rise = (there - here).max(0.0);
                let relaxed = self.cost[entry.index] + step * (1.0 + self.step_cost_factor * rise);
                if relaxed < self.cost[n_index] {
                    self.cost[n_index] = relaxed;
                    self.prev[n_index] = entry.index;
                    frontier.push(FrontierEntry {
                        cost: relaxed,
                        index: n_index,
                    });
                }
            }
        }
    }

    /// Достижима ли точка из последнего просчитанного старта
    #[must_use]
    pub fn can_reach(&self, p: Point2i) -> bool {
        self.ground.contains(p) && self.settled[self.ground.index_of(p)]
    }

    /// Итоговая стоимость достижения точки, если она достижима
    #[must_use]
    pub fn cost_at(&self, p: Point2i) -> Option<f32> {
        if self.can_reach(p) {
            Some(self.cost[self.ground.index_of(p)])
        } else {
            None
        }
    }

    /// Восстанавливает маршрут от старта до `p` по ссылкам на предшественников
    ///
    /// Для недостижимой точки возвращает пустой маршрут — вызывающий обязан
    /// сперва проверить [`can_reach`](CostSearch::can_reach).
    #[must_use]
    pub fn route(&self, p: Point2i) -> Vec<Point2i> {
        if !self.can_reach(p) {
            return Vec::new();
        }

        let mut points = Vec::new();
        let mut index = self.ground.index_of(p);
        loop {
            points.push(self.ground.point_of(index));
            if self.prev[index] == NO_PREV {
                break;
            }
            index = self.prev[index];
        }
        points.reverse();
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(size: i32, level: f32) -> Grid<f32> {
        let mut grid = Grid::new(size, size);
        grid.fill(level);
        grid
    }

    /// Равномерный спуск: 1.0 в верхней строке, -1.0 в нижней
    fn ramp_grid(size: i32) -> Grid<f32> {
        let mut grid = Grid::new(size, size);
        for y in 0..size {
            let h = 1.0 - 2.0 * (y as f32) / ((size - 1) as f32);
            for x in 0..size {
                grid[Point2i::new(x, y)] = h;
            }
        }
        grid
    }

    fn is_adjacent(a: Point2i, b: Point2i) -> bool {
        let d = a - b;
        d.x.abs() <= 1 && d.y.abs() <= 1 && (d.x != 0 || d.y != 0)
    }

    #[test]
    fn open_grid_is_fully_reachable() {
        let grid = flat_grid(9, 0.0);
        let mut search = CostSearch::new(&grid);
        search.set_step_cost_factor(6.0).calculate(Point2i::new(0, 0));

        grid.for_each(|p, _| assert!(search.can_reach(p), "cell {p:?} unreachable"));
    }

    #[test]
    fn route_connects_start_and_end_with_adjacent_steps() {
        let grid = flat_grid(9, 0.0);
        let start = Point2i::new(0, 0);
        let end = Point2i::new(8, 5);

        let mut search = CostSearch::new(&grid);
        search.calculate(start);
        let route = search.route(end);

        assert_eq!(route.first(), Some(&start));
        assert_eq!(route.last(), Some(&end));
        for pair in route.windows(2) {
            assert!(is_adjacent(pair[0], pair[1]), "gap between {pair:?}");
        }
    }

    #[test]
    fn blocked_cells_never_settle_or_appear_in_routes() {
        // Стена высотой 2.0 поперёк карты
        let mut grid = flat_grid(9, 0.0);
        for x in 0..9 {
            grid[Point2i::new(x, 4)] = 2.0;
        }

        let mut search = CostSearch::new(&grid);
        search.set_block_value(1.0).calculate(Point2i::new(4, 0));

        for x in 0..9 {
            assert!(!search.can_reach(Point2i::new(x, 4)));
            assert!(!search.can_reach(Point2i::new(x, 8)), "wall must split the map");
        }
        assert!(search.route(Point2i::new(4, 8)).is_empty());
        for p in search.route(Point2i::new(8, 3)) {
            assert_ne!(grid[p], 2.0);
        }
    }

    #[test]
    fn ramp_reachability_respects_block_level() {
        let grid = ramp_grid(17);
        let low_corner = Point2i::new(0, 16);

        let mut search = CostSearch::new(&grid);
        search
            .set_step_cost_factor(6.0)
            .set_block_value(0.0)
            .calculate(low_corner);

        grid.for_each(|p, &h| {
            if h <= 0.0 {
                assert!(search.can_reach(p), "low cell {p:?} (h={h}) unreachable");
            } else {
                assert!(!search.can_reach(p), "high cell {p:?} (h={h}) reachable");
            }
        });
    }

    #[test]
    fn higher_step_cost_factor_never_cheapens_an_uphill_route() {
        let grid = ramp_grid(9);
        let bottom = Point2i::new(0, 8);
        let top = Point2i::new(8, 0);

        let mut cheap = CostSearch::new(&grid);
        cheap.set_step_cost_factor(1.0).calculate(bottom);
        let mut steep = CostSearch::new(&grid);
        steep.set_step_cost_factor(6.0).calculate(bottom);

        let cheap_cost = cheap.cost_at(top).unwrap();
        let steep_cost = steep.cost_at(top).unwrap();
        assert!(steep_cost >= cheap_cost);
        // Подъём в гору обязан стоить дороже чистой дистанции
        assert!(cheap_cost > (top - bottom).length());
    }

    #[test]
    fn recalculation_is_reproducible() {
        let grid = ramp_grid(9);
        let start = Point2i::new(4, 8);
        let end = Point2i::new(8, 4);

        let mut search = CostSearch::new(&grid);
        search.set_step_cost_factor(3.0).calculate(start);
        let first = search.route(end);
        search.calculate(start);
        let second = search.route(end);
        assert_eq!(first, second);
    }

    #[test]
    fn blocked_start_reaches_nothing() {
        let grid = flat_grid(5, 0.5);
        let mut search = CostSearch::new(&grid);
        search.set_block_value(0.0).calculate(Point2i::new(2, 2));
        grid.for_each(|p, _| assert!(!search.can_reach(p)));
    }
}
