use crate::config::WaterSettings;
use crate::grid::Grid;
use crate::math::Point2i;
use crate::pathfind::CostSearch;

/// Максимальная высота, при которой ячейка края годится в устье реки
const LOW_EDGE_LEVEL: f32 = -0.25;

/// Высота в [-1, 1]; выше нуля река не поднимается
const RIVER_BLOCK_LEVEL: f32 = 0.0;

/// Минимальный зазор между кандидатами — доля размера карты
const EDGE_SPACING_DIVISOR: i32 = 8;

/// Прокладывает правдоподобный маршрут реки через карту
///
/// Стратегия жадная: первая же пара «старт — достаточно далёкий достижимый
/// конец» выигрывает. Глобально оптимальный маршрут не ищется — это
/// эстетическая генерация рельефа, а не критичная к точности система.
pub struct RiverRouter<'a> {
    ground: &'a Grid<f32>,
    settings: WaterSettings,
}

impl<'a> RiverRouter<'a> {
    #[must_use]
    pub fn new(ground: &'a Grid<f32>, settings: WaterSettings) -> Self {
        Self { ground, settings }
    }

    /// Ищет маршрут реки от края до края длиной не меньше `min_distance`
    ///
    /// Возвращает пустой маршрут, если подходящей пары устьев нет — карта без
    /// реки остаётся корректным результатом генерации.
    #[must_use]
    pub fn find_river_route(&self, min_distance: f32) -> Vec<Point2i> {
        let width = self.ground.width;
        let height = self.ground.height;
        let x_spacing = width / EDGE_SPACING_DIVISOR;
        let y_spacing = height / EDGE_SPACING_DIVISOR;

        // Сканируем четыре края карты: ищем низины, достаточно удалённые друг от друга
        let mut candidates = Vec::new();
        for (origin, step, spacing) in [
            (Point2i::new(0, 0), Point2i::new(0, 1), y_spacing),
            (Point2i::new(width - 1, 0), Point2i::new(0, 1), y_spacing),
            (Point2i::new(0, 0), Point2i::new(1, 0), x_spacing),
            (Point2i::new(0, height - 1), Point2i::new(1, 0), x_spacing),
        ] {
            candidates.extend(self.endpoint_candidates(origin, step, LOW_EDGE_LEVEL, spacing));
        }

        // Нужны хотя бы старт и конец
        if candidates.len() < 2 {
            log::info!("river skipped: {} endpoint candidate(s)", candidates.len());
            return Vec::new();
        }

        for &start in &candidates {
            // Карта стоимости достижения каждой ячейки из данного старта
            let mut search = CostSearch::new(self.ground);
            search
                .set_step_cost_factor(self.settings.route_cost)
                .set_block_value(RIVER_BLOCK_LEVEL)
                .calculate(start);

            // Концы перебираются в порядке убывания расстояния от старта
            let mut ends = candidates.clone();
            ends.sort_by(|&a, &b| {
                (b - start)
                    .length()
                    .partial_cmp(&(a - start).length())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            for &end in &ends {
                if end == start {
                    continue;
                }
                if (end - start).length() < min_distance {
                    continue;
                }
                // Маршруты строго по горизонтали или вертикали выглядят неестественно
                if start.x == end.x || start.y == end.y {
                    continue;
                }
                if !search.can_reach(end) {
                    continue;
                }

                log::info!("river route {start:?} -> {end:?}");
                return search.route(end);
            }
        }

        log::info!("river skipped: no reachable pair among {} candidates", candidates.len());
        Vec::new()
    }

    /// Собирает кандидатов в устья вдоль одного края
    ///
    /// Идёт вдоль края с шагом `step`, каждую непрерывную полосу низин
    /// (высота ≤ `max_level`) схлопывает в её середину и затем пропускает
    /// `spacing` ячеек, чтобы кандидаты не сбивались в кучу.
    fn endpoint_candidates(
        &self,
        origin: Point2i,
        step: Point2i,
        max_level: f32,
        spacing: i32,
    ) -> Vec<Point2i> {
        let mut found = Vec::new();
        let spacer = Point2i::new(step.x * spacing, step.y * spacing);

        let mut p = origin;
        while self.ground.contains(p) {
            if self.ground[p] <= max_level {
                // Дошли до низины: ищем, где она заканчивается
                let region_start = p;
                while self.ground.contains(p) && self.ground[p] <= max_level {
                    p += step;
                }

                found.push(region_start + (p - region_start) / 2);
                p += spacer;
            }
            p += step;
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> WaterSettings {
        WaterSettings {
            biome: 3,
            route_cost: 6.0,
            river_max_size: 4.0,
            river_depth: 0.25,
        }
    }

    /// Проходимая (чуть ниже нуля) карта без устьев
    fn passable_grid(size: i32) -> Grid<f32> {
        let mut grid = Grid::new(size, size);
        grid.fill(-0.1);
        grid
    }

    #[test]
    fn edge_scan_collapses_runs_to_midpoints() {
        let mut grid = passable_grid(16);
        // Полоса низины на левом краю: y = 2..=4
        for y in 2..=4 {
            grid[Point2i::new(0, y)] = -0.5;
        }

        let router = RiverRouter::new(&grid, settings());
        let found =
            router.endpoint_candidates(Point2i::new(0, 0), Point2i::new(0, 1), LOW_EDGE_LEVEL, 2);
        assert_eq!(found, vec![Point2i::new(0, 3)]);
    }

    #[test]
    fn edge_scan_spacing_separates_candidates() {
        let mut grid = passable_grid(16);
        for y in 0..16 {
            grid[Point2i::new(0, y)] = -0.5;
        }

        let router = RiverRouter::new(&grid, settings());
        let found =
            router.endpoint_candidates(Point2i::new(0, 0), Point2i::new(0, 1), LOW_EDGE_LEVEL, 2);
        // Один кандидат на всю сплошную полосу
        assert_eq!(found, vec![Point2i::new(0, 8)]);
    }

    #[test]
    fn no_candidates_means_no_route() {
        let grid = passable_grid(16);
        let router = RiverRouter::new(&grid, settings());
        assert!(router.find_river_route(8.0).is_empty());
    }

    #[test]
    fn route_connects_two_notches_on_opposite_edges() {
        let mut grid = passable_grid(16);
        grid[Point2i::new(0, 3)] = -0.5;
        grid[Point2i::new(15, 12)] = -0.5;

        let router = RiverRouter::new(&grid, settings());
        let route = router.find_river_route(8.0);

        assert!(!route.is_empty());
        assert_eq!(route.first(), Some(&Point2i::new(0, 3)));
        assert_eq!(route.last(), Some(&Point2i::new(15, 12)));
        for pair in route.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1);
        }
    }

    #[test]
    fn straight_line_pairs_are_rejected() {
        let mut grid = passable_grid(16);
        // Устья на одной горизонтали
        grid[Point2i::new(0, 8)] = -0.5;
        grid[Point2i::new(15, 8)] = -0.5;

        let router = RiverRouter::new(&grid, settings());
        assert!(router.find_river_route(8.0).is_empty());
    }

    #[test]
    fn close_pairs_are_rejected_by_min_distance() {
        let mut grid = passable_grid(16);
        grid[Point2i::new(0, 3)] = -0.5;
        grid[Point2i::new(0, 12)] = -0.5;

        let router = RiverRouter::new(&grid, settings());
        assert!(router.find_river_route(20.0).is_empty());
    }

    #[test]
    fn unreachable_endpoints_are_skipped() {
        let mut grid = passable_grid(16);
        grid[Point2i::new(0, 3)] = -0.5;
        grid[Point2i::new(15, 12)] = -0.5;
        // Непроходимый хребет поперёк всей карты
        for x in 0..16 {
            grid[Point2i::new(x, 8)] = 0.5;
        }

        let router = RiverRouter::new(&grid, settings());
        assert!(router.find_river_route(8.0).is_empty());
    }
}
