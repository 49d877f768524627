use crate::grid::Grid;
use crate::math::Point2i;
use std::collections::VecDeque;

/// Соседство заливки: четыре стороны
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Прокапывает русло вдоль маршрута круглой кистью радиуса `radius`
///
/// Для каждой ячейки в радиусе `r` от точки маршрута новая высота — взвешенная
/// смесь `min(старая, level)` и старой высоты с весом `1/r²` (1 в центре):
/// влияние кисти спадает с квадратом расстояния, поэтому края русла плавные.
/// Рельеф при этом никогда не поднимается.
pub fn dig_trench(ground: &mut Grid<f32>, route: &[Point2i], radius: i32, level: f32) {
    assert!(radius >= 0, "brush radius must be non-negative");

    for &center in route {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let p = center + Point2i::new(dx, dy);
                if !ground.contains(p) {
                    continue;
                }
                let r = ((dx * dx + dy * dy) as f32).sqrt();
                if r > radius as f32 {
                    continue;
                }

                let bed = ground[p].min(level);
                let a = if r > 0.0 { 1.0 / (r * r) } else { 1.0 };
                ground[p] = bed * a + ground[p] * (1.0 - a);
            }
        }
    }
}

/// Ограниченная заливка от точки `origin`
///
/// Обходит в ширину 4-связную область, пока высота не превышает `max_level`,
/// а евклидово расстояние от `origin` не превышает `max_distance`; каждую
/// посещённую ячейку передаёт в `visit`. Ячейки не посещаются повторно.
pub fn flood_fill<F: FnMut(Point2i)>(
    ground: &Grid<f32>,
    origin: Point2i,
    max_distance: f32,
    max_level: f32,
    mut visit: F,
) {
    if !ground.contains(origin) || ground[origin] > max_level {
        return;
    }

    let mut visited = vec![false; ground.data.len()];
    let mut queue = VecDeque::new();

    visited[ground.index_of(origin)] = true;
    queue.push_back(origin);

    while let Some(p) = queue.pop_front() {
        visit(p);

        for &(dx, dy) in &DIRECTIONS {
            let n = p + Point2i::new(dx, dy);
            if !ground.contains(n) {
                continue;
            }
            let index = ground.index_of(n);
            if visited[index] || ground[n] > max_level || (n - origin).length() > max_distance {
                continue;
            }
            visited[index] = true;
            queue.push_back(n);
        }
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

    #[test]
    fn trench_at_existing_level_is_a_no_op() {
        let mut ground = flat_grid(11, 0.3);
        let route = vec![Point2i::new(5, 5), Point2i::new(6, 5)];
        dig_trench(&mut ground, &route, 3, 0.3);

        for &v in &ground.data {
            assert!((v - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn trench_never_raises_terrain() {
        let mut ground = flat_grid(11, -0.5);
        let before = ground.clone();
        // Целевой уровень выше текущего рельефа
        dig_trench(&mut ground, &[Point2i::new(5, 5)], 3, 0.2);

        for (after, original) in ground.data.iter().zip(&before.data) {
            assert!(after <= original);
        }
    }

    #[test]
    fn trench_influence_falls_off_with_distance() {
        let mut ground = flat_grid(11, 0.5);
        let center = Point2i::new(5, 5);
        dig_trench(&mut ground, &[center], 4, -0.5);

        // Центр опускается до целевого уровня, дальние ячейки — всё слабее
        assert!((ground[center] + 0.5).abs() < 1e-6);
        let near = ground[Point2i::new(6, 5)];
        let far = ground[Point2i::new(8, 5)];
        assert!(near < far);
        assert!(far < 0.5);
        // За радиусом кисти рельеф не тронут
        assert!((ground[Point2i::new(0, 5)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn trench_stays_inside_grid_bounds() {
        let mut ground = flat_grid(5, 0.5);
        // Кисть с центром в углу выходит за карту, но паниковать не должна
        dig_trench(&mut ground, &[Point2i::new(0, 0)], 4, -1.0);
        assert!(ground[Point2i::new(0, 0)] < 0.0);
    }

    #[test]
    fn flood_fill_respects_distance_bound() {
        let ground = flat_grid(11, -0.5);
        let origin = Point2i::new(5, 5);
        let mut filled = Vec::new();
        flood_fill(&ground, origin, 2.0, 0.0, |p| filled.push(p));

        assert!(!filled.is_empty());
        for p in filled {
            assert!((p - origin).length() <= 2.0);
        }
    }

    #[test]
    fn flood_fill_stops_at_high_ground() {
        let mut ground = flat_grid(11, -0.5);
        // Кольцо возвышенности вокруг центра
        for d in -2..=2 {
            ground[Point2i::new(5 + d, 3)] = 0.5;
            ground[Point2i::new(5 + d, 7)] = 0.5;
            ground[Point2i::new(3, 5 + d)] = 0.5;
            ground[Point2i::new(7, 5 + d)] = 0.5;
        }

        let mut filled = Vec::new();
        flood_fill(&ground, Point2i::new(5, 5), 10.0, 0.0, |p| filled.push(p));

        for p in &filled {
            assert!(p.x > 3 && p.x < 7 && p.y > 3 && p.y < 7, "escaped ring: {p:?}");
        }
    }

    #[test]
    fn flood_fill_visits_each_cell_once() {
        let ground = flat_grid(9, -0.5);
        let mut count = std::collections::HashMap::new();
        flood_fill(&ground, Point2i::new(4, 4), 3.5, 0.0, |p| {
            *count.entry((p.x, p.y)).or_insert(0) += 1;
        });
        assert!(count.values().all(|&c| c == 1));
    }

    #[test]
    fn flood_fill_from_high_origin_is_empty() {
        let ground = flat_grid(5, 0.5);
        let mut filled = Vec::new();
        flood_fill(&ground, Point2i::new(2, 2), 3.0, 0.0, |p| filled.push(p));
        assert!(filled.is_empty());
    }
}
