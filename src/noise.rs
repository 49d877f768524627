use crate::grid::Grid;
use crate::math::Point2d;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Базовая частота сэмплирования: подобрана так, чтобы при шаге в одну
/// ячейку карта размером ~129 ячеек содержала несколько крупных форм рельефа
const BASE_FREQUENCY: f32 = 0.05;

/// Сдвиг сида для независимого шума доменного искажения
const WARP_SEED_OFFSET: u64 = 500;

/// Базовый градиентный шум (одна октава, значения в [-1, 1])
///
/// Каждый экземпляр сидируется явно — глобального состояния генератора нет,
/// поэтому параллельные генерации (в том числе в тестах) не влияют друг на друга.
pub struct GradientNoise {
    noise: FastNoiseLite,
}

impl GradientNoise {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(seed as i32));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(BASE_FREQUENCY));
        Self { noise }
    }

    #[must_use]
    pub fn sample(&self, p: Point2d) -> f32 {
        self.noise.get_noise_2d(p.x, p.y)
    }
}

/// Октавный (фрактальный) шум: сумма слоёв с растущей частотой и падающей амплитудой
///
/// Сумма делится на сумму использованных амплитуд, поэтому итоговое значение
/// остаётся в [-1, 1] при любом числе октав.
pub struct OctaveNoise {
    base: GradientNoise,
    num_octaves: u32,
    roughness: f32,
    frequency_multiplier: f32,
}

impl OctaveNoise {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            base: GradientNoise::new(seed),
            num_octaves: 2,
            roughness: 0.75,
            frequency_multiplier: 2.0,
        }
    }

    /// Число октав; ноль — ошибка программирования
    #[must_use]
    pub fn set_num_octaves(mut self, num_octaves: u32) -> Self {
        assert!(num_octaves >= 1, "octave noise requires at least one octave");
        self.num_octaves = num_octaves;
        self
    }

    #[must_use]
    pub fn set_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    #[must_use]
    pub fn set_frequency_multiplier(mut self, multiplier: f32) -> Self {
        self.frequency_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn sample(&self, p: Point2d) -> f32 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        let mut amplitude_sum = 0.0;

        for _ in 0..self.num_octaves {
            total += amplitude * self.base.sample(p.scaled(frequency));
            amplitude_sum += amplitude;
            amplitude *= self.roughness;
            frequency *= self.frequency_multiplier;
        }

        total / amplitude_sum
    }
}

/// Доменное искажение: координаты сэмплирования смещаются независимым шумом
///
/// Смещение `warp_scale * warp(x, y)` прибавляется к обеим координатам, после
/// чего сэмплируется октавный шум — формы рельефа теряют осевую выравненность.
pub struct DomainWarpedNoise {
    base: OctaveNoise,
    warp: GradientNoise,
    warp_scale: f32,
}

impl DomainWarpedNoise {
    #[must_use]
    pub fn new(seed: u64, base: OctaveNoise) -> Self {
        Self {
            base,
            warp: GradientNoise::new(seed.wrapping_add(WARP_SEED_OFFSET)),
            warp_scale: 20.0,
        }
    }

    #[must_use]
    pub fn set_warp_scale(mut self, warp_scale: f32) -> Self {
        self.warp_scale = warp_scale;
        self
    }

    #[must_use]
    pub fn sample(&self, p: Point2d) -> f32 {
        let offset = self.warp.sample(p) * self.warp_scale;
        self.base.sample(Point2d::new(p.x + offset, p.y + offset))
    }
}

/// Генератор смещения средней точки (diamond-square)
///
/// Работает прямо по сетке размером 2^n+1: углы сидируются случайными
/// значениями, затем чередуются «алмазный» и «квадратный» проходы, а амплитуда
/// случайного смещения уменьшается на каждом уровне рекурсии.
#[derive(Debug, Clone)]
pub struct DiamondSquare {
    seed: u64,
    roughness: f32,
    initial_randomness: f32,
}

impl DiamondSquare {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            roughness: 0.75,
            initial_randomness: 1.0,
        }
    }

    #[must_use]
    pub fn set_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    #[must_use]
    pub fn set_initial_randomness(mut self, initial_randomness: f32) -> Self {
        self.initial_randomness = initial_randomness;
        self
    }

    /// Заполняет сетку; размер карты обязан быть квадратом 2^n+1
    pub fn build(&self, grid: &mut Grid<f32>) {
        let size = grid.width as usize;
        assert_eq!(
            grid.width, grid.height,
            "diamond-square requires a square grid"
        );
        assert!(
            size >= 3 && (size - 1).is_power_of_two(),
            "diamond-square requires a grid sized 2^n+1, got {size}"
        );

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(self.seed);
        let mut scale = self.initial_randomness;

        let at = |data: &[f32], x: usize, y: usize| data[y * size + x];

        // Сидируем углы
        for &(x, y) in &[(0, 0), (size - 1, 0), (0, size - 1), (size - 1, size - 1)] {
            grid.data[y * size + x] = rng.gen_range(-scale..scale);
        }

        let mut step = size - 1;
        while step > 1 {
            let half = step / 2;

            // Алмазный проход: центры квадратов
            for y in (half..size).step_by(step) {
                for x in (half..size).step_by(step) {
                    let avg = (at(&grid.data, x - half, y - half)
                        + at(&grid.data, x + half, y - half)
                        + at(&grid.data, x - half, y + half)
                        + at(&grid.data, x + half, y + half))
                        / 4.0;
                    grid.data[y * size + x] = avg + rng.gen_range(-scale..scale);
                }
            }

            // Квадратный проход: середины рёбер; соседей на границе может не быть
            for y in (0..size).step_by(half) {
                let x0 = if (y / half) % 2 == 0 { half } else { 0 };
                for x in (x0..size).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0;
                    if x >= half {
                        sum += at(&grid.data, x - half, y);
                        count += 1;
                    }
                    if x + half < size {
                        sum += at(&grid.data, x + half, y);
                        count += 1;
                    }
                    if y >= half {
                        sum += at(&grid.data, x, y - half);
                        count += 1;
                    }
                    if y + half < size {
                        sum += at(&grid.data, x, y + half);
                        count += 1;
                    }
                    grid.data[y * size + x] = sum / count as f32 + rng.gen_range(-scale..scale);
                }
            }

            step = half;
            scale *= self.roughness;
        }
    }
}

/// Заполняет сетку высот значениями шума
///
/// Единственный компонент, который пишет шум в сетку: обходит все ячейки,
/// сэмплирует функцию в точке `(x * x_scale, y * y_scale)` и сохраняет
/// значение, умноженное на `noise_scale`.
pub struct NoiseTextureBuilder<'a, F> {
    grid: &'a mut Grid<f32>,
    noise: F,
    noise_scale: f32,
    x_scale: f32,
    y_scale: f32,
}

impl<'a, F: Fn(Point2d) -> f32 + Sync> NoiseTextureBuilder<'a, F> {
    pub fn new(grid: &'a mut Grid<f32>, noise: F) -> Self {
        Self {
            grid,
            noise,
            noise_scale: 1.0,
            x_scale: 1.0,
            y_scale: 1.0,
        }
    }

    #[must_use]
    pub fn set_noise_scale(mut self, noise_scale: f32) -> Self {
        self.noise_scale = noise_scale;
        self
    }

    #[must_use]
    pub fn set_x_scale(mut self, x_scale: f32) -> Self {
        self.x_scale = x_scale;
        self
    }

    #[must_use]
    pub fn set_y_scale(mut self, y_scale: f32) -> Self {
        self.y_scale = y_scale;
        self
    }

    pub fn build(self) {
        let width = self.grid.width;
        let noise = &self.noise;
        let (noise_scale, x_scale, y_scale) = (self.noise_scale, self.x_scale, self.y_scale);

        let sample = |i: usize| {
            let x = (i as i32 % width) as f32;
            let y = (i as i32 / width) as f32;
            noise_scale * noise(Point2d::new(x * x_scale, y * y_scale))
        };

        #[cfg(feature = "parallel")]
        let data: Vec<f32> = (0..self.grid.data.len()).into_par_iter().map(sample).collect();
        #[cfg(not(feature = "parallel"))]
        let data: Vec<f32> = (0..self.grid.data.len()).map(sample).collect();

        self.grid.data = data;
    }
}
