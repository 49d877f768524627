// src/config.rs
//! Конфигурация генерации рельефа
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Выбор алгоритма шума (diamond-square, фрактальный градиентный шум, доменное искажение)
//! - Настройки октавного шума
//! - Настройки реки (стоимость маршрута, глубина, ширина русла)
//! - Пороговые диапазоны биомов
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;

/// Алгоритм синтеза карты высот
///
/// Определяет, каким семейством шума заполняется базовый рельеф перед
/// классификацией биомов и прокладкой реки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NoiseAlgorithm {
    /// Смещение средней точки (diamond-square); требует карту размером 2^n+1
    DiamondSquare,
    /// Октавный градиентный шум (fBm) без искажения координат
    FractalGradient,
    /// Октавный шум с доменным искажением — органичные, не осевые формы
    #[default]
    DomainWarped,
}

/// Настройки октавного шума
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NoiseSettings {
    /// Число октав (слоёв шума), минимум 1
    #[serde(default = "default_num_octaves")]
    pub num_octaves: u32,

    /// Масштаб координат сэмплирования по X и Y
    #[serde(default = "default_xy_scale")]
    pub xy_scale: f32,

    /// Итоговый множитель значения шума
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f32,

    /// Затухание амплитуды между октавами:
    /// - `<1.0` → каждая следующая октава тише (гладкий рельеф),
    /// - `=1.0` → все октавы равноправны (изрезанный рельеф).
    ///
    /// Для diamond-square — коэффициент уменьшения случайного смещения на уровень.
    #[serde(default = "default_roughness")]
    pub roughness: f32,

    /// Множитель частоты между октавами (обычно 2)
    #[serde(default = "default_frequency_multiplier")]
    pub frequency_multiplier: f32,

    /// Амплитуда смещения координат при доменном искажении (в ячейках карты)
    #[serde(default = "default_warp_scale")]
    pub warp_scale: f32,

    /// Стартовая амплитуда случайного смещения для diamond-square
    #[serde(default = "default_initial_randomness")]
    pub initial_randomness: f32,
}

fn default_num_octaves() -> u32 {
    5
}
fn default_xy_scale() -> f32 {
    1.5
}
fn default_noise_scale() -> f32 {
    1.0
}
fn default_roughness() -> f32 {
    0.75
}
fn default_frequency_multiplier() -> f32 {
    2.0
}
fn default_warp_scale() -> f32 {
    20.0
}
fn default_initial_randomness() -> f32 {
    1.0
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            num_octaves: 5,
            xy_scale: 1.5,
            noise_scale: 1.0,
            roughness: 0.75,
            frequency_multiplier: 2.0,
            warp_scale: 20.0,
            initial_randomness: 1.0,
        }
    }
}

/// Настройки реки
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WaterSettings {
    /// Идентификатор водного биома; `-1` — река не генерируется
    #[serde(default = "default_water_biome")]
    pub biome: i32,

    /// Штраф за единицу подъёма при поиске маршрута (чем выше, тем
    /// настойчивее река обходит возвышенности)
    #[serde(default = "default_route_cost")]
    pub route_cost: f32,

    /// Максимальная ширина русла: радиус кисти и предел заливки, в ячейках
    #[serde(default = "default_river_max_size")]
    pub river_max_size: f32,

    /// Уровень воды над дном русла
    #[serde(default = "default_river_depth")]
    pub river_depth: f32,
}

fn default_water_biome() -> i32 {
    -1
}
fn default_route_cost() -> f32 {
    6.0
}
fn default_river_max_size() -> f32 {
    10.0
}
fn default_river_depth() -> f32 {
    0.25
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            biome: -1,
            route_cost: 6.0,
            river_max_size: 10.0,
            river_depth: 0.25,
        }
    }
}

/// Пороговый диапазон одного биома
///
/// Диапазоны перечисляются в порядке неубывания `end_value`; начало каждого
/// диапазона — конец предыдущего (первый начинается с `-1.0`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BiomeRange {
    /// Идентификатор биома
    pub biome: i32,

    /// Верхняя (исключающая) граница высоты диапазона
    pub end_value: f32,
}

/// Основные параметры генерации
///
/// Полная конфигурация одного запуска. Поддерживает загрузку из TOML- и JSON-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Ширина карты в ячейках (по умолчанию 129 = 2^7+1, подходит для diamond-square)
    #[serde(default = "default_map_size")]
    pub width: i32,

    /// Высота карты в ячейках
    #[serde(default = "default_map_size")]
    pub height: i32,

    /// Алгоритм синтеза рельефа (по умолчанию `DomainWarped`)
    #[serde(default)]
    pub algorithm: NoiseAlgorithm,

    /// Настройки шума
    #[serde(default)]
    pub noise: NoiseSettings,

    /// Настройки реки
    #[serde(default)]
    pub water: WaterSettings,

    /// Упорядоченный список биомов (по умолчанию: грунт, переходная зона, трава)
    #[serde(default = "default_biomes")]
    pub biomes: Vec<BiomeRange>,
}

fn default_map_size() -> i32 {
    129
}

fn default_biomes() -> Vec<BiomeRange> {
    vec![
        BiomeRange {
            biome: 0,
            end_value: -0.15,
        },
        BiomeRange {
            biome: 1,
            end_value: 0.15,
        },
        BiomeRange {
            biome: 2,
            end_value: 1.0,
        },
    ]
}

impl GeneratorParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }

    /// Загружает параметры из JSON-файла
    pub fn from_json_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&contents)?;
        Ok(params)
    }
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 129,
            height: 129,
            algorithm: NoiseAlgorithm::DomainWarped,
            noise: NoiseSettings::default(),
            water: WaterSettings::default(),
            biomes: default_biomes(),
        }
    }
}
