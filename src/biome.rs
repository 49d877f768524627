use crate::math::LinearTransform;

/// Нижняя граница первого биома: высоты лежат в [-1, 1]
const FIRST_RANGE_START: f32 = -1.0;

/// Пороговый селектор одного биома
///
/// Высоты из `[start, end)` относятся к этому биому; внутри диапазона высота
/// нормализуется в [0, 1] для выбора вариации тайла или оттенка.
#[derive(Debug, Clone, Copy)]
pub struct BiomeSelector {
    pub end_value: f32,
    pub biome: i32,
    noise_to_value: LinearTransform,
}

impl BiomeSelector {
    #[must_use]
    pub fn new(start: f32, end: f32, biome: i32) -> Self {
        Self {
            end_value: end,
            biome,
            noise_to_value: LinearTransform::new(start, end, 0.0, 1.0),
        }
    }

    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        self.noise_to_value.apply(value)
    }
}

/// Упорядоченный список селекторов, разбивающий шкалу высот на полуинтервалы
///
/// Биомы добавляются в порядке неубывания верхней границы; классификация
/// выбирает первый селектор, чья граница превышает значение. Значение на
/// последней границе или выше не классифицируется — ячейка остаётся со
/// значением по умолчанию.
#[derive(Debug, Clone, Default)]
pub struct BiomeTable {
    selectors: Vec<BiomeSelector>,
    last_end_value: Option<f32>,
}

impl BiomeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет биом с верхней границей `end_value`
    ///
    /// Начало диапазона — граница предыдущего биома (у первого — `-1.0`).
    pub fn add(&mut self, biome: i32, end_value: f32) -> &mut Self {
        let start = self.last_end_value.unwrap_or(FIRST_RANGE_START);
        assert!(
            end_value >= start,
            "biome ranges must be added in non-decreasing order"
        );
        self.selectors.push(BiomeSelector::new(start, end_value, biome));
        self.last_end_value = Some(end_value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Классифицирует высоту: идентификатор биома и нормализованное значение
    /// внутри его диапазона
    #[must_use]
    pub fn classify(&self, value: f32) -> Option<(i32, f32)> {
        self.selectors
            .iter()
            .find(|s| value < s.end_value)
            .map(|s| (s.biome, s.normalize(value)))
    }
}
