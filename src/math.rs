use std::ops::{Add, AddAssign, Div, Sub};

/// Целочисленная координата на карте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

impl Point2i {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Евклидова длина вектора
    #[must_use]
    pub fn length(self) -> f32 {
        ((self.x * self.x + self.y * self.y) as f32).sqrt()
    }
}

impl Add for Point2i {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2i {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2i {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Div<i32> for Point2i {
    type Output = Self;

    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Вещественная координата (для сэмплирования шума)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2d {
    pub x: f32,
    pub y: f32,
}

impl Point2d {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point2d {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2d {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Линейное отображение отрезка [x0, x1] на отрезок [y0, y1]
///
/// Используется для нормализации высоты внутри биома, пересчёта высоты
/// в интенсивность воды и построения градаций серого при рендеринге.
#[derive(Debug, Clone, Copy)]
pub struct LinearTransform {
    x0: f32,
    y0: f32,
    scale: f32,
}

impl LinearTransform {
    #[must_use]
    pub fn new(x0: f32, x1: f32, y0: f32, y1: f32) -> Self {
        // Вырожденный отрезок отображаем в константу y0
        let scale = if (x1 - x0).abs() > f32::EPSILON {
            (y1 - y0) / (x1 - x0)
        } else {
            0.0
        };
        Self { x0, y0, scale }
    }

    #[must_use]
    pub fn apply(&self, x: f32) -> f32 {
        self.y0 + (x - self.x0) * self.scale
    }
}
