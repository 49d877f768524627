use crate::biome::BiomeTable;
use crate::carve::{dig_trench, flood_fill};
use crate::config::{GeneratorParams, NoiseAlgorithm, NoiseSettings, WaterSettings};
use crate::grid::Grid;
use crate::math::{LinearTransform, Point2i};
use crate::noise::{DiamondSquare, DomainWarpedNoise, NoiseTextureBuilder, OctaveNoise};
use crate::rivers::RiverRouter;

/// Идентификатор «нет биома» в карте биомов
pub const NO_BIOME: i32 = -1;

/// Отображение (биом, нормализованная высота) → идентификатор тайла
///
/// Замена виртуального поставщика тайлов: рендерер передаёт замыкание, ядро
/// ничего не знает о тайлсетах. По умолчанию тайл совпадает с биомом.
pub type TileMapper = Box<dyn Fn(i32, f32) -> i32>;

/// Пересчёт высоты дна в интенсивность воды (высоты в [-1, 0.75] → [0.35, 1])
const WATER_INTENSITY_RANGE: (f32, f32, f32, f32) = (-1.0, 0.75, 0.35, 1.0);

/// Оркестратор генерации: шум → биомы → река
///
/// Владеет всеми сетками; они выделяются один раз в конструкторе и
/// перезаписываются при каждом вызове [`generate`] — без переаллокаций.
/// Наружу отдаются только неизменяемые ссылки.
///
/// [`generate`]: Terraformer::generate
pub struct Terraformer {
    ground: Grid<f32>,
    water: Grid<f32>,
    biomes: Grid<i32>,
    tiles: Grid<i32>,
    biome_table: BiomeTable,
    seed: u64,
    algorithm: NoiseAlgorithm,
    noise_settings: NoiseSettings,
    water_settings: WaterSettings,
    tile_mapper: TileMapper,
}

impl Terraformer {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            ground: Grid::new(width, height),
            water: Grid::new(width, height),
            biomes: Grid::new(width, height),
            tiles: Grid::new(width, height),
            biome_table: BiomeTable::new(),
            seed: 0,
            algorithm: NoiseAlgorithm::default(),
            noise_settings: NoiseSettings::default(),
            water_settings: WaterSettings::default(),
            tile_mapper: Box::new(|biome, _| biome),
        }
    }

    /// Собирает генератор из загруженной конфигурации
    #[must_use]
    pub fn from_params(params: &GeneratorParams) -> Self {
        let mut terraformer = Self::new(params.width, params.height);
        terraformer
            .set_seed(params.seed)
            .set_algorithm(params.algorithm)
            .set_noise_settings(params.noise)
            .set_water_settings(params.water);
        for range in &params.biomes {
            terraformer.add_biome(range.biome, range.end_value);
        }
        terraformer
    }

    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    pub fn set_algorithm(&mut self, algorithm: NoiseAlgorithm) -> &mut Self {
        self.algorithm = algorithm;
        self
    }

    pub fn set_noise_settings(&mut self, settings: NoiseSettings) -> &mut Self {
        self.noise_settings = settings;
        self
    }

    pub fn set_water_settings(&mut self, settings: WaterSettings) -> &mut Self {
        self.water_settings = settings;
        self
    }

    /// Добавляет биом; вызовы определяют диапазоны в порядке неубывания границ
    pub fn add_biome(&mut self, biome: i32, end_value: f32) -> &mut Self {
        self.biome_table.add(biome, end_value);
        self
    }

    pub fn set_tile_mapper<F: Fn(i32, f32) -> i32 + 'static>(&mut self, mapper: F) -> &mut Self {
        self.tile_mapper = Box::new(mapper);
        self
    }

    /// Итоговая карта высот (после рытья русла)
    #[must_use]
    pub fn ground(&self) -> &Grid<f32> {
        &self.ground
    }

    /// Интенсивность воды по ячейкам; 0 — суша
    #[must_use]
    pub fn water(&self) -> &Grid<f32> {
        &self.water
    }

    /// Карта биомов; [`NO_BIOME`] — неклассифицированная ячейка
    #[must_use]
    pub fn biomes(&self) -> &Grid<i32> {
        &self.biomes
    }

    /// Карта тайлов для прямой отрисовки
    #[must_use]
    pub fn tiles(&self) -> &Grid<i32> {
        &self.tiles
    }

    /// Выполняет полный конвейер генерации синхронно
    ///
    /// Один и тот же сид с одними и теми же настройками даёт побитово
    /// идентичные сетки при каждом вызове.
    pub fn generate(&mut self) {
        log::info!(
            "generating {}x{} map, algorithm {:?}, seed {}",
            self.ground.width,
            self.ground.height,
            self.algorithm,
            self.seed
        );

        self.ground.fill(0.0);
        self.water.fill(0.0);
        self.biomes.fill(NO_BIOME);
        self.tiles.fill(0);

        self.synthesize_ground();
        self.paint_tiles();

        if self.water_settings.biome >= 0 {
            self.make_river();
        }
    }

    fn synthesize_ground(&mut self) {
        let ns = self.noise_settings;
        match self.algorithm {
            NoiseAlgorithm::DiamondSquare => {
                DiamondSquare::new(self.seed)
                    .set_roughness(ns.roughness)
                    .set_initial_randomness(ns.initial_randomness)
                    .build(&mut self.ground);
            }
            NoiseAlgorithm::FractalGradient => {
                let octaves = OctaveNoise::new(self.seed)
                    .set_num_octaves(ns.num_octaves)
                    .set_roughness(ns.roughness)
                    .set_frequency_multiplier(ns.frequency_multiplier);
                NoiseTextureBuilder::new(&mut self.ground, |p| octaves.sample(p))
                    .set_noise_scale(ns.noise_scale)
                    .set_x_scale(ns.xy_scale)
                    .set_y_scale(ns.xy_scale)
                    .build();
            }
            NoiseAlgorithm::DomainWarped => {
                let octaves = OctaveNoise::new(self.seed)
                    .set_num_octaves(ns.num_octaves)
                    .set_roughness(ns.roughness)
                    .set_frequency_multiplier(ns.frequency_multiplier);
                let warped =
                    DomainWarpedNoise::new(self.seed, octaves).set_warp_scale(ns.warp_scale);
                NoiseTextureBuilder::new(&mut self.ground, |p| warped.sample(p))
                    .set_noise_scale(ns.noise_scale)
                    .set_x_scale(ns.xy_scale)
                    .set_y_scale(ns.xy_scale)
                    .build();
            }
        }
    }

    fn paint_tiles(&mut self) {
        let ground = &self.ground;
        let biomes = &mut self.biomes;
        let tiles = &mut self.tiles;
        let table = &self.biome_table;
        let mapper = &self.tile_mapper;

        ground.for_each(|p, &v| {
            // Высота на последней границе и выше не классифицируется:
            // ячейка остаётся тайлом по умолчанию
            if let Some((biome, value)) = table.classify(v) {
                biomes[p] = biome;
                tiles[p] = mapper(biome, value);
            }
        });
    }

    fn make_river(&mut self) {
        assert!(
            self.water_settings.river_depth >= 0.0,
            "river depth must be non-negative"
        );

        let min_distance = self.ground.width as f32 / 2.0;
        let route =
            RiverRouter::new(&self.ground, self.water_settings).find_river_route(min_distance);
        if route.is_empty() {
            // Карта без реки — корректный результат
            return;
        }

        let first = route[0];
        let last = route[route.len() - 1];
        let bed_level = (self.ground[first] + self.ground[last]) / 2.0;
        let water_level = bed_level + self.water_settings.river_depth;

        self.make_river_along(
            &route,
            self.water_settings.river_max_size,
            bed_level,
            water_level,
        );
    }

    /// Прокапывает русло и заполняет его водой вдоль маршрута
    ///
    /// Порядок важен: заливка читает уже прокопанный рельеф.
    fn make_river_along(
        &mut self,
        route: &[Point2i],
        max_distance: f32,
        bed_level: f32,
        water_level: f32,
    ) {
        self.water.fill(0.0);
        dig_trench(
            &mut self.ground,
            route,
            (max_distance / 2.0).round() as i32,
            bed_level,
        );

        let (x0, x1, y0, y1) = WATER_INTENSITY_RANGE;
        let ground_to_water = LinearTransform::new(x0, x1, y0, y1);
        let bed_to_surface = LinearTransform::new(bed_level, water_level, 0.0, 1.0);
        let water_biome = self.water_settings.biome;

        let ground = &self.ground;
        let water = &mut self.water;
        let biomes = &mut self.biomes;
        let tiles = &mut self.tiles;
        let mapper = &self.tile_mapper;

        for &origin in route {
            flood_fill(ground, origin, max_distance, water_level, |p| {
                water[p] = ground_to_water.apply(ground[p]).clamp(0.0, 1.0);
                let surface = ground[p].clamp(bed_level, water_level);
                biomes[p] = water_biome;
                tiles[p] = mapper(water_biome, bed_to_surface.apply(surface));
            });
        }
    }
}
