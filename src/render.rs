use crate::grid::Grid;
use crate::math::{LinearTransform, Point2i};
use crate::terraform::NO_BIOME;
use image::{ImageBuffer, Luma, Rgba};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Палитра биомов для отладочного рендеринга; индекс — биом по модулю
const BIOME_PALETTE: [[u8; 3]; 8] = [
    [150, 120, 80],  // грунт
    [170, 160, 90],  // переходная зона
    [90, 160, 70],   // трава
    [40, 90, 200],   // вода
    [200, 190, 140], // песок
    [120, 120, 120], // камень
    [230, 230, 240], // снег
    [80, 100, 60],   // болото
];

const UNCLASSIFIED_COLOR: [u8; 3] = [20, 20, 20];

#[must_use]
pub fn biome_color(biome: i32) -> [u8; 3] {
    if biome < 0 {
        UNCLASSIFIED_COLOR
    } else {
        BIOME_PALETTE[(biome as usize) % BIOME_PALETTE.len()]
    }
}

/// Карта высот в градациях серого: [-1, 1] → [0, 255]
#[must_use]
pub fn height_to_grayscale(ground: &Grid<f32>) -> Vec<u8> {
    let to_gray = LinearTransform::new(-1.0, 1.0, 0.0, 255.0);
    ground
        .data
        .iter()
        .map(|&v| to_gray.apply(v).clamp(0.0, 255.0) as u8)
        .collect()
}

pub fn save_height_png(ground: &Grid<f32>, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_raw(
        ground.width as u32,
        ground.height as u32,
        height_to_grayscale(ground),
    )
    .ok_or("Failed to create image buffer")?;
    img.save(path)?;
    Ok(())
}

/// Интенсивность воды в градациях серого: [0, 1] → [0, 255]
pub fn save_water_png(water: &Grid<f32>, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u8> = water
        .data
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
        .collect();
    let img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(water.width as u32, water.height as u32, data)
            .ok_or("Failed to create image buffer")?;
    img.save(path)?;
    Ok(())
}

/// Цветная карта биомов; вода затемняет ячейку пропорционально интенсивности
#[must_use]
pub fn biomes_to_rgba(biomes: &Grid<i32>, water: &Grid<f32>) -> Vec<u8> {
    biomes
        .data
        .iter()
        .zip(&water.data)
        .flat_map(|(&biome, &w)| {
            let rgb = biome_color(biome);
            if w > 0.0 {
                // Чем глубже вода, тем темнее синий
                let shade = 0.4 + 0.6 * w.clamp(0.0, 1.0);
                [0, (90.0 * shade) as u8, (200.0 * shade) as u8, 255]
            } else {
                [rgb[0], rgb[1], rgb[2], 255]
            }
        })
        .collect()
}

pub fn save_biomes_png(
    biomes: &Grid<i32>,
    water: &Grid<f32>,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(
        biomes.width as u32,
        biomes.height as u32,
        biomes_to_rgba(biomes, water),
    )
    .ok_or("Failed to create image buffer")?;
    img.save(path)?;
    Ok(())
}

/// Увеличенное превью карты биомов: каждая ячейка — квадрат `tile_size` пикселей
#[must_use]
pub fn render_preview(
    biomes: &Grid<i32>,
    water: &Grid<f32>,
    tile_size: u32,
) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    assert!(tile_size >= 1, "tile size must be at least one pixel");

    let mut img = ImageBuffer::from_pixel(
        biomes.width as u32 * tile_size,
        biomes.height as u32 * tile_size,
        Rgba([0, 0, 0, 255]),
    );

    biomes.for_each(|p, &biome| {
        let w = water[p];
        let rgb = if w > 0.0 {
            let shade = 0.4 + 0.6 * w.clamp(0.0, 1.0);
            [0, (90.0 * shade) as u8, (200.0 * shade) as u8]
        } else {
            biome_color(biome)
        };
        draw_filled_rect_mut(
            &mut img,
            Rect::at(p.x * tile_size as i32, p.y * tile_size as i32)
                .of_size(tile_size, tile_size),
            Rgba([rgb[0], rgb[1], rgb[2], 255]),
        );
    });

    img
}

pub fn save_preview_png(
    biomes: &Grid<i32>,
    water: &Grid<f32>,
    tile_size: u32,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    render_preview(biomes, water, tile_size).save(path)?;
    Ok(())
}
