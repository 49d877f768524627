use clap::Parser;
use std::path::PathBuf;
use terragen::render;
use terragen::{GeneratorParams, Terraformer};

/// Генератор рельефа с биомами и рекой
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: PathBuf,

    /// Каталог для сохранения PNG-файлов (по умолчанию: текущий)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Размер тайла превью в пикселях
    #[arg(short, long, default_value_t = 4)]
    tile_size: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    println!("Загрузка конфигурации...");
    let params = GeneratorParams::from_toml_file(cli.config.to_str().ok_or("bad config path")?)?;

    println!(
        "Генерация карты (размер: {}×{}, сид: {})...",
        params.width, params.height, params.seed
    );
    let mut terraformer = Terraformer::from_params(&params);
    terraformer.generate();

    let out = |name: &str| cli.output.join(name).to_string_lossy().into_owned();

    println!("Сохранение в {:?}", cli.output);
    render::save_height_png(terraformer.ground(), &out("height.png"))?;
    render::save_water_png(terraformer.water(), &out("water.png"))?;
    render::save_biomes_png(terraformer.biomes(), terraformer.water(), &out("biomes.png"))?;
    render::save_preview_png(
        terraformer.biomes(),
        terraformer.water(),
        cli.tile_size,
        &out("preview.png"),
    )?;

    println!("\nГотово! Карты сохранены.");
    Ok(())
}
