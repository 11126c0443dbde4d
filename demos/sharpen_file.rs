use std::env;
use std::path::Path;

use imageops_sharpen::{process_batch, EdgeLevel, ImageResource, Mode, Overrides};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!(
            "Usage: {} <fast|quality|pro> <strength 0-100> <input_image>...",
            args[0]
        );
        eprintln!("Example: {} quality 60 photo.jpg scan.png", args[0]);
        std::process::exit(1);
    }

    let mode: Mode = args[1].parse()?;
    let strength: u8 = args[2].parse().map_err(|_| "Invalid strength")?;
    let edge_level = env::var("SHARPEN_EDGE_LEVEL")
        .ok()
        .and_then(|level| level.parse().ok())
        .and_then(EdgeLevel::from_index);

    let mut overrides = Overrides::default().strength_percent(strength);
    overrides.edge_level = edge_level;

    let resources = args[3..]
        .iter()
        .map(|path| {
            let name = Path::new(path)
                .file_name()
                .map_or_else(|| path.clone(), |name| name.to_string_lossy().into_owned());
            std::fs::read(path).map(|bytes| ImageResource::new(name, bytes))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for item in process_batch(&resources, overrides, mode) {
        match item.outcome {
            Ok(result) => {
                let output = result.download_name();
                std::fs::write(&output, result.encode_after_png()?)?;
                println!(
                    "{} -> {} ({}x{}, scale {:.3})",
                    item.name, output, result.width, result.height, result.scale
                );
            }
            Err(err) => eprintln!("{}: {}", item.name, err),
        }
    }

    Ok(())
}
