use retmap_lib::{
    compute_retinotopy, describe_dataset, load_dataset, save_maps, MapsFile, RetinoConfig,
};
use std::error::Error;

use crate::cli::{ComputeArgs, InspectArgs};

pub fn run_compute(args: ComputeArgs) -> Result<(), Box<dyn Error>> {
    let config = RetinoConfig {
        sample_interval_s: args.sample_interval,
        trim_samples: args.trim,
        vertical_ceiling_s: args.vertical_ceiling,
        horizontal_ceiling_s: args.horizontal_ceiling,
        frequency_bin: args.frequency_bin,
        azimuth_min_shift: !args.no_azimuth_shift,
    };

    let dataset = load_dataset(&args.input, &config)?;
    let maps = compute_retinotopy(&dataset, &config)?;

    if args.print {
        for (name, map) in maps.iter_named() {
            let min = map.iter().copied().fold(f64::INFINITY, f64::min);
            let max = map.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = map.mean().unwrap_or(f64::NAN);
            println!(
                "{}: {}x{}, min {:.4}, max {:.4}, mean {:.4}",
                name,
                map.nrows(),
                map.ncols(),
                min,
                max,
                mean
            );
        }
    }

    if let Some(output) = args.output {
        let file = MapsFile {
            file_path: output,
            file_type: args.format,
        };
        save_maps(&file, &maps)?;
    }

    Ok(())
}

pub fn run_inspect(args: InspectArgs) -> Result<(), Box<dyn Error>> {
    for field in describe_dataset(&args.input)? {
        let dims: Vec<String> = field.dims.iter().map(|d| d.to_string()).collect();
        println!("{}  [{}]", field.name, dims.join(" x "));
    }
    Ok(())
}
