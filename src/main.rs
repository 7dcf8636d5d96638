use colored::Colorize;
use std::process;

use variant_snps::RunOutcome;
use variant_snps::config::InputConfig;

fn main() {
    println!(
        "{} {}",
        "variant-snps: aggregating MEGA array variants for the genes of interest\n Version:"
            .cyan()
            .bold(),
        env!("CARGO_PKG_VERSION").cyan().bold()
    );
    let config = InputConfig::build().unwrap_or_else(|err| {
        eprintln!(
            "Problem parsing arguments: {}",
            err.to_string().red().bold()
        );
        process::exit(1);
    });

    let log_level = if config.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    println!("Annotation File Directory: {}", config.annotation_file_dir.display());
    println!("Gene Targets File: {}", config.gene_target_file.display());
    println!("Output File: {}\n", config.output_filepath.display());

    match variant_snps::run(&config) {
        Ok(RunOutcome::Completed(summary)) => {
            println!(
                "✅ {} variants from {} annotation workbooks written to {}",
                summary.rows_written(),
                summary.files.len(),
                config.output_filepath.display()
            );
        }
        Ok(RunOutcome::NoAnnotationFiles) => {
            println!(
                "{}",
                "There were no annotation files found in the specified directory. Please ensure that there are excel annotation files. Ending program now..."
                    .yellow()
            );
        }
        Err(e) => {
            eprintln!("Application error: {}", e.to_string().red().bold());
            process::exit(1);
        }
    }
}
