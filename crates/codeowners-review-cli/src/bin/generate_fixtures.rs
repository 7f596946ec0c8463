//! Generate review fixtures for benchmarking and manual runs.
//!
//! Usage: cargo run --release --bin generate-fixtures --features generate -- [output_dir]
//!
//! Writes, per preset, a CODEOWNERS file, a changed files list and a review
//! snapshot that can be fed straight to `codeowners-review`.

use codeowners_review_core::generate::{
    GeneratorConfig, generate, generate_changed_files, generate_snapshot,
};
use std::{fs, io, path::Path, path::PathBuf, process::ExitCode};

/// Type alias for fixture preset entries.
type PresetEntry = (&'static str, fn() -> GeneratorConfig);

/// Fixture presets - keep in sync with benches/fixtures.rs
const PRESETS: &[PresetEntry] = &[
    ("small", GeneratorConfig::small),
    ("medium", GeneratorConfig::medium),
    ("large", GeneratorConfig::large),
    ("xlarge", GeneratorConfig::xlarge),
];

fn main() -> ExitCode {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("benches/cli/fixtures"));

    if let Err(e) = run(&output_dir) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    for (name, config_fn) in PRESETS {
        let config = config_fn();

        let codeowners = generate(&config);
        let codeowners_path = output_dir.join(format!("{name}.codeowners"));
        fs::write(&codeowners_path, &codeowners)?;

        let files = generate_changed_files(&config);
        let files_path = output_dir.join(format!("{name}.changed"));
        fs::write(&files_path, files.join("\n") + "\n")?;

        let snapshot = serde_json::to_string_pretty(&generate_snapshot(&config))
            .map_err(io::Error::other)?;
        let snapshot_path = output_dir.join(format!("{name}.snapshot.json"));
        fs::write(&snapshot_path, snapshot)?;

        println!(
            "Generated {} ({} bytes, {} rules, {} comments), {} ({} files), {}",
            codeowners_path.display(),
            codeowners.len(),
            config.num_rules,
            config.num_comments,
            files_path.display(),
            files.len(),
            snapshot_path.display()
        );
    }

    Ok(())
}
