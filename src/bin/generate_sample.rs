//! Write a sample CSV for trying out the viewer.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]` (defaults: `sample_data.csv`, 500).

use anyhow::{Context, Result};

/// SplitMix64: enough randomness for demo data, reproducible from a seed.
struct Rng(u64);

impl Rng {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.uniform().max(f64::MIN_POSITIVE).ln()).sqrt();
        mean + std_dev * radius * (std::f64::consts::TAU * self.uniform()).cos()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }
}

const GROUPS: [(&str, f64); 3] = [("north", 168.0), ("south", 174.0), ("east", 179.0)];

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_data.csv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("row count '{n}' is not a number"))?,
        None => 500,
    };

    let mut rng = Rng(42);
    let mut writer =
        csv::Writer::from_path(&output).with_context(|| format!("creating {output}"))?;
    writer.write_record(["id", "group", "age", "height_cm", "weight_kg", "score", "note"])?;

    for id in 0..rows {
        let (group, mean_height) = GROUPS[id % GROUPS.len()];
        let age = 18 + (rng.uniform() * 60.0) as u32;
        let height = rng.normal(mean_height, 8.0);
        let weight = 0.9 * (height - 100.0) + rng.normal(0.0, 6.0);
        let score = 50.0 + 0.3 * age as f64 + rng.normal(0.0, 10.0);

        // Sprinkle missing cells so the summary and filters have something to show.
        let weight_cell = if rng.chance(0.05) {
            String::new()
        } else {
            format!("{weight:.1}")
        };
        let score_cell = if rng.chance(0.03) {
            "NA".to_string()
        } else {
            format!("{score:.2}")
        };
        let note = if rng.chance(0.1) {
            "a deliberately long free-text remark that will be truncated in the preview grid"
        } else {
            ""
        };

        writer.write_record([
            id.to_string(),
            group.to_string(),
            age.to_string(),
            format!("{height:.1}"),
            weight_cell,
            score_cell,
            note.to_string(),
        ])?;
    }
    writer.flush().context("flushing output")?;

    log::info!("Wrote {rows} rows to {output}");
    println!("Wrote {rows} rows to {output}");
    Ok(())
}
