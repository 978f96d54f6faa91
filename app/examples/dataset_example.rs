// ==============================================================================
// dataset_example.rs - Example of Dataset Loading and Offline Scoring
// ==============================================================================
// Description: Loads a small association table and scores every row
// Author: Matthew Barham
// Created: 2025-11-20
// Modified: 2026-01-17
// Version: 1.0.0
// ==============================================================================

use snp_risk_predictor::parsers::{ColumnMap, DatasetLoader};
use snp_risk_predictor::{LinearModel, RiskLevel, RiskModel};
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Dataset Example ===\n");

    // Same headers as the published supplementary table
    let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    writeln!(
        temp_file,
        "Chromosome,Positionb,EAFc,Overall Breast Cancerd,ER-positivee,ER-negativef"
    )?;
    writeln!(temp_file, "10,123337335,0.39,1.26,1.32,1.08")?;
    writeln!(temp_file, "16,52599188,0.26,NA,1.16,1.04")?;
    writeln!(temp_file, "5,44706498,0.73,1.08,1.09,1.06")?;
    writeln!(temp_file, "2,217905832,0.51,0.93,0.92,0.97")?;
    temp_file.flush()?;

    let dataset = DatasetLoader::load(temp_file.path(), &ColumnMap::default())?;
    println!(
        "Loaded {} samples ({} dropped for missing values)\n",
        dataset.len(),
        dataset.dropped_rows()
    );

    let model = LinearModel::new("example", [0.0, 0.0, 0.05, 0.02, -0.03], -0.01);

    println!("{:<6} {:<16} {:>10}  {}", "Index", "Position", "Score", "Level");
    println!("{:-<44}", "");
    for (index, record) in dataset.records().iter().enumerate() {
        let score = model.predict(&record.features());
        println!(
            "{:<6} {:<16} {:>10.6}  {}",
            index,
            format!("chr{}:{}", record.chromosome, record.position),
            score,
            RiskLevel::from_score(score)
        );
    }

    Ok(())
}
