use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/test_comments.jsonl".to_string());

    let mut writer = BufWriter::new(File::create(&output_file)?);

    println!("🔧 Generating test comments: {}\n", output_file);

    println!("Adding product mentions...");
    writeln!(writer, "{}", json!({"id": 1, "text": "Loving the new Photoshop v25.1! 🔥 http://a.co"}))?;
    writeln!(writer, "{}", json!({"id": 2, "text": "Lightroom CC keeps crashing on export 😡"}))?;
    writeln!(writer, "{}", json!({"id": 3, "text": "After Effects + Premiere Pro = my whole workflow"}))?;
    writeln!(writer, "{}", json!({"id": 4, "text": "photo-shop or PHOTOSHOP, same thing really"}))?;

    println!("Adding other languages...");
    writeln!(writer, "{}", json!({"id": 5, "text": "Me encanta la nueva versión de Illustrator"}))?;
    writeln!(writer, "{}", json!({"id": 6, "text": "Firefly est vraiment impressionnant pour les images"}))?;
    writeln!(writer, "{}", json!({"id": 7, "text": "Acrobat ist heute wieder sehr langsam geworden"}))?;

    println!("Adding short or empty comments...");
    writeln!(writer, "{}", json!({"id": 8, "text": "ok"}))?;
    writeln!(writer, "{}", json!({"id": 9, "text": "👍👍👍"}))?;
    writeln!(writer, "{}", json!({"id": 10, "text": null}))?;
    writeln!(writer, "{}", json!({"id": 11}))?;
    writeln!(writer, "{}", json!({"id": 12, "text": 12345}))?;

    writer.flush()?;

    println!("\n✓ Generated test dataset with 12 comments");
    println!("\nEnrich it with:");
    println!("  cargo run --example enrich_demo {}", output_file);
    println!("  commentprep enrich -i {} -o /tmp/enriched.csv", output_file);

    Ok(())
}
