use commentprep_core::PipelineBuilder;
use commentprep_formats::{read_dataset, write_dataset};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("💬 commentprep enrichment demo\n");

    let input_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/test_comments.jsonl".to_string());
    let output_file = std::env::args()
        .nth(2)
        .unwrap_or_else(|| format!("{}.enriched.jsonl", input_file));

    println!("Input: {}", input_file);
    println!("Output: {}\n", output_file);

    let pipeline = PipelineBuilder::new()
        .text_field("text")
        .target_language("en")
        .build()?;

    println!("📖 Reading records...");
    let records = read_dataset(&input_file)?;
    println!("✓ Read {} records\n", records.len());

    println!("🔨 Enriching...");
    let enriched = pipeline.enrich(&records)?;

    for record in &enriched {
        println!(
            "{:<45} | {:<8} | {}",
            record.data["masked_text"].as_str().unwrap_or(""),
            record.data["language"].as_str().unwrap_or(""),
            record.data["mentioned_products"]
        );
    }

    println!("\n💾 Writing enriched records...");
    let written = write_dataset(&output_file, &enriched)?;
    println!("✓ Wrote {} records to {}", written, output_file);

    let stats = pipeline.stats();
    println!("\n📊 Summary:");
    println!("  Total records: {}", stats.total_records);
    println!("  Target language: {:.1}%", stats.target_language_rate());
    println!("  With products: {:.1}%", stats.product_rate());
    for (product, count) in &stats.product_mentions {
        println!("    {}: {}", product, count);
    }

    Ok(())
}
