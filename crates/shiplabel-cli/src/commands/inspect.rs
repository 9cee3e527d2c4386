//! Inspect command - dump the words and layout blocks of a label PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use shiplabel_core::{Carrier, LabelError, LabelProcessor, PdftotextTokenizer, WordIndex};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Label PDF file
    file: PathBuf,

    /// Print word coordinates (x0, top, x1, bottom) next to each word
    #[arg(short, long)]
    positions: bool,

    /// Print the detected shipper and every resolved layout block
    #[arg(short, long)]
    blocks: bool,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let processor = LabelProcessor::from_config(&config)?;

    let data = fs::read(&args.file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.file.display(), e))?;

    if !PdftotextTokenizer::from_config(&config.pdf).is_available() {
        anyhow::bail!(
            "Cannot run {}. Install poppler-utils or set pdf.pdftotext_path.",
            config.pdf.pdftotext_path.display()
        );
    }

    let index = processor.index(&data)?;

    let page = index.geometry();
    println!(
        "{} {} words, page {:.1} x {:.1}",
        style("ℹ").blue(),
        index.words().len(),
        page.width,
        page.height
    );

    for word in index.words() {
        if args.positions {
            println!(
                "{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                word.text, word.x0, word.top, word.x1, word.bottom
            );
        } else {
            println!("{}", word.text);
        }
    }

    if args.blocks {
        print_blocks(&processor, &index)?;
    }

    Ok(())
}

fn print_blocks(processor: &LabelProcessor, index: &WordIndex) -> anyhow::Result<()> {
    println!();

    let shipper = match processor.detector().detect(index) {
        Ok(shipper) => shipper,
        Err(LabelError::UnknownShipper) => {
            println!("{} No known shipper detected", style("⚠").yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("Shipper: {}", style(&shipper).bold());

    let Some(carrier) = processor.carriers().get(&shipper) else {
        println!("{} No layout rules for {}", style("⚠").yellow(), shipper);
        return Ok(());
    };

    let boxes = carrier.resolve_layout(index)?;
    let texts = index.extract_fields(&boxes);

    for (name, area) in &boxes {
        println!();
        println!(
            "{} x {:.2}-{:.2}% y {:.2}-{:.2}%",
            style(name).cyan().bold(),
            area.x1,
            area.x2,
            area.y1,
            area.y2
        );
        if let Some(text) = texts.get(name) {
            println!("{}", text);
        }
    }

    Ok(())
}
