//! File-based image processing command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rasterflow_core::operators::Sink;
use rasterflow_core::{ImageFormat, ImageGraph, NodeId, OperatorKind};

use crate::chain::{ChainStep, parse_chain};
use crate::config::Config;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input image file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Operator chain (e.g., "brightness_contrast:brightness=20|blur:radius=3")
    #[arg(short, long, default_value = "")]
    chain: String,

    /// Output format; defaults to the output extension, then the config
    #[arg(short, long)]
    format: Option<ImageFormat>,

    /// Output quality 0-100; defaults to the config, then 95
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,
}

/// A linear graph `Source -> steps... -> Sink`.
struct Pipeline {
    graph: ImageGraph,
    source: NodeId,
    sink: NodeId,
}

impl Pipeline {
    fn build(steps: &[ChainStep]) -> anyhow::Result<Self> {
        let mut graph = ImageGraph::new();
        let source = graph.add_node(OperatorKind::Source);
        let mut prev = source;
        for step in steps {
            let node = graph
                .add_node_with(step.kind, &step.params)
                .with_context(|| format!("configuring {}", step.kind))?;
            graph.connect(prev, 0, node, 0)?;
            prev = node;
        }
        let sink = graph.add_node(OperatorKind::Sink);
        graph.connect(prev, 0, sink, 0)?;
        Ok(Self {
            graph,
            source,
            sink,
        })
    }

    /// Hands the export settings to the sink node.
    fn set_export(&mut self, format: ImageFormat, quality: u8) -> anyhow::Result<()> {
        self.graph
            .update(self.sink, |sink: &mut Sink| {
                sink.set_format(format);
                sink.set_quality(quality);
            })
            .context("sink node missing")
    }
}

/// Export format: flag, then output extension, then config, then PNG.
fn resolve_format(
    flag: Option<ImageFormat>,
    output: &std::path::Path,
    config: &Config,
) -> anyhow::Result<ImageFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    if let Ok(format) = rasterflow_io::format_from_path(output) {
        return Ok(format);
    }
    Ok(config.export_format()?.unwrap_or_default())
}

pub fn run(args: ProcessArgs, config: &Config) -> anyhow::Result<()> {
    let steps = parse_chain(&args.chain)?;
    let mut pipeline = Pipeline::build(&steps)?;

    // The sink carries the export settings handed to the encoder.
    let format = resolve_format(args.format, &args.output, config)?;
    let quality = args.quality.unwrap_or_else(|| config.export_quality());
    pipeline.set_export(format, quality)?;

    println!("Reading {}...", args.input.display());
    let image = rasterflow_io::load(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    println!("  {}x{}", image.width(), image.height());

    pipeline.graph.load_image(pipeline.source, image)?;

    println!("Processing with {} operator(s)...", steps.len());
    let result = pipeline.graph.evaluate(pipeline.sink)?;
    if let Some(report) = pipeline.graph.last_report() {
        tracing::info!(
            pass = report.pass,
            processed = report.processed.len(),
            "evaluation finished"
        );
    }

    let sink = pipeline
        .graph
        .operator::<Sink>(pipeline.sink)
        .context("sink node missing")?;
    let (format, quality) = (sink.format(), sink.quality());

    println!(
        "Writing {} ({format}, quality {quality})...",
        args.output.display()
    );
    rasterflow_io::save(&args.output, &result, format, quality)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}
