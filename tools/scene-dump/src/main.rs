//! Shape-record dump tool for the QuillKit vector engine.
//!
//! Converts a vector-markup file and prints the resulting shape records,
//! or hit-tests a point against them.
//!
//! ## Usage
//!
//! ```bash
//! # Dump the record tree, one sink per markup node
//! scene-dump drawing.svg --unpack
//!
//! # Hit-test a point, reporting every matching record
//! scene-dump drawing.svg --pick 12.5,40 --all
//! ```

use clap::Parser;
use quillkit_geom::Point;
use quillkit_scene::{Conversion, ConvertOptions, Converter, RecordSink, ShapeRecord};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scene-dump")]
#[command(about = "Convert a vector-markup file and dump the shape records")]
struct Cli {
    /// Markup file to convert.
    file: PathBuf,

    /// Produce one named sink per markup node (mirrored tree).
    #[arg(long)]
    unpack: bool,

    /// Default fill color (name, #rgb or #rrggbb).
    #[arg(long, default_value = "black")]
    fill_color: String,

    /// Default stroke color.
    #[arg(long, default_value = "black")]
    line_color: String,

    /// Default stroke width when a stroke is set without a width.
    #[arg(long, default_value = "1")]
    line_width: f32,

    /// Hit-test a point given as "x,y" instead of dumping the tree.
    #[arg(long)]
    pick: Option<String>,

    /// Report all matching records instead of only the first.
    #[arg(long)]
    all: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&cli.file)?;

    let options = ConvertOptions {
        fill_color: parse_color(&cli.fill_color)?,
        line_color: parse_color(&cli.line_color)?,
        line_width: cli.line_width,
        unpack_tree: cli.unpack,
        ..Default::default()
    };
    let conversion = Converter::new(options).convert_text(&text)?;

    match &cli.pick {
        Some(spec) => pick(&conversion, spec, cli.all)?,
        None => dump_sink(&conversion.root, 0),
    }

    for diagnostic in &conversion.diagnostics {
        println!("diagnostic: {diagnostic}");
    }
    Ok(())
}

fn parse_color(s: &str) -> Result<quillkit_color::Color, String> {
    quillkit_color::resolve(s).ok_or_else(|| format!("unrecognized color {s:?}"))
}

fn pick(conversion: &Conversion, spec: &str, all: bool) -> Result<(), String> {
    let (x, y) = spec
        .split_once(',')
        .and_then(|(x, y)| Some((x.trim().parse().ok()?, y.trim().parse().ok()?)))
        .ok_or_else(|| format!("expected --pick as \"x,y\", got {spec:?}"))?;

    let hits = conversion.pick_graphics_data(Point::new(x, y), all);
    println!("{} hit(s) at ({x}, {y})", hits.len());
    for record in hits {
        print_record(record, 1);
    }
    Ok(())
}

fn dump_sink(sink: &RecordSink, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = sink.name.as_deref().unwrap_or("(root)");
    let tag = sink.tag.as_deref().unwrap_or("-");
    println!(
        "{indent}sink {name} <{tag}> : {} record(s)",
        sink.records().len()
    );
    for record in sink.records() {
        print_record(record, depth + 1);
    }
    for child in sink.children() {
        dump_sink(child, depth + 1);
    }
}

fn print_record(record: &ShapeRecord, depth: usize) {
    let indent = "  ".repeat(depth);
    let stroke = match &record.stroke {
        Some(s) => format!("stroke #{:06x}/{} w{}", s.color.packed_rgb(), s.alpha, s.width),
        None => "no stroke".to_string(),
    };
    println!(
        "{indent}shape: fill #{:06x}/{} {stroke} contours={} holes={}{}",
        record.fill.color.packed_rgb(),
        record.fill.alpha,
        record.contours.len(),
        record.holes.len(),
        if record.transform.is_some() {
            " transformed"
        } else {
            ""
        },
    );
}
