//! Command-line driver: load a drawing, replay pointer events against it and
//! report the resulting strokes.
//!
//! ```text
//! drawly <document.json> [events.json] [--tool <tool>] [--out <path>]
//! ```

use std::path::{Path, PathBuf};

use drawly_core::storage::{strokes_from_json, strokes_to_json};
use drawly_core::{Document, PointerEvent, Settings, StorageError, ToolKind, stroke_bounds};
use thiserror::Error;

#[derive(Debug, Error)]
enum AppError {
    #[error("usage: drawly <document.json> [events.json] [--tool <tool>] [--out <path>]")]
    Usage,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("Invalid JSON in {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("Invalid document {path}: {source}")]
    Document { path: PathBuf, source: StorageError },
}

#[derive(Debug, Default)]
struct Args {
    document: PathBuf,
    events: Option<PathBuf>,
    tool: Option<ToolKind>,
    out: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, AppError> {
    let mut parsed = Args::default();
    let mut positional = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tool" => {
                let name = args.next().ok_or(AppError::Usage)?;
                let tool = serde_json::from_value(serde_json::Value::String(name.clone()))
                    .map_err(|_| AppError::UnknownTool(name))?;
                parsed.tool = Some(tool);
            }
            "--out" => parsed.out = Some(args.next().ok_or(AppError::Usage)?.into()),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    parsed.document = positional.next().ok_or(AppError::Usage)?;
    parsed.events = positional.next();
    Ok(parsed)
}

fn read(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Read { path: path.to_path_buf(), source })
}

fn run(args: Args) -> Result<(), AppError> {
    let settings = Settings::default_path().map(|path| Settings::load_or_default(&path)).unwrap_or_default();

    let strokes = strokes_from_json(&read(&args.document)?)
        .map_err(|source| AppError::Document { path: args.document.clone(), source })?;
    let mut document = Document::new(settings);
    document.load_strokes(strokes);
    log::info!("Loaded {} strokes from {}", document.len(), args.document.display());

    if let Some(tool) = args.tool {
        document.set_tool(tool);
    }

    if let Some(path) = &args.events {
        let events: Vec<PointerEvent> =
            serde_json::from_str(&read(path)?).map_err(|source| AppError::Json { path: path.clone(), source })?;
        log::info!("Replaying {} pointer events with {:?}", events.len(), document.tool());
        for event in events {
            let response = document.handle_pointer(event);
            if let Some(entry) = response.text_entry {
                log::debug!("Text entry requested at {:?}", entry.world_anchor);
            }
        }
    }

    for (index, stroke) in document.strokes().iter().enumerate() {
        let b = stroke_bounds(stroke, document.text_measure());
        println!(
            "{index:>3} {:<6} {} x={:.1} y={:.1} w={:.1} h={:.1} rot={:.3}",
            format!("{:?}", stroke.kind()).to_lowercase(),
            stroke.color.to_hex(),
            b.x,
            b.y,
            b.w,
            b.h,
            stroke.rotation,
        );
    }

    if let Some(extents) = document.extents() {
        println!(
            "extents x={:.1} y={:.1} w={:.1} h={:.1}",
            extents.x, extents.y, extents.w, extents.h
        );
    }

    if let Some(out) = &args.out {
        let json =
            strokes_to_json(document.strokes()).map_err(|source| AppError::Document { path: out.clone(), source })?;
        std::fs::write(out, json).map_err(|source| AppError::Write { path: out.clone(), source })?;
        log::info!("Saved {} strokes to {}", document.len(), out.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting Drawly");

    if let Err(e) = parse_args(std::env::args().skip(1)).and_then(run) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(args(&["doc.json", "events.json", "--tool", "rectangle", "--out", "o.json"])).unwrap();
        assert_eq!(parsed.document, PathBuf::from("doc.json"));
        assert_eq!(parsed.events, Some(PathBuf::from("events.json")));
        assert_eq!(parsed.tool, Some(ToolKind::Rectangle));
        assert_eq!(parsed.out, Some(PathBuf::from("o.json")));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(parse_args(args(&[])), Err(AppError::Usage)));
        assert!(matches!(parse_args(args(&["doc.json", "--tool", "laser"])), Err(AppError::UnknownTool(_))));
        assert!(matches!(parse_args(args(&["doc.json", "--out"])), Err(AppError::Usage)));
    }
}
