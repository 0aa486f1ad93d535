use crate::{cli, clipboard, tui, utils};
use anyhow::{Context, Result, bail};
use repoclip::config::ScanConfig;
use repoclip::file_scanner;
use repoclip::tree_builder::build_tree_labels;
use repoclip::{ExportSelection, RawNode, SelectionSession, SelectionState};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const NO_FILES: &str = "(No files selected)";

// Builds the session either from a raw JSON tree or by scanning a directory.
// The scan root is returned only when file contents can be read from disk.
fn load_session(cli_args: &cli::Cli) -> Result<(SelectionSession, Option<PathBuf>)> {
    if let Some(tree_path) = &cli_args.tree {
        let text = fs::read_to_string(tree_path)
            .with_context(|| format!("Failed reading tree file: {}", tree_path.display()))?;
        let raw = RawNode::from_json(&text)?;
        let repo_name = raw.name.clone().unwrap_or_else(|| {
            tree_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "repository".to_string())
        });
        let session = SelectionSession::new(repo_name, &raw)
            .with_context(|| format!("Invalid tree in {}", tree_path.display()))?;
        return Ok((session, None));
    }

    let config = ScanConfig::load(cli_args.config.as_deref())?;
    let raw = file_scanner::scan_directory(&cli_args.root, &config, cli_args.include_ignored)?;
    let repo_name = raw.name.clone().unwrap_or_else(|| "repository".to_string());
    let session = SelectionSession::new(repo_name, &raw)?;
    Ok((session, Some(cli_args.root.clone())))
}

fn normalize_suffix(suffix: &str) -> String {
    if suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{}", suffix)
    }
}

// Directories (and "" for the root) go through the directory entry point,
// everything else through the file entry point.
fn toggle_path(session: &mut SelectionSession, path: &str, checked: bool) -> Result<()> {
    let path = path.trim_matches('/');
    let is_dir = session.tree().node(path).is_some_and(|n| n.is_dir());
    if is_dir {
        session.toggle_directory(path, checked)?;
    } else {
        session.toggle_file(path, checked)?;
    }
    Ok(())
}

fn apply_headless_edits(session: &mut SelectionSession, cli_args: &cli::Cli) -> Result<()> {
    if cli_args.none {
        session.toggle_select_all(false)?;
    }
    for suffix in &cli_args.exclude_ext {
        session.toggle_extension(&normalize_suffix(suffix), false)?;
    }
    for suffix in &cli_args.include_ext {
        session.toggle_extension(&normalize_suffix(suffix), true)?;
    }
    for path in &cli_args.exclude {
        toggle_path(session, path, false).with_context(|| format!("--exclude {}", path))?;
    }
    for path in &cli_args.include {
        toggle_path(session, path, true).with_context(|| format!("--include {}", path))?;
    }
    Ok(())
}

/// Tree of the selected files followed by their contents.
fn render_export(
    session: &SelectionSession,
    selection: &ExportSelection,
    scan_root: &Path,
) -> String {
    if selection.is_empty() {
        return format!("./\n\n{}\n", NO_FILES);
    }

    let mut parts: Vec<String> = build_tree_labels(session.tree().root(), |node| {
        session.displayed_state(&node.path) != Some(SelectionState::Unchecked)
    })
    .into_iter()
    .map(|line| line.label)
    .collect();
    parts.push(String::new());

    for rel in &selection.files {
        match fs::read_to_string(scan_root.join(rel)) {
            Ok(contents) => {
                parts.push(format!("---\nFile: {}\n---", rel));
                parts.push(String::new());
                parts.push(contents.trim_end().to_string());
                parts.push(String::new());
            }
            Err(e) => {
                warn!(file = %rel, error = %e, "could not read file");
                parts.push(format!("---\nFile: {} (Error reading file: {})\n---", rel, e));
                parts.push(String::new());
                parts.push("[Content not available]".to_string());
                parts.push(String::new());
            }
        }
    }

    let mut output = parts.join("\n").trim_end_matches('\n').to_string();
    output.push('\n');
    output
}

fn perform_final_action(output: &str, file_count: usize, is_dry_run: bool) -> Result<()> {
    if is_dry_run {
        print!("{}", output);
        if file_count == 0 {
            println!("(Dry run: No files would have been copied)");
        } else {
            println!(
                "(Dry run: Would copy {} files (≈ {} tokens). Clipboard not affected.)",
                file_count,
                utils::approx_tokens(output)
            );
        }
        return Ok(());
    }
    if file_count == 0 {
        bail!("No files were selected to copy");
    }
    clipboard::copy_text_to_clipboard(output.to_string())?;
    println!(
        "✅ Copied {} files (≈ {} tokens) to the clipboard.",
        file_count,
        utils::approx_tokens(output)
    );
    Ok(())
}

// Main orchestrator for the repoclip application logic.
pub fn run_repoclip(cli_args: cli::Cli) -> Result<()> {
    let (mut session, scan_root) = load_session(&cli_args)?;

    if cli_args.headless {
        apply_headless_edits(&mut session, &cli_args)?;
    } else {
        match tui::run_tui(session)? {
            Some(edited) => session = edited,
            None => {
                println!("Selection cancelled. Exiting.");
                return Ok(());
            }
        }
    }

    let selection = ExportSelection::from_session(&session);
    info!(
        files = selection.files.len(),
        dirs = selection.dirs.len(),
        exts = selection.exts.len(),
        "selection ready"
    );

    match scan_root {
        Some(root) if !cli_args.json => {
            let output = render_export(&session, &selection, &root);
            perform_final_action(&output, selection.files.len(), cli_args.dry_run)
        }
        _ => {
            debug!("printing selection JSON");
            println!("{}", selection.to_json_pretty()?);
            Ok(())
        }
    }
}
