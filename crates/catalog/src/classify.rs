// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installer-kind and UI-kind classification. Both follow the
//! same weighted-signal-accumulation shape used for platform detection in
//! `pinokio-platform::signals`: several independent signals contribute a
//! weight to a candidate, and the highest total wins.

use pinokio_core::profile::{InstallerKind, UiKind};
use std::path::Path;

/// Classifies the installer kind from the set of file names present at the
/// root of an app's source tree. Filename signals are unambiguous enough
/// that the first match wins, checked in priority order.
pub fn classify_installer_kind(file_names: &[String]) -> InstallerKind {
    let has = |name: &str| file_names.iter().any(|f| f.eq_ignore_ascii_case(name));

    if has("install.json") {
        InstallerKind::Json
    } else if has("install.js") {
        InstallerKind::Js
    } else if has("requirements.txt") {
        InstallerKind::Requirements
    } else if has("environment.yml") || has("environment.yaml") {
        InstallerKind::Environment
    } else if has("install.sh") || has("install.py") || has("setup.sh") {
        InstallerKind::Script
    } else {
        InstallerKind::Unknown
    }
}

struct UiSignal {
    kind: UiKind,
    pattern: &'static str,
    weight: f32,
}

const UI_SIGNALS: &[UiSignal] = &[
    UiSignal { kind: UiKind::Gradio, pattern: "import gradio", weight: 0.6 },
    UiSignal { kind: UiKind::Gradio, pattern: "gr.Blocks", weight: 0.3 },
    UiSignal { kind: UiKind::Gradio, pattern: "gr.Interface", weight: 0.3 },
    UiSignal { kind: UiKind::Streamlit, pattern: "import streamlit", weight: 0.6 },
    UiSignal { kind: UiKind::Streamlit, pattern: "st.write", weight: 0.2 },
    UiSignal { kind: UiKind::Flask, pattern: "from flask import", weight: 0.6 },
    UiSignal { kind: UiKind::Flask, pattern: "Flask(__name__)", weight: 0.3 },
    UiSignal { kind: UiKind::Fastapi, pattern: "from fastapi import", weight: 0.6 },
    UiSignal { kind: UiKind::Fastapi, pattern: "FastAPI()", weight: 0.3 },
    UiSignal { kind: UiKind::Django, pattern: "django.setup", weight: 0.5 },
    UiSignal { kind: UiKind::Django, pattern: "DJANGO_SETTINGS_MODULE", weight: 0.4 },
    UiSignal { kind: UiKind::Tornado, pattern: "import tornado", weight: 0.6 },
    UiSignal { kind: UiKind::Dash, pattern: "import dash", weight: 0.6 },
    UiSignal { kind: UiKind::Dash, pattern: "dash.Dash", weight: 0.3 },
    UiSignal { kind: UiKind::Jupyter, pattern: ".ipynb", weight: 0.5 },
];

/// Classifies the UI kind by totalling weighted import/symbol signals found
/// across `sources` (one string per source file read). Ties are not
/// expected at these weights; the highest-scoring kind above `0.3` wins,
/// else `UiKind::Custom` if any file content was scanned, `UiKind::None` if
/// `sources` was empty.
pub fn classify_ui_kind(sources: &[String]) -> UiKind {
    use std::collections::HashMap;
    let mut totals: HashMap<&'static str, f32> = HashMap::new();

    for source in sources {
        for signal in UI_SIGNALS {
            if source.contains(signal.pattern) {
                *totals.entry(ui_kind_key(signal.kind)).or_insert(0.0) += signal.weight;
            }
        }
    }

    let winner = totals.iter().max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));
    match winner {
        Some((key, score)) if *score > 0.3 => ui_kind_from_key(key),
        _ if sources.is_empty() => UiKind::None,
        _ => UiKind::Custom,
    }
}

fn ui_kind_key(kind: UiKind) -> &'static str {
    match kind {
        UiKind::Gradio => "gradio",
        UiKind::Streamlit => "streamlit",
        UiKind::Flask => "flask",
        UiKind::Fastapi => "fastapi",
        UiKind::Django => "django",
        UiKind::Tornado => "tornado",
        UiKind::Dash => "dash",
        UiKind::Jupyter => "jupyter",
        UiKind::Custom => "custom",
        UiKind::None => "none",
    }
}

fn ui_kind_from_key(key: &str) -> UiKind {
    match key {
        "gradio" => UiKind::Gradio,
        "streamlit" => UiKind::Streamlit,
        "flask" => UiKind::Flask,
        "fastapi" => UiKind::Fastapi,
        "django" => UiKind::Django,
        "tornado" => UiKind::Tornado,
        "dash" => UiKind::Dash,
        "jupyter" => UiKind::Jupyter,
        _ => UiKind::Custom,
    }
}

/// Lists the base file names in `dir`'s top level.
pub fn file_names_at(dir: &Path, listing: &[std::path::PathBuf]) -> Vec<String> {
    listing
        .iter()
        .filter(|p| p.parent() == Some(dir))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect()
}

/// Conventional launch entry points, checked in priority order. Unlike
/// `classify_installer_kind`, this only needs a name match: the script
/// itself is executed, not parsed.
const ENTRY_POINT_CANDIDATES: &[&str] =
    &["start.py", "app.py", "server.py", "main.py", "run.py", "start.sh", "run.sh"];

/// Picks the conventional file this app is launched with, or `None` if the
/// source tree has none of the recognized names (the caller then has
/// nothing to run and surfaces that as an error).
pub fn classify_entry_point(file_names: &[String]) -> Option<String> {
    ENTRY_POINT_CANDIDATES
        .iter()
        .find(|candidate| file_names.iter().any(|f| f.eq_ignore_ascii_case(candidate)))
        .map(|s| s.to_string())
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
