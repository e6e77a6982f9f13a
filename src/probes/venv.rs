//! Virtual environment detection.
//!
//! Methods are tried in strict priority order: environment markers, then
//! interpreter prefix comparison, then conventional directories in the
//! project. The first match wins. When a higher-priority method wins and the
//! directory scan finds a different environment, the disagreement is kept
//! on the fact.

use super::ProbeContext;
use crate::status::{VenvConflict, VenvFact, VenvKind};
use std::path::{Path, PathBuf};

/// Directory names checked in the project, in order.
pub const VENV_DIR_NAMES: &[&str] = &[".venv", "venv", "env", ".env", "virtualenv"];

/// Detect the project's virtual environment.
pub fn probe(ctx: &ProbeContext<'_>) -> VenvFact {
    let on_disk = from_project_dirs(ctx.project);

    let Some(mut fact) = from_env_markers(ctx).or_else(|| from_interpreter_prefix(ctx)) else {
        return match on_disk {
            Some((kind, path)) => {
                tracing::debug!("Found inactive {} environment at {}", kind, path.display());
                VenvFact {
                    kind,
                    active: false,
                    path: Some(path),
                    conflict: None,
                }
            }
            None => VenvFact::none(),
        };
    };

    if let Some((kind, path)) = on_disk {
        let same = fact.path.as_deref().is_some_and(|p| same_location(p, &path));
        if !same {
            tracing::debug!(
                "Active {} environment disagrees with {} at {}",
                fact.kind,
                kind,
                path.display()
            );
            fact.conflict = Some(VenvConflict { kind, path });
        }
    }
    fact
}

fn active(kind: VenvKind, path: Option<PathBuf>) -> VenvFact {
    VenvFact {
        kind,
        active: true,
        path,
        conflict: None,
    }
}

fn from_env_markers(ctx: &ProbeContext<'_>) -> Option<VenvFact> {
    let virtual_env = ctx.var("VIRTUAL_ENV").map(PathBuf::from);

    if ctx.var("CONDA_DEFAULT_ENV").is_some() || ctx.var("CONDA_PREFIX").is_some() {
        let path = ctx
            .var("CONDA_PREFIX")
            .or_else(|| ctx.var("CONDA_DEFAULT_ENV"))
            .map(PathBuf::from);
        return Some(active(VenvKind::Conda, path));
    }
    if ctx.var("POETRY_ACTIVE").as_deref() == Some("1") {
        return Some(active(VenvKind::Poetry, virtual_env));
    }
    if ctx.var("PIPENV_ACTIVE").as_deref() == Some("1") {
        return Some(active(VenvKind::Pipenv, virtual_env));
    }
    virtual_env.map(|path| active(VenvKind::Virtualenv, Some(path)))
}

fn from_interpreter_prefix(ctx: &ProbeContext<'_>) -> Option<VenvFact> {
    let info = ctx.interpreter().ok()?;
    if !info.in_virtual_env() {
        return None;
    }
    let kind = if info.prefix.join("conda-meta").is_dir() {
        VenvKind::Conda
    } else if ctx.project.join("Pipfile").is_file() {
        VenvKind::Pipenv
    } else {
        VenvKind::Virtualenv
    };
    Some(active(kind, Some(info.prefix.clone())))
}

fn from_project_dirs(project: &Path) -> Option<(VenvKind, PathBuf)> {
    VENV_DIR_NAMES.iter().find_map(|name| {
        let dir = project.join(name);
        if dir.join("pyvenv.cfg").is_file() {
            Some((VenvKind::Virtualenv, dir))
        } else if dir.join("conda-meta").is_dir() {
            Some((VenvKind::Conda, dir))
        } else {
            None
        }
    })
}

/// Whether the project already holds an environment at `dir`.
pub fn has_environment_marker(dir: &Path) -> bool {
    dir.join("pyvenv.cfg").is_file() || dir.join("conda-meta").is_dir()
}

fn same_location(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
