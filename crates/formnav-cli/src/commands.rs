use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use formnav_core::{Form, build_tree, load_blueprint, load_options};
use formnav_model::{Behavior, Direction, FormOptions, FormState, Kind};
use tracing::info;

use crate::types::{InspectResult, MoveRecord, NodeRow, WalkResult};

/// Inputs of the `walk` command, independent of clap.
#[derive(Debug, Clone, Default)]
pub struct WalkRequest {
    pub blueprint: PathBuf,
    pub config: Option<PathBuf>,
    pub behavior: Option<String>,
    pub moves: Vec<String>,
}

pub fn run_inspect(path: &Path) -> Result<InspectResult> {
    let blueprint =
        load_blueprint(path).with_context(|| format!("load blueprint {}", path.display()))?;
    let tree = build_tree(&blueprint).context("build form tree")?;

    let rows = Kind::ALL
        .into_iter()
        .flat_map(|kind| tree.controller(kind).iter())
        .map(|node| NodeRow {
            kind: node.kind,
            index: node.index,
            id: node.id.clone(),
            title: node.title.clone(),
            included: node.is_included,
            hierarchy: node.parent_hierarchy.to_string(),
        })
        .collect();
    Ok(InspectResult {
        form_id: tree.form_id().to_string(),
        title: blueprint.title,
        rows,
    })
}

/// Options from the config file, with the `--behavior` flag applied on top.
pub fn resolve_options(config: Option<&Path>, behavior: Option<&str>) -> Result<FormOptions> {
    let mut options = match config {
        Some(path) => {
            load_options(path).with_context(|| format!("load config {}", path.display()))?
        }
        None => FormOptions::default(),
    };
    if let Some(raw) = behavior {
        let behavior: Behavior = raw.parse().context("parse --behavior")?;
        options = options.with_behavior(behavior);
    }
    Ok(options)
}

pub fn parse_moves(raw: &[String]) -> Result<Vec<Direction>> {
    raw.iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| {
            value
                .parse::<Direction>()
                .with_context(|| format!("parse move '{value}'"))
        })
        .collect()
}

pub fn run_walk(request: &WalkRequest) -> Result<WalkResult> {
    let options = resolve_options(request.config.as_deref(), request.behavior.as_deref())?;
    let moves = parse_moves(&request.moves)?;
    let blueprint = load_blueprint(&request.blueprint)
        .with_context(|| format!("load blueprint {}", request.blueprint.display()))?;

    let behavior = options.behavior;
    let mut form = Form::new(options);
    form.init(&blueprint).context("initialise form")?;

    let mut records = Vec::with_capacity(moves.len());
    for (step, direction) in moves.into_iter().enumerate() {
        let change = form
            .handle_move(direction)
            .with_context(|| format!("apply move {} ({direction})", step + 1))?;
        let state = form.state();
        records.push(MoveRecord {
            step: step + 1,
            direction,
            level: change.map(|change| change.level),
            card: current_id(&state, Kind::Card),
            set: current_id(&state, Kind::Set),
            group: current_id(&state, Kind::Group),
            field: current_id(&state, Kind::Field),
        });
    }
    info!(
        moves = records.len(),
        moved = records.iter().filter(|r| r.moved()).count(),
        "walk finished"
    );

    Ok(WalkResult {
        form_id: form.tree().form_id().to_string(),
        behavior,
        moves: records,
        state: form.state(),
        entries: form.sink().entries().clone(),
    })
}

fn current_id(state: &FormState, kind: Kind) -> Option<String> {
    state.level(kind).current_id.clone()
}
