use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use formnav_cli::types::{InspectResult, MoveRecord, WalkResult};
use formnav_model::{Kind, LevelState};

pub fn print_inspect(result: &InspectResult) {
    println!("Form: {}", result.form_id);
    if let Some(title) = &result.title {
        println!("Title: {title}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Index"),
        header_cell("Id"),
        header_cell("Title"),
        header_cell("Included"),
        header_cell("Hierarchy"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for row in &result.rows {
        table.add_row(vec![
            kind_cell(row.kind),
            Cell::new(row.index),
            Cell::new(&row.id),
            text_cell(row.title.as_deref()),
            flag_cell(row.included),
            Cell::new(&row.hierarchy).fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
    let counts: Vec<String> = Kind::ALL
        .into_iter()
        .map(|kind| format!("{kind}: {}", result.count(kind)))
        .collect();
    println!("{}", counts.join(", "));
}

pub fn print_walk(result: &WalkResult) {
    println!("Form: {}", result.form_id);
    println!("Behavior: {}", result.behavior);
    if !result.moves.is_empty() {
        print_moves(&result.moves);
    }
    print_levels(result);
}

pub fn print_walk_json(result: &WalkResult) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(&result.entries)?);
    Ok(())
}

fn print_moves(moves: &[MoveRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Move"),
        header_cell("Level"),
        header_cell("Card"),
        header_cell("Set"),
        header_cell("Group"),
        header_cell("Field"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for record in moves {
        let level = match record.level {
            Some(kind) => kind_cell(kind),
            None => Cell::new("boundary").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(record.step),
            Cell::new(record.direction),
            level,
            text_cell(record.card.as_deref()),
            text_cell(record.set.as_deref()),
            text_cell(record.group.as_deref()),
            text_cell(record.field.as_deref()),
        ]);
    }
    println!("{table}");
}

fn print_levels(result: &WalkResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Level"),
        header_cell("Current"),
        header_cell("Prev"),
        header_cell("Next"),
        header_cell("Active"),
        header_cell("Included"),
        header_cell("Completed"),
        header_cell("Progress"),
        header_cell("Valid"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for column in 2..=7 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    align_column(&mut table, 8, CellAlignment::Center);
    for level in result.state.levels() {
        table.add_row(level_row(level));
    }
    println!("{table}");
}

fn level_row(level: &LevelState) -> Vec<Cell> {
    vec![
        kind_cell(level.kind),
        text_cell(level.current_id.as_deref()),
        index_cell(level.prev_index),
        index_cell(level.next_index),
        Cell::new(level.active_indices.len()),
        Cell::new(format!("{}/{}", level.total_included, level.total)),
        Cell::new(level.completed_ids.len()),
        Cell::new(format!("{:.0}%", level.progress)),
        flag_cell(level.is_valid()),
    ]
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn kind_cell(kind: Kind) -> Cell {
    let color = match kind {
        Kind::Card => Color::Blue,
        Kind::Set => Color::Magenta,
        Kind::Group => Color::Cyan,
        Kind::Field => Color::Green,
        Kind::Input => Color::DarkGrey,
    };
    Cell::new(kind).fg(color).add_attribute(Attribute::Bold)
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red)
    }
}

fn index_cell(index: Option<usize>) -> Cell {
    match index {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn text_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
