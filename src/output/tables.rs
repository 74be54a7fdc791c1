use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::report::RepositoryStatus;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn color_coded_state_cell(state: &str) -> Cell {
    let cell = Cell::new(state);
    match state {
        "CLEAN" => cell.fg(TableColor::Green),
        "STABLE" => cell.fg(TableColor::Yellow),
        "PENDING RELEASE" => cell.fg(TableColor::Cyan),
        "UNALIGNED" => cell.fg(TableColor::Red),
        "UNSTABLE" => cell.fg(TableColor::Grey),
        _ => cell,
    }
}

/// One row per reported repository: state, divergence and open merge requests.
pub fn overview_table(repositories: &[RepositoryStatus]) -> Table {
    let mut table = create_table();
    table.set_header(
        ["Repository", "State", "Diverged", "Open MRs"]
            .into_iter()
            .map(|label| Cell::new(label).fg(TableColor::Cyan)),
    );

    for repository in repositories {
        table.add_row(vec![
            Cell::new(&repository.name),
            color_coded_state_cell(repository.state_label()),
            Cell::new(if repository.divergence.is_some() { "yes" } else { "no" }),
            Cell::new(repository.merge_requests.len()),
        ]);
    }

    table
}
