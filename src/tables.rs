use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};

use crate::api::powerfox::{Device, EnergyFigures, OperatingReport, Report};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_devices_table(devices: &[Device]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Device ID", "Name", "Division", "Main", "Prosumer", "Associated"]);
    for device in devices {
        table.add_row(vec![
            Cell::new(&device.id),
            Cell::new(&device.name),
            Cell::new(device.division),
            Cell::new(if device.main_device { "✓" } else { "" }),
            Cell::new(if device.prosumer { "✓" } else { "" }),
            Cell::new(device.account_associated_since.format("%Y-%m-%d"))
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_report_table(report: &Report) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Series", "Start", "Delta", "Measured"]);
    add_energy_figures_rows(&mut table, "Consumption", &report.consumption);
    add_energy_figures_rows(&mut table, "Feed-in", &report.feed_in);
    if let Some(generation) = &report.generation {
        add_energy_figures_rows(&mut table, "Generation", generation);
    }
    table
}

fn add_energy_figures_rows(table: &mut Table, series: &str, figures: &EnergyFigures) {
    for delta in &figures.report_values {
        table.add_row(vec![
            Cell::new(series),
            Cell::new(delta.start_time.format("%Y-%m-%d %H:%M")),
            Cell::new(delta.delta).set_alignment(CellAlignment::Right),
            Cell::new(if delta.complete { "✓" } else { "" }),
        ]);
    }
    table.add_row(vec![
        Cell::new(series).add_attribute(Attribute::Bold),
        Cell::new("Σ").add_attribute(Attribute::Bold),
        Cell::new(figures.sum).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
}

pub fn build_operating_table(report: &OperatingReport) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Time", "Power"]);
    for power in &report.values {
        table.add_row(vec![
            Cell::new(power.timestamp.format("%H:%M")),
            Cell::new(power.value).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("min / avg / max").add_attribute(Attribute::Dim),
        Cell::new(format!("{} / {} / {}", report.min, report.avg, report.max))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
    ]);
    table
}
