use comfy_table::{presets::NOTHING, *};
use macrodash::entities::{Entity, PeerGroup};
use macrodash::panel::PanelReport;
use macrodash::summary::{SummaryStatistics, YearValue};

const MISSING: &str = "–";

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_style(comfy_table::TableComponent::BottomBorder, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, '─')
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::BottomBorderIntersections, '─')
        .set_style(comfy_table::TableComponent::TopBorder, '─')
        .set_style(comfy_table::TableComponent::TopBorderIntersections, '─');
    table
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}%"))
}

fn at_year(point: &YearValue) -> String {
    format!("{:.2}% ({})", point.value, point.year)
}

pub fn entities_table(entities: &[Entity], peer_group: &PeerGroup) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("Code").add_attribute(Attribute::Bold),
        Cell::new("Country").add_attribute(Attribute::Bold),
        Cell::new(format!("In {} average", peer_group.name)).add_attribute(Attribute::Bold),
    ]);
    for entity in entities {
        table.add_row(vec![
            entity.code.as_str(),
            entity.name.as_str(),
            if peer_group.contains(&entity.code) {
                "yes"
            } else {
                "no"
            },
        ]);
    }
    table
}

pub fn display_entities(entities: &[Entity], peer_group: &PeerGroup) {
    println!("\n{}", entities_table(entities, peer_group));
}

/// The chart as a table: one row per year with the entity and group values side by side.
pub fn series_table(report: &PanelReport) -> Table {
    let mut table = styled_table();
    let mut header = vec![
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new(&report.entity.name).add_attribute(Attribute::Bold),
    ];
    if let Some(group) = &report.group {
        header.push(Cell::new(format!("{} average", group.name)).add_attribute(Attribute::Bold));
    }
    table.set_header(header);
    for row in report.chart_rows() {
        let mut cells = vec![Cell::new(row.year), Cell::new(percent(row.entity))];
        if report.group.is_some() {
            cells.push(Cell::new(percent(row.group)));
        }
        table.add_row(cells);
    }
    for column in table.column_iter_mut().skip(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

pub fn summary_table(summary: &SummaryStatistics) -> Table {
    let mut table = styled_table();
    let rows = [
        ("Latest", at_year(&summary.latest)),
        ("Earliest", at_year(&summary.earliest)),
        (
            "Change",
            format!(
                "{:+.2} pp ({})",
                summary.change_abs,
                summary
                    .change_pct
                    .map_or_else(|| MISSING.to_string(), |pct| format!("{pct:+.1}%"))
            ),
        ),
        ("Mean", percent(Some(summary.mean))),
        ("Median", percent(Some(summary.median))),
        (
            "Std. deviation",
            summary
                .std_dev
                .map_or_else(|| MISSING.to_string(), |sd| format!("{sd:.2} pp")),
        ),
        ("Minimum", at_year(&summary.min)),
        ("Maximum", at_year(&summary.max)),
        ("Observations", summary.count.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

pub fn display_report(report: &PanelReport) {
    println!(
        "\nUnemployment rate (% of labour force), {}, {}",
        report.entity.name, report.years
    );
    if report.has_data() {
        println!("\n{}", series_table(report));
    }
    if let Some(summary) = &report.summary {
        println!("\n{}", summary_table(summary));
    }
    if let Some(result) = report.comparison.as_ref().and_then(|c| c.result()) {
        println!("\n{result}");
    }
    for notice in &report.notices {
        println!("\n{notice}");
    }
}
