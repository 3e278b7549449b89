//! Command-line interface for the EHR resource dashboard.
//!
//! Applies the same table controller as the REST API to a resource
//! collection loaded from a JSON file (or the built-in demo records) and
//! prints or exports the result.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ehrdash_core::{
    csv_export, load_resources, sample_resources, Column, PageSize, ResourceStats,
    ResourceWrapper, SortDirection, TableAction, TableState, EXPORT_FILE_NAME,
};

#[derive(Parser)]
#[command(name = "ehrdash", about = "EHR resource dashboard CLI")]
struct Cli {
    /// JSON file with wrapped resources; the demo collection when omitted.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Free-text filter matched against every column.
    #[arg(long)]
    search: Option<String>,

    /// Processing state filter (e.g. COMPLETED).
    #[arg(long)]
    status: Option<String>,

    /// Resource type filter (e.g. Patient).
    #[arg(long)]
    resource_type: Option<String>,

    /// FHIR version filter (R4 or R4B).
    #[arg(long)]
    fhir_version: Option<String>,

    /// Column id to sort by (key, patientId, resourceType, state, version,
    /// createdTime, summary).
    #[arg(long)]
    sort_by: Option<String>,

    /// Sort direction: asc or desc.
    #[arg(long, default_value = "asc")]
    sort_dir: String,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of the filtered table.
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (5, 10, 20, 30, 40 or 50).
        #[arg(long, default_value_t = 5)]
        page_size: usize,
    },
    /// Write a CSV snapshot of the filtered (not paginated) rows.
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file.
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Print resource counts by processing state.
    Stats,
}

fn table_state(filters: &FilterArgs) -> anyhow::Result<TableState> {
    let mut table = TableState::new();
    if let Some(search) = &filters.search {
        table = table.apply(TableAction::SetSearch(search.clone()));
    }
    if let Some(status) = &filters.status {
        table = table.apply(TableAction::SetStateFilter(Some(status.parse()?)));
    }
    if let Some(resource_type) = &filters.resource_type {
        table = table.apply(TableAction::SetResourceTypeFilter(Some(
            resource_type.clone(),
        )));
    }
    if let Some(version) = &filters.fhir_version {
        table = table.apply(TableAction::SetVersionFilter(Some(version.parse()?)));
    }
    if let Some(sort_by) = &filters.sort_by {
        let column: Column = sort_by.parse()?;
        let direction: SortDirection = filters.sort_dir.parse()?;
        table = table.apply(TableAction::SetSort(Some((column, direction))));
    }
    Ok(table)
}

fn print_table(rows: &[&ResourceWrapper]) {
    let mut widths: Vec<usize> = Column::ALL
        .iter()
        .map(|column| column.header().len())
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            Column::ALL
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = column.value(row);
                    widths[i] = widths[i].max(value.len());
                    value
                })
                .collect()
        })
        .collect();

    let header: Vec<String> = Column::ALL
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{:<width$}", column.header(), width = widths[i]))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(header.join("  ").len()));
    for row in cells {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, value)| format!("{value:<width$}", width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let resources = match &cli.data {
        Some(path) => load_resources(path)?,
        None => sample_resources(),
    };

    match cli.command {
        Command::List {
            filters,
            page,
            page_size,
        } => {
            let table = table_state(&filters)?
                .apply(TableAction::SetPageSize(PageSize::new(page_size)?));
            let table = (1..page).fold(table, |t, _| t.apply(TableAction::NextPage));

            let total = table.filtered_rows(&resources).len();
            let rows = table.page_rows(&resources);
            print_table(&rows);
            println!(
                "\nShowing {} of {} total rows (page {} of {})",
                rows.len(),
                total,
                table.effective_page_index(total) + 1,
                table.page_count(total).max(1),
            );
        }
        Command::Export { filters, out } => {
            let table = table_state(&filters)?;
            let rows = table.filtered_rows(&resources);
            let csv = csv_export(&rows)?;
            std::fs::write(&out, csv)?;
            println!("Exported {} rows to {}", rows.len(), out.display());
        }
        Command::Stats => {
            let stats = ResourceStats::collect(&resources);
            println!("Total:       {}", stats.total);
            println!("Completed:   {}", stats.completed);
            println!("Processing:  {}", stats.processing);
            println!("Failed:      {}", stats.failed);
            println!("Not started: {}", stats.not_started);
        }
    }

    Ok(())
}
