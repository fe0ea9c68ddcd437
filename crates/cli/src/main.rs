use anyhow::Context;
use clap::{Parser, Subcommand};
use orgchart_core::dial_codes::{self, DialCodeCatalog, DialCodeOption, FileDialCodeSource};
use orgchart_core::search::find_employees;
use orgchart_core::{ChartConfig, ChartEvent, DepthLimit, Directory, EmployeeId, OrgChart, RootSelector};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orgchart-cli", about = "Org chart explorer and report generator")]
struct Args {
    /// Employee list as a JSON array; the built-in sample company when omitted
    #[arg(short, long, global = true)]
    employees: Option<PathBuf>,
    /// Chart settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the visible part of the chart
    Show {
        /// "all" or an employee id to draw the chart from
        #[arg(long)]
        root: Option<RootSelector>,
        /// Generations shown below each open node ("all" for no limit)
        #[arg(short, long)]
        depth: Option<DepthLimit>,
        /// Select an employee (opens the path to them)
        #[arg(long)]
        click: Option<u32>,
        /// Locate the best match for a name, department, location or email
        #[arg(short, long)]
        find: Option<String>,
        /// Replay a JSON array of chart events before printing
        #[arg(long)]
        events: Option<PathBuf>,
        /// Write the visible nodes as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the visible nodes as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the visible nodes as a PDF outline
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
    /// Fuzzy search the directory
    Search {
        query: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Report data-integrity problems in the employee list
    Validate,
    /// List country calling codes
    DialCodes {
        /// Read the country catalog from a file instead of the network
        #[arg(long)]
        countries: Option<PathBuf>,
        /// Only show countries matching this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Format a phone number for the first matching country
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let directory = match &args.employees {
        Some(path) => Directory::from_path(path)?,
        None => Directory::sample(),
    };
    let config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };

    match args.command {
        Command::Show { root, depth, click, find, events, json, csv, pdf } => {
            let mut chart = OrgChart::with_config(directory, &config);
            if let Some(root) = root {
                chart.set_root(root);
            }
            if let Some(depth) = depth {
                chart.set_depth(depth);
            }
            if let Some(path) = events {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading events from {}", path.display()))?;
                let events: Vec<ChartEvent> = serde_json::from_str(&text)
                    .with_context(|| format!("parsing events in {}", path.display()))?;
                for event in events {
                    chart.apply(event);
                }
            }
            if let Some(id) = click {
                chart.click(EmployeeId(id));
            }
            if let Some(query) = find {
                let hit = find_employees(chart.directory(), &query, 1)
                    .first()
                    .map(|h| h.employee.id);
                match hit {
                    Some(id) => chart.jump_to(id),
                    None => tracing::warn!(%query, "no employee matches"),
                }
            }

            print!("{}", orgchart_core::export::to_text(chart.visible()));
            if let Some(selected) = chart.selected_employee() {
                println!("selected: {} <{}> {}", selected.name, selected.email, selected.phone);
            }

            if let Some(path) = json {
                let report = orgchart_core::export::to_json(chart.visible());
                std::fs::write(&path, serde_json::to_string_pretty(&report)?)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            if let Some(path) = csv {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                orgchart_core::export::to_csv(chart.visible(), file)?;
            }
            if let Some(path) = pdf {
                orgchart_core::export::to_pdf(chart.visible(), &path)?;
            }
        }
        Command::Search { query, limit } => {
            for hit in find_employees(&directory, &query, limit) {
                let e = hit.employee;
                println!("{:>4}  {:<24} {:<20} {} ({})", e.id.0, e.name, e.department, e.location, hit.score);
            }
        }
        Command::Validate => {
            let issues = directory.validate();
            if issues.is_empty() {
                println!("{} employees, no problems found", directory.len());
            } else {
                for issue in &issues {
                    println!("{issue}");
                }
                anyhow::bail!("{} problem(s) in employee list", issues.len());
            }
        }
        Command::DialCodes { countries, filter, format } => {
            let options: Vec<DialCodeOption> = match countries {
                Some(path) => DialCodeCatalog::new(FileDialCodeSource(path)).options().to_vec(),
                None => dial_codes::load_country_dial_codes().to_vec(),
            };
            let shown = dial_codes::filter_options(&options, filter.as_deref().unwrap_or(""));
            for option in &shown {
                println!("{} {:<4} {:<8} {}", option.flag, option.iso2, option.dial_code, option.country);
            }
            if let (Some(number), Some(option)) = (format, shown.first()) {
                println!("{}", dial_codes::format_phone_number(&number, option));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_options() {
        let args = Args::try_parse_from([
            "orgchart-cli", "show", "--root", "3", "--depth", "all", "--find", "grace",
        ])
        .unwrap();
        match args.command {
            Command::Show { root, depth, find, .. } => {
                assert_eq!(root, Some(RootSelector::Employee(EmployeeId(3))));
                assert_eq!(depth, Some(DepthLimit::Unlimited));
                assert_eq!(find.as_deref(), Some("grace"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_employee_file_after_subcommand() {
        let args = Args::try_parse_from(["orgchart-cli", "validate", "-e", "staff.json"]).unwrap();
        assert_eq!(args.employees, Some(PathBuf::from("staff.json")));
    }

    #[test]
    fn rejects_bad_depth() {
        assert!(Args::try_parse_from(["orgchart-cli", "show", "--depth", "deep"]).is_err());
    }
}
