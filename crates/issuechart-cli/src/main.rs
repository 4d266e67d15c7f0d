use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "issuechart")]
#[command(about = "issuechart - stacked bar charts of Jira issue fields over time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the gadget configuration
    Configure {
        /// Username shown on the dashboard
        #[arg(long)]
        username: String,
    },
    /// Show the saved configuration
    Show,
    /// List selectable projects
    Projects,
    /// List selectable issue types
    IssueTypes,
    /// List fields found in the current query's issues
    Fields,
    /// List sub-fields of the chosen field
    NestedFields,
    /// List priorities found in the current query's issues
    Priorities,
    /// List chart intervals
    Intervals,
    /// Change one part of the selection
    Select {
        #[command(subcommand)]
        target: SelectTarget,
    },
    /// Render the chart for the current selection
    Chart,
    /// Clear the saved selection
    Reset,
}

#[derive(Subcommand)]
pub enum SelectTarget {
    /// Project key
    Project { value: String },
    /// Issue type name
    IssueType { value: String },
    /// Field to chart
    Field { value: String },
    /// Sub-field of the chosen field
    NestedField { value: String },
    /// Priority name
    Priority { value: String },
    /// daily, weekly, monthly, quarterly or yearly
    Interval { value: String },
    /// Replace the JQL query verbatim
    Jql { value: String },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "issuechart=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Configure { username } => commands::configure::submit(&username)?,
        Commands::Show => commands::configure::show()?,
        Commands::Projects => commands::options::projects().await?,
        Commands::IssueTypes => commands::options::issue_types().await?,
        Commands::Fields => commands::options::fields().await?,
        Commands::NestedFields => commands::options::nested_fields().await?,
        Commands::Priorities => commands::options::priorities().await?,
        Commands::Intervals => commands::options::intervals(),
        Commands::Select { target } => commands::select::apply(target)?,
        Commands::Chart => commands::chart::show().await?,
        Commands::Reset => commands::select::reset()?,
    }

    Ok(())
}
