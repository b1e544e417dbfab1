use super::{IOArgs, PathOrStd};
use clap::Subcommand;

mod export;
pub use export::{ExportFormat, ExportFormatError};

mod solve;
pub use solve::SolverLib;

#[derive(Subcommand)]
pub enum Commands {
    /// Settle the period and report the settlement
    Solve {
        #[command(flatten)]
        io: IOArgs,

        /// Request a specific LP backend
        #[arg(short, long, default_value = "clarabel")]
        backend: SolverLib,

        /// Seed the solve with the flows of a previous period (a warm start JSON file)
        #[arg(short, long, value_parser = clap::value_parser!(PathOrStd))]
        warm_start: Option<PathOrStd>,

        /// Write the warm start for the next period to this file
        #[arg(short, long, value_parser = clap::value_parser!(PathOrStd))]
        save_warm_start: Option<PathOrStd>,

        /// Write the graph, with each center's realized production recorded, to this file
        #[arg(short = 'g', long, value_parser = clap::value_parser!(PathOrStd))]
        save_graph: Option<PathOrStd>,
    },

    /// Construct the trade linear program and export to a standard format
    Export {
        #[command(flatten)]
        io: IOArgs,

        /// The file format to use (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
}
