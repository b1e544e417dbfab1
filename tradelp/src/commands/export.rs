use clap::ValueEnum;
use std::{io::Write, str::FromStr};
use tlp_core::models::TradeConfig;
use tlp_solver::io::Scenario;

// The formats the assembled program can be written in
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Mps,
    Lp,
}

impl ExportFormat {
    pub fn export<W: Write>(
        &self,
        scenario: &Scenario,
        config: &TradeConfig,
        buffer: &mut W,
    ) -> anyhow::Result<()> {
        match self {
            Self::Mps => scenario.export_mps(config, buffer)?,
            Self::Lp => scenario.export_lp(config, buffer)?,
        };
        Ok(())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mps" | "MPS" => Ok(Self::Mps),
            "lp" | "LP" => Ok(Self::Lp),
            _ => Err(Self::Err::ExportExtension(s.to_owned())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExportFormatError {
    #[error("Unknown export format: {0}")]
    ExportExtension(String),
}
