use super::{app_helper, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::{info, warn};

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks input sample files for errors")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_arg())
            .arg(app_helper::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let sample = common::read_sample(arg_matches)?;
        let lengths = sample
            .positive_traces()
            .iter()
            .chain(sample.negative_traces().iter())
            .map(|t| t.len());
        let max_length = lengths.clone().max().unwrap_or(0);
        let total_length: usize = lengths.sum();
        info!(
            "traces have {} letter(s) in total; the longest one has {} letter(s)",
            total_length, max_length
        );
        if let Some((i, j)) = sample.find_contradiction() {
            warn!(
                "positive trace {} and negative trace {} are identical; no automaton can classify the sample",
                i, j
            );
        }
        Ok(())
    }
}
