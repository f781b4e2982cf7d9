use super::{app_helper, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use limeltl::{io::OutputFormat, learning::SizeSearchController};
use log::info;
use std::str::FromStr;
use strum::IntoEnumIterator;

const CMD_NAME: &str = "learn";

const ARG_FORMAT: &str = "FORMAT";

pub(crate) struct LearnCommand {
    format_names: Vec<&'static str>,
}

impl LearnCommand {
    pub(crate) fn new() -> Self {
        LearnCommand {
            format_names: OutputFormat::iter().map(|f| f.name()).collect(),
        }
    }
}

impl<'a> Command<'a> for LearnCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Learns a minimal automaton classifying a sample")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_arg())
            .arg(common::max_size_arg("the maximal number of states"))
            .arg(
                Arg::with_name(ARG_FORMAT)
                    .long("format")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&self.format_names)
                    .default_value(OutputFormat::Tuple.name())
                    .help("the output format")
                    .required(false),
            )
            .arg(common::output_arg())
            .args(&common::external_sat_solver_args())
            .arg(app_helper::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let format = arg_matches
            .value_of(ARG_FORMAT)
            .map(OutputFormat::from_str)
            .transpose()
            .context("while reading the output format")?
            .unwrap_or(OutputFormat::Tuple);
        let max_size = common::read_max_size(arg_matches)?;
        let sample = common::read_sample(arg_matches)?;
        let solver_factory = common::create_sat_solver_factory(arg_matches)?;
        let mut controller =
            SizeSearchController::new_with_sat_solver_factory(&sample, max_size, solver_factory)?;
        let result = controller
            .learn()
            .context("while searching for an automaton")?;
        let stats = controller.stats();
        info!(
            "checked {} automaton size(s) in {:?}",
            stats.attempts().len(),
            stats.total_duration()
        );
        let writer = format.new_writer();
        let mut out = common::create_output(arg_matches)?;
        match result {
            Some(afa) => writer.write_afa(&mut out, &afa),
            None => {
                writer.write_no_model(&mut out)?;
                Err(anyhow!(
                    "no automaton with at most {} state(s) classifies the sample",
                    max_size
                ))
            }
        }
    }
}
