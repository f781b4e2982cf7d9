// crusti_app_helper
// Copyright (C) 2020  Univ. Artois & CNRS
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use super::command::Command;
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches};
use log::{error, info, LevelFilter};
use std::{ffi::OsString, str::FromStr, sync::Once, time::Instant};
use sysinfo::System;

static LOGGER_INIT: Once = Once::new();

pub(crate) const LOGGING_LEVEL_ARG: &str = "LOGGING_LEVEL";

/// The CLI argument setting the logging level, shared by all the commands.
pub(crate) fn logging_level_cli_arg<'a>() -> Arg<'a, 'a> {
    Arg::with_name(LOGGING_LEVEL_ARG)
        .long("logging-level")
        .multiple(false)
        .default_value("info")
        .possible_values(&["trace", "debug", "info", "warn", "error", "off"])
        .help("set the minimal logging level")
}

/// Initializes the logger; only the first call has an effect.
///
/// Log records are written to the standard error, leaving the standard output to the results.
pub(crate) fn init_logger_with_level(level: LevelFilter) {
    LOGGER_INIT.call_once(|| {
        let colors = fern::colors::ColoredLevelConfig::new().info(fern::colors::Color::Cyan);
        fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "![{:5}] {} {}",
                    colors.color(record.level()),
                    chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                    message
                ))
            })
            .level(level)
            .chain(std::io::stderr())
            .apply()
            .unwrap_or(());
    });
}

/// The entry point of the application: holds the commands and dispatches the CLI arguments to them.
///
/// Errors returned by commands are logged with their causes, and the process exits with status 1.
pub(crate) struct AppHelper<'a> {
    app_name: &'a str,
    version: &'a str,
    author: &'a str,
    about: &'a str,
    commands: Vec<Box<dyn Command<'a>>>,
}

impl<'a> AppHelper<'a> {
    pub(crate) fn new(app_name: &'a str, version: &'a str, author: &'a str, about: &'a str) -> Self {
        AppHelper {
            app_name,
            version,
            author,
            about,
            commands: vec![],
        }
    }

    pub(crate) fn add_command(&mut self, command: Box<dyn Command<'a>>) {
        self.commands.push(command);
    }

    /// Runs the application on the process arguments, exiting with status 1 on error.
    pub(crate) fn launch_app(self) {
        if let Err(e) = self.execute_app(std::env::args_os()) {
            init_logger_with_level(LevelFilter::Info);
            error!("an error occurred: {}", e);
            e.chain()
                .skip(1)
                .for_each(|err| error!("caused by: {}", err));
            std::process::exit(1);
        }
    }

    fn clap_app(&self) -> App<'a, 'a> {
        let mut app = App::new(self.app_name)
            .global_setting(AppSettings::DisableVersion)
            .global_setting(AppSettings::VersionlessSubcommands)
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .version(self.version)
            .author(self.author)
            .about(self.about);
        for c in self.commands.iter() {
            app = app.subcommand(c.clap_subcommand());
        }
        app
    }

    pub(crate) fn execute_app<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match self.clap_app().get_matches_from_safe(args) {
            Ok(m) => m,
            Err(e) if e.kind == clap::ErrorKind::HelpDisplayed => {
                eprintln!("{}", e.message);
                return Ok(());
            }
            Err(e) => return Err(anyhow!("{}", e.message)),
        };
        let (name, sub_matches) = match matches.subcommand() {
            (name, Some(sub_matches)) => (name, sub_matches),
            (_, None) => return Err(anyhow!("no command provided")),
        };
        let command = self
            .commands
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| anyhow!("unknown command {}", name))?;
        self.execute_command(command.as_ref(), sub_matches)
    }

    fn execute_command(&self, command: &dyn Command<'a>, matches: &ArgMatches<'_>) -> Result<()> {
        let log_level = matches
            .value_of(LOGGING_LEVEL_ARG)
            .and_then(|l| LevelFilter::from_str(l).ok())
            .unwrap_or(LevelFilter::Info);
        init_logger_with_level(log_level);
        info!("{} {}", self.app_name, self.version);
        sys_info();
        let start_time = Instant::now();
        command.execute(matches)?;
        info!("exiting successfully after {:?}", start_time.elapsed());
        Ok(())
    }
}

fn sys_info() {
    info!("----------------------------------------");
    let sys = System::new_all();
    let unknown = || "[unknown]".to_string();
    info!("running on {}", System::host_name().unwrap_or_else(unknown));
    info!(
        "OS is {} {} with kernel {}",
        System::name().unwrap_or_else(unknown),
        System::os_version().unwrap_or_else(unknown),
        System::kernel_version().unwrap_or_else(unknown)
    );
    let mut cpu_kinds: Vec<&str> = sys.cpus().iter().map(|p| p.brand()).collect();
    cpu_kinds.sort_unstable();
    cpu_kinds.dedup();
    match sys.physical_core_count() {
        Some(n) => info!("physical core count: {} {:?}", n, cpu_kinds),
        None => info!("physical core count: [unknown] {:?}", cpu_kinds),
    }
    info!("total memory: {} bytes", sys.total_memory());
    info!("----------------------------------------");
}
