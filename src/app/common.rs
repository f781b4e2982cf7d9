use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use limeltl::{
    io::{JsonSampleReader, SampleReader},
    sat::{DefaultSatSolverFactory, ExternalSatSolverFactory, SatSolverFactory},
    traces::Sample,
};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::PathBuf,
};

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .long("file")
        .empty_values(false)
        .multiple(false)
        .help("the JSON file that contains the sample (\"-\" for the standard input)")
        .required(true)
}

pub(crate) const ARG_MAX_SIZE: &str = "MAX_SIZE";

pub(crate) fn max_size_arg(help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(ARG_MAX_SIZE)
        .short("n")
        .long("size")
        .empty_values(false)
        .multiple(false)
        .help(help)
        .required(true)
}

pub(crate) fn read_max_size(arg_matches: &ArgMatches<'_>) -> Result<usize> {
    let str_size = arg_matches
        .value_of(ARG_MAX_SIZE)
        .ok_or_else(|| anyhow!("missing automaton size"))?;
    let size = str_size
        .parse::<usize>()
        .with_context(|| format!(r#"invalid automaton size "{}""#, str_size))?;
    if size == 0 {
        return Err(anyhow!("the automaton size must be at least 1"));
    }
    Ok(size)
}

pub(crate) const ARG_OUTPUT: &str = "OUTPUT";

pub(crate) fn output_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_OUTPUT)
        .short("o")
        .long("output")
        .empty_values(false)
        .multiple(false)
        .help("the output file (defaults to the standard output)")
        .required(false)
}

pub(crate) fn create_output(arg_matches: &ArgMatches<'_>) -> Result<Box<dyn Write>> {
    match arg_matches.value_of(ARG_OUTPUT) {
        Some(path) => {
            info!("writing results to {:?}", path);
            let file = File::create(path)
                .with_context(|| format!(r#"while creating output file "{}""#, path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

pub(crate) fn read_sample(arg_matches: &ArgMatches<'_>) -> Result<Sample> {
    let file_path = arg_matches
        .value_of(ARG_INPUT)
        .ok_or_else(|| anyhow!("missing input file"))?;
    let mut reader = JsonSampleReader::default();
    reader.add_warning_handler(Box::new(|location, msg| warn!("in {}: {}", location, msg)));
    let sample = if file_path == "-" {
        info!("reading sample from the standard input");
        reader.read(&mut io::stdin().lock())
    } else {
        read_file_path_with(file_path, &|r| reader.read(r))
    }?;
    info!(
        "the sample has {} symbol(s), {} positive trace(s) and {} negative trace(s)",
        sample.vocabulary().len(),
        sample.positive_traces().len(),
        sample.negative_traces().len(),
    );
    Ok(sample)
}

fn read_file_path_with<F, R>(file_path: &str, reader: &F) -> Result<R>
where
    F: Fn(&mut dyn Read) -> Result<R>,
{
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized)
            .with_context(|| format!(r#"while opening file "{}""#, file_path))?,
    );
    (reader)(&mut file_reader).with_context(|| format!(r#"while reading file "{}""#, file_path))
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

const ARG_EXTERNAL_SAT_SOLVER: &str = "EXTERNAL_SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER_OPTIONS: &str = "EXTERNAL_SAT_SOLVER_OPTIONS";

pub(crate) fn external_sat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER)
            .long("external-sat-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external SAT solver to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
            .long("external-sat-solver-opt")
            .requires(ARG_EXTERNAL_SAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external SAT solver")
            .required(false),
    ]
}

pub(crate) fn create_sat_solver_factory(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn SatSolverFactory>> {
    let external_solver_options = arg_matches
        .values_of(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    match arg_matches.value_of(ARG_EXTERNAL_SAT_SOLVER) {
        Some(s) => {
            let path = canonicalize_file_path(s)?;
            info!("using {:?} as SAT solver", path);
            let program = path
                .to_str()
                .ok_or_else(|| anyhow!("the path to the SAT solver is not valid UTF-8"))?
                .to_string();
            Ok(Box::new(ExternalSatSolverFactory::new(
                program,
                external_solver_options,
            )))
        }
        None => {
            info!("using the default SAT solver");
            Ok(Box::new(DefaultSatSolverFactory))
        }
    }
}
