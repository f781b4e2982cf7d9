use super::{app_helper, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use limeltl::{
    encodings::{AfaConstraintsEncoder, AfaVarMap},
    sat::{BufferedSatSolver, DimacsInstanceRead, SatSolver, SolvingResult, Variable},
};
use std::{
    cell::RefCell,
    io::{Read, Write},
    rc::Rc,
};

const CMD_NAME: &str = "encode-to-sat";

pub(crate) struct EncodeToSatCommand;

impl EncodeToSatCommand {
    pub(crate) fn new() -> Self {
        EncodeToSatCommand
    }
}

impl<'a> Command<'a> for EncodeToSatCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Writes the DIMACS encoding of the search for an automaton of a given size")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_arg())
            .arg(common::max_size_arg("the number of states"))
            .arg(common::output_arg())
            .arg(app_helper::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let n_states = common::read_max_size(arg_matches)?;
        let sample = common::read_sample(arg_matches)?;
        let encoder = AfaConstraintsEncoder::new(&sample);
        let (var_map, instance) =
            capture_encoding(&encoder, n_states, Box::new(read_instance))?;
        let mut out = common::create_output(arg_matches)?;
        let context = "while writing the encoding";
        let vocabulary = sample.vocabulary();
        for (i, letter) in encoder.suffix_trie().letter_classes().iter().enumerate() {
            let symbols = letter
                .true_indices()
                .map(|j| vocabulary.symbol(j))
                .collect::<Vec<&str>>();
            writeln!(out, "c l{} = {{{}}}", i, symbols.join(", ")).context(context)?;
        }
        for v in 1..=var_map.n_vars() {
            let meaning = var_map
                .describe(Variable::from(v))
                .ok_or_else(|| anyhow!("variable {} has no meaning", v))?;
            writeln!(out, "c {} {}", v, meaning).context(context)?;
        }
        write!(out, "{}", instance).context(context)?;
        out.flush().context(context)
    }
}

fn read_instance(r: &mut DimacsInstanceRead, s: &mut String) -> std::io::Result<()> {
    r.read_to_string(s).map(|_| ())
}

type CaptureFn = dyn Fn(&mut DimacsInstanceRead, &mut String) -> std::io::Result<()>;

fn capture_encoding(
    encoder: &AfaConstraintsEncoder,
    n_states: usize,
    capture: Box<CaptureFn>,
) -> Result<(AfaVarMap, String)> {
    let instance = Rc::new(RefCell::new(String::new()));
    let mut solver = BufferedSatSolver::new(Box::new({
        let instance_cl = Rc::clone(&instance);
        move |mut r: DimacsInstanceRead| -> std::io::Result<Box<dyn Read>> {
            capture(&mut r, &mut instance_cl.borrow_mut())?;
            Ok(Box::new("s UNSATISFIABLE\n".as_bytes()))
        }
    }));
    let var_map = encoder.encode_constraints(n_states, &mut solver);
    if let SolvingResult::Unknown = solver.solve() {
        return Err(anyhow!("failed to build the encoding for size {}", n_states));
    }
    let dimacs = instance.borrow().clone();
    Ok((var_map, dimacs))
}
