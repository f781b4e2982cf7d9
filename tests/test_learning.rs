use limeltl::{
    afa::Afa,
    io::{FormulaAndTupleWriter, JsonSampleReader, ResultWriter, SampleReader, TupleWriter},
    learning::SizeSearchController,
    traces::{RawTrace, Sample, Trace, TraceEncoder, Vocabulary},
};
use paste::paste;

fn sample_of(vocabulary: &[&str], positive: &[RawTrace<&str>], negative: &[RawTrace<&str>]) -> Sample {
    let vocabulary = Vocabulary::new_with_symbols(vocabulary).unwrap();
    TraceEncoder::new(&vocabulary)
        .encode_sample(positive, negative)
        .unwrap()
}

fn scenario_sample() -> Sample {
    sample_of(
        &["p", "q", "r"],
        &[
            vec![vec!["p"], vec!["p"], vec!["q"]],
            vec![vec!["p"], vec!["q"]],
            vec![vec!["p", "r"], vec!["q"]],
            vec![vec!["q", "r"]],
        ],
        &[
            vec![vec!["p"], vec!["r"], vec!["q"]],
            vec![vec!["p"], vec!["r"]],
            vec![vec!["r"], vec!["q"]],
        ],
    )
}

fn assert_classifies(afa: &Afa, sample: &Sample) {
    for (i, t) in sample.positive_traces().iter().enumerate() {
        assert!(afa.accepts(t), "positive trace {} is rejected", i);
    }
    for (i, t) in sample.negative_traces().iter().enumerate() {
        assert!(!afa.accepts(t), "negative trace {} is accepted", i);
    }
}

#[test]
fn test_scenario_large_bound() {
    let sample = scenario_sample();
    let mut controller = SizeSearchController::new(&sample, 10).unwrap();
    let afa = controller.learn().unwrap().unwrap();
    assert!(afa.n_states() <= 10);
    assert_classifies(&afa, &sample);
    assert_eq!(afa.n_states(), controller.stats().attempts().len());
}

#[test]
fn test_scenario_small_bound() {
    let sample = scenario_sample();
    let mut controller = SizeSearchController::new(&sample, 3).unwrap();
    match controller.learn().unwrap() {
        Some(afa) => {
            assert!(afa.n_states() <= 3);
            assert_classifies(&afa, &sample);
        }
        None => {
            for k in 1..=3 {
                assert!(controller.try_size(k).unwrap().is_none());
            }
        }
    }
}

#[test]
fn test_learned_size_is_minimal() {
    let sample = scenario_sample();
    let mut controller = SizeSearchController::new(&sample, 10).unwrap();
    let afa = controller.learn().unwrap().unwrap();
    for k in 1..afa.n_states() {
        assert!(controller.try_size(k).unwrap().is_none());
    }
}

#[test]
fn test_empty_sample() {
    let sample = sample_of(&["p"], &[], &[]);
    let mut controller = SizeSearchController::new(&sample, 1).unwrap();
    let afa = controller.learn().unwrap().unwrap();
    assert_eq!(1, afa.n_states());
}

#[test]
fn test_empty_vocabulary() {
    let sample = sample_of(&[], &[vec![vec![]]], &[vec![vec![], vec![]]]);
    let mut controller = SizeSearchController::new(&sample, 3).unwrap();
    let afa = controller.learn().unwrap().unwrap();
    assert_eq!(2, afa.n_states());
    assert_classifies(&afa, &sample);
}

#[test]
fn test_zero_bound() {
    let sample = scenario_sample();
    assert!(SizeSearchController::new(&sample, 0).is_err());
}

#[test]
fn test_contradiction() {
    let sample = sample_of(
        &["p", "q"],
        &[vec![vec!["p"], vec!["q"]]],
        &[vec![vec!["q"]], vec![vec!["p"], vec!["q"]]],
    );
    for bound in 1..=3 {
        let mut controller = SizeSearchController::new(&sample, bound).unwrap();
        assert!(controller.learn().unwrap().is_none());
        assert!(controller.stats().attempts().is_empty());
    }
}

macro_rules! minimal_size_tests {
    ($($name:ident: $vocabulary:expr, $positive:expr, $negative:expr, $expected:expr;)*) => {
        $(
            paste! {
                #[test]
                fn [<test_minimal_size_ $name>]() {
                    let sample = sample_of(&$vocabulary, &$positive, &$negative);
                    let mut controller = SizeSearchController::new(&sample, 5).unwrap();
                    let afa = controller.learn().unwrap().unwrap();
                    assert_eq!($expected, afa.n_states());
                    assert_classifies(&afa, &sample);
                    for k in 1..$expected {
                        assert!(controller.try_size(k).unwrap().is_none());
                    }
                }
            }
        )*
    };
}

minimal_size_tests! {
    single_letter: ["p"], [vec![vec!["p"]]], [vec![vec![]]], 1;
    length_one: ["p"], [vec![vec!["p"]]], [vec![vec!["p"], vec!["p"]]], 2;
    parity: ["p"], [vec![], vec![vec!["p"], vec!["p"]]], [vec![vec!["p"]], vec![vec!["p"], vec!["p"], vec!["p"]]], 2;
}

fn held_out_traces(sample: &Sample) -> Vec<Trace> {
    let held_out: Vec<RawTrace<&str>> = vec![
        vec![],
        vec![vec!["q"]],
        vec![vec!["p"], vec!["p"], vec!["p"], vec!["q"]],
        vec![vec!["r"]],
        vec![vec!["p", "q"], vec!["r"]],
        vec![vec!["q"], vec!["q"], vec!["r"]],
        vec![vec!["p", "q", "r"], vec![], vec!["q"]],
    ];
    TraceEncoder::new(sample.vocabulary())
        .encode_traces(&held_out, "held-out")
        .unwrap()
}

#[test]
fn test_learning_is_idempotent() {
    let sample = scenario_sample();
    let first = SizeSearchController::new(&sample, 10)
        .unwrap()
        .learn()
        .unwrap()
        .unwrap();
    let second = SizeSearchController::new(&sample, 10)
        .unwrap()
        .learn()
        .unwrap()
        .unwrap();
    assert_eq!(first.n_states(), second.n_states());
    let sample_traces = sample
        .positive_traces()
        .iter()
        .chain(sample.negative_traces().iter())
        .cloned()
        .collect::<Vec<Trace>>();
    assert_eq!(7, sample_traces.len());
    for (i, t) in sample_traces.iter().chain(held_out_traces(&sample).iter()).enumerate() {
        assert_eq!(first.accepts(t), second.accepts(t), "trace {}", i);
    }
}

#[test]
fn test_relearning_keeps_size() {
    let sample = scenario_sample();
    let afa = SizeSearchController::new(&sample, 10)
        .unwrap()
        .learn()
        .unwrap()
        .unwrap();
    let encoded = held_out_traces(&sample);
    let (accepted, rejected): (Vec<_>, Vec<_>) = encoded.into_iter().partition(|t| afa.accepts(t));
    let mut positive = sample.positive_traces().to_vec();
    positive.extend(accepted);
    let mut negative = sample.negative_traces().to_vec();
    negative.extend(rejected);
    let extended = Sample::new(sample.vocabulary().clone(), positive, negative).unwrap();
    let relearned = SizeSearchController::new(&extended, afa.n_states())
        .unwrap()
        .learn()
        .unwrap()
        .unwrap();
    assert_eq!(afa.n_states(), relearned.n_states());
    assert_classifies(&relearned, &extended);
}

#[test]
fn test_formula_and_tuple_agree() {
    let sample = scenario_sample();
    let afa = SizeSearchController::new(&sample, 10)
        .unwrap()
        .learn()
        .unwrap()
        .unwrap();
    let mut tuple = Vec::new();
    TupleWriter.write_afa(&mut tuple, &afa).unwrap();
    let tuple = String::from_utf8(tuple).unwrap();
    let mut both = Vec::new();
    FormulaAndTupleWriter.write_afa(&mut both, &afa).unwrap();
    let both = String::from_utf8(both).unwrap();
    assert!(tuple.starts_with(&format!("({}, 0, ", afa.n_states())));
    assert!(both.starts_with("('"));
    assert!(both.ends_with(&format!(", {})\n", tuple.trim_end())));
    assert!(both.contains("q0"));
}

#[test]
fn test_learn_from_json() {
    let reader = JsonSampleReader::default();
    let sample = reader
        .read(
            &mut r#"{"vocab": ["p", "q", "r"],
                "traces_pos": [[["p"], ["p"], ["q"]], [["p"], ["q"]], [["p", "r"], ["q"]], [["q", "r"]]],
                "traces_neg": [[["p"], ["r"], ["q"]], [["p"], ["r"]], [["r"], ["q"]]]}"#
                .as_bytes(),
        )
        .unwrap();
    let afa = SizeSearchController::new(&sample, 10)
        .unwrap()
        .learn()
        .unwrap()
        .unwrap();
    assert_classifies(&afa, &sample);
}

#[test]
fn test_malformed_inputs() {
    let reader = JsonSampleReader::default();
    for input in [
        r#"{"vocab": ["p", "p"], "traces_pos": [], "traces_neg": []}"#,
        r#"{"vocab": ["p"], "traces_pos": [[["s"]]], "traces_neg": []}"#,
        r#"{"vocab": ["p"], "traces_pos": [[["p"]]]}"#,
        r#"{"vocab": "p", "traces_pos": [], "traces_neg": []}"#,
        r#"not json"#,
    ] {
        assert!(reader.read(&mut input.as_bytes()).is_err(), "{}", input);
    }
}

#[cfg(unix)]
#[test]
fn test_undecided_instance_is_an_error() {
    use assert_fs::{prelude::FileWriteStr, NamedTempFile};
    use limeltl::sat::ExternalSatSolverFactory;
    use std::os::unix::fs::PermissionsExt;

    let script = NamedTempFile::new("unknown_solver.sh").unwrap();
    script
        .write_str("#!/bin/sh\ncat > /dev/null\necho \"s UNKNOWN\"\n")
        .unwrap();
    std::fs::set_permissions(script.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
    let sample = scenario_sample();
    let factory = ExternalSatSolverFactory::new(script.path().to_str().unwrap().to_string(), vec![]);
    let mut controller =
        SizeSearchController::new_with_sat_solver_factory(&sample, 3, Box::new(factory)).unwrap();
    assert!(controller.learn().is_err());
    script.close().unwrap();
}
