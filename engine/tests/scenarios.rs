use docopt_core::{ArgMap, Value};
use docopt_engine::{Docopt, DocoptError, Outcome, ParseConfig, build_pattern_tree, parse};

const NAVAL_FATE: &str = "Naval Fate.

Usage:
  naval_fate ship new <name>...
  naval_fate ship <name> move <x> <y> [--speed=<kn>]
  naval_fate ship shoot <x> <y>
  naval_fate mine (set|remove) <x> <y> [--moored|--drifting]
  naval_fate -h | --help
  naval_fate --version

Options:
  -h --help     Show this screen.
  --version     Show version.
  --speed=<kn>  Speed in knots [default: 10].
  --moored      Moored (anchored) mine.
  --drifting    Drifting mine.
";

fn matched(doc: &str, argv: &[&str]) -> ArgMap {
    match parse(doc, argv.iter().copied(), true, true, false) {
        Ok(Outcome::Matched(args)) => args,
        other => panic!("expected {argv:?} to match, got {other:?}"),
    }
}

fn argument_error(doc: &str, argv: &[&str]) -> String {
    match parse(doc, argv.iter().copied(), true, true, false) {
        Err(DocoptError::Argument(message)) => message,
        other => panic!("expected an argument error for {argv:?}, got {other:?}"),
    }
}

#[test]
fn test_repeated_value_option_collects_in_order() {
    let args = matched("Usage: prog --opt=<x>...", &["--opt=1", "--opt=2"]);
    assert_eq!(
        args.get("--opt"),
        Some(&Value::StringList(vec!["1".into(), "2".into()]))
    );
}

#[test]
fn test_repeated_flag_counts_occurrences() {
    let args = matched("Usage: prog (-v)...", &["-v", "-v", "-v"]);
    assert_eq!(args.get("-v"), Some(&Value::Integer(3)));
    assert_eq!(args.get_count("-v"), 3);
}

#[test]
fn test_either_prefers_alternative_consuming_most() {
    let args = matched("Usage: prog (go left|go)", &["go"]);
    assert!(args.get_bool("go"));
    assert!(!args.get_bool("left"));

    let args = matched("Usage: prog (go left|go)", &["go", "left"]);
    assert!(args.get_bool("left"));
}

#[test]
fn test_defaults_seed_names_absent_from_argv() {
    let args = matched(NAVAL_FATE, &["ship", "new", "Titanic"]);
    assert_eq!(args.get("--speed"), Some(&Value::from("10")));
    assert_eq!(args.get("<x>"), Some(&Value::Empty));
    assert!(!args.get_bool("--moored"));
}

#[test]
fn test_ship_new_scenario() {
    let doc = "Usage: prog ship new <name>...";
    let args = matched(doc, &["ship", "new", "Titanic"]);

    let json = serde_json::to_value(&args).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"ship": true, "new": true, "<name>": ["Titanic"]})
    );
}

#[test]
fn test_ambiguous_prefix_in_argv_is_argument_error() {
    let doc = "Usage: prog [options]

Options:
  --verbose  Chatty.
  --version  Show version.
";
    let message = argument_error(doc, &["--ver"]);
    assert_eq!(message, "'--ver' is not a unique prefix: --verbose, --version");
}

#[test]
fn test_ambiguous_prefix_in_usage_is_grammar_error() {
    let doc = "Usage: prog --verbose | --version | --ver=<x>

Options:
  --verbose  Chatty.
  --verbose  Chatty again.
";
    let err = build_pattern_tree(doc).unwrap_err();
    assert_eq!(
        err,
        DocoptError::Grammar("'--verbose' is not a unique prefix: --verbose, --verbose".into())
    );
}

#[test]
fn test_grammar_errors() {
    let cases = [
        ("Program with no label.", "'usage:' (case-insensitive) not found."),
        ("usage: a\n\nusage: b", "More than one 'usage:' (case-insensitive)."),
        ("Usage: prog [a", "Mismatched '['"),
        ("Usage: prog (a", "Mismatched '('"),
        ("Usage: prog a ]", "Mismatched '('"),
        ("Usage: prog a )", "Unexpected ending: ')'"),
    ];

    for (doc, expected) in cases {
        match build_pattern_tree(doc) {
            Err(DocoptError::Grammar(message)) => assert_eq!(message, expected, "doc: {doc}"),
            other => panic!("expected a grammar error for {doc:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_option_argument_errors() {
    let doc = "Usage: prog [options]

Options:
  -o FILE      Output.
  --quiet      Quiet.
";
    assert_eq!(argument_error(doc, &["-o"]), "-o requires an argument");
    assert_eq!(argument_error(doc, &["-o", "--"]), "-o requires an argument");
    assert_eq!(
        argument_error(doc, &["--quiet=yes"]),
        "--quiet must not have an argument"
    );
}

#[test]
fn test_leftover_tokens_are_reported() {
    let message = argument_error("Usage: prog <a>", &["x", "y", "--speed=3"]);
    assert_eq!(message, "Unexpected argument: y, --speed=3");

    let message = argument_error(NAVAL_FATE, &["ship", "sink"]);
    assert_eq!(message, "Arguments did not match expected patterns");
}

#[test]
fn test_help_and_version_are_outcomes_not_errors() {
    let help = parse(NAVAL_FATE, ["ship", "-h"], true, true, false).unwrap();
    assert_eq!(help, Outcome::HelpRequested);
    assert_eq!(help.into_args(), None);

    let version = parse(NAVAL_FATE, ["--version"], true, true, false).unwrap();
    assert_eq!(version, Outcome::VersionRequested);

    // With help handling off, `--help` is an ordinary flag in the grammar.
    let args = parse(NAVAL_FATE, ["--help"], false, true, false)
        .unwrap()
        .into_args()
        .unwrap();
    assert!(args.get_bool("--help"));
}

#[test]
fn test_options_first_stops_option_recognition() {
    let doc = "Usage: prog [--all] <cmd> [<args>...]";
    let config = ParseConfig::default().with_options_first(true);

    let args = Docopt::new(doc)
        .unwrap()
        .with_config(config)
        .parse(["--all", "exec", "--all", "-x"])
        .unwrap()
        .into_args()
        .unwrap();
    assert!(args.get_bool("--all"));
    assert_eq!(args.get_str("<cmd>"), Some("exec"));
    assert_eq!(args.get_list("<args>"), ["--all", "-x"]);

    // Without it the second `--all` is a stray option.
    let message = argument_error(doc, &["--all", "exec", "--all"]);
    assert_eq!(message, "Unexpected argument: --all");
}

#[test]
fn test_double_dash_makes_the_rest_positional() {
    let doc = "Usage: prog [-v] [--] <file>...";
    let args = matched(doc, &["-v", "--", "-v", "--x"]);
    assert!(args.get_bool("-v"));
    assert!(args.get_bool("--"));
    assert_eq!(args.get_list("<file>"), ["-v", "--x"]);
}

#[test]
fn test_command_only_matches_first_positional() {
    let doc = "Usage: prog [<x>] go";
    let err = parse(doc, ["go", "1"], true, true, false).unwrap_err();
    assert!(err.is_argument());

    let args = matched(doc, &["1", "go"]);
    assert_eq!(args.get_str("<x>"), Some("1"));
    assert!(args.get_bool("go"));
}

#[test]
fn test_full_result_is_stable_across_calls() {
    let docopt = Docopt::new(NAVAL_FATE).unwrap();
    let first = docopt.parse(["mine", "set", "3", "4", "--moored"]).unwrap();
    let second = docopt.parse(["mine", "set", "3", "4", "--moored"]).unwrap();
    assert_eq!(first, second);

    let args = first.into_args().unwrap();
    assert_eq!(args.len(), 15);
    assert!(args.get_bool("mine"));
    assert!(args.get_bool("set"));
    assert!(args.get_bool("--moored"));
    assert_eq!(args.get("<x>").unwrap().as_integer().unwrap(), 3);
}
