use std::cell::Cell;
use std::rc::Rc;

use optdispatch_core::*;

/// Execution record shared by probe options.
#[derive(Default)]
struct Probe {
    order: Vec<String>,
    default_args: Vec<Vec<String>>,
    blanks: usize,
}

fn recorder(name: &'static str, priority: i32) -> FnOption<Probe> {
    FnOption::new(priority, move |p: &mut Probe, _: &[String]| {
        p.order.push(name.to_string());
        Ok(())
    })
    .with_check(|_| Ok(()))
}

fn parser_with(extra: Vec<(&'static str, FnOption<Probe>)>) -> Parser<Probe> {
    let mut builder = Parser::builder()
        .leading(recorder("leading", 0))
        .default_action(
            FnOption::new(1, |p: &mut Probe, args: &[String]| {
                p.order.push("default".into());
                p.default_args.push(args.to_vec());
                Ok(())
            })
            .with_check(|_| Ok(())),
        )
        .on_blank(|p: &mut Probe| p.blanks += 1);
    for (flag, option) in extra {
        builder = builder.option(flag, option);
    }
    builder.build().unwrap()
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn flagless_input_forms_one_leading_block() {
    let inputs: [&[&str]; 3] = [&[], &["only"], &["a", "b", "c", "d"]];
    for tokens in inputs {
        let mut parser = parser_with(vec![]);
        parser.parse(tokens.iter().copied()).unwrap();

        let blocks = parser.blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].flag(), LEADING_KEY);
        assert_eq!(blocks[0].args(), tokens);
    }
}

#[test]
fn unknown_flag_is_rejected_with_its_token() {
    let mut parser = parser_with(vec![("-a", recorder("a", 0))]);
    let err = parser.parse(["-z"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert_eq!(err.token(), "-z");
}

#[test]
fn equal_priorities_keep_encounter_order() {
    let mut parser = parser_with(vec![
        ("-x", recorder("x", 0)),
        ("-y", recorder("y", 0)),
        ("-z", recorder("z", 0)),
        ("-m", recorder("m", -2)),
    ]);
    parser.parse(["-z", "-x", "-m", "-y", "-x"]).unwrap();
    let flags: Vec<&str> = parser.blocks().iter().map(|b| b.flag()).collect();
    assert_eq!(flags, vec!["-m", "-", "-z", "-x", "-y", "-x"]);
}

// ---------------------------------------------------------------------------
// Execution laws
// ---------------------------------------------------------------------------

#[test]
fn blank_input_runs_only_the_blank_handler() {
    let mut parser = parser_with(vec![("-a", recorder("a", 1))]);
    let mut probe = Probe::default();
    parser.run(&mut probe, Vec::<String>::new()).unwrap();

    assert_eq!(probe.blanks, 1);
    assert!(probe.order.is_empty());
}

#[test]
fn at_most_one_action_runs() {
    let after = Rc::new(Cell::new(0));
    let counter = Rc::clone(&after);
    let late = FnOption::new(5, move |_: &mut Probe, _: &[String]| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    let mut parser = parser_with(vec![
        ("-e", recorder("env", 0)),
        ("-h", recorder("meta", -1)),
        ("-a", recorder("action", 2)),
        ("-late", late),
    ]);
    let mut probe = Probe::default();
    parser.run(&mut probe, ["-a", "-e", "-late", "-e"]).unwrap();

    assert_eq!(probe.order, vec!["leading", "env", "env", "action"]);
    assert_eq!(after.get(), 0);
}

#[test]
fn default_action_runs_once_with_no_arguments() {
    let mut parser = parser_with(vec![("-e", recorder("env", 0))]);
    let mut probe = Probe::default();
    parser.run(&mut probe, ["lead", "-e", "x", "-e"]).unwrap();

    assert_eq!(probe.order, vec!["leading", "env", "env", "default"]);
    assert_eq!(probe.default_args, vec![Vec::<String>::new()]);
}

#[test]
fn meta_option_ends_the_run() {
    let mut parser = parser_with(vec![
        ("-h", recorder("help", -1)),
        ("-r", recorder("read", 2)),
    ]);
    let mut probe = Probe::default();
    parser.run(&mut probe, ["-r", "-h"]).unwrap();
    assert_eq!(probe.order, vec!["help"]);
}

#[test]
fn execute_failure_propagates_from_action() {
    let mut parser = parser_with(vec![(
        "-a",
        FnOption::new(1, |_: &mut Probe, _: &[String]| {
            Err(DispatchError::MissingArgument("-f [encoding]".into()))
        }),
    )]);
    let mut probe = Probe::default();
    let err = parser.run(&mut probe, ["-a"]).unwrap_err();
    assert_eq!(err, DispatchError::MissingArgument("-f [encoding]".into()));
    assert_eq!(parser.state(), ParserState::Failed);
}

// ---------------------------------------------------------------------------
// Reuse across cycles
// ---------------------------------------------------------------------------

#[test]
fn cleared_parser_serves_the_next_cycle() {
    let mut parser = parser_with(vec![("-e", recorder("env", 0))]);
    let mut probe = Probe::default();
    let mut out = Vec::new();

    let first = dispatch_to(&mut parser, &mut probe, ["-bogus"], &mut out);
    assert!(!first.is_completed());
    parser.clear();

    let second = dispatch_to(&mut parser, &mut probe, ["-e"], &mut out);
    assert!(second.is_completed());
    parser.clear();

    assert_eq!(String::from_utf8(out).unwrap(), "invalid option -- '-bogus'\n");
    assert_eq!(probe.order, vec!["leading", "env", "default"]);
    assert_eq!(parser.state(), ParserState::Empty);
}

#[test]
fn read_write_help_scenario() {
    #[derive(Default)]
    struct Store {
        value: Option<String>,
        reads: usize,
        helps: usize,
        blanks: usize,
    }

    let read: Rc<dyn CliOption<Store>> = Rc::new(FnOption::new(2, |s: &mut Store, _: &[String]| {
        s.reads += 1;
        Ok(())
    }));
    let mut parser = Parser::builder()
        .option("-h", FnOption::new(-1, |s: &mut Store, _: &[String]| {
            s.helps += 1;
            Ok(())
        }))
        .shared("-r", Rc::clone(&read))
        .option(
            "-w",
            FnOption::new(3, |s: &mut Store, args: &[String]| {
                s.value = Some(args[0].clone());
                Ok(())
            })
            .with_check(|args| expect_exactly("-w", 1, args)),
        )
        .default_shared(read)
        .on_blank(|s: &mut Store| s.blanks += 1)
        .build()
        .unwrap();

    let mut store = Store::default();

    parser.run(&mut store, ["-w", "X"]).unwrap();
    parser.clear();
    assert_eq!(store.value.as_deref(), Some("X"));
    assert_eq!(store.reads, 0);

    parser.run(&mut store, Vec::<String>::new()).unwrap();
    parser.clear();
    assert_eq!(store.blanks, 1);

    parser.run(&mut store, ["-h"]).unwrap();
    parser.clear();
    assert_eq!(store.helps, 1);
    assert_eq!(store.reads, 0);
}
