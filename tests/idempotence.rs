use gocanon::Formatter;
use proptest::prelude::*;

const NAMES: &[&str] = &[
    "Id", "logger", "CreatedAt", "UpdatedAt", "Name", "name", "Zeta", "alpha", "Beta", "b",
];
const TYPES: &[&str] = &["int", "string", "*Node", "[]byte", "map[string]int", "time.Time"];
const EMBEDDED: &[&str] = &["io.Reader", "*Base", "sync.Mutex"];

#[derive(Debug, Clone)]
enum Member {
    Named { name: usize, ty: usize, comment: bool },
    Embedded(usize),
}

fn member() -> impl Strategy<Value = Member> {
    prop_oneof![
        4 => (0..NAMES.len(), 0..TYPES.len(), any::<bool>())
            .prop_map(|(name, ty, comment)| Member::Named { name, ty, comment }),
        1 => (0..EMBEDDED.len()).prop_map(Member::Embedded),
    ]
}

fn render(members: &[Member], vars: &[usize]) -> String {
    let mut src = String::from("package p\n\ntype T struct {\n");
    for (i, m) in members.iter().enumerate() {
        match m {
            Member::Named { name, ty, comment } => {
                if *comment {
                    src.push_str(&format!("\t// doc {i}\n"));
                }
                src.push_str(&format!("\t{} {}\n", NAMES[*name], TYPES[*ty]));
            }
            Member::Embedded(e) => src.push_str(&format!("\t{}\n", EMBEDDED[*e])),
        }
    }
    src.push_str("}\n\nvar (\n");
    for (i, v) in vars.iter().enumerate() {
        src.push_str(&format!("\t{}{i} = {i}\n", NAMES[*v]));
    }
    src.push_str(")\n\nfunc f() {\n\tg()\n\treturn\n}\n");
    src
}

fn sorted_lines(s: &str) -> Vec<String> {
    let mut lines: Vec<String> = s
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    lines.sort();
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn formatting_twice_changes_nothing(
        members in proptest::collection::vec(member(), 1..10),
        vars in proptest::collection::vec(0..NAMES.len(), 1..6),
    ) {
        let src = render(&members, &vars);
        let f = Formatter::default();
        let once = f.format_source(&src).unwrap();
        let twice = f.format_source(&once).unwrap();
        prop_assert_eq!(&once, &twice);
        // Only order and blank lines change; every line survives.
        prop_assert_eq!(sorted_lines(&src), sorted_lines(&once));
    }
}
