use gocanon::{CanonConfig, FieldOrder, Formatter};

fn canon(src: &str) -> String {
    match Formatter::default().format_source(src) {
        Ok(out) => out,
        Err(e) => panic!("format failed: {e}\n{src}"),
    }
}

/// Collapses runs of spaces and tabs inside each line, keeping indentation.
/// Column alignment is the base formatter's job.
fn collapse_runs(src: &str) -> String {
    src.lines()
        .map(|line| {
            let body = line.trim_start_matches('\t');
            let indent = &line[..line.len() - body.len()];
            format!("{indent}{}", body.split_whitespace().collect::<Vec<_>>().join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const GOLDEN_INPUT: &str = r#"package test

import (
	"log"
	"time"

	test_package "github.com/SamuelTheJackson/justtrack-fmt/test/test-package"
	test_package "github.com/SamuelTheJackson/justtrack-fmt/test/testpackage"
)

const (
	i = "j"
	a = "a"
	c = "iota"

	e = iota
	q
	w
	s
	l
	y
	d
)

var (
	D = "j"
	C = "j"
	A = "a"
	U = func() string {
		return "asdf"
	}
)

type Dog interface {
	Bite(times int) error
	Bark(times int) error
}

type Fog2 interface {
	Dog
	Fogging(times int) error
}

type Cat struct {
	CreatedAt    time.Time
	Id           uint
	thisIsUint   uint32
	producer     Dog
	ThisIsStruct TestStruct
	Test         Dog
	Alone        chan int
}

type JustAStruct struct{}

type TestStruct struct {
	ThisIsString string
	repo         test_package.TestStruct
	B            JustAStruct
	Fog2
	CreatedAt    time.Time
	c            []byte
	ThisIsStruct time.Time
	Dog
	ThisIsUint uint32
	A          JustAStruct
	Id         uint
	TestStruct struct {
		Test string
		// this is the Id
		// pls keep it to this line
		Id        *uint
		CreatedAt time.Time
	}
	b uint32
	ThisIsStruct3 *JustAStruct
	// commentForStruct2
	ThisIsStruct2 JustAStruct
	C             JustAStruct
	// this is a comment for
	// the logger
	logger log.Logger
	Qual   *string
	Stal   *string
	a      string
	D      []JustAStruct
}

func H() {}

func test(test string) {
	if test == "" {
		return
	}
	for _, i := range []string{"", "jasdf", "Jsfd"} {
		if i == "" {
			continue
		}
		if i == "ja" {
			i = ""
			continue
		}
	}

	if test == "hello" {
		test = ""
		return
	} else {
		test = "d"
		return
	}

	return
}
"#;

const GOLDEN_OUTPUT: &str = r#"package test

import (
	"log"
	"time"

	"github.com/SamuelTheJackson/justtrack-fmt/test/test-package"
	test_package "github.com/SamuelTheJackson/justtrack-fmt/test/testpackage"
)

const (
	i = "j"
	a = "a"
	c = "iota"

	e = iota
	q
	w
	s
	l
	y
	d
)

var (
	A = "a"
	C = "j"
	D = "j"
	U = func() string {
		return "asdf"
	}
)

type Dog interface {
	Bark(times int) error
	Bite(times int) error
}

type Fog2 interface {
	Dog
	Fogging(times int) error
}

type Cat struct {
	Id           uint
	Alone        chan int
	producer     Dog
	Test         Dog
	ThisIsStruct TestStruct
	thisIsUint   uint32
	CreatedAt    time.Time
}

type JustAStruct struct{}

type TestStruct struct {
	Dog
	Fog2
	// this is a comment for
	// the logger
	logger     log.Logger
	Id         uint
	A          JustAStruct
	a          string
	B          JustAStruct
	b          uint32
	c          []byte
	C          JustAStruct
	D          []JustAStruct
	Qual       *string
	repo       test_package.TestStruct
	Stal       *string
	TestStruct struct {
		// this is the Id
		// pls keep it to this line
		Id        *uint
		Test      string
		CreatedAt time.Time
	}
	ThisIsString string
	ThisIsStruct time.Time
	// commentForStruct2
	ThisIsStruct2 JustAStruct
	ThisIsStruct3 *JustAStruct
	ThisIsUint    uint32
	CreatedAt     time.Time
}

func H() {}

func test(test string) {
	if test == "" {
		return
	}
	for _, i := range []string{"", "jasdf", "Jsfd"} {
		if i == "" {
			continue
		}
		if i == "ja" {
			i = ""

			continue
		}
	}

	if test == "hello" {
		test = ""

		return
	} else {
		test = "d"

		return
	}

	return
}
"#;

#[test]
fn golden_file() {
    let got = canon(GOLDEN_INPUT);
    assert_eq!(collapse_runs(&got), collapse_runs(GOLDEN_OUTPUT), "got:\n{got}");
    assert_eq!(canon(&got), got);
}

#[test]
fn struct_fields_in_bucket_order() {
    let src = "package models\n\ntype User struct {\n\tTest string\n\tlogger Logger\n\tId int\n\tName string\n\tCreatedAt time.Time\n}\n";
    let want = "package models\n\ntype User struct {\n\tlogger Logger\n\tId int\n\tName string\n\tTest string\n\tCreatedAt time.Time\n}\n";
    assert_eq!(canon(src), want);
}

#[test]
fn field_comments_travel_with_fields() {
    let src = "package p\n\ntype T struct {\n\t// Zeta is last.\n\tZeta int // z\n\tio.Reader\n\tAlpha string `json:\"alpha\"` // a\n}\n";
    let want = "package p\n\ntype T struct {\n\tio.Reader\n\tAlpha string `json:\"alpha\"` // a\n\t// Zeta is last.\n\tZeta int // z\n}\n";
    assert_eq!(canon(src), want);
}

#[test]
fn nested_structs_are_sorted_depth_first() {
    let src = "package p\n\ntype Outer struct {\n\tb int\n\tInner struct {\n\t\tUpdatedAt int\n\t\tId string\n\t}\n\ta int\n}\n";
    let want = "package p\n\ntype Outer struct {\n\ta int\n\tb int\n\tInner struct {\n\t\tId string\n\t\tUpdatedAt int\n\t}\n}\n";
    assert_eq!(canon(src), want);
}

#[test]
fn interface_elements_embedded_first() {
    let src = "package p\n\ntype Store interface {\n\tSave(u User) error\n\tio.Closer\n\tLoad(id int) (User, error)\n}\n";
    let want = "package p\n\ntype Store interface {\n\tio.Closer\n\tLoad(id int) (User, error)\n\tSave(u User) error\n}\n";
    assert_eq!(canon(src), want);
}

#[test]
fn var_groups_sort_and_iota_groups_stay() {
    let src = "package p\n\nconst (\n\tB Kind = iota\n\tA\n)\n\nvar (\n\t// zeta doc\n\tzeta = 1\n\tAlpha = 2 // alpha\n)\n";
    let want = "package p\n\nconst (\n\tB Kind = iota\n\tA\n)\n\nvar (\n\tAlpha = 2 // alpha\n\t// zeta doc\n\tzeta = 1\n)\n";
    assert_eq!(canon(src), want);
}

#[test]
fn string_iota_does_not_freeze_a_group() {
    let src = "package p\n\nconst (\n\tB = \"iota\"\n\tA = \"x\"\n)\n";
    let want = "package p\n\nconst (\n\tA = \"x\"\n\tB = \"iota\"\n)\n";
    assert_eq!(canon(src), want);
}

#[test]
fn redundant_import_aliases_are_dropped() {
    let src = "package p\n\nimport (\n\t\"fmt\"\n\n\terrors_x \"github.com/acme/errors-x\"\n\tstdlog \"log\"\n\t_ \"net/http/pprof\"\n)\n";
    let want = "package p\n\nimport (\n\t\"fmt\"\n\n\t\"github.com/acme/errors-x\"\n\tstdlog \"log\"\n\t_ \"net/http/pprof\"\n)\n";
    assert_eq!(canon(src), want);
}

#[test]
fn exits_get_a_blank_line_unless_first() {
    let src = "package p\n\nfunc f(xs []int) int {\n\tfor _, x := range xs {\n\t\tif x > 0 {\n\t\t\tx--\n\t\t\tcontinue\n\t\t}\n\t\tif x < 0 {\n\t\t\treturn x\n\t\t}\n\t}\n\tn := len(xs)\n\treturn n\n}\n";
    let want = "package p\n\nfunc f(xs []int) int {\n\tfor _, x := range xs {\n\t\tif x > 0 {\n\t\t\tx--\n\n\t\t\tcontinue\n\t\t}\n\t\tif x < 0 {\n\t\t\treturn x\n\t\t}\n\t}\n\tn := len(xs)\n\n\treturn n\n}\n";
    assert_eq!(canon(src), want);
}

#[test]
fn one_line_literals_are_left_alone() {
    let src = "package p\n\nfunc f() (err error) {\n\tdefer func() { err = wrap(err) }()\n\tif ok := func() bool { return true }; ok() {\n\t\tg()\n\t\treturn\n\t}\n\tg()\n\treturn\n}\n\nfunc h() { return }\n";
    let want = "package p\n\nfunc f() (err error) {\n\tdefer func() { err = wrap(err) }()\n\tif ok := func() bool { return true }; ok() {\n\t\tg()\n\n\t\treturn\n\t}\n\tg()\n\n\treturn\n}\n\nfunc h() { return }\n";
    assert_eq!(canon(src), want);
}

#[test]
fn declaration_order_is_kept() {
    let src = "package p\n\nfunc z() {}\n\ntype B struct{}\n\nvar a = 1\n\ntype A struct{}\n";
    assert_eq!(canon(src), src);
}

#[test]
fn file_without_declarations_is_untouched() {
    let src = "// Package p.\npackage p // ok\n";
    assert_eq!(canon(src), src);
}

#[test]
fn configured_names_change_buckets() {
    let config = CanonConfig {
        fields: FieldOrder {
            role: "log".into(),
            identifier: "ID".into(),
            timestamps: vec!["Deleted".into()],
        },
        base_formatter: None,
    };
    let src = "package p\n\ntype T struct {\n\tDeleted bool\n\tName string\n\tID int\n\tlog Logger\n}\n";
    let want = "package p\n\ntype T struct {\n\tlog Logger\n\tID int\n\tName string\n\tDeleted bool\n}\n";
    assert_eq!(Formatter::new(config).format_source(src).unwrap(), want);
}

#[test]
fn broken_input_is_an_error() {
    assert!(Formatter::default()
        .format_source("package p\n\ntype T struct {\n")
        .is_err());
}
