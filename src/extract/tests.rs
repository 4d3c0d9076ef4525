//! End-to-end tests for parsing, visiting and aggregating

use super::*;

fn extract(source: &str, filter: &FilterSpec) -> FileExtraction {
    let file = PythonParser::new().unwrap().parse(source).unwrap();
    Extractor::new(filter).extract(file)
}

fn codes(extraction: &FileExtraction) -> Vec<&str> {
    extraction
        .code_blocks
        .iter()
        .map(|block| block.code.as_str())
        .collect()
}

fn names(extraction: &FileExtraction) -> Vec<&str> {
    extraction
        .code_blocks
        .iter()
        .map(|block| block.name.as_str())
        .collect()
}

const CLASS_WITH_METHOD: &str = "class A:\n    def m(x: int): return x\n";

#[test]
fn test_class_header_and_indented_method() {
    let extraction = extract(CLASS_WITH_METHOD, &FilterSpec::new());

    assert_eq!(
        codes(&extraction),
        vec!["class A:", "    def m(x: int):\n        return x\n"]
    );
    assert_eq!(
        extraction.docstrings,
        vec![
            DocstringEntry {
                name: "A".to_string(),
                docstring: None
            },
            DocstringEntry {
                name: "m".to_string(),
                docstring: None
            },
        ]
    );
    assert_eq!(extraction.code_blocks[0].kind, BlockKind::Class);
    assert_eq!(extraction.code_blocks[1].kind, BlockKind::Method);
}

#[test]
fn test_excluded_method_keeps_class_header() {
    let filter = FilterSpec::new().with_exclude_methods(["m"]);
    let extraction = extract(CLASS_WITH_METHOD, &filter);

    assert_eq!(codes(&extraction), vec!["class A:"]);
    assert_eq!(extraction.docstrings.len(), 1);
}

#[test]
fn test_function_docstring_is_split_out() {
    let extraction = extract("def f(): \"\"\"doc\"\"\"; pass\n", &FilterSpec::new());

    assert_eq!(codes(&extraction), vec!["def f():\n    pass\n"]);
    assert_eq!(
        extraction.docstrings,
        vec![DocstringEntry {
            name: "f".to_string(),
            docstring: Some("doc".to_string())
        }]
    );
}

#[test]
fn test_placeholder_constructor_is_omitted_even_when_included() {
    let source = "class A:\n    def __init__(self):\n        pass\n";
    let filter = FilterSpec::new().with_include_methods(["__init__"]);
    let extraction = extract(source, &filter);

    assert_eq!(codes(&extraction), vec!["class A:"]);
    assert_eq!(extraction.docstrings.len(), 1);
}

#[test]
fn test_constructor_with_docstring_is_kept() {
    let source = "class A:\n    def __init__(self):\n        \"\"\"Set up.\"\"\"\n        pass\n";
    let extraction = extract(source, &FilterSpec::new());

    assert_eq!(
        codes(&extraction),
        vec!["class A:", "    def __init__(self):\n        pass\n"]
    );
    assert_eq!(extraction.docstrings[1].docstring.as_deref(), Some("Set up."));
}

#[test]
fn test_methods_are_never_emitted_as_functions() {
    // `m` passes the method filter but its parent class is filtered out
    let filter = FilterSpec::new().with_exclude_classes(["A"]);
    let extraction = extract(CLASS_WITH_METHOD, &filter);

    assert!(extraction.is_empty());
    assert!(extraction.docstrings.is_empty());
}

#[test]
fn test_inner_class_of_rejected_class_is_tested_on_its_own() {
    let source = r#"
class Outer:
    class Inner:
        def run(self):
            return 1
"#;
    let filter = FilterSpec::new().with_exclude_classes(["Outer"]);
    let extraction = extract(source, &filter);

    assert_eq!(
        codes(&extraction),
        vec!["class Inner:", "    def run(self):\n        return 1\n"]
    );
}

#[test]
fn test_function_under_conditional_in_class_is_not_a_method() {
    let source = r#"
class Config:
    if FAST:
        def speed(self):
            return 10
"#;
    let extraction = extract(source, &FilterSpec::new());

    assert_eq!(names(&extraction), vec!["Config", "speed"]);
    assert_eq!(extraction.code_blocks[1].kind, BlockKind::Function);
    assert_eq!(
        extraction.code_blocks[1].code,
        "def speed(self):\n    return 10\n"
    );
}

#[test]
fn test_nested_function_follows_its_outer_function() {
    let source = r#"
def outer():
    def inner():
        """Inner doc."""
        return 2
    return inner
"#;
    let extraction = extract(source, &FilterSpec::new());

    assert_eq!(names(&extraction), vec!["outer", "inner"]);
    // The outer body is rendered before the inner docstring is stripped
    assert_eq!(
        extraction.code_blocks[0].code,
        "def outer():\n    def inner():\n        \"\"\"Inner doc.\"\"\"\n        return 2\n    return inner\n"
    );
    assert_eq!(extraction.code_blocks[1].code, "def inner():\n    return 2\n");
    assert_eq!(extraction.docstrings[1].docstring.as_deref(), Some("Inner doc."));
}

#[test]
fn test_functions_inside_methods_are_not_visited() {
    let source = r#"
class A:
    def m(self):
        def helper():
            return 1
        return helper()
"#;
    let extraction = extract(source, &FilterSpec::new());
    assert_eq!(names(&extraction), vec!["A", "m"]);
}

#[test]
fn test_rejected_function_children_are_still_visited() {
    let source = "def outer():\n    def inner():\n        pass\n";
    let filter = FilterSpec::new().with_exclude_methods(["outer"]);
    let extraction = extract(source, &filter);
    assert_eq!(names(&extraction), vec!["inner"]);
}

#[test]
fn test_class_docstring_and_decorators() {
    let source = r#"
@dataclass
class Point(Base):
    """A 2D point.

    Immutable.
    """

    @property
    def norm(self) -> float:
        """Length."""
        return (self.x ** 2 + self.y ** 2) ** 0.5
"#;
    let extraction = extract(source, &FilterSpec::new());

    assert_eq!(
        codes(&extraction),
        vec![
            "@dataclass\nclass Point:",
            "    @property\n    def norm(self):\n        return (self.x ** 2 + self.y ** 2) ** 0.5\n",
        ]
    );
    assert_eq!(
        extraction.docstrings[0].docstring.as_deref(),
        Some("A 2D point.\n\nImmutable.")
    );
    assert_eq!(extraction.docstrings[1].docstring.as_deref(), Some("Length."));
}

#[test]
fn test_empty_docstring_is_present_not_absent() {
    let extraction = extract("def f():\n    \"\"\n    return 1\n", &FilterSpec::new());
    assert_eq!(extraction.docstrings[0].docstring, Some(String::new()));
}

#[test]
fn test_docstring_only_body_renders_pass() {
    let extraction = extract("def stub():\n    \"\"\"Todo.\"\"\"\n", &FilterSpec::new());
    assert_eq!(codes(&extraction), vec!["def stub():\n    pass\n"]);
}

#[test]
fn test_async_method_rendering() {
    let source = "class Client:\n    async def get(self, url: str):\n        return await fetch(url)\n";
    let extraction = extract(source, &FilterSpec::new());
    assert_eq!(
        extraction.code_blocks[1].code,
        "    async def get(self, url: str):\n        return await fetch(url)\n"
    );
}

#[test]
fn test_multiline_body_keeps_relative_indentation() {
    let source = r#"
def walk(items):
    for item in items:

        if item:
            yield item
"#;
    let extraction = extract(source, &FilterSpec::new());
    assert_eq!(
        extraction.code_blocks[0].code,
        "def walk(items):\n    for item in items:\n\n        if item:\n            yield item\n"
    );
}

#[test]
fn test_flush_left_string_literal_keeps_its_value() {
    let source = "def query():\n    sql = \"\"\"SELECT *\nFROM t\"\"\"\n    return sql\n";
    let extraction = extract(source, &FilterSpec::new());

    let code = &extraction.code_blocks[0].code;
    assert_eq!(code, source);
    assert!(code.contains("SELECT *\nFROM t\"\"\""));
}

#[test]
fn test_method_string_literal_is_not_reindented() {
    let source = r#"
class Repo:
    def query(self):
        sql = """SELECT *
FROM t
    WHERE id = 1"""
        return sql
"#;
    let extraction = extract(source, &FilterSpec::new());
    assert_eq!(
        codes(&extraction),
        vec![
            "class Repo:",
            "    def query(self):\n        sql = \"\"\"SELECT *\nFROM t\n    WHERE id = 1\"\"\"\n        return sql\n",
        ]
    );
}

#[test]
fn test_comments_are_dropped_at_every_depth() {
    let source = r#"
def check(x):
    # leading
    if x:
        # inside
        y()  # trailing
    return x  # done
"#;
    let extraction = extract(source, &FilterSpec::new());
    assert_eq!(
        extraction.code_blocks[0].code,
        "def check(x):\n    if x:\n        y()\n    return x\n"
    );
}

#[test]
fn test_methods_precede_nested_classes() {
    let source = r#"
class A:
    class B:
        pass
    def m(self):
        pass
"#;
    let extraction = extract(source, &FilterSpec::new());
    assert_eq!(names(&extraction), vec!["A", "m", "B"]);
}

#[test]
fn test_source_order_across_classes_and_functions() {
    let source = r#"
def first():
    pass

class Second:
    def a(self):
        pass

    def b(self):
        pass

def third():
    pass
"#;
    let extraction = extract(source, &FilterSpec::new());
    assert_eq!(names(&extraction), vec!["first", "Second", "a", "b", "third"]);
    let doc_names: Vec<&str> = extraction
        .docstrings
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(doc_names, names(&extraction));
}

#[test]
fn test_include_sets_restrict_classes_and_methods() {
    let source = r#"
class Keep:
    def wanted(self):
        pass
    def other(self):
        pass

class Drop:
    def wanted(self):
        pass

def wanted():
    pass
"#;
    let filter = FilterSpec::new()
        .with_include_classes(["Keep"])
        .with_include_methods(["wanted"]);
    let extraction = extract(source, &filter);
    assert_eq!(names(&extraction), vec!["Keep", "wanted", "wanted"]);
    assert_eq!(extraction.code_blocks[1].kind, BlockKind::Method);
    assert_eq!(extraction.code_blocks[2].kind, BlockKind::Function);
}

#[test]
fn test_pairs_are_aligned() {
    let extraction = extract(CLASS_WITH_METHOD, &FilterSpec::new());
    for (entry, block) in extraction.pairs() {
        assert_eq!(entry.name, block.name);
    }
}

#[test]
fn test_aggregator_two_files_two_sections() {
    let filter = FilterSpec::new();
    let result = Aggregator::new(&filter)
        .run_sources([
            ("pkg/a.py", CLASS_WITH_METHOD),
            ("pkg/b.py", "def f(): \"\"\"doc\"\"\"; pass\n"),
        ])
        .unwrap();

    assert_eq!(result.files.len(), 2);
    assert_eq!(result.files[0].extraction.len(), 2);
    assert_eq!(result.files[1].extraction.len(), 1);
    assert_eq!(
        result.digest(),
        "# a.py:\nclass A:\n    def m(x: int):\n        return x\n\n\n# b.py:\ndef f():\n    pass\n\n"
    );
}

#[test]
fn test_aggregator_skips_files_without_blocks_in_digest() {
    let filter = FilterSpec::new();
    let result = Aggregator::new(&filter)
        .run_sources([("empty.py", "X = 1\n"), ("f.py", "def f():\n    pass\n")])
        .unwrap();

    assert_eq!(result.files.len(), 2);
    assert!(result.files[0].extraction.is_empty());
    assert_eq!(result.digest(), "# f.py:\ndef f():\n    pass\n\n");
}

#[test]
fn test_aggregator_is_idempotent() {
    let filter = FilterSpec::new().with_exclude_methods(["b"]);
    let sources = [
        ("one.py", "class C:\n    \"\"\"C doc.\"\"\"\n    def a(self):\n        pass\n    def b(self):\n        pass\n"),
        ("two.py", "def g(x):\n    return x\n"),
    ];
    let aggregator = Aggregator::new(&filter);
    let first = aggregator.run_sources(sources).unwrap();
    let second = aggregator.run_sources(sources).unwrap();

    assert_eq!(first.digest(), second.digest());
    assert_eq!(
        first.docstrings().collect::<Vec<_>>(),
        second.docstrings().collect::<Vec<_>>()
    );
}

#[test]
fn test_aggregator_aborts_on_parse_failure_by_default() {
    let filter = FilterSpec::new();
    let err = Aggregator::new(&filter)
        .run_sources([("ok.py", "x = 1\n"), ("bad.py", "def (:\n")])
        .unwrap_err();

    match err {
        crate::error::DigestError::Extract(crate::error::ExtractError::Parse { file, .. }) => {
            assert_eq!(file, "bad.py");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_aggregator_skip_policy_records_failures() {
    let filter = FilterSpec::new();
    let result = Aggregator::new(&filter)
        .on_parse_error(OnParseError::Skip)
        .run_sources([("bad.py", "class :\n"), ("good.py", "def f():\n    pass\n")])
        .unwrap();

    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].path, std::path::PathBuf::from("bad.py"));
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.block_count(), 1);
}
