//! 式からの依存関係抽出テスト

use moontpl::{extract_dependencies, Dependencies, GLOBALS};
use pretty_assertions::assert_eq;
use test_case::test_case;

/// 新しい依存リストで抽出するヘルパー関数
fn extract(expression: &str) -> Vec<String> {
    let mut deps = Dependencies::new();
    extract_dependencies(expression, &mut deps);
    deps.to_vec()
}

#[test_case("name", &["name"] ; "bare identifier")]
#[test_case("a + b * c", &["a", "b", "c"] ; "operators")]
#[test_case("items[index].label", &["items", "index"] ; "indexing then member")]
#[test_case("fn(arg).result", &["fn", "arg"] ; "call then member")]
#[test_case("$el + _private", &["$el", "_private"] ; "dollar and underscore")]
#[test_case("count2 + 3", &["count2"] ; "digits")]
#[test_case("1.5e3", &[] ; "number with exponent")]
#[test_case(r#""a b" + 'c d'"#, &[] ; "only strings")]
#[test_case(r#""unterminated + rest"#, &["unterminated", "rest"] ; "unterminated double quote")]
#[test_case("{ key: value }", &["value"] ; "object literal")]
#[test_case("cond ? yes : no", &["cond", "yes", "no"] ; "ternary with spaces")]
fn test_extract(expression: &str, expected: &[&str]) {
    assert_eq!(extract(expression), expected);
}

#[test]
fn test_globals() {
    for global in GLOBALS {
        assert_eq!(extract(global), Vec::<String>::new(), "{} should be ignored", global);
    }
    assert_eq!(extract("typeof value === 'undefined'"), vec!["value"]);
}

#[test]
fn test_existing_entries_are_kept_in_order() {
    let mut deps: Dependencies = ["z"].into_iter().collect();
    extract_dependencies("a + z + b + a", &mut deps);
    assert_eq!(deps.to_vec(), vec!["z", "a", "b"]);
}

#[test]
fn test_returns_same_list() {
    let mut deps = Dependencies::new();
    let returned = extract_dependencies("x", &mut deps);
    returned.insert("y");
    assert_eq!(deps.to_vec(), vec!["x", "y"]);
}
