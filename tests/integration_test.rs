//! Integration tests for recordkit operations, registry and pipelines

use recordkit::{
    create_template, generate_usage_decorated, output_to_template, Collection, Config, Error,
    FieldValue, Function, Kind, PipelineEvaluator, Value,
};
use serde_json::json;

fn stocks() -> Collection {
    Collection::from_json(
        &json!([
            {"Name": "A", "Volume": 100, "Price": 1.5, "Listed": true},
            {"Name": "B", "Volume": 50, "Price": 20.0, "Listed": false},
            {"Name": "C", "Volume": 75, "Price": 3.25, "Listed": true},
            {"Name": "D", "Volume": 50, "Price": 0.5, "Listed": false}
        ]),
        "Stock",
    )
    .unwrap()
}

fn names(value: &Value) -> Vec<String> {
    value
        .as_collection()
        .unwrap()
        .iter()
        .map(|r| r.get("Name").unwrap().to_string())
        .collect()
}

fn grid(rows: &[&[&str]]) -> Value {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect::<Vec<Vec<String>>>()
        .into()
}

#[test]
fn test_top_by_volume() {
    let config = Config::all();
    let two = Collection::from_json(
        &json!([{"Name": "A", "Volume": 100}, {"Name": "B", "Volume": 50}]),
        "Stock",
    )
    .unwrap();

    let sorted = config
        .call("sort", &[two.into(), "Volume".into(), "dsc".into()])
        .unwrap();
    let top = config.call("head", &[sorted, 1.into()]).unwrap();
    let top = top.as_collection().unwrap();

    assert_eq!(top.len(), 1);
    assert_eq!(top.records()[0].get("Name"), Some(&FieldValue::String("A".to_string())));
    assert_eq!(top.records()[0].get("Volume"), Some(&FieldValue::Int(100)));
}

#[test]
fn test_totable_scenario() {
    let config = Config::all();
    let table = config
        .call("totable", &[grid(&[&["Name", "Count"], &["a", "1"], &["b", "2"]])])
        .unwrap();
    let table = table.as_collection().unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.record_type().fields()[1].kind, Kind::Int);
    let counts: Vec<_> = table.iter().map(|r| r.get("Count").cloned()).collect();
    assert_eq!(
        counts,
        vec![Some(FieldValue::Int(1)), Some(FieldValue::Int(2))]
    );
}

#[test]
fn test_sort_is_stable_permutation_and_idempotent() {
    let config = Config::all();
    let once = config
        .call("sort", &[stocks().into(), "Volume".into()])
        .unwrap();
    let twice = config.call("sort", &[once.clone(), "Volume".into()]).unwrap();

    // B and D tie on Volume and keep their input order.
    assert_eq!(names(&once), vec!["B", "D", "C", "A"]);
    assert_eq!(once, twice);

    let mut sorted_names = names(&once);
    sorted_names.sort();
    assert_eq!(sorted_names, vec!["A", "B", "C", "D"]);
}

#[test]
fn test_sort_leaves_input_untouched() {
    let original = stocks();
    let config = Config::all();
    config
        .call("sort", &[original.clone().into(), "Name".into(), "dsc".into()])
        .unwrap();
    assert_eq!(original, stocks());
}

#[test]
fn test_head_tail_bounds() {
    let config = Config::all();
    let c: Value = stocks().into();

    let none = config.call("head", &[c.clone(), 0.into()]).unwrap();
    assert!(none.as_collection().unwrap().is_empty());

    let all = config.call("head", &[c.clone(), 10.into()]).unwrap();
    assert_eq!(all, c);

    let tail = config.call("tail", &[c.clone(), 4.into()]).unwrap();
    assert_eq!(tail, c);

    let last = config.call("tail", &[c.clone()]).unwrap();
    assert_eq!(names(&last), vec!["D"]);
}

#[test]
fn test_filter_subset_and_idempotent() {
    let config = Config::all();
    let args = |c: Value| vec![c, "Listed".into(), "true".into()];

    let once = config.call("filter", &args(stocks().into())).unwrap();
    let twice = config.call("filter", &args(once.clone())).unwrap();

    assert_eq!(names(&once), vec!["A", "C"]);
    assert_eq!(once, twice);

    let regexp = config
        .call("filterRegexp", &[stocks().into(), "Price".into(), r"^\d\.".into()])
        .unwrap();
    assert_eq!(names(&regexp), vec!["A", "C", "D"]);
}

#[test]
fn test_rows_skips_out_of_range() {
    let config = Config::all();
    let two = config.call("head", &[stocks().into(), 2.into()]).unwrap();
    let picked = config
        .call("rows", &[two, 0.into(), 1.into(), 2.into()])
        .unwrap();
    assert_eq!(names(&picked), vec!["A", "B"]);
}

#[test]
fn test_cols_then_table_renders_one_column() {
    let config = Config::all();
    let only_names = config.call("cols", &[stocks().into(), "Name".into()]).unwrap();
    let out = config.call("table", &[only_names]).unwrap();
    assert_eq!(out.as_str().unwrap(), "Name\nA\nB\nC\nD\n");
}

#[test]
fn test_table_round_trip() {
    let config = Config::all();
    let original = stocks();
    let rendered = config.call("table", &[original.clone().into()]).unwrap();

    let cells: Vec<Vec<String>> = rendered
        .as_str()
        .unwrap()
        .lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect();
    let parsed = config.call("totable", &[cells.into()]).unwrap();
    let parsed = parsed.as_collection().unwrap();

    let kinds = |c: &Collection| -> Vec<Kind> {
        c.record_type().fields().iter().map(|f| f.kind.clone()).collect()
    };
    assert_eq!(kinds(parsed), kinds(&original));

    for (a, b) in parsed.iter().zip(original.iter()) {
        let left: Vec<_> = a.visible().map(|(d, v)| (d.name.clone(), v.clone())).collect();
        let right: Vec<_> = b.visible().map(|(d, v)| (d.name.clone(), v.clone())).collect();
        assert_eq!(left, right);
    }
}

#[test]
fn test_promote_nested_records() {
    let accounts = Collection::from_json(
        &json!([
            {"id": 1, "user": {"credentials": {"name": "alice"}}},
            {"id": 2, "user": {"credentials": {"name": "bob"}}}
        ]),
        "Account",
    )
    .unwrap();

    let config = Config::all();
    let creds = config
        .call("promote", &[accounts.clone().into(), "user.credentials".into()])
        .unwrap();
    let out = config.call("select", &[creds, "name".into()]).unwrap();
    assert_eq!(out.as_str().unwrap(), "alice\nbob\n");

    let err = config
        .call("promote", &[accounts.into(), "id.credentials".into()])
        .unwrap_err();
    assert!(matches!(err, Error::NotARecord { .. }));
}

#[test]
fn test_sliceof_record() {
    let config = Config::all();
    let record = stocks().records()[2].clone();
    let wrapped = config.call("sliceof", &[record.into()]).unwrap();
    assert_eq!(names(&wrapped), vec!["C"]);

    let err = config.call("sliceof", &[stocks().into()]).unwrap_err();
    assert!(matches!(err, Error::Shape(_)));
}

#[test]
fn test_pipeline_composition() {
    let mut out = Vec::new();
    output_to_template(
        &mut out,
        "top",
        r#"filter "Listed" "true" | sort "Price" "dsc" | tablex 1 8 2"#,
        &stocks().into(),
        None,
        &PipelineEvaluator,
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Name  Volume  Price  Listed\nC     75      3.25   true\nA     100     1.5    true\n"
    );
}

#[test]
fn test_pipeline_csv_output() {
    let template = create_template(
        "csv",
        "cols Name Volume | tocsv true",
        None,
        &PipelineEvaluator,
    )
    .unwrap();
    let out = template
        .render(&PipelineEvaluator, &stocks().into())
        .unwrap();
    assert_eq!(out, "A,100\nB,50\nC,75\nD,50\n");
}

#[test]
fn test_disabled_function_fails_to_compile() {
    let config = Config::new().with_filters();
    let result = create_template("t", "sort Name", Some(&config), &PipelineEvaluator);
    assert!(matches!(result, Err(Error::Template(_))));
}

#[test]
fn test_help_order_is_deterministic() {
    let forward = Function::ALL
        .iter()
        .fold(Config::new(), |c, f| c.with(*f));
    let backward = Function::ALL
        .iter()
        .rev()
        .fold(Config::new(), |c, f| c.with(*f));

    assert_eq!(forward.function_help(), backward.function_help());
    assert_eq!(forward.function_names(), Config::all().function_names());
    assert_eq!(forward.function_names()[0], "filter");
    assert_eq!(forward.function_names()[26], "totable");
}

#[test]
fn test_decorated_usage_lists_enabled_functions_only() {
    let config = Config::new().with(Function::Sort).with(Function::Head);
    let usage = generate_usage_decorated("f", &stocks().into(), &config).unwrap();

    assert!(usage.starts_with("The template passed to the -f option operates on a\n\n[]Stock {"));
    let sort = usage.find("- 'sort'").unwrap();
    let head = usage.find("- 'head'").unwrap();
    assert!(sort < head);
    assert!(!usage.contains("- 'tail'"));
}

#[test]
fn test_custom_function_in_pipeline() {
    let mut config = Config::all();
    config
        .add_custom_fn(
            "count",
            |args: &[Value]| -> recordkit::Result<Value> {
                let c = args
                    .first()
                    .and_then(Value::as_collection)
                    .ok_or_else(|| Error::Shape("count expects a collection".to_string()))?;
                Ok(Value::from(c.len() as i64))
            },
            "- 'count' returns the number of elements in a collection",
        )
        .unwrap();

    let mut out = Vec::new();
    output_to_template(
        &mut out,
        "count",
        r#"filterHasPrefix "Name" "B" | count"#,
        &stocks().into(),
        Some(&config),
        &PipelineEvaluator,
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1");
    assert!(config.function_help().ends_with("- 'count' returns the number of elements in a collection\n"));
}
